//! Windows-only variant: activates the window and sends keys via PowerShell.
//!
//! Keys use `System.Windows.Forms.SendKeys` syntax (`^p` is ctrl+p).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::LifecycleEvent;

use super::{lookup, process, Act, ActionError, ActionGates, EventMapping};

const POWERSHELL: &str = "powershell";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PowerShellShortcutAction {
    #[serde(flatten)]
    pub gates: ActionGates,
    #[serde(default)]
    pub window_name: String,
    #[serde(default)]
    pub shortcut: EventMapping<String>,
}

/// Single-quoted PowerShell literal; no variable expansion inside.
pub(crate) fn ps_quote(raw: &str) -> String {
    format!("'{}'", raw.replace('\'', "''"))
}

pub(crate) fn activate_script(window_name: &str) -> String {
    format!(
        "Add-Type -AssemblyName Microsoft.VisualBasic; \
         [Microsoft.VisualBasic.Interaction]::AppActivate({})",
        ps_quote(window_name)
    )
}

pub(crate) fn send_keys_script(keys: &str) -> String {
    format!(
        "Add-Type -AssemblyName System.Windows.Forms; \
         [System.Windows.Forms.SendKeys]::SendWait({})",
        ps_quote(keys)
    )
}

async fn run_script(script: String) -> Result<process::ProcessOutput, ActionError> {
    process::run(
        process::program(POWERSHELL, ["-NoProfile", "-Command", script.as_str()]),
        "powershell",
    )
    .await
}

#[async_trait]
impl Act for PowerShellShortcutAction {
    fn label(&self) -> &'static str {
        "powershell_shortcut"
    }

    fn gates(&self) -> &ActionGates {
        &self.gates
    }

    async fn perform(&self, event: &LifecycleEvent) -> Result<(), ActionError> {
        let keys = lookup(&self.shortcut, event)?;

        // AppActivate writes to stderr when no window has that title.
        let activate = run_script(activate_script(&self.window_name)).await?;
        if !activate.stderr.trim().is_empty() {
            log::debug!("AppActivate stderr: {}", activate.stderr.trim());
            return Err(ActionError::WindowNotFound {
                window: self.window_name.clone(),
            });
        }

        let send = run_script(send_keys_script(keys)).await?;
        if !send.stderr.trim().is_empty() || !send.success() {
            return Err(ActionError::Automation(format!(
                "SendKeys failed ({}): {}",
                send.status,
                send.stderr.trim()
            )));
        }

        log::info!("Sent {keys} to window {}", self.window_name);
        Ok(())
    }
}
