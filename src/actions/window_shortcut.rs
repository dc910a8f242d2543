//! Focuses a window by exact title and sends it a key chord.
//!
//! Window lookup and input go through `xdotool`, so the action works on X11
//! desktops; elsewhere it reports an I/O failure for the missing tool.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::LifecycleEvent;

use super::{lookup, process, Act, ActionError, ActionGates, EventMapping};

const XDOTOOL: &str = "xdotool";
const FOCUS_SETTLE: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WindowShortcutAction {
    #[serde(flatten)]
    pub gates: ActionGates,
    #[serde(default)]
    pub window_name: String,
    /// Keys pressed together, e.g. `["ctrl", "shift", "p"]`.
    #[serde(default)]
    pub shortcut: EventMapping<Vec<String>>,
}

impl WindowShortcutAction {
    /// Ids of windows whose title equals `window_name` exactly.
    async fn find_windows(&self) -> Result<Vec<String>, ActionError> {
        let search = process::run(
            process::program(XDOTOOL, ["search", "--name", self.window_name.as_str()]),
            "xdotool search",
        )
        .await?;

        // xdotool exits 1 with no output when nothing matches.
        let mut matches = Vec::new();
        for id in search.stdout.split_whitespace() {
            let name = process::run(
                process::program(XDOTOOL, ["getwindowname", id]),
                "xdotool getwindowname",
            )
            .await?;
            if name.success() && name.stdout.trim_end_matches(['\r', '\n']) == self.window_name {
                matches.push(id.to_string());
            }
        }
        Ok(matches)
    }

    async fn xdotool(&self, args: &[&str]) -> Result<(), ActionError> {
        let output = process::run(process::program(XDOTOOL, args), "xdotool").await?;
        if !output.success() {
            return Err(ActionError::Automation(format!(
                "xdotool {} exited with {}: {}",
                args.join(" "),
                output.status,
                output.stderr.trim()
            )));
        }
        Ok(())
    }
}

pub(crate) fn chord(keys: &[String]) -> String {
    keys.iter()
        .map(|key| key.trim())
        .filter(|key| !key.is_empty())
        .collect::<Vec<_>>()
        .join("+")
}

#[async_trait]
impl Act for WindowShortcutAction {
    fn label(&self) -> &'static str {
        "window_shortcut"
    }

    fn gates(&self) -> &ActionGates {
        &self.gates
    }

    async fn perform(&self, event: &LifecycleEvent) -> Result<(), ActionError> {
        let keys = chord(lookup(&self.shortcut, event)?);

        let windows = self.find_windows().await?;
        if windows.is_empty() {
            return Err(ActionError::WindowNotFound {
                window: self.window_name.clone(),
            });
        }

        for window in &windows {
            self.xdotool(&["windowactivate", "--sync", window.as_str()]).await?;
            tokio::time::sleep(FOCUS_SETTLE).await;
            self.xdotool(&["key", "--window", window.as_str(), keys.as_str()]).await?;
            log::info!("Sent {keys} to window {window} ({})", self.window_name);
        }
        Ok(())
    }
}
