use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::LifecycleEvent;

use super::{lookup, process, Act, ActionError, ActionGates, EventMapping};

/// Runs a shell command line keyed by alert type and event kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocalCommandAction {
    #[serde(flatten)]
    pub gates: ActionGates,
    #[serde(default)]
    pub commands: EventMapping<String>,
}

#[async_trait]
impl Act for LocalCommandAction {
    fn label(&self) -> &'static str {
        "local_console_execute"
    }

    fn gates(&self) -> &ActionGates {
        &self.gates
    }

    async fn perform(&self, event: &LifecycleEvent) -> Result<(), ActionError> {
        let line = lookup(&self.commands, event)?;
        let output = process::run(process::shell(line), "local command").await?;

        if !output.success() {
            return Err(ActionError::Automation(format!(
                "`{line}` exited with {}: {}",
                output.status,
                output.stderr.trim()
            )));
        }

        log::debug!("`{line}` finished: {}", output.stdout.trim());
        Ok(())
    }
}
