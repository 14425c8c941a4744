use quill_types::{Action, ActionCommands};
use tokio::process::Command;

use super::ActionDispatcher;

/// Runs the configured shell command for each action.
///
/// The child is spawned and reaped on a background task; `dispatch` itself
/// never waits for it. Actions with no command are logged and skipped.
#[derive(Debug, Clone)]
pub struct CommandDispatcher {
    commands: ActionCommands,
}

impl CommandDispatcher {
    pub fn new(commands: ActionCommands) -> Self {
        Self { commands }
    }

    /// Split the configured command line into argv
    pub fn argv_for(&self, action: Action) -> Option<Vec<String>> {
        let line = self.commands.command_for(action)?;
        match shlex::split(line) {
            Some(argv) if !argv.is_empty() => Some(argv),
            _ => {
                tracing::warn!(%action, command = line, "Unparseable action command");
                None
            }
        }
    }
}

impl ActionDispatcher for CommandDispatcher {
    fn dispatch(&self, action: Action) {
        let Some(argv) = self.argv_for(action) else {
            tracing::info!(%action, "Action requested (no command configured)");
            return;
        };

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(%action, "No runtime available to run action command");
            return;
        };

        let mut command = Command::new(&argv[0]);
        command.args(&argv[1..]);

        match command.spawn() {
            Ok(mut child) => {
                tracing::info!(%action, program = %argv[0], "Action command started");
                runtime.spawn(async move {
                    match child.wait().await {
                        Ok(status) if !status.success() => {
                            tracing::debug!(%action, %status, "Action command exited with failure");
                        }
                        Ok(_) => {}
                        Err(e) => tracing::debug!(%action, error = %e, "Failed waiting on action command"),
                    }
                });
            }
            Err(e) => {
                tracing::warn!(%action, program = %argv[0], error = %e, "Failed to spawn action command");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argv_is_shell_split() {
        let dispatcher = CommandDispatcher::new(ActionCommands::firmware_defaults());
        let argv = dispatcher.argv_for(Action::Sleep).unwrap();
        assert_eq!(argv, vec!["sh", "-c", "echo mem > /sys/power/state"]);
    }

    #[test]
    fn test_missing_or_blank_command_has_no_argv() {
        let commands = ActionCommands {
            screenshot: Some("   ".to_string()),
            ..Default::default()
        };
        let dispatcher = CommandDispatcher::new(commands);
        assert!(dispatcher.argv_for(Action::Screenshot).is_none());
        assert!(dispatcher.argv_for(Action::PageUp).is_none());
    }

    #[test]
    fn test_unbalanced_quotes_are_rejected() {
        let commands = ActionCommands {
            page_up: Some("sh -c 'oops".to_string()),
            ..Default::default()
        };
        assert!(CommandDispatcher::new(commands).argv_for(Action::PageUp).is_none());
    }

    #[tokio::test]
    async fn test_dispatch_returns_without_waiting() {
        let commands = ActionCommands {
            power_menu: Some("sleep 5".to_string()),
            ..Default::default()
        };
        let dispatcher = CommandDispatcher::new(commands);

        let started = std::time::Instant::now();
        dispatcher.dispatch(Action::PowerMenu);
        dispatcher.dispatch(Action::Sleep);
        assert!(started.elapsed() < std::time::Duration::from_secs(2));
    }
}
