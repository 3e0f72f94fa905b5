//! Settings checks run before every command
//!
//! Auto-connect and lockdown mode are read on each run. If either is off the
//! user is asked whether to turn it on. Nothing here can fail the run: a
//! setting we cannot read is reported and skipped, a failed write is a
//! warning.

pub mod hardening;

pub use hardening::{HardeningOutcome, run_hardening};

use crate::client::state::{AUTO_CONNECT, LOCKDOWN};
use crate::client::{Setting, SettingState, VpnClient};
use crate::prompt::Prompter;
use tracing::{info, warn};

/// Result of checking one toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    AlreadyOn,
    Enabled,
    EnableFailed,
    Declined,
    Undetermined,
}

/// Check auto-connect then lockdown mode
pub fn enforce_toggles(client: &dyn VpnClient, prompter: &dyn Prompter) -> Vec<ToggleOutcome> {
    [AUTO_CONNECT, LOCKDOWN]
        .iter()
        .map(|setting| enforce(setting, client, prompter))
        .collect()
}

/// Read-confirm-write for a single toggle
pub fn enforce(
    setting: &Setting,
    client: &dyn VpnClient,
    prompter: &dyn Prompter,
) -> ToggleOutcome {
    match setting.query(client) {
        SettingState::Unknown => {
            warn!("Could not determine {} state, skipping", setting.label);
            ToggleOutcome::Undetermined
        }
        SettingState::Enabled => {
            println!("{}: on", setting.label);
            ToggleOutcome::AlreadyOn
        }
        SettingState::Disabled => {
            let question = format!("{} is off. Turn it on?", setting.label);
            if !prompter.confirm(&question) {
                info!("Leaving {} off", setting.label);
                return ToggleOutcome::Declined;
            }
            match setting.enable(client) {
                Ok(_) => {
                    println!("{}: turned on", setting.label);
                    ToggleOutcome::Enabled
                }
                Err(e) => {
                    warn!("Failed to enable {}: {}", setting.label, e);
                    ToggleOutcome::EnableFailed
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::FakeClient;
    use crate::prompt::FixedAnswer;

    #[test]
    fn test_already_on_needs_no_prompt() {
        let client = FakeClient::new()
            .ok("auto-connect get", "Autoconnect: on")
            .ok("lockdown-mode get", "Block traffic when the VPN is disconnected: on");

        let outcomes = enforce_toggles(&client, &FixedAnswer(true));

        assert_eq!(outcomes, vec![ToggleOutcome::AlreadyOn, ToggleOutcome::AlreadyOn]);
        assert!(client.calls_starting_with("auto-connect set").is_empty());
        assert!(client.calls_starting_with("lockdown-mode set").is_empty());
    }

    #[test]
    fn test_accepting_turns_settings_on() {
        let client = FakeClient::new()
            .ok("auto-connect get", "Autoconnect: off")
            .ok("lockdown-mode get", "Block traffic when the VPN is disconnected: off");

        let outcomes = enforce_toggles(&client, &FixedAnswer(true));

        assert_eq!(outcomes, vec![ToggleOutcome::Enabled, ToggleOutcome::Enabled]);
        assert_eq!(
            client.calls(),
            vec![
                "auto-connect get",
                "auto-connect set on",
                "lockdown-mode get",
                "lockdown-mode set on",
            ]
        );
    }

    #[test]
    fn test_declining_changes_nothing() {
        let client = FakeClient::new()
            .ok("auto-connect get", "Autoconnect: off")
            .ok("lockdown-mode get", "Block traffic when the VPN is disconnected: off");

        let outcomes = enforce_toggles(&client, &FixedAnswer(false));

        assert_eq!(outcomes, vec![ToggleOutcome::Declined, ToggleOutcome::Declined]);
        assert_eq!(client.calls(), vec!["auto-connect get", "lockdown-mode get"]);
    }

    #[test]
    fn test_unreadable_setting_is_skipped() {
        // Failed query for one, empty output for the other
        let client = FakeClient::new()
            .fail("auto-connect get")
            .ok("lockdown-mode get", "");

        let outcomes = enforce_toggles(&client, &FixedAnswer(true));

        assert_eq!(
            outcomes,
            vec![ToggleOutcome::Undetermined, ToggleOutcome::Undetermined]
        );
        assert_eq!(client.calls(), vec!["auto-connect get", "lockdown-mode get"]);
    }

    #[test]
    fn test_failed_write_is_not_fatal() {
        let client = FakeClient::new()
            .ok("auto-connect get", "Autoconnect: off")
            .fail("auto-connect set on")
            .ok("lockdown-mode get", "Block traffic when the VPN is disconnected: off");

        let outcomes = enforce_toggles(&client, &FixedAnswer(true));

        assert_eq!(
            outcomes,
            vec![ToggleOutcome::EnableFailed, ToggleOutcome::Enabled]
        );
    }
}
