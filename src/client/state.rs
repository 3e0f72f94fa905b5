//! Reading setting states out of free-text CLI output
//!
//! The CLI prints lines such as `Autoconnect: off` or
//! `Local network sharing setting: allow`. Each setting carries its own
//! [`Marker`] rules; call sites only ever see a [`SettingState`].

use super::{ClientError, VpnClient};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingState {
    Enabled,
    Disabled,
    /// Query failed or printed nothing
    Unknown,
}

/// A single matching rule applied to `get` output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// The value after the last `:` of some line, compared case-insensitively
    Value(&'static str),
    /// A `label: value` line whose label ends with `label`; both sides
    /// trimmed and compared case-insensitively
    Field {
        label: &'static str,
        value: &'static str,
    },
}

impl Marker {
    pub fn matches(&self, output: &str) -> bool {
        match self {
            Marker::Value(value) => output
                .lines()
                .map(|line| line.rsplit(':').next().unwrap_or(line).trim())
                .any(|v| v.eq_ignore_ascii_case(value)),
            Marker::Field { label, value } => output
                .lines()
                .filter_map(|line| line.rsplit_once(':'))
                .any(|(l, v)| {
                    l.trim().to_ascii_lowercase().ends_with(&label.to_ascii_lowercase())
                        && v.trim().eq_ignore_ascii_case(value)
                }),
        }
    }
}

/// How non-empty `get` output maps to a state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Enabled if any marker matches, disabled otherwise
    EnabledIf(&'static [Marker]),
    /// Disabled if any marker matches, enabled otherwise
    DisabledIf(&'static [Marker]),
}

/// A toggle exposed by the CLI: how to read it, how to turn it on
#[derive(Debug, Clone, Copy)]
pub struct Setting {
    pub label: &'static str,
    pub get: &'static [&'static str],
    pub set: &'static [&'static str],
    pub rule: Rule,
}

pub const AUTO_CONNECT: Setting = Setting {
    label: "Auto-connect",
    get: &["auto-connect", "get"],
    set: &["auto-connect", "set", "on"],
    rule: Rule::EnabledIf(&[Marker::Value("on")]),
};

pub const LOCKDOWN: Setting = Setting {
    label: "Lockdown mode",
    get: &["lockdown-mode", "get"],
    set: &["lockdown-mode", "set", "on"],
    rule: Rule::EnabledIf(&[Marker::Value("on"), Marker::Value("block")]),
};

/// Local network sharing; "enabled" here means sharing is allowed
pub const LAN_SHARING: Setting = Setting {
    label: "Local network sharing",
    get: &["lan", "get"],
    set: &["lan", "set", "block"],
    rule: Rule::EnabledIf(&[Marker::Value("allow")]),
};

pub const IPV6_OFF: Marker = Marker::Field {
    label: "IPv6",
    value: "off",
};

/// IPv6 inside the tunnel; only the explicit "off" text counts as disabled
pub const TUNNEL_IPV6: Setting = Setting {
    label: "IPv6 in tunnel",
    get: &["tunnel", "get"],
    set: &["tunnel", "set", "ipv6", "on"],
    rule: Rule::DisabledIf(&[IPV6_OFF]),
};

impl Setting {
    /// Run the `get` subcommand, keeping the raw text for callers that need it
    pub fn read(&self, client: &dyn VpnClient) -> Result<String, ClientError> {
        client.run(self.get)
    }

    /// Run `get` and classify the output
    pub fn query(&self, client: &dyn VpnClient) -> SettingState {
        match self.read(client) {
            Ok(output) => self.classify(&output),
            Err(e) => {
                debug!("{} query failed: {}", self.label, e);
                SettingState::Unknown
            }
        }
    }

    pub fn classify(&self, output: &str) -> SettingState {
        if output.trim().is_empty() {
            return SettingState::Unknown;
        }
        let on = match self.rule {
            Rule::EnabledIf(markers) => markers.iter().any(|m| m.matches(output)),
            Rule::DisabledIf(markers) => !markers.iter().any(|m| m.matches(output)),
        };
        if on {
            SettingState::Enabled
        } else {
            SettingState::Disabled
        }
    }

    pub fn enable(&self, client: &dyn VpnClient) -> Result<String, ClientError> {
        client.run(self.set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::FakeClient;

    #[test]
    fn test_value_marker_ignores_labels() {
        let on = Marker::Value("on");
        assert!(on.matches("Autoconnect: on"));
        assert!(!on.matches("Autoconnect: off"));
        assert!(on.matches("AUTOCONNECT: ON\n"));
        assert!(on.matches("on"));
        assert!(!Marker::Value("block").matches("Block traffic when the VPN is disconnected: off"));
    }

    #[test]
    fn test_ipv6_field_marker() {
        assert!(IPV6_OFF.matches("Generic options\n  IPv6: off\n"));
        assert!(IPV6_OFF.matches("Enable ipv6: OFF"));
        assert!(!IPV6_OFF.matches("IPv6: on"));
    }

    #[test]
    fn test_field_marker_tolerates_column_padding() {
        assert!(IPV6_OFF.matches("Generic options\n    IPv6:                 off\n"));
        assert!(IPV6_OFF.matches("\tIPv6 :\toff"));
        assert!(!IPV6_OFF.matches("    IPv6:                 on\n"));
        // Another field with the value "off" does not count
        assert!(!IPV6_OFF.matches("Quantum resistance: off\nIPv6: on"));
        assert_eq!(
            TUNNEL_IPV6.classify("WireGuard options\n    IPv6:       off\n"),
            SettingState::Disabled
        );
    }

    #[test]
    fn test_auto_connect_classification() {
        assert_eq!(AUTO_CONNECT.classify("Autoconnect: on"), SettingState::Enabled);
        assert_eq!(AUTO_CONNECT.classify("Autoconnect: off"), SettingState::Disabled);
        assert_eq!(AUTO_CONNECT.classify("  \n"), SettingState::Unknown);
    }

    #[test]
    fn test_lockdown_accepts_block() {
        assert_eq!(
            LOCKDOWN.classify("Block traffic when the VPN is disconnected: on"),
            SettingState::Enabled
        );
        assert_eq!(
            LOCKDOWN.classify("Block traffic when the VPN is disconnected: off"),
            SettingState::Disabled
        );
        assert_eq!(LOCKDOWN.classify("Always require VPN: block"), SettingState::Enabled);
        assert_eq!(LOCKDOWN.classify("Lockdown mode: off"), SettingState::Disabled);
    }

    #[test]
    fn test_lan_sharing() {
        assert_eq!(
            LAN_SHARING.classify("Local network sharing setting: allow"),
            SettingState::Enabled
        );
        assert_eq!(
            LAN_SHARING.classify("Local network sharing setting: block"),
            SettingState::Disabled
        );
    }

    #[test]
    fn test_tunnel_ipv6() {
        assert_eq!(
            TUNNEL_IPV6.classify("Generic options\n  IPv6: off\n"),
            SettingState::Disabled
        );
        assert_eq!(
            TUNNEL_IPV6.classify("Generic options\n  IPv6: on\n"),
            SettingState::Enabled
        );
        assert_eq!(TUNNEL_IPV6.classify(""), SettingState::Unknown);
    }

    #[test]
    fn test_query_failure_is_unknown() {
        let client = FakeClient::new().fail("auto-connect get");
        assert_eq!(AUTO_CONNECT.query(&client), SettingState::Unknown);
    }

    #[test]
    fn test_query_and_enable_use_vocabulary() {
        let client = FakeClient::new().ok("lockdown-mode get", "Lockdown mode: off");
        assert_eq!(LOCKDOWN.query(&client), SettingState::Disabled);
        LOCKDOWN.enable(&client).unwrap();
        assert_eq!(
            client.calls(),
            vec!["lockdown-mode get", "lockdown-mode set on"]
        );
    }
}
