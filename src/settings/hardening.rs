//! One-time privacy hardening
//!
//! On the first run (no marker in the config directory) we look at LAN
//! sharing and tunnel IPv6. If either looks wrong the user is offered a fixed
//! batch of settings. The marker is written whatever the answer, so the offer
//! is made once per config directory.

use crate::client::state::{LAN_SHARING, TUNNEL_IPV6};
use crate::client::{SettingState, VpnClient};
use crate::prompt::Prompter;
use crate::store::FlagStore;
use tracing::{debug, info, warn};

/// Applied in order; individual failures are ignored
pub const HARDENING_STEPS: &[(&str, &[&str])] = &[
    ("Block local network sharing", &["lan", "set", "block"]),
    (
        "Use WireGuard only",
        &["relay", "set", "tunnel-protocol", "wireguard"],
    ),
    ("Enable IPv6 in tunnel", &["tunnel", "set", "ipv6", "on"]),
    (
        "DNS content blocking: ads, trackers, malware, gambling, adult content",
        &[
            "dns",
            "set",
            "default",
            "--block-ads",
            "--block-trackers",
            "--block-malware",
            "--block-gambling",
            "--block-adult-content",
        ],
    ),
    (
        "Quantum-resistant tunnel",
        &["tunnel", "set", "wireguard", "--quantum-resistant", "on"],
    ),
    (
        "DAITA (defence against AI-guided traffic analysis)",
        &["tunnel", "set", "wireguard", "--daita", "on"],
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HardeningOutcome {
    /// Marker already present, nothing checked
    AlreadyOffered,
    /// No issues found
    AlreadyHardened,
    Applied,
    Declined,
}

/// Human-readable problems with the current settings
pub fn find_issues(client: &dyn VpnClient) -> Vec<String> {
    let mut issues = Vec::new();

    if LAN_SHARING.query(client) == SettingState::Enabled {
        issues.push("Local network sharing is allowed".to_string());
    }

    // An unreadable tunnel state counts as an issue too
    match TUNNEL_IPV6.query(client) {
        SettingState::Disabled | SettingState::Unknown => {
            issues.push("IPv6 in tunnel is disabled (IPv6 may leak outside the VPN)".to_string());
        }
        SettingState::Enabled => {}
    }

    issues
}

pub fn run_hardening(
    client: &dyn VpnClient,
    prompter: &dyn Prompter,
    store: &dyn FlagStore,
) -> HardeningOutcome {
    if store.is_set() {
        debug!("Hardening already offered, skipping");
        return HardeningOutcome::AlreadyOffered;
    }

    let issues = find_issues(client);
    let outcome = if issues.is_empty() {
        debug!("No hardening issues found");
        HardeningOutcome::AlreadyHardened
    } else {
        println!("Privacy check found:");
        for issue in &issues {
            println!("  - {}", issue);
        }
        println!();
        println!("Recommended settings:");
        for (description, _) in HARDENING_STEPS {
            println!("  - {}", description);
        }

        if prompter.confirm("Apply recommended settings?") {
            apply(client);
            HardeningOutcome::Applied
        } else {
            info!("Hardening declined; it will not be offered again");
            HardeningOutcome::Declined
        }
    };

    if let Err(e) = store.set() {
        warn!("{}", e);
    }
    outcome
}

fn apply(client: &dyn VpnClient) {
    for (description, args) in HARDENING_STEPS {
        match client.run(args) {
            Ok(_) => info!("{}: done", description),
            Err(e) => debug!("{} failed (ignored): {}", description, e),
        }
    }
    println!("Recommended settings applied");
}
