//! Mullvad helper - privacy-first wrapper around the Mullvad VPN CLI
//!
//! This crate drives the existing `mullvad` command-line client. It checks a
//! few privacy settings before every command, offers a one-time hardening
//! batch, connects (optionally to a random EU country) and then confirms the
//! tunnel with two HTTP lookups.
//!
//! # Architecture
//!
//! - `config`: Defaults, `config.toml` and environment overrides
//! - `client`: Mullvad CLI subprocess wrapper and setting-state matching
//! - `prompt`: Yes/no confirmations
//! - `store`: One-time "hardening offered" marker
//! - `settings`: Per-run toggle checks and one-time hardening
//! - `countries`: Preset EU relay countries
//! - `verify`: Status display and HTTP lookups after connecting
//! - `app`: Stage sequencing and command dispatch
//!
//! # Usage
//!
//! ```bash
//! mullvad-helper eu-connect      # random EU country
//! mullvad-helper eu-connect se   # Sweden
//! MULLVAD_CONNECT_DELAY=3 mullvad-helper connect
//! ```

pub mod app;
pub mod client;
pub mod config;
pub mod countries;
pub mod prompt;
pub mod settings;
pub mod store;
pub mod verify;

pub use app::{App, AppError, Command};
pub use client::{CommandClient, VpnClient};
pub use config::Config;
