//! Command orchestration
//!
//! Every command runs the same stages in order:
//!
//! 1. Argument validation (no external calls yet)
//! 2. Auto-connect / lockdown checks
//! 3. One-time privacy hardening
//! 4. The command itself, followed by verification after any connect

use crate::client::{ClientError, CommandClient, VpnClient};
use crate::config::Config;
use crate::countries::{self, CountryError};
use crate::prompt::Prompter;
use crate::settings::{enforce_toggles, run_hardening};
use crate::store::{FlagStore, MarkerFile};
use crate::verify::{self, Probe, ProbeError};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Preflight(ClientError),
    #[error(transparent)]
    Probe(#[from] ProbeError),
    #[error(transparent)]
    Country(#[from] CountryError),
    #[error("Failed to set relay location: {0}")]
    SetLocation(#[source] ClientError),
    #[error("Failed to connect: {0}")]
    Connect(#[source] ClientError),
    #[error("Failed to disconnect: {0}")]
    Disconnect(#[source] ClientError),
}

/// Commands that talk to the VPN
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Status,
    Connect,
    Disconnect,
    SetLocation {
        country: String,
        city: Option<String>,
    },
    EuList,
    EuConnect {
        country: Option<String>,
    },
}

/// Locate the Mullvad CLI, then run `command` against it
///
/// A missing executable stops everything: no prompt, no marker, no calls.
pub async fn run_cli(
    config: &Config,
    config_dir: &Path,
    prompter: &dyn Prompter,
    command: Command,
) -> Result<(), AppError> {
    let client = CommandClient::locate(&config.binary).map_err(AppError::Preflight)?;
    let store = MarkerFile::in_dir(config_dir);
    let probe = Probe::new(config)?;
    let delay = Duration::from_secs(config.connect_delay_secs);

    App::new(&client, prompter, &store, probe, delay)
        .run(command)
        .await
}

pub struct App<'a> {
    client: &'a dyn VpnClient,
    prompter: &'a dyn Prompter,
    store: &'a dyn FlagStore,
    probe: Probe,
    connect_delay: Duration,
}

impl<'a> App<'a> {
    pub fn new(
        client: &'a dyn VpnClient,
        prompter: &'a dyn Prompter,
        store: &'a dyn FlagStore,
        probe: Probe,
        connect_delay: Duration,
    ) -> Self {
        Self {
            client,
            prompter,
            store,
            probe,
            connect_delay,
        }
    }

    pub async fn run(&self, command: Command) -> Result<(), AppError> {
        // Reject a bad country before anything touches the VPN
        if let Command::EuConnect {
            country: Some(code),
        } = &command
        {
            countries::validate(code)?;
        }

        enforce_toggles(self.client, self.prompter);
        run_hardening(self.client, self.prompter, self.store);

        self.dispatch(command).await
    }

    async fn dispatch(&self, command: Command) -> Result<(), AppError> {
        match command {
            Command::Status => {
                verify::show_status(self.client);
                verify::confirm_tunnel(&self.probe).await;
                Ok(())
            }
            Command::Connect => self.connect().await,
            Command::Disconnect => {
                info!("Disconnecting...");
                self.client.disconnect().map_err(AppError::Disconnect)?;
                verify::show_status(self.client);
                Ok(())
            }
            Command::SetLocation { country, city } => {
                self.client
                    .set_location(&country, city.as_deref())
                    .map_err(AppError::SetLocation)?;
                match self.client.relay_get() {
                    Ok(relay) => print!("{}", relay),
                    Err(e) => warn!("Could not read back relay settings: {}", e),
                }
                Ok(())
            }
            Command::EuList => {
                print!("{}", countries::render_table());
                Ok(())
            }
            Command::EuConnect { country } => {
                let code = match country {
                    Some(code) => countries::validate(&code)?,
                    None => countries::pick_random(&mut rand::thread_rng()),
                };
                println!(
                    "Selected {} ({})",
                    code,
                    countries::name_of(code).unwrap_or("unknown")
                );
                self.client
                    .set_location(code, None)
                    .map_err(AppError::SetLocation)?;
                self.connect().await
            }
        }
    }

    async fn connect(&self) -> Result<(), AppError> {
        info!("Connecting...");
        self.client.connect().map_err(AppError::Connect)?;
        tokio::time::sleep(self.connect_delay).await;
        verify::post_connect(self.client, &self.probe).await;
        Ok(())
    }
}
