//! Mullvad CLI integration
//!
//! Every interaction with the VPN goes through the `mullvad` executable. We
//! only rely on its exit status and standard output text; nothing here
//! assumes a structured output format.
//!
//! # Vocabulary
//!
//! ```text
//! mullvad auto-connect {get | set on}
//! mullvad lockdown-mode {get | set on}
//! mullvad lan {get | set block}
//! mullvad tunnel {get | set ipv6 on | set wireguard --quantum-resistant on | set wireguard --daita on}
//! mullvad relay {get | set tunnel-protocol wireguard | set location <cc> [city]}
//! mullvad dns set default --block-ads ...
//! mullvad {connect | disconnect | status [-v]}
//! ```

pub mod state;

pub use state::{Marker, Rule, Setting, SettingState};

use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("'{0}' was not found on PATH. Install the Mullvad app or set MULLVAD_BIN")]
    NotFound(String),
    #[error("Failed to run mullvad {args}: {source}")]
    Spawn {
        args: String,
        #[source]
        source: std::io::Error,
    },
    #[error("mullvad {args} exited with {code:?}: {stderr}")]
    Failed {
        args: String,
        code: Option<i32>,
        stderr: String,
    },
}

/// Anything able to run Mullvad CLI subcommands
pub trait VpnClient {
    /// Run one subcommand and return its captured standard output
    fn run(&self, args: &[&str]) -> Result<String, ClientError>;

    /// `status -v`, falling back to plain `status` if the verbose form fails
    fn status(&self) -> Result<String, ClientError> {
        self.run(&["status", "-v"]).or_else(|e| {
            debug!("Verbose status failed ({}), retrying without -v", e);
            self.run(&["status"])
        })
    }

    fn connect(&self) -> Result<String, ClientError> {
        self.run(&["connect"])
    }

    fn disconnect(&self) -> Result<String, ClientError> {
        self.run(&["disconnect"])
    }

    fn set_location(&self, country: &str, city: Option<&str>) -> Result<String, ClientError> {
        match city {
            Some(city) => self.run(&["relay", "set", "location", country, city]),
            None => self.run(&["relay", "set", "location", country]),
        }
    }

    fn relay_get(&self) -> Result<String, ClientError> {
        self.run(&["relay", "get"])
    }
}

/// Runs the real Mullvad executable as a subprocess
#[derive(Debug, Clone)]
pub struct CommandClient {
    program: PathBuf,
}

impl CommandClient {
    /// Resolve `name` on PATH (or as a path) and fail fast if it is missing
    pub fn locate(name: &str) -> Result<Self, ClientError> {
        let program = which::which(name).map_err(|_| ClientError::NotFound(name.to_string()))?;
        debug!("Using Mullvad CLI at {}", program.display());
        Ok(Self { program })
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl VpnClient for CommandClient {
    fn run(&self, args: &[&str]) -> Result<String, ClientError> {
        debug!("Running mullvad {}", args.join(" "));
        let output = Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|source| ClientError::Spawn {
                args: args.join(" "),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ClientError::Failed {
                args: args.join(" "),
                code: output.status.code(),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted stand-in for the Mullvad CLI

    use super::{ClientError, VpnClient};
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    pub struct FakeClient {
        responses: HashMap<String, Result<String, String>>,
        pub calls: RefCell<Vec<String>>,
    }

    impl FakeClient {
        pub fn new() -> Self {
            Self::default()
        }

        /// Script a successful response for `args`
        pub fn ok(mut self, args: &str, stdout: &str) -> Self {
            self.responses
                .insert(args.to_string(), Ok(stdout.to_string()));
            self
        }

        /// Script a non-zero exit for `args`
        pub fn fail(mut self, args: &str) -> Self {
            self.responses
                .insert(args.to_string(), Err("scripted failure".to_string()));
            self
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }

        pub fn was_called(&self, args: &str) -> bool {
            self.calls.borrow().iter().any(|c| c == args)
        }

        /// Calls whose first words match `prefix`
        pub fn calls_starting_with(&self, prefix: &str) -> Vec<String> {
            self.calls
                .borrow()
                .iter()
                .filter(|c| c.starts_with(prefix))
                .cloned()
                .collect()
        }
    }

    impl VpnClient for FakeClient {
        fn run(&self, args: &[&str]) -> Result<String, ClientError> {
            let key = args.join(" ");
            self.calls.borrow_mut().push(key.clone());
            // Unscripted commands succeed silently
            match self.responses.get(&key) {
                Some(Ok(stdout)) => Ok(stdout.clone()),
                Some(Err(stderr)) => Err(ClientError::Failed {
                    args: key,
                    code: Some(1),
                    stderr: stderr.clone(),
                }),
                None => Ok(String::new()),
            }
        }
    }
}
