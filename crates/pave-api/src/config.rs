// SPDX-License-Identifier: Apache-2.0
//! Environment-driven server configuration.
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `PAVE_LISTEN_ADDR` | `0.0.0.0:8080` | HTTP listen address |
//! | `PAVE_DB_PATH` | `./pave.sqlite` | Account-ledger database file |
//! | `PAVE_PROCESSOR_URL` | — (required) | Processor API base URL |
//! | `PAVE_PROCESSOR_SECRET_KEY` | — (required) | Platform secret key |
//! | `PAVE_PROCESSOR_TIMEOUT_SECS` | `30` | Per-request timeout |

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

use pave_processor::ProcessorConfig;

/// Configuration errors found at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),

    #[error("environment variable {name} is invalid: {detail}")]
    Invalid { name: &'static str, detail: String },
}

/// Full server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub listen_addr: SocketAddr,
    pub db_path: PathBuf,
    pub processor: ProcessorConfig,
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::Missing(name))
}

impl ApiConfig {
    /// Load configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let listen_addr = match std::env::var("PAVE_LISTEN_ADDR") {
            Ok(raw) => raw.parse().map_err(|e| ConfigError::Invalid {
                name: "PAVE_LISTEN_ADDR",
                detail: format!("{e}"),
            })?,
            Err(_) => SocketAddr::from(([0, 0, 0, 0], 8080)),
        };

        let db_path = std::env::var("PAVE_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./pave.sqlite"));

        let base_url = required("PAVE_PROCESSOR_URL")?;
        let secret_key = required("PAVE_PROCESSOR_SECRET_KEY")?;
        let mut processor = ProcessorConfig::new(base_url, secret_key);

        if let Ok(raw) = std::env::var("PAVE_PROCESSOR_TIMEOUT_SECS") {
            let timeout = raw.parse().map_err(|e| ConfigError::Invalid {
                name: "PAVE_PROCESSOR_TIMEOUT_SECS",
                detail: format!("{e}"),
            })?;
            processor = processor.with_timeout_secs(timeout);
        }

        Ok(Self {
            listen_addr,
            db_path,
            processor,
        })
    }
}
