//! Configuration loading and validation for the `strcrypt` front end.
//!
//! All values are read from `STRCRYPT_*` environment variables at startup.

use anyhow::{Context, Result};
use serde::Deserialize;

/// Validated front-end configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// PBKDF2 iterations used for `encrypt` requests that do not name a count.
    #[serde(default = "default_iterations")]
    pub default_iterations: u32,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_iterations() -> u32 {
    strcrypt::DEFAULT_ITERATIONS
}
fn default_log_level() -> String {
    "info".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_iterations: default_iterations(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or fails validation.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::with_prefix("STRCRYPT"))
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        if self.default_iterations == 0 {
            anyhow::bail!("STRCRYPT_DEFAULT_ITERATIONS must be > 0");
        }
        if self.log_level.trim().is_empty() {
            anyhow::bail!("STRCRYPT_LOG_LEVEL must not be empty");
        }
        Ok(())
    }
}
