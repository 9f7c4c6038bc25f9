//! Runner configuration.
//!
//! Connection coordinates for the pooler under test and the location of
//! the `pgbench` executable. Scenario parameters are deliberately not part
//! of the configuration: load shapes are compiled in so every run
//! exercises the same, reproducible shapes.

use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Environment variable naming the pgbench executable.
pub const PGBENCH_ENV: &str = "POOLBENCH_PGBENCH";

/// How to reach the pooler under test and the benchmark tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// pgbench executable; resolved through `PATH` when relative.
    pub pgbench: PathBuf,
    /// Host the pooler listens on.
    pub host: String,
    /// Port the pooler listens on.
    pub port: u16,
    /// Role to connect as.
    pub user: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            pgbench: PathBuf::from("pgbench"),
            host: "localhost".to_string(),
            port: 2345,
            user: "postgres".to_string(),
        }
    }
}

impl RunnerConfig {
    /// Build a config from the environment, falling back to defaults.
    ///
    /// Honors `POOLBENCH_PGBENCH` for the executable and the standard
    /// `PGHOST`, `PGPORT` and `PGUSER` variables for the pooler
    /// coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when `PGPORT` is not a valid port number.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(path) = env::var(PGBENCH_ENV) {
            config.pgbench = PathBuf::from(path);
        }
        if let Ok(host) = env::var("PGHOST") {
            config.host = host;
        }
        if let Ok(port) = env::var("PGPORT") {
            config.port = port
                .parse()
                .map_err(|_| Error::Config(format!("invalid PGPORT value '{port}'")))?;
        }
        if let Ok(user) = env::var("PGUSER") {
            config.user = user;
        }

        Ok(config)
    }

    /// Set the pgbench executable.
    #[must_use]
    pub fn with_pgbench(mut self, pgbench: impl AsRef<Path>) -> Self {
        self.pgbench = pgbench.as_ref().to_path_buf();
        self
    }

    /// Set the pooler host.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the pooler port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the connection role.
    #[must_use]
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }
}
