//! Load scenario definitions.
//!
//! A [`Scenario`] is one named load shape to run against the pooler: how
//! many concurrent clients, how much think time each client inserts
//! between transactions, and how many transactions every client executes.
//! Scenarios are plain data, validated once at construction and immutable
//! afterwards.

use crate::error::{Error, Result};

/// Target database shared by the standard scenarios.
const STANDARD_DATABASE: &str = "postgres";

/// One named, parameterized load shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    name: String,
    database: String,
    secure: bool,
    clients: u32,
    think_time_ms: u64,
    transactions: u32,
}

impl Scenario {
    /// Create a scenario, rejecting parameters that cannot describe a load.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidScenario`] when `clients` or `transactions`
    /// is zero. Zero think time is valid.
    pub fn new(
        name: impl Into<String>,
        database: impl Into<String>,
        secure: bool,
        clients: u32,
        think_time_ms: u64,
        transactions: u32,
    ) -> Result<Self> {
        let name = name.into();
        if clients == 0 {
            return Err(Error::invalid_scenario(
                name,
                "client count must be at least 1",
            ));
        }
        if transactions == 0 {
            return Err(Error::invalid_scenario(
                name,
                "transaction count must be at least 1",
            ));
        }

        Ok(Self {
            name,
            database: database.into(),
            secure,
            clients,
            think_time_ms,
            transactions,
        })
    }

    /// Scenario name, unique within a suite.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Target database the benchmark connects to.
    #[must_use]
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Whether the benchmark connects over TLS.
    #[must_use]
    pub fn secure(&self) -> bool {
        self.secure
    }

    /// Number of concurrent benchmark clients.
    #[must_use]
    pub fn clients(&self) -> u32 {
        self.clients
    }

    /// Per-transaction client think time in milliseconds.
    #[must_use]
    pub fn think_time_ms(&self) -> u64 {
        self.think_time_ms
    }

    /// Transactions each client runs.
    #[must_use]
    pub fn transactions(&self) -> u32 {
        self.transactions
    }
}

fn standard(name: &str, clients: u32, transactions: u32) -> Scenario {
    Scenario {
        name: name.to_string(),
        database: STANDARD_DATABASE.to_string(),
        secure: true,
        clients,
        think_time_ms: 0,
        transactions,
    }
}

/// 10 clients, 1000 transactions: the reference load shape.
#[must_use]
pub fn baseline() -> Scenario {
    standard("baseline", 10, 1000)
}

/// 50 clients hammering the pool concurrently.
#[must_use]
pub fn high_clients() -> Scenario {
    standard("high_clients", 50, 1000)
}

/// 10 clients holding their connections across 5000 transactions each.
#[must_use]
pub fn high_transactions() -> Scenario {
    standard("high_transactions", 10, 5000)
}

/// High client count and high transaction volume combined.
#[must_use]
pub fn combined() -> Scenario {
    standard("combined", 50, 5000)
}

/// All standard scenarios, in suite order.
#[must_use]
pub fn standard_scenarios() -> Vec<Scenario> {
    vec![baseline(), high_clients(), high_transactions(), combined()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_clients() {
        let err = Scenario::new("bad", "postgres", true, 0, 0, 1000).unwrap_err();
        assert!(matches!(err, Error::InvalidScenario { .. }));
        assert!(err.to_string().contains("client count"));
    }

    #[test]
    fn rejects_zero_transactions() {
        let err = Scenario::new("bad", "postgres", true, 10, 0, 0).unwrap_err();
        assert!(matches!(err, Error::InvalidScenario { .. }));
        assert!(err.to_string().contains("transaction count"));
    }

    #[test]
    fn zero_think_time_is_valid() {
        let scenario = Scenario::new("ok", "postgres", true, 1, 0, 1).unwrap();
        assert_eq!(scenario.think_time_ms(), 0);
    }

    #[test]
    fn baseline_matches_documented_parameters() {
        let scenario = baseline();
        assert_eq!(scenario.name(), "baseline");
        assert_eq!(scenario.database(), "postgres");
        assert!(scenario.secure());
        assert_eq!(scenario.clients(), 10);
        assert_eq!(scenario.think_time_ms(), 0);
        assert_eq!(scenario.transactions(), 1000);
    }

    #[test]
    fn standard_scenarios_cover_the_load_grid() {
        let scenarios = standard_scenarios();
        let shapes: Vec<(&str, u32, u32)> = scenarios
            .iter()
            .map(|s| (s.name(), s.clients(), s.transactions()))
            .collect();

        assert_eq!(
            shapes,
            vec![
                ("baseline", 10, 1000),
                ("high_clients", 50, 1000),
                ("high_transactions", 10, 5000),
                ("combined", 50, 5000),
            ]
        );
    }
}
