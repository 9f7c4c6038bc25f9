//! pgbench-driven load regression harness for PostgreSQL connection
//! poolers.
//!
//! The harness expresses load shapes as [`Scenario`] values (client
//! concurrency, think time, transaction volume), groups them into a
//! [`Suite`] with per-case timeouts, and drives each one through a
//! [`BenchmarkRunner`] against the pooler under test. One benchmark
//! process is the unit of observable work per scenario; the suite reports
//! one [`Verdict`] per executed case plus an aggregate result.
//!
//! Scenario parameters are compiled in: every run exercises the same,
//! reproducible load shapes. What is configurable — via the environment —
//! is only how to reach the pooler and where `pgbench` lives
//! ([`RunnerConfig`]).

pub mod config;
pub mod error;
pub mod report;
pub mod runner;
pub mod scenario;
pub mod suite;

pub use config::RunnerConfig;
pub use error::{Error, Result};
pub use runner::{BenchmarkRunner, ExecutionOutcome, PgbenchRunner};
pub use scenario::Scenario;
pub use suite::{
    CaseResult, DEFAULT_CASE_TIMEOUT, FailurePolicy, Suite, SuiteResult, Verdict,
    load_regression_suite,
};
