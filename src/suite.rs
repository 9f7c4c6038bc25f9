//! Scenario suites and verdicts.
//!
//! A [`Suite`] is an ordered set of scenarios with per-case timeouts.
//! Scenarios run sequentially, in registration order: the pooler under
//! test carries state between runs (open connections, pool slots), so
//! ordering is part of the load being exercised. Each executed case ends
//! in exactly one [`Verdict`], and the three failure kinds stay
//! distinguishable: a benchmark-reported failure, a timeout, and a tool
//! that never started.

use std::fmt;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::runner::{BenchmarkRunner, ExecutionOutcome};
use crate::scenario::{self, Scenario};

/// Per-case timeout applied when registration does not override it.
pub const DEFAULT_CASE_TIMEOUT: Duration = Duration::from_secs(60);

/// Diagnostic carried by a benchmark-reported failure. External tooling
/// matches on this exact text.
pub const FAILURE_DIAGNOSTIC: &str = "success status not found";

/// Outcome classification for one executed case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The benchmark completed and reported success.
    Pass,
    /// The benchmark completed but did not report success.
    Fail { reason: String },
    /// The benchmark did not complete within the case timeout; the
    /// spawned process group was terminated.
    Timeout { limit: Duration },
    /// The benchmark tool never ran (missing binary, unreachable target).
    Setup { detail: String },
}

impl Verdict {
    /// Map a runner outcome to its verdict.
    #[must_use]
    pub fn from_outcome(outcome: ExecutionOutcome) -> Self {
        if outcome.succeeded {
            Self::Pass
        } else {
            Self::Fail {
                reason: FAILURE_DIAGNOSTIC.to_string(),
            }
        }
    }

    /// True only for [`Verdict::Pass`].
    #[must_use]
    pub fn passed(&self) -> bool {
        matches!(self, Self::Pass)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => f.write_str("pass"),
            Self::Fail { reason } => write!(f, "fail: {reason}"),
            Self::Timeout { limit } => write!(f, "timeout after {limit:?}"),
            Self::Setup { detail } => write!(f, "setup error: {detail}"),
        }
    }
}

/// What the suite does after a case fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Run every registered case and report all verdicts.
    #[default]
    RunToCompletion,
    /// Stop after the first case that does not pass.
    FailFast,
}

#[derive(Debug, Clone)]
struct Case {
    scenario: Scenario,
    timeout: Duration,
}

/// Ordered collection of scenarios to run against one pooler.
#[derive(Debug, Clone)]
pub struct Suite {
    name: String,
    policy: FailurePolicy,
    cases: Vec<Case>,
}

impl Suite {
    /// Create an empty suite.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            policy: FailurePolicy::default(),
            cases: Vec::new(),
        }
    }

    /// Set the failure policy.
    #[must_use]
    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Suite name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of registered cases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// True when no case has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Registered scenario names, in run order.
    pub fn scenario_names(&self) -> impl Iterator<Item = &str> {
        self.cases.iter().map(|c| c.scenario.name())
    }

    /// Register a scenario with an explicit timeout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateScenario`] when the suite already holds a
    /// scenario with the same name. Nothing is executed on this path.
    pub fn register(&mut self, scenario: Scenario, timeout: Duration) -> Result<()> {
        if self.cases.iter().any(|c| c.scenario.name() == scenario.name()) {
            return Err(Error::duplicate_scenario(scenario.name(), self.name.as_str()));
        }
        self.cases.push(Case { scenario, timeout });
        Ok(())
    }

    /// Register a scenario with [`DEFAULT_CASE_TIMEOUT`].
    ///
    /// # Errors
    ///
    /// Same as [`Suite::register`].
    pub fn register_default(&mut self, scenario: Scenario) -> Result<()> {
        self.register(scenario, DEFAULT_CASE_TIMEOUT)
    }

    /// Run every case sequentially, in registration order.
    ///
    /// Each adapter call is bounded by its case timeout; a timeout cancels
    /// the execution future, which terminates the spawned process group
    /// before the next case starts.
    pub async fn run(&self, runner: &dyn BenchmarkRunner) -> SuiteResult {
        let mut cases = Vec::with_capacity(self.cases.len());

        for (index, case) in self.cases.iter().enumerate() {
            let name = case.scenario.name();
            info!(
                suite = %self.name,
                scenario = name,
                clients = case.scenario.clients(),
                transactions = case.scenario.transactions(),
                "running scenario"
            );

            let started = Instant::now();
            let verdict =
                match tokio::time::timeout(case.timeout, runner.execute(&case.scenario)).await {
                    Ok(Ok(outcome)) => Verdict::from_outcome(outcome),
                    Ok(Err(err)) => Verdict::Setup {
                        detail: err.to_string(),
                    },
                    Err(_) => Verdict::Timeout {
                        limit: case.timeout,
                    },
                };
            let elapsed = started.elapsed();

            if verdict.passed() {
                info!(
                    scenario = name,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "scenario passed"
                );
            } else {
                warn!(
                    scenario = name,
                    elapsed_ms = elapsed.as_millis() as u64,
                    verdict = %verdict,
                    "scenario failed"
                );
            }

            let failed = !verdict.passed();
            cases.push(CaseResult {
                name: name.to_string(),
                verdict,
                elapsed,
            });

            if failed && self.policy == FailurePolicy::FailFast {
                let skipped = self.cases.len() - index - 1;
                if skipped > 0 {
                    warn!(suite = %self.name, skipped, "stopping after first failure");
                }
                break;
            }
        }

        SuiteResult {
            suite: self.name.clone(),
            cases,
        }
    }
}

/// One executed case with its verdict.
#[derive(Debug, Clone)]
pub struct CaseResult {
    /// Scenario name.
    pub name: String,
    /// How the case ended.
    pub verdict: Verdict,
    /// Wall-clock time the case took.
    pub elapsed: Duration,
}

/// Aggregate result of a suite run.
#[derive(Debug, Clone)]
pub struct SuiteResult {
    suite: String,
    cases: Vec<CaseResult>,
}

impl SuiteResult {
    /// Assemble a result from executed cases.
    #[must_use]
    pub fn new(suite: impl Into<String>, cases: Vec<CaseResult>) -> Self {
        Self {
            suite: suite.into(),
            cases,
        }
    }

    /// Suite name.
    #[must_use]
    pub fn suite(&self) -> &str {
        &self.suite
    }

    /// Executed cases, in run order.
    #[must_use]
    pub fn cases(&self) -> &[CaseResult] {
        &self.cases
    }

    /// True when every executed case passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.cases.iter().all(|c| c.verdict.passed())
    }

    /// Cases that did not pass, in run order.
    pub fn failures(&self) -> impl Iterator<Item = &CaseResult> {
        self.cases.iter().filter(|c| !c.verdict.passed())
    }
}

/// The standard pooler load suite: every standard scenario, 60 s each.
///
/// # Errors
///
/// Propagates registration errors; the standard scenario names are unique,
/// so this only fails if the standard set itself is broken.
pub fn load_regression_suite() -> Result<Suite> {
    let mut suite = Suite::new("pooler-load");
    for scenario in scenario::standard_scenarios() {
        suite.register(scenario, DEFAULT_CASE_TIMEOUT)?;
    }
    Ok(suite)
}
