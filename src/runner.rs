//! Benchmark process execution.
//!
//! [`BenchmarkRunner`] is the seam between the suite and the external
//! benchmark tool. The production implementation, [`PgbenchRunner`],
//! spawns one `pgbench` process per scenario against the pooler and
//! reduces its exit status to a single [`ExecutionOutcome`]. The child
//! runs in its own process group so a cancelled run can be torn down
//! whole, without leaking client connections into the pooler.

use std::io::Write;
use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};
use tracing::{debug, warn};

use crate::config::RunnerConfig;
use crate::error::{Error, Result};
use crate::scenario::Scenario;

/// Outcome of one benchmark execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionOutcome {
    /// Whether the benchmark tool reported success via its exit status.
    pub succeeded: bool,
}

/// Executes one benchmark run for a scenario.
///
/// A benchmark-level failure is a valid `Ok` outcome with
/// `succeeded == false`; `Err` is reserved for runs that never started.
/// Implementations make exactly one attempt per call. Cancelling the
/// returned future must terminate any process it spawned.
#[async_trait]
pub trait BenchmarkRunner: Send + Sync {
    async fn execute(&self, scenario: &Scenario) -> Result<ExecutionOutcome>;
}

/// Transaction used when a scenario carries think time: the stock
/// account-update transaction with a client-side sleep appended. pgbench
/// has no think-time flag, so the sleep goes into a custom script.
const THINK_TIME_SCRIPT: &str = "\
\\set aid random(1, 100000 * :scale)
\\set bid random(1, 1 * :scale)
\\set tid random(1, 10 * :scale)
\\set delta random(-5000, 5000)
BEGIN;
UPDATE pgbench_accounts SET abalance = abalance + :delta WHERE aid = :aid;
SELECT abalance FROM pgbench_accounts WHERE aid = :aid;
UPDATE pgbench_tellers SET tbalance = tbalance + :delta WHERE tid = :tid;
UPDATE pgbench_branches SET bbalance = bbalance + :delta WHERE bid = :bid;
INSERT INTO pgbench_history (tid, bid, aid, delta, mtime) VALUES (:tid, :bid, :aid, :delta, CURRENT_TIMESTAMP);
END;
";

/// Drives `pgbench` against the pooler under test.
#[derive(Debug, Clone)]
pub struct PgbenchRunner {
    config: RunnerConfig,
}

impl PgbenchRunner {
    /// Create a runner for the given pooler coordinates.
    #[must_use]
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    /// Stage the think-time script for `scenario`, if it needs one.
    ///
    /// The returned handle owns the file; it must outlive the child.
    fn stage_think_script(&self, scenario: &Scenario) -> Result<Option<tempfile::NamedTempFile>> {
        if scenario.think_time_ms() == 0 {
            return Ok(None);
        }

        let mut file = tempfile::Builder::new()
            .prefix("poolbench-")
            .suffix(".sql")
            .tempfile()
            .map_err(|e| Error::io("staging think-time script", e))?;
        file.write_all(THINK_TIME_SCRIPT.as_bytes())
            .and_then(|()| writeln!(file, "\\sleep {} ms", scenario.think_time_ms()))
            .map_err(|e| Error::io("writing think-time script", e))?;

        Ok(Some(file))
    }

    /// Build the pgbench invocation for `scenario`.
    fn command(&self, scenario: &Scenario, script: Option<&Path>) -> Command {
        let mut cmd = Command::new(&self.config.pgbench);
        cmd.arg("--host")
            .arg(&self.config.host)
            .arg("--port")
            .arg(self.config.port.to_string())
            .arg("--username")
            .arg(&self.config.user)
            .arg("--client")
            .arg(scenario.clients().to_string())
            .arg("--transactions")
            .arg(scenario.transactions().to_string());

        if let Some(path) = script {
            // Custom scripts skip the builtin tables' vacuum, which would
            // otherwise run outside the measured transaction stream.
            cmd.arg("--no-vacuum").arg("--file").arg(path);
        }

        cmd.arg(scenario.database());
        cmd.env(
            "PGSSLMODE",
            if scenario.secure() { "require" } else { "disable" },
        );
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        #[cfg(unix)]
        cmd.process_group(0);

        cmd
    }
}

#[async_trait]
impl BenchmarkRunner for PgbenchRunner {
    async fn execute(&self, scenario: &Scenario) -> Result<ExecutionOutcome> {
        let script = self.stage_think_script(scenario)?;
        let mut cmd = self.command(scenario, script.as_ref().map(|f| f.path()));

        debug!(
            scenario = scenario.name(),
            program = %self.config.pgbench.display(),
            clients = scenario.clients(),
            transactions = scenario.transactions(),
            "spawning benchmark"
        );

        let mut child = cmd
            .spawn()
            .map_err(|e| Error::launch(self.config.pgbench.display().to_string(), e))?;
        let guard = GroupKillGuard::new(&child);

        // Drain stderr concurrently with the wait so a chatty child cannot
        // fill the pipe and stall.
        let mut stderr = child.stderr.take();
        let drain = async {
            let mut buf = String::new();
            if let Some(pipe) = stderr.as_mut() {
                let _ = pipe.read_to_string(&mut buf).await;
            }
            buf
        };
        let (status, stderr_out) = tokio::join!(child.wait(), drain);
        let status = status.map_err(|e| Error::io("waiting for benchmark tool", e))?;
        guard.disarm();

        let succeeded = status.success();
        if !succeeded {
            warn!(
                scenario = scenario.name(),
                %status,
                stderr = %stderr_out.trim(),
                "benchmark reported failure"
            );
        }

        Ok(ExecutionOutcome { succeeded })
    }
}

/// Kills the child's process group on drop unless disarmed.
///
/// Cancelling [`BenchmarkRunner::execute`] (a suite timeout) drops the
/// guard before the child has been waited on; the SIGKILL tears down
/// pgbench together with every connection it holds against the pooler.
struct GroupKillGuard {
    pgid: Option<i32>,
}

impl GroupKillGuard {
    fn new(child: &Child) -> Self {
        Self {
            pgid: child.id().map(|id| id as i32),
        }
    }

    /// The child exited on its own; nothing left to kill.
    fn disarm(mut self) {
        self.pgid = None;
    }
}

impl Drop for GroupKillGuard {
    fn drop(&mut self) {
        #[cfg(unix)]
        {
            use nix::sys::signal::{Signal, killpg};
            use nix::unistd::Pid;

            if let Some(pgid) = self.pgid.take() {
                // ESRCH just means the group is already gone.
                let _ = killpg(Pid::from_raw(pgid), Signal::SIGKILL);
            }
        }

        #[cfg(not(unix))]
        {
            // kill_on_drop covers the child itself on other platforms.
            self.pgid.take();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario;

    fn collect_args(cmd: &Command) -> Vec<String> {
        cmd.as_std()
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    fn env_value(cmd: &Command, key: &str) -> Option<String> {
        cmd.as_std()
            .get_envs()
            .find(|(k, _)| k.to_str() == Some(key))
            .and_then(|(_, v)| v.map(|v| v.to_string_lossy().into_owned()))
    }

    #[test]
    fn command_maps_scenario_parameters() {
        let runner = PgbenchRunner::new(RunnerConfig::default().with_port(6432));
        let cmd = runner.command(&scenario::baseline(), None);
        let args = collect_args(&cmd);

        assert_eq!(cmd.as_std().get_program().to_string_lossy(), "pgbench");
        assert!(args.windows(2).any(|w| w == ["--client", "10"]));
        assert!(args.windows(2).any(|w| w == ["--transactions", "1000"]));
        assert!(args.windows(2).any(|w| w == ["--port", "6432"]));
        assert_eq!(args.last().map(String::as_str), Some("postgres"));
    }

    #[test]
    fn secure_scenarios_require_tls() {
        let runner = PgbenchRunner::new(RunnerConfig::default());
        let cmd = runner.command(&scenario::baseline(), None);
        assert_eq!(env_value(&cmd, "PGSSLMODE").as_deref(), Some("require"));

        let plain = Scenario::new("plain", "postgres", false, 1, 0, 1).unwrap();
        let cmd = runner.command(&plain, None);
        assert_eq!(env_value(&cmd, "PGSSLMODE").as_deref(), Some("disable"));
    }

    #[test]
    fn think_time_stages_a_script() {
        let runner = PgbenchRunner::new(RunnerConfig::default());

        assert!(
            runner
                .stage_think_script(&scenario::baseline())
                .unwrap()
                .is_none()
        );

        let thinking = Scenario::new("thinking", "postgres", true, 2, 25, 10).unwrap();
        let file = runner.stage_think_script(&thinking).unwrap().unwrap();
        let contents = std::fs::read_to_string(file.path()).unwrap();
        assert!(contents.contains("pgbench_accounts"));
        assert!(contents.ends_with("\\sleep 25 ms\n"));

        let cmd = runner.command(&thinking, Some(file.path()));
        let args = collect_args(&cmd);
        assert!(args.iter().any(|a| a == "--no-vacuum"));
        assert!(args.iter().any(|a| a == "--file"));
    }
}
