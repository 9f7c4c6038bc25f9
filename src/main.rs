//! Command-line entry point for the pooler load harness.
//!
//! Runs the standard scenario suite against the pooler described by the
//! environment and exits non-zero when any case fails. The flags select
//! which compiled-in scenarios run; none of them alter a scenario's load
//! shape.

use anyhow::{Context, Result};
use clap::Parser;

use poolbench::{DEFAULT_CASE_TIMEOUT, FailurePolicy, PgbenchRunner, RunnerConfig, Suite};
use poolbench::{report, scenario};

#[derive(Parser, Debug)]
#[command(name = "poolbench")]
#[command(
    about = "pgbench-driven load regression harness for PostgreSQL connection poolers",
    version
)]
struct Args {
    /// Run only the named scenarios (may be given multiple times)
    #[arg(short, long = "scenario", value_name = "NAME")]
    scenarios: Vec<String>,

    /// Stop after the first failing scenario
    #[arg(long)]
    fail_fast: bool,

    /// List the available scenarios and exit
    #[arg(long)]
    list: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging();

    let available = scenario::standard_scenarios();

    if args.list {
        for s in &available {
            println!(
                "{:<20} {:>3} clients  {:>5} transactions  db={}",
                s.name(),
                s.clients(),
                s.transactions(),
                s.database()
            );
        }
        return Ok(());
    }

    for wanted in &args.scenarios {
        if !available.iter().any(|s| s.name() == wanted) {
            anyhow::bail!("unknown scenario '{wanted}'; use --list to see what is available");
        }
    }

    let policy = if args.fail_fast {
        FailurePolicy::FailFast
    } else {
        FailurePolicy::RunToCompletion
    };

    let mut suite = Suite::new("pooler-load").with_policy(policy);
    for s in available {
        if args.scenarios.is_empty() || args.scenarios.iter().any(|w| w == s.name()) {
            let name = s.name().to_string();
            suite
                .register(s, DEFAULT_CASE_TIMEOUT)
                .with_context(|| format!("registering scenario '{name}'"))?;
        }
    }

    let config = RunnerConfig::from_env().context("reading runner configuration")?;
    tracing::info!(
        host = %config.host,
        port = config.port,
        pgbench = %config.pgbench.display(),
        cases = suite.len(),
        "starting suite"
    );

    let runner = PgbenchRunner::new(config);
    let result = suite.run(&runner).await;
    report::print(&result);

    if !result.passed() {
        std::process::exit(1);
    }
    Ok(())
}

/// Initialize stdout logging.
fn init_logging() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();
}
