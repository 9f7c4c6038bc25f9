//! Terminal reporting for suite results.
//!
//! One aligned line per case, then a `Summary:` line kept stable for easy
//! parsing from shell scripts.

use std::fmt::Write as _;

use crate::suite::{SuiteResult, Verdict};

/// Render a human-readable report for a finished run.
#[must_use]
pub fn render(result: &SuiteResult) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "suite {}: {} case(s)",
        result.suite(),
        result.cases().len()
    );

    let width = result
        .cases()
        .iter()
        .map(|c| c.name.len())
        .max()
        .unwrap_or(0);

    let mut passed = 0usize;
    let mut failed = 0usize;
    let mut timed_out = 0usize;
    let mut setup_errors = 0usize;

    for case in result.cases() {
        match &case.verdict {
            Verdict::Pass => passed += 1,
            Verdict::Fail { .. } => failed += 1,
            Verdict::Timeout { .. } => timed_out += 1,
            Verdict::Setup { .. } => setup_errors += 1,
        }
        let _ = writeln!(
            out,
            "  {:<width$}  {:<44}  {:>8.2}s",
            case.name,
            case.verdict.to_string(),
            case.elapsed.as_secs_f64(),
        );
    }

    let _ = writeln!(
        out,
        "Summary: {passed} passed, {failed} failed, {timed_out} timed out, {setup_errors} setup errors"
    );
    out
}

/// Print the rendered report to stdout.
pub fn print(result: &SuiteResult) {
    print!("{}", render(result));
}
