//! Runs `rspec` suites serially with console output.

use rspec::report::Report;
use rspec::{block::Suite, ConfigurationBuilder, Logger, Runner};
use std::sync::Arc;

/// Runs an rspec suite on one thread so shared fixtures see examples in
/// declaration order.
///
/// # Panics
/// Panics when the runner cannot be configured or when any example fails.
pub fn run_serial<T>(suite: &Suite<T>)
where
    T: Clone + Send + Sync + std::fmt::Debug,
{
    let logger = Arc::new(Logger::new(std::io::stdout()));
    let config = ConfigurationBuilder::default()
        .parallel(false)
        .exit_on_failure(false)
        .build()
        .unwrap_or_else(|e| panic!("rspec configuration failed: {e}"));
    let report = Runner::new(config, vec![logger]).run(suite);
    assert!(
        report.is_success(),
        "rspec suite failed: {} passed, {} failed",
        report.get_passed(),
        report.get_failed()
    );
}
