//! Logger setup for the headless runner and tests.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Installs `env_logger` as the global logger.
///
/// `RUST_LOG` takes precedence. Without it, `verbose` selects `debug`
/// output (timer firings, stale handles, arming) over the default `info`
/// lifecycle messages.
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let env = Env::default().default_filter_or(level.to_string());
    let mut builder = Builder::from_env(env);
    builder.format_timestamp(None);

    // A second call finds a logger already installed; keep the first.
    if let Err(e) = builder.try_init() {
        log::debug!("logger already initialised: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_is_harmless() {
        init(false);
        init(true);
        log::info!("logger still usable");
    }
}
