use env_logger::{Env, Target};

use crate::configuration::{LogDestination, LogSettings};

/// Installs the process-wide logger. `RUST_LOG` wins over the configured level.
pub fn init_logger(settings: &LogSettings) {
    let target = match settings.destination {
        LogDestination::Stdout => Target::Stdout,
        LogDestination::Stderr => Target::Stderr,
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(settings.level.as_str()))
        .target(target)
        .init();
}
