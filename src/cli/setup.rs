//! Runtime setup for the command-line binary.

use log::LevelFilter;

/// Log level for a `-v` count: info, then debug, then trace.
pub fn level_for_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Initialize `env_logger`; `RUST_LOG` overrides the verbosity flags.
pub fn init_logging(verbosity: u8) {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level_for_verbosity(verbosity))
        .format_timestamp(None)
        .format_target(verbosity > 1)
        .parse_default_env();
    // A second initialization (tests, embedding) keeps the first logger
    let _ = builder.try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(level_for_verbosity(0), LevelFilter::Info);
        assert_eq!(level_for_verbosity(1), LevelFilter::Debug);
        assert_eq!(level_for_verbosity(2), LevelFilter::Trace);
        assert_eq!(level_for_verbosity(9), LevelFilter::Trace);
    }

    #[test]
    fn test_init_logging_twice_is_harmless() {
        init_logging(0);
        init_logging(2);
    }
}
