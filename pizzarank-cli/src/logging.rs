/// Logging setup: `tracing` events from both crates go to stderr.
///
/// `RUST_LOG` wins when set; otherwise the `-v` count picks the level.
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Map the number of `-v` flags to a level filter.
pub fn level_for_verbosity(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

pub fn init_logging(verbose: u8) {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::default().add_directive(level_for_verbosity(verbose).into()),
    };

    // A second init (e.g. in tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
