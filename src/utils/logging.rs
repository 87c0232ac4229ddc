use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer};

/// Installs the global subscriber for the command line tools.
///
/// `verbosity` is the number of `-d` flags: none shows warnings only, three
/// shows everything.
pub fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        3 => LevelFilter::TRACE,
        _ => {
            eprintln!("Max verbosity is -ddd");
            LevelFilter::TRACE
        }
    };

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .with_filter(filter);

    if let Err(e) = tracing_subscriber::registry().with(fmt_layer).try_init() {
        eprintln!("Failed to set up logging: {}", e);
    }

    tracing::debug!("Log level: {}", filter);
}
