//! Process lifecycle helpers.

use tracing_subscriber::EnvFilter;

/// Initialize logging with tracing_subscriber.
///
/// `log` records from the library are bridged in through `tracing-log`.
/// Output goes to stderr so reports printed on stdout stay machine readable;
/// `RUST_LOG` takes precedence over `level`.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(level)
            .add_directive("hyper=warn".parse().unwrap())
            .add_directive("reqwest=warn".parse().unwrap())
            .add_directive("html5ever=warn".parse().unwrap())
    });

    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .with_target(false)
        .with_ansi(true)
        .try_init();

    if let Err(e) = result {
        eprintln!("logging already initialized: {}", e);
    }
}
