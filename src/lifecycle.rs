//! Process-level setup for the `seo-pulse` binary.

/// Initialize logging with tracing_subscriber.
///
/// `RUST_LOG` overrides the defaults; logs go to stderr so stdout stays
/// reserved for the JSON report.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "seo_pulse=debug" } else { "seo_pulse=info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level))
        .add_directive("html5ever=warn".parse().expect("static directive"))
        .add_directive("selectors=warn".parse().expect("static directive"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .with_target(false)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .try_init();
}
