use tracing_subscriber::EnvFilter;

/// Filtering follows `PLACEMENT_LOG`, defaulting to `info`.
pub fn init_tracing(json: bool) {
    let filter =
        EnvFilter::try_from_env("PLACEMENT_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }
}
