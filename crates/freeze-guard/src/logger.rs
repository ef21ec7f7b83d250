use env_logger::Env;

/// Initialize logging to stderr, filtered by `RUST_LOG` (default `info`)
pub fn init() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}
