use log::LevelFilter;

/// Initialize env_logger for binaries and demos. `COPSE_LOG` overrides the
/// default filter; library code only ever calls the `log` macros.
pub fn init() {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("COPSE_LOG", "error,copse=info"))
        .init();
}

/// Like [`init`] but tolerant of repeated calls, for tests.
pub fn try_init() {
    let _ = env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("COPSE_LOG", "error,copse=info"))
        .try_init();
}
