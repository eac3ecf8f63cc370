use beacon_config::Config;

/// Logs the effective configuration before anything else runs.
pub fn dump_spawn_infos(config: &Config) {
    if config.path().as_os_str().is_empty() {
        beacon_log::info!("launching beacon without config file");
    } else {
        beacon_log::info!(
            "launching beacon from config {}",
            config.path().display()
        );
    }

    beacon_log::info!("  log level: {}", config.logging().level);

    if config.deduplication_enabled() {
        let deduplication = config.deduplication();
        beacon_log::info!(
            "  deduplication: {} fingerprints within {}ms",
            deduplication.max_cache_size,
            deduplication.time_window
        );
    } else {
        beacon_log::info!("  deduplication: disabled");
    }

    match config.sampling() {
        Some(sampling) => beacon_log::info!(
            "  sampling: errors {}, other events {}",
            sampling.error_sample_rate,
            sampling.performance_sample_rate
        ),
        None => beacon_log::info!("  sampling: disabled"),
    }
}
