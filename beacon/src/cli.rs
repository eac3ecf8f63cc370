use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use beacon::transport::JsonLinesTransport;
use beacon::{Config, Hub, OverridableConfig};
use beacon_event_schema::protocol::Event;
use beacon_log::LogError;
use clap::ArgMatches;

use crate::cliapp::make_app;
use crate::setup;

/// Runs the command line application.
pub fn execute() -> Result<()> {
    let app = make_app();
    let matches = app.get_matches();

    let mut config = load_config(matches.get_one::<PathBuf>("config"))?;
    config.apply_override(extract_config_args(&matches))?;

    beacon_log::init(config.logging());

    match matches.subcommand() {
        Some(("replay", replay_matches)) => replay(config, replay_matches),
        Some(("config", config_matches)) => match config_matches.subcommand() {
            Some(("show", _)) => show_config(&config),
            _ => unreachable!(),
        },
        _ => unreachable!(),
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    Ok(match path {
        Some(path) => Config::from_path(path)
            .with_context(|| format!("could not load config from {}", path.display()))?,
        None => Config::default(),
    })
}

/// Collects overrides from the top-level arguments and the subcommand's arguments.
fn extract_config_args(matches: &ArgMatches) -> OverridableConfig {
    let mut overrides = OverridableConfig {
        log_level: matches.get_one::<String>("log_level").cloned(),
        log_format: matches.get_one::<String>("log_format").cloned(),
        ..Default::default()
    };

    if let Some(("replay", replay_matches)) = matches.subcommand() {
        overrides.error_sample_rate = replay_matches
            .get_one::<String>("error_sample_rate")
            .cloned();
        overrides.performance_sample_rate = replay_matches
            .get_one::<String>("performance_sample_rate")
            .cloned();
    }

    overrides
}

fn open_input(path: Option<&Path>) -> Result<Box<dyn BufRead>> {
    Ok(match path {
        Some(path) if path != Path::new("-") => {
            let file = File::open(path)
                .with_context(|| format!("could not open {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        _ => Box::new(io::stdin().lock()),
    })
}

fn replay(config: Config, matches: &ArgMatches) -> Result<()> {
    setup::dump_spawn_infos(&config);

    let input = open_input(matches.get_one::<PathBuf>("input").map(PathBuf::as_path))?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .context("could not create runtime")?;

    let hub = Arc::new(Hub::new());
    runtime.block_on(Hub::run(hub, async move {
        let transport = Arc::new(JsonLinesTransport::stdout());
        let client = beacon::init(&config, transport)?;

        let mut read = 0usize;
        let mut skipped = 0usize;

        for (index, line) in input.lines().enumerate() {
            let line = line.context("could not read input")?;
            if line.trim().is_empty() {
                continue;
            }

            read += 1;
            match Event::from_json(&line) {
                Ok(event) => beacon::capture_event(event).await?,
                Err(error) => {
                    skipped += 1;
                    beacon_log::warn!(
                        line = index + 1,
                        "skipping invalid event: {}",
                        LogError(&error)
                    );
                }
            }
        }

        client.close().await?;
        beacon_log::info!(read, skipped, "replay finished");

        Ok::<_, anyhow::Error>(())
    }))
}

fn show_config(config: &Config) -> Result<()> {
    let yaml = config.to_yaml_string()?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(yaml.as_bytes())?;
    stdout.flush()?;

    Ok(())
}
