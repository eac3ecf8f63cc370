//! This module implements the definition of the command line app.

use clap::builder::ValueParser;
use clap::{Arg, Command, value_parser};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const ABOUT: &str = "Beacon replays monitoring events through deduplication and sampling.";

pub fn make_app() -> Command {
    Command::new("beacon")
        .disable_help_subcommand(true)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .max_term_width(79)
        .version(VERSION)
        .about(ABOUT)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .value_name("CONFIG")
                .value_parser(ValueParser::path_buf())
                .env("BEACON_CONFIG")
                .help("The path to the config file or folder."),
        )
        .arg(
            Arg::new("log_level")
                .long("log-level")
                .global(true)
                .value_name("LEVEL")
                .value_parser(["off", "error", "warn", "info", "debug", "trace"])
                .env("BEACON_LOG_LEVEL")
                .help("The log level for Beacon."),
        )
        .arg(
            Arg::new("log_format")
                .long("log-format")
                .global(true)
                .value_name("FORMAT")
                .value_parser(["auto", "pretty", "simplified", "json"])
                .env("BEACON_LOG_FORMAT")
                .help("The format of log output."),
        )
        .subcommand(
            Command::new("replay")
                .about("Replay events from a file of JSON lines")
                .after_help(
                    "Every line of the input is parsed as an event and captured by a client \
                     configured from the config. Events that survive deduplication and sampling \
                     are written to stdout as JSON lines. Lines that are not valid events are \
                     skipped with a warning.",
                )
                .arg(
                    Arg::new("input")
                        .value_name("INPUT")
                        .value_parser(value_parser!(std::path::PathBuf))
                        .help("The file to read events from. Reads stdin if omitted or `-`."),
                )
                .arg(
                    Arg::new("error_sample_rate")
                        .long("error-sample-rate")
                        .value_name("RATE")
                        .help("Overrides the sample rate of error events."),
                )
                .arg(
                    Arg::new("performance_sample_rate")
                        .long("performance-sample-rate")
                        .value_name("RATE")
                        .help("Overrides the sample rate of all other events."),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Manage the beacon config")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .after_help(
                    "This command provides basic config management. The effective config is the \
                     config file merged with the command line overrides.",
                )
                .subcommand(Command::new("show").about("Show the effective config as YAML")),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_definition() {
        make_app().debug_assert();
    }

    #[test]
    fn test_parse_replay() {
        let matches = make_app()
            .try_get_matches_from([
                "beacon",
                "--log-level",
                "debug",
                "replay",
                "events.jsonl",
                "--error-sample-rate",
                "0.5",
            ])
            .unwrap();

        assert_eq!(
            matches.get_one::<String>("log_level").map(String::as_str),
            Some("debug")
        );

        let (name, replay) = matches.subcommand().unwrap();
        assert_eq!(name, "replay");
        assert_eq!(
            replay
                .get_one::<std::path::PathBuf>("input")
                .and_then(|p| p.to_str()),
            Some("events.jsonl")
        );
        assert_eq!(
            replay
                .get_one::<String>("error_sample_rate")
                .map(String::as_str),
            Some("0.5")
        );
    }

    #[test]
    fn test_config_requires_subcommand() {
        assert!(make_app().try_get_matches_from(["beacon", "config"]).is_err());
    }
}
