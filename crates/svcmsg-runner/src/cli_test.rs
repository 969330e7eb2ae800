use super::{Cli, Commands, OutputFormat};
use clap::{CommandFactory, Parser};
use svcmsg_core::TimestampZone;

#[test]
fn cli_help_includes_subcommands() {
    let mut command = Cli::command();
    let help = command.render_long_help().to_string();
    assert!(help.contains("encode"));
    assert!(help.contains("decode"));
}

#[test]
fn cli_parses_encode_with_overrides() {
    let cli = Cli::try_parse_from([
        "svcmsg-runner",
        "encode",
        "--events",
        "events.jsonl",
        "--config",
        "runner.yaml",
        "--time-zone",
        "utc",
        "--verbose",
    ])
    .expect("encode must parse");
    assert!(cli.verbose);
    match cli.command {
        Commands::Encode(command) => {
            assert_eq!(command.events, "events.jsonl");
            assert_eq!(
                command.config.as_deref(),
                Some(std::path::Path::new("runner.yaml"))
            );
            assert_eq!(command.time_zone, Some(TimestampZone::Utc));
        }
        _ => panic!("expected encode"),
    }
}

#[test]
fn cli_encode_defaults_to_stdin() {
    let cli = Cli::try_parse_from(["svcmsg-runner", "encode"]).expect("encode must parse");
    match cli.command {
        Commands::Encode(command) => {
            assert_eq!(command.events, "-");
            assert!(command.config.is_none());
            assert!(command.time_zone.is_none());
        }
        _ => panic!("expected encode"),
    }
}

#[test]
fn cli_parses_decode_json() {
    let cli = Cli::try_parse_from(["svcmsg-runner", "decode", "--input", "out.log", "--format", "json"])
        .expect("decode must parse");
    match cli.command {
        Commands::Decode(command) => {
            assert_eq!(command.input, "out.log");
            assert_eq!(command.format, OutputFormat::Json);
        }
        _ => panic!("expected decode"),
    }
}

#[test]
fn cli_rejects_unknown_time_zone() {
    assert!(Cli::try_parse_from(["svcmsg-runner", "encode", "--time-zone", "mars"]).is_err());
}

#[test]
fn cli_time_zone_parses_case_insensitively() {
    let cli = Cli::try_parse_from(["svcmsg-runner", "encode", "--time-zone", "LOCAL"])
        .expect("encode must parse");
    match cli.command {
        Commands::Encode(command) => assert_eq!(command.time_zone, Some(TimestampZone::Local)),
        _ => panic!("expected encode"),
    }
}
