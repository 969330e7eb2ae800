use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::str::FromStr;
use svcmsg_core::TimestampZone;

#[derive(Debug, Clone, Parser)]
#[command(name = "svcmsg-runner")]
#[command(about = "Translate test events into TeamCity service messages")]
pub struct Cli {
    /// Log each event at debug level on stderr.
    #[arg(long, global = true, default_value_t = false)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Read JSONL test events and print service messages.
    Encode(EncodeCommand),
    /// Parse a service-message stream back into messages.
    Decode(DecodeCommand),
}

#[derive(Debug, Clone, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, clap::Args)]
pub struct EncodeCommand {
    /// JSONL event file, or `-` for stdin.
    #[arg(long, default_value = "-")]
    pub events: String,
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// `local` or `utc`; overrides `timestamp.zone` from the config.
    #[arg(long, value_parser = TimestampZone::from_str)]
    pub time_zone: Option<TimestampZone>,
}

#[derive(Debug, Clone, clap::Args)]
pub struct DecodeCommand {
    /// Service-message stream, or `-` for stdin.
    #[arg(long, default_value = "-")]
    pub input: String,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
