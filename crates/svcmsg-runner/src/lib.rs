mod cli;
mod config;
mod run;

pub use cli::{Cli, Commands, DecodeCommand, EncodeCommand, OutputFormat};
pub use config::{
    load_runner_config, validate_runner_config, ConfigIssue, OutputConfig, RunnerConfig,
    RunnerConfigError, TimestampConfig,
};
pub use run::{
    encode_event_stream, execute_decode, execute_encode, EncodeSettings, EncodeSummary, RunnerError,
};
