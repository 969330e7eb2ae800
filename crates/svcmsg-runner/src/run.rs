use crate::cli::{DecodeCommand, EncodeCommand, OutputFormat};
use crate::config::{load_runner_config, RunnerConfig};
use serde_json::{json, Value};
use std::fs;
use std::io::{self, BufRead, BufReader};
use svcmsg_core::{
    parse_service_message_line, unescape_value, ServiceMessage, TimestampZone, SERVICE_MESSAGE_PREFIX,
};
use svcmsg_reporter::{parse_event_jsonl_line, LineSink, ServiceMessageEncoder, SinkError};

#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("read input failed `{path}`: {source}")]
    ReadInput {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("runner config load failed: {0}")]
    ConfigLoad(String),
    #[error("event decode failed at line {line}: {reason}")]
    EventDecode { line: usize, reason: String },
    #[error("service message decode failed at line {line}: {reason}")]
    MessageDecode { line: usize, reason: String },
    #[error(transparent)]
    Sink(#[from] SinkError),
    #[error("json encode failed: {0}")]
    JsonEncode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeSettings {
    pub timestamp_zone: TimestampZone,
    pub flush_each_event: bool,
}

impl EncodeSettings {
    pub fn from_config(config: &RunnerConfig) -> Self {
        Self {
            timestamp_zone: config.timestamp.zone,
            flush_each_event: config.output.flush_each_event,
        }
    }
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self::from_config(&RunnerConfig::default())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeSummary {
    pub events: usize,
    pub lines: usize,
}

pub fn execute_encode(command: &EncodeCommand, sink: &mut dyn LineSink) -> Result<EncodeSummary, RunnerError> {
    let settings = resolve_encode_settings(command)?;
    let reader = open_input(command.events.as_str())?;
    let summary = encode_event_stream(reader, settings, sink)?;
    log::info!(
        "encoded {} event(s) into {} service message(s)",
        summary.events,
        summary.lines
    );
    Ok(summary)
}

/// Encodes JSONL events one at a time, in input order. Blank lines are skipped.
pub fn encode_event_stream<R: BufRead>(
    reader: R,
    settings: EncodeSettings,
    sink: &mut dyn LineSink,
) -> Result<EncodeSummary, RunnerError> {
    let encoder = ServiceMessageEncoder::new(settings.timestamp_zone);
    let mut summary = EncodeSummary::default();
    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line.map_err(|error| RunnerError::EventDecode {
            line: line_number,
            reason: error.to_string(),
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let event = parse_event_jsonl_line(line.as_str()).map_err(|error| RunnerError::EventDecode {
            line: line_number,
            reason: error.to_string(),
        })?;
        summary.lines += encoder.report(&event, sink)?;
        summary.events += 1;
        if settings.flush_each_event {
            sink.flush()?;
        }
    }
    sink.flush()?;
    Ok(summary)
}

pub fn execute_decode(command: &DecodeCommand) -> Result<String, RunnerError> {
    let reader = open_input(command.input.as_str())?;
    let messages = decode_message_stream(reader)?;
    let output = match command.format {
        OutputFormat::Text => messages
            .iter()
            .map(render_message_text)
            .collect::<Vec<_>>()
            .join("\n"),
        OutputFormat::Json => serde_json::to_string_pretty(&Value::Array(
            messages.iter().map(render_message_json).collect(),
        ))?,
    };
    Ok(output)
}

fn decode_message_stream<R: BufRead>(reader: R) -> Result<Vec<ServiceMessage>, RunnerError> {
    let mut messages = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line.map_err(|error| RunnerError::MessageDecode {
            line: line_number,
            reason: error.to_string(),
        })?;
        if !line.trim_start().starts_with(SERVICE_MESSAGE_PREFIX) {
            continue;
        }
        let message = parse_service_message_line(line.as_str()).map_err(|error| {
            RunnerError::MessageDecode {
                line: line_number,
                reason: error.to_string(),
            }
        })?;
        messages.push(message);
    }
    Ok(messages)
}

fn render_message_text(message: &ServiceMessage) -> String {
    let mut out = message.name().to_string();
    for (key, escaped) in message.attributes() {
        let value = display_value(escaped);
        out.push_str(format!(" {key}={value:?}").as_str());
    }
    out
}

fn render_message_json(message: &ServiceMessage) -> Value {
    let attributes = message
        .attributes()
        .iter()
        .map(|(key, escaped)| json!({"key": key, "value": display_value(escaped)}))
        .collect::<Vec<_>>();
    json!({"name": message.name(), "attributes": attributes})
}

// Values come from a parsed line, so they always unescape.
fn display_value(escaped: &str) -> String {
    unescape_value(escaped).unwrap_or_else(|_| escaped.to_string())
}

fn resolve_encode_settings(command: &EncodeCommand) -> Result<EncodeSettings, RunnerError> {
    let mut settings = match &command.config {
        Some(path) => {
            let config =
                load_runner_config(path).map_err(|error| RunnerError::ConfigLoad(error.to_string()))?;
            EncodeSettings::from_config(&config)
        }
        None => EncodeSettings::default(),
    };
    if let Some(zone) = command.time_zone {
        settings.timestamp_zone = zone;
    }
    Ok(settings)
}

fn open_input(path: &str) -> Result<Box<dyn BufRead>, RunnerError> {
    if path == "-" {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }
    let file = fs::File::open(path).map_err(|source| RunnerError::ReadInput {
        path: path.to_string(),
        source,
    })?;
    Ok(Box::new(BufReader::new(file)))
}

#[cfg(test)]
#[path = "run_test.rs"]
mod tests;
