use crate::events::{Formatter, TestEvent, TestEventKind};
use crate::sink::{LineSink, SinkError};
use crate::throwable::Throwable;
use svcmsg_core::{escape_value, format_timestamp, EncodedLine, ServiceMessage, TimestampZone};

const STATUS_INFO: &str = "INFO";
const STATUS_ERROR: &str = "ERROR";
// Appended after escaping, so the consumer sees a literal colon and a line break.
const INFO_LINE_BREAK_SUFFIX: &str = ":|n";
// ASCII-only, like a regex `\s`; NBSP and Unicode line separators are kept.
const TRAILING_WHITESPACE: [char; 6] = [' ', '\t', '\n', '\u{0B}', '\u{0C}', '\r'];

/// Translates test events into service-message lines. Holds no per-run state;
/// each call depends only on the event passed in.
#[derive(Debug, Clone, Copy, Default)]
pub struct ServiceMessageEncoder {
    timestamp_zone: TimestampZone,
}

impl ServiceMessageEncoder {
    pub fn new(timestamp_zone: TimestampZone) -> Self {
        Self { timestamp_zone }
    }

    pub fn timestamp_zone(&self) -> TimestampZone {
        self.timestamp_zone
    }

    pub fn encode(&self, event: &TestEvent) -> Vec<EncodedLine> {
        match &event.kind {
            TestEventKind::RunStarting { test_count } => {
                vec![EncodedLine::without_leading_blank_line(
                    ServiceMessage::new("testCount").attr("count", test_count.to_string().as_str()),
                )]
            }
            TestEventKind::TestStarting { test_name, .. } => vec![EncodedLine::new(
                ServiceMessage::new("testStarted")
                    .attr("name", test_name)
                    .attr("captureStandardOutput", "true"),
            )],
            TestEventKind::TestSucceeded {
                test_name,
                duration,
                formatter,
                ..
            } => {
                let mut lines = Vec::with_capacity(2);
                if let Some(text) = indented_text(formatter.as_ref()) {
                    lines.push(EncodedLine::new(
                        ServiceMessage::new("message")
                            .attr("text", format!("{text}\n").as_str())
                            .attr("status", STATUS_INFO),
                    ));
                }
                lines.push(test_finished(test_name, duration.unwrap_or(0)));
                lines
            }
            TestEventKind::TestFailed {
                test_name,
                message,
                duration,
                throwable,
                ..
            } => {
                let hard_error = !throwable
                    .as_ref()
                    .is_some_and(Throwable::is_plain_assertion_failure);
                let details = throwable
                    .as_ref()
                    .map(Throwable::render_stack_trace)
                    .unwrap_or_default();
                let mut failed = ServiceMessage::new("testFailed")
                    .attr("name", test_name)
                    .attr("message", message)
                    .attr("details", details.as_str());
                if hard_error {
                    failed = failed.attr("error", "true");
                }
                let failed = failed.attr(
                    "timestamp",
                    format_timestamp(event.time_stamp, self.timestamp_zone).as_str(),
                );
                vec![
                    EncodedLine::new(failed),
                    test_finished(test_name, duration.unwrap_or(0)),
                ]
            }
            TestEventKind::TestIgnored { test_name, .. } => vec![EncodedLine::new(
                ServiceMessage::new("testIgnored")
                    .attr("name", test_name)
                    .attr("message", ""),
            )],
            // Pending tests never report elapsed time.
            TestEventKind::TestPending { test_name, .. } => vec![test_finished(test_name, 0)],
            TestEventKind::SuiteStarting { suite_name } => vec![EncodedLine::new(
                ServiceMessage::new("testSuiteStarted").attr("name", suite_name),
            )],
            TestEventKind::SuiteCompleted { suite_name, .. } => vec![EncodedLine::new(
                ServiceMessage::new("testSuiteFinished").attr("name", suite_name),
            )],
            TestEventKind::SuiteAborted {
                message, throwable, ..
            }
            | TestEventKind::RunAborted { message, throwable } => {
                abort_message(message, throwable.as_ref()).into_iter().collect()
            }
            TestEventKind::InfoProvided { message, formatter } => {
                let display = indented_text(formatter.as_ref()).unwrap_or(message.as_str());
                let escaped = escape_value(display.trim_end_matches(TRAILING_WHITESPACE));
                if escaped.is_empty() {
                    return Vec::new();
                }
                vec![EncodedLine::new(
                    ServiceMessage::new("message")
                        .attr_escaped("text", format!("{escaped}{INFO_LINE_BREAK_SUFFIX}"))
                        .attr("status", STATUS_INFO),
                )]
            }
            TestEventKind::RunStopped | TestEventKind::RunCompleted => Vec::new(),
        }
    }

    /// Encodes `event` and writes every resulting line to `sink` in order.
    pub fn report(&self, event: &TestEvent, sink: &mut dyn LineSink) -> Result<usize, SinkError> {
        let lines = self.encode(event);
        log::debug!(
            "encoded {} ({}) into {} line(s)",
            event.kind_name(),
            event.subject().unwrap_or("-"),
            lines.len()
        );
        for line in &lines {
            sink.write_line(line.render().as_str())?;
        }
        Ok(lines.len())
    }
}

fn indented_text(formatter: Option<&Formatter>) -> Option<&str> {
    formatter.and_then(Formatter::formatted_text)
}

fn test_finished(test_name: &str, duration: u64) -> EncodedLine {
    EncodedLine::new(
        ServiceMessage::new("testFinished")
            .attr("name", test_name)
            .attr("duration", duration.to_string().as_str()),
    )
}

// An empty message suppresses the line even when a throwable is attached.
fn abort_message(message: &str, throwable: Option<&Throwable>) -> Option<EncodedLine> {
    let escaped = escape_value(message);
    if escaped.is_empty() {
        return None;
    }
    let mut line = ServiceMessage::new("message")
        .attr_escaped("text", escaped)
        .attr("status", STATUS_ERROR);
    if let Some(throwable) = throwable {
        line = line.attr("errorDetails", throwable.render_stack_trace().as_str());
    }
    Some(EncodedLine::new(line))
}

#[cfg(test)]
#[path = "encoder_test.rs"]
mod tests;
