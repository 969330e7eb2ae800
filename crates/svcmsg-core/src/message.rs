use crate::escape::{escape_value, unescape_value, UnescapeError};
use std::fmt::{Display, Formatter};

pub const SERVICE_MESSAGE_PREFIX: &str = "##teamcity[";

/// One `##teamcity[...]` message. Attribute values are kept in escaped form so
/// rendering never escapes twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceMessage {
    name: String,
    attributes: Vec<(String, String)>,
}

impl ServiceMessage {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    pub fn attr(self, key: impl Into<String>, raw_value: &str) -> Self {
        self.attr_escaped(key, escape_value(raw_value))
    }

    pub fn attr_escaped(mut self, key: impl Into<String>, escaped_value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), escaped_value.into()));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    pub fn escaped_attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(candidate, _)| candidate == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn attribute(&self, key: &str) -> Option<String> {
        self.escaped_attribute(key)
            .map(|value| unescape_value(value).unwrap_or_else(|_| value.to_string()))
    }

    pub fn has_attribute(&self, key: &str) -> bool {
        self.escaped_attribute(key).is_some()
    }
}

impl Display for ServiceMessage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{SERVICE_MESSAGE_PREFIX}{}", self.name)?;
        for (key, value) in &self.attributes {
            write!(f, " {key}='{value}'")?;
        }
        write!(f, "]")
    }
}

/// A single emission. Every message except the run-level test count is
/// preceded by a blank line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedLine {
    pub leading_blank_line: bool,
    pub message: ServiceMessage,
}

impl EncodedLine {
    pub fn new(message: ServiceMessage) -> Self {
        Self {
            leading_blank_line: true,
            message,
        }
    }

    pub fn without_leading_blank_line(message: ServiceMessage) -> Self {
        Self {
            leading_blank_line: false,
            message,
        }
    }

    pub fn render(&self) -> String {
        if self.leading_blank_line {
            format!("\n{}", self.message)
        } else {
            self.message.to_string()
        }
    }
}

impl Display for EncodedLine {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.render().as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MessageParseError {
    #[error("line does not start with `##teamcity[`")]
    MissingPrefix,
    #[error("line is missing the closing `]`")]
    MissingClosingBracket,
    #[error("message name is empty")]
    EmptyName,
    #[error("malformed attribute at offset {offset}")]
    MalformedAttribute { offset: usize },
    #[error("attribute `{key}` has an unterminated value")]
    UnterminatedValue { key: String },
    #[error("attribute `{key}` has an invalid escape: {source}")]
    InvalidEscape {
        key: String,
        #[source]
        source: UnescapeError,
    },
}

/// Parses one service-message line, unescaping attribute values on the way.
/// The returned message stores the re-escaped values, so it renders back to
/// an equivalent line.
pub fn parse_service_message_line(line: &str) -> Result<ServiceMessage, MessageParseError> {
    let trimmed = line.trim();
    let body = trimmed
        .strip_prefix(SERVICE_MESSAGE_PREFIX)
        .ok_or(MessageParseError::MissingPrefix)?;
    let body = body
        .strip_suffix(']')
        .ok_or(MessageParseError::MissingClosingBracket)?;

    let name_end = body.find(char::is_whitespace).unwrap_or(body.len());
    let name = &body[..name_end];
    if name.is_empty() {
        return Err(MessageParseError::EmptyName);
    }

    let mut message = ServiceMessage::new(name);
    let bytes = body.as_bytes();
    let mut position = name_end;
    loop {
        while position < bytes.len() && bytes[position].is_ascii_whitespace() {
            position += 1;
        }
        if position == bytes.len() {
            break;
        }

        let Some(eq_offset) = body[position..].find('=') else {
            return Err(MessageParseError::MalformedAttribute { offset: position });
        };
        let key = body[position..position + eq_offset].trim();
        if key.is_empty() || key.contains(char::is_whitespace) {
            return Err(MessageParseError::MalformedAttribute { offset: position });
        }
        let mut cursor = position + eq_offset + 1;
        while cursor < bytes.len() && bytes[cursor].is_ascii_whitespace() {
            cursor += 1;
        }
        if cursor >= bytes.len() || bytes[cursor] != b'\'' {
            return Err(MessageParseError::MalformedAttribute { offset: cursor });
        }
        let value_start = cursor + 1;
        let value_end = find_value_end(bytes, value_start).ok_or_else(|| {
            MessageParseError::UnterminatedValue {
                key: key.to_string(),
            }
        })?;
        let escaped = &body[value_start..value_end];
        let raw = unescape_value(escaped).map_err(|source| MessageParseError::InvalidEscape {
            key: key.to_string(),
            source,
        })?;
        message = message.attr(key, raw.as_str());
        position = value_end + 1;
    }
    Ok(message)
}

// `|` escapes the following character, so an escaped quote never terminates
// the value. Both delimiters are ASCII, which keeps byte scanning UTF-8 safe.
fn find_value_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut index = start;
    while index < bytes.len() {
        match bytes[index] {
            b'|' => index += 2,
            b'\'' => return Some(index),
            _ => index += 1,
        }
    }
    None
}

#[cfg(test)]
#[path = "message_test.rs"]
mod tests;
