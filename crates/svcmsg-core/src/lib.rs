pub mod escape;
pub mod message;
pub mod timestamp;

pub use escape::{escape_value, needs_escape, unescape_value, UnescapeError};
pub use message::{
    parse_service_message_line, EncodedLine, MessageParseError, ServiceMessage,
    SERVICE_MESSAGE_PREFIX,
};
pub use timestamp::{format_timestamp, TimestampZone, TIMESTAMP_PATTERN};
