mod jsonl;
mod types;

pub use jsonl::{encode_event_jsonl_line, parse_event_jsonl_line};
pub use types::{Formatter, TestEvent, TestEventKind};
