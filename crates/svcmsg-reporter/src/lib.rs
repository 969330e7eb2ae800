pub mod encoder;
pub mod events;
pub mod sink;
pub mod throwable;

pub use encoder::ServiceMessageEncoder;
pub use events::{
    encode_event_jsonl_line, parse_event_jsonl_line, Formatter, TestEvent, TestEventKind,
};
pub use sink::{LineSink, MemorySink, SinkError, WriterSink};
pub use throwable::{Throwable, ThrowableKind, PLAIN_ASSERTION_CLASS};
