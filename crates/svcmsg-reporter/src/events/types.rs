use crate::throwable::Throwable;
use serde::{Deserialize, Serialize};

/// A lifecycle notification from the test framework. `time_stamp` is the
/// common base every event carries; `kind` holds the variant-specific fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestEvent {
    #[serde(rename = "timeStamp")]
    pub time_stamp: i64,
    #[serde(flatten)]
    pub kind: TestEventKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum TestEventKind {
    RunStarting {
        test_count: u32,
    },
    TestStarting {
        test_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        suite_name: Option<String>,
    },
    TestSucceeded {
        test_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        suite_name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration: Option<u64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        formatter: Option<Formatter>,
    },
    TestFailed {
        test_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        suite_name: Option<String>,
        #[serde(default)]
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration: Option<u64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        throwable: Option<Throwable>,
    },
    TestIgnored {
        test_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        suite_name: Option<String>,
    },
    TestPending {
        test_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        suite_name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration: Option<u64>,
    },
    SuiteStarting {
        suite_name: String,
    },
    SuiteCompleted {
        suite_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration: Option<u64>,
    },
    SuiteAborted {
        #[serde(default)]
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        suite_name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        throwable: Option<Throwable>,
    },
    InfoProvided {
        #[serde(default)]
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        formatter: Option<Formatter>,
    },
    RunStopped,
    RunAborted {
        #[serde(default)]
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        throwable: Option<Throwable>,
    },
    RunCompleted,
}

/// Rendering hint attached to some events. Only `IndentedText` changes what
/// gets reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum Formatter {
    IndentedText {
        formatted_text: String,
        #[serde(default)]
        raw_text: String,
        #[serde(default)]
        indentation_level: u32,
    },
    MotionToSuppress,
}

impl Formatter {
    pub fn indented_text(formatted_text: impl Into<String>) -> Self {
        let formatted_text = formatted_text.into();
        Self::IndentedText {
            raw_text: formatted_text.trim_start().to_string(),
            formatted_text,
            indentation_level: 0,
        }
    }

    pub fn formatted_text(&self) -> Option<&str> {
        match self {
            Self::IndentedText { formatted_text, .. } => Some(formatted_text.as_str()),
            Self::MotionToSuppress => None,
        }
    }
}

impl TestEvent {
    pub fn new(time_stamp: i64, kind: TestEventKind) -> Self {
        Self { time_stamp, kind }
    }

    pub fn timestamp(&self) -> i64 {
        self.time_stamp
    }

    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            TestEventKind::RunStarting { .. } => "RunStarting",
            TestEventKind::TestStarting { .. } => "TestStarting",
            TestEventKind::TestSucceeded { .. } => "TestSucceeded",
            TestEventKind::TestFailed { .. } => "TestFailed",
            TestEventKind::TestIgnored { .. } => "TestIgnored",
            TestEventKind::TestPending { .. } => "TestPending",
            TestEventKind::SuiteStarting { .. } => "SuiteStarting",
            TestEventKind::SuiteCompleted { .. } => "SuiteCompleted",
            TestEventKind::SuiteAborted { .. } => "SuiteAborted",
            TestEventKind::InfoProvided { .. } => "InfoProvided",
            TestEventKind::RunStopped => "RunStopped",
            TestEventKind::RunAborted { .. } => "RunAborted",
            TestEventKind::RunCompleted => "RunCompleted",
        }
    }

    /// The test or suite this event is about, when it names one.
    pub fn subject(&self) -> Option<&str> {
        match &self.kind {
            TestEventKind::TestStarting { test_name, .. }
            | TestEventKind::TestSucceeded { test_name, .. }
            | TestEventKind::TestFailed { test_name, .. }
            | TestEventKind::TestIgnored { test_name, .. }
            | TestEventKind::TestPending { test_name, .. } => Some(test_name.as_str()),
            TestEventKind::SuiteStarting { suite_name }
            | TestEventKind::SuiteCompleted { suite_name, .. } => Some(suite_name.as_str()),
            TestEventKind::SuiteAborted { suite_name, .. } => suite_name.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
