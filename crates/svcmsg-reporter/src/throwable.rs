use serde::{Deserialize, Serialize};

pub const PLAIN_ASSERTION_CLASS: &str = "java.lang.AssertionError";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThrowableKind {
    /// Exactly the plain assertion-failure class. Subclasses are `Error`.
    AssertionFailure,
    Error,
}

/// Error value attached to failure and abort events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Throwable {
    pub class_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ThrowableKind>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub frames: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<Box<Throwable>>,
}

impl Throwable {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            message: None,
            kind: None,
            frames: Vec::new(),
            cause: None,
        }
    }

    pub fn assertion(message: impl Into<String>) -> Self {
        Self::new(PLAIN_ASSERTION_CLASS).with_message(message)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_kind(mut self, kind: ThrowableKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.frames.push(frame.into());
        self
    }

    pub fn with_cause(mut self, cause: Throwable) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Explicit `kind` wins; otherwise the class name decides.
    pub fn kind(&self) -> ThrowableKind {
        match self.kind {
            Some(kind) => kind,
            None if self.class_name == PLAIN_ASSERTION_CLASS => ThrowableKind::AssertionFailure,
            None => ThrowableKind::Error,
        }
    }

    pub fn is_plain_assertion_failure(&self) -> bool {
        self.kind() == ThrowableKind::AssertionFailure
    }

    /// `printStackTrace` layout with surrounding whitespace trimmed.
    pub fn render_stack_trace(&self) -> String {
        let mut out = String::new();
        let mut current = Some(self);
        let mut first = true;
        while let Some(throwable) = current {
            if !first {
                out.push_str("Caused by: ");
            }
            out.push_str(throwable.header().as_str());
            out.push('\n');
            for frame in &throwable.frames {
                out.push_str("\tat ");
                out.push_str(frame);
                out.push('\n');
            }
            first = false;
            current = throwable.cause.as_deref();
        }
        out.trim().to_string()
    }

    fn header(&self) -> String {
        match &self.message {
            Some(message) => format!("{}: {}", self.class_name, message),
            None => self.class_name.clone(),
        }
    }
}

#[cfg(test)]
#[path = "throwable_test.rs"]
mod tests;
