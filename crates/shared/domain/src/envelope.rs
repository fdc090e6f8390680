//! Uniform result envelope threaded through the handler chain.
//!
//! Wire shape:
//! `{ "status": "success" | "fail" | "error", "data"?: .., "message"?: "..", "source"?: "..", "payload"?: .. }`

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome reported by a handler.
///
/// Any status string outside the known set deserializes as [`Status::Unknown`],
/// which the chain treats as a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Fail,
    Error,
    #[serde(other)]
    Unknown,
}

impl Status {
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Fail => "fail",
            Self::Error => "error",
            Self::Unknown => "unknown",
        }
    }
}

/// Result record produced by handlers and consumed by the chain.
///
/// `status` is optional on the wire: an envelope without one is passed through
/// the chain unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl Envelope {
    #[must_use]
    pub fn success(data: impl Into<Value>) -> Self {
        Self { status: Some(Status::Success), data: Some(data.into()), ..Self::default() }
    }

    #[must_use]
    pub fn fail(message: impl Into<String>) -> Self {
        Self { status: Some(Status::Fail), message: Some(message.into()), ..Self::default() }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self { status: Some(Status::Error), message: Some(message.into()), ..Self::default() }
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    #[must_use]
    pub fn with_payload(mut self, payload: impl Into<Value>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_some_and(Status::is_success)
    }

    /// True for any present status other than `success`, including unknown ones.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.status.is_some_and(|status| !status.is_success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_envelope_serializes_compactly() {
        let envelope = Envelope::success(json!({ "path": "/x" })).with_source("Router");
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({ "status": "success", "data": { "path": "/x" }, "source": "Router" })
        );
    }

    #[test]
    fn status_less_envelope_is_neither_success_nor_failure() {
        let envelope: Envelope = serde_json::from_value(json!({ "data": { "route": "/x" } })).unwrap();
        assert_eq!(envelope.status, None);
        assert!(!envelope.is_failure());
        assert!(!envelope.is_success());
    }

    #[test]
    fn unknown_status_is_a_failure() {
        let envelope: Envelope = serde_json::from_value(json!({ "status": "teapot" })).unwrap();
        assert_eq!(envelope.status, Some(Status::Unknown));
        assert!(envelope.is_failure());
        assert!(!envelope.is_success());
    }
}
