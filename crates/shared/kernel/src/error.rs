use serde_json::json;
use std::borrow::Cow;
use trellis_domain::Envelope;
use trellis_loader::LoadError;

/// Errors raised while creating and invoking handlers.
#[trellis_derive::trellis_error]
pub enum KernelError {
    /// An external reference could not be resolved.
    #[error("Load failed{}: {source}", format_context(.context))]
    Load { source: LoadError, context: Option<Cow<'static, str>> },

    /// A handler name is not registered.
    #[error("Handler not registered{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A handler answered with a non-success envelope.
    #[error("Handler failed{}: {}", format_context(.context), failure_message(.envelope))]
    HandlerFailure { envelope: Box<Envelope>, context: Option<Cow<'static, str>> },

    /// Data did not have the shape the chain relies on.
    #[error("Protocol violation{}: {message}", format_context(.context))]
    Protocol { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal kernel error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl KernelError {
    pub(crate) fn failure(envelope: Envelope) -> Self {
        Self::HandlerFailure { envelope: Box::new(envelope), context: None }
    }

    pub(crate) fn protocol(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Protocol { message: message.into(), context: None }
    }
}

fn failure_message(envelope: &Envelope) -> String {
    let status = envelope.status.map_or("missing", |s| s.as_str());
    match (&envelope.source, &envelope.message) {
        (Some(source), Some(message)) => format!("[{status}] {source}: {message}"),
        (None, Some(message)) => format!("[{status}] {message}"),
        (Some(source), None) => format!("[{status}] {source}"),
        (None, None) => format!("[{status}]"),
    }
}

/// Converts an error into the envelope the chain threads forward.
///
/// Handler failures keep their original envelope; every other error becomes an
/// `error` envelope whose `source` is the error kind and whose `payload` carries
/// the kind and the attached context.
impl From<KernelError> for Envelope {
    fn from(err: KernelError) -> Self {
        match err {
            KernelError::HandlerFailure { envelope, .. } => *envelope,
            other => {
                let payload = json!({ "kind": other.kind(), "context": other.context_ref() });
                Self::error(other.to_string()).with_source(other.kind()).with_payload(payload)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handler_failure_round_trips_its_envelope() {
        let envelope = Envelope::fail("denied").with_source("Session");
        let err = KernelError::failure(envelope.clone());

        assert_eq!(err.to_string(), "Handler failed: [fail] Session: denied");
        assert_eq!(Envelope::from(err), envelope);
    }

    #[test]
    fn other_errors_become_error_envelopes() {
        let err = KernelError::NotFound { message: "Router".into(), context: None };
        let envelope = Envelope::from(err);

        assert!(envelope.is_failure());
        assert_eq!(envelope.source.as_deref(), Some("NotFound"));
        assert_eq!(envelope.message.as_deref(), Some("Handler not registered: Router"));
        assert_eq!(envelope.payload, Some(json!({ "kind": "NotFound", "context": null })));
    }

    #[test]
    fn error_envelopes_carry_their_context() {
        let err = KernelError::Protocol { message: "expected a mapping".into(), context: None };
        let result: Result<(), KernelError> = Err(err);
        let envelope = Envelope::from(result.context("creating Router").unwrap_err());

        assert_eq!(envelope.source.as_deref(), Some("Protocol"));
        assert_eq!(envelope.payload, Some(json!({ "kind": "Protocol", "context": "creating Router" })));
    }
}
