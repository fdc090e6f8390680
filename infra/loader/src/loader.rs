use crate::error::{LoadError, LoadErrorExt};
use crate::reference::Reference;
use async_trait::async_trait;
use futures::future::try_join_all;
use serde_json::Value;
use std::fmt::Debug;
use tracing::{debug, trace};
use trellis_domain::Properties;

/// How fetched text is turned into a value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    /// Returned as a JSON string.
    #[default]
    Text,
    /// Parsed as a JSON document.
    Json,
}

impl Format {
    fn decode(self, text: String) -> Result<Value, serde_json::Error> {
        match self {
            Self::Text => Ok(Value::String(text)),
            Self::Json => serde_json::from_str(&text),
        }
    }
}

/// Turns deferred references into values.
///
/// Implementors only provide [`Loader::fetch`]; classification, decoding and
/// fan-out are shared.
#[async_trait]
pub trait Loader: Debug + Send + Sync {
    /// Fetches the raw text behind a deferred reference.
    async fn fetch(&self, reference: &Reference<'_>) -> Result<String, LoadError>;

    /// Resolves `data` if it is a deferred reference, otherwise returns it unchanged.
    ///
    /// # Errors
    /// Fails when the reference cannot be fetched or, for [`Format::Json`], when
    /// the fetched text is not valid JSON. The error context names the reference.
    async fn load(&self, data: Value, format: Format) -> Result<Value, LoadError> {
        let raw = match data {
            Value::String(raw) => raw,
            other => return Ok(other),
        };
        let reference = Reference::classify(&raw);
        if !reference.is_deferred() {
            trace!(len = raw.len(), "Inline data passed through");
            return Ok(Value::String(raw));
        }

        debug!(reference = %reference, ?format, "Loading reference");
        let text = self.fetch(&reference).await.context(format!("Failed to load \"{raw}\""))?;
        format.decode(text).context(format!("Failed to decode \"{raw}\""))
    }

    /// Loads every entry of `entries` concurrently and returns them under the same keys.
    ///
    /// Either every entry resolves or the whole call fails; partial results are
    /// never returned.
    async fn load_all(&self, entries: Properties, format: Format) -> Result<Properties, LoadError> {
        debug!(entries = entries.len(), "Loading references concurrently");
        let pending = entries.into_iter().map(|(key, value)| async move {
            self.load(value, format).await.map(|loaded| (key, loaded))
        });
        Ok(try_join_all(pending).await?.into_iter().collect())
    }
}
