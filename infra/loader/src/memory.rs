use crate::error::LoadError;
use crate::loader::Loader;
use crate::reference::Reference;
use async_trait::async_trait;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::trace;

/// Loader serving documents from memory, keyed by the exact reference string.
///
/// Used for embedded configuration and in tests, where [`MemoryLoader::fetch_count`]
/// shows how often a document was actually requested.
#[derive(Debug, Default)]
pub struct MemoryLoader {
    documents: RwLock<FxHashMap<String, String>>,
    fetches: AtomicUsize,
}

impl MemoryLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(self, reference: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(reference, text);
        self
    }

    /// Adds or replaces the document behind `reference`.
    pub fn insert(&self, reference: impl Into<String>, text: impl Into<String>) {
        self.documents.write().insert(reference.into(), text.into());
    }

    /// Number of fetches served or attempted so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Loader for MemoryLoader {
    async fn fetch(&self, reference: &Reference<'_>) -> Result<String, LoadError> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        trace!(reference = %reference, "Serving in-memory document");

        if let Reference::Inline(raw) = reference {
            return Ok((*raw).to_owned());
        }

        self.documents.read().get(reference.as_str()).cloned().ok_or_else(|| LoadError::NotFound {
            message: reference.as_str().to_owned().into(),
            context: Some("no in-memory document".into()),
        })
    }
}
