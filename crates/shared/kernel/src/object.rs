//! The data-holding base every handler is built on.

use crate::error::{KernelError, KernelErrorExt};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;
use trellis_domain::{Properties, merge};
use trellis_loader::{Format, Loader};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of a data object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(u64);

impl InstanceId {
    fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Names the instance that created another one.
///
/// Only an identifier: it never keeps the creator alive and has no influence
/// on behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Creator {
    pub class: Arc<str>,
    pub id: InstanceId,
}

impl fmt::Display for Creator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.class, self.id)
    }
}

/// Construction input of a [`DataObject`].
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    /// A mapping, merged over the class defaults.
    Object(Properties),
    /// Key/value pairs, converted to a mapping; later pairs win.
    Pairs(Vec<(String, Value)>),
    /// A deferred reference, resolved by [`DataObject::load`].
    Reference(String),
}

impl Default for Source {
    fn default() -> Self {
        Self::Object(Properties::new())
    }
}

impl From<Properties> for Source {
    fn from(properties: Properties) -> Self {
        Self::Object(properties)
    }
}

impl From<Vec<(String, Value)>> for Source {
    fn from(pairs: Vec<(String, Value)>) -> Self {
        Self::Pairs(pairs)
    }
}

impl From<String> for Source {
    fn from(reference: String) -> Self {
        Self::Reference(reference)
    }
}

impl From<&str> for Source {
    fn from(reference: &str) -> Self {
        Self::Reference(reference.to_owned())
    }
}

impl TryFrom<Value> for Source {
    type Error = KernelError;

    /// `null` is an empty mapping, arrays must hold `[key, value]` pairs.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::Object(map) => Ok(Self::Object(map)),
            Value::String(reference) => Ok(Self::Reference(reference)),
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::Array(mut pair) if pair.len() == 2 => {
                        let value = pair.pop().unwrap_or_default();
                        match pair.pop() {
                            Some(Value::String(key)) => Ok((key, value)),
                            _ => Err(KernelError::protocol("pair keys must be strings")),
                        }
                    },
                    _ => Err(KernelError::protocol("expected [key, value] pairs")),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Pairs),
            other => Err(KernelError::protocol(format!("cannot build an object from {other}"))),
        }
    }
}

/// A named mapping of properties with a two-phase loading protocol.
///
/// Properties are merged in a fixed order: class defaults, then the resolved
/// pending reference, then data supplied to [`DataObject::load`].
#[derive(Debug, Clone)]
pub struct DataObject {
    class: Arc<str>,
    id: InstanceId,
    properties: Properties,
    pending: Option<String>,
    creator: Option<Creator>,
}

impl DataObject {
    /// Builds an object over the class `defaults`.
    ///
    /// A [`Source::Reference`] is kept pending and leaves the properties at the defaults.
    #[must_use]
    pub fn new(class: impl Into<Arc<str>>, defaults: &Properties, source: Source) -> Self {
        let mut properties = defaults.clone();
        let mut pending = None;
        match source {
            Source::Object(map) => merge(&mut properties, map),
            Source::Pairs(pairs) => merge(&mut properties, pairs.into_iter().collect()),
            Source::Reference(reference) => pending = Some(reference),
        }

        Self { class: class.into(), id: InstanceId::next(), properties, pending, creator: None }
    }

    #[must_use]
    pub fn class(&self) -> &str {
        &self.class
    }

    #[must_use]
    pub const fn id(&self) -> InstanceId {
        self.id
    }

    /// An identifier other objects can hold to name this one as their creator.
    #[must_use]
    pub fn as_creator(&self) -> Creator {
        Creator { class: Arc::clone(&self.class), id: self.id }
    }

    #[must_use]
    pub const fn creator(&self) -> Option<&Creator> {
        self.creator.as_ref()
    }

    pub fn set_creator(&mut self, creator: Option<Creator>) {
        self.creator = creator;
    }

    /// The reference still waiting to be loaded, if any.
    #[must_use]
    pub fn pending_source(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    /// Stores `value` under `key` and returns the previous value.
    ///
    /// `Value::Null` is stored as an explicit null; use [`DataObject::unset`] to
    /// remove a key.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.properties.insert(key.into(), value.into())
    }

    pub fn unset(&mut self, key: &str) -> Option<Value> {
        self.properties.remove(key)
    }

    #[must_use]
    pub const fn properties(&self) -> &Properties {
        &self.properties
    }

    /// The full property mapping, detached from the object.
    #[must_use]
    pub fn value_of(&self) -> Properties {
        self.properties.clone()
    }

    /// Resolves the pending reference, then merges `data` on top.
    ///
    /// Returns only the supplied `data` after resolution, not the merged state.
    ///
    /// # Errors
    /// [`KernelError::Load`] when a reference cannot be resolved, naming this
    /// class; [`KernelError::Protocol`] when resolved data is not a mapping.
    pub async fn load(&mut self, loader: &dyn Loader, data: Value) -> Result<Properties, KernelError> {
        self.resolve_pending(loader).await?;

        let supplied = resolve(loader, data, &self.class).await?;
        merge(&mut self.properties, supplied.clone());

        Ok(supplied)
    }

    /// Fetches the pending reference, if any, and merges it over the current
    /// properties. The reference is cleared once it has loaded and is never
    /// fetched again; a failed load leaves it in place.
    ///
    /// # Errors
    /// See [`DataObject::load`].
    pub async fn resolve_pending(&mut self, loader: &dyn Loader) -> Result<(), KernelError> {
        let Some(reference) = self.pending.clone() else {
            return Ok(());
        };

        debug!(class = %self.class, id = %self.id, reference = %reference, "Resolving pending source");
        let resolved = resolve(loader, Value::String(reference), &self.class).await?;
        merge(&mut self.properties, resolved);
        self.pending = None;
        Ok(())
    }
}

/// Resolves `data` through `loader` into a mapping on behalf of `class`.
pub(crate) async fn resolve(
    loader: &dyn Loader,
    data: Value,
    class: &str,
) -> Result<Properties, KernelError> {
    let resolved = loader.load(data, Format::Json).await.context(format!("requested by {class}"))?;
    into_properties(resolved, class)
}

/// Accepts a resolved mapping; `null` counts as empty.
pub(crate) fn into_properties(value: Value, class: &str) -> Result<Properties, KernelError> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Properties::new()),
        other => Err(KernelError::Protocol {
            message: format!("expected a mapping, got {other}").into(),
            context: Some(format!("loading {class}").into()),
        }),
    }
}

impl fmt::Display for DataObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.class)
    }
}

impl Serialize for DataObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.properties.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(value: Value) -> Properties {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn mapping_is_merged_over_defaults() {
        let object = DataObject::new("Router", &props(json!({ "a": 1, "b": 2 })), props(json!({ "b": 3 })).into());
        assert_eq!(Value::Object(object.value_of()), json!({ "a": 1, "b": 3 }));
        assert!(object.pending_source().is_none());
    }

    #[test]
    fn pairs_become_a_mapping() {
        let pairs = vec![("a".to_owned(), json!(1)), ("a".to_owned(), json!(2))];
        let object = DataObject::new("Router", &Properties::new(), pairs.into());
        assert_eq!(object.get("a"), Some(&json!(2)));
    }

    #[test]
    fn reference_is_kept_pending() {
        let object = DataObject::new("Router", &props(json!({ "a": 1 })), "./router.json".into());
        assert_eq!(object.pending_source(), Some("./router.json"));
        assert_eq!(Value::Object(object.value_of()), json!({ "a": 1 }));
    }

    #[test]
    fn set_null_is_distinct_from_unset() {
        let mut object = DataObject::new("Router", &Properties::new(), Source::default());
        assert!(!object.has("path"));

        object.set("path", Value::Null);
        assert!(object.has("path"));
        assert_eq!(object.get("path"), Some(&Value::Null));

        assert_eq!(object.unset("path"), Some(Value::Null));
        assert!(!object.has("path"));
        assert_eq!(object.get("path"), None);
    }

    #[test]
    fn values_convert_into_sources() {
        assert_eq!(Source::try_from(Value::Null).unwrap(), Source::default());
        assert_eq!(Source::try_from(json!("./a.json")).unwrap(), Source::Reference("./a.json".into()));
        assert_eq!(
            Source::try_from(json!([["a", 1], ["b", [2]]])).unwrap(),
            Source::Pairs(vec![("a".into(), json!(1)), ("b".into(), json!([2]))])
        );
        assert_eq!(Source::try_from(json!([["a"]])).unwrap_err().kind(), "Protocol");
        assert_eq!(Source::try_from(json!(42)).unwrap_err().kind(), "Protocol");
    }

    #[test]
    fn display_and_serialize() {
        let object = DataObject::new("Router", &Properties::new(), props(json!({ "path": "/x" })).into());
        assert_eq!(object.to_string(), "Router");
        assert_eq!(serde_json::to_value(&object).unwrap(), json!({ "path": "/x" }));
    }

    #[test]
    fn ids_are_unique_and_creators_are_identifiers() {
        let parent = DataObject::new("Application", &Properties::new(), Source::default());
        let mut child = DataObject::new("Router", &Properties::new(), Source::default());
        assert_ne!(parent.id(), child.id());

        child.set_creator(Some(parent.as_creator()));
        let creator = child.creator().unwrap();
        assert_eq!(&*creator.class, "Application");
        assert_eq!(creator.id, parent.id());
    }
}
