use indexmap::IndexSet;
use serde::Serialize;
use std::sync::Arc;

/// Ordered set of successor handler names.
///
/// Pushing keeps the first position of a name; duplicates are ignored.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Stack {
    names: IndexSet<Arc<str>>,
}

impl Stack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `name` unless it is already present. Returns whether it was added.
    pub fn push(&mut self, name: impl Into<Arc<str>>) -> bool {
        self.names.insert(name.into())
    }

    /// Removes `name`, keeping the order of the rest. Returns whether it was present.
    pub fn remove(&mut self, name: &str) -> bool {
        self.names.shift_remove(name)
    }

    pub fn clear(&mut self) {
        self.names.clear();
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|n| &**n)
    }
}

// Order matters for a stack; `IndexSet` equality ignores it.
impl PartialEq for Stack {
    fn eq(&self, other: &Self) -> bool {
        self.names.iter().eq(other.names.iter())
    }
}

impl Eq for Stack {}

impl<S: Into<Arc<str>>> FromIterator<S> for Stack {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self { names: iter.into_iter().map(Into::into).collect() }
    }
}

impl IntoIterator for Stack {
    type Item = Arc<str>;
    type IntoIter = indexmap::set::IntoIter<Arc<str>>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.into_iter()
    }
}
