//! Name → handler class table.
//! Populated once at startup and read by the factory for every successor it builds.

use crate::error::KernelError;
use crate::handler::HandlerClass;
use fxhash::FxHashMap;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Default)]
pub struct Registry {
    classes: FxHashMap<String, Arc<HandlerClass>>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds the class under its own name, replacing any earlier binding.
    pub fn register(&mut self, class: HandlerClass) -> &mut Self {
        let name = class.name().to_owned();
        if self.classes.insert(name.clone(), Arc::new(class)).is_some() {
            debug!(handler = %name, "Handler class replaced");
        } else {
            debug!(handler = %name, "Handler class registered");
        }
        self
    }

    /// Registers multiple classes at once.
    pub fn register_all<I>(&mut self, classes: I) -> &mut Self
    where
        I: IntoIterator<Item = HandlerClass>,
    {
        for class in classes {
            self.register(class);
        }
        self
    }

    /// Whether `prefix + name` is bound.
    #[must_use]
    pub fn exists(&self, name: &str, prefix: &str) -> bool {
        if prefix.is_empty() {
            self.classes.contains_key(name)
        } else {
            self.classes.contains_key(&format!("{prefix}{name}"))
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<HandlerClass>> {
        self.classes.get(name)
    }

    /// Returns the class bound to `name`.
    ///
    /// # Errors
    /// Returns [`KernelError::NotFound`] if nothing is bound to `name`.
    pub fn resolve(&self, name: &str) -> Result<&Arc<HandlerClass>, KernelError> {
        self.get(name).ok_or_else(|| KernelError::NotFound { message: name.to_owned().into(), context: None })
    }

    /// Registered names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Drops every binding.
    pub fn reset(&mut self) {
        self.classes.clear();
    }
}
