use crate::error::{KernelError, KernelErrorExt};
use crate::handler::{Handler, HandlerClass};
use crate::object::{Creator, Source};
use crate::registry::Registry;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;
use trellis_loader::{Format, Loader};

/// Builds handler instances by name.
#[derive(Debug, Clone, Copy)]
pub struct Factory<'a> {
    registry: &'a Registry,
    loader: &'a dyn Loader,
}

impl<'a> Factory<'a> {
    #[must_use]
    pub const fn new(registry: &'a Registry, loader: &'a dyn Loader) -> Self {
        Self { registry, loader }
    }

    /// Picks `prefix + name` when it is registered, otherwise `name`.
    ///
    /// # Errors
    /// Returns [`KernelError::NotFound`] if neither is registered.
    pub fn select(&self, name: &str, prefix: &str) -> Result<&'a Arc<HandlerClass>, KernelError> {
        if !prefix.is_empty() && self.registry.exists(name, prefix) {
            return self.registry.resolve(&format!("{prefix}{name}"));
        }
        self.registry.resolve(name)
    }

    /// Creates an instance of `name` from `data`, which may be a reference.
    ///
    /// `creator` is recorded on the instance for diagnostics only.
    ///
    /// # Errors
    /// [`KernelError::Load`] if `data` cannot be resolved, [`KernelError::NotFound`]
    /// if `name` is not registered, [`KernelError::Protocol`] if the resolved data
    /// cannot seed an object.
    pub async fn create(
        &self,
        name: &str,
        data: Value,
        creator: Option<Creator>,
        prefix: &str,
    ) -> Result<Box<dyn Handler>, KernelError> {
        let resolved =
            self.loader.load(data, Format::Json).await.context(format!("creating {name}"))?;
        let source = Source::try_from(resolved)?;
        let class = self.select(name, prefix)?;

        debug!(
            handler = class.name(),
            requested = name,
            creator = creator.as_ref().map(tracing::field::display),
            "Creating handler"
        );

        Ok(class.instantiate(source, creator))
    }
}
