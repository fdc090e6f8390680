use crate::error::KernelError;
use crate::factory::Factory;
use crate::handler::Handler;
use crate::object::Creator;
use crate::registry::Registry;
use serde_json::Value;
use std::ops::Deref;
use std::sync::Arc;
use trellis_loader::Loader;

#[derive(Debug)]
pub struct ContextInner {
    pub registry: Registry,
    pub loader: Arc<dyn Loader>,
    /// Override prefix used whenever the chain creates a successor.
    pub prefix: String,
}

/// Everything a chain needs, passed explicitly into every invocation.
///
/// Cheap to clone; the registry is shared, not copied.
#[derive(Debug, Clone)]
pub struct Context {
    inner: Arc<ContextInner>,
}

impl Context {
    #[must_use]
    pub fn builder() -> ContextBuilder {
        ContextBuilder::default()
    }

    #[must_use]
    pub fn loader(&self) -> &dyn Loader {
        &*self.inner.loader
    }

    #[must_use]
    pub fn factory(&self) -> Factory<'_> {
        Factory::new(&self.inner.registry, self.loader())
    }

    /// Creates `name` through the factory, applying this context's prefix.
    ///
    /// # Errors
    /// See [`Factory::create`].
    pub async fn create(
        &self,
        name: &str,
        data: Value,
        creator: Option<Creator>,
    ) -> Result<Box<dyn Handler>, KernelError> {
        self.factory().create(name, data, creator, &self.inner.prefix).await
    }
}

impl Deref for Context {
    type Target = ContextInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[derive(Debug, Default)]
pub struct ContextBuilder {
    registry: Option<Registry>,
    loader: Option<Arc<dyn Loader>>,
    prefix: String,
}

impl ContextBuilder {
    #[must_use]
    pub fn registry(mut self, registry: Registry) -> Self {
        self.registry = Some(registry);
        self
    }

    #[must_use]
    pub fn loader(self, loader: impl Loader + 'static) -> Self {
        self.shared_loader(Arc::new(loader))
    }

    /// Uses a loader that is also held elsewhere.
    #[must_use]
    pub fn shared_loader(mut self, loader: Arc<dyn Loader>) -> Self {
        self.loader = Some(loader);
        self
    }

    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// # Errors
    /// Returns [`KernelError::Internal`] when no loader was provided.
    pub fn build(self) -> Result<Context, KernelError> {
        let loader = self.loader.ok_or_else(|| KernelError::Internal {
            message: "Loader not provided".into(),
            context: None,
        })?;

        Ok(Context {
            inner: Arc::new(ContextInner {
                registry: self.registry.unwrap_or_default(),
                loader,
                prefix: self.prefix,
            }),
        })
    }
}
