//! Handler trait, per-instance state and handler classes.

use crate::error::KernelError;
use crate::object::{Creator, DataObject, Source};
use crate::stack::Stack;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use tracing::debug;
use trellis_domain::{Envelope, Properties, Request, Response};

/// State every handler instance owns: its data and a private copy of its stack.
#[derive(Debug, Clone)]
pub struct HandlerCore {
    object: DataObject,
    stack: Stack,
}

impl HandlerCore {
    #[must_use]
    pub const fn new(object: DataObject, stack: Stack) -> Self {
        Self { object, stack }
    }

    #[must_use]
    pub const fn stack(&self) -> &Stack {
        &self.stack
    }

    /// Appends a successor to this instance only.
    pub fn use_handler(&mut self, name: &str) {
        if self.stack.push(name) {
            debug!(handler = %self.object, id = %self.object.id(), successor = name, "Instance stack extended");
        }
    }

    /// Removes one successor, or all of them when `name` is `None`, from this instance only.
    pub fn clear(&mut self, name: Option<&str>) {
        match name {
            Some(name) => {
                self.stack.remove(name);
            },
            None => self.stack.clear(),
        }
        debug!(handler = %self.object, id = %self.object.id(), successor = ?name, "Instance stack cleared");
    }
}

impl Deref for HandlerCore {
    type Target = DataObject;

    fn deref(&self) -> &Self::Target {
        &self.object
    }
}

impl DerefMut for HandlerCore {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.object
    }
}

/// One stage of a handler chain.
///
/// Implementors expose their [`HandlerCore`] and usually override
/// [`Handler::handle`]; delegation to the stack is driven by
/// [`Context::invoke`](crate::Context::invoke).
#[async_trait]
pub trait Handler: fmt::Debug + Send + Sync {
    fn core(&self) -> &HandlerCore;

    fn core_mut(&mut self) -> &mut HandlerCore;

    /// Class name the instance was built from.
    fn name(&self) -> &str {
        self.core().class()
    }

    /// The local transform. The default wraps `data` in a success envelope.
    ///
    /// `data` is a snapshot of the handler's properties, with the data supplied to
    /// this invocation already merged on top.
    async fn handle(
        &mut self,
        request: &Request,
        response: &mut Response,
        data: Properties,
    ) -> Result<Envelope, KernelError> {
        let _ = (request, response);
        Ok(Envelope::success(data).with_source(self.name()))
    }

    /// Offered a successor's failure before it aborts the chain.
    ///
    /// Returning an envelope replaces the failure; `None` lets it propagate.
    fn recover(&self, failure: &Envelope) -> Option<Envelope> {
        let _ = failure;
        None
    }
}

/// Handler without a transform of its own.
#[derive(Debug, Clone)]
pub struct BaseHandler {
    core: HandlerCore,
}

impl BaseHandler {
    #[must_use]
    pub const fn new(core: HandlerCore) -> Self {
        Self { core }
    }
}

impl Handler for BaseHandler {
    fn core(&self) -> &HandlerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut HandlerCore {
        &mut self.core
    }
}

type Builder = dyn Fn(HandlerCore) -> Box<dyn Handler> + Send + Sync;

/// A registered handler type: name, defaults, default stack and a builder.
///
/// The default stack can be edited while the class is registered; instances copy
/// it when they are created, so edits only reach instances created afterwards.
pub struct HandlerClass {
    name: Arc<str>,
    defaults: Properties,
    stack: RwLock<Stack>,
    builder: Arc<Builder>,
}

impl HandlerClass {
    /// A class whose instances are [`BaseHandler`]s.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self::with_builder(name, BaseHandler::new)
    }

    /// A class whose instances are built by `builder`.
    #[must_use]
    pub fn with_builder<F, H>(name: impl Into<Arc<str>>, builder: F) -> Self
    where
        F: Fn(HandlerCore) -> H + Send + Sync + 'static,
        H: Handler + 'static,
    {
        Self {
            name: name.into(),
            defaults: Properties::new(),
            stack: RwLock::new(Stack::new()),
            builder: Arc::new(move |core| -> Box<dyn Handler> { Box::new(builder(core)) }),
        }
    }

    #[must_use = "Sets the properties every instance starts from"]
    pub fn defaults(mut self, defaults: Properties) -> Self {
        self.defaults = defaults;
        self
    }

    #[must_use = "Sets the default successor stack"]
    pub fn stack<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<str>>,
    {
        *self.stack.write() = names.into_iter().collect();
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn default_properties(&self) -> &Properties {
        &self.defaults
    }

    /// Snapshot of the class-level stack.
    #[must_use]
    pub fn default_stack(&self) -> Stack {
        self.stack.read().clone()
    }

    /// Appends a successor to the class-level stack.
    pub fn use_handler(&self, name: &str) {
        if self.stack.write().push(name) {
            debug!(handler = %self.name, successor = name, "Class stack extended");
        }
    }

    /// Removes one successor, or all of them when `name` is `None`, from the class-level stack.
    pub fn clear(&self, name: Option<&str>) {
        let mut stack = self.stack.write();
        match name {
            Some(name) => {
                stack.remove(name);
            },
            None => stack.clear(),
        }
        debug!(handler = %self.name, successor = ?name, "Class stack cleared");
    }

    /// Builds an instance from `source`, seeded with a copy of the current class stack.
    #[must_use]
    pub fn instantiate(&self, source: Source, creator: Option<Creator>) -> Box<dyn Handler> {
        let mut object = DataObject::new(Arc::clone(&self.name), &self.defaults, source);
        object.set_creator(creator);
        (self.builder)(HandlerCore::new(object, self.default_stack()))
    }
}

impl fmt::Debug for HandlerClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerClass")
            .field("name", &self.name)
            .field("defaults", &self.defaults)
            .field("stack", &*self.stack.read())
            .finish_non_exhaustive()
    }
}
