//! # Kernel
//!
//! The dispatch machinery every Trellis application is built from:
//!
//! * [`DataObject`]: a property mapping with a two-phase loading protocol
//!   (class defaults < resolved reference < supplied data);
//! * [`Registry`]: name → [`HandlerClass`] table, with override-by-prefix lookup;
//! * [`Factory`]: resolves data, picks the class (`prefix + name` wins when
//!   registered) and instantiates it;
//! * [`Context::invoke`]: the handler chain, running a handler's own transform and
//!   then each successor on its stack, one after another.
//!
//! ## Example
//! ```rust
//! use serde_json::json;
//! use trellis_domain::{Request, Response};
//! use trellis_kernel::{Context, HandlerClass, Registry};
//! use trellis_loader::MemoryLoader;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), trellis_kernel::KernelError> {
//! let mut registry = Registry::new();
//! registry
//!     .register(HandlerClass::new("Application").stack(["Router"]))
//!     .register(HandlerClass::new("Router"));
//!
//! let context = Context::builder().registry(registry).loader(MemoryLoader::new()).build()?;
//! let mut app = context.create("Application", json!({ "router": { "path": "/x" } }), None).await?;
//!
//! let envelope = context
//!     .invoke(app.as_mut(), &Request::default(), &mut Response::new(), json!({}))
//!     .await?;
//! assert!(envelope.is_success());
//! # Ok(())
//! # }
//! ```

mod chain;
pub mod config;
mod context;
mod error;
mod factory;
mod handler;
mod object;
mod registry;
mod stack;

pub use context::{Context, ContextBuilder, ContextInner};
pub use error::{KernelError, KernelErrorExt};
pub use factory::Factory;
pub use handler::{BaseHandler, Handler, HandlerClass, HandlerCore};
pub use object::{Creator, DataObject, InstanceId, Source};
pub use registry::Registry;
pub use stack::Stack;

pub use trellis_domain as domain;
pub use trellis_loader as loader;
