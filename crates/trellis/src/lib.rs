//! Facade crate for Trellis.
//! Re-exports domain/kernel/loader primitives and populates the handler registry.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Call [`context`] with the loaded [`AppConfig`](domain::config::AppConfig) to get a
//!   ready [`Context`](kernel::Context).
//! - Extend [`registry`] as new handler crates appear.

mod error;

pub use crate::error::{TrellisError, TrellisErrorExt};

use tracing::info;
use trellis_domain::config::AppConfig;
use trellis_kernel::{Context, HandlerClass, Registry};
use trellis_loader::DefaultLoader;

pub use trellis_application as application;
pub use trellis_domain as domain;
pub use trellis_kernel as kernel;
pub use trellis_loader as loader;

/// Built-in handler classes.
pub mod handlers {
    /// The plain handler every class derives from.
    pub const HANDLER: &str = "Handler";
    pub use trellis_application::NAME as APPLICATION;

    /// Pass-through stages of the default application stack. Deployments replace
    /// them with prefixed classes carrying the real behavior.
    pub const PASS_THROUGH: [&str; 3] = trellis_application::DEFAULT_STACK;
}

/// A registry holding every built-in handler class.
#[must_use]
pub fn registry() -> Registry {
    let mut registry = Registry::new();
    registry
        .register(HandlerClass::new(handlers::HANDLER))
        .register(application::Application::class())
        .register_all(handlers::PASS_THROUGH.map(HandlerClass::new));

    info!(handlers = registry.len(), "Handler registry populated");
    registry
}

/// Builds the chain context described by `config`, using [`registry`] and a
/// filesystem/HTTP loader.
///
/// # Errors
/// Returns an error if the loader cannot be initialized.
pub fn context(config: &AppConfig) -> Result<Context, TrellisError> {
    context_with(config, registry())
}

/// Like [`context`], with a caller-provided registry.
///
/// # Errors
/// Returns an error if the loader cannot be initialized.
pub fn context_with(config: &AppConfig, registry: Registry) -> Result<Context, TrellisError> {
    let loader = DefaultLoader::from_config(&config.loader).context("Failed to build loader")?;

    Ok(Context::builder()
        .registry(registry)
        .loader(loader)
        .prefix(config.prefix.clone())
        .build()
        .context("Failed to build context")?)
}
