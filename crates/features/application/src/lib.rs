//! Application handler, the root every chain starts from.
//!
//! Its default stack is `[Router, Session, Controller]`; a deployment replaces any
//! of them by registering a prefixed class. Before the chain runs,
//! [`prepare`] loads the application data, resolves its `include` section and
//! takes out the `log` section for the logger.

mod error;

pub use crate::error::{ApplicationError, ApplicationErrorExt};

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::{debug, info};
use trellis_domain::config::LogConfig;
use trellis_domain::{Envelope, Properties, Request, Response};
use trellis_kernel::{Handler, HandlerClass, HandlerCore, KernelError};
use trellis_loader::{Format, Loader};

/// Registry name of the application handler.
pub const NAME: &str = "Application";
/// Successors every application starts with.
pub const DEFAULT_STACK: [&str; 3] = ["Router", "Session", "Controller"];

const INCLUDE: &str = "include";
const LOG: &str = "log";

#[derive(Debug)]
pub struct Application {
    core: HandlerCore,
}

impl Application {
    /// The handler class to register.
    #[must_use]
    pub fn class() -> HandlerClass {
        HandlerClass::with_builder(NAME, |core| Self { core })
            .defaults(defaults())
            .stack(DEFAULT_STACK)
    }
}

fn defaults() -> Properties {
    let defaults = json!({
        "name": "Trellis",
        "title": "Trellis Application",
        "description": "This application runs with the default configuration.",
    });
    match defaults {
        Value::Object(map) => map,
        _ => Properties::new(),
    }
}

#[async_trait]
impl Handler for Application {
    fn core(&self) -> &HandlerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut HandlerCore {
        &mut self.core
    }

    /// Announces the application on the response and passes its data on.
    async fn handle(
        &mut self,
        _request: &Request,
        response: &mut Response,
        data: Properties,
    ) -> Result<Envelope, KernelError> {
        if let Some(name) = data.get("name") {
            response.set("application", name.clone());
        }
        Ok(Envelope::success(data).with_source(self.name()))
    }
}

/// Loads `data` into the application and settles its bootstrap sections.
///
/// Every entry of the `include` mapping is loaded (concurrently) and stored
/// under its key; the `log` section is removed and returned so it never reaches
/// the chain.
///
/// # Errors
/// Fails when `data` or an include cannot be loaded, or when a section has the
/// wrong shape.
pub async fn prepare(
    application: &mut dyn Handler,
    loader: &dyn Loader,
    data: Value,
) -> Result<Option<LogConfig>, ApplicationError> {
    application.core_mut().load(loader, data).await.context("Failed to load application data")?;

    if let Some(include) = application.core_mut().unset(INCLUDE) {
        let Value::Object(entries) = include else {
            return Err(ApplicationError::Invalid {
                message: format!("`{INCLUDE}` must be a mapping of references").into(),
                context: None,
            });
        };
        debug!(entries = entries.len(), "Resolving application includes");
        let loaded = loader.load_all(entries, Format::Json).await.context("Failed to resolve includes")?;
        for (key, value) in loaded {
            application.core_mut().set(key, value);
        }
    }

    let log = application
        .core_mut()
        .unset(LOG)
        .map(serde_json::from_value::<LogConfig>)
        .transpose()
        .context("Invalid `log` section")?;

    info!(
        application = application.core().get("name").and_then(serde_json::Value::as_str).unwrap_or(NAME),
        stack = ?application.core().stack(),
        "Application prepared"
    );

    Ok(log)
}
