#![allow(dead_code, unreachable_pub)]

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::sync::Arc;
use trellis_domain::{Envelope, Properties, Request, Response};
use trellis_kernel::{Context, Handler, HandlerClass, HandlerCore, KernelError, Registry};
use trellis_loader::MemoryLoader;

/// What a recorder's transform answers with.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Default behavior: success with the handler's data.
    Pass,
    /// Success carrying only these properties.
    Emit(Value),
    Fail(&'static str),
    Raise(&'static str),
    /// An envelope without a status.
    Plain(Value),
}

/// Shared, ordered record of what recorders did.
pub type Journal = Arc<Mutex<Vec<String>>>;

#[derive(Debug)]
pub struct Recorder {
    core: HandlerCore,
    journal: Journal,
    outcome: Outcome,
    recovers: bool,
}

#[async_trait]
impl Handler for Recorder {
    fn core(&self) -> &HandlerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut HandlerCore {
        &mut self.core
    }

    async fn handle(
        &mut self,
        _request: &Request,
        response: &mut Response,
        data: Properties,
    ) -> Result<Envelope, KernelError> {
        self.journal.lock().push(format!("handle {}", self.name()));
        response.set(self.name().to_owned(), "visited");

        match &self.outcome {
            Outcome::Pass => Ok(Envelope::success(data).with_source(self.name())),
            Outcome::Emit(value) => Ok(Envelope::success(value.clone())),
            Outcome::Fail(message) => Ok(Envelope::fail(*message).with_source(self.name())),
            Outcome::Raise(message) => Err(KernelError::from(*message)),
            Outcome::Plain(value) => Ok(Envelope { data: Some(value.clone()), ..Envelope::default() }),
        }
    }

    fn recover(&self, failure: &Envelope) -> Option<Envelope> {
        self.recovers.then(|| Envelope::success(json!({ "recovered": failure.source })))
    }
}

/// Builds a recorder class that journals every instantiation.
pub fn recorder(journal: &Journal, name: &str, outcome: Outcome) -> HandlerClass {
    recorder_with(journal, name, outcome, false)
}

pub fn recorder_with(journal: &Journal, name: &str, outcome: Outcome, recovers: bool) -> HandlerClass {
    let journal = Arc::clone(journal);
    HandlerClass::with_builder(name, move |core| {
        journal.lock().push(format!("new {}", core.class()));
        Recorder { core, journal: Arc::clone(&journal), outcome: outcome.clone(), recovers }
    })
}

pub fn journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn entries(journal: &Journal) -> Vec<String> {
    journal.lock().clone()
}

pub fn props(value: Value) -> Properties {
    value.as_object().cloned().unwrap_or_default()
}

pub fn context(registry: Registry, loader: Arc<MemoryLoader>) -> Context {
    Context::builder().registry(registry).shared_loader(loader).build().unwrap()
}
