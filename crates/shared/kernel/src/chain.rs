//! The handler chain: local transform, then sequential delegation to the stack.

use crate::context::Context;
use crate::error::KernelError;
use crate::handler::Handler;
use crate::object::{into_properties, resolve};
use futures::future::BoxFuture;
use serde_json::Value;
use tracing::{debug, error, warn};
use trellis_domain::{Envelope, Properties, Request, Response, merge};

impl Context {
    /// Runs `handler` and every successor on its stack.
    ///
    /// 1. the handler's pending reference is resolved, then `data` (which may be a
    ///    reference too) becomes the running payload;
    /// 2. the handler's own transform runs over its properties with `data` merged
    ///    on top, leaving the properties themselves untouched; an error or a
    ///    non-success envelope rejects immediately, a success envelope's data is
    ///    merged into the payload;
    /// 3. each successor named on the handler's stack is created from the payload
    ///    slot named after it in lower case, with this handler as creator. The slot
    ///    is drained from the payload and from the handler's properties, then the
    ///    successor is invoked with what remains;
    /// 4. a step that errors becomes an error envelope. The next step, or the end
    ///    of the stack, settles it: success continues with its data, a missing
    ///    status passes the data through, anything else is offered to
    ///    [`Handler::recover`] and otherwise aborts.
    ///
    /// Steps run strictly one after another.
    ///
    /// # Errors
    /// [`KernelError::Load`] if `data` cannot be resolved, the transform's own error,
    /// or [`KernelError::HandlerFailure`] carrying the envelope that stopped the chain.
    pub fn invoke<'a>(
        &'a self,
        handler: &'a mut dyn Handler,
        request: &'a Request,
        response: &'a mut Response,
        data: Value,
    ) -> BoxFuture<'a, Result<Envelope, KernelError>> {
        Box::pin(async move {
            let name = handler.name().to_owned();
            let id = handler.core().id();
            debug!(handler = %name, %id, creator = ?handler.core().creator(), "Invoking handler");

            let supplied = self.resolve_input(handler, data).await.inspect_err(|err| {
                error!(handler = %name, %id, error = %err, "Failed to load handler data");
            })?;

            let mut view = handler.core().value_of();
            merge(&mut view, supplied.clone());
            let mut payload = supplied;
            let local = handler.handle(request, response, view).await.inspect_err(|err| {
                error!(handler = %name, %id, error = %err, "Handler transform failed");
            })?;
            debug!(handler = %name, %id, status = ?local.status, "Handler transform finished");

            if local.is_failure() {
                return Err(KernelError::failure(local));
            }
            if local.is_success() {
                merge(&mut payload, into_properties(local.data.unwrap_or_default(), &name)?);
            }

            let successors: Vec<_> = handler.core().stack().clone().into_iter().collect();
            let mut current = Envelope::success(payload);

            for successor in successors {
                let mut payload = settle(&*handler, current)?;
                current = match self.delegate(handler, &successor, &mut payload, request, response).await {
                    Ok(envelope) => envelope,
                    Err(err) => {
                        warn!(handler = %name, %id, successor = %successor, error = %err, "Successor failed");
                        Envelope::from(err)
                    },
                };
            }

            let payload = settle(&*handler, current).inspect_err(|err| {
                error!(handler = %name, %id, error = %err, "Chain aborted");
            })?;
            Ok(Envelope::success(payload).with_source(name))
        })
    }

    async fn resolve_input(&self, handler: &mut dyn Handler, data: Value) -> Result<Properties, KernelError> {
        handler.core_mut().resolve_pending(self.loader()).await?;
        resolve(self.loader(), data, handler.name()).await
    }

    async fn delegate(
        &self,
        handler: &mut dyn Handler,
        successor: &str,
        payload: &mut Properties,
        request: &Request,
        response: &mut Response,
    ) -> Result<Envelope, KernelError> {
        let slot = successor.to_lowercase();
        let data = payload.get(&slot).cloned().unwrap_or_default();

        let mut next = self.create(successor, data, Some(handler.core().as_creator())).await?;

        payload.remove(&slot);
        handler.core_mut().unset(&slot);

        self.invoke(next.as_mut(), request, response, Value::Object(std::mem::take(payload))).await
    }
}

/// Turns the envelope produced by the previous step into the next payload.
fn settle(handler: &dyn Handler, envelope: Envelope) -> Result<Properties, KernelError> {
    if envelope.is_failure() {
        return match handler.recover(&envelope) {
            Some(recovered) if !recovered.is_failure() => {
                debug!(handler = handler.name(), status = ?envelope.status, "Successor failure recovered");
                into_properties(recovered.data.unwrap_or_default(), handler.name())
            },
            _ => Err(KernelError::failure(envelope)),
        };
    }
    into_properties(envelope.data.unwrap_or_default(), handler.name())
}
