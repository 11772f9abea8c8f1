//! The dispatch engine.
//!
//! [`Mediator`] resolves handlers by the concrete runtime type of the value
//! being dispatched and invokes them uniformly through the erased handler
//! layer. `send` routes a request to its one bound handler; `publish` fans a
//! notification out to every bound handler concurrently and aggregates
//! their outcomes.

use std::any::{type_name, Any};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::{HandlerError, MediatorError, Result};
use crate::handler::{HandlerLookup, RequestKey};
use crate::message::{Notification, Request};

/// Central dispatch engine.
///
/// Holds a non-owning reference to the handler lookup: the composition root
/// owns the registry, the mediator reads it for the duration of a logical
/// scope. `Copy`, so it can be handed around freely.
///
/// One mediator serves arbitrarily many request and notification shapes;
/// resolution always uses the concrete runtime type of the dispatched
/// value, never a declared supertype.
#[derive(Clone, Copy)]
pub struct Mediator<'r> {
    registry: &'r dyn HandlerLookup,
}

impl<'r> Mediator<'r> {
    /// Create a mediator over a handler lookup.
    pub fn new(registry: &'r dyn HandlerLookup) -> Self {
        Self { registry }
    }

    /// Send a request to its one bound handler and return the response.
    pub async fn send<R: Request>(&self, request: R) -> Result<R::Response> {
        self.send_with(request, CancellationToken::new()).await
    }

    /// Send a request with a caller-provided cancellation token.
    ///
    /// The token is forwarded to the handler unchanged; the mediator never
    /// inspects or polls it, and imposes no timeout of its own. The handler
    /// is invoked at most once, with no retry.
    ///
    /// # Errors
    ///
    /// [`MediatorError::HandlerNotFound`] when no handler is bound for the
    /// request type, [`MediatorError::ContractViolation`] when the resolved
    /// invocation has the wrong shape — the in-crate registry always binds
    /// matching shapes, so the response-side check guards foreign
    /// [`HandlerLookup`] implementations. The handler's own outcome is
    /// returned unwrapped and untransformed.
    pub async fn send_with<R: Request>(
        &self,
        request: R,
        cancellation: CancellationToken,
    ) -> Result<R::Response> {
        let handler = self
            .registry
            .resolve_one(RequestKey::of::<R>())
            .ok_or(MediatorError::HandlerNotFound(type_name::<R>()))?;

        debug!(request = handler.request_type(), "dispatching request");
        let response = handler.call(Box::new(request), cancellation).await?;

        match response.downcast::<R::Response>() {
            Ok(response) => Ok(*response),
            Err(_) => Err(MediatorError::ContractViolation {
                message_type: type_name::<R>(),
                reason: "handler produced a response of an unexpected type",
            }),
        }
    }

    /// Broadcast a notification to every handler bound to its type.
    ///
    /// Publishing to zero handlers is a successful no-op.
    pub async fn publish<N: Notification>(&self, notification: N) -> Result<()> {
        self.publish_with(notification, CancellationToken::new())
            .await
    }

    /// Publish with a caller-provided cancellation token.
    ///
    /// Every handler receives the same notification instance and a clone of
    /// the same token.
    pub async fn publish_with<N: Notification>(
        &self,
        notification: N,
        cancellation: CancellationToken,
    ) -> Result<()> {
        self.publish_dyn(Arc::new(notification), cancellation).await
    }

    /// Publish a notification held behind a supertype reference.
    ///
    /// Resolution uses the value's concrete runtime type, so a notification
    /// stored as `Arc<dyn Notification>` still reaches the handlers
    /// registered for its actual type.
    ///
    /// All matched handlers are started before any is awaited, then the
    /// publisher suspends once on their joined completion. Fail-together: a
    /// failing handler never cancels a sibling; every handler settles before
    /// the aggregate [`MediatorError::PublishFailed`] is surfaced. A handler
    /// that panics counts as a failed handler.
    ///
    /// A binding whose handler does not accept the notification's concrete
    /// type is skipped with a warning rather than failing the publish. This
    /// tolerance is intentional; see the skip test in the registry module.
    pub async fn publish_dyn(
        &self,
        notification: Arc<dyn Notification>,
        cancellation: CancellationToken,
    ) -> Result<()> {
        let kind = notification.kind();
        let value: Arc<dyn Any + Send + Sync> = notification;

        // Concrete runtime type of the value, not of the Arc around it.
        let handlers = self.registry.resolve_all(Any::type_id(&*value));
        if handlers.is_empty() {
            debug!(notification = kind, "no handlers bound, publish is a no-op");
            return Ok(());
        }

        // Fan-out: spawn every invocation before awaiting any, so a slow
        // handler never serializes behind another.
        let mut tasks = Vec::with_capacity(handlers.len());
        for handler in &handlers {
            match handler.call(Arc::clone(&value), cancellation.clone()) {
                Some(invocation) => tasks.push(tokio::spawn(invocation)),
                None => warn!(
                    notification = kind,
                    expected = handler.notification_type(),
                    "skipping handler bound to a mismatched notification type"
                ),
            }
        }

        let total = tasks.len();
        debug!(notification = kind, handlers = total, "publishing");

        // Fan-in: every handler settles before any failure surfaces.
        let mut failures: Vec<HandlerError> = Vec::new();
        for task in tasks {
            match task.await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => failures.push(err),
                Err(join_err) => failures.push(Box::new(join_err)),
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(MediatorError::PublishFailed {
                notification: kind,
                total,
                failures,
            })
        }
    }
}
