//! Handler registry - capability keys and handler lookup.
//!
//! The registry maps capability keys (concrete request/notification types)
//! to handler objects. Bindings are added during startup and read-only
//! afterwards; the dispatcher only ever reads them, through the
//! [`HandlerLookup`] trait.
//!
//! # Example
//!
//! ```ignore
//! use mediator::{HandlerRegistry, Mediator};
//!
//! let mut registry = HandlerRegistry::new();
//! registry.register_request(CreateAccountHandler)?;
//! registry.register_notification::<AccountCreated, _>(EmailSender);
//!
//! let mediator = Mediator::new(&registry);
//! ```

use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::erased::{
    FnNotificationHandler, FnRequestHandler, TypedNotificationHandler, TypedRequestHandler,
};
use super::{DynNotificationHandler, DynRequestHandler, NotificationHandler, RequestHandler};
use crate::error::{HandlerError, MediatorError, Result};
use crate::message::{Notification, Request};

/// Capability key for request handlers: the concrete request type paired
/// with the response type its contract declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestKey {
    request: TypeId,
    response: TypeId,
}

impl RequestKey {
    /// Key for a request type.
    pub fn of<R: Request>() -> Self {
        Self {
            request: TypeId::of::<R>(),
            response: TypeId::of::<R::Response>(),
        }
    }
}

/// Read-only lookup capability the dispatcher consumes.
///
/// This is the sole boundary between the dispatch core and whatever wires
/// the bindings. [`HandlerRegistry`] is the in-crate implementation, but
/// [`Mediator`](crate::Mediator) never depends on more than this trait.
pub trait HandlerLookup: Send + Sync {
    /// The one handler bound to a request capability key, if any.
    fn resolve_one(&self, key: RequestKey) -> Option<Arc<dyn DynRequestHandler>>;

    /// Every handler bound to a notification type, in registration order.
    ///
    /// Empty when nothing is bound. Callers must not rely on more than
    /// "each bound handler appears exactly once".
    fn resolve_all(&self, notification: TypeId) -> Vec<Arc<dyn DynNotificationHandler>>;
}

/// Registry mapping capability keys to handler objects.
///
/// Owned by the composition root; the mediator borrows it for the duration
/// of a logical scope. All registration happens before dispatch starts, so
/// lookups need no locking.
#[derive(Default)]
pub struct HandlerRegistry {
    requests: HashMap<RequestKey, Arc<dyn DynRequestHandler>>,
    notifications: HashMap<TypeId, Vec<Arc<dyn DynNotificationHandler>>>,
}

impl HandlerRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a request handler.
    ///
    /// Each request capability key takes exactly one handler; a second
    /// binding for the same key is rejected with
    /// [`MediatorError::DuplicateRequestHandler`].
    pub fn register_request<R, H>(&mut self, handler: H) -> Result<()>
    where
        R: Request,
        H: RequestHandler<R> + 'static,
    {
        let key = RequestKey::of::<R>();
        if self.requests.contains_key(&key) {
            return Err(MediatorError::DuplicateRequestHandler(type_name::<R>()));
        }
        self.requests
            .insert(key, Arc::new(TypedRequestHandler::new(handler)));
        Ok(())
    }

    /// Bind an async closure as a request handler.
    ///
    /// The closure receives the request and the caller's cancellation token,
    /// exactly like [`RequestHandler::handle`].
    pub fn register_request_fn<R, F, Fut>(&mut self, handler: F) -> Result<()>
    where
        R: Request,
        F: Fn(R, CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R::Response> + Send + 'static,
    {
        self.register_request(FnRequestHandler::new(handler))
    }

    /// Bind a notification handler.
    ///
    /// Any number of handlers may share a notification type; resolution
    /// order follows registration order.
    pub fn register_notification<N, H>(&mut self, handler: H)
    where
        N: Notification,
        H: NotificationHandler<N> + 'static,
    {
        self.notifications
            .entry(TypeId::of::<N>())
            .or_default()
            .push(Arc::new(TypedNotificationHandler::new(handler)));
    }

    /// Bind an async closure as a notification handler.
    pub fn register_notification_fn<N, F, Fut>(&mut self, handler: F)
    where
        N: Notification,
        F: Fn(Arc<N>, CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<(), HandlerError>> + Send + 'static,
    {
        self.register_notification(FnNotificationHandler::new(handler))
    }
}

impl HandlerLookup for HandlerRegistry {
    fn resolve_one(&self, key: RequestKey) -> Option<Arc<dyn DynRequestHandler>> {
        self.requests.get(&key).cloned()
    }

    fn resolve_all(&self, notification: TypeId) -> Vec<Arc<dyn DynNotificationHandler>> {
        self.notifications
            .get(&notification)
            .cloned()
            .unwrap_or_default()
    }
}
