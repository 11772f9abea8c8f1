//! Typed handler traits and the object-safe dispatch layer.
//!
//! Handler implementations are generic over their request or notification
//! type. The registry stores them behind the object-safe
//! [`DynRequestHandler`] / [`DynNotificationHandler`] traits; the wrapper
//! structs here perform the `Any` downcasts that cross that boundary, so
//! nothing outside this module touches an untyped value.

use std::any::{type_name, Any};
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::{HandlerError, MediatorError};
use crate::message::{Notification, Request};

/// Boxed future for erased handler results.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Processes one request type, producing its declared response.
///
/// The response is handed back to the `send` caller unwrapped and
/// untransformed; if the domain wants fallible handling, it puts a `Result`
/// in [`Request::Response`].
#[async_trait]
pub trait RequestHandler<R: Request>: Send + Sync {
    /// Handle the request.
    ///
    /// The cancellation token is forwarded from the caller unchanged and is
    /// advisory: reacting to it is this handler's responsibility.
    async fn handle(&self, request: R, cancellation: CancellationToken) -> R::Response;
}

/// Consumes one notification type.
///
/// All handlers bound to a notification run independently and concurrently;
/// a failure here never stops a sibling, it only joins the aggregate error
/// the publisher sees. The notification arrives as an `Arc` because every
/// handler observes the same instance.
#[async_trait]
pub trait NotificationHandler<N: Notification>: Send + Sync {
    /// Consume the notification.
    async fn handle(
        &self,
        notification: Arc<N>,
        cancellation: CancellationToken,
    ) -> Result<(), HandlerError>;
}

/// Object-safe request dispatch entry point.
pub trait DynRequestHandler: Send + Sync {
    /// Invoke with a boxed request; yields a boxed response.
    ///
    /// A shape mismatch on the request side is a
    /// [`MediatorError::ContractViolation`]; the response side is checked by
    /// the caller after the downcast back to the declared response type.
    fn call(
        &self,
        request: Box<dyn Any + Send>,
        cancellation: CancellationToken,
    ) -> BoxFuture<'static, Result<Box<dyn Any + Send>, MediatorError>>;

    /// Request type this handler is bound to.
    fn request_type(&self) -> &'static str;
}

/// Object-safe notification dispatch entry point.
pub trait DynNotificationHandler: Send + Sync {
    /// Invoke with a shared notification value.
    ///
    /// Returns `None` when the value is not this handler's notification
    /// type. Publish skips such bindings instead of failing; see
    /// [`Mediator::publish`](crate::Mediator::publish) for why that laxity
    /// is intentional.
    fn call(
        &self,
        notification: Arc<dyn Any + Send + Sync>,
        cancellation: CancellationToken,
    ) -> Option<BoxFuture<'static, Result<(), HandlerError>>>;

    /// Notification type this handler is bound to.
    fn notification_type(&self) -> &'static str;
}

/// Wrapper that downcasts a boxed request before calling the typed handler.
pub(crate) struct TypedRequestHandler<R, H> {
    handler: Arc<H>,
    _marker: PhantomData<fn(R)>,
}

impl<R, H> TypedRequestHandler<R, H>
where
    R: Request,
    H: RequestHandler<R> + 'static,
{
    pub(crate) fn new(handler: H) -> Self {
        Self {
            handler: Arc::new(handler),
            _marker: PhantomData,
        }
    }
}

impl<R, H> DynRequestHandler for TypedRequestHandler<R, H>
where
    R: Request,
    H: RequestHandler<R> + 'static,
{
    fn call(
        &self,
        request: Box<dyn Any + Send>,
        cancellation: CancellationToken,
    ) -> BoxFuture<'static, Result<Box<dyn Any + Send>, MediatorError>> {
        let request = match request.downcast::<R>() {
            Ok(request) => *request,
            Err(_) => {
                return Box::pin(async {
                    Err(MediatorError::ContractViolation {
                        message_type: type_name::<R>(),
                        reason: "request value does not match the handler's request type",
                    })
                })
            }
        };

        let handler = Arc::clone(&self.handler);
        Box::pin(async move {
            let response = handler.handle(request, cancellation).await;
            Ok(Box::new(response) as Box<dyn Any + Send>)
        })
    }

    fn request_type(&self) -> &'static str {
        type_name::<R>()
    }
}

/// Wrapper that downcasts a shared notification before calling the typed
/// handler.
pub(crate) struct TypedNotificationHandler<N, H> {
    handler: Arc<H>,
    _marker: PhantomData<fn(N)>,
}

impl<N, H> TypedNotificationHandler<N, H>
where
    N: Notification,
    H: NotificationHandler<N> + 'static,
{
    pub(crate) fn new(handler: H) -> Self {
        Self {
            handler: Arc::new(handler),
            _marker: PhantomData,
        }
    }
}

impl<N, H> DynNotificationHandler for TypedNotificationHandler<N, H>
where
    N: Notification,
    H: NotificationHandler<N> + 'static,
{
    fn call(
        &self,
        notification: Arc<dyn Any + Send + Sync>,
        cancellation: CancellationToken,
    ) -> Option<BoxFuture<'static, Result<(), HandlerError>>> {
        // Wrong concrete type behind the binding: signal "skip" to publish.
        let notification = notification.downcast::<N>().ok()?;

        let handler = Arc::clone(&self.handler);
        Some(Box::pin(async move {
            handler.handle(notification, cancellation).await
        }))
    }

    fn notification_type(&self) -> &'static str {
        type_name::<N>()
    }
}

/// Adapts an async closure to [`RequestHandler`].
pub(crate) struct FnRequestHandler<F, R, Fut> {
    handler: F,
    _marker: PhantomData<fn(R) -> Fut>,
}

impl<F, R, Fut> FnRequestHandler<F, R, Fut>
where
    R: Request,
    F: Fn(R, CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R::Response> + Send + 'static,
{
    pub(crate) fn new(handler: F) -> Self {
        Self {
            handler,
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<F, R, Fut> RequestHandler<R> for FnRequestHandler<F, R, Fut>
where
    R: Request,
    F: Fn(R, CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R::Response> + Send + 'static,
{
    async fn handle(&self, request: R, cancellation: CancellationToken) -> R::Response {
        (self.handler)(request, cancellation).await
    }
}

/// Adapts an async closure to [`NotificationHandler`].
pub(crate) struct FnNotificationHandler<F, N, Fut> {
    handler: F,
    _marker: PhantomData<fn(N) -> Fut>,
}

impl<F, N, Fut> FnNotificationHandler<F, N, Fut>
where
    N: Notification,
    F: Fn(Arc<N>, CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
{
    pub(crate) fn new(handler: F) -> Self {
        Self {
            handler,
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<F, N, Fut> NotificationHandler<N> for FnNotificationHandler<F, N, Fut>
where
    N: Notification,
    F: Fn(Arc<N>, CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
{
    async fn handle(
        &self,
        notification: Arc<N>,
        cancellation: CancellationToken,
    ) -> Result<(), HandlerError> {
        (self.handler)(notification, cancellation).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ping;

    impl Request for Ping {
        type Response = &'static str;
    }

    struct PingHandler;

    #[async_trait]
    impl RequestHandler<Ping> for PingHandler {
        async fn handle(&self, _request: Ping, _cancellation: CancellationToken) -> &'static str {
            "pong"
        }
    }

    struct Tick;

    impl Notification for Tick {}

    struct Tock;

    impl Notification for Tock {}

    struct TickHandler;

    #[async_trait]
    impl NotificationHandler<Tick> for TickHandler {
        async fn handle(
            &self,
            _notification: Arc<Tick>,
            _cancellation: CancellationToken,
        ) -> Result<(), HandlerError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn typed_request_handler_round_trips_through_the_erased_boundary() {
        let erased = TypedRequestHandler::new(PingHandler);

        let response = erased
            .call(Box::new(Ping), CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(*response.downcast::<&'static str>().unwrap(), "pong");
    }

    #[tokio::test]
    async fn typed_request_handler_rejects_a_mismatched_request_value() {
        let erased = TypedRequestHandler::new(PingHandler);

        let result = erased
            .call(Box::new("not a ping"), CancellationToken::new())
            .await;

        assert!(matches!(
            result,
            Err(MediatorError::ContractViolation { .. })
        ));
    }

    #[tokio::test]
    async fn typed_notification_handler_skips_a_mismatched_notification() {
        let erased = TypedNotificationHandler::new(TickHandler);

        let wrong: Arc<dyn Any + Send + Sync> = Arc::new(Tock);
        assert!(erased.call(wrong, CancellationToken::new()).is_none());

        let right: Arc<dyn Any + Send + Sync> = Arc::new(Tick);
        let invocation = erased.call(right, CancellationToken::new()).unwrap();
        assert!(invocation.await.is_ok());
    }
}
