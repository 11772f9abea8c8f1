//! Request and notification contracts.
//!
//! These are the marker abstractions domain types implement to become
//! dispatchable. The dispatcher never looks inside them; it only uses their
//! concrete runtime types to resolve handlers.

use std::any::Any;

/// A value whose processing yields exactly one typed response from exactly
/// one handler.
///
/// The concrete request type together with its [`Request::Response`] type
/// forms the capability key used to resolve the handler. Exactly one handler
/// per key may be registered.
///
/// # Example
///
/// ```ignore
/// struct CreateAccount {
///     name: String,
/// }
///
/// impl Request for CreateAccount {
///     type Response = String;
/// }
/// ```
pub trait Request: Send + 'static {
    /// The response produced by the handler bound to this request type.
    type Response: Send + 'static;
}

/// A value broadcast to zero or more independent handlers; no response.
///
/// `Any` is a supertrait so the concrete runtime type can be recovered from
/// a `dyn Notification`. That is what lets resolution use the most-derived
/// type even when the caller holds the value behind a trait-object
/// reference (see [`Mediator::publish_dyn`](crate::Mediator::publish_dyn)).
pub trait Notification: Any + Send + Sync {
    /// Name used in errors and logs.
    fn kind(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
