//! # mediator
//!
//! In-process request/response and publish/subscribe dispatcher.
//!
//! Callers submit a typed request and receive a typed response from exactly
//! one registered handler, or publish a notification that is broadcast to
//! every handler bound to its type (zero handlers is a no-op). Handlers are
//! resolved by the concrete runtime type of the dispatched value, so one
//! [`Mediator`] serves any number of request and notification shapes with no
//! per-type code.
//!
//! ## Architecture
//!
//! - **Contracts** ([`Request`], [`Notification`]): markers domain types
//!   implement to become dispatchable.
//! - **Handlers** ([`RequestHandler`], [`NotificationHandler`]): the async
//!   capability traits, stored type-erased inside the registry.
//! - **Registry** ([`HandlerRegistry`]): built once at startup by the
//!   composition root; the mediator borrows it through [`HandlerLookup`]
//!   and only ever reads it.
//! - **Dispatch** ([`Mediator`]): `send` routes to the one bound handler;
//!   `publish` fans out to all bound handlers concurrently and aggregates
//!   failures after every handler has settled.
//!
//! ## Example
//!
//! ```ignore
//! use mediator::{HandlerRegistry, Mediator, Request};
//!
//! struct CreateAccount {
//!     name: String,
//! }
//!
//! impl Request for CreateAccount {
//!     type Response = String;
//! }
//!
//! #[tokio::main]
//! async fn main() -> mediator::Result<()> {
//!     let mut registry = HandlerRegistry::new();
//!     registry.register_request_fn(|request: CreateAccount, _cancellation| async move {
//!         format!("{} created", request.name)
//!     })?;
//!
//!     let mediator = Mediator::new(&registry);
//!     let reply = mediator.send(CreateAccount { name: "A".into() }).await?;
//!     assert_eq!(reply, "A created");
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod handler;
pub mod message;

mod mediator;

pub use error::{HandlerError, MediatorError, Result};
pub use handler::{
    HandlerLookup, HandlerRegistry, NotificationHandler, RequestHandler, RequestKey,
};
pub use mediator::Mediator;
pub use message::{Notification, Request};
