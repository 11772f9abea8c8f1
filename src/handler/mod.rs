//! Handler module - capability traits, type erasure, and the registry.
//!
//! Provides:
//! - [`RequestHandler`] / [`NotificationHandler`] - the typed capability traits
//! - [`HandlerRegistry`] - maps capability keys to handler objects
//! - [`HandlerLookup`] - the lookup seam the dispatcher consumes
//!
//! # Example
//!
//! ```ignore
//! use mediator::handler::HandlerRegistry;
//!
//! let mut registry = HandlerRegistry::new();
//!
//! // Register a request handler from a closure
//! registry.register_request_fn(|request: CreateAccount, _cancellation| async move {
//!     format!("{} created", request.name)
//! })?;
//!
//! // Register a notification handler from a closure
//! registry.register_notification_fn(|event: Arc<AccountCreated>, _cancellation| async move {
//!     println!("welcome, {}", event.name);
//!     Ok(())
//! });
//! ```

mod erased;
mod registry;

pub use erased::{
    BoxFuture, DynNotificationHandler, DynRequestHandler, NotificationHandler, RequestHandler,
};
pub use registry::{HandlerLookup, HandlerRegistry, RequestKey};
