//! Invalidation of HTTP caches behind a single, proxy-agnostic entry point.
//!
//! A [`CacheInvalidator`] wraps one [`proxy::ProxyClient`], checks each request against
//! what the client supports, and reports flush failures through an event channel.

pub mod capability;
pub mod config;
pub mod error;
pub mod events;
pub mod invalidator;
pub mod proxy;

pub use capability::OperationKind;
pub use error::InvalidatorError;
pub use invalidator::CacheInvalidator;
