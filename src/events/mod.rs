mod broadcast;
mod logger;

use time::OffsetDateTime;

use crate::proxy::{ProxyResponseError, ProxyUnreachableError};

pub use broadcast::{BroadcastDispatcher, DEFAULT_CAPACITY, MAX_CAPACITY};
pub use logger::ProxyErrorLogger;

pub const PROXY_RESPONSE_ERROR: &str = "cache_invalidator.error.response";
pub const PROXY_UNREACHABLE_ERROR: &str = "cache_invalidator.error.proxy_unreachable";

/// Receives events raised while flushing
pub trait EventDispatcher: Send + Sync {
    fn dispatch(&self, event: ProxyErrorEvent);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyErrorKind {
    Response(ProxyResponseError),
    Unreachable(ProxyUnreachableError),
}

/// A failed proxy request reported during flush
#[derive(Debug, Clone)]
pub struct ProxyErrorEvent {
    pub error: ProxyErrorKind,
    pub dispatched_at: OffsetDateTime,
}

impl ProxyErrorEvent {
    pub fn new(error: ProxyErrorKind) -> Self {
        Self {
            error,
            dispatched_at: OffsetDateTime::now_utc(),
        }
    }

    /// Name subscribers filter on
    pub fn name(&self) -> &'static str {
        match self.error {
            ProxyErrorKind::Response(_) => PROXY_RESPONSE_ERROR,
            ProxyErrorKind::Unreachable(_) => PROXY_UNREACHABLE_ERROR,
        }
    }

    pub fn host(&self) -> &str {
        match &self.error {
            ProxyErrorKind::Response(e) => &e.host,
            ProxyErrorKind::Unreachable(e) => &e.host,
        }
    }
}

impl From<ProxyResponseError> for ProxyErrorEvent {
    fn from(error: ProxyResponseError) -> Self {
        Self::new(ProxyErrorKind::Response(error))
    }
}

impl From<ProxyUnreachableError> for ProxyErrorEvent {
    fn from(error: ProxyUnreachableError) -> Self {
        Self::new(ProxyErrorKind::Unreachable(error))
    }
}
