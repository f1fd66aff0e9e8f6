mod error;
mod noop;

use std::collections::BTreeMap;

use anyhow::Result;
use async_trait::async_trait;

pub use error::{
    FlushError, FlushFailures, ProxyFailure, ProxyResponseError, ProxyUnreachableError,
};
pub use noop::NoopProxy;

/// Extra request headers, or header name to regex pairs for bans
pub type Headers = BTreeMap<String, String>;

/// Caching proxy technology behind a client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyKind {
    Varnish,
    Nginx,
    /// Application-level HTTP cache running in front of the application
    HttpCache,
    Noop,
    Other,
}

/// Which hosts a path ban applies to
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum HostFilter {
    #[default]
    Any,
    List(Vec<String>),
    /// Regular expression matched against the host header
    Pattern(String),
}

pub trait PurgeCapable: Send + Sync {
    /// Queue a purge of a single url
    fn purge(&self, url: &str, headers: &Headers) -> Result<()>;
}

pub trait RefreshCapable: Send + Sync {
    /// Queue a refetch of a url, replacing the cached copy
    fn refresh(&self, url: &str, headers: &Headers) -> Result<()>;
}

pub trait BanCapable: Send + Sync {
    /// Queue a ban of every cached response whose headers match all the given regexes
    fn ban(&self, headers: &Headers) -> Result<()>;

    /// Queue a ban by path regex, optionally narrowed by content type and hosts
    fn ban_path(&self, path: &str, content_type: Option<&str>, hosts: &HostFilter) -> Result<()>;
}

pub trait TagCapable: Send + Sync {
    /// Queue invalidation of every response carrying one of the tags
    fn invalidate_tags(&self, tags: &[String]) -> Result<()>;
}

pub trait ClearCapable: Send + Sync {
    /// Queue removal of everything in the cache
    fn clear(&self) -> Result<()>;
}

/// Client for one caching proxy
///
/// Capabilities are declared by returning `Some` from the matching accessor.
/// Requests are queued and only sent on [`ProxyClient::flush`].
#[async_trait]
pub trait ProxyClient: Send + Sync {
    fn kind(&self) -> ProxyKind {
        ProxyKind::Other
    }

    fn purger(&self) -> Option<&dyn PurgeCapable> {
        None
    }

    fn refresher(&self) -> Option<&dyn RefreshCapable> {
        None
    }

    fn banner(&self) -> Option<&dyn BanCapable> {
        None
    }

    fn tagger(&self) -> Option<&dyn TagCapable> {
        None
    }

    fn clearer(&self) -> Option<&dyn ClearCapable> {
        None
    }

    /// Send all queued requests
    ///
    /// Returns the number of invalidation requests sent, or every failure that occurred.
    async fn flush(&self) -> Result<usize, FlushError>;
}
