use std::sync::{Arc, OnceLock};

use crate::{
    capability::OperationKind,
    config::Settings,
    error::InvalidatorError,
    events::{BroadcastDispatcher, EventDispatcher, ProxyErrorEvent, ProxyErrorLogger},
    proxy::{FlushError, Headers, HostFilter, ProxyClient, ProxyFailure, ProxyKind},
};

pub type Result<T, E = InvalidatorError> = std::result::Result<T, E>;

/// Entry point for invalidating cached content on one caching proxy
///
/// Requests are checked against what the proxy client supports and queued on it;
/// nothing is sent until [`CacheInvalidator::flush`].
pub struct CacheInvalidator {
    proxy: Box<dyn ProxyClient>,
    dispatcher: OnceLock<Arc<dyn EventDispatcher>>,
    logger: Option<ProxyErrorLogger>,
}

impl CacheInvalidator {
    pub fn new(proxy: impl ProxyClient + 'static) -> Self {
        Self {
            proxy: Box::new(proxy),
            dispatcher: OnceLock::new(),
            logger: None,
        }
    }

    /// Build an invalidator whose event channel uses the configured capacity
    ///
    /// Unlike [`CacheInvalidator::new`], the channel is already in place, so
    /// [`CacheInvalidator::set_event_dispatcher`] always fails on the result.
    /// With `log_proxy_errors` set and a tokio runtime available, flush errors are also logged
    /// until the invalidator is dropped, even if clones of the channel are still around.
    pub fn from_settings(proxy: impl ProxyClient + 'static, settings: &Settings) -> Self {
        let broadcast = BroadcastDispatcher::new(settings.event_capacity);

        let logger = match tokio::runtime::Handle::try_current() {
            Ok(_) if settings.log_proxy_errors => {
                Some(ProxyErrorLogger::spawn(broadcast.subscribe()))
            }
            Ok(_) => None,
            Err(_) => {
                if settings.log_proxy_errors {
                    tracing::warn!("No tokio runtime, proxy errors will not be logged");
                }
                None
            }
        };

        let dispatcher: Arc<dyn EventDispatcher> = Arc::new(broadcast);

        Self {
            proxy: Box::new(proxy),
            dispatcher: OnceLock::from(dispatcher),
            logger,
        }
    }

    /// Whether a background task is logging flush errors
    pub fn is_logging_errors(&self) -> bool {
        self.logger.as_ref().is_some_and(|logger| !logger.is_finished())
    }

    pub fn proxy_kind(&self) -> ProxyKind {
        self.proxy.kind()
    }

    /// Whether the proxy client can handle the given kind of invalidation
    pub fn supports(&self, kind: OperationKind) -> bool {
        match kind {
            OperationKind::Path => self.proxy.purger().is_some(),
            OperationKind::Refresh => self.proxy.refresher().is_some(),
            OperationKind::Invalidate => self.proxy.banner().is_some(),
            OperationKind::Tags => {
                self.proxy.tagger().is_some()
                    && (self.proxy.kind() != ProxyKind::HttpCache
                        || http_cache_tag_store_available())
            }
            OperationKind::Clear => self.proxy.clearer().is_some(),
        }
    }

    /// Like [`CacheInvalidator::supports`], for kinds given by name
    pub fn supports_named(&self, kind: &str) -> Result<bool> {
        let kind: OperationKind = kind.parse()?;
        Ok(self.supports(kind))
    }

    /// Use a custom event channel
    ///
    /// Must be called before anything reads the channel, otherwise the default is already in place.
    pub fn set_event_dispatcher(&self, dispatcher: Arc<dyn EventDispatcher>) -> Result<()> {
        self.dispatcher
            .set(dispatcher)
            .map_err(|_| InvalidatorError::ChannelAlreadySet)
    }

    /// The event channel, created with default settings on first use
    pub fn event_dispatcher(&self) -> Arc<dyn EventDispatcher> {
        self.dispatcher
            .get_or_init(|| Arc::new(BroadcastDispatcher::default()))
            .clone()
    }

    pub fn invalidate_path(&self, path: &str) -> Result<&Self> {
        self.invalidate_path_with_headers(path, &Headers::new())
    }

    /// Purge a single path
    pub fn invalidate_path_with_headers(&self, path: &str, headers: &Headers) -> Result<&Self> {
        let Some(purger) = self.proxy.purger() else {
            return Err(self.unsupported("PURGE"));
        };

        tracing::debug!(path, "Queueing purge");
        purger.purge(path, headers)?;

        Ok(self)
    }

    pub fn refresh_path(&self, path: &str) -> Result<&Self> {
        self.refresh_path_with_headers(path, &Headers::new())
    }

    /// Refetch a path so the cache holds a fresh copy
    pub fn refresh_path_with_headers(&self, path: &str, headers: &Headers) -> Result<&Self> {
        let Some(refresher) = self.proxy.refresher() else {
            return Err(self.unsupported("REFRESH"));
        };

        tracing::debug!(path, "Queueing refresh");
        refresher.refresh(path, headers)?;

        Ok(self)
    }

    /// Ban every cached response whose headers match all the given regexes
    pub fn invalidate(&self, headers: &Headers) -> Result<&Self> {
        let Some(banner) = self.proxy.banner() else {
            return Err(self.unsupported("BAN"));
        };

        tracing::debug!(?headers, "Queueing ban");
        banner.ban(headers)?;

        Ok(self)
    }

    /// Invalidate everything tagged with any of the tags
    ///
    /// An empty tag list does nothing, even if the proxy cannot handle tags.
    pub fn invalidate_tags(&self, tags: &[String]) -> Result<&Self> {
        if tags.is_empty() {
            return Ok(self);
        }

        let Some(tagger) = self.proxy.tagger() else {
            return Err(self.unsupported("Tags"));
        };

        tracing::debug!(?tags, "Queueing tag invalidation");
        tagger.invalidate_tags(tags)?;

        Ok(self)
    }

    /// Ban by path regex, optionally only for a content type regex and some hosts
    pub fn invalidate_regex(
        &self,
        path: &str,
        content_type: Option<&str>,
        hosts: &HostFilter,
    ) -> Result<&Self> {
        let Some(banner) = self.proxy.banner() else {
            return Err(self.unsupported("BAN"));
        };

        tracing::debug!(path, content_type, ?hosts, "Queueing path ban");
        banner.ban_path(path, content_type, hosts)?;

        Ok(self)
    }

    pub fn clear_cache(&self) -> Result<&Self> {
        let Some(clearer) = self.proxy.clearer() else {
            return Err(self.unsupported("CLEAR"));
        };

        tracing::debug!("Queueing cache clear");
        clearer.clear()?;

        Ok(self)
    }

    /// Send all queued requests to the proxy
    ///
    /// Returns the number of invalidations sent. On failure every proxy response or
    /// unreachable error is dispatched as an event before the collection is returned.
    #[tracing::instrument(name = "invalidator::flush", skip(self), fields(proxy = ?self.proxy.kind()))]
    pub async fn flush(&self) -> Result<usize, FlushError> {
        match self.proxy.flush().await {
            Ok(count) => {
                tracing::debug!(count, "Flushed invalidation requests");
                Ok(count)
            }
            Err(errors) => {
                let dispatcher = self.event_dispatcher();

                for failure in &errors {
                    match failure {
                        ProxyFailure::Response(e) => {
                            dispatcher.dispatch(ProxyErrorEvent::from(e.clone()))
                        }
                        ProxyFailure::Unreachable(e) => {
                            dispatcher.dispatch(ProxyErrorEvent::from(e.clone()))
                        }
                        ProxyFailure::Other(e) => {
                            tracing::debug!(error = %e, "Flush failure has no event, passing through");
                        }
                    }
                }

                tracing::warn!(failures = errors.len(), "Flush failed");
                Err(errors)
            }
        }
    }

    fn unsupported(&self, verb: &'static str) -> InvalidatorError {
        tracing::warn!(verb, proxy = ?self.proxy.kind(), "Proxy client does not support request");
        InvalidatorError::Unsupported(verb)
    }
}

/// The application-level HTTP cache can only handle tags with its companion tag store
fn http_cache_tag_store_available() -> bool {
    cfg!(feature = "http-cache-tags")
}
