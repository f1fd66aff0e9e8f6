use anyhow::Result;
use async_trait::async_trait;

use super::{
    BanCapable, ClearCapable, FlushError, Headers, HostFilter, ProxyClient, ProxyKind,
    PurgeCapable, RefreshCapable, TagCapable,
};

/// Proxy client that accepts every request and sends nothing
///
/// Used where no caching proxy is deployed, e.g. local development.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProxy;

impl PurgeCapable for NoopProxy {
    fn purge(&self, _url: &str, _headers: &Headers) -> Result<()> {
        Ok(())
    }
}

impl RefreshCapable for NoopProxy {
    fn refresh(&self, _url: &str, _headers: &Headers) -> Result<()> {
        Ok(())
    }
}

impl BanCapable for NoopProxy {
    fn ban(&self, _headers: &Headers) -> Result<()> {
        Ok(())
    }

    fn ban_path(&self, _path: &str, _content_type: Option<&str>, _hosts: &HostFilter) -> Result<()> {
        Ok(())
    }
}

impl TagCapable for NoopProxy {
    fn invalidate_tags(&self, _tags: &[String]) -> Result<()> {
        Ok(())
    }
}

impl ClearCapable for NoopProxy {
    fn clear(&self) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl ProxyClient for NoopProxy {
    fn kind(&self) -> ProxyKind {
        ProxyKind::Noop
    }

    fn purger(&self) -> Option<&dyn PurgeCapable> {
        Some(self)
    }

    fn refresher(&self) -> Option<&dyn RefreshCapable> {
        Some(self)
    }

    fn banner(&self) -> Option<&dyn BanCapable> {
        Some(self)
    }

    fn tagger(&self) -> Option<&dyn TagCapable> {
        Some(self)
    }

    fn clearer(&self) -> Option<&dyn ClearCapable> {
        Some(self)
    }

    async fn flush(&self) -> Result<usize, FlushError> {
        Ok(0)
    }
}
