use std::sync::{Arc, Mutex};

use anyhow::{Result, bail};
use async_trait::async_trait;
use cache_invalidator::{
    OperationKind,
    proxy::{
        BanCapable, ClearCapable, FlushError, Headers, HostFilter, ProxyClient, ProxyKind,
        PurgeCapable, RefreshCapable, TagCapable,
    },
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Purge(String, Headers),
    Refresh(String, Headers),
    Ban(Headers),
    BanPath {
        path: String,
        content_type: Option<String>,
        hosts: HostFilter,
    },
    Tags(Vec<String>),
    Clear,
    Flush,
}

/// Proxy client recording every call, with a chosen set of capabilities
pub struct MockProxy {
    kind: ProxyKind,
    capabilities: Vec<OperationKind>,
    calls: Arc<Mutex<Vec<Call>>>,
    flush_result: Mutex<Option<Result<usize, FlushError>>>,
    reject_paths_containing: Option<String>,
}

impl MockProxy {
    pub fn new(capabilities: &[OperationKind]) -> Self {
        Self {
            kind: ProxyKind::Other,
            capabilities: capabilities.to_vec(),
            calls: Arc::new(Mutex::new(Vec::new())),
            flush_result: Mutex::new(None),
            reject_paths_containing: None,
        }
    }

    pub fn with_all_capabilities() -> Self {
        Self::new(&OperationKind::ALL)
    }

    pub fn without_capabilities() -> Self {
        Self::new(&[])
    }

    pub fn with_kind(mut self, kind: ProxyKind) -> Self {
        self.kind = kind;
        self
    }

    /// Make the next flush return this instead of the number of queued calls
    pub fn with_flush_result(self, result: Result<usize, FlushError>) -> Self {
        *self.flush_result.lock().unwrap() = Some(result);
        self
    }

    pub fn rejecting_paths_containing(mut self, needle: &str) -> Self {
        self.reject_paths_containing = Some(needle.to_string());
        self
    }

    /// Shared handle to the call log, usable after the proxy moved into an invalidator
    pub fn calls(&self) -> Arc<Mutex<Vec<Call>>> {
        self.calls.clone()
    }

    fn has(&self, kind: OperationKind) -> bool {
        self.capabilities.contains(&kind)
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl PurgeCapable for MockProxy {
    fn purge(&self, url: &str, headers: &Headers) -> Result<()> {
        if let Some(needle) = &self.reject_paths_containing {
            if url.contains(needle.as_str()) {
                bail!("refusing to purge {url}");
            }
        }
        self.record(Call::Purge(url.to_string(), headers.clone()));
        Ok(())
    }
}

impl RefreshCapable for MockProxy {
    fn refresh(&self, url: &str, headers: &Headers) -> Result<()> {
        self.record(Call::Refresh(url.to_string(), headers.clone()));
        Ok(())
    }
}

impl BanCapable for MockProxy {
    fn ban(&self, headers: &Headers) -> Result<()> {
        self.record(Call::Ban(headers.clone()));
        Ok(())
    }

    fn ban_path(&self, path: &str, content_type: Option<&str>, hosts: &HostFilter) -> Result<()> {
        self.record(Call::BanPath {
            path: path.to_string(),
            content_type: content_type.map(str::to_string),
            hosts: hosts.clone(),
        });
        Ok(())
    }
}

impl TagCapable for MockProxy {
    fn invalidate_tags(&self, tags: &[String]) -> Result<()> {
        self.record(Call::Tags(tags.to_vec()));
        Ok(())
    }
}

impl ClearCapable for MockProxy {
    fn clear(&self) -> Result<()> {
        self.record(Call::Clear);
        Ok(())
    }
}

#[async_trait]
impl ProxyClient for MockProxy {
    fn kind(&self) -> ProxyKind {
        self.kind
    }

    fn purger(&self) -> Option<&dyn PurgeCapable> {
        self.has(OperationKind::Path).then_some(self as &dyn PurgeCapable)
    }

    fn refresher(&self) -> Option<&dyn RefreshCapable> {
        self.has(OperationKind::Refresh)
            .then_some(self as &dyn RefreshCapable)
    }

    fn banner(&self) -> Option<&dyn BanCapable> {
        self.has(OperationKind::Invalidate)
            .then_some(self as &dyn BanCapable)
    }

    fn tagger(&self) -> Option<&dyn TagCapable> {
        self.has(OperationKind::Tags).then_some(self as &dyn TagCapable)
    }

    fn clearer(&self) -> Option<&dyn ClearCapable> {
        self.has(OperationKind::Clear).then_some(self as &dyn ClearCapable)
    }

    async fn flush(&self) -> Result<usize, FlushError> {
        let queued = {
            let mut calls = self.calls.lock().unwrap();
            let queued = calls
                .iter()
                .rev()
                .take_while(|call| **call != Call::Flush)
                .count();
            calls.push(Call::Flush);
            queued
        };

        let preset = self.flush_result.lock().unwrap().take();
        preset.unwrap_or(Ok(queued))
    }
}
