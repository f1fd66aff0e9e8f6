use std::fmt;

use thiserror::Error;

/// The caching proxy answered, but with an error status
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{status} error response \"{reason}\" from caching proxy at {host}")]
pub struct ProxyResponseError {
    pub host: String,
    pub status: u16,
    pub reason: String,
}

/// No response could be obtained from the caching proxy
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("request to caching proxy at {host} failed with message \"{reason}\"")]
pub struct ProxyUnreachableError {
    pub host: String,
    pub reason: String,
}

impl ProxyResponseError {
    pub fn new(host: impl Into<String>, status: u16, reason: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            status,
            reason: reason.into(),
        }
    }
}

impl ProxyUnreachableError {
    pub fn new(host: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            reason: reason.into(),
        }
    }
}

/// A single failed request inside a flush
#[derive(Debug, Error)]
pub enum ProxyFailure {
    #[error(transparent)]
    Response(#[from] ProxyResponseError),
    #[error(transparent)]
    Unreachable(#[from] ProxyUnreachableError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// All failures collected while flushing queued requests, in the order they happened
///
/// Always holds at least one failure; backends gather failures in [`FlushFailures`].
#[derive(Debug)]
pub struct FlushError {
    failures: Vec<ProxyFailure>,
}

#[allow(clippy::len_without_is_empty)]
impl FlushError {
    pub fn new(first: impl Into<ProxyFailure>) -> Self {
        Self {
            failures: vec![first.into()],
        }
    }

    /// `None` when there is nothing to report
    pub fn from_failures(failures: impl IntoIterator<Item = ProxyFailure>) -> Option<Self> {
        let failures: Vec<_> = failures.into_iter().collect();
        (!failures.is_empty()).then_some(Self { failures })
    }

    pub fn push(&mut self, failure: impl Into<ProxyFailure>) {
        self.failures.push(failure.into());
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn first(&self) -> &ProxyFailure {
        &self.failures[0]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProxyFailure> {
        self.failures.iter()
    }
}

/// Failures gathered by a backend while it sends queued requests
#[derive(Debug, Default)]
pub struct FlushFailures {
    failures: Vec<ProxyFailure>,
}

impl FlushFailures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, failure: impl Into<ProxyFailure>) {
        self.failures.push(failure.into());
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Finish a flush: `Ok(count)` when nothing failed, otherwise every failure
    pub fn into_result(self, count: usize) -> Result<usize, FlushError> {
        match FlushError::from_failures(self.failures) {
            None => Ok(count),
            Some(errors) => Err(errors),
        }
    }
}

impl fmt::Display for FlushError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.len() {
            1 => write!(f, "flush failed: {}", self.first()),
            n => write!(f, "flush failed with {n} errors, first: {}", self.first()),
        }
    }
}

impl std::error::Error for FlushError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.first())
    }
}

impl IntoIterator for FlushError {
    type Item = ProxyFailure;
    type IntoIter = std::vec::IntoIter<ProxyFailure>;

    fn into_iter(self) -> Self::IntoIter {
        self.failures.into_iter()
    }
}

impl<'a> IntoIterator for &'a FlushError {
    type Item = &'a ProxyFailure;
    type IntoIter = std::slice::Iter<'a, ProxyFailure>;

    fn into_iter(self) -> Self::IntoIter {
        self.failures.iter()
    }
}
