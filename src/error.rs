use thiserror::Error;

use crate::proxy::FlushError;

#[derive(Debug, Error)]
pub enum InvalidatorError {
    #[error("unknown invalidation kind \"{0}\"")]
    InvalidArgument(String),
    #[error("caching proxy does not support {0} requests")]
    Unsupported(&'static str),
    #[error("event dispatcher is already set, set it right after constructing the invalidator")]
    ChannelAlreadySet,
    #[error("proxy client rejected the request: {0}")]
    Proxy(anyhow::Error),
    #[error(transparent)]
    Flush(#[from] FlushError),
}

impl From<anyhow::Error> for InvalidatorError {
    fn from(error: anyhow::Error) -> Self {
        Self::Proxy(error)
    }
}
