use std::{fmt, str::FromStr};

use crate::error::InvalidatorError;

/// Kinds of invalidation a caching proxy may support
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Path,
    Refresh,
    Invalidate,
    Tags,
    Clear,
}

impl OperationKind {
    pub const ALL: [OperationKind; 5] = [
        OperationKind::Path,
        OperationKind::Refresh,
        OperationKind::Invalidate,
        OperationKind::Tags,
        OperationKind::Clear,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Path => "path",
            OperationKind::Refresh => "refresh",
            OperationKind::Invalidate => "invalidate",
            OperationKind::Tags => "tags",
            OperationKind::Clear => "clear",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationKind {
    type Err = InvalidatorError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        OperationKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == input)
            .ok_or_else(|| InvalidatorError::InvalidArgument(input.to_string()))
    }
}
