use std::time::Duration;

use thiserror::Error;

/// Failure of a whole `fetch_all` call against the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("failed to reach campaign store: {0}")]
    Transport(String),
    #[error("campaign store returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid campaign payload: {0}")]
    Decode(String),
    #[error("campaign fetch timed out after {0:?}")]
    Timeout(Duration),
    #[error("campaign fetch cancelled")]
    Cancelled,
    #[error("invalid campaign store url: {0}")]
    InvalidStoreUrl(String),
}

impl FetchError {
    /// Cancellation is caller initiated and is not reported to the user.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Counter column named in a [`MalformedRecord::NegativeCounter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterField {
    Audience,
    Delivered,
    Opened,
}

impl std::fmt::Display for CounterField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Audience => "audience",
            Self::Delivered => "delivered",
            Self::Opened => "opened",
        };
        f.write_str(name)
    }
}

/// A single store row that could not be turned into a `Campaign`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedRecord {
    #[error("row does not match the campaign shape: {0}")]
    InvalidShape(String),
    #[error("row has an empty id")]
    MissingId,
    #[error("unknown campaign status '{0}'")]
    UnknownStatus(String),
    #[error("{field} is negative ({value})")]
    NegativeCounter { field: CounterField, value: i64 },
    #[error("delivered ({delivered}) exceeds audience ({audience})")]
    DeliveredExceedsAudience { audience: u64, delivered: u64 },
    #[error("opened ({opened}) exceeds delivered ({delivered})")]
    OpenedExceedsDelivered { delivered: u64, opened: u64 },
    #[error("invalid createdat timestamp '{0}'")]
    InvalidTimestamp(String),
}
