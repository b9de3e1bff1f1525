use std::fmt;

/// Failure reported by a page fetcher.
///
/// The loader treats every variant the same way (it records the error and
/// stops the current request). The variants exist so the view can decide how
/// to word the message or whether to offer a retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Transport-level failure: connection refused, DNS, TLS.
    Network(String),
    /// The server answered with a non-success status.
    Status { code: u16, message: String },
    /// The adapter gave up waiting for a response.
    Timeout,
    /// The response body could not be turned into a page.
    Decode(String),
    /// The request could not be issued at all, e.g. the runtime is gone.
    Unavailable(String),
}

impl FetchError {
    pub fn network(message: impl Into<String>) -> Self {
        FetchError::Network(message.into())
    }

    pub fn status(code: u16, message: impl Into<String>) -> Self {
        FetchError::Status {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Network(msg) => write!(f, "network error: {}", msg),
            FetchError::Status { code, message } => {
                write!(f, "server responded with {}: {}", code, message)
            }
            FetchError::Timeout => write!(f, "page request timed out"),
            FetchError::Decode(msg) => write!(f, "malformed page response: {}", msg),
            FetchError::Unavailable(msg) => write!(f, "page request not issued: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}

/// Rejected loader configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// `page_size` must be at least one.
    ZeroPageSize,
    /// `intersection_threshold` must be a finite fraction in `0.0..=1.0`.
    InvalidThreshold(f32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroPageSize => write!(f, "page size must be greater than zero"),
            ConfigError::InvalidThreshold(value) => write!(
                f,
                "intersection threshold {} is outside 0.0..=1.0",
                value
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
