use thiserror::Error;

/// Errors raised by a page session implementation.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("browser command failed: {0}")]
    Command(String),

    #[error("script evaluation failed: {0}")]
    Evaluation(String),

    #[error("no response returned for {0}")]
    NoResponse(String),

    #[error("no such element at index {0}")]
    NoSuchElement(usize),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Errors that abort a single page visit. The explorer catches these,
/// records a degraded result, and keeps crawling.
#[derive(Error, Debug)]
pub enum AuditError {
    #[error("navigation to {url} failed: {source}")]
    Navigation {
        url: String,
        #[source]
        source: SessionError,
    },

    #[error("unsupported scheme for {0}: only http/https can be audited")]
    UnsupportedScheme(String),

    #[error("page deadline of {seconds}s exceeded for {url}")]
    DeadlineExceeded { url: String, seconds: u64 },

    #[error("session error: {0}")]
    Session(#[from] SessionError),
}

pub type Result<T> = std::result::Result<T, AuditError>;
