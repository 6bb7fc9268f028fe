/// Normalized cause of a failed exchange, independent of the HTTP library that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Redirect loop or redirect budget exceeded.
    TooManyRedirects,
    /// URL scheme the transport cannot speak (e.g. `ftp`).
    UnsupportedScheme,
    /// The peer certificate chain failed verification.
    CertificateVerification,
    /// The peer certificate was issued by an unknown authority.
    UnknownAuthority,
    /// The body exceeded the transport's size cap.
    ResponseTooLarge,
    Timeout,
    Connect,
    /// The caller cancelled the request.
    Cancelled,
    /// The caller's deadline passed.
    DeadlineExceeded,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct TransportError {
    pub kind: ErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Other, message)
    }

    pub fn cancelled() -> Self {
        Self::new(ErrorKind::Cancelled, "request cancelled")
    }

    pub fn deadline_exceeded() -> Self {
        Self::new(ErrorKind::DeadlineExceeded, "request deadline exceeded")
    }
}
