//! Remote call error type for retry classification.

use std::fmt;

/// Error returned by a single remote control-plane call (start job, describe
/// job, etc.). Carries the provider's structured condition code when one was
/// reported, so classification can match on codes before falling back to
/// message text.
#[derive(Debug)]
pub struct RemoteError {
    code: Option<String>,
    message: String,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl RemoteError {
    /// An error with a structured provider condition code (e.g. "ThrottlingException").
    pub fn coded(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
            source: None,
        }
    }

    /// An error carrying only message text (no structured code).
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            source: None,
        }
    }

    /// Attach the underlying error (transport failure, SDK error, ...).
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Structured provider condition code, if the provider reported one.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Human-readable message text.
    pub fn text(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{}: {}", code, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for RemoteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_code_when_present() {
        let e = RemoteError::coded("ThrottlingException", "rate exceeded");
        assert_eq!(e.to_string(), "ThrottlingException: rate exceeded");
        assert_eq!(e.code(), Some("ThrottlingException"));
    }

    #[test]
    fn display_message_only() {
        let e = RemoteError::message("connection reset by peer");
        assert_eq!(e.to_string(), "connection reset by peer");
        assert!(e.code().is_none());
    }

    #[test]
    fn source_is_preserved() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out");
        let e = RemoteError::message("describe job failed").with_source(io);
        assert!(std::error::Error::source(&e).is_some());
    }
}
