//! Classify remote errors into retry policy error kinds.
//!
//! Two tables drive the classification and both live here so the vocabulary
//! can be reviewed and tested in one place: structured provider condition
//! codes first, then case-insensitive substring matching over message text
//! for errors that carry no code. Anything unmatched is `ErrorKind::Other`
//! and is not retried.

use crate::retry::error::RemoteError;
use crate::retry::policy::ErrorKind;

/// Provider condition codes that indicate a transient failure.
const RETRYABLE_CODES: &[(&str, ErrorKind)] = &[
    ("RequestLimitExceeded", ErrorKind::Throttled),
    ("Throttling", ErrorKind::Throttled),
    ("ThrottlingException", ErrorKind::Throttled),
    ("TooManyRequestsException", ErrorKind::Throttled),
    ("ProvisionedThroughputExceededException", ErrorKind::Throttled),
    ("ServiceUnavailable", ErrorKind::Unavailable),
    ("InternalServerError", ErrorKind::ServerError),
    ("InternalError", ErrorKind::ServerError),
];

/// Transient-failure phrases matched (lowercased) against message text when
/// the error has no structured code, or its code is unrecognized.
const RETRYABLE_PHRASES: &[(&str, ErrorKind)] = &[
    ("rate exceeded", ErrorKind::Throttled),
    ("rate limit", ErrorKind::Throttled),
    ("throttle", ErrorKind::Throttled),
    ("too many requests", ErrorKind::Throttled),
    ("service unavailable", ErrorKind::Unavailable),
    ("temporary failure", ErrorKind::Unavailable),
    ("timed out", ErrorKind::Timeout),
    ("timeout", ErrorKind::Timeout),
    ("connection refused", ErrorKind::Connection),
    ("connection reset", ErrorKind::Connection),
    ("no such host", ErrorKind::Connection),
    ("internal server error", ErrorKind::ServerError),
    ("bad gateway", ErrorKind::ServerError),
    ("gateway timeout", ErrorKind::ServerError),
    ("conflict", ErrorKind::Conflict),
    ("concurrent", ErrorKind::Conflict),
];

/// Classify a structured provider condition code.
pub fn classify_code(code: &str) -> ErrorKind {
    for (known, kind) in RETRYABLE_CODES {
        if code == *known {
            return *kind;
        }
    }
    ErrorKind::Other
}

/// Classify message text by case-insensitive substring match.
pub fn classify_message(message: &str) -> ErrorKind {
    let lower = message.to_lowercase();
    for (phrase, kind) in RETRYABLE_PHRASES {
        if lower.contains(phrase) {
            return *kind;
        }
    }
    ErrorKind::Other
}

/// Classify a remote error: structured code first, message text as fallback.
pub fn classify(e: &RemoteError) -> ErrorKind {
    if let Some(code) = e.code() {
        let kind = classify_code(code);
        if kind != ErrorKind::Other {
            return kind;
        }
    }
    classify_message(e.text())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn throttling_codes_retryable() {
        assert_eq!(classify_code("ThrottlingException"), ErrorKind::Throttled);
        assert_eq!(classify_code("RequestLimitExceeded"), ErrorKind::Throttled);
        assert_eq!(
            classify_code("ProvisionedThroughputExceededException"),
            ErrorKind::Throttled
        );
    }

    #[test]
    fn server_side_codes_retryable() {
        assert_eq!(classify_code("ServiceUnavailable"), ErrorKind::Unavailable);
        assert_eq!(classify_code("InternalServerError"), ErrorKind::ServerError);
        assert_eq!(classify_code("InternalError"), ErrorKind::ServerError);
    }

    #[test]
    fn authorization_and_validation_codes_fatal() {
        assert_eq!(classify_code("AccessDeniedException"), ErrorKind::Other);
        assert_eq!(classify_code("ValidationException"), ErrorKind::Other);
    }

    #[test]
    fn phrase_match_is_case_insensitive() {
        assert_eq!(classify_message("Rate Limit Exceeded"), ErrorKind::Throttled);
        assert_eq!(classify_message("Connection REFUSED"), ErrorKind::Connection);
        assert_eq!(classify_message("request Timed Out"), ErrorKind::Timeout);
    }

    #[test]
    fn unmatched_message_is_fatal() {
        assert_eq!(classify_message("invalid parameter value"), ErrorKind::Other);
        assert_eq!(classify_message("access denied"), ErrorKind::Other);
    }

    #[test]
    fn structured_code_wins_over_message() {
        let e = RemoteError::coded("ThrottlingException", "invalid parameter value");
        assert_eq!(classify(&e), ErrorKind::Throttled);
    }

    #[test]
    fn unknown_code_falls_back_to_message() {
        let e = RemoteError::coded("SomeNewException", "service unavailable, retry later");
        assert_eq!(classify(&e), ErrorKind::Unavailable);
    }

    #[test]
    fn conflict_phrases_retryable() {
        let e = RemoteError::message("ConcurrentModificationException: plan is being updated");
        assert_eq!(classify(&e), ErrorKind::Conflict);
    }
}
