// MIT License - Copyright (c) 2026 adt2mqtt authors

/// All errors that can occur in the panel bridge library.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// The HTTP request could not complete (DNS, connect, TLS, timeout).
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The SmartThings API answered with a non-success status.
    #[error("API returned HTTP {status}")]
    Http { status: u16 },

    /// The response body did not have the expected JSON shape.
    #[error("unexpected response body: {details}")]
    UnexpectedBody { details: String },

    /// The panel reported a security-system status outside the known
    /// vocabulary (armedStay / armedAway / disarmed).
    #[error("unknown security system status {value:?}")]
    UnknownStatus { value: String },

    /// The host requested a target state outside the 0-3 code range.
    #[error("target state {code} out of range")]
    TargetOutOfRange { code: i64 },

    /// A required device configuration field is missing or empty.
    #[error("missing or empty device config field: {field}")]
    MissingConfigField { field: &'static str },
}

impl BridgeError {
    /// Whether this error is transient. Nothing in the bridge retries;
    /// callers use this only to pick a log level.
    pub fn is_retryable(&self) -> bool {
        match self {
            BridgeError::Network(_) => true,
            BridgeError::Http { status } => *status >= 500,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_errors_are_retryable() {
        assert!(BridgeError::Http { status: 500 }.is_retryable());
        assert!(BridgeError::Http { status: 503 }.is_retryable());
        assert!(!BridgeError::Http { status: 401 }.is_retryable());
        assert!(!BridgeError::Http { status: 404 }.is_retryable());
    }

    #[test]
    fn test_adapter_errors_are_not_retryable() {
        assert!(!BridgeError::UnknownStatus { value: "armedNight".into() }.is_retryable());
        assert!(!BridgeError::TargetOutOfRange { code: 4 }.is_retryable());
        assert!(!BridgeError::MissingConfigField { field: "api_key" }.is_retryable());
    }
}
