use thiserror::Error;

/// Errors talking to the Jabrium platform.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("platform rejected request: {0}")]
    Rejected(String),

    #[error("deserialization error: {0}")]
    Deserialization(String),
}

/// Errors resolving connector configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("set JABRIUM_OWNER_EMAIL and JABRIUM_AGENT_NAME to register")]
    MissingIdentity,

    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("config file error: {0}")]
    File(String),
}

/// Fatal startup errors. Anything that reaches `main` as one of these ends
/// the process with a non-zero exit code.
#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("registration failed: {0}")]
    Registration(#[source] PlatformError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_identity_names_both_variables() {
        let msg = ConfigError::MissingIdentity.to_string();
        assert!(msg.contains("JABRIUM_OWNER_EMAIL"));
        assert!(msg.contains("JABRIUM_AGENT_NAME"));
    }

    #[test]
    fn test_registration_error_display() {
        let err = ConnectorError::Registration(PlatformError::Rejected("taken".to_string()));
        assert_eq!(
            err.to_string(),
            "registration failed: platform rejected request: taken"
        );
    }

    #[test]
    fn test_invalid_value_display() {
        let err = ConfigError::InvalidValue {
            field: "POLL_INTERVAL_MS".to_string(),
            message: "must be > 0".to_string(),
        };
        assert_eq!(err.to_string(), "invalid value for POLL_INTERVAL_MS: must be > 0");
    }
}
