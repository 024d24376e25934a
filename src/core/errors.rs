use serde::ser::SerializeStruct;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),
    #[error("remote request failed ({status}): {message}")]
    RemoteRequestFailed {
        status: u16,
        code: Option<String>,
        message: String,
    },
    #[error("notion credential is not configured")]
    MissingCredential,
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("database error: {0}")]
    Database(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl serde::Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let status = self.status();
        let len = if status.is_some() { 3 } else { 2 };
        let mut state = serializer.serialize_struct("AppError", len)?;
        state.serialize_field("code", self.code())?;
        state.serialize_field("message", &self.to_string())?;
        if let Some(status) = status {
            state.serialize_field("status", &status)?;
        }
        state.end()
    }
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidIdentifier(_) => "INVALID_IDENTIFIER",
            Self::RemoteRequestFailed { .. } => "REMOTE_REQUEST_FAILED",
            Self::MissingCredential => "MISSING_CREDENTIAL",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Network(_) => "NETWORK_ERROR",
            Self::InvalidResponse(_) => "INVALID_RESPONSE",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RemoteRequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether a caller-driven retry has a chance of succeeding. Nothing in
    /// this crate retries on its own.
    pub fn retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::RemoteRequestFailed { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value.to_string())
    }
}

impl From<sqlx::Error> for AppError {
    fn from(value: sqlx::Error) -> Self {
        Self::Database(value.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(value: sqlx::migrate::MigrateError) -> Self {
        Self::Database(value.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::InvalidInput(value.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_timeout() {
            Self::Network(format!("request timed out: {value}"))
        } else {
            Self::Network(value.to_string())
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_failures_serialize_with_status() {
        let err = AppError::RemoteRequestFailed {
            status: 404,
            code: Some("object_not_found".to_string()),
            message: "page lookup failed: Could not find page".to_string(),
        };
        let value = serde_json::to_value(&err).expect("serialize");
        assert_eq!(value["code"], "REMOTE_REQUEST_FAILED");
        assert_eq!(value["status"], 404);
        assert!(value["message"]
            .as_str()
            .unwrap_or_default()
            .contains("Could not find page"));
    }

    #[test]
    fn only_transient_failures_are_retryable() {
        let throttled = AppError::RemoteRequestFailed {
            status: 429,
            code: None,
            message: "rate limited".to_string(),
        };
        let missing = AppError::RemoteRequestFailed {
            status: 404,
            code: None,
            message: "Not Found".to_string(),
        };
        assert!(throttled.retryable());
        assert!(!missing.retryable());
        assert!(AppError::Network("reset".to_string()).retryable());
        assert!(!AppError::MissingCredential.retryable());
        assert!(!AppError::InvalidIdentifier("x".to_string()).retryable());
        assert!(!AppError::InvalidResponse("missing field `id`".to_string()).retryable());
    }
}
