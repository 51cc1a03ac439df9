pub type SvResult<T> = Result<T, SvError>;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum SvError {
    #[error("[API Error] {0}")]
    ApiError(#[from] ApiError),

    #[error("[Invalid] {message}")]
    Invalid { code: &'static str, message: String },

    #[error("[IO Error] {0}")]
    IoError(#[from] std::io::Error),

    #[error("[Parse Config Error] {0}")]
    ParseConfigError(#[from] ::confy::ConfyError),

    #[error("[Parse Enum Error] {0}")]
    ParseEnumError(#[from] ::strum::ParseError),

    #[error("[Parse URL Error] {0}")]
    ParseUrlError(#[from] url::ParseError),

    #[error("[Serde JSON Error] {0}")]
    SerdeJsonError(#[from] ::serde_json::Error),
}

/// Failure of a backend call.
///
/// Transport failures, timeouts and non-2xx statuses all end up here; callers
/// only see the message text.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    message: String,
    status: Option<u16>,
    from_backend: bool,
}

impl ApiError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            from_backend: false,
        }
    }

    pub fn status(status: u16, backend_message: Option<String>) -> Self {
        match backend_message {
            Some(message) => Self {
                message,
                status: Some(status),
                from_backend: true,
            },
            None => Self {
                message: format!("Request failed with status code {status}"),
                status: Some(status),
                from_backend: false,
            },
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status_code(&self) -> Option<u16> {
        self.status
    }

    pub fn is_from_backend(&self) -> bool {
        self.from_backend
    }

    /// The backend-supplied message, or `fallback` when the backend gave none.
    pub fn message_or(&self, fallback: &str) -> String {
        if self.from_backend {
            self.message.clone()
        } else {
            fallback.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_or() {
        let err = ApiError::status(500, None);
        assert_eq!(err.message(), "Request failed with status code 500");
        assert_eq!(
            err.message_or("Failed to fetch quote"),
            "Failed to fetch quote"
        );

        let err = ApiError::status(404, Some("No quote data available".to_string()));
        assert_eq!(err.message_or("Failed to fetch quote"), "No quote data available");
        assert_eq!(err.status_code(), Some(404));

        let err = ApiError::transport("error sending request");
        assert_eq!(err.message_or("Failed to fetch news"), "Failed to fetch news");
        assert_eq!(err.to_string(), "error sending request");
    }

    #[test]
    fn test_sv_error_display() {
        let err: SvError = ApiError::status(400, Some("Symbol is required".to_string())).into();
        assert_eq!(err.to_string(), "[API Error] Symbol is required");
    }
}
