/// Error types for the panel and its HTTP client
use thiserror::Error;

/// Errors returned by the `/staff/usr` client
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connect failure, timeout, ...)
    #[error("Request failed: {0}")]
    Transport(String),

    /// The server answered with a non-success status
    #[error("HTTP {status}: {}", status_detail(.error, .body))]
    Status {
        status: u16,
        /// `error` field of a JSON body, when the body had one
        error: Option<String>,
        /// Raw body text, when non-empty
        body: Option<String>,
    },

    /// A success response whose body could not be decoded
    #[error("Failed to parse response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Build a status error from a raw response body.
    pub fn from_body(status: u16, text: String) -> Self {
        let error = serde_json::from_str::<serde_json::Value>(&text)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string));
        let body = if text.trim().is_empty() { None } else { Some(text) };
        ApiError::Status { status, error, body }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn server_error(&self) -> Option<&str> {
        match self {
            ApiError::Status { error, .. } => error.as_deref(),
            _ => None,
        }
    }

    pub fn body_text(&self) -> Option<&str> {
        match self {
            ApiError::Status { body, .. } => body.as_deref(),
            _ => None,
        }
    }
}

fn status_detail<'a>(error: &'a Option<String>, body: &'a Option<String>) -> &'a str {
    error.as_deref().or(body.as_deref()).unwrap_or("no details")
}

/// Errors at the edges of a panel session: configuration, seed files, rendering
#[derive(Debug, Error)]
pub enum PanelError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid seed rows: {0}")]
    Seed(#[from] serde_json::Error),

    #[error("Template rendering failed: {0}")]
    Render(#[from] askama::Error),

    /// The terminal confirmation could not be shown or answered
    #[error("Prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error(transparent)]
    Api(#[from] ApiError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_body_picks_structured_error() {
        let err = ApiError::from_body(400, r#"{"error":"username taken"}"#.to_string());
        assert_eq!(err.status(), Some(400));
        assert_eq!(err.server_error(), Some("username taken"));
        assert_eq!(err.to_string(), "HTTP 400: username taken");
    }

    #[test]
    fn from_body_keeps_plain_text() {
        let err = ApiError::from_body(500, "boom".to_string());
        assert_eq!(err.server_error(), None);
        assert_eq!(err.body_text(), Some("boom"));
    }

    #[test]
    fn from_body_drops_blank_body() {
        let err = ApiError::from_body(404, "  ".to_string());
        assert_eq!(err.body_text(), None);
        assert_eq!(err.to_string(), "HTTP 404: no details");
    }

    #[test]
    fn prompt_failure_is_a_panel_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotConnected, "not a terminal");
        let err = PanelError::from(dialoguer::Error::IO(io));
        assert!(matches!(err, PanelError::Prompt(_)));
        assert!(err.to_string().starts_with("Prompt failed:"));
    }
}
