use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Pokémon not found: {0}")]
    NotFound(String),

    #[error("API request failed: {0}")]
    Transport(String),

    #[error("Failed to parse API response: {0}")]
    Parse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    /// Map a non-success status to the error taxonomy.
    ///
    /// `resource` names what was requested; it becomes the `NotFound` payload.
    pub fn from_status(status: reqwest::StatusCode, body: &str, resource: &str) -> Self {
        match status.as_u16() {
            404 => ApiError::NotFound(resource.to_string()),
            _ => ApiError::Transport(format!("Status {}: {}", status, Self::truncate_body(body))),
        }
    }

    /// Like `from_status`, for endpoints with no missing-resource case.
    pub fn from_list_status(status: reqwest::StatusCode, body: &str) -> Self {
        ApiError::Transport(format!("Status {}: {}", status, Self::truncate_body(body)))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Parse(e.to_string())
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status() {
        assert_eq!(
            ApiError::from_status(StatusCode::NOT_FOUND, "Not Found", "25"),
            ApiError::NotFound("25".to_string())
        );
        assert!(matches!(
            ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "boom", "25"),
            ApiError::Transport(msg) if msg.contains("500") && msg.contains("boom")
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::TOO_MANY_REQUESTS, "", "25"),
            ApiError::Transport(_)
        ));
    }

    #[test]
    fn test_list_status_never_not_found() {
        assert!(matches!(
            ApiError::from_list_status(StatusCode::NOT_FOUND, "Not Found"),
            ApiError::Transport(_)
        ));
    }

    #[test]
    fn test_truncate_body() {
        let body = "x".repeat(MAX_ERROR_BODY_LENGTH + 10);
        let truncated = ApiError::truncate_body(&body);
        assert!(truncated.starts_with(&"x".repeat(MAX_ERROR_BODY_LENGTH)));
        assert!(truncated.ends_with(&format!("(truncated, {} total bytes)", body.len())));
        assert_eq!(ApiError::truncate_body("short"), "short");
    }
}
