//! Upstream API error types.

/// Errors that can occur when talking to the FuelCheck API or loading an
/// offline snapshot.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Client-credentials exchange was rejected
    #[error("token request failed with status {status}: {message}")]
    Auth { status: u16, message: String },

    /// Still unauthorized after exhausting token refresh retries
    #[error("unauthorized after {attempts} attempts")]
    Unauthorized { attempts: u32 },

    /// API returned a non-success status other than 401
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body did not decode
    #[error("JSON parse error: {message}{}", body_suffix(.body))]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Offline snapshot could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Client construction failed because of bad configuration
    #[error("invalid configuration: {0}")]
    Config(String),
}

fn body_suffix(body: &Option<String>) -> String {
    body.as_ref()
        .map(|b| format!(" (body: {b})"))
        .unwrap_or_default()
}

impl UpstreamError {
    /// Build a [`UpstreamError::Json`] keeping the first 500 characters of
    /// the offending body.
    pub(crate) fn json(err: &serde_json::Error, body: &str) -> Self {
        UpstreamError::Json {
            message: err.to_string(),
            body: Some(body.chars().take(500).collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = UpstreamError::Auth {
            status: 401,
            message: "invalid client".into(),
        };
        assert_eq!(
            err.to_string(),
            "token request failed with status 401: invalid client"
        );

        let err = UpstreamError::Unauthorized { attempts: 2 };
        assert_eq!(err.to_string(), "unauthorized after 2 attempts");

        let err = UpstreamError::Api {
            status: 500,
            message: "Internal Server Error".into(),
        };
        assert_eq!(err.to_string(), "API error 500: Internal Server Error");

        let err = UpstreamError::Json {
            message: "expected value".into(),
            body: Some("<html>".into()),
        };
        assert_eq!(
            err.to_string(),
            "JSON parse error: expected value (body: <html>)"
        );

        let err = UpstreamError::Json {
            message: "expected value".into(),
            body: None,
        };
        assert_eq!(err.to_string(), "JSON parse error: expected value");
    }

    #[test]
    fn json_truncates_body() {
        let body = "x".repeat(2_000);
        let parse_err = serde_json::from_str::<serde_json::Value>(&body).unwrap_err();
        let UpstreamError::Json { body, .. } = UpstreamError::json(&parse_err, &body) else {
            panic!("expected Json variant");
        };
        assert_eq!(body.unwrap().len(), 500);
    }
}
