//! Application-level error values and their HTTP rendering.
//!
//! A [`Fault`] is anything that can be reported to a client as a status code
//! plus a machine-readable error code, a human-readable message, and a
//! translation key for localized UIs. [`Exception`] is the concrete fault
//! raised by this crate's own helpers; applications can implement [`Fault`]
//! on their own error types to get the same JSON rendering.

use thiserror::Error;

use crate::http::{Response, StatusCode};
use crate::url::UrlError;

/// The contract consumed by the bootstrap error renderer.
pub trait Fault {
    /// Machine-readable error code, e.g. `LIB_ERR`.
    fn code(&self) -> &str;

    /// HTTP status to respond with.
    fn status(&self) -> StatusCode;

    /// Human-readable message.
    fn message(&self) -> &str;

    /// Key for message translation in localized clients.
    fn trans_key(&self) -> &str;

    /// Renders the fault as a JSON error response:
    /// `{"message": ..., "code": ...}` with the fault's status.
    fn to_response(&self) -> Response {
        let body = serde_json::json!({
            "message": self.message(),
            "code": self.code(),
        });
        match Response::new(self.status()).json(&body) {
            Ok(response) => response,
            Err(_) => Response::new(self.status()).body(self.message()),
        }
    }
}

/// A fault raised by library helpers.
///
/// # Examples
///
/// ```
/// use nautilus::exception::{Exception, Fault};
/// use nautilus::http::StatusCode;
///
/// let exception = Exception::new(
///     StatusCode::UnprocessableEntity,
///     "target URL is malformed",
///     "errors.malformed_url",
/// );
///
/// assert_eq!(exception.code(), "LIB_ERR");
/// assert_eq!(exception.status(), StatusCode::UnprocessableEntity);
/// ```
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct Exception {
    status: StatusCode,
    message: String,
    trans_key: String,
}

impl Exception {
    /// Creates an exception with the given status, message and translation key.
    pub fn new(
        status: StatusCode,
        message: impl Into<String>,
        trans_key: impl Into<String>,
    ) -> Self {
        Self {
            status,
            message: message.into(),
            trans_key: trans_key.into(),
        }
    }
}

impl Fault for Exception {
    fn code(&self) -> &str {
        "LIB_ERR"
    }

    fn status(&self) -> StatusCode {
        self.status
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn trans_key(&self) -> &str {
        &self.trans_key
    }
}

impl From<UrlError> for Exception {
    /// A malformed URL surfaces as `400 Bad Request`.
    fn from(err: UrlError) -> Self {
        Self::new(StatusCode::BadRequest, err.to_string(), "errors.malformed_url")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::url::Url;

    #[test]
    fn library_faults_report_lib_err() {
        let e = Exception::new(StatusCode::NotFound, "no such thing", "errors.not_found");
        assert_eq!(e.code(), "LIB_ERR");
        assert_eq!(e.message(), "no such thing");
        assert_eq!(e.trans_key(), "errors.not_found");
        assert_eq!(e.to_string(), "no such thing");
    }

    #[test]
    fn renders_json_error_body() {
        let e = Exception::new(StatusCode::Conflict, "already exists", "errors.conflict");
        let response = e.to_response();
        assert_eq!(response.status(), StatusCode::Conflict);

        let bytes = response.into_bytes();
        let text = std::str::from_utf8(&bytes).unwrap();
        assert!(text.contains("Content-Type: application/json"));
        assert!(text.ends_with(r#"{"code":"LIB_ERR","message":"already exists"}"#));
    }

    #[test]
    fn url_errors_convert_to_bad_request() {
        let err = Url::parse("not a url").unwrap_err();
        let e = Exception::from(err);
        assert_eq!(e.status(), StatusCode::BadRequest);
        assert!(e.message().contains("not a url"));
    }
}
