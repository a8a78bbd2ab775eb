use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use thiserror::Error;

use gsrelay_queue::QueueError;

/// Intake rejection, rendered as a one-line `text/plain` diagnostic.
///
/// The `Display` text is the response body (newline appended); clients match
/// on it, so the wording is part of the HTTP contract.
#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("Method not allowed. Use POST.")]
    MethodNotAllowed,
    #[error("Missing device name")]
    MissingDevice,
    #[error("Missing file name")]
    MissingFileName,
    #[error("Extension not supported")]
    UnsupportedDevice,
    #[error("Missing PDF body")]
    MissingBody,
    #[error("Queue full, retry")]
    QueueFull,
    #[error("{0}")]
    Internal(String),
}

impl From<QueueError> for IntakeError {
    fn from(e: QueueError) -> Self {
        match e {
            QueueError::Full => Self::QueueFull,
        }
    }
}

impl From<std::io::Error> for IntakeError {
    fn from(e: std::io::Error) -> Self {
        Self::Internal(e.to_string())
    }
}

impl IntakeError {
    fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::MissingDevice
            | Self::MissingFileName
            | Self::UnsupportedDevice
            | Self::MissingBody => StatusCode::BAD_REQUEST,
            Self::QueueFull => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for IntakeError {
    fn into_response(self) -> axum::response::Response {
        let body = format!("{self}\n");
        let mut response =
            (self.status(), [(header::CONTENT_TYPE, "text/plain")], body).into_response();
        if matches!(self, Self::MethodNotAllowed) {
            response
                .headers_mut()
                .insert(header::ALLOW, header::HeaderValue::from_static("POST"));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_match_the_contract() {
        assert_eq!(IntakeError::MethodNotAllowed.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(IntakeError::MissingDevice.status(), StatusCode::BAD_REQUEST);
        assert_eq!(IntakeError::MissingFileName.status(), StatusCode::BAD_REQUEST);
        assert_eq!(IntakeError::UnsupportedDevice.status(), StatusCode::BAD_REQUEST);
        assert_eq!(IntakeError::MissingBody.status(), StatusCode::BAD_REQUEST);
        assert_eq!(IntakeError::QueueFull.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            IntakeError::Internal("disk".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn method_not_allowed_advertises_post() {
        let response = IntakeError::MethodNotAllowed.into_response();
        assert_eq!(response.headers().get(header::ALLOW).unwrap(), "POST");
    }

    #[test]
    fn body_wording_is_exact() {
        assert_eq!(IntakeError::MissingDevice.to_string(), "Missing device name");
        assert_eq!(IntakeError::MissingFileName.to_string(), "Missing file name");
        assert_eq!(
            IntakeError::UnsupportedDevice.to_string(),
            "Extension not supported"
        );
        assert_eq!(IntakeError::MissingBody.to_string(), "Missing PDF body");
        assert_eq!(IntakeError::QueueFull.to_string(), "Queue full, retry");
    }
}
