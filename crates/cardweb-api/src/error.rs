//! Error types for cardweb-api

use crate::render::feedback_response;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cardweb_core::{ClientError, Feedback, Notification};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// Form input the API is never asked about
    #[error("{message}")]
    BadRequest { message: String },

    #[error(transparent)]
    Client(#[from] ClientError),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest { message: message.into() }
    }

    pub fn feedback(&self) -> Feedback {
        match self {
            ApiError::BadRequest { message } => Feedback::new().with_notification(Notification::error(message.as_str())),
            ApiError::Client(error) => Feedback::from_error(error),
        }
    }
}

/// Errors answer 200 so HTMX runs the trigger, and keep whatever the page shows
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::BadRequest { message } => log::debug!("rejected input: {}", message),
            ApiError::Client(error) => log::warn!("{}", error.to_details()),
        }
        let mut response = feedback_response(StatusCode::OK, String::new(), &self.feedback());
        response
            .headers_mut()
            .insert("HX-Reswap", axum::http::HeaderValue::from_static("none"));
        response
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_keeps_page_state() {
        let response = ApiError::bad_request("Please, select card").into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["HX-Reswap"], "none");

        let trigger: serde_json::Value =
            serde_json::from_str(response.headers()["HX-Trigger"].to_str().unwrap()).unwrap();
        assert_eq!(trigger["notify"][0]["text"], "Please, select card");
        assert_eq!(trigger["notify"][0]["level"], "error");
    }

    #[test]
    fn test_client_error_feedback() {
        let error = ApiError::from(ClientError::RequestFailed { status: 403, message: "Access denied!".to_string() });
        assert_eq!(error.feedback().notify[0].text, "Error: Access denied!");
    }
}
