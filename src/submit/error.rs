//! Submission failure types.
//!
//! A submit callback fails with a `SubmitError`. When the failure came from a
//! server, the response body travels along so that the message shown to the
//! user can come from the server instead of the transport.

use crate::state::FieldError;
use log::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Server response attached to a failed submission.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: Option<u16>,
    pub data: Value,
}

/// Error returned by a submit callback.
#[derive(Clone, Debug, thiserror::Error)]
#[error("{message}")]
pub struct SubmitError {
    message: String,
    response: Option<ErrorResponse>,
}

impl SubmitError {
    pub fn new(message: impl Into<String>) -> Self {
        SubmitError {
            message: message.into(),
            response: None,
        }
    }

    /// Attach server response data, keeping any status already set.
    ///
    pub fn with_response(mut self, data: impl Into<Value>) -> Self {
        let status = self.response.as_ref().and_then(|r| r.status);
        self.response = Some(ErrorResponse {
            status,
            data: data.into(),
        });
        self
    }

    /// Attach an HTTP status, keeping any response data already set.
    ///
    pub fn with_status(mut self, status: u16) -> Self {
        match self.response.as_mut() {
            Some(response) => response.status = Some(status),
            None => {
                self.response = Some(ErrorResponse {
                    status: Some(status),
                    data: Value::Null,
                })
            }
        }
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn response(&self) -> Option<&ErrorResponse> {
        self.response.as_ref()
    }

    /// Message to show the user.
    ///
    /// Response data that is a string is used as is. Response data that is an
    /// object contributes its `message` field. Anything else falls back to the
    /// error's own message.
    ///
    pub fn user_message(&self) -> String {
        match self.response.as_ref().map(|r| &r.data) {
            Some(Value::String(data)) => data.clone(),
            Some(Value::Object(data)) => match data.get("message") {
                Some(Value::String(message)) => message.clone(),
                Some(Value::Null) | None => self.message.clone(),
                Some(other) => other.to_string(),
            },
            _ => self.message.clone(),
        }
    }

    pub fn to_field_error(&self) -> FieldError {
        FieldError::new(self.user_message())
    }

    /// Build an error from a failed HTTP response, keeping its status and
    /// body. A JSON body is kept as parsed JSON, anything else as text.
    ///
    pub async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status().as_u16();
        let data = match response.text().await {
            Ok(body) if body.is_empty() => Value::Null,
            Ok(body) => serde_json::from_str(&body).unwrap_or(Value::String(body)),
            Err(e) => {
                warn!("Failed to read body of failed response ({}): {}", status, e);
                Value::Null
            }
        };
        SubmitError {
            message: format!("Request failed with status code {}", status),
            response: Some(ErrorResponse {
                status: Some(status),
                data,
            }),
        }
    }
}

impl From<reqwest::Error> for SubmitError {
    fn from(e: reqwest::Error) -> Self {
        let error = SubmitError::new(e.to_string());
        match e.status() {
            Some(status) => error.with_status(status.as_u16()),
            None => error,
        }
    }
}

impl From<anyhow::Error> for SubmitError {
    fn from(e: anyhow::Error) -> Self {
        match e.downcast::<SubmitError>() {
            Ok(inner) => inner,
            Err(e) => SubmitError::new(format!("{:#}", e)),
        }
    }
}
