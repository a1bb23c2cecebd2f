//! Interpretation of raw API responses.

use crate::error::{Result, StarlingApiError};
use serde_json::{Value, json};

pub const EMPTY_SUCCESS_MESSAGE: &str = "Operation completed successfully";

/// Body returned for a JSON success response with nothing in it (e.g. `204`-style `PUT`s).
#[must_use]
pub fn empty_success() -> Value {
    json!({ "success": true, "message": EMPTY_SUCCESS_MESSAGE })
}

/// Turn a response into a JSON value, or the error the API reported.
///
/// - non-2xx: [`StarlingApiError::Api`] with status, reason phrase and body text
/// - 2xx JSON: parsed body, or [`empty_success`] when the body is blank
/// - 2xx anything else: the body as a JSON string, `"Success"` when empty
///
/// # Errors
///
/// Returns an API error for non-success statuses, a parse error for malformed JSON, and a
/// transport error if the body cannot be read.
pub async fn parse_response(response: reqwest::Response) -> Result<Value> {
    let status = response.status();
    let is_json = content_type(&response).is_some_and(|ct| ct.contains("application/json"));
    let text = response.text().await?;

    if !status.is_success() {
        return Err(api_error(status, text));
    }

    if is_json {
        if text.trim().is_empty() {
            return Ok(empty_success());
        }
        return serde_json::from_str(&text).map_err(StarlingApiError::Parse);
    }

    if text.is_empty() {
        Ok(Value::String("Success".to_string()))
    } else {
        Ok(Value::String(text))
    }
}

/// Fail non-success responses the same way [`parse_response`] does, handing back the rest.
///
/// # Errors
///
/// Returns an API error for non-success statuses.
pub async fn error_for_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await?;
    Err(api_error(status, text))
}

fn api_error(status: reqwest::StatusCode, body: String) -> StarlingApiError {
    StarlingApiError::Api {
        status: status.as_u16(),
        status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
        body,
    }
}

fn content_type(response: &reqwest::Response) -> Option<&str> {
    response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
}
