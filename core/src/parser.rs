//! Response body decoding.

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::http::HttpResponse;

/// Turns a response body into typed records.
pub trait ResponseParser {
    /// Decode a single object. Malformed or mismatched JSON yields `None`.
    fn parse_to_object<T: DeserializeOwned>(&self, response: &HttpResponse) -> Option<T>;

    /// Decode a JSON array. Unlike `parse_to_object` a mismatch is an error,
    /// since a list page that is not a list cannot be skipped silently.
    fn parse_to_list<T: DeserializeOwned>(&self, response: &HttpResponse) -> Result<Vec<T>, ApiError>;
}

/// `serde_json` implementation of `ResponseParser`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonParser;

impl ResponseParser for JsonParser {
    fn parse_to_object<T: DeserializeOwned>(&self, response: &HttpResponse) -> Option<T> {
        match serde_json::from_str(&response.body) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(
                    target_type = std::any::type_name::<T>(),
                    error = %e,
                    "could not parse canvas response body"
                );
                None
            }
        }
    }

    fn parse_to_list<T: DeserializeOwned>(&self, response: &HttpResponse) -> Result<Vec<T>, ApiError> {
        debug!(status = response.status, body = %response.body, "parsing list page");
        serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }
}
