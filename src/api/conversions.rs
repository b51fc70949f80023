//! Conversions between axum responses and cached responses.

use axum::{
    body::Body,
    http::{
        header::CONTENT_TYPE, response::Parts, HeaderName, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::cache::{CachedResponse, Headers};

impl CachedResponse {
    /// Captures a generated response from its head and fully buffered body.
    ///
    /// `Content-Type` goes to `content_type`; every other header with a
    /// UTF-8 value is kept. Repeated headers collapse to the last value.
    pub fn from_parts(parts: &Parts, body: &[u8]) -> Self {
        let content_type = parts
            .headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let headers: Headers = parts
            .headers
            .iter()
            .filter(|(name, _)| **name != CONTENT_TYPE)
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();

        Self {
            status_code: parts.status.as_u16(),
            headers,
            content_type,
            body: body.to_vec(),
        }
    }
}

impl IntoResponse for CachedResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let headers = response.headers_mut();
        for (name, value) in self.headers.iter() {
            match (HeaderName::try_from(name), HeaderValue::try_from(value)) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => warn!("Skipping invalid cached header {}", name),
            }
        }

        if !self.content_type.is_empty() {
            match HeaderValue::try_from(self.content_type.as_str()) {
                Ok(value) => {
                    headers.insert(CONTENT_TYPE, value);
                }
                Err(_) => warn!("Skipping invalid cached content type {}", self.content_type),
            }
        }

        response
    }
}
