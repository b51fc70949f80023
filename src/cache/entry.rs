//! Cache Entry Module
//!
//! Defines the persisted document for a single cached response and its
//! conversion to and from bytes.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::cache::{CachedResponse, Headers};
use crate::error::{CacheError, Result};

// == Cache Entry ==
/// The on-disk document for one cached response.
///
/// Stored as JSON with the fields `statusCode`, `headers`, `contentType`,
/// `body` (base64) and `expiresAt` (RFC 3339).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub status_code: u16,
    pub headers: Headers,
    pub content_type: String,
    #[serde(with = "base64_body")]
    pub body: Vec<u8>,
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    // == Constructor ==
    /// Captures a response together with its absolute expiration instant.
    pub fn new(response: &CachedResponse, expires_at: DateTime<Utc>) -> Self {
        Self {
            status_code: response.status_code,
            headers: response.headers.clone(),
            content_type: response.content_type.clone(),
            body: response.body.clone(),
            expires_at,
        }
    }

    /// Encodes the entry as a JSON document.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decodes an entry read from the file named `digest`.
    pub fn from_bytes(digest: &str, bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|source| CacheError::Deserialization {
            digest: digest.to_string(),
            source,
        })
    }

    /// Converts back into the response it was created from.
    pub fn into_response(self) -> CachedResponse {
        CachedResponse {
            status_code: self.status_code,
            headers: self.headers,
            content_type: self.content_type,
            body: self.body,
        }
    }
}

mod base64_body {
    use super::*;

    pub fn serialize<S: Serializer>(body: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(body))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}
