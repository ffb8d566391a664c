//! Instance log decoding
//!
//! Instances publish their execution log as a base64-encoded zlib stream
//! whose inflated bytes are the UTF-8 text of a JSON object. This module
//! decodes that blob into a string-keyed map.

use base64::prelude::*;
use flate2::read::ZlibDecoder;
use std::collections::HashMap;
use std::io::Read;
use thiserror::Error;

/// Decoded instance log: one entry per log section
pub type LogMap = HashMap<String, serde_json::Value>;

/// Errors that can occur while decoding a log blob
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The blob is not valid base64
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The base64 payload is not a valid zlib stream
    #[error("failed to inflate log payload: {0}")]
    Inflate(#[from] std::io::Error),

    /// The inflated bytes are not valid UTF-8 text
    #[error("inflated log is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// The inflated text is not a JSON object
    #[error("inflated log is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Decodes a raw log blob into a structured map.
///
/// Callers must not pass an empty blob: an instance that has produced no
/// output carries an empty `raw` field, and callers substitute an empty
/// [`LogMap`] without invoking the decoder.
pub fn decode_log(raw: &str) -> Result<LogMap, DecodeError> {
    let compressed = BASE64_STANDARD.decode(raw)?;

    let mut inflated = Vec::new();
    ZlibDecoder::new(compressed.as_slice()).read_to_end(&mut inflated)?;

    let text = String::from_utf8(inflated)?;
    let log = serde_json::from_str(&text)?;

    Ok(log)
}
