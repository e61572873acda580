//! Base64 ⟷ byte-array conversion.
//!
//! The primitive codec used by every other module: encrypted blobs,
//! salts, and recovery keys all cross the persistence boundary as base64
//! text. Encoding is total; decoding fails with
//! [`HeirvaultError::DecodeFailure`] on input that is not valid base64.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::HeirvaultError;

/// Encode a byte sequence as standard (padded) base64 text.
pub fn bytes_to_text(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode standard base64 text back into bytes.
///
/// Exact inverse of [`bytes_to_text`] for any byte sequence.
pub fn text_to_bytes(text: &str) -> Result<Vec<u8>, HeirvaultError> {
    STANDARD
        .decode(text)
        .map_err(|e| HeirvaultError::DecodeFailure(e.to_string()))
}
