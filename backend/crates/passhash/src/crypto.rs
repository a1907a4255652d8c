//! Cryptographic Utilities

use std::hint::black_box;

use base64::{Engine, engine::general_purpose};
use rand::{RngCore, rngs::OsRng};

use crate::error::{PasswordHashError, PasswordHashResult};

/// Generate a salt of `len` bytes from the operating system RNG
///
/// There is no fallback source: if the OS cannot supply entropy the
/// call fails with [`PasswordHashError::EntropySourceUnavailable`].
pub fn generate_salt(len: usize) -> PasswordHashResult<Vec<u8>> {
    let mut salt = vec![0u8; len];
    OsRng
        .try_fill_bytes(&mut salt)
        .map_err(PasswordHashError::EntropySourceUnavailable)?;
    Ok(salt)
}

/// Encode bytes as unpadded standard base64
pub fn to_base64(bytes: &[u8]) -> String {
    general_purpose::STANDARD_NO_PAD.encode(bytes)
}

/// Decode base64, trying unpadded first and padded second
pub fn from_base64_lenient(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    general_purpose::STANDARD_NO_PAD
        .decode(s)
        .or_else(|_| general_purpose::STANDARD.decode(s))
}

/// Constant-time comparison to prevent timing attacks
///
/// Only the length check may exit early; contents are always scanned in full.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= black_box(x ^ y);
    }
    black_box(result) == 0
}
