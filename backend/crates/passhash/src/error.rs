//! Error Types
//!
//! Every failure of the codec is a variant of [`PasswordHashError`].
//! A wrong password is *not* an error: `verify` returns `Ok(false)`.

use std::fmt;

use thiserror::Error;

/// Result type alias for codec operations
pub type PasswordHashResult<T> = Result<T, PasswordHashError>;

/// Which base-64 segment of a token failed to decode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenField {
    Salt,
    Hash,
}

impl fmt::Display for TokenField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenField::Salt => f.write_str("salt"),
            TokenField::Hash => f.write_str("hash"),
        }
    }
}

/// Password hashing/verification errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    /// The secure random source could not produce a salt
    #[error("Entropy source unavailable: {0}")]
    EntropySourceUnavailable(#[source] rand::Error),

    /// Algorithm tag missing or not `argon2id`, or an unknown version
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Token structure is invalid
    #[error("Malformed password hash: {0}")]
    MalformedToken(&'static str),

    /// A base-64 segment is neither unpadded nor padded base-64
    #[error("Malformed password hash: {field} is not valid base64")]
    DecodeFailure { field: TokenField },

    /// The derivation primitive rejected the parameters
    #[error("Invalid Argon2id parameters: {0}")]
    InvalidParameters(String),
}

impl PasswordHashError {
    /// `true` for structural token problems (parse or decode failures)
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            PasswordHashError::MalformedToken(_) | PasswordHashError::DecodeFailure { .. }
        )
    }

    /// Short stable label for structured logs
    pub fn class(&self) -> &'static str {
        match self {
            PasswordHashError::EntropySourceUnavailable(_) => "entropy_source_unavailable",
            PasswordHashError::UnsupportedAlgorithm(_) => "unsupported_algorithm",
            PasswordHashError::MalformedToken(_) => "malformed_token",
            PasswordHashError::DecodeFailure { .. } => "decode_failure",
            PasswordHashError::InvalidParameters(_) => "invalid_parameters",
        }
    }
}

impl From<argon2::Error> for PasswordHashError {
    fn from(err: argon2::Error) -> Self {
        PasswordHashError::InvalidParameters(err.to_string())
    }
}
