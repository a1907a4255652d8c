//! Clear Text Password
//!
//! Owned plaintext that is erased from memory on drop. Used where a
//! password has to outlive the caller's borrow, e.g. when it is moved into
//! a blocking task by [`crate::pool::BoundedHasher`].

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Clear text password with automatic memory zeroization
///
/// ## Security
/// - Implements `Zeroize` and `ZeroizeOnDrop`
/// - Does not implement `Clone` to prevent accidental copies
/// - Debug output is redacted
///
/// No password policy is applied here; length or strength rules belong to
/// the caller. The bytes are hashed exactly as given.
///
/// ## Examples
/// ```rust
/// use passhash::ClearTextPassword;
///
/// let password = ClearTextPassword::new("correct horse");
/// assert_eq!(format!("{password:?}"), "ClearTextPassword(\"[REDACTED]\")");
/// ```
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Get the password as bytes for hashing
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ClearTextPassword {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}
