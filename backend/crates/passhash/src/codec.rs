//! Encode and Verify
//!
//! - [`encode`] derives a fresh token from a plaintext
//! - [`verify`] re-derives from a candidate plaintext and compares in
//!   constant time
//!
//! Verification reads every cost parameter, and the output length, from the
//! token itself. Changing the configured [`Params`] therefore never breaks
//! existing tokens; use [`Argon2idHasher::needs_rehash`] to migrate them.

use argon2::{Algorithm, Argon2, Version};
use zeroize::Zeroizing;

use crate::crypto::{constant_time_eq, generate_salt};
use crate::error::PasswordHashResult;
use crate::params::Params;
use crate::token::EncodedHash;

/// Run Argon2id v0x13 and return `params.output_len` bytes
fn derive(plaintext: &[u8], salt: &[u8], params: &Params) -> PasswordHashResult<Zeroizing<Vec<u8>>> {
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params.to_argon2()?);

    let mut output = Zeroizing::new(vec![0u8; params.output_len]);
    argon2.hash_password_into(plaintext, salt, output.as_mut_slice())?;
    Ok(output)
}

/// Hash a plaintext with a freshly generated salt
///
/// Two calls with the same input return different tokens; both verify.
///
/// ## Errors
/// - [`crate::PasswordHashError::EntropySourceUnavailable`] if no salt
///   could be generated
/// - [`crate::PasswordHashError::InvalidParameters`] if Argon2 rejects
///   `params`
pub fn encode(plaintext: &str, params: &Params) -> PasswordHashResult<String> {
    let salt = generate_salt(params.salt_len)?;
    encode_with_salt(plaintext, params, &salt)
}

/// Hash a plaintext with a caller-provided salt
///
/// Deterministic; meant for conformance vectors and migrations. Regular
/// callers should use [`encode`].
pub fn encode_with_salt(plaintext: &str, params: &Params, salt: &[u8]) -> PasswordHashResult<String> {
    let mut hash = derive(plaintext.as_bytes(), salt, params)?;

    // The output is public once it is part of a token; move it, don't copy it
    let encoded = EncodedHash {
        memory_kib: params.memory_kib,
        time_cost: params.time_cost,
        parallelism: params.parallelism,
        salt: salt.to_vec(),
        hash: std::mem::take(&mut *hash),
    };
    Ok(encoded.to_string())
}

/// Check a plaintext against a stored token
///
/// ## Returns
/// - `Ok(true)` if the plaintext matches
/// - `Ok(false)` for a well-formed token and a wrong plaintext
/// - `Err(_)` if the token cannot be parsed or its parameters are rejected
///
/// ## Examples
/// ```rust
/// let token = "$argon2id$v=19$m=65536,t=2,p=1$c29tZXNhbHQ$CTFhFdXPJO1aFaMaO6Mm5c8y7cJHAph8ArZWb2GRPPc";
/// assert!(passhash::verify("password", token)?);
/// assert!(!passhash::verify("hunter2", token)?);
/// # Ok::<(), passhash::PasswordHashError>(())
/// ```
pub fn verify(plaintext: &str, token: &str) -> PasswordHashResult<bool> {
    let parsed = EncodedHash::parse(token)?;
    verify_parsed(plaintext, &parsed)
}

/// Check a plaintext against an already parsed token
pub fn verify_parsed(plaintext: &str, parsed: &EncodedHash) -> PasswordHashResult<bool> {
    let params = Params {
        memory_kib: parsed.memory_kib,
        time_cost: parsed.time_cost,
        parallelism: parsed.parallelism,
        salt_len: parsed.salt.len(),
        output_len: parsed.output_len(),
    };
    let candidate = derive(plaintext.as_bytes(), &parsed.salt, &params)?;
    Ok(constant_time_eq(&candidate, &parsed.hash))
}

/// Codec bound to one explicit parameter set
///
/// The parameters are used for new tokens only. Verification always
/// follows the token.
///
/// ## Examples
/// ```rust
/// use passhash::{Argon2idHasher, Params};
///
/// let hasher = Argon2idHasher::new(Params {
///     memory_kib: 1024,
///     time_cost: 1,
///     parallelism: 1,
///     ..Params::default()
/// });
/// let token = hasher.encode("correct horse")?;
/// assert!(hasher.verify("correct horse", &token)?);
/// # Ok::<(), passhash::PasswordHashError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Argon2idHasher {
    params: Params,
}

impl Argon2idHasher {
    pub fn new(params: Params) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Hash with the configured parameters
    pub fn encode(&self, plaintext: &str) -> PasswordHashResult<String> {
        encode(plaintext, &self.params)
    }

    /// Verify against a stored token (see [`verify`])
    pub fn verify(&self, plaintext: &str, token: &str) -> PasswordHashResult<bool> {
        verify(plaintext, token)
    }

    /// Check if a stored token was made with other cost parameters
    ///
    /// Compares memory, time, parallelism and output length. A different
    /// salt length alone does not trigger a rehash.
    pub fn needs_rehash(&self, token: &str) -> PasswordHashResult<bool> {
        let parsed = EncodedHash::parse(token)?;
        Ok(parsed.memory_kib != self.params.memory_kib
            || parsed.time_cost != self.params.time_cost
            || parsed.parallelism != self.params.parallelism
            || parsed.output_len() != self.params.output_len)
    }
}

impl Default for Argon2idHasher {
    fn default() -> Self {
        Self::new(Params::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PasswordHashError;

    /// Reference Argon2id v0x13 vector: "password" / "somesalt", m=65536, t=2, p=1
    const REFERENCE: &str =
        "$argon2id$v=19$m=65536,t=2,p=1$c29tZXNhbHQ$CTFhFdXPJO1aFaMaO6Mm5c8y7cJHAph8ArZWb2GRPPc";

    /// "correct horse", 16 zero bytes of salt, default parameters
    const CORRECT_HORSE: &str = "$argon2id$v=19$m=65536,t=3,p=4$AAAAAAAAAAAAAAAAAAAAAA$8GOfD8luJKywIiNQATjRC0t9/sBbIbMs/a2OVn+rTR8";

    fn fast_params() -> Params {
        Params {
            memory_kib: 1024,
            time_cost: 1,
            parallelism: 1,
            ..Params::default()
        }
    }

    fn segments(token: &str) -> Vec<&str> {
        token.split('$').filter(|s| !s.is_empty()).collect()
    }

    #[test]
    fn test_reference_vector() {
        assert!(verify("password", REFERENCE).unwrap());
        assert!(!verify("Password", REFERENCE).unwrap());
    }

    #[test]
    fn test_correct_horse_vector() {
        let token = encode_with_salt("correct horse", &Params::default(), &[0u8; 16]).unwrap();
        assert_eq!(token, CORRECT_HORSE);

        let parsed = EncodedHash::parse(&token).unwrap();
        assert_eq!(
            hex::encode(&parsed.hash),
            "f0639f0fc96e24acb02223500138d10b4b7dfec05b21b32cfdad8e567fab4d1f"
        );
        assert!(verify("correct horse", &token).unwrap());
    }

    #[test]
    fn test_round_trip() {
        let params = fast_params();
        for plaintext in ["", "a", "correct horse battery staple", "パスワード安全です!", "$argon2id$"] {
            let token = encode(plaintext, &params).unwrap();
            assert!(verify(plaintext, &token).unwrap(), "round trip for {plaintext:?}");
        }
    }

    #[test]
    fn test_non_match() {
        let params = fast_params();
        let token = encode("correct horse", &params).unwrap();
        assert!(!verify("correct horsE", &token).unwrap());
        assert!(!verify("correct horse ", &token).unwrap());
        assert!(!verify("", &token).unwrap());
    }

    #[test]
    fn test_salt_uniqueness() {
        let params = fast_params();
        let first = encode("same", &params).unwrap();
        let second = encode("same", &params).unwrap();
        assert_ne!(first, second);
        assert_ne!(segments(&first)[3], segments(&second)[3]);
        assert!(verify("same", &first).unwrap());
        assert!(verify("same", &second).unwrap());
    }

    #[test]
    fn test_parameter_recovery() {
        let token = encode("correct horse", &Params::default()).unwrap();
        let parsed = EncodedHash::parse(&token).unwrap();
        assert_eq!(parsed.memory_kib, 65536);
        assert_eq!(parsed.time_cost, 3);
        assert_eq!(parsed.parallelism, 4);
        assert_eq!(parsed.salt.len(), 16);
        assert_eq!(parsed.output_len(), 32);
        assert_eq!(segments(&token)[2], "m=65536,t=3,p=4");
    }

    #[test]
    fn test_tamper_sensitivity() {
        let token = encode("correct horse", &fast_params()).unwrap();
        let hash_start = token.rfind('$').unwrap() + 1;

        for i in hash_start..token.len() {
            let mut bytes = token.clone().into_bytes();
            bytes[i] = if bytes[i] == b'A' { b'B' } else { b'A' };
            let tampered = String::from_utf8(bytes).unwrap();

            match verify("correct horse", &tampered) {
                Ok(matched) => assert!(!matched, "tampered position {i} still verified"),
                Err(e) => assert!(matches!(e, PasswordHashError::DecodeFailure { .. })),
            }
        }
    }

    #[test]
    fn test_malformed_token() {
        let err = verify("x", "not-a-token").unwrap_err();
        assert!(err.is_malformed());
        assert!(matches!(err, PasswordHashError::MalformedToken(_)));
    }

    #[test]
    fn test_unsupported_algorithm() {
        let token = REFERENCE.replace("argon2id", "argon2i");
        assert!(matches!(
            verify("password", &token),
            Err(PasswordHashError::UnsupportedAlgorithm(_))
        ));
    }

    #[test]
    fn test_padding_tolerance() {
        let token = encode("correct horse", &fast_params()).unwrap();
        let parts = segments(&token);
        // 16-byte salt and 32-byte hash both need padding
        let padded = format!(
            "${}${}${}${}==${}=",
            parts[0], parts[1], parts[2], parts[3], parts[4]
        );
        assert!(verify("correct horse", &padded).unwrap());
        assert!(!verify("wrong horse", &padded).unwrap());
    }

    #[test]
    fn test_output_length_follows_token() {
        let long = Params {
            output_len: 64,
            ..fast_params()
        };
        let token = encode("correct horse", &long).unwrap();
        assert_eq!(EncodedHash::parse(&token).unwrap().output_len(), 64);

        // Hasher configured for 32-byte output still verifies 64-byte tokens
        let hasher = Argon2idHasher::new(fast_params());
        assert!(hasher.verify("correct horse", &token).unwrap());
    }

    #[test]
    fn test_invalid_parameters() {
        let short_salt = Params {
            salt_len: 4,
            ..fast_params()
        };
        assert!(matches!(
            encode("x", &short_salt),
            Err(PasswordHashError::InvalidParameters(_))
        ));

        let no_lanes = Params {
            parallelism: 0,
            ..fast_params()
        };
        assert!(matches!(
            encode("x", &no_lanes),
            Err(PasswordHashError::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_token_parameters_rejected_by_argon2() {
        // Parses fine, but m=8 is below the 8 KiB per lane minimum for p=4
        let token = REFERENCE.replace("m=65536,t=2,p=1", "m=8,t=1,p=4");
        assert!(EncodedHash::parse(&token).is_ok());
        assert!(matches!(
            verify("password", &token),
            Err(PasswordHashError::InvalidParameters(_))
        ));

        // Hash shorter than the 4-byte minimum output
        let token = REFERENCE.replace("CTFhFdXPJO1aFaMaO6Mm5c8y7cJHAph8ArZWb2GRPPc", "CTFh");
        assert!(matches!(
            verify("password", &token),
            Err(PasswordHashError::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_parameters_are_not_clamped() {
        let odd = Params {
            memory_kib: 1000,
            time_cost: 2,
            parallelism: 3,
            salt_len: 12,
            output_len: 20,
        };
        let token = encode("x", &odd).unwrap();
        let parsed = EncodedHash::parse(&token).unwrap();
        assert_eq!(
            (parsed.memory_kib, parsed.time_cost, parsed.parallelism),
            (1000, 2, 3)
        );
        assert_eq!(parsed.salt.len(), 12);
        assert_eq!(parsed.output_len(), 20);
    }

    #[test]
    fn test_needs_rehash() {
        let hasher = Argon2idHasher::new(fast_params());
        let token = hasher.encode("correct horse").unwrap();
        assert!(!hasher.needs_rehash(&token).unwrap());

        let stronger = Argon2idHasher::new(Params {
            time_cost: 2,
            ..fast_params()
        });
        assert!(stronger.needs_rehash(&token).unwrap());

        let longer_salt = Argon2idHasher::new(Params {
            salt_len: 32,
            ..fast_params()
        });
        assert!(!longer_salt.needs_rehash(&token).unwrap());

        assert!(hasher.needs_rehash("not-a-token").unwrap_err().is_malformed());
    }
}
