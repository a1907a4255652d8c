//! Token Text Format
//!
//! ```text
//! $argon2id$v=19$m=<memoryKiB>,t=<timeCost>,p=<parallelism>$<salt>$<hash>
//! ```
//!
//! Parsing runs in two stages:
//! 1. **Segment classification** - the token is split on `$`, empty segments
//!    are dropped, the last two segments are the salt and hash, and every
//!    remaining header segment is classified by content as algorithm tag,
//!    version or parameter list.
//! 2. **Field extraction** - each classified segment is parsed on its own.
//!
//! Accepted variations: leading/trailing/repeated `$`, a missing `v=`
//! segment, `m`/`t`/`p` in any order, padded or unpadded base64.
//! Everything else (unknown or repeated segments, unknown parameter keys,
//! signs or whitespace in numbers) is rejected.

use std::fmt;

use crate::crypto::{from_base64_lenient, to_base64};
use crate::error::{PasswordHashError, PasswordHashResult, TokenField};

/// Algorithm identifier written into every token
pub const ALGORITHM: &str = "argon2id";

/// Argon2 version marker (0x13)
pub const VERSION: u32 = 19;

/// Separator between token fields
const SEPARATOR: char = '$';

/// A token decomposed into its fields
///
/// `Display` writes the canonical form, with unpadded base64.
///
/// ## Examples
/// ```rust
/// use passhash::EncodedHash;
///
/// let parsed = EncodedHash::parse(
///     "$argon2id$v=19$m=65536,t=3,p=4$AAAAAAAAAAAAAAAAAAAAAA$8GOfD8luJKywIiNQATjRC0t9/sBbIbMs/a2OVn+rTR8",
/// )?;
/// assert_eq!((parsed.memory_kib, parsed.time_cost, parsed.parallelism), (65536, 3, 4));
/// # Ok::<(), passhash::PasswordHashError>(())
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedHash {
    pub memory_kib: u32,
    pub time_cost: u32,
    pub parallelism: u32,
    pub salt: Vec<u8>,
    pub hash: Vec<u8>,
}

/// Header segment kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    Algorithm(&'a str),
    Version(&'a str),
    CostParams(&'a str),
}

impl<'a> Segment<'a> {
    fn classify(raw: &'a str) -> Self {
        if let Some(version) = raw.strip_prefix("v=") {
            Segment::Version(version)
        } else if raw.contains('=') {
            Segment::CostParams(raw)
        } else {
            Segment::Algorithm(raw)
        }
    }
}

/// Header fields collected during classification
#[derive(Debug, Default)]
struct Header<'a> {
    algorithm: Option<&'a str>,
    version: Option<&'a str>,
    cost_params: Option<&'a str>,
}

impl<'a> Header<'a> {
    fn collect(segments: &[&'a str]) -> PasswordHashResult<Self> {
        let mut header = Header::default();
        for &raw in segments {
            let (slot, name) = match Segment::classify(raw) {
                // A foreign tag wins over any structural complaint
                Segment::Algorithm(s) if s != ALGORITHM => {
                    return Err(PasswordHashError::UnsupportedAlgorithm(s.to_string()));
                }
                Segment::Algorithm(s) => (&mut header.algorithm, s),
                Segment::Version(s) => (&mut header.version, s),
                Segment::CostParams(s) => (&mut header.cost_params, s),
            };
            if slot.replace(name).is_some() {
                return Err(PasswordHashError::MalformedToken("repeated header segment"));
            }
        }
        Ok(header)
    }
}

impl EncodedHash {
    /// Parse a stored token
    ///
    /// ## Errors
    /// - [`PasswordHashError::UnsupportedAlgorithm`] - tag missing, not
    ///   `argon2id`, or a version other than `v=19`
    /// - [`PasswordHashError::MalformedToken`] - structural problems
    /// - [`PasswordHashError::DecodeFailure`] - salt or hash is not base64
    pub fn parse(token: &str) -> PasswordHashResult<Self> {
        let segments: Vec<&str> = token
            .trim()
            .split(SEPARATOR)
            .filter(|s| !s.is_empty())
            .collect();

        // algorithm, parameters, salt, hash (version optional)
        if segments.len() < 4 {
            return Err(PasswordHashError::MalformedToken(
                "expected algorithm, parameters, salt and hash segments",
            ));
        }

        let (header_segments, payload) = segments.split_at(segments.len() - 2);
        let header = Header::collect(header_segments)?;

        if header.algorithm.is_none() {
            return Err(PasswordHashError::UnsupportedAlgorithm(
                "missing algorithm identifier".to_string(),
            ));
        }

        if let Some(version) = header.version {
            if parse_decimal(version) != Some(VERSION) {
                return Err(PasswordHashError::UnsupportedAlgorithm(format!(
                    "{ALGORITHM} version {version}"
                )));
            }
        }

        let cost_params = header
            .cost_params
            .ok_or(PasswordHashError::MalformedToken("missing m=,t=,p= parameters"))?;
        let (memory_kib, time_cost, parallelism) = parse_cost_params(cost_params)?;

        let salt = decode_payload(payload[0], TokenField::Salt)?;
        let hash = decode_payload(payload[1], TokenField::Hash)?;

        Ok(Self {
            memory_kib,
            time_cost,
            parallelism,
            salt,
            hash,
        })
    }

    /// Length of the stored derived output
    pub fn output_len(&self) -> usize {
        self.hash.len()
    }
}

impl fmt::Display for EncodedHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "${ALGORITHM}$v={VERSION}$m={},t={},p={}${}${}",
            self.memory_kib,
            self.time_cost,
            self.parallelism,
            to_base64(&self.salt),
            to_base64(&self.hash),
        )
    }
}

impl fmt::Debug for EncodedHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodedHash")
            .field("memory_kib", &self.memory_kib)
            .field("time_cost", &self.time_cost)
            .field("parallelism", &self.parallelism)
            .field("salt_len", &self.salt.len())
            .field("hash", &"[HASH]")
            .finish()
    }
}

/// Decode a salt or hash segment; empty output is rejected
fn decode_payload(segment: &str, field: TokenField) -> PasswordHashResult<Vec<u8>> {
    let bytes =
        from_base64_lenient(segment).map_err(|_| PasswordHashError::DecodeFailure { field })?;
    if bytes.is_empty() {
        return Err(PasswordHashError::MalformedToken(match field {
            TokenField::Salt => "decoded salt is empty",
            TokenField::Hash => "decoded hash is empty",
        }));
    }
    Ok(bytes)
}

/// Parse `m=..,t=..,p=..` in any key order
fn parse_cost_params(segment: &str) -> PasswordHashResult<(u32, u32, u32)> {
    let mut memory = None;
    let mut time = None;
    let mut lanes = None;

    for pair in segment.split(',') {
        let (key, value) = pair
            .split_once('=')
            .ok_or(PasswordHashError::MalformedToken("parameter without value"))?;
        let slot = match key {
            "m" => &mut memory,
            "t" => &mut time,
            "p" => &mut lanes,
            _ => return Err(PasswordHashError::MalformedToken("unknown parameter")),
        };
        let value = parse_decimal(value).ok_or(PasswordHashError::MalformedToken(
            "parameter is not a decimal integer",
        ))?;
        if value == 0 {
            return Err(PasswordHashError::MalformedToken(
                "cost parameter must be positive",
            ));
        }
        if slot.replace(value).is_some() {
            return Err(PasswordHashError::MalformedToken("repeated parameter"));
        }
    }

    match (memory, time, lanes) {
        (Some(m), Some(t), Some(p)) => Ok((m, t, p)),
        _ => Err(PasswordHashError::MalformedToken(
            "missing m=,t=,p= parameters",
        )),
    }
}

/// Plain ASCII digits only (`u32::from_str` would also take a leading `+`)
fn parse_decimal(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
