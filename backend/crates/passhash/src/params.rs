//! Argon2id Cost Parameters

/// Default memory cost (64 MiB)
pub const DEFAULT_MEMORY_KIB: u32 = 64 * 1024;

/// Default number of passes
pub const DEFAULT_TIME_COST: u32 = 3;

/// Default lane count
pub const DEFAULT_PARALLELISM: u32 = 4;

/// Salt length in bytes (128 bits)
pub const DEFAULT_SALT_LEN: usize = 16;

/// Derived output length in bytes
pub const DEFAULT_OUTPUT_LEN: usize = 32;

/// Cost parameters for one derivation
///
/// Values are used exactly as given. Nothing is clamped, because a token
/// must verify with the parameters it was created with. Range checks are the
/// caller's policy; the primitive itself rejects values it cannot run
/// (see [`crate::PasswordHashError::InvalidParameters`]).
///
/// ## Examples
/// ```rust
/// use passhash::Params;
///
/// let params = Params {
///     time_cost: 4,
///     ..Params::default()
/// };
/// assert_eq!(params.memory_kib, 65536);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Params {
    /// Working memory in KiB
    pub memory_kib: u32,
    /// Number of passes over memory
    pub time_cost: u32,
    /// Number of lanes
    pub parallelism: u32,
    /// Salt length in bytes
    pub salt_len: usize,
    /// Derived output length in bytes
    pub output_len: usize,
}

impl Default for Params {
    /// 64 MiB, t=3, p=4, 16-byte salt, 32-byte output
    fn default() -> Self {
        Self {
            memory_kib: DEFAULT_MEMORY_KIB,
            time_cost: DEFAULT_TIME_COST,
            parallelism: DEFAULT_PARALLELISM,
            salt_len: DEFAULT_SALT_LEN,
            output_len: DEFAULT_OUTPUT_LEN,
        }
    }
}

impl Params {
    /// Profile for dedicated auth hosts: 128 MiB, t=6, p=4
    pub fn hardened() -> Self {
        Self {
            memory_kib: 128 * 1024,
            time_cost: 6,
            ..Self::default()
        }
    }

    /// Convert into the primitive's parameter block
    pub(crate) fn to_argon2(&self) -> Result<argon2::Params, argon2::Error> {
        argon2::Params::new(
            self.memory_kib,
            self.time_cost,
            self.parallelism,
            Some(self.output_len),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile() {
        let params = Params::default();
        assert_eq!(params.memory_kib, 65536);
        assert_eq!(params.time_cost, 3);
        assert_eq!(params.parallelism, 4);
        assert_eq!(params.salt_len, 16);
        assert_eq!(params.output_len, 32);
    }

    #[test]
    fn test_hardened_profile() {
        let params = Params::hardened();
        assert_eq!(params.memory_kib, 131072);
        assert_eq!(params.time_cost, 6);
        assert_eq!(params.parallelism, 4);
        assert_eq!(params.salt_len, 16);
        assert_eq!(params.output_len, 32);
    }

    #[test]
    fn test_to_argon2_is_not_clamped() {
        let params = Params::default().to_argon2().unwrap();
        assert_eq!(params.m_cost(), 65536);
        assert_eq!(params.t_cost(), 3);
        assert_eq!(params.p_cost(), 4);
        assert_eq!(params.output_len(), Some(32));
    }

    #[test]
    fn test_to_argon2_rejects_zero_lanes() {
        let params = Params {
            parallelism: 0,
            ..Params::default()
        };
        assert!(params.to_argon2().is_err());
    }
}
