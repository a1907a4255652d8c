//! Passhash Crate - Argon2id Password Hashing Codec
//!
//! This crate turns a plaintext credential into a single portable token and
//! checks candidate plaintexts against stored tokens:
//! - Cost parameters and recommended profiles
//! - Salt generation and constant-time comparison
//! - Token text format (`$argon2id$v=19$m=..,t=..,p=..$<salt>$<hash>`)
//! - Encode / verify operations
//! - Environment configuration
//! - Memory-bounded async hashing for servers
//!
//! ## Caller obligations
//! Every derivation allocates `memory_kib` KiB for its whole duration.
//! Hosts running many verifications at once must bound concurrency
//! (see [`pool::BoundedHasher`]). Derivations are not cancellable; a caller
//! that times out simply discards the result.

pub mod codec;
pub mod config;
pub mod crypto;
pub mod error;
pub mod params;
pub mod password;
pub mod pool;
pub mod token;

pub use codec::{Argon2idHasher, encode, encode_with_salt, verify};
pub use error::{PasswordHashError, PasswordHashResult};
pub use params::Params;
pub use password::ClearTextPassword;
pub use token::EncodedHash;
