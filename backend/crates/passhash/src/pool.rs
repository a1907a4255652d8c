//! Bounded Async Hashing
//!
//! Argon2id holds `memory_kib` KiB for the whole derivation, so an
//! unbounded number of concurrent logins can exhaust memory. This module
//! runs derivations on the blocking thread pool behind a semaphore sized
//! from a memory budget.
//!
//! Dropping a returned future discards the result only. The derivation
//! keeps running to completion on its blocking thread and keeps its permit
//! until then, so the budget stays accurate.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::{self, JoinError};

use crate::codec::{self, Argon2idHasher};
use crate::error::PasswordHashError;
use crate::params::Params;
use crate::password::ClearTextPassword;
use crate::token::EncodedHash;

/// Default memory budget for the pool (1 GiB)
pub const DEFAULT_MEMORY_BUDGET_KIB: u64 = 1024 * 1024;

/// Pool result type alias
pub type PoolResult<T> = Result<T, PoolError>;

/// Pool errors
#[derive(Debug, Error)]
pub enum PoolError {
    /// Codec error (malformed token, entropy failure, ...)
    #[error(transparent)]
    Hash(#[from] PasswordHashError),

    /// The blocking task panicked or was aborted
    #[error("Password hashing task failed: {0}")]
    Join(#[from] JoinError),

    /// The semaphore was closed
    #[error("Password hashing pool is closed")]
    Closed,
}

/// Async password hashing interface
#[trait_variant::make(PasswordHashing: Send)]
pub trait LocalPasswordHashing {
    /// Hash a password into a new token
    async fn hash(&self, password: ClearTextPassword) -> PoolResult<String>;

    /// Verify a password against a stored token
    async fn verify(&self, password: ClearTextPassword, token: &str) -> PoolResult<bool>;
}

/// [`Argon2idHasher`] with a cap on concurrent derivations
///
/// Every derivation takes one permit. Permits are sized from the configured
/// `memory_kib`, so verifying a stored token with a larger `m=` uses more
/// memory per permit and can exceed the budget; rehash such tokens
/// (see [`Argon2idHasher::needs_rehash`]).
#[derive(Debug, Clone)]
pub struct BoundedHasher {
    hasher: Argon2idHasher,
    permits: Arc<Semaphore>,
    capacity: usize,
}

impl BoundedHasher {
    /// Size the pool so that `capacity × memory_kib` fits in the budget
    pub fn new(hasher: Argon2idHasher, memory_budget_kib: u64) -> Self {
        let capacity = Self::permits_for_budget(hasher.params(), memory_budget_kib);
        tracing::info!(
            memory_budget_kib,
            memory_kib = hasher.params().memory_kib,
            capacity,
            "Password hashing pool sized"
        );
        Self::with_permits(hasher, capacity)
    }

    /// Pool with an explicit number of concurrent derivations (minimum 1)
    pub fn with_permits(hasher: Argon2idHasher, permits: usize) -> Self {
        let capacity = permits.max(1);
        Self {
            hasher,
            permits: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// `budget / memory_kib`, at least 1
    pub fn permits_for_budget(params: &Params, memory_budget_kib: u64) -> usize {
        let per_call = u64::from(params.memory_kib.max(1));
        usize::try_from(memory_budget_kib / per_call)
            .unwrap_or(usize::MAX)
            .max(1)
    }

    pub fn hasher(&self) -> &Argon2idHasher {
        &self.hasher
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Permits not currently held by a derivation
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    async fn acquire(&self) -> PoolResult<OwnedSemaphorePermit> {
        self.permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| PoolError::Closed)
    }
}

impl PasswordHashing for BoundedHasher {
    async fn hash(&self, password: ClearTextPassword) -> PoolResult<String> {
        let permit = self.acquire().await?;
        let hasher = self.hasher.clone();

        let token = task::spawn_blocking(move || {
            let _permit = permit;
            hasher.encode(password.as_str())
        })
        .await??;

        Ok(token)
    }

    async fn verify(&self, password: ClearTextPassword, token: &str) -> PoolResult<bool> {
        // Malformed tokens are rejected before taking a permit
        let parsed = EncodedHash::parse(token).inspect_err(|e| {
            tracing::warn!(error_class = e.class(), "Stored password hash rejected");
        })?;

        let permit = self.acquire().await?;
        let result = task::spawn_blocking(move || {
            let _permit = permit;
            codec::verify_parsed(password.as_str(), &parsed)
        })
        .await?;

        match &result {
            Ok(matched) => tracing::debug!(matched, "Password verification finished"),
            Err(e) => tracing::warn!(error_class = e.class(), "Password verification failed"),
        }

        Ok(result?)
    }
}
