/*!
 * Hybrid KEM Session Contexts
 *
 * A `HybridContext` binds one key handle for one role at a time and
 * drives either an encapsulation or a decapsulation. Contexts are
 * exclusively owned by their caller; the state machine is
 *
 * ```text
 * Uninitialized -> Bound(Encaps | Decaps) -> Released
 * ```
 *
 * Re-binding is legal any time before release and always supersedes the
 * prior binding, dropping the old key reference. Release is idempotent;
 * a released context rejects every further operation.
 */

use super::key::HybridKeyHandle;
use crate::error::{CryptoError, CryptoResult};

/// Which operation a context was initialized for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HybridRole {
    Encapsulate,
    Decapsulate,
}

/// Result of an encapsulation call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encapsulation {
    /// Size query: required output buffer lengths, nothing computed
    Lengths {
        ciphertext: usize,
        shared_secret: usize,
    },
    /// Compute phase completed; lengths actually written
    Written {
        ciphertext: usize,
        shared_secret: usize,
    },
}

/// Result of a decapsulation call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decapsulation {
    /// Size query: required secret buffer length, nothing computed
    Length { shared_secret: usize },
    /// Compute phase completed; length actually written
    Written { shared_secret: usize },
}

enum State {
    Uninitialized,
    BoundForEncaps(HybridKeyHandle),
    BoundForDecaps(HybridKeyHandle),
    Released,
}

/// Session object for hybrid encapsulation and decapsulation
pub struct HybridContext {
    state: State,
}

impl HybridContext {
    /// Create an empty context with no key bound
    pub fn new() -> Self {
        log::trace!("hybrid context created");
        Self {
            state: State::Uninitialized,
        }
    }

    /// Bind a key for encapsulation, superseding any prior binding
    ///
    /// The old key's reference is released before the new one is
    /// retained.
    pub fn init_encapsulate(&mut self, key: &HybridKeyHandle) -> CryptoResult<()> {
        self.rebind(State::BoundForEncaps(key.retain()))
    }

    /// Bind a key for decapsulation, superseding any prior binding
    pub fn init_decapsulate(&mut self, key: &HybridKeyHandle) -> CryptoResult<()> {
        self.rebind(State::BoundForDecaps(key.retain()))
    }

    fn rebind(&mut self, next: State) -> CryptoResult<()> {
        if matches!(self.state, State::Released) {
            return Err(CryptoError::invalid_key_state(
                "context has been released",
            ));
        }
        // assigning drops the previous binding's key reference
        self.state = next;
        log::trace!("hybrid context bound for {:?}", self.role());
        Ok(())
    }

    /// The currently bound role, if any
    pub fn role(&self) -> Option<HybridRole> {
        match self.state {
            State::BoundForEncaps(_) => Some(HybridRole::Encapsulate),
            State::BoundForDecaps(_) => Some(HybridRole::Decapsulate),
            State::Uninitialized | State::Released => None,
        }
    }

    /// Drop the held key reference and retire the context
    ///
    /// Idempotent; every subsequent operation fails with
    /// `InvalidKeyState`.
    pub fn release(&mut self) {
        self.state = State::Released;
        log::trace!("hybrid context released");
    }

    pub(super) fn encaps_key(&self) -> CryptoResult<&HybridKeyHandle> {
        match &self.state {
            State::BoundForEncaps(key) => Ok(key),
            State::BoundForDecaps(_) => Err(CryptoError::invalid_key_state(
                "context is bound for decapsulation",
            )),
            State::Uninitialized => Err(CryptoError::invalid_key_state("no key bound")),
            State::Released => Err(CryptoError::invalid_key_state("context has been released")),
        }
    }

    pub(super) fn decaps_key(&self) -> CryptoResult<&HybridKeyHandle> {
        match &self.state {
            State::BoundForDecaps(key) => Ok(key),
            State::BoundForEncaps(_) => Err(CryptoError::invalid_key_state(
                "context is bound for encapsulation",
            )),
            State::Uninitialized => Err(CryptoError::invalid_key_state("no key bound")),
            State::Released => Err(CryptoError::invalid_key_state("context has been released")),
        }
    }
}

impl Default for HybridContext {
    fn default() -> Self {
        Self::new()
    }
}
