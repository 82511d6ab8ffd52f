/*!
 * Error Handling for the Hybrid KEM Combiner
 *
 * Provides the single result type used throughout the crate. The two
 * underlying primitive families report failure in different ways (liboqs
 * returns its own error type, the key-exchange backend returns options and
 * booleans); every outcome is converted into `CryptoError` explicitly at
 * the call site so that no primitive convention leaks into the combiner.
 */

use thiserror::Error;

/// Error type for all hybrid KEM operations
#[derive(Debug, Error)]
pub enum CryptoError {
    /// A resource (primitive instance, buffer) could not be allocated
    #[error("allocation failure: {resource}")]
    AllocationFailure { resource: String },

    /// An operation was invoked on a context with no usable key bound,
    /// or a key handle was missing the half the operation needs
    #[error("invalid key state: {reason}")]
    InvalidKeyState { reason: String },

    /// A declared length did not match the actual length of a key,
    /// ciphertext, or output buffer
    #[error("encoding mismatch: {detail}")]
    EncodingMismatch { detail: String },

    /// The opaque KEM or key-exchange primitive reported failure
    #[error("{primitive} {operation} failed: {cause}")]
    PrimitiveFailure {
        primitive: &'static str,
        operation: &'static str,
        cause: String,
    },

    /// Re-encoding an ephemeral key-exchange public key produced an
    /// unexpected length
    #[error("parameter copy failure: ephemeral public key encoded to {actual} bytes, expected {expected}")]
    ParameterCopyFailure { expected: usize, actual: usize },
}

/// Convenience constructors for common error types
impl CryptoError {
    pub fn allocation_failure(resource: &str) -> Self {
        CryptoError::AllocationFailure {
            resource: resource.to_string(),
        }
    }

    pub fn invalid_key_state(reason: &str) -> Self {
        CryptoError::InvalidKeyState {
            reason: reason.to_string(),
        }
    }

    /// Length mismatch between what a layout declares and what is present
    pub fn encoding_mismatch(context: &str, expected: usize, actual: usize) -> Self {
        CryptoError::EncodingMismatch {
            detail: format!("{}: expected {} bytes, got {}", context, expected, actual),
        }
    }

    /// Structural (non-length) decoding failure, e.g. malformed DER
    pub fn malformed_encoding(context: &str, cause: &str) -> Self {
        CryptoError::EncodingMismatch {
            detail: format!("{}: {}", context, cause),
        }
    }

    pub fn primitive_failure(
        primitive: &'static str,
        operation: &'static str,
        cause: &str,
    ) -> Self {
        CryptoError::PrimitiveFailure {
            primitive,
            operation,
            cause: cause.to_string(),
        }
    }

    pub fn parameter_copy_failure(expected: usize, actual: usize) -> Self {
        CryptoError::ParameterCopyFailure { expected, actual }
    }

    /// Get the error category as a string
    pub fn error_type(&self) -> &'static str {
        match self {
            CryptoError::AllocationFailure { .. } => "allocation_failure",
            CryptoError::InvalidKeyState { .. } => "invalid_key_state",
            CryptoError::EncodingMismatch { .. } => "encoding_mismatch",
            CryptoError::PrimitiveFailure { .. } => "primitive_failure",
            CryptoError::ParameterCopyFailure { .. } => "parameter_copy_failure",
        }
    }
}

/// Result type alias for hybrid KEM operations
pub type CryptoResult<T> = Result<T, CryptoError>;
