/*!
 * Opaque Cryptographic Primitive Capabilities
 *
 * The combiner treats both of its building blocks as capabilities behind
 * traits: a post-quantum KEM (`encapsulate`/`decapsulate`) and a classical
 * Diffie-Hellman style key exchange (`derive`). The combiner never looks
 * inside either primitive; it only moves their inputs and outputs through
 * the composite byte layouts.
 *
 * Production implementations live in this module (`OqsKem` over liboqs,
 * `X25519` over x25519-dalek). Tests substitute their own implementations
 * to force individual primitive failures.
 */

mod ecdh;
mod pq_kem;


pub use ecdh::X25519;
pub use pq_kem::OqsKem;

use std::fmt::{self, Display};

use crate::error::CryptoResult;
use crate::secure_memory::SecureBytes;

/// Identifies the key-exchange group a composite key was provisioned for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KexGroup {
    /// Curve25519 Diffie-Hellman (RFC 7748)
    X25519,
}

impl Display for KexGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KexGroup::X25519 => write!(f, "X25519"),
        }
    }
}

/// A key-exchange private key in its group-native raw form
///
/// Wraps the raw scalar bytes in zeroize-on-drop storage so ephemeral
/// private keys are erased on every exit path, including early error
/// returns. Both raw and DER-encoded inputs normalize into this type.
pub struct KexPrivateKey {
    bytes: SecureBytes,
}

impl KexPrivateKey {
    pub fn new(bytes: SecureBytes) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.bytes.as_bytes()
    }
}

/// Post-quantum key encapsulation mechanism
///
/// All lengths are fixed per algorithm and queryable without performing
/// any cryptographic work. Implementations must be stateless per call so
/// a single instance can serve concurrent operations.
pub trait KemCapability: Send + Sync {
    /// Human-readable algorithm name, for diagnostics
    fn name(&self) -> &str;

    fn public_key_len(&self) -> usize;
    fn secret_key_len(&self) -> usize;
    fn ciphertext_len(&self) -> usize;
    fn shared_secret_len(&self) -> usize;

    /// Generate a keypair: (public key bytes, secret key bytes)
    fn keypair(&self) -> CryptoResult<(Vec<u8>, SecureBytes)>;

    /// Encapsulate against a public key: (ciphertext, shared secret)
    fn encapsulate(&self, public_key: &[u8]) -> CryptoResult<(Vec<u8>, SecureBytes)>;

    /// Recover the shared secret from a ciphertext
    fn decapsulate(&self, secret_key: &[u8], ciphertext: &[u8]) -> CryptoResult<SecureBytes>;
}

/// Classical Diffie-Hellman style key exchange
///
/// The combiner drives this capability in two roles: generating an
/// ephemeral keypair during encapsulation, and loading a static private
/// key during decapsulation. Whether stored private keys are raw scalars
/// or PKCS#8 DER documents is advertised by `raw_key_support`; the
/// combiner picks the matching decoder.
pub trait KeyExchangeCapability: Send + Sync {
    fn group(&self) -> KexGroup;

    /// Encoded public key length; also the length this group contributes
    /// to a composite ciphertext
    fn public_key_len(&self) -> usize;

    fn shared_secret_len(&self) -> usize;

    /// Whether stored private keys use the group's raw encoding rather
    /// than a structured (PKCS#8 DER) one
    fn raw_key_support(&self) -> bool;

    /// Generate a fresh keypair: (private key, encoded public key)
    fn generate_keypair(&self) -> CryptoResult<(KexPrivateKey, Vec<u8>)>;

    /// Load a private key from the group's raw encoding
    fn private_key_from_raw(&self, bytes: &[u8]) -> CryptoResult<KexPrivateKey>;

    /// Load a private key from a PKCS#8 DER document
    fn private_key_from_der(&self, bytes: &[u8]) -> CryptoResult<KexPrivateKey>;

    /// Derive the shared secret between a private key and an encoded peer
    /// public key
    fn derive(&self, private_key: &KexPrivateKey, peer_public: &[u8]) -> CryptoResult<SecureBytes>;
}
