/*!
 * hykem: Hybrid Key Encapsulation Combiner
 *
 * This crate composes one post-quantum key encapsulation mechanism with
 * one classical key exchange into a single encapsulation operation that
 * yields one ciphertext and one shared secret. The combined scheme
 * remains secure if either underlying primitive alone is broken.
 *
 * The primitives are consumed as opaque capabilities:
 *
 * - post-quantum KEMs come from liboqs via the `oqs` crate
 * - classical key exchange is X25519 via `x25519-dalek`
 *
 * The crate owns the byte-level encoding of composite keys and
 * ciphertexts, the order the two primitives are invoked in, the order
 * their outputs are concatenated in, and the failure-atomicity of the
 * combined operations. It does not negotiate algorithms, perform I/O, or
 * implement any primitive arithmetic.
 *
 * # Example
 *
 * ```no_run
 * use hykem::prelude::*;
 *
 * fn main() -> Result<(), CryptoError> {
 *     init()?;
 *
 *     let key = generate_keypair(HybridSuite::X25519MlKem768)?;
 *
 *     let mut sender = HybridContext::new();
 *     sender.init_encapsulate(&key)?;
 *
 *     // size query, then compute
 *     let Encapsulation::Lengths { ciphertext, shared_secret } =
 *         sender.encapsulate(None, None)? else { unreachable!() };
 *     let mut ct = vec![0u8; ciphertext];
 *     let mut secret = vec![0u8; shared_secret];
 *     sender.encapsulate(Some(&mut ct), Some(&mut secret))?;
 *
 *     let mut receiver = HybridContext::new();
 *     receiver.init_decapsulate(&key)?;
 *     let mut recovered = vec![0u8; shared_secret];
 *     receiver.decapsulate(Some(&mut recovered), &ct)?;
 *
 *     assert_eq!(secret, recovered);
 *     Ok(())
 * }
 * ```
 */

/// Common error types for the combiner
pub mod error;

/// The hybrid combiner: composite codecs, key handles, contexts
pub mod hybrid;

/// Suite registry and composite keypair provisioning
pub mod key_management;

/// Opaque primitive capabilities (post-quantum KEM, classical key exchange)
pub mod primitive;

/// Secure memory handling utilities
pub mod secure_memory;

// Re-export main types for convenience
pub use error::{CryptoError, CryptoResult};
pub use hybrid::{
    AlgorithmDescriptor, Decapsulation, Encapsulation, HybridContext, HybridKeyHandle,
    HybridKeyMaterial, HybridRole,
};
pub use key_management::{generate_keypair, import_public_key, HybridSuite};
pub use secure_memory::SecureBytes;

/// Initialize the underlying cryptographic libraries.
///
/// Must be called once before any KEM operation; it initializes liboqs.
/// Safe to call repeatedly.
pub fn init() -> CryptoResult<()> {
    oqs::init();
    Ok(())
}

/// The most commonly used types in one import
pub mod prelude {
    pub use crate::error::{CryptoError, CryptoResult};
    pub use crate::hybrid::{
        Decapsulation, Encapsulation, HybridContext, HybridKeyHandle, HybridRole,
    };
    pub use crate::init;
    pub use crate::key_management::{generate_keypair, import_public_key, HybridSuite};
}
