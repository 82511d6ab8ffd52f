/*!
 * Shared Hybrid Key Handles
 *
 * A `HybridKeyHandle` carries the composite key bytes, the algorithm
 * pair's size descriptor, and the two primitive capabilities the key was
 * provisioned for. Handles are shared by reference counting: cloning is
 * the retain operation, dropping is the release, and when the last
 * reference goes away the private composite half is zeroed before its
 * memory is returned.
 *
 * Multiple contexts on multiple threads may hold retained references and
 * read the descriptor and key bytes concurrently; only the reference
 * count itself is mutated, atomically, by retain/release.
 */

use std::sync::Arc;

use crate::primitive::{KemCapability, KexGroup, KeyExchangeCapability};
use crate::secure_memory::SecureBytes;

/// Fixed sizes and capabilities of one negotiated hybrid algorithm pair
///
/// Immutable once built; reads are side-effect-free and safe from any
/// thread holding a retained handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlgorithmDescriptor {
    pub kem_ciphertext_len: usize,
    pub kem_shared_secret_len: usize,
    pub kex_public_key_len: usize,
    pub kex_shared_secret_len: usize,
    /// Length the key-exchange side contributes to a composite
    /// ciphertext; equal to `kex_public_key_len` for Diffie-Hellman
    /// style groups, where the ciphertext is an ephemeral public key
    pub kex_ciphertext_len: usize,
    /// Whether the composite private key stores the key-exchange half in
    /// the group's raw encoding (vs. a PKCS#8 DER document)
    pub raw_key_support: bool,
    /// Group parameters for the key-exchange primitive
    pub group: KexGroup,
}

impl AlgorithmDescriptor {
    /// Build a descriptor from the two capabilities' fixed lengths
    pub fn for_capabilities(
        kem: &dyn KemCapability,
        kex: &dyn KeyExchangeCapability,
    ) -> Self {
        Self {
            kem_ciphertext_len: kem.ciphertext_len(),
            kem_shared_secret_len: kem.shared_secret_len(),
            kex_public_key_len: kex.public_key_len(),
            kex_shared_secret_len: kex.shared_secret_len(),
            kex_ciphertext_len: kex.public_key_len(),
            raw_key_support: kex.raw_key_support(),
            group: kex.group(),
        }
    }

    /// Total composite ciphertext length
    pub fn ciphertext_len(&self) -> usize {
        self.kem_ciphertext_len + self.kex_ciphertext_len
    }

    /// Total composite shared secret length
    pub fn shared_secret_len(&self) -> usize {
        self.kem_shared_secret_len + self.kex_shared_secret_len
    }
}

/// Composite key bytes held by a handle
///
/// Either half may be absent: an imported peer key carries only the
/// public composite, a decapsulation-only key may carry only the private
/// one. The private half lives in zeroize-on-drop storage.
pub struct HybridKeyMaterial {
    public: Option<Vec<u8>>,
    private: Option<SecureBytes>,
}

impl HybridKeyMaterial {
    pub fn public_only(public: Vec<u8>) -> Self {
        Self {
            public: Some(public),
            private: None,
        }
    }

    pub fn private_only(private: SecureBytes) -> Self {
        Self {
            public: None,
            private: Some(private),
        }
    }

    pub fn keypair(public: Vec<u8>, private: SecureBytes) -> Self {
        Self {
            public: Some(public),
            private: Some(private),
        }
    }
}

pub(crate) struct KeyInner {
    material: HybridKeyMaterial,
    descriptor: AlgorithmDescriptor,
    kem: Arc<dyn KemCapability>,
    kex: Arc<dyn KeyExchangeCapability>,
}

/// Reference-counted handle over one composite key
///
/// `Clone` is the retain operation; dropping a handle is the release.
/// The underlying key object lives as long as its longest-lived holder.
pub struct HybridKeyHandle {
    inner: Arc<KeyInner>,
}

impl HybridKeyHandle {
    /// Wrap pre-decoded composite key material for the given algorithm
    /// pair
    pub fn bind(
        material: HybridKeyMaterial,
        descriptor: AlgorithmDescriptor,
        kem: Arc<dyn KemCapability>,
        kex: Arc<dyn KeyExchangeCapability>,
    ) -> Self {
        log::debug!(
            "hybrid key bound: kem={} group={} raw_key_support={}",
            kem.name(),
            descriptor.group,
            descriptor.raw_key_support
        );

        Self {
            inner: Arc::new(KeyInner {
                material,
                descriptor,
                kem,
                kex,
            }),
        }
    }

    /// Take a new owning reference to the same underlying key
    pub fn retain(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }

    /// The algorithm pair's size and capability descriptor
    pub fn descriptor(&self) -> &AlgorithmDescriptor {
        &self.inner.descriptor
    }

    /// The composite public key bytes, if this handle carries them
    pub fn public_key(&self) -> Option<&[u8]> {
        self.inner.material.public.as_deref()
    }

    /// Number of live references to the underlying key object
    pub fn reference_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    pub(crate) fn private_key(&self) -> Option<&[u8]> {
        self.inner
            .material
            .private
            .as_ref()
            .map(SecureBytes::as_bytes)
    }

    pub(crate) fn kem(&self) -> &dyn KemCapability {
        &*self.inner.kem
    }

    pub(crate) fn kex(&self) -> &dyn KeyExchangeCapability {
        &*self.inner.kex
    }

    #[cfg(test)]
    pub(crate) fn inner_weak(&self) -> std::sync::Weak<KeyInner> {
        Arc::downgrade(&self.inner)
    }
}

impl Clone for HybridKeyHandle {
    fn clone(&self) -> Self {
        self.retain()
    }
}
