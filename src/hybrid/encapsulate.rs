/*!
 * Hybrid Encapsulation
 *
 * Produces one composite ciphertext and one composite shared secret from
 * a peer's composite public key. The classical secret is derived first
 * but written after the KEM secret slot; the KEM ciphertext occupies the
 * front of the ciphertext buffer and the ephemeral public key follows
 * it. Those offsets are the interop contract and must be bit-exact.
 */

use super::codec;
use super::context::{Encapsulation, HybridContext};
use crate::error::{CryptoError, CryptoResult};

impl HybridContext {
    /// Encapsulate against the bound key's composite public half
    ///
    /// If either output buffer is absent this is a pure size query: the
    /// required lengths are returned and no cryptographic work happens.
    /// With both buffers present, each must hold at least the required
    /// length; shorter buffers fail `EncodingMismatch` before any
    /// primitive is invoked.
    ///
    /// On failure no partial output is valid and the caller must discard
    /// whatever was written.
    pub fn encapsulate(
        &self,
        ciphertext_out: Option<&mut [u8]>,
        secret_out: Option<&mut [u8]>,
    ) -> CryptoResult<Encapsulation> {
        let key = self.encaps_key()?;
        let descriptor = *key.descriptor();
        let ct_len = descriptor.ciphertext_len();
        let ss_len = descriptor.shared_secret_len();

        let (ct_out, secret_out) = match (ciphertext_out, secret_out) {
            (Some(ct), Some(secret)) => (ct, secret),
            _ => {
                log::trace!(
                    "hybrid encapsulate: size query, ciphertext={} secret={}",
                    ct_len,
                    ss_len
                );
                return Ok(Encapsulation::Lengths {
                    ciphertext: ct_len,
                    shared_secret: ss_len,
                });
            }
        };

        log::trace!("hybrid encapsulate: compute phase, kem={}", key.kem().name());

        let public = key.public_key().ok_or_else(|| {
            CryptoError::invalid_key_state("bound key holds no public composite")
        })?;
        let (kem_public, kex_public) = codec::decode_composite_key(public)?;
        if kex_public.len() != descriptor.kex_public_key_len {
            return Err(CryptoError::encoding_mismatch(
                "composite key key-exchange component",
                descriptor.kex_public_key_len,
                kex_public.len(),
            ));
        }

        let (ct_kem_slot, ct_kex_slot) = codec::split_out_buffer(
            ct_out,
            descriptor.kem_ciphertext_len,
            descriptor.kex_ciphertext_len,
            "ciphertext output buffer",
        )?;
        let (ss_kem_slot, ss_kex_slot) = codec::split_out_buffer(
            secret_out,
            descriptor.kem_shared_secret_len,
            descriptor.kex_shared_secret_len,
            "shared secret output buffer",
        )?;

        let kex = key.kex();
        let kem = key.kem();

        // ephemeral private key is zeroized on drop, on every exit path
        let (ephemeral_private, ephemeral_public) = kex.generate_keypair()?;

        // classical secret: derived first, written after the KEM slot
        let kex_secret = kex.derive(&ephemeral_private, kex_public)?;
        if kex_secret.len() != descriptor.kex_shared_secret_len {
            return Err(CryptoError::primitive_failure(
                "key exchange",
                "derive",
                "derived secret has unexpected length",
            ));
        }
        ss_kex_slot.copy_from_slice(kex_secret.as_bytes());

        let (kem_ciphertext, kem_secret) = kem.encapsulate(kem_public)?;
        if kem_ciphertext.len() != descriptor.kem_ciphertext_len {
            return Err(CryptoError::encoding_mismatch(
                "KEM ciphertext",
                descriptor.kem_ciphertext_len,
                kem_ciphertext.len(),
            ));
        }
        if kem_secret.len() != descriptor.kem_shared_secret_len {
            return Err(CryptoError::primitive_failure(
                "KEM",
                "encapsulate",
                "shared secret has unexpected length",
            ));
        }
        ct_kem_slot.copy_from_slice(&kem_ciphertext);
        ss_kem_slot.copy_from_slice(kem_secret.as_bytes());

        // the ephemeral public key rides after the KEM ciphertext
        if ephemeral_public.len() != descriptor.kex_ciphertext_len {
            return Err(CryptoError::parameter_copy_failure(
                descriptor.kex_ciphertext_len,
                ephemeral_public.len(),
            ));
        }
        ct_kex_slot.copy_from_slice(&ephemeral_public);

        Ok(Encapsulation::Written {
            ciphertext: ct_len,
            shared_secret: ss_len,
        })
    }
}
