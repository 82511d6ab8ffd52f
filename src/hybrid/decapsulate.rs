/*!
 * Hybrid Decapsulation
 *
 * Recovers the composite shared secret from a composite ciphertext and
 * the bound key's composite private half. Both primitives must succeed;
 * a secret derived from only one of the two is never returned, because a
 * half-valid secret would hand an attacker a partial-secret oracle.
 */

use super::codec;
use super::context::{Decapsulation, HybridContext};
use crate::error::{CryptoError, CryptoResult};

impl HybridContext {
    /// Decapsulate a composite ciphertext with the bound key's private
    /// half
    ///
    /// An absent secret buffer makes this a pure size query. With a
    /// buffer present, a ciphertext whose length is not exactly
    /// `kem_ciphertext_len + kex_public_key_len` fails with
    /// `EncodingMismatch` and nothing is written.
    pub fn decapsulate(
        &self,
        secret_out: Option<&mut [u8]>,
        ciphertext: &[u8],
    ) -> CryptoResult<Decapsulation> {
        let key = self.decaps_key()?;
        let descriptor = *key.descriptor();
        let ss_len = descriptor.shared_secret_len();

        let secret_out = match secret_out {
            Some(secret) => secret,
            None => {
                log::trace!("hybrid decapsulate: size query, secret={}", ss_len);
                return Ok(Decapsulation::Length {
                    shared_secret: ss_len,
                });
            }
        };

        log::trace!("hybrid decapsulate: compute phase, kem={}", key.kem().name());

        let private = key.private_key().ok_or_else(|| {
            CryptoError::invalid_key_state("bound key holds no private composite")
        })?;
        let (kem_private, kex_private_bytes) = codec::decode_composite_key(private)?;

        // the descriptor advertises how the key-exchange private half is
        // encoded; pick the matching decoder
        let kex = key.kex();
        let kex_private = if descriptor.raw_key_support {
            kex.private_key_from_raw(kex_private_bytes)?
        } else {
            kex.private_key_from_der(kex_private_bytes)?
        };

        let (ct_kem, ct_kex) = codec::split_ciphertext(
            ciphertext,
            descriptor.kem_ciphertext_len,
            descriptor.kex_public_key_len,
        )?;

        let (ss_kem_slot, ss_kex_slot) = codec::split_out_buffer(
            secret_out,
            descriptor.kem_shared_secret_len,
            descriptor.kex_shared_secret_len,
            "shared secret output buffer",
        )?;

        // classical secret from the peer's ephemeral public key, written
        // after the KEM slot
        let kex_secret = kex.derive(&kex_private, ct_kex)?;
        if kex_secret.len() != descriptor.kex_shared_secret_len {
            return Err(CryptoError::primitive_failure(
                "key exchange",
                "derive",
                "derived secret has unexpected length",
            ));
        }
        ss_kex_slot.copy_from_slice(kex_secret.as_bytes());

        let kem_secret = key.kem().decapsulate(kem_private, ct_kem)?;
        if kem_secret.len() != descriptor.kem_shared_secret_len {
            return Err(CryptoError::primitive_failure(
                "KEM",
                "decapsulate",
                "shared secret has unexpected length",
            ));
        }
        ss_kem_slot.copy_from_slice(kem_secret.as_bytes());

        Ok(Decapsulation::Written {
            shared_secret: ss_len,
        })
    }
}
