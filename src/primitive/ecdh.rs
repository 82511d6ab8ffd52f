/*!
 * Classical Key Exchange Capability: X25519
 *
 * Curve25519 Diffie-Hellman (RFC 7748) over x25519-dalek. X25519 private
 * keys have a raw 32-byte scalar encoding, so `raw_key_support` is true;
 * the PKCS#8 decoder is still provided for composite keys provisioned by
 * stores that only emit DER documents (RFC 8410 id-X25519).
 */

use pkcs8::{ObjectIdentifier, PrivateKeyInfo};
use rand::rngs::OsRng;
use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::Zeroizing;

use super::{KexGroup, KexPrivateKey, KeyExchangeCapability};
use crate::error::{CryptoError, CryptoResult};
use crate::secure_memory::SecureBytes;

const X25519_KEY_LEN: usize = 32;
const X25519_SECRET_LEN: usize = 32;

/// id-X25519 from RFC 8410
const X25519_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.101.110");

/// X25519 key-exchange capability
pub struct X25519;

impl X25519 {
    fn secret_from_bytes(&self, bytes: &[u8]) -> CryptoResult<StaticSecret> {
        let scalar: [u8; X25519_KEY_LEN] = bytes.try_into().map_err(|_| {
            CryptoError::encoding_mismatch("X25519 private key", X25519_KEY_LEN, bytes.len())
        })?;
        Ok(StaticSecret::from(scalar))
    }
}

impl KeyExchangeCapability for X25519 {
    fn group(&self) -> KexGroup {
        KexGroup::X25519
    }

    fn public_key_len(&self) -> usize {
        X25519_KEY_LEN
    }

    fn shared_secret_len(&self) -> usize {
        X25519_SECRET_LEN
    }

    fn raw_key_support(&self) -> bool {
        true
    }

    fn generate_keypair(&self) -> CryptoResult<(KexPrivateKey, Vec<u8>)> {
        let secret = StaticSecret::random_from_rng(OsRng);
        let public = PublicKey::from(&secret);

        let scalar = Zeroizing::new(secret.to_bytes());
        let private = KexPrivateKey::new(SecureBytes::new(&*scalar));

        Ok((private, public.as_bytes().to_vec()))
    }

    fn private_key_from_raw(&self, bytes: &[u8]) -> CryptoResult<KexPrivateKey> {
        if bytes.len() != X25519_KEY_LEN {
            return Err(CryptoError::encoding_mismatch(
                "X25519 private key",
                X25519_KEY_LEN,
                bytes.len(),
            ));
        }
        Ok(KexPrivateKey::new(SecureBytes::new(bytes)))
    }

    fn private_key_from_der(&self, bytes: &[u8]) -> CryptoResult<KexPrivateKey> {
        let info = PrivateKeyInfo::try_from(bytes).map_err(|e| {
            CryptoError::malformed_encoding("PKCS#8 key-exchange private key", &e.to_string())
        })?;

        if info.algorithm.oid != X25519_OID {
            return Err(CryptoError::malformed_encoding(
                "PKCS#8 key-exchange private key",
                &format!("unexpected algorithm {}", info.algorithm.oid),
            ));
        }

        // RFC 8410: the privateKey field wraps the raw scalar in an inner
        // OCTET STRING (tag 0x04, length 0x20)
        let inner = info.private_key;
        if inner.len() != X25519_KEY_LEN + 2 || inner[0] != 0x04 || inner[1] != X25519_KEY_LEN as u8
        {
            return Err(CryptoError::malformed_encoding(
                "PKCS#8 key-exchange private key",
                "privateKey field is not an OCTET STRING holding a 32-byte scalar",
            ));
        }

        self.private_key_from_raw(&inner[2..])
    }

    fn derive(&self, private_key: &KexPrivateKey, peer_public: &[u8]) -> CryptoResult<SecureBytes> {
        let secret = self.secret_from_bytes(private_key.as_bytes())?;

        let point: [u8; X25519_KEY_LEN] = peer_public.try_into().map_err(|_| {
            CryptoError::encoding_mismatch("X25519 peer public key", X25519_KEY_LEN, peer_public.len())
        })?;
        let peer = PublicKey::from(point);

        let shared = secret.diffie_hellman(&peer);
        if !shared.was_contributory() {
            // small-order peer point; the all-zero output must never be
            // used as half of a composite secret
            return Err(CryptoError::primitive_failure(
                "X25519",
                "derive",
                "non-contributory shared secret",
            ));
        }

        Ok(SecureBytes::new(shared.as_bytes()))
    }
}
