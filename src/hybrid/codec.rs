/*!
 * Composite Key and Ciphertext Byte Layouts
 *
 * A composite key (public or private) stores both primitive components
 * with big-endian length prefixes:
 *
 * ```text
 * kemLen:u32be || kemBytes[kemLen] || kexLen:u32be || kexBytes[kexLen]
 * ```
 *
 * A composite ciphertext carries no prefixes because both components have
 * algorithm-fixed sizes:
 *
 * ```text
 * ctKem[kemCtLen] || ctKex[kexPubLen]
 * ```
 *
 * Decoding returns views into the input; nothing is copied. Every declared
 * length is validated against the enclosing buffer before a slice is
 * formed, and the buffer must be consumed exactly.
 */

use crate::error::{CryptoError, CryptoResult};

const LEN_PREFIX: usize = 4;

/// Read one big-endian u32 length prefix at `offset`
fn read_len(buf: &[u8], offset: usize, context: &'static str) -> CryptoResult<usize> {
    let end = offset.checked_add(LEN_PREFIX).ok_or_else(|| {
        CryptoError::malformed_encoding(context, "length prefix offset overflows")
    })?;
    let prefix = buf.get(offset..end).ok_or_else(|| {
        CryptoError::malformed_encoding(context, "buffer too short for length prefix")
    })?;
    let mut raw = [0u8; LEN_PREFIX];
    raw.copy_from_slice(prefix);
    Ok(u32::from_be_bytes(raw) as usize)
}

/// Decode a composite key into its (KEM, key-exchange) component views
///
/// Fails with `EncodingMismatch` if either declared length runs past the
/// end of the buffer or the buffer holds trailing bytes beyond the second
/// component.
pub fn decode_composite_key(buf: &[u8]) -> CryptoResult<(&[u8], &[u8])> {
    let kem_len = read_len(buf, 0, "composite key")?;

    let kem_end = LEN_PREFIX.checked_add(kem_len).ok_or_else(|| {
        CryptoError::malformed_encoding("composite key", "declared KEM length overflows")
    })?;
    let kem = buf.get(LEN_PREFIX..kem_end).ok_or_else(|| {
        CryptoError::encoding_mismatch("composite key KEM component", kem_end, buf.len())
    })?;

    let kex_len = read_len(buf, kem_end, "composite key")?;
    let kex_start = kem_end + LEN_PREFIX;
    let kex_end = kex_start.checked_add(kex_len).ok_or_else(|| {
        CryptoError::malformed_encoding("composite key", "declared key-exchange length overflows")
    })?;
    let kex = buf.get(kex_start..kex_end).ok_or_else(|| {
        CryptoError::encoding_mismatch("composite key key-exchange component", kex_end, buf.len())
    })?;

    if kex_end != buf.len() {
        return Err(CryptoError::encoding_mismatch(
            "composite key",
            kex_end,
            buf.len(),
        ));
    }

    Ok((kem, kex))
}

/// Encode two components into the length-prefixed composite key layout
pub fn encode_composite_key(kem: &[u8], kex: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(2 * LEN_PREFIX + kem.len() + kex.len());
    buf.extend_from_slice(&(kem.len() as u32).to_be_bytes());
    buf.extend_from_slice(kem);
    buf.extend_from_slice(&(kex.len() as u32).to_be_bytes());
    buf.extend_from_slice(kex);
    buf
}

/// Split a composite ciphertext into its two fixed-length component views
///
/// Fails with `EncodingMismatch` unless the ciphertext length is exactly
/// `kem_len + kex_len`.
pub fn split_ciphertext(ct: &[u8], kem_len: usize, kex_len: usize) -> CryptoResult<(&[u8], &[u8])> {
    let total = kem_len.checked_add(kex_len).ok_or_else(|| {
        CryptoError::malformed_encoding("composite ciphertext", "component lengths overflow")
    })?;
    if ct.len() != total {
        return Err(CryptoError::encoding_mismatch(
            "composite ciphertext",
            total,
            ct.len(),
        ));
    }
    Ok(ct.split_at(kem_len))
}

/// Split an output buffer into the two fixed-offset component slots
///
/// The first slot starts at offset 0, the second at offset `first_len`;
/// this ordering is the wire contract for both composite ciphertexts
/// (KEM ciphertext then ephemeral public key) and shared secrets (KEM
/// secret then key-exchange secret). The buffer must hold at least
/// `first_len + second_len` bytes.
pub fn split_out_buffer<'a>(
    out: &'a mut [u8],
    first_len: usize,
    second_len: usize,
    context: &'static str,
) -> CryptoResult<(&'a mut [u8], &'a mut [u8])> {
    let total = first_len.checked_add(second_len).ok_or_else(|| {
        CryptoError::malformed_encoding(context, "component lengths overflow")
    })?;
    if out.len() < total {
        return Err(CryptoError::encoding_mismatch(context, total, out.len()));
    }
    let (first, rest) = out[..total].split_at_mut(first_len);
    Ok((first, rest))
}
