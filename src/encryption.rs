//! Credential obfuscation primitive for the portal protocol.
//!
//! Blowfish in ECB mode (no IV, no chaining) over 8-byte blocks, with
//! PKCS#5/#7 padding applied by hand: the pad value is always 1..=8, so an
//! input that is already block-aligned gains a full block of 8s. The
//! ciphertext is returned base64-encoded.
//!
//! Failure is absence, not an error: a key outside Blowfish's accepted
//! 4..=56 byte range yields `None` and the caller must treat encryption as
//! unavailable.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use blowfish::Blowfish;
use blowfish::cipher::generic_array::GenericArray;
use blowfish::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};

const BLOCK_SIZE: usize = 8;

/// Encrypt `data` under `key`, returning base64 ciphertext.
pub fn encrypt(data: &[u8], key: &[u8]) -> Option<String> {
    let bf: Blowfish = Blowfish::new_from_slice(key).ok()?;
    let mut buf = pad(data);
    for block in buf.chunks_exact_mut(BLOCK_SIZE) {
        bf.encrypt_block(GenericArray::from_mut_slice(block));
    }
    Some(STANDARD.encode(&buf))
}

/// Invert [`encrypt`]: base64-decode, decrypt, strip padding.
pub fn decrypt(data: &str, key: &[u8]) -> Option<Vec<u8>> {
    let bf: Blowfish = Blowfish::new_from_slice(key).ok()?;
    let mut buf = STANDARD.decode(data).ok()?;
    if buf.is_empty() || !buf.len().is_multiple_of(BLOCK_SIZE) {
        return None;
    }
    for block in buf.chunks_exact_mut(BLOCK_SIZE) {
        bf.decrypt_block(GenericArray::from_mut_slice(block));
    }
    let pad_len = *buf.last()? as usize;
    if pad_len == 0 || pad_len > BLOCK_SIZE {
        return None;
    }
    buf.truncate(buf.len() - pad_len);
    Some(buf)
}

/// Pad to the next block boundary; always appends at least one byte.
fn pad(data: &[u8]) -> Vec<u8> {
    let pad_len = BLOCK_SIZE - data.len() % BLOCK_SIZE;
    let mut out = Vec::with_capacity(data.len() + pad_len);
    out.extend_from_slice(data);
    out.resize(data.len() + pad_len, pad_len as u8);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &[u8] = b"uyI5Dj9g8VCOFDnBRUbr3g";

    #[test]
    fn round_trips_across_lengths() {
        for len in 0..=20 {
            let plaintext: Vec<u8> = (0..len).map(|i| i as u8 + b'a').collect();
            let ciphertext = encrypt(&plaintext, KEY).unwrap();
            assert_eq!(decrypt(&ciphertext, KEY).unwrap(), plaintext);
        }
    }

    #[test]
    fn padded_length_is_next_block_multiple_and_never_zero_pad() {
        for len in 0..=24 {
            let plaintext = vec![b'x'; len];
            let ciphertext = encrypt(&plaintext, KEY).unwrap();
            let raw = STANDARD.decode(&ciphertext).unwrap();
            // Smallest multiple of 8 strictly greater than or equal to len + 1.
            let expected = (len / 8 + 1) * 8;
            assert_eq!(raw.len(), expected, "plaintext length {len}");
        }
    }

    #[test]
    fn block_aligned_input_gains_a_full_padding_block() {
        let ciphertext = encrypt(b"exactly8", KEY).unwrap();
        assert_eq!(STANDARD.decode(&ciphertext).unwrap().len(), 16);
    }

    #[test]
    fn ecb_is_deterministic() {
        assert_eq!(encrypt(b"password", KEY), encrypt(b"password", KEY));
    }

    #[test]
    fn invalid_key_yields_none() {
        assert_eq!(encrypt(b"data", b""), None);
        assert_eq!(encrypt(b"data", b"abc"), None);
        assert_eq!(encrypt(b"data", &[0u8; 57]), None);
        assert_eq!(decrypt("AAAAAAAAAAA=", b""), None);
    }

    #[test]
    fn decrypt_rejects_malformed_input() {
        assert_eq!(decrypt("", KEY), None);
        assert_eq!(decrypt("not base64!!", KEY), None);
        // Valid base64 but not a block multiple.
        assert_eq!(decrypt(&STANDARD.encode([0u8; 7]), KEY), None);
    }
}
