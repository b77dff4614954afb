use crate::error::{Result, SecretError};
use crate::util::{scramble, wipe};
use crate::value::ProtectedValue;
use ring::aead::{self, Aad, LessSafeKey, Nonce, UnboundKey, NONCE_LEN};
use zeroize::Zeroizing;

const KEY_SIZE: usize = 32;
const TAG_SIZE: usize = 16;
const NONCE_SIZE: usize = NONCE_LEN;

const OVERHEAD: usize = TAG_SIZE + NONCE_SIZE;

fn chacha20_poly1305_alg() -> &'static aead::Algorithm {
    &aead::CHACHA20_POLY1305
}

fn sealing_key(key_bytes: &[u8]) -> Result<LessSafeKey> {
    UnboundKey::new(chacha20_poly1305_alg(), key_bytes)
        .map(LessSafeKey::new)
        .map_err(|_| SecretError::Crypto("Failed to create sealing key".into()))
}

/// The encrypted-at-rest representation of one protected value.
///
/// Every `Enclave` owns its own single-use ChaCha20-Poly1305 key. The key and
/// the ciphertext are created together in [`Enclave::seal`] and wiped together
/// on drop; there is no way to build one without the other.
///
/// The ciphertext layout is `nonce || encrypted(serialized value) || tag`.
pub(crate) struct Enclave {
    key: Zeroizing<[u8; KEY_SIZE]>,
    ciphertext: Vec<u8>,
}

impl Enclave {
    /// Serializes `value` and encrypts it under a freshly generated key.
    ///
    /// # Errors
    ///
    /// * `SecretError::Codec` - If the value cannot be serialized
    /// * `SecretError::Random` - If key or nonce generation fails
    /// * `SecretError::Crypto` - If encryption fails
    pub(crate) fn seal(value: &ProtectedValue) -> Result<Self> {
        let mut key = Zeroizing::new([0_u8; KEY_SIZE]);
        scramble(key.as_mut_slice())?;

        let mut nonce_bytes = [0_u8; NONCE_SIZE];
        scramble(&mut nonce_bytes)?;

        // Serialized plaintext is encrypted in place and never outlives this call.
        let mut in_out = Zeroizing::new(
            postcard::to_allocvec(value).map_err(|e| SecretError::Codec(e.to_string()))?,
        );

        let less_safe_key = sealing_key(key.as_slice())?;
        less_safe_key
            .seal_in_place_append_tag(
                Nonce::assume_unique_for_key(nonce_bytes),
                Aad::empty(),
                &mut *in_out,
            )
            .map_err(|_| SecretError::Crypto("Encryption failed".into()))?;

        let mut ciphertext = Vec::with_capacity(NONCE_SIZE + in_out.len());
        ciphertext.extend_from_slice(&nonce_bytes);
        ciphertext.extend_from_slice(&in_out);

        log::trace!("sealed {} bytes into enclave", ciphertext.len());

        Ok(Self { key, ciphertext })
    }

    /// Decrypts and deserializes the protected value.
    ///
    /// The returned plaintext is wiped when dropped. Callers keep it only for
    /// the duration of a single operation.
    ///
    /// # Errors
    ///
    /// * `SecretError::Crypto` - If the ciphertext is malformed or fails authentication
    /// * `SecretError::Codec` - If the decrypted bytes do not deserialize
    pub(crate) fn open(&self) -> Result<Zeroizing<ProtectedValue>> {
        if self.ciphertext.len() < OVERHEAD {
            return Err(SecretError::Crypto(
                "Ciphertext too short to contain data, tag, and nonce.".into(),
            ));
        }

        let (nonce_bytes, sealed) = self.ciphertext.split_at(NONCE_SIZE);
        let nonce_array = <[u8; NONCE_SIZE]>::try_from(nonce_bytes)
            .map_err(|_| SecretError::Crypto("Invalid nonce format".into()))?;

        let mut in_out = Zeroizing::new(sealed.to_vec());
        let less_safe_key = sealing_key(self.key.as_slice())?;
        let plaintext = less_safe_key
            .open_in_place(
                Nonce::assume_unique_for_key(nonce_array),
                Aad::empty(),
                &mut in_out,
            )
            .map_err(|_| {
                SecretError::Crypto("Decryption failed (authentication failed)".into())
            })?;

        let value = postcard::from_bytes::<ProtectedValue>(plaintext)
            .map_err(|e| SecretError::Codec(e.to_string()))?;

        log::trace!("opened enclave of {} bytes", self.ciphertext.len());
        Ok(Zeroizing::new(value))
    }
}

impl Drop for Enclave {
    fn drop(&mut self) {
        // `key` is wiped by its own Zeroizing drop right after this.
        wipe(&mut self.ciphertext);
        self.ciphertext = Vec::new();
        log::trace!("enclave wiped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seal_and_open() {
        let value = ProtectedValue::Text("foobar123".into());
        let enclave = Enclave::seal(&value).expect("Enclave::seal failed");

        let opened = enclave.open().expect("Enclave::open failed");
        assert_eq!(*opened, value);

        // Can be opened repeatedly
        let again = enclave.open().expect("second open failed");
        assert_eq!(*again, value);
    }

    #[test]
    fn test_ciphertext_hides_plaintext() {
        let value = ProtectedValue::Text("a very recognisable plaintext".into());
        let enclave = Enclave::seal(&value).expect("Enclave::seal failed");

        let needle = b"recognisable";
        assert!(!enclave
            .ciphertext
            .windows(needle.len())
            .any(|window| window == needle));
    }

    #[test]
    fn test_each_enclave_has_its_own_key() {
        let value = ProtectedValue::Integer(42);
        let first = Enclave::seal(&value).expect("first seal failed");
        let second = Enclave::seal(&value).expect("second seal failed");

        assert_ne!(*first.key, *second.key);
        assert_ne!(first.ciphertext, second.ciphertext);
    }

    #[test]
    fn test_open_modified_ciphertext() {
        let value = ProtectedValue::Bytes(vec![1, 2, 3, 4]);
        let mut enclave = Enclave::seal(&value).expect("Enclave::seal failed");

        let last = enclave.ciphertext.len() - 1;
        enclave.ciphertext[last] = !enclave.ciphertext[last];

        match enclave.open() {
            Err(SecretError::Crypto(msg)) => assert!(msg.contains("Decryption failed")),
            other => panic!("Opening modified ciphertext should fail, got {:?}", other),
        }
    }

    #[test]
    fn test_truncated_ciphertext() {
        let value = ProtectedValue::Bool(true);
        let mut enclave = Enclave::seal(&value).expect("Enclave::seal failed");
        enclave.ciphertext.truncate(OVERHEAD - 1);

        assert!(matches!(enclave.open(), Err(SecretError::Crypto(_))));
    }

    #[test]
    fn test_all_kinds_round_trip() {
        let values = [
            ProtectedValue::Text(String::new()),
            ProtectedValue::Bytes(vec![0xff, 0x00]),
            ProtectedValue::Bool(false),
            ProtectedValue::Integer(i128::MIN),
            ProtectedValue::Float(-0.5),
        ];
        for value in values {
            let enclave = Enclave::seal(&value).expect("seal failed");
            assert_eq!(*enclave.open().expect("open failed"), value);
        }
    }
}
