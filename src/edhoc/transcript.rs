use digest::Digest;
use sha2::Sha256;

use super::types::HASH_LEN;
use crate::cbor::{self, MAJOR_BSTR};

/// A running SHA-256 over the bytes exchanged so far.
///
/// `TH_2` covers `message_1` and `data_2`, `TH_3` covers `TH_2` and
/// `CIPHERTEXT_2` (both as byte strings) followed by `data_3`.
#[derive(Clone, Default)]
pub struct Transcript {
    hasher: Sha256,
}

impl Transcript {
    pub fn new() -> Transcript {
        Transcript::default()
    }

    /// Feeds bytes that are already CBOR encoded.
    pub fn absorb(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }

    /// Feeds `bytes` wrapped in a CBOR byte string.
    pub fn absorb_bstr(&mut self, bytes: &[u8]) {
        let (header, len) =
            cbor::encode_header(MAJOR_BSTR, bytes.len() as u64);
        self.hasher.update(&header[..len]);
        self.hasher.update(bytes);
    }

    /// Returns the hash over everything absorbed so far, leaving the
    /// transcript untouched.
    pub fn digest(&self) -> [u8; HASH_LEN] {
        let mut th = [0; HASH_LEN];
        th.copy_from_slice(&self.hasher.clone().finalize());
        th
    }
}
