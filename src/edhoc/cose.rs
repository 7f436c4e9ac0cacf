//! COSE keys and the COSE structures EDHOC binds into signatures, AEAD
//! operations and key derivation.
//!
//! All builders write into a caller-supplied buffer and return the number of
//! bytes used.

use alloc::vec::Vec;
use core::fmt;
use serde_bytes::Bytes;
use zeroize::Zeroize;

use super::{
    error::Error,
    types::{HASH_LEN, MAX_KDF_LEN, SCRATCH_LEN},
    Result,
};
use crate::cbor::{encode_into, Encoder};

/// COSE key type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyType {
    /// Octet Key Pair, used for X25519 and Ed25519.
    Okp = 1,
    /// Elliptic curve key with x- and y-coordinate, used for P-256.
    Ec2 = 2,
}

/// COSE elliptic curve identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Curve {
    P256 = 1,
    X25519 = 4,
    Ed25519 = 6,
}

impl Curve {
    pub fn key_type(self) -> KeyType {
        match self {
            Curve::P256 => KeyType::Ec2,
            Curve::X25519 | Curve::Ed25519 => KeyType::Okp,
        }
    }
}

/// A `COSE_Key` holding a public key and optionally the private part.
///
/// Only the public part ever ends up on the wire. The private scalar is wiped
/// when the key is dropped.
#[derive(Clone, PartialEq)]
pub struct CoseKey {
    pub crv: Curve,
    pub x: Vec<u8>,
    pub y: Option<Vec<u8>>,
    d: Option<Vec<u8>>,
}

impl CoseKey {
    /// Creates a public key from its coordinates.
    pub fn public(crv: Curve, x: &[u8], y: Option<&[u8]>) -> CoseKey {
        CoseKey {
            crv,
            x: x.to_vec(),
            y: y.map(<[u8]>::to_vec),
            d: None,
        }
    }

    /// Attaches the private scalar to this key.
    pub fn with_private(mut self, d: &[u8]) -> CoseKey {
        self.d = Some(d.to_vec());
        self
    }

    pub fn kty(&self) -> KeyType {
        self.crv.key_type()
    }

    /// Returns the private scalar, if we have it.
    pub fn private(&self) -> Option<&[u8]> {
        self.d.as_deref()
    }

    /// Returns a copy of this key without the private part.
    pub fn to_public(&self) -> CoseKey {
        CoseKey::public(self.crv, &self.x, self.y.as_deref())
    }
}

impl Drop for CoseKey {
    fn drop(&mut self) {
        if let Some(d) = self.d.as_mut() {
            d.zeroize();
        }
    }
}

impl fmt::Debug for CoseKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("CoseKey")
            .field("crv", &self.crv)
            .field("x", &self.x)
            .field("y", &self.y)
            .field("d", &self.d.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// An authentication credential: a public key (with the private part for our
/// own credential), its CBOR encoding `CRED_x` and the `kid` by which the
/// other party looks it up.
#[derive(Debug, Clone, PartialEq)]
pub struct Credential {
    kid: Vec<u8>,
    key: CoseKey,
    cred: Vec<u8>,
}

impl Credential {
    /// Builds a credential, encoding the public part of `key` as `CRED_x`.
    pub fn new(kid: &[u8], key: CoseKey) -> Result<Credential> {
        let mut buf = [0u8; SCRATCH_LEN];
        let len = serialize_cose_key(&key, &mut buf)?;

        Ok(Credential {
            kid: kid.to_vec(),
            key,
            cred: buf[..len].to_vec(),
        })
    }

    pub fn kid(&self) -> &[u8] {
        &self.kid
    }

    pub fn key(&self) -> &CoseKey {
        &self.key
    }

    /// Returns the CBOR encoded `COSE_Key`, `CRED_x`.
    pub fn cred(&self) -> &[u8] {
        &self.cred
    }

    /// Writes the `ID_CRED_x` header map referencing this credential.
    pub fn id_cred(&self, out: &mut [u8]) -> Result<usize> {
        build_id_cred_x(&self.kid, out)
    }
}

/// Writes the CBOR encoded `COSE_Key` for the public part of `key`.
pub fn serialize_cose_key(key: &CoseKey, out: &mut [u8]) -> Result<usize> {
    let mut encoder = Encoder::new(out);
    // Pack the data into a structure that nicely serializes almost into
    // what we want to have as the actual bytes for the COSE_Key.
    // (kty key, kty value, crv key, crv value, x key, x value, ...)
    match key.kty() {
        KeyType::Okp => encoder.push_map((
            1,
            KeyType::Okp as u8,
            -1,
            key.crv as u8,
            -2,
            Bytes::new(&key.x),
        )),
        KeyType::Ec2 => {
            let y = key
                .y
                .as_deref()
                .ok_or(Error::Encoding("EC2 key without y-coordinate"))?;
            encoder.push_map((
                1,
                KeyType::Ec2 as u8,
                -1,
                key.crv as u8,
                -2,
                Bytes::new(&key.x),
                -3,
                Bytes::new(y),
            ))
        }
    }
    .map_err(Error::encoding)?;

    Ok(encoder.position())
}

/// Writes the COSE header map `{ 4 : kid }` for the given `kid`.
pub fn build_id_cred_x(kid: &[u8], out: &mut [u8]) -> Result<usize> {
    let mut encoder = Encoder::new(out);
    encoder
        .push_map((4, Bytes::new(kid)))
        .map_err(Error::encoding)?;

    Ok(encoder.position())
}

/// Writes the `info` structure for the EDHOC-KDF.
///
/// `info = [ edhoc_aead_id : int, transcript_hash : bstr, label : tstr,
/// length : uint ]`
///
/// # Arguments
/// * `algorithm_id` - COSE identifier of the AEAD of the selected suite.
/// * `th` - The transcript hash the derived material is bound to.
/// * `label` - Distinguishes the derived values, e.g. "K_2" or "IV_2".
/// * `length` - The desired output length in bytes.
pub fn build_kdf_info(
    algorithm_id: i64,
    th: &[u8],
    label: &str,
    length: usize,
    out: &mut [u8],
) -> Result<usize> {
    if length == 0 || length > MAX_KDF_LEN {
        return Err(Error::Encoding("KDF output length out of range"));
    }
    encode_into((algorithm_id, Bytes::new(th), label, length as u64), out)
        .map_err(Error::encoding)
}

/// Writes the external additional data bound into the signature covering
/// `P_2e` or `P_3ae`.
///
/// This is the CBOR sequence `( TH : bstr, CRED_x, ? AD : bstr )`, where
/// `cred` is already CBOR encoded.
pub fn build_external_aad(
    th: &[u8],
    cred: &[u8],
    ad: Option<&[u8]>,
    out: &mut [u8],
) -> Result<usize> {
    if th.len() != HASH_LEN {
        return Err(Error::InvalidState("transcript hash not computed"));
    }
    let mut encoder = Encoder::new(out);
    encoder.push(Bytes::new(th)).map_err(Error::encoding)?;
    encoder.push_raw(cred).map_err(Error::encoding)?;
    if let Some(ad) = ad {
        encoder.push(Bytes::new(ad)).map_err(Error::encoding)?;
    }

    Ok(encoder.position())
}

/// Writes the COSE `Enc_structure` used as associated data when encrypting
/// a plaintext that is authenticated by `id_cred` and `external_aad`.
pub fn build_enc_structure(
    id_cred: &[u8],
    external_aad: &[u8],
    out: &mut [u8],
) -> Result<usize> {
    encode_into(
        ("Encrypt0", Bytes::new(id_cred), Bytes::new(external_aad)),
        out,
    )
    .map_err(Error::encoding)
}

/// Writes the COSE `Sig_structure` that is the input to the signature
/// algorithm.
pub fn build_sig_structure(
    id_cred: &[u8],
    external_aad: &[u8],
    out: &mut [u8],
) -> Result<usize> {
    encode_into(
        (
            "Signature1",
            Bytes::new(id_cred),      // protected
            Bytes::new(external_aad), // external_aad
            Bytes::new(&[]),          // payload
        ),
        out,
    )
    .map_err(Error::encoding)
}

/// Writes `A_3ae`, the `COSE_Encrypt0` associated data of `message_3`.
///
/// Only the transcript hash is bound here, no credential.
pub fn build_message_3_associated_data(
    th_3: &[u8],
    out: &mut [u8],
) -> Result<usize> {
    if th_3.len() != HASH_LEN {
        return Err(Error::InvalidState("transcript hash not computed"));
    }
    encode_into(("Encrypt0", Bytes::new(&[]), Bytes::new(th_3)), out)
        .map_err(Error::encoding)
}
