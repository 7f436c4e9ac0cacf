//! The cryptographic primitives EDHOC relies on.
//!
//! Everything goes through the [`Crypto`] trait, so a device with a hardware
//! accelerator can bring its own implementation. [`RustCrypto`] is the
//! portable default.

use aes::Aes128;
use ccm::{
    aead::{
        generic_array::{typenum::Unsigned, GenericArray},
        Aead, AeadCore, KeyInit, Payload,
    },
    consts::{U13, U16, U8},
    Ccm,
};
use core::convert::TryFrom;
use ed25519_dalek::{Signer as _, Verifier as _};
use p256::ecdsa::signature::{Signer as _, Verifier as _};

use super::{
    cose::{CoseKey, Curve},
    error::Error,
    types::CipherSuite,
    Result,
};

/// AES-CCM-16-64-128
type AesCcm8 = Ccm<Aes128, U8, U13>;
/// AES-CCM-16-128-128
type AesCcm16 = Ccm<Aes128, U16, U13>;

pub const AEAD_KEY_LEN: usize = 16;
pub const AEAD_NONCE_LEN: usize = 13;
pub const SHARED_SECRET_LEN: usize = 32;

/// Key agreement, signatures and authenticated encryption for the suites of
/// [`CipherSuite`].
///
/// All output goes to the given buffer, every method returns how many bytes
/// it wrote.
pub trait Crypto {
    /// Computes the ECDH shared secret from our private key and the peer's
    /// public key (the x-coordinate as sent in EDHOC).
    fn ecdh(
        &self,
        suite: CipherSuite,
        private: &[u8],
        public: &[u8],
        out: &mut [u8],
    ) -> Result<usize>;

    /// Signs `message` with the private part of `key`.
    fn sign(
        &self,
        suite: CipherSuite,
        key: &CoseKey,
        message: &[u8],
        out: &mut [u8],
    ) -> Result<usize>;

    /// Checks `signature` over `message` against the public part of `key`.
    fn verify(
        &self,
        suite: CipherSuite,
        key: &CoseKey,
        message: &[u8],
        signature: &[u8],
    ) -> Result<()>;

    /// Encrypts and authenticates `plaintext`, writing ciphertext and tag.
    fn aead_seal(
        &self,
        suite: CipherSuite,
        key: &[u8],
        nonce: &[u8],
        aad: &[u8],
        plaintext: &[u8],
        out: &mut [u8],
    ) -> Result<usize>;

    /// Checks the tag and decrypts `ciphertext`.
    fn aead_open(
        &self,
        suite: CipherSuite,
        key: &[u8],
        nonce: &[u8],
        aad: &[u8],
        ciphertext: &[u8],
        out: &mut [u8],
    ) -> Result<usize>;
}

/// The primitives from the RustCrypto and dalek projects.
#[derive(Debug, Default, Clone, Copy)]
pub struct RustCrypto;

fn copy_out(src: &[u8], out: &mut [u8]) -> Result<usize> {
    let dst = out.get_mut(..src.len()).ok_or(Error::BufferOverflow)?;
    dst.copy_from_slice(src);

    Ok(src.len())
}

fn array_32(bytes: &[u8]) -> Result<[u8; 32]> {
    <[u8; 32]>::try_from(bytes).map_err(|_| Error::Crypto("expected 32 bytes"))
}

/// Makes sure an authentication key fits the signature algorithm of the
/// suite.
fn check_signature_curve(suite: CipherSuite, key: &CoseKey) -> Result<()> {
    let expected = if suite.is_nist() {
        Curve::P256
    } else {
        Curve::Ed25519
    };
    if key.crv == expected {
        Ok(())
    } else {
        Err(Error::Crypto("key does not match the cipher suite"))
    }
}

/// Parses a P-256 public key given either as bare x-coordinate or in SEC1
/// encoding.
fn p256_public(bytes: &[u8]) -> Result<p256::PublicKey> {
    let res = if bytes.len() == 32 {
        // The sign of y doesn't influence the shared secret
        let mut compressed = [0x02; 33];
        compressed[1..].copy_from_slice(bytes);
        p256::PublicKey::from_sec1_bytes(&compressed)
    } else {
        p256::PublicKey::from_sec1_bytes(bytes)
    };

    res.map_err(|_| Error::Crypto("invalid public key"))
}

fn ccm_seal<C: Aead + KeyInit>(
    key: &[u8],
    nonce: &[u8],
    aad: &[u8],
    plaintext: &[u8],
    out: &mut [u8],
) -> Result<usize> {
    if nonce.len() != <C as AeadCore>::NonceSize::USIZE {
        return Err(Error::Crypto("invalid nonce length"));
    }
    let cipher = C::new_from_slice(key)
        .map_err(|_| Error::Crypto("invalid key length"))?;
    let ciphertext = cipher
        .encrypt(
            GenericArray::from_slice(nonce),
            Payload {
                msg: plaintext,
                aad,
            },
        )
        .map_err(|_| Error::Crypto("encryption failed"))?;

    copy_out(&ciphertext, out)
}

fn ccm_open<C: Aead + KeyInit>(
    key: &[u8],
    nonce: &[u8],
    aad: &[u8],
    ciphertext: &[u8],
    out: &mut [u8],
) -> Result<usize> {
    if nonce.len() != <C as AeadCore>::NonceSize::USIZE {
        return Err(Error::Crypto("invalid nonce length"));
    }
    let cipher = C::new_from_slice(key)
        .map_err(|_| Error::Crypto("invalid key length"))?;
    let plaintext = cipher
        .decrypt(
            GenericArray::from_slice(nonce),
            Payload {
                msg: ciphertext,
                aad,
            },
        )
        .map_err(|_| Error::Crypto("decryption failed"))?;

    copy_out(&plaintext, out)
}

impl Crypto for RustCrypto {
    fn ecdh(
        &self,
        suite: CipherSuite,
        private: &[u8],
        public: &[u8],
        out: &mut [u8],
    ) -> Result<usize> {
        if suite.is_nist() {
            let secret = p256::SecretKey::from_slice(private)
                .map_err(|_| Error::Crypto("invalid private key"))?;
            let public = p256_public(public)?;
            let shared = p256::ecdh::diffie_hellman(
                secret.to_nonzero_scalar(),
                public.as_affine(),
            );
            copy_out(shared.raw_secret_bytes().as_slice(), out)
        } else {
            let secret = x25519_dalek::StaticSecret::from(array_32(private)?);
            let public = x25519_dalek::PublicKey::from(array_32(public)?);
            let shared = secret.diffie_hellman(&public);
            if !shared.was_contributory() {
                return Err(Error::Crypto("low order public key"));
            }
            copy_out(shared.as_bytes(), out)
        }
    }

    fn sign(
        &self,
        suite: CipherSuite,
        key: &CoseKey,
        message: &[u8],
        out: &mut [u8],
    ) -> Result<usize> {
        check_signature_curve(suite, key)?;
        let d = key.private().ok_or(Error::Crypto("no private key"))?;

        if suite.is_nist() {
            let signing_key = p256::ecdsa::SigningKey::from_slice(d)
                .map_err(|_| Error::Crypto("invalid private key"))?;
            let signature: p256::ecdsa::Signature = signing_key.sign(message);
            copy_out(signature.to_bytes().as_slice(), out)
        } else {
            let signing_key = ed25519_dalek::SigningKey::from_bytes(&array_32(d)?);
            let signature: ed25519_dalek::Signature = signing_key.sign(message);
            copy_out(&signature.to_bytes(), out)
        }
    }

    fn verify(
        &self,
        suite: CipherSuite,
        key: &CoseKey,
        message: &[u8],
        signature: &[u8],
    ) -> Result<()> {
        check_signature_curve(suite, key)?;

        if suite.is_nist() {
            let y = key.y.as_deref().ok_or(Error::AuthenticationFailure)?;
            if key.x.len() != 32 || y.len() != 32 {
                return Err(Error::AuthenticationFailure);
            }
            let mut sec1 = [0x04; 65];
            sec1[1..33].copy_from_slice(&key.x);
            sec1[33..].copy_from_slice(y);
            let verifying_key = p256::ecdsa::VerifyingKey::from_sec1_bytes(&sec1)
                .map_err(|_| Error::AuthenticationFailure)?;
            let signature = p256::ecdsa::Signature::from_slice(signature)
                .map_err(|_| Error::AuthenticationFailure)?;
            verifying_key
                .verify(message, &signature)
                .map_err(|_| Error::AuthenticationFailure)
        } else {
            let verifying_key =
                ed25519_dalek::VerifyingKey::from_bytes(&array_32(&key.x)?)
                    .map_err(|_| Error::AuthenticationFailure)?;
            let signature = ed25519_dalek::Signature::from_slice(signature)
                .map_err(|_| Error::AuthenticationFailure)?;
            verifying_key
                .verify(message, &signature)
                .map_err(|_| Error::AuthenticationFailure)
        }
    }

    fn aead_seal(
        &self,
        suite: CipherSuite,
        key: &[u8],
        nonce: &[u8],
        aad: &[u8],
        plaintext: &[u8],
        out: &mut [u8],
    ) -> Result<usize> {
        match suite {
            CipherSuite::Suite0 | CipherSuite::Suite2 => {
                ccm_seal::<AesCcm8>(key, nonce, aad, plaintext, out)
            }
            CipherSuite::Suite1 | CipherSuite::Suite3 => {
                ccm_seal::<AesCcm16>(key, nonce, aad, plaintext, out)
            }
        }
    }

    fn aead_open(
        &self,
        suite: CipherSuite,
        key: &[u8],
        nonce: &[u8],
        aad: &[u8],
        ciphertext: &[u8],
        out: &mut [u8],
    ) -> Result<usize> {
        match suite {
            CipherSuite::Suite0 | CipherSuite::Suite2 => {
                ccm_open::<AesCcm8>(key, nonce, aad, ciphertext, out)
            }
            CipherSuite::Suite1 | CipherSuite::Suite3 => {
                ccm_open::<AesCcm16>(key, nonce, aad, ciphertext, out)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_vectors::*;
    use super::*;

    const P256_PRIVATE_I: [u8; 32] = [0x11; 32];
    const P256_PRIVATE_R: [u8; 32] = [0x22; 32];

    #[test]
    fn x25519_agreement() {
        let g_x = x25519_public(&EPH_I_PRIVATE);
        let g_y = x25519_public(&EPH_R_PRIVATE);
        let (mut a, mut b) = ([0; 32], [0; 32]);
        let crypto = RustCrypto;
        crypto
            .ecdh(CipherSuite::Suite0, &EPH_I_PRIVATE, &g_y, &mut a)
            .unwrap();
        crypto
            .ecdh(CipherSuite::Suite1, &EPH_R_PRIVATE, &g_x, &mut b)
            .unwrap();
        assert_eq!(a, b);

        assert!(matches!(
            crypto.ecdh(CipherSuite::Suite0, &EPH_I_PRIVATE, &[0; 32], &mut a),
            Err(Error::Crypto(_))
        ));
        assert_eq!(
            Err(Error::BufferOverflow),
            crypto.ecdh(CipherSuite::Suite0, &EPH_I_PRIVATE, &g_y, &mut a[..31])
        );
    }

    #[test]
    fn p256_agreement() {
        let (x_i, _) = p256_public_xy(&P256_PRIVATE_I);
        let (x_r, _) = p256_public_xy(&P256_PRIVATE_R);
        let (mut a, mut b) = ([0; 32], [0; 32]);
        let crypto = RustCrypto;
        crypto
            .ecdh(CipherSuite::Suite2, &P256_PRIVATE_I, &x_r, &mut a)
            .unwrap();
        crypto
            .ecdh(CipherSuite::Suite3, &P256_PRIVATE_R, &x_i, &mut b)
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn ed25519_signatures() {
        let key = ed25519_key(&AUTH_I_PRIVATE);
        let crypto = RustCrypto;
        let mut signature = [0; 64];
        assert_eq!(
            64,
            crypto
                .sign(CipherSuite::Suite0, &key, b"message", &mut signature)
                .unwrap()
        );

        let public = key.to_public();
        assert!(crypto
            .verify(CipherSuite::Suite0, &public, b"message", &signature)
            .is_ok());
        assert_eq!(
            Err(Error::AuthenticationFailure),
            crypto.verify(CipherSuite::Suite0, &public, b"massage", &signature)
        );
        assert_eq!(
            Err(Error::AuthenticationFailure),
            crypto.verify(
                CipherSuite::Suite0,
                &public,
                b"message",
                &signature[..63]
            )
        );
        // Signing needs the private key
        assert!(matches!(
            crypto.sign(CipherSuite::Suite0, &public, b"message", &mut signature),
            Err(Error::Crypto(_))
        ));
    }

    #[test]
    fn es256_signatures() {
        let key = p256_key(&P256_PRIVATE_R);
        let crypto = RustCrypto;
        let mut signature = [0; 64];
        let len = crypto
            .sign(CipherSuite::Suite2, &key, b"message", &mut signature)
            .unwrap();
        assert_eq!(64, len);

        let public = key.to_public();
        assert!(crypto
            .verify(CipherSuite::Suite3, &public, b"message", &signature)
            .is_ok());
        signature[10] ^= 0x01;
        assert_eq!(
            Err(Error::AuthenticationFailure),
            crypto.verify(CipherSuite::Suite2, &public, b"message", &signature)
        );
    }

    #[test]
    fn suite_mismatch() {
        let key = ed25519_key(&AUTH_R_PRIVATE);
        let mut signature = [0; 64];
        assert!(matches!(
            RustCrypto.sign(
                CipherSuite::Suite2,
                &key,
                b"message",
                &mut signature
            ),
            Err(Error::Crypto(_))
        ));
    }

    #[test]
    fn aead() {
        let key = [0x4B; AEAD_KEY_LEN];
        let nonce = [0x4E; AEAD_NONCE_LEN];
        let plaintext = b"plaintext";
        let crypto = RustCrypto;

        for &(suite, tag_len) in
            [(CipherSuite::Suite0, 8), (CipherSuite::Suite3, 16)].iter()
        {
            let mut sealed = [0; 32];
            let len = crypto
                .aead_seal(suite, &key, &nonce, b"aad", plaintext, &mut sealed)
                .unwrap();
            assert_eq!(plaintext.len() + tag_len, len);
            assert_eq!(tag_len, suite.aead_tag_len());

            let mut opened = [0; 32];
            let opened_len = crypto
                .aead_open(suite, &key, &nonce, b"aad", &sealed[..len], &mut opened)
                .unwrap();
            assert_eq!(&plaintext[..], &opened[..opened_len]);

            assert!(matches!(
                crypto.aead_open(
                    suite,
                    &key,
                    &nonce,
                    b"other",
                    &sealed[..len],
                    &mut opened
                ),
                Err(Error::Crypto(_))
            ));
        }
    }

    #[test]
    fn aead_parameters() {
        let crypto = RustCrypto;
        let mut out = [0; 32];
        assert!(matches!(
            crypto.aead_seal(
                CipherSuite::Suite0,
                &[0; AEAD_KEY_LEN],
                &[0; 12],
                &[],
                b"x",
                &mut out
            ),
            Err(Error::Crypto(_))
        ));
        assert!(matches!(
            crypto.aead_seal(
                CipherSuite::Suite0,
                &[0; 32],
                &[0; AEAD_NONCE_LEN],
                &[],
                b"x",
                &mut out
            ),
            Err(Error::Crypto(_))
        ));
        assert_eq!(
            Err(Error::BufferOverflow),
            crypto.aead_seal(
                CipherSuite::Suite0,
                &[0; AEAD_KEY_LEN],
                &[0; AEAD_NONCE_LEN],
                &[],
                b"x",
                &mut out[..8]
            )
        );
    }
}
