use log::debug;

use super::{
    cose::{self, Credential},
    crypto::Crypto,
    error::Error,
    format::{self, Plaintext},
    types::{CipherSuite, SCRATCH_LEN, SIGNATURE_LEN},
    Result,
};

/// The outcome of a successful verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verified {
    /// Index of the peer's credential in the list that was searched.
    pub credential: usize,
    pub plaintext: Plaintext,
}

/// Decodes the plaintext `P_2e` or `P_3ae` and verifies the signature it
/// carries.
///
/// The `kid` in the plaintext selects the credential among `credentials`, the
/// signature has to cover the `Sig_structure` built from that credential, the
/// transcript hash `th` and the additional data in the plaintext.
///
/// Decoding and verification succeed or fail as a whole. Whatever goes wrong,
/// the error is `AuthenticationFailure`.
///
/// The error value hides the cause but the running time does not. A
/// plaintext that doesn't parse, or names an unknown `kid`, is rejected
/// before any signature work, so it fails measurably faster than a bad
/// signature. Callers that need to hide this from a peer have to pad the
/// response time themselves.
pub fn decode_and_verify<C: Crypto + ?Sized>(
    crypto: &C,
    suite: CipherSuite,
    th: &[u8],
    credentials: &[Credential],
    plaintext: &[u8],
) -> Result<Verified> {
    verify_inner(crypto, suite, th, credentials, plaintext).map_err(|_| {
        debug!("Peer authentication failed");
        Error::AuthenticationFailure
    })
}

fn verify_inner<C: Crypto + ?Sized>(
    crypto: &C,
    suite: CipherSuite,
    th: &[u8],
    credentials: &[Credential],
    plaintext: &[u8],
) -> Result<Verified> {
    let plaintext = format::decode_plaintext(plaintext)?;
    let index = credentials
        .iter()
        .position(|c| c.kid() == &plaintext.kid[..])
        .ok_or(Error::AuthenticationFailure)?;
    let credential = &credentials[index];

    let mut id_cred = [0; SCRATCH_LEN];
    let id_cred_len = credential.id_cred(&mut id_cred)?;
    let mut external_aad = [0; SCRATCH_LEN];
    let external_aad_len = cose::build_external_aad(
        th,
        credential.cred(),
        plaintext.ad.as_deref(),
        &mut external_aad,
    )?;
    let mut to_verify = [0; SCRATCH_LEN];
    let to_verify_len = cose::build_sig_structure(
        &id_cred[..id_cred_len],
        &external_aad[..external_aad_len],
        &mut to_verify,
    )?;
    crypto.verify(
        suite,
        credential.key(),
        &to_verify[..to_verify_len],
        &plaintext.signature,
    )?;

    Ok(Verified {
        credential: index,
        plaintext,
    })
}

/// Builds the plaintext `P_2e` or `P_3ae` for our own credential: signs the
/// `Sig_structure` over `th`, the credential and `ad` and encodes the result.
pub fn sign_plaintext<C: Crypto + ?Sized>(
    crypto: &C,
    suite: CipherSuite,
    th: &[u8],
    credential: &Credential,
    ad: Option<&[u8]>,
    out: &mut [u8],
) -> Result<usize> {
    let mut id_cred = [0; SCRATCH_LEN];
    let id_cred_len = credential.id_cred(&mut id_cred)?;
    let mut external_aad = [0; SCRATCH_LEN];
    let external_aad_len =
        cose::build_external_aad(th, credential.cred(), ad, &mut external_aad)?;
    let mut to_sign = [0; SCRATCH_LEN];
    let to_sign_len = cose::build_sig_structure(
        &id_cred[..id_cred_len],
        &external_aad[..external_aad_len],
        &mut to_sign,
    )?;
    let mut signature = [0; SIGNATURE_LEN];
    let signature_len = crypto.sign(
        suite,
        credential.key(),
        &to_sign[..to_sign_len],
        &mut signature,
    )?;

    format::encode_plaintext(
        credential.kid(),
        &signature[..signature_len],
        ad,
        out,
    )
}
