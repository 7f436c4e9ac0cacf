use alloc::{boxed::Box, string::ToString, vec::Vec};
use core::fmt;
use log::{debug, trace};

use super::{
    cose::{self, CoseKey, Credential, Curve},
    crypto::{Crypto, RustCrypto},
    error::Error,
    format,
    transcript::Transcript,
    types::{
        CipherSuite, Correlation, MessageNumber, Method, Role, State,
        HASH_LEN, MAX_AD_LEN, SCRATCH_LEN,
    },
    verify, Result,
};

/// Hook for the application data that can travel along with the messages.
pub trait AdditionalData {
    /// Called while `message` is built. Writes the data to send into `out`
    /// and returns its length, or `None` if there is nothing to send.
    fn outbound(
        &mut self,
        message: MessageNumber,
        out: &mut [u8],
    ) -> Result<Option<usize>>;

    /// Called with the data that arrived with `message`, once the message
    /// has been accepted.
    fn inbound(&mut self, message: MessageNumber, ad: &[u8]) -> Result<()>;
}

/// What a party needs to know before starting a handshake.
#[derive(Debug, Clone)]
pub struct EdhocConfig {
    pub role: Role,
    pub method: Method,
    /// The correlation the Initiator announces. A Responder takes the one
    /// from `message_1` instead.
    pub correlation: Correlation,
    /// The supported suites in order of preference. The Initiator selects
    /// the first one.
    pub suites: Vec<CipherSuite>,
    /// Our connection identifier.
    pub cid: Vec<u8>,
    /// Our credential, including the private key.
    pub credential: Credential,
    /// The credentials of the peers we accept.
    pub peers: Vec<Credential>,
}

impl EdhocConfig {
    /// Creates a configuration for signature authentication without
    /// correlation, supporting every suite.
    pub fn new(role: Role, credential: Credential) -> EdhocConfig {
        EdhocConfig {
            role,
            method: Method::SignSign,
            correlation: Correlation::None,
            suites: CipherSuite::ALL.to_vec(),
            cid: Vec::new(),
            credential,
            peers: Vec::new(),
        }
    }
}

/// The state of one handshake.
///
/// The encode and decode methods have to be called in protocol order. On the
/// Initiator side that is
///
/// 1. [`encode_message_1`](Self::encode_message_1)
/// 2. [`decode_message_2`](Self::decode_message_2), which returns
///    `CIPHERTEXT_2` for the application to decrypt
/// 3. [`decode_and_verify_p2e`](Self::decode_and_verify_p2e) with the
///    decrypted plaintext
/// 4. [`encode_data_3`](Self::encode_data_3),
///    [`encode_p3ae`](Self::encode_p3ae) and after encrypting the plaintext
///    [`encode_message_3`](Self::encode_message_3)
///
/// and on the Responder side
///
/// 1. [`decode_message_1`](Self::decode_message_1)
/// 2. [`encode_data_2`](Self::encode_data_2),
///    [`encode_p2e`](Self::encode_p2e) and after encrypting the plaintext
///    [`encode_message_2`](Self::encode_message_2)
/// 3. [`decode_message_3`](Self::decode_message_3), which returns
///    `CIPHERTEXT_3`
/// 4. [`decode_and_verify_p3ae`](Self::decode_and_verify_p3ae)
///
/// Calling a method out of order fails with `InvalidState` and changes
/// nothing. Any other failure is final: the context moves to
/// `State::Failed` and answers every further call with the same error.
pub struct EdhocContext<C: Crypto = RustCrypto> {
    crypto: C,
    role: Role,
    state: State,
    error: Option<Error>,
    method: Method,
    correlation: Correlation,
    suites: Vec<CipherSuite>,
    suite: Option<CipherSuite>,
    cid_initiator: Option<Vec<u8>>,
    cid_responder: Option<Vec<u8>>,
    ephemeral_local: Option<CoseKey>,
    ephemeral_remote: Option<Vec<u8>>,
    transcript: Transcript,
    th_2: Option<[u8; HASH_LEN]>,
    th_3: Option<[u8; HASH_LEN]>,
    credential: Credential,
    peers: Vec<Credential>,
    credential_remote: Option<usize>,
    additional_data: Option<Box<dyn AdditionalData>>,
}

impl EdhocContext<RustCrypto> {
    /// Creates a context using the default primitives.
    pub fn new(config: EdhocConfig) -> EdhocContext<RustCrypto> {
        EdhocContext::with_crypto(config, RustCrypto)
    }
}

impl<C: Crypto> EdhocContext<C> {
    /// Creates a context using the given primitives.
    pub fn with_crypto(config: EdhocConfig, crypto: C) -> EdhocContext<C> {
        let (cid_initiator, cid_responder) = match config.role {
            Role::Initiator => (Some(config.cid), None),
            Role::Responder => (None, Some(config.cid)),
        };

        EdhocContext {
            crypto,
            role: config.role,
            state: State::Init,
            error: None,
            method: config.method,
            correlation: config.correlation,
            suites: config.suites,
            suite: None,
            cid_initiator,
            cid_responder,
            ephemeral_local: None,
            ephemeral_remote: None,
            transcript: Transcript::new(),
            th_2: None,
            th_3: None,
            credential: config.credential,
            peers: config.peers,
            credential_remote: None,
            additional_data: None,
        }
    }

    /// Installs the hook producing and consuming additional data.
    pub fn set_additional_data(&mut self, callback: Box<dyn AdditionalData>) {
        self.additional_data = Some(callback);
    }

    /// Sets our ephemeral key pair. The Initiator needs it before
    /// `message_1`, the Responder before `data_2`.
    pub fn set_ephemeral_key(&mut self, key: CoseKey) {
        self.ephemeral_local = Some(key);
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Returns the error that made the handshake fail, if it did.
    pub fn error(&self) -> Option<Error> {
        self.error
    }

    pub fn correlation(&self) -> Correlation {
        self.correlation
    }

    /// Returns the suite of this handshake once it's been settled.
    pub fn cipher_suite(&self) -> Option<CipherSuite> {
        self.suite
    }

    pub fn cid_initiator(&self) -> Option<&[u8]> {
        self.cid_initiator.as_deref()
    }

    pub fn cid_responder(&self) -> Option<&[u8]> {
        self.cid_responder.as_deref()
    }

    /// Returns the peer's ephemeral public key.
    pub fn ephemeral_remote(&self) -> Option<&[u8]> {
        self.ephemeral_remote.as_deref()
    }

    pub fn th_2(&self) -> Option<&[u8; HASH_LEN]> {
        self.th_2.as_ref()
    }

    pub fn th_3(&self) -> Option<&[u8; HASH_LEN]> {
        self.th_3.as_ref()
    }

    /// Returns the peer's credential once its signature has been verified.
    pub fn peer_credential(&self) -> Option<&Credential> {
        self.credential_remote.map(|i| &self.peers[i])
    }

    /// Fails if the context is poisoned, or if the operation isn't meant for
    /// this role and state.
    fn check(&self, role: Role, state: State) -> Result<()> {
        if let Some(error) = self.error {
            return Err(error);
        }
        if self.role != role {
            return Err(Error::InvalidState("operation not available to role"));
        }
        if self.state != state {
            return Err(Error::InvalidState("operation not allowed in state"));
        }

        Ok(())
    }

    /// Poisons the context with the error of a failed operation.
    fn settle<T>(&mut self, res: Result<T>) -> Result<T> {
        match res {
            Err(Error::InvalidState(e)) => Err(Error::InvalidState(e)),
            Err(e) => {
                debug!("Handshake failed in {:?}: {}", self.state, e);
                self.state = State::Failed;
                self.error = Some(e);
                Err(e)
            }
            ok => ok,
        }
    }

    fn selected_suite(&self) -> Result<CipherSuite> {
        self.suite
            .ok_or(Error::InvalidState("no cipher suite selected"))
    }

    fn th_2_computed(&self) -> Result<[u8; HASH_LEN]> {
        self.th_2
            .ok_or(Error::InvalidState("transcript hash 2 not computed"))
    }

    fn th_3_computed(&self) -> Result<[u8; HASH_LEN]> {
        self.th_3
            .ok_or(Error::InvalidState("transcript hash 3 not computed"))
    }

    /// Returns the public part of our ephemeral key, checking that it fits
    /// the suite.
    fn ephemeral_public(&self, suite: CipherSuite) -> Result<Vec<u8>> {
        let key = self
            .ephemeral_local
            .as_ref()
            .ok_or(Error::InvalidState("no ephemeral key"))?;
        let expected = if suite.is_nist() {
            Curve::P256
        } else {
            Curve::X25519
        };
        if key.crv != expected {
            return Err(Error::InvalidState(
                "ephemeral key does not match the cipher suite",
            ));
        }

        Ok(key.x.clone())
    }

    /// Asks the hook for additional data to send with `message`.
    fn outbound_ad(
        &mut self,
        message: MessageNumber,
        buf: &mut [u8; MAX_AD_LEN],
    ) -> Result<Option<usize>> {
        let callback = match self.additional_data.as_mut() {
            Some(callback) => callback,
            None => return Ok(None),
        };
        match callback.outbound(message, buf) {
            Ok(Some(len)) if len > MAX_AD_LEN => {
                Err(Error::Encoding("additional data too long"))
            }
            Ok(len) => Ok(len),
            Err(_) => Err(Error::Encoding("additional data callback failed")),
        }
    }

    /// Hands the additional data received with `message` to the hook.
    fn inbound_ad(
        &mut self,
        message: MessageNumber,
        ad: Option<&[u8]>,
    ) -> Result<()> {
        match (self.additional_data.as_mut(), ad) {
            (Some(callback), Some(ad)) => callback
                .inbound(message, ad)
                .map_err(|_| Error::Decoding("additional data rejected")),
            _ => Ok(()),
        }
    }

    /// Writes `message_1` into `out`.
    pub fn encode_message_1(&mut self, out: &mut [u8]) -> Result<usize> {
        self.check(Role::Initiator, State::Init)?;
        let res = self.write_message_1(out);
        self.settle(res)
    }

    fn write_message_1(&mut self, out: &mut [u8]) -> Result<usize> {
        if self.method != Method::SignSign {
            return Err(Error::UnsupportedMethod);
        }
        let suite = *self
            .suites
            .first()
            .ok_or(Error::InvalidState("no cipher suite configured"))?;
        let g_x = self.ephemeral_public(suite)?;
        let mut ad = [0; MAX_AD_LEN];
        let ad_len = self.outbound_ad(MessageNumber::Message1, &mut ad)?;

        let len = format::encode_message_1(
            self.method,
            self.correlation,
            &self.suites,
            &g_x,
            self.cid_initiator.as_deref().unwrap_or_default(),
            ad_len.map(|n| &ad[..n]),
            out,
        )?;
        self.transcript.absorb(&out[..len]);
        self.suite = Some(suite);
        self.state = State::Message1;
        debug!("Sent message_1 with {:?}", suite);

        Ok(len)
    }

    /// Accepts `message_1`, settling suite, correlation and the Initiator's
    /// connection identifier.
    pub fn decode_message_1(&mut self, bytes: &[u8]) -> Result<()> {
        self.check(Role::Responder, State::Init)?;
        let res = self.read_message_1(bytes);
        self.settle(res)
    }

    fn read_message_1(&mut self, bytes: &[u8]) -> Result<()> {
        let msg = format::decode_message_1(bytes)?;
        if msg.method != Method::SignSign || msg.method != self.method {
            return Err(Error::UnsupportedMethod);
        }
        let suite = CipherSuite::from_value(msg.selected_suite)
            .filter(|suite| self.suites.contains(suite))
            .ok_or(Error::UnsupportedCipherSuite)?;
        self.inbound_ad(MessageNumber::Message1, msg.ad_1.as_deref())?;

        self.transcript.absorb(bytes);
        self.correlation = msg.correlation;
        self.suite = Some(suite);
        self.cid_initiator = msg.c_i;
        self.ephemeral_remote = Some(msg.g_x);
        self.state = State::Message1;
        debug!(
            "Received message_1 with {:?} and correlation {:?}",
            suite, msg.correlation
        );

        Ok(())
    }

    /// Writes `data_2` into `out` and computes `TH_2`.
    pub fn encode_data_2(&mut self, out: &mut [u8]) -> Result<usize> {
        self.check(Role::Responder, State::Message1)?;
        if self.th_2.is_some() {
            return Err(Error::InvalidState("data_2 already encoded"));
        }
        let res = self.write_data_2(out);
        self.settle(res)
    }

    fn write_data_2(&mut self, out: &mut [u8]) -> Result<usize> {
        let suite = self.selected_suite()?;
        let g_y = self.ephemeral_public(suite)?;
        let len = format::encode_data_2(
            self.correlation,
            self.cid_initiator.as_deref().unwrap_or_default(),
            &g_y,
            self.cid_responder.as_deref().unwrap_or_default(),
            out,
        )?;

        self.transcript.absorb(&out[..len]);
        let th_2 = self.transcript.digest();
        // From here on the transcript builds up TH_3
        self.transcript = Transcript::new();
        self.transcript.absorb_bstr(&th_2);
        self.th_2 = Some(th_2);
        trace!("Computed TH_2 over data_2 of {} bytes", len);

        Ok(len)
    }

    /// Writes the plaintext `P_2e`, signed with our credential.
    pub fn encode_p2e(&mut self, out: &mut [u8]) -> Result<usize> {
        self.check(Role::Responder, State::Message1)?;
        let th_2 = self.th_2_computed()?;
        let res = self.write_plaintext(MessageNumber::Message2, &th_2, out);
        self.settle(res)
    }

    /// Writes `message_2` from the `data_2` produced by
    /// [`encode_data_2`](Self::encode_data_2) and the encrypted `P_2e`.
    pub fn encode_message_2(
        &mut self,
        data_2: &[u8],
        ciphertext_2: &[u8],
        out: &mut [u8],
    ) -> Result<usize> {
        self.check(Role::Responder, State::Message1)?;
        self.th_2_computed()?;
        let res = format::encode_message_2(data_2, ciphertext_2, out);
        if res.is_ok() {
            self.transcript.absorb_bstr(ciphertext_2);
            self.state = State::Message2;
            debug!("Sent message_2");
        }
        self.settle(res)
    }

    /// Accepts the unprotected part of `message_2`, computes `TH_2` and
    /// returns `CIPHERTEXT_2`.
    pub fn decode_message_2<'a>(&mut self, bytes: &'a [u8]) -> Result<&'a [u8]> {
        self.check(Role::Initiator, State::Message1)?;
        if self.th_2.is_some() {
            return Err(Error::InvalidState("message_2 already decoded"));
        }
        let res = self.read_message_2(bytes);
        self.settle(res)
    }

    fn read_message_2<'a>(&mut self, bytes: &'a [u8]) -> Result<&'a [u8]> {
        let msg = format::decode_message_2(self.correlation, bytes)?;
        if let Some(c_i) = msg.data_2.c_i.as_deref() {
            if Some(c_i) != self.cid_initiator.as_deref() {
                return Err(Error::Decoding("C_I does not match"));
            }
        }

        self.transcript.absorb(msg.data_2_bytes);
        let th_2 = self.transcript.digest();
        self.transcript = Transcript::new();
        self.transcript.absorb_bstr(&th_2);
        self.transcript.absorb_bstr(msg.ciphertext_2);
        self.th_2 = Some(th_2);
        self.cid_responder = Some(msg.data_2.c_r);
        self.ephemeral_remote = Some(msg.data_2.g_y);
        trace!("Computed TH_2, {} bytes of ciphertext", msg.ciphertext_2.len());

        Ok(msg.ciphertext_2)
    }

    /// Verifies the Responder's signature in the decrypted `P_2e`. Only on
    /// success is `message_2` accepted.
    pub fn decode_and_verify_p2e(&mut self, plaintext: &[u8]) -> Result<()> {
        self.check(Role::Initiator, State::Message1)?;
        let th_2 = self.th_2_computed()?;
        let res = self.verify_plaintext(MessageNumber::Message2, &th_2, plaintext);
        self.settle(res)
    }

    /// Writes `data_3` into `out` and computes `TH_3`.
    pub fn encode_data_3(&mut self, out: &mut [u8]) -> Result<usize> {
        self.check(Role::Initiator, State::Message2)?;
        if self.th_3.is_some() {
            return Err(Error::InvalidState("data_3 already encoded"));
        }
        let res = self.write_data_3(out);
        self.settle(res)
    }

    fn write_data_3(&mut self, out: &mut [u8]) -> Result<usize> {
        let len = format::encode_data_3(
            self.correlation,
            self.cid_responder.as_deref().unwrap_or_default(),
            out,
        )?;
        self.transcript.absorb(&out[..len]);
        self.th_3 = Some(self.transcript.digest());
        trace!("Computed TH_3 over data_3 of {} bytes", len);

        Ok(len)
    }

    /// Writes the plaintext `P_3ae`, signed with our credential.
    pub fn encode_p3ae(&mut self, out: &mut [u8]) -> Result<usize> {
        self.check(Role::Initiator, State::Message2)?;
        let th_3 = self.th_3_computed()?;
        let res = self.write_plaintext(MessageNumber::Message3, &th_3, out);
        self.settle(res)
    }

    /// Writes `message_3` from the `data_3` produced by
    /// [`encode_data_3`](Self::encode_data_3) and the encrypted `P_3ae`,
    /// completing the handshake.
    pub fn encode_message_3(
        &mut self,
        data_3: &[u8],
        ciphertext_3: &[u8],
        out: &mut [u8],
    ) -> Result<usize> {
        self.check(Role::Initiator, State::Message2)?;
        self.th_3_computed()?;
        let res = format::encode_message_3(data_3, ciphertext_3, out);
        if res.is_ok() {
            self.state = State::Completed;
            debug!("Sent message_3, handshake completed");
        }
        self.settle(res)
    }

    /// Accepts the unprotected part of `message_3`, computes `TH_3` and
    /// returns `CIPHERTEXT_3`.
    pub fn decode_message_3<'a>(&mut self, bytes: &'a [u8]) -> Result<&'a [u8]> {
        self.check(Role::Responder, State::Message2)?;
        if self.th_3.is_some() {
            return Err(Error::InvalidState("message_3 already decoded"));
        }
        let res = self.read_message_3(bytes);
        self.settle(res)
    }

    fn read_message_3<'a>(&mut self, bytes: &'a [u8]) -> Result<&'a [u8]> {
        let msg = format::decode_message_3(self.correlation, bytes)?;
        if let Some(c_r) = msg.c_r.as_deref() {
            if Some(c_r) != self.cid_responder.as_deref() {
                return Err(Error::Decoding("C_R does not match"));
            }
        }

        self.transcript.absorb(msg.data_3_bytes);
        self.th_3 = Some(self.transcript.digest());
        trace!("Computed TH_3, {} bytes of ciphertext", msg.ciphertext_3.len());

        Ok(msg.ciphertext_3)
    }

    /// Verifies the Initiator's signature in the decrypted `P_3ae`, completing
    /// the handshake on success.
    pub fn decode_and_verify_p3ae(&mut self, plaintext: &[u8]) -> Result<()> {
        self.check(Role::Responder, State::Message2)?;
        let th_3 = self.th_3_computed()?;
        let res = self.verify_plaintext(MessageNumber::Message3, &th_3, plaintext);
        self.settle(res)
    }

    fn write_plaintext(
        &mut self,
        message: MessageNumber,
        th: &[u8],
        out: &mut [u8],
    ) -> Result<usize> {
        let suite = self.selected_suite()?;
        let mut ad = [0; MAX_AD_LEN];
        let ad_len = self.outbound_ad(message, &mut ad)?;

        verify::sign_plaintext(
            &self.crypto,
            suite,
            th,
            &self.credential,
            ad_len.map(|n| &ad[..n]),
            out,
        )
    }

    fn verify_plaintext(
        &mut self,
        message: MessageNumber,
        th: &[u8],
        plaintext: &[u8],
    ) -> Result<()> {
        let suite = self.selected_suite()?;
        let verified = verify::decode_and_verify(
            &self.crypto,
            suite,
            th,
            &self.peers,
            plaintext,
        )?;
        self.inbound_ad(message, verified.plaintext.ad.as_deref())?;

        self.credential_remote = Some(verified.credential);
        self.state = match message {
            MessageNumber::Message3 => State::Completed,
            _ => State::Message2,
        };
        debug!("Peer authenticated with {:?}", message);

        Ok(())
    }

    /// Returns the transcript hash and the credential of the party
    /// authenticating with `message`.
    fn binding(
        &self,
        message: MessageNumber,
    ) -> Result<([u8; HASH_LEN], &Credential)> {
        if let Some(error) = self.error {
            return Err(error);
        }
        let (th, sender) = match message {
            MessageNumber::Message1 => {
                return Err(Error::InvalidState("message_1 is not protected"))
            }
            MessageNumber::Message2 => (self.th_2_computed()?, Role::Responder),
            MessageNumber::Message3 => (self.th_3_computed()?, Role::Initiator),
        };
        let credential = if sender == self.role {
            &self.credential
        } else {
            self.peer_credential()
                .ok_or(Error::InvalidState("peer not authenticated"))?
        };

        Ok((th, credential))
    }

    /// Writes the external additional data that `message` binds, from the
    /// transcript hash, the credential of its sender and `ad`.
    pub fn external_aad(
        &self,
        message: MessageNumber,
        ad: Option<&[u8]>,
        out: &mut [u8],
    ) -> Result<usize> {
        let (th, credential) = self.binding(message)?;
        cose::build_external_aad(&th, credential.cred(), ad, out)
    }

    /// Writes the `Enc_structure` that is the associated data for encrypting
    /// the plaintext of `message`.
    pub fn enc_structure(
        &self,
        message: MessageNumber,
        ad: Option<&[u8]>,
        out: &mut [u8],
    ) -> Result<usize> {
        let (th, credential) = self.binding(message)?;
        let mut id_cred = [0; SCRATCH_LEN];
        let id_cred_len = credential.id_cred(&mut id_cred)?;
        let mut external_aad = [0; SCRATCH_LEN];
        let external_aad_len = cose::build_external_aad(
            &th,
            credential.cred(),
            ad,
            &mut external_aad,
        )?;

        cose::build_enc_structure(
            &id_cred[..id_cred_len],
            &external_aad[..external_aad_len],
            out,
        )
    }

    /// Writes `A_3ae`, the associated data of `message_3`'s encryption.
    pub fn message_3_associated_data(&self, out: &mut [u8]) -> Result<usize> {
        if let Some(error) = self.error {
            return Err(error);
        }
        cose::build_message_3_associated_data(&self.th_3_computed()?, out)
    }

    /// Writes the `info` input of the EDHOC-KDF for a key bound to the
    /// transcript hash of `message`.
    pub fn kdf_info(
        &self,
        message: MessageNumber,
        label: &str,
        length: usize,
        out: &mut [u8],
    ) -> Result<usize> {
        if let Some(error) = self.error {
            return Err(error);
        }
        let th = match message {
            MessageNumber::Message1 => {
                return Err(Error::InvalidState("message_1 is not protected"))
            }
            MessageNumber::Message2 => self.th_2_computed()?,
            MessageNumber::Message3 => self.th_3_computed()?,
        };
        let suite = self.selected_suite()?;

        cose::build_kdf_info(suite.aead_algorithm(), &th, label, length, out)
    }

    /// Writes the ECDH shared secret of the two ephemeral keys.
    pub fn shared_secret(&self, out: &mut [u8]) -> Result<usize> {
        if let Some(error) = self.error {
            return Err(error);
        }
        let suite = self.selected_suite()?;
        let private = self
            .ephemeral_local
            .as_ref()
            .and_then(CoseKey::private)
            .ok_or(Error::InvalidState("no ephemeral key"))?;
        let public = self
            .ephemeral_remote
            .as_deref()
            .ok_or(Error::InvalidState("peer's ephemeral key not known"))?;

        self.crypto.ecdh(suite, private, public, out)
    }

    /// Writes the EDHOC error message telling the peer why the handshake
    /// failed.
    ///
    /// The connection identifier is included where the message it replaces
    /// would have carried it, and `SUITES_R` only if the suite was the
    /// problem.
    pub fn encode_error(&self, out: &mut [u8]) -> Result<usize> {
        let error = self
            .error
            .ok_or(Error::InvalidState("handshake has not failed"))?;
        let c_x = match self.role {
            Role::Responder if self.correlation.c_i_in_data_2() => {
                self.cid_initiator.as_deref()
            }
            Role::Initiator if self.correlation.c_r_in_data_3() => {
                self.cid_responder.as_deref()
            }
            _ => None,
        };
        let suites_r: &[CipherSuite] = match error {
            Error::UnsupportedCipherSuite => &self.suites,
            _ => &[],
        };

        format::encode_error_message(c_x, &error.to_string(), suites_r, out)
    }
}

impl<C: Crypto> fmt::Debug for EdhocContext<C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("EdhocContext")
            .field("role", &self.role)
            .field("state", &self.state)
            .field("error", &self.error)
            .field("correlation", &self.correlation)
            .field("suite", &self.suite)
            .field("cid_initiator", &self.cid_initiator)
            .field("cid_responder", &self.cid_responder)
            .finish()
    }
}
