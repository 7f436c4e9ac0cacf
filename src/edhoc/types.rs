//! Protocol enumerations and compile-time bounds.

/// Longest connection identifier we put on or accept from the wire.
pub const MAX_CID_LEN: usize = 8;
/// Longest additional data block carried in any message.
pub const MAX_AD_LEN: usize = 64;
/// Most cipher suites offered in `SUITES_I` or `SUITES_R`.
pub const MAX_SUITES: usize = 4;
/// Size of the stack buffers used to assemble intermediate structures.
pub const SCRATCH_LEN: usize = 512;
/// Output length of the transcript hash (SHA-256).
pub const HASH_LEN: usize = 32;
/// Largest output HKDF-SHA-256 can produce.
pub const MAX_KDF_LEN: usize = 255 * HASH_LEN;
/// Length of both Ed25519 and ES256 (r || s) signatures.
pub const SIGNATURE_LEN: usize = 64;

/// Which party of the handshake we are.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Initiator,
    Responder,
}

/// Handshake progress of a session context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Nothing has been sent or received.
    Init,
    /// `message_1` was sent (Initiator) or accepted (Responder).
    Message1,
    /// `message_2` was accepted (Initiator) or sent (Responder).
    Message2,
    /// The handshake finished successfully.
    Completed,
    /// Something went wrong. The context only reports the failure from now on.
    Failed,
}

/// Identifies the message an additional data block belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageNumber {
    Message1,
    Message2,
    Message3,
}

/// The correlation value, telling which connection identifiers the transport
/// makes redundant.
///
/// * `None` - no external correlation, every identifier is sent.
/// * `InitiatorImplicit` - the transport correlates `message_1` and
///   `message_2` (e.g. the Token in CoAP), so `C_I` is left out of
///   `message_2`.
/// * `ResponderImplicit` - the transport correlates `message_2` and
///   `message_3`, so `C_R` is left out of `message_3`.
/// * `BothImplicit` - all messages are correlated, neither identifier has to
///   be echoed and `C_I` is not sent at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Correlation {
    None = 0,
    InitiatorImplicit = 1,
    ResponderImplicit = 2,
    BothImplicit = 3,
}

impl Correlation {
    pub const ALL: [Correlation; 4] = [
        Correlation::None,
        Correlation::InitiatorImplicit,
        Correlation::ResponderImplicit,
        Correlation::BothImplicit,
    ];

    pub fn from_value(value: u8) -> Option<Correlation> {
        match value {
            0 => Some(Correlation::None),
            1 => Some(Correlation::InitiatorImplicit),
            2 => Some(Correlation::ResponderImplicit),
            3 => Some(Correlation::BothImplicit),
            _ => None,
        }
    }

    pub fn value(self) -> u8 {
        self as u8
    }

    /// Whether `message_1` carries `C_I`.
    pub fn c_i_in_message_1(self) -> bool {
        match self {
            Correlation::BothImplicit => false,
            _ => true,
        }
    }

    /// Whether `data_2` echoes `C_I`.
    pub fn c_i_in_data_2(self) -> bool {
        match self {
            Correlation::None | Correlation::ResponderImplicit => true,
            Correlation::InitiatorImplicit | Correlation::BothImplicit => false,
        }
    }

    /// Whether `data_3` echoes `C_R`.
    pub fn c_r_in_data_3(self) -> bool {
        match self {
            Correlation::None | Correlation::InitiatorImplicit => true,
            Correlation::ResponderImplicit | Correlation::BothImplicit => false,
        }
    }
}

/// The authentication method, i.e. how Initiator and Responder each prove
/// their identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    SignSign = 0,
    SignStatic = 1,
    StaticSign = 2,
    StaticStatic = 3,
}

impl Method {
    pub fn from_value(value: u8) -> Option<Method> {
        match value {
            0 => Some(Method::SignSign),
            1 => Some(Method::SignStatic),
            2 => Some(Method::StaticSign),
            3 => Some(Method::StaticStatic),
            _ => None,
        }
    }

    pub fn value(self) -> u8 {
        self as u8
    }
}

/// The EDHOC cipher suites.
///
/// | Suite | AEAD               | Hash    | ECDH   | Signature |
/// |-------|--------------------|---------|--------|-----------|
/// | 0     | AES-CCM-16-64-128  | SHA-256 | X25519 | Ed25519   |
/// | 1     | AES-CCM-16-128-128 | SHA-256 | X25519 | Ed25519   |
/// | 2     | AES-CCM-16-64-128  | SHA-256 | P-256  | ES256     |
/// | 3     | AES-CCM-16-128-128 | SHA-256 | P-256  | ES256     |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherSuite {
    Suite0 = 0,
    Suite1 = 1,
    Suite2 = 2,
    Suite3 = 3,
}

impl CipherSuite {
    pub const ALL: [CipherSuite; 4] = [
        CipherSuite::Suite0,
        CipherSuite::Suite1,
        CipherSuite::Suite2,
        CipherSuite::Suite3,
    ];

    pub fn from_value(value: u8) -> Option<CipherSuite> {
        match value {
            0 => Some(CipherSuite::Suite0),
            1 => Some(CipherSuite::Suite1),
            2 => Some(CipherSuite::Suite2),
            3 => Some(CipherSuite::Suite3),
            _ => None,
        }
    }

    pub fn value(self) -> u8 {
        self as u8
    }

    /// The COSE algorithm identifier of the suite's AEAD.
    pub fn aead_algorithm(self) -> i64 {
        match self {
            // AES-CCM-16-64-128
            CipherSuite::Suite0 | CipherSuite::Suite2 => 10,
            // AES-CCM-16-128-128
            CipherSuite::Suite1 | CipherSuite::Suite3 => 30,
        }
    }

    /// Length of the AEAD authentication tag in bytes.
    pub fn aead_tag_len(self) -> usize {
        match self {
            CipherSuite::Suite0 | CipherSuite::Suite2 => 8,
            CipherSuite::Suite1 | CipherSuite::Suite3 => 16,
        }
    }

    /// Whether the suite uses the P-256 curve (ECDH and ES256) rather than
    /// X25519 and Ed25519.
    pub fn is_nist(self) -> bool {
        match self {
            CipherSuite::Suite0 | CipherSuite::Suite1 => false,
            CipherSuite::Suite2 | CipherSuite::Suite3 => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correlation_elision() {
        let table = [
            (Correlation::None, true, true, true),
            (Correlation::InitiatorImplicit, true, false, true),
            (Correlation::ResponderImplicit, true, true, false),
            (Correlation::BothImplicit, false, false, false),
        ];
        for &(corr, m1, d2, d3) in table.iter() {
            assert_eq!(m1, corr.c_i_in_message_1());
            assert_eq!(d2, corr.c_i_in_data_2());
            assert_eq!(d3, corr.c_r_in_data_3());
            assert_eq!(Some(corr), Correlation::from_value(corr.value()));
        }
        assert_eq!(None, Correlation::from_value(4));
    }

    #[test]
    fn suite_properties() {
        for &suite in CipherSuite::ALL.iter() {
            assert_eq!(Some(suite), CipherSuite::from_value(suite.value()));
        }
        assert_eq!(None, CipherSuite::from_value(4));
        assert_eq!(10, CipherSuite::Suite2.aead_algorithm());
        assert_eq!(16, CipherSuite::Suite3.aead_tag_len());
        assert!(!CipherSuite::Suite1.is_nist());
        assert_eq!(None, Method::from_value(4));
    }
}
