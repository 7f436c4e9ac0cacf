//! The errors of the `edhoc` module.

use core::fmt;
#[cfg(feature = "std")]
use std::error;

use crate::cbor::CborError;

/// The catch-all error type for this module.
///
/// It is `Copy`, so a failed session context can keep the error that
/// poisoned it and hand out the same value on every later call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A structure could not be encoded, or an additional data callback
    /// failed while producing outbound data.
    Encoding(&'static str),
    /// Received bytes don't follow the expected grammar, are truncated or
    /// have trailing garbage.
    Decoding(&'static str),
    /// The selected cipher suite is not one we support.
    UnsupportedCipherSuite,
    /// The authentication method is not one we support.
    UnsupportedMethod,
    /// The peer's proof of identity could not be verified. Which part of the
    /// check failed is intentionally not revealed.
    AuthenticationFailure,
    /// The output buffer is too small for what has to be written.
    BufferOverflow,
    /// An operation was called at a point in the handshake where it makes no
    /// sense, e.g. asking for data bound to a transcript hash that hasn't
    /// been computed yet.
    InvalidState(&'static str),
    /// A cryptographic primitive (ECDH, AEAD, signing) failed.
    Crypto(&'static str),
}

impl Error {
    /// Converts a `CborError` that happened while encoding.
    pub(crate) fn encoding(e: CborError) -> Error {
        match e {
            CborError::Overflow => Error::BufferOverflow,
            _ => Error::Encoding("CBOR encoding failed"),
        }
    }
}

/// Converts a `CborError` that happened while decoding.
impl From<CborError> for Error {
    fn from(e: CborError) -> Error {
        match e {
            CborError::Overflow => Error::BufferOverflow,
            CborError::Truncated => Error::Decoding("truncated item"),
            CborError::TrailingBytes => Error::Decoding("trailing bytes"),
            CborError::TooManyItems => Error::Decoding("too many items"),
            CborError::Malformed | CborError::SerdeCbor(_) => {
                Error::Decoding("malformed item")
            }
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Encoding(e) => write!(f, "Encoding error: {}", e),
            Error::Decoding(e) => write!(f, "Decoding error: {}", e),
            Error::UnsupportedCipherSuite => {
                write!(f, "Cipher suite unsupported")
            }
            Error::UnsupportedMethod => {
                write!(f, "Authentication method unsupported")
            }
            Error::AuthenticationFailure => {
                write!(f, "Authentication of the peer failed")
            }
            Error::BufferOverflow => write!(f, "Output buffer too small"),
            Error::InvalidState(e) => write!(f, "Invalid state: {}", e),
            Error::Crypto(e) => write!(f, "Crypto error: {}", e),
        }
    }
}

#[cfg(feature = "std")]
impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        None
    }
}
