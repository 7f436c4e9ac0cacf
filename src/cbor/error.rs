use core::fmt;
#[cfg(feature = "std")]
use std::error;

/// The error type for the `cbor` module.
// TODO: Derive PartialEq as soon as serde_cbor does for its error type
#[derive(Debug)]
pub enum CborError {
    /// Wraps errors from `serde_cbor`.
    SerdeCbor(serde_cbor::Error),
    /// The output buffer has no room left for the item.
    Overflow,
    /// The input ended in the middle of an item.
    Truncated,
    /// The input is not well-formed CBOR, or uses a construct we don't accept
    /// (indefinite lengths, reserved additional information, deep nesting).
    Malformed,
    /// There are bytes left after the last expected item.
    TrailingBytes,
    /// Tried to encode/decode CBOR sequence of more than 23 items.
    TooManyItems,
}

impl From<serde_cbor::Error> for CborError {
    fn from(e: serde_cbor::Error) -> CborError {
        CborError::SerdeCbor(e)
    }
}

impl fmt::Display for CborError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CborError::SerdeCbor(e) => write!(f, "CBOR error: {}", e),
            CborError::Overflow => {
                write!(f, "CBOR error: output buffer too small")
            }
            CborError::Truncated => write!(f, "CBOR error: truncated item"),
            CborError::Malformed => write!(f, "CBOR error: malformed item"),
            CborError::TrailingBytes => {
                write!(f, "CBOR error: unexpected trailing bytes")
            }
            CborError::TooManyItems => write!(
                f,
                "CBOR error: can't decode CBOR sequence of more than 23 items"
            ),
        }
    }
}

#[cfg(feature = "std")]
impl error::Error for CborError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            CborError::SerdeCbor(e) => Some(e),
            _ => None,
        }
    }
}
