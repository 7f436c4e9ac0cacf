//! The EDHOC handshake messages and the session context driving them.
//!
//! The pure codec lives in [`format`] and [`cose`] and can be used on its own.
//! [`EdhocContext`] ties it together with the transcript hashes, the
//! verification of the peer's signature and the handshake state.

mod context;
pub mod cose;
pub mod crypto;
mod error;
pub mod format;
mod transcript;
pub mod types;
mod verify;

#[cfg(test)]
mod test_vectors;

pub use context::{AdditionalData, EdhocConfig, EdhocContext};
pub use cose::{CoseKey, Credential, Curve, KeyType};
pub use crypto::{Crypto, RustCrypto};
pub use error::Error;
pub use transcript::Transcript;
pub use types::{
    CipherSuite, Correlation, MessageNumber, Method, Role, State,
};
pub use verify::{decode_and_verify, sign_plaintext, Verified};

/// The result type for the `edhoc` module.
pub type Result<T> = core::result::Result<T, Error>;
