//! Message formatting and validation for
//! [EDHOC](https://datatracker.ietf.org/doc/draft-ietf-lake-edhoc), the
//! lightweight authenticated key exchange intended for constrained devices.
//!
//! This covers the part of EDHOC that turns a handshake into bytes and back:
//! encoding and decoding of the three messages with their correlation
//! dependent connection identifiers, the COSE structures bound into
//! signatures and encryptions, the transcript hashes chaining the messages
//! together and the verification of the peer's signature before a message is
//! accepted. Key derivation, credential management and the transport are
//! left to the application.
//!
//! Everything writes into caller-supplied buffers, so the crate works on
//! embedded devices with `#![no_std]` and an allocator.
//!
//! ## Security
//! This should **not currently be used in production code**, use at your own
//! risk.

#![no_std]
#[macro_use]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod cbor;
pub mod edhoc;
