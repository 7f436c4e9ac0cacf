//! Helpful functionality around the `serde_cbor` crate.
//!
//! Everything here works on caller-supplied buffers. The [`Encoder`] writes
//! items one after another into a fixed slice and reports
//! [`CborError::Overflow`] instead of growing, and the [`Decoder`] walks a
//! CBOR sequence item by item, so that protocol code can decide field by
//! field what comes next.

use core::{convert::TryFrom, result};
use serde::{de::DeserializeOwned, Serialize};
use serde_cbor::{de, ser::Write, Serializer};

#[cfg_attr(tarpaulin, skip)]
mod error;
pub use error::CborError;

/// The result type for the `cbor` module.
pub type Result<T> = core::result::Result<T, CborError>;

pub const MAJOR_UINT: u8 = 0;
pub const MAJOR_NINT: u8 = 1;
pub const MAJOR_BSTR: u8 = 2;
pub const MAJOR_TSTR: u8 = 3;
pub const MAJOR_ARRAY: u8 = 4;
pub const MAJOR_MAP: u8 = 5;
pub const MAJOR_TAG: u8 = 6;

/// How deep arrays, maps and tags may nest before we give up.
const MAX_DEPTH: usize = 8;

/// Implements the `Write` trait from `serde_cbor` on top of a borrowed slice.
///
/// It never allocates. A write that doesn't fit is rejected and remembered,
/// so the caller can tell an exhausted buffer apart from other failures.
struct BoundedWrite<'a> {
    buf: &'a mut [u8],
    pos: usize,
    overflowed: bool,
}

impl<'a> BoundedWrite<'a> {
    fn new(buf: &'a mut [u8]) -> BoundedWrite<'a> {
        BoundedWrite {
            buf,
            pos: 0,
            overflowed: false,
        }
    }
}

impl Write for BoundedWrite<'_> {
    type Error = serde_cbor::Error;

    fn write_all(&mut self, buf: &[u8]) -> result::Result<(), Self::Error> {
        let end = self.pos + buf.len();
        if end > self.buf.len() {
            self.overflowed = true;
            return Err(<serde_cbor::Error as serde::ser::Error>::custom(
                "output buffer exhausted",
            ));
        }
        self.buf[self.pos..end].copy_from_slice(buf);
        self.pos = end;

        Ok(())
    }
}

/// Writes a sequence of CBOR items into a fixed-capacity buffer.
pub struct Encoder<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> Encoder<'a> {
    /// Constructs a new `Encoder` writing from the start of `buf`.
    pub fn new(buf: &'a mut [u8]) -> Encoder<'a> {
        Encoder { buf, pos: 0 }
    }

    /// Appends the CBOR encoding of `item`.
    pub fn push(&mut self, item: impl Serialize) -> Result<()> {
        let mut serializer =
            Serializer::new(BoundedWrite::new(&mut self.buf[self.pos..]));
        let res = item.serialize(&mut serializer);
        let writer = serializer.into_inner();

        match res {
            Ok(()) => {
                self.pos += writer.pos;
                Ok(())
            }
            Err(_) if writer.overflowed => Err(CborError::Overflow),
            Err(e) => Err(e.into()),
        }
    }

    /// Appends a flat tuple of key/value items as a CBOR map.
    ///
    /// Only works for maps with at most 11 key/value pairs.
    pub fn push_map(&mut self, flat: impl Serialize) -> Result<()> {
        let start = self.pos;
        self.push(flat)?;
        array_to_map(&mut self.buf[start..self.pos])
    }

    /// Appends bytes that are already CBOR encoded.
    pub fn push_raw(&mut self, bytes: &[u8]) -> Result<()> {
        let end = self.pos + bytes.len();
        if end > self.buf.len() {
            return Err(CborError::Overflow);
        }
        self.buf[self.pos..end].copy_from_slice(bytes);
        self.pos = end;

        Ok(())
    }

    /// Returns the number of bytes written so far.
    pub fn position(&self) -> usize {
        self.pos
    }
}

/// Serializes a single object into `buf`, returning the number of bytes used.
pub fn encode_into(object: impl Serialize, buf: &mut [u8]) -> Result<usize> {
    let mut encoder = Encoder::new(buf);
    encoder.push(object)?;

    Ok(encoder.position())
}

/// Reads a sequence of CBOR items one at a time.
pub struct Decoder<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(input: &'a [u8]) -> Decoder<'a> {
        Decoder { input, pos: 0 }
    }

    /// Returns the number of bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns `true` if every item has been consumed.
    pub fn is_empty(&self) -> bool {
        self.pos == self.input.len()
    }

    /// Returns the bytes that have not been consumed yet.
    pub fn remaining(&self) -> &'a [u8] {
        &self.input[self.pos..]
    }

    /// Returns the major type and argument of the next item without
    /// consuming it.
    pub fn peek_header(&self) -> Result<(u8, u64)> {
        let (major, arg, _) = header(self.remaining())?;
        Ok((major, arg))
    }

    /// Returns the major type of the next item without consuming it.
    pub fn peek_major(&self) -> Result<u8> {
        Ok(self.peek_header()?.0)
    }

    /// Consumes the next item and returns its encoded bytes.
    pub fn next_raw(&mut self) -> Result<&'a [u8]> {
        let rest = self.remaining();
        let len = item_len(rest, 0)?;
        self.pos += len;

        Ok(&rest[..len])
    }

    /// Consumes the next item, which has to be a byte string, and returns its
    /// content without copying.
    pub fn next_bytes(&mut self) -> Result<&'a [u8]> {
        let (major, arg) = self.peek_header()?;
        if major != MAJOR_BSTR {
            return Err(CborError::Malformed);
        }
        let raw = self.next_raw()?;
        // The content is the tail of the item, after the header
        let body = usize::try_from(arg).map_err(|_| CborError::Truncated)?;

        Ok(&raw[raw.len() - body..])
    }

    /// Consumes the next item and deserializes it.
    pub fn next<T: DeserializeOwned>(&mut self) -> Result<T> {
        let rest = self.remaining();
        let len = item_len(rest, 0)?;
        // serde_cbor wants a mutable buffer to decode from
        let mut tmp = rest[..len].to_vec();
        let item = de::from_mut_slice(&mut tmp)?;
        self.pos += len;

        Ok(item)
    }

    /// Fails if there is anything left after the last expected item.
    pub fn finish(&self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(CborError::TrailingBytes)
        }
    }
}

/// Encodes the header of an item with the given major type and argument in
/// its shortest form.
///
/// Returns the buffer and how many of its bytes are used.
pub fn encode_header(major: u8, arg: u64) -> ([u8; 9], usize) {
    let mut out = [0; 9];
    let n_bytes = match arg {
        0..=23 => {
            out[0] = (major << 5) | arg as u8;
            return (out, 1);
        }
        24..=0xFF => 1,
        0x100..=0xFFFF => 2,
        0x1_0000..=0xFFFF_FFFF => 4,
        _ => 8,
    };
    let info = match n_bytes {
        1 => 24,
        2 => 25,
        4 => 26,
        _ => 27,
    };
    out[0] = (major << 5) | info;
    out[1..=n_bytes].copy_from_slice(&arg.to_be_bytes()[8 - n_bytes..]);

    (out, 1 + n_bytes)
}

/// Parses the initial byte and argument of an item.
///
/// Returns the major type, the argument and the length of the header.
fn header(input: &[u8]) -> Result<(u8, u64, usize)> {
    let initial = *input.first().ok_or(CborError::Truncated)?;
    let major = initial >> 5;
    let info = initial & 0b000_11111;

    let n_bytes = match info {
        0..=23 => return Ok((major, u64::from(info), 1)),
        24 => 1,
        25 => 2,
        26 => 4,
        27 => 8,
        // Reserved values and indefinite lengths
        _ => return Err(CborError::Malformed),
    };
    let arg_bytes = input.get(1..1 + n_bytes).ok_or(CborError::Truncated)?;
    let arg = arg_bytes
        .iter()
        .fold(0u64, |acc, &b| (acc << 8) | u64::from(b));
    // Only the shortest form of an argument is accepted
    let min = match n_bytes {
        1 => 24,
        2 => 0x100,
        4 => 0x1_0000,
        _ => 0x1_0000_0000,
    };
    if arg < min {
        return Err(CborError::Malformed);
    }

    Ok((major, arg, 1 + n_bytes))
}

/// Returns the length of the first complete item in `input`.
fn item_len(input: &[u8], depth: usize) -> Result<usize> {
    if depth > MAX_DEPTH {
        return Err(CborError::Malformed);
    }
    let (major, arg, header_len) = header(input)?;

    let len = match major {
        MAJOR_BSTR | MAJOR_TSTR => {
            let body = usize::try_from(arg).map_err(|_| CborError::Truncated)?;
            header_len.checked_add(body).ok_or(CborError::Truncated)?
        }
        MAJOR_ARRAY | MAJOR_MAP => {
            let n_items = if major == MAJOR_MAP {
                arg.checked_mul(2).ok_or(CborError::Malformed)?
            } else {
                arg
            };
            // Every item takes at least one byte, so this loop is bounded by
            // the length of the input
            let mut offset = header_len;
            for _ in 0..n_items {
                let rest = input.get(offset..).ok_or(CborError::Truncated)?;
                offset += item_len(rest, depth + 1)?;
            }
            offset
        }
        MAJOR_TAG => {
            let rest = input.get(header_len..).ok_or(CborError::Truncated)?;
            header_len + item_len(rest, depth + 1)?
        }
        // Integers and simple values are complete with their header
        _ => header_len,
    };

    if len > input.len() {
        Err(CborError::Truncated)
    } else {
        Ok(len)
    }
}

/// Changes the given CBOR bytes from an array of n elements to a map of n / 2
/// key/value pairs.
///
/// Only works for arrays with at most 23 items.
pub fn array_to_map(bytes: &mut [u8]) -> Result<()> {
    let first = bytes.first_mut().ok_or(CborError::Truncated)?;
    // The 5 least significant bits are the number of elements in the array
    let n = 0b000_11111 & *first;
    match n {
        _ if n > 23 => Err(CborError::TooManyItems),
        n => {
            // Change the major type and number of elements accordingly
            *first = 0b101_00000 | (n / 2);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_bytes::{ByteBuf, Bytes};

    use super::*;

    const MAP_0: [u8; 1] = [0xA0];
    const ARR_0: [u8; 1] = [0x80];
    const MAP_1: [u8; 4] = [0xA1, 0x01, 0x18, 0x2A];
    const ARR_2: [u8; 4] = [0x82, 0x01, 0x18, 0x2a];
    const ARR_24: [u8; 26] = [
        0x98, 0x18, 0x01, 0x01, 0x02, 0x01, 0x03, 0x01, 0x04, 0x01, 0x05,
        0x01, 0x06, 0x01, 0x07, 0x01, 0x08, 0x01, 0x09, 0x01, 0x0A, 0x01,
        0x0B, 0x01, 0x0C, 0x01,
    ];

    #[test]
    fn transformations() {
        let mut arr_0 = ARR_0.to_vec();
        array_to_map(&mut arr_0).unwrap();
        assert_eq!(&MAP_0[..], &arr_0[..]);

        let mut arr_2 = ARR_2.to_vec();
        array_to_map(&mut arr_2).unwrap();
        assert_eq!(&MAP_1[..], &arr_2[..]);

        let mut arr_24 = ARR_24.to_vec();
        assert!(array_to_map(&mut arr_24).is_err());
    }

    const OUTPUT_MIXED: [u8; 24] = [
        0x84, 0x18, 0x2A, 0x6D, 0x48, 0x65, 0x6C, 0x6C, 0x6F, 0x2C, 0x20,
        0x77, 0x6F, 0x72, 0x6C, 0x64, 0x21, 0x83, 0x01, 0x02, 0x03, 0x42,
        0x04, 0x05,
    ];

    #[test]
    fn bounded_write() {
        let input_mixed =
            (42, "Hello, world!", (1, 2, 3), Bytes::new(&[0x04, 0x05]));

        // Just enough room
        let mut buf = [0; 24];
        assert_eq!(24, encode_into(&input_mixed, &mut buf).unwrap());
        assert_eq!(&OUTPUT_MIXED, &buf);

        // One byte short
        let mut buf = [0; 23];
        match encode_into(&input_mixed, &mut buf) {
            Err(CborError::Overflow) => (),
            other => panic!("expected overflow, got {:?}", other),
        }
    }

    #[test]
    fn encoder_sequence() {
        let mut buf = [0; 8];
        let mut encoder = Encoder::new(&mut buf);
        encoder.push(3).unwrap();
        encoder.push(Bytes::new(&[0xC3])).unwrap();
        encoder.push_raw(&[0xF6]).unwrap();
        encoder.push_map((4, Bytes::new(&[0xA2]))).unwrap();
        assert_eq!(8, encoder.position());
        assert!(matches!(encoder.push(0), Err(CborError::Overflow)));
        assert!(matches!(encoder.push_raw(&[0]), Err(CborError::Overflow)));
        assert_eq!(&[0x03, 0x41, 0xC3, 0xF6, 0xA1, 0x04, 0x41, 0xA2], &buf);
    }

    #[test]
    fn item_lengths() {
        assert_eq!(1, item_len(&[0x01], 0).unwrap());
        assert_eq!(2, item_len(&[0x18, 0x2A, 0xFF], 0).unwrap());
        assert_eq!(1, item_len(&[0x37], 0).unwrap());
        assert_eq!(3, item_len(&[0x42, 0x01, 0x02], 0).unwrap());
        assert_eq!(4, item_len(&[0x82, 0x01, 0x41, 0xAA], 0).unwrap());
        assert_eq!(5, item_len(&[0xA1, 0x04, 0x42, 0x01, 0x02], 0).unwrap());
        assert_eq!(OUTPUT_MIXED.len(), item_len(&OUTPUT_MIXED, 0).unwrap());
    }

    #[test]
    fn item_errors() {
        assert!(matches!(item_len(&[], 0), Err(CborError::Truncated)));
        assert!(matches!(item_len(&[0x58], 0), Err(CborError::Truncated)));
        assert!(matches!(
            item_len(&[0x42, 0x01], 0),
            Err(CborError::Truncated)
        ));
        assert!(matches!(
            item_len(&[0x83, 0x01, 0x02], 0),
            Err(CborError::Truncated)
        ));
        assert!(matches!(
            item_len(&[0x5B, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF], 0),
            Err(CborError::Truncated)
        ));
        // Indefinite length byte string
        assert!(matches!(item_len(&[0x5F], 0), Err(CborError::Malformed)));
        // Reserved additional information
        assert!(matches!(item_len(&[0x1C], 0), Err(CborError::Malformed)));
        // Arguments that would fit a shorter header
        for bytes in [
            &[0x18, 0x01][..],
            &[0x19, 0x00, 0xFF],
            &[0x1A, 0x00, 0x00, 0xFF, 0xFF],
            &[0x1B, 0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF],
            &[0x59, 0x00, 0x01, 0xAA],
        ]
        .iter()
        {
            assert!(matches!(item_len(bytes, 0), Err(CborError::Malformed)));
        }
        assert_eq!(2, item_len(&[0x18, 0x18], 0).unwrap());
        // Nesting beyond the limit
        let nested = [0x81; 16];
        assert!(matches!(item_len(&nested, 0), Err(CborError::Malformed)));
    }

    #[test]
    fn decoder_sequence() {
        let bytes = [0x03, 0x02, 0x41, 0xC3, 0x37];
        let mut decoder = Decoder::new(&bytes);
        assert_eq!(3u8, decoder.next::<u8>().unwrap());
        assert_eq!(MAJOR_UINT, decoder.peek_major().unwrap());
        assert_eq!(2u8, decoder.next::<u8>().unwrap());
        assert_eq!((MAJOR_BSTR, 1), decoder.peek_header().unwrap());
        assert_eq!(&[0xC3], &decoder.next::<ByteBuf>().unwrap()[..]);
        assert!(matches!(decoder.finish(), Err(CborError::TrailingBytes)));
        assert_eq!(-24, decoder.next::<i64>().unwrap());
        assert!(decoder.finish().is_ok());
        assert_eq!(bytes.len(), decoder.position());
    }

    #[test]
    fn borrowed_bytes() {
        let mut bytes = vec![0x42, 0x01, 0x02, 0x58, 0x18];
        bytes.extend_from_slice(&[0xFF; 24]);
        bytes.push(0x01);
        let mut decoder = Decoder::new(&bytes);
        assert_eq!(&[0x01, 0x02], decoder.next_bytes().unwrap());
        assert_eq!(&[0xFF; 24], decoder.next_bytes().unwrap());
        assert!(matches!(decoder.next_bytes(), Err(CborError::Malformed)));
        assert_eq!(29, decoder.position());

        // A one byte string behind a two byte header
        let mut decoder = Decoder::new(&[0x58, 0x01, 0xFF]);
        assert!(matches!(decoder.next_bytes(), Err(CborError::Malformed)));
        assert_eq!(0, decoder.position());
    }

    #[test]
    fn headers() {
        let check = |major, arg, expected: &[u8]| {
            let (buf, len) = encode_header(major, arg);
            assert_eq!(expected, &buf[..len]);
            assert_eq!((major, arg, len), header(expected).unwrap());
        };
        check(MAJOR_BSTR, 0, &[0x40]);
        check(MAJOR_BSTR, 23, &[0x57]);
        check(MAJOR_BSTR, 32, &[0x58, 0x20]);
        check(MAJOR_UINT, 300, &[0x19, 0x01, 0x2C]);
        check(MAJOR_ARRAY, 0x1_0000, &[0x9A, 0x00, 0x01, 0x00, 0x00]);
        check(
            MAJOR_UINT,
            u64::max_value(),
            &[0x1B, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF],
        );
    }

    #[test]
    fn decoder_type_mismatch() {
        let bytes = [0x41, 0xC3];
        let mut decoder = Decoder::new(&bytes);
        assert!(matches!(
            decoder.next::<u8>(),
            Err(CborError::SerdeCbor(_))
        ));
        // Nothing was consumed by the failed attempt
        assert_eq!(0, decoder.position());
    }
}
