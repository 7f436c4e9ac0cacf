//! Encoding and decoding of the EDHOC messages and the plaintexts carried in
//! their ciphertexts.
//!
//! Every message is a CBOR sequence. Which connection identifiers appear in
//! it depends on the [`Correlation`], so the decoders need to be told which
//! one is in effect (except for `message_1`, which announces it).
//! Decoders are strict: a message has to consist of exactly the expected
//! items, anything left over is an error.

use alloc::{string::String, vec::Vec};
use core::convert::TryFrom;
use log::trace;
use serde_bytes::Bytes;

use super::{
    error::Error,
    types::{
        CipherSuite, Correlation, Method, MAX_AD_LEN, MAX_CID_LEN, MAX_SUITES,
    },
    Result,
};
use crate::cbor::{
    Decoder, Encoder, MAJOR_ARRAY, MAJOR_BSTR, MAJOR_NINT, MAJOR_TSTR,
    MAJOR_UINT,
};

/// Largest one-byte identifier that is sent as an integer instead of a byte
/// string.
const MAX_INT_IDENTIFIER: u8 = 0x2F;

/// A decoded `message_1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message1 {
    pub method: Method,
    pub correlation: Correlation,
    /// The suite the Initiator chose for this handshake.
    pub selected_suite: u8,
    /// Every suite the Initiator supports, in order of preference. Empty if
    /// only the selected one was sent.
    pub supported_suites: Vec<u8>,
    pub g_x: Vec<u8>,
    pub c_i: Option<Vec<u8>>,
    pub ad_1: Option<Vec<u8>>,
}

/// The decoded identification part of `message_2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Data2 {
    pub c_i: Option<Vec<u8>>,
    pub g_y: Vec<u8>,
    pub c_r: Vec<u8>,
}

/// A `message_2` split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message2<'a> {
    pub data_2: Data2,
    /// The encoded `data_2`, as it enters the transcript.
    pub data_2_bytes: &'a [u8],
    pub ciphertext_2: &'a [u8],
}

/// A `message_3` split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message3<'a> {
    pub c_r: Option<Vec<u8>>,
    /// The encoded `data_3`, as it enters the transcript.
    pub data_3_bytes: &'a [u8],
    pub ciphertext_3: &'a [u8],
}

/// The content of `P_2e` or `P_3ae`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plaintext {
    /// The `kid` of the sender's credential.
    pub kid: Vec<u8>,
    pub signature: Vec<u8>,
    pub ad: Option<Vec<u8>>,
}

/// A decoded EDHOC error message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorMessage {
    pub c_x: Option<Vec<u8>>,
    pub diagnostic: String,
    /// The suites the Responder supports, empty if none were sent.
    pub suites_r: Vec<u8>,
}

/// Writes a `bstr_identifier`.
///
/// One-byte identifiers up to 0x2f are sent as integers from -24 to 23, all
/// others as byte strings.
pub fn encode_bstr_identifier(encoder: &mut Encoder, id: &[u8]) -> Result<()> {
    match id {
        [b] if *b <= MAX_INT_IDENTIFIER => {
            encoder.push(i64::from(*b) - 24)
        }
        _ => encoder.push(Bytes::new(id)),
    }
    .map_err(Error::encoding)
}

/// Reads a `bstr_identifier`, rejecting identifiers that aren't in their
/// shortest form.
pub fn decode_bstr_identifier(decoder: &mut Decoder) -> Result<Vec<u8>> {
    match decoder.peek_major()? {
        MAJOR_UINT | MAJOR_NINT => {
            let value: i64 = decoder.next()?;
            match u8::try_from(value.saturating_add(24)) {
                Ok(b) if b <= MAX_INT_IDENTIFIER => Ok(vec![b]),
                _ => Err(Error::Decoding("identifier out of range")),
            }
        }
        MAJOR_BSTR => {
            let id = decoder.next_bytes()?;
            match id {
                [b] if *b <= MAX_INT_IDENTIFIER => {
                    Err(Error::Decoding("identifier not in shortest form"))
                }
                _ => Ok(id.to_vec()),
            }
        }
        _ => Err(Error::Decoding("expected bstr_identifier")),
    }
}

fn encode_cid(encoder: &mut Encoder, cid: &[u8]) -> Result<()> {
    if cid.len() > MAX_CID_LEN {
        return Err(Error::Encoding("connection identifier too long"));
    }
    encode_bstr_identifier(encoder, cid)
}

fn decode_cid(decoder: &mut Decoder) -> Result<Vec<u8>> {
    let cid = decode_bstr_identifier(decoder)?;
    if cid.len() > MAX_CID_LEN {
        return Err(Error::Decoding("connection identifier too long"));
    }

    Ok(cid)
}

fn encode_ad(encoder: &mut Encoder, ad: Option<&[u8]>) -> Result<()> {
    match ad {
        Some(ad) if ad.len() > MAX_AD_LEN => {
            Err(Error::Encoding("additional data too long"))
        }
        Some(ad) => encoder.push(Bytes::new(ad)).map_err(Error::encoding),
        None => Ok(()),
    }
}

/// Reads the optional trailing additional data and makes sure nothing
/// follows it.
fn decode_trailing_ad(decoder: &mut Decoder) -> Result<Option<Vec<u8>>> {
    if decoder.is_empty() {
        return Ok(None);
    }
    let ad = decoder.next_bytes()?;
    if ad.len() > MAX_AD_LEN {
        return Err(Error::Decoding("additional data too long"));
    }
    decoder.finish()?;

    Ok(Some(ad.to_vec()))
}

/// Writes either a single suite or an array of them.
fn encode_suites(encoder: &mut Encoder, suites: &[u8]) -> Result<()> {
    match suites {
        [suite] => encoder.push(suite),
        _ => encoder.push(suites),
    }
    .map_err(Error::encoding)
}

/// Reads a single suite or an array of them, returning the values and
/// whether the array form was used.
fn decode_suites(
    decoder: &mut Decoder,
    max_len: usize,
) -> Result<(Vec<u8>, bool)> {
    let (major, arg) = decoder.peek_header()?;
    let (values, is_array) = match major {
        MAJOR_UINT => (vec![decoder.next::<u64>()?], false),
        MAJOR_ARRAY => {
            if arg > max_len as u64 {
                return Err(Error::Decoding("too many cipher suites"));
            }
            (decoder.next::<Vec<u64>>()?, true)
        }
        _ => return Err(Error::Decoding("expected cipher suite")),
    };
    let suites = values
        .into_iter()
        .map(|v| u8::try_from(v).map_err(|_| Error::UnsupportedCipherSuite))
        .collect::<Result<Vec<u8>>>()?;

    Ok((suites, is_array))
}

/// Writes `message_1`.
///
/// `suites` lists the supported suites in order of preference, the first one
/// is the selected one. If there is only one, it's sent on its own, otherwise
/// as `[selected, supported...]`. `C_I` is left out when the correlation is
/// `BothImplicit`.
pub fn encode_message_1(
    method: Method,
    correlation: Correlation,
    suites: &[CipherSuite],
    g_x: &[u8],
    c_i: &[u8],
    ad_1: Option<&[u8]>,
    out: &mut [u8],
) -> Result<usize> {
    let selected = suites
        .first()
        .ok_or(Error::Encoding("no cipher suite offered"))?;
    if suites.len() > MAX_SUITES {
        return Err(Error::Encoding("too many cipher suites"));
    }
    let mut values = vec![selected.value()];
    if suites.len() > 1 {
        values.extend(suites.iter().map(|s| s.value()));
    }

    let mut encoder = Encoder::new(out);
    encoder
        .push(4 * method.value() + correlation.value())
        .map_err(Error::encoding)?;
    encode_suites(&mut encoder, &values)?;
    encoder.push(Bytes::new(g_x)).map_err(Error::encoding)?;
    if correlation.c_i_in_message_1() {
        encode_cid(&mut encoder, c_i)?;
    }
    encode_ad(&mut encoder, ad_1)?;
    trace!("Encoded message_1 of {} bytes", encoder.position());

    Ok(encoder.position())
}

/// Parses `message_1`.
///
/// Only the grammar is checked here. Whether the selected suite is acceptable
/// is up to the caller, apart from values that aren't suites at all.
pub fn decode_message_1(bytes: &[u8]) -> Result<Message1> {
    let mut decoder = Decoder::new(bytes);

    let method_corr: u64 = decoder.next()?;
    let method = u8::try_from(method_corr / 4)
        .ok()
        .and_then(Method::from_value)
        .ok_or(Error::UnsupportedMethod)?;
    let correlation = Correlation::from_value((method_corr % 4) as u8)
        .ok_or(Error::Decoding("invalid correlation"))?;

    let (mut suites, is_array) = decode_suites(&mut decoder, MAX_SUITES + 1)?;
    let (selected_suite, supported_suites) = if is_array {
        if suites.len() < 2 {
            return Err(Error::Decoding("cipher suite array too short"));
        }
        let supported = suites.split_off(1);
        (suites[0], supported)
    } else {
        (suites[0], Vec::new())
    };

    let g_x = decoder.next_bytes()?.to_vec();
    let c_i = if correlation.c_i_in_message_1() {
        Some(decode_cid(&mut decoder)?)
    } else {
        None
    };
    let ad_1 = decode_trailing_ad(&mut decoder)?;
    trace!("Decoded message_1 with correlation {:?}", correlation);

    Ok(Message1 {
        method,
        correlation,
        selected_suite,
        supported_suites,
        g_x,
        c_i,
        ad_1,
    })
}

/// Writes `data_2`, echoing `C_I` if the correlation asks for it.
pub fn encode_data_2(
    correlation: Correlation,
    c_i: &[u8],
    g_y: &[u8],
    c_r: &[u8],
    out: &mut [u8],
) -> Result<usize> {
    let mut encoder = Encoder::new(out);
    if correlation.c_i_in_data_2() {
        encode_cid(&mut encoder, c_i)?;
    }
    encoder.push(Bytes::new(g_y)).map_err(Error::encoding)?;
    encode_cid(&mut encoder, c_r)?;

    Ok(encoder.position())
}

fn read_data_2(
    correlation: Correlation,
    decoder: &mut Decoder,
) -> Result<Data2> {
    let c_i = if correlation.c_i_in_data_2() {
        Some(decode_cid(decoder)?)
    } else {
        None
    };
    let g_y = decoder.next_bytes()?.to_vec();
    let c_r = decode_cid(decoder)?;

    Ok(Data2 { c_i, g_y, c_r })
}

/// Parses a standalone `data_2`.
pub fn decode_data_2(correlation: Correlation, bytes: &[u8]) -> Result<Data2> {
    let mut decoder = Decoder::new(bytes);
    let data_2 = read_data_2(correlation, &mut decoder)?;
    decoder.finish()?;

    Ok(data_2)
}

/// Appends the ciphertext as a byte string to the already encoded `data`.
fn encode_with_ciphertext(
    data: &[u8],
    ciphertext: &[u8],
    out: &mut [u8],
) -> Result<usize> {
    let mut encoder = Encoder::new(out);
    encoder.push_raw(data).map_err(Error::encoding)?;
    encoder
        .push(Bytes::new(ciphertext))
        .map_err(Error::encoding)?;

    Ok(encoder.position())
}

/// Writes `message_2` from the encoded `data_2` and `CIPHERTEXT_2`.
pub fn encode_message_2(
    data_2: &[u8],
    ciphertext_2: &[u8],
    out: &mut [u8],
) -> Result<usize> {
    encode_with_ciphertext(data_2, ciphertext_2, out)
}

/// Parses `message_2`, finding the end of `data_2` by walking its items.
pub fn decode_message_2(
    correlation: Correlation,
    bytes: &[u8],
) -> Result<Message2> {
    let mut decoder = Decoder::new(bytes);
    let data_2 = read_data_2(correlation, &mut decoder)?;
    let boundary = decoder.position();
    let ciphertext_2 = decoder.next_bytes()?;
    decoder.finish()?;
    trace!(
        "Decoded message_2 with {} bytes of data_2 and {} of ciphertext",
        boundary,
        ciphertext_2.len()
    );

    Ok(Message2 {
        data_2,
        data_2_bytes: &bytes[..boundary],
        ciphertext_2,
    })
}

/// Writes `data_3`, which is empty unless the correlation requires `C_R`.
pub fn encode_data_3(
    correlation: Correlation,
    c_r: &[u8],
    out: &mut [u8],
) -> Result<usize> {
    let mut encoder = Encoder::new(out);
    if correlation.c_r_in_data_3() {
        encode_cid(&mut encoder, c_r)?;
    }

    Ok(encoder.position())
}

fn read_data_3(
    correlation: Correlation,
    decoder: &mut Decoder,
) -> Result<Option<Vec<u8>>> {
    if correlation.c_r_in_data_3() {
        Ok(Some(decode_cid(decoder)?))
    } else {
        Ok(None)
    }
}

/// Parses a standalone `data_3`.
pub fn decode_data_3(
    correlation: Correlation,
    bytes: &[u8],
) -> Result<Option<Vec<u8>>> {
    let mut decoder = Decoder::new(bytes);
    let c_r = read_data_3(correlation, &mut decoder)?;
    decoder.finish()?;

    Ok(c_r)
}

/// Writes `message_3` from the encoded `data_3` and `CIPHERTEXT_3`.
pub fn encode_message_3(
    data_3: &[u8],
    ciphertext_3: &[u8],
    out: &mut [u8],
) -> Result<usize> {
    encode_with_ciphertext(data_3, ciphertext_3, out)
}

/// Parses `message_3`.
pub fn decode_message_3(
    correlation: Correlation,
    bytes: &[u8],
) -> Result<Message3> {
    let mut decoder = Decoder::new(bytes);
    let c_r = read_data_3(correlation, &mut decoder)?;
    let boundary = decoder.position();
    let ciphertext_3 = decoder.next_bytes()?;
    decoder.finish()?;

    Ok(Message3 {
        c_r,
        data_3_bytes: &bytes[..boundary],
        ciphertext_3,
    })
}

/// Writes the plaintext `P_2e` or `P_3ae`: the sender's `kid`, its signature
/// and optional additional data.
pub fn encode_plaintext(
    kid: &[u8],
    signature: &[u8],
    ad: Option<&[u8]>,
    out: &mut [u8],
) -> Result<usize> {
    let mut encoder = Encoder::new(out);
    encode_bstr_identifier(&mut encoder, kid)?;
    encoder.push(Bytes::new(signature)).map_err(Error::encoding)?;
    encode_ad(&mut encoder, ad)?;

    Ok(encoder.position())
}

/// Parses the plaintext `P_2e` or `P_3ae`.
pub fn decode_plaintext(bytes: &[u8]) -> Result<Plaintext> {
    let mut decoder = Decoder::new(bytes);
    let kid = decode_bstr_identifier(&mut decoder)?;
    let signature = decoder.next_bytes()?.to_vec();
    let ad = decode_trailing_ad(&mut decoder)?;

    Ok(Plaintext { kid, signature, ad })
}

/// Writes an EDHOC error message.
///
/// `SUITES_R` is only sent if `suites_r` isn't empty, as a single value if it
/// holds one suite.
pub fn encode_error_message(
    c_x: Option<&[u8]>,
    diagnostic: &str,
    suites_r: &[CipherSuite],
    out: &mut [u8],
) -> Result<usize> {
    if suites_r.len() > MAX_SUITES {
        return Err(Error::Encoding("too many cipher suites"));
    }
    let mut encoder = Encoder::new(out);
    if let Some(c_x) = c_x {
        encode_cid(&mut encoder, c_x)?;
    }
    encoder.push(diagnostic).map_err(Error::encoding)?;
    if !suites_r.is_empty() {
        let values: Vec<u8> = suites_r.iter().map(|s| s.value()).collect();
        encode_suites(&mut encoder, &values)?;
    }

    Ok(encoder.position())
}

/// Parses an EDHOC error message.
///
/// The connection identifier is recognized by not being a text string.
pub fn decode_error_message(bytes: &[u8]) -> Result<ErrorMessage> {
    let mut decoder = Decoder::new(bytes);
    let c_x = if decoder.peek_major()? == MAJOR_TSTR {
        None
    } else {
        Some(decode_cid(&mut decoder)?)
    };
    if decoder.peek_major()? != MAJOR_TSTR {
        return Err(Error::Decoding("expected diagnostic message"));
    }
    let diagnostic: String = decoder.next()?;
    let suites_r = if decoder.is_empty() {
        Vec::new()
    } else {
        decode_suites(&mut decoder, MAX_SUITES)?.0
    };
    decoder.finish()?;

    Ok(ErrorMessage {
        c_x,
        diagnostic,
        suites_r,
    })
}
