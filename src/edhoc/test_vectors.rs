// Keys and identifiers shared by the unit tests. The long-term and ephemeral
// keys are the ones from the EDHOC test vectors, the hashes are arbitrary.

use super::cose::{CoseKey, Curve};

pub const AUTH_I_PRIVATE: [u8; 32] = [
    0x53, 0x21, 0xFC, 0x01, 0xC2, 0x98, 0x20, 0x06, 0x3A, 0x72, 0x50, 0x8F,
    0xC6, 0x39, 0x25, 0x1D, 0xC8, 0x30, 0xE2, 0xF7, 0x68, 0x3E, 0xB8, 0xE3,
    0x8A, 0xF1, 0x64, 0xA5, 0xB9, 0xAF, 0x9B, 0xE3,
];
pub const AUTH_I_PUBLIC: [u8; 32] = [
    0x42, 0x4C, 0x75, 0x6A, 0xB7, 0x7C, 0xC6, 0xFD, 0xEC, 0xF0, 0xB3, 0xEC,
    0xFC, 0xFF, 0xB7, 0x53, 0x10, 0xC0, 0x15, 0xBF, 0x5C, 0xBA, 0x2E, 0xC0,
    0xA2, 0x36, 0xE6, 0x65, 0x0C, 0x8A, 0xB9, 0xC7,
];
pub const KID_I: [u8; 1] = [0xA2];
pub const ID_CRED_I: [u8; 4] = [0xA1, 0x04, 0x41, 0xA2];

pub const AUTH_R_PRIVATE: [u8; 32] = [
    0x74, 0x56, 0xB3, 0xA3, 0xE5, 0x8D, 0x8D, 0x26, 0xDD, 0x36, 0xBC, 0x75,
    0xD5, 0x5B, 0x88, 0x63, 0xA8, 0x5D, 0x34, 0x72, 0xF4, 0xA0, 0x1F, 0x02,
    0x24, 0x62, 0x1B, 0x1C, 0xB8, 0x16, 0x6D, 0xA9,
];
pub const AUTH_R_PUBLIC: [u8; 32] = [
    0x1B, 0x66, 0x1E, 0xE5, 0xD5, 0xEF, 0x16, 0x72, 0xA2, 0xD8, 0x77, 0xCD,
    0x5B, 0xC2, 0x0F, 0x46, 0x30, 0xDC, 0x78, 0xA1, 0x14, 0xDE, 0x65, 0x9C,
    0x7E, 0x50, 0x4D, 0x0F, 0x52, 0x9A, 0x6B, 0xD3,
];
pub const KID_R: [u8; 1] = [0xA3];
pub const ID_CRED_R: [u8; 4] = [0xA1, 0x04, 0x41, 0xA3];
pub const CRED_R: [u8; 40] = [
    0xA3, 0x01, 0x01, 0x20, 0x06, 0x21, 0x58, 0x20, 0x1B, 0x66, 0x1E, 0xE5,
    0xD5, 0xEF, 0x16, 0x72, 0xA2, 0xD8, 0x77, 0xCD, 0x5B, 0xC2, 0x0F, 0x46,
    0x30, 0xDC, 0x78, 0xA1, 0x14, 0xDE, 0x65, 0x9C, 0x7E, 0x50, 0x4D, 0x0F,
    0x52, 0x9A, 0x6B, 0xD3,
];

pub const EPH_I_PRIVATE: [u8; 32] = [
    0xD4, 0xD8, 0x1A, 0xBA, 0xFA, 0xD9, 0x08, 0xA0, 0xCC, 0xEF, 0xEF, 0x5A,
    0xD6, 0xB0, 0x5D, 0x50, 0x27, 0x02, 0xF1, 0xC1, 0x6F, 0x23, 0x2C, 0x25,
    0x92, 0x93, 0x09, 0xAC, 0x44, 0x1B, 0x95, 0x8E,
];
pub const G_X: [u8; 32] = [
    0xB1, 0xA3, 0xE8, 0x94, 0x60, 0xE8, 0x8D, 0x3A, 0x8D, 0x54, 0x21, 0x1D,
    0xC9, 0x5F, 0x0B, 0x90, 0x3F, 0xF2, 0x05, 0xEB, 0x71, 0x91, 0x2D, 0x6D,
    0xB8, 0xF4, 0xAF, 0x98, 0x0D, 0x2D, 0xB8, 0x3A,
];
pub const C_I: [u8; 1] = [0xC3];

pub const EPH_R_PRIVATE: [u8; 32] = [
    0x17, 0xCD, 0xC7, 0xBC, 0xA3, 0xF2, 0xA0, 0xBD, 0xA6, 0x0C, 0x6D, 0xE5,
    0xB9, 0x6F, 0x82, 0xA3, 0x62, 0x39, 0xB4, 0x4B, 0xDE, 0x39, 0x7A, 0x38,
    0x62, 0xD5, 0x29, 0xBA, 0x8B, 0x3D, 0x7C, 0x62,
];
pub const G_Y: [u8; 32] = [
    0x8D, 0xB5, 0x77, 0xF9, 0xB9, 0xC2, 0x74, 0x47, 0x98, 0x98, 0x7D, 0xB5,
    0x57, 0xBF, 0x31, 0xCA, 0x48, 0xAC, 0xD2, 0x05, 0xA9, 0xDB, 0x8C, 0x32,
    0x0E, 0x5D, 0x49, 0xF3, 0x02, 0xA9, 0x64, 0x74,
];
pub const C_R: [u8; 1] = [0xC4];

/// `message_1` for method 0, correlation 1 and suite 0.
pub const MESSAGE_1: [u8; 38] = [
    0x01, 0x00, 0x58, 0x20, 0xB1, 0xA3, 0xE8, 0x94, 0x60, 0xE8, 0x8D, 0x3A,
    0x8D, 0x54, 0x21, 0x1D, 0xC9, 0x5F, 0x0B, 0x90, 0x3F, 0xF2, 0x05, 0xEB,
    0x71, 0x91, 0x2D, 0x6D, 0xB8, 0xF4, 0xAF, 0x98, 0x0D, 0x2D, 0xB8, 0x3A,
    0x41, 0xC3,
];

/// `data_2` without the `C_I` echo.
pub const DATA_2: [u8; 36] = [
    0x58, 0x20, 0x8D, 0xB5, 0x77, 0xF9, 0xB9, 0xC2, 0x74, 0x47, 0x98, 0x98,
    0x7D, 0xB5, 0x57, 0xBF, 0x31, 0xCA, 0x48, 0xAC, 0xD2, 0x05, 0xA9, 0xDB,
    0x8C, 0x32, 0x0E, 0x5D, 0x49, 0xF3, 0x02, 0xA9, 0x64, 0x74, 0x41, 0xC4,
];

pub const TH_2: [u8; 32] = [
    0x55, 0x50, 0xB3, 0xDC, 0x59, 0x84, 0xB0, 0x20, 0x9A, 0xE7, 0x4E, 0xA2,
    0x6A, 0x18, 0x91, 0x89, 0x57, 0x50, 0x8E, 0x30, 0x33, 0x2B, 0x11, 0xDA,
    0x68, 0x1D, 0xC2, 0xAF, 0xDD, 0x87, 0x03, 0x55,
];
pub const TH_3: [u8; 32] = [
    0x21, 0xED, 0x27, 0x6D, 0xA6, 0x07, 0xE7, 0x9E, 0xA2, 0x79, 0x51, 0x6B,
    0x4D, 0x4E, 0x86, 0xD0, 0x9E, 0x1A, 0x73, 0x9B, 0x75, 0x1E, 0x45, 0xBD,
    0x8D, 0x26, 0x57, 0x28, 0x7A, 0xF1, 0xA6, 0x36,
];

pub fn x25519_public(private: &[u8; 32]) -> [u8; 32] {
    let secret = x25519_dalek::StaticSecret::from(*private);
    x25519_dalek::PublicKey::from(&secret).to_bytes()
}

pub fn p256_public_xy(private: &[u8; 32]) -> ([u8; 32], [u8; 32]) {
    use p256::elliptic_curve::sec1::ToEncodedPoint;

    let point = p256::SecretKey::from_slice(private)
        .unwrap()
        .public_key()
        .to_encoded_point(false);
    let (mut x, mut y) = ([0; 32], [0; 32]);
    x.copy_from_slice(point.x().unwrap());
    y.copy_from_slice(point.y().unwrap());
    (x, y)
}

pub fn ed25519_key(private: &[u8; 32]) -> CoseKey {
    let public = ed25519_dalek::SigningKey::from_bytes(private)
        .verifying_key()
        .to_bytes();
    CoseKey::public(Curve::Ed25519, &public, None).with_private(private)
}

pub fn p256_key(private: &[u8; 32]) -> CoseKey {
    let (x, y) = p256_public_xy(private);
    CoseKey::public(Curve::P256, &x, Some(&y)).with_private(private)
}
