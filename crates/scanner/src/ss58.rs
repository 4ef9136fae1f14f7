//! SS58 address decoding, validation and encoding.
//!
//! SS58 is the checksummed base58 address format used by Substrate based
//! chains. The encoded byte layout is a self-describing network format tag
//! (one or two bytes), the account body, and a checksum suffix whose length
//! depends on the total payload length.

use sp_core::hashing::blake2_512;
use thiserror::Error;

const CHECKSUM_PREFIX: &[u8] = b"SS58PRE";

/// Format values 46 and 47 are reserved by the registry and never decode.
const RESERVED_FORMATS: [u16; 2] = [46, 47];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("empty address")]
    Empty,

    #[error("not base58: {0}")]
    Base58(String),

    #[error("{0} is a reserved SS58 format")]
    ReservedFormat(u16),

    #[error("SS58 format {actual} does not match expected format {expected}")]
    FormatMismatch { expected: u16, actual: u16 },

    #[error("SS58 format {0} is out of range")]
    FormatOutOfRange(u16),

    #[error("invalid address length: {0} bytes")]
    InvalidLength(usize),

    #[error("invalid checksum")]
    InvalidChecksum,
}

/// A decoded SS58 address: the raw account identifier plus the network
/// format tag it was encoded for. The checksum is validated during
/// decoding and not retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ss58Address {
    format: u16,
    account_id: Vec<u8>,
}

impl Ss58Address {
    pub fn format(&self) -> u16 {
        self.format
    }

    pub fn account_id(&self) -> &[u8] {
        &self.account_id
    }

    /// Hex rendering of the account identifier, "0x"-prefixed.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.account_id))
    }
}

/// Decode an SS58 address to its raw account identifier.
pub fn decode(address: &str) -> Result<Ss58Address, AddressError> {
    decode_with_format(address, None)
}

/// Decode an SS58 address, additionally requiring the embedded network
/// format tag to equal `expected_format` when one is given.
pub fn decode_with_format(
    address: &str,
    expected_format: Option<u16>,
) -> Result<Ss58Address, AddressError> {
    if address.is_empty() {
        return Err(AddressError::Empty);
    }

    let bytes = bs58::decode(address)
        .into_vec()
        .map_err(|e| AddressError::Base58(e.to_string()))?;
    if bytes.is_empty() {
        return Err(AddressError::InvalidLength(0));
    }

    let (format, tag_len) = if bytes[0] & 0b0100_0000 != 0 {
        if bytes.len() < 2 {
            return Err(AddressError::InvalidLength(bytes.len()));
        }
        // Two-byte tag: low 6 bits of byte 0 are the middle of the ident,
        // byte 1 carries the low 2 and high 6 bits.
        let format = ((u16::from(bytes[0]) & 0b0011_1111) << 2)
            | (u16::from(bytes[1]) >> 6)
            | ((u16::from(bytes[1]) & 0b0011_1111) << 8);
        (format, 2usize)
    } else {
        (u16::from(bytes[0]), 1usize)
    };

    if RESERVED_FORMATS.contains(&format) {
        return Err(AddressError::ReservedFormat(format));
    }

    if let Some(expected) = expected_format {
        if format != expected {
            return Err(AddressError::FormatMismatch {
                expected,
                actual: format,
            });
        }
    }

    let checksum_len =
        checksum_length(bytes.len(), tag_len).ok_or(AddressError::InvalidLength(bytes.len()))?;

    let body = &bytes[..bytes.len() - checksum_len];
    let checksum = &bytes[bytes.len() - checksum_len..];
    if &expected_checksum(body)[..checksum_len] != checksum {
        return Err(AddressError::InvalidChecksum);
    }

    Ok(Ss58Address {
        format,
        account_id: body[tag_len..].to_vec(),
    })
}

/// Encode a 32-byte account identifier for the given network format.
pub fn encode(account_id: &[u8; 32], format: u16) -> Result<String, AddressError> {
    if RESERVED_FORMATS.contains(&format) {
        return Err(AddressError::ReservedFormat(format));
    }
    if format > 0b0011_1111_1111_1111 {
        return Err(AddressError::FormatOutOfRange(format));
    }

    let mut bytes = Vec::with_capacity(36);
    if format < 64 {
        bytes.push(format as u8);
    } else {
        bytes.push(0b0100_0000 | ((format & 0b0000_0000_1111_1100) >> 2) as u8);
        bytes.push(((format >> 8) as u8) | (((format & 0b0000_0000_0000_0011) as u8) << 6));
    }
    bytes.extend_from_slice(account_id);

    let checksum = expected_checksum(&bytes);
    bytes.extend_from_slice(&checksum[..2]);

    Ok(bs58::encode(bytes).into_string())
}

/// Whether `address` decodes as a valid SS58 address, optionally for a
/// specific network format. Hex strings are raw account identifiers, not
/// encoded addresses, and are never valid here.
pub fn is_valid(address: &str, expected_format: Option<u16>) -> bool {
    if address.starts_with("0x") {
        return false;
    }
    decode_with_format(address, expected_format).is_ok()
}

/// Checksum suffix length for a decoded payload of `total` bytes.
///
/// The 34/35 rows float with the tag length so that a 32-byte account body
/// always carries a two-byte checksum.
fn checksum_length(total: usize, tag_len: usize) -> Option<usize> {
    match total {
        3 | 4 | 6 | 10 => Some(1),
        5 | 7 | 11 => Some(2),
        8 | 12 => Some(3),
        9 | 13 => Some(4),
        14 => Some(5),
        15 => Some(6),
        16 => Some(7),
        17 => Some(8),
        n if n == 34 + tag_len || n == 35 + tag_len => Some(2),
        _ => None,
    }
}

/// Blake2b-512 over the `SS58PRE`-prefixed payload; the checksum is a
/// prefix of this digest.
fn expected_checksum(body: &[u8]) -> [u8; 64] {
    let mut input = Vec::with_capacity(CHECKSUM_PREFIX.len() + body.len());
    input.extend_from_slice(CHECKSUM_PREFIX);
    input.extend_from_slice(body);
    blake2_512(&input)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: &str = "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY";
    const ALICE_ACCOUNT_ID: &str =
        "d43593c715fdd31c61141abd04a99fd6822c8558854ccde39a5684e7a56da27d";

    fn alice_bytes() -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(&hex::decode(ALICE_ACCOUNT_ID).unwrap());
        out
    }

    #[test]
    fn test_decode_known_address() {
        let decoded = decode(ALICE).unwrap();
        assert_eq!(decoded.format(), 42);
        assert_eq!(hex::encode(decoded.account_id()), ALICE_ACCOUNT_ID);
        assert_eq!(decoded.to_hex(), format!("0x{}", ALICE_ACCOUNT_ID));
    }

    #[test]
    fn test_encode_known_address() {
        assert_eq!(encode(&alice_bytes(), 42).unwrap(), ALICE);
    }

    #[test]
    fn test_round_trip() {
        let account_id = [7u8; 32];
        for format in [0u16, 2, 42, 69] {
            let encoded = encode(&account_id, format).unwrap();
            let decoded = decode(&encoded).unwrap();
            assert_eq!(decoded.format(), format);
            assert_eq!(decoded.account_id(), account_id);
        }
    }

    #[test]
    fn test_round_trip_two_byte_format() {
        let account_id = [11u8; 32];
        for format in [64u16, 255, 1284, 16383] {
            let encoded = encode(&account_id, format).unwrap();
            let decoded = decode(&encoded).unwrap();
            assert_eq!(decoded.format(), format, "format {} should survive", format);
            assert_eq!(decoded.account_id(), account_id);
        }
    }

    #[test]
    fn test_empty_address_rejected() {
        assert_eq!(decode(""), Err(AddressError::Empty));
    }

    #[test]
    fn test_non_base58_rejected() {
        assert!(matches!(decode("0OIl"), Err(AddressError::Base58(_))));
    }

    #[test]
    fn test_reserved_formats_rejected() {
        for format in [46u8, 47] {
            // Assembled by hand since encode() refuses reserved formats.
            let mut bytes = vec![format];
            bytes.extend_from_slice(&[5u8; 32]);
            let checksum = expected_checksum(&bytes);
            bytes.extend_from_slice(&checksum[..2]);
            let address = bs58::encode(bytes).into_string();

            assert_eq!(
                decode(&address),
                Err(AddressError::ReservedFormat(u16::from(format)))
            );
        }
    }

    #[test]
    fn test_encode_rejects_reserved_and_oversized_formats() {
        assert_eq!(
            encode(&alice_bytes(), 46),
            Err(AddressError::ReservedFormat(46))
        );
        assert_eq!(
            encode(&alice_bytes(), 16384),
            Err(AddressError::FormatOutOfRange(16384))
        );
    }

    #[test]
    fn test_tampered_checksum_rejected() {
        let mut tampered: String = ALICE.to_string();
        tampered.pop();
        tampered.push(if ALICE.ends_with('Z') { 'Y' } else { 'Z' });
        assert!(matches!(
            decode(&tampered),
            Err(AddressError::InvalidChecksum) | Err(AddressError::InvalidLength(_))
        ));
    }

    #[test]
    fn test_unrecognized_length_rejected() {
        // 20-byte body has no checksum-length entry
        let mut bytes = vec![42u8];
        bytes.extend_from_slice(&[1u8; 17]);
        let checksum = expected_checksum(&bytes);
        bytes.extend_from_slice(&checksum[..2]);
        let address = bs58::encode(bytes).into_string();
        assert_eq!(decode(&address), Err(AddressError::InvalidLength(20)));
    }

    #[test]
    fn test_is_valid() {
        assert!(is_valid(ALICE, None));
        assert!(is_valid(ALICE, Some(42)));
        assert!(!is_valid(ALICE, Some(69)));
        assert!(!is_valid("", None));
        assert!(!is_valid("definitely not an address", None));
    }

    #[test]
    fn test_hex_string_is_never_valid() {
        assert!(!is_valid(&format!("0x{}", ALICE_ACCOUNT_ID), None));
    }

    #[test]
    fn test_format_mismatch_error() {
        assert_eq!(
            decode_with_format(ALICE, Some(69)),
            Err(AddressError::FormatMismatch {
                expected: 69,
                actual: 42
            })
        );
    }
}
