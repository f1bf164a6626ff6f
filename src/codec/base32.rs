//! RFC 4648 base32 without mandatory padding.
//!
//! The alphabet is a subset of the QR alphanumeric character set, which lets a
//! base32 fragment use the dense alphanumeric QR mode.

use crate::codec::{
    CodecErr,
    bits::{Padding, convert_bits},
};

pub const ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

/// Number of base32 characters that carry a whole number of bytes (5).
pub const BLOCK_CHARS: usize = 8;

const INVALID: u8 = u8::MAX;

static DECODE_TABLE: [u8; 256] = {
    let mut table = [INVALID; 256];
    let mut i = 0;
    while i < ALPHABET.len() {
        let c = ALPHABET[i];
        table[c as usize] = i as u8;
        table[c.to_ascii_lowercase() as usize] = i as u8;
        i += 1;
    }
    table
};

/// Encode `data` as base32, optionally padding with `=` to a multiple of
/// [`BLOCK_CHARS`].
pub fn encode(data: &[u8], pad: bool) -> String {
    let mut out = String::with_capacity(data.len().div_ceil(5) * BLOCK_CHARS);
    let push = |v: u8| out.push(ALPHABET[v as usize] as char);
    let repacked = convert_bits(data.iter().copied(), 8, 5, Padding::Pad, Ok, push);
    debug_assert!(repacked.is_ok(), "8 to 5 bit padding is infallible");
    if pad {
        while out.len() % BLOCK_CHARS != 0 {
            out.push('=');
        }
    }
    out
}

/// Decode base32 text in either case after stripping trailing `=`.
///
/// The stripped text does not need to be a multiple of [`BLOCK_CHARS`] long;
/// irregular lengths are accepted as long as no bits are lost.
pub fn decode(text: &str) -> Result<Vec<u8>, CodecErr> {
    let text = text.trim_end_matches('=');
    let mut out = Vec::with_capacity(text.len() * 5 / 8);
    convert_bits(text.chars(), 5, 8, Padding::Strict, lookup, |v| out.push(v))?;
    Ok(out)
}

fn lookup(c: char) -> Result<u8, CodecErr> {
    if !c.is_ascii() {
        return Err(CodecErr::Base32Char(c));
    }
    match DECODE_TABLE[c as usize] {
        INVALID => Err(CodecErr::Base32Char(c)),
        v => Ok(v),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use proptest::{collection::vec, proptest};

    use super::*;

    #[test]
    fn test_rfc4648_vectors() {
        let vectors: &[(&[u8], &str)] = &[
            (b"", ""),
            (b"f", "MY======"),
            (b"fo", "MZXQ===="),
            (b"foo", "MZXW6==="),
            (b"foob", "MZXW6YQ="),
            (b"fooba", "MZXW6YTB"),
            (b"foobar", "MZXW6YTBOI======"),
        ];
        for &(raw, padded) in vectors {
            assert_eq!(encode(raw, true), padded);
            assert_eq!(encode(raw, false), padded.trim_end_matches('='));
            assert_eq!(decode(padded).unwrap(), raw);
            assert_eq!(decode(padded.trim_end_matches('=')).unwrap(), raw);
        }
    }

    #[test]
    fn test_decode_lowercase() {
        assert_eq!(decode("jz2w4y3iovvq").unwrap(), b"Nunchuk");
    }

    #[test]
    fn test_decode_lenient_padding() {
        // any run of trailing padding is stripped
        assert_eq!(decode("MY=").unwrap(), b"f");
        assert_eq!(decode("MY==========").unwrap(), b"f");
    }

    #[test]
    fn test_decode_rejects() {
        assert_matches!(decode("MZ1W"), Err(CodecErr::Base32Char('1')));
        assert_matches!(decode("MY=A"), Err(CodecErr::Base32Char('=')));
        assert_matches!(decode("MZXW6YQ\u{e9}"), Err(CodecErr::Base32Char('\u{e9}')));
        // a single symbol can not hold a byte
        assert_matches!(decode("M"), Err(CodecErr::TrailingBits));
        // non-zero bits past the last byte
        assert_matches!(decode("MZ"), Err(CodecErr::TrailingBits));
    }

    proptest! {
        #[test]
        fn test_base32_proptest(bytes in vec(0u8..=255, 0..512)) {
            let text = encode(&bytes, false);
            assert!(text.bytes().all(|c| ALPHABET.contains(&c)));
            assert_eq!(decode(&text).unwrap(), bytes.clone());
            assert_eq!(decode(&encode(&bytes, true)).unwrap(), bytes);
        }
    }
}
