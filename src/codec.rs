//! Text and compression codecs used to carry payload bytes inside QR
//! alphanumeric fragments.
//!
//! Every codec here is a pure function over its input. The text codecs share
//! [`bits::convert_bits`], which repacks groups of bits between power-of-two
//! widths, and decode each fragment body independently of its neighbours.

use thiserror::Error;

pub mod base32;
pub mod bits;
pub mod deflate;
pub mod hex;

/// Failures of the text and compression codecs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecErr {
    #[error("invalid hex digit {0:?}")]
    HexDigit(char),

    #[error("hex text has an odd number of digits")]
    HexOddLength,

    #[error("invalid base32 character {0:?}")]
    Base32Char(char),

    #[error("text has leftover bits that do not form a whole output group")]
    TrailingBits,

    #[error("cannot repack {from}-bit groups into {to}-bit groups")]
    BitWidth { from: u32, to: u32 },

    #[error("deflate stream error: {0}")]
    Deflate(String),

    #[error("deflate stream ended before completion")]
    Truncated,

    #[error("payload is not valid UTF-8")]
    Utf8,
}
