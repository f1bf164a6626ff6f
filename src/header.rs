//! The fixed 8-character header carried at the start of every fragment.
//!
//! ```text
//! B$ Z P 0C 03 <payload...>
//! |  | | |  |
//! |  | | |  +- fragment index, 2 base36 digits
//! |  | | +---- fragment count, 2 base36 digits
//! |  | +------ file type
//! |  +-------- encoding
//! +----------- magic
//! ```

use std::fmt::{self, Display, Write};

use crate::{FormatErr, ValidationErr};

/// Literal that opens every fragment.
pub const MAGIC: &[u8; 2] = b"B$";

/// Length of the fragment header in characters.
pub const HEADER_LEN: usize = 8;

/// Length of the header prefix that all fragments of one payload share:
/// magic, encoding, file type and count.
pub const SHARED_PREFIX_LEN: usize = 6;

/// Largest value representable by two base36 digits.
pub const MAX_BASE36: usize = 36 * 36 - 1;

static_assertions::const_assert_eq!(MAX_BASE36, 1295);
static_assertions::const_assert!(SHARED_PREFIX_LEN + 2 == HEADER_LEN);

/// The kind of file carried by a payload. It is transported opaquely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FileType {
    /// `P`: partially signed bitcoin transaction
    Psbt,
    /// `T`: ready to broadcast bitcoin transaction
    Transaction,
    /// `J`: JSON
    Json,
    /// `C`: CBOR
    Cbor,
    /// `U`: UTF-8 text
    UnicodeText,
    /// `B`: generic binary data
    Binary,
    /// `X`: executable, platform dependent
    Executable,
}

impl FileType {
    pub const ALL: [FileType; 7] = [
        FileType::Psbt,
        FileType::Transaction,
        FileType::Json,
        FileType::Cbor,
        FileType::UnicodeText,
        FileType::Binary,
        FileType::Executable,
    ];

    /// The wire character of this file type.
    pub const fn as_char(self) -> char {
        match self {
            FileType::Psbt => 'P',
            FileType::Transaction => 'T',
            FileType::Json => 'J',
            FileType::Cbor => 'C',
            FileType::UnicodeText => 'U',
            FileType::Binary => 'B',
            FileType::Executable => 'X',
        }
    }
}

impl TryFrom<char> for FileType {
    type Error = FormatErr;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        FileType::ALL
            .into_iter()
            .find(|ft| ft.as_char() == c)
            .ok_or(FormatErr::UnknownFileType(c))
    }
}

impl Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(self.as_char())
    }
}

/// How the payload bytes are turned into fragment text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Encoding {
    /// `H`: uppercase hex, 4 bits per character
    Hex,
    /// `2`: RFC 4648 base32, 5 bits per character
    Base32,
    /// `Z`: raw deflate with a 10-bit window, then base32
    Compressed,
}

impl Encoding {
    pub const ALL: [Encoding; 3] = [Encoding::Hex, Encoding::Base32, Encoding::Compressed];

    /// The wire character of this encoding.
    pub const fn as_char(self) -> char {
        match self {
            Encoding::Hex => 'H',
            Encoding::Base32 => '2',
            Encoding::Compressed => 'Z',
        }
    }

    /// Number of text characters that form one indivisible group of the
    /// underlying codec. Fragment bodies are sized in multiples of this so
    /// that every fragment decodes on its own.
    pub const fn split_mod(self) -> usize {
        match self {
            Encoding::Hex => 2,
            Encoding::Base32 | Encoding::Compressed => crate::codec::base32::BLOCK_CHARS,
        }
    }
}

impl TryFrom<char> for Encoding {
    type Error = FormatErr;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        Encoding::ALL
            .into_iter()
            .find(|enc| enc.as_char() == c)
            .ok_or(FormatErr::UnknownEncoding(c))
    }
}

impl Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(self.as_char())
    }
}

fn base36_digit(value: usize) -> char {
    debug_assert!(value < 36);
    if value < 10 {
        (b'0' + value as u8) as char
    } else {
        (b'A' + (value - 10) as u8) as char
    }
}

/// Encode `n` as two uppercase, zero-padded base36 digits.
///
/// ```
/// use bbqr::header::int_to_base36;
///
/// assert_eq!(int_to_base36(0).unwrap(), "00");
/// assert_eq!(int_to_base36(35).unwrap(), "0Z");
/// assert_eq!(int_to_base36(1295).unwrap(), "ZZ");
/// assert!(int_to_base36(1296).is_err());
/// ```
pub fn int_to_base36(n: usize) -> Result<String, ValidationErr> {
    let mut out = String::with_capacity(2);
    push_base36(&mut out, n)?;
    Ok(out)
}

fn push_base36(out: &mut String, n: usize) -> Result<(), ValidationErr> {
    if n > MAX_BASE36 {
        return Err(ValidationErr::Base36Range(n));
    }
    out.push(base36_digit(n / 36));
    out.push(base36_digit(n % 36));
    Ok(())
}

/// Parse exactly two base36 digits, in either case.
pub fn base36_to_int(digits: &str) -> Result<usize, FormatErr> {
    parse_base36(digits.as_bytes())
}

fn parse_base36(digits: &[u8]) -> Result<usize, FormatErr> {
    let invalid = || FormatErr::Base36(String::from_utf8_lossy(digits).into_owned());
    let [hi, lo] = digits else {
        return Err(invalid());
    };
    let hi = char::from(*hi).to_digit(36).ok_or_else(invalid)?;
    let lo = char::from(*lo).to_digit(36).ok_or_else(invalid)?;
    Ok((hi * 36 + lo) as usize)
}

/// A decoded fragment header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub encoding: Encoding,
    pub file_type: FileType,
    pub count: usize,
    pub index: usize,
}

impl Header {
    /// Append the 8 header characters to `out`.
    pub fn write_to(&self, out: &mut String) -> Result<(), ValidationErr> {
        out.extend(MAGIC.iter().map(|&b| char::from(b)));
        out.push(self.encoding.as_char());
        out.push(self.file_type.as_char());
        push_base36(out, self.count)?;
        push_base36(out, self.index)
    }

    /// Decode the header at the start of `fragment`.
    ///
    /// Validates the magic, the encoding and file type characters, and that
    /// the count is non-zero. The index is parsed but not checked against the
    /// count.
    pub fn decode(fragment: &[u8]) -> Result<Self, FormatErr> {
        let len = fragment.len();
        let Some(header) = fragment.get(..HEADER_LEN) else {
            return Err(FormatErr::TooShort { len });
        };
        if &header[..2] != MAGIC {
            return Err(FormatErr::Magic);
        }
        let encoding = Encoding::try_from(char::from(header[2]))?;
        let file_type = FileType::try_from(char::from(header[3]))?;
        let count = parse_base36(&header[4..6])?;
        if count == 0 {
            return Err(FormatErr::ZeroCount);
        }
        let index = parse_base36(&header[6..8])?;
        Ok(Self {
            encoding,
            file_type,
            count,
            index,
        })
    }

    /// Parse only the index field of `fragment`.
    pub(crate) fn decode_index(fragment: &[u8]) -> Result<usize, FormatErr> {
        let len = fragment.len();
        match fragment.get(SHARED_PREFIX_LEN..HEADER_LEN) {
            Some(digits) => parse_base36(digits),
            None => Err(FormatErr::TooShort { len }),
        }
    }
}
