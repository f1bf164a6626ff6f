use crate::codec::CodecErr;

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Every byte mapped to its two uppercase hex characters.
static BYTE_TO_HEX: [[u8; 2]; 256] = {
    let mut table = [[0u8; 2]; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = [HEX_DIGITS[i >> 4], HEX_DIGITS[i & 0xF]];
        i += 1;
    }
    table
};

/// Encode `data` as uppercase hex.
pub fn encode(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len() * 2);
    for &byte in data {
        let [hi, lo] = BYTE_TO_HEX[byte as usize];
        out.push(hi as char);
        out.push(lo as char);
    }
    out
}

fn digit(c: char) -> Result<u8, CodecErr> {
    c.to_digit(16).map(|v| v as u8).ok_or(CodecErr::HexDigit(c))
}

/// Decode hex text in either case.
///
/// ASCII whitespace is skipped between digit pairs, but not inside one.
pub fn decode(text: &str) -> Result<Vec<u8>, CodecErr> {
    let mut out = Vec::with_capacity(text.len() / 2);
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if is_space(c) {
            continue;
        }
        let Some(lo) = chars.next() else {
            return Err(CodecErr::HexOddLength);
        };
        out.push((digit(c)? << 4) | digit(lo)?);
    }
    Ok(out)
}

/// The whitespace set accepted between hex pairs; excludes non-ASCII spaces.
fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0B' | '\x0C' | '\r')
}
