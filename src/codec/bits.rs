use std::ops::RangeInclusive;

use crate::codec::CodecErr;

/// Group widths, in bits, that [`convert_bits`] can repack between.
pub const WIDTHS: RangeInclusive<u32> = 1..=8;

/// How [`convert_bits`] treats bits left in the accumulator once the input is
/// exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Padding {
    /// Emit leftover bits as one final group, zero-padded on the right.
    Pad,
    /// Fail unless the leftover bits are fewer than one input group and all zero.
    Strict,
}

/// Repack a sequence of `from_bits`-wide groups into `to_bits`-wide groups,
/// most significant bit first.
///
/// Each input symbol is first mapped through `lookup`; a lookup error aborts
/// the conversion. Output groups are handed to `emit` as soon as enough bits
/// have accumulated. Widths outside [`WIDTHS`] are rejected before any input
/// is read.
///
/// ```
/// use bbqr::codec::bits::{Padding, convert_bits};
///
/// let mut out = vec![];
/// convert_bits([0xFFu8], 8, 5, Padding::Pad, Ok, |v| out.push(v)).unwrap();
/// assert_eq!(out, [0b11111, 0b11100]);
/// ```
pub fn convert_bits<T>(
    input: impl IntoIterator<Item = T>,
    from_bits: u32,
    to_bits: u32,
    padding: Padding,
    mut lookup: impl FnMut(T) -> Result<u8, CodecErr>,
    mut emit: impl FnMut(u8),
) -> Result<(), CodecErr> {
    if !WIDTHS.contains(&from_bits) || !WIDTHS.contains(&to_bits) {
        return Err(CodecErr::BitWidth {
            from: from_bits,
            to: to_bits,
        });
    }

    let max_value: u32 = (1 << to_bits) - 1;
    // enough room for one pending input group plus a partial output group
    let max_acc: u32 = (1 << (from_bits + to_bits - 1)) - 1;

    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    for symbol in input {
        let value = lookup(symbol)?;
        acc = ((acc << from_bits) | u32::from(value)) & max_acc;
        bits += from_bits;
        while bits >= to_bits {
            bits -= to_bits;
            emit(((acc >> bits) & max_value) as u8);
        }
    }

    let leftover = (acc << (to_bits - bits)) & max_value;
    match padding {
        Padding::Pad => {
            if bits > 0 {
                emit(leftover as u8);
            }
        }
        Padding::Strict => {
            if bits >= from_bits || leftover != 0 {
                return Err(CodecErr::TrailingBits);
            }
        }
    }
    Ok(())
}
