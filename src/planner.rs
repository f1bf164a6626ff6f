//! Picks the QR version and fragment count for an encoded payload.

use std::ops::RangeInclusive;

use thiserror::Error;

use crate::header::HEADER_LEN;

pub const MIN_VERSION: u8 = 1;
pub const MAX_VERSION: u8 = 40;

/// Every QR version in [`QR_DATA_CAPACITY`].
pub const VERSIONS: RangeInclusive<u8> = MIN_VERSION..=MAX_VERSION;

/// Alphanumeric-mode characters that fit in each QR version at error
/// correction level L. Index 0 is unused.
pub const QR_DATA_CAPACITY: [usize; MAX_VERSION as usize + 1] = [
    0, 25, 47, 77, 114, 154, 195, 224, 279, 335, 395, 468, 535, 619, 667, 758, 854, 938, 1046, 1153,
    1249, 1352, 1460, 1588, 1704, 1853, 1990, 2132, 2223, 2369, 2520, 2677, 2840, 3009, 3183, 3351,
    3537, 3729, 3927, 4087, 4296,
];

// the smallest version must still leave room for a whole base32 block
static_assertions::const_assert!(QR_DATA_CAPACITY[MIN_VERSION as usize] >= HEADER_LEN + 8);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "cannot fit {size} encoded characters into {min_split}..={max_split} fragments \
     of QR version {min_version}..={max_version}"
)]
pub struct CapacityErr {
    pub size: usize,
    pub min_version: u8,
    pub max_version: u8,
    pub min_split: usize,
    pub max_split: usize,
}

/// The layout chosen for an encoded payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Plan {
    /// Number of fragments.
    pub count: usize,
    /// QR version every fragment fits in.
    pub version: u8,
    /// Payload characters per fragment; the last fragment may carry fewer.
    pub per_fragment: usize,
}

/// Payload characters a single fragment can carry in `version`.
#[inline]
pub(crate) fn fragment_capacity(version: u8) -> usize {
    QR_DATA_CAPACITY[version as usize] - HEADER_LEN
}

/// Whether `version` is in the capacity table and holds at least one whole
/// group of `split_mod` characters.
fn holds_a_group(version: u8, split_mod: usize) -> bool {
    VERSIONS.contains(&version) && split_mod > 0 && fragment_capacity(version) >= split_mod
}

/// Number of fragments needed to carry `size` characters in `version`, and
/// how many characters each fragment carries.
///
/// All fragments but the last are aligned to `split_mod` characters. The last
/// fragment may use the full unaligned capacity, and a payload that fits in a
/// single fragment is never aligned. Callers check [`holds_a_group`] first.
pub(crate) fn fragments_needed(version: u8, size: usize, split_mod: usize) -> (usize, usize) {
    let base = fragment_capacity(version);
    let aligned = base - base % split_mod;
    let estimate = size.div_ceil(aligned);

    if estimate <= 1 {
        return (1, size);
    }

    let capacity = (estimate - 1) * aligned + base;
    let count = if capacity >= size {
        estimate
    } else {
        estimate + 1
    };
    (count, aligned)
}

/// Find the plan with the fewest fragments, then the lowest version, that
/// fits `size` characters within the given version and count ranges.
///
/// Versions outside [`VERSIONS`], and versions too small for one group of
/// `split_mod` characters, never fit. A zero `split_mod` fits nowhere.
pub fn find_best_plan(
    size: usize,
    split_mod: usize,
    versions: RangeInclusive<u8>,
    splits: RangeInclusive<usize>,
) -> Result<Plan, CapacityErr> {
    let cannot_fit = CapacityErr {
        size,
        min_version: *versions.start(),
        max_version: *versions.end(),
        min_split: *splits.start(),
        max_split: *splits.end(),
    };

    versions
        .filter(|&version| holds_a_group(version, split_mod))
        .map(|version| {
            let (count, per_fragment) = fragments_needed(version, size, split_mod);
            Plan {
                count,
                version,
                per_fragment,
            }
        })
        .filter(|plan| splits.contains(&plan.count))
        .min()
        .ok_or(cannot_fit)
}
