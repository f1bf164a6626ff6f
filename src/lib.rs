//! BBQr splits an arbitrary binary payload into a sequence of short ASCII
//! fragments, each small enough for a single QR code, and joins a scanned
//! collection of fragments back into the original payload.
//!
//! ## Key Features:
//!
//! - **Self-describing fragments**: every fragment starts with an 8-character
//!   header announcing the encoding, the file type, the fragment count and its
//!   own index, so fragments can be scanned in any order.
//!
//! - **Capacity planning**: [`split`] picks the fewest fragments, then the
//!   smallest QR version, that satisfy the caller's [`SplitOptions`].
//!
//! - **Compact encodings**: payloads travel as uppercase hex, base32, or raw
//!   deflate followed by base32, all of which stay inside the QR alphanumeric
//!   character set.
//!
//! - **Incremental joining**: [`join`] accepts partial, duplicated and
//!   out-of-order fragment sets and reports progress until the set is complete.
//!
//! ```
//! use bbqr::{FileType, SplitOptions, join, split};
//!
//! let psbt = b"psbt\xff\x01\x00\x75\x02\x00\x00\x00".repeat(200);
//! let result = split(&psbt, FileType::Psbt, &SplitOptions::default()).unwrap();
//!
//! let joined = join(&result.parts).unwrap();
//! assert!(joined.is_complete);
//! assert_eq!(joined.file_type, FileType::Psbt);
//! assert_eq!(joined.raw, psbt);
//! ```

use thiserror::Error;

pub mod codec;
pub mod header;
mod join;
pub mod payload;
pub mod planner;
mod split;

#[cfg(any(test, feature = "testutil"))]
pub mod testutil;

pub use codec::CodecErr;
pub use header::{Encoding, FileType};
pub use join::{JoinResult, join, join_text};
pub use planner::CapacityErr;
pub use split::{SplitOptions, SplitResult, split};

/// Caller supplied options or values outside the documented ranges.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationErr {
    #[error("QR version range {min}..={max} is not an ordered range within 1..=40")]
    VersionRange { min: u8, max: u8 },

    #[error("fragment count range {min}..={max} is not an ordered range within 1..=1295")]
    SplitRange { min: usize, max: usize },

    #[error("payload is empty")]
    EmptyPayload,

    #[error("{0} does not fit in two base36 digits")]
    Base36Range(usize),
}

/// A malformed or inconsistent set of fragments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatErr {
    #[error("no fragments to join")]
    NoFragments,

    #[error("fragment of {len} characters is too short to carry a header and payload")]
    TooShort { len: usize },

    #[error("inconsistent header across fragments")]
    InconsistentHeader,

    #[error("fixed header not found, expected B$")]
    Magic,

    #[error("unknown encoding {0:?}")]
    UnknownEncoding(char),

    #[error("unknown file type {0:?}")]
    UnknownFileType(char),

    #[error("invalid base36 digits {0:?}")]
    Base36(String),

    #[error("fragment count is zero")]
    ZeroCount,

    #[error("got fragment {index} but only expecting {count}")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("duplicate fragment {index} has conflicting content")]
    ConflictingDuplicate { index: usize },
}

/// Any failure of [`split`] or [`join`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BbqrErr {
    #[error(transparent)]
    Validation(#[from] ValidationErr),

    #[error(transparent)]
    Capacity(#[from] CapacityErr),

    #[error(transparent)]
    Format(#[from] FormatErr),

    #[error(transparent)]
    Codec(#[from] CodecErr),
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use itertools::{Itertools, iproduct};
    use proptest::{collection::vec, prelude::any, proptest, sample::subsequence};

    use super::*;
    use crate::{
        header::HEADER_LEN,
        planner::QR_DATA_CAPACITY,
        testutil::{PayloadGen, file_type, split_options},
    };

    #[track_caller]
    fn check_round_trip(raw: &[u8], file_type: FileType, options: &SplitOptions) -> SplitResult {
        let result = split(raw, file_type, options).unwrap();

        assert!(options.versions().contains(&result.version));
        assert!(options.splits().contains(&result.parts.len()));
        if options.encoding != Encoding::Compressed || options.force_encoding {
            assert_eq!(result.encoding, options.encoding);
        } else {
            assert_matches!(result.encoding, Encoding::Compressed | Encoding::Base32);
        }
        let capacity = QR_DATA_CAPACITY[result.version as usize];
        assert!(result.parts.iter().all(|p| p.len() <= capacity));

        let joined = join(&result.parts).unwrap();
        assert!(joined.is_complete);
        assert_eq!(joined.expected_part_count, result.parts.len());
        assert_eq!(joined.processed_parts_count, result.parts.len());
        assert_eq!(joined.file_type, file_type);
        assert_eq!(joined.encoding, result.encoding);
        assert_eq!(joined.raw, raw);
        result
    }

    #[test]
    fn test_loopback() {
        let mut payloads = PayloadGen::new(0xDEAD_BEEF);
        let sizes = [10, 100, 2000, 10_000, 50_000];
        let max_versions = [11, 29, 40];
        let low_entropy = [true, false];

        let grid = iproduct!(Encoding::ALL, sizes, max_versions, low_entropy);
        for (encoding, size, max_version, low) in grid {
            let raw = if low {
                PayloadGen::repeated(b'A', size)
            } else {
                payloads.random(size)
            };
            let options = SplitOptions::default()
                .with_encoding(encoding)
                .with_versions(5..=max_version);
            check_round_trip(&raw, FileType::Psbt, &options);
        }
    }

    #[test]
    fn test_every_file_type() {
        let mut payloads = PayloadGen::new(11);
        let raw = payloads.text(3000);
        for ft in FileType::ALL {
            let result = check_round_trip(&raw, ft, &SplitOptions::default());
            let tag = ft.as_char() as u8;
            assert!(result.parts.iter().all(|p| p.as_bytes()[3] == tag));
        }
    }

    #[test]
    fn test_nunchuk_single_fragment() {
        let result = check_round_trip(b"Nunchuk", FileType::UnicodeText, &SplitOptions::default());
        assert_eq!(result.parts.len(), 1);
        let part = &result.parts[0];
        assert_eq!(&part[..2], "B$");
        assert_eq!(part.as_bytes()[2], result.encoding.as_char() as u8);
        assert_eq!(&part[3..HEADER_LEN], "U0100");
        assert_eq!(&part[HEADER_LEN..], "JZ2W4Y3IOVVQ");

        let joined = join_text(&result.parts).unwrap();
        assert_eq!(joined.raw, "Nunchuk");
    }

    #[test]
    fn test_version_27_capacity_boundary() {
        let mut payloads = PayloadGen::new(27);
        let options = SplitOptions::default()
            .with_encoding(Encoding::Hex)
            .with_versions(27..=27)
            .with_splits(1..=2);
        let result = check_round_trip(&payloads.random(1062), FileType::Transaction, &options);
        assert_eq!(result.parts.len(), 1);
        let result = check_round_trip(&payloads.random(1063), FileType::Transaction, &options);
        assert_eq!(result.version, 27);
        assert_eq!(result.parts.len(), 2);
    }

    #[test]
    fn test_max_fragment_count() {
        // version 40 carries 4288 payload characters per fragment
        let mut payloads = PayloadGen::new(40);
        let cases = [(Encoding::Hex, 4288 / 2), (Encoding::Base32, 4288 * 5 / 8)];
        for (encoding, per_fragment) in cases {
            let options = SplitOptions::default()
                .with_encoding(encoding)
                .with_versions(40..=40);

            let full = payloads.random(1295 * per_fragment);
            let result = check_round_trip(&full, FileType::Transaction, &options);
            assert_eq!(result.version, 40);
            assert_eq!(result.parts.len(), 1295);
            let last_prefix = format!("B${encoding}TZZ");
            assert_eq!(result.parts[1294][..HEADER_LEN - 2], last_prefix);

            let partial = payloads.random(1294 * per_fragment + 100);
            let result = check_round_trip(&partial, FileType::Transaction, &options);
            assert_eq!(result.parts.len(), 1295);

            let too_big = payloads.random(1295 * per_fragment + 1);
            assert_matches!(
                split(&too_big, FileType::Transaction, &options),
                Err(BbqrErr::Capacity(_))
            );
        }
    }

    #[test]
    fn test_error_display() {
        let err = BbqrErr::from(FormatErr::IndexOutOfRange { index: 5, count: 3 });
        assert_eq!(err.to_string(), "got fragment 5 but only expecting 3");
        let err = BbqrErr::from(ValidationErr::VersionRange { min: 0, max: 40 });
        assert_eq!(
            err.to_string(),
            "QR version range 0..=40 is not an ordered range within 1..=40"
        );
    }

    proptest! {
        #[test]
        fn test_round_trip_proptest(
            raw in vec(any::<u8>(), 1..2048),
            ft in file_type(),
            options in split_options(),
        ) {
            check_round_trip(&raw, ft, &options);
        }

        #[test]
        fn test_partial_subset_proptest(
            raw in vec(0u8..16, 200..1200),
            picks in vec(any::<usize>(), 1..64),
        ) {
            let options = SplitOptions::default()
                .with_encoding(Encoding::Hex)
                .with_versions(1..=1);
            let parts = split(&raw, FileType::Binary, &options).unwrap().parts;
            let count = parts.len();

            // any selection with repeats that misses at least one fragment
            let subset = picks
                .iter()
                .map(|p| parts[p % (count - 1)].clone())
                .collect_vec();
            let distinct = subset.iter().unique().count();
            let partial = join(&subset).unwrap();
            assert!(!partial.is_complete);
            assert!(partial.raw.is_empty());
            assert_eq!(partial.processed_parts_count, distinct);
            assert_eq!(partial.expected_part_count, count);

            let mut everything = subset;
            everything.extend(parts.iter().rev().cloned());
            let complete = join(&everything).unwrap();
            assert!(complete.is_complete);
            assert_eq!(complete.raw, raw);
        }

        #[test]
        fn test_join_order_independent_proptest(
            raw in vec(any::<u8>(), 100..600),
            keep in subsequence((0..40).collect_vec(), 0..40),
        ) {
            let options = SplitOptions::default()
                .with_encoding(Encoding::Base32)
                .with_versions(2..=2);
            let parts = split(&raw, FileType::Cbor, &options).unwrap().parts;
            let chosen = keep
                .iter()
                .filter_map(|&i| parts.get(i).cloned())
                .collect_vec();
            if chosen.is_empty() {
                return Ok(());
            }
            let forward = join(&chosen).unwrap();
            let reversed = join(&chosen.iter().rev().cloned().collect_vec()).unwrap();
            assert_eq!(forward, reversed);
        }
    }
}
