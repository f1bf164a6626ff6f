//! Reassembles a payload from an unordered, possibly incomplete collection of
//! fragments.
//!
//! [`join`] keeps no state between calls. Scanners call it again each time a
//! new fragment arrives; the result only depends on the set of distinct
//! fragments seen so far, not on their order or how often each was repeated.

use itertools::Itertools;
use tracing::debug;

use crate::{
    BbqrErr, Encoding, FileType, FormatErr,
    codec::CodecErr,
    header::{HEADER_LEN, Header, SHARED_PREFIX_LEN},
    payload,
};

/// Outcome of [`join`].
///
/// `raw` stays empty until every fragment has been seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinResult<R = Vec<u8>> {
    pub file_type: FileType,
    pub encoding: Encoding,
    pub raw: R,
    /// Fragment count announced by the headers.
    pub expected_part_count: usize,
    /// Number of distinct fragments seen.
    pub processed_parts_count: usize,
    pub is_complete: bool,
}

/// Join fragments into the raw payload bytes.
///
/// Returns an incomplete result, not an error, while fragments are missing.
///
/// ```
/// use bbqr::{Encoding, FileType, SplitOptions, join, split};
///
/// let options = SplitOptions::default().with_encoding(Encoding::Hex).with_versions(1..=1);
/// let result = split(b"air gapped", FileType::Binary, &options).unwrap();
/// assert_eq!(result.parts.len(), 2);
///
/// let partial = join(&result.parts[1..]).unwrap();
/// assert!(!partial.is_complete);
/// assert_eq!(partial.processed_parts_count, 1);
///
/// let joined = join(&result.parts).unwrap();
/// assert!(joined.is_complete);
/// assert_eq!(joined.raw, b"air gapped");
/// ```
pub fn join<S: AsRef<str>>(parts: &[S]) -> Result<JoinResult, BbqrErr> {
    join_with(parts, |bodies, encoding| payload::decode(bodies, encoding))
}

/// Join fragments into a UTF-8 string payload.
pub fn join_text<S: AsRef<str>>(parts: &[S]) -> Result<JoinResult<String>, BbqrErr> {
    join_with(parts, |bodies, encoding| {
        payload::decode_to_string(bodies, encoding)
    })
}

fn join_with<S, R, F>(parts: &[S], decode: F) -> Result<JoinResult<R>, BbqrErr>
where
    S: AsRef<str>,
    R: Default,
    F: FnOnce(Vec<&str>, Encoding) -> Result<R, CodecErr>,
{
    let header = shared_header(parts)?;
    let count = header.count;

    let mut bodies = Vec::with_capacity(parts.len());
    for part in parts {
        let part = part.as_ref();
        let index = Header::decode_index(part.as_bytes())?;
        if index >= count {
            return Err(FormatErr::IndexOutOfRange { index, count }.into());
        }
        // the index digits are ASCII, so the body starts on a char boundary
        bodies.push((index, &part[HEADER_LEN..]));
    }

    bodies.sort_unstable();
    bodies.dedup();
    if let Some(((index, _), _)) = bodies.iter().tuple_windows().find(|(a, b)| a.0 == b.0) {
        return Err(FormatErr::ConflictingDuplicate { index: *index }.into());
    }

    let seen = bodies.len();
    debug!(
        encoding = %header.encoding,
        file_type = %header.file_type,
        count,
        seen,
        received = parts.len(),
        "joining fragments"
    );

    let raw = if seen == count {
        let ordered = bodies.into_iter().map(|(_, body)| body).collect();
        decode(ordered, header.encoding)?
    } else {
        R::default()
    };

    Ok(JoinResult {
        file_type: header.file_type,
        encoding: header.encoding,
        raw,
        expected_part_count: count,
        processed_parts_count: seen,
        is_complete: seen == count,
    })
}

/// Check that every fragment is long enough and shares the first fragment's
/// header prefix, then decode that header.
fn shared_header<S: AsRef<str>>(parts: &[S]) -> Result<Header, FormatErr> {
    let Some(first) = parts.first() else {
        return Err(FormatErr::NoFragments);
    };
    let first = first.as_ref().as_bytes();

    for part in parts {
        let part = part.as_ref().as_bytes();
        if part.len() <= HEADER_LEN {
            return Err(FormatErr::TooShort { len: part.len() });
        }
        if part[..SHARED_PREFIX_LEN] != first[..SHARED_PREFIX_LEN] {
            return Err(FormatErr::InconsistentHeader);
        }
    }

    Header::decode(first)
}
