use std::ops::RangeInclusive;

use tracing::debug;

use crate::{
    BbqrErr, Encoding, FileType, ValidationErr,
    header::{HEADER_LEN, Header, MAX_BASE36},
    payload,
    planner::{self, MAX_VERSION, MIN_VERSION},
};

/// Constraints for [`split`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitOptions {
    /// Requested encoding. [`Encoding::Compressed`] may fall back to
    /// [`Encoding::Base32`] when compression does not help.
    pub encoding: Encoding,
    /// Use the requested encoding even when it makes the payload larger.
    pub force_encoding: bool,
    pub min_version: u8,
    pub max_version: u8,
    pub min_split: usize,
    pub max_split: usize,
}

impl SplitOptions {
    /// Compressed encoding, QR versions 5 through 40, and any fragment count
    /// expressible in the header.
    pub const DEFAULT: Self = Self {
        encoding: Encoding::Compressed,
        force_encoding: false,
        min_version: 5,
        max_version: MAX_VERSION,
        min_split: 1,
        max_split: MAX_BASE36,
    };

    pub const fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub const fn with_force_encoding(mut self, force: bool) -> Self {
        self.force_encoding = force;
        self
    }

    pub fn with_versions(mut self, versions: RangeInclusive<u8>) -> Self {
        (self.min_version, self.max_version) = versions.into_inner();
        self
    }

    pub fn with_splits(mut self, splits: RangeInclusive<usize>) -> Self {
        (self.min_split, self.max_split) = splits.into_inner();
        self
    }

    pub fn versions(&self) -> RangeInclusive<u8> {
        self.min_version..=self.max_version
    }

    pub fn splits(&self) -> RangeInclusive<usize> {
        self.min_split..=self.max_split
    }

    /// Check that both ranges are non-empty and within protocol limits.
    pub fn validate(&self) -> Result<(), ValidationErr> {
        let valid_versions = MIN_VERSION..=MAX_VERSION;
        if self.min_version > self.max_version
            || !valid_versions.contains(&self.min_version)
            || !valid_versions.contains(&self.max_version)
        {
            return Err(ValidationErr::VersionRange {
                min: self.min_version,
                max: self.max_version,
            });
        }

        let valid_splits = 1..=MAX_BASE36;
        if self.min_split > self.max_split
            || !valid_splits.contains(&self.min_split)
            || !valid_splits.contains(&self.max_split)
        {
            return Err(ValidationErr::SplitRange {
                min: self.min_split,
                max: self.max_split,
            });
        }
        Ok(())
    }
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// The fragments produced by [`split`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitResult {
    /// Smallest QR version that holds every fragment.
    pub version: u8,
    /// Fragments in index order.
    pub parts: Vec<String>,
    /// Encoding actually used, announced in every fragment header.
    pub encoding: Encoding,
}

/// Split `raw` into BBQr fragments.
///
/// The options are validated first, then the payload is encoded and the
/// fewest fragments (then lowest QR version) satisfying the options are
/// chosen.
///
/// ```
/// use bbqr::{FileType, SplitOptions, split};
///
/// let result = split(b"Nunchuk", FileType::UnicodeText, &SplitOptions::default()).unwrap();
/// assert_eq!(result.parts, ["B$2U0100JZ2W4Y3IOVVQ"]);
/// ```
pub fn split(
    raw: &[u8],
    file_type: FileType,
    options: &SplitOptions,
) -> Result<SplitResult, BbqrErr> {
    options.validate()?;
    if raw.is_empty() {
        return Err(ValidationErr::EmptyPayload.into());
    }

    let (text, encoding) = payload::encode(raw, options.encoding, options.force_encoding)?;
    let plan = planner::find_best_plan(
        text.len(),
        encoding.split_mod(),
        options.versions(),
        options.splits(),
    )?;
    debug!(
        raw = raw.len(),
        encoded = text.len(),
        %encoding,
        %file_type,
        count = plan.count,
        version = plan.version,
        per_fragment = plan.per_fragment,
        "planned split"
    );

    // the encoded text is ASCII, so every offset is a char boundary
    let mut parts = Vec::with_capacity(plan.count);
    for (index, offset) in (0..text.len()).step_by(plan.per_fragment).enumerate() {
        let end = (offset + plan.per_fragment).min(text.len());
        let header = Header {
            encoding,
            file_type,
            count: plan.count,
            index,
        };
        let mut part = String::with_capacity(HEADER_LEN + end - offset);
        header.write_to(&mut part)?;
        part.push_str(&text[offset..end]);
        parts.push(part);
    }
    debug_assert_eq!(parts.len(), plan.count);

    Ok(SplitResult {
        version: plan.version,
        parts,
        encoding,
    })
}
