use proptest::{arbitrary::any, sample::select, strategy::Strategy};
use rand::{SeedableRng, prelude::*, rngs::StdRng};

use crate::{Encoding, FileType, SplitOptions, planner::VERSIONS};

const WORDS: [&str; 16] = [
    "psbt", "input", "output", "witness", "script", "sighash", "amount", "fee", "change", "signer",
    "xpub", "path", "nonce", "taproot", "key", "utxo",
];

/// Deterministic payload generator.
pub struct PayloadGen {
    rng: StdRng,
}

impl PayloadGen {
    pub fn new(seed: u64) -> Self {
        let rng = StdRng::seed_from_u64(seed);
        Self { rng }
    }

    /// Uniformly random, incompressible bytes.
    pub fn random(&mut self, len: usize) -> Vec<u8> {
        let mut out = vec![0u8; len];
        self.rng.fill_bytes(&mut out);
        out
    }

    /// Space separated words from a small vocabulary; compresses well.
    pub fn text(&mut self, len: usize) -> Vec<u8> {
        let mut out = Vec::with_capacity(len + 8);
        let mut picks = [0u8; 64];
        while out.len() < len {
            self.rng.fill_bytes(&mut picks);
            for &pick in &picks {
                out.extend_from_slice(WORDS[pick as usize % WORDS.len()].as_bytes());
                out.push(b' ');
            }
        }
        out.truncate(len);
        out
    }

    pub fn repeated(byte: u8, len: usize) -> Vec<u8> {
        vec![byte; len]
    }
}

pub fn file_type() -> impl Strategy<Value = FileType> {
    select(FileType::ALL.to_vec())
}

pub fn encoding() -> impl Strategy<Value = Encoding> {
    select(Encoding::ALL.to_vec())
}

/// Valid options over any encoding and any QR version range. The fragment
/// count stays unconstrained so that payloads up to a few KiB always fit.
pub fn split_options() -> impl Strategy<Value = SplitOptions> {
    (encoding(), any::<bool>(), VERSIONS, VERSIONS).prop_map(|(encoding, force, a, b)| {
        SplitOptions::default()
            .with_encoding(encoding)
            .with_force_encoding(force)
            .with_versions(a.min(b)..=a.max(b))
    })
}
