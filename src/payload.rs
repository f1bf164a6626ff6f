//! Converts raw payload bytes to fragment text and back, choosing between
//! the encodings a fragment header can announce.

use tracing::debug;

use crate::{
    Encoding,
    codec::{CodecErr, base32, deflate, hex},
};

/// Encode `raw` using `encoding`, returning the text and the encoding that
/// was actually used.
///
/// [`Encoding::Compressed`] falls back to [`Encoding::Base32`] of the raw
/// bytes when deflate does not make the payload smaller, unless `force` is
/// set.
pub fn encode(raw: &[u8], encoding: Encoding, force: bool) -> Result<(String, Encoding), CodecErr> {
    match encoding {
        Encoding::Hex => Ok((hex::encode(raw), Encoding::Hex)),
        Encoding::Base32 => Ok((base32::encode(raw, false), Encoding::Base32)),
        Encoding::Compressed => {
            let compressed = deflate::compress(raw)?;
            let use_compressed = compressed.len() < raw.len() || force;
            debug!(
                raw = raw.len(),
                compressed = compressed.len(),
                force,
                use_compressed,
                "compression decision"
            );
            if use_compressed {
                Ok((base32::encode(&compressed, false), Encoding::Compressed))
            } else {
                Ok((base32::encode(raw, false), Encoding::Base32))
            }
        }
    }
}

/// Decode fragment bodies, in order, back to the raw payload bytes.
///
/// Every body is decoded on its own and the results are concatenated. For
/// [`Encoding::Compressed`] the concatenation is inflated once at the end.
pub fn decode<S: AsRef<str>>(
    bodies: impl IntoIterator<Item = S>,
    encoding: Encoding,
) -> Result<Vec<u8>, CodecErr> {
    let mut out = Vec::new();
    for body in bodies {
        let body = body.as_ref();
        let bytes = match encoding {
            Encoding::Hex => hex::decode(body)?,
            Encoding::Base32 | Encoding::Compressed => base32::decode(body)?,
        };
        out.extend_from_slice(&bytes);
    }
    match encoding {
        Encoding::Compressed => deflate::decompress(&out),
        Encoding::Hex | Encoding::Base32 => Ok(out),
    }
}

/// Like [`decode`], but requires the payload to be UTF-8 text.
pub fn decode_to_string<S: AsRef<str>>(
    bodies: impl IntoIterator<Item = S>,
    encoding: Encoding,
) -> Result<String, CodecErr> {
    String::from_utf8(decode(bodies, encoding)?).map_err(|_| CodecErr::Utf8)
}
