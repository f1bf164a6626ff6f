//! Raw deflate (no zlib header or trailer) with a 1 KiB window.
//!
//! Both directions run the stream against a growable output buffer, doubling
//! it whenever the stream fills it and resuming at the current offset.

use flate2::{Compress, Compression, Decompress, FlushCompress, FlushDecompress, Status};
use tracing::trace;

use crate::codec::CodecErr;

/// log2 of the deflate window shared by every BBQr implementation.
pub const WINDOW_BITS: u8 = 10;

/// Floor for the compression buffer so that tiny inputs still make progress.
const MIN_COMPRESS_BUFFER: usize = 64;

const INITIAL_DECOMPRESS_BUFFER: usize = 1024;

pub fn compress(data: &[u8]) -> Result<Vec<u8>, CodecErr> {
    let mut deflater = Compress::new_with_window_bits(Compression::default(), false, WINDOW_BITS);
    let mut out = vec![0u8; data.len().max(MIN_COMPRESS_BUFFER)];

    loop {
        let consumed = deflater.total_in() as usize;
        let produced = deflater.total_out() as usize;
        let (input, output) = (&data[consumed..], &mut out[produced..]);
        let status = deflater
            .compress(input, output, FlushCompress::Finish)
            .map_err(|err| CodecErr::Deflate(err.to_string()))?;

        if status == Status::StreamEnd {
            break;
        }
        let progressed = deflater.total_in() as usize != consumed
            || deflater.total_out() as usize != produced;
        grow_or_stall(&mut out, deflater.total_out() as usize, progressed)?;
    }

    out.truncate(deflater.total_out() as usize);
    Ok(out)
}

pub fn decompress(data: &[u8]) -> Result<Vec<u8>, CodecErr> {
    let mut inflater = Decompress::new_with_window_bits(false, WINDOW_BITS);
    let mut out = vec![0u8; INITIAL_DECOMPRESS_BUFFER];

    loop {
        let consumed = inflater.total_in() as usize;
        let produced = inflater.total_out() as usize;
        let (input, output) = (&data[consumed..], &mut out[produced..]);
        let status = inflater
            .decompress(input, output, FlushDecompress::None)
            .map_err(|err| CodecErr::Deflate(err.to_string()))?;

        if status == Status::StreamEnd {
            break;
        }
        let progressed = inflater.total_in() as usize != consumed
            || inflater.total_out() as usize != produced;
        grow_or_stall(&mut out, inflater.total_out() as usize, progressed)?;
    }

    out.truncate(inflater.total_out() as usize);
    Ok(out)
}

/// Double `out` once the stream has filled it. A stream that neither filled
/// the buffer nor made progress has run out of input.
fn grow_or_stall(out: &mut Vec<u8>, produced: usize, progressed: bool) -> Result<(), CodecErr> {
    if produced == out.len() {
        let len = out.len();
        trace!(from = len, to = len * 2, "growing deflate buffer");
        out.resize(len * 2, 0);
        Ok(())
    } else if progressed {
        Ok(())
    } else {
        Err(CodecErr::Truncated)
    }
}
