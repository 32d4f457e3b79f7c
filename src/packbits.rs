//! The PackBits run-length codec used by the legacy ICNS icon types.
//!
//! A record starts with a header byte.  Headers below 128 introduce a
//! literal run of `header + 1` bytes copied verbatim.  Headers of 128 and
//! above introduce a repeat run: the following byte is repeated
//! `header - 125` times, so runs of 3 to 130 bytes can be encoded.

use crate::error::{Error, Result};

/// The longest run a repeat record can hold.
const MAX_REPEAT_RUN: usize = 130;

/// The longest run a literal record can hold.
const MAX_LITERAL_RUN: usize = 128;

/// The shortest run worth encoding as a repeat record.
const MIN_REPEAT_RUN: usize = 3;

/// Returns true if `data` holds three equal bytes starting at `pos`.
fn repeat_starts_at(data: &[u8], pos: usize) -> bool {
    pos + 2 < data.len() && data[pos] == data[pos + 1] &&
    data[pos] == data[pos + 2]
}

/// Compresses `data` into PackBits records.
pub fn encode(data: &[u8]) -> Vec<u8> {
    let mut output = Vec::with_capacity(data.len() + data.len() / 64 + 2);
    let mut pos = 0;
    while pos < data.len() {
        let remaining = data.len() - pos;
        if remaining < MIN_REPEAT_RUN {
            // Tail: the header holds the number of bytes after the first.
            output.push((remaining - 1) as u8);
            output.extend_from_slice(&data[pos..]);
            break;
        }
        if repeat_starts_at(data, pos) {
            let value = data[pos];
            let mut run = MIN_REPEAT_RUN;
            while run < MAX_REPEAT_RUN && pos + run < data.len() &&
                  data[pos + run] == value {
                run += 1;
            }
            output.push((run + 128 - MIN_REPEAT_RUN) as u8);
            output.push(value);
            pos += run;
        } else {
            // Stop the literal where a repeat run begins, so that it can be
            // emitted as its own record.
            let mut run = 1;
            while run < MAX_LITERAL_RUN && pos + run < data.len() &&
                  !repeat_starts_at(data, pos + run) {
                run += 1;
            }
            output.push((run - 1) as u8);
            output.extend_from_slice(&data[pos..pos + run]);
            pos += run;
        }
    }
    output
}

/// Decompresses a complete PackBits stream.  Returns an error if a record
/// is cut short.
pub fn decode(input: &[u8]) -> Result<Vec<u8>> {
    let mut output = Vec::with_capacity(input.len() * 2);
    let mut iter = input.iter();
    while let Some(&header) = iter.next() {
        if header >= 128 {
            let run = (header as usize) - 128 + MIN_REPEAT_RUN;
            let value = *iter.next().ok_or_else(packbits_error)?;
            output.extend(std::iter::repeat(value).take(run));
        } else {
            for _ in 0..(header as usize) + 1 {
                output.push(*iter.next().ok_or_else(packbits_error)?);
            }
        }
    }
    Ok(output)
}

/// Compresses each plane separately and concatenates the results, as the
/// `is32`/`il32` and `ARGB` icon payloads do.
pub fn encode_planes(planes: &[Vec<u8>]) -> Vec<u8> {
    let mut output = Vec::new();
    for plane in planes {
        output.extend(encode(plane));
    }
    output
}

/// Decompresses `num_planes` planes of `plane_len` bytes each.  Returns an
/// error if the data does not decode to exactly that many bytes.
pub fn decode_planes(input: &[u8],
                     num_planes: usize,
                     plane_len: usize)
                     -> Result<Vec<Vec<u8>>> {
    let data = decode(input)?;
    if data.len() != num_planes * plane_len {
        let msg = format!("PackBits data decodes to {} bytes instead of {}",
                          data.len(),
                          num_planes * plane_len);
        return Err(Error::InvalidData(msg));
    }
    Ok(data.chunks(plane_len.max(1)).map(|plane| plane.to_vec()).collect())
}

fn packbits_error() -> Error {
    Error::InvalidData("truncated PackBits record".to_string())
}
