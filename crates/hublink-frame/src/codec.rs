use bytes::{BufMut, BytesMut};

use crate::error::{FrameError, Result};

/// Frame terminator. Never appears inside an encoded frame.
pub const DELIMITER: u8 = 0x02;

/// Code byte for a full block that was not cut by a reserved byte.
pub const NO_DELIMITER: u8 = 0xFF;

/// Maximum number of literal bytes in one block.
pub const MAX_BLOCK_SIZE: usize = 84;

/// Whitening mask applied to every stuffed byte by [`pack`].
pub const XOR_MASK: u8 = 0x03;

/// Out-of-band marker some transports put in front of a frame.
pub const ESCAPE: u8 = 0x01;

const CODE_OFFSET: usize = DELIMITER as usize;

/// Byte-stuff a payload.
///
/// Bytes `0x00..=0x02` are removed from the payload; each block of literal
/// bytes gets a leading code byte that records the block length and which
/// reserved byte (if any) followed it:
///
/// ```text
/// code = reserved * 84 + (block_len + 1) + 2     block cut by a reserved byte
/// code = 0xFF                                    84 literals, nothing removed
/// ```
///
/// The final block always carries a plain length code.
pub fn encode(data: &[u8]) -> BytesMut {
    let mut out = BytesMut::with_capacity(data.len() + data.len() / MAX_BLOCK_SIZE + 2);
    let mut code_index = begin_block(&mut out);
    let mut block = 1usize;

    for &byte in data {
        if byte > DELIMITER {
            out.put_u8(byte);
            block += 1;
        }

        if byte <= DELIMITER || block > MAX_BLOCK_SIZE {
            if byte <= DELIMITER {
                out[code_index] = (byte as usize * MAX_BLOCK_SIZE + block + CODE_OFFSET) as u8;
            }
            code_index = begin_block(&mut out);
            block = 1;
        }
    }

    out[code_index] = (block + CODE_OFFSET) as u8;
    out
}

/// Reverse [`encode`].
pub fn decode(data: &[u8]) -> Result<BytesMut> {
    let mut out = BytesMut::with_capacity(data.len());
    let Some((&first, rest)) = data.split_first() else {
        return Ok(out);
    };

    let (mut reserved, mut remaining) = unescape(first, 0)?;
    for (index, &byte) in rest.iter().enumerate() {
        remaining -= 1;
        if remaining > 0 {
            out.put_u8(byte);
            continue;
        }

        if let Some(value) = reserved {
            out.put_u8(value);
        }
        (reserved, remaining) = unescape(byte, index + 1)?;
    }

    if remaining != 1 {
        return Err(FrameError::Truncated {
            missing: remaining - 1,
        });
    }

    Ok(out)
}

/// Encode, whiten and terminate a payload.
///
/// The result is ready to be written to a transport.
pub fn pack(data: &[u8]) -> BytesMut {
    let mut out = encode(data);
    for byte in out.iter_mut() {
        *byte ^= XOR_MASK;
    }
    out.put_u8(DELIMITER);
    out
}

/// Reverse [`pack`] for one complete frame.
///
/// A single leading [`ESCAPE`] byte is skipped if present.
pub fn unpack(frame: &[u8]) -> Result<BytesMut> {
    let frame = match frame.split_first() {
        Some((&ESCAPE, rest)) => rest,
        _ => frame,
    };

    let Some((&DELIMITER, body)) = frame.split_last() else {
        return Err(FrameError::MissingDelimiter);
    };

    let unmasked: Vec<u8> = body.iter().map(|byte| byte ^ XOR_MASK).collect();
    decode(&unmasked)
}

fn begin_block(out: &mut BytesMut) -> usize {
    let index = out.len();
    out.put_u8(NO_DELIMITER);
    index
}

/// Split a code byte into (reserved byte to reinsert, block length + 1).
fn unescape(code: u8, offset: usize) -> Result<(Option<u8>, usize)> {
    if code == NO_DELIMITER {
        return Ok((None, MAX_BLOCK_SIZE + 1));
    }
    if code as usize <= CODE_OFFSET {
        return Err(FrameError::InvalidCode { code, offset });
    }

    let raw = code as usize - CODE_OFFSET;
    let (mut reserved, mut block) = (raw / MAX_BLOCK_SIZE, raw % MAX_BLOCK_SIZE);
    if block == 0 {
        block = MAX_BLOCK_SIZE;
        reserved -= 1;
    }
    Ok((Some(reserved as u8), block))
}
