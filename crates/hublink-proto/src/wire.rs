//! Bounds-checked field readers shared by the message bodies.

use bytes::Buf;

use crate::error::{ProtoError, Result};
use crate::kind::MessageKind;

pub(crate) fn ensure(
    body: &[u8],
    kind: MessageKind,
    field: &'static str,
    needed: usize,
) -> Result<()> {
    if body.remaining() < needed {
        return Err(ProtoError::Truncated {
            kind,
            field,
            needed,
            available: body.remaining(),
        });
    }
    Ok(())
}

pub(crate) fn read_u8(body: &mut &[u8], kind: MessageKind, field: &'static str) -> Result<u8> {
    ensure(body, kind, field, 1)?;
    Ok(body.get_u8())
}

pub(crate) fn read_u16(body: &mut &[u8], kind: MessageKind, field: &'static str) -> Result<u16> {
    ensure(body, kind, field, 2)?;
    Ok(body.get_u16_le())
}

pub(crate) fn read_i32(body: &mut &[u8], kind: MessageKind, field: &'static str) -> Result<i32> {
    ensure(body, kind, field, 4)?;
    Ok(body.get_i32_le())
}

/// Read bytes up to (and consume) the next NUL.
pub(crate) fn read_cstr<'a>(
    body: &mut &'a [u8],
    kind: MessageKind,
    field: &'static str,
) -> Result<&'a [u8]> {
    let rest: &'a [u8] = *body;
    let end = rest
        .iter()
        .position(|&byte| byte == 0)
        .ok_or(ProtoError::Unterminated { kind, field })?;
    *body = &rest[end + 1..];
    Ok(&rest[..end])
}
