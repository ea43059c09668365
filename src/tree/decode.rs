//! Wire-format decoding of tree entry records.
//!
//! A tree object is a flat byte sequence of records, each shaped
//! `<octal-mode><SP><name><NUL><raw-id>`, with no length prefix or entry
//! count: record boundaries come purely from scanning. The id width is a
//! repository parameter injected by the caller, never inferred from the
//! data.

use crate::error::TraverseError;
use crate::tree::entry::{Entry, FileKind};
use crate::types::HashKind;

/// Decode the record starting at `offset`, returning the entry and the
/// offset of the next record.
///
/// Any malformation is fatal ([`TraverseError::CorruptTree`]); the decoder
/// never skips bytes to resynchronize. The reported offset is the
/// offending byte for in-record violations and `buf.len()` when the
/// record is truncated.
pub fn decode_entry(
    buf: &[u8],
    offset: usize,
    hash: HashKind,
) -> Result<(Entry<'_>, usize), TraverseError> {
    let mut pos = offset;

    // Octal mode digits up to the separating space.
    let mode_start = pos;
    let mut mode: u32 = 0;
    loop {
        match buf.get(pos) {
            Some(&b' ') if pos > mode_start => {
                pos += 1;
                break;
            }
            Some(&digit @ b'0'..=b'7') => {
                mode = mode
                    .checked_mul(8)
                    .and_then(|m| m.checked_add(u32::from(digit - b'0')))
                    .ok_or(TraverseError::CorruptTree(pos))?;
                pos += 1;
            }
            Some(_) => return Err(TraverseError::CorruptTree(pos)),
            None => return Err(TraverseError::CorruptTree(buf.len())),
        }
    }

    // Name runs to the NUL terminator; it must be non-empty and must not
    // contain a path separator.
    let name_start = pos;
    let name_end = loop {
        match buf.get(pos) {
            Some(&0) => break pos,
            Some(&b'/') => return Err(TraverseError::CorruptTree(pos)),
            Some(_) => pos += 1,
            None => return Err(TraverseError::CorruptTree(buf.len())),
        }
    };
    if name_end == name_start {
        return Err(TraverseError::CorruptTree(name_start));
    }
    let name = &buf[name_start..name_end];
    pos = name_end + 1;

    // Fixed-width raw id immediately after the terminator.
    let id_end = pos + hash.width();
    if id_end > buf.len() {
        return Err(TraverseError::CorruptTree(buf.len()));
    }
    let id = &buf[pos..id_end];

    let kind = FileKind::from_mode(mode).ok_or(TraverseError::CorruptTree(mode_start))?;

    Ok((Entry { kind, name, id }, id_end))
}
