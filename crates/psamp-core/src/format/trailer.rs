// crates/psamp-core/src/format/trailer.rs

use crate::error::{PsampError, Result};

const CRC_LEN: usize = 4;
const TAG_LEN: usize = 16;

/// Bytes appended by `seal`.
pub const TRAILER_LEN: usize = CRC_LEN + TAG_LEN;

/// Append `crc32(body)` and then a 16-byte blake3 tag over body + crc.
/// The tag doubles as the content id.
pub fn seal(buf: &mut Vec<u8>) {
    let mut crc = crc32fast::Hasher::new();
    crc.update(&buf[..]);
    buf.extend_from_slice(&crc.finalize().to_le_bytes());

    let tag = blake3::hash(&buf[..]);
    buf.extend_from_slice(&tag.as_bytes()[..TAG_LEN]);
}

/// Check both trailer fields and return the sealed body.
pub fn open(sealed: &[u8]) -> Result<&[u8]> {
    if sealed.len() < TRAILER_LEN {
        return Err(PsampError::Format("too small for a trailer".into()));
    }
    let (with_crc, tag) = sealed.split_at(sealed.len() - TAG_LEN);
    let (body, crc) = with_crc.split_at(with_crc.len() - CRC_LEN);

    let mut h = crc32fast::Hasher::new();
    h.update(body);
    if crc != h.finalize().to_le_bytes() {
        return Err(PsampError::Format("crc32 mismatch".into()));
    }
    if tag != &blake3::hash(with_crc).as_bytes()[..TAG_LEN] {
        return Err(PsampError::Format("blake3 mismatch".into()));
    }
    Ok(body)
}

/// Lowercase hex of the trailing tag. Does not verify.
pub fn content_id(sealed: &[u8]) -> Result<String> {
    if sealed.len() < TAG_LEN {
        return Err(PsampError::Format("encoded snapshot too small for id".into()));
    }
    Ok(sealed[sealed.len() - TAG_LEN..]
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect())
}
