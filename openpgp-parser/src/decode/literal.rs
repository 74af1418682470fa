//! Literal ("plaintext") data packets (tag 11).
//!
//! See [Section 5.9 of RFC 4880].
//!
//! Unlike the other decoders in this module, this one reads directly
//! from the shared [`crate::reader::Reader`] rather than a materialized
//! body buffer: only the small fixed-format fields preceding the
//! literal data itself are decoded here, and the reader is left
//! positioned at (and armed for) the remainder, which the dispatcher's
//! caller streams out explicitly.
//!
//! [Section 5.9 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-5.9

use crate::error::Result;
use crate::packet::{Common, Literal};
use crate::reader::Reader;

/// Decodes a `Literal` packet's header fields (mode, filename,
/// timestamp). On return, `source` is positioned at the start of the
/// literal data proper; the caller is responsible for reading or
/// draining it before the next dispatch call.
pub fn decode(common: Common, source: &mut Reader) -> Result<Literal> {
    let mode = source.get()?;
    let name_len = source.get()? as usize;
    let mut name = Vec::with_capacity(name_len);
    for _ in 0..name_len {
        name.push(source.get()?);
    }
    let b0 = source.get()? as u32;
    let b1 = source.get()? as u32;
    let b2 = source.get()? as u32;
    let b3 = source.get()? as u32;
    let timestamp = (b0 << 24) | (b1 << 16) | (b2 << 8) | b3;
    Ok(Literal { common, mode, name, timestamp })
}
