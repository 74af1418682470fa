//! Packet body length decoding.
//!
//! OpenPGP has two framing conventions ("old format" and "new format"),
//! and the new format has three flavors of length: definite,
//! indeterminate (old format only), and partial-body. See
//! [Section 4.2 of RFC 4880].
//!
//! [Section 4.2 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-4.2

use buffered_reader::BufferedReader;

use crate::error::Result;

/// A packet body's length, as decoded from its header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyLength {
    /// The body is exactly this many bytes.
    Definite(u64),
    /// Old-format indeterminate length: the body runs until EOF.
    Indeterminate,
    /// New-format partial-body length: the body is split into
    /// power-of-two chunks; this is the first chunk's size. Further
    /// chunk boundaries are decoded the same way as this value was,
    /// via [`read_new_format_length`].
    Partial(usize),
}

/// Decodes an old-format length given its 2-bit length-of-length code
/// (the low two bits of the CTB).
///
/// Code `3` ("indeterminate") is the only length this function cannot
/// get wrong by construction: it consumes no further bytes and simply
/// reports [`BodyLength::Indeterminate`].
///
/// Returns the decoded length alongside the raw bytes consumed (beyond
/// the CTB itself), so callers that need to re-frame a packet verbatim
/// (see [`crate::header::read_header`]) don't have to re-derive them.
pub fn read_old_format_length<C>(len_code: u8, source: &mut dyn BufferedReader<C>)
    -> Result<(BodyLength, Vec<u8>)>
{
    Ok(match len_code {
        0 => {
            let b = source.get()?;
            (BodyLength::Definite(b as u64), vec![b])
        }
        1 => {
            let bytes = source.data_consume_hard(2)?[..2].to_vec();
            let v = u16::from_be_bytes([bytes[0], bytes[1]]);
            (BodyLength::Definite(v as u64), bytes)
        }
        2 => {
            let bytes = source.data_consume_hard(4)?[..4].to_vec();
            let v = u32::from_be_bytes(bytes[..4].try_into().unwrap());
            (BodyLength::Definite(v as u64), bytes)
        }
        3 => (BodyLength::Indeterminate, Vec::new()),
        _ => unreachable!("length-of-length code is only ever 2 bits"),
    })
}

/// Decodes a new-format length.
///
/// This is also used to decode each subsequent chunk boundary of a
/// partial-body-length body: every chunk, including the continuation
/// chunks, is introduced by a length in this same encoding, with the
/// final chunk using one of the definite forms.
///
/// Returns the decoded length alongside the raw bytes consumed, for
/// the same re-framing reason [`read_old_format_length`] does.
pub fn read_new_format_length<C>(source: &mut dyn BufferedReader<C>)
    -> Result<(BodyLength, Vec<u8>)>
{
    let c = source.get()?;
    Ok(if (c as usize) < 192 {
        (BodyLength::Definite(c as u64), vec![c])
    } else if (c as usize) < 224 {
        let next = source.get()?;
        let len = (c as usize - 192) * 256 + next as usize + 192;
        (BodyLength::Definite(len as u64), vec![c, next])
    } else if c == 255 {
        let bytes = source.data_consume_hard(4)?[..4].to_vec();
        let len = u32::from_be_bytes(bytes[..4].try_into().unwrap());
        let mut raw = vec![c];
        raw.extend_from_slice(&bytes);
        (BodyLength::Definite(len as u64), raw)
    } else {
        (BodyLength::Partial(1usize << (c & 0x1f)), vec![c])
    })
}
