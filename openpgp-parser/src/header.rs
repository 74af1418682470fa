//! Packet header (CTB) parsing: old- vs. new-format dispatch and the
//! length encoding that follows it.
//!
//! See [Section 4.2 of RFC 4880].
//!
//! [Section 4.2 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-4.2

use buffered_reader::BufferedReader;

use crate::error::{Error, Result};
use crate::length::{read_new_format_length, read_old_format_length, BodyLength};
use crate::packet::Tag;

/// A parsed packet header: its type, declared length, how many bytes
/// the CTB plus length encoding occupied, and those bytes verbatim
/// (needed to re-frame the packet byte-for-byte in copy mode; see
/// [`crate::dispatch::PacketDispatcher::copy_all`]).
#[derive(Debug, Clone)]
pub struct Header {
    pub tag: Tag,
    pub length: BodyLength,
    pub header_len: usize,
    pub header_bytes: Vec<u8>,
}

/// Reads one packet header from `source`.
///
/// The high bit of the CTB (0x80) must always be set; bit 6 (0x40)
/// selects new format. Old-format headers pack the packet type into
/// bits 2-5 and the length-of-length code into bits 0-1; new-format
/// headers use all 6 low bits for the packet type and read a separate
/// variable-length encoding (see [`crate::length`]).
pub fn read_header<C>(source: &mut dyn BufferedReader<C>) -> Result<Header> {
    let ctb = source.get()?;
    if ctb & 0x80 == 0 {
        return Err(Error::invalid("CTB missing high bit"));
    }
    let mut header_bytes = vec![ctb];
    let (tag, length) = if ctb & 0x40 != 0 {
        let tag = Tag::from(ctb & 0x3f);
        let (length, rest) = read_new_format_length(source)?;
        header_bytes.extend_from_slice(&rest);
        (tag, length)
    } else {
        let tag = Tag::from((ctb >> 2) & 0x0f);
        let len_code = ctb & 0x03;
        let (length, rest) = read_old_format_length(len_code, source)?;
        header_bytes.extend_from_slice(&rest);
        (tag, length)
    };
    let header_len = header_bytes.len();
    Ok(Header { tag, length, header_len, header_bytes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use buffered_reader::Memory;

    #[test]
    fn old_format_one_byte_length() {
        // Tag 6 (PublicCert), one-byte length of 5.
        let mem = Memory::new(&[0x98, 0x05]);
        let mut src = mem;
        let h = read_header(&mut src).unwrap();
        assert_eq!(h.tag, Tag::PublicCert);
        assert_eq!(h.length, BodyLength::Definite(5));
        assert_eq!(h.header_len, 2);
    }

    #[test]
    fn new_format_one_byte_length() {
        // Tag 13 (UserId) in new format, one-byte length of 3.
        let mem = Memory::new(&[0xcd, 0x03]);
        let mut src = mem;
        let h = read_header(&mut src).unwrap();
        assert_eq!(h.tag, Tag::UserId);
        assert_eq!(h.length, BodyLength::Definite(3));
        assert_eq!(h.header_len, 2);
    }

    #[test]
    fn rejects_missing_high_bit() {
        let mem = Memory::new(&[0x00]);
        let mut src = mem;
        assert!(read_header(&mut src).is_err());
    }
}
