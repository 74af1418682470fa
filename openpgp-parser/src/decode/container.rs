//! The two packet types whose body is itself a nested byte stream
//! rather than a record of fields: Compressed Data (tag 8) and
//! Symmetrically Encrypted Data (tags 9 and 18).
//!
//! Like [`super::literal`], these decoders only read the handful of
//! bytes that precede the nested stream and leave the shared reader
//! positioned at (and armed for) the rest, which the caller streams
//! out explicitly rather than having this crate recurse into it.

use crate::error::{Error, Result};
use crate::packet::{Common, CompressedData, Encrypted};
use crate::reader::Reader;
use crate::types::CompressionAlgorithm;

/// Decodes a `CompressedData` packet's one-byte algorithm identifier.
/// On return, `source` is positioned at the start of the compressed
/// stream itself.
pub fn decode_compressed(common: Common, source: &mut Reader) -> Result<CompressedData> {
    let algo = CompressionAlgorithm::from(source.get()?);
    Ok(CompressedData { common, algo })
}

/// Validates a `SymmetricallyEncrypted`/`Seip` packet's declared
/// length and produces its header record. Neither tag has any fields
/// of its own to read: `mdc` (distinguishing tag 18 from tag 9) is
/// entirely a function of which tag was seen, not of the body.
///
/// A definite-length body shorter than 10 bytes cannot hold even a
/// single cipher block plus the 2-byte quick-check prefix RFC 4880's
/// symmetric encryption uses, so it is rejected up front rather than
/// handed to a caller that will find nothing useful in it.
pub fn decode_encrypted(common: Common, mdc: bool) -> Result<Encrypted> {
    if let crate::length::BodyLength::Definite(len) = common.length {
        if len < 10 {
            return Err(Error::invalid_in(common.tag, "encrypted body too short to contain a cipher block"));
        }
    }
    Ok(Encrypted { common, mdc })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::length::BodyLength;
    use crate::packet::Tag;
    use buffered_reader::Memory;

    #[test]
    fn decodes_compression_algorithm() {
        let mem = Memory::new(&[2u8]); // ZLIB
        let mut reader = Reader::new(Box::new(mem));
        let common = Common { tag: Tag::CompressedData, header_len: 2, length: BodyLength::Definite(1) };
        let pkt = decode_compressed(common, &mut reader).unwrap();
        assert_eq!(pkt.algo, CompressionAlgorithm::Zlib);
    }

    #[test]
    fn rejects_too_short_encrypted_body() {
        let common = Common { tag: Tag::Seip, header_len: 2, length: BodyLength::Definite(3) };
        assert!(decode_encrypted(common, true).is_err());
    }

    #[test]
    fn accepts_indeterminate_length_encrypted_body() {
        let common = Common { tag: Tag::SymmetricallyEncrypted, header_len: 1, length: BodyLength::Indeterminate };
        let pkt = decode_encrypted(common, false).unwrap();
        assert!(!pkt.mdc);
    }
}
