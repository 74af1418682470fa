//! Symmetric-key encrypted session key packets (tag 3).
//!
//! See [Section 5.3 of RFC 4880].
//!
//! [Section 5.3 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-5.3

use buffered_reader::BufferedReader;

use super::s2k;
use crate::error::{Error, Result};
use crate::packet::{Common, SymkeyEnc};
use crate::types::SymmetricAlgorithm;

/// Decodes a `SymkeyEnc` body, given its already-read [`Common`]
/// header and a budget equal to the packet's declared length.
pub fn decode<C>(
    common: Common,
    source: &mut dyn BufferedReader<C>,
    budget: &mut usize,
) -> Result<SymkeyEnc> {
    if *budget < 2 {
        return Err(Error::invalid_in(common.tag, "truncated SymkeyEnc header"));
    }
    let version = source.get()?;
    *budget -= 1;
    if version != 4 {
        return Err(Error::invalid_in(common.tag, format!("unsupported version {version}")));
    }
    let cipher_algo = SymmetricAlgorithm::from(source.get()?);
    *budget -= 1;
    let s2k_spec = s2k::parse(source, budget)?;
    if *budget > 196 {
        return Err(Error::invalid_in(common.tag, "session key exceeds 196-byte limit"));
    }
    let session_key = if *budget > 0 {
        let n = *budget;
        source.data_consume_hard(n)?[..n].to_vec()
    } else {
        Vec::new()
    };
    *budget = 0;
    Ok(SymkeyEnc {
        common,
        version,
        cipher_algo,
        s2k: s2k_spec,
        session_key,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::length::BodyLength;
    use crate::packet::Tag;
    use buffered_reader::Memory;

    #[test]
    fn decodes_unwrapped_key() {
        let bytes = [4u8, 9 /* AES-256 */, 0 /* S2K mode 0 */, 2 /* SHA-1 */];
        let mut src = Memory::new(&bytes);
        let common = Common { tag: Tag::SymkeyEnc, header_len: 2, length: BodyLength::Definite(4) };
        let mut budget = bytes.len();
        let pkt = decode(common, &mut src, &mut budget).unwrap();
        assert_eq!(pkt.cipher_algo, SymmetricAlgorithm::Aes256);
        assert!(pkt.session_key.is_empty());
        assert_eq!(budget, 0);
    }

    #[test]
    fn rejects_session_key_over_196_bytes() {
        let mut bytes = vec![4u8, 9, 0, 2];
        bytes.extend(std::iter::repeat(0u8).take(197));
        let mut src = Memory::new(&bytes);
        let common = Common {
            tag: Tag::SymkeyEnc,
            header_len: 2,
            length: BodyLength::Definite(bytes.len() as u64),
        };
        let mut budget = bytes.len();
        assert!(decode(common, &mut src, &mut budget).is_err());
    }
}
