//! Signature packets (tag 2): versions 2, 3, and 4.
//!
//! See [Section 5.2 of RFC 4880].
//!
//! [Section 5.2 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-5.2

use buffered_reader::BufferedReader;

use crate::error::{Error, Result};
use crate::mpi::Mpi;
use crate::packet::{Common, Signature, SignatureMaterial};
use crate::subpacket::{self, SubpacketKind};
use crate::types::{HashAlgorithm, PublicKeyAlgorithm};

/// Decodes a `Signature` body of any supported version.
pub fn decode<C>(
    common: Common,
    source: &mut dyn BufferedReader<C>,
    budget: &mut usize,
) -> Result<Signature> {
    if *budget < 1 {
        return Err(Error::invalid_in(common.tag, "empty Signature body"));
    }
    let version = source.get()?;
    *budget -= 1;
    match version {
        2 | 3 => decode_v3(common, version, source, budget),
        4 => decode_v4(common, source, budget),
        other => Err(Error::invalid_in(common.tag, format!("unsupported version {other}"))),
    }
}

fn decode_v3<C>(
    common: Common,
    version: u8,
    source: &mut dyn BufferedReader<C>,
    budget: &mut usize,
) -> Result<Signature> {
    // 1 (hashed-material length, always 5, not itself stored) + 1
    // (sig class) + 4 (timestamp) + 8 (keyid) + 1 (pubkey algo) + 1
    // (digest algo) + 2 (digest start).
    if *budget < 18 {
        return Err(Error::invalid_in(common.tag, "truncated v3 Signature body"));
    }
    let hashed_len = source.get()?;
    if hashed_len != 5 {
        return Err(Error::invalid_in(common.tag, "v3 signature hashed-material length must be 5"));
    }
    let sig_class = source.get()?;
    let timestamp = source.read_be_u32()?;
    let hi = source.read_be_u32()?;
    let lo = source.read_be_u32()?;
    let pubkey_algo = PublicKeyAlgorithm::from(source.get()?);
    let digest_algo = HashAlgorithm::from(source.get()?);
    let mut digest_start = [0u8; 2];
    digest_start[0] = source.get()?;
    digest_start[1] = source.get()?;
    *budget -= 18;
    let material = read_material(pubkey_algo, source, budget)?;
    Ok(Signature {
        common,
        version,
        sig_class,
        pubkey_algo,
        digest_algo,
        digest_start,
        timestamp,
        keyid: Some((hi, lo)),
        hashed_data: None,
        unhashed_data: None,
        material,
    })
}

fn decode_v4<C>(
    common: Common,
    source: &mut dyn BufferedReader<C>,
    budget: &mut usize,
) -> Result<Signature> {
    if *budget < 4 {
        return Err(Error::invalid_in(common.tag, "truncated v4 Signature body"));
    }
    let sig_class = source.get()?;
    let pubkey_algo = PublicKeyAlgorithm::from(source.get()?);
    let digest_algo = HashAlgorithm::from(source.get()?);
    *budget -= 3;

    let hashed_data = read_subpacket_area(source, budget)?;
    let unhashed_data = read_subpacket_area(source, budget)?;

    let mut digest_start = [0u8; 2];
    if *budget < 2 {
        return Err(Error::invalid_in(common.tag, "truncated Signature digest-start field"));
    }
    digest_start[0] = source.get()?;
    digest_start[1] = source.get()?;
    *budget -= 2;

    // A missing creation time or issuer is a soft error per this
    // parser's design (Invariant: malformed subpacket *content*, as
    // opposed to a malformed subpacket *area*, never aborts the
    // packet): both fields degrade to their documented default rather
    // than failing the whole signature.
    let timestamp = subpacket::find(&hashed_data[2..], SubpacketKind::SignatureCreationTime)
        .ok()
        .flatten()
        .map(|body| u32::from_be_bytes([body[0], body[1], body[2], body[3]]))
        .unwrap_or_else(|| {
            log::warn!("v4 signature missing signature-creation-time subpacket");
            0
        });
    let keyid = subpacket::find(&unhashed_data[2..], SubpacketKind::Issuer)
        .ok()
        .flatten()
        .map(|body| {
            let hi = u32::from_be_bytes([body[0], body[1], body[2], body[3]]);
            let lo = u32::from_be_bytes([body[4], body[5], body[6], body[7]]);
            (hi, lo)
        })
        .or_else(|| {
            log::warn!("v4 signature missing issuer subpacket");
            None
        });

    let material = read_material(pubkey_algo, source, budget)?;
    Ok(Signature {
        common,
        version: 4,
        sig_class,
        pubkey_algo,
        digest_algo,
        digest_start,
        timestamp,
        keyid,
        hashed_data: Some(hashed_data),
        unhashed_data: Some(unhashed_data),
        material,
    })
}

/// Reads a v4 subpacket area, returning it verbatim *including* its
/// 2-byte length prefix (needed later to reconstruct the exact signed
/// bytes).
fn read_subpacket_area<C>(source: &mut dyn BufferedReader<C>, budget: &mut usize) -> Result<Vec<u8>> {
    if *budget < 2 {
        return Err(Error::invalid("truncated subpacket area length"));
    }
    let len = source.read_be_u16()? as usize;
    *budget -= 2;
    if len > 10_000 {
        return Err(Error::invalid("subpacket area exceeds 10,000-byte limit"));
    }
    if len > *budget {
        return Err(Error::invalid("subpacket area exceeds packet body"));
    }
    let body = source.data_consume_hard(len)?[..len].to_vec();
    *budget -= len;
    let mut area = Vec::with_capacity(len + 2);
    area.extend_from_slice(&(len as u16).to_be_bytes());
    area.extend_from_slice(&body);
    Ok(area)
}

fn read_material<C>(
    pubkey_algo: PublicKeyAlgorithm,
    source: &mut dyn BufferedReader<C>,
    budget: &mut usize,
) -> Result<Option<SignatureMaterial>> {
    Ok(match pubkey_algo {
        PublicKeyAlgorithm::RsaEncryptSign | PublicKeyAlgorithm::RsaSignOnly => {
            Some(SignatureMaterial::Rsa { s: Mpi::parse(source, budget)? })
        }
        PublicKeyAlgorithm::Dsa => {
            let r = Mpi::parse(source, budget)?;
            let s = Mpi::parse(source, budget)?;
            Some(SignatureMaterial::Dsa { r, s })
        }
        PublicKeyAlgorithm::ElgamalEncryptSign => {
            let r = Mpi::parse(source, budget)?;
            let s = Mpi::parse(source, budget)?;
            Some(SignatureMaterial::Elgamal { r, s })
        }
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::length::BodyLength;
    use crate::packet::Tag;
    use buffered_reader::Memory;

    fn common(len: usize) -> Common {
        Common { tag: Tag::Signature, header_len: 2, length: BodyLength::Definite(len as u64) }
    }

    #[test]
    fn decodes_v3() {
        let mut bytes = vec![5u8 /* hashed-material length, fixed */, 0x00 /* sig class */];
        bytes.extend_from_slice(&[0, 0, 0, 9]); // timestamp
        bytes.extend_from_slice(&[0, 0, 0, 1]);
        bytes.extend_from_slice(&[0, 0, 0, 2]);
        bytes.push(1); // RSA
        bytes.push(2); // SHA-1
        bytes.extend_from_slice(&[0xaa, 0xbb]);
        bytes.extend_from_slice(&[0, 2, 0x03]); // MPI
        let mut src = Memory::new(&bytes);
        let mut budget = bytes.len();
        let pkt = decode_v3(common(bytes.len()), 3, &mut src, &mut budget).unwrap();
        assert_eq!(pkt.timestamp, 9);
        assert_eq!(pkt.keyid, Some((1, 2)));
        // Exercises the exact 18-fixed-byte budget accounting: a wrong
        // subtraction here would leave a stray byte rather than 0.
        assert_eq!(budget, 0);
    }

    #[test]
    fn v4_missing_issuer_is_soft_error() {
        let mut bytes = vec![0u8 /* sig class */, 1 /* RSA */, 2 /* SHA1 */];
        bytes.extend_from_slice(&[0, 0]); // empty hashed area
        bytes.extend_from_slice(&[0, 0]); // empty unhashed area
        bytes.extend_from_slice(&[0xaa, 0xbb]); // digest start
        bytes.extend_from_slice(&[0, 2, 0x03]); // MPI
        let mut src = Memory::new(&bytes);
        let mut budget = bytes.len();
        let pkt = decode_v4(common(bytes.len()), &mut src, &mut budget).unwrap();
        assert_eq!(pkt.timestamp, 0);
        assert_eq!(pkt.keyid, None);
        assert_eq!(budget, 0);
    }

    #[test]
    fn rejects_subpacket_area_over_10_000_bytes() {
        let mut bytes = vec![0u8 /* sig class */, 1 /* RSA */, 2 /* SHA1 */];
        bytes.extend_from_slice(&[0x27, 0x11]); // hashed area length: 10001
        bytes.extend(std::iter::repeat(0u8).take(10_001));
        let mut src = Memory::new(&bytes);
        let mut budget = bytes.len();
        assert!(decode_v4(common(bytes.len()), &mut src, &mut budget).is_err());
    }
}
