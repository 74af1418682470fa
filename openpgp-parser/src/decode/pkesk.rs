//! Public-key encrypted session key packets (tag 1).
//!
//! See [Section 5.1 of RFC 4880].
//!
//! [Section 5.1 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-5.1

use buffered_reader::BufferedReader;

use crate::error::{Error, Result};
use crate::mpi::Mpi;
use crate::packet::{Ciphertext, Common, PubkeyEnc};
use crate::types::PublicKeyAlgorithm;

/// Decodes a `PubkeyEnc` body.
pub fn decode<C>(
    common: Common,
    source: &mut dyn BufferedReader<C>,
    budget: &mut usize,
) -> Result<PubkeyEnc> {
    if *budget < 9 {
        return Err(Error::invalid_in(common.tag, "truncated PubkeyEnc header"));
    }
    let version = source.get()?;
    *budget -= 1;
    if version != 2 && version != 3 {
        return Err(Error::invalid_in(common.tag, format!("unsupported version {version}")));
    }
    let hi = source.read_be_u32()?;
    let lo = source.read_be_u32()?;
    *budget -= 8;
    let pubkey_algo = PublicKeyAlgorithm::from(source.get()?);
    *budget -= 1;
    let material = match pubkey_algo {
        PublicKeyAlgorithm::RsaEncryptSign | PublicKeyAlgorithm::RsaEncryptOnly => {
            Some(Ciphertext::Rsa { c: Mpi::parse(source, budget)? })
        }
        PublicKeyAlgorithm::ElgamalEncryptOnly | PublicKeyAlgorithm::ElgamalEncryptSign => {
            let a = Mpi::parse(source, budget)?;
            let b = Mpi::parse(source, budget)?;
            Some(Ciphertext::Elgamal { a, b })
        }
        _ => None,
    };
    Ok(PubkeyEnc {
        common,
        version,
        keyid: (hi, lo),
        pubkey_algo,
        material,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::length::BodyLength;
    use crate::packet::Tag;
    use buffered_reader::Memory;

    #[test]
    fn decodes_rsa() {
        let mut bytes = vec![3u8];
        bytes.extend_from_slice(&[0, 0, 0, 1]);
        bytes.extend_from_slice(&[0, 0, 0, 2]);
        bytes.push(1); // RSA encrypt-or-sign
        bytes.extend_from_slice(&[0, 2, 0x02]); // MPI: 2 bits, value 0x02
        let mut src = Memory::new(&bytes);
        let common = Common { tag: crate::packet::Tag::PubkeyEnc, header_len: 2, length: BodyLength::Definite(bytes.len() as u64) };
        let mut budget = bytes.len();
        let pkt = decode(common, &mut src, &mut budget).unwrap();
        assert_eq!(pkt.keyid, (1, 2));
        match pkt.material {
            Some(Ciphertext::Rsa { c }) => assert_eq!(c.value(), &[2]),
            _ => panic!("expected RSA ciphertext"),
        }
        assert_eq!(budget, 0);
    }
}
