//! String-to-key specifier decoding, shared by
//! [`super::skesk`] and [`super::cert`] (a protected secret key uses
//! exactly the same specifier to derive its passphrase key).
//!
//! This parser's mode space is `{0, 1, 4}`, not RFC 4880's `{0, 1, 3}`,
//! and mode 4's iteration count is a raw 4-byte big-endian integer, not
//! RFC 4880's one-byte coded form. Both are taken directly from this
//! crate's governing specification and preserved deliberately rather
//! than "corrected" to match the RFC; see the open question recorded
//! in `DESIGN.md`.

use buffered_reader::BufferedReader;

use crate::error::{Error, Result};
use crate::types::{HashAlgorithm, S2K};

/// Reads one S2K specifier, decrementing `budget`.
pub fn parse<C>(source: &mut dyn BufferedReader<C>, budget: &mut usize) -> Result<S2K> {
    if *budget < 2 {
        return Err(Error::invalid("truncated S2K specifier"));
    }
    let mode = source.get()?;
    let hash = HashAlgorithm::from(source.get()?);
    *budget -= 2;
    match mode {
        0 => Ok(S2K::Simple { hash }),
        1 => {
            let salt = read_salt(source, budget)?;
            Ok(S2K::Salted { hash, salt })
        }
        4 => {
            let salt = read_salt(source, budget)?;
            if *budget < 4 {
                return Err(Error::invalid("truncated S2K iteration count"));
            }
            let count = source.read_be_u32()?;
            *budget -= 4;
            Ok(S2K::Iterated { hash, salt, count })
        }
        other => Err(Error::invalid(format!("unsupported S2K mode {other}"))),
    }
}

fn read_salt<C>(source: &mut dyn BufferedReader<C>, budget: &mut usize) -> Result<[u8; 8]> {
    if *budget < 8 {
        return Err(Error::invalid("truncated S2K salt"));
    }
    let bytes = source.data_consume_hard(8)?[..8].to_vec();
    *budget -= 8;
    let mut salt = [0u8; 8];
    salt.copy_from_slice(&bytes);
    Ok(salt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use buffered_reader::Memory;

    #[test]
    fn parses_simple() {
        let mut src = Memory::new(&[0, 2]); // mode 0, SHA-1
        let mut budget = 2usize;
        let s2k = parse(&mut src, &mut budget).unwrap();
        assert_eq!(s2k, S2K::Simple { hash: HashAlgorithm::Sha1 });
        assert_eq!(budget, 0);
    }

    #[test]
    fn parses_iterated() {
        let mut bytes = vec![4, 2];
        bytes.extend_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);
        bytes.extend_from_slice(&[0, 1, 0, 0]); // count = 65536
        let mut src = Memory::new(&bytes);
        let mut budget = bytes.len();
        let s2k = parse(&mut src, &mut budget).unwrap();
        match s2k {
            S2K::Iterated { hash, salt, count } => {
                assert_eq!(hash, HashAlgorithm::Sha1);
                assert_eq!(salt, [1, 2, 3, 4, 5, 6, 7, 8]);
                assert_eq!(count, 65536);
            }
            _ => panic!("expected Iterated"),
        }
        assert_eq!(budget, 0);
    }

    #[test]
    fn rejects_unsupported_mode() {
        let mut src = Memory::new(&[3, 2, 1, 2, 3, 4, 5, 6, 7, 8]);
        let mut budget = 10usize;
        assert!(parse(&mut src, &mut budget).is_err());
    }

    #[test]
    fn rejects_truncated_iteration_count() {
        let mut bytes = vec![4, 2];
        bytes.extend_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);
        bytes.extend_from_slice(&[0, 1]); // only 2 of 4 count bytes
        let mut src = Memory::new(&bytes);
        let mut budget = bytes.len();
        assert!(parse(&mut src, &mut budget).is_err());
    }
}
