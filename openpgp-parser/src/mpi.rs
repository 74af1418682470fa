//! The MPI (multi-precision integer) wire format.
//!
//! Per spec, the MPI codec proper is an external collaborator: this
//! parser only needs its stream contract (read one MPI given a
//! remaining-byte budget, and report how many bytes it consumed). No
//! crate in the retrieval pack exposes that contract standalone, so it
//! is implemented here the way the teacher's own `crypto::mpi::MPI`
//! does it (see `dirkz-sequoia/openpgp/src/parse/mpis.rs`): a two-byte
//! bit-count prefix followed by `ceil(bits / 8)` big-endian bytes. This
//! module does not interpret the integer; it only frames it.

use crate::error::{Error, Result};
use buffered_reader::BufferedReader;

/// A multi-precision integer: a bit count and its big-endian value.
///
/// See [Section 3.2 of RFC 4880] for the wire format.
///
/// [Section 3.2 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-3.2
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Mpi {
    bits: u16,
    value: Box<[u8]>,
}

impl std::fmt::Debug for Mpi {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Mpi")
            .field("bits", &self.bits)
            .field("bytes", &self.value.len())
            .finish()
    }
}

impl Mpi {
    /// The number of significant bits, as encoded on the wire.
    pub fn bits(&self) -> u16 {
        self.bits
    }

    /// The big-endian value, `ceil(bits / 8)` bytes long.
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// Reads one MPI from `source`, decrementing `budget` by the
    /// number of bytes consumed.
    ///
    /// Never reads beyond `*budget` bytes; returns
    /// [`Error::InvalidPacket`] if the MPI's declared length would
    /// exceed it.
    pub fn parse<C>(source: &mut dyn BufferedReader<C>, budget: &mut usize)
        -> Result<Mpi>
    {
        if *budget < 2 {
            return Err(Error::invalid("truncated MPI length"));
        }
        let bits = source.read_be_u16()?;
        let len = ((bits as usize) + 7) / 8;
        if len > *budget - 2 {
            return Err(Error::invalid("MPI exceeds packet body"));
        }
        let value = if len == 0 {
            Vec::new()
        } else {
            source.data_consume_hard(len)?[..len].to_vec()
        };
        *budget -= 2 + len;
        Ok(Mpi { bits, value: value.into_boxed_slice() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buffered_reader::Memory;

    #[test]
    fn parses_the_number_two() {
        let mut src = Memory::new(b"\x00\x02\x02");
        let mut budget = 3usize;
        let mpi = Mpi::parse(&mut src, &mut budget).unwrap();
        assert_eq!(mpi.bits(), 2);
        assert_eq!(mpi.value(), &[2]);
        assert_eq!(budget, 0);
    }

    #[test]
    fn rejects_mpi_past_budget() {
        let mut src = Memory::new(b"\x00\x20\x01\x02");
        let mut budget = 4usize;
        assert!(Mpi::parse(&mut src, &mut budget).is_err());
    }
}
