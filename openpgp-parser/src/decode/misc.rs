//! The simplest packet bodies: raw byte blobs with no internal
//! structure (User ID, Comment, and the historical RFC 1991 Comment),
//! plus Ring Trust, which has no corresponding [`crate::packet::Packet`]
//! variant at all.

use buffered_reader::BufferedReader;

use crate::error::Result;
use crate::packet::{Comment, Common, UserId};

/// Decodes a `UserId` body: the entire body is the UTF-8-ish user ID
/// string, stored verbatim without validating encoding (a malformed
/// User ID is not this parser's concern to reject).
pub fn decode_user_id<C>(
    common: Common,
    source: &mut dyn BufferedReader<C>,
    budget: &mut usize,
) -> Result<UserId> {
    let value = read_rest(source, budget)?;
    Ok(UserId { common, value })
}

/// Decodes a `Comment` body (used for both the modern and RFC
/// 1991-era private-use comment packets; which one is recorded in
/// `common.tag`).
pub fn decode_comment<C>(
    common: Common,
    source: &mut dyn BufferedReader<C>,
    budget: &mut usize,
) -> Result<Comment> {
    let value = read_rest(source, budget)?;
    Ok(Comment { common, value })
}

/// Reads a Ring Trust packet's single flag byte.
///
/// There is no `Packet::RingTrust` variant: per this parser's design,
/// ring trust is GnuPG-private keyring bookkeeping that list mode
/// prints but that otherwise produces no packet at all (see
/// [`crate::dispatch`]). This function exists purely so the dispatcher
/// has something to call for that printing.
pub fn decode_ring_trust<C>(source: &mut dyn BufferedReader<C>, budget: &mut usize) -> Result<u8> {
    if *budget == 0 {
        return Ok(0);
    }
    let flag = source.get()?;
    *budget -= 1;
    Ok(flag)
}

fn read_rest<C>(source: &mut dyn BufferedReader<C>, budget: &mut usize) -> Result<Vec<u8>> {
    let n = *budget;
    let bytes = if n == 0 {
        Vec::new()
    } else {
        source.data_consume_hard(n)?[..n].to_vec()
    };
    *budget = 0;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::length::BodyLength;
    use crate::packet::Tag;
    use buffered_reader::Memory;

    #[test]
    fn decodes_user_id() {
        let mut src = Memory::new(b"alice@example.org");
        let common = Common { tag: Tag::UserId, header_len: 2, length: BodyLength::Definite(18) };
        let mut budget = 18usize;
        let pkt = decode_user_id(common, &mut src, &mut budget).unwrap();
        assert_eq!(pkt.value, b"alice@example.org");
        assert_eq!(budget, 0);
    }

    #[test]
    fn ring_trust_reads_flag() {
        let mut src = Memory::new(&[0x01]);
        let mut budget = 1usize;
        assert_eq!(decode_ring_trust(&mut src, &mut budget).unwrap(), 1);
        assert_eq!(budget, 0);
    }
}
