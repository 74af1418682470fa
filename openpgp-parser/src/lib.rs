//! A lenient OpenPGP packet parser covering the RFC 1991 / RFC 2440
//! era wire format, with v4 signature subpacket extensions.
//!
//! This crate frames and decodes the packet types listed in
//! [`packet::Tag`]; it does not implement cryptography, signature
//! verification, or OpenPGP message *production* — see each module's
//! documentation for the narrow external interfaces it expects
//! instead ([`buffered_reader::BufferedReader`] for the byte stream,
//! [`mpi::Mpi`] for the big-integer codec).
//!
//! The top-level entry point is [`dispatch::PacketDispatcher`]; build
//! one from a [`reader::Reader`] wrapping any
//! [`buffered_reader::BufferedReader`] and call
//! [`dispatch::PacketDispatcher::parse_one`] in a loop.

pub mod decode;
pub mod dispatch;
pub mod error;
pub mod header;
pub mod length;
pub mod list;
pub mod mpi;
pub mod packet;
pub mod reader;
pub mod subpacket;
pub mod types;

pub use dispatch::{PacketDispatcher, Status};
pub use error::{Error, Result};
pub use packet::{Packet, Tag};
pub use reader::Reader;

use subpacket::SubpacketKind;

/// Looks up the first subpacket of `kind` in a v4 signature's hashed
/// or unhashed subpacket area, as stored verbatim (including its
/// 2-byte length prefix) in [`packet::Signature::hashed_data`] /
/// [`packet::Signature::unhashed_data`].
///
/// Returns `Ok(None)` if no subpacket of that kind is present; an
/// `Err` only for a structurally malformed area (a length that runs
/// past the buffer, or a known subpacket type whose payload is too
/// short — see [`subpacket::for_each`]).
pub fn parse_subpacket(area: &[u8], kind: SubpacketKind) -> Result<Option<&[u8]>> {
    let body = area.get(2..).unwrap_or(&[]);
    subpacket::find(body, kind)
}

/// Pretty-prints every subpacket in `area` (see [`parse_subpacket`]
/// for the expected buffer shape) under list mode; a no-op otherwise.
pub fn list_subpackets(area: &[u8]) {
    list::print_subpacket_area(area)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_subpacket_finds_issuer() {
        let mut area = Vec::new();
        area.extend_from_slice(&[0, 10]); // total length
        area.push(9); // subpacket length: type byte + 8-byte keyid
        area.push(16); // Issuer
        area.extend_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);
        let found = parse_subpacket(&area, SubpacketKind::Issuer).unwrap();
        assert_eq!(found, Some(&[1, 2, 3, 4, 5, 6, 7, 8][..]));
    }

    #[test]
    fn parse_subpacket_absent_is_not_an_error() {
        let area = [0u8, 0];
        assert_eq!(parse_subpacket(&area, SubpacketKind::Issuer).unwrap(), None);
    }
}
