//! Property-based tests for the two invariants that aren't naturally
//! expressed as a handful of literal fixtures: the length budget (every
//! successful decode consumes exactly header bytes plus declared body
//! length) and malformed rejection (a body truncated by one byte never
//! decodes successfully).

use buffered_reader::Memory;
use openpgp_parser::{Packet, PacketDispatcher, Reader, Status};
use quickcheck::QuickCheck;

/// Encodes `len` using the new-format definite-length encoding, for
/// `len` small enough to need at most the two-byte form (this module
/// only exercises `len < 8384`).
fn encode_new_format_length(len: usize) -> Vec<u8> {
    if len < 192 {
        vec![len as u8]
    } else {
        let len = len - 192;
        vec![192 + (len / 256) as u8, (len % 256) as u8]
    }
}

/// Builds a new-format User ID packet (tag 13) around `body`.
fn user_id_packet(body: &[u8]) -> Vec<u8> {
    let mut bytes = vec![0xCD];
    bytes.extend(encode_new_format_length(body.len()));
    bytes.extend_from_slice(body);
    bytes
}

fn dispatcher(bytes: &[u8]) -> PacketDispatcher<'_> {
    PacketDispatcher::new(Reader::new(Box::new(Memory::new(bytes))))
}

/// Item 1: for every successfully decoded packet with a definite
/// length, the bytes consumed from the stream between header-start and
/// dispatcher-return equal the header length plus the declared body
/// length — here, simply the whole single-packet stream, since nothing
/// follows it.
#[test]
fn length_budget_matches_declared_length() {
    fn prop(body: Vec<u8>) -> bool {
        let body = &body[..body.len().min(300)];
        let bytes = user_id_packet(body);
        let mut d = dispatcher(&bytes);
        let decoded = match d.parse_one() {
            Ok(Status::Decoded(Packet::UserId(p))) => p.value == body,
            _ => false,
        };
        decoded && d.reader_mut().tell() == bytes.len() as u64
    }
    QuickCheck::new().tests(200).quickcheck(prop as fn(Vec<u8>) -> bool);
}

/// Item 5: truncating a valid packet's body by one byte never yields a
/// successful decode — only an error (`Error::InvalidPacket` for the
/// old-format/definite-length short read, or `Error::ReadError` when
/// the underlying stream itself runs dry first).
#[test]
fn truncated_body_never_decodes() {
    fn prop(body: Vec<u8>) -> bool {
        // Need at least one body byte to remove for a meaningful truncation.
        if body.is_empty() {
            return true;
        }
        let body = &body[..body.len().min(300).max(1)];
        let bytes = user_id_packet(body);
        let truncated = &bytes[..bytes.len() - 1];
        let mut d = dispatcher(truncated);
        !matches!(d.parse_one(), Ok(Status::Decoded(_)))
    }
    QuickCheck::new().tests(200).quickcheck(prop as fn(Vec<u8>) -> bool);
}
