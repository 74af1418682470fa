//! The top-level packet dispatcher: the single control point that
//! decides, for each packet header it reads, whether to decode it,
//! skip it, or copy it verbatim to an output sink.
//!
//! Every public operation here ([`PacketDispatcher::parse_one`],
//! [`PacketDispatcher::search_for`], [`PacketDispatcher::copy_all`],
//! [`PacketDispatcher::copy_some`], [`PacketDispatcher::skip_n`])
//! composes on the same low-level attempt, [`PacketDispatcher::dispatch`],
//! which implements §4.2's five-step decision procedure exactly once
//! per packet header.

use std::io::Write;

use crate::decode;
use crate::error::{Error, Result};
use crate::header::{self, Header};
use crate::length::BodyLength;
use crate::packet::{Common, Packet, Tag};
use crate::reader::Reader;

/// The result of a completed top-level call: either a packet was
/// decoded, or the stream ended cleanly before the next header.
///
/// Mirrors §6's `{0, -1}` return-code pair; the positive "error" arm of
/// that contract is simply this type's `Err` case, reported through
/// [`crate::error::Error`] instead of a bare status code.
#[derive(Debug)]
pub enum Status {
    /// A packet was fully decoded.
    Decoded(Packet),
    /// Clean end of stream: no bytes remained before the next header.
    Eof,
}

/// The outcome of a single low-level attempt to advance past one
/// packet header. Every public operation loops over this until it
/// stops being [`Attempt::Skipped`].
enum Attempt {
    Decoded(Packet),
    /// The packet was skipped, copied to a sink, or decoded into
    /// nothing (Ring Trust, the legacy `'#'`-comment quirk) — in every
    /// case, the caller's loop should simply try the next packet.
    Skipped,
    Eof,
}

/// The stateful top-level dispatcher, wrapping the single
/// [`Reader`] shared across an entire packet sequence.
pub struct PacketDispatcher<'a> {
    reader: Reader<'a>,
}

impl<'a> PacketDispatcher<'a> {
    /// Wraps `reader` for dispatch.
    pub fn new(reader: Reader<'a>) -> Self {
        PacketDispatcher { reader }
    }

    /// Direct access to the underlying reader, e.g. to drain a
    /// streamed body ([`Packet::Literal`], [`Packet::CompressedData`],
    /// [`Packet::Encrypted`]) after a `Decoded` result.
    pub fn reader_mut(&mut self) -> &mut Reader<'a> {
        &mut self.reader
    }

    /// Parses and returns the next packet, skipping packet types this
    /// crate has no decoder for and the reserved type-0 "deleted"
    /// packets, per Invariants 4 and 5.
    pub fn parse_one(&mut self) -> Result<Status> {
        loop {
            match self.dispatch(None, false, None)? {
                Attempt::Decoded(packet) => return Ok(Status::Decoded(packet)),
                Attempt::Eof => return Ok(Status::Eof),
                Attempt::Skipped => continue,
            }
        }
    }

    /// Parses packets, skipping any whose type is not `tag`, until one
    /// matches or the stream ends.
    pub fn search_for(&mut self, tag: Tag) -> Result<Status> {
        loop {
            match self.dispatch(Some(tag), false, None)? {
                Attempt::Decoded(packet) => return Ok(Status::Decoded(packet)),
                Attempt::Eof => return Ok(Status::Eof),
                Attempt::Skipped => continue,
            }
        }
    }

    /// Copies every remaining packet (header bytes verbatim, then body
    /// per §4.7's policy) to `sink`, until the stream ends.
    pub fn copy_all(&mut self, sink: &mut dyn Write) -> Result<()> {
        loop {
            match self.dispatch(None, false, Some(&mut *sink))? {
                Attempt::Eof => return Ok(()),
                Attempt::Skipped => continue,
                Attempt::Decoded(_) => unreachable!("dispatch never decodes when a sink is given"),
            }
        }
    }

    /// Like [`PacketDispatcher::copy_all`], but stops before reading
    /// the next header once the reader's offset reaches
    /// `stop_offset`.
    pub fn copy_some(&mut self, sink: &mut dyn Write, stop_offset: u64) -> Result<()> {
        loop {
            if self.reader.tell() >= stop_offset {
                return Ok(());
            }
            match self.dispatch(None, false, Some(&mut *sink))? {
                Attempt::Eof => return Ok(()),
                Attempt::Skipped => continue,
                Attempt::Decoded(_) => unreachable!("dispatch never decodes when a sink is given"),
            }
        }
    }

    /// Skips exactly `n` packets (or until the stream ends, whichever
    /// comes first), hard-skipping regardless of type.
    pub fn skip_n(&mut self, n: usize) -> Result<()> {
        for _ in 0..n {
            if matches!(self.dispatch(None, true, None)?, Attempt::Eof) {
                return Ok(());
            }
        }
        Ok(())
    }

    /// Implements §4.2's five-step procedure for a single packet
    /// header.
    fn dispatch(
        &mut self,
        required_type: Option<Tag>,
        hard_skip: bool,
        sink: Option<&mut dyn Write>,
    ) -> Result<Attempt> {
        self.reader.set_normal_mode();

        let header = match self.read_header_or_eof()? {
            None => return Ok(Attempt::Eof),
            Some(h) => h,
        };
        let zero_type = matches!(header.tag, Tag::Unknown(0));

        if !zero_type {
            if let Some(sink) = sink {
                sink.write_all(&header.header_bytes).map_err(Error::WriteError)?;
                let body = self.read_body(header.length, header.tag)?;
                sink.write_all(&body).map_err(Error::WriteError)?;
                return Ok(Attempt::Skipped);
            }
        }

        if hard_skip || zero_type || required_type.is_some_and(|t| t != header.tag) {
            let body = self.read_body(header.length, header.tag)?;
            if !zero_type {
                crate::list::hex_dump(&body);
            }
            return Ok(Attempt::Skipped);
        }

        if !decode::has_decoder(header.tag) {
            let body = self.read_body(header.length, header.tag)?;
            crate::list::hex_dump(&body);
            return Ok(Attempt::Skipped);
        }

        let common = Common { tag: header.tag, header_len: header.header_len, length: header.length };

        if decode::is_streaming(header.tag) {
            self.arm_streaming_mode(&header);
            let packet = decode::dispatch_streaming(common, &mut self.reader)?;
            crate::list::print_packet(&packet);
            return Ok(Attempt::Decoded(packet));
        }

        let body = self.read_body(header.length, header.tag)?;
        let mut budget = body.len();
        let mut mem = buffered_reader::Memory::new(&body);
        match decode::dispatch_payload(common, &mut mem, &mut budget) {
            Ok(Some(packet)) => {
                crate::list::print_packet(&packet);
                Ok(Attempt::Decoded(packet))
            }
            Ok(None) => Ok(Attempt::Skipped),
            Err(e) => Err(e),
        }
    }

    /// Reads one packet header, or reports clean end of stream if not
    /// even a single byte is available.
    fn read_header_or_eof(&mut self) -> Result<Option<Header>> {
        if self.reader.inner_mut().data(1)?.is_empty() {
            return Ok(None);
        }
        Ok(Some(header::read_header(self.reader.inner_mut())?))
    }

    /// Arms the reader's mode-aware interface for a streaming packet's
    /// nested body, per the descriptor its header declared.
    fn arm_streaming_mode(&mut self, header: &Header) {
        match header.length {
            BodyLength::Definite(n) => self.reader.set_bounded_mode(n),
            BodyLength::Indeterminate => {
                self.reader.set_block_mode(header.tag == Tag::CompressedData)
            }
            BodyLength::Partial(first_chunk) => self.reader.set_partial_block_mode(first_chunk),
        }
    }

    /// Reads an entire packet body verbatim, per §4.7's three-way
    /// policy, leaving the reader in normal mode afterward. Used for
    /// every non-streaming tag, whether it will be decoded, skipped,
    /// or copied — the body bytes are the same regardless of what
    /// happens to them next.
    fn read_body(&mut self, length: BodyLength, tag: Tag) -> Result<Vec<u8>> {
        match length {
            BodyLength::Definite(n) => {
                let n = n as usize;
                Ok(self.reader.inner_mut().data_consume_hard(n)?[..n].to_vec())
            }
            BodyLength::Indeterminate => {
                self.reader.set_block_mode(tag == Tag::CompressedData);
                let mut out = Vec::new();
                self.reader.copy_all(&mut out)?;
                self.reader.set_normal_mode();
                Ok(out)
            }
            BodyLength::Partial(first_chunk) => {
                self.reader.set_partial_block_mode(first_chunk);
                let mut out = Vec::new();
                self.reader.copy_all(&mut out)?;
                self.reader.set_normal_mode();
                Ok(out)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buffered_reader::Memory;

    fn dispatcher(bytes: &[u8]) -> PacketDispatcher<'_> {
        PacketDispatcher::new(Reader::new(Box::new(Memory::new(bytes))))
    }

    #[test]
    fn s1_user_id_old_format() {
        let mut d = dispatcher(&[0xCD, 0x05, 0x41, 0x6C, 0x69, 0x63, 0x65]);
        match d.parse_one().unwrap() {
            Status::Decoded(Packet::UserId(p)) => assert_eq!(p.value, b"Alice"),
            other => panic!("expected UserId, got {other:?}"),
        }
        assert!(matches!(d.parse_one().unwrap(), Status::Eof));
    }

    #[test]
    fn s2_one_pass_signature_old_format() {
        let bytes = [
            0x90, 0x0D, 0x03, 0x01, 0x02, 0x01, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88,
            0x00,
        ];
        let mut d = dispatcher(&bytes);
        match d.parse_one().unwrap() {
            Status::Decoded(Packet::OnepassSig(p)) => {
                assert_eq!(p.version, 3);
                assert_eq!(p.sig_class, 0x01);
                assert_eq!(p.keyid, (0x11223344, 0x55667788));
                assert!(!p.last);
            }
            other => panic!("expected OnepassSig, got {other:?}"),
        }
    }

    #[test]
    fn s3_new_format_symkey_enc_minimum() {
        let bytes = [0xC3, 0x04, 0x04, 0x07, 0x00, 0x02];
        let mut d = dispatcher(&bytes);
        match d.parse_one().unwrap() {
            Status::Decoded(Packet::SymkeyEnc(p)) => {
                assert_eq!(p.version, 4);
                assert!(p.session_key.is_empty());
            }
            other => panic!("expected SymkeyEnc, got {other:?}"),
        }
    }

    #[test]
    fn s5_indeterminate_compressed_is_not_block_mode() {
        let mut bytes = vec![0xA3, 0x01]; // old format, type 8, length code 3, algo ZIP
        bytes.extend_from_slice(b"not really a zlib stream");
        let mut d = dispatcher(&bytes);
        match d.parse_one().unwrap() {
            Status::Decoded(Packet::CompressedData(p)) => {
                assert_eq!(p.algo, crate::types::CompressionAlgorithm::Zip);
                assert!(!d.reader_mut().in_block_mode());
                let mut out = Vec::new();
                d.reader_mut().copy_all(&mut out).unwrap();
                assert_eq!(out, b"not really a zlib stream");
            }
            other => panic!("expected CompressedData, got {other:?}"),
        }
    }

    #[test]
    fn s6_zero_type_is_skipped_without_a_packet() {
        let mut d = dispatcher(&[0x80, 0x00]);
        assert!(matches!(d.parse_one().unwrap(), Status::Eof));
    }

    #[test]
    fn search_for_skips_non_matching_types() {
        let mut bytes = vec![0xCD, 0x05];
        bytes.extend_from_slice(b"Alice");
        bytes.extend_from_slice(&[0xC3, 0x04, 0x04, 0x07, 0x00, 0x02]);
        let mut d = dispatcher(&bytes);
        match d.search_for(Tag::SymkeyEnc).unwrap() {
            Status::Decoded(Packet::SymkeyEnc(_)) => {}
            other => panic!("expected SymkeyEnc, got {other:?}"),
        }
    }

    #[test]
    fn copy_all_reproduces_input_byte_for_byte() {
        let mut bytes = vec![0xCD, 0x05];
        bytes.extend_from_slice(b"Alice");
        bytes.extend_from_slice(&[0xC3, 0x04, 0x04, 0x07, 0x00, 0x02]);
        let mut d = dispatcher(&bytes);
        let mut out = Vec::new();
        d.copy_all(&mut out).unwrap();
        assert_eq!(out, bytes);
    }

    #[test]
    fn skip_n_advances_without_decoding() {
        let mut bytes = vec![0xCD, 0x05];
        bytes.extend_from_slice(b"Alice");
        bytes.extend_from_slice(&[0xC3, 0x04, 0x04, 0x07, 0x00, 0x02]);
        let mut d = dispatcher(&bytes);
        d.skip_n(1).unwrap();
        match d.parse_one().unwrap() {
            Status::Decoded(Packet::SymkeyEnc(_)) => {}
            other => panic!("expected SymkeyEnc, got {other:?}"),
        }
    }
}
