//! The `ByteSource` abstraction: a single stream shared across an
//! entire packet sequence, whose framing mode is armed by the
//! dispatcher before each packet's body is read and reset once the
//! packet is fully consumed.
//!
//! Unlike [`buffered_reader::BufferedReader`], which only knows how to
//! fetch and consume raw bytes, `ByteSource` additionally understands
//! the two streaming body conventions old/new-format framing can
//! produce: block mode (read until the underlying stream's own EOF)
//! and partial-body mode (a sequence of power-of-two chunks whose
//! final chunk is introduced by a definite or zero length). Ordinary
//! definite-length bodies don't need reader-level support at all: the
//! payload decoders self-limit against an explicit byte budget (see
//! [`crate::mpi::Mpi::parse`]), so the reader only ever needs to know
//! how to find each body's *end*, not how to bound reads inside it.

use std::io::{self, Write};

use buffered_reader::BufferedReader;

use crate::error::Result;
use crate::length::{read_new_format_length, BodyLength};

/// The framing mode a [`Reader`] is currently armed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// No special framing: the body is definite-length and the
    /// decoder is responsible for its own byte budget.
    Normal,
    /// A definite-length body being read through the mode-aware
    /// `get_or_fail`/`copy_*` interface rather than the budget-counter
    /// discipline, so its logical end can be reported the same way
    /// `Block`/`Partial` report theirs. Used for the streamed packet
    /// types (Literal/Compressed/Encrypted) so callers don't need to
    /// special-case the definite-length case.
    Bounded { remaining: u64 },
    /// Old-format indeterminate length: read until the underlying
    /// stream reports EOF.
    Block,
    /// The same read-until-EOF behavior as `Block`, but worn by an
    /// old-format indeterminate-length Compressed Data packet, which
    /// must report [`Reader::in_block_mode`] as `false` even though it
    /// behaves identically otherwise. GnuPG's own parser carries this
    /// same asymmetry: a compressed packet's "indeterminate length" is
    /// a consequence of the codec needing to read to EOF, not a
    /// framing choice the packet itself made.
    CompressedIndeterminate,
    /// New-format partial-body length: `remaining_in_chunk` bytes are
    /// left in the current chunk; when it reaches zero a new chunk
    /// header is read, which may itself be the final (definite-length)
    /// chunk.
    Partial {
        remaining_in_chunk: usize,
        final_chunk: bool,
    },
}

/// The shared, mode-aware byte source threaded through an entire
/// packet sequence.
///
/// A `Reader` wraps exactly one underlying [`BufferedReader`]; the
/// dispatcher arms its mode via [`Reader::set_block_mode`] /
/// [`Reader::set_partial_block_mode`] immediately before handing
/// control to a payload decoder or to the caller (for streamed
/// bodies), and disarms it (back to [`Mode::Normal`]) once the
/// packet's body has been fully consumed.
pub struct Reader<'a> {
    inner: Box<dyn BufferedReader<()> + 'a>,
    mode: Mode,
}

impl<'a> Reader<'a> {
    /// Wraps `inner` in normal (unframed) mode.
    pub fn new(inner: Box<dyn BufferedReader<()> + 'a>) -> Self {
        Reader { inner, mode: Mode::Normal }
    }

    /// Arms old-format indeterminate-length framing.
    ///
    /// `compressed` distinguishes the Compressed Data exception
    /// (see [`Mode::CompressedIndeterminate`]) from ordinary block
    /// mode; it only affects what [`Reader::in_block_mode`] reports.
    pub fn set_block_mode(&mut self, compressed: bool) {
        self.mode = if compressed {
            Mode::CompressedIndeterminate
        } else {
            Mode::Block
        };
    }

    /// Arms new-format partial-body-length framing, given the first
    /// chunk's size (as decoded from the packet header).
    pub fn set_partial_block_mode(&mut self, first_chunk: usize) {
        self.mode = Mode::Partial { remaining_in_chunk: first_chunk, final_chunk: false };
    }

    /// Arms definite-length framing for the mode-aware interface (see
    /// [`Mode::Bounded`]).
    pub fn set_bounded_mode(&mut self, length: u64) {
        self.mode = Mode::Bounded { remaining: length };
    }

    /// Disarms any special framing, returning to [`Mode::Normal`].
    pub fn set_normal_mode(&mut self) {
        self.mode = Mode::Normal;
    }

    /// Whether the reader is in block mode — old-format indeterminate
    /// length, `compressed: false`. Always `false` in
    /// [`Mode::CompressedIndeterminate`], by design (see that
    /// variant's doc comment).
    pub fn in_block_mode(&self) -> bool {
        matches!(self.mode, Mode::Block)
    }

    /// Whether the reader is in partial-body-length mode.
    pub fn in_partial_mode(&self) -> bool {
        matches!(self.mode, Mode::Partial { .. })
    }

    /// The number of bytes consumed from the underlying stream so far.
    pub fn tell(&self) -> u64 {
        self.inner.position()
    }

    /// Reads and consumes one byte, honoring the current framing mode
    /// (crossing chunk boundaries transparently in partial-body mode).
    /// Returns `Ok(None)` at the logical end of the current body
    /// (stream EOF in block mode, or the final chunk's end in partial
    /// mode); never returns `Ok(None)` in [`Mode::Normal`] — normal
    /// mode has no logical end of its own, only `Err` on stream EOF.
    pub fn get_or_fail(&mut self) -> Result<Option<u8>> {
        loop {
            match self.mode {
                Mode::Normal => return Ok(Some(self.inner.get()?)),
                Mode::Bounded { ref mut remaining } => {
                    if *remaining == 0 {
                        return Ok(None);
                    }
                    let byte = self.inner.get()?;
                    if let Mode::Bounded { remaining } = &mut self.mode {
                        *remaining -= 1;
                    }
                    return Ok(Some(byte));
                }
                Mode::Block | Mode::CompressedIndeterminate => {
                    return if self.inner.data_eof()?.is_empty() {
                        Ok(None)
                    } else {
                        Ok(Some(self.inner.get()?))
                    };
                }
                Mode::Partial { ref mut remaining_in_chunk, final_chunk } => {
                    if *remaining_in_chunk == 0 {
                        if final_chunk {
                            return Ok(None);
                        }
                        match read_new_format_length(&mut *self.inner)?.0 {
                            BodyLength::Definite(n) => {
                                self.mode = Mode::Partial {
                                    remaining_in_chunk: n as usize,
                                    final_chunk: true,
                                };
                            }
                            BodyLength::Partial(n) => {
                                self.mode = Mode::Partial {
                                    remaining_in_chunk: n,
                                    final_chunk: false,
                                };
                            }
                            BodyLength::Indeterminate => {
                                return Err(crate::error::Error::invalid(
                                    "indeterminate length inside a partial-body chunk",
                                ));
                            }
                        }
                        continue;
                    }
                    let byte = self.inner.get()?;
                    if let Mode::Partial { remaining_in_chunk, .. } = &mut self.mode {
                        *remaining_in_chunk -= 1;
                    }
                    return Ok(Some(byte));
                }
            }
        }
    }

    /// Like [`Reader::get_or_fail`], but surfaces end-of-body as an
    /// error rather than `Ok(None)`; the common case for decoders that
    /// always expect more bytes.
    pub fn get(&mut self) -> Result<u8> {
        self.get_or_fail()?.ok_or_else(|| {
            crate::error::Error::invalid("unexpected end of packet body")
        })
    }

    /// Copies every remaining byte of the current body to `sink`.
    ///
    /// Used to drain a streamed body (Literal/Compressed/Encrypted)
    /// the caller doesn't want to inspect, and by
    /// [`crate::dispatch::PacketDispatcher::copy_all`].
    pub fn copy_all(&mut self, sink: &mut dyn Write) -> Result<u64> {
        let mut n = 0u64;
        while let Some(byte) = self.get_or_fail()? {
            sink.write_all(&[byte]).map_err(crate::error::Error::WriteError)?;
            n += 1;
        }
        Ok(n)
    }

    /// Copies up to `limit` bytes of the current body to `sink`,
    /// stopping early (without error) if the body ends first.
    pub fn copy_some(&mut self, sink: &mut dyn Write, limit: u64) -> Result<u64> {
        let mut n = 0u64;
        while n < limit {
            match self.get_or_fail()? {
                Some(byte) => {
                    sink.write_all(&[byte]).map_err(crate::error::Error::WriteError)?;
                    n += 1;
                }
                None => break,
            }
        }
        Ok(n)
    }

    /// Discards every remaining byte of the current body without
    /// copying it anywhere.
    pub fn drain(&mut self) -> Result<u64> {
        self.copy_some(&mut io::sink(), u64::MAX)
    }

    /// Reads a definite number of bytes verbatim, ignoring framing
    /// mode (used for bodies whose exact length is already known, such
    /// as a definite-length body read directly off the underlying
    /// stream rather than through chunked framing).
    pub fn read_exact(&mut self, len: usize) -> Result<Vec<u8>> {
        Ok(self.inner.data_consume_hard(len)?[..len].to_vec())
    }

    /// Reads a big-endian `u16` off the underlying stream, ignoring
    /// framing mode.
    pub fn read_be_u16(&mut self) -> Result<u16> {
        Ok(self.inner.read_be_u16()?)
    }

    /// Reads a big-endian `u32` off the underlying stream, ignoring
    /// framing mode.
    pub fn read_be_u32(&mut self) -> Result<u32> {
        Ok(self.inner.read_be_u32()?)
    }

    /// Grants a decoder direct, budget-checked access to the
    /// underlying [`BufferedReader`] for definite-length bodies, where
    /// no chunk/EOF bookkeeping is needed.
    pub fn inner_mut(&mut self) -> &mut dyn BufferedReader<()> {
        &mut *self.inner
    }
}

impl<'a> std::fmt::Debug for Reader<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Reader")
            .field("mode", &self.mode)
            .field("position", &self.inner.position())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buffered_reader::Memory;

    #[test]
    fn block_mode_reads_to_eof() {
        let mem = Memory::new(b"abc");
        let mut r = Reader::new(Box::new(mem));
        r.set_block_mode(false);
        assert!(r.in_block_mode());
        let mut out = Vec::new();
        r.copy_all(&mut out).unwrap();
        assert_eq!(out, b"abc");
    }

    #[test]
    fn compressed_indeterminate_is_not_block_mode() {
        let mem = Memory::new(b"abc");
        let mut r = Reader::new(Box::new(mem));
        r.set_block_mode(true);
        assert!(!r.in_block_mode());
        let mut out = Vec::new();
        r.copy_all(&mut out).unwrap();
        assert_eq!(out, b"abc");
    }

    #[test]
    fn partial_mode_joins_chunks() {
        // First chunk: 2 bytes ("ab"). Continuation header: definite
        // length 1, final chunk "c".
        let mem = Memory::new(b"ab\x01c");
        let mut r = Reader::new(Box::new(mem));
        r.set_partial_block_mode(2);
        let mut out = Vec::new();
        r.copy_all(&mut out).unwrap();
        assert_eq!(out, b"abc");
    }
}
