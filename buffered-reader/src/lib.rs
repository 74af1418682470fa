//! A `BufferedReader` is a super-powered `Read`er.
//!
//! Like the [`BufRead`] trait, `BufferedReader` exposes an internal
//! buffer directly to the user.  Unlike [`BufRead`], the size of that
//! buffer is controlled by the caller at read time (via [`data`]), not
//! by whoever instantiated the reader.  This matters for a packet
//! parser: the parser usually doesn't know how much lookahead it needs
//! until it has inspected a few bytes, and it wants to work with data
//! in place rather than copying it into a scratch buffer.
//!
//! This crate does not know anything about OpenPGP.  It is the narrow,
//! generic byte-stream primitive that higher layers (framing, varint
//! decoding, block-mode bookkeeping) are built on top of.
//!
//! [`BufRead`]: std::io::BufRead
//! [`data`]: BufferedReader::data

use std::cmp;
use std::fmt;
use std::io;
use std::io::{Error, ErrorKind};

mod generic;
mod memory;
mod limitor;

pub use self::generic::Generic;
pub use self::memory::Memory;
pub use self::limitor::Limitor;

/// The default amount to try to read at once when buffering more data.
const DEFAULT_BUF_SIZE: usize = 8 * 1024;

/// The generic `BufferedReader` interface.
///
/// `C` is a "cookie": arbitrary state that the owner of a reader stack
/// can stash on (and recover from) any link in the stack, regardless of
/// its concrete type.  Packet framing uses this to track which packet
/// a given reader belongs to.
pub trait BufferedReader<C>: io::Read + fmt::Debug {
    /// Returns a reference to the internal buffer.
    ///
    /// This returns the same data as `self.data(0)`, but without a
    /// mutable borrow of `self`.
    fn buffer(&self) -> &[u8];

    /// Ensures that the internal buffer holds at least `amount` bytes,
    /// and returns it.
    ///
    /// The returned slice has at least `amount` bytes unless EOF is hit
    /// or an error occurs, in which case it holds whatever is left.
    /// This does not advance the read cursor; use [`consume`] for that.
    ///
    /// [`consume`]: BufferedReader::consume
    fn data(&mut self, amount: usize) -> io::Result<&[u8]>;

    /// Like [`data`], but returns `UnexpectedEof` if fewer than
    /// `amount` bytes are available rather than a short slice.
    ///
    /// [`data`]: BufferedReader::data
    fn data_hard(&mut self, amount: usize) -> io::Result<&[u8]> {
        let result = self.data(amount);
        if let Ok(buffer) = result {
            if buffer.len() < amount {
                return Err(Error::new(ErrorKind::UnexpectedEof,
                                       "unexpected EOF"));
            }
        }
        result
    }

    /// Returns all the data through EOF, without consuming it.
    ///
    /// Only use this when the total size is known to be bounded; it
    /// buffers everything.
    fn data_eof(&mut self) -> io::Result<&[u8]> {
        let mut s = DEFAULT_BUF_SIZE;
        loop {
            let len = self.data(s)?.len();
            if len < s {
                return Ok(self.buffer());
            }
            s = s.saturating_mul(2);
        }
    }

    /// Advances the read cursor by `amount` bytes and returns the
    /// internal buffer (including the just-consumed data).
    ///
    /// It is an error to consume data that hasn't been returned by a
    /// prior call to [`data`] or a related method.
    ///
    /// [`data`]: BufferedReader::data
    fn consume(&mut self, amount: usize) -> &[u8];

    /// Combines [`data`] and [`consume`].
    ///
    /// If fewer than `amount` bytes are available, consumes what is
    /// available.
    ///
    /// [`data`]: BufferedReader::data
    /// [`consume`]: BufferedReader::consume
    fn data_consume(&mut self, amount: usize) -> io::Result<&[u8]> {
        let amount = cmp::min(amount, self.data(amount)?.len());
        let buffer = self.consume(amount);
        Ok(buffer)
    }

    /// Like [`data_consume`], but requires at least `amount` bytes.
    ///
    /// [`data_consume`]: BufferedReader::data_consume
    fn data_consume_hard(&mut self, amount: usize) -> io::Result<&[u8]> {
        let len = self.data_hard(amount)?.len();
        debug_assert!(len >= amount);
        Ok(self.consume(amount))
    }

    /// Reads a single byte, treating EOF as an error.
    fn get(&mut self) -> io::Result<u8> {
        Ok(self.data_consume_hard(1)?[0])
    }

    /// Reads a single byte, treating EOF as `0x00`.
    ///
    /// Used inside fields whose length is already known to be bounded
    /// by a definite-length packet body; a short read there indicates a
    /// malformed body, which the caller will notice via the overall
    /// length budget rather than via a read error here.
    fn get_or_fail(&mut self) -> u8 {
        self.data_consume(1).ok().and_then(|b| b.first().copied())
            .unwrap_or(0)
    }

    /// Reads a big-endian 16-bit integer.
    fn read_be_u16(&mut self) -> io::Result<u16> {
        let b = self.data_consume_hard(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    /// Reads a big-endian 32-bit integer.
    fn read_be_u32(&mut self) -> io::Result<u32> {
        let b = self.data_consume_hard(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Reads and returns `amount` bytes in an owned buffer.
    fn steal(&mut self, amount: usize) -> io::Result<Vec<u8>> {
        Ok(self.data_consume_hard(amount)?[..amount].to_vec())
    }

    /// Reads and returns everything through EOF in an owned buffer.
    fn steal_eof(&mut self) -> io::Result<Vec<u8>> {
        let len = self.data_eof()?.len();
        self.steal(len)
    }

    /// Reads and discards everything through EOF.
    ///
    /// Returns whether any byte was discarded.
    fn drop_eof(&mut self) -> io::Result<bool> {
        let mut any = false;
        loop {
            let len = self.data_consume(DEFAULT_BUF_SIZE)?.len();
            if len > 0 {
                any = true;
            }
            if len < DEFAULT_BUF_SIZE {
                return Ok(any);
            }
        }
    }

    /// Returns the reader's current byte offset from its start.
    fn position(&self) -> u64;

    /// Returns the underlying reader, if this reader wraps one.
    fn into_inner<'a>(self: Box<Self>) -> Option<Box<dyn BufferedReader<C> + 'a>>
        where Self: 'a;

    /// Returns a mutable reference to the inner reader, if any.
    fn get_mut(&mut self) -> Option<&mut dyn BufferedReader<C>>;

    /// Returns a reference to the inner reader, if any.
    fn get_ref(&self) -> Option<&dyn BufferedReader<C>>;

    /// Sets this reader's cookie, returning the old value.
    fn cookie_set(&mut self, cookie: C) -> C;

    /// Returns a reference to this reader's cookie.
    fn cookie_ref(&self) -> &C;

    /// Returns a mutable reference to this reader's cookie.
    fn cookie_mut(&mut self) -> &mut C;
}

/// Implements `std::io::Read::read` in terms of `data_consume`.
///
/// `BufferedReader` implementations that also want to support
/// `std::io::Read` can forward to this.
pub fn buffered_reader_generic_read_impl<T, C>(bio: &mut T, buf: &mut [u8])
    -> io::Result<usize>
    where T: BufferedReader<C> + ?Sized
{
    let inner = bio.data_consume(buf.len())?;
    let amount = cmp::min(buf.len(), inner.len());
    buf[..amount].copy_from_slice(&inner[..amount]);
    Ok(amount)
}

impl<'a, C> BufferedReader<C> for Box<dyn BufferedReader<C> + 'a> {
    fn buffer(&self) -> &[u8] { self.as_ref().buffer() }
    fn data(&mut self, amount: usize) -> io::Result<&[u8]> {
        self.as_mut().data(amount)
    }
    fn data_hard(&mut self, amount: usize) -> io::Result<&[u8]> {
        self.as_mut().data_hard(amount)
    }
    fn data_eof(&mut self) -> io::Result<&[u8]> { self.as_mut().data_eof() }
    fn consume(&mut self, amount: usize) -> &[u8] { self.as_mut().consume(amount) }
    fn position(&self) -> u64 { self.as_ref().position() }
    fn into_inner<'b>(self: Box<Self>) -> Option<Box<dyn BufferedReader<C> + 'b>>
        where Self: 'b
    {
        (*self).into_inner()
    }
    fn get_mut(&mut self) -> Option<&mut dyn BufferedReader<C>> {
        self.as_mut().get_mut()
    }
    fn get_ref(&self) -> Option<&dyn BufferedReader<C>> { self.as_ref().get_ref() }
    fn cookie_set(&mut self, cookie: C) -> C { self.as_mut().cookie_set(cookie) }
    fn cookie_ref(&self) -> &C { self.as_ref().cookie_ref() }
    fn cookie_mut(&mut self) -> &mut C { self.as_mut().cookie_mut() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_data_eof() {
        let mut bio = Memory::new(b"0123456789");
        let amount = bio.data_eof().unwrap().len();
        assert_eq!(amount, 10);
        bio.consume(amount);
        assert_eq!(bio.data(1).unwrap().len(), 0);
    }

    #[test]
    fn limitor_bounds_eof() {
        let data = b"0123456789";
        let inner: Box<dyn BufferedReader<()>> = Box::new(Memory::new(data));
        let mut lim = Limitor::new(inner, 5);
        assert_eq!(lim.data_eof().unwrap().len(), 5);
        lim.consume(5);
        assert_eq!(lim.data(1).unwrap().len(), 0);
    }
}
