use std::io;
use std::fmt;
use std::cmp;

use crate::{BufferedReader, buffered_reader_generic_read_impl};

/// A `BufferedReader` that imposes an upper bound, in bytes, on an
/// inner reader.
///
/// Reading past the limit looks like EOF, regardless of how much data
/// the inner reader actually has left. This is the standard way to
/// hand a decoder a definite-length body without letting it read past
/// its end.
pub struct Limitor<'a, C> {
    reader: Box<dyn BufferedReader<C> + 'a>,
    remaining: u64,
}

impl<'a, C> fmt::Debug for Limitor<'a, C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("buffered_reader::Limitor")
            .field("remaining", &self.remaining)
            .finish()
    }
}

impl<'a, C> Limitor<'a, C> {
    /// Creates a new limiting reader that will yield at most `limit`
    /// more bytes from `reader`.
    pub fn new(reader: Box<dyn BufferedReader<C> + 'a>, limit: u64) -> Self {
        Limitor { reader, remaining: limit }
    }
}

impl<'a, C> io::Read for Limitor<'a, C> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        buffered_reader_generic_read_impl(self, buf)
    }
}

impl<'a, C> BufferedReader<C> for Limitor<'a, C> {
    fn buffer(&self) -> &[u8] {
        let buf = self.reader.buffer();
        let n = cmp::min(buf.len() as u64, self.remaining) as usize;
        &buf[..n]
    }

    fn data(&mut self, amount: usize) -> io::Result<&[u8]> {
        let capped = cmp::min(amount as u64, self.remaining) as usize;
        let buf = self.reader.data(capped)?;
        let n = cmp::min(buf.len() as u64, self.remaining) as usize;
        Ok(&buf[..n])
    }

    fn consume(&mut self, amount: usize) -> &[u8] {
        assert!(amount as u64 <= self.remaining);
        self.remaining -= amount as u64;
        self.reader.consume(amount)
    }

    fn position(&self) -> u64 {
        self.reader.position()
    }

    fn into_inner<'b>(self: Box<Self>) -> Option<Box<dyn BufferedReader<C> + 'b>>
        where Self: 'b
    {
        Some(self.reader)
    }

    fn get_mut(&mut self) -> Option<&mut dyn BufferedReader<C>> {
        Some(&mut *self.reader)
    }
    fn get_ref(&self) -> Option<&dyn BufferedReader<C>> {
        Some(&*self.reader)
    }

    fn cookie_set(&mut self, cookie: C) -> C { self.reader.cookie_set(cookie) }
    fn cookie_ref(&self) -> &C { self.reader.cookie_ref() }
    fn cookie_mut(&mut self) -> &mut C { self.reader.cookie_mut() }
}
