use std::io;
use std::io::Read;
use std::fmt;
use std::cmp;

use crate::{BufferedReader, buffered_reader_generic_read_impl, DEFAULT_BUF_SIZE};

/// A `BufferedReader` that wraps any `std::io::Read`, e.g. a `File` or
/// a `TcpStream`.
pub struct Generic<T, C> {
    reader: T,
    buffer: Vec<u8>,
    // Offset of the unconsumed data within `buffer`.
    cursor: usize,
    position: u64,
    cookie: C,
}

impl<T: fmt::Debug, C> fmt::Debug for Generic<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("buffered_reader::Generic")
            .field("reader", &self.reader)
            .field("buffered", &(self.buffer.len() - self.cursor))
            .finish()
    }
}

impl<T: io::Read> Generic<T, ()> {
    /// Wraps `reader`.
    pub fn new(reader: T) -> Self {
        Generic::with_cookie(reader, ())
    }
}

impl<T: io::Read, C> Generic<T, C> {
    /// Wraps `reader`, carrying `cookie`.
    pub fn with_cookie(reader: T, cookie: C) -> Self {
        Generic { reader, buffer: Vec::new(), cursor: 0, position: 0, cookie }
    }

    fn fill(&mut self, amount: usize) -> io::Result<()> {
        if self.buffer.len() - self.cursor >= amount {
            return Ok(());
        }
        // Compact first so we don't grow the buffer forever.
        if self.cursor > 0 {
            self.buffer.drain(..self.cursor);
            self.cursor = 0;
        }
        while self.buffer.len() < amount {
            let mut chunk = vec![0u8; cmp::max(DEFAULT_BUF_SIZE, amount - self.buffer.len())];
            let n = self.reader.read(&mut chunk)?;
            if n == 0 {
                break;
            }
            self.buffer.extend_from_slice(&chunk[..n]);
        }
        Ok(())
    }
}

impl<T: io::Read, C> io::Read for Generic<T, C> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        buffered_reader_generic_read_impl(self, buf)
    }
}

impl<T: io::Read, C> BufferedReader<C> for Generic<T, C> {
    fn buffer(&self) -> &[u8] {
        &self.buffer[self.cursor..]
    }

    fn data(&mut self, amount: usize) -> io::Result<&[u8]> {
        self.fill(amount)?;
        Ok(&self.buffer[self.cursor..])
    }

    fn consume(&mut self, amount: usize) -> &[u8] {
        assert!(self.cursor + amount <= self.buffer.len());
        self.cursor += amount;
        self.position += amount as u64;
        &self.buffer[self.cursor - amount..]
    }

    fn position(&self) -> u64 {
        self.position
    }

    fn into_inner<'b>(self: Box<Self>) -> Option<Box<dyn BufferedReader<C> + 'b>>
        where Self: 'b
    {
        None
    }

    fn get_mut(&mut self) -> Option<&mut dyn BufferedReader<C>> { None }
    fn get_ref(&self) -> Option<&dyn BufferedReader<C>> { None }

    fn cookie_set(&mut self, cookie: C) -> C {
        std::mem::replace(&mut self.cookie, cookie)
    }
    fn cookie_ref(&self) -> &C { &self.cookie }
    fn cookie_mut(&mut self) -> &mut C { &mut self.cookie }
}
