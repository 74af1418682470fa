//! Error kinds returned by this crate.
//!
//! These map directly onto the four kinds in the parser's error design:
//! a malformed packet, a failure to read the underlying stream, a
//! failure to write to a copy sink, and a packet type that is
//! recognized as a valid code but has no decoder (reserved for future
//! extension, distinct from the ordinary "skip unknown types" path in
//! the dispatcher).

use std::fmt;
use thiserror::Error;

use crate::packet::Tag;

/// Errors returned by this crate.
#[derive(Error, Debug)]
pub enum Error {
    /// A structural violation: a bad CTB, a short body, a disallowed
    /// version, a bad S2K mode, and so on.
    #[error("invalid packet{}: {1}", tag_suffix(.0))]
    InvalidPacket(Option<Tag>, String),

    /// The underlying `ByteSource` failed or ran out of data mid-body.
    #[error("read error: {0}")]
    ReadError(std::io::Error),

    /// The copy sink failed while being written to.
    #[error("write error: {0}")]
    WriteError(std::io::Error),

    /// The packet type is a recognized code but this crate has no
    /// decoder for it.
    #[error("unknown packet type: {0}")]
    UnknownPacket(u8),
}

fn tag_suffix(tag: &Option<Tag>) -> String {
    match tag {
        Some(t) => format!(" ({:?})", t),
        None => String::new(),
    }
}

impl Error {
    /// Shorthand for [`Error::InvalidPacket`] without a known tag.
    pub fn invalid(msg: impl fmt::Display) -> Self {
        Error::InvalidPacket(None, msg.to_string())
    }

    /// Shorthand for [`Error::InvalidPacket`] with a known tag.
    pub fn invalid_in(tag: Tag, msg: impl fmt::Display) -> Self {
        Error::InvalidPacket(Some(tag), msg.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::ReadError(e)
    }
}

/// This crate's result specialization.
pub type Result<T> = std::result::Result<T, Error>;
