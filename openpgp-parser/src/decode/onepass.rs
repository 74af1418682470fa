//! One-pass signature packets (tag 4).
//!
//! See [Section 5.4 of RFC 4880].
//!
//! [Section 5.4 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-5.4

use buffered_reader::BufferedReader;

use crate::error::{Error, Result};
use crate::packet::{Common, OnepassSig};
use crate::types::{HashAlgorithm, PublicKeyAlgorithm};

/// Decodes a `OnepassSig` body.
pub fn decode<C>(
    common: Common,
    source: &mut dyn BufferedReader<C>,
    budget: &mut usize,
) -> Result<OnepassSig> {
    if *budget < 13 {
        return Err(Error::invalid_in(common.tag, "truncated OnepassSig body"));
    }
    let version = source.get()?;
    if version != 3 {
        return Err(Error::invalid_in(common.tag, format!("unsupported version {version}")));
    }
    let sig_class = source.get()?;
    let digest_algo = HashAlgorithm::from(source.get()?);
    let pubkey_algo = PublicKeyAlgorithm::from(source.get()?);
    let hi = source.read_be_u32()?;
    let lo = source.read_be_u32()?;
    let last = source.get()? != 0;
    *budget -= 13;
    Ok(OnepassSig {
        common,
        version,
        sig_class,
        digest_algo,
        pubkey_algo,
        keyid: (hi, lo),
        last,
    })
}
