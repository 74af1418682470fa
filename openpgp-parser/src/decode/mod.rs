//! Per-packet-type payload decoders.
//!
//! Every decoder here takes a materialized body — a
//! [`buffered_reader::BufferedReader`] bounded to exactly one packet's
//! bytes — plus a `budget` counter it must keep in lockstep with how
//! many bytes it has actually consumed, the same discipline
//! [`crate::mpi::Mpi::parse`] uses. [`crate::dispatch`] is responsible
//! for materializing that bounded body (handling definite, old-format
//! indeterminate, and new-format partial-body framing uniformly)
//! before calling into any of these.
//!
//! The three packet types whose body is itself arbitrary opaque data
//! — Literal, Compressed, and Encrypted — are the exception: their
//! small fixed-format header fields are decoded here, but the bulk
//! payload is left on the shared reader for the caller to stream, so
//! those functions are called directly against the live
//! [`crate::reader::Reader`] rather than a materialized buffer. See
//! [`literal::decode`] and [`container::decode_compressed`].

pub mod cert;
pub mod container;
pub mod literal;
pub mod misc;
pub mod onepass;
pub mod pkesk;
pub mod s2k;
pub mod signature;
pub mod skesk;

use buffered_reader::BufferedReader;

use crate::error::Result;
use crate::packet::{Common, Packet, Tag};
use crate::reader::Reader;

/// Whether this crate has a payload decoder for `tag` at all.
///
/// `false` for [`Tag::Unknown`] (including the reserved "deleted" type
/// 0) — those are always skipped by the dispatcher, never decoded
/// (Invariant 4/5). Every other recognized tag is `true`, including
/// [`Tag::RingTrust`], which is decoded (its one flag byte is read and,
/// in list mode, printed) even though it never produces a [`Packet`].
pub fn has_decoder(tag: Tag) -> bool {
    !matches!(tag, Tag::Unknown(_))
}

/// Whether `tag`'s body is handed to the caller as a live stream
/// (§4.9's Plaintext/Compressed/Encrypted) rather than being fully
/// materialized into a [`Packet`] by [`dispatch_payload`].
pub fn is_streaming(tag: Tag) -> bool {
    matches!(
        tag,
        Tag::Literal | Tag::CompressedData | Tag::SymmetricallyEncrypted | Tag::Seip
    )
}

/// Dispatches a non-streaming packet body: reads the declared body
/// (self-limited to `budget` bytes) and produces the decoded
/// [`Packet`], or `None` for tags that are decoded but never produce
/// one ([`Tag::RingTrust`], and the legacy `'#'`-comment quirk inside a
/// [`Tag::PublicSubkeyCert`] — see [`cert::decode_public`]).
///
/// Must not be called for a tag [`is_streaming`] reports `true` for;
/// use [`dispatch_streaming`] instead.
pub fn dispatch_payload<C>(
    common: Common,
    source: &mut dyn BufferedReader<C>,
    budget: &mut usize,
) -> Result<Option<Packet>> {
    debug_assert!(!is_streaming(common.tag));
    Ok(match common.tag {
        Tag::SymkeyEnc => Some(Packet::SymkeyEnc(skesk::decode(common, source, budget)?)),
        Tag::PubkeyEnc => Some(Packet::PubkeyEnc(pkesk::decode(common, source, budget)?)),
        Tag::Signature => Some(Packet::Signature(signature::decode(common, source, budget)?)),
        Tag::OnePassSig => Some(Packet::OnepassSig(onepass::decode(common, source, budget)?)),
        Tag::PublicCert => {
            cert::decode_public(common, false, source, budget)?.map(Packet::PublicCert)
        }
        Tag::PublicSubkeyCert => {
            cert::decode_public(common, true, source, budget)?.map(Packet::PublicSubkeyCert)
        }
        Tag::SecretCert => Some(Packet::SecretCert(cert::decode_secret(common, source, budget)?)),
        Tag::SecretSubkeyCert => {
            Some(Packet::SecretSubkeyCert(cert::decode_secret(common, source, budget)?))
        }
        Tag::UserId => Some(Packet::UserId(misc::decode_user_id(common, source, budget)?)),
        Tag::Comment | Tag::OldComment => {
            Some(Packet::Comment(misc::decode_comment(common, source, budget)?))
        }
        Tag::RingTrust => {
            let flag = misc::decode_ring_trust(source, budget)?;
            crate::list::print_ring_trust(flag);
            None
        }
        Tag::Literal | Tag::CompressedData | Tag::SymmetricallyEncrypted | Tag::Seip => {
            unreachable!("streaming tags are handled by dispatch_streaming")
        }
        Tag::Unknown(code) => return Err(crate::error::Error::UnknownPacket(code)),
    })
}

/// Dispatches a streaming packet body: reads only the small fixed
/// header that precedes the nested stream and leaves `reader`
/// positioned at (and armed for) the rest, which the caller consumes
/// before making another dispatch call.
///
/// Must not be called for a tag [`is_streaming`] reports `false` for.
pub fn dispatch_streaming(common: Common, reader: &mut Reader) -> Result<Packet> {
    debug_assert!(is_streaming(common.tag));
    Ok(match common.tag {
        Tag::Literal => Packet::Literal(literal::decode(common, reader)?),
        Tag::CompressedData => Packet::CompressedData(container::decode_compressed(common, reader)?),
        Tag::SymmetricallyEncrypted => {
            Packet::Encrypted(container::decode_encrypted(common, false)?)
        }
        Tag::Seip => Packet::Encrypted(container::decode_encrypted(common, true)?),
        _ => unreachable!("non-streaming tags are handled by dispatch_payload"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_tag_has_no_decoder() {
        assert!(!has_decoder(Tag::Unknown(0)));
        assert!(!has_decoder(Tag::Unknown(60)));
    }

    #[test]
    fn ring_trust_has_a_decoder_but_is_not_streaming() {
        assert!(has_decoder(Tag::RingTrust));
        assert!(!is_streaming(Tag::RingTrust));
    }

    #[test]
    fn streaming_tags_are_exactly_the_container_types() {
        for tag in [Tag::Literal, Tag::CompressedData, Tag::SymmetricallyEncrypted, Tag::Seip] {
            assert!(is_streaming(tag));
        }
        for tag in [Tag::Signature, Tag::UserId, Tag::PublicCert, Tag::RingTrust] {
            assert!(!is_streaming(tag));
        }
    }
}
