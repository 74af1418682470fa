//! The `Packet` data model: the tagged union this crate decodes
//! packet bodies into, plus the packet-type registry ([`Tag`]).

use crate::length::BodyLength;
use crate::mpi::Mpi;
use crate::types::{
    CompressionAlgorithm, HashAlgorithm, PublicKeyAlgorithm, S2K,
    SymmetricAlgorithm,
};

/// The OpenPGP packet type codes this parser recognizes by name.
///
/// Recognizing a tag is not the same as having a decoder for it:
/// [`Tag::Marker`]-equivalent and other reserved/experimental codes
/// fall through to [`Tag::Unknown`] and are always skipped by the
/// dispatcher (packet-type 0 most of all — see Invariant 5).
///
/// The private-use codes 61/62 used here for `Comment`/`OldComment`
/// follow the convention (also used by historical GnuPG builds) of
/// placing non-standard packets in RFC 4880's private/experimental tag
/// range (60-63); no registered RFC tag exists for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Public-key encrypted session key (tag 1).
    PubkeyEnc,
    /// Signature (tag 2).
    Signature,
    /// Symmetric-key encrypted session key (tag 3).
    SymkeyEnc,
    /// One-pass signature (tag 4).
    OnePassSig,
    /// Secret key, primary (tag 5).
    SecretCert,
    /// Public key, primary (tag 6).
    PublicCert,
    /// Secret subkey (tag 7).
    SecretSubkeyCert,
    /// Compressed data (tag 8).
    CompressedData,
    /// Symmetrically encrypted data, without a modification-detection
    /// prefix (tag 9).
    SymmetricallyEncrypted,
    /// Literal ("plaintext") data (tag 11).
    Literal,
    /// Ring trust (tag 12); GnuPG-private bookkeeping with no
    /// corresponding `Packet` (see [`crate::decode::misc`]).
    RingTrust,
    /// User ID (tag 13).
    UserId,
    /// Public subkey (tag 14).
    PublicSubkeyCert,
    /// Symmetrically encrypted, integrity-protected data (tag 18).
    /// Decoded into the same [`Packet::Encrypted`] variant as
    /// [`Tag::SymmetricallyEncrypted`]; this parser does not model the
    /// MDC trailer, only the framing.
    Seip,
    /// A free-text comment (private-use tag 61).
    Comment,
    /// An RFC 1991-era comment (private-use tag 62).
    OldComment,
    /// Any other packet-type code, including the reserved/"deleted"
    /// code 0.
    Unknown(u8),
}

impl Tag {
    /// The numeric packet-type code.
    pub fn code(self) -> u8 {
        match self {
            Tag::PubkeyEnc => 1,
            Tag::Signature => 2,
            Tag::SymkeyEnc => 3,
            Tag::OnePassSig => 4,
            Tag::SecretCert => 5,
            Tag::PublicCert => 6,
            Tag::SecretSubkeyCert => 7,
            Tag::CompressedData => 8,
            Tag::SymmetricallyEncrypted => 9,
            Tag::Literal => 11,
            Tag::RingTrust => 12,
            Tag::UserId => 13,
            Tag::PublicSubkeyCert => 14,
            Tag::Seip => 18,
            Tag::Comment => 61,
            Tag::OldComment => 62,
            Tag::Unknown(v) => v,
        }
    }
}

impl From<u8> for Tag {
    fn from(v: u8) -> Self {
        match v {
            1 => Tag::PubkeyEnc,
            2 => Tag::Signature,
            3 => Tag::SymkeyEnc,
            4 => Tag::OnePassSig,
            5 => Tag::SecretCert,
            6 => Tag::PublicCert,
            7 => Tag::SecretSubkeyCert,
            8 => Tag::CompressedData,
            9 => Tag::SymmetricallyEncrypted,
            11 => Tag::Literal,
            12 => Tag::RingTrust,
            13 => Tag::UserId,
            14 => Tag::PublicSubkeyCert,
            18 => Tag::Seip,
            61 => Tag::Comment,
            62 => Tag::OldComment,
            other => Tag::Unknown(other),
        }
    }
}

/// Header metadata attached to every decoded [`Packet`].
#[derive(Debug, Clone, Copy)]
pub struct Common {
    /// The packet's type.
    pub tag: Tag,
    /// The number of bytes the CTB and length encoding occupied.
    pub header_len: usize,
    /// The packet's declared body length.
    pub length: BodyLength,
}

/// An S2K-protected symmetric-key encrypted session key (tag 3).
///
/// See [Section 5.3 of RFC 4880].
///
/// [Section 5.3 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-5.3
#[derive(Debug, Clone)]
pub struct SymkeyEnc {
    pub common: Common,
    /// Always 4; older versions do not exist.
    pub version: u8,
    pub cipher_algo: SymmetricAlgorithm,
    pub s2k: S2K,
    /// The session key, wrapped under the S2K-derived key. Empty if
    /// the S2K-derived key itself is to be used directly.
    pub session_key: Vec<u8>,
}

/// A public-key encrypted session key (tag 1).
///
/// See [Section 5.1 of RFC 4880].
///
/// [Section 5.1 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-5.1
#[derive(Debug, Clone)]
pub struct PubkeyEnc {
    pub common: Common,
    /// 2 or 3.
    pub version: u8,
    pub keyid: (u32, u32),
    pub pubkey_algo: PublicKeyAlgorithm,
    pub material: Option<Ciphertext>,
}

/// The algorithm-specific material of a [`PubkeyEnc`] packet.
#[derive(Debug, Clone)]
pub enum Ciphertext {
    Rsa { c: Mpi },
    Elgamal { a: Mpi, b: Mpi },
}

/// The algorithm-specific material of a [`Signature`] packet.
#[derive(Debug, Clone)]
pub enum SignatureMaterial {
    Rsa { s: Mpi },
    Dsa { r: Mpi, s: Mpi },
    Elgamal { r: Mpi, s: Mpi },
}

/// A signature packet (tag 2), covering v2/v3 and v4.
///
/// See [Section 5.2 of RFC 4880].
///
/// [Section 5.2 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-5.2
#[derive(Debug, Clone)]
pub struct Signature {
    pub common: Common,
    /// 2, 3, or 4.
    pub version: u8,
    pub sig_class: u8,
    pub pubkey_algo: PublicKeyAlgorithm,
    pub digest_algo: HashAlgorithm,
    /// First two bytes of the signed hash, used as a quick sanity
    /// check before verification.
    pub digest_start: [u8; 2],
    /// The signing timestamp. For v4, this is pulled from the
    /// hashed subpacket area (0 if absent, which is a soft error).
    pub timestamp: u32,
    /// The signing key's ID. For v4, this is pulled from the
    /// unhashed subpacket area (`None` if absent, a soft error).
    pub keyid: Option<(u32, u32)>,
    /// v4 only: the hashed subpacket area, including its 2-byte
    /// length prefix, verbatim as it appeared on the wire (needed to
    /// reconstruct the signed data for verification).
    pub hashed_data: Option<Vec<u8>>,
    /// v4 only: the unhashed subpacket area, same convention.
    pub unhashed_data: Option<Vec<u8>>,
    pub material: Option<SignatureMaterial>,
}

/// A one-pass signature packet (tag 4).
///
/// See [Section 5.4 of RFC 4880].
///
/// [Section 5.4 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-5.4
#[derive(Debug, Clone)]
pub struct OnepassSig {
    pub common: Common,
    /// Always 3.
    pub version: u8,
    pub sig_class: u8,
    pub digest_algo: HashAlgorithm,
    pub pubkey_algo: PublicKeyAlgorithm,
    pub keyid: (u32, u32),
    /// Whether this is the last one-pass signature before the signed
    /// data (signature packets that follow the data are emitted in
    /// reverse order of the one-pass packets that precede it).
    pub last: bool,
}

/// The algorithm-specific public material shared by [`PublicKeyInfo`]
/// and the public half of a secret key.
#[derive(Debug, Clone)]
pub enum PublicKeyMaterial {
    Rsa { n: Mpi, e: Mpi },
    Dsa { p: Mpi, q: Mpi, g: Mpi, y: Mpi },
    Elgamal { p: Mpi, g: Mpi, y: Mpi },
}

/// The public portion of a key certificate, shared by primary keys and
/// subkeys, and by public and secret certificates alike (a secret
/// certificate embeds one of these rather than duplicating its
/// fields).
#[derive(Debug, Clone)]
pub struct PublicKeyInfo {
    pub common: Common,
    /// 2, 3, or 4.
    pub version: u8,
    pub created: u32,
    /// Only meaningful for v2/v3; always 0 for v4.
    pub valid_days: u16,
    pub pubkey_algo: PublicKeyAlgorithm,
    /// `None` when `pubkey_algo` is not recognized: the decoder stops
    /// reading algorithm-specific fields and the dispatcher drains the
    /// rest of the body, per the open question on unknown algorithms
    /// in `DESIGN.md`.
    pub material: Option<PublicKeyMaterial>,
}

/// The algorithm-specific secret material of a [`SecretKeyInfo`].
///
/// These integers are read verbatim from the (possibly still
/// encrypted) secret-key stream; this crate does not attempt to
/// unprotect them.
#[derive(Debug, Clone)]
pub enum SecretKeyMaterial {
    Rsa { d: Mpi, p: Mpi, q: Mpi, u: Mpi },
    Dsa { x: Mpi },
    Elgamal { x: Mpi },
}

/// How a secret key's material is protected at rest.
#[derive(Debug, Clone)]
pub struct Protection {
    pub cipher_algo: SymmetricAlgorithm,
    pub s2k: S2K,
    /// The legacy (non-255) protection path stores this IV only for
    /// some algorithm/key-kind combinations; see the open question
    /// "legacy secret-key IV storage" in `DESIGN.md`.
    pub iv: Option<[u8; 8]>,
}

/// A secret-key certificate, shared by primary keys and subkeys.
///
/// See [Section 5.5.3 of RFC 4880].
///
/// [Section 5.5.3 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-5.5.3
#[derive(Debug, Clone)]
pub struct SecretKeyInfo {
    pub public: PublicKeyInfo,
    pub is_protected: bool,
    /// `Some` whenever `is_protected`; carries the cipher/S2K/IV.
    pub protect: Option<Protection>,
    /// `None` precisely when `public.material` is `None` (unknown
    /// algorithm).
    pub secret: Option<SecretKeyMaterial>,
    pub checksum: u16,
}

/// A user ID packet (tag 13).
#[derive(Debug, Clone)]
pub struct UserId {
    pub common: Common,
    pub value: Vec<u8>,
}

/// A free-text comment packet (private-use tag 61 or 62).
#[derive(Debug, Clone)]
pub struct Comment {
    pub common: Common,
    pub value: Vec<u8>,
}

/// A literal ("plaintext") data packet's header (tag 11).
///
/// The body itself is *not* captured here. Per the parser's lifecycle
/// rules, once this packet is returned the shared reader that was
/// passed to the dispatch call is positioned at the start of the
/// literal body; the caller reads (or explicitly drains) it through
/// that same `&mut` reader before making another dispatch call. See
/// `reader::Reader` and `dispatch::drain_streamed_body`.
#[derive(Debug, Clone)]
pub struct Literal {
    pub common: Common,
    pub mode: u8,
    pub name: Vec<u8>,
    pub timestamp: u32,
}

/// A compressed data packet's header (tag 8).
///
/// See the note on [`Literal`] about how the compressed body itself is
/// accessed.
#[derive(Debug, Clone)]
pub struct CompressedData {
    pub common: Common,
    pub algo: CompressionAlgorithm,
}

/// An encrypted data packet's header (tags 9 and 18).
///
/// See the note on [`Literal`] about how the encrypted body itself is
/// accessed.
#[derive(Debug, Clone)]
pub struct Encrypted {
    pub common: Common,
    /// `true` for tag 18 (modification-detection capable framing).
    pub mdc: bool,
}

/// A decoded OpenPGP packet.
///
/// There is deliberately no `Unknown` variant: per Invariant 4,
/// packets the dispatcher doesn't have a decoder for never produce a
/// `Packet` at all; they're skipped (see [`crate::dispatch`]).
#[derive(Debug, Clone)]
pub enum Packet {
    SymkeyEnc(SymkeyEnc),
    PubkeyEnc(PubkeyEnc),
    Signature(Signature),
    OnepassSig(OnepassSig),
    PublicCert(PublicKeyInfo),
    PublicSubkeyCert(PublicKeyInfo),
    SecretCert(SecretKeyInfo),
    SecretSubkeyCert(SecretKeyInfo),
    UserId(UserId),
    Comment(Comment),
    Literal(Literal),
    CompressedData(CompressedData),
    Encrypted(Encrypted),
}

impl Packet {
    /// The packet's type.
    pub fn tag(&self) -> Tag {
        match self {
            Packet::SymkeyEnc(p) => p.common.tag,
            Packet::PubkeyEnc(p) => p.common.tag,
            Packet::Signature(p) => p.common.tag,
            Packet::OnepassSig(p) => p.common.tag,
            Packet::PublicCert(p) => p.common.tag,
            Packet::PublicSubkeyCert(p) => p.common.tag,
            Packet::SecretCert(p) => p.public.common.tag,
            Packet::SecretSubkeyCert(p) => p.public.common.tag,
            Packet::UserId(p) => p.common.tag,
            Packet::Comment(p) => p.common.tag,
            Packet::Literal(p) => p.common.tag,
            Packet::CompressedData(p) => p.common.tag,
            Packet::Encrypted(p) => p.common.tag,
        }
    }
}
