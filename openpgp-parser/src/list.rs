//! The "list mode" pretty-printer: a side-effectful, line-oriented
//! dump of every packet as it is parsed, gated by a process-wide flag
//! the embedding tool toggles before parsing begins.
//!
//! Per §6, this output is part of the crate's observable interface —
//! downstream tooling parses it — so its shape (lines beginning with
//! `:`, named subpacket types, the hex-dump layout for skipped
//! packets) is fixed, not an implementation detail free to drift.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::packet::{Packet, PublicKeyMaterial, SecretKeyMaterial};
use crate::types::S2K;

static LIST_MODE: AtomicBool = AtomicBool::new(false);
static MPI_PRINT_MODE: AtomicBool = AtomicBool::new(false);

/// Toggles list mode, returning the prior value so a caller can
/// restore it.
pub fn set_packet_list_mode(on: bool) -> bool {
    LIST_MODE.swap(on, Ordering::SeqCst)
}

/// Toggles MPI-printing mode (full hex dump of each MPI's value rather
/// than just its bit count), returning the prior value.
pub fn set_mpi_print_mode(on: bool) -> bool {
    MPI_PRINT_MODE.swap(on, Ordering::SeqCst)
}

/// Whether list mode is currently on.
pub fn is_list_mode() -> bool {
    LIST_MODE.load(Ordering::SeqCst)
}

/// Whether MPI-printing mode is currently on.
pub fn is_mpi_print_mode() -> bool {
    MPI_PRINT_MODE.load(Ordering::SeqCst)
}

/// Prints a hex dump of `bytes` at the layout §4.7 specifies: groups
/// of 8 bytes separated by a space, a newline every 24 bytes, each
/// line led by a 4-digit decimal offset. A no-op outside list mode.
pub fn hex_dump(bytes: &[u8]) {
    if !is_list_mode() {
        return;
    }
    for (line_no, chunk) in bytes.chunks(24).enumerate() {
        print!("{:04}:", line_no * 24);
        for (i, group) in chunk.chunks(8).enumerate() {
            if i > 0 {
                print!(" ");
            }
            print!(" ");
            for b in group {
                print!("{b:02x}");
            }
        }
        println!();
    }
}

/// Prints the one-line record for a Ring Trust packet, which has no
/// [`Packet`] variant of its own.
pub fn print_ring_trust(flag: u8) {
    if is_list_mode() {
        println!(":ring trust packet: flag {flag:#04x}");
    }
}

/// Prints a legacy RFC 1991-era comment recovered from the `'#'`
/// quirk in [`crate::decode::cert::decode_public`].
pub fn print_legacy_comment(bytes: &[u8]) {
    if is_list_mode() {
        println!(":legacy comment packet: \"{}\"", String::from_utf8_lossy(bytes));
    }
}

/// Prints a one-line record (plus, for the algorithm-bearing variants,
/// indented MPI dumps) for a fully decoded packet. A no-op outside
/// list mode.
pub fn print_packet(packet: &Packet) {
    if !is_list_mode() {
        return;
    }
    match packet {
        Packet::SymkeyEnc(p) => {
            println!(":symkey enc packet: version {}, cipher {}", p.version, p.cipher_algo);
            print_s2k(&p.s2k);
            if !p.session_key.is_empty() {
                println!("\tsession key: {} bytes", p.session_key.len());
            }
        }
        Packet::PubkeyEnc(p) => {
            println!(
                ":pubkey enc packet: version {}, keyid {:08X}{:08X}, algo {}",
                p.version, p.keyid.0, p.keyid.1, p.pubkey_algo
            );
        }
        Packet::Signature(p) => {
            println!(
                ":signature packet: version {}, class {:#04x}, algo {}, digest {}",
                p.version, p.sig_class, p.pubkey_algo, p.digest_algo
            );
            println!("\tdigest start: {:02x}{:02x}", p.digest_start[0], p.digest_start[1]);
            if let Some(keyid) = p.keyid {
                println!("\tkeyid: {:08X}{:08X}", keyid.0, keyid.1);
            }
        }
        Packet::OnepassSig(p) => {
            println!(
                ":one-pass signature packet: keyid {:08X}{:08X}, algo {}, digest {}, last {}",
                p.keyid.0, p.keyid.1, p.pubkey_algo, p.digest_algo, p.last as u8
            );
        }
        Packet::PublicCert(p) | Packet::PublicSubkeyCert(p) => {
            println!(
                ":public key packet: version {}, algo {}, created {}",
                p.version, p.pubkey_algo, p.created
            );
            if let Some(material) = &p.material {
                print_public_material(material);
            }
        }
        Packet::SecretCert(p) | Packet::SecretSubkeyCert(p) => {
            println!(
                ":secret key packet: version {}, algo {}, protected {}",
                p.public.version, p.public.pubkey_algo, p.is_protected as u8
            );
            if let Some(material) = &p.public.material {
                print_public_material(material);
            }
            if let Some(protect) = &p.protect {
                println!("\tprotection: cipher {}", protect.cipher_algo);
                print_s2k(&protect.s2k);
            }
            if let Some(secret) = &p.secret {
                print_secret_material(secret);
            }
        }
        Packet::UserId(p) => {
            println!(":user id packet: \"{}\"", String::from_utf8_lossy(&p.value));
        }
        Packet::Comment(p) => {
            println!(":comment packet: \"{}\"", String::from_utf8_lossy(&p.value));
        }
        Packet::Literal(p) => {
            println!(
                ":literal data packet: mode {}, name \"{}\", created {}",
                p.mode as char,
                String::from_utf8_lossy(&p.name),
                p.timestamp
            );
        }
        Packet::CompressedData(p) => {
            println!(":compressed packet: algo {}", p.algo);
        }
        Packet::Encrypted(p) => {
            println!(":encrypted data packet: mdc {}", p.mdc as u8);
        }
    }
}

fn print_s2k(s2k: &S2K) {
    match s2k {
        S2K::Simple { hash } => println!("\tS2K: simple, hash {hash}"),
        S2K::Salted { hash, .. } => println!("\tS2K: salted, hash {hash}"),
        S2K::Iterated { hash, count, .. } => {
            println!("\tS2K: iterated, hash {hash}, count {count}")
        }
    }
}

fn print_public_material(material: &PublicKeyMaterial) {
    match material {
        PublicKeyMaterial::Rsa { n, e } => {
            print_mpi("n", n.bits(), n.value());
            print_mpi("e", e.bits(), e.value());
        }
        PublicKeyMaterial::Dsa { p, q, g, y } => {
            print_mpi("p", p.bits(), p.value());
            print_mpi("q", q.bits(), q.value());
            print_mpi("g", g.bits(), g.value());
            print_mpi("y", y.bits(), y.value());
        }
        PublicKeyMaterial::Elgamal { p, g, y } => {
            print_mpi("p", p.bits(), p.value());
            print_mpi("g", g.bits(), g.value());
            print_mpi("y", y.bits(), y.value());
        }
    }
}

fn print_secret_material(material: &SecretKeyMaterial) {
    match material {
        SecretKeyMaterial::Rsa { d, p, q, u } => {
            print_mpi("d", d.bits(), d.value());
            print_mpi("p", p.bits(), p.value());
            print_mpi("q", q.bits(), q.value());
            print_mpi("u", u.bits(), u.value());
        }
        SecretKeyMaterial::Dsa { x } => print_mpi("x", x.bits(), x.value()),
        SecretKeyMaterial::Elgamal { x } => print_mpi("x", x.bits(), x.value()),
    }
}

fn print_mpi(name: &str, bits: u16, value: &[u8]) {
    if is_mpi_print_mode() {
        let mut hex = String::with_capacity(value.len() * 2);
        for b in value {
            hex.push_str(&format!("{b:02x}"));
        }
        println!("\t{name}[{bits}]: {hex}");
    } else {
        println!("\t{name}[{bits}]");
    }
}

/// Pretty-prints every subpacket in `area` (including its 2-byte
/// length prefix, as returned by the signature decoder) with its
/// decoded type name, per §4.10's table of recognized type codes. A
/// no-op outside list mode.
pub fn print_subpacket_area(area: &[u8]) {
    if !is_list_mode() || area.len() < 2 {
        return;
    }
    let _ = crate::subpacket::for_each(&area[2..], |sp| {
        let name = subpacket_type_name(sp.kind);
        println!("\tsubpacket: {name} ({} bytes)", sp.body.len());
    });
}

fn subpacket_type_name(kind: crate::subpacket::SubpacketKind) -> &'static str {
    use crate::subpacket::SubpacketKind;
    match kind {
        SubpacketKind::SignatureCreationTime => "signature creation time",
        SubpacketKind::Issuer => "issuer",
        SubpacketKind::Other(code) => match code & 0x7f {
            3 => "signature expiration time",
            4 => "exportable certification",
            5 => "trust signature",
            6 => "regular expression",
            7 => "revocable",
            9 => "key expiration time",
            10 => "additional recipient request",
            11 => "preferred symmetric algorithms",
            12 => "revocation key",
            20 => "notation data",
            21 => "preferred hash algorithms",
            22 => "preferred compression algorithms",
            23 => "key server preferences",
            24 => "preferred key server",
            25 => "primary user id",
            26 => "policy url",
            27 => "key flags",
            28 => "signer's user id",
            _ => "unrecognized subpacket",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_returns_prior_value() {
        let prior = set_packet_list_mode(true);
        assert!(!prior || is_list_mode());
        set_packet_list_mode(prior);
    }

    #[test]
    fn subpacket_type_names_cover_the_documented_table() {
        use crate::subpacket::SubpacketKind;
        assert_eq!(subpacket_type_name(SubpacketKind::SignatureCreationTime), "signature creation time");
        assert_eq!(subpacket_type_name(SubpacketKind::Issuer), "issuer");
        assert_eq!(subpacket_type_name(SubpacketKind::Other(27)), "key flags");
        assert_eq!(subpacket_type_name(SubpacketKind::Other(250)), "unrecognized subpacket");
    }
}
