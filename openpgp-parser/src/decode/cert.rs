//! Public and secret key certificates (tags 5-7, 14): primary keys and
//! subkeys, versions 2-4, and the three ways a secret key's material
//! can be protected at rest.
//!
//! This is the largest decoder in the crate, mirroring §4.8: the
//! cross-product of {public, secret} x {primary, subkey} x
//! {ElGamal, DSA, RSA} x {v2/v3, v4} x (secret only: {unprotected,
//! legacy-protected, S2K-protected}).

use buffered_reader::BufferedReader;

use super::s2k;
use crate::error::{Error, Result};
use crate::mpi::Mpi;
use crate::packet::{
    Common, PublicKeyInfo, PublicKeyMaterial, Protection, SecretKeyInfo, SecretKeyMaterial,
};
use crate::types::{HashAlgorithm, PublicKeyAlgorithm, SymmetricAlgorithm, S2K};

/// Decodes a public-key certificate body (a primary key or a subkey).
///
/// `allow_legacy_comment` gates the RFC 1991-era quirk (§4.8, §9):
/// when set and the version byte reads as the ASCII character `#`,
/// the entire body is an old-style comment, not a key. This crate only
/// arms that quirk for public *subkey* certificates, matching the
/// governing spec's wording ("when decoding a 'public subkey' ..."),
/// so a `'#'` version byte on a primary key is still rejected as an
/// unsupported version.
///
/// Returns `Ok(None)` exactly when the legacy-comment quirk fired; the
/// caller (see [`crate::decode::dispatch_payload`]) produces no
/// `Packet` in that case.
pub fn decode_public<C>(
    common: Common,
    allow_legacy_comment: bool,
    source: &mut dyn BufferedReader<C>,
    budget: &mut usize,
) -> Result<Option<PublicKeyInfo>> {
    if *budget < 1 {
        return Err(Error::invalid_in(common.tag, "empty certificate body"));
    }
    let version = source.get()?;
    *budget -= 1;

    if allow_legacy_comment && version == b'#' {
        let text = read_rest(source, budget)?;
        crate::list::print_legacy_comment(&text);
        return Ok(None);
    }
    if !(2..=4).contains(&version) {
        return Err(Error::invalid_in(common.tag, format!("unsupported version {version}")));
    }

    if *budget < 4 {
        return Err(Error::invalid_in(common.tag, "truncated certificate creation time"));
    }
    let created = source.read_be_u32()?;
    *budget -= 4;

    let valid_days = if version == 4 {
        0
    } else {
        if *budget < 2 {
            return Err(Error::invalid_in(common.tag, "truncated certificate validity period"));
        }
        let d = source.read_be_u16()?;
        *budget -= 2;
        d
    };

    if *budget < 1 {
        return Err(Error::invalid_in(common.tag, "truncated certificate algorithm byte"));
    }
    let pubkey_algo = PublicKeyAlgorithm::from(source.get()?);
    *budget -= 1;

    let material = read_public_material(common.tag, pubkey_algo, source, budget)?;

    Ok(Some(PublicKeyInfo {
        common,
        version,
        created,
        valid_days,
        pubkey_algo,
        material,
    }))
}

/// Decodes a secret-key certificate body. There is no legacy-comment
/// quirk on this path: §4.8 only documents it for public subkeys.
pub fn decode_secret<C>(
    common: Common,
    source: &mut dyn BufferedReader<C>,
    budget: &mut usize,
) -> Result<SecretKeyInfo> {
    let public = decode_public(common, false, source, budget)?
        .expect("decode_public never returns None when allow_legacy_comment is false");

    if *budget < 1 {
        return Err(Error::invalid_in(common.tag, "truncated secret-key protection octet"));
    }
    let protect_octet = source.get()?;
    *budget -= 1;

    if public.material.is_none() {
        // Unknown public-key algorithm: we can't know how many secret
        // MPIs follow or how they're framed, so we stop here and let
        // the dispatcher drain the remainder (§9: "the Packet record
        // has no algorithm payload").
        log::warn!(
            "secret certificate uses unrecognized public-key algorithm {}; secret material not decoded",
            public.pubkey_algo
        );
        return Ok(SecretKeyInfo {
            public,
            is_protected: protect_octet != 0,
            protect: None,
            secret: None,
            checksum: 0,
        });
    }

    match protect_octet {
        0 => {
            let secret = read_secret_material(public.pubkey_algo, source, budget)?;
            let checksum = read_checksum(common, source, budget)?;
            Ok(SecretKeyInfo { public, is_protected: false, protect: None, secret, checksum })
        }
        255 => {
            if *budget < 1 {
                return Err(Error::invalid_in(common.tag, "truncated secret-key cipher octet"));
            }
            let cipher_algo = SymmetricAlgorithm::from(source.get()?);
            *budget -= 1;
            let s2k_spec = s2k::parse(source, budget)?;
            if *budget < 8 {
                return Err(Error::invalid_in(common.tag, "truncated secret-key IV"));
            }
            let iv = read_iv(source, budget)?;
            let secret = read_secret_material(public.pubkey_algo, source, budget)?;
            let checksum = read_checksum(common, source, budget)?;
            Ok(SecretKeyInfo {
                public,
                is_protected: true,
                protect: Some(Protection { cipher_algo, s2k: s2k_spec, iv: Some(iv) }),
                secret,
                checksum,
            })
        }
        legacy_cipher => {
            let cipher_algo = SymmetricAlgorithm::from(legacy_cipher);
            let s2k_spec = S2K::Simple { hash: legacy_hash_algo(cipher_algo, public.pubkey_algo) };
            if *budget < 8 {
                return Err(Error::invalid_in(common.tag, "truncated legacy secret-key IV"));
            }
            let iv = read_iv(source, budget)?;
            // §9 open question: the legacy path stores this IV
            // unconditionally for ElGamal/DSA keys but only for
            // Blowfish-160 in the RSA path. Preserved as-observed
            // rather than "fixed" — see DESIGN.md.
            let store_iv = matches!(
                public.pubkey_algo,
                PublicKeyAlgorithm::ElgamalEncryptOnly | PublicKeyAlgorithm::ElgamalEncryptSign
            ) || public.pubkey_algo == PublicKeyAlgorithm::Dsa
                || cipher_algo == SymmetricAlgorithm::Blowfish;
            let secret = read_secret_material(public.pubkey_algo, source, budget)?;
            let checksum = read_checksum(common, source, budget)?;
            Ok(SecretKeyInfo {
                public,
                is_protected: true,
                protect: Some(Protection {
                    cipher_algo,
                    s2k: s2k_spec,
                    iv: if store_iv { Some(iv) } else { None },
                }),
                secret,
                checksum,
            })
        }
    }
}

fn read_public_material<C>(
    tag: crate::packet::Tag,
    algo: PublicKeyAlgorithm,
    source: &mut dyn BufferedReader<C>,
    budget: &mut usize,
) -> Result<Option<PublicKeyMaterial>> {
    Ok(match algo {
        PublicKeyAlgorithm::RsaEncryptSign
        | PublicKeyAlgorithm::RsaEncryptOnly
        | PublicKeyAlgorithm::RsaSignOnly => {
            let n = Mpi::parse(source, budget)?;
            let e = Mpi::parse(source, budget)?;
            Some(PublicKeyMaterial::Rsa { n, e })
        }
        PublicKeyAlgorithm::Dsa => {
            let p = Mpi::parse(source, budget)?;
            let q = Mpi::parse(source, budget)?;
            let g = Mpi::parse(source, budget)?;
            let y = Mpi::parse(source, budget)?;
            Some(PublicKeyMaterial::Dsa { p, q, g, y })
        }
        PublicKeyAlgorithm::ElgamalEncryptOnly | PublicKeyAlgorithm::ElgamalEncryptSign => {
            let p = Mpi::parse(source, budget)?;
            let g = Mpi::parse(source, budget)?;
            let y = Mpi::parse(source, budget)?;
            Some(PublicKeyMaterial::Elgamal { p, g, y })
        }
        PublicKeyAlgorithm::Unknown(v) => {
            log::warn!("certificate uses unrecognized public-key algorithm {v} in {tag:?}; no parameters decoded");
            None
        }
    })
}

fn read_secret_material<C>(
    algo: PublicKeyAlgorithm,
    source: &mut dyn BufferedReader<C>,
    budget: &mut usize,
) -> Result<Option<SecretKeyMaterial>> {
    Ok(match algo {
        PublicKeyAlgorithm::RsaEncryptSign
        | PublicKeyAlgorithm::RsaEncryptOnly
        | PublicKeyAlgorithm::RsaSignOnly => {
            let d = Mpi::parse(source, budget)?;
            let p = Mpi::parse(source, budget)?;
            let q = Mpi::parse(source, budget)?;
            let u = Mpi::parse(source, budget)?;
            Some(SecretKeyMaterial::Rsa { d, p, q, u })
        }
        PublicKeyAlgorithm::Dsa => Some(SecretKeyMaterial::Dsa { x: Mpi::parse(source, budget)? }),
        PublicKeyAlgorithm::ElgamalEncryptOnly | PublicKeyAlgorithm::ElgamalEncryptSign => {
            Some(SecretKeyMaterial::Elgamal { x: Mpi::parse(source, budget)? })
        }
        PublicKeyAlgorithm::Unknown(_) => None,
    })
}

/// Derives the S2K hash algorithm for the legacy (pre-255) secret-key
/// protection path, where the protection octet itself doubles as the
/// cipher algorithm and no hash algorithm is transmitted at all.
///
/// Blowfish-160 keys protecting an ElGamal secret use RIPEMD-160;
/// every other combination uses MD5. This is GnuPG-era folklore, not
/// an RFC rule, and is preserved verbatim per §4.8.
fn legacy_hash_algo(cipher: SymmetricAlgorithm, pubkey_algo: PublicKeyAlgorithm) -> HashAlgorithm {
    if cipher == SymmetricAlgorithm::Blowfish
        && matches!(
            pubkey_algo,
            PublicKeyAlgorithm::ElgamalEncryptOnly | PublicKeyAlgorithm::ElgamalEncryptSign
        )
    {
        HashAlgorithm::Ripemd160
    } else {
        HashAlgorithm::Md5
    }
}

fn read_iv<C>(source: &mut dyn BufferedReader<C>, budget: &mut usize) -> Result<[u8; 8]> {
    let bytes = source.data_consume_hard(8)?[..8].to_vec();
    *budget -= 8;
    let mut iv = [0u8; 8];
    iv.copy_from_slice(&bytes);
    Ok(iv)
}

fn read_checksum<C>(
    common: Common,
    source: &mut dyn BufferedReader<C>,
    budget: &mut usize,
) -> Result<u16> {
    if *budget < 2 {
        return Err(Error::invalid_in(common.tag, "truncated secret-key checksum"));
    }
    let c = source.read_be_u16()?;
    *budget -= 2;
    Ok(c)
}

fn read_rest<C>(source: &mut dyn BufferedReader<C>, budget: &mut usize) -> Result<Vec<u8>> {
    let n = *budget;
    let bytes = if n == 0 { Vec::new() } else { source.data_consume_hard(n)?[..n].to_vec() };
    *budget = 0;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::length::BodyLength;
    use crate::packet::{PublicKeyMaterial, Tag};
    use buffered_reader::Memory;

    fn common(tag: Tag, len: usize) -> Common {
        Common { tag, header_len: 2, length: BodyLength::Definite(len as u64) }
    }

    #[test]
    fn decodes_v4_rsa_public_key() {
        let mut bytes = vec![4u8];
        bytes.extend_from_slice(&[0, 0, 0, 10]); // created
        bytes.push(1); // RSA encrypt-or-sign
        bytes.extend_from_slice(&[0, 2, 0x03]); // n
        bytes.extend_from_slice(&[0, 2, 0x05]); // e
        let mut src = Memory::new(&bytes);
        let mut budget = bytes.len();
        let pkt = decode_public(common(Tag::PublicCert, bytes.len()), false, &mut src, &mut budget)
            .unwrap()
            .unwrap();
        assert_eq!(pkt.version, 4);
        assert_eq!(pkt.created, 10);
        assert_eq!(pkt.valid_days, 0);
        match pkt.material {
            Some(PublicKeyMaterial::Rsa { n, e }) => {
                assert_eq!(n.value(), &[3]);
                assert_eq!(e.value(), &[5]);
            }
            _ => panic!("expected RSA material"),
        }
        assert_eq!(budget, 0);
    }

    #[test]
    fn legacy_comment_quirk_on_public_subkey() {
        let mut bytes = vec![b'#'];
        bytes.extend_from_slice(b"a comment from 1991");
        let mut src = Memory::new(&bytes);
        let mut budget = bytes.len();
        let pkt =
            decode_public(common(Tag::PublicSubkeyCert, bytes.len()), true, &mut src, &mut budget)
                .unwrap();
        assert!(pkt.is_none());
        assert_eq!(budget, 0);
    }

    #[test]
    fn legacy_comment_quirk_not_armed_on_primary_key() {
        let mut bytes = vec![b'#'];
        bytes.extend_from_slice(b"not a subkey");
        let mut src = Memory::new(&bytes);
        let mut budget = bytes.len();
        let result = decode_public(common(Tag::PublicCert, bytes.len()), false, &mut src, &mut budget);
        assert!(result.is_err());
    }

    #[test]
    fn decodes_unprotected_secret_dsa_key() {
        let mut bytes = vec![4u8];
        bytes.extend_from_slice(&[0, 0, 0, 1]); // created
        bytes.push(17); // DSA
        bytes.extend_from_slice(&[0, 2, 0x03]); // p
        bytes.extend_from_slice(&[0, 2, 0x03]); // q
        bytes.extend_from_slice(&[0, 2, 0x03]); // g
        bytes.extend_from_slice(&[0, 2, 0x03]); // y
        bytes.push(0); // unprotected
        bytes.extend_from_slice(&[0, 2, 0x03]); // x
        bytes.extend_from_slice(&[0xaa, 0xbb]); // checksum
        let mut src = Memory::new(&bytes);
        let mut budget = bytes.len();
        let pkt = decode_secret(common(Tag::SecretCert, bytes.len()), &mut src, &mut budget).unwrap();
        assert!(!pkt.is_protected);
        assert_eq!(pkt.checksum, 0xaabb);
        assert_eq!(budget, 0);
    }

    #[test]
    fn decodes_s2k_protected_secret_rsa_key() {
        let mut bytes = vec![4u8];
        bytes.extend_from_slice(&[0, 0, 0, 1]);
        bytes.push(1); // RSA
        bytes.extend_from_slice(&[0, 2, 0x03]); // n
        bytes.extend_from_slice(&[0, 2, 0x03]); // e
        bytes.push(255); // extended protection
        bytes.push(7); // AES-128
        bytes.push(0); // S2K mode 0
        bytes.push(2); // SHA-1
        bytes.extend_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]); // IV
        bytes.extend_from_slice(&[0, 2, 0x03]); // d
        bytes.extend_from_slice(&[0, 2, 0x03]); // p
        bytes.extend_from_slice(&[0, 2, 0x03]); // q
        bytes.extend_from_slice(&[0, 2, 0x03]); // u
        bytes.extend_from_slice(&[0xcc, 0xdd]); // checksum
        let mut src = Memory::new(&bytes);
        let mut budget = bytes.len();
        let pkt = decode_secret(common(Tag::SecretCert, bytes.len()), &mut src, &mut budget).unwrap();
        assert!(pkt.is_protected);
        let protect = pkt.protect.unwrap();
        assert_eq!(protect.cipher_algo, SymmetricAlgorithm::Aes128);
        assert_eq!(protect.iv, Some([1, 2, 3, 4, 5, 6, 7, 8]));
        assert_eq!(budget, 0);
    }

    #[test]
    fn legacy_protection_stores_iv_for_elgamal_not_rsa() {
        // ElGamal: IV always stored under the legacy path.
        let mut bytes = vec![4u8];
        bytes.extend_from_slice(&[0, 0, 0, 1]);
        bytes.push(16); // ElGamal (encrypt only)
        bytes.extend_from_slice(&[0, 2, 0x03]); // p
        bytes.extend_from_slice(&[0, 2, 0x03]); // g
        bytes.extend_from_slice(&[0, 2, 0x03]); // y
        bytes.push(2); // legacy cipher = Triple-DES (not Blowfish)
        bytes.extend_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]); // IV
        bytes.extend_from_slice(&[0, 2, 0x03]); // x
        bytes.extend_from_slice(&[0xaa, 0xbb]);
        let mut src = Memory::new(&bytes);
        let mut budget = bytes.len();
        let pkt = decode_secret(common(Tag::SecretCert, bytes.len()), &mut src, &mut budget).unwrap();
        let protect = pkt.protect.unwrap();
        assert_eq!(protect.iv, Some([1, 2, 3, 4, 5, 6, 7, 8]));

        // RSA with the same non-Blowfish legacy cipher: IV is read off
        // the wire but not retained.
        let mut bytes2 = vec![4u8];
        bytes2.extend_from_slice(&[0, 0, 0, 1]);
        bytes2.push(1); // RSA
        bytes2.extend_from_slice(&[0, 2, 0x03]);
        bytes2.extend_from_slice(&[0, 2, 0x03]);
        bytes2.push(2); // Triple-DES
        bytes2.extend_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);
        bytes2.extend_from_slice(&[0, 2, 0x03]);
        bytes2.extend_from_slice(&[0, 2, 0x03]);
        bytes2.extend_from_slice(&[0, 2, 0x03]);
        bytes2.extend_from_slice(&[0, 2, 0x03]);
        bytes2.extend_from_slice(&[0xaa, 0xbb]);
        let mut src2 = Memory::new(&bytes2);
        let mut budget2 = bytes2.len();
        let pkt2 = decode_secret(common(Tag::SecretCert, bytes2.len()), &mut src2, &mut budget2).unwrap();
        let protect2 = pkt2.protect.unwrap();
        assert_eq!(protect2.iv, None);
    }

    #[test]
    fn unknown_pubkey_algo_drains_without_secret_material() {
        let mut bytes = vec![4u8];
        bytes.extend_from_slice(&[0, 0, 0, 1]);
        bytes.push(99); // unrecognized
        bytes.push(0); // protection octet (meaningless here)
        let mut src = Memory::new(&bytes);
        let mut budget = bytes.len();
        let pkt = decode_secret(common(Tag::SecretCert, bytes.len()), &mut src, &mut budget).unwrap();
        assert!(pkt.public.material.is_none());
        assert!(pkt.secret.is_none());
        assert!(pkt.protect.is_none());
    }
}
