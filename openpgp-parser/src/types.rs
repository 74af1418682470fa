//! Algorithm identifiers and other small value types shared across the
//! payload decoders.
//!
//! These mirror [Section 9 of RFC 4880]'s registries as inherited by
//! the RFC 1991 / RFC 2440 era packets this parser targets: no elliptic
//! curve algorithms are modeled, since none of the packet versions in
//! scope (`v2`/`v3`/`v4`) reference them here.
//!
//! [Section 9 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-9

use std::fmt;

macro_rules! algo_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $( $variant:ident = $value:expr => $doc:expr ),* $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $(
                #[doc = $doc]
                $variant,
            )*
            /// An algorithm identifier this crate does not recognize.
            Unknown(u8),
        }

        impl From<u8> for $name {
            fn from(v: u8) -> Self {
                match v {
                    $( $value => $name::$variant, )*
                    other => $name::Unknown(other),
                }
            }
        }

        impl From<$name> for u8 {
            fn from(v: $name) -> u8 {
                match v {
                    $( $name::$variant => $value, )*
                    $name::Unknown(other) => other,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                match self {
                    $( $name::$variant => write!(f, stringify!($variant)), )*
                    $name::Unknown(v) => write!(f, "unknown({})", v),
                }
            }
        }
    };
}

algo_enum! {
    /// A public-key algorithm identifier.
    PublicKeyAlgorithm {
        RsaEncryptSign = 1 => "RSA (Encrypt or Sign)",
        RsaEncryptOnly = 2 => "RSA (Encrypt only)",
        RsaSignOnly = 3 => "RSA (Sign only)",
        ElgamalEncryptOnly = 16 => "Elgamal (Encrypt only)",
        Dsa = 17 => "DSA",
        ElgamalEncryptSign = 20 => "Elgamal (Encrypt or Sign, deprecated)",
    }
}

algo_enum! {
    /// A symmetric cipher algorithm identifier.
    SymmetricAlgorithm {
        Plaintext = 0 => "Plaintext (unencrypted)",
        Idea = 1 => "IDEA",
        TripleDes = 2 => "Triple-DES",
        Cast5 = 3 => "CAST5",
        Blowfish = 4 => "Blowfish (160-bit key)",
        Aes128 = 7 => "AES-128",
        Aes192 = 8 => "AES-192",
        Aes256 = 9 => "AES-256",
        Twofish = 10 => "Twofish",
    }
}

algo_enum! {
    /// A hash algorithm identifier.
    HashAlgorithm {
        Md5 = 1 => "MD5",
        Sha1 = 2 => "SHA-1",
        Ripemd160 = 3 => "RIPEMD-160",
        Sha256 = 8 => "SHA-256",
        Sha384 = 9 => "SHA-384",
        Sha512 = 10 => "SHA-512",
        Sha224 = 11 => "SHA-224",
    }
}

algo_enum! {
    /// A compression algorithm identifier.
    CompressionAlgorithm {
        Uncompressed = 0 => "Uncompressed",
        Zip = 1 => "ZIP",
        Zlib = 2 => "ZLIB",
        Bzip2 = 3 => "BZip2",
    }
}

/// A string-to-key specifier: the method used to derive a symmetric
/// key from a passphrase.
///
/// Note: this parser's mode space is `{0, 1, 4}`, not RFC 4880's
/// `{0, 1, 3}` ("iterated and salted"), and mode 4's iteration count is
/// a raw 4-byte integer rather than RFC 4880's one-byte coded form.
/// That is intentional — see the module-level note in
/// [`crate::decode::s2k`] and the open question recorded in
/// `DESIGN.md`; it is preserved here rather than silently "corrected"
/// to the RFC value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum S2K {
    /// Mode 0: the passphrase is hashed directly.
    Simple {
        /// The hash algorithm used to derive the key.
        hash: HashAlgorithm,
    },
    /// Mode 1: the passphrase is hashed together with a salt.
    Salted {
        /// The hash algorithm used to derive the key.
        hash: HashAlgorithm,
        /// An 8-byte salt.
        salt: [u8; 8],
    },
    /// Mode 4: the passphrase is hashed together with a salt, a fixed
    /// number of times.
    Iterated {
        /// The hash algorithm used to derive the key.
        hash: HashAlgorithm,
        /// An 8-byte salt.
        salt: [u8; 8],
        /// The (decoded) iteration count.
        count: u32,
    },
}

impl S2K {
    /// The hash algorithm this specifier uses, regardless of mode.
    pub fn hash_algo(&self) -> HashAlgorithm {
        match self {
            S2K::Simple { hash } | S2K::Salted { hash, .. }
                | S2K::Iterated { hash, .. } => *hash,
        }
    }
}
