//! Small shared helpers: domain-separated tagged hashing, a PRF built on
//! HKDF, and the `no_std`/`std` `Vec` shim the rest of the crate imports
//! from here.

#[cfg(not(feature = "std"))]
pub use alloc::{
    borrow::ToOwned,
    boxed::Box,
    string::{String, ToString},
    vec::{self, Vec},
};

#[cfg(feature = "std")]
pub use std::{
    borrow::ToOwned,
    boxed::Box,
    string::{String, ToString},
    vec::{self, Vec},
};

use hkdf::Hkdf;
use sha2::{Digest, Sha256};

/// The fixed domain-separation prefix shared by every tagged hash in this
/// crate. All specific tags below are formed as `BIP_TAG` followed by a
/// short, unique suffix.
pub const BIP_TAG: &str = "BIP DKG/";

/// BIP340-style tagged hash: `SHA256(SHA256(tag) || SHA256(tag) || msg)`.
pub fn tagged_hash(tag: &[u8], msg: &[u8]) -> [u8; 32] {
    let tag_hash = Sha256::digest(tag);
    let mut hasher = Sha256::new();
    hasher.update(tag_hash);
    hasher.update(tag_hash);
    hasher.update(msg);
    hasher.finalize().into()
}

/// [`tagged_hash`] using a tag formed from [`BIP_TAG`] followed by `suffix`.
pub fn tagged_hash_bip_dkg(suffix: &str, msg: &[u8]) -> [u8; 32] {
    let mut tag = Vec::with_capacity(BIP_TAG.len() + suffix.len());
    tag.extend_from_slice(BIP_TAG.as_bytes());
    tag.extend_from_slice(suffix.as_bytes());
    tagged_hash(&tag, msg)
}

/// A domain-separated pseudorandom function built from HKDF-SHA256: `prf(ikm,
/// label)` expands `ikm` (with an empty salt) under `info = label` into a
/// 32-byte output.
pub fn prf(ikm: &[u8], label: &str) -> [u8; 32] {
    let hk = Hkdf::<Sha256>::new(None, ikm);
    let mut okm = [0u8; 32];
    // The only way `expand` fails is if the requested length is too long for
    // the underlying hash function's output; 32 bytes from HKDF-SHA256 never
    // hits that limit.
    hk.expand(label.as_bytes(), &mut okm)
        .expect("32-byte HKDF expansion always succeeds");
    okm
}

/// Concatenates a `u32` as 4 big-endian bytes in front of `rest`, for
/// building hash preimages that need an index bound into them.
pub fn with_u32_be(n: u32, rest: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(4 + rest.len());
    out.extend_from_slice(&n.to_be_bytes());
    out.extend_from_slice(rest);
    out
}
