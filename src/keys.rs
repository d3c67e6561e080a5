//! Long-term host identities.
//!
//! A participant's only long-term secret is its 32-byte [`Seed`]. Everything
//! else — the host secret/public keypair, and transitively every per-session
//! secret — is derived from it, so that a participant who has backed up the
//! seed (plus per-session [`RecoveryData`](crate::dkg::recovery::RecoveryData))
//! can always recompute its share.

use zeroize::Zeroize;

use crate::error::{ChillDkgResult, Error};
use crate::point::{mul_gen, point_to_bytes, scalar_from_bytes_mod_order, Scalar};
use crate::utils::prf;

/// A participant's long-term secret seed: 32 opaque bytes of high-entropy
/// randomness. `Seed` is never transmitted and never leaves the owning
/// participant's memory; it is zeroized when dropped.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct Seed(pub [u8; 32]);

impl Seed {
    /// Wraps a 32-byte seed. Fails if `bytes` is not exactly 32 bytes long.
    pub fn new(bytes: &[u8]) -> ChillDkgResult<Self> {
        let arr: [u8; 32] = bytes.try_into().map_err(|_| Error::SeedLength)?;
        Ok(Seed(arr))
    }
}

/// A 33-byte SEC1-compressed secp256k1 point serving as a participant's
/// long-term public identity. Equality and ordering are defined over the
/// encoded bytes, matching the reference implementation's use of host
/// public keys as plain byte strings (e.g. for duplicate detection and
/// index lookup).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HostPubKey(pub [u8; 33]);

impl HostPubKey {
    pub fn as_bytes(&self) -> &[u8; 33] {
        &self.0
    }
}

/// The host secret key scalar, derived from a [`Seed`] via
/// [`hostseckey`]. Zeroized on drop; never serialized.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub(crate) struct HostSecretKey(pub(crate) Scalar);

/// Derives the host secret key from a participant's seed:
/// `PRF(seed, "chilldkg hostseckey")`, interpreted as a scalar mod `q`.
pub(crate) fn hostseckey(seed: &Seed) -> HostSecretKey {
    let bytes = prf(&seed.0, "chilldkg hostseckey");
    HostSecretKey(scalar_from_bytes_mod_order(&bytes))
}

/// Derives both halves of a participant's host keypair from its seed.
pub(crate) fn hostkeypair(seed: &Seed) -> ChillDkgResult<(HostSecretKey, HostPubKey)> {
    let sk = hostseckey(seed);
    let pk_point = mul_gen(&sk.0);
    let pk = HostPubKey(point_to_bytes(&pk_point)?);
    Ok((sk, pk))
}

/// Computes the participant's host public key from its seed.
///
/// This is the long-term cryptographic identity of the participant, derived
/// deterministically from the secret seed. The same seed (and thus host
/// public key) can be used across multiple DKG sessions.
///
/// # Errors
/// Returns [`Error::SeedLength`] if `seed_bytes` is not 32 bytes.
pub fn hostpubkey(seed_bytes: &[u8]) -> ChillDkgResult<HostPubKey> {
    let seed = Seed::new(seed_bytes)?;
    Ok(hostkeypair(&seed)?.1)
}
