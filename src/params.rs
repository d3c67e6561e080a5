//! Session parameters: the ordered list of host public keys and the
//! threshold `t` that every participant and the coordinator must agree on
//! before a session starts.

use crate::error::{ChillDkgResult, Error};
use crate::keys::HostPubKey;
use crate::point::point_from_bytes;
use crate::utils::{tagged_hash_bip_dkg, Vec};

/// Common parameters of a session: the ordered host public keys of all `n`
/// participants and the threshold `t`.
///
/// All participants and the coordinator in a session must be given an
/// identical `SessionParams`, in particular with host public keys in the
/// same order, so that honest participants agree on participant indices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionParams {
    pub hostpubkeys: Vec<HostPubKey>,
    pub t: u32,
}

/// A 32-byte collision-resistant fingerprint of a [`SessionParams`]: if two
/// parties have derived identical `ParamsId`s (verifiable out of band), they
/// agree on every host public key and on `t`.
pub type ParamsId = [u8; 32];

impl SessionParams {
    pub fn new(hostpubkeys: Vec<HostPubKey>, t: u32) -> Self {
        SessionParams { hostpubkeys, t }
    }

    pub fn n(&self) -> usize {
        self.hostpubkeys.len()
    }
}

/// Validates a [`SessionParams`]: `1 <= t <= n`, every host public key
/// decodes as a valid secp256k1 point, and there are no duplicates.
pub fn params_validate(params: &SessionParams) -> ChillDkgResult<()> {
    let n = params.hostpubkeys.len();
    if params.t == 0 || (params.t as usize) > n {
        return Err(Error::Threshold);
    }

    for (i, hpk) in params.hostpubkeys.iter().enumerate() {
        if point_from_bytes(&hpk.0).is_err() {
            return Err(Error::InvalidContribution {
                index: i as u32,
                reason: "participant has provided an invalid host public key".into(),
            });
        }
    }

    for i in 0..n {
        for j in (i + 1)..n {
            if params.hostpubkeys[i] == params.hostpubkeys[j] {
                return Err(Error::DuplicateHostpubkey);
            }
        }
    }

    Ok(())
}

/// Computes the parameters ID:
/// `TaggedHash("params_id", t_be32 || hostpubkeys...)`.
///
/// Serves as a convenient out-of-band comparison: if all participants have
/// obtained an identical parameters ID, they have all obtained authentic
/// host public keys and agree on `t`.
///
/// # Errors
/// Validates `params` first (see [`params_validate`]), and additionally
/// returns [`Error::ThresholdOverflow`] if `t` does not fit in 32 bits (which
/// cannot happen through this type, since `t` is already a `u32`, but is
/// preserved for parity with the protocol's documented error surface when
/// `SessionParams` is reconstructed from untrusted recovery data).
pub fn params_id(params: &SessionParams) -> ChillDkgResult<ParamsId> {
    params_validate(params)?;

    let mut msg = Vec::with_capacity(4 + 33 * params.n());
    msg.extend_from_slice(&params.t.to_be_bytes());
    for hpk in &params.hostpubkeys {
        msg.extend_from_slice(&hpk.0);
    }
    Ok(tagged_hash_bip_dkg("params_id", &msg))
}
