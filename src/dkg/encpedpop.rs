//! EncPedPop: a Pedersen DKG whose per-pair shares travel through the
//! coordinator as ciphertext, encrypted with pairwise Diffie-Hellman pads.
//!
//! Grounded in the teacher's two-round participant/coordinator exchange
//! shape, re-specified around [`crate::dkg::secret_share::Vss`] instead of
//! the teacher's complaint-based dealing.

use crate::dkg::secret_share::{sum_commitments, verify_secshare, VerifiableSecretSharingCommitment, Vss};
use crate::error::{ChillDkgResult, Error};
use crate::keys::{hostseckey, HostPubKey, Seed};
use crate::point::{mul_gen, point_from_bytes, point_to_bytes, scalar_from_bytes_mod_order, scalar_to_bytes, Point, Scalar};
use crate::utils::{tagged_hash_bip_dkg, with_u32_be, Vec};

use zeroize::Zeroize;

/// Serializes the session's `(t, hostpubkeys)` pair into the fixed preimage
/// every EncPedPop hash in this session is domain-separated against.
pub(crate) fn enc_context(t: u32, hostpubkeys: &[HostPubKey]) -> Vec<u8> {
    let mut out = Vec::with_capacity(4 + 33 * hostpubkeys.len());
    out.extend_from_slice(&t.to_be_bytes());
    for hpk in hostpubkeys {
        out.extend_from_slice(&hpk.0);
    }
    out
}

/// Derives the per-session VSS seed from a participant's long-term seed, its
/// own pubnonce, and the session's `enc_context`. Reproducible given only
/// these three values, which is what makes recovery possible without the
/// original `random` input to [`participant_step1`].
pub(crate) fn derive_session_seed(seed: &Seed, pubnonce: &[u8; 33], enc_context: &[u8]) -> [u8; 32] {
    let mut msg = Vec::with_capacity(32 + 33 + enc_context.len());
    msg.extend_from_slice(&seed.0);
    msg.extend_from_slice(pubnonce);
    msg.extend_from_slice(enc_context);
    tagged_hash_bip_dkg("encpedpop session seed", &msg)
}

/// Derives the ephemeral nonce scalar for `participant_step1`: fresh on every
/// fresh `random`, but reproducible given `(seed, random, idx, enc_context)`.
fn derive_nonce(seed: &Seed, random: &[u8; 32], idx: u32, enc_context: &[u8]) -> Scalar {
    let mut msg = Vec::with_capacity(32 + 32 + 4 + enc_context.len());
    msg.extend_from_slice(&seed.0);
    msg.extend_from_slice(random);
    msg.extend_from_slice(&idx.to_be_bytes());
    msg.extend_from_slice(enc_context);
    scalar_from_bytes_mod_order(&tagged_hash_bip_dkg("encpedpop nonce", &msg))
}

/// Diffie-Hellman shared value `scalar * point`, encoded as compressed bytes.
pub(crate) fn ecdh(scalar: &Scalar, point: &Point) -> ChillDkgResult<[u8; 33]> {
    point_to_bytes(&(*point * scalar))
}

/// The directional pad `H(ecdh_bytes || enc_context || from || to)` masking
/// the share sent by participant `from` to participant `to`. By the
/// Diffie-Hellman symmetry `k_from * hostpubkey_to == hostseckey_to *
/// pubnonce_from`, sender and recipient compute the same pad from different
/// scalar/point pairs.
pub(crate) fn pad(ecdh_bytes: &[u8; 33], enc_context: &[u8], from: u32, to: u32) -> Scalar {
    let mut msg = Vec::with_capacity(33 + enc_context.len() + 8);
    msg.extend_from_slice(ecdh_bytes);
    msg.extend_from_slice(enc_context);
    msg.extend_from_slice(&from.to_be_bytes());
    msg.extend_from_slice(&to.to_be_bytes());
    scalar_from_bytes_mod_order(&tagged_hash_bip_dkg("encpedpop pad", &msg))
}

/// Builds the CertEq transcript: the literal concatenation of every field
/// the recovery data carries ahead of its certificate (see
/// [`crate::dkg::recovery`]), so that `eq_input` IS the recovery-data prefix
/// rather than a separate digest of it.
pub(crate) fn build_eq_input(
    t: u32,
    sum_coms: &VerifiableSecretSharingCommitment,
    hostpubkeys: &[HostPubKey],
    pubnonces: &[[u8; 33]],
    enc_secshares: &[Scalar],
) -> ChillDkgResult<Vec<u8>> {
    let n = hostpubkeys.len();
    let mut out = Vec::with_capacity(4 + 33 * sum_coms.t() + 33 * n + 33 * n + 32 * n);
    out.extend_from_slice(&t.to_be_bytes());
    for p in &sum_coms.points {
        out.extend_from_slice(&point_to_bytes(p)?);
    }
    for hpk in hostpubkeys {
        out.extend_from_slice(&hpk.0);
    }
    for pn in pubnonces {
        out.extend_from_slice(pn);
    }
    for s in enc_secshares {
        out.extend_from_slice(&scalar_to_bytes(s));
    }
    Ok(out)
}

/// State a participant keeps between [`participant_step1`] and
/// [`participant_step2`]. Its one secret field is zeroized on drop.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct EncPedPopState {
    #[zeroize(skip)]
    pub(crate) idx: u32,
    #[zeroize(skip)]
    pub(crate) t: u32,
    #[zeroize(skip)]
    pub(crate) enc_context: Vec<u8>,
    pub(crate) own_secshare: Scalar,
}

/// The message a participant sends to the coordinator in round 1.
#[derive(Clone)]
pub struct ParticipantMsg1 {
    pub commitment: VerifiableSecretSharingCommitment,
    pub pubnonce: [u8; 33],
    /// Length `n`; entry `idx` (the sender's own index) is an unused
    /// placeholder, since a sender never encrypts a share to itself.
    pub enc_shares: Vec<Scalar>,
}

/// The coordinator's aggregated round-1 response, broadcast to every
/// participant as `cmsg1`.
///
/// Carries no `eq_input` field: the transcript is never transmitted as its
/// own value, since an untrusted coordinator could then ship an `eq_input`
/// that doesn't match `sum_coms`/`pubnonces`/`enc_secshares`. Every party
/// rebuilds `eq_input` itself from the fields here via
/// [`build_eq_input`].
#[derive(Clone)]
pub struct CoordinatorMsg1 {
    pub sum_coms: VerifiableSecretSharingCommitment,
    pub pubnonces: Vec<[u8; 33]>,
    pub enc_secshares: Vec<Scalar>,
}

/// Participant round 1: derive a fresh ephemeral nonce, run the VSS, and
/// encrypt a share for every other participant.
pub fn participant_step1(
    seed: &Seed,
    t: u32,
    hostpubkeys: &[HostPubKey],
    idx: u32,
    random: [u8; 32],
) -> ChillDkgResult<(EncPedPopState, ParticipantMsg1)> {
    let n = hostpubkeys.len();
    let ctx = enc_context(t, hostpubkeys);

    let k = derive_nonce(seed, &random, idx, &ctx);
    let pubnonce_point = mul_gen(&k);
    let pubnonce = point_to_bytes(&pubnonce_point)?;

    let session_seed = derive_session_seed(seed, &pubnonce, &ctx);
    let vss = Vss::generate(&session_seed, t);
    let commitment = vss.commit();
    let own_secshare = vss.secshare_for(idx);

    let mut enc_shares = alloc_zero_scalars(n);
    for j in 0..n as u32 {
        if j == idx {
            continue;
        }
        let hostpubkey_j = point_from_bytes(&hostpubkeys[j as usize].0).map_err(|_| {
            Error::InvalidContribution {
                index: j,
                reason: "host public key does not decode to a valid point".into(),
            }
        })?;
        let ecdh_bytes = ecdh(&k, &hostpubkey_j)?;
        let pad_ij = pad(&ecdh_bytes, &ctx, idx, j);
        enc_shares[j as usize] = vss.secshare_for(j) + pad_ij;
    }

    let state = EncPedPopState {
        idx,
        t,
        enc_context: ctx,
        own_secshare,
    };
    let msg = ParticipantMsg1 {
        commitment,
        pubnonce,
        enc_shares,
    };
    Ok((state, msg))
}

fn alloc_zero_scalars(n: usize) -> Vec<Scalar> {
    let mut v = Vec::with_capacity(n);
    for _ in 0..n {
        v.push(Scalar::from(0u64));
    }
    v
}

/// Coordinator round 1: verify commitment shapes, aggregate the Feldman
/// commitments, and sum the pairwise ciphertexts per recipient.
pub fn coordinator_step(
    msgs: &[ParticipantMsg1],
    t: u32,
    hostpubkeys: &[HostPubKey],
) -> ChillDkgResult<CoordinatorMsg1> {
    let n = hostpubkeys.len();
    if msgs.len() != n {
        return Err(Error::InvalidContribution {
            index: 0,
            reason: "expected exactly n participant messages".into(),
        });
    }
    for (i, m) in msgs.iter().enumerate() {
        if m.commitment.t() != t as usize {
            return Err(Error::InvalidContribution {
                index: i as u32,
                reason: "VSS commitment has the wrong length".into(),
            });
        }
        if m.enc_shares.len() != n {
            return Err(Error::InvalidContribution {
                index: i as u32,
                reason: "encrypted share list has the wrong length".into(),
            });
        }
    }

    let coms: Vec<VerifiableSecretSharingCommitment> = msgs.iter().map(|m| m.commitment.clone()).collect();
    let sum_coms = sum_commitments(&coms);

    let pubnonces: Vec<[u8; 33]> = msgs.iter().map(|m| m.pubnonce).collect();

    let mut enc_secshares = alloc_zero_scalars(n);
    for j in 0..n {
        let mut acc = Scalar::from(0u64);
        for (i, m) in msgs.iter().enumerate() {
            if i == j {
                continue;
            }
            acc = acc + m.enc_shares[j];
        }
        enc_secshares[j] = acc;
    }

    Ok(CoordinatorMsg1 {
        sum_coms,
        pubnonces,
        enc_secshares,
    })
}

/// Participant round 2: decrypt the aggregated share, fold in the
/// participant's own contribution, and verify the result against the
/// aggregated commitment.
pub fn participant_step2(
    state: &EncPedPopState,
    seed: &Seed,
    hostpubkeys: &[HostPubKey],
    cmsg1: &CoordinatorMsg1,
) -> ChillDkgResult<(Scalar, Point, Vec<Point>)> {
    let n = hostpubkeys.len();
    if cmsg1.sum_coms.t() != state.t as usize {
        return Err(Error::InvalidContribution {
            index: state.idx,
            reason: "aggregated commitment has the wrong length".into(),
        });
    }
    if cmsg1.pubnonces.len() != n || cmsg1.enc_secshares.len() != n {
        return Err(Error::InvalidContribution {
            index: state.idx,
            reason: "coordinator message has the wrong number of entries".into(),
        });
    }

    let hsk = hostseckey(seed);
    let mut acc = cmsg1.enc_secshares[state.idx as usize];
    for j in 0..n as u32 {
        if j == state.idx {
            continue;
        }
        let pubnonce_j = point_from_bytes(&cmsg1.pubnonces[j as usize]).map_err(|_| Error::InvalidContribution {
            index: j,
            reason: "pubnonce does not decode to a valid point".into(),
        })?;
        let ecdh_bytes = ecdh(&hsk.0, &pubnonce_j)?;
        let pad_ji = pad(&ecdh_bytes, &state.enc_context, j, state.idx);
        acc = acc - pad_ji;
    }
    let secshare = acc + state.own_secshare;

    let pubshare = cmsg1.sum_coms.pubshare(state.idx);
    if !verify_secshare(&secshare, &pubshare) {
        return Err(Error::InvalidContribution {
            index: state.idx,
            reason: "decrypted share failed verification against the aggregated commitment".into(),
        });
    }

    let threshold_pubkey = cmsg1.sum_coms.commitment_to_secret();
    let pubshares = (0..n as u32).map(|i| cmsg1.sum_coms.pubshare(i)).collect();
    Ok((secshare, threshold_pubkey, pubshares))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::hostpubkey;

    fn seeds(n: usize) -> Vec<Seed> {
        (0..n).map(|i| Seed([i as u8 + 1; 32])).collect()
    }

    fn hostpubkeys_for(seeds: &[Seed]) -> Vec<HostPubKey> {
        seeds.iter().map(|s| hostpubkey(&s.0).unwrap()).collect()
    }

    #[test]
    fn two_party_round_completes_and_agrees() {
        let seeds = seeds(2);
        let hostpubkeys = hostpubkeys_for(&seeds);
        let t = 2u32;

        let (state0, msg0) = participant_step1(&seeds[0], t, &hostpubkeys, 0, [10u8; 32]).unwrap();
        let (state1, msg1) = participant_step1(&seeds[1], t, &hostpubkeys, 1, [20u8; 32]).unwrap();

        let cmsg1 = coordinator_step(&[msg0, msg1], t, &hostpubkeys).unwrap();

        let (share0, tpk0, pubshares0) = participant_step2(&state0, &seeds[0], &hostpubkeys, &cmsg1).unwrap();
        let (share1, tpk1, pubshares1) = participant_step2(&state1, &seeds[1], &hostpubkeys, &cmsg1).unwrap();

        assert_eq!(tpk0, tpk1);
        assert_eq!(pubshares0, pubshares1);
        assert_eq!(mul_gen(&share0), pubshares0[0]);
        assert_eq!(mul_gen(&share1), pubshares0[1]);
    }

    #[test]
    fn tampered_enc_share_fails_verification() {
        let seeds = seeds(3);
        let hostpubkeys = hostpubkeys_for(&seeds);
        let t = 2u32;

        let (state0, msg0) = participant_step1(&seeds[0], t, &hostpubkeys, 0, [1u8; 32]).unwrap();
        let (_state1, mut msg1) = participant_step1(&seeds[1], t, &hostpubkeys, 1, [2u8; 32]).unwrap();
        let (_state2, msg2) = participant_step1(&seeds[2], t, &hostpubkeys, 2, [3u8; 32]).unwrap();

        msg1.enc_shares[0] = msg1.enc_shares[0] + Scalar::from(1u64);

        let cmsg1 = coordinator_step(&[msg0, msg1, msg2], t, &hostpubkeys).unwrap();
        let result = participant_step2(&state0, &seeds[0], &hostpubkeys, &cmsg1);
        assert!(result.is_err());
    }
}
