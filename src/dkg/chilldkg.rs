//! The ChillDKG orchestrator: the state machine that drives EncPedPop and
//! CertEq to a finished session on both the participant and coordinator
//! side.

use zeroize::Zeroize;

use crate::dkg::certeq::{certeq_coordinator_step, certeq_participant_step, certeq_verify};
use crate::dkg::encpedpop::{self, CoordinatorMsg1, EncPedPopState, ParticipantMsg1};
use crate::dkg::secret_share::VerifiableSecretSharingCommitment;
use crate::error::{ChillDkgResult, Error};
use crate::keys::{hostkeypair, hostseckey, Seed};
use crate::params::{params_validate, SessionParams};
use crate::point::{Point, Scalar};
use crate::utils::Vec;

/// The final output of a completed (or recovered) session.
///
/// `secshare` is `None` on the coordinator side, which never learns any
/// participant's share.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DKGOutput {
    pub secshare: Option<Scalar>,
    pub threshold_pubkey: Point,
    pub pubshares: Vec<Point>,
}

/// A participant's signed round-2 message: a CertEq signature over the
/// session transcript.
pub type ParticipantMsg2 = [u8; 64];

/// The coordinator's round-2 message: the assembled certificate.
pub type CoordinatorMsg2 = Vec<u8>;

fn locate_index(seed: &Seed, hostpubkeys: &[crate::keys::HostPubKey]) -> ChillDkgResult<u32> {
    let (_, my_pub) = hostkeypair(seed)?;
    hostpubkeys
        .iter()
        .position(|h| *h == my_pub)
        .map(|i| i as u32)
        .ok_or(Error::InvalidContribution {
            index: 0,
            reason: "own host public key is not present in the session parameters".into(),
        })
}

/// A participant's freshly-derived share, held only long enough to be moved
/// into the finalized [`DKGOutput`]. Zeroized on drop, independent of
/// whatever container it's embedded in.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub(crate) struct SecretShare(pub(crate) Scalar);

/// Participant state after `participant_step1`, held until `participant_step2`.
///
/// Does not itself implement `Drop`: the one secret it carries,
/// `enc_state`'s share, zeroizes independently, which keeps this struct's
/// fields freely movable (`participant_step2` consumes it by destructuring).
#[derive(Clone)]
pub struct ParticipantState1 {
    pub(crate) params: SessionParams,
    pub(crate) idx: u32,
    pub(crate) enc_state: EncPedPopState,
}

/// Participant state after `participant_step2`, held until `participant_finalize`.
///
/// Like `ParticipantState1`, carries no `Drop` impl of its own; `secshare`
/// zeroizes on its own.
#[derive(Clone)]
pub struct ParticipantState2 {
    pub(crate) params: SessionParams,
    pub(crate) idx: u32,
    pub(crate) eq_input: Vec<u8>,
    pub(crate) secshare: SecretShare,
    pub(crate) threshold_pubkey: Point,
    pub(crate) pubshares: Vec<Point>,
}

/// Coordinator state held between `coordinator_step1` and `coordinator_finalize`.
#[derive(Clone)]
pub struct CoordinatorState {
    pub(crate) params: SessionParams,
    pub(crate) eq_input: Vec<u8>,
    pub(crate) sum_coms: VerifiableSecretSharingCommitment,
}

/// Validates `params`, locates the caller's own index by its derived host
/// public key, and runs EncPedPop round 1.
pub fn participant_step1(
    seed: &Seed,
    params: &SessionParams,
    random: [u8; 32],
) -> ChillDkgResult<(ParticipantState1, ParticipantMsg1)> {
    params_validate(params)?;
    let idx = locate_index(seed, &params.hostpubkeys)?;
    let (enc_state, msg1) = encpedpop::participant_step1(seed, params.t, &params.hostpubkeys, idx, random)?;
    let state = ParticipantState1 {
        params: params.clone(),
        idx,
        enc_state,
    };
    Ok((state, msg1))
}

/// Runs EncPedPop round 2 and signs the resulting transcript via CertEq.
pub fn participant_step2(
    seed: &Seed,
    state1: ParticipantState1,
    cmsg1: &CoordinatorMsg1,
    aux_rand: [u8; 32],
) -> ChillDkgResult<(ParticipantState2, ParticipantMsg2)> {
    let (secshare, threshold_pubkey, pubshares) =
        encpedpop::participant_step2(&state1.enc_state, seed, &state1.params.hostpubkeys, cmsg1)?;

    // Rebuild the transcript ourselves from the cmsg1 fields we just verified
    // our share against, rather than trusting a transmitted `eq_input` from
    // the untrusted coordinator.
    let eq_input = encpedpop::build_eq_input(
        state1.params.t,
        &cmsg1.sum_coms,
        &state1.params.hostpubkeys,
        &cmsg1.pubnonces,
        &cmsg1.enc_secshares,
    )?;
    let hsk = hostseckey(seed);
    let sig = certeq_participant_step(&hsk.0, state1.idx, &eq_input, aux_rand)?;

    let state2 = ParticipantState2 {
        params: state1.params,
        idx: state1.idx,
        eq_input,
        secshare: SecretShare(secshare),
        threshold_pubkey,
        pubshares,
    };
    Ok((state2, sig))
}

/// Verifies the certificate and, on success, returns the DKG output and the
/// recovery data. On certificate failure, returns `SessionNotFinalized`
/// without having touched the caller's seed; per the protocol's error
/// handling policy, this is not terminal and the session can still be
/// completed later via [`crate::dkg::recovery::recover`] given recovery data
/// from another party.
pub fn participant_finalize(
    state2: ParticipantState2,
    cmsg2: &CoordinatorMsg2,
) -> ChillDkgResult<(DKGOutput, Vec<u8>)> {
    if !certeq_verify(&state2.params.hostpubkeys, &state2.eq_input, cmsg2) {
        return Err(Error::SessionNotFinalized);
    }
    let mut recovery_data = state2.eq_input.clone();
    recovery_data.extend_from_slice(cmsg2);
    let output = DKGOutput {
        secshare: Some(state2.secshare.0),
        threshold_pubkey: state2.threshold_pubkey,
        pubshares: state2.pubshares,
    };
    Ok((output, recovery_data))
}

/// Validates `params` and runs EncPedPop's coordinator round.
pub fn coordinator_step1(
    params: &SessionParams,
    msgs: &[ParticipantMsg1],
) -> ChillDkgResult<(CoordinatorState, CoordinatorMsg1)> {
    params_validate(params)?;
    let cmsg1 = encpedpop::coordinator_step(msgs, params.t, &params.hostpubkeys)?;
    let eq_input = encpedpop::build_eq_input(
        params.t,
        &cmsg1.sum_coms,
        &params.hostpubkeys,
        &cmsg1.pubnonces,
        &cmsg1.enc_secshares,
    )?;
    let state = CoordinatorState {
        params: params.clone(),
        eq_input,
        sum_coms: cmsg1.sum_coms.clone(),
    };
    Ok((state, cmsg1))
}

/// Assembles the certificate from per-participant signatures, verifies it,
/// and returns it alongside the coordinator's (share-less) DKG output and
/// the recovery data.
pub fn coordinator_finalize(
    state: &CoordinatorState,
    sigs: &[ParticipantMsg2],
) -> ChillDkgResult<(CoordinatorMsg2, DKGOutput, Vec<u8>)> {
    let cert = certeq_coordinator_step(sigs);
    if !certeq_verify(&state.params.hostpubkeys, &state.eq_input, &cert) {
        return Err(Error::SessionNotFinalized);
    }
    let n = state.params.n();
    let threshold_pubkey = state.sum_coms.commitment_to_secret();
    let pubshares = (0..n as u32).map(|i| state.sum_coms.pubshare(i)).collect();
    let output = DKGOutput {
        secshare: None,
        threshold_pubkey,
        pubshares,
    };
    let mut recovery_data = state.eq_input.clone();
    recovery_data.extend_from_slice(&cert);
    Ok((cert, output, recovery_data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::hostpubkey;

    fn session(n: usize) -> Vec<Seed> {
        (0..n).map(|i| Seed([i as u8 + 1; 32])).collect()
    }

    #[test]
    fn full_session_round_trips_and_agrees() {
        let seeds = session(3);
        let hostpubkeys: Vec<_> = seeds.iter().map(|s| hostpubkey(&s.0).unwrap()).collect();
        let params = SessionParams::new(hostpubkeys.clone(), 2);

        let mut states1 = Vec::new();
        let mut msgs1 = Vec::new();
        for (i, seed) in seeds.iter().enumerate() {
            let (s1, m1) = participant_step1(seed, &params, [i as u8 + 50; 32]).unwrap();
            states1.push(s1);
            msgs1.push(m1);
        }

        let (coord_state, cmsg1) = coordinator_step1(&params, &msgs1).unwrap();

        let mut states2 = Vec::new();
        let mut sigs = Vec::new();
        for (i, (seed, s1)) in seeds.iter().zip(states1.into_iter()).enumerate() {
            let (s2, sig) = participant_step2(seed, s1, &cmsg1, [i as u8 + 90; 32]).unwrap();
            states2.push(s2);
            sigs.push(sig);
        }

        let (cert, coord_output, coord_recovery) = coordinator_finalize(&coord_state, &sigs).unwrap();
        assert!(coord_output.secshare.is_none());

        let mut outputs = Vec::new();
        for s2 in states2 {
            let (output, recovery_data) = participant_finalize(s2, &cert).unwrap();
            assert_eq!(recovery_data, coord_recovery);
            outputs.push(output);
        }

        for o in &outputs {
            assert_eq!(o.threshold_pubkey, coord_output.threshold_pubkey);
            assert_eq!(o.pubshares, coord_output.pubshares);
        }
        for (i, o) in outputs.iter().enumerate() {
            assert_eq!(crate::point::mul_gen(o.secshare.as_ref().unwrap()), o.pubshares[i]);
        }
    }

    #[test]
    fn tampered_certificate_yields_session_not_finalized() {
        let seeds = session(2);
        let hostpubkeys: Vec<_> = seeds.iter().map(|s| hostpubkey(&s.0).unwrap()).collect();
        let params = SessionParams::new(hostpubkeys, 2);

        let (s1_0, m1_0) = participant_step1(&seeds[0], &params, [1u8; 32]).unwrap();
        let (s1_1, m1_1) = participant_step1(&seeds[1], &params, [2u8; 32]).unwrap();
        let (_coord_state, cmsg1) = coordinator_step1(&params, &[m1_0, m1_1]).unwrap();

        let (s2_0, _sig0) = participant_step2(&seeds[0], s1_0, &cmsg1, [3u8; 32]).unwrap();
        let (_s2_1, sig1) = participant_step2(&seeds[1], s1_1, &cmsg1, [4u8; 32]).unwrap();

        let mut bad_cert = certeq_coordinator_step(&[[0u8; 64], sig1]);
        bad_cert[0] ^= 1;
        let result = participant_finalize(s2_0, &bad_cert);
        assert_eq!(result.unwrap_err(), Error::SessionNotFinalized);
    }
}
