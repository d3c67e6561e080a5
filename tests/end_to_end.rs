//! Full-session scenarios against the public API: S1-S6 from the protocol's
//! testable-properties list, plus the Lagrange-reconstruction invariant.

use ark_ff::Field;
use chilldkg::{
    coordinator_finalize, coordinator_step1, hostpubkey, participant_finalize, participant_step1, participant_step2,
    params_id, recover, Error, HostPubKey, SessionParams,
};

fn seed(b: u8) -> [u8; 32] {
    [b; 32]
}

struct Session {
    params: SessionParams,
    seeds: Vec<[u8; 32]>,
    outputs: Vec<chilldkg::DKGOutput>,
    coordinator_output: chilldkg::DKGOutput,
    recovery_data: Vec<u8>,
}

fn run_session(seeds: Vec<[u8; 32]>, t: u32) -> Session {
    let hostpubkeys: Vec<HostPubKey> = seeds.iter().map(|s| hostpubkey(s).unwrap()).collect();
    let params = SessionParams::new(hostpubkeys, t);

    let mut states1 = Vec::new();
    let mut msgs1 = Vec::new();
    for (i, s) in seeds.iter().enumerate() {
        let seed = chilldkg::Seed::new(s).unwrap();
        let (state, msg) = participant_step1(&seed, &params, [i as u8 + 100; 32]).unwrap();
        states1.push(state);
        msgs1.push(msg);
    }

    let (coord_state, cmsg1) = coordinator_step1(&params, &msgs1).unwrap();

    let mut states2 = Vec::new();
    let mut sigs = Vec::new();
    for (i, s) in seeds.iter().enumerate() {
        let seed = chilldkg::Seed::new(s).unwrap();
        let (state, sig) = participant_step2(&seed, states1.remove(0), &cmsg1, [i as u8 + 150; 32]).unwrap();
        states2.push(state);
        sigs.push(sig);
    }

    let (cert, coordinator_output, recovery_data) = coordinator_finalize(&coord_state, &sigs).unwrap();

    let mut outputs = Vec::new();
    for state in states2 {
        let (output, _recovery) = participant_finalize(state, &cert).unwrap();
        outputs.push(output);
    }

    Session {
        params,
        seeds,
        outputs,
        coordinator_output,
        recovery_data,
    }
}

/// S1: n=2, t=2. Recovery data is exactly 4 + 66 + 324 = 394 bytes.
#[test]
fn s1_two_of_two_completes_with_expected_recovery_length() {
    let session = run_session(vec![seed(1), seed(2)], 2);
    assert_eq!(session.recovery_data.len(), 394);
    assert_eq!(session.outputs[0].threshold_pubkey, session.outputs[1].threshold_pubkey);
    assert_eq!(session.outputs[0].pubshares, session.outputs[1].pubshares);
    for (i, output) in session.outputs.iter().enumerate() {
        assert_eq!(
            chilldkg::point::mul_gen(output.secshare.as_ref().unwrap()),
            output.pubshares[i]
        );
    }
}

fn lagrange_interpolate_at_zero(points: &[(u32, chilldkg::point::Scalar)]) -> chilldkg::point::Scalar {
    use chilldkg::point::Scalar;

    let mut acc = Scalar::from(0u64);
    for (i, (xi, yi)) in points.iter().enumerate() {
        let mut num = Scalar::from(1u64);
        let mut den = Scalar::from(1u64);
        let xi_s = Scalar::from(*xi as u64 + 1);
        for (j, (xj, _)) in points.iter().enumerate() {
            if i == j {
                continue;
            }
            let xj_s = Scalar::from(*xj as u64 + 1);
            num = num * xj_s;
            den = den * (xj_s - xi_s);
        }
        acc = acc + *yi * num * den.inverse().unwrap();
    }
    acc
}

/// S2: n=3, t=2. Lagrange interpolation over any two secshares reproduces the
/// threshold secret's discrete log.
#[test]
fn s2_three_of_two_reconstructs_via_lagrange() {
    use ark_ec::CurveGroup;

    let session = run_session(vec![seed(1), seed(2), seed(3)], 2);

    let points: Vec<(u32, chilldkg::point::Scalar)> = (0..2)
        .map(|i| (i as u32, session.outputs[i].secshare.unwrap()))
        .collect();
    let reconstructed = lagrange_interpolate_at_zero(&points);
    let reconstructed_point = chilldkg::point::mul_gen(&reconstructed);
    assert_eq!(
        reconstructed_point.into_affine(),
        session.outputs[0].threshold_pubkey.into_affine()
    );
}

/// S3: corrupting a single encrypted share before coordinator aggregation
/// causes the affected participant's step2 to reject.
#[test]
fn s3_tampered_enc_share_is_rejected() {
    let seeds = vec![seed(1), seed(2), seed(3)];
    let hostpubkeys: Vec<HostPubKey> = seeds.iter().map(|s| hostpubkey(s).unwrap()).collect();
    let params = SessionParams::new(hostpubkeys, 2);

    let mut states1 = Vec::new();
    let mut msgs1 = Vec::new();
    for (i, s) in seeds.iter().enumerate() {
        let seed = chilldkg::Seed::new(s).unwrap();
        let (state, msg) = participant_step1(&seed, &params, [i as u8 + 10; 32]).unwrap();
        states1.push(state);
        msgs1.push(msg);
    }
    msgs1[1].enc_shares[0] = msgs1[1].enc_shares[0] + chilldkg::point::Scalar::from(1u64);

    let (_coord_state, cmsg1) = coordinator_step1(&params, &msgs1).unwrap();

    let seed0 = chilldkg::Seed::new(&seeds[0]).unwrap();
    let result = participant_step2(&seed0, states1.remove(0), &cmsg1, [200u8; 32]);
    assert!(matches!(result, Err(Error::InvalidContribution { index: 0, .. })));
}

/// S4: a participant who never receives cmsg2 can still recover its output
/// from another party's recovery data.
#[test]
fn s4_recovery_after_missed_cmsg2() {
    let session = run_session(vec![seed(5), seed(6), seed(7)], 2);
    let seed2 = chilldkg::Seed::new(&session.seeds[2]).unwrap();

    let (recovered, recovered_params) = recover(Some(&seed2), &session.recovery_data).unwrap();
    assert_eq!(recovered_params, session.params);
    assert_eq!(recovered.secshare, session.outputs[2].secshare);
    assert_eq!(recovered.threshold_pubkey, session.outputs[2].threshold_pubkey);
    assert_eq!(recovered.pubshares, session.outputs[2].pubshares);
}

/// S5: session parameter rejection cases.
#[test]
fn s5_params_rejection_cases() {
    let p1 = hostpubkey(&seed(9)).unwrap();

    let dup = SessionParams::new(vec![p1, p1], 1);
    assert_eq!(chilldkg::params_validate(&dup), Err(Error::DuplicateHostpubkey));

    let zero_t = SessionParams::new(vec![p1, hostpubkey(&seed(10)).unwrap()], 0);
    assert_eq!(chilldkg::params_validate(&zero_t), Err(Error::Threshold));

    let mut bad_point = SessionParams::new(vec![p1, hostpubkey(&seed(11)).unwrap()], 1);
    bad_point.hostpubkeys[1] = HostPubKey([0u8; 33]);
    match chilldkg::params_validate(&bad_point) {
        Err(Error::InvalidContribution { index, .. }) => assert_eq!(index, 1),
        other => panic!("expected InvalidContribution at index 1, got {other:?}"),
    }
}

/// S6: coordinator recovery (no seed) matches the coordinator's own output.
#[test]
fn s6_coordinator_recovery_matches_coordinator_output() {
    let session = run_session(vec![seed(21), seed(22)], 2);
    let (recovered, _params) = recover(None, &session.recovery_data).unwrap();
    assert!(recovered.secshare.is_none());
    assert_eq!(recovered.threshold_pubkey, session.coordinator_output.threshold_pubkey);
    assert_eq!(recovered.pubshares, session.coordinator_output.pubshares);
}

/// Invariant: params_id is stable under identical inputs and changes with
/// any byte of any hostpubkey or of t.
#[test]
fn params_id_is_sensitive_to_every_input() {
    let p1 = hostpubkey(&seed(30)).unwrap();
    let p2 = hostpubkey(&seed(31)).unwrap();

    let base = SessionParams::new(vec![p1, p2], 2);
    let same = SessionParams::new(vec![p1, p2], 2);
    assert_eq!(params_id(&base).unwrap(), params_id(&same).unwrap());

    let different_t = SessionParams::new(vec![p1, p2], 1);
    assert_ne!(params_id(&base).unwrap(), params_id(&different_t).unwrap());
}
