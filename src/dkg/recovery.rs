//! Recovery: a fixed-layout encoding of the full session transcript plus
//! certificate, letting any participant (given its seed) or the coordinator
//! (without one) reproduce the DKG output offline.

use crate::dkg::certeq::certeq_verify;
use crate::dkg::chilldkg::DKGOutput;
use crate::dkg::encpedpop::{derive_session_seed, ecdh, enc_context, pad};
use crate::dkg::secret_share::{verify_secshare, VerifiableSecretSharingCommitment, Vss};
use crate::error::{ChillDkgResult, Error};
use crate::keys::{hostkeypair, hostseckey, HostPubKey, Seed};
use crate::params::{params_validate, SessionParams};
use crate::point::{point_from_bytes, point_to_bytes, scalar_from_bytes_mod_order, scalar_to_bytes, Point, Scalar};
use crate::utils::{String, ToString, Vec};

const PUBNONCE_LEN: usize = 33;
const ENC_SECSHARE_LEN: usize = 32;
const SIG_LEN: usize = 64;
const PER_PARTICIPANT_LEN: usize = 33 + PUBNONCE_LEN + ENC_SECSHARE_LEN + SIG_LEN; // 162

/// The parsed form of a recovery blob: every field in its §6.3 layout.
pub struct RecoveryData {
    pub t: u32,
    pub sum_coms: VerifiableSecretSharingCommitment,
    pub hostpubkeys: Vec<HostPubKey>,
    pub pubnonces: Vec<[u8; 33]>,
    pub enc_secshares: Vec<Scalar>,
    pub cert: Vec<u8>,
}

impl RecoveryData {
    /// Parses a recovery blob per the fixed layout:
    /// `t(4) || sum_coms(33t) || hostpubkeys(33n) || pubnonces(33n) ||
    /// enc_secshares(32n) || cert(64n)`, with `n` recovered from the length
    /// of the tail after `4 + 33t` being divisible by 162.
    pub fn parse(bytes: &[u8]) -> ChillDkgResult<Self> {
        if bytes.len() < 4 {
            return Err(invalid("too short to contain a threshold"));
        }
        let t = u32::from_be_bytes(bytes[0..4].try_into().unwrap());
        let after_t = &bytes[4..];

        let coms_len = 33usize
            .checked_mul(t as usize)
            .ok_or_else(|| invalid("threshold too large"))?;
        if after_t.len() < coms_len {
            return Err(invalid("too short to contain the aggregated commitment"));
        }
        let (coms_bytes, tail) = after_t.split_at(coms_len);

        if tail.len() % PER_PARTICIPANT_LEN != 0 {
            return Err(invalid("length does not match the fixed per-participant layout"));
        }
        let n = tail.len() / PER_PARTICIPANT_LEN;
        if n == 0 {
            return Err(invalid("recovery data must describe at least one participant"));
        }

        let mut points = Vec::with_capacity(t as usize);
        for chunk in coms_bytes.chunks_exact(33) {
            points.push(point_from_bytes(chunk).map_err(|_| invalid("aggregated commitment contains an invalid point"))?);
        }
        let sum_coms = VerifiableSecretSharingCommitment { points };

        let (hpk_bytes, tail) = tail.split_at(33 * n);
        let hostpubkeys: Vec<HostPubKey> = hpk_bytes
            .chunks_exact(33)
            .map(|c| {
                let mut arr = [0u8; 33];
                arr.copy_from_slice(c);
                HostPubKey(arr)
            })
            .collect();

        let (pubnonce_bytes, tail) = tail.split_at(33 * n);
        let pubnonces: Vec<[u8; 33]> = pubnonce_bytes
            .chunks_exact(33)
            .map(|c| {
                let mut arr = [0u8; 33];
                arr.copy_from_slice(c);
                arr
            })
            .collect();

        let (enc_secshare_bytes, tail) = tail.split_at(32 * n);
        let enc_secshares: Vec<Scalar> = enc_secshare_bytes
            .chunks_exact(32)
            .map(scalar_from_bytes_mod_order)
            .collect();

        let cert = tail.to_vec();
        debug_assert_eq!(cert.len(), 64 * n);

        Ok(RecoveryData {
            t,
            sum_coms,
            hostpubkeys,
            pubnonces,
            enc_secshares,
            cert,
        })
    }

    /// Serializes back to the exact byte layout `parse` accepts: `eq_input
    /// || cert`, where `eq_input` is itself `t || sum_coms || hostpubkeys ||
    /// pubnonces || enc_secshares`.
    pub fn serialize(&self) -> ChillDkgResult<Vec<u8>> {
        let n = self.hostpubkeys.len();
        let mut out = Vec::with_capacity(4 + 33 * self.sum_coms.t() + n * PER_PARTICIPANT_LEN);
        out.extend_from_slice(&self.t.to_be_bytes());
        for p in &self.sum_coms.points {
            out.extend_from_slice(&point_to_bytes(p)?);
        }
        for hpk in &self.hostpubkeys {
            out.extend_from_slice(&hpk.0);
        }
        for pn in &self.pubnonces {
            out.extend_from_slice(pn);
        }
        for s in &self.enc_secshares {
            out.extend_from_slice(&scalar_to_bytes(s));
        }
        out.extend_from_slice(&self.cert);
        Ok(out)
    }
}

fn invalid(reason: &str) -> Error {
    Error::InvalidRecoveryData(String::from(reason))
}

/// Reconstructs a `DKGOutput` and the `SessionParams` it belongs to from a
/// recovery blob.
///
/// If `seed` is `Some`, the caller's own share is recomputed and the
/// returned output's `secshare` is populated; the coordinator calls this
/// with `seed = None` and receives `secshare = None`.
///
/// # Errors
/// Returns [`Error::InvalidRecoveryData`] if the blob is malformed, fails
/// session parameter validation, or its certificate does not verify against
/// the transcript recovered from its own prefix (the bytes preceding the
/// certificate, whose length is derived from the parsed layout rather than
/// assumed to be `64 * n`).
pub fn recover(seed: Option<&Seed>, recovery_data: &[u8]) -> ChillDkgResult<(DKGOutput, SessionParams)> {
    let rd = RecoveryData::parse(recovery_data)?;
    let n = rd.hostpubkeys.len();

    let params = SessionParams::new(rd.hostpubkeys.clone(), rd.t);
    params_validate(&params).map_err(|e| invalid_from(e))?;

    let eq_input = &recovery_data[..recovery_data.len() - rd.cert.len()];
    if !certeq_verify(&params.hostpubkeys, eq_input, &rd.cert) {
        return Err(invalid("certificate did not verify against the recovered transcript"));
    }

    let threshold_pubkey = rd.sum_coms.commitment_to_secret();
    let pubshares: Vec<Point> = (0..n as u32).map(|i| rd.sum_coms.pubshare(i)).collect();

    let secshare = match seed {
        None => None,
        Some(seed) => {
            let (_, my_pub) = hostkeypair(seed)?;
            let idx = params
                .hostpubkeys
                .iter()
                .position(|h| *h == my_pub)
                .map(|i| i as u32)
                .ok_or_else(|| invalid("seed's host public key is not present in the recovered parameters"))?;

            let ctx = enc_context(rd.t, &params.hostpubkeys);
            let hsk = hostseckey(seed);
            let mut acc = rd.enc_secshares[idx as usize];
            for j in 0..n as u32 {
                if j == idx {
                    continue;
                }
                let pubnonce_j = point_from_bytes(&rd.pubnonces[j as usize])
                    .map_err(|_| invalid("recovered pubnonce does not decode to a valid point"))?;
                let ecdh_bytes = ecdh(&hsk.0, &pubnonce_j)?;
                acc = acc - pad(&ecdh_bytes, &ctx, j, idx);
            }

            let session_seed = derive_session_seed(seed, &rd.pubnonces[idx as usize], &ctx);
            let vss = Vss::generate(&session_seed, rd.t);
            let share = acc + vss.secshare_for(idx);

            if !verify_secshare(&share, &pubshares[idx as usize]) {
                return Err(invalid(
                    "recovered share failed verification even though the certificate checked out",
                ));
            }
            Some(share)
        }
    };

    let output = DKGOutput {
        secshare,
        threshold_pubkey,
        pubshares,
    };
    Ok((output, params))
}

fn invalid_from(e: Error) -> Error {
    Error::InvalidRecoveryData(e.to_string())
}
