//! CertEq: a Schnorr-based certificate proving every participant agreed on
//! an identical session transcript.
//!
//! The transcript is bound into the BIP340 challenge-hash domain separator
//! rather than into the signed message, so [`crate::bip340`]'s
//! configurable-tag signer/verifier is the natural fit here.

use crate::bip340::{schnorr_sign, schnorr_verify};
use crate::error::ChillDkgResult;
use crate::keys::HostPubKey;
use crate::point::Scalar;
use crate::utils::{Vec, BIP_TAG};

const CERTEQ_SUFFIX: &str = "certeq message";

/// Builds the per-session Schnorr challenge tag that binds `eq_input`:
/// `BIP_TAG || "certeq message" || eq_input`.
fn certeq_challenge_tag(eq_input: &[u8]) -> Vec<u8> {
    let mut tag = Vec::with_capacity(BIP_TAG.len() + CERTEQ_SUFFIX.len() + eq_input.len());
    tag.extend_from_slice(BIP_TAG.as_bytes());
    tag.extend_from_slice(CERTEQ_SUFFIX.as_bytes());
    tag.extend_from_slice(eq_input);
    tag
}

/// Produces participant `idx`'s signature over the session transcript
/// `eq_input`: a BIP340 signature of `idx_be32`, under the per-session
/// challenge tag.
pub fn certeq_participant_step(
    hostseckey: &Scalar,
    idx: u32,
    eq_input: &[u8],
    aux_rand: [u8; 32],
) -> ChillDkgResult<[u8; 64]> {
    let tag = certeq_challenge_tag(eq_input);
    schnorr_sign(&idx.to_be_bytes(), hostseckey, aux_rand, &tag)
}

/// Concatenates per-participant signatures, in participant order, into a
/// single certificate.
pub fn certeq_coordinator_step(sigs: &[[u8; 64]]) -> Vec<u8> {
    let mut cert = Vec::with_capacity(64 * sigs.len());
    for sig in sigs {
        cert.extend_from_slice(sig);
    }
    cert
}

/// Verifies a certificate against every participant's host public key over
/// the transcript `eq_input`.
pub fn certeq_verify(hostpubkeys: &[HostPubKey], eq_input: &[u8], cert: &[u8]) -> bool {
    let n = hostpubkeys.len();
    if cert.len() != 64 * n {
        return false;
    }
    let tag = certeq_challenge_tag(eq_input);
    for (i, hpk) in hostpubkeys.iter().enumerate() {
        let sig = &cert[i * 64..(i + 1) * 64];
        let px = &hpk.0[1..33];
        let msg = (i as u32).to_be_bytes();
        if !schnorr_verify(&msg, px, sig, &tag) {
            return false;
        }
    }
    true
}
