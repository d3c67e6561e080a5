//! A minimal BIP340 Schnorr signature layer with a configurable challenge
//! tag.
//!
//! BIP340 sign/verify is listed as an external collaborator in the protocol
//! overview, but no published Rust crate exposes it with a *configurable*
//! challenge tag (every off-the-shelf implementation hardcodes
//! `"BIP0340/challenge"`), which [`crate::dkg::certeq`] needs in order to
//! bind the equality-check transcript into the challenge hash rather than
//! into the signed message. This module is therefore the thin,
//! protocol-specific stand-in for that collaborator, built directly on the
//! scalar/point primitives in [`crate::point`] — the same role the
//! reference implementation's own bundled `secp256k1ref.bip340` module
//! plays for the Python reference.

use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::{Field, Zero};

use crate::error::{ChillDkgResult, Error};
use crate::point::{fq_from_bytes_be, fq_to_bytes_be, is_even, mul_gen, scalar_from_bytes_mod_order, scalar_to_bytes, Point, Scalar};
use crate::utils::tagged_hash;
use crate::utils::Vec as Vec_;

type BaseField = ark_secp256k1::Fq;

const AUX_TAG: &[u8] = b"BIP0340/aux";
const NONCE_TAG: &[u8] = b"BIP0340/nonce";

fn fq_to_bytes(x: &BaseField) -> [u8; 32] {
    fq_to_bytes_be(x)
}

fn fq_from_bytes(bytes: &[u8]) -> Option<BaseField> {
    fq_from_bytes_be(bytes)
}

fn has_even_y(p: &Point) -> bool {
    match p.into_affine().y() {
        Some(y) => is_even(y),
        None => true,
    }
}

fn xor32(a: [u8; 32], b: [u8; 32]) -> [u8; 32] {
    let mut out = [0u8; 32];
    for i in 0..32 {
        out[i] = a[i] ^ b[i];
    }
    out
}

/// Lifts a 32-byte x-only public key to a curve point with even y, per
/// BIP340's `lift_x`.
fn lift_x(x_bytes: &[u8]) -> Option<Point> {
    let x = fq_from_bytes(x_bytes)?;
    let rhs = x * x * x + BaseField::from(7u64);
    let mut y = rhs.sqrt()?;
    if y.into_bigint().0[0] & 1 != 0 {
        y = -y;
    }
    let affine = ark_ec::short_weierstrass::Affine::<ark_secp256k1::Config>::new_unchecked(x, y);
    if !affine.is_on_curve() {
        return None;
    }
    Some(affine.into_group())
}

/// Produces a BIP340 Schnorr signature over `msg` with the given `seckey`
/// (32-byte big-endian scalar) and `aux_rand` (32 fresh random bytes),
/// binding the transcript via `challenge_tag` rather than into `msg`.
pub(crate) fn schnorr_sign(
    msg: &[u8],
    seckey: &Scalar,
    aux_rand: [u8; 32],
    challenge_tag: &[u8],
) -> ChillDkgResult<[u8; 64]> {
    if *seckey == Scalar::zero() {
        return Err(Error::ZeroScalar);
    }
    let p = mul_gen(seckey);
    let d = if has_even_y(&p) { *seckey } else { -*seckey };
    let px = fq_to_bytes(p.into_affine().x().ok_or(Error::PointDecode)?);

    let t = xor32(scalar_to_bytes(&d), tagged_hash(AUX_TAG, &aux_rand));
    let mut rand_msg = Vec_::with_capacity(32 + 32 + msg.len());
    rand_msg.extend_from_slice(&t);
    rand_msg.extend_from_slice(&px);
    rand_msg.extend_from_slice(msg);
    let rand = tagged_hash(NONCE_TAG, &rand_msg);

    let k0 = scalar_from_bytes_mod_order(&rand);
    if k0 == Scalar::zero() {
        return Err(Error::ZeroScalar);
    }
    let r_point = mul_gen(&k0);
    let k = if has_even_y(&r_point) { k0 } else { -k0 };
    let rx = fq_to_bytes(r_point.into_affine().x().ok_or(Error::PointDecode)?);

    let mut challenge_msg = Vec_::with_capacity(32 + 32 + msg.len());
    challenge_msg.extend_from_slice(&rx);
    challenge_msg.extend_from_slice(&px);
    challenge_msg.extend_from_slice(msg);
    let e = scalar_from_bytes_mod_order(&tagged_hash(challenge_tag, &challenge_msg));

    let s = k + e * d;

    let mut sig = [0u8; 64];
    sig[..32].copy_from_slice(&rx);
    sig[32..].copy_from_slice(&scalar_to_bytes(&s));
    Ok(sig)
}

/// Verifies a 64-byte BIP340 Schnorr signature over `msg` against a 32-byte
/// x-only public key, under the given `challenge_tag`.
pub(crate) fn schnorr_verify(
    msg: &[u8],
    pubkey_x: &[u8],
    sig: &[u8],
    challenge_tag: &[u8],
) -> bool {
    if sig.len() != 64 || pubkey_x.len() != 32 {
        return false;
    }
    let p = match lift_x(pubkey_x) {
        Some(p) => p,
        None => return false,
    };
    let rx = &sig[..32];
    let r_field = match fq_from_bytes(rx) {
        Some(v) => v,
        None => return false,
    };
    let s = scalar_from_bytes_mod_order(&sig[32..]);
    // Reject non-canonical s (must have been < q on the wire).
    if scalar_to_bytes(&s)[..] != sig[32..] {
        return false;
    }

    let mut challenge_msg = Vec_::with_capacity(32 + 32 + msg.len());
    challenge_msg.extend_from_slice(rx);
    challenge_msg.extend_from_slice(pubkey_x);
    challenge_msg.extend_from_slice(msg);
    let e = scalar_from_bytes_mod_order(&tagged_hash(challenge_tag, &challenge_msg));

    let r_computed = mul_gen(&s) - p * e;
    if !has_even_y(&r_computed) {
        return false;
    }
    let affine = r_computed.into_affine();
    match affine.x() {
        Some(x) => *x == r_field,
        None => false,
    }
}
