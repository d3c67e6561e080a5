//! Concrete secp256k1 scalar/point types and their byte-exact wire codecs.
//!
//! The curve arithmetic itself (`Scalar`/`Point` operations) is the external
//! collaborator named in the specification's overview; this module only
//! supplies the thin adapter the protocol needs on top of it, namely the
//! 32-byte big-endian scalar encoding and the 33-byte SEC1-compressed point
//! encoding that the wire formats and the recovery-data layout depend on.
//! `ark-serialize`'s own "compressed" mode is an arkworks-internal bit
//! packing, not SEC1, so it cannot be reused here.

use ark_ec::{short_weierstrass::Affine, AffineRepr, CurveGroup, Group};
use ark_ff::{BigInt, Field, PrimeField};

use crate::error::Error;

/// A scalar mod the secp256k1 group order `q`.
pub type Scalar = ark_secp256k1::Fr;
/// A secp256k1 group element in projective coordinates, used for arithmetic.
pub type Point = ark_secp256k1::Projective;
/// A secp256k1 group element in affine coordinates, used at serialization
/// boundaries.
pub type AffinePoint = Affine<ark_secp256k1::Config>;
type BaseField = ark_secp256k1::Fq;

/// Encodes a scalar as 32 big-endian bytes.
pub fn scalar_to_bytes(s: &Scalar) -> [u8; 32] {
    let bytes = s.into_bigint().to_bytes_be();
    let mut out = [0u8; 32];
    // `to_bytes_be` on a 4-limb BigInt always yields 32 bytes.
    out.copy_from_slice(&bytes);
    out
}

/// Decodes 32 big-endian bytes into a scalar, reducing modulo `q` (matching
/// the reference implementation's `Scalar(int_from_bytes(...))`, which
/// likewise reduces rather than rejecting out-of-range values).
pub fn scalar_from_bytes_mod_order(bytes: &[u8]) -> Scalar {
    Scalar::from_be_bytes_mod_order(bytes)
}

/// Multiplies the generator by `s`.
pub fn mul_gen(s: &Scalar) -> Point {
    Point::generator() * s
}

/// Encodes a point as 33 bytes: a `0x02`/`0x03` parity prefix followed by
/// the big-endian x-coordinate. The point must not be the identity.
pub fn point_to_bytes(p: &Point) -> Result<[u8; 33], Error> {
    let affine = p.into_affine();
    let (x, y) = affine.xy().ok_or(Error::PointDecode)?;
    let mut out = [0u8; 33];
    out[0] = if is_even(y) { 0x02 } else { 0x03 };
    let x_bytes = fq_to_bytes_be(x);
    out[1..].copy_from_slice(&x_bytes);
    Ok(out)
}

/// Decodes 33 SEC1-compressed bytes into a point on the curve.
pub fn point_from_bytes(bytes: &[u8]) -> Result<Point, Error> {
    if bytes.len() != 33 {
        return Err(Error::PointDecode);
    }
    let prefix = bytes[0];
    if prefix != 0x02 && prefix != 0x03 {
        return Err(Error::PointDecode);
    }
    let x = fq_from_bytes_be(&bytes[1..33]).ok_or(Error::PointDecode)?;

    // secp256k1: y^2 = x^3 + 7.
    let rhs = x * x * x + BaseField::from(7u64);
    let mut y = rhs.sqrt().ok_or(Error::PointDecode)?;
    let want_even = prefix == 0x02;
    if is_even(&y) != want_even {
        y = -y;
    }

    let affine = AffinePoint::new_unchecked(x, y);
    if !affine.is_on_curve() || !affine.is_in_correct_subgroup_assuming_on_curve() {
        return Err(Error::PointDecode);
    }
    Ok(affine.into_group())
}

pub(crate) fn is_even(y: &BaseField) -> bool {
    y.into_bigint().0[0] & 1 == 0
}

pub(crate) fn fq_to_bytes_be(x: &BaseField) -> [u8; 32] {
    let bytes = x.into_bigint().to_bytes_be();
    let mut out = [0u8; 32];
    out.copy_from_slice(&bytes);
    out
}

pub(crate) fn fq_from_bytes_be(bytes: &[u8]) -> Option<BaseField> {
    if bytes.len() != 32 {
        return None;
    }
    let mut limbs = [0u64; 4];
    for i in 0..4 {
        let start = 32 - (i + 1) * 8;
        let chunk: [u8; 8] = bytes[start..start + 8].try_into().ok()?;
        limbs[i] = u64::from_be_bytes(chunk);
    }
    BaseField::from_bigint(BigInt::new(limbs))
}

/// Sums an iterator of points. Returns the identity for an empty iterator.
pub fn sum_points<'a>(points: impl IntoIterator<Item = &'a Point>) -> Point {
    points.into_iter().fold(Point::default(), |acc, p| acc + p)
}

/// Horner's-rule evaluation of a Feldman commitment (a list of points,
/// read as coefficients low-to-high) at `x`, i.e. computes
/// `sum_k points[k] * x^k` without needing `t` separate scalar
/// multiplications per term.
pub fn horner_eval(points: &[Point], x: &Scalar) -> Point {
    let mut acc = Point::default();
    for (i, p) in points.iter().rev().enumerate() {
        acc += p;
        if i != points.len() - 1 {
            acc *= *x;
        }
    }
    acc
}
