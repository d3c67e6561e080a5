//! Verifiable secret sharing (VSS): degree-`t-1` polynomial sampling and
//! Feldman commitments.
//!
//! Grounded in the teacher's `VerifiableSecretSharingCommitment`/
//! `Coefficients` types and, for [`VerifiableSecretSharingCommitment::pubshare`],
//! the same Horner-in-the-exponent evaluation used by the teacher's
//! `IndividualVerifyingKey::verify`.

use zeroize::Zeroize;

use crate::point::{horner_eval, mul_gen, scalar_from_bytes_mod_order, Point, Scalar};
use crate::utils::{tagged_hash_bip_dkg, with_u32_be, Vec};

/// The coefficients `(a_0, ..., a_{t-1})` of a degree-`t-1` polynomial
/// `f(Z) = sum_k a_k Z^k` over the scalar field. Zeroized on drop.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct Coefficients(pub Vec<Scalar>);

impl Coefficients {
    /// Evaluates `f` at `x` via Horner's rule.
    fn eval(&self, x: &Scalar) -> Scalar {
        let mut acc = Scalar::from(0u64);
        for a in self.0.iter().rev() {
            acc = acc * x + a;
        }
        acc
    }
}

/// A Feldman commitment to a sharing polynomial: `t` group elements
/// `[a_0*G, ..., a_{t-1}*G]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifiableSecretSharingCommitment {
    pub points: Vec<Point>,
}

impl VerifiableSecretSharingCommitment {
    pub fn t(&self) -> usize {
        self.points.len()
    }

    /// The constant term `a_0 * G`, i.e. the threshold public key once this
    /// is the sum of every participant's individual commitment.
    pub fn commitment_to_secret(&self) -> Point {
        self.points[0]
    }

    /// Evaluates the committed polynomial in the exponent at `i + 1`
    /// (participant indices avoid the zero point), via Horner's rule.
    pub fn pubshare(&self, i: u32) -> Point {
        let x = Scalar::from(i as u64 + 1);
        horner_eval(&self.points, &x)
    }

    /// Pointwise sum of this commitment with `other`: the commitment to the
    /// sum of the underlying polynomials.
    pub fn add(&self, other: &Self) -> Self {
        debug_assert_eq!(self.t(), other.t());
        let points = self
            .points
            .iter()
            .zip(other.points.iter())
            .map(|(a, b)| *a + *b)
            .collect();
        VerifiableSecretSharingCommitment { points }
    }
}

/// Sums a non-empty slice of equal-length commitments.
pub fn sum_commitments(coms: &[VerifiableSecretSharingCommitment]) -> VerifiableSecretSharingCommitment {
    let mut iter = coms.iter();
    let first = iter.next().expect("at least one commitment to sum");
    let mut acc = first.clone();
    for c in iter {
        acc = acc.add(c);
    }
    acc
}

/// A verifiable secret sharing of a single, freshly sampled secret: a
/// degree-`t-1` polynomial plus its Feldman commitment.
pub struct Vss {
    coefficients: Coefficients,
}

impl Vss {
    /// Deterministically samples a degree-`t-1` polynomial from a 32-byte
    /// seed: `a_k = reduce(TaggedHash("vss coefficient", k_be32 || seed))`.
    pub fn generate(seed32: &[u8; 32], t: u32) -> Self {
        let coefficients = (0..t)
            .map(|k| {
                let msg = with_u32_be(k, seed32);
                scalar_from_bytes_mod_order(&tagged_hash_bip_dkg("vss coefficient", &msg))
            })
            .collect();
        Vss {
            coefficients: Coefficients(coefficients),
        }
    }

    /// This participant's share for index `i`: `f(i + 1)`.
    pub fn secshare_for(&self, i: u32) -> Scalar {
        let x = Scalar::from(i as u64 + 1);
        self.coefficients.eval(&x)
    }

    /// The Feldman commitment to this polynomial.
    pub fn commit(&self) -> VerifiableSecretSharingCommitment {
        let points = self.coefficients.0.iter().map(mul_gen).collect();
        VerifiableSecretSharingCommitment { points }
    }
}

/// Verifies that `s * G == pubshare`.
pub fn verify_secshare(s: &Scalar, pubshare: &Point) -> bool {
    mul_gen(s) == *pubshare
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commitment_has_length_t() {
        let vss = Vss::generate(&[1u8; 32], 3);
        assert_eq!(vss.commit().t(), 3);
    }

    #[test]
    fn commit_and_share_agree() {
        let vss = Vss::generate(&[2u8; 32], 4);
        let com = vss.commit();
        for i in 0..5u32 {
            let share = vss.secshare_for(i);
            assert!(verify_secshare(&share, &com.pubshare(i)));
        }
    }

    #[test]
    fn commitment_to_secret_is_constant_term() {
        let vss = Vss::generate(&[3u8; 32], 2);
        let com = vss.commit();
        assert_eq!(com.commitment_to_secret(), com.points[0]);
    }

    #[test]
    fn sum_of_commitments_matches_sum_of_shares() {
        let vss_a = Vss::generate(&[4u8; 32], 3);
        let vss_b = Vss::generate(&[5u8; 32], 3);
        let sum_com = sum_commitments(&[vss_a.commit(), vss_b.commit()]);
        for i in 0..3u32 {
            let sum_share = vss_a.secshare_for(i) + vss_b.secshare_for(i);
            assert!(verify_secshare(&sum_share, &sum_com.pubshare(i)));
        }
    }

    #[test]
    fn generate_is_deterministic_in_seed() {
        let a = Vss::generate(&[9u8; 32], 2).commit();
        let b = Vss::generate(&[9u8; 32], 2).commit();
        assert_eq!(a, b);
    }
}
