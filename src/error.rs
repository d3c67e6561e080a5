//! The crate's single error type.
//!
//! Mirrors the teacher's `Error`/`FrostResult` pair: one flat enum, no
//! `thiserror`, manual `Display`/`std::error::Error` impls so the crate stays
//! usable in `no_std` contexts.

use core::fmt;

use crate::utils::String;

/// Every way a ChillDKG operation can fail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// A seed was not exactly 32 bytes.
    SeedLength,
    /// `t` was not in `1..=n`.
    Threshold,
    /// `t` does not fit in 32 bits.
    ThresholdOverflow,
    /// Participant `index` supplied a malformed point, commitment, or share,
    /// for the stated `reason`.
    InvalidContribution { index: u32, reason: String },
    /// `hostpubkeys` contained a duplicate entry.
    DuplicateHostpubkey,
    /// The CertEq certificate did not verify; the session is not finalized,
    /// but the seed and all session state remain valid and must not be
    /// discarded (see [`crate::dkg::recovery::recover`]).
    SessionNotFinalized,
    /// Recovery data was malformed, had the wrong length, or did not match
    /// the supplied seed.
    InvalidRecoveryData(String),
    /// A 33-byte string did not decode to a valid compressed secp256k1
    /// point.
    PointDecode,
    /// A secret key or nonce scalar was zero (probability-zero for honestly
    /// sampled input; rejected rather than risking an invalid signature).
    ZeroScalar,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::SeedLength => write!(f, "seed must be exactly 32 bytes"),
            Error::Threshold => write!(f, "threshold must satisfy 1 <= t <= n"),
            Error::ThresholdOverflow => write!(f, "threshold does not fit in 32 bits"),
            Error::InvalidContribution { index, reason } => {
                write!(f, "participant {index} supplied an invalid contribution: {reason}")
            }
            Error::DuplicateHostpubkey => write!(f, "duplicate host public key"),
            Error::SessionNotFinalized => write!(f, "session was not finalized"),
            Error::InvalidRecoveryData(reason) => write!(f, "invalid recovery data: {reason}"),
            Error::PointDecode => write!(f, "invalid compressed point encoding"),
            Error::ZeroScalar => write!(f, "secret key or nonce scalar was zero"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Convenience alias used throughout the crate.
pub type ChillDkgResult<T> = Result<T, Error>;
