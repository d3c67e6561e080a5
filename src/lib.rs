//! ChillDKG: encrypted Pedersen distributed key generation over secp256k1.
//!
//! `n` mutually distrusting participants, assisted by an untrusted
//! coordinator, jointly produce a threshold public key and a Shamir-style
//! secret sharing of its discrete logarithm, such that any `t` participants
//! can later reconstruct signing power while fewer than `t` learn nothing.
//!
//! A session runs as a fixed two-round exchange:
//!
//! ```text
//! P_i --msg1--> C          (encrypted VSS contribution + pubnonce)
//! P_i <--cmsg1-- C         (aggregated commitment + per-participant enc. share sums)
//! P_i --msg2--> C          (CertEq signature over the session transcript)
//! P_i <--cmsg2-- C         (certificate = concatenation of all n signatures)
//! ```
//!
//! A participant's only long-term secret is a 32-byte [`keys::Seed`]; every
//! other per-session secret is derived from it, so that the fixed-layout
//! [`dkg::RecoveryData`] blob produced at the end of a session lets any
//! participant (or a replacement device holding the same seed) reproduce its
//! share offline via [`dkg::recover`].
//!
//! This crate defines neither the signing protocol that consumes the DKG
//! output, nor authentication of host public keys: callers are expected to
//! verify [`keys::HostPubKey`]s out of band, optionally via
//! [`params::params_id`].
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

mod bip340;
pub mod dkg;
pub mod error;
pub mod keys;
pub mod params;
pub mod point;
mod utils;

pub use error::{ChillDkgResult, Error};
pub use keys::{hostpubkey, HostPubKey, Seed};
pub use params::{params_id, params_validate, ParamsId, SessionParams};

pub use dkg::{
    coordinator_finalize, coordinator_step1, participant_finalize, participant_step1, participant_step2, recover,
    CoordinatorMsg1, CoordinatorMsg2, CoordinatorState, DKGOutput, ParticipantMsg1, ParticipantMsg2,
    ParticipantState1, ParticipantState2, RecoveryData,
};
