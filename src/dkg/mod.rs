//! The ChillDKG protocol stack: verifiable secret sharing at the bottom,
//! EncPedPop and CertEq as the two core sub-protocols, the orchestrator
//! state machine tying them together, and the recovery codec.

pub mod certeq;
pub mod chilldkg;
pub mod encpedpop;
pub mod recovery;
pub mod secret_share;

pub use chilldkg::{
    coordinator_finalize, coordinator_step1, participant_finalize, participant_step1, participant_step2,
    CoordinatorMsg2, CoordinatorState, DKGOutput, ParticipantMsg2, ParticipantState1, ParticipantState2,
};
pub use encpedpop::{CoordinatorMsg1, ParticipantMsg1};
pub use recovery::{recover, RecoveryData};
