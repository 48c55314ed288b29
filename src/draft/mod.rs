//! Draft variants, custom drafts and the draft session handle

pub mod custom;
pub mod session;
pub mod variant;

pub use custom::CustomDraft;
pub use session::{draft_rng, DraftOutcome, DraftSession, DraftState, SeatAssignment, SeatPick};
pub use variant::DraftVariant;
