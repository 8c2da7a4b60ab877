//! Deterministic ranking core
//!
//! All slot logic lives here. This module must be pure and deterministic:
//! - Logical slot indices only (pixel geometry is a derived value)
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod engine;
pub mod geometry;
pub mod state;

pub use engine::{Command, ReleaseOutcome, apply, release, resolve_drop};
pub use geometry::{SlotLayout, scatter_spawns};
pub use state::{
    ImageId, ImageState, LevelResult, LevelSession, SessionError, SessionPhase, Slots, VoteSession,
};
