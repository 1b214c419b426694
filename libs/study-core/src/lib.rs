//! Core study-session library shared by the backend and study clients.
//!
//! Provides:
//! - The study session state machine ([`SessionDriver`]) and the
//!   collaborator contract it drives ([`StudyBackend`])
//! - The SM-2 spaced repetition scheduler
//! - Shared types (CardSnapshot, SessionRecord, Quality, StudyMode)

pub mod error;
pub mod session;
pub mod sm2;
pub mod types;

pub use error::{BackendError, SessionError};
pub use session::{SessionDriver, SessionProgress, StudyBackend};
pub use sm2::{ReviewUpdate, Sm2};
pub use types::{
    CardSnapshot, Difficulty, Quality, ReviewOutcome, SessionRecord, SessionStats, StudyMode,
};
