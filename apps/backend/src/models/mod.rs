//! Database models and API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// Re-export shared types from study-core
pub use study_core::types::{
    CardSnapshot, Difficulty, Quality, ReviewOutcome, SessionRecord, SessionStats, StudyMode,
};

// === Database Entity Types ===

/// Registered account
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub token: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
}

/// Flashcard set stored in PostgreSQL
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbFlashcardSet {
    pub id: i64,
    pub account_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Flashcard stored in PostgreSQL
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbFlashcard {
    pub id: i64,
    pub flashcard_set_id: i64,
    pub front: String,
    pub back: String,
    pub difficulty: String,
    pub ease_factor: f64,
    pub review_count: i32,
    pub correct_count: i32,
    pub last_studied: Option<DateTime<Utc>>,
    pub next_review: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbFlashcard {
    /// Convert to the read-only snapshot used by study clients.
    pub fn to_snapshot(&self) -> CardSnapshot {
        CardSnapshot {
            id: self.id,
            front: self.front.clone(),
            back: self.back.clone(),
            difficulty: Difficulty::from_str(&self.difficulty).unwrap_or_default(),
            ease_factor: self.ease_factor,
            review_count: self.review_count.max(0) as u32,
            correct_count: self.correct_count.max(0) as u32,
            last_studied: self.last_studied,
            next_review: self.next_review,
        }
    }
}

/// Study session stored in PostgreSQL
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbStudySession {
    pub id: i64,
    pub account_id: Uuid,
    pub flashcard_set_id: Option<i64>,
    pub mode: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub cards_studied: i32,
    pub cards_correct: i32,
}

impl DbStudySession {
    /// Convert to the API session record.
    pub fn to_record(&self) -> SessionRecord {
        SessionRecord {
            id: self.id,
            flashcard_set_id: self.flashcard_set_id.unwrap_or_default(),
            mode: StudyMode::from_str(&self.mode).unwrap_or_default(),
            started_at: self.started_at,
            ended_at: self.ended_at,
            cards_studied: self.cards_studied.max(0) as u32,
            cards_correct: self.cards_correct.max(0) as u32,
        }
    }

    /// Convert to the stats payload; accuracy and duration read as 0
    /// while undefined.
    pub fn to_stats(&self) -> SessionStats {
        let record = self.to_record();
        SessionStats {
            id: record.id,
            cards_studied: record.cards_studied,
            cards_correct: record.cards_correct,
            accuracy: record.accuracy().unwrap_or(0.0),
            duration_minutes: record.duration_minutes().unwrap_or(0.0),
            started_at: record.started_at,
            ended_at: record.ended_at,
        }
    }
}

/// Flashcard set with card count
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FlashcardSetInfo {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub card_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// === API Request/Response Types ===

#[derive(Debug, Serialize, Deserialize)]
pub struct AccountRegisterRequest {
    pub name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AccountRegisterResponse {
    pub account_id: Uuid,
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AccountStatusResponse {
    pub account_id: Uuid,
    pub last_seen_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateSetRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SetListResponse {
    pub results: Vec<FlashcardSetInfo>,
    pub count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateCardRequest {
    pub front: String,
    pub back: String,
    pub difficulty: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CardListQuery {
    pub due_only: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CardListResponse {
    pub results: Vec<CardSnapshot>,
    pub count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitReviewRequest {
    pub quality: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitReviewResponse {
    pub interval: i64,
    pub next_review: DateTime<Utc>,
    pub ease_factor: f64,
    pub review_count: u32,
    pub correct_count: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    pub flashcard_set_id: i64,
    pub mode: StudyMode,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateSessionRequest {
    pub cards_studied: u32,
    pub cards_correct: u32,
}
