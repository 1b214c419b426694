//! Core types shared by the backend and the study clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Study session mode.
///
/// `Simple` presents a binary correct/incorrect choice; `Spaced`
/// presents the full 0-5 quality scale and restricts the working set
/// to due cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudyMode {
    Simple,
    Spaced,
}

impl Default for StudyMode {
    fn default() -> Self {
        Self::Simple
    }
}

impl StudyMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Spaced => "spaced",
        }
    }

    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "simple" => Some(Self::Simple),
            "spaced" => Some(Self::Spaced),
            _ => None,
        }
    }

    /// Whether the working set should be restricted to due cards.
    pub fn due_only(&self) -> bool {
        matches!(self, Self::Spaced)
    }
}

/// SM-2 quality rating, 0-5.
///
/// 0 = total blackout, 5 = perfect recall. The >= 3 threshold is the
/// single source of truth for "correct" in both study modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quality(u8);

impl Quality {
    pub const MIN: u8 = 0;
    pub const MAX: u8 = 5;

    /// Create from a raw value, rejecting anything outside 0-5.
    pub fn new(value: u8) -> Option<Self> {
        (value <= Self::MAX).then_some(Self(value))
    }

    /// Map a binary correct/incorrect choice to a quality rating.
    /// Correct -> 5, incorrect -> 0.
    pub fn from_simple(correct: bool) -> Self {
        if correct {
            Self(5)
        } else {
            Self(0)
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// A review counts as correct iff quality >= 3.
    pub fn is_correct(&self) -> bool {
        self.0 >= 3
    }
}

/// Card difficulty tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Medium
    }
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }
}

/// Read-only flashcard snapshot as fetched at session start.
///
/// Scheduling state (ease factor, counts, timestamps) is owned by the
/// backend; a session never mutates its snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardSnapshot {
    pub id: i64,
    pub front: String,
    pub back: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    pub ease_factor: f64,
    pub review_count: u32,
    pub correct_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_studied: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_review: Option<DateTime<Utc>>,
}

impl CardSnapshot {
    /// A card is due when it has never been scheduled or its next
    /// review time has passed.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        match self.next_review {
            None => true,
            Some(next) => now >= next,
        }
    }
}

/// Persistent study session record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: i64,
    pub flashcard_set_id: i64,
    pub mode: StudyMode,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
    pub cards_studied: u32,
    pub cards_correct: u32,
}

impl SessionRecord {
    pub fn is_ended(&self) -> bool {
        self.ended_at.is_some()
    }

    /// Accuracy percentage, undefined until something was studied.
    pub fn accuracy(&self) -> Option<f64> {
        if self.cards_studied == 0 {
            return None;
        }
        Some(self.cards_correct as f64 / self.cards_studied as f64 * 100.0)
    }

    /// Session length in minutes, undefined while still active.
    pub fn duration_minutes(&self) -> Option<f64> {
        let ended = self.ended_at?;
        Some((ended - self.started_at).num_seconds() as f64 / 60.0)
    }

    /// Merge final statistics reported by the backend.
    pub fn apply_stats(&mut self, stats: &SessionStats) {
        self.cards_studied = stats.cards_studied;
        self.cards_correct = stats.cards_correct;
        self.started_at = stats.started_at;
        self.ended_at = stats.ended_at;
    }
}

/// Aggregate statistics for a session as reported by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStats {
    pub id: i64,
    pub cards_studied: u32,
    pub cards_correct: u32,
    pub accuracy: f64,
    pub duration_minutes: f64,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
}

/// What the scheduler reports after a review.
///
/// Both fields are optional on the wire; callers render feedback only
/// when they are present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewOutcome {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval_days: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_review: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    fn card(next_review: Option<DateTime<Utc>>) -> CardSnapshot {
        CardSnapshot {
            id: 1,
            front: "front".to_string(),
            back: "back".to_string(),
            difficulty: Difficulty::Medium,
            ease_factor: 2.5,
            review_count: 0,
            correct_count: 0,
            last_studied: None,
            next_review,
        }
    }

    #[test]
    fn quality_rejects_out_of_range() {
        assert!(Quality::new(5).is_some());
        assert!(Quality::new(6).is_none());
    }

    #[test]
    fn quality_threshold_is_three() {
        assert!(!Quality::new(2).unwrap().is_correct());
        assert!(Quality::new(3).unwrap().is_correct());
    }

    #[test]
    fn simple_mode_maps_to_extremes() {
        assert_eq!(Quality::from_simple(true).value(), 5);
        assert_eq!(Quality::from_simple(false).value(), 0);
    }

    #[test]
    fn unscheduled_card_is_due() {
        let now = Utc::now();
        assert!(card(None).is_due(now));
        assert!(card(Some(now - Duration::hours(1))).is_due(now));
        assert!(!card(Some(now + Duration::hours(1))).is_due(now));
    }

    #[test]
    fn accuracy_undefined_without_reviews() {
        let now = Utc::now();
        let mut record = SessionRecord {
            id: 1,
            flashcard_set_id: 1,
            mode: StudyMode::Simple,
            started_at: now,
            ended_at: None,
            cards_studied: 0,
            cards_correct: 0,
        };
        assert_eq!(record.accuracy(), None);
        assert_eq!(record.duration_minutes(), None);

        record.cards_studied = 2;
        record.cards_correct = 1;
        record.ended_at = Some(now + Duration::minutes(3));
        assert_eq!(record.accuracy(), Some(50.0));
        assert_eq!(record.duration_minutes(), Some(3.0));
    }
}
