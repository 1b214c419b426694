//! SM-2 spaced repetition scheduler.
//!
//! Simplified SuperMemo 2: the ease factor moves by a fixed step per
//! quality tier and the interval grows with the ease factor once a
//! card has graduated past its first two reviews.

use chrono::{DateTime, Duration, Utc};

use crate::types::{CardSnapshot, Quality};

/// SM-2 scheduler with configurable ease bounds.
#[derive(Debug, Clone)]
pub struct Sm2 {
    pub initial_ease: f64,
    pub minimum_ease: f64,
}

impl Default for Sm2 {
    fn default() -> Self {
        Self {
            initial_ease: 2.5,
            minimum_ease: 1.3,
        }
    }
}

/// Scheduler output applied to a card after a review.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewUpdate {
    pub interval_days: i64,
    pub next_review: DateTime<Utc>,
    pub ease_factor: f64,
    pub review_count: u32,
    pub correct_count: u32,
    pub last_studied: DateTime<Utc>,
}

impl Sm2 {
    /// Compute the next state for a card given a quality rating.
    ///
    /// The ease factor is adjusted first, so interval growth for mature
    /// cards uses the post-review ease.
    pub fn review(&self, card: &CardSnapshot, quality: Quality, now: DateTime<Utc>) -> ReviewUpdate {
        let ease_factor = self.adjust_ease(card.ease_factor, quality);
        let interval_days = self.interval(card, quality, ease_factor, now);

        let correct_count = if quality.is_correct() {
            card.correct_count + 1
        } else {
            card.correct_count
        };

        ReviewUpdate {
            interval_days,
            next_review: now + Duration::days(interval_days),
            ease_factor,
            review_count: card.review_count + 1,
            correct_count,
            last_studied: now,
        }
    }

    fn adjust_ease(&self, ease: f64, quality: Quality) -> f64 {
        let adjusted = match quality.value() {
            0 | 1 => ease - 0.20,
            2 => ease - 0.10,
            3 => ease,
            4 => ease + 0.05,
            _ => ease + 0.10,
        };
        adjusted.max(self.minimum_ease)
    }

    fn interval(
        &self,
        card: &CardSnapshot,
        quality: Quality,
        ease_factor: f64,
        now: DateTime<Utc>,
    ) -> i64 {
        match card.review_count {
            // First review is always one day out.
            0 => 1,
            1 => {
                if quality.is_correct() {
                    6
                } else {
                    1
                }
            }
            _ => {
                if !quality.is_correct() {
                    // Failed review resets the schedule.
                    return 1;
                }
                // The previous interval is approximated from the time
                // since the last study, never less than a day.
                let previous = match card.last_studied {
                    Some(last) => (now - last).num_days().max(1) as f64,
                    None => 6.0,
                };
                (previous * ease_factor) as i64
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Difficulty;
    use pretty_assertions::assert_eq;

    fn q(value: u8) -> Quality {
        Quality::new(value).unwrap()
    }

    fn card(review_count: u32, ease: f64, last_studied: Option<DateTime<Utc>>) -> CardSnapshot {
        CardSnapshot {
            id: 1,
            front: "q".to_string(),
            back: "a".to_string(),
            difficulty: Difficulty::Medium,
            ease_factor: ease,
            review_count,
            correct_count: 0,
            last_studied,
            next_review: None,
        }
    }

    #[test]
    fn first_review_is_one_day() {
        let sm2 = Sm2::default();
        let now = Utc::now();
        let update = sm2.review(&card(0, 2.5, None), q(5), now);
        assert_eq!(update.interval_days, 1);
        assert_eq!(update.next_review, now + Duration::days(1));
        assert_eq!(update.review_count, 1);
        assert_eq!(update.correct_count, 1);
    }

    #[test]
    fn second_review_graduates_to_six_days() {
        let sm2 = Sm2::default();
        let update = sm2.review(&card(1, 2.5, None), q(3), Utc::now());
        assert_eq!(update.interval_days, 6);
    }

    #[test]
    fn second_review_failure_stays_at_one_day() {
        let sm2 = Sm2::default();
        let update = sm2.review(&card(1, 2.5, None), q(2), Utc::now());
        assert_eq!(update.interval_days, 1);
    }

    #[test]
    fn mature_card_grows_by_ease() {
        let sm2 = Sm2::default();
        let now = Utc::now();
        // Last studied 10 days ago, quality 3 leaves ease at 2.5.
        let update = sm2.review(&card(5, 2.5, Some(now - Duration::days(10))), q(3), now);
        assert_eq!(update.interval_days, 25);
    }

    #[test]
    fn mature_card_without_history_uses_fallback() {
        let sm2 = Sm2::default();
        let update = sm2.review(&card(5, 2.0, None), q(3), Utc::now());
        // 6.0 * 2.0 truncated.
        assert_eq!(update.interval_days, 12);
    }

    #[test]
    fn failed_mature_card_resets() {
        let sm2 = Sm2::default();
        let now = Utc::now();
        let update = sm2.review(&card(5, 2.5, Some(now - Duration::days(30))), q(1), now);
        assert_eq!(update.interval_days, 1);
        assert_eq!(update.correct_count, 0);
    }

    #[test]
    fn ease_steps_per_quality_tier() {
        let sm2 = Sm2::default();
        let now = Utc::now();
        let base = card(0, 2.5, None);
        assert_eq!(sm2.review(&base, q(0), now).ease_factor, 2.3);
        assert_eq!(sm2.review(&base, q(2), now).ease_factor, 2.4);
        assert_eq!(sm2.review(&base, q(3), now).ease_factor, 2.5);
        assert_eq!(sm2.review(&base, q(4), now).ease_factor, 2.55);
        assert_eq!(sm2.review(&base, q(5), now).ease_factor, 2.6);
    }

    #[test]
    fn ease_never_drops_below_minimum() {
        let sm2 = Sm2::default();
        let update = sm2.review(&card(3, 1.35, None), q(0), Utc::now());
        assert_eq!(update.ease_factor, sm2.minimum_ease);
    }

    #[test]
    fn ease_updates_before_interval() {
        let sm2 = Sm2::default();
        let now = Utc::now();
        // Quality 5 lifts ease 2.5 -> 2.6 and the interval uses 2.6.
        let update = sm2.review(&card(5, 2.5, Some(now - Duration::days(10))), q(5), now);
        assert_eq!(update.interval_days, 26);
    }
}
