//! Study session state machine.
//!
//! A [`SessionDriver`] runs one study session for one flashcard set:
//! it owns the working set of card snapshots, the cursor, and the
//! session counters, and funnels both study modes through the same
//! review path. The remote side (session store, card store, review
//! scheduler) is abstracted behind [`StudyBackend`].

use crate::error::{BackendError, SessionError};
use crate::types::{CardSnapshot, Quality, ReviewOutcome, SessionRecord, SessionStats, StudyMode};

/// Remote collaborators a study session depends on.
///
/// All operations are remote calls; each returns a plain
/// [`BackendError`] message on failure with no retry policy.
#[allow(async_fn_in_trait)]
pub trait StudyBackend {
    /// Create a session record for a flashcard set.
    async fn create_session(
        &self,
        flashcard_set_id: i64,
        mode: StudyMode,
    ) -> Result<SessionRecord, BackendError>;

    /// Fetch the ordered card snapshots for a set, optionally
    /// restricted to due cards.
    async fn fetch_cards(
        &self,
        flashcard_set_id: i64,
        due_only: bool,
    ) -> Result<Vec<CardSnapshot>, BackendError>;

    /// Submit a quality rating for a card; the scheduler computes and
    /// persists the new interval.
    async fn submit_review(
        &self,
        flashcard_id: i64,
        quality: Quality,
    ) -> Result<ReviewOutcome, BackendError>;

    /// Persist updated session counters.
    async fn update_session_counters(
        &self,
        session_id: i64,
        cards_studied: u32,
        cards_correct: u32,
    ) -> Result<SessionRecord, BackendError>;

    /// Set the session end timestamp.
    async fn end_session(&self, session_id: i64) -> Result<SessionRecord, BackendError>;

    /// Fetch final statistics for a session.
    async fn fetch_session_stats(&self, session_id: i64) -> Result<SessionStats, BackendError>;
}

/// Session lifecycle state.
///
/// All related fields live in one variant so a transition replaces
/// them together; the working set exists only while the session is
/// active.
#[derive(Debug)]
enum State {
    NotStarted,
    Active {
        record: SessionRecord,
        cards: Vec<CardSnapshot>,
        cursor: usize,
    },
    Ended {
        record: SessionRecord,
    },
}

/// Observable position of a session.
///
/// `NoCardsDue` is deliberately distinct from `Complete`: a session
/// whose working set came back empty never completes on its own, the
/// caller decides whether to end it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionProgress {
    NotStarted,
    NoCardsDue,
    Reviewing { position: usize, total: usize },
    Complete { total: usize },
    Ended,
}

/// Drives a single study session against a [`StudyBackend`].
///
/// Operations take `&mut self`, so a second review cannot be issued
/// while one is in flight and no intermediate state is observable;
/// exclusive ownership is the serialization guarantee.
pub struct SessionDriver<B: StudyBackend> {
    backend: B,
    state: State,
}

impl<B: StudyBackend> SessionDriver<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: State::NotStarted,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Start a new session, discarding any prior one.
    ///
    /// Creates the session record and fetches the working set (due
    /// cards only in spaced mode). Both calls must succeed together;
    /// on any failure the driver is left not-started.
    pub async fn start(&mut self, flashcard_set_id: i64, mode: StudyMode) -> Result<(), SessionError> {
        self.state = State::NotStarted;

        let record = self.backend.create_session(flashcard_set_id, mode).await?;
        let cards = self.backend.fetch_cards(flashcard_set_id, mode.due_only()).await?;

        self.state = State::Active {
            record,
            cards,
            cursor: 0,
        };
        Ok(())
    }

    /// The card under the cursor, or `None` when the working set is
    /// empty, the cursor has reached the end, or no session is active.
    pub fn current_card(&self) -> Option<&CardSnapshot> {
        match &self.state {
            State::Active { cards, cursor, .. } => cards.get(*cursor),
            _ => None,
        }
    }

    /// Record a review for the current card.
    ///
    /// Submits the rating to the scheduler, classifies correctness
    /// (quality >= 3), persists the incremented counters, then adopts
    /// the persisted counters and advances the cursor. The two remote
    /// calls and the local update are all-or-nothing: any failure is
    /// returned with counters and cursor untouched so the same card
    /// stays current for a retry.
    ///
    /// Returns `Ok(None)` when no review is possible (no active
    /// session, or the session is already complete).
    pub async fn record_review(
        &mut self,
        flashcard_id: i64,
        quality: Quality,
    ) -> Result<Option<ReviewOutcome>, SessionError> {
        let State::Active { record, cards, cursor } = &mut self.state else {
            return Ok(None);
        };
        if *cursor >= cards.len() {
            return Ok(None);
        }

        let outcome = self.backend.submit_review(flashcard_id, quality).await?;

        let studied = record.cards_studied + 1;
        let correct = record.cards_correct + u32::from(quality.is_correct());
        let persisted = self
            .backend
            .update_session_counters(record.id, studied, correct)
            .await?;

        record.cards_studied = persisted.cards_studied;
        record.cards_correct = persisted.cards_correct;
        // Always advance: cursor == cards.len() is the one completion
        // signal, for the last card like any other.
        *cursor += 1;

        Ok(Some(outcome))
    }

    /// End the session and merge final statistics.
    ///
    /// A no-op when no session was started. On an already-ended
    /// session only the statistics are re-fetched. If the stats fetch
    /// fails after the end call succeeded the session is still ended;
    /// calling again retries the fetch.
    pub async fn end(&mut self) -> Result<(), SessionError> {
        let (session_id, active) = match &self.state {
            State::NotStarted => return Ok(()),
            State::Active { record, .. } => (record.id, true),
            State::Ended { record } => (record.id, false),
        };

        if active {
            let record = self.backend.end_session(session_id).await?;
            // The working set is dropped with the Active state.
            self.state = State::Ended { record };
        }

        let stats = self.backend.fetch_session_stats(session_id).await?;
        if let State::Ended { record } = &mut self.state {
            record.apply_stats(&stats);
        }
        Ok(())
    }

    /// Move the cursor forward without recording anything.
    /// Clamped to the last card; counters are untouched.
    pub fn next_card(&mut self) {
        if let State::Active { cards, cursor, .. } = &mut self.state {
            if *cursor + 1 < cards.len() {
                *cursor += 1;
            }
        }
    }

    /// Move the cursor back without recording anything.
    pub fn previous_card(&mut self) {
        if let State::Active { cursor, .. } = &mut self.state {
            *cursor = cursor.saturating_sub(1);
        }
    }

    /// Current session record, if one was started.
    pub fn session(&self) -> Option<&SessionRecord> {
        match &self.state {
            State::NotStarted => None,
            State::Active { record, .. } | State::Ended { record } => Some(record),
        }
    }

    /// The working set. Empty unless a session is active.
    pub fn cards(&self) -> &[CardSnapshot] {
        match &self.state {
            State::Active { cards, .. } => cards,
            _ => &[],
        }
    }

    /// Zero-based cursor position, `0 <= index <= cards().len()`.
    pub fn current_index(&self) -> usize {
        match &self.state {
            State::Active { cursor, .. } => *cursor,
            _ => 0,
        }
    }

    pub fn progress(&self) -> SessionProgress {
        match &self.state {
            State::NotStarted => SessionProgress::NotStarted,
            State::Ended { .. } => SessionProgress::Ended,
            State::Active { cards, cursor, .. } => {
                if cards.is_empty() {
                    SessionProgress::NoCardsDue
                } else if *cursor >= cards.len() {
                    SessionProgress::Complete { total: cards.len() }
                } else {
                    SessionProgress::Reviewing {
                        position: *cursor,
                        total: cards.len(),
                    }
                }
            }
        }
    }

    /// True once every card in a non-empty working set was reviewed.
    pub fn is_complete(&self) -> bool {
        matches!(self.progress(), SessionProgress::Complete { .. })
    }
}
