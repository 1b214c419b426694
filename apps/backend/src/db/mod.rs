//! PostgreSQL database operations

use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;
use study_core::sm2::ReviewUpdate;

/// Database wrapper with connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to PostgreSQL and create connection pool
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| ApiError::Migration(e.to_string()))?;
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // === Account Repository ===

    /// Create a new account with generated token
    pub async fn create_account(&self, name: Option<&str>) -> Result<Account> {
        let token = Uuid::new_v4().to_string();
        let account = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (token, name)
            VALUES ($1, $2)
            RETURNING id, token, name, created_at, last_seen_at
            "#,
        )
        .bind(&token)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(account)
    }

    /// Get account by token
    pub async fn get_account_by_token(&self, token: &str) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, token, name, created_at, last_seen_at
            FROM accounts
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    /// Update account last_seen_at timestamp
    pub async fn update_last_seen(&self, account_id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE accounts
            SET last_seen_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(account_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // === Flashcard Set Repository ===

    /// Create a flashcard set
    pub async fn create_set(
        &self,
        account_id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> Result<DbFlashcardSet> {
        let set = sqlx::query_as::<_, DbFlashcardSet>(
            r#"
            INSERT INTO flashcard_sets (account_id, name, description)
            VALUES ($1, $2, $3)
            RETURNING id, account_id, name, description, created_at, updated_at
            "#,
        )
        .bind(account_id)
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;

        Ok(set)
    }

    /// List sets for an account with card counts, most recently
    /// updated first
    pub async fn list_sets(&self, account_id: Uuid) -> Result<Vec<FlashcardSetInfo>> {
        let sets = sqlx::query_as::<_, FlashcardSetInfo>(
            r#"
            SELECT s.id, s.name, s.description,
                   COUNT(f.id) AS card_count,
                   s.created_at, s.updated_at
            FROM flashcard_sets s
            LEFT JOIN flashcards f ON f.flashcard_set_id = s.id
            WHERE s.account_id = $1
            GROUP BY s.id
            ORDER BY s.updated_at DESC
            "#,
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(sets)
    }

    /// Get a set owned by an account
    pub async fn get_set(&self, account_id: Uuid, set_id: i64) -> Result<Option<DbFlashcardSet>> {
        let set = sqlx::query_as::<_, DbFlashcardSet>(
            r#"
            SELECT id, account_id, name, description, created_at, updated_at
            FROM flashcard_sets
            WHERE id = $1 AND account_id = $2
            "#,
        )
        .bind(set_id)
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(set)
    }

    // === Flashcard Repository ===

    /// Create a flashcard in a set
    pub async fn create_flashcard(
        &self,
        set_id: i64,
        front: &str,
        back: &str,
        difficulty: &str,
    ) -> Result<DbFlashcard> {
        let card = sqlx::query_as::<_, DbFlashcard>(
            r#"
            INSERT INTO flashcards (flashcard_set_id, front, back, difficulty)
            VALUES ($1, $2, $3, $4)
            RETURNING id, flashcard_set_id, front, back, difficulty, ease_factor,
                      review_count, correct_count, last_studied, next_review,
                      created_at, updated_at
            "#,
        )
        .bind(set_id)
        .bind(front)
        .bind(back)
        .bind(difficulty)
        .fetch_one(&self.pool)
        .await?;

        Ok(card)
    }

    /// Get a flashcard, verifying set ownership
    pub async fn get_flashcard(
        &self,
        account_id: Uuid,
        card_id: i64,
    ) -> Result<Option<DbFlashcard>> {
        let card = sqlx::query_as::<_, DbFlashcard>(
            r#"
            SELECT f.id, f.flashcard_set_id, f.front, f.back, f.difficulty, f.ease_factor,
                   f.review_count, f.correct_count, f.last_studied, f.next_review,
                   f.created_at, f.updated_at
            FROM flashcards f
            JOIN flashcard_sets s ON s.id = f.flashcard_set_id
            WHERE f.id = $1 AND s.account_id = $2
            "#,
        )
        .bind(card_id)
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(card)
    }

    /// List the cards of a set in creation order, optionally only
    /// those due at `now` (never-reviewed cards are always due)
    pub async fn list_flashcards(
        &self,
        set_id: i64,
        due_only: bool,
        now: DateTime<Utc>,
    ) -> Result<Vec<DbFlashcard>> {
        let cards = if due_only {
            sqlx::query_as::<_, DbFlashcard>(
                r#"
                SELECT id, flashcard_set_id, front, back, difficulty, ease_factor,
                       review_count, correct_count, last_studied, next_review,
                       created_at, updated_at
                FROM flashcards
                WHERE flashcard_set_id = $1
                  AND (next_review IS NULL OR next_review <= $2)
                ORDER BY created_at, id
                "#,
            )
            .bind(set_id)
            .bind(now)
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query_as::<_, DbFlashcard>(
                r#"
                SELECT id, flashcard_set_id, front, back, difficulty, ease_factor,
                       review_count, correct_count, last_studied, next_review,
                       created_at, updated_at
                FROM flashcards
                WHERE flashcard_set_id = $1
                ORDER BY created_at, id
                "#,
            )
            .bind(set_id)
            .fetch_all(&self.pool)
            .await?
        };

        Ok(cards)
    }

    /// Apply a scheduler result to a flashcard
    pub async fn apply_review_update(
        &self,
        card_id: i64,
        update: &ReviewUpdate,
    ) -> Result<DbFlashcard> {
        let card = sqlx::query_as::<_, DbFlashcard>(
            r#"
            UPDATE flashcards
            SET ease_factor = $2,
                review_count = $3,
                correct_count = $4,
                last_studied = $5,
                next_review = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, flashcard_set_id, front, back, difficulty, ease_factor,
                      review_count, correct_count, last_studied, next_review,
                      created_at, updated_at
            "#,
        )
        .bind(card_id)
        .bind(update.ease_factor)
        .bind(update.review_count as i32)
        .bind(update.correct_count as i32)
        .bind(update.last_studied)
        .bind(update.next_review)
        .fetch_one(&self.pool)
        .await?;

        Ok(card)
    }

    // === Study Session Repository ===

    /// Create a study session
    pub async fn create_session(
        &self,
        account_id: Uuid,
        set_id: i64,
        mode: StudyMode,
    ) -> Result<DbStudySession> {
        let session = sqlx::query_as::<_, DbStudySession>(
            r#"
            INSERT INTO study_sessions (account_id, flashcard_set_id, mode)
            VALUES ($1, $2, $3)
            RETURNING id, account_id, flashcard_set_id, mode, started_at, ended_at,
                      cards_studied, cards_correct
            "#,
        )
        .bind(account_id)
        .bind(set_id)
        .bind(mode.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(session)
    }

    /// Get a session owned by an account
    pub async fn get_session(
        &self,
        account_id: Uuid,
        session_id: i64,
    ) -> Result<Option<DbStudySession>> {
        let session = sqlx::query_as::<_, DbStudySession>(
            r#"
            SELECT id, account_id, flashcard_set_id, mode, started_at, ended_at,
                   cards_studied, cards_correct
            FROM study_sessions
            WHERE id = $1 AND account_id = $2
            "#,
        )
        .bind(session_id)
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    /// Persist session counters
    pub async fn update_session_counters(
        &self,
        session_id: i64,
        cards_studied: u32,
        cards_correct: u32,
    ) -> Result<DbStudySession> {
        let session = sqlx::query_as::<_, DbStudySession>(
            r#"
            UPDATE study_sessions
            SET cards_studied = $2, cards_correct = $3
            WHERE id = $1
            RETURNING id, account_id, flashcard_set_id, mode, started_at, ended_at,
                      cards_studied, cards_correct
            "#,
        )
        .bind(session_id)
        .bind(cards_studied as i32)
        .bind(cards_correct as i32)
        .fetch_one(&self.pool)
        .await?;

        Ok(session)
    }

    /// Set the session end timestamp. Idempotent: an already-ended
    /// session keeps its original timestamp.
    pub async fn end_session(&self, session_id: i64) -> Result<DbStudySession> {
        let session = sqlx::query_as::<_, DbStudySession>(
            r#"
            UPDATE study_sessions
            SET ended_at = COALESCE(ended_at, NOW())
            WHERE id = $1
            RETURNING id, account_id, flashcard_set_id, mode, started_at, ended_at,
                      cards_studied, cards_correct
            "#,
        )
        .bind(session_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(session)
    }
}
