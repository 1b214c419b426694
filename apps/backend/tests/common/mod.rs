//! Common test utilities and fixtures for integration tests.
//!
//! Integration tests require a PostgreSQL database; set DATABASE_URL
//! before running and drop the `#[ignore]` markers.

pub mod fixtures;

use std::sync::Arc;

use axum::Router;
use uuid::Uuid;

use studynotes_backend::db::Database;
use studynotes_backend::{build_router, AppState};

/// Test context containing database connection and router.
pub struct TestContext {
    pub db: Arc<Database>,
    app: Router,
}

impl TestContext {
    /// Create a new test context.
    ///
    /// # Panics
    /// Panics if DATABASE_URL is not set or database connection fails.
    pub async fn new() -> Self {
        dotenvy::dotenv().ok();

        let database_url =
            std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests");

        let db = Database::connect(&database_url)
            .await
            .expect("Failed to connect to test database");

        db.run_migrations()
            .await
            .expect("Failed to run migrations");

        let db = Arc::new(db);
        let app = build_router(AppState { db: db.clone() });

        Self { db, app }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    /// Create a test account and return its ID and token.
    pub async fn create_test_account(&self, name: Option<&str>) -> (Uuid, String) {
        let account = self
            .db
            .create_account(name)
            .await
            .expect("Failed to create test account");
        (account.id, account.token)
    }

    /// Format authorization header value.
    pub fn auth_header_value(token: &str) -> String {
        format!("Bearer {}", token)
    }

    /// Clean up test data for an account.
    pub async fn cleanup_account(&self, account_id: Uuid) {
        // Delete in order due to foreign keys
        let _ = sqlx::query("DELETE FROM study_sessions WHERE account_id = $1")
            .bind(account_id)
            .execute(self.db.pool())
            .await;

        let _ = sqlx::query(
            "DELETE FROM flashcards WHERE flashcard_set_id IN \
             (SELECT id FROM flashcard_sets WHERE account_id = $1)",
        )
        .bind(account_id)
        .execute(self.db.pool())
        .await;

        let _ = sqlx::query("DELETE FROM flashcard_sets WHERE account_id = $1")
            .bind(account_id)
            .execute(self.db.pool())
            .await;

        let _ = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(account_id)
            .execute(self.db.pool())
            .await;
    }
}
