//! HTTP client for the study backend.

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use study_core::error::BackendError;
use study_core::session::StudyBackend;
use study_core::types::{
    CardSnapshot, Quality, ReviewOutcome, SessionRecord, SessionStats, StudyMode,
};

#[derive(Debug, Deserialize)]
struct RegisterResponse {
    account_id: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct CreatedSet {
    id: i64,
    name: String,
}

#[derive(Debug, Deserialize)]
struct SetInfo {
    id: i64,
    name: String,
    card_count: i64,
}

#[derive(Debug, Deserialize)]
struct SetListResponse {
    results: Vec<SetInfo>,
}

#[derive(Debug, Deserialize)]
struct CardListResponse {
    results: Vec<CardSnapshot>,
}

#[derive(Debug, Deserialize)]
struct ReviewResponse {
    interval: i64,
    next_review: DateTime<Utc>,
}

/// A registered account's credentials.
#[derive(Debug)]
pub struct Credentials {
    pub account_id: String,
    pub token: String,
}

/// A flashcard set as listed by the backend.
#[derive(Debug)]
pub struct SetSummary {
    pub id: i64,
    pub name: String,
    pub card_count: i64,
}

/// Authenticated client for the study backend.
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: String,
}

impl ApiClient {
    pub fn new(base_url: String, token: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    /// Register a new account. Does not require a token.
    pub async fn register(
        base_url: &str,
        name: Option<String>,
    ) -> Result<Credentials, BackendError> {
        let url = format!("{}/api/account/register", base_url.trim_end_matches('/'));
        let resp = Client::new()
            .post(&url)
            .json(&json!({ "name": name }))
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        let resp = check_status(resp).await?;
        let body: RegisterResponse = parse_json(resp).await?;
        Ok(Credentials {
            account_id: body.account_id,
            token: body.token,
        })
    }

    pub async fn create_set(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<SetSummary, BackendError> {
        let resp = self
            .post("/api/sets")
            .json(&json!({ "name": name, "description": description }))
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        let resp = check_status(resp).await?;
        let body: CreatedSet = parse_json(resp).await?;
        Ok(SetSummary {
            id: body.id,
            name: body.name,
            card_count: 0,
        })
    }

    pub async fn list_sets(&self) -> Result<Vec<SetSummary>, BackendError> {
        let resp = self
            .get("/api/sets")
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        let resp = check_status(resp).await?;
        let body: SetListResponse = parse_json(resp).await?;
        Ok(body
            .results
            .into_iter()
            .map(|s| SetSummary {
                id: s.id,
                name: s.name,
                card_count: s.card_count,
            })
            .collect())
    }

    pub async fn create_card(
        &self,
        set_id: i64,
        front: &str,
        back: &str,
        difficulty: Option<&str>,
    ) -> Result<CardSnapshot, BackendError> {
        let resp = self
            .post(&format!("/api/sets/{set_id}/flashcards"))
            .json(&json!({ "front": front, "back": back, "difficulty": difficulty }))
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        let resp = check_status(resp).await?;
        parse_json(resp).await
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .bearer_auth(&self.token)
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .bearer_auth(&self.token)
    }

    fn patch(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .patch(format!("{}{}", self.base_url, path))
            .bearer_auth(&self.token)
    }
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, BackendError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status().as_u16();
    let message = resp.text().await.unwrap_or_default();
    Err(BackendError::Api { status, message })
}

async fn parse_json<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, BackendError> {
    resp.json()
        .await
        .map_err(|e| BackendError::Response(e.to_string()))
}

impl StudyBackend for ApiClient {
    async fn create_session(
        &self,
        flashcard_set_id: i64,
        mode: StudyMode,
    ) -> Result<SessionRecord, BackendError> {
        let resp = self
            .post("/api/sessions")
            .json(&json!({ "flashcard_set_id": flashcard_set_id, "mode": mode }))
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        let resp = check_status(resp).await?;
        parse_json(resp).await
    }

    async fn fetch_cards(
        &self,
        flashcard_set_id: i64,
        due_only: bool,
    ) -> Result<Vec<CardSnapshot>, BackendError> {
        let resp = self
            .get(&format!(
                "/api/sets/{flashcard_set_id}/flashcards?due_only={due_only}"
            ))
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        let resp = check_status(resp).await?;
        let body: CardListResponse = parse_json(resp).await?;
        Ok(body.results)
    }

    async fn submit_review(
        &self,
        flashcard_id: i64,
        quality: Quality,
    ) -> Result<ReviewOutcome, BackendError> {
        let resp = self
            .post(&format!("/api/flashcards/{flashcard_id}/review"))
            .json(&json!({ "quality": quality.value() }))
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        let resp = check_status(resp).await?;
        let body: ReviewResponse = parse_json(resp).await?;
        Ok(ReviewOutcome {
            interval_days: Some(body.interval),
            next_review: Some(body.next_review),
        })
    }

    async fn update_session_counters(
        &self,
        session_id: i64,
        cards_studied: u32,
        cards_correct: u32,
    ) -> Result<SessionRecord, BackendError> {
        let resp = self
            .patch(&format!("/api/sessions/{session_id}"))
            .json(&json!({ "cards_studied": cards_studied, "cards_correct": cards_correct }))
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        let resp = check_status(resp).await?;
        parse_json(resp).await
    }

    async fn end_session(&self, session_id: i64) -> Result<SessionRecord, BackendError> {
        let resp = self
            .post(&format!("/api/sessions/{session_id}/end"))
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        let resp = check_status(resp).await?;
        parse_json(resp).await
    }

    async fn fetch_session_stats(&self, session_id: i64) -> Result<SessionStats, BackendError> {
        let resp = self
            .get(&format!("/api/sessions/{session_id}/stats"))
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        let resp = check_status(resp).await?;
        parse_json(resp).await
    }
}
