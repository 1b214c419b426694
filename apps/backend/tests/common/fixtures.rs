//! Test fixtures and factory functions for creating test data.

use serde_json::json;

/// Create a set creation request body.
pub fn create_set_request(name: &str) -> serde_json::Value {
    json!({ "name": name, "description": "integration test set" })
}

/// Create a card creation request body.
pub fn create_card_request(front: &str, back: &str) -> serde_json::Value {
    json!({ "front": front, "back": back })
}

/// Create a review request body.
pub fn review_request(quality: i32) -> serde_json::Value {
    json!({ "quality": quality })
}

/// Create a session creation request body.
pub fn create_session_request(set_id: i64, mode: &str) -> serde_json::Value {
    json!({ "flashcard_set_id": set_id, "mode": mode })
}

/// Create a session counter update body.
pub fn update_session_request(studied: u32, correct: u32) -> serde_json::Value {
    json!({ "cards_studied": studied, "cards_correct": correct })
}
