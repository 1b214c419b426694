//! Review scheduling API tests.
//!
//! These tests require a running PostgreSQL database.
//! Set DATABASE_URL before running.

mod common;

use axum::http::StatusCode;
use axum_test::TestServer;

use common::fixtures;
use common::TestContext;

async fn create_set_with_card(
    server: &TestServer,
    token: &str,
    front: &str,
    back: &str,
) -> (i64, i64) {
    let set_response = server
        .post("/api/sets")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(token),
        )
        .json(&fixtures::create_set_request("test set"))
        .await;
    set_response.assert_status_ok();
    let set: serde_json::Value = set_response.json();
    let set_id = set["id"].as_i64().unwrap();

    let card_response = server
        .post(&format!("/api/sets/{set_id}/flashcards"))
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(token),
        )
        .json(&fixtures::create_card_request(front, back))
        .await;
    card_response.assert_status_ok();
    let card: serde_json::Value = card_response.json();

    (set_id, card["id"].as_i64().unwrap())
}

/// First review of a new card schedules one day out.
#[tokio::test]
#[ignore = "requires database"]
async fn test_first_review_interval_is_one_day() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (account_id, token) = ctx.create_test_account(None).await;
    let (_, card_id) = create_set_with_card(&server, &token, "Q1", "A1").await;

    let response = server
        .post(&format!("/api/flashcards/{card_id}/review"))
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&token),
        )
        .json(&fixtures::review_request(5))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["interval"].as_i64().unwrap(), 1);
    assert_eq!(body["review_count"].as_i64().unwrap(), 1);
    assert_eq!(body["correct_count"].as_i64().unwrap(), 1);
    // Quality 5 lifts the default ease 2.5 -> 2.6.
    assert!((body["ease_factor"].as_f64().unwrap() - 2.6).abs() < 1e-9);

    ctx.cleanup_account(account_id).await;
}

/// A failed review does not count as correct.
#[tokio::test]
#[ignore = "requires database"]
async fn test_failed_review_not_counted_correct() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (account_id, token) = ctx.create_test_account(None).await;
    let (_, card_id) = create_set_with_card(&server, &token, "Q1", "A1").await;

    let response = server
        .post(&format!("/api/flashcards/{card_id}/review"))
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&token),
        )
        .json(&fixtures::review_request(2))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["review_count"].as_i64().unwrap(), 1);
    assert_eq!(body["correct_count"].as_i64().unwrap(), 0);

    ctx.cleanup_account(account_id).await;
}

/// Quality outside 0-5 is rejected.
#[tokio::test]
#[ignore = "requires database"]
async fn test_review_quality_out_of_range() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (account_id, token) = ctx.create_test_account(None).await;
    let (_, card_id) = create_set_with_card(&server, &token, "Q1", "A1").await;

    for quality in [-1, 6] {
        let response = server
            .post(&format!("/api/flashcards/{card_id}/review"))
            .add_header(
                axum::http::header::AUTHORIZATION,
                TestContext::auth_header_value(&token),
            )
            .json(&fixtures::review_request(quality))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    ctx.cleanup_account(account_id).await;
}

/// Reviewing a non-existent card returns not found.
#[tokio::test]
#[ignore = "requires database"]
async fn test_review_card_not_found() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (account_id, token) = ctx.create_test_account(None).await;

    let response = server
        .post("/api/flashcards/99999/review")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&token),
        )
        .json(&fixtures::review_request(3))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);

    ctx.cleanup_account(account_id).await;
}

/// A reviewed card leaves the due-only card list.
#[tokio::test]
#[ignore = "requires database"]
async fn test_due_only_filter_excludes_scheduled_card() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (account_id, token) = ctx.create_test_account(None).await;
    let (set_id, card_id) = create_set_with_card(&server, &token, "Q1", "A1").await;

    // New card is due.
    let response = server
        .get(&format!("/api/sets/{set_id}/flashcards?due_only=true"))
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&token),
        )
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["count"].as_i64().unwrap(), 1);

    // Review pushes next_review into the future.
    let _ = server
        .post(&format!("/api/flashcards/{card_id}/review"))
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&token),
        )
        .json(&fixtures::review_request(5))
        .await;

    let response = server
        .get(&format!("/api/sets/{set_id}/flashcards?due_only=true"))
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&token),
        )
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["count"].as_i64().unwrap(), 0);

    // The unfiltered list still has it.
    let response = server
        .get(&format!("/api/sets/{set_id}/flashcards"))
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&token),
        )
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["count"].as_i64().unwrap(), 1);

    ctx.cleanup_account(account_id).await;
}

/// Review endpoint requires authentication.
#[tokio::test]
#[ignore = "requires database"]
async fn test_review_requires_auth() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();

    let response = server
        .post("/api/flashcards/1/review")
        .json(&fixtures::review_request(3))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}
