//! HTTP-level tests for the quest, attempt and profile endpoints.
//!
//! Requests go straight to the router through `tower::ServiceExt::oneshot`,
//! backed by a migrated test database.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{
    body_json, delete, destination, expect_status, get, post, post_json, profile_with_token,
    put_json,
};
use serde_json::json;
use sqlx::PgPool;

fn quest_body(title: &str, destinations: &[i64]) -> serde_json::Value {
    let now = Utc::now();
    json!({
        "title": title,
        "start_date": now - Duration::days(1),
        "end_date": now + Duration::days(7),
        "destinations": destinations,
    })
}

/// Create a quest as `token`'s profile and return its id.
async fn create_quest(pool: &PgPool, token: &str, destinations: &[i64]) -> i64 {
    let app = common::build_test_app(pool.clone());
    let response = post_json(app, "/api/v1/quests", token, quest_body("Canal tour", destinations)).await;
    let json = expect_status(response, StatusCode::CREATED).await;
    json["data"]["quest"]["id"].as_i64().unwrap()
}

async fn start_attempt(pool: &PgPool, token: &str, quest_id: i64) -> i64 {
    let app = common::build_test_app(pool.clone());
    let response = post(app, &format!("/api/v1/quests/{quest_id}/attempts"), token).await;
    let json = expect_status(response, StatusCode::CREATED).await;
    json["data"]["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Health and auth
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_health_is_public(pool: PgPool) {
    let app = common::build_test_app(pool);
    let request = axum::http::Request::builder()
        .uri("/health")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();

    let json = expect_status(response, StatusCode::OK).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], true);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_token_is_401(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/profiles/1/achievements", "not-a-jwt").await;

    let json = expect_status(response, StatusCode::UNAUTHORIZED).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

// ---------------------------------------------------------------------------
// Quests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_quest_returns_reward(pool: PgPool) {
    let (_, token) = profile_with_token(&pool, "owner", false).await;
    let d = destination(&pool, "Fountain").await;

    let app = common::build_test_app(pool.clone());
    let response = post_json(app, "/api/v1/quests", &token, quest_body("Squares", &[d])).await;

    let json = expect_status(response, StatusCode::CREATED).await;
    assert_eq!(json["data"]["quest"]["title"], "Squares");
    assert_eq!(json["data"]["quest"]["objectives"][0]["destination_id"], d);
    assert_eq!(json["data"]["reward"]["points_awarded"][0]["action"], "quest_created");
    assert_eq!(json["data"]["reward"]["badges_achieved"][0]["badge"], "quester");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_quest_with_blank_title_is_400(pool: PgPool) {
    let (_, token) = profile_with_token(&pool, "owner", false).await;

    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/v1/quests", &token, quest_body("  ", &[])).await;

    let json = expect_status(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_edit_lock_over_http(pool: PgPool) {
    let (_, owner) = profile_with_token(&pool, "owner", false).await;
    let (_, player) = profile_with_token(&pool, "player", false).await;
    let a = destination(&pool, "A").await;
    let b = destination(&pool, "B").await;
    let c = destination(&pool, "C").await;
    let quest_id = create_quest(&pool, &owner, &[a, b]).await;
    start_attempt(&pool, &player, quest_id).await;

    let uri = format!("/api/v1/quests/{quest_id}");
    let app = common::build_test_app(pool.clone());
    let rejected = put_json(app, &uri, &owner, quest_body("Canal tour", &[a, c])).await;
    let json = expect_status(rejected, StatusCode::BAD_REQUEST).await;
    assert_eq!(json["code"], "INVARIANT_VIOLATION");

    let app = common::build_test_app(pool.clone());
    let appended = put_json(app, &uri, &owner, quest_body("Canal tour", &[a, b, c])).await;
    let json = expect_status(appended, StatusCode::OK).await;
    assert_eq!(json["data"]["objectives"].as_array().unwrap().len(), 3);

    let app = common::build_test_app(pool);
    let response = get(app, &format!("{uri}/active-profiles"), &owner).await;
    let json = expect_status(response, StatusCode::OK).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_quest_by_non_owner_is_403(pool: PgPool) {
    let (_, owner) = profile_with_token(&pool, "owner", false).await;
    let (_, other) = profile_with_token(&pool, "other", false).await;
    let quest_id = create_quest(&pool, &owner, &[]).await;

    let app = common::build_test_app(pool.clone());
    let response = delete(app, &format!("/api/v1/quests/{quest_id}"), &other).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool);
    let response = delete(app, &format!("/api/v1/quests/{quest_id}"), &owner).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

// ---------------------------------------------------------------------------
// Attempts
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_play_through_over_http(pool: PgPool) {
    let (_, owner) = profile_with_token(&pool, "owner", false).await;
    let (player_id, player) = profile_with_token(&pool, "player", false).await;
    let right = destination(&pool, "Clock tower").await;
    let wrong = destination(&pool, "Train station").await;
    let quest_id = create_quest(&pool, &owner, &[right]).await;
    let attempt_id = start_attempt(&pool, &player, quest_id).await;

    // Check-in before solving is refused.
    let app = common::build_test_app(pool.clone());
    let early = post(app, &format!("/api/v1/attempts/{attempt_id}/check-in"), &player).await;
    let json = expect_status(early, StatusCode::FORBIDDEN).await;
    assert_eq!(json["code"], "FORBIDDEN");

    let app = common::build_test_app(pool.clone());
    let miss = post(app, &format!("/api/v1/attempts/{attempt_id}/guess/{wrong}"), &player).await;
    let json = expect_status(miss, StatusCode::OK).await;
    assert_eq!(json["data"]["correct"], false);
    assert_eq!(json["data"]["attempt"]["progress"], 0);

    let app = common::build_test_app(pool.clone());
    let hit = post(app, &format!("/api/v1/attempts/{attempt_id}/guess/{right}"), &player).await;
    let json = expect_status(hit, StatusCode::OK).await;
    assert_eq!(json["data"]["correct"], true);

    let app = common::build_test_app(pool.clone());
    let checked = post(app, &format!("/api/v1/attempts/{attempt_id}/check-in"), &player).await;
    let json = expect_status(checked, StatusCode::OK).await;
    assert_eq!(json["data"]["admitted"], true);
    assert_eq!(json["data"]["attempt"]["completed"], true);
    let actions: Vec<&str> = json["data"]["reward"]["points_awarded"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["action"].as_str().unwrap())
        .collect();
    assert_eq!(actions, vec!["objective_checkin", "quest_completed"]);

    let app = common::build_test_app(pool.clone());
    let response = get(app, &format!("/api/v1/profiles/{player_id}/achievements"), &player).await;
    let json = expect_status(response, StatusCode::OK).await;
    assert_eq!(json["data"]["points"], 35);

    let app = common::build_test_app(pool);
    let response = get(
        app,
        &format!("/api/v1/profiles/{player_id}/attempts?completed=true"),
        &player,
    )
    .await;
    let json = expect_status(response, StatusCode::OK).await;
    assert_eq!(json["data"][0]["id"], attempt_id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_profile_progress_is_readable_by_others(pool: PgPool) {
    let (_, owner) = profile_with_token(&pool, "owner", false).await;
    let (player_id, player) = profile_with_token(&pool, "player", false).await;
    let (_, visitor) = profile_with_token(&pool, "visitor", false).await;
    let quest_id = create_quest(&pool, &owner, &[]).await;
    let attempt_id = start_attempt(&pool, &player, quest_id).await;

    let app = common::build_test_app(pool.clone());
    let response = get(app, &format!("/api/v1/profiles/{player_id}/achievements"), &visitor).await;
    let json = expect_status(response, StatusCode::OK).await;
    assert_eq!(json["data"]["profile_id"], player_id);
    assert_eq!(json["data"]["points"], 0);

    let app = common::build_test_app(pool);
    let response = get(
        app,
        &format!("/api/v1/profiles/{player_id}/attempts?completed=true"),
        &visitor,
    )
    .await;
    let json = expect_status(response, StatusCode::OK).await;
    assert_eq!(json["data"][0]["id"], attempt_id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_owner_cannot_attempt_own_quest(pool: PgPool) {
    let (_, owner) = profile_with_token(&pool, "owner", false).await;
    let quest_id = create_quest(&pool, &owner, &[]).await;

    let app = common::build_test_app(pool);
    let response = post(app, &format!("/api/v1/quests/{quest_id}/attempts"), &owner).await;

    let json = expect_status(response, StatusCode::FORBIDDEN).await;
    assert_eq!(json["error"], questline_core::error::START_OWN_QUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_second_attempt_is_409(pool: PgPool) {
    let (_, owner) = profile_with_token(&pool, "owner", false).await;
    let (_, player) = profile_with_token(&pool, "player", false).await;
    let quest_id = create_quest(&pool, &owner, &[]).await;
    start_attempt(&pool, &player, quest_id).await;

    let app = common::build_test_app(pool);
    let response = post(app, &format!("/api/v1/quests/{quest_id}/attempts"), &player).await;

    let json = expect_status(response, StatusCode::CONFLICT).await;
    assert_eq!(json["retryable"], true);
}

// ---------------------------------------------------------------------------
// Rewards
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reward_grant_requires_admin(pool: PgPool) {
    let (player_id, player) = profile_with_token(&pool, "player", false).await;
    let (_, admin) = profile_with_token(&pool, "admin", true).await;
    let uri = format!("/api/v1/profiles/{player_id}/rewards");
    let body = json!({ "action": "trip_created", "subject": { "kind": "trip", "id": 5 } });

    let app = common::build_test_app(pool.clone());
    let denied = post_json(app, &uri, &player, body.clone()).await;
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool.clone());
    let granted = post_json(app, &uri, &admin, body).await;
    let json = expect_status(granted, StatusCode::OK).await;
    assert_eq!(json["data"]["points_awarded"][0]["points"], 10);
    assert_eq!(json["data"]["badges_achieved"][0]["badge"], "planner");

    let app = common::build_test_app(pool);
    let missing = post_json(
        app,
        "/api/v1/profiles/999999/rewards",
        &admin,
        json!({ "action": "trip_created" }),
    )
    .await;
    let json = body_json(missing).await;
    assert_eq!(json["code"], "NOT_FOUND");
}
