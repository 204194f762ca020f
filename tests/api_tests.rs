mod common;

use reqwest::StatusCode;
use serde_json::{json, Value};

use common::spawn_backend;

async fn refresh(client: &reqwest::Client, base: &str, user: &str, kind: &str) -> Vec<Value> {
    client
        .get(format!("{}/api/users/{}/recommendations", base, user))
        .query(&[("type", kind), ("force_refresh", "true")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let base = spawn_backend().await;
    let response = reqwest::get(format!("{}/health", base)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_list_is_empty_until_refreshed() {
    let base = spawn_backend().await;
    let client = reqwest::Client::new();

    let listed: Vec<Value> = client
        .get(format!("{}/api/users/u1/recommendations", base))
        .query(&[("type", "film"), ("force_refresh", "false")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(listed.is_empty());

    let refreshed = refresh(&client, &base, "u1", "film").await;
    assert_eq!(refreshed.len(), 2);
    assert_eq!(refreshed[0]["type"], "film");
    assert_eq!(refreshed[0]["user_id"], "u1");
    assert_eq!(refreshed[0]["items"].as_array().unwrap().len(), 3);

    let listed: Vec<Value> = client
        .get(format!("{}/api/users/u1/recommendations", base))
        .query(&[("type", "film")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed, refreshed);
}

#[tokio::test]
async fn test_unknown_recommendation_returns_error_body() {
    let base = spawn_backend().await;
    let response = reqwest::get(format!("{}/api/recommendations/rec_999", base))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Recommendation rec_999 not found");
}

#[tokio::test]
async fn test_feedback_updates_taste_profile() {
    let base = spawn_backend().await;
    let client = reqwest::Client::new();
    let sets = refresh(&client, &base, "u1", "music").await;
    let rec_id = sets[0]["id"].as_str().unwrap();
    let item_id = sets[0]["items"][0]["id"].as_str().unwrap();

    let response = client
        .post(format!("{}/api/users/u1/recommendations/{}/feedback", base, rec_id))
        .json(&json!({ "feedback_type": "like", "item_id": item_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let saved: Value = response.json().await.unwrap();
    assert_eq!(saved["feedback_type"], "like");
    assert!(saved["id"].as_str().unwrap().starts_with("feedback_"));

    let weights: Vec<Value> = client
        .get(format!("{}/api/users/u1/metadata/weights", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let artist = weights
        .iter()
        .find(|w| w["type"] == "artist")
        .expect("liked artist should be tracked");
    assert!((artist["weight"].as_f64().unwrap() - 0.6).abs() < 1e-9);

    let by_user: Vec<Value> = client
        .get(format!("{}/api/users/u1/feedback", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let by_rec: Vec<Value> = client
        .get(format!("{}/api/recommendations/{}/feedback", base, rec_id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(by_user.len(), 1);
    assert_eq!(by_user, by_rec);
}

#[tokio::test]
async fn test_feedback_validation() {
    let base = spawn_backend().await;
    let client = reqwest::Client::new();
    let sets = refresh(&client, &base, "owner", "film").await;
    let rec_id = sets[0]["id"].as_str().unwrap();
    let url = format!("{}/api/users/{{}}/recommendations/{}/feedback", base, rec_id);

    let foreign = client
        .post(url.replace("{}", "intruder"))
        .json(&json!({ "feedback_type": "like", "item_id": "film_heat" }))
        .send()
        .await
        .unwrap();
    assert_eq!(foreign.status(), StatusCode::FORBIDDEN);

    let missing_item = client
        .post(url.replace("{}", "owner"))
        .json(&json!({ "feedback_type": "dislike", "item_id": "album_mezzanine" }))
        .send()
        .await
        .unwrap();
    assert_eq!(missing_item.status(), StatusCode::BAD_REQUEST);

    let no_item = client
        .post(url.replace("{}", "owner"))
        .json(&json!({ "feedback_type": "dislike" }))
        .send()
        .await
        .unwrap();
    assert_eq!(no_item.status(), StatusCode::BAD_REQUEST);
    let body: Value = no_item.json().await.unwrap();
    assert_eq!(body["error"], "item_id is required");
}

#[tokio::test]
async fn test_weights_update_is_all_or_nothing() {
    let base = spawn_backend().await;
    let client = reqwest::Client::new();
    let url = format!("{}/api/users/u1/metadata/weights", base);

    let rejected = client
        .put(&url)
        .json(&json!({ "weights": [
            { "type": "film_genre", "name": "crime", "weight": 0.8 },
            { "type": "director", "name": "Michael Mann", "weight": 1.4 }
        ]}))
        .send()
        .await
        .unwrap();
    assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);

    let weights: Vec<Value> = client.get(&url).send().await.unwrap().json().await.unwrap();
    assert!(weights.is_empty());

    let accepted = client
        .put(&url)
        .json(&json!({ "weights": [
            { "type": "film_genre", "name": "crime", "weight": 0.8 }
        ]}))
        .send()
        .await
        .unwrap();
    assert_eq!(accepted.status(), StatusCode::NO_CONTENT);

    let weights: Vec<Value> = client.get(&url).send().await.unwrap().json().await.unwrap();
    assert_eq!(weights, vec![json!({ "type": "film_genre", "name": "crime", "weight": 0.8 })]);
}

#[tokio::test]
async fn test_reason_and_insight_follow_feedback() {
    let base = spawn_backend().await;
    let client = reqwest::Client::new();
    let sets = refresh(&client, &base, "u1", "film").await;
    let rec_id = sets[0]["id"].as_str().unwrap();

    let reason: Value = client
        .get(format!("{}/api/users/u1/recommendations/{}/reason", base, rec_id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(reason["primary_reason"], "Exploring new film for you");

    client
        .post(format!("{}/api/users/u1/recommendations/{}/feedback", base, rec_id))
        .json(&json!({ "feedback_type": "like", "item_id": "film_heat" }))
        .send()
        .await
        .unwrap();

    let reason: Value = client
        .get(format!("{}/api/users/u1/recommendations/{}/reason", base, rec_id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(reason["primary_reason"]
        .as_str()
        .unwrap()
        .starts_with("Because you liked"));
    assert_eq!(reason["related_items"], json!(["Heat"]));

    let insight: Value = client
        .get(format!("{}/api/users/u1/recommendations/{}/metadata", base, rec_id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(insight["recommendation_id"], rec_id);
    assert!(!insight["unique_factors"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_request_id_is_echoed_or_generated() {
    let base = spawn_backend().await;
    let client = reqwest::Client::new();

    let echoed = client
        .get(format!("{}/health", base))
        .header("x-request-id", "trace-42")
        .send()
        .await
        .unwrap();
    assert_eq!(echoed.headers()["x-request-id"], "trace-42");

    let generated = client.get(format!("{}/health", base)).send().await.unwrap();
    let id = generated.headers()["x-request-id"].to_str().unwrap();
    assert_eq!(id.len(), 32);
}
