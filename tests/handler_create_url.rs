mod common;

use axum::body::Bytes;
use axum::http::StatusCode;
use serde_json::json;
use slug_shortener::application::services::ThrottlePolicy;
use slug_shortener::config::Environment;
use std::time::{Duration, Instant};

#[tokio::test]
async fn test_create_with_generated_slug() {
    let server = common::create_test_server();

    let response = server
        .post("/url")
        .json(&json!({ "url": "https://example.com" }))
        .await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    let slug = json["slug"].as_str().unwrap();
    assert_eq!(slug.len(), 5);
    assert_eq!(slug, slug.to_lowercase());
    assert_eq!(json["url"], "https://example.com");
    assert!(json["createdAt"].is_string());
}

#[tokio::test]
async fn test_create_then_redirect() {
    let server = common::create_test_server();

    let created = server
        .post("/url")
        .json(&json!({ "url": "https://example.com" }))
        .await;
    created.assert_status_ok();
    let slug = created.json::<serde_json::Value>()["slug"]
        .as_str()
        .unwrap()
        .to_string();

    let response = server.get(&format!("/{slug}")).await;

    assert_eq!(response.status_code(), StatusCode::FOUND);
    assert_eq!(response.header("location"), "https://example.com");
}

#[tokio::test]
async fn test_create_with_explicit_slug() {
    let server = common::create_test_server();

    let response = server
        .post("/url")
        .json(&json!({ "slug": "docs", "url": "https://docs.rs" }))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<serde_json::Value>()["slug"], "docs");
}

#[tokio::test]
async fn test_create_trims_url() {
    let server = common::create_test_server();

    let response = server
        .post("/url")
        .json(&json!({ "slug": "trim", "url": "  https://example.com/a  " }))
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.json::<serde_json::Value>()["url"],
        "https://example.com/a"
    );
}

#[tokio::test]
async fn test_create_invalid_url() {
    let server = common::create_test_server();

    let response = server
        .post("/url")
        .json(&json!({ "slug": "abc", "url": "not-a-url" }))
        .await;

    response.assert_status_bad_request();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["code"], "validation_error");
    assert_eq!(json["field"], "url");
}

#[tokio::test]
async fn test_create_missing_url() {
    let server = common::create_test_server();

    let response = server.post("/url").json(&json!({ "slug": "abc" })).await;

    response.assert_status_bad_request();
    assert_eq!(response.json::<serde_json::Value>()["field"], "url");
}

#[tokio::test]
async fn test_create_invalid_slug() {
    let server = common::create_test_server();

    let response = server
        .post("/url")
        .json(&json!({ "slug": "not valid!", "url": "https://example.com" }))
        .await;

    response.assert_status_bad_request();
    assert_eq!(response.json::<serde_json::Value>()["field"], "slug");
}

#[tokio::test]
async fn test_create_reserved_slug() {
    let server = common::create_test_server();

    let response = server
        .post("/url")
        .json(&json!({ "slug": "Health", "url": "https://example.com" }))
        .await;

    response.assert_status_bad_request();
    assert_eq!(response.json::<serde_json::Value>()["field"], "slug");
}

#[tokio::test]
async fn test_create_malformed_body() {
    let server = common::create_test_server();

    let response = server
        .post("/url")
        .bytes(Bytes::from_static(b"{ not json"))
        .content_type("application/json")
        .await;

    response.assert_status_bad_request();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["code"], "validation_error");
    assert_eq!(json["field"], "body");
}

#[tokio::test]
async fn test_create_same_slug_twice() {
    let server = common::create_test_server();
    let body = json!({ "slug": "taken", "url": "https://example.com" });

    server.post("/url").json(&body).await.assert_status_ok();

    let response = server.post("/url").json(&body).await;

    response.assert_status_bad_request();
    assert_eq!(
        response.json::<serde_json::Value>()["code"],
        "slug_in_use"
    );
}

#[tokio::test]
async fn test_slug_is_case_insensitive() {
    let server = common::create_test_server();

    let response = server
        .post("/url")
        .json(&json!({ "slug": "AbC", "url": "https://example.com/case" }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<serde_json::Value>()["slug"], "abc");

    for path in ["/AbC", "/abc", "/ABC"] {
        let response = server.get(path).await;
        assert_eq!(response.status_code(), StatusCode::FOUND, "{path}");
        assert_eq!(response.header("location"), "https://example.com/case");
    }

    let conflict = server
        .post("/url")
        .json(&json!({ "slug": "abc", "url": "https://example.com/other" }))
        .await;
    conflict.assert_status_bad_request();
}

#[tokio::test]
async fn test_concurrent_same_slug_one_winner() {
    let server = common::create_test_server();
    let body = json!({ "slug": "race", "url": "https://example.com" });

    let (a, b, c, d) = tokio::join!(
        async { server.post("/url").json(&body).await },
        async { server.post("/url").json(&body).await },
        async { server.post("/url").json(&body).await },
        async { server.post("/url").json(&body).await },
    );

    let statuses = [a, b, c, d].map(|r| r.status_code());
    let ok = statuses.iter().filter(|s| **s == StatusCode::OK).count();
    let rejected = statuses
        .iter()
        .filter(|s| **s == StatusCode::BAD_REQUEST)
        .count();

    assert_eq!(ok, 1);
    assert_eq!(rejected, 3);
}

#[tokio::test]
async fn test_throttle_rejects_second_creation() {
    let state = common::create_test_state(ThrottlePolicy::default(), Environment::Development);
    let server = common::server_for(state);

    server
        .post("/url")
        .json(&json!({ "url": "https://example.com/1" }))
        .await
        .assert_status_ok();

    let response = server
        .post("/url")
        .json(&json!({ "url": "https://example.com/2" }))
        .await;

    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        response.json::<serde_json::Value>()["code"],
        "rate_limited"
    );

    let retry_after: u64 = response
        .header("retry-after")
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!((1..=30).contains(&retry_after));
}

#[tokio::test]
async fn test_throttle_delays_before_cap() {
    let policy = ThrottlePolicy {
        window: Duration::from_secs(30),
        delay_after: 1,
        delay_step: Duration::from_millis(50),
        max_requests: 3,
    };
    let server = common::server_for(common::create_test_state(policy, Environment::Development));

    server
        .post("/url")
        .json(&json!({ "url": "https://example.com/1" }))
        .await
        .assert_status_ok();

    let started = Instant::now();
    server
        .post("/url")
        .json(&json!({ "url": "https://example.com/2" }))
        .await
        .assert_status_ok();
    assert!(started.elapsed() >= Duration::from_millis(50));

    server
        .post("/url")
        .json(&json!({ "url": "https://example.com/3" }))
        .await
        .assert_status_ok();

    server
        .post("/url")
        .json(&json!({ "url": "https://example.com/4" }))
        .await
        .assert_status(StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_create_rejects_control_characters_in_url() {
    let server = common::create_test_server();

    for (slug, url) in [
        ("bel", "https://example.com/a\u{7}b"),
        ("nl", "https://exa\nmple.com/"),
        ("nul", "https://example.com/a\u{0}b"),
    ] {
        let response = server
            .post("/url")
            .json(&json!({ "slug": slug, "url": url }))
            .await;

        response.assert_status_bad_request();
        let json = response.json::<serde_json::Value>();
        assert_eq!(json["code"], "validation_error");
        assert_eq!(json["field"], "url");

        server.get(&format!("/{slug}")).await.assert_status_not_found();
    }
}

#[tokio::test]
async fn test_malformed_body_counts_against_throttle() {
    let state = common::create_test_state(ThrottlePolicy::default(), Environment::Development);
    let server = common::server_for(state);

    server
        .post("/url")
        .bytes(Bytes::from_static(b"{ nope"))
        .content_type("application/json")
        .await
        .assert_status_bad_request();

    let response = server
        .post("/url")
        .json(&json!({ "url": "https://example.com" }))
        .await;

    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
}
