//! Integration tests for the request filtering pipeline.

use reqwest::header;
use serde_json::Value;

use gymgate::security::rate_limit::GLOBAL_LIMIT_MESSAGE;
use gymgate::GateConfig;

mod common;

#[tokio::test]
async fn forbidden_patterns_rejected() {
    let (addr, handler_calls, shutdown) = common::spawn_gate(GateConfig::default()).await;
    let client = reqwest::Client::new();

    for query in ["path=../../etc/passwd", "cb=eval(document.cookie)", "u=javascript:alert(1)"] {
        let res = client
            .get(format!("http://{addr}/api/members?{query}"))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 403, "expected 403 for {query}");

        let body: Value = res.json().await.unwrap();
        assert_eq!(body["error"], "forbidden pattern");
    }

    // Nothing reached the business handlers.
    assert_eq!(handler_calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    shutdown.trigger();
}

#[tokio::test]
async fn scanner_agent_rejected() {
    let (addr, _, shutdown) = common::spawn_gate(GateConfig::default()).await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("http://{addr}/api/members"))
        .header(header::USER_AGENT, "sqlmap/1.5.2#stable")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 403);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "forbidden agent");
    shutdown.trigger();
}

#[tokio::test]
async fn unlisted_method_rejected() {
    let (addr, _, shutdown) = common::spawn_gate(GateConfig::default()).await;
    let client = reqwest::Client::new();

    let res = client
        .patch(format!("http://{addr}/api/members"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 405);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "method not allowed");
    shutdown.trigger();
}

#[tokio::test]
async fn body_size_boundary() {
    let (addr, _, shutdown) = common::spawn_gate(GateConfig::default()).await;
    let client = reqwest::Client::new();

    // `{"pad":"<a…a>"}` sized to exactly 1 MiB.
    let at_limit = format!("{{\"pad\":\"{}\"}}", "a".repeat(1_048_566));
    assert_eq!(at_limit.len(), 1_048_576);

    let res = client
        .post(format!("http://{addr}/api/members"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(at_limit.clone())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let over_limit = format!("{{\"pad\":\"{}\"}}", "a".repeat(1_048_567));
    assert_eq!(over_limit.len(), 1_048_577);

    let res = client
        .post(format!("http://{addr}/api/members"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(over_limit)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 413);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "entity too large");
    shutdown.trigger();
}

#[tokio::test]
async fn post_requires_json_media_type() {
    let (addr, _, shutdown) = common::spawn_gate(GateConfig::default()).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("http://{addr}/api/members"))
        .header(header::CONTENT_TYPE, "text/plain")
        .body("{}")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 415);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "unsupported media type");
    shutdown.trigger();
}

#[tokio::test]
async fn per_key_limit_enforced() {
    let mut config = GateConfig::default();
    config.rate_limit.per_key_max_requests = 3;

    let (addr, _, shutdown) = common::spawn_gate(config).await;
    let client = reqwest::Client::new();

    for _ in 0..3 {
        let res = client
            .get(format!("http://{addr}/plain"))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 200);
    }

    let res = client
        .get(format!("http://{addr}/plain"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 429);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "too many requests");

    // A different path is a different key and still passes.
    let res = client
        .get(format!("http://{addr}/api/invoices"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    shutdown.trigger();
}

#[tokio::test]
async fn global_limit_returns_fixed_message() {
    let mut config = GateConfig::default();
    config.rate_limit.global_max_requests = 3;

    let (addr, _, shutdown) = common::spawn_gate(config).await;
    let client = reqwest::Client::new();

    // Distinct paths keep the per-key counters low; only the global
    // per-source counter accumulates.
    for i in 0..3 {
        let res = client
            .get(format!("http://{addr}/plain?i={i}"))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 200);
    }

    let res = client
        .get(format!("http://{addr}/plain?i=last"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 429);
    assert_eq!(res.text().await.unwrap(), GLOBAL_LIMIT_MESSAGE);
    shutdown.trigger();
}

#[tokio::test]
async fn responses_carry_security_headers() {
    let (addr, _, shutdown) = common::spawn_gate(GateConfig::default()).await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("http://{addr}/api/members"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let headers = res.headers();
    assert_eq!(headers["x-frame-options"], "SAMEORIGIN");
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(
        headers["strict-transport-security"],
        "max-age=31536000; includeSubDomains"
    );
    assert!(headers.contains_key("content-security-policy"));
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["access-control-allow-credentials"], "true");
    assert!(headers.contains_key("x-request-id"));
    shutdown.trigger();
}
