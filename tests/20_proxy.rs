mod common;

use std::time::Duration;

use anyhow::Result;
use reqwest::StatusCode;
use wiremock::matchers::{body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{TestConfig, TestServer, LEGACY_TOKEN};

const VIA: &str = "HTTP/1.1 new-api";

async fn server_for(upstream: &MockServer) -> Result<TestServer> {
    TestServer::spawn(TestConfig::new(format!("{}/api/", upstream.uri()))).await
}

#[tokio::test]
async fn unmatched_route_is_relayed_verbatim() -> Result<()> {
    let upstream = MockServer::start().await;
    let host = upstream.address().to_string();
    Mock::given(method("GET"))
        .and(path("/api/bot/users"))
        .and(query_param("x", "1"))
        .and(header("authorization", format!("Token {}", LEGACY_TOKEN).as_str()))
        .and(header("host", host.as_str()))
        .and(header("via", VIA))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-foo", "bar")
                .set_body_string("ok"),
        )
        .expect(1)
        .mount(&upstream)
        .await;

    let server = server_for(&upstream).await?;
    let res = server.get("/api/bot/users?x=1").send().await?;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["x-foo"], "bar");
    assert_eq!(res.headers()["via"], VIA);
    assert_eq!(res.text().await?, "ok");
    Ok(())
}

#[tokio::test]
async fn upstream_errors_are_passed_through() -> Result<()> {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/bot/nominations/42"))
        .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"detail":"Not found."}"#))
        .mount(&upstream)
        .await;

    let server = server_for(&upstream).await?;
    let res = server.get("/api/bot/nominations/42").send().await?;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.headers()["via"], VIA);
    assert_eq!(res.text().await?, r#"{"detail":"Not found."}"#);
    Ok(())
}

#[tokio::test]
async fn body_cookies_and_custom_headers_are_forwarded() -> Result<()> {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/bot/infractions"))
        .and(header("cookie", "session=abc"))
        .and(header("x-client", "bot"))
        .and(body_string(r#"{"type":"ban"}"#))
        .respond_with(ResponseTemplate::new(201).set_body_string("created"))
        .expect(1)
        .mount(&upstream)
        .await;

    let server = server_for(&upstream).await?;
    let res = server
        .post("/api/bot/infractions")
        .header("cookie", "session=abc")
        .header("x-client", "bot")
        .header("content-type", "application/json")
        .body(r#"{"type":"ban"}"#)
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(res.text().await?, "created");
    Ok(())
}

#[tokio::test]
async fn multi_valued_response_headers_survive() -> Result<()> {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/bot/settings"))
        .respond_with(
            ResponseTemplate::new(200)
                .append_header("set-cookie", "a=1")
                .append_header("set-cookie", "b=2"),
        )
        .mount(&upstream)
        .await;

    let server = server_for(&upstream).await?;
    let res = server.get("/api/bot/settings").send().await?;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers().get_all("set-cookie").iter().count(), 2);
    Ok(())
}

#[tokio::test]
async fn redirects_are_relayed_not_followed() -> Result<()> {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/bot/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/api/bot/new"))
        .mount(&upstream)
        .await;

    let server = server_for(&upstream).await?;
    let res = server.get("/api/bot/old").send().await?;

    assert_eq!(res.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(res.headers()["location"], "/api/bot/new");
    Ok(())
}

#[tokio::test]
async fn unhandled_method_on_a_local_route_is_proxied() -> Result<()> {
    let upstream = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/bot/reminders/5"))
        .respond_with(ResponseTemplate::new(200).set_body_string("legacy"))
        .expect(1)
        .mount(&upstream)
        .await;

    let server = server_for(&upstream).await?;
    let res = server
        .authed(reqwest::Method::PUT, "/api/bot/reminders/5")
        .body("{}")
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["via"], VIA);
    assert_eq!(res.text().await?, "legacy");
    Ok(())
}

#[tokio::test]
async fn local_routes_are_not_proxied() -> Result<()> {
    let upstream = MockServer::start().await;
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&upstream)
        .await;

    let server = server_for(&upstream).await?;
    let res = server.get("/api/bot/reminders").send().await?;

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().get("via").is_none());
    Ok(())
}

#[tokio::test]
async fn unreachable_upstream_is_a_bad_gateway() -> Result<()> {
    let server = TestServer::spawn(TestConfig::new(common::dead_upstream()?)).await?;
    let res = server.get("/api/bot/users").send().await?;

    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(res.headers()["via"], VIA);
    assert_eq!(res.text().await?, "Failed proxying request to the old API");
    Ok(())
}

#[tokio::test]
async fn slow_upstream_times_out_as_bad_gateway() -> Result<()> {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&upstream)
        .await;

    let config = TestConfig::new(format!("{}/api/", upstream.uri())).set("UPSTREAM_TIMEOUT_SECS", "1");
    let server = TestServer::spawn(config).await?;
    let res = server.get("/api/bot/users").send().await?;

    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(res.text().await?, "Failed proxying request to the old API");
    Ok(())
}

#[tokio::test]
async fn paths_outside_the_api_namespace_are_not_proxied() -> Result<()> {
    let upstream = MockServer::start().await;
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&upstream)
        .await;

    let server = server_for(&upstream).await?;
    let res = server.get("/nothing/here").send().await?;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.json::<serde_json::Value>().await?, serde_json::json!({"error": "Not Found"}));
    Ok(())
}

#[tokio::test]
async fn oversized_body_is_rejected_without_contacting_upstream() -> Result<()> {
    let upstream = MockServer::start().await;
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&upstream)
        .await;

    let config = TestConfig::new(format!("{}/api/", upstream.uri())).set("API_MAX_REQUEST_SIZE_BYTES", "16");
    let server = TestServer::spawn(config).await?;
    let res = server.post("/api/bot/infractions").body("x".repeat(64)).send().await?;

    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(res.headers()["via"], VIA);
    assert_eq!(
        res.json::<serde_json::Value>().await?,
        serde_json::json!({"error": "Request body is too large."})
    );
    Ok(())
}

#[tokio::test]
async fn head_responses_keep_the_upstream_content_length() -> Result<()> {
    let upstream = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/api/bot/users"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-length", "42")
                .set_body_string("x".repeat(42)),
        )
        .expect(1)
        .mount(&upstream)
        .await;

    let server = server_for(&upstream).await?;
    let res = server.authed(reqwest::Method::HEAD, "/api/bot/users").send().await?;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["content-length"], "42");
    assert_eq!(res.headers()["via"], VIA);
    Ok(())
}
