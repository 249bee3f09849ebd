mod common;

use axum_test::TestServer;
use common::{PROD_ORIGIN, PanickingCache, RecordingCache, StubSource};
use covid_report_worker::config::Environment;
use covid_report_worker::domain::{Partition, Province};
use covid_report_worker::routes::report_router;
use std::sync::Arc;

fn server_with(cache: Arc<RecordingCache>, environment: Environment) -> TestServer {
    let state = common::create_test_state(cache, Arc::new(StubSource::ok()), environment);
    TestServer::new(report_router(state)).unwrap()
}

#[tokio::test]
async fn test_root_serves_national_snapshot_verbatim() {
    let cache = Arc::new(RecordingCache::with_entries(&[(
        "canada_report",
        "{\"x\":1}",
    )]));
    let server = server_with(cache.clone(), Environment::Production);

    let response = server.get("/").await;

    response.assert_status_ok();
    assert_eq!(response.text(), "{\"x\":1}");
    assert_eq!(response.header("content-type"), "application/json");
    assert_eq!(cache.reads(), vec!["canada_report".to_string()]);
}

#[tokio::test]
async fn test_unrelated_path_serves_national_snapshot() {
    let cache = Arc::new(RecordingCache::with_entries(&[("canada_report", "[]")]));
    let server = server_with(cache.clone(), Environment::Production);

    let response = server.get("/reports/latest").await;

    response.assert_status_ok();
    assert_eq!(response.text(), "[]");
    assert_eq!(cache.reads(), vec!["canada_report".to_string()]);
}

#[tokio::test]
async fn test_each_province_reads_its_own_key() {
    let cache = Arc::new(RecordingCache::default());
    let server = server_with(cache.clone(), Environment::Production);

    for province in Province::ALL {
        server
            .get("/")
            .add_query_param("province", province.code())
            .await
            .assert_status_ok();
    }

    let expected: Vec<String> = Province::ALL
        .iter()
        .map(|p| Partition::Province(*p).cache_key())
        .collect();
    assert_eq!(cache.reads(), expected);
}

#[tokio::test]
async fn test_province_code_is_case_insensitive() {
    let cache = Arc::new(RecordingCache::with_entries(&[("on_report", "{\"on\":true}")]));
    let server = server_with(cache.clone(), Environment::Production);

    let response = server.get("/").add_query_param("province", "ON").await;

    response.assert_status_ok();
    assert_eq!(response.text(), "{\"on\":true}");
}

#[tokio::test]
async fn test_unknown_province_is_not_found_without_cache_read() {
    let cache = Arc::new(RecordingCache::with_entries(&[("canada_report", "{}")]));
    let source = Arc::new(StubSource::ok());
    let state = common::create_test_state(cache.clone(), source.clone(), Environment::Production);
    let server = TestServer::new(report_router(state)).unwrap();

    let response = server.get("/").add_query_param("province", "zz").await;

    response.assert_status_not_found();
    assert!(response.text().is_empty());
    assert!(cache.reads().is_empty());
    assert!(source.calls().is_empty());
}

#[tokio::test]
async fn test_repeated_province_uses_first_value() {
    let cache = Arc::new(RecordingCache::with_entries(&[("bc_report", "{\"bc\":1}")]));
    let server = server_with(cache.clone(), Environment::Production);

    let response = server
        .get("/")
        .add_query_param("province", "bc")
        .add_query_param("province", "zz")
        .await;

    response.assert_status_ok();
    assert_eq!(response.text(), "{\"bc\":1}");
    assert_eq!(cache.reads(), vec!["bc_report".to_string()]);
}

#[tokio::test]
async fn test_province_cache_miss_passes_through_empty_body() {
    let cache = Arc::new(RecordingCache::default());
    let server = server_with(cache.clone(), Environment::Production);

    let response = server.get("/").add_query_param("province", "bc").await;

    response.assert_status_ok();
    assert!(response.text().is_empty());
    assert_eq!(cache.reads(), vec!["bc_report".to_string()]);
}

#[tokio::test]
async fn test_summary_path_reads_summary_key() {
    let cache = Arc::new(RecordingCache::with_entries(&[("summary", "{\"s\":2}")]));
    let server = server_with(cache.clone(), Environment::Production);

    let response = server.get("/summary").await;

    response.assert_status_ok();
    assert_eq!(response.text(), "{\"s\":2}");
    assert_eq!(cache.reads(), vec!["summary".to_string()]);
}

#[tokio::test]
async fn test_province_wins_over_summary_path() {
    let cache = Arc::new(RecordingCache::default());
    let server = server_with(cache.clone(), Environment::Production);

    server
        .get("/summary")
        .add_query_param("province", "pe")
        .await
        .assert_status_ok();

    assert_eq!(cache.reads(), vec!["pe_report".to_string()]);
}

#[tokio::test]
async fn test_production_cors_headers() {
    let cache = Arc::new(RecordingCache::default());
    let server = server_with(cache, Environment::Production);

    let response = server
        .get("/")
        .add_header("Origin", "https://evil.example.com")
        .await;

    response.assert_status_ok();
    assert_eq!(response.header("access-control-allow-origin"), PROD_ORIGIN);
    assert_eq!(response.header("vary"), "Origin");
}

#[tokio::test]
async fn test_development_cors_wildcard() {
    let cache = Arc::new(RecordingCache::default());
    let server = server_with(cache, Environment::Development);

    let response = server.get("/summary").await;

    response.assert_status_ok();
    assert_eq!(response.header("access-control-allow-origin"), "*");
    assert_eq!(response.header("vary"), "Origin");
}

#[tokio::test]
async fn test_not_found_still_carries_cors_headers() {
    let cache = Arc::new(RecordingCache::default());
    let server = server_with(cache, Environment::Production);

    let response = server.get("/").add_query_param("province", "xx").await;

    response.assert_status_not_found();
    assert_eq!(response.header("access-control-allow-origin"), PROD_ORIGIN);
    assert_eq!(response.header("vary"), "Origin");
}

#[tokio::test]
async fn test_panic_becomes_plain_text_500() {
    let state = common::create_test_state(
        Arc::new(PanickingCache),
        Arc::new(StubSource::ok()),
        Environment::Production,
    );
    let server = TestServer::new(report_router(state)).unwrap();

    let response = server.get("/").expect_failure().await;

    assert_eq!(response.status_code(), 500);
    assert_eq!(response.header("content-type"), "text/plain;charset=UTF-8");
    assert!(response.text().contains("cache exploded reading canada_report"));
    assert_eq!(response.header("access-control-allow-origin"), PROD_ORIGIN);
}
