//! Cloudflare Provider 集成测试（wiremock）

mod common;

use common::{client, domain_config};
use dns_gateway_provider::{
    ErrorKind, NativeMutation, ProviderError, RecordMutation, RecordQuery, RecordType,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn ok(result: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "success": true, "errors": [], "messages": [], "result": result
    }))
}

fn fail(status: u16, code: i64, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({
        "success": false, "errors": [{ "code": code, "message": message }], "result": null
    }))
}

#[tokio::test]
async fn test_token_verification_stops_after_first_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/tokens/verify"))
        .and(header("Authorization", "Bearer tok"))
        .respond_with(ok(json!({ "id": "t1", "status": "active" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ok(json!({ "id": "u1" })))
        .expect(0)
        .mount(&server)
        .await;

    let cfg = domain_config("cloudflare", "tok", "", "z1", Some(server.uri()));
    let report = client(&cfg).verify_credentials().await.unwrap();

    assert!(report.is_valid());
    assert_eq!(report.attempts.len(), 1);
    assert_eq!(report.attempts[0].strategy, "scoped_token");
}

#[tokio::test]
async fn test_global_key_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/tokens/verify"))
        .respond_with(fail(401, 1000, "Invalid API Token"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .and(header("X-Auth-Email", "ops@example.com"))
        .and(header("X-Auth-Key", "global-key"))
        .respond_with(ok(json!({ "id": "u1", "email": "ops@example.com" })))
        .mount(&server)
        .await;

    let cfg = domain_config(
        "cloudflare",
        "global-key",
        "ops@example.com",
        "z1",
        Some(server.uri()),
    );
    let report = client(&cfg).verify_credentials().await.unwrap();

    assert!(report.is_valid());
    assert_eq!(report.attempts.len(), 2);
    assert!(!report.attempts[0].success);
    assert!(report.attempts[1].success);
    assert_eq!(report.attempts[1].strategy, "global_api_key");
}

#[tokio::test]
async fn test_all_strategies_fail_is_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/tokens/verify"))
        .respond_with(fail(401, 1000, "Invalid API Token"))
        .mount(&server)
        .await;

    let cfg = domain_config("cloudflare", "bad", "", "z1", Some(server.uri()));
    let report = client(&cfg).verify_credentials().await.unwrap();

    assert!(!report.is_valid());
    assert_eq!(report.attempts.len(), 2);
}

#[tokio::test]
async fn test_list_records_passes_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/zones/z1/dns_records"))
        .and(query_param("page", "2"))
        .and(query_param("per_page", "20"))
        .and(query_param("name.contains", "www"))
        .and(query_param("type", "MX"))
        .respond_with(ok(json!([{
            "id": "r1", "type": "MX", "name": "www.example.com",
            "content": "mail.example.com", "ttl": 300, "priority": 10,
            "proxied": false, "comment": "mail"
        }])))
        .mount(&server)
        .await;

    let cfg = domain_config("cloudflare", "tok", "", "z1", Some(server.uri()));
    let query = RecordQuery {
        page: 2,
        page_size: 20,
        keyword: Some("www".into()),
        record_type: Some(RecordType::Mx),
    };
    let records = client(&cfg).list_records("z1", &query).await.unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, "r1");
    assert_eq!(records[0].mx, Some(10));
    assert_eq!(records[0].remark.as_deref(), Some("mail"));
}

#[tokio::test]
async fn test_create_returns_structured_record() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/zones/z1/dns_records"))
        .and(body_partial_json(json!({
            "type": "A", "name": "www", "content": "1.2.3.4", "proxied": true
        })))
        .respond_with(ok(json!({
            "id": "new-id", "type": "A", "name": "www.example.com",
            "content": "1.2.3.4", "ttl": 1, "proxied": true
        })))
        .mount(&server)
        .await;

    let cfg = domain_config("cloudflare", "tok", "", "z1", Some(server.uri()));
    let mut m = RecordMutation::new(RecordType::A, "www", "1.2.3.4");
    m.proxied = Some(true);
    let created = client(&cfg).create_record("z1", &m).await.unwrap();

    let NativeMutation::Record(record) = created else {
        panic!("expected structured record");
    };
    assert_eq!(record.id, "new-id");
    assert_eq!(record.proxied, Some(true));
}

#[tokio::test]
async fn test_protected_record_on_update() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/zones/z1/dns_records/r9"))
        .respond_with(fail(
            400,
            1004,
            "This record is in use as a fallback origin for Cloudflare for SaaS",
        ))
        .mount(&server)
        .await;

    let cfg = domain_config("cloudflare", "tok", "", "z1", Some(server.uri()));
    let m = RecordMutation::new(RecordType::Cname, "fallback", "origin.example.net");
    let err = client(&cfg).update_record("z1", "r9", &m).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ProtectedRecordConflict);
    let ProviderError::ProtectedRecord { guidance, raw_message, .. } = err else {
        panic!("expected ProtectedRecord");
    };
    assert!(guidance.contains("fallback origin"));
    assert!(raw_message.unwrap().contains("fallback origin"));
}

#[tokio::test]
async fn test_protected_record_hint_in_later_error() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/zones/z1/dns_records/r9"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "success": false,
            "errors": [
                { "code": 1004, "message": "DNS Validation Error" },
                { "code": 1004, "message": "Record is the target of a fallback origin" }
            ],
            "result": null
        })))
        .mount(&server)
        .await;

    let cfg = domain_config("cloudflare", "tok", "", "z1", Some(server.uri()));
    let m = RecordMutation::new(RecordType::Cname, "fallback", "origin.example.net");
    let err = client(&cfg).update_record("z1", "r9", &m).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ProtectedRecordConflict);
    let ProviderError::ProtectedRecord { raw_message, .. } = err else {
        panic!("expected ProtectedRecord");
    };
    let raw_message = raw_message.unwrap();
    assert!(raw_message.contains("DNS Validation Error"));
    assert!(raw_message.contains("fallback origin"));
}

#[tokio::test]
async fn test_delete_missing_record() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/zones/z1/dns_records/gone"))
        .respond_with(fail(404, 81044, "Record does not exist."))
        .mount(&server)
        .await;

    let cfg = domain_config("cloudflare", "tok", "", "z1", Some(server.uri()));
    let err = client(&cfg).delete_record("z1", "gone").await.unwrap_err();

    assert!(matches!(err, ProviderError::RecordNotFound { ref record_id, .. } if record_id == "gone"));
    assert_eq!(err.kind(), ErrorKind::UpstreamRejection);
}

#[tokio::test]
async fn test_rate_limited_is_transport() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/zones/z1/dns_records"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "30"))
        .expect(1)
        .mount(&server)
        .await;

    let cfg = domain_config("cloudflare", "tok", "", "z1", Some(server.uri()));
    let err = client(&cfg)
        .list_records("z1", &RecordQuery::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::RateLimited { .. }));
    assert_eq!(err.kind(), ErrorKind::Transport);
}
