//! End-to-end sync passes against a mock feed and a mock events API.

use calsync_core::diff::DiffKind;
use calsync_core::{Credentials, SyncConfig, SyncError, Syncer};
use chrono::{DateTime, TimeZone, Utc};
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 19, 12, 0, 0).unwrap()
}

fn syncer_for(server: &MockServer) -> Syncer {
    let config = SyncConfig {
        feed_url: format!("{}/feed.ics", server.uri()),
        api_url: server.uri(),
        ..SyncConfig::default()
    };
    Syncer::from_config(&config, Credentials::new("bot", "secret"))
}

fn vevent(summary: &str, description: &str, start: &str, end: &str, location: &str) -> String {
    format!(
        "BEGIN:VEVENT\r\n\
UID:{description}@feed\r\n\
SUMMARY:{summary}\r\n\
DTSTART:{start}\r\n\
DTEND:{end}\r\n\
LOCATION:{location}\r\n\
DESCRIPTION:{description}\r\n\
END:VEVENT\r\n"
    )
}

fn feed(vevents: &[String]) -> String {
    format!(
        "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:-//feed//EN\r\n{}END:VCALENDAR\r\n",
        vevents.concat()
    )
}

fn remote_event(id: u64, title: &str, description: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "attributes": {
            "from": "2025-03-20T15:00:00.000Z",
            "to": "2025-03-20T16:00:00.000Z",
            "location": "Hall A",
            "name": { "id": id * 10, "fi": title, "en": title },
            "description": { "id": id * 10 + 1, "fi": description, "en": description },
            "organizer": { "data": { "id": 31 } }
        }
    })
}

async fn mount_backend(server: &MockServer, ics: String, remote: Vec<serde_json::Value>) {
    Mock::given(method("GET"))
        .and(path("/feed.ics"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ics))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/local"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "jwt": "test-jwt",
            "user": { "username": "bot" }
        })))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": remote,
            "meta": { "pagination": { "page": 1, "pageSize": 10, "pageCount": 1, "total": 0 } }
        })))
        .expect(1)
        .mount(server)
        .await;
}

async fn expect_writes(server: &MockServer, creates: u64, updates: u64, deletes: u64) {
    Mock::given(method("POST"))
        .and(path("/api/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": {} })))
        .expect(creates)
        .mount(server)
        .await;

    Mock::given(method("PUT"))
        .and(path_regex(r"^/api/events/\d+$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": {} })))
        .expect(updates)
        .mount(server)
        .await;

    Mock::given(method("DELETE"))
        .and(path_regex(r"^/api/events/\d+$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": {} })))
        .expect(deletes)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_new_feed_event_is_created() {
    let server = MockServer::start().await;
    let ics = feed(&[vevent("Talk", "abc", "20250320T150000Z", "20250320T160000Z", "Hall A")]);
    mount_backend(&server, ics, vec![]).await;
    expect_writes(&server, 1, 0, 0).await;

    let report = syncer_for(&server).run(now()).await.unwrap();

    assert_eq!(report.stats.created, 1);
    assert_eq!(report.stats.total(), 1);

    let created = &report.plan.to_create[0];
    assert_eq!(created.title, "Talk");
    assert_eq!(created.description, "abc");
    assert_eq!(created.location, "Hall A");
    assert_eq!(created.start, Utc.with_ymd_and_hms(2025, 3, 20, 15, 0, 0).unwrap());
    assert_eq!(created.end, Utc.with_ymd_and_hms(2025, 3, 20, 16, 0, 0).unwrap());
}

#[tokio::test]
async fn test_changed_title_is_updated() {
    let server = MockServer::start().await;
    let ics = feed(&[vevent("Talk (moved)", "abc", "20250320T150000Z", "20250320T160000Z", "Hall A")]);
    mount_backend(&server, ics, vec![remote_event(4, "Talk", "abc")]).await;

    Mock::given(method("PUT"))
        .and(path("/api/events/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": {} })))
        .expect(1)
        .mount(&server)
        .await;
    expect_writes(&server, 0, 0, 0).await;

    let report = syncer_for(&server).run(now()).await.unwrap();

    assert_eq!(report.stats.updated, 1);
    assert_eq!(report.plan.to_update[0].target.id, 4);
    assert_eq!(report.plan.to_update[0].event.title, "Talk (moved)");
}

#[tokio::test]
async fn test_event_missing_from_feed_is_deleted() {
    let server = MockServer::start().await;
    let ics = feed(&[vevent("Talk", "abc", "20250320T150000Z", "20250320T160000Z", "Hall A")]);
    mount_backend(
        &server,
        ics,
        vec![remote_event(1, "Talk", "abc"), remote_event(2, "Old", "xyz")],
    )
    .await;

    Mock::given(method("DELETE"))
        .and(path("/api/events/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": {} })))
        .expect(1)
        .mount(&server)
        .await;
    expect_writes(&server, 0, 0, 0).await;

    let report = syncer_for(&server).run(now()).await.unwrap();

    assert_eq!(report.stats.deleted, 1);
    assert_eq!(report.plan.to_delete[0].id, 2);
}

#[tokio::test]
async fn test_unchanged_feed_issues_no_writes() {
    let server = MockServer::start().await;
    let ics = feed(&[vevent("Talk", "abc", "20250320T150000Z", "20250320T160000Z", "Hall A")]);
    mount_backend(&server, ics, vec![remote_event(1, "Talk", "abc")]).await;
    expect_writes(&server, 0, 0, 0).await;

    let report = syncer_for(&server).run(now()).await.unwrap();

    assert!(report.plan.is_empty());
    assert_eq!(report.stats.total(), 0);
}

#[tokio::test]
async fn test_past_feed_events_are_ignored() {
    let server = MockServer::start().await;
    // Starts two days before now(): treated as absent from the feed
    let ics = feed(&[vevent("Last week", "old", "20250317T150000Z", "20250317T160000Z", "Hall A")]);
    mount_backend(&server, ics, vec![remote_event(3, "Last week", "old")]).await;
    expect_writes(&server, 0, 0, 1).await;

    let report = syncer_for(&server).run(now()).await.unwrap();

    assert_eq!(report.plan.count(DiffKind::Delete), 1);
    assert_eq!(report.plan.count(DiffKind::Create), 0);
}

#[tokio::test]
async fn test_plan_does_not_write() {
    let server = MockServer::start().await;
    let ics = feed(&[vevent("Talk", "abc", "20250320T150000Z", "20250320T160000Z", "Hall A")]);
    mount_backend(&server, ics, vec![remote_event(2, "Old", "xyz")]).await;
    expect_writes(&server, 0, 0, 0).await;

    let plan = syncer_for(&server).plan(now()).await.unwrap();

    assert_eq!(plan.count(DiffKind::Create), 1);
    assert_eq!(plan.count(DiffKind::Delete), 1);
}

#[tokio::test]
async fn test_failed_create_aborts_remaining_writes() {
    let server = MockServer::start().await;
    let ics = feed(&[
        vevent("First", "one", "20250320T150000Z", "20250320T160000Z", "Hall A"),
        vevent("Second", "two", "20250321T150000Z", "20250321T160000Z", "Hall A"),
    ]);
    mount_backend(&server, ics, vec![remote_event(2, "Old", "xyz")]).await;

    Mock::given(method("POST"))
        .and(path("/api/events"))
        .respond_with(ResponseTemplate::new(400).set_body_string("ValidationError"))
        .expect(1)
        .mount(&server)
        .await;
    expect_writes(&server, 0, 0, 0).await;

    let err = syncer_for(&server).run(now()).await.unwrap_err();

    match err {
        SyncError::RemoteWrite { action, body, .. } => {
            assert_eq!(action, "create event \"First\"");
            assert_eq!(body, "ValidationError");
        }
        other => panic!("Expected RemoteWrite, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_feed_is_fetch_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/feed.ics"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    expect_writes(&server, 0, 0, 0).await;

    let err = syncer_for(&server).run(now()).await.unwrap_err();

    assert!(matches!(err, SyncError::Fetch(_)));
}

/// Write calls the server saw, in arrival order.
async fn received_writes(server: &MockServer) -> Vec<(String, String)> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path().starts_with("/api/events") && r.method.as_str() != "GET")
        .map(|r| (r.method.to_string(), r.url.path().to_string()))
        .collect()
}

fn write(method: &str, path: &str) -> (String, String) {
    (method.to_string(), path.to_string())
}

#[tokio::test]
async fn test_writes_run_creates_then_updates_then_deletes() {
    let server = MockServer::start().await;
    let ics = feed(&[
        vevent("Talk (moved)", "abc", "20250320T150000Z", "20250320T160000Z", "Hall A"),
        vevent("New", "new", "20250322T150000Z", "20250322T160000Z", "Hall B"),
    ]);
    mount_backend(
        &server,
        ics,
        vec![remote_event(2, "Old", "xyz"), remote_event(4, "Talk", "abc")],
    )
    .await;
    expect_writes(&server, 1, 1, 1).await;

    let report = syncer_for(&server).run(now()).await.unwrap();

    assert_eq!(report.stats.total(), 3);
    assert_eq!(
        received_writes(&server).await,
        vec![
            write("POST", "/api/events"),
            write("PUT", "/api/events/4"),
            write("DELETE", "/api/events/2"),
        ]
    );
}

#[tokio::test]
async fn test_failed_update_skips_deletes() {
    let server = MockServer::start().await;
    let ics = feed(&[vevent("Talk (moved)", "abc", "20250320T150000Z", "20250320T160000Z", "Hall A")]);
    mount_backend(
        &server,
        ics,
        vec![remote_event(4, "Talk", "abc"), remote_event(2, "Old", "xyz")],
    )
    .await;

    Mock::given(method("PUT"))
        .and(path("/api/events/4"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .expect(1)
        .mount(&server)
        .await;
    expect_writes(&server, 0, 0, 0).await;

    let err = syncer_for(&server).run(now()).await.unwrap_err();

    match err {
        SyncError::RemoteWrite { action, .. } => assert_eq!(action, "edit event id 4"),
        other => panic!("Expected RemoteWrite, got {:?}", other),
    }
    assert_eq!(received_writes(&server).await, vec![write("PUT", "/api/events/4")]);
}
