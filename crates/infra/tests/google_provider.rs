//! Google Calendar provider against a wiremock server.

use std::time::Duration;

use calsync_core::RemoteCalendarProvider;
use calsync_domain::{CalSyncError, Credential, EventDraft, SyncWindow};
use calsync_infra::{GoogleCalendarProvider, HttpClient};
use chrono::{TimeZone, Utc};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const EVENTS_PATH: &str = "/calendar/v3/calendars/primary/events";

fn provider(server: &MockServer) -> GoogleCalendarProvider {
    let http = HttpClient::builder()
        .timeout(Duration::from_secs(2))
        .base_backoff(Duration::from_millis(5))
        .max_attempts(3)
        .build()
        .expect("http client");
    GoogleCalendarProvider::new(http, &format!("{}/calendar/v3", server.uri()), "primary")
        .expect("provider")
        .with_page_size(2)
}

fn credential() -> Credential {
    Credential::new("ya29.token")
}

fn window() -> SyncWindow {
    SyncWindow::new(
        Utc.with_ymd_and_hms(2023, 12, 3, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2024, 12, 3, 0, 0, 0).unwrap(),
    )
    .unwrap()
}

fn draft() -> EventDraft {
    let start = Utc.with_ymd_and_hms(2030, 1, 1, 10, 0, 0).unwrap();
    EventDraft {
        title: "Review".into(),
        description: Some("Quarterly numbers".into()),
        start_time: start,
        end_time: start + chrono::Duration::hours(1),
    }
}

#[tokio::test]
async fn lists_events_with_expanded_recurrences_in_start_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(EVENTS_PATH))
        .and(header("authorization", "Bearer ya29.token"))
        .and(query_param("timeMin", "2023-12-03T00:00:00.000Z"))
        .and(query_param("timeMax", "2024-12-03T00:00:00.000Z"))
        .and(query_param("singleEvents", "true"))
        .and(query_param("orderBy", "startTime"))
        .and(query_param("maxResults", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "kind": "calendar#events",
            "items": [
                {
                    "id": "g1",
                    "summary": "Standup",
                    "start": { "dateTime": "2024-06-03T09:00:00Z" },
                    "end": { "dateTime": "2024-06-03T09:30:00Z" }
                },
                {
                    "id": "holiday",
                    "start": { "date": "2024-06-04" },
                    "end": { "date": "2024-06-05" }
                }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let events = provider(&server).fetch_events(&credential(), &window()).await.unwrap();

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].id, "g1");
    assert_eq!(events[0].summary.as_deref(), Some("Standup"));
    assert!(events[1].start.as_ref().unwrap().is_date_only());
}

#[tokio::test]
async fn follows_page_tokens() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(EVENTS_PATH))
        .and(query_param("pageToken", "page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{
                "id": "g3",
                "start": { "dateTime": "2024-06-05T09:00:00Z" },
                "end": { "dateTime": "2024-06-05T10:00:00Z" }
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(EVENTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                { "id": "g1", "start": { "dateTime": "2024-06-03T09:00:00Z" }, "end": { "dateTime": "2024-06-03T10:00:00Z" } },
                { "id": "g2", "start": { "dateTime": "2024-06-04T09:00:00Z" }, "end": { "dateTime": "2024-06-04T10:00:00Z" } }
            ],
            "nextPageToken": "page-2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let events = provider(&server).fetch_events(&credential(), &window()).await.unwrap();

    let ids: Vec<_> = events.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["g1", "g2", "g3"]);
}

#[tokio::test]
async fn missing_items_is_an_empty_listing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(EVENTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "kind": "calendar#events" })))
        .mount(&server)
        .await;

    let events = provider(&server).fetch_events(&credential(), &window()).await.unwrap();
    assert!(events.is_empty());
}

#[tokio::test]
async fn rejected_credential_is_remote_auth_and_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(EVENTS_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "code": 401, "message": "Invalid Credentials" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = provider(&server).fetch_events(&credential(), &window()).await.unwrap_err();

    assert_eq!(err, CalSyncError::RemoteAuth("Invalid Credentials".into()));
}

#[tokio::test]
async fn server_errors_are_retried_then_reported_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(EVENTS_PATH))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let err = provider(&server).fetch_events(&credential(), &window()).await.unwrap_err();

    assert!(matches!(err, CalSyncError::RemoteUnavailable(_)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn slow_provider_times_out_as_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(EVENTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let http = HttpClient::builder()
        .timeout(Duration::from_millis(50))
        .base_backoff(Duration::from_millis(1))
        .max_attempts(1)
        .build()
        .unwrap();
    let provider =
        GoogleCalendarProvider::new(http, &format!("{}/calendar/v3", server.uri()), "primary")
            .unwrap();

    let err = provider.fetch_events(&credential(), &window()).await.unwrap_err();
    assert!(matches!(err, CalSyncError::RemoteUnavailable(_)));
}

#[tokio::test]
async fn inserts_event_and_returns_provider_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(EVENTS_PATH))
        .and(header("authorization", "Bearer ya29.token"))
        .and(body_json(json!({
            "summary": "Review",
            "description": "Quarterly numbers",
            "start": { "dateTime": "2030-01-01T10:00:00.000Z" },
            "end": { "dateTime": "2030-01-01T11:00:00.000Z" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "g9",
            "status": "confirmed",
            "summary": "Review",
            "start": { "dateTime": "2030-01-01T11:00:00+01:00", "timeZone": "Europe/Berlin" },
            "end": { "dateTime": "2030-01-01T12:00:00+01:00", "timeZone": "Europe/Berlin" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let created = provider(&server).create_event(&credential(), &draft()).await.unwrap();

    assert_eq!(created.id, "g9");
    assert_eq!(
        created.start.unwrap().date_time.as_deref(),
        Some("2030-01-01T11:00:00+01:00")
    );
}

#[tokio::test]
async fn rejected_insert_surfaces_provider_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(EVENTS_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "code": 400,
                "message": "The specified time range is empty.",
                "errors": [{ "reason": "timeRangeEmpty" }]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = provider(&server).create_event(&credential(), &draft()).await.unwrap_err();

    assert_eq!(err, CalSyncError::RemoteValidation("The specified time range is empty.".into()));
}

#[tokio::test]
async fn insert_response_without_id_is_internal_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(EVENTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "summary": "Review" })))
        .mount(&server)
        .await;

    let err = provider(&server).create_event(&credential(), &draft()).await.unwrap_err();
    assert!(matches!(err, CalSyncError::Internal(_)));
}
