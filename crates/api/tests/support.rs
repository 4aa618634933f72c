#![allow(dead_code)]

use std::sync::Arc;

use calsync_api::AppContext;
use calsync_domain::{Config, Credential, DatabaseConfig, ProviderConfig, SyncConfig};
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const EVENTS_PATH: &str = "/calendar/v3/calendars/primary/events";

/// Full application stack over a temp database and a mock provider.
pub struct TestApp {
    pub ctx: Arc<AppContext>,
    pub server: MockServer,
    /// Keep temporary directory alive for the lifetime of the context.
    _temp_dir: TempDir,
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

pub async fn spawn_app_with(customize: impl FnOnce(&mut Config)) -> TestApp {
    let temp_dir = TempDir::new().expect("failed to create temporary database directory");
    let server = MockServer::start().await;

    let mut config = Config {
        database: DatabaseConfig {
            path: temp_dir.path().join("calsync.db").to_string_lossy().to_string(),
            pool_size: 4,
            ..DatabaseConfig::default()
        },
        provider: ProviderConfig {
            base_url: format!("{}/calendar/v3", server.uri()),
            timeout_seconds: 2,
            max_attempts: 2,
            ..ProviderConfig::default()
        },
        sync: SyncConfig::default(),
    };
    customize(&mut config);

    let ctx = AppContext::new(config).expect("failed to create app context");

    TestApp { ctx: Arc::new(ctx), server, _temp_dir: temp_dir }
}

pub fn credential() -> Credential {
    Credential::new("ya29.test-token")
}

pub fn timed_event(id: &str, summary: &str, start: &str, end: &str) -> Value {
    json!({
        "id": id,
        "summary": summary,
        "start": { "dateTime": start },
        "end": { "dateTime": end }
    })
}

pub fn all_day_event(id: &str, summary: &str, date: &str, next_date: &str) -> Value {
    json!({
        "id": id,
        "summary": summary,
        "start": { "date": date },
        "end": { "date": next_date }
    })
}

/// Serve `items` for every listing request.
pub async fn mount_listing(server: &MockServer, items: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path(EVENTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": items })))
        .mount(server)
        .await;
}
