//! Integration tests for the scrape cycle
//!
//! These tests use wiremock to serve a listings page and run full cycles
//! against a real JSON store in a temporary directory.

use async_trait::async_trait;
use listing_watch::config::parse_config;
use listing_watch::notify::{Envelope, MailTransport, Notifier, TransportError};
use listing_watch::scrape::HttpPageSource;
use listing_watch::{JsonFileStore, ListingStore, ScrapeCycle};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LISTINGS_PAGE: &str = r#"<html><body>
<div class="item-list" id="a5001">
  <h5 class="add-title"><a href="/listing/5001.html">BMW 320d Touring 2015 automaat</a></h5>
</div>
<div class="item-list" id="a5002">
  <h5 class="add-title"><a href="/listing/5002.html">Toyota Corolla 2015</a></h5>
</div>
<div class="item-list" id="a5003">
  <h5 class="add-title"><a href="https://cdn.example.com/5003">BMW 520d 2016</a></h5>
</div>
<div class="item-list" id="a5004">
  <h5 class="add-title"><a href="/listing/5004.html">Volvo V70 2.4 2008</a></h5>
</div>
</body></html>"#;

/// Captures every envelope handed to the transport
#[derive(Default)]
struct RecordingTransport {
    sent: Mutex<Vec<Envelope>>,
}

impl RecordingTransport {
    fn subjects(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.subject.clone())
            .collect()
    }
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn send(&self, envelope: &Envelope) -> Result<(), TransportError> {
        self.sent.lock().unwrap().push(envelope.clone());
        Ok(())
    }
}

/// Creates a test configuration watching `page_url`
fn create_test_config(page_url: &str, store_path: &str) -> listing_watch::Config {
    let toml = format!(
        r#"
[source]
url = "{}"
fetch-timeout-secs = 5

[store]
path = "{}"

[[criteria]]
make = "BMW"
model = "3"
years = ["2015", "2016"]

[[criteria]]
make = "volvo"
model = "v70"
years = ["2008"]
"#,
        page_url, store_path
    );
    parse_config(&toml).expect("Failed to parse test config")
}

struct Harness {
    _dir: TempDir,
    store: Arc<JsonFileStore>,
    transport: Arc<RecordingTransport>,
    cycle: ScrapeCycle,
}

async fn create_harness(server: &MockServer) -> Harness {
    let dir = TempDir::new().unwrap();
    let store_path = dir.path().join("searchResults.json");
    let config = create_test_config(
        &format!("{}/577-autod/listings.html", server.uri()),
        store_path.to_str().unwrap(),
    );

    let store = Arc::new(JsonFileStore::new(&config.store.path));
    let transport = Arc::new(RecordingTransport::default());
    let notifier = Notifier::new("watch@example.com", transport.clone(), Duration::from_secs(5));
    let source = HttpPageSource::from_config(&config.source).unwrap();

    let cycle = ScrapeCycle::new(
        &config,
        Arc::new(source),
        store.clone(),
        notifier,
        "me@example.com",
    )
    .unwrap();

    Harness {
        _dir: dir,
        store,
        transport,
        cycle,
    }
}

async fn mount_page(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/577-autod/listings.html"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_cycle_notifies_and_records_matches() {
    let server = MockServer::start().await;
    mount_page(&server, LISTINGS_PAGE).await;
    let harness = create_harness(&server).await;

    let report = harness.cycle.run().await;

    assert_eq!(report.extracted, 4);
    assert_eq!(report.found, 2);
    assert_eq!(report.notified, 2);
    assert!(report.persisted);
    assert_eq!(harness.transport.subjects(), vec!["5001", "5004"]);

    let records = harness.store.load().unwrap();
    let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["5001", "5004"]);
    assert_eq!(
        records[0].url.as_deref(),
        Some(format!("{}/listing/5001.html", server.uri()).as_str())
    );
    assert_eq!(records[0].year.as_deref(), Some("2015"));
}

#[tokio::test]
async fn test_notification_body_lists_fields() {
    let server = MockServer::start().await;
    mount_page(&server, LISTINGS_PAGE).await;
    let harness = create_harness(&server).await;

    harness.cycle.run().await;

    let sent = harness.transport.sent.lock().unwrap();
    let first = &sent[0];
    assert_eq!(first.from, "watch@example.com");
    assert_eq!(first.to, "me@example.com");
    assert!(first.body.contains("ID: 5001"));
    assert!(first.body.contains("Make: BMW"));
    assert!(first.body.contains("Model: 3"));
    assert!(first.body.contains("Year: 2015"));
    assert!(first.body.contains("/listing/5001.html"));
}

#[tokio::test]
async fn test_second_cycle_does_not_renotify() {
    let server = MockServer::start().await;
    mount_page(&server, LISTINGS_PAGE).await;
    let harness = create_harness(&server).await;

    harness.cycle.run().await;
    let before = std::fs::read_to_string(harness.store.path()).unwrap();

    let report = harness.cycle.run().await;
    let after = std::fs::read_to_string(harness.store.path()).unwrap();

    assert_eq!(report.found, 0);
    assert_eq!(report.already_recorded, 2);
    assert_eq!(harness.transport.subjects().len(), 2);
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_history_survives_a_new_process() {
    let server = MockServer::start().await;
    mount_page(&server, LISTINGS_PAGE).await;

    let first = create_harness(&server).await;
    first.cycle.run().await;

    // A second cycle built on the same file, as after a restart
    let transport = Arc::new(RecordingTransport::default());
    let config = create_test_config(
        &format!("{}/577-autod/listings.html", server.uri()),
        first.store.path().to_str().unwrap(),
    );
    let cycle = ScrapeCycle::new(
        &config,
        Arc::new(HttpPageSource::from_config(&config.source).unwrap()),
        Arc::new(JsonFileStore::new(first.store.path())),
        Notifier::new("watch@example.com", transport.clone(), Duration::from_secs(5)),
        "me@example.com",
    )
    .unwrap();

    let report = cycle.run().await;

    assert_eq!(report.found, 0);
    assert!(transport.subjects().is_empty());
}

#[tokio::test]
async fn test_server_error_keeps_history() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/577-autod/listings.html"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let harness = create_harness(&server).await;

    let seeded = r#"[{"dataIid": "42", "titleText": "Saab 9-3 2004", "normalizedTitle": "saab932004", "link": "n/a", "year": "2004"}]"#;
    std::fs::write(harness.store.path(), seeded).unwrap();

    let report = harness.cycle.run().await;

    assert!(report.fetch_failed);
    assert_eq!(report.extracted, 0);
    assert!(harness.transport.subjects().is_empty());

    let records = harness.store.load().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, "42");
    assert_eq!(records[0].url, None);
}

#[tokio::test]
async fn test_store_uses_sentinel_on_disk() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        r#"<div class="item-list" id="a9"><h5 class="add-title"><a>Volvo V70 2008</a></h5></div>"#,
    )
    .await;
    let harness = create_harness(&server).await;

    let report = harness.cycle.run().await;
    assert_eq!(report.found, 1);

    let raw = std::fs::read_to_string(harness.store.path()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json[0]["dataIid"], "9");
    assert_eq!(json[0]["link"], "n/a");
    assert_eq!(json[0]["year"], "2008");
}

#[tokio::test]
async fn test_corrupt_store_counts_as_empty() {
    let server = MockServer::start().await;
    mount_page(&server, LISTINGS_PAGE).await;
    let harness = create_harness(&server).await;

    std::fs::write(harness.store.path(), "{ not json").unwrap();

    let report = harness.cycle.run().await;

    assert_eq!(report.found, 2);
    assert!(report.persisted);
    assert_eq!(harness.store.load().unwrap().len(), 2);
}
