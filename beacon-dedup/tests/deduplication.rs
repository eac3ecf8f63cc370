use std::sync::Arc;
use std::time::Duration;

use beacon_core::Monitoring;
use beacon_core::test::TestTransport;
use beacon_dedup::{DeduplicationConfig, DeduplicationIntegration};
use beacon_event_schema::protocol::Event;

const STACK: &str = "Error: boom\n    at handler (app.js:10:5)\n    at dispatch (app.js:3:1)";

fn setup(max_cache_size: usize, time_window: u64) -> (Arc<Monitoring>, Arc<TestTransport>) {
    beacon_log::init_test!();

    let dedup = DeduplicationIntegration::new(DeduplicationConfig {
        max_cache_size,
        time_window,
    })
    .unwrap();

    let client = Monitoring::new();
    client.add_integration(Arc::new(dedup));

    let transport = Arc::new(TestTransport::new());
    client.init(transport.clone());

    (client, transport)
}

fn error(message: &str) -> Event {
    Event::error(message, Some(STACK.to_owned()))
}

#[tokio::test]
async fn test_identical_errors_suppressed() {
    let (client, transport) = setup(100, 1000);

    for _ in 0..3 {
        client.capture_event(error("boom")).await.unwrap();
    }

    assert_eq!(transport.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_duplicates_deliver_once() {
    let (client, transport) = setup(100, 60_000);

    let handles: Vec<_> = (0..64)
        .map(|_| {
            let client = client.clone();
            tokio::spawn(async move { client.capture_event(error("boom")).await })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(transport.len(), 1);
    let meta = transport.events()[0].deduplication.clone().unwrap();
    assert_eq!(meta.count, 1);
}

#[tokio::test]
async fn test_window_expiry() {
    let (client, transport) = setup(100, 100);

    client.capture_event(error("boom")).await.unwrap();
    tokio::time::sleep(Duration::from_millis(150)).await;
    client.capture_event(error("boom")).await.unwrap();

    assert_eq!(transport.len(), 2);
}

#[tokio::test]
async fn test_distinct_errors_pass() {
    let (client, transport) = setup(100, 1000);

    client.capture_event(error("first")).await.unwrap();
    client.capture_event(error("second")).await.unwrap();
    client
        .capture_event(Event::error("first", Some("at other (lib.js:1:1)".to_owned())))
        .await
        .unwrap();

    assert_eq!(transport.len(), 3);
}

#[tokio::test]
async fn test_delivered_events_carry_metadata() {
    let (client, transport) = setup(100, 1000);

    client.capture_event(error("first")).await.unwrap();
    client.capture_event(error("second")).await.unwrap();

    for event in transport.events() {
        let meta = event.deduplication.expect("missing _deduplication");
        assert!(!meta.fingerprint.is_empty());
        assert_eq!(meta.count, 1);
    }
}

#[tokio::test]
async fn test_dates_normalized() {
    let (client, transport) = setup(100, 1000);

    client.capture_event(error("Error on 2024-01-01")).await.unwrap();
    client.capture_event(error("Error on 2024-01-02")).await.unwrap();

    assert_eq!(transport.len(), 1);
}

/// The cache evicts by insertion order (FIFO), not by recency of use (LRU).
#[tokio::test]
async fn test_capacity_evicts_oldest() {
    let (client, transport) = setup(2, 1000);

    for message in ["A", "B", "C", "A"] {
        client.capture_event(error(message)).await.unwrap();
    }

    assert_eq!(transport.len(), 4);
}
