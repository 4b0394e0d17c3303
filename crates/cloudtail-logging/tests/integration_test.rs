mod common;

use std::sync::Arc;

use cloudtail_logging::{
    CompositeSink, FileSink, LogSink, Logger, LoggerConfig, RemoteSink, StreamSinkConfig,
};
use common::MockIntake;
use tokio::time::{timeout, Duration};

fn stream_config(endpoint: String, group: &str, stream: &str) -> StreamSinkConfig {
    StreamSinkConfig {
        group: group.to_string(),
        stream: stream.to_string(),
        endpoint,
        api_key: Some("mock-api-key".to_string()),
        request_timeout_secs: 5,
    }
}

#[tokio::test]
async fn stream_sink_delivers_a_single_formatted_record() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/v1/streams/g/s/events")
        .match_header("CT-API-KEY", "mock-api-key")
        .match_header("Content-Type", "application/json")
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({
            "events": [{"message": "hello world"}]
        })))
        .with_status(202)
        .create_async()
        .await;

    let sink = RemoteSink::with_config(stream_config(server.url(), "g", "s"))
        .expect("failed to create sink");

    sink.info(format!("hello {}", "world")).await;
    sink.close().await.expect("failed to close sink");

    mock.assert_async().await;
}

#[tokio::test]
async fn stream_sink_preserves_enqueue_order() {
    let intake = MockIntake::start().await;
    let sink = RemoteSink::with_config(stream_config(intake.url(), "g", "s"))
        .expect("failed to create sink");

    for i in 0..5 {
        sink.info(format!("record {i}")).await;
    }
    sink.close().await.expect("failed to close sink");

    let requests = intake.requests();
    assert_eq!(requests.len(), 5);

    let mut last_timestamp = 0i64;
    for (i, (path, body)) in requests.iter().enumerate() {
        assert_eq!(path, "/api/v1/streams/g/s/events");

        let events = body["events"].as_array().expect("events array");
        assert_eq!(events.len(), 1, "exactly one event per delivery call");
        assert_eq!(events[0]["message"], format!("record {i}"));

        let timestamp = events[0]["timestamp"].as_i64().expect("timestamp");
        assert!(timestamp >= last_timestamp, "timestamps must not decrease");
        last_timestamp = timestamp;
    }
}

#[tokio::test]
async fn stream_sink_continues_after_a_delivery_failure() {
    let intake = MockIntake::start().await;
    intake.push_status(500);

    let sink = RemoteSink::with_config(stream_config(intake.url(), "g", "s"))
        .expect("failed to create sink");

    sink.info("first".to_string()).await;
    sink.info("second".to_string()).await;
    sink.info("third".to_string()).await;
    sink.close().await.expect("failed to close sink");

    // The failed record is attempted exactly once and never retried; the
    // records behind it still go out, in order.
    let requests = intake.requests();
    assert_eq!(requests.len(), 3);
    for (i, expected) in ["first", "second", "third"].iter().enumerate() {
        assert_eq!(requests[i].1["events"][0]["message"], *expected);
    }
}

#[tokio::test]
async fn close_drains_every_queued_record() {
    let intake = MockIntake::start().await;
    let sink = RemoteSink::with_config(stream_config(intake.url(), "g", "s"))
        .expect("failed to create sink");

    for i in 0..50 {
        sink.debug(format!("queued {i}")).await;
    }
    sink.close().await.expect("failed to close sink");

    // Close returns only after the delivery task has drained the queue.
    assert_eq!(intake.requests().len(), 50);
}

#[tokio::test]
async fn emit_blocks_when_the_queue_is_full() {
    let intake = MockIntake::start_stalled().await;
    let sink = RemoteSink::with_config(stream_config(intake.url(), "g", "s"))
        .expect("failed to create sink");

    // The first record occupies the stalled delivery task; the next hundred
    // fill the queue.
    for i in 0..=100 {
        timeout(Duration::from_secs(1), sink.info(format!("record {i}")))
            .await
            .expect("emit must not block while the queue has capacity");
    }

    // Queue is full: the next emit has to wait for a slot, not error or drop.
    let blocked = timeout(
        Duration::from_millis(200),
        sink.info("blocked".to_string()),
    )
    .await;
    assert!(blocked.is_err(), "emit must block while the queue is full");

    intake.release();
    sink.close().await.expect("failed to close sink");
}

#[tokio::test]
async fn file_sink_writes_and_rotates() {
    let dir = tempfile::tempdir().expect("failed to create tempdir");
    let dir_str = dir.path().to_str().expect("utf-8 path");

    // 11 bytes per line; the third line would push the first file past 32.
    let sink = FileSink::new(dir_str, "svc", 32)
        .await
        .expect("failed to create sink");
    sink.info("aaaaaaaaaa".to_string()).await;
    sink.info("bbbbbbbbbb".to_string()).await;
    sink.info("cccccccccc".to_string()).await;
    sink.close().await.expect("failed to close sink");

    let first = std::fs::read_to_string(dir.path().join("svc.0.log")).expect("first file");
    let second = std::fs::read_to_string(dir.path().join("svc.1.log")).expect("second file");
    assert_eq!(first, "aaaaaaaaaa\nbbbbbbbbbb\n");
    assert_eq!(second, "cccccccccc\n");
}

#[tokio::test]
async fn file_sink_resumes_numbering_across_restarts() {
    let dir = tempfile::tempdir().expect("failed to create tempdir");
    let dir_str = dir.path().to_str().expect("utf-8 path");

    let sink = FileSink::new(dir_str, "svc", 1024)
        .await
        .expect("failed to create sink");
    sink.info("from the first run".to_string()).await;
    sink.close().await.expect("failed to close sink");

    let sink = FileSink::new(dir_str, "svc", 1024)
        .await
        .expect("failed to create sink");
    sink.info("from the second run".to_string()).await;
    sink.close().await.expect("failed to close sink");

    let first = std::fs::read_to_string(dir.path().join("svc.0.log")).expect("first file");
    let second = std::fs::read_to_string(dir.path().join("svc.1.log")).expect("second file");
    assert_eq!(first, "from the first run\n");
    assert_eq!(second, "from the second run\n");
}

#[tokio::test]
async fn facade_over_a_composition_reaches_every_sink() {
    let intake = MockIntake::start().await;
    let dir = tempfile::tempdir().expect("failed to create tempdir");
    let dir_str = dir.path().to_str().expect("utf-8 path");

    let remote = RemoteSink::with_config(stream_config(intake.url(), "my-log-group", "my-log-stream"))
        .expect("failed to create remote sink");
    let file = FileSink::new(dir_str, "test", 1024)
        .await
        .expect("failed to create file sink");

    let logger = Logger::with_sink(Arc::new(CompositeSink::new(vec![
        Arc::new(remote) as Arc<dyn LogSink>,
        Arc::new(file) as Arc<dyn LogSink>,
    ])));

    logger.debug("This is a debug message".to_string()).await;
    logger.info("This is an informational message".to_string()).await;
    logger.warn("This is a warning message".to_string()).await;
    logger.error("This is an error message".to_string()).await;
    logger.close().await.expect("failed to close logger");

    let requests = intake.requests();
    assert_eq!(requests.len(), 4);
    assert_eq!(
        requests[0].1["events"][0]["message"],
        "This is a debug message"
    );
    assert_eq!(
        requests[3].1["events"][0]["message"],
        "This is an error message"
    );

    let content = std::fs::read_to_string(dir.path().join("test.0.log")).expect("log file");
    assert_eq!(
        content,
        "This is a debug message\nThis is an informational message\n\
         This is a warning message\nThis is an error message\n"
    );
}

#[tokio::test]
async fn facade_remote_backend_delivers_records() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/v1/streams/app/web/events")
        .with_status(202)
        .expect(2)
        .create_async()
        .await;

    let logger = Logger::new(LoggerConfig {
        use_remote_sink: true,
        use_file_sink: false,
        group: "app".to_string(),
        stream: "web".to_string(),
        endpoint: server.url(),
        api_key: None,
        ..Default::default()
    })
    .await
    .expect("failed to create logger");

    logger.info("one".to_string()).await;
    logger.error("two".to_string()).await;
    logger.close().await.expect("failed to close logger");

    mock.assert_async().await;
}
