use std::io::Cursor;
use std::time::Duration;

use waste_relay_rs::{
    Category, CategoryMapper, ClassLabels, ManualClock, MemorySink, PublishOutcome, Publisher,
    RelayPipeline, ReplaySource, Stabilizer, WriteMode,
};

type Relay = RelayPipeline<ReplaySource<Cursor<String>>, MemorySink, ManualClock>;

fn relay(recording: &str, window: Duration, mode: WriteMode) -> Relay {
    let clock = ManualClock::starting_at(1_700_000_000);
    let source = ReplaySource::new(
        Cursor::new(recording.to_string()),
        ClassLabels::new(["organik", "non-organik"]),
        0.5,
    )
    .with_clock(clock.clone());

    RelayPipeline::new(
        source,
        CategoryMapper::default(),
        Stabilizer::with_window(window),
        Publisher::new(MemorySink::new(), "deteksi_sampah/jenis_sampah_", mode),
        clock,
    )
}

const TIMELINE: &str = r#"
{"t": 0.0, "detections": [{"class_id": 0, "confidence": 0.9}]}
{"t": 0.5, "detections": [{"class_id": 0, "confidence": 0.8}]}
{"t": 1.5, "detections": [{"class_id": 0, "confidence": 0.85}]}
{"t": 1.6, "detections": [{"class_id": 1, "confidence": 0.7}]}
"#;

#[test]
fn test_publish_timeline() {
    let mut relay = relay(TIMELINE, Duration::from_secs(1), WriteMode::Append);

    let mut outcomes = Vec::new();
    while let Some(report) = relay.tick().unwrap() {
        outcomes.push(report.outcome);
    }

    // Startup at 0s, nothing at 0.5s, refresh at 1.5s, change at 1.6s
    assert_eq!(
        outcomes,
        vec![
            PublishOutcome::Published,
            PublishOutcome::NotAttempted,
            PublishOutcome::Published,
            PublishOutcome::Published,
        ]
    );

    let stored = relay.publisher().sink().stored("deteksi_sampah/jenis_sampah_");
    let categories: Vec<Category> = stored.iter().map(|r| r.category).collect();
    assert_eq!(
        categories,
        vec![Category::Organic, Category::Organic, Category::NonOrganic]
    );
    assert_eq!(stored[1].timestamp, 1_700_000_001);
    assert_eq!(stored[2].confidence, 0.7);
}

#[test]
fn test_sink_failure_does_not_stall_loop() {
    let mut relay = relay(TIMELINE, Duration::from_secs(1), WriteMode::Append);

    relay.tick().unwrap();
    relay.tick().unwrap();

    // The refresh at 1.5s hits a failing sink
    relay.publisher_mut().sink_mut().fail_next(1);
    let failed = relay.tick().unwrap().unwrap();
    assert!(matches!(failed.outcome, PublishOutcome::Failed(_)));

    // State was committed anyway
    let state = relay.stabilizer().state();
    assert_eq!(state.last_published, Some(Category::Organic));
    assert_eq!(state.last_publish_at, Some(Duration::from_millis(1500)));

    // The change at 1.6s goes through
    let changed = relay.tick().unwrap().unwrap();
    assert_eq!(changed.outcome, PublishOutcome::Published);
    assert_eq!(changed.category, Category::NonOrganic);

    let stats = relay.stats();
    assert_eq!(stats.published, 2);
    assert_eq!(stats.failed, 1);
    assert_eq!(relay.publisher().sink().attempts(), 3);
}

#[test]
fn test_stable_category_refreshes_once_per_window() {
    // 200 ms ticks for 5 s of the same object
    let mut recording = String::new();
    for i in 0..25 {
        recording.push_str(&format!(
            "{{\"t\": {:.1}, \"detections\": [{{\"class_id\": 1, \"confidence\": 0.9}}]}}\n",
            i as f64 * 0.2
        ));
    }
    let mut relay = relay(&recording, Duration::from_millis(1900), WriteMode::Overwrite);
    let stats = relay.run().unwrap();

    // 0.0 (startup), 2.0 and 4.0 (refresh)
    assert_eq!(stats.ticks, 25);
    assert_eq!(stats.published, 3);
    assert_eq!(stats.suppressed, 22);

    // Overwrite keeps only the latest record
    let stored = relay.publisher().sink().stored("deteksi_sampah/jenis_sampah_");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].category, Category::NonOrganic);
}

#[test]
fn test_weak_and_missing_detections_keep_last_state() {
    let recording = r#"
{"t": 0.0, "detections": [{"class_id": 1, "confidence": 0.95}]}
{"t": 3.0, "detections": [{"class_id": 0, "confidence": 0.4}]}
{"t": 4.0, "detections": []}
"#;
    let mut relay = relay(recording, Duration::from_secs(1), WriteMode::Overwrite);
    let stats = relay.run().unwrap();

    assert_eq!(stats.published, 1);
    let state = relay.stabilizer().state();
    assert_eq!(state.current, Category::NonOrganic);
    assert_eq!(state.last_published, Some(Category::NonOrganic));
}

#[test]
fn test_mixed_frame_uses_most_confident_label() {
    let recording = r#"
{"t": 0.0, "detections": [{"class_id": 0, "confidence": 0.6}, {"class_id": 1, "confidence": 0.9}, {"class_id": 0, "confidence": 0.9}]}
"#;
    let mut relay = relay(recording, Duration::from_secs(1), WriteMode::Overwrite);
    let report = relay.tick().unwrap().unwrap();
    assert_eq!(report.category, Category::NonOrganic);
    assert_eq!(report.overlay_text().as_deref(), Some("Non-Organic (0.90)"));
}
