/*!
 * Integration tests for full audiobook production runs.
 *
 * Drive the orchestrator end to end over mock capabilities and assert
 * the run-level contract: one publish per successful run, strict abort
 * on failure, ordering across capabilities, and mood fallback.
 */

use std::sync::Arc;

use bookwave::audio::codec::WavCodec;
use bookwave::audio::mixer::MixOptions;
use bookwave::capabilities::mock::{
    CallRecorder, MockBlobStore, MockClassifier, MockMusicCatalog, MockSynthesizer,
    MOCK_SAMPLE_RATE,
};
use bookwave::capabilities::local::FsBlobStore;
use bookwave::errors::ProductionError;
use bookwave::pipeline::{ProductionOrchestrator, ProductionState};

use crate::common::{create_temp_dir, init_test_logging, sample_book, working_orchestrator};

/// A three-paragraph book produces exactly one published track whose
/// duration is the sum of the narration clips
#[tokio::test]
async fn test_produce_threeParagraphs_shouldPublishOnce() {
    init_test_logging();
    let (orchestrator, store) = working_orchestrator(&["happy", "sad", "tense"], 2.0);

    let outcome = orchestrator
        .produce(&sample_book(3), "three_part_book")
        .await
        .unwrap();

    assert_eq!(outcome.segment_count, 3);
    assert!((outcome.duration_secs - 6.0).abs() < 0.1);
    assert_eq!(outcome.url, "mock://three_part_book");
    assert_eq!(store.puts().len(), 1);

    // Published bytes are a decodable WAV of the full duration
    let (_, byte_len) = store.puts()[0].clone();
    let expected_frames = (6.0 * MOCK_SAMPLE_RATE as f64) as usize;
    assert!(byte_len >= 44 + expected_frames * 2 - 4);
}

/// All classifications complete before any synthesis begins
#[tokio::test]
async fn test_produce_callOrdering_classifyAllBeforeSynthesis() {
    let recorder = CallRecorder::new();
    let orchestrator = ProductionOrchestrator::new(
        Arc::new(MockClassifier::working(&["calm"]).with_recorder(recorder.clone())),
        Arc::new(MockSynthesizer::working(1.0).with_recorder(recorder.clone())),
        Arc::new(MockMusicCatalog::with_categories(&["calm", "neutral"])),
        Arc::new(MockBlobStore::working()),
        MixOptions::default(),
    );

    orchestrator
        .produce(&sample_book(3), "ordered")
        .await
        .unwrap();

    let calls = recorder.calls();
    let last_classify = calls.iter().rposition(|c| c.starts_with("classify")).unwrap();
    let first_synthesize = calls.iter().position(|c| c.starts_with("synthesize")).unwrap();
    assert!(last_classify < first_synthesize, "calls: {:?}", calls);
}

/// A classification failure on the second of three paragraphs aborts the
/// run before any narration is synthesized
#[tokio::test]
async fn test_produce_classificationFailure_shouldAbortWithoutSynthesis() {
    let synthesizer = Arc::new(MockSynthesizer::working(1.0));
    let store = Arc::new(MockBlobStore::working());
    let orchestrator = ProductionOrchestrator::new(
        Arc::new(MockClassifier::fail_on(&["calm"], 1)),
        synthesizer.clone(),
        Arc::new(MockMusicCatalog::with_categories(&["calm", "neutral"])),
        store.clone(),
        MixOptions::default(),
    );

    let failure = orchestrator
        .produce(&sample_book(3), "aborted")
        .await
        .unwrap_err();

    assert_eq!(failure.state, ProductionState::Classifying);
    assert_eq!(synthesizer.call_count(), 0);
    assert!(store.puts().is_empty());
}

/// A synthesis failure mid-run aborts with the failing paragraph's index
/// and publishes nothing
#[tokio::test]
async fn test_produce_synthesisFailure_shouldAbortWithSegmentIndex() {
    let store = Arc::new(MockBlobStore::working());
    let orchestrator = ProductionOrchestrator::new(
        Arc::new(MockClassifier::working(&["calm"])),
        Arc::new(MockSynthesizer::fail_on(1)),
        Arc::new(MockMusicCatalog::with_categories(&["calm", "neutral"])),
        store.clone(),
        MixOptions::default(),
    );

    let failure = orchestrator
        .produce(&sample_book(3), "half_done")
        .await
        .unwrap_err();

    assert_eq!(failure.state, ProductionState::SynthesizingAndMixing);
    assert!(matches!(
        failure.error,
        ProductionError::SynthesisUnavailable { segment_index: 1, .. }
    ));
    assert!(store.puts().is_empty());
}

/// Unknown moods fall back to neutral tracks and the run still completes
#[tokio::test]
async fn test_produce_unknownMoods_shouldFallBackToNeutral() {
    let catalog = Arc::new(MockMusicCatalog::with_categories(&["neutral"]));
    let orchestrator = ProductionOrchestrator::new(
        Arc::new(MockClassifier::working(&["wistful", "brooding"])),
        Arc::new(MockSynthesizer::working(1.0)),
        catalog.clone(),
        Arc::new(MockBlobStore::working()),
        MixOptions::default(),
    );

    let outcome = orchestrator
        .produce(&sample_book(2), "fallback_book")
        .await
        .unwrap();

    assert_eq!(outcome.segment_count, 2);
    assert!(catalog.fetch_count() >= 2);
}

/// An empty catalog fails the run; missing music is never silently skipped
#[tokio::test]
async fn test_produce_emptyCatalog_shouldFailRun() {
    let orchestrator = ProductionOrchestrator::new(
        Arc::new(MockClassifier::working(&["calm"])),
        Arc::new(MockSynthesizer::working(1.0)),
        Arc::new(MockMusicCatalog::empty()),
        Arc::new(MockBlobStore::working()),
        MixOptions::default(),
    );

    let failure = orchestrator
        .produce(&sample_book(2), "no_music")
        .await
        .unwrap_err();

    assert!(matches!(
        failure.error,
        ProductionError::NoBackgroundAvailable { .. }
    ));
}

/// Cancelling from a progress observer stops the run without a publish
#[tokio::test]
async fn test_produce_cancelDuringSynthesis_shouldStopRun() {
    let store = Arc::new(MockBlobStore::working());
    let orchestrator = ProductionOrchestrator::new(
        Arc::new(MockClassifier::working(&["calm"])),
        Arc::new(MockSynthesizer::working(1.0)),
        Arc::new(MockMusicCatalog::with_categories(&["calm", "neutral"])),
        store.clone(),
        MixOptions::default(),
    );
    let token = orchestrator.cancellation_token();
    let orchestrator = orchestrator.with_progress(Box::new(move |progress| {
        if progress.state == ProductionState::SynthesizingAndMixing
            && progress.segment_index == Some(1)
        {
            token.cancel();
        }
    }));

    let failure = orchestrator
        .produce(&sample_book(4), "cancelled_book")
        .await
        .unwrap_err();

    assert!(matches!(failure.error, ProductionError::Cancelled));
    assert!(store.puts().is_empty());
}

/// Progress states arrive in pipeline order for a successful run
#[tokio::test]
async fn test_produce_progressStates_shouldFollowPipelineOrder() {
    use parking_lot::Mutex;

    let states: Arc<Mutex<Vec<ProductionState>>> = Arc::new(Mutex::new(Vec::new()));
    let seen = states.clone();
    let (orchestrator, _) = working_orchestrator(&["happy"], 1.0);
    let orchestrator = orchestrator.with_progress(Box::new(move |p| seen.lock().push(p.state)));

    orchestrator
        .produce(&sample_book(2), "progress_book")
        .await
        .unwrap();

    let states = states.lock();
    let order = [
        ProductionState::Segmenting,
        ProductionState::Classifying,
        ProductionState::SynthesizingAndMixing,
        ProductionState::Concatenating,
        ProductionState::Stitching,
        ProductionState::Publishing,
        ProductionState::Done,
    ];
    let mut positions = Vec::new();
    for state in order {
        positions.push(states.iter().position(|s| *s == state).unwrap());
    }
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "states: {:?}", *states);
}

/// End-to-end run against the real filesystem blob store
#[tokio::test]
async fn test_produce_withFsBlobStore_shouldWriteDecodableWav() {
    init_test_logging();
    let dir = create_temp_dir().unwrap();
    let orchestrator = ProductionOrchestrator::new(
        Arc::new(MockClassifier::working(&["happy", "sad"])),
        Arc::new(MockSynthesizer::working(1.5)),
        Arc::new(MockMusicCatalog::with_categories(&["happy", "sad", "neutral"])),
        Arc::new(FsBlobStore::new(dir.path())),
        MixOptions::default(),
    );

    let outcome = orchestrator
        .produce(&sample_book(2), "disk_book")
        .await
        .unwrap();

    assert!(outcome.url.starts_with("file://"));
    let written = tokio::fs::read(dir.path().join("disk_book.wav")).await.unwrap();
    let decoded = WavCodec::new().decode(&written).unwrap();
    assert!((decoded.duration_secs() - outcome.duration_secs).abs() < 1e-6);
}
