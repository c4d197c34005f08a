/*!
 * Common test utilities for the bookwave test suite
 */

use std::sync::Arc;

use anyhow::Result;
use tempfile::TempDir;

use bookwave::audio::mixer::MixOptions;
use bookwave::capabilities::mock::{
    MockBlobStore, MockClassifier, MockMusicCatalog, MockSynthesizer,
};
use bookwave::pipeline::ProductionOrchestrator;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Initialize logging for tests; honors RUST_LOG, safe to call repeatedly
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Build a sample book with the given number of paragraphs
pub fn sample_book(paragraphs: usize) -> String {
    (0..paragraphs)
        .map(|i| format!("Paragraph number {} tells part of the story.", i + 1))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Orchestrator over fully working mocks, keeping the store handle for
/// assertions
pub fn working_orchestrator(
    moods: &[&str],
    clip_seconds: f32,
) -> (ProductionOrchestrator, Arc<MockBlobStore>) {
    let store = Arc::new(MockBlobStore::working());
    let mut categories: Vec<&str> = moods.to_vec();
    if !categories.contains(&"neutral") {
        categories.push("neutral");
    }
    let orchestrator = ProductionOrchestrator::new(
        Arc::new(MockClassifier::working(moods)),
        Arc::new(MockSynthesizer::working(clip_seconds)),
        Arc::new(MockMusicCatalog::with_categories(&categories)),
        store.clone(),
        MixOptions::default(),
    );
    (orchestrator, store)
}
