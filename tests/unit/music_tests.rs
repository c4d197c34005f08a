/*!
 * Tests for mood-keyed background music resolution
 */

use std::sync::Arc;

use bookwave::capabilities::mock::MockMusicCatalog;
use bookwave::capabilities::ContentMetadata;
use bookwave::errors::ProductionError;
use bookwave::music::{BackgroundTrack, MoodResolver};

fn metadata(mood: &str) -> ContentMetadata {
    ContentMetadata {
        mood: mood.to_string(),
        ..ContentMetadata::neutral_fallback()
    }
}

/// Test that resolution only draws from tracks of the requested category
#[test]
fn test_resolve_multipleTracksPerMood_shouldAlwaysMatchCategory() {
    tokio_test::block_on(async {
        let mut catalog = MockMusicCatalog::empty();
        for i in 0..5 {
            catalog.add_track(BackgroundTrack {
                url: format!("mock://tense_{}.wav", i),
                name: format!("Tense {}", i),
                category: "tense".to_string(),
            });
        }
        catalog.add_track(BackgroundTrack {
            url: "mock://calm.wav".to_string(),
            name: "Calm".to_string(),
            category: "calm".to_string(),
        });
        let resolver = MoodResolver::new(Arc::new(catalog));

        // Random selection, so sample repeatedly
        for _ in 0..20 {
            let track = resolver.resolve(&metadata("tense")).await.unwrap();
            assert_eq!(track.category, "tense");
        }
    });
}

/// Test that the neutral fallback queries the catalog a second time
#[tokio::test]
async fn test_resolve_fallback_shouldQueryCatalogTwice() {
    let catalog = Arc::new(MockMusicCatalog::with_categories(&["neutral"]));
    let resolver = MoodResolver::new(catalog.clone());

    let track = resolver.resolve(&metadata("melancholy")).await.unwrap();

    assert_eq!(track.category, "neutral");
    assert_eq!(catalog.query_count(), 2);
}

/// Test that a direct hit never touches the fallback
#[tokio::test]
async fn test_resolve_directHit_shouldQueryCatalogOnce() {
    let catalog = Arc::new(MockMusicCatalog::with_categories(&["happy", "neutral"]));
    let resolver = MoodResolver::new(catalog.clone());

    resolver.resolve(&metadata("happy")).await.unwrap();

    assert_eq!(catalog.query_count(), 1);
}

/// Test the failure mood reported when even the fallback misses
#[tokio::test]
async fn test_resolve_noNeutralTracks_shouldReportOriginalMood() {
    let resolver = MoodResolver::new(Arc::new(MockMusicCatalog::with_categories(&["happy"])));

    let result = resolver.resolve(&metadata("gloomy")).await;

    match result {
        Err(ProductionError::NoBackgroundAvailable { mood }) => assert_eq!(mood, "gloomy"),
        other => panic!("expected NoBackgroundAvailable, got {:?}", other),
    }
}
