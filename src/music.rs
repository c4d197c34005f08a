/*!
 * Background-music selection keyed by mood.
 *
 * `MoodResolver` maps a segment's classified metadata to a catalog track.
 * On a catalog miss it retries once with synthesized neutral metadata;
 * that fallback is part of the design, not error recovery. Selection
 * among multiple matches is uniformly random so segments sharing a mood
 * do not all get the same track.
 */

use std::sync::Arc;

use log::{debug, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::capabilities::{ContentMetadata, MusicCatalog};
use crate::errors::ProductionError;

/// Reference to an external music asset. Read-only; many segments may
/// reference the same track.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct BackgroundTrack {
    /// Where the encoded asset lives
    pub url: String,

    /// Human-readable track name
    pub name: String,

    /// Mood category this track underscores
    pub category: String,
}

/// Maps content metadata to a background track via the music catalog
#[derive(Debug, Clone)]
pub struct MoodResolver {
    catalog: Arc<dyn MusicCatalog>,
}

impl MoodResolver {
    pub fn new(catalog: Arc<dyn MusicCatalog>) -> Self {
        Self { catalog }
    }

    /// Resolve a track for the given metadata.
    ///
    /// Queries the catalog by mood (case-insensitive). On a miss, retries
    /// with `{mood: "neutral", genre: "general", intensity: 5, tempo:
    /// medium}`. Fails with `NoBackgroundAvailable` only when the catalog
    /// is empty even for the fallback mood.
    pub async fn resolve(
        &self,
        metadata: &ContentMetadata,
    ) -> Result<BackgroundTrack, ProductionError> {
        let mood = metadata.mood.trim().to_lowercase();

        let matches = self.catalog.query(&mood).await;
        if let Some(track) = pick_uniform(&matches) {
            debug!("Selected '{}' ({}) for mood '{}'", track.name, track.category, mood);
            return Ok(track);
        }

        warn!("No catalog match for mood '{}', falling back to neutral", mood);
        let fallback = ContentMetadata::neutral_fallback();
        let matches = self.catalog.query(&fallback.mood).await;
        if let Some(track) = pick_uniform(&matches) {
            debug!("Selected fallback '{}' for mood '{}'", track.name, mood);
            return Ok(track);
        }

        Err(ProductionError::NoBackgroundAvailable { mood })
    }

    /// Resolve a track for a bare mood string, used during final stitching
    /// where only the paragraph's mood survives in its timing entry.
    pub async fn resolve_mood(&self, mood: &str) -> Result<BackgroundTrack, ProductionError> {
        let metadata = ContentMetadata {
            mood: mood.to_string(),
            ..ContentMetadata::neutral_fallback()
        };
        self.resolve(&metadata).await
    }
}

/// Uniform pick; avoids monotony across segments sharing a mood
fn pick_uniform(tracks: &[BackgroundTrack]) -> Option<BackgroundTrack> {
    if tracks.is_empty() {
        return None;
    }
    let index = rand::rng().random_range(0..tracks.len());
    Some(tracks[index].clone())
}
