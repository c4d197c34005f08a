/*!
 * External capability seams for the production pipeline.
 *
 * This module contains the collaborator interfaces the core consumes:
 * - Classifier: text → content metadata (mood, genre, intensity, tempo)
 * - Synthesizer: text → encoded narration audio
 * - MusicCatalog: mood → background track references, plus asset fetch
 * - BlobStore: encoded track bytes → persistent URL
 *
 * The core has no dependency on any specific vendor protocol; concrete
 * clients live in submodules (`openai`, `local`) and mocks in `mock`.
 */

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::errors::CapabilityError;
use crate::music::BackgroundTrack;

pub mod local;
pub mod mock;
pub mod openai;

/// Narration pacing reported by the classifier
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tempo {
    Slow,
    #[default]
    Medium,
    Fast,
}

/// Emotional metadata for one text segment.
///
/// Attached 1:1 to a segment after classification; owned by that segment
/// and never shared between segments.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ContentMetadata {
    /// Primary emotional tone, e.g. "suspense", "happy", "sad"
    pub mood: String,

    /// Content genre, e.g. "mystery", "romance", "adventure"
    pub genre: String,

    /// Emotional intensity on a 1-10 scale (1=calm, 10=intense)
    #[serde(default = "default_intensity")]
    pub intensity: u8,

    /// Appropriate narration pace
    #[serde(default)]
    pub tempo: Tempo,
}

fn default_intensity() -> u8 {
    5
}

impl ContentMetadata {
    /// The synthesized metadata used when the catalog has nothing for a
    /// segment's own mood
    pub fn neutral_fallback() -> Self {
        Self {
            mood: "neutral".to_string(),
            genre: "general".to_string(),
            intensity: 5,
            tempo: Tempo::Medium,
        }
    }

    /// Clamp intensity into its documented 1-10 range
    pub fn normalized(mut self) -> Self {
        self.intensity = self.intensity.clamp(1, 10);
        self.mood = self.mood.trim().to_lowercase();
        self
    }
}

/// Mood/metadata classification over raw paragraph text
#[async_trait]
pub trait Classifier: Send + Sync + Debug {
    /// Classify one paragraph's emotional metadata
    async fn classify(&self, text: &str) -> Result<ContentMetadata, CapabilityError>;
}

/// Speech synthesis over raw paragraph text
#[async_trait]
pub trait Synthesizer: Send + Sync + Debug {
    /// Synthesize narration for one paragraph, returning encoded audio
    /// bytes in a PCM container
    async fn synthesize(&self, text: &str) -> Result<Bytes, CapabilityError>;
}

/// Background music catalog keyed by mood category
#[async_trait]
pub trait MusicCatalog: Send + Sync + Debug {
    /// List tracks whose category matches the mood (case-insensitive).
    /// May return empty; that is a catalog miss, not an error.
    async fn query(&self, mood: &str) -> Vec<BackgroundTrack>;

    /// Fetch the encoded audio asset a track points at
    async fn fetch(&self, track: &BackgroundTrack) -> Result<Bytes, CapabilityError>;
}

/// Persistent storage for the finished track
#[async_trait]
pub trait BlobStore: Send + Sync + Debug {
    /// Store encoded bytes under a logical id, returning a persistent URL
    async fn put(&self, data: &[u8], logical_id: &str) -> Result<String, CapabilityError>;
}
