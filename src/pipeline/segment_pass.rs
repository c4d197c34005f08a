/*!
 * Per-segment processing pass.
 *
 * For one text segment: classify its mood, synthesize narration, resolve
 * a background track, and mix narration over the scaled background. Steps
 * are strictly sequential; classification failures are never silently
 * defaulted (an unclassified paragraph cannot be mood-scored correctly),
 * and nothing here retries.
 */

use std::sync::Arc;

use log::{debug, info};

use crate::audio::AudioBuffer;
use crate::audio::codec::WavCodec;
use crate::audio::mixer::{AudioMixer, MixOptions};
use crate::capabilities::{Classifier, ContentMetadata, MusicCatalog, Synthesizer};
use crate::errors::ProductionError;
use crate::music::MoodResolver;
use crate::pipeline::CancellationToken;
use crate::segmenter::TextSegment;

/// Everything the run needs to keep about one processed segment
#[derive(Debug, Clone)]
pub struct ProcessedSegment {
    /// The source segment
    pub segment: TextSegment,

    /// Classified metadata, needed again during final stitching
    pub metadata: ContentMetadata,

    /// Decoded narration clip, pre-mix; used for the narration-only
    /// timeline and exact per-clip duration measurement
    pub narration: AudioBuffer,

    /// Narration overlaid on its scaled background; used directly as the
    /// final track in the single-segment short-circuit
    pub mixed: AudioBuffer,
}

/// Per-segment pipeline over the external capabilities
pub struct SegmentPass {
    classifier: Arc<dyn Classifier>,
    synthesizer: Arc<dyn Synthesizer>,
    catalog: Arc<dyn MusicCatalog>,
    resolver: MoodResolver,
    codec: WavCodec,
    mixer: AudioMixer,
    options: MixOptions,
}

impl SegmentPass {
    pub fn new(
        classifier: Arc<dyn Classifier>,
        synthesizer: Arc<dyn Synthesizer>,
        catalog: Arc<dyn MusicCatalog>,
        options: MixOptions,
    ) -> Self {
        Self {
            classifier,
            synthesizer,
            resolver: MoodResolver::new(catalog.clone()),
            catalog,
            codec: WavCodec::new(),
            mixer: AudioMixer::new(),
            options,
        }
    }

    /// Classify one segment's emotional metadata.
    ///
    /// Failure propagates and aborts the run.
    pub async fn classify(
        &self,
        segment: &TextSegment,
    ) -> Result<ContentMetadata, ProductionError> {
        let metadata = self
            .classifier
            .classify(&segment.text)
            .await
            .map_err(|source| ProductionError::ClassificationUnavailable {
                segment_index: segment.index,
                source,
            })?;

        debug!(
            "Segment {} classified: mood '{}', genre '{}', intensity {}",
            segment.index, metadata.mood, metadata.genre, metadata.intensity
        );
        Ok(metadata)
    }

    /// Synthesize narration for one classified segment and mix it over a
    /// mood-matched background.
    pub async fn synthesize_and_mix(
        &self,
        segment: &TextSegment,
        metadata: &ContentMetadata,
        cancel: &CancellationToken,
    ) -> Result<ProcessedSegment, ProductionError> {
        if cancel.is_cancelled() {
            return Err(ProductionError::Cancelled);
        }

        let narration_bytes = self
            .synthesizer
            .synthesize(&segment.text)
            .await
            .map_err(|source| ProductionError::SynthesisUnavailable {
                segment_index: segment.index,
                source,
            })?;
        debug!(
            "Segment {} narration synthesized: {} bytes",
            segment.index,
            narration_bytes.len()
        );

        if cancel.is_cancelled() {
            return Err(ProductionError::Cancelled);
        }

        let narration = self.codec.decode(&narration_bytes)?;
        let background = self.fetch_background(metadata).await?;

        if cancel.is_cancelled() {
            return Err(ProductionError::Cancelled);
        }

        let mixed = self
            .mixer
            .mix_with_background(&narration, &background, &self.options)?;

        info!(
            "Segment {} mixed: {:.1}s narration, mood '{}'",
            segment.index,
            narration.duration_secs(),
            metadata.mood
        );

        Ok(ProcessedSegment {
            segment: segment.clone(),
            metadata: metadata.clone(),
            narration,
            mixed,
        })
    }

    /// Resolve and decode the background asset for the given metadata
    pub async fn fetch_background(
        &self,
        metadata: &ContentMetadata,
    ) -> Result<AudioBuffer, ProductionError> {
        let track = self.resolver.resolve(metadata).await?;
        let bytes = self.catalog.fetch(&track).await.map_err(|_| {
            ProductionError::NoBackgroundAvailable {
                mood: metadata.mood.clone(),
            }
        })?;
        Ok(self.codec.decode(&bytes)?)
    }

    /// Resolve and decode a background asset for a bare mood, used by the
    /// final stitching stage
    pub async fn fetch_background_for_mood(
        &self,
        mood: &str,
    ) -> Result<AudioBuffer, ProductionError> {
        let track = self.resolver.resolve_mood(mood).await?;
        let bytes = self.catalog.fetch(&track).await.map_err(|_| {
            ProductionError::NoBackgroundAvailable {
                mood: mood.to_string(),
            }
        })?;
        Ok(self.codec.decode(&bytes)?)
    }
}
