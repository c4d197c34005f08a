/*!
 * Production orchestrator: the run-level state machine.
 *
 * One run drives segmentation → per-segment pipeline → narration
 * concatenation → multi-track stitch → publish. Steps are strictly
 * sequential; each depends on the previous step's output. Any failure is
 * terminal for the run and no partial audiobook is ever published.
 *
 * Re-running on identical input produces a semantically equivalent but
 * not byte-identical track: classification and synthesis are
 * nondeterministic external capabilities, and track selection is
 * randomized among catalog ties.
 */

use std::fmt;
use std::sync::Arc;

use log::{debug, info, warn};
use thiserror::Error;

use crate::audio::AudioBuffer;
use crate::audio::codec::WavCodec;
use crate::audio::mixer::{AudioMixer, MixOptions};
use crate::capabilities::{BlobStore, Classifier, MusicCatalog, Synthesizer};
use crate::errors::ProductionError;
use crate::pipeline::segment_pass::{ProcessedSegment, SegmentPass};
use crate::pipeline::CancellationToken;
use crate::segmenter::{split_into_segments, TextSegment};
use crate::timing::{ParagraphTiming, TimingEstimator};

/// States of a production run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductionState {
    /// Nothing started yet
    Idle,
    /// Splitting input text on blank-line boundaries
    Segmenting,
    /// Extracting mood metadata per segment, in order
    Classifying,
    /// Synthesizing narration and mixing each segment's background
    SynthesizingAndMixing,
    /// Building the narration-only timeline for duration measurement
    Concatenating,
    /// Assembling the final track with per-paragraph backgrounds
    Stitching,
    /// Encoding and handing the track to the blob store
    Publishing,
    /// Run finished; the outcome holds the persistent URL
    Done,
    /// Terminal failure; reachable from any non-idle state
    Failed,
}

impl fmt::Display for ProductionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Segmenting => "segmenting",
            Self::Classifying => "classifying",
            Self::SynthesizingAndMixing => "synthesizing-and-mixing",
            Self::Concatenating => "concatenating",
            Self::Stitching => "stitching",
            Self::Publishing => "publishing",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// Progress notification emitted at every state transition.
///
/// Observation only: observers cannot pause or redirect the run, they
/// can only watch and cancel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductionProgress {
    /// State just entered
    pub state: ProductionState,
    /// Segment being worked on, for per-segment states
    pub segment_index: Option<usize>,
    /// Total segment count, once known
    pub total_segments: Option<usize>,
}

/// Callback invoked on each state transition
pub type ProgressCallback = Box<dyn Fn(&ProductionProgress) + Send + Sync>;

/// Result of a completed run
#[derive(Debug, Clone, PartialEq)]
pub struct ProductionOutcome {
    /// Persistent URL returned by the blob store
    pub url: String,
    /// Duration of the final track in seconds
    pub duration_secs: f64,
    /// Number of narrated segments
    pub segment_count: usize,
}

/// A failed run: the triggering error plus the state it struck in.
/// No partial output is exposed.
#[derive(Debug, Error)]
#[error("Production failed while {state}: {error}")]
pub struct ProductionFailure {
    /// The state the run was in when it failed
    pub state: ProductionState,
    /// The original, unmodified error
    #[source]
    pub error: ProductionError,
}

/// Top-level driver for one audiobook production run.
///
/// Owns its capability handles, codec, and mixer exclusively; no
/// process-wide mutable state, so independent instances can run
/// concurrently.
pub struct ProductionOrchestrator {
    pass: SegmentPass,
    store: Arc<dyn BlobStore>,
    options: MixOptions,
    codec: WavCodec,
    mixer: AudioMixer,
    estimator: TimingEstimator,
    progress: Option<ProgressCallback>,
    cancel: CancellationToken,
}

impl ProductionOrchestrator {
    pub fn new(
        classifier: Arc<dyn Classifier>,
        synthesizer: Arc<dyn Synthesizer>,
        catalog: Arc<dyn MusicCatalog>,
        store: Arc<dyn BlobStore>,
        options: MixOptions,
    ) -> Self {
        Self {
            pass: SegmentPass::new(classifier, synthesizer, catalog, options.clone()),
            store,
            options,
            codec: WavCodec::new(),
            mixer: AudioMixer::new(),
            estimator: TimingEstimator::new(),
            progress: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Attach a progress observer invoked at each state transition
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    /// Handle for cooperative cancellation of this run
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Produce a complete audiobook from raw text.
    ///
    /// The only output contract: a persistent URL on success, or the
    /// original error with its originating state on failure.
    pub async fn produce(
        &self,
        text: &str,
        logical_id: &str,
    ) -> Result<ProductionOutcome, ProductionFailure> {
        info!("Starting production run '{}'", logical_id);
        match self.run(text, logical_id).await {
            Ok(outcome) => {
                self.emit(ProductionState::Done, None, None);
                info!(
                    "Production '{}' done: {:.1}s across {} segments -> {}",
                    logical_id, outcome.duration_secs, outcome.segment_count, outcome.url
                );
                Ok(outcome)
            }
            Err((state, error)) => {
                warn!("Production '{}' failed while {}: {}", logical_id, state, error);
                self.emit(ProductionState::Failed, None, None);
                Err(ProductionFailure { state, error })
            }
        }
    }

    async fn run(
        &self,
        text: &str,
        logical_id: &str,
    ) -> Result<ProductionOutcome, (ProductionState, ProductionError)> {
        use ProductionState::*;

        // Segmenting
        self.emit(Segmenting, None, None);
        self.guard(Segmenting)?;
        let segments = split_into_segments(text).map_err(|e| (Segmenting, e))?;
        let total = segments.len();
        debug!("Identified {} paragraphs for processing", total);

        // Classifying: sequential, in segment order; classification APIs
        // are typically rate-limited and index association must hold
        let mut metadata = Vec::with_capacity(total);
        for segment in &segments {
            self.emit(Classifying, Some(segment.index), Some(total));
            self.guard(Classifying)?;
            metadata.push(
                self.pass
                    .classify(segment)
                    .await
                    .map_err(|e| (Classifying, e))?,
            );
        }

        // Synthesizing and mixing: any single failure aborts the run; a
        // missing segment would mean a silently truncated audiobook
        let mut processed: Vec<ProcessedSegment> = Vec::with_capacity(total);
        for (segment, meta) in segments.iter().zip(&metadata) {
            self.emit(SynthesizingAndMixing, Some(segment.index), Some(total));
            self.guard(SynthesizingAndMixing)?;
            processed.push(
                self.pass
                    .synthesize_and_mix(segment, meta, &self.cancel)
                    .await
                    .map_err(|e| (SynthesizingAndMixing, e))?,
            );
        }

        // Single segment: its mixed audio is the final track as-is
        let final_track = if total == 1 {
            self.emit(Stitching, None, None);
            processed
                .into_iter()
                .next()
                .map(|p| p.mixed)
                .ok_or((Stitching, ProductionError::EmptyInput))?
        } else {
            // Concatenating: narration-only timeline for duration
            // measurement. Mixed audio is not concatenated here; each
            // segment's background may differ and must be crossfaded at
            // the stitch, not hard-spliced.
            self.emit(Concatenating, None, None);
            self.guard(Concatenating)?;
            let narration_clips: Vec<AudioBuffer> =
                processed.iter().map(|p| p.narration.clone()).collect();
            let narration = self
                .mixer
                .concatenate(&narration_clips)
                .map_err(|e| (Concatenating, e.into()))?;

            self.emit(Stitching, None, None);
            self.guard(Stitching)?;
            self.stitch(&segments, &processed, narration)
                .await
                .map_err(|e| (Stitching, e))?
        };

        // Publishing: encode once, hand off once, no retry
        self.emit(Publishing, None, None);
        self.guard(Publishing)?;
        let encoded = self.codec.encode(&final_track);
        let url = self
            .store
            .put(&encoded, logical_id)
            .await
            .map_err(|e| (Publishing, ProductionError::StorageUnavailable(e)))?;

        Ok(ProductionOutcome {
            url,
            duration_secs: final_track.duration_secs(),
            segment_count: total,
        })
    }

    /// Build the final track: full concatenated narration overlaid on a
    /// background timeline that crossfades between consecutive
    /// paragraphs' tracks at each boundary.
    async fn stitch(
        &self,
        segments: &[TextSegment],
        processed: &[ProcessedSegment],
        narration: AudioBuffer,
    ) -> Result<AudioBuffer, ProductionError> {
        let moods: Vec<String> = processed.iter().map(|p| p.metadata.mood.clone()).collect();
        // Each clip was produced separately, so its decoded duration is
        // directly measurable; no proportional estimation needed here
        let durations: Vec<f64> = processed.iter().map(|p| p.narration.duration_secs()).collect();
        let timings = self
            .estimator
            .from_measured_durations(segments, &moods, &durations);

        let crossfade_frames =
            (self.options.crossfade_duration as f64 * narration.sample_rate as f64).round() as usize;

        let mut bed: Option<AudioBuffer> = None;
        let last = timings.len() - 1;
        for (i, timing) in timings.iter().enumerate() {
            let paragraph_frames = processed[i].narration.frames();
            // Every boundary consumes one crossfade window, so each
            // non-final bed piece carries that much extra tail
            let piece_frames = if i < last {
                paragraph_frames + crossfade_frames
            } else {
                paragraph_frames
            };

            let background = self.paragraph_background(timing).await?;
            let mut piece = self.mixer.loop_to_length(&background, piece_frames);
            self.mixer
                .scale_gain(&mut piece, self.options.background_volume);

            bed = Some(match bed {
                None => piece,
                Some(previous) => self.mixer.crossfade_mix(
                    &previous,
                    &piece,
                    self.options.crossfade_duration,
                )?,
            });
        }

        let bed = bed.ok_or(ProductionError::EmptyInput)?;
        // Rounding across boundaries can leave the bed a few frames off
        let bed = self.mixer.loop_to_length(&bed, narration.frames());
        Ok(self.mixer.overlay(&narration, &bed)?)
    }

    /// Resolve and decode the background for one paragraph, using the
    /// paragraph's own mood with the standard neutral fallback
    async fn paragraph_background(
        &self,
        timing: &ParagraphTiming,
    ) -> Result<AudioBuffer, ProductionError> {
        debug!(
            "Selecting background for paragraph {} ({:.1}s-{:.1}s, mood '{}')",
            timing.index, timing.start, timing.end, timing.mood
        );
        self.pass.fetch_background_for_mood(&timing.mood).await
    }

    fn emit(&self, state: ProductionState, segment_index: Option<usize>, total: Option<usize>) {
        if let Some(callback) = &self.progress {
            callback(&ProductionProgress {
                state,
                segment_index,
                total_segments: total,
            });
        }
    }

    /// Cooperative cancellation check between pipeline steps
    fn guard(&self, state: ProductionState) -> Result<(), (ProductionState, ProductionError)> {
        if self.cancel.is_cancelled() {
            Err((state, ProductionError::Cancelled))
        } else {
            Ok(())
        }
    }
}
