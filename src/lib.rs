/*!
 * # Bookwave - AI-assisted audiobook production
 *
 * A Rust library for turning plain text into narrated audiobooks with
 * mood-matched background music.
 *
 * ## Features
 *
 * - Split text into paragraph segments on blank-line boundaries
 * - Classify each paragraph's emotional mood via an AI capability
 * - Synthesize narration per paragraph with AI speech synthesis
 * - Select background music by mood, with a neutral fallback
 * - Mix narration over scaled background music
 * - Crossfade backgrounds at paragraph boundaries in the final track
 * - Publish the finished audiobook through a pluggable blob store
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `segmenter`: Paragraph segmentation of input text
 * - `timing`: Paragraph timing measurement and estimation
 * - `audio`: PCM buffers, WAV codec and mixing primitives:
 *   - `audio::codec`: WAV encoding and decoding
 *   - `audio::mixer`: Gain, crossfade, concatenation, overlay
 * - `music`: Mood-keyed background track resolution
 * - `capabilities`: External capability traits and implementations:
 *   - `capabilities::openai`: OpenAI classification and speech clients
 *   - `capabilities::local`: Manifest catalog and filesystem blob store
 *   - `capabilities::mock`: Test doubles with scriptable failures
 * - `pipeline`: Per-segment pass and the production orchestrator
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod audio;
pub mod capabilities;
pub mod errors;
pub mod music;
pub mod pipeline;
pub mod segmenter;
pub mod timing;

// Re-export main types for easier usage
pub use app_config::Config;
pub use audio::AudioBuffer;
pub use audio::codec::WavCodec;
pub use audio::mixer::{AudioMixer, MixOptions};
pub use capabilities::{BlobStore, Classifier, ContentMetadata, MusicCatalog, Synthesizer, Tempo};
pub use errors::{AudioError, CapabilityError, ProductionError};
pub use music::{BackgroundTrack, MoodResolver};
pub use pipeline::{
    CancellationToken, ProductionFailure, ProductionOrchestrator, ProductionOutcome,
    ProductionProgress, ProductionState,
};
pub use segmenter::{split_into_segments, TextSegment};
pub use timing::{ParagraphTiming, TimingEstimator};
