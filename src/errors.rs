/*!
 * Error types for the bookwave production core.
 *
 * This module contains custom error types for different parts of the
 * pipeline, using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when calling an external capability
/// (classification, speech synthesis, music catalog, blob storage)
#[derive(Error, Debug)]
pub enum CapabilityError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error reading or writing a local resource
    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for CapabilityError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

/// Errors that can occur while operating on decoded audio buffers
#[derive(Error, Debug)]
pub enum AudioError {
    /// The byte container's header tag or declared lengths are inconsistent
    /// with the actual data
    #[error("Malformed audio container: {0}")]
    MalformedContainer(String),

    /// An operation that needs at least one buffer was given none
    #[error("No audio buffers provided")]
    EmptyInput,

    /// Buffers with different sample rates cannot be combined
    #[error("Sample rate mismatch: {0} Hz vs {1} Hz")]
    SampleRateMismatch(u32, u32),
}

/// Errors that terminate a production run.
///
/// Every variant is fatal: nothing in the core retries or silently
/// downgrades. The mood fallback in `MoodResolver` is a design fallback
/// on catalog miss, not error recovery.
#[derive(Error, Debug)]
pub enum ProductionError {
    /// Segmentation produced zero narratable paragraphs
    #[error("No narratable text: segmentation produced zero paragraphs")]
    EmptyInput,

    /// Error from audio decoding, mixing, or concatenation
    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),

    /// The classification capability failed for a segment
    #[error("Classification unavailable for segment {segment_index}: {source}")]
    ClassificationUnavailable {
        /// Index of the segment being classified
        segment_index: usize,
        /// The underlying capability error
        #[source]
        source: CapabilityError,
    },

    /// The speech synthesis capability failed for a segment
    #[error("Speech synthesis unavailable for segment {segment_index}: {source}")]
    SynthesisUnavailable {
        /// Index of the segment being synthesized
        segment_index: usize,
        /// The underlying capability error
        #[source]
        source: CapabilityError,
    },

    /// The music catalog has no track even for the fallback mood
    #[error("No background track available for mood '{mood}'")]
    NoBackgroundAvailable {
        /// The mood that was requested before falling back
        mood: String,
    },

    /// The blob store rejected the final encoded track
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[source] CapabilityError),

    /// The run was cancelled cooperatively between pipeline steps
    #[error("Production run cancelled")]
    Cancelled,
}
