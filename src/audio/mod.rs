/*!
 * In-memory audio processing.
 *
 * All mixing and encoding operates on a decoded channel-major buffer of
 * f32 samples. External formats only exist at the codec boundary:
 * - `codec`: WAV (linear PCM) encode/decode
 * - `mixer`: gain scaling, crossfade blending, concatenation, overlay
 */

pub mod codec;
pub mod mixer;

/// Decoded multi-channel audio.
///
/// Samples are channel-major (`channels[ch][frame]`), nominally in
/// [-1.0, 1.0]. Values may exceed that range mid-pipeline (after gain or
/// summing); clamping happens once, at encode time.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    /// One sample vec per channel, all the same length
    pub channels: Vec<Vec<f32>>,
    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl AudioBuffer {
    /// Create a buffer from channel-major samples.
    ///
    /// All channels must have the same length; shorter channels are
    /// zero-padded to the longest so the invariant holds.
    pub fn new(mut channels: Vec<Vec<f32>>, sample_rate: u32) -> Self {
        let frames = channels.iter().map(|c| c.len()).max().unwrap_or(0);
        for channel in &mut channels {
            channel.resize(frames, 0.0);
        }
        Self {
            channels,
            sample_rate,
        }
    }

    /// Create a single-channel buffer
    pub fn mono(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            channels: vec![samples],
            sample_rate,
        }
    }

    /// Create a silent buffer with the given shape
    pub fn silence(channel_count: usize, frames: usize, sample_rate: u32) -> Self {
        Self {
            channels: vec![vec![0.0; frames]; channel_count],
            sample_rate,
        }
    }

    /// Number of channels
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Number of frames (samples per channel)
    pub fn frames(&self) -> usize {
        self.channels.first().map_or(0, |c| c.len())
    }

    /// True if the buffer holds no samples
    pub fn is_empty(&self) -> bool {
        self.frames() == 0
    }

    /// Duration in seconds
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / self.sample_rate as f64
    }
}
