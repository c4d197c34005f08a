/*!
 * Buffer mixing: gain scaling, crossfade blending, concatenation, and
 * narration/background overlay.
 *
 * Everything here is synchronous CPU work on decoded buffers. Results are
 * intentionally left unclamped; the codec clamps once at encode time.
 */

use crate::audio::AudioBuffer;
use crate::errors::AudioError;

/// Fixed mixing parameters for one production run
#[derive(Debug, Clone)]
pub struct MixOptions {
    /// Background music gain relative to full scale (0.2 = 20%)
    pub background_volume: f32,
    /// Crossfade window in seconds at segment background transitions
    pub crossfade_duration: f32,
}

impl Default for MixOptions {
    fn default() -> Self {
        Self {
            background_volume: 0.2,
            crossfade_duration: 3.0,
        }
    }
}

/// Stateless mixer, constructed per production run
#[derive(Debug, Default, Clone)]
pub struct AudioMixer;

impl AudioMixer {
    pub fn new() -> Self {
        Self
    }

    /// Multiply every sample by `factor`. Out-of-range results stay
    /// unclamped until encode time.
    pub fn scale_gain(&self, buffer: &mut AudioBuffer, factor: f32) {
        for channel in &mut buffer.channels {
            for sample in channel.iter_mut() {
                *sample *= factor;
            }
        }
    }

    /// Linear crossfade between the tail of `a` and the head of `b`.
    ///
    /// Output length is `a.frames() + b.frames() - overlap`, where the
    /// overlap is `duration_secs` worth of frames, clamped to the shorter
    /// buffer. Within the overlap, sample i blends as
    /// `a[i]*(1 - i/N) + b[i]*(i/N)`.
    pub fn crossfade_mix(
        &self,
        a: &AudioBuffer,
        b: &AudioBuffer,
        duration_secs: f32,
    ) -> Result<AudioBuffer, AudioError> {
        if a.sample_rate != b.sample_rate {
            return Err(AudioError::SampleRateMismatch(a.sample_rate, b.sample_rate));
        }

        let channel_count = a.channel_count().max(b.channel_count());
        let a = conform_channels(a, channel_count);
        let b = conform_channels(b, channel_count);

        let requested = (duration_secs as f64 * a.sample_rate as f64).round() as usize;
        let overlap = requested.min(a.frames()).min(b.frames());
        let total = a.frames() + b.frames() - overlap;
        let fade_start = a.frames() - overlap;

        let mut channels = Vec::with_capacity(channel_count);
        for ch in 0..channel_count {
            let mut samples = Vec::with_capacity(total);
            samples.extend_from_slice(&a.channels[ch][..fade_start]);
            for i in 0..overlap {
                let t = i as f32 / overlap as f32;
                samples.push(a.channels[ch][fade_start + i] * (1.0 - t) + b.channels[ch][i] * t);
            }
            samples.extend_from_slice(&b.channels[ch][overlap..]);
            channels.push(samples);
        }

        Ok(AudioBuffer {
            channels,
            sample_rate: a.sample_rate,
        })
    }

    /// Gapless sequential append.
    ///
    /// Fails with `EmptyInput` for zero buffers; a single buffer is
    /// returned unchanged. Used for the narration-only timeline during
    /// timing measurement, never for background transitions.
    pub fn concatenate(&self, buffers: &[AudioBuffer]) -> Result<AudioBuffer, AudioError> {
        let first = buffers.first().ok_or(AudioError::EmptyInput)?;
        if buffers.len() == 1 {
            return Ok(first.clone());
        }

        let sample_rate = first.sample_rate;
        let channel_count = buffers.iter().map(|b| b.channel_count()).max().unwrap_or(1);
        let total: usize = buffers.iter().map(|b| b.frames()).sum();

        let mut channels = vec![Vec::with_capacity(total); channel_count];
        for buffer in buffers {
            if buffer.sample_rate != sample_rate {
                return Err(AudioError::SampleRateMismatch(sample_rate, buffer.sample_rate));
            }
            let conformed = conform_channels(buffer, channel_count);
            for (ch, samples) in channels.iter_mut().enumerate() {
                samples.extend_from_slice(&conformed.channels[ch]);
            }
        }

        Ok(AudioBuffer {
            channels,
            sample_rate,
        })
    }

    /// Loop (repeat from start) or truncate `buffer` to exactly `frames`
    pub fn loop_to_length(&self, buffer: &AudioBuffer, frames: usize) -> AudioBuffer {
        if buffer.is_empty() {
            return AudioBuffer::silence(buffer.channel_count().max(1), frames, buffer.sample_rate);
        }

        let mut channels = Vec::with_capacity(buffer.channel_count());
        for source in &buffer.channels {
            let mut samples = Vec::with_capacity(frames);
            while samples.len() < frames {
                let take = (frames - samples.len()).min(source.len());
                samples.extend_from_slice(&source[..take]);
            }
            channels.push(samples);
        }

        AudioBuffer {
            channels,
            sample_rate: buffer.sample_rate,
        }
    }

    /// Sample-wise add of `background` under `narration`, keeping the
    /// narration's length. The background must already be length-matched.
    pub fn overlay(
        &self,
        narration: &AudioBuffer,
        background: &AudioBuffer,
    ) -> Result<AudioBuffer, AudioError> {
        if narration.sample_rate != background.sample_rate {
            return Err(AudioError::SampleRateMismatch(
                narration.sample_rate,
                background.sample_rate,
            ));
        }

        let channel_count = narration.channel_count().max(background.channel_count());
        let narration = conform_channels(narration, channel_count);
        let background = conform_channels(background, channel_count);
        let frames = narration.frames();

        let mut channels = Vec::with_capacity(channel_count);
        for ch in 0..channel_count {
            let mut samples = narration.channels[ch].clone();
            for (i, sample) in samples.iter_mut().enumerate().take(frames) {
                if let Some(bg) = background.channels[ch].get(i) {
                    *sample += bg;
                }
            }
            channels.push(samples);
        }

        Ok(AudioBuffer {
            channels,
            sample_rate: narration.sample_rate,
        })
    }

    /// Combine one narration clip with its background track.
    ///
    /// The background is looped or truncated to the narration's exact
    /// length (it must never leave silence while narration plays), scaled
    /// by `background_volume`, then sample-added under the narration.
    /// Crossfading only happens between segments' backgrounds during the
    /// final stitch, never inside this overlay.
    pub fn mix_with_background(
        &self,
        narration: &AudioBuffer,
        background: &AudioBuffer,
        options: &MixOptions,
    ) -> Result<AudioBuffer, AudioError> {
        if narration.sample_rate != background.sample_rate {
            return Err(AudioError::SampleRateMismatch(
                narration.sample_rate,
                background.sample_rate,
            ));
        }

        let mut bed = self.loop_to_length(background, narration.frames());
        self.scale_gain(&mut bed, options.background_volume);
        self.overlay(narration, &bed)
    }
}

/// Adapt a buffer to `target` channels: mono fans out, multi-channel mixes
/// down to mono by averaging, anything else pads with silent channels.
fn conform_channels(buffer: &AudioBuffer, target: usize) -> AudioBuffer {
    let current = buffer.channel_count();
    if current == target {
        return buffer.clone();
    }

    let channels = if current == 1 {
        vec![buffer.channels[0].clone(); target]
    } else if target == 1 {
        let frames = buffer.frames();
        let scale = 1.0 / current as f32;
        let mut mixed = vec![0.0f32; frames];
        for channel in &buffer.channels {
            for (acc, sample) in mixed.iter_mut().zip(channel) {
                *acc += sample * scale;
            }
        }
        vec![mixed]
    } else {
        let mut channels = buffer.channels.clone();
        channels.resize(target, vec![0.0; buffer.frames()]);
        channels.truncate(target);
        channels
    };

    AudioBuffer {
        channels,
        sample_rate: buffer.sample_rate,
    }
}
