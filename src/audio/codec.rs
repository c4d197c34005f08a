/*!
 * WAV (linear PCM) encoding and decoding.
 *
 * Fixed wire format: uncompressed PCM, 16-bit signed little-endian,
 * interleaved by channel. Header fields are derived arithmetically from
 * the buffer's own channel count and sample rate, so mono and stereo
 * output both come out correct.
 */

use bytes::Bytes;

use crate::audio::AudioBuffer;
use crate::errors::AudioError;

const RIFF_TAG: &[u8; 4] = b"RIFF";
const WAVE_TAG: &[u8; 4] = b"WAVE";
const FMT_TAG: &[u8; 4] = b"fmt ";
const DATA_TAG: &[u8; 4] = b"data";

const HEADER_LEN: usize = 44;
const PCM_FORMAT: u16 = 1;
const BITS_PER_SAMPLE: u16 = 16;

/// Stateless WAV codec, constructed per production run
#[derive(Debug, Default, Clone)]
pub struct WavCodec;

impl WavCodec {
    pub fn new() -> Self {
        Self
    }

    /// Encode a decoded buffer into a WAV byte container.
    ///
    /// Samples outside [-1.0, 1.0] are clamped before quantization.
    /// Quantization follows two's-complement asymmetry: positive samples
    /// scale by 32767, negative by 32768. Always succeeds for a
    /// well-formed buffer.
    pub fn encode(&self, buffer: &AudioBuffer) -> Bytes {
        let channel_count = buffer.channel_count() as u16;
        let frames = buffer.frames();
        let bytes_per_frame = channel_count as u32 * 2;
        let data_len = frames as u32 * bytes_per_frame;

        let mut out = Vec::with_capacity(HEADER_LEN + data_len as usize);
        out.extend_from_slice(RIFF_TAG);
        out.extend_from_slice(&(36 + data_len).to_le_bytes());
        out.extend_from_slice(WAVE_TAG);

        out.extend_from_slice(FMT_TAG);
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&PCM_FORMAT.to_le_bytes());
        out.extend_from_slice(&channel_count.to_le_bytes());
        out.extend_from_slice(&buffer.sample_rate.to_le_bytes());
        out.extend_from_slice(&(buffer.sample_rate * bytes_per_frame).to_le_bytes());
        out.extend_from_slice(&(bytes_per_frame as u16).to_le_bytes());
        out.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());

        out.extend_from_slice(DATA_TAG);
        out.extend_from_slice(&data_len.to_le_bytes());

        for frame in 0..frames {
            for channel in &buffer.channels {
                out.extend_from_slice(&quantize(channel[frame]).to_le_bytes());
            }
        }

        Bytes::from(out)
    }

    /// Decode a WAV byte container back into a channel-major buffer.
    ///
    /// Fails with `MalformedContainer` if the header tags or declared
    /// lengths are inconsistent with the actual byte length.
    pub fn decode(&self, data: &[u8]) -> Result<AudioBuffer, AudioError> {
        if data.len() < HEADER_LEN {
            return Err(AudioError::MalformedContainer(format!(
                "container too short: {} bytes",
                data.len()
            )));
        }
        if &data[0..4] != RIFF_TAG {
            return Err(AudioError::MalformedContainer(
                "missing RIFF tag".to_string(),
            ));
        }
        if &data[8..12] != WAVE_TAG {
            return Err(AudioError::MalformedContainer(
                "missing WAVE tag".to_string(),
            ));
        }

        let declared_riff = read_u32(data, 4) as usize;
        if declared_riff + 8 > data.len() {
            return Err(AudioError::MalformedContainer(format!(
                "declared RIFF size {} exceeds container of {} bytes",
                declared_riff,
                data.len()
            )));
        }

        let format = self.parse_format(data)?;
        let (data_start, data_len) = find_chunk(data, DATA_TAG).ok_or_else(|| {
            AudioError::MalformedContainer("missing data chunk".to_string())
        })?;
        if data_start + data_len > data.len() {
            return Err(AudioError::MalformedContainer(format!(
                "declared data length {} exceeds container",
                data_len
            )));
        }

        let bytes_per_frame = format.channel_count as usize * 2;
        if data_len % bytes_per_frame != 0 {
            return Err(AudioError::MalformedContainer(format!(
                "data length {} is not a whole number of {}-byte frames",
                data_len, bytes_per_frame
            )));
        }

        let frames = data_len / bytes_per_frame;
        let mut channels = vec![Vec::with_capacity(frames); format.channel_count as usize];
        let payload = &data[data_start..data_start + data_len];

        for frame in 0..frames {
            for (ch, samples) in channels.iter_mut().enumerate() {
                let offset = frame * bytes_per_frame + ch * 2;
                let raw = i16::from_le_bytes([payload[offset], payload[offset + 1]]);
                samples.push(dequantize(raw));
            }
        }

        Ok(AudioBuffer {
            channels,
            sample_rate: format.sample_rate,
        })
    }

    fn parse_format(&self, data: &[u8]) -> Result<WavFormat, AudioError> {
        let (fmt_start, fmt_len) = find_chunk(data, FMT_TAG).ok_or_else(|| {
            AudioError::MalformedContainer("missing fmt chunk".to_string())
        })?;
        if fmt_len < 16 || fmt_start + fmt_len > data.len() {
            return Err(AudioError::MalformedContainer(format!(
                "fmt chunk of {} bytes is too short",
                fmt_len
            )));
        }

        let audio_format = read_u16(data, fmt_start);
        if audio_format != PCM_FORMAT {
            return Err(AudioError::MalformedContainer(format!(
                "unsupported audio format {} (expected PCM)",
                audio_format
            )));
        }

        let channel_count = read_u16(data, fmt_start + 2);
        if channel_count == 0 {
            return Err(AudioError::MalformedContainer(
                "zero channels declared".to_string(),
            ));
        }

        let bits = read_u16(data, fmt_start + 14);
        if bits != BITS_PER_SAMPLE {
            return Err(AudioError::MalformedContainer(format!(
                "unsupported bit depth {} (expected 16)",
                bits
            )));
        }

        Ok(WavFormat {
            channel_count,
            sample_rate: read_u32(data, fmt_start + 4),
        })
    }
}

#[derive(Debug)]
struct WavFormat {
    channel_count: u16,
    sample_rate: u32,
}

/// Clamp to [-1, 1] and quantize with two's-complement asymmetry
fn quantize(sample: f32) -> i16 {
    let clamped = sample.clamp(-1.0, 1.0);
    if clamped < 0.0 {
        (clamped * 32768.0).round() as i16
    } else {
        (clamped * 32767.0).round() as i16
    }
}

/// Inverse of `quantize`
fn dequantize(raw: i16) -> f32 {
    if raw < 0 {
        raw as f32 / 32768.0
    } else {
        raw as f32 / 32767.0
    }
}

/// Walk the RIFF chunk list for a chunk id, returning (payload offset, length)
fn find_chunk(data: &[u8], tag: &[u8; 4]) -> Option<(usize, usize)> {
    let mut cursor = 12;
    while cursor + 8 <= data.len() {
        let chunk_len = read_u32(data, cursor + 4) as usize;
        if &data[cursor..cursor + 4] == tag {
            return Some((cursor + 8, chunk_len));
        }
        // Chunks are word-aligned
        cursor += 8 + chunk_len + (chunk_len % 2);
    }
    None
}

fn read_u16(data: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([data[offset], data[offset + 1]])
}

fn read_u32(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}
