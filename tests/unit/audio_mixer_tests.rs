/*!
 * Tests for mixing primitives used by the final stitch
 */

use bookwave::audio::AudioBuffer;
use bookwave::audio::mixer::{AudioMixer, MixOptions};

fn constant(value: f32, frames: usize) -> AudioBuffer {
    AudioBuffer::mono(vec![value; frames], 1000)
}

/// Test folding three backgrounds with crossfades, the shape the stitch
/// produces for a three-paragraph book
#[test]
fn test_crossfadeMix_chainedThreeBuffers_shouldConsumeOneOverlapPerBoundary() {
    let mixer = AudioMixer::new();
    let first = constant(0.9, 3000);
    let second = constant(0.6, 4000);
    let third = constant(0.3, 2000);

    // 1 second at 1000 Hz = 1000 overlap frames per boundary
    let folded = mixer.crossfade_mix(&first, &second, 1.0).unwrap();
    let folded = mixer.crossfade_mix(&folded, &third, 1.0).unwrap();

    assert_eq!(folded.frames(), 3000 + 4000 + 2000 - 2 * 1000);
    // Plateaus outside the fades keep their source levels
    assert!((folded.channels[0][500] - 0.9).abs() < 1e-6);
    assert!((folded.channels[0][4000] - 0.6).abs() < 1e-6);
    assert!((folded.channels[0][6500] - 0.3).abs() < 1e-6);
}

/// Test that a zero-length crossfade degenerates into a plain append
#[test]
fn test_crossfadeMix_zeroDuration_shouldAppend() {
    let mixer = AudioMixer::new();
    let a = constant(1.0, 100);
    let b = constant(0.0, 200);

    let mixed = mixer.crossfade_mix(&a, &b, 0.0).unwrap();

    assert_eq!(mixed.frames(), 300);
    assert!((mixed.channels[0][99] - 1.0).abs() < 1e-6);
    assert_eq!(mixed.channels[0][100], 0.0);
}

/// Test crossfading buffers with different channel layouts
#[test]
fn test_crossfadeMix_monoIntoStereo_shouldFanOutMono() {
    let mixer = AudioMixer::new();
    let mono = constant(0.8, 2000);
    let stereo = AudioBuffer::new(vec![vec![0.2; 2000], vec![0.4; 2000]], 1000);

    let mixed = mixer.crossfade_mix(&mono, &stereo, 1.0).unwrap();

    assert_eq!(mixed.channel_count(), 2);
    assert_eq!(mixed.frames(), 2000 + 2000 - 1000);
    // Before the fade, both channels carry the fanned-out mono signal
    assert!((mixed.channels[0][500] - 0.8).abs() < 1e-6);
    assert!((mixed.channels[1][500] - 0.8).abs() < 1e-6);
}

/// Test looping an empty buffer, which must yield silence of the target
/// length rather than spinning forever
#[test]
fn test_loopToLength_emptyBuffer_shouldYieldSilence() {
    let mixer = AudioMixer::new();
    let empty = AudioBuffer::mono(Vec::new(), 1000);

    let looped = mixer.loop_to_length(&empty, 500);

    assert_eq!(looped.frames(), 500);
    assert!(looped.channels[0].iter().all(|s| *s == 0.0));
}

/// Test the full per-segment mix against hand-computed sample values
#[test]
fn test_mixWithBackground_customVolume_shouldUseConfiguredGain() {
    let mixer = AudioMixer::new();
    let narration = constant(0.4, 600);
    let background = constant(1.0, 250);
    let options = MixOptions {
        background_volume: 0.5,
        crossfade_duration: 3.0,
    };

    let mixed = mixer
        .mix_with_background(&narration, &background, &options)
        .unwrap();

    assert_eq!(mixed.frames(), 600);
    assert!(mixed.channels[0].iter().all(|s| (s - 0.9).abs() < 1e-6));
}

/// Test that summed overlay output may exceed full scale before encoding
#[test]
fn test_overlay_hotSignals_shouldNotClampSum() {
    let mixer = AudioMixer::new();
    let narration = constant(0.9, 100);
    let background = constant(0.9, 100);

    let mixed = mixer.overlay(&narration, &background).unwrap();

    assert!((mixed.channels[0][0] - 1.8).abs() < 1e-6);
}
