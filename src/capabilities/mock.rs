/*!
 * Mock capability implementations for testing.
 *
 * Each mock supports a behavior mode and counts its calls:
 * - `working()` - always succeeds
 * - `failing()` - always fails
 * - `fail_on(n)` - fails only for the nth call (0-based)
 *
 * A shared `CallRecorder` can be attached to several mocks to assert
 * cross-capability call ordering.
 */

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;

use crate::audio::AudioBuffer;
use crate::audio::codec::WavCodec;
use crate::capabilities::{BlobStore, Classifier, ContentMetadata, MusicCatalog, Synthesizer, Tempo};
use crate::errors::CapabilityError;
use crate::music::BackgroundTrack;

/// Sample rate used by all mock-generated audio
pub const MOCK_SAMPLE_RATE: u32 = 8000;

/// Records capability invocations in order across mocks
#[derive(Debug, Default, Clone)]
pub struct CallRecorder {
    calls: Arc<Mutex<Vec<String>>>,
}

impl CallRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().push(call.into());
    }

    /// Snapshot of all recorded calls in invocation order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

/// Failure behavior shared by the mocks
#[derive(Debug, Clone, Copy, PartialEq)]
enum MockBehavior {
    /// Always succeeds
    Working,
    /// Fails for the call with this 0-based sequence number
    FailOn(usize),
    /// Always fails
    Failing,
}

impl MockBehavior {
    fn check(&self, call_index: usize) -> Result<(), CapabilityError> {
        let should_fail = match self {
            MockBehavior::Working => false,
            MockBehavior::FailOn(n) => call_index == *n,
            MockBehavior::Failing => true,
        };
        if should_fail {
            Err(CapabilityError::RequestFailed(format!(
                "mock failure on call {}",
                call_index
            )))
        } else {
            Ok(())
        }
    }
}

/// Mock mood classifier cycling through a fixed mood list
#[derive(Debug)]
pub struct MockClassifier {
    moods: Vec<String>,
    behavior: MockBehavior,
    call_count: Arc<AtomicUsize>,
    recorder: Option<CallRecorder>,
}

impl MockClassifier {
    /// Always succeeds, cycling through the given moods per call
    pub fn working(moods: &[&str]) -> Self {
        Self {
            moods: moods.iter().map(|m| m.to_string()).collect(),
            behavior: MockBehavior::Working,
            call_count: Arc::new(AtomicUsize::new(0)),
            recorder: None,
        }
    }

    /// Always fails
    pub fn failing() -> Self {
        Self {
            moods: vec!["neutral".to_string()],
            behavior: MockBehavior::Failing,
            call_count: Arc::new(AtomicUsize::new(0)),
            recorder: None,
        }
    }

    /// Fails only for the nth classify call (0-based)
    pub fn fail_on(moods: &[&str], n: usize) -> Self {
        Self {
            behavior: MockBehavior::FailOn(n),
            ..Self::working(moods)
        }
    }

    /// Attach a shared call recorder
    pub fn with_recorder(mut self, recorder: CallRecorder) -> Self {
        self.recorder = Some(recorder);
        self
    }

    /// Number of classify calls made so far
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Classifier for MockClassifier {
    async fn classify(&self, _text: &str) -> Result<ContentMetadata, CapabilityError> {
        let index = self.call_count.fetch_add(1, Ordering::SeqCst);
        if let Some(recorder) = &self.recorder {
            recorder.record(format!("classify:{}", index));
        }
        self.behavior.check(index)?;

        let mood = self.moods[index % self.moods.len()].clone();
        Ok(ContentMetadata {
            mood,
            genre: "general".to_string(),
            intensity: 5,
            tempo: Tempo::Medium,
        })
    }
}

/// Mock synthesizer emitting real WAV bytes of a fixed duration
#[derive(Debug)]
pub struct MockSynthesizer {
    clip_seconds: f32,
    behavior: MockBehavior,
    call_count: Arc<AtomicUsize>,
    recorder: Option<CallRecorder>,
}

impl MockSynthesizer {
    /// Always succeeds with a clip of the given duration
    pub fn working(clip_seconds: f32) -> Self {
        Self {
            clip_seconds,
            behavior: MockBehavior::Working,
            call_count: Arc::new(AtomicUsize::new(0)),
            recorder: None,
        }
    }

    /// Always fails
    pub fn failing() -> Self {
        Self {
            behavior: MockBehavior::Failing,
            ..Self::working(1.0)
        }
    }

    /// Fails only for the nth synthesize call (0-based)
    pub fn fail_on(n: usize) -> Self {
        Self {
            behavior: MockBehavior::FailOn(n),
            ..Self::working(1.0)
        }
    }

    /// Attach a shared call recorder
    pub fn with_recorder(mut self, recorder: CallRecorder) -> Self {
        self.recorder = Some(recorder);
        self
    }

    /// Number of synthesize calls made so far
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Synthesizer for MockSynthesizer {
    async fn synthesize(&self, _text: &str) -> Result<Bytes, CapabilityError> {
        let index = self.call_count.fetch_add(1, Ordering::SeqCst);
        if let Some(recorder) = &self.recorder {
            recorder.record(format!("synthesize:{}", index));
        }
        self.behavior.check(index)?;

        Ok(mock_wav(self.clip_seconds, 0.4))
    }
}

/// Mock catalog over an in-memory track list; fetch returns a generated
/// WAV tone regardless of the track URL
#[derive(Debug)]
pub struct MockMusicCatalog {
    tracks: Vec<BackgroundTrack>,
    query_count: Arc<AtomicUsize>,
    fetch_count: Arc<AtomicUsize>,
    recorder: Option<CallRecorder>,
}

impl MockMusicCatalog {
    /// Catalog with no tracks at all
    pub fn empty() -> Self {
        Self {
            tracks: Vec::new(),
            query_count: Arc::new(AtomicUsize::new(0)),
            fetch_count: Arc::new(AtomicUsize::new(0)),
            recorder: None,
        }
    }

    /// Catalog with one track per given category
    pub fn with_categories(categories: &[&str]) -> Self {
        let mut catalog = Self::empty();
        for category in categories {
            catalog.add_track(BackgroundTrack {
                url: format!("mock://{}.wav", category),
                name: format!("{} theme", category),
                category: category.to_string(),
            });
        }
        catalog
    }

    /// Add a track to the catalog
    pub fn add_track(&mut self, track: BackgroundTrack) {
        self.tracks.push(track);
    }

    /// Attach a shared call recorder
    pub fn with_recorder(mut self, recorder: CallRecorder) -> Self {
        self.recorder = Some(recorder);
        self
    }

    /// Number of query calls made so far
    pub fn query_count(&self) -> usize {
        self.query_count.load(Ordering::SeqCst)
    }

    /// Number of fetch calls made so far
    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MusicCatalog for MockMusicCatalog {
    async fn query(&self, mood: &str) -> Vec<BackgroundTrack> {
        self.query_count.fetch_add(1, Ordering::SeqCst);
        if let Some(recorder) = &self.recorder {
            recorder.record(format!("query:{}", mood));
        }
        self.tracks
            .iter()
            .filter(|t| t.category.eq_ignore_ascii_case(mood))
            .cloned()
            .collect()
    }

    async fn fetch(&self, track: &BackgroundTrack) -> Result<Bytes, CapabilityError> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        if let Some(recorder) = &self.recorder {
            recorder.record(format!("fetch:{}", track.category));
        }
        Ok(mock_wav(2.0, 0.8))
    }
}

/// Mock blob store recording every put
#[derive(Debug)]
pub struct MockBlobStore {
    behavior: MockBehavior,
    puts: Mutex<Vec<(String, usize)>>,
    recorder: Option<CallRecorder>,
}

impl MockBlobStore {
    /// Always succeeds with a mock:// URL
    pub fn working() -> Self {
        Self {
            behavior: MockBehavior::Working,
            puts: Mutex::new(Vec::new()),
            recorder: None,
        }
    }

    /// Always fails
    pub fn failing() -> Self {
        Self {
            behavior: MockBehavior::Failing,
            ..Self::working()
        }
    }

    /// Attach a shared call recorder
    pub fn with_recorder(mut self, recorder: CallRecorder) -> Self {
        self.recorder = Some(recorder);
        self
    }

    /// (logical_id, byte length) of every put, in order
    pub fn puts(&self) -> Vec<(String, usize)> {
        self.puts.lock().clone()
    }
}

#[async_trait]
impl BlobStore for MockBlobStore {
    async fn put(&self, data: &[u8], logical_id: &str) -> Result<String, CapabilityError> {
        let index = self.puts.lock().len();
        if let Some(recorder) = &self.recorder {
            recorder.record(format!("put:{}", logical_id));
        }
        self.behavior.check(index)?;

        self.puts.lock().push((logical_id.to_string(), data.len()));
        Ok(format!("mock://{}", logical_id))
    }
}

/// Encode a constant-amplitude mono clip, long enough to exercise the
/// mixing paths without slowing tests down
pub fn mock_wav(seconds: f32, amplitude: f32) -> Bytes {
    let frames = (seconds * MOCK_SAMPLE_RATE as f32).round() as usize;
    let buffer = AudioBuffer::mono(vec![amplitude; frames], MOCK_SAMPLE_RATE);
    WavCodec::new().encode(&buffer)
}
