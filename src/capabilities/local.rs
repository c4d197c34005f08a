/*!
 * Local collaborator implementations for running outside a hosted stack:
 * a manifest-backed music catalog and a filesystem blob store.
 *
 * The catalog manifest is a JSON array of tracks:
 * `[{"url": "...", "name": "...", "category": "calm"}, ...]`
 * Track URLs may be http(s) or local file paths.
 */

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use log::{debug, warn};
use reqwest::Client;

use crate::capabilities::{BlobStore, MusicCatalog};
use crate::errors::CapabilityError;
use crate::music::BackgroundTrack;

/// Music catalog loaded from a JSON manifest file
#[derive(Debug)]
pub struct JsonMusicCatalog {
    tracks: Vec<BackgroundTrack>,
    client: Client,
}

impl JsonMusicCatalog {
    /// Load the catalog from a manifest file
    pub async fn load(manifest_path: impl AsRef<Path>) -> Result<Self, CapabilityError> {
        let raw = tokio::fs::read_to_string(manifest_path.as_ref()).await?;
        let tracks: Vec<BackgroundTrack> = serde_json::from_str(&raw)
            .map_err(|e| CapabilityError::ParseError(format!("manifest invalid: {}", e)))?;

        debug!("Loaded music manifest with {} tracks", tracks.len());
        Ok(Self::from_tracks(tracks))
    }

    /// Build a catalog directly from tracks
    pub fn from_tracks(tracks: Vec<BackgroundTrack>) -> Self {
        Self {
            tracks,
            client: Client::builder()
                .timeout(Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
        }
    }

    /// Number of tracks in the catalog
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// True when the manifest contained no tracks
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

#[async_trait]
impl MusicCatalog for JsonMusicCatalog {
    async fn query(&self, mood: &str) -> Vec<BackgroundTrack> {
        self.tracks
            .iter()
            .filter(|t| t.category.eq_ignore_ascii_case(mood))
            .cloned()
            .collect()
    }

    async fn fetch(&self, track: &BackgroundTrack) -> Result<Bytes, CapabilityError> {
        if track.url.starts_with("http://") || track.url.starts_with("https://") {
            let response = self
                .client
                .get(&track.url)
                .send()
                .await
                .map_err(|e| CapabilityError::ConnectionError(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                warn!("Track fetch failed for '{}': {}", track.name, status);
                return Err(CapabilityError::ApiError {
                    status_code: status.as_u16(),
                    message: format!("fetching track '{}'", track.name),
                });
            }

            return response
                .bytes()
                .await
                .map_err(|e| CapabilityError::RequestFailed(e.to_string()));
        }

        let path = track.url.strip_prefix("file://").unwrap_or(&track.url);
        let data = tokio::fs::read(path).await?;
        Ok(Bytes::from(data))
    }
}

/// Blob store that writes into a local directory and returns file:// URLs
#[derive(Debug)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn put(&self, data: &[u8], logical_id: &str) -> Result<String, CapabilityError> {
        tokio::fs::create_dir_all(&self.root).await?;

        let path = self.root.join(format!("{}.wav", logical_id));
        tokio::fs::write(&path, data).await?;

        let absolute = path
            .canonicalize()
            .map_err(|e| CapabilityError::Io(e.to_string()))?;
        debug!("Stored {} bytes at {}", data.len(), absolute.display());
        Ok(format!("file://{}", absolute.display()))
    }
}
