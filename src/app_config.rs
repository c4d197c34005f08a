use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// OpenAI-backed classification and narration settings
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Mixing and production settings
    #[serde(default)]
    pub production: ProductionConfig,

    /// Path to the background-music manifest (JSON array of tracks)
    #[serde(default = "default_music_manifest")]
    pub music_manifest: String,

    /// Directory where finished audiobooks are written
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// OpenAI service configuration, shared by the classifier and synthesizer
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OpenAiConfig {
    /// API key for the service
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Service endpoint URL (optional, for Azure OpenAI or self-hosted)
    #[serde(default = "default_openai_endpoint")]
    pub endpoint: String,

    /// Classification model name
    #[serde(default = "default_classify_model")]
    pub classify_model: String,

    /// Speech synthesis model name
    #[serde(default = "default_speech_model")]
    pub speech_model: String,

    /// Narration voice identifier
    #[serde(default = "default_voice")]
    pub voice: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: default_openai_endpoint(),
            classify_model: default_classify_model(),
            speech_model: default_speech_model(),
            voice: default_voice(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Production settings controlling the final mix
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProductionConfig {
    /// Background music gain relative to full scale (0.0 to 1.0)
    #[serde(default = "default_background_volume")]
    pub background_volume: f32,

    /// Crossfade window at paragraph boundaries, in seconds
    #[serde(default = "default_crossfade_duration")]
    pub crossfade_duration: f32,
}

impl Default for ProductionConfig {
    fn default() -> Self {
        Self {
            background_volume: default_background_volume(),
            crossfade_duration: default_crossfade_duration(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_openai_endpoint() -> String {
    "https://api.openai.com".to_string()
}

fn default_classify_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_speech_model() -> String {
    "gpt-4o-mini-tts".to_string()
}

fn default_voice() -> String {
    "alloy".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_background_volume() -> f32 {
    0.2
}

fn default_crossfade_duration() -> f32 {
    3.0
}

fn default_music_manifest() -> String {
    "music.json".to_string()
}

fn default_output_dir() -> String {
    "output".to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.openai.api_key.is_empty() {
            return Err(anyhow!("OpenAI API key is required"));
        }

        if !(0.0..=1.0).contains(&self.production.background_volume) {
            return Err(anyhow!(
                "background_volume must be between 0.0 and 1.0, got {}",
                self.production.background_volume
            ));
        }

        if self.production.crossfade_duration < 0.0 {
            return Err(anyhow!(
                "crossfade_duration must not be negative, got {}",
                self.production.crossfade_duration
            ));
        }

        if self.music_manifest.is_empty() {
            return Err(anyhow!("music_manifest path is required"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            openai: OpenAiConfig::default(),
            production: ProductionConfig::default(),
            music_manifest: default_music_manifest(),
            output_dir: default_output_dir(),
            log_level: LogLevel::default(),
        }
    }
}
