use anyhow::{Context, Result};
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

use crate::app_config::Config;
use crate::audio::mixer::MixOptions;
use crate::capabilities::local::{FsBlobStore, JsonMusicCatalog};
use crate::capabilities::openai::{OpenAiClassifier, OpenAiSynthesizer};
use crate::pipeline::orchestrator::{ProductionOutcome, ProductionOrchestrator, ProgressCallback};

// @module: Application controller for audiobook production

/// Main application controller wiring configuration into a production run
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self { config })
    }

    /// Check if the controller is properly initialized with configuration
    pub fn is_initialized(&self) -> bool {
        !self.config.openai.api_key.is_empty()
    }

    /// Produce an audiobook from the given text file.
    ///
    /// The output name defaults to the input file stem, or a random id
    /// when none is usable.
    pub async fn run(
        &self,
        input_file: PathBuf,
        progress: Option<ProgressCallback>,
    ) -> Result<ProductionOutcome> {
        if !input_file.exists() {
            return Err(anyhow::anyhow!("Input file does not exist: {:?}", input_file));
        }

        let text = tokio::fs::read_to_string(&input_file)
            .await
            .context(format!("Failed to read input file: {:?}", input_file))?;

        let logical_id = Self::logical_id_for(&input_file);
        info!("Producing audiobook '{}' from {:?}", logical_id, input_file);

        let orchestrator = self.build_orchestrator(progress).await?;
        let outcome = orchestrator.produce(&text, &logical_id).await?;
        Ok(outcome)
    }

    /// Assemble the orchestrator from configured capabilities
    async fn build_orchestrator(
        &self,
        progress: Option<ProgressCallback>,
    ) -> Result<ProductionOrchestrator> {
        let openai = &self.config.openai;
        let classifier = Arc::new(OpenAiClassifier::new(
            openai.api_key.clone(),
            openai.endpoint.clone(),
            openai.classify_model.clone(),
            openai.timeout_secs,
        ));
        let synthesizer = Arc::new(OpenAiSynthesizer::new(
            openai.api_key.clone(),
            openai.endpoint.clone(),
            openai.speech_model.clone(),
            openai.voice.clone(),
            openai.timeout_secs,
        ));

        let catalog = JsonMusicCatalog::load(&self.config.music_manifest)
            .await
            .context(format!(
                "Failed to load music manifest: {}",
                self.config.music_manifest
            ))?;
        debug!("Music catalog ready with {} tracks", catalog.len());

        let store = Arc::new(FsBlobStore::new(&self.config.output_dir));

        let options = MixOptions {
            background_volume: self.config.production.background_volume,
            crossfade_duration: self.config.production.crossfade_duration,
        };

        let mut orchestrator = ProductionOrchestrator::new(
            classifier,
            synthesizer,
            Arc::new(catalog),
            store,
            options,
        );
        if let Some(callback) = progress {
            orchestrator = orchestrator.with_progress(callback);
        }
        Ok(orchestrator)
    }

    fn logical_id_for(input_file: &Path) -> String {
        input_file
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .filter(|stem| !stem.is_empty())
            .unwrap_or_else(|| format!("audiobook_{}", Uuid::new_v4()))
    }
}
