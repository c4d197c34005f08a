use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use log::error;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::capabilities::{Classifier, ContentMetadata, Synthesizer};
use crate::errors::CapabilityError;

/// Default public API endpoint
const DEFAULT_ENDPOINT: &str = "https://api.openai.com";

/// Classification prompts cap the analyzed text to avoid token limits
const MAX_CLASSIFY_CHARS: usize = 8000;

const CLASSIFY_SYSTEM_PROMPT: &str = "You are an expert content analyzer that extracts \
emotional metadata from text. Analyze the provided content and extract the following \
information:\n\
- mood: The primary emotional tone (e.g., suspense, happy, sad, thriller, romantic)\n\
- genre: The content genre (e.g., mystery, romance, adventure, sci-fi)\n\
- intensity: A number from 1-10 representing emotional intensity (1=calm, 10=intense)\n\
- tempo: The appropriate pace for narration (slow, medium, fast)\n\
Return ONLY a JSON object with these fields, no additional text.";

const NARRATION_INSTRUCTIONS: &str = "You are a professional storyteller narrating a \
story. Read the following text as if you are narrating it aloud in a calm, engaging, \
and natural voice. Speak slowly and clearly, with natural pauses between sentences and \
paragraphs. Include natural emphasis on important words to make the story engaging. \
Vary the intonation to make the narration expressive, not monotone. Keep the pace \
steady and comfortable, as if telling the story aloud in person. Avoid robotic or \
overly formal speech.";

/// OpenAI chat-completions backed mood classifier
#[derive(Debug)]
pub struct OpenAiClassifier {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API endpoint URL (optional, defaults to public API)
    endpoint: String,
    /// Chat model used for analysis
    model: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

impl OpenAiClassifier {
    /// Create a new classifier client
    pub fn new(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        timeout_secs: u64,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: resolve_endpoint(endpoint.into()),
            model: model.into(),
        }
    }
}

#[async_trait]
impl Classifier for OpenAiClassifier {
    async fn classify(&self, text: &str) -> Result<ContentMetadata, CapabilityError> {
        let truncated: String = text.chars().take(MAX_CLASSIFY_CHARS).collect();
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: CLASSIFY_SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: format!("Analyze this content: {}", truncated),
                },
            ],
            // Lower temperature for more consistent results
            temperature: 0.3,
            max_tokens: 1000,
            response_format: ResponseFormat {
                format_type: "json_object".to_string(),
            },
        };

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.endpoint))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| CapabilityError::ConnectionError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Classification API error ({}): {}", status, message);
            return Err(CapabilityError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| CapabilityError::ParseError(e.to_string()))?;

        let content = chat
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or_else(|| {
                CapabilityError::ParseError("response contained no choices".to_string())
            })?;

        let metadata: ContentMetadata = serde_json::from_str(content).map_err(|e| {
            CapabilityError::ParseError(format!("metadata JSON invalid: {}", e))
        })?;

        Ok(metadata.normalized())
    }
}

/// OpenAI speech endpoint backed narration synthesizer
#[derive(Debug)]
pub struct OpenAiSynthesizer {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API endpoint URL (optional, defaults to public API)
    endpoint: String,
    /// TTS model
    model: String,
    /// Narration voice
    voice: String,
}

#[derive(Debug, Serialize)]
struct SpeechRequest {
    model: String,
    input: String,
    instructions: String,
    voice: String,
    response_format: String,
}

impl OpenAiSynthesizer {
    /// Create a new synthesizer client
    pub fn new(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        voice: impl Into<String>,
        timeout_secs: u64,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: resolve_endpoint(endpoint.into()),
            model: model.into(),
            voice: voice.into(),
        }
    }
}

#[async_trait]
impl Synthesizer for OpenAiSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<Bytes, CapabilityError> {
        let request = SpeechRequest {
            model: self.model.clone(),
            input: text.to_string(),
            instructions: NARRATION_INSTRUCTIONS.to_string(),
            voice: self.voice.clone(),
            // The mixing pipeline works on linear PCM, so ask for WAV
            response_format: "wav".to_string(),
        };

        let response = self
            .client
            .post(format!("{}/v1/audio/speech", self.endpoint))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| CapabilityError::ConnectionError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Synthesis API error ({}): {}", status, message);
            return Err(CapabilityError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        response
            .bytes()
            .await
            .map_err(|e| CapabilityError::RequestFailed(e.to_string()))
    }
}

fn resolve_endpoint(endpoint: String) -> String {
    if endpoint.is_empty() {
        DEFAULT_ENDPOINT.to_string()
    } else {
        endpoint.trim_end_matches('/').to_string()
    }
}
