//! Gemini `generateContent` client implementing both extractor traits.
//!
//! The client is blocking on purpose: the domain layer is synchronous, the
//! way the rest of this crate is written, and the async server surface runs
//! extraction calls on a blocking worker. Structured output is requested via
//! a response schema so the reply body is a single JSON document.

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::prompts;
use super::{EncodedImage, ExtractionError, IdCardExtraction, IdCardExtractor, KycExtraction, KycExtractor};
use crate::config::{ConfigError, ExtractionConfig};

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

pub struct GeminiClient {
    http: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl GeminiClient {
    /// Build a client from configuration. A missing API key is fatal to any
    /// extraction attempt and surfaces immediately, before a request is made.
    pub fn from_config(config: &ExtractionConfig) -> Result<Self, ConfigError> {
        let api_key = config.require_api_key()?.to_string();
        Ok(Self {
            http: Client::new(),
            api_key,
            model: config.model.clone(),
            endpoint: config.endpoint.clone(),
        })
    }

    fn generate(
        &self,
        system_instruction: &str,
        response_schema: Value,
        image: &EncodedImage,
    ) -> Result<String, ExtractionError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        );

        let body = json!({
            "systemInstruction": { "parts": [{ "text": system_instruction }] },
            "contents": [{
                "parts": [{
                    "inlineData": {
                        "mimeType": image.mime_type,
                        "data": image.data,
                    }
                }]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": response_schema,
            }
        });

        debug!(model = %self.model, mime_type = %image.mime_type, "sending extraction request");

        let response = self
            .http
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .map_err(|err| ExtractionError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().unwrap_or_default();
            return Err(ExtractionError::Status {
                status: status.as_u16(),
                detail: truncate(&detail, 512),
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .map_err(|err| ExtractionError::Malformed(err.to_string()))?;

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .ok_or(ExtractionError::Empty)
    }
}

impl KycExtractor for GeminiClient {
    fn extract_kyc(&self, image: &EncodedImage) -> Result<KycExtraction, ExtractionError> {
        let text = self.generate(
            prompts::KYC_SYSTEM_INSTRUCTION,
            prompts::kyc_response_schema(),
            image,
        )?;
        serde_json::from_str(text.trim()).map_err(|err| ExtractionError::Malformed(err.to_string()))
    }
}

impl IdCardExtractor for GeminiClient {
    fn extract_id_card(&self, image: &EncodedImage) -> Result<IdCardExtraction, ExtractionError> {
        let text = self.generate(
            prompts::ID_CARD_SYSTEM_INSTRUCTION,
            prompts::id_card_response_schema(),
            image,
        )?;
        serde_json::from_str(text.trim()).map_err(|err| ExtractionError::Malformed(err.to_string()))
    }
}

fn truncate(text: &str, limit: usize) -> String {
    if text.len() <= limit {
        return text.to_string();
    }
    let mut end = limit;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &text[..end])
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_envelope_unwraps_to_candidate_text() {
        let raw = r#"{
            "candidates": [{
                "content": { "parts": [{ "text": "{\"name\":null}" }] }
            }]
        }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(raw).expect("envelope parses");
        let text = parsed.candidates[0].content.parts[0].text.clone();
        assert_eq!(text, "{\"name\":null}");
    }

    #[test]
    fn empty_candidate_list_deserializes() {
        let parsed: GenerateContentResponse = serde_json::from_str("{}").expect("parses");
        assert!(parsed.candidates.is_empty());
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 512), "short");
        let truncated = truncate("añejo", 2);
        assert_eq!(truncated, "a…");
    }
}
