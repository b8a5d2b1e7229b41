//! Minimal OpenAI client for our use-cases.
//!
//! We call chat.completions for coach feedback (plain text, the parser deals
//! with the shape) and audio/transcriptions for speaking attempts.
//! Calls are instrumented and log model names, latencies, and response sizes (not contents).
//!
//! NOTE: We never log the API key and we keep payload truncations short to avoid PII leaks.

use std::time::Duration;

use base64::Engine;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::config::Prompts;
use crate::util::fill_template;

#[derive(Clone)]
pub struct OpenAI {
  pub client: reqwest::Client,
  pub api_key: String,
  pub base_url: String,
  pub strong_model: String,
  pub transcribe_model: String,
}

impl OpenAI {
  /// Construct the client if we find OPENAI_API_KEY; otherwise return None.
  pub fn from_env() -> Option<Self> {
    let api_key = std::env::var("OPENAI_API_KEY").ok()?;
    let base_url =
      std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".into());
    let strong_model =
      std::env::var("OPENAI_STRONG_MODEL").unwrap_or_else(|_| "gpt-4o".into());
    let transcribe_model =
      std::env::var("OPENAI_TRANSCRIBE_MODEL").unwrap_or_else(|_| "whisper-1".into());

    // Transcription of multi-minute audio is the slowest call we make.
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(60))
      .build()
      .ok()?;

    Some(Self { client, api_key, base_url, strong_model, transcribe_model })
  }

  /// Plain-text chat completion.
  #[instrument(level = "info", skip(self, system, user), fields(model = %model))]
  async fn chat_plain(
    &self,
    model: &str,
    system: &str,
    user: &str,
    temperature: f32,
    max_tokens: Option<u32>,
  ) -> Result<String, String> {
    let url = format!("{}/chat/completions", self.base_url);
    let req = ChatCompletionRequest {
      model: model.to_string(),
      messages: vec![
        ChatMessageReq { role: "system".into(), content: system.into() },
        ChatMessageReq { role: "user".into(), content: user.into() },
      ],
      temperature,
      max_tokens,
    };

    let res = self.client.post(&url)
      .header(USER_AGENT, "bandcoach-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
      .json(&req).send().await.map_err(|e| e.to_string())?;

    if !res.status().is_success() {
      let status = res.status();
      let body = res.text().await.unwrap_or_default();
      let msg = extract_openai_error(&body).unwrap_or_else(|| body);
      return Err(format!("OpenAI HTTP {}: {}", status, msg));
    }

    let body: ChatCompletionResponse = res.json().await.map_err(|e| e.to_string())?;
    if let Some(usage) = &body.usage {
      info!(prompt_tokens = ?usage.prompt_tokens, completion_tokens = ?usage.completion_tokens, total_tokens = ?usage.total_tokens, "OpenAI usage");
    }
    let text = body.choices.get(0)
      .and_then(|c| c.message.content.clone())
      .unwrap_or_default().trim().to_string();

    Ok(text)
  }

  // --- High-level helpers (domain-specialized) ---

  /// Full coach feedback for a written essay. Returns the raw analysis text;
  /// the feedback parser downstream turns it into mistake records.
  #[instrument(level = "info", skip_all, fields(model = %self.strong_model, essay_len = essay.len()))]
  pub async fn analyze_writing(
    &self,
    prompts: &Prompts,
    question_text: &str,
    taxonomy_lines: &str,
    essay: &str,
  ) -> Result<String, String> {
    let user = fill_template(
      &prompts.writing_user_template,
      &[("question", question_text), ("taxonomy", taxonomy_lines), ("essay", essay)],
    );
    self.run_analysis_chat(&prompts.analysis_system, &user).await
  }

  /// Full coach feedback for a spoken-answer transcript.
  #[instrument(level = "info", skip_all, fields(model = %self.strong_model, transcript_len = transcript.len()))]
  pub async fn analyze_speaking(
    &self,
    prompts: &Prompts,
    question_text: &str,
    taxonomy_lines: &str,
    transcript: &str,
  ) -> Result<String, String> {
    let user = fill_template(
      &prompts.speaking_user_template,
      &[("question", question_text), ("taxonomy", taxonomy_lines), ("transcript", transcript)],
    );
    self.run_analysis_chat(&prompts.analysis_system, &user).await
  }

  async fn run_analysis_chat(&self, system: &str, user: &str) -> Result<String, String> {
    let start = std::time::Instant::now();
    // Low temperature: we want reproducible classification, not creativity.
    let result = self.chat_plain(&self.strong_model, system, user, 0.1, Some(800)).await;
    let elapsed = start.elapsed();

    match &result {
      Ok(text) => {
        info!(?elapsed, response_len = text.len(), "Coach feedback received");
      }
      Err(e) => {
        error!(?elapsed, error = %e, "Coach model call failed");
      }
    }
    result
  }

  /// Transcribe base64 audio with the transcription model. Plain-text response.
  #[instrument(level = "info", skip(self, audio_base64), fields(model = %self.transcribe_model, mime = %mime, audio_b64_len = audio_base64.len()))]
  pub async fn transcribe_audio(&self, audio_base64: &str, mime: &str) -> Result<String, String> {
    let bytes = base64::engine::general_purpose::STANDARD
      .decode(audio_base64)
      .map_err(|e| format!("Invalid base64 audio: {}", e))?;

    let ext = match mime {
      "audio/webm" => "webm",
      "audio/ogg" => "ogg",
      "audio/wav" | "audio/x-wav" => "wav",
      "audio/mpeg" | "audio/mp3" => "mp3",
      "audio/mp4" | "audio/m4a" => "m4a",
      _ => "webm",
    };
    let part = reqwest::multipart::Part::bytes(bytes)
      .file_name(format!("speech.{}", ext))
      .mime_str(mime)
      .map_err(|e| format!("Invalid mime type '{}': {}", mime, e))?;
    let form = reqwest::multipart::Form::new()
      .text("model", self.transcribe_model.clone())
      .text("response_format", "text")
      .text("language", "en")
      .part("file", part);

    let url = format!("{}/audio/transcriptions", self.base_url);
    let start = std::time::Instant::now();
    let res = self.client.post(&url)
      .header(USER_AGENT, "bandcoach-backend/0.1")
      .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
      .multipart(form).send().await.map_err(|e| e.to_string())?;

    if !res.status().is_success() {
      let status = res.status();
      let body = res.text().await.unwrap_or_default();
      let msg = extract_openai_error(&body).unwrap_or_else(|| body);
      return Err(format!("OpenAI HTTP {}: {}", status, msg));
    }

    let transcript = res.text().await.map_err(|e| e.to_string())?.trim().to_string();
    info!(elapsed = ?start.elapsed(), transcript_len = transcript.len(), "Transcription received");
    Ok(transcript)
  }
}

// --- Chat DTOs ---

#[derive(Serialize)]
struct ChatCompletionRequest {
  model: String,
  messages: Vec<ChatMessageReq>,
  temperature: f32,
  #[serde(skip_serializing_if = "Option::is_none")]
  max_tokens: Option<u32>,
}
#[derive(Serialize)]
struct ChatMessageReq { role: String, content: String }

#[derive(Deserialize)]
struct ChatCompletionResponse {
  choices: Vec<ChatChoice>,
  #[serde(default)] usage: Option<Usage>,
}
#[derive(Deserialize)]
struct ChatChoice { message: ChatMessageResp }
#[derive(Deserialize)]
struct ChatMessageResp { content: Option<String> }
#[derive(Deserialize)]
struct Usage {
  #[serde(default)] prompt_tokens: Option<u32>,
  #[serde(default)] completion_tokens: Option<u32>,
  #[serde(default)] total_tokens: Option<u32>,
}

/// Try to extract a clean error message from OpenAI error body.
fn extract_openai_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap { error: EObj }
  #[derive(Deserialize)]
  struct EObj { message: String }
  match serde_json::from_str::<EWrap>(body) {
    Ok(w) => Some(w.error.message),
    Err(_) => None,
  }
}
