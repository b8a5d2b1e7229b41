//! Public protocol structs for the HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::domain::{MistakeRecord, Mode};

//
// HTTP request/response DTOs
//

#[derive(Debug, Deserialize)]
pub struct AnalyzeIn {
    #[serde(default, rename = "userId")]
    pub user_id: Option<String>,
    /// Required; checked in logic so a missing field yields our 400, not a 422.
    #[serde(default, rename = "questionId")]
    pub question_id: String,
    #[serde(default)]
    pub mode: Option<Mode>,
    /// Writing mode input.
    #[serde(default)]
    pub essay: Option<String>,
    /// Speaking mode input.
    #[serde(default, rename = "audioBase64")]
    pub audio_base64: Option<String>,
    #[serde(default)]
    pub mime: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeOut {
    /// Raw coach feedback text, verbatim.
    pub analysis: String,
    /// The analyzed text: the essay, or the transcript for speaking attempts.
    pub transcript: String,
    pub mistakes: Vec<MistakeRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
    #[serde(rename = "attemptId")]
    pub attempt_id: String,
}

#[derive(Debug, Deserialize)]
pub struct QuestionsQuery {
    pub mode: Option<Mode>,
}

#[derive(Debug, Deserialize)]
pub struct MistakesQuery {
    #[serde(default, rename = "userId")]
    pub user_id: Option<String>,
    /// "current" | "7days" | "30days"; anything else means full history.
    pub range: Option<String>,
    pub mode: Option<Mode>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendQuery {
    #[serde(default, rename = "userId")]
    pub user_id: Option<String>,
    pub mode: Option<Mode>,
    pub n: Option<usize>,
}

#[derive(Serialize)]
pub struct ErrorOut {
    pub error: String,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}
