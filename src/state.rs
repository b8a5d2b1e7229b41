//! Application state: taxonomy, question banks, quiz bank, attempt store,
//! prompts, and the optional OpenAI client.
//!
//! Everything except the attempt store is process-wide read-only
//! configuration, resolved once at startup from the TOML config (if any)
//! with built-in seeds as fallback.

use tracing::{info, instrument};

use crate::config::{load_agent_config_from_env, Prompts};
use crate::domain::{Mode, PromptQuestion, QuizQuestion};
use crate::openai::OpenAI;
use crate::seeds::{seed_quiz_bank, seed_speaking_questions, seed_taxonomy, seed_writing_questions};
use crate::store::AttemptStore;
use crate::taxonomy::Taxonomy;

#[derive(Clone)]
pub struct AppState {
    pub taxonomy: Taxonomy,
    pub writing_questions: Vec<PromptQuestion>,
    pub speaking_questions: Vec<PromptQuestion>,
    pub quiz_bank: Vec<QuizQuestion>,
    pub store: AttemptStore,
    pub openai: Option<OpenAI>,
    pub prompts: Prompts,
}

impl AppState {
    /// Build state from env: load config, merge with seeds, init store and OpenAI.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let cfg = load_agent_config_from_env().unwrap_or_default();

        let taxonomy = if cfg.taxonomy.is_empty() {
            seed_taxonomy()
        } else {
            Taxonomy::new(cfg.taxonomy)
        };
        let writing_questions = if cfg.writing_questions.is_empty() {
            seed_writing_questions()
        } else {
            cfg.writing_questions
        };
        let speaking_questions = if cfg.speaking_questions.is_empty() {
            seed_speaking_questions()
        } else {
            cfg.speaking_questions
        };
        let quiz_bank = if cfg.quiz.is_empty() { seed_quiz_bank() } else { cfg.quiz };

        let store = AttemptStore::from_env();

        info!(
            target: "bandcoach_backend",
            taxonomy_cells = taxonomy.cell_count(),
            writing_questions = writing_questions.len(),
            speaking_questions = speaking_questions.len(),
            quiz_items = quiz_bank.len(),
            data_dir = %store.dir().display(),
            "Startup inventory"
        );

        let openai = OpenAI::from_env();
        if let Some(oa) = &openai {
            info!(target: "bandcoach_backend", base_url = %oa.base_url, strong_model = %oa.strong_model, transcribe_model = %oa.transcribe_model, "OpenAI enabled.");
        } else {
            info!(target: "bandcoach_backend", "OpenAI disabled (no OPENAI_API_KEY). Analysis requests will be rejected.");
        }

        Self {
            taxonomy,
            writing_questions,
            speaking_questions,
            quiz_bank,
            store,
            openai,
            prompts: cfg.prompts,
        }
    }

    /// The prompt bank for a mode.
    pub fn question_bank(&self, mode: Mode) -> &[PromptQuestion] {
        match mode {
            Mode::Writing => &self.writing_questions,
            Mode::Speaking => &self.speaking_questions,
        }
    }

    pub fn find_question(&self, mode: Mode, id: &str) -> Option<&PromptQuestion> {
        self.question_bank(mode).iter().find(|q| q.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_state_exposes_both_banks() {
        let state = AppState::new();
        assert!(!state.question_bank(Mode::Writing).is_empty());
        assert!(!state.question_bank(Mode::Speaking).is_empty());
        assert!(state.find_question(Mode::Writing, "w1").is_some());
        assert!(state.find_question(Mode::Speaking, "w1").is_none());
    }
}
