//! Process-wide study state.
//!
//! One [`StudyState`] is built at startup and handed by `&mut` to every
//! handler. Every operation either succeeds or leaves the state as it was
//! (document loading is the exception: a failed load clears the content).

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::{Config, MAX_QUESTION_COUNT};
use crate::error::{AppError, LibraryError, LlmError, Result};
use crate::extract::{ExtractedContent, extract_text};
use crate::llm::{
    ApiKey, GenerationSettings, TextGenerator, VerificationReport, generation_prompt,
    parse_questions, verification_prompt,
};
use crate::models::{Deck, DeckLibrary, ProgressLog};
use crate::session::{ExamPhase, ExamSession, Outcome};

#[derive(Debug)]
pub struct StudyState {
    config: Config,
    api_key: Option<ApiKey>,
    content: Option<ExtractedContent>,
    report: Option<VerificationReport>,
    settings: GenerationSettings,
    library: DeckLibrary,
    exam: ExamSession,
    progress: ProgressLog,
}

impl StudyState {
    pub fn new(config: Config, api_key: Option<ApiKey>) -> Self {
        let settings = GenerationSettings {
            count: config.default_question_count,
            ..GenerationSettings::default()
        };
        Self {
            config,
            api_key,
            content: None,
            report: None,
            settings,
            library: DeckLibrary::new(),
            exam: ExamSession::new(),
            progress: ProgressLog::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn api_key(&self) -> Option<&ApiKey> {
        self.api_key.as_ref()
    }

    pub fn content(&self) -> Option<&ExtractedContent> {
        self.content.as_ref()
    }

    pub fn report(&self) -> Option<&VerificationReport> {
        self.report.as_ref()
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut GenerationSettings {
        &mut self.settings
    }

    pub fn library(&self) -> &DeckLibrary {
        &self.library
    }

    pub fn exam(&self) -> &ExamSession {
        &self.exam
    }

    pub fn progress(&self) -> &ProgressLog {
        &self.progress
    }

    pub fn set_api_key(&mut self, raw: &str) -> Result<()> {
        let key = ApiKey::new(raw).ok_or(LlmError::MissingApiKey)?;
        info!("api key updated");
        self.api_key = Some(key);
        Ok(())
    }

    /// Replace the extracted content with the text of `path`.
    ///
    /// On failure the previous content is dropped too, so verify/generate
    /// block until a good document is loaded.
    pub fn load_document(&mut self, path: impl AsRef<Path>) -> Result<&ExtractedContent> {
        self.report = None;
        match extract_text(path.as_ref()) {
            Ok(content) => Ok(&*self.content.insert(content)),
            Err(e) => {
                warn!(path = %path.as_ref().display(), error = %e, "document extraction failed");
                self.content = None;
                Err(e.into())
            }
        }
    }

    /// Ask the model to fact-check the loaded content.
    pub async fn verify<G: TextGenerator>(&mut self, generator: &G) -> Result<&VerificationReport> {
        let content = self.content.as_ref().ok_or(AppError::NoContent)?;
        let key = self.api_key.as_ref().ok_or(LlmError::MissingApiKey)?;

        let prompt = verification_prompt(&content.text, self.config.max_prompt_chars);
        let markdown = generator.complete(key, &prompt).await.inspect_err(|e| {
            warn!(error = %e, "verification request failed");
        })?;

        let report = VerificationReport::new(markdown);
        let (correct, partial, incorrect) = report.tally();
        info!(correct, partial, incorrect, "verification report received");
        Ok(&*self.report.insert(report))
    }

    /// Generate a deck from the loaded content and store it under `name`.
    ///
    /// Nothing is stored unless the whole response validates.
    pub async fn generate_deck<G: TextGenerator>(
        &mut self,
        generator: &G,
        name: &str,
        count: Option<usize>,
    ) -> Result<Arc<Deck>> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LibraryError::EmptyName.into());
        }
        if self.library.contains(name) {
            return Err(LibraryError::DuplicateDeck(name.to_string()).into());
        }

        let count = count.unwrap_or(self.settings.count);
        if count == 0 || count > MAX_QUESTION_COUNT {
            return Err(AppError::InvalidArgument(format!(
                "Question count must be between 1 and {MAX_QUESTION_COUNT}"
            )));
        }

        let content = self.content.as_ref().ok_or(AppError::NoContent)?;
        let key = self.api_key.as_ref().ok_or(LlmError::MissingApiKey)?;

        let settings = GenerationSettings {
            count,
            ..self.settings
        };
        let prompt = generation_prompt(&content.text, &settings, self.config.max_prompt_chars);
        let raw = generator.complete(key, &prompt).await.inspect_err(|e| {
            warn!(deck = name, error = %e, "generation request failed");
        })?;

        let questions = parse_questions(&raw).inspect_err(|e| {
            warn!(deck = name, error = %e, "generated deck rejected");
        })?;
        if questions.len() != count {
            warn!(deck = name, requested = count, received = questions.len(), "question count differs from request");
        }

        let deck = self
            .library
            .insert(Deck::new(name, questions).with_settings(settings))?;
        info!(deck = deck.name(), questions = deck.len(), "deck generated");
        Ok(deck)
    }

    pub fn delete_deck(&mut self, name: &str) -> Result<Arc<Deck>> {
        let deck = self.library.remove(name)?;
        info!(deck = deck.name(), "deck deleted");
        Ok(deck)
    }

    /// Start an exam on a stored deck, discarding any exam in progress.
    pub fn start_exam(&mut self, name: &str) -> Result<Arc<Deck>> {
        let deck = self
            .library
            .get(name)
            .ok_or_else(|| LibraryError::UnknownDeck(name.trim().to_string()))?;
        self.exam.start(Arc::clone(&deck));
        info!(deck = deck.name(), questions = deck.len(), "exam started");
        if self.exam.phase() == ExamPhase::Complete {
            self.finish_exam();
        }
        Ok(deck)
    }

    pub fn select_option(&mut self, label: char) -> Result<()> {
        Ok(self.exam.select(label)?)
    }

    pub fn select_next_option(&mut self) -> Result<()> {
        Ok(self.exam.select_next()?)
    }

    pub fn select_previous_option(&mut self) -> Result<()> {
        Ok(self.exam.select_previous()?)
    }

    pub fn submit_answer(&mut self) -> Result<Outcome> {
        Ok(self.exam.submit()?.clone())
    }

    /// Advance past the revealed question; logs the exam when it completes.
    pub fn next_question(&mut self) -> Result<ExamPhase> {
        let phase = self.exam.advance()?;
        if phase == ExamPhase::Complete {
            self.finish_exam();
        }
        Ok(phase)
    }

    pub fn abandon_exam(&mut self) {
        if self.exam.is_in_progress() {
            info!(index = self.exam.index(), "exam abandoned");
        }
        self.exam.reset();
    }

    fn finish_exam(&mut self) {
        let Some(deck) = self.exam.deck() else {
            return;
        };
        let record = self.progress.record(deck, self.exam.score());
        info!(
            deck = %record.deck,
            area = %record.area,
            correct = record.score.correct,
            total = record.score.total,
            percentage = record.score.percentage().round(),
            "exam finished"
        );
    }
}
