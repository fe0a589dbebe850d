//! # med-flash
//!
//! A terminal study aid for medical students: extract text from lecture
//! material, have a hosted model fact-check it, generate multiple-choice
//! decks from it and sit exams on those decks.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use med_flash::{App, Config, LlmClient, StudyState};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let config = Config::default();
//! let client = LlmClient::new(&config)?;
//! let mut study = StudyState::new(config, None);
//! study.load_document("lecture.pdf")?;
//!
//! med_flash::app::run(App::new(study), client).await?;
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod commands;
pub mod config;
pub mod error;
pub mod extract;
pub mod llm;
pub mod models;
pub mod session;
pub mod study;
pub mod terminal;
mod ui;

pub use app::App;
pub use config::Config;
pub use error::{AppError, Result};
pub use llm::{ApiKey, LlmClient, TextGenerator};
pub use models::{Deck, DeckLibrary, Question};
pub use session::{ExamPhase, ExamSession};
pub use study::StudyState;
