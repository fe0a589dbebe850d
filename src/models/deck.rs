use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::LibraryError;
use crate::llm::GenerationSettings;
use crate::models::Question;

/// A named, ordered set of questions from one generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    name: String,
    questions: Vec<Question>,
    /// Settings the deck was generated with.
    settings: GenerationSettings,
}

impl Deck {
    pub fn new(name: impl Into<String>, questions: Vec<Question>) -> Self {
        let settings = GenerationSettings {
            count: questions.len(),
            ..GenerationSettings::default()
        };
        Self {
            name: name.into().trim().to_string(),
            questions,
            settings,
        }
    }

    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// All decks generated this session, keyed by name.
///
/// Decks are shared as `Arc` so an exam keeps its deck even if the entry is
/// deleted mid-exam.
#[derive(Debug, Default)]
pub struct DeckLibrary {
    decks: BTreeMap<String, Arc<Deck>>,
}

impl DeckLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, deck: Deck) -> Result<Arc<Deck>, LibraryError> {
        if deck.name().is_empty() {
            return Err(LibraryError::EmptyName);
        }
        if self.decks.contains_key(deck.name()) {
            return Err(LibraryError::DuplicateDeck(deck.name().to_string()));
        }

        let deck = Arc::new(deck);
        self.decks.insert(deck.name().to_string(), Arc::clone(&deck));
        Ok(deck)
    }

    /// Remove a deck. Unknown names leave the library untouched.
    pub fn remove(&mut self, name: &str) -> Result<Arc<Deck>, LibraryError> {
        self.decks
            .remove(name.trim())
            .ok_or_else(|| LibraryError::UnknownDeck(name.trim().to_string()))
    }

    pub fn get(&self, name: &str) -> Option<Arc<Deck>> {
        self.decks.get(name.trim()).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.decks.contains_key(name.trim())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Deck> {
        self.decks.values().map(|deck| deck.as_ref())
    }

    pub fn len(&self) -> usize {
        self.decks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decks.is_empty()
    }
}
