//! Exam session state machine.
//!
//! ```text
//! NotStarted --start--> Unanswered(i) --submit--> Answered(i) --advance--> Unanswered(i+1)
//!                                                         \--advance (last)--> Complete
//! any --reset--> NotStarted
//! ```
//!
//! While unanswered at index `i` there are exactly `i` outcomes; while
//! answered there are `i + 1`.

use std::sync::Arc;

use crate::error::SessionError;
use crate::models::{Deck, OPTION_LABELS, Question};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExamPhase {
    NotStarted,
    /// Options are selectable for the current question.
    Unanswered,
    /// Outcome recorded, explanation revealed, selector frozen.
    Answered,
    Complete,
}

/// Result of one answered question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub correct: bool,
    pub selected: String,
    pub expected: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    pub correct: usize,
    pub total: usize,
}

impl Score {
    /// Percentage of correct answers; 0 for an empty deck.
    pub fn percentage(&self) -> f64 {
        if self.total > 0 {
            (self.correct as f64 / self.total as f64) * 100.0
        } else {
            0.0
        }
    }
}

#[derive(Debug, Default)]
pub struct ExamSession {
    deck: Option<Arc<Deck>>,
    index: usize,
    pending: Option<char>,
    revealed: bool,
    outcomes: Vec<Outcome>,
}

impl ExamSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh exam on `deck`, discarding any previous progress.
    pub fn start(&mut self, deck: Arc<Deck>) {
        self.reset();
        self.deck = Some(deck);
    }

    /// Return to `NotStarted` from anywhere.
    pub fn reset(&mut self) {
        self.deck = None;
        self.index = 0;
        self.pending = None;
        self.revealed = false;
        self.outcomes.clear();
    }

    pub fn phase(&self) -> ExamPhase {
        match &self.deck {
            None => ExamPhase::NotStarted,
            Some(deck) if self.index >= deck.len() => ExamPhase::Complete,
            Some(_) if self.revealed => ExamPhase::Answered,
            Some(_) => ExamPhase::Unanswered,
        }
    }

    pub fn is_in_progress(&self) -> bool {
        matches!(self.phase(), ExamPhase::Unanswered | ExamPhase::Answered)
    }

    pub fn deck(&self) -> Option<&Deck> {
        self.deck.as_deref()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn total(&self) -> usize {
        self.deck.as_ref().map_or(0, |deck| deck.len())
    }

    pub fn pending(&self) -> Option<char> {
        self.pending
    }

    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.deck.as_ref()?.get(self.index)
    }

    /// Outcome for the current question, once it has been answered.
    pub fn current_outcome(&self) -> Option<&Outcome> {
        if self.phase() == ExamPhase::Answered {
            self.outcomes.last()
        } else {
            None
        }
    }

    pub fn select(&mut self, label: char) -> Result<(), SessionError> {
        self.ensure_selectable()?;
        let label = label.to_ascii_uppercase();
        if !OPTION_LABELS.contains(&label) {
            return Err(SessionError::UnknownOption(label.to_string()));
        }
        self.pending = Some(label);
        Ok(())
    }

    pub fn select_next(&mut self) -> Result<(), SessionError> {
        self.ensure_selectable()?;
        let count = OPTION_LABELS.len();
        let next = match self.pending.and_then(crate::models::label_position) {
            Some(i) => (i + 1) % count,
            None => 0,
        };
        self.pending = Some(OPTION_LABELS[next]);
        Ok(())
    }

    pub fn select_previous(&mut self) -> Result<(), SessionError> {
        self.ensure_selectable()?;
        let count = OPTION_LABELS.len();
        let previous = match self.pending.and_then(crate::models::label_position) {
            Some(i) => (i + count - 1) % count,
            None => count - 1,
        };
        self.pending = Some(OPTION_LABELS[previous]);
        Ok(())
    }

    /// Record the pending selection for the current question.
    ///
    /// Without a selection nothing changes and `NoSelection` is returned.
    pub fn submit(&mut self) -> Result<&Outcome, SessionError> {
        match self.phase() {
            ExamPhase::Unanswered => {}
            ExamPhase::Answered => return Err(SessionError::AlreadyAnswered),
            ExamPhase::NotStarted | ExamPhase::Complete => {
                return Err(SessionError::NotInProgress);
            }
        }

        let label = self.pending.ok_or(SessionError::NoSelection)?;
        let question = self
            .current_question()
            .ok_or(SessionError::NotInProgress)?;
        let selected = question
            .option(label)
            .ok_or_else(|| SessionError::UnknownOption(label.to_string()))?
            .to_string();
        let expected = question.correct_text().to_string();

        self.outcomes.push(Outcome {
            correct: selected == expected,
            selected,
            expected,
        });
        self.revealed = true;

        Ok(&self.outcomes[self.outcomes.len() - 1])
    }

    /// Move past an answered question. Returns the new phase.
    pub fn advance(&mut self) -> Result<ExamPhase, SessionError> {
        match self.phase() {
            ExamPhase::Answered => {}
            ExamPhase::Unanswered => return Err(SessionError::NotAnswered),
            ExamPhase::NotStarted | ExamPhase::Complete => {
                return Err(SessionError::NotInProgress);
            }
        }

        self.pending = None;
        self.revealed = false;
        self.index += 1;
        Ok(self.phase())
    }

    pub fn score(&self) -> Score {
        Score {
            correct: self.outcomes.iter().filter(|o| o.correct).count(),
            total: self.total(),
        }
    }

    fn ensure_selectable(&self) -> Result<(), SessionError> {
        match self.phase() {
            ExamPhase::Unanswered => Ok(()),
            ExamPhase::Answered => Err(SessionError::AlreadyAnswered),
            ExamPhase::NotStarted | ExamPhase::Complete => Err(SessionError::NotInProgress),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(correct: &str) -> Question {
        Question::new(
            0,
            "Capital of France?",
            [("A", "London"), ("B", "Paris"), ("C", "Rome"), ("D", "Madrid")],
            correct,
            "",
        )
        .unwrap()
    }

    fn deck(n: usize) -> Arc<Deck> {
        Arc::new(Deck::new("geo", (0..n).map(|_| question("B")).collect()))
    }

    #[test]
    fn test_new_session_is_not_started() {
        let session = ExamSession::new();
        assert_eq!(session.phase(), ExamPhase::NotStarted);
        assert_eq!(session.index(), 0);
        assert!(session.pending().is_none());
        assert!(session.outcomes().is_empty());
    }

    #[test]
    fn test_single_correct_answer_completes_with_full_score() {
        let mut session = ExamSession::new();
        session.start(deck(1));

        session.select('B').unwrap();
        let outcome = session.submit().unwrap().clone();
        assert!(outcome.correct);
        assert_eq!(outcome.selected, "Paris");
        assert_eq!(outcome.expected, "Paris");
        assert_eq!(session.phase(), ExamPhase::Answered);

        assert_eq!(session.advance().unwrap(), ExamPhase::Complete);
        assert_eq!(session.index(), 1);
        assert_eq!(session.score().percentage().round(), 100.0);
    }

    #[test]
    fn test_one_right_one_wrong_scores_fifty() {
        let mut session = ExamSession::new();
        session.start(deck(2));

        session.select('B').unwrap();
        session.submit().unwrap();
        session.advance().unwrap();

        session.select('D').unwrap();
        session.submit().unwrap();
        session.advance().unwrap();

        let flags: Vec<bool> = session.outcomes().iter().map(|o| o.correct).collect();
        assert_eq!(flags, vec![true, false]);
        assert_eq!(session.outcomes()[1].selected, "Madrid");
        assert_eq!(session.outcomes()[1].expected, "Paris");
        assert_eq!(session.score().percentage(), 50.0);
    }

    #[test]
    fn test_answering_every_question_aligns_outcomes_with_index() {
        for n in 0..6 {
            let mut session = ExamSession::new();
            session.start(deck(n));
            for i in 0..n {
                assert_eq!(session.outcomes().len(), i);
                session.select_next().unwrap();
                session.submit().unwrap();
                assert_eq!(session.outcomes().len(), i + 1);
                session.advance().unwrap();
            }
            assert_eq!(session.phase(), ExamPhase::Complete);
            assert_eq!(session.outcomes().len(), n);
            assert_eq!(session.index(), n);
        }
    }

    #[test]
    fn test_empty_deck_scores_zero() {
        let mut session = ExamSession::new();
        session.start(deck(0));
        assert_eq!(session.phase(), ExamPhase::Complete);
        assert_eq!(session.score(), Score { correct: 0, total: 0 });
        assert_eq!(session.score().percentage(), 0.0);
    }

    #[test]
    fn test_submit_without_selection_changes_nothing() {
        let mut session = ExamSession::new();
        session.start(deck(3));

        assert_eq!(session.submit(), Err(SessionError::NoSelection));
        assert!(session.outcomes().is_empty());
        assert_eq!(session.index(), 0);
        assert_eq!(session.phase(), ExamPhase::Unanswered);
    }

    #[test]
    fn test_selector_frozen_after_submit() {
        let mut session = ExamSession::new();
        session.start(deck(2));
        session.select('A').unwrap();
        session.submit().unwrap();

        assert_eq!(session.select('B'), Err(SessionError::AlreadyAnswered));
        assert_eq!(session.submit().map(|_| ()), Err(SessionError::AlreadyAnswered));
        assert_eq!(session.pending(), Some('A'));
        assert_eq!(session.outcomes().len(), 1);
    }

    #[test]
    fn test_advance_requires_answer() {
        let mut session = ExamSession::new();
        assert_eq!(session.advance(), Err(SessionError::NotInProgress));
        session.start(deck(1));
        assert_eq!(session.advance(), Err(SessionError::NotAnswered));
        assert_eq!(session.index(), 0);
    }

    #[test]
    fn test_selection_cycles_through_options() {
        let mut session = ExamSession::new();
        session.start(deck(1));

        session.select_previous().unwrap();
        assert_eq!(session.pending(), Some('D'));
        session.select_next().unwrap();
        assert_eq!(session.pending(), Some('A'));
        session.select_next().unwrap();
        assert_eq!(session.pending(), Some('B'));
        assert_eq!(session.select('x'), Err(SessionError::UnknownOption("X".into())));
    }

    #[test]
    fn test_reset_clears_everything_from_any_point() {
        let mut session = ExamSession::new();
        session.start(deck(3));
        session.select('B').unwrap();
        session.submit().unwrap();
        session.advance().unwrap();
        session.select('C').unwrap();

        session.reset();
        assert_eq!(session.phase(), ExamPhase::NotStarted);
        assert!(session.deck().is_none());
        assert_eq!(session.index(), 0);
        assert!(session.pending().is_none());
        assert!(session.outcomes().is_empty());
    }

    #[test]
    fn test_start_discards_previous_progress() {
        let mut session = ExamSession::new();
        session.start(deck(2));
        session.select('B').unwrap();
        session.submit().unwrap();

        session.start(deck(1));
        assert_eq!(session.phase(), ExamPhase::Unanswered);
        assert!(session.outcomes().is_empty());
        assert_eq!(session.total(), 1);
    }
}
