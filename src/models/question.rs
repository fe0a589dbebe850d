use crate::error::DeckError;

/// Option letters, in display order.
pub const OPTION_LABELS: [char; 4] = ['A', 'B', 'C', 'D'];

/// A single multiple-choice question. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    prompt: String,
    options: [String; 4],
    correct: char,
    explanation: String,
}

impl Question {
    /// Build a question from `(label, text)` pairs.
    ///
    /// `index` is only used to say which question was bad. Labels are
    /// case-insensitive and may carry a trailing `.` or `)`.
    pub fn new<I, L, T>(
        index: usize,
        prompt: impl Into<String>,
        options: I,
        correct: &str,
        explanation: impl Into<String>,
    ) -> Result<Self, DeckError>
    where
        I: IntoIterator<Item = (L, T)>,
        L: AsRef<str>,
        T: Into<String>,
    {
        let prompt = prompt.into().trim().to_string();
        if prompt.is_empty() {
            return Err(DeckError::EmptyPrompt { index });
        }

        let options: Vec<(L, T)> = options.into_iter().collect();
        let found = options.len();
        if found != OPTION_LABELS.len() {
            return Err(DeckError::OptionCount { index, found });
        }

        let mut slots: [Option<String>; 4] = Default::default();
        for (label, text) in options {
            let raw = label.as_ref();
            let slot = parse_label(raw)
                .and_then(label_position)
                .ok_or_else(|| DeckError::OptionLabel {
                    index,
                    label: raw.to_string(),
                })?;
            if slots[slot].is_some() {
                return Err(DeckError::OptionLabel {
                    index,
                    label: raw.to_string(),
                });
            }
            slots[slot] = Some(text.into().trim().to_string());
        }

        let [a, b, c, d] = slots;
        let options = match (a, b, c, d) {
            (Some(a), Some(b), Some(c), Some(d)) => [a, b, c, d],
            _ => return Err(DeckError::OptionCount { index, found }),
        };

        let correct = parse_label(correct)
            .filter(|label| label_position(*label).is_some())
            .ok_or_else(|| DeckError::AnswerNotInOptions {
                index,
                answer: correct.trim().to_string(),
            })?;

        Ok(Self {
            prompt,
            options,
            correct,
            explanation: explanation.into().trim().to_string(),
        })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    pub fn correct_label(&self) -> char {
        self.correct
    }

    /// Text of the correct option.
    pub fn correct_text(&self) -> &str {
        // `correct` is validated against OPTION_LABELS in `new`.
        self.option(self.correct).unwrap_or_default()
    }

    pub fn option(&self, label: char) -> Option<&str> {
        label_position(label.to_ascii_uppercase()).map(|i| self.options[i].as_str())
    }

    /// `(label, text)` pairs in display order.
    pub fn options(&self) -> impl Iterator<Item = (char, &str)> {
        OPTION_LABELS
            .iter()
            .copied()
            .zip(self.options.iter().map(String::as_str))
    }
}

/// Position of a label in [`OPTION_LABELS`].
pub fn label_position(label: char) -> Option<usize> {
    OPTION_LABELS.iter().position(|l| *l == label)
}

/// Accepts `"b"`, `"B"`, `"B."`, `"B)"` and `"B. Paris"`.
fn parse_label(raw: &str) -> Option<char> {
    let raw = raw.trim();
    let mut chars = raw.chars();
    let letter = chars.next()?.to_ascii_uppercase();
    match chars.next() {
        None => Some(letter),
        Some('.' | ')' | ':') => Some(letter),
        Some(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Vec<(&'static str, &'static str)> {
        vec![("A", "London"), ("B", "Paris"), ("C", "Rome"), ("D", "Madrid")]
    }

    #[test]
    fn test_builds_valid_question() {
        let q = Question::new(0, "Capital of France?", options(), "b", "It is Paris.").unwrap();
        assert_eq!(q.correct_label(), 'B');
        assert_eq!(q.correct_text(), "Paris");
        assert_eq!(q.option('c'), Some("Rome"));
        assert_eq!(q.options().count(), 4);
    }

    #[test]
    fn test_accepts_decorated_labels() {
        let opts = vec![("a)", "1"), ("B.", "2"), ("c", "3"), ("D:", "4")];
        let q = Question::new(0, "Pick", opts, "D. 4", "").unwrap();
        assert_eq!(q.correct_text(), "4");
    }

    #[test]
    fn test_rejects_wrong_option_count() {
        let opts = vec![("A", "1"), ("B", "2"), ("C", "3")];
        let err = Question::new(2, "Pick", opts, "A", "").unwrap_err();
        assert!(matches!(err, DeckError::OptionCount { index: 2, found: 3 }));
    }

    #[test]
    fn test_rejects_duplicate_and_unknown_labels() {
        let dup = vec![("A", "1"), ("A", "2"), ("C", "3"), ("D", "4")];
        assert!(matches!(
            Question::new(0, "Pick", dup, "A", ""),
            Err(DeckError::OptionLabel { .. })
        ));

        let bad = vec![("A", "1"), ("B", "2"), ("C", "3"), ("E", "4")];
        assert!(matches!(
            Question::new(0, "Pick", bad, "A", ""),
            Err(DeckError::OptionLabel { .. })
        ));
    }

    #[test]
    fn test_rejects_answer_outside_options() {
        let err = Question::new(1, "Pick", options(), "E", "").unwrap_err();
        assert!(matches!(err, DeckError::AnswerNotInOptions { index: 1, .. }));
    }

    #[test]
    fn test_rejects_empty_prompt() {
        assert!(matches!(
            Question::new(0, "   ", options(), "A", ""),
            Err(DeckError::EmptyPrompt { index: 0 })
        ));
    }
}
