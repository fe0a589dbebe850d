//! Turning a generation response into validated questions.
//!
//! Models wrap JSON in Markdown fences, mix key languages and sometimes return
//! options as a list. All of that is tolerated; anything structurally wrong
//! rejects the entire response.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::error::DeckError;
use crate::models::{OPTION_LABELS, Question};

static RE_FENCED_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```[A-Za-z0-9_-]*[ \t]*\r?\n?(.*?)```").unwrap());

static RE_LABEL_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([A-Da-d])[.)]\s+").unwrap());

#[derive(Debug, Deserialize)]
struct RawQuestion {
    #[serde(alias = "pregunta", alias = "prompt")]
    question: String,
    #[serde(alias = "opciones")]
    options: RawOptions,
    #[serde(alias = "respuesta_correcta", alias = "correct", alias = "correct_answer")]
    answer: String,
    #[serde(alias = "explicacion", alias = "explicación")]
    explanation: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawOptions {
    Map(BTreeMap<String, String>),
    List(Vec<String>),
}

impl RawOptions {
    fn into_pairs(self) -> Vec<(String, String)> {
        let pairs: Vec<(String, String)> = match self {
            RawOptions::Map(map) => map.into_iter().collect(),
            RawOptions::List(list) => list
                .into_iter()
                .enumerate()
                .map(|(i, text)| {
                    let label = OPTION_LABELS
                        .get(i)
                        .map(|l| l.to_string())
                        .unwrap_or_else(|| format!("#{}", i + 1));
                    (label, text)
                })
                .collect(),
        };
        strip_own_labels(pairs)
    }
}

/// Drop "A. " style prefixes, but only when every option repeats its own
/// label. "C. difficile" among unlabelled options is kept as written.
fn strip_own_labels(pairs: Vec<(String, String)>) -> Vec<(String, String)> {
    let all_labelled = !pairs.is_empty()
        && pairs.iter().all(|(label, text)| {
            let own = label.trim().chars().next().map(|c| c.to_ascii_uppercase());
            RE_LABEL_PREFIX
                .captures(text.trim())
                .and_then(|caps| caps[1].chars().next())
                .map(|c| c.to_ascii_uppercase())
                .is_some_and(|c| Some(c) == own)
        });

    pairs
        .into_iter()
        .map(|(label, text)| {
            let text = text.trim();
            let text = if all_labelled {
                RE_LABEL_PREFIX.replace(text, "").into_owned()
            } else {
                text.to_string()
            };
            (label, text)
        })
        .collect()
}

/// Return the body of the first fenced block, or the trimmed input if none.
pub fn strip_code_fences(raw: &str) -> &str {
    match RE_FENCED_BLOCK.captures(raw) {
        Some(caps) => caps.get(1).map_or("", |m| m.as_str()).trim(),
        None => raw.trim(),
    }
}

/// Parse a model response into a complete list of questions.
pub fn parse_questions(raw: &str) -> Result<Vec<Question>, DeckError> {
    let body = strip_code_fences(raw);
    let value: Value = serde_json::from_str(body).map_err(|source| DeckError::Json { source })?;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut object) => match object.remove("questions").or_else(|| object.remove("preguntas")) {
            Some(Value::Array(items)) => items,
            _ => return Err(DeckError::NotAList),
        },
        _ => return Err(DeckError::NotAList),
    };

    if items.is_empty() {
        return Err(DeckError::NoQuestions);
    }

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            let index = i + 1;
            let raw: RawQuestion = serde_json::from_value(item)
                .map_err(|source| DeckError::Malformed { index, source })?;
            Question::new(
                index,
                raw.question,
                raw.options.into_pairs(),
                &raw.answer,
                raw.explanation,
            )
        })
        .collect()
}
