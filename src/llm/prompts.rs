//! Prompt assembly: role instructions, the extracted content, then the task.

use std::fmt;
use std::str::FromStr;

use crate::extract::truncate_chars;

/// A system/user message pair for one completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Difficulty {
    /// Let the model pick a mix.
    #[default]
    Auto,
    Easy,
    Medium,
    Hard,
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" | "adaptive" => Ok(Self::Auto),
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            other => Err(format!(
                "Unknown difficulty '{other}'. Use auto, easy, medium or hard."
            )),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Auto => "auto",
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubjectArea {
    /// Anatomy, physiology, biochemistry...
    #[default]
    Basic,
    /// Neurology, pediatrics, internal medicine...
    Clinical,
}

impl SubjectArea {
    pub const ALL: [SubjectArea; 2] = [SubjectArea::Basic, SubjectArea::Clinical];
}

impl FromStr for SubjectArea {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "clinical" => Ok(Self::Clinical),
            other => Err(format!("Unknown subject area '{other}'. Use basic or clinical.")),
        }
    }
}

impl fmt::Display for SubjectArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic => f.write_str("basic sciences"),
            Self::Clinical => f.write_str("clinical sciences"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationSettings {
    pub count: usize,
    pub difficulty: Difficulty,
    pub area: SubjectArea,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            count: 5,
            difficulty: Difficulty::default(),
            area: SubjectArea::default(),
        }
    }
}

const VERIFY_SYSTEM: &str = "You are a meticulous medical fact-checker reviewing a student's study \
material. You judge scientific accuracy against current, widely accepted references and you never \
invent sources.";

const GENERATE_SYSTEM: &str = "You are a medical educator who writes board-style (USMLE/MIR) \
multiple-choice questions. You answer with JSON only, no commentary.";

pub fn verification_prompt(content: &str, max_chars: usize) -> Prompt {
    let content = truncate_chars(content, max_chars);
    let user = format!(
        "STUDY MATERIAL:\n\"\"\"\n{content}\n\"\"\"\n\n\
         TASK: Review the key claims in the material above. For each claim write one Markdown \
         bullet that starts with exactly one of these labels:\n\
         - **Correct:** the claim is accurate.\n\
         - **Partially correct:** the claim needs clarification; explain what is missing.\n\
         - **Incorrect:** the claim is wrong; give the correction.\n\
         Quote the claim, then add a short analysis and, where relevant, a reference \
         (e.g. \"Source: ILAE 2017\"). Finish with a one-line overall assessment."
    );

    Prompt {
        system: VERIFY_SYSTEM.to_string(),
        user,
    }
}

pub fn generation_prompt(content: &str, settings: &GenerationSettings, max_chars: usize) -> Prompt {
    let content = truncate_chars(content, max_chars);
    let difficulty = match settings.difficulty {
        Difficulty::Auto => "a mix of easy, medium and hard".to_string(),
        other => other.to_string(),
    };
    let user = format!(
        "STUDY MATERIAL:\n\"\"\"\n{content}\n\"\"\"\n\n\
         TASK: Write exactly {count} multiple-choice questions grounded only in the material \
         above. Focus: {area}. Difficulty: {difficulty}. Prefer short clinical vignettes where \
         the material allows.\n\n\
         Respond with a JSON array and nothing else. Each element must have this shape:\n\
         {{\"question\": \"...\", \"options\": {{\"A\": \"...\", \"B\": \"...\", \"C\": \"...\", \
         \"D\": \"...\"}}, \"answer\": \"B\", \"explanation\": \"...\"}}\n\
         Exactly four options A-D, one correct letter, and vary which letter is correct.",
        count = settings.count,
        area = settings.area,
    );

    Prompt {
        system: GENERATE_SYSTEM.to_string(),
        user,
    }
}
