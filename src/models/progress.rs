use std::collections::BTreeMap;

use chrono::{DateTime, Local};

use crate::llm::{Difficulty, SubjectArea};
use crate::models::Deck;
use crate::session::Score;

/// A finished exam.
#[derive(Debug, Clone)]
pub struct ExamRecord {
    pub deck: String,
    pub area: SubjectArea,
    pub difficulty: Difficulty,
    pub score: Score,
    pub finished_at: DateTime<Local>,
}

/// Average over the exams taken in one subject area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaSummary {
    pub area: SubjectArea,
    pub exams: usize,
    pub average: f64,
}

/// Study level derived from the average score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    pub fn from_percentage(percentage: f64) -> Self {
        match percentage as u32 {
            80..=u32::MAX => Level::Advanced,
            50..=79 => Level::Intermediate,
            _ => Level::Beginner,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Level::Beginner => "Beginner",
            Level::Intermediate => "Intermediate",
            Level::Advanced => "Advanced",
        }
    }
}

/// Completed exams for this run, oldest first. Kept in memory only.
#[derive(Debug, Default)]
pub struct ProgressLog {
    records: Vec<ExamRecord>,
}

impl ProgressLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, deck: &Deck, score: Score) -> &ExamRecord {
        let settings = deck.settings();
        self.records.push(ExamRecord {
            deck: deck.name().to_string(),
            area: settings.area,
            difficulty: settings.difficulty,
            score,
            finished_at: Local::now(),
        });
        &self.records[self.records.len() - 1]
    }

    pub fn records(&self) -> &[ExamRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Mean of per-exam percentages, or `None` before the first exam.
    pub fn average_percentage(&self) -> Option<f64> {
        if self.records.is_empty() {
            return None;
        }
        let sum: f64 = self.records.iter().map(|r| r.score.percentage()).sum();
        Some(sum / self.records.len() as f64)
    }

    pub fn level(&self) -> Option<Level> {
        self.average_percentage().map(Level::from_percentage)
    }

    /// Best percentage per deck, in deck-name order.
    pub fn best_by_deck(&self) -> Vec<(&str, f64)> {
        let mut best: BTreeMap<&str, f64> = BTreeMap::new();
        for record in &self.records {
            let entry = best.entry(record.deck.as_str()).or_insert(0.0);
            *entry = entry.max(record.score.percentage());
        }
        best.into_iter().collect()
    }

    /// Per-area averages, only for areas with at least one exam.
    pub fn by_area(&self) -> Vec<AreaSummary> {
        SubjectArea::ALL
            .into_iter()
            .filter_map(|area| {
                let percentages: Vec<f64> = self
                    .records
                    .iter()
                    .filter(|r| r.area == area)
                    .map(|r| r.score.percentage())
                    .collect();
                if percentages.is_empty() {
                    return None;
                }
                Some(AreaSummary {
                    area,
                    exams: percentages.len(),
                    average: percentages.iter().sum::<f64>() / percentages.len() as f64,
                })
            })
            .collect()
    }
}
