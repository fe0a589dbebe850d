/// How a line of the verification report judges a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Partial,
    Incorrect,
    /// Headings, analysis, sources and anything else.
    Neutral,
}

impl Verdict {
    /// Classify one Markdown line by its leading label.
    pub fn classify(line: &str) -> Self {
        let normalised: String = line
            .trim_start()
            .trim_start_matches(['-', '*', '•', ' ', '🟢', '🟡', '🔴'])
            .to_lowercase();

        // "partially correct" and "incorrect" both contain "correct".
        if normalised.starts_with("partially correct") || normalised.starts_with("partial") {
            Verdict::Partial
        } else if normalised.starts_with("incorrect") {
            Verdict::Incorrect
        } else if normalised.starts_with("correct") {
            Verdict::Correct
        } else {
            Verdict::Neutral
        }
    }
}

/// Free-form Markdown returned by the fact-check request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationReport {
    pub markdown: String,
}

impl VerificationReport {
    pub fn new(markdown: impl Into<String>) -> Self {
        Self {
            markdown: markdown.into().trim().to_string(),
        }
    }

    pub fn lines(&self) -> impl Iterator<Item = (Verdict, &str)> {
        self.markdown.lines().map(|line| (Verdict::classify(line), line))
    }

    /// Counts of (correct, partial, incorrect) claims.
    pub fn tally(&self) -> (usize, usize, usize) {
        self.lines().fold((0, 0, 0), |(c, p, i), (verdict, _)| match verdict {
            Verdict::Correct => (c + 1, p, i),
            Verdict::Partial => (c, p + 1, i),
            Verdict::Incorrect => (c, p, i + 1),
            Verdict::Neutral => (c, p, i),
        })
    }
}
