use ratatui::prelude::*;
use ratatui::widgets::{Paragraph, Wrap};

use super::{panel, result};
use crate::app::App;
use crate::models::Question;
use crate::session::{ExamPhase, ExamSession, Outcome};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let exam = app.study.exam();

    match exam.phase() {
        ExamPhase::NotStarted => render_idle(frame, area, app),
        ExamPhase::Complete => result::render(frame, area, app),
        ExamPhase::Unanswered | ExamPhase::Answered => {
            let Some(question) = exam.current_question() else {
                return;
            };
            render_question(frame, area, exam, question, app.scroll);
        }
    }
}

fn render_idle(frame: &mut Frame, area: Rect, app: &App) {
    let hint = if app.study.library().is_empty() {
        "No decks yet. Create one with `generate <name>`."
    } else {
        "Pick a deck with `start <deck>`. `decks` lists them."
    };
    let widget = Paragraph::new(hint)
        .fg(Color::DarkGray)
        .alignment(Alignment::Center)
        .block(panel("Exam"));
    frame.render_widget(widget, area);
}

/// Stem, options and explanation share one wrapped body so a long clinical
/// vignette pushes the options down instead of being cut off.
fn render_question(
    frame: &mut Frame,
    area: Rect,
    exam: &ExamSession,
    question: &Question,
    scroll: u16,
) {
    let outer = panel(exam.deck().map_or("Exam", |deck| deck.name()));
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let chunks = Layout::vertical([
        Constraint::Length(1), // Progress
        Constraint::Fill(1),   // Question, options, explanation
        Constraint::Length(1), // Controls
    ])
    .horizontal_margin(2)
    .split(inner);

    render_progress(frame, chunks[0], exam);

    let outcome = exam.current_outcome();
    let mut lines = vec![
        Line::from(Span::styled(
            question.prompt(),
            Style::default().fg(Color::White).bold(),
        )),
        Line::from(""),
    ];
    lines.extend(option_lines(question, exam.pending(), outcome));
    if let Some(outcome) = outcome {
        lines.extend(explanation_lines(question, outcome));
    }

    let body = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(body, chunks[1]);

    render_controls(frame, chunks[2], exam.phase());
}

fn render_progress(frame: &mut Frame, area: Rect, exam: &ExamSession) {
    let score = exam.score();
    let progress = format!(
        "{}/{}  ·  {} correct so far",
        exam.index() + 1,
        exam.total(),
        score.correct
    );
    let widget = Paragraph::new(progress)
        .alignment(Alignment::Right)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}

fn option_lines<'a>(
    question: &'a Question,
    pending: Option<char>,
    outcome: Option<&Outcome>,
) -> Vec<Line<'a>> {
    let mut lines: Vec<Line> = Vec::with_capacity(8);

    for (label, text) in question.options() {
        let is_selected = pending == Some(label);
        let style = match outcome {
            None if is_selected => Style::default().fg(Color::Cyan).bold(),
            None => Style::default().fg(Color::Gray),
            Some(_) if label == question.correct_label() => Style::default().fg(Color::Green).bold(),
            Some(_) if is_selected => Style::default().fg(Color::Red).bold(),
            Some(_) => Style::default().fg(Color::DarkGray),
        };
        let marker = if is_selected { ">" } else { " " };

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(format!("{}. ", label), style),
            Span::styled(text, style),
        ]));
        lines.push(Line::from(""));
    }

    lines
}

fn explanation_lines<'a>(question: &'a Question, outcome: &Outcome) -> Vec<Line<'a>> {
    let verdict = if outcome.correct {
        Span::styled("Correct!", Style::default().fg(Color::Green).bold())
    } else {
        Span::styled(
            format!("Incorrect. The answer was: {}", outcome.expected),
            Style::default().fg(Color::Red).bold(),
        )
    };

    vec![
        Line::from(Span::styled("─".repeat(20), Style::default().fg(Color::DarkGray))),
        Line::from(verdict),
        Line::from(Span::styled(
            question.explanation(),
            Style::default().fg(Color::Yellow),
        )),
    ]
}

fn render_controls(frame: &mut Frame, area: Rect, phase: ExamPhase) {
    let text = match phase {
        ExamPhase::Answered => "enter next question  ·  pgup/pgdn scroll  ·  reset abandon",
        _ => "up/down or A-D choose  ·  enter submit  ·  pgup/pgdn scroll  ·  reset abandon",
    };
    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
