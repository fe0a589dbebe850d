use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use super::panel;
use crate::app::App;
use crate::extract::truncate_chars;
use crate::session::Score;

const QUESTION_PREVIEW_LENGTH: usize = 55;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let exam = app.study.exam();
    let score = exam.score();
    let grade_color = grade_color(score.percentage());

    let outer = panel(exam.deck().map_or("Results", |deck| deck.name()));
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let chunks = Layout::vertical([
        Constraint::Length(6),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .split(inner);

    render_score_summary(frame, chunks[0], score, grade_color);
    render_question_breakdown(frame, chunks[1], app);
    render_controls(frame, chunks[2]);
}

fn grade_color(percentage: f64) -> Color {
    match percentage as u32 {
        90..=100 => Color::Green,
        70..=89 => Color::Cyan,
        50..=69 => Color::Yellow,
        _ => Color::Red,
    }
}

fn render_score_summary(frame: &mut Frame, area: Rect, score: Score, grade_color: Color) {
    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "RESULTS",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "{} / {}  ({:.0}%)",
                score.correct,
                score.total,
                score.percentage()
            ),
            Style::default().fg(grade_color).bold(),
        )),
        Line::from(""),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn render_question_breakdown(frame: &mut Frame, area: Rect, app: &App) {
    let exam = app.study.exam();
    let Some(deck) = exam.deck() else {
        return;
    };

    let lines: Vec<Line> = exam
        .outcomes()
        .iter()
        .zip(deck.questions())
        .enumerate()
        .map(|(index, (outcome, question))| {
            let (symbol, color) = if outcome.correct {
                ("+", Color::Green)
            } else {
                ("-", Color::Red)
            };

            let mut spans = vec![
                Span::styled(format!(" {} ", symbol), Style::default().fg(color)),
                Span::styled(
                    format!("{:2}. ", index + 1),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    truncate_chars(question.prompt(), QUESTION_PREVIEW_LENGTH),
                    Style::default().fg(Color::Gray),
                ),
            ];
            if !outcome.correct {
                spans.push(Span::styled(
                    format!("  you: {}  ·  answer: {}", outcome.selected, outcome.expected),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            Line::from(spans)
        })
        .collect();

    let widget = Paragraph::new(lines)
        .block(Block::default().padding(Padding::horizontal(1)))
        .scroll((app.scroll, 0));
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new("up/down scroll  ·  start <deck> retake  ·  progress history")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
