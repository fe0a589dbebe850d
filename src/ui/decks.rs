//! Deck library and generation settings.

use ratatui::prelude::*;
use ratatui::widgets::{Paragraph, Wrap};

use super::panel;
use crate::app::App;
use crate::config::MAX_QUESTION_COUNT;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    render_library(frame, chunks[0], app);
    render_settings(frame, chunks[1], app);
}

fn render_library(frame: &mut Frame, area: Rect, app: &App) {
    let library = app.study.library();
    let active = app.study.exam().deck().map(|deck| deck.name().to_string());

    let lines: Vec<Line> = if library.is_empty() {
        vec![Line::from(Span::styled(
            "No decks yet. Load a document and `generate <name>`.",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        library
            .iter()
            .map(|deck| {
                let is_active = active.as_deref() == Some(deck.name());
                let style = if is_active {
                    Style::default().fg(Color::Green).bold()
                } else {
                    Style::default().fg(Color::White)
                };
                Line::from(vec![
                    Span::styled(format!(" {} ", if is_active { "*" } else { " " }), style),
                    Span::styled(deck.name().to_string(), style),
                    Span::styled(
                        format!("  ({} questions)", deck.len()),
                        Style::default().fg(Color::DarkGray),
                    ),
                ])
            })
            .collect()
    };

    let widget = Paragraph::new(lines)
        .scroll((app.scroll, 0))
        .block(panel(&format!("Decks ({})", library.len())));
    frame.render_widget(widget, area);
}

fn render_settings(frame: &mut Frame, area: Rect, app: &App) {
    let settings = app.study.settings();
    let label = Style::default().fg(Color::DarkGray);
    let value = Style::default().fg(Color::Yellow);

    let lines = vec![
        Line::from(vec![
            Span::styled("Questions   ", label),
            Span::styled(settings.count.to_string(), value),
            Span::styled(format!(" (max {MAX_QUESTION_COUNT})"), label),
        ]),
        Line::from(vec![
            Span::styled("Difficulty  ", label),
            Span::styled(settings.difficulty.to_string(), value),
        ]),
        Line::from(vec![
            Span::styled("Area        ", label),
            Span::styled(settings.area.to_string(), value),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "generate <name> [count]  ·  start <deck>  ·  delete <deck>",
            label,
        )),
    ];

    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(panel("Generation"));
    frame.render_widget(widget, area);
}
