use ratatui::prelude::*;
use ratatui::widgets::{Paragraph, Wrap};

use super::panel;
use crate::app::App;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    match app.study.content() {
        None => render_welcome(frame, area),
        Some(content) => {
            let header = Line::from(vec![
                Span::styled(content.file_name(), Style::default().fg(Color::Cyan).bold()),
                Span::styled(
                    format!(
                        "  {}  ·  {} words  ·  {} chars",
                        content.kind.label(),
                        content.word_count(),
                        content.char_count()
                    ),
                    Style::default().fg(Color::DarkGray),
                ),
            ]);

            let mut lines = vec![header, Line::from("")];
            lines.extend(
                content
                    .preview(app.study.config().preview_chars)
                    .lines()
                    .map(|line| Line::from(line.to_string())),
            );

            let widget = Paragraph::new(lines)
                .wrap(Wrap { trim: false })
                .scroll((app.scroll, 0))
                .block(panel("Content"));
            frame.render_widget(widget, area);
        }
    }
}

fn render_welcome(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "MED FLASH",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from("Turn your study notes into fact-checked exam decks."),
        Line::from(""),
        Line::from(Span::styled(
            "PDF  ·  PPTX  ·  XLSX  ·  TXT  ·  MD  ·  CSV",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        Line::from(vec![
            Span::raw("Start with "),
            Span::styled("load <path>", Style::default().fg(Color::Yellow)),
            Span::raw(", then "),
            Span::styled("verify", Style::default().fg(Color::Yellow)),
            Span::raw(" or "),
            Span::styled("generate <name>", Style::default().fg(Color::Yellow)),
            Span::raw("."),
        ]),
    ];

    let widget = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(panel("Content"));
    frame.render_widget(widget, area);
}
