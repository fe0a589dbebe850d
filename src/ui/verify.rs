//! Fact-check report view.

use ratatui::prelude::*;
use ratatui::widgets::{Paragraph, Wrap};

use super::panel;
use crate::app::App;
use crate::llm::Verdict;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Some(report) = app.study.report() else {
        let hint = if app.study.content().is_some() {
            "Run `verify` to fact-check the loaded document."
        } else {
            "Load a document with `load <path>`, then run `verify`."
        };
        let widget = Paragraph::new(hint)
            .fg(Color::DarkGray)
            .alignment(Alignment::Center)
            .block(panel("Verification"));
        frame.render_widget(widget, area);
        return;
    };

    let (correct, partial, incorrect) = report.tally();
    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!("{correct} correct"), Style::default().fg(Color::Green).bold()),
            Span::raw("  ·  "),
            Span::styled(
                format!("{partial} partially correct"),
                Style::default().fg(Color::Yellow).bold(),
            ),
            Span::raw("  ·  "),
            Span::styled(format!("{incorrect} incorrect"), Style::default().fg(Color::Red).bold()),
        ]),
        Line::from(""),
    ];

    lines.extend(report.lines().map(|(verdict, text)| {
        let style = match verdict {
            Verdict::Correct => Style::default().fg(Color::Green),
            Verdict::Partial => Style::default().fg(Color::Yellow),
            Verdict::Incorrect => Style::default().fg(Color::Red),
            Verdict::Neutral if text.trim_start().starts_with('#') => {
                Style::default().fg(Color::Cyan).bold()
            }
            Verdict::Neutral => Style::default().fg(Color::Gray),
        };
        Line::from(Span::styled(text.to_string(), style))
    }));

    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((app.scroll, 0))
        .block(panel("Verification"));
    frame.render_widget(widget, area);
}
