//! Command reference.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Padding, Paragraph};

const COMMANDS: [(&str, &str); 15] = [
    ("load <path>", "Extract text from a PDF, PPTX, XLSX, TXT, MD or CSV file"),
    ("key <api-key>", "Set the model API key for this run"),
    ("verify", "Fact-check the loaded document"),
    ("difficulty <level>", "auto, easy, medium or hard"),
    ("area <area>", "basic or clinical sciences"),
    ("generate <name> [n]", "Create a deck of n questions from the document"),
    ("decks / list", "Show the deck library"),
    ("start <deck>", "Begin an exam on a deck"),
    ("up / down, A-D", "Choose an option during an exam"),
    ("enter", "Submit the answer, then move to the next question"),
    ("reset", "Abandon the current exam"),
    ("delete <deck>", "Remove a deck"),
    ("view <name>", "content, verify, exam, decks or progress"),
    ("help / ?", "Show this help"),
    ("quit / exit", "Leave (Ctrl-C works too)"),
];

pub fn render(frame: &mut Frame, area: Rect) {
    let mut help_text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "AVAILABLE COMMANDS",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
    ];

    help_text.extend(COMMANDS.iter().map(|(command, description)| {
        Line::from(vec![
            Span::styled(format!("  {:<22}", command), Style::default().fg(Color::Yellow)),
            Span::raw(*description),
        ])
    }));

    help_text.extend([
        Line::from(""),
        Line::from(Span::styled(
            "Tab / Shift-Tab switch views  ·  Press Esc or Enter to close",
            Style::default().fg(Color::DarkGray),
        )),
    ]);

    let widget = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Help ")
            .title_style(Style::default().fg(Color::Cyan))
            .padding(Padding::horizontal(2)),
    );

    frame.render_widget(widget, area);
}
