use ratatui::prelude::*;
use ratatui::widgets::{Gauge, Paragraph};

use super::panel;
use crate::app::App;
use crate::models::Level;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let progress = app.study.progress();

    let Some(average) = progress.average_percentage() else {
        let widget = Paragraph::new("No exams finished yet. Scores appear here once you finish one.")
            .fg(Color::DarkGray)
            .alignment(Alignment::Center)
            .block(panel("Progress"));
        frame.render_widget(widget, area);
        return;
    };

    let chunks = Layout::vertical([Constraint::Length(3), Constraint::Fill(1)]).split(area);

    let level = Level::from_percentage(average);
    let gauge = Gauge::default()
        .block(panel("Average"))
        .gauge_style(Style::default().fg(level_color(level)))
        .ratio((average / 100.0).clamp(0.0, 1.0))
        .label(format!("{:.0}%  ·  {}", average, level.label()));
    frame.render_widget(gauge, chunks[0]);

    let body = Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[1]);

    let history: Vec<Line> = progress
        .records()
        .iter()
        .rev()
        .map(|record| {
            Line::from(vec![
                Span::styled(
                    record.finished_at.format("%H:%M  ").to_string(),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(record.deck.clone(), Style::default().fg(Color::White)),
                Span::styled(
                    format!("  [{}, {}]", record.area, record.difficulty),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    format!(
                        "  {}/{} ({:.0}%)",
                        record.score.correct,
                        record.score.total,
                        record.score.percentage()
                    ),
                    Style::default().fg(Color::Cyan),
                ),
            ])
        })
        .collect();
    let widget = Paragraph::new(history)
        .scroll((app.scroll, 0))
        .block(panel(&format!("History ({})", progress.records().len())));
    frame.render_widget(widget, body[0]);

    let best: Vec<Line> = progress
        .best_by_deck()
        .into_iter()
        .map(|(deck, percentage)| {
            Line::from(vec![
                Span::styled(deck.to_string(), Style::default().fg(Color::White)),
                Span::styled(
                    format!("  {:.0}%", percentage),
                    Style::default().fg(level_color(Level::from_percentage(percentage))),
                ),
            ])
        })
        .collect();
    let side = Layout::vertical([Constraint::Length(5), Constraint::Fill(1)]).split(body[1]);
    render_by_area(frame, side[0], app);
    frame.render_widget(Paragraph::new(best).block(panel("Best per deck")), side[1]);
}

fn render_by_area(frame: &mut Frame, area: Rect, app: &App) {
    let header = Style::default().fg(Color::DarkGray);
    let mut lines = vec![Line::from(Span::styled(
        format!("{:<20}{:>6}{:>9}", "Area", "Exams", "Average"),
        header,
    ))];
    lines.extend(app.study.progress().by_area().into_iter().map(|summary| {
        Line::from(vec![
            Span::styled(
                format!("{:<20}{:>6}", summary.area.to_string(), summary.exams),
                Style::default().fg(Color::White),
            ),
            Span::styled(
                format!("{:>8.0}%", summary.average),
                Style::default().fg(level_color(Level::from_percentage(summary.average))),
            ),
        ])
    }));
    frame.render_widget(Paragraph::new(lines).block(panel("By area")), area);
}

fn level_color(level: Level) -> Color {
    match level {
        Level::Beginner => Color::Red,
        Level::Intermediate => Color::Yellow,
        Level::Advanced => Color::Green,
    }
}
