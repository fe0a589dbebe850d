//! Main renderer: header, active view, notice line and command bar.

mod content;
mod decks;
mod exam;
mod help;
mod progress;
mod result;
mod verify;

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Tabs};

use crate::app::{App, NoticeLevel, View};
use crate::session::ExamPhase;

/// Render the whole screen for the current app state.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    let chunks = Layout::vertical([
        Constraint::Length(3), // Header
        Constraint::Length(1), // Tabs
        Constraint::Min(8),    // Main content
        Constraint::Length(2), // Last notice
        Constraint::Length(3), // Command input
    ])
    .split(area);

    render_header(frame, chunks[0], app);
    render_tabs(frame, chunks[1], app);
    render_main_content(frame, chunks[2], app);
    render_notice(frame, chunks[3], app);
    render_command_input(frame, chunks[4], app);
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let study = &app.study;

    let document = study
        .content()
        .map(|c| c.file_name())
        .unwrap_or_else(|| "none".to_string());

    let (exam_status, status_color) = match study.exam().phase() {
        ExamPhase::NotStarted => ("idle".to_string(), Color::Yellow),
        ExamPhase::Unanswered | ExamPhase::Answered => (
            format!(
                "{}/{}",
                study.exam().index() + 1,
                study.exam().total()
            ),
            Color::Green,
        ),
        ExamPhase::Complete => ("finished".to_string(), Color::Cyan),
    };

    let key = study
        .api_key()
        .map(|k| k.hint())
        .unwrap_or_else(|| "not set".to_string());

    let header_text = format!(
        " Document: {}  |  Decks: {}  |  Exam: {}  |  Key: {}  |  Model: {}",
        document,
        study.library().len(),
        exam_status,
        key,
        study.config().model
    );

    let header = Paragraph::new(header_text)
        .style(Style::default().fg(status_color).bold())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Med Flash ")
                .title_style(Style::default().fg(Color::Cyan).bold()),
        );

    frame.render_widget(header, area);
}

fn render_tabs(frame: &mut Frame, area: Rect, app: &App) {
    let titles: Vec<&str> = View::CYCLE.iter().map(|v| v.title()).collect();
    let selected = View::CYCLE.iter().position(|v| *v == app.view);

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::Cyan).bold())
        .divider("·");

    frame.render_widget(tabs, area);
}

fn render_main_content(frame: &mut Frame, area: Rect, app: &App) {
    match app.view {
        View::Content => content::render(frame, area, app),
        View::Verification => verify::render(frame, area, app),
        View::Exam => exam::render(frame, area, app),
        View::Decks => decks::render(frame, area, app),
        View::Progress => progress::render(frame, area, app),
        View::Help => help::render(frame, area),
    }
}

/// The busy banner wins over the last notice.
fn render_notice(frame: &mut Frame, area: Rect, app: &App) {
    let (text, color) = match (&app.busy, app.last_notice()) {
        (Some(message), _) => (message.as_str(), Color::Magenta),
        (None, Some(notice)) => (notice.text.as_str(), notice_color(notice.level)),
        (None, None) => ("Type `help` for commands.", Color::DarkGray),
    };

    let notice = Paragraph::new(text)
        .style(Style::default().fg(color))
        .block(Block::default().borders(Borders::TOP));

    frame.render_widget(notice, area);
}

fn notice_color(level: NoticeLevel) -> Color {
    match level {
        NoticeLevel::Info => Color::Gray,
        NoticeLevel::Success => Color::Green,
        NoticeLevel::Warning => Color::Yellow,
        NoticeLevel::Error => Color::Red,
    }
}

fn render_command_input(frame: &mut Frame, area: Rect, app: &App) {
    let input_text = format!("> {}", app.command_input);

    let input = Paragraph::new(input_text)
        .style(Style::default().fg(Color::White))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(input, area);

    let cursor_x = area.x + 3 + app.command_input.chars().count() as u16;
    let cursor_y = area.y + 1;
    frame.set_cursor_position(Position::new(cursor_x, cursor_y));
}

/// Bordered panel used by every view.
fn panel(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" {title} "))
        .title_style(Style::default().fg(Color::Cyan))
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::config::Config;
    use crate::study::StudyState;
    use crate::study::tests::{CannedGenerator, PARIS_DECK, loaded_state};

    fn draw(app: &App) -> String {
        draw_sized(app, 100, 30)
    }

    fn draw_sized(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_welcome_screen_without_document() {
        let app = App::new(StudyState::new(Config::default(), None));
        let screen = draw(&app);
        assert!(screen.contains("Med Flash"));
        assert!(screen.contains("load <path>"));
        assert!(screen.contains("not set"));
    }

    #[test]
    fn test_every_view_renders() {
        let mut app = App::new(StudyState::new(Config::default(), None));
        for view in View::CYCLE.into_iter().chain([View::Help]) {
            app.show(view);
            draw(&app);
        }
    }

    #[tokio::test]
    async fn test_exam_view_shows_question_and_options() {
        let dir = tempfile::tempdir().unwrap();
        let mut study = loaded_state(&dir);
        study
            .generate_deck(&CannedGenerator::replying(PARIS_DECK), "capitals", None)
            .await
            .unwrap();
        study.start_exam("capitals").unwrap();
        study.select_option('B').unwrap();

        let mut app = App::new(study);
        app.show(View::Exam);
        let screen = draw(&app);
        assert!(screen.contains("Capital of France"));
        assert!(screen.contains("Paris"));
        assert!(screen.contains("1/2"));
    }

    #[tokio::test]
    async fn test_long_vignette_and_options_are_fully_visible() {
        let stem = format!(
            "{}Which finding best explains the presentation ENDMARK?",
            "A 67-year-old man with long-standing hypertension arrives with sudden tearing chest pain radiating to the back. "
                .repeat(4)
        );
        let long_option = format!(
            "{}OPTIONEND",
            "Aortic dissection involving the ascending aorta with extension into the arch and pericardium ".repeat(2)
        );
        let deck = format!(
            r#"[{{"question": "{stem}", "options": {{"A": "{long_option}", "B": "Pulmonary embolism",
                "C": "Acute pericarditis", "D": "Esophageal rupture"}}, "answer": "A", "explanation": "Tearing pain."}}]"#
        );
        assert!(stem.len() > 450);

        let dir = tempfile::tempdir().unwrap();
        let mut study = loaded_state(&dir);
        study
            .generate_deck(&CannedGenerator::replying(&deck), "vignettes", None)
            .await
            .unwrap();
        study.start_exam("vignettes").unwrap();

        let mut app = App::new(study);
        app.show(View::Exam);
        let screen = draw_sized(&app, 100, 40);
        assert!(screen.contains("ENDMARK?"));
        assert!(screen.contains("OPTIONEND"));
        assert!(screen.contains("Esophageal rupture"));
    }

    #[test]
    fn test_busy_banner_overrides_notice() {
        let mut app = App::new(StudyState::new(Config::default(), None));
        app.notify(NoticeLevel::Error, "old failure");
        app.busy = Some("Generating deck 'x'...".to_string());
        let screen = draw(&app);
        assert!(screen.contains("Generating deck"));
        assert!(!screen.contains("old failure"));
    }
}
