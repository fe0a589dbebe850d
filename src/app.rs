//! Terminal application: view state, key handling and the event loop.

use std::io;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::commands::{CommandResult, busy_message, execute_command};
use crate::error::{AppError, SessionError};
use crate::llm::TextGenerator;
use crate::session::ExamPhase;
use crate::study::StudyState;
use crate::terminal::{self, AppTerminal};
use crate::ui;

const MAX_NOTICES: usize = 100;

/// What the main panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Content,
    Verification,
    Exam,
    Decks,
    Progress,
    Help,
}

impl View {
    /// Views reachable with Tab, in order.
    pub const CYCLE: [View; 5] = [
        View::Content,
        View::Verification,
        View::Exam,
        View::Decks,
        View::Progress,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            View::Content => "Content",
            View::Verification => "Verify",
            View::Exam => "Exam",
            View::Decks => "Decks",
            View::Progress => "Progress",
            View::Help => "Help",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "content" | "upload" => Some(View::Content),
            "verify" | "verification" => Some(View::Verification),
            "exam" | "quiz" => Some(View::Exam),
            "decks" | "library" => Some(View::Decks),
            "progress" => Some(View::Progress),
            "help" => Some(View::Help),
            _ => None,
        }
    }

    fn step(&self, forward: bool) -> Self {
        let len = Self::CYCLE.len();
        let position = Self::CYCLE.iter().position(|v| v == self).unwrap_or(0);
        let next = if forward {
            (position + 1) % len
        } else {
            (position + len - 1) % len
        };
        Self::CYCLE[next]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A banner message shown under the main panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

pub struct App {
    pub study: StudyState,
    pub view: View,
    /// Where to return when Help closes.
    pub previous_view: Option<View>,
    pub command_input: String,
    pub notices: Vec<Notice>,
    /// Set while a model request is in flight.
    pub busy: Option<String>,
    pub scroll: u16,
    pub should_quit: bool,
}

impl App {
    pub fn new(study: StudyState) -> Self {
        Self {
            study,
            view: View::default(),
            previous_view: None,
            command_input: String::new(),
            notices: Vec::new(),
            busy: None,
            scroll: 0,
            should_quit: false,
        }
    }

    pub fn notify(&mut self, level: NoticeLevel, text: impl Into<String>) {
        self.notices.push(Notice {
            level,
            text: text.into(),
        });
        if self.notices.len() > MAX_NOTICES {
            self.notices.remove(0);
        }
    }

    pub fn last_notice(&self) -> Option<&Notice> {
        self.notices.last()
    }

    pub fn show(&mut self, view: View) {
        if view == View::Help && self.view != View::Help {
            self.previous_view = Some(self.view);
        }
        self.view = view;
        self.scroll = 0;
    }

    fn close_help(&mut self) {
        let previous = self.previous_view.take().unwrap_or_default();
        self.show(previous);
    }

    pub fn apply(&mut self, result: CommandResult) {
        match result {
            CommandResult::Ok(Some(msg)) => self.notify(NoticeLevel::Success, msg),
            CommandResult::Ok(None) => {}
            CommandResult::Error(msg) => self.notify(NoticeLevel::Error, msg),
            CommandResult::Quit => self.should_quit = true,
        }
    }

    /// Enter on the exam view with an empty command bar.
    ///
    /// Submits while unanswered, advances once the answer is revealed.
    pub fn exam_action(&mut self) {
        match self.study.exam().phase() {
            ExamPhase::NotStarted => {
                self.notify(NoticeLevel::Info, "Start an exam with `start <deck>`.");
            }
            ExamPhase::Unanswered => match self.study.submit_answer() {
                Ok(outcome) if outcome.correct => self.notify(NoticeLevel::Success, "Correct!"),
                Ok(outcome) => self.notify(
                    NoticeLevel::Error,
                    format!("Incorrect. The answer was: {}", outcome.expected),
                ),
                Err(AppError::Session(SessionError::NoSelection)) => {
                    self.notify(NoticeLevel::Warning, "Select an answer first (Up/Down).");
                }
                Err(e) => self.notify(NoticeLevel::Error, e.to_string()),
            },
            ExamPhase::Answered => match self.study.next_question() {
                Ok(ExamPhase::Complete) => {
                    let score = self.study.exam().score();
                    self.notify(
                        NoticeLevel::Info,
                        format!(
                            "Exam finished: {}/{} ({:.0}%)",
                            score.correct,
                            score.total,
                            score.percentage()
                        ),
                    );
                }
                Ok(_) => {}
                Err(e) => self.notify(NoticeLevel::Error, e.to_string()),
            },
            ExamPhase::Complete => {
                self.notify(NoticeLevel::Info, "Exam finished. `start <deck>` to take another.");
            }
        }
    }

    /// Keys that do not submit the command bar. Returns nothing; quitting is
    /// signalled through `should_quit`.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.view == View::Help
            && self.command_input.is_empty()
            && matches!(key.code, KeyCode::Esc | KeyCode::Enter)
        {
            self.close_help();
            return;
        }

        match key.code {
            // Capital letters pick an option; lowercase stays free for commands.
            KeyCode::Char(label @ 'A'..='D')
                if self.view == View::Exam
                    && self.command_input.is_empty()
                    && self.study.exam().phase() == ExamPhase::Unanswered =>
            {
                if let Err(e) = self.study.select_option(label) {
                    self.notify(NoticeLevel::Warning, e.to_string());
                }
            }
            KeyCode::Char(c) => self.command_input.push(c),
            KeyCode::Backspace => {
                self.command_input.pop();
            }
            KeyCode::Esc => self.command_input.clear(),
            KeyCode::Tab => self.show(self.view.step(true)),
            KeyCode::BackTab => self.show(self.view.step(false)),
            KeyCode::Up if self.view == View::Exam => self.move_selection(false),
            KeyCode::Down if self.view == View::Exam => self.move_selection(true),
            KeyCode::Up | KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::Down | KeyCode::PageDown => self.scroll = self.scroll.saturating_add(1),
            KeyCode::Enter if self.command_input.trim().is_empty() => {
                self.command_input.clear();
                if self.view == View::Exam {
                    self.exam_action();
                }
            }
            _ => {}
        }
    }

    fn move_selection(&mut self, forward: bool) {
        let result = if forward {
            self.study.select_next_option()
        } else {
            self.study.select_previous_option()
        };
        // Frozen selector or no exam: scroll the results instead.
        if result.is_err() {
            self.scroll = if forward {
                self.scroll.saturating_add(1)
            } else {
                self.scroll.saturating_sub(1)
            };
        }
    }
}

/// Take over the terminal and run until the user quits.
pub async fn run<G: TextGenerator>(mut app: App, generator: G) -> io::Result<()> {
    let mut term = terminal::init()?;
    let result = event_loop(&mut term, &mut app, &generator).await;
    terminal::restore()?;
    result
}

async fn event_loop<G: TextGenerator>(
    terminal: &mut AppTerminal,
    app: &mut App,
    generator: &G,
) -> io::Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(frame, app))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        if key.code == KeyCode::Enter && !app.command_input.trim().is_empty() {
            let input = std::mem::take(&mut app.command_input);

            // Model calls block the loop; draw the banner first.
            if let Some(message) = busy_message(&input) {
                app.busy = Some(message);
                terminal.draw(|frame| ui::render(frame, app))?;
            }
            let result = execute_command(app, generator, &input).await;
            app.busy = None;
            app.apply(result);
        } else {
            app.handle_key(key);
        }
    }

    Ok(())
}
