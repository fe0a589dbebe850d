//! Command bar parser and executor.
//!
//! Handles commands like `load`, `generate`, `start`, `delete`, etc.

use crate::app::{App, View};
use crate::config::MAX_QUESTION_COUNT;
use crate::llm::{Difficulty, SubjectArea, TextGenerator};
use crate::session::ExamPhase;

/// Result of executing a command.
#[derive(Debug, PartialEq, Eq)]
pub enum CommandResult {
    /// Command executed successfully with optional message.
    Ok(Option<String>),
    /// Command failed with an error message.
    Error(String),
    /// App should quit.
    Quit,
}

/// Banner to show while a command waits on the model, if it does.
pub fn busy_message(input: &str) -> Option<String> {
    let mut parts = input.split_whitespace();
    match parts.next()?.to_lowercase().as_str() {
        "verify" => Some("Asking the model to fact-check your material...".to_string()),
        "generate" | "gen" => {
            let args: Vec<&str> = parts.collect();
            let (name, _) = split_name_and_count(&args);
            Some(format!("Generating deck '{}'...", name.join(" ")))
        }
        _ => None,
    }
}

/// Parse and execute a command.
pub async fn execute_command<G: TextGenerator>(
    app: &mut App,
    generator: &G,
    input: &str,
) -> CommandResult {
    let input = input.trim();
    if input.is_empty() {
        return CommandResult::Ok(None);
    }

    let parts: Vec<&str> = input.split_whitespace().collect();
    let command = parts[0].to_lowercase();
    let args = &parts[1..];
    // Verbatim remainder, for paths with repeated spaces.
    let rest = input[parts[0].len()..].trim();

    match command.as_str() {
        "load" | "open" => cmd_load(app, rest),
        "key" => cmd_key(app, args),
        "verify" => cmd_verify(app, generator).await,
        "difficulty" => cmd_difficulty(app, args),
        "area" => cmd_area(app, args),
        "generate" | "gen" => cmd_generate(app, generator, args).await,
        "decks" | "list" => {
            app.show(View::Decks);
            CommandResult::Ok(None)
        }
        "start" => cmd_start(app, args),
        "delete" | "rm" => cmd_delete(app, args),
        "reset" | "abandon" => cmd_reset(app),
        "view" => cmd_view(app, args),
        "help" | "?" => {
            app.show(View::Help);
            CommandResult::Ok(None)
        }
        "quit" | "exit" => CommandResult::Quit,
        _ => CommandResult::Error(format!(
            "Unknown command: {}. Type 'help' for available commands.",
            command
        )),
    }
}

/// Extract text from a document.
fn cmd_load(app: &mut App, path: &str) -> CommandResult {
    if path.is_empty() {
        return CommandResult::Error("Usage: load <path>".to_string());
    }

    app.show(View::Content);
    match app.study.load_document(path) {
        Ok(content) => CommandResult::Ok(Some(format!(
            "Loaded {} ({} words). Next: `verify` or `generate <name>`.",
            content.file_name(),
            content.word_count()
        ))),
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

fn cmd_key(app: &mut App, args: &[&str]) -> CommandResult {
    let Some(raw) = args.first() else {
        return CommandResult::Error("Usage: key <api-key>".to_string());
    };

    match app.study.set_api_key(raw) {
        Ok(()) => {
            let hint = app.study.api_key().map(|k| k.hint()).unwrap_or_default();
            CommandResult::Ok(Some(format!("API key set ({hint}). It is kept in memory only.")))
        }
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

async fn cmd_verify<G: TextGenerator>(app: &mut App, generator: &G) -> CommandResult {
    app.show(View::Verification);
    match app.study.verify(generator).await {
        Ok(report) => {
            let (correct, partial, incorrect) = report.tally();
            CommandResult::Ok(Some(format!(
                "Verification done: {correct} correct, {partial} partially correct, {incorrect} incorrect."
            )))
        }
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

fn cmd_difficulty(app: &mut App, args: &[&str]) -> CommandResult {
    let Some(raw) = args.first() else {
        return CommandResult::Ok(Some(format!(
            "Difficulty: {}. Usage: difficulty <auto|easy|medium|hard>",
            app.study.settings().difficulty
        )));
    };

    match raw.parse::<Difficulty>() {
        Ok(difficulty) => {
            app.study.settings_mut().difficulty = difficulty;
            CommandResult::Ok(Some(format!("Difficulty set to {difficulty}.")))
        }
        Err(e) => CommandResult::Error(e),
    }
}

fn cmd_area(app: &mut App, args: &[&str]) -> CommandResult {
    let Some(raw) = args.first() else {
        return CommandResult::Ok(Some(format!(
            "Subject area: {}. Usage: area <basic|clinical>",
            app.study.settings().area
        )));
    };

    match raw.parse::<SubjectArea>() {
        Ok(area) => {
            app.study.settings_mut().area = area;
            CommandResult::Ok(Some(format!("Subject area set to {area}.")))
        }
        Err(e) => CommandResult::Error(e),
    }
}

/// `generate <name> [count]`; a trailing number is the count.
async fn cmd_generate<G: TextGenerator>(
    app: &mut App,
    generator: &G,
    args: &[&str],
) -> CommandResult {
    let (name_parts, count) = split_name_and_count(args);
    if name_parts.is_empty() {
        return CommandResult::Error(format!(
            "Usage: generate <name> [count 1-{MAX_QUESTION_COUNT}]"
        ));
    }

    let name = name_parts.join(" ");
    match app.study.generate_deck(generator, &name, count).await {
        Ok(deck) => {
            app.show(View::Decks);
            CommandResult::Ok(Some(format!(
                "Deck '{}' created with {} questions. `start {}` to begin.",
                deck.name(),
                deck.len(),
                deck.name()
            )))
        }
        Err(e) => CommandResult::Error(format!("Deck not created: {e}")),
    }
}

fn split_name_and_count<'a, 'b>(args: &'a [&'b str]) -> (&'a [&'b str], Option<usize>) {
    match args.split_last() {
        Some((last, rest)) if !rest.is_empty() => match last.parse::<usize>() {
            Ok(count) => (rest, Some(count)),
            Err(_) => (args, None),
        },
        _ => (args, None),
    }
}

fn cmd_start(app: &mut App, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Error("Usage: start <deck>".to_string());
    }

    match app.study.start_exam(&args.join(" ")) {
        Ok(deck) => {
            app.show(View::Exam);
            CommandResult::Ok(Some(format!(
                "Exam '{}' started: {} questions. Up/Down to choose, Enter to answer.",
                deck.name(),
                deck.len()
            )))
        }
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

fn cmd_delete(app: &mut App, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Error("Usage: delete <deck>".to_string());
    }

    match app.study.delete_deck(&args.join(" ")) {
        Ok(deck) => CommandResult::Ok(Some(format!("Deleted deck '{}'.", deck.name()))),
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

fn cmd_reset(app: &mut App) -> CommandResult {
    if app.study.exam().phase() == ExamPhase::NotStarted {
        return CommandResult::Error("No exam to reset.".to_string());
    }
    app.study.abandon_exam();
    CommandResult::Ok(Some("Exam reset.".to_string()))
}

fn cmd_view(app: &mut App, args: &[&str]) -> CommandResult {
    let Some(name) = args.first() else {
        return CommandResult::Error(
            "Usage: view <content|verify|exam|decks|progress>".to_string(),
        );
    };

    match View::parse(name) {
        Some(view) => {
            app.show(view);
            CommandResult::Ok(None)
        }
        None => CommandResult::Error(format!("Unknown view: {}", name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::study::StudyState;
    use crate::study::tests::{CannedGenerator, PARIS_DECK, loaded_state};

    async fn run(app: &mut App, generator: &CannedGenerator, input: &str) -> CommandResult {
        execute_command(app, generator, input).await
    }

    #[tokio::test]
    async fn test_unknown_and_empty_commands() {
        let mut app = App::new(StudyState::new(Config::default(), None));
        let generator = CannedGenerator::rejecting();

        assert_eq!(run(&mut app, &generator, "   ").await, CommandResult::Ok(None));
        assert!(matches!(
            run(&mut app, &generator, "dance").await,
            CommandResult::Error(msg) if msg.contains("Unknown command: dance")
        ));
        assert_eq!(run(&mut app, &generator, "EXIT").await, CommandResult::Quit);
    }

    #[tokio::test]
    async fn test_generate_start_and_delete_flow() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(loaded_state(&dir));
        let generator = CannedGenerator::replying(PARIS_DECK);

        let result = run(&mut app, &generator, "generate world capitals 2").await;
        assert!(matches!(result, CommandResult::Ok(Some(ref m)) if m.contains("'world capitals'")));
        assert_eq!(app.view, View::Decks);

        let result = run(&mut app, &generator, "start world capitals").await;
        assert!(matches!(result, CommandResult::Ok(Some(_))));
        assert_eq!(app.view, View::Exam);
        assert_eq!(app.study.exam().phase(), ExamPhase::Unanswered);

        assert!(matches!(
            run(&mut app, &generator, "delete geography").await,
            CommandResult::Error(msg) if msg.contains("No deck named 'geography'")
        ));
        assert_eq!(app.study.library().len(), 1);

        assert!(matches!(
            run(&mut app, &generator, "delete world capitals").await,
            CommandResult::Ok(Some(_))
        ));
        assert!(app.study.library().is_empty());

        assert!(matches!(run(&mut app, &generator, "reset").await, CommandResult::Ok(Some(_))));
        assert_eq!(app.study.exam().phase(), ExamPhase::NotStarted);
    }

    #[tokio::test]
    async fn test_generate_failure_reports_and_stores_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(loaded_state(&dir));

        let result = run(&mut app, &CannedGenerator::replying("not json"), "generate broken").await;
        assert!(matches!(result, CommandResult::Error(ref m) if m.starts_with("Deck not created")));
        assert!(app.study.library().is_empty());

        let result = run(&mut app, &CannedGenerator::rejecting(), "generate broken").await;
        assert!(matches!(result, CommandResult::Error(ref m) if m.contains("API key")));
    }

    #[tokio::test]
    async fn test_load_keeps_repeated_spaces_in_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("My  Notes.md");
        std::fs::write(&path, "# Cardio\nThe SA node sets the rhythm.").unwrap();
        let mut app = App::new(StudyState::new(Config::default(), None));
        let generator = CannedGenerator::rejecting();

        let result = run(&mut app, &generator, &format!("load {}", path.display())).await;
        assert!(matches!(result, CommandResult::Ok(Some(ref m)) if m.starts_with("Loaded My  Notes.md")));
        assert_eq!(app.study.content().unwrap().source, path);

        assert!(matches!(run(&mut app, &generator, "load").await, CommandResult::Error(_)));
    }

    #[tokio::test]
    async fn test_settings_commands() {
        let mut app = App::new(StudyState::new(Config::default(), None));
        let generator = CannedGenerator::rejecting();

        assert!(matches!(run(&mut app, &generator, "difficulty hard").await, CommandResult::Ok(_)));
        assert_eq!(app.study.settings().difficulty, Difficulty::Hard);
        assert!(matches!(run(&mut app, &generator, "difficulty extreme").await, CommandResult::Error(_)));

        assert!(matches!(run(&mut app, &generator, "area clinical").await, CommandResult::Ok(_)));
        assert_eq!(app.study.settings().area, SubjectArea::Clinical);

        assert!(matches!(run(&mut app, &generator, "key").await, CommandResult::Error(_)));
        assert!(matches!(run(&mut app, &generator, "key sk-abcd9876").await, CommandResult::Ok(_)));
        assert_eq!(app.study.api_key().unwrap().expose(), "sk-abcd9876");
    }

    #[tokio::test]
    async fn test_verify_without_content_blocks() {
        let mut app = App::new(StudyState::new(Config::default(), None));
        let generator = CannedGenerator::replying("- **Correct:** x");

        assert!(matches!(
            run(&mut app, &generator, "verify").await,
            CommandResult::Error(msg) if msg.contains("Load a document first")
        ));
        assert_eq!(app.view, View::Verification);
        assert_eq!(generator.calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_view_and_help_commands() {
        let mut app = App::new(StudyState::new(Config::default(), None));
        let generator = CannedGenerator::rejecting();

        run(&mut app, &generator, "view progress").await;
        assert_eq!(app.view, View::Progress);
        run(&mut app, &generator, "?").await;
        assert_eq!(app.view, View::Help);
        assert_eq!(app.previous_view, Some(View::Progress));
        assert!(matches!(run(&mut app, &generator, "view nowhere").await, CommandResult::Error(_)));
    }

    #[test]
    fn test_busy_message_only_for_model_commands() {
        assert!(busy_message("verify").is_some());
        assert_eq!(busy_message("generate cardio 5").unwrap(), "Generating deck 'cardio'...");
        assert_eq!(busy_message("gen 2024 review").unwrap(), "Generating deck '2024 review'...");
        assert!(busy_message("load notes.pdf").is_none());
        assert!(busy_message("").is_none());
    }
}
