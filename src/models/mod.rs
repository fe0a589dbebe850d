mod deck;
mod progress;
mod question;

pub use deck::{Deck, DeckLibrary};
pub use progress::{AreaSummary, ExamRecord, Level, ProgressLog};
pub use question::{OPTION_LABELS, Question, label_position};
