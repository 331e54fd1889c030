pub mod card;
pub mod distractors;
pub mod list;
pub mod schedule;
pub mod session;
pub mod settings;
pub mod stats;

pub use card::{Card, Gender};
pub use list::WordList;
pub use session::{Advance, AnswerOption, Direction, Phase, Session, SessionKind, SessionSummary};
pub use settings::Settings;
pub use stats::{Dashboard, SortColumn, SortOrder, StatsFilter, StatsRow};
