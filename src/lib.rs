pub mod config;
pub mod database;
pub mod error;
pub mod exchange;
pub mod models;
pub mod trainer;

pub use config::Config;
pub use database::{RecordStore, SqliteStore};
pub use error::{Confirmation, Result, TrainerError};
pub use models::{Card, Gender, SessionKind, Settings, WordList};
pub use trainer::{Feedback, Question, RecordingTicket, RestoreReport, Trainer};
