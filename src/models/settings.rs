//! User preferences, stored as one JSON document.
use super::Direction;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub batch_size: usize,
    pub direction: Direction,
    /// How long an answered question stays on screen.
    pub answer_delay_ms: u64,
    pub night_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            batch_size: 10,
            direction: Direction::WordToMeaning,
            answer_delay_ms: 700,
            night_mode: false,
        }
    }
}

impl Settings {
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.max(1)
    }
}
