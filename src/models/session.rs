//! Quiz session state machine.
//! One run of multiple-choice questions over a shuffled batch of cards.

use super::Card;
use crate::error::{Result, TrainerError};
use rand::Rng;
use rand::seq::SliceRandom;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionKind {
    /// First exposure to never-practiced cards.
    Learn,
    /// Review of cards that are ready to practice.
    Practice,
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionKind::Learn => f.write_str("learn"),
            SessionKind::Practice => f.write_str("practice"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    #[default]
    WordToMeaning,
    MeaningToWord,
}

impl Direction {
    pub fn prompt_of<'a>(&self, card: &'a Card) -> &'a str {
        match self {
            Direction::WordToMeaning => &card.word,
            Direction::MeaningToWord => &card.meaning,
        }
    }

    pub fn answer_of<'a>(&self, card: &'a Card) -> &'a str {
        match self {
            Direction::WordToMeaning => &card.meaning,
            Direction::MeaningToWord => &card.word,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Direction::WordToMeaning => "Word → Meaning",
            Direction::MeaningToWord => "Meaning → Word",
        }
    }
}

/// One selectable answer.
#[derive(Clone, Debug, PartialEq)]
pub struct AnswerOption {
    pub card_id: String,
    pub value: String,
    pub image: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Phase {
    Presenting {
        options: Vec<AnswerOption>,
    },
    Answered {
        options: Vec<AnswerOption>,
        selected: String,
        correct_answer: String,
        is_correct: bool,
    },
    Complete,
}

/// Result of moving past the current card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Advance {
    Next(String),
    Complete,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SessionSummary {
    pub kind: SessionKind,
    pub correct: usize,
    pub total: usize,
    pub accuracy: f64,
}

impl SessionSummary {
    pub fn title(&self) -> &'static str {
        match self.kind {
            SessionKind::Learn => "Learning Session Complete",
            SessionKind::Practice => "Practice Session Complete",
        }
    }

    pub fn message(&self) -> String {
        format!(
            "You got {} out of {} correct ({:.1}% accuracy).",
            self.correct, self.total, self.accuracy
        )
    }
}

/// Cards are held by id; the caller owns the card data.
#[derive(Clone, Debug)]
pub struct Session {
    pub kind: SessionKind,
    pub direction: Direction,
    card_ids: Vec<String>,
    current_index: usize,
    correct_count: usize,
    phase: Phase,
}

impl Session {
    /// Shuffles the candidate pool and keeps at most `batch_size` cards.
    /// An empty pool is rejected; the batch size is at least 1.
    pub fn start<R: Rng + ?Sized>(
        kind: SessionKind,
        direction: Direction,
        mut pool: Vec<String>,
        batch_size: usize,
        rng: &mut R,
    ) -> Result<Self> {
        if pool.is_empty() {
            return Err(TrainerError::EmptyPool(kind));
        }
        pool.shuffle(rng);
        pool.truncate(batch_size.max(1));

        Ok(Self {
            kind,
            direction,
            card_ids: pool,
            current_index: 0,
            correct_count: 0,
            phase: Phase::Presenting {
                options: Vec::new(),
            },
        })
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    pub fn card_ids(&self) -> &[String] {
        &self.card_ids
    }

    pub fn current_card_id(&self) -> Option<&str> {
        if self.is_complete() {
            return None;
        }
        self.card_ids.get(self.current_index).map(String::as_str)
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn total_count(&self) -> usize {
        self.card_ids.len()
    }

    pub fn correct_count(&self) -> usize {
        self.correct_count
    }

    pub fn progress_message(&self) -> String {
        format!(
            "Question {} of {}",
            (self.current_index + 1).min(self.total_count()),
            self.total_count()
        )
    }

    /// Sets the option set of the current question.
    pub fn present(&mut self, options: Vec<AnswerOption>) -> Result<()> {
        match self.phase {
            Phase::Complete => Err(TrainerError::InvalidSessionState("session is complete")),
            _ => {
                self.phase = Phase::Presenting { options };
                Ok(())
            }
        }
    }

    pub fn options(&self) -> &[AnswerOption] {
        match &self.phase {
            Phase::Presenting { options } | Phase::Answered { options, .. } => options,
            Phase::Complete => &[],
        }
    }

    pub fn is_presenting(&self) -> bool {
        matches!(self.phase, Phase::Presenting { .. })
    }

    /// Presenting -> Answered. Returns whether `selected` was right.
    pub fn record_answer(&mut self, selected: &str, correct_answer: &str) -> Result<bool> {
        let options = match &mut self.phase {
            Phase::Presenting { options } => std::mem::take(options),
            Phase::Answered { .. } => {
                return Err(TrainerError::InvalidSessionState("answer already submitted"));
            }
            Phase::Complete => {
                return Err(TrainerError::InvalidSessionState("session is complete"));
            }
        };

        let is_correct = selected == correct_answer;
        if is_correct {
            self.correct_count += 1;
        }
        self.phase = Phase::Answered {
            options,
            selected: selected.to_string(),
            correct_answer: correct_answer.to_string(),
            is_correct,
        };
        Ok(is_correct)
    }

    /// Moves to the next card, or completes after the last one.
    pub fn advance(&mut self) -> Result<Advance> {
        if self.is_complete() {
            return Err(TrainerError::InvalidSessionState("session is complete"));
        }
        self.current_index += 1;
        Ok(self.settle())
    }

    /// Drops the current card from the run.
    /// A later card shifts into the same position; removing the last card steps back one.
    pub fn remove_current(&mut self) -> Result<String> {
        if self.is_complete() || self.current_index >= self.card_ids.len() {
            return Err(TrainerError::InvalidSessionState("session is complete"));
        }
        let removed = self.card_ids.remove(self.current_index);
        if self.current_index >= self.card_ids.len() && !self.card_ids.is_empty() {
            self.current_index -= 1;
        }
        self.settle();
        Ok(removed)
    }

    fn settle(&mut self) -> Advance {
        match self.card_ids.get(self.current_index) {
            Some(id) => {
                self.phase = Phase::Presenting {
                    options: Vec::new(),
                };
                Advance::Next(id.clone())
            }
            None => {
                self.phase = Phase::Complete;
                Advance::Complete
            }
        }
    }

    pub fn summary(&self) -> SessionSummary {
        let total = self.total_count();
        let accuracy = if total > 0 {
            self.correct_count as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        SessionSummary {
            kind: self.kind,
            correct: self.correct_count,
            total,
            accuracy,
        }
    }
}
