//! Card is a vocabulary entry <word, meaning> with its practice history.
use super::schedule::LADDER_MINUTES;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Grammatical gender of a word. Only used for presentation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Gender {
    #[default]
    None,
    Masculine,
    Feminine,
    Neutral,
}

impl Gender {
    pub const KEYWORDS: [(&'static str, Gender); 3] = [
        ("masculine", Gender::Masculine),
        ("feminine", Gender::Feminine),
        ("neutral", Gender::Neutral),
    ];

    /// Case-insensitive keyword match. Anything else is `None`.
    pub fn from_keyword(text: &str) -> Option<Gender> {
        let lower = text.trim().to_lowercase();
        Self::KEYWORDS
            .iter()
            .find(|(keyword, _)| *keyword == lower)
            .map(|(_, gender)| *gender)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::None => "",
            Gender::Masculine => "masculine",
            Gender::Feminine => "feminine",
            Gender::Neutral => "neutral",
        }
    }

    /// Capitalized label, empty for `None`.
    pub fn label(&self) -> &'static str {
        match self {
            Gender::None => "",
            Gender::Masculine => "Masculine",
            Gender::Feminine => "Feminine",
            Gender::Neutral => "Neutral",
        }
    }
}

impl From<String> for Gender {
    fn from(value: String) -> Self {
        Gender::from_keyword(&value).unwrap_or_default()
    }
}

impl From<Gender> for String {
    fn from(value: Gender) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub list_id: String,
    pub word: String,
    pub meaning: String,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub note: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub image: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub audio: String,
    #[serde(default)]
    pub practiced: bool,
    #[serde(default)]
    pub known: bool,
    #[serde(default)]
    pub times_shown: u32,
    #[serde(default)]
    pub correct_count: u32,
    #[serde(default)]
    pub wrong_count: u32,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub success_rate: f64,
    #[serde(default)]
    pub schedule_index: usize,
    #[serde(default)]
    pub last_asked_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub next_due_at: Option<DateTime<Utc>>,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

impl Card {
    /// A fresh card: counters zeroed, never practiced, not known.
    pub fn new(list_id: &str, word: &str, meaning: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            list_id: list_id.to_string(),
            word: word.to_string(),
            meaning: meaning.to_string(),
            gender: Gender::None,
            note: String::new(),
            image: String::new(),
            audio: String::new(),
            practiced: false,
            known: false,
            times_shown: 0,
            correct_count: 0,
            wrong_count: 0,
            success_rate: 0.0,
            schedule_index: 0,
            last_asked_at: None,
            next_due_at: None,
        }
    }

    /// `correct / (correct + wrong)`, 0 before the first answer.
    pub fn computed_success_rate(&self) -> f64 {
        let answered = self.correct_count + self.wrong_count;
        if answered == 0 {
            0.0
        } else {
            self.correct_count as f64 / answered as f64
        }
    }

    pub fn has_note(&self) -> bool {
        !self.note.trim().is_empty()
    }

    pub fn has_audio(&self) -> bool {
        !self.audio.trim().is_empty()
    }

    /// Brings a record loaded from an older or foreign source into shape:
    /// schedule index inside the ladder, a finite non-negative success rate.
    pub fn backfill(&mut self) {
        self.schedule_index = self.schedule_index.min(LADDER_MINUTES.len() - 1);
        if !self.success_rate.is_finite() || self.success_rate < 0.0 {
            self.success_rate = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_creation() {
        let card = Card::new("list-1", "Haus", "house");

        assert_eq!(card.word, "Haus");
        assert_eq!(card.meaning, "house");
        assert_eq!(card.list_id, "list-1");
        assert!(!card.practiced);
        assert!(!card.known);
        assert_eq!(card.times_shown, 0);
        assert_eq!(card.schedule_index, 0);
        assert!(card.next_due_at.is_none());
    }

    #[test]
    fn test_card_ids_are_unique() {
        let a = Card::new("l", "a", "b");
        let b = Card::new("l", "a", "b");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_gender_keywords() {
        assert_eq!(Gender::from_keyword("Feminine"), Some(Gender::Feminine));
        assert_eq!(Gender::from_keyword(" NEUTRAL "), Some(Gender::Neutral));
        assert_eq!(Gender::from_keyword("common word"), None);
        assert_eq!(Gender::from("something".to_string()), Gender::None);
        assert_eq!(Gender::Masculine.label(), "Masculine");
    }

    #[test]
    fn test_success_rate_before_first_answer() {
        let card = Card::new("l", "a", "b");
        assert_eq!(card.computed_success_rate(), 0.0);
    }

    #[test]
    fn test_backfill_clamps_schedule_and_rate() {
        let mut card = Card::new("l", "a", "b");
        card.schedule_index = 40;
        card.success_rate = f64::NAN;
        card.backfill();

        assert_eq!(card.schedule_index, LADDER_MINUTES.len() - 1);
        assert_eq!(card.success_rate, 0.0);
    }

    #[test]
    fn test_deserialize_sparse_record() {
        let json = r#"{"id":"abc","word":"Hund","meaning":"dog","successRate":null,"note":null}"#;
        let card: Card = serde_json::from_str(json).unwrap();

        assert_eq!(card.gender, Gender::None);
        assert_eq!(card.note, "");
        assert_eq!(card.audio, "");
        assert!(!card.known);
        assert_eq!(card.success_rate, 0.0);
    }
}
