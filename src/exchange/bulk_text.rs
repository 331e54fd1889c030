//! Plain-text bulk add/update.
//!
//! One card per line, fields separated by `//`:
//! `word // meaning // [gender|note] // [note] // [image]`
//!
//! - 3 fields: the third is a gender keyword or a note
//! - 4 fields: gender + note, or note + image when the third is not a gender
//! - 5 or more: gender (or empty), note, image; the rest is ignored
//!
//! A note that literally reads "neutral" is taken as a gender.

use super::ParseWarning;
use crate::models::{Card, Gender};
use log::warn;

const FIELD_DELIMITER: &str = "//";

/// One parsed line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BulkEntry {
    pub word: String,
    pub meaning: String,
    pub gender: Gender,
    pub note: String,
    pub image: String,
}

impl BulkEntry {
    pub fn parse_line(line: &str) -> Option<BulkEntry> {
        let parts: Vec<&str> = line.split(FIELD_DELIMITER).map(str::trim).collect();
        if parts.len() < 2 {
            return None;
        }
        let (word, meaning) = (parts[0], parts[1]);
        if word.is_empty() || meaning.is_empty() {
            return None;
        }

        let mut entry = BulkEntry {
            word: word.to_string(),
            meaning: meaning.to_string(),
            ..BulkEntry::default()
        };
        match parts.len() {
            2 => {}
            3 => match Gender::from_keyword(parts[2]) {
                Some(gender) => entry.gender = gender,
                None => entry.note = parts[2].to_string(),
            },
            4 => match Gender::from_keyword(parts[2]) {
                Some(gender) => {
                    entry.gender = gender;
                    entry.note = parts[3].to_string();
                }
                None => {
                    entry.note = parts[2].to_string();
                    entry.image = parts[3].to_string();
                }
            },
            _ => {
                entry.gender = Gender::from_keyword(parts[2]).unwrap_or_default();
                entry.note = parts[3].to_string();
                entry.image = parts[4].to_string();
            }
        }
        Some(entry)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BulkParse {
    pub entries: Vec<BulkEntry>,
    pub warnings: Vec<ParseWarning>,
}

/// Splits text into entries. Blank lines are ignored; malformed lines become warnings.
pub fn parse(content: &str) -> BulkParse {
    let mut parsed = BulkParse::default();
    for (index, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match BulkEntry::parse_line(line) {
            Some(entry) => parsed.entries.push(entry),
            None => {
                let warning = ParseWarning::new(index + 1, "expected `word // meaning`");
                warn!("Skipping bulk line {}: {}", warning.line, warning.reason);
                parsed.warnings.push(warning);
            }
        }
    }
    parsed
}

/// Counts reported after a bulk merge.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
}

impl ImportReport {
    pub fn message(&self) -> String {
        let mut message = format!(
            "Import completed!\n{} new cards imported\n{} existing cards updated",
            self.created, self.updated
        );
        if self.skipped > 0 {
            message.push_str(&format!("\n{} lines skipped", self.skipped));
        }
        message
    }
}

/// Whether `upsert` created or updated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Upsert {
    Created,
    Updated,
}

/// Updates the card with the same word in `list_id`, or appends a new one.
/// An existing image is only replaced by a non-empty one.
pub fn upsert(cards: &mut Vec<Card>, list_id: &str, entry: &BulkEntry) -> Upsert {
    match cards
        .iter_mut()
        .find(|c| c.word == entry.word && c.list_id == list_id)
    {
        Some(card) => {
            card.meaning = entry.meaning.clone();
            card.gender = entry.gender;
            card.note = entry.note.clone();
            if !entry.image.is_empty() {
                card.image = entry.image.clone();
            }
            Upsert::Updated
        }
        None => {
            let mut card = Card::new(list_id, &entry.word, &entry.meaning);
            card.gender = entry.gender;
            card.note = entry.note.clone();
            card.image = entry.image.clone();
            cards.push(card);
            Upsert::Created
        }
    }
}

/// Applies parsed entries to a list's cards.
pub fn merge(cards: &mut Vec<Card>, list_id: &str, parsed: &BulkParse) -> ImportReport {
    let mut report = ImportReport {
        skipped: parsed.warnings.len(),
        ..ImportReport::default()
    };
    for entry in &parsed.entries {
        match upsert(cards, list_id, entry) {
            Upsert::Created => report.created += 1,
            Upsert::Updated => report.updated += 1,
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(text: &str) -> BulkEntry {
        BulkEntry::parse_line(text).unwrap()
    }

    #[test]
    fn test_two_fields() {
        let entry = line("Haus // house");
        assert_eq!(entry.word, "Haus");
        assert_eq!(entry.meaning, "house");
        assert_eq!(entry.gender, Gender::None);
        assert_eq!(entry.note, "");
    }

    #[test]
    fn test_three_fields_gender_or_note() {
        assert_eq!(line("Frau // woman // Feminine").gender, Gender::Feminine);

        let entry = line("laufen // to run // irregular");
        assert_eq!(entry.gender, Gender::None);
        assert_eq!(entry.note, "irregular");
    }

    #[test]
    fn test_four_fields_with_gender() {
        let entry = line("Haus // house // neutral // common word");
        assert_eq!(entry.gender, Gender::Neutral);
        assert_eq!(entry.note, "common word");
        assert_eq!(entry.image, "");
    }

    #[test]
    fn test_four_fields_note_and_image() {
        let entry = line("Baum // tree // tall plant // images/tree.png");
        assert_eq!(entry.gender, Gender::None);
        assert_eq!(entry.note, "tall plant");
        assert_eq!(entry.image, "images/tree.png");
    }

    #[test]
    fn test_url_scheme_splits_into_extra_field() {
        // `//` in the URL is a delimiter too
        let entry = line("Baum // tree // tall plant // https://example.com/tree.png");
        assert_eq!(entry.gender, Gender::None);
        assert_eq!(entry.note, "https:");
        assert_eq!(entry.image, "example.com/tree.png");
    }

    #[test]
    fn test_five_or_more_fields() {
        let entry = line("Hund//dog//masculine//pet//dog.png//ignored");
        assert_eq!(entry.gender, Gender::Masculine);
        assert_eq!(entry.note, "pet");
        assert_eq!(entry.image, "dog.png");

        let entry = line("Hund // dog // animal // pet // dog.png");
        assert_eq!(entry.gender, Gender::None);
        assert_eq!(entry.note, "pet");
    }

    #[test]
    fn test_gender_keyword_wins_over_note() {
        let entry = line("Schweiz // Switzerland // neutral");
        assert_eq!(entry.gender, Gender::Neutral);
        assert_eq!(entry.note, "");
    }

    #[test]
    fn test_malformed_lines_become_warnings() {
        let parsed = parse("Haus // house\n\njust a word\n // missing word\nKatze // cat\r\n");
        assert_eq!(parsed.entries.len(), 2);
        assert_eq!(parsed.warnings.len(), 2);
        assert_eq!(parsed.warnings[0].line, 3);
        assert_eq!(parsed.warnings[1].line, 4);
        assert_eq!(parsed.entries[1].meaning, "cat");
    }

    #[test]
    fn test_merge_is_idempotent() {
        let mut cards = Vec::new();
        let parsed = parse("Haus // house // neutral // common word");

        let first = merge(&mut cards, "l1", &parsed);
        assert_eq!((first.created, first.updated), (1, 0));

        let second = merge(&mut cards, "l1", &parsed);
        assert_eq!((second.created, second.updated), (0, 1));
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].note, "common word");
    }

    #[test]
    fn test_update_keeps_progress_and_image() {
        let mut cards = Vec::new();
        merge(&mut cards, "l1", &parse("Baum // tree // tall // tree.png"));
        cards[0].practiced = true;
        cards[0].correct_count = 4;

        merge(&mut cards, "l1", &parse("Baum // a tree // masculine"));

        assert_eq!(cards[0].meaning, "a tree");
        assert_eq!(cards[0].gender, Gender::Masculine);
        assert_eq!(cards[0].note, "");
        assert_eq!(cards[0].image, "tree.png");
        assert!(cards[0].practiced);
        assert_eq!(cards[0].correct_count, 4);
    }

    #[test]
    fn test_same_word_in_other_list_is_new() {
        let mut cards = vec![Card::new("l2", "Haus", "house")];
        let report = merge(&mut cards, "l1", &parse("Haus // home"));
        assert_eq!(report.created, 1);
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].meaning, "house");
    }

    #[test]
    fn test_new_card_counters_zeroed() {
        let mut cards = Vec::new();
        merge(&mut cards, "l1", &parse("Haus // house"));
        let card = &cards[0];
        assert!(!card.known);
        assert!(!card.practiced);
        assert_eq!(card.times_shown + card.correct_count + card.wrong_count, 0);
        assert_eq!(card.list_id, "l1");
    }
}
