//! Full-store CSV backup.
//!
//! One header row, then `list` rows and `card` rows sharing a fixed 20-column layout.
//! Backups written by the browser edition have list rows one column short
//! (name and creation time shifted left); those are still accepted.

use super::{ParseWarning, StoreSnapshot};
use crate::error::Result;
use crate::models::{Card, Gender, WordList};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use log::{info, warn};
use std::collections::HashMap;

pub const COLUMNS: [&str; 20] = [
    "type",
    "id",
    "word",
    "meaning",
    "gender",
    "note",
    "image",
    "audio",
    "practiced",
    "known",
    "timesShown",
    "correctCount",
    "wrongCount",
    "successRate",
    "lastAskedAt",
    "scheduleIndex",
    "nextDueAt",
    "listId",
    "listName",
    "createdAt",
];

const COL_ID: usize = 1;
const COL_LIST_ID: usize = 17;
const COL_LIST_NAME: usize = 18;
const COL_CREATED_AT: usize = 19;
const LEGACY_LIST_ROW_LEN: usize = COLUMNS.len() - 1;

/// Suggested download name for a backup taken on `date`.
pub fn backup_file_name(date: NaiveDate) -> String {
    format!("vocabulary-flashcards-backup-{}.csv", date.format("%Y-%m-%d"))
}

fn format_timestamp(timestamp: &Option<DateTime<Utc>>) -> String {
    timestamp
        .map(|t| t.to_rfc3339_opts(SecondsFormat::AutoSi, true))
        .unwrap_or_default()
}

fn list_row(list: &WordList) -> Vec<String> {
    let mut row = vec![String::new(); COLUMNS.len()];
    row[0] = "list".to_string();
    row[COL_ID] = list.id.clone();
    row[COL_LIST_NAME] = list.name.clone();
    row[COL_CREATED_AT] = list.created_at.to_rfc3339_opts(SecondsFormat::AutoSi, true);
    row
}

fn card_row(card: &Card, list_name: &str) -> Vec<String> {
    vec![
        "card".to_string(),
        card.id.clone(),
        card.word.clone(),
        card.meaning.clone(),
        card.gender.as_str().to_string(),
        card.note.clone(),
        card.image.clone(),
        card.audio.clone(),
        card.practiced.to_string(),
        card.known.to_string(),
        card.times_shown.to_string(),
        card.correct_count.to_string(),
        card.wrong_count.to_string(),
        card.success_rate.to_string(),
        format_timestamp(&card.last_asked_at),
        card.schedule_index.to_string(),
        format_timestamp(&card.next_due_at),
        card.list_id.clone(),
        list_name.to_string(),
        String::new(),
    ]
}

/// Writes every list and every card.
pub fn export(lists: &[WordList], cards: &[Card]) -> Result<String> {
    let names: HashMap<&str, &str> = lists
        .iter()
        .map(|l| (l.id.as_str(), l.name.as_str()))
        .collect();

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(Vec::new());
    writer.write_record(COLUMNS)?;
    for list in lists {
        writer.write_record(list_row(list))?;
    }
    for card in cards {
        let list_name = names.get(card.list_id.as_str()).copied().unwrap_or("");
        writer.write_record(card_row(card, list_name))?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    let content = String::from_utf8(bytes)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    info!("Exported {} lists and {} cards", lists.len(), cards.len());
    Ok(content)
}

fn is_header(record: &csv::StringRecord) -> bool {
    let joined = record.iter().collect::<Vec<_>>().join(",").to_lowercase();
    joined.trim().starts_with("type,") || (joined.contains("word") && joined.contains("meaning"))
}

fn parse_bool(field: &str) -> bool {
    field.trim().eq_ignore_ascii_case("true")
}

fn parse_count<T: std::str::FromStr + Default>(field: &str) -> T {
    field.trim().parse().unwrap_or_default()
}

/// Decodes one row into a card or a list. Malformed values fall back to defaults.
struct RowReader<'a> {
    record: &'a csv::StringRecord,
    line: usize,
    warnings: &'a mut Vec<ParseWarning>,
}

impl RowReader<'_> {
    fn get(&self, index: usize) -> &str {
        self.record.get(index).unwrap_or("")
    }

    fn owned(&self, index: usize) -> String {
        self.get(index).to_string()
    }

    fn timestamp(&mut self, index: usize) -> Option<DateTime<Utc>> {
        let field = self.get(index).trim();
        if field.is_empty() {
            return None;
        }
        match DateTime::parse_from_rfc3339(field) {
            Ok(t) => Some(t.with_timezone(&Utc)),
            Err(_) => {
                self.warnings.push(ParseWarning::new(
                    self.line,
                    format!("invalid timestamp `{field}` in column {}", COLUMNS[index]),
                ));
                None
            }
        }
    }

    fn card(&mut self, fallback_list_id: &str) -> Card {
        let list_id = match self.get(COL_LIST_ID) {
            "" => fallback_list_id.to_string(),
            id => id.to_string(),
        };
        Card {
            id: self.owned(COL_ID),
            list_id,
            word: self.owned(2),
            meaning: self.owned(3),
            gender: Gender::from(self.owned(4)),
            note: self.owned(5),
            image: self.owned(6),
            audio: self.owned(7),
            practiced: parse_bool(self.get(8)),
            known: parse_bool(self.get(9)),
            times_shown: parse_count(self.get(10)),
            correct_count: parse_count(self.get(11)),
            wrong_count: parse_count(self.get(12)),
            success_rate: parse_count(self.get(13)),
            last_asked_at: self.timestamp(14),
            schedule_index: parse_count(self.get(15)),
            next_due_at: self.timestamp(16),
        }
    }

    fn list(&mut self, now: DateTime<Utc>) -> WordList {
        let (name_col, created_col) = if self.record.len() == LEGACY_LIST_ROW_LEN {
            (COL_LIST_ID, COL_LIST_NAME)
        } else {
            (COL_LIST_NAME, COL_CREATED_AT)
        };
        let id = match self.get(COL_ID) {
            "" => uuid::Uuid::new_v4().to_string(),
            id => id.to_string(),
        };
        let name = match self.get(name_col) {
            "" => format!("List {id}"),
            name => name.to_string(),
        };
        let created_at = self.timestamp(created_col).unwrap_or(now);
        WordList {
            id,
            name,
            created_at,
        }
    }
}

/// Reads a backup. Rows of unknown type or with the wrong number of columns
/// are skipped with a warning. Cards without a list id get `fallback_list_id`.
///
/// The result is not reconciled; see [`StoreSnapshot::reconcile`].
pub fn parse(content: &str, fallback_list_id: &str, now: DateTime<Utc>) -> Result<StoreSnapshot> {
    let mut snapshot = StoreSnapshot::default();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    for (index, result) in reader.records().enumerate() {
        let record = result?;
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(index + 1);

        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        if index == 0 && is_header(&record) {
            continue;
        }

        let row_type = record.get(0).unwrap_or("").trim().to_lowercase();
        let expected = match row_type.as_str() {
            "card" => record.len() == COLUMNS.len(),
            "list" => record.len() == COLUMNS.len() || record.len() == LEGACY_LIST_ROW_LEN,
            _ => {
                let warning = ParseWarning::new(line, format!("unknown row type `{row_type}`"));
                warn!("Skipping CSV {}", warning);
                snapshot.warnings.push(warning);
                continue;
            }
        };
        if !expected {
            let warning = ParseWarning::new(
                line,
                format!("expected {} columns, found {}", COLUMNS.len(), record.len()),
            );
            warn!("Skipping CSV {}", warning);
            snapshot.warnings.push(warning);
            continue;
        }

        let mut row = RowReader {
            record: &record,
            line,
            warnings: &mut snapshot.warnings,
        };
        if row_type == "card" {
            let card = row.card(fallback_list_id);
            snapshot.push_card(card, line);
        } else {
            let list = row.list(now);
            snapshot.push_list(list, line);
        }
    }

    info!(
        "Parsed CSV backup: {} lists, {} cards, {} warnings",
        snapshot.lists.len(),
        snapshot.cards.len(),
        snapshot.warnings.len()
    );
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 1, 9, 30, 0).unwrap()
    }

    fn store() -> (Vec<WordList>, Vec<Card>) {
        let german = WordList::new("German, basics", now() - Duration::days(3));
        let polish = WordList::new("Polish \"core\"", now());

        let mut haus = Card::new(&german.id, "Haus", "house");
        haus.gender = Gender::Neutral;
        haus.note = "line one\nline two, with comma".to_string();
        haus.image = "https://example.com/haus.png".to_string();
        haus.audio = "data:audio/webm;base64,AAAA".to_string();
        haus.practiced = true;
        haus.times_shown = 3;
        haus.correct_count = 2;
        haus.wrong_count = 1;
        haus.success_rate = 2.0 / 3.0;
        haus.schedule_index = 2;
        haus.last_asked_at = Some(now() + Duration::nanoseconds(123_456_789));
        haus.next_due_at = Some(now() + Duration::minutes(720));

        let mut dom = Card::new(&polish.id, "dom", "say \"house\"");
        dom.known = true;

        (vec![german, polish], vec![haus, dom])
    }

    #[test]
    fn test_header_and_quoting() {
        let (lists, cards) = store();
        let content = export(&lists, &cards).unwrap();

        assert!(content.starts_with(
            "type,id,word,meaning,gender,note,image,audio,practiced,known,timesShown,correctCount,wrongCount,successRate,lastAskedAt,scheduleIndex,nextDueAt,listId,listName,createdAt\n"
        ));
        assert!(content.contains("\"German, basics\""));
        assert!(content.contains("\"Polish \"\"core\"\"\""));
        assert!(content.contains("\"line one\nline two, with comma\""));
    }

    #[test]
    fn test_export_then_import_is_lossless() {
        let (lists, cards) = store();
        let content = export(&lists, &cards).unwrap();

        let snapshot = parse(&content, "unused", now()).unwrap();
        assert!(snapshot.warnings.is_empty());
        assert_eq!(snapshot.lists, lists);
        assert_eq!(snapshot.cards, cards);
    }

    #[test]
    fn test_browser_edition_backup() {
        let content = "type,id,word,meaning,gender,note,image,audio,practiced,known,timesShown,correctCount,wrongCount,successRate,lastAskedAt,scheduleIndex,nextDueAt,listId,listName,createdAt\n\
list,lx1,,,,,,,,,,,,,,,,German,2024-01-01T10:00:00.000Z\n\
card,c1,Haus,house,neutral,\"a, b\",,,true,false,4,3,1,0.75,2024-02-01T10:00:00.000Z,2,2024-02-01T22:00:00.000Z,lx1,German,\n";

        let snapshot = parse(content, "fallback", now()).unwrap();
        assert!(snapshot.warnings.is_empty());
        assert_eq!(snapshot.lists.len(), 1);
        assert_eq!(snapshot.lists[0].id, "lx1");
        assert_eq!(snapshot.lists[0].name, "German");
        assert_eq!(
            snapshot.lists[0].created_at,
            Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap()
        );

        let card = &snapshot.cards[0];
        assert_eq!(card.note, "a, b");
        assert_eq!(card.gender, Gender::Neutral);
        assert!(card.practiced);
        assert_eq!(card.times_shown, 4);
        assert_eq!(card.success_rate, 0.75);
        assert_eq!(card.schedule_index, 2);
        assert_eq!(card.list_id, "lx1");
    }

    #[test]
    fn test_missing_values_get_defaults() {
        let content = "card,,Katze,cat,,,,,TRUE,,x,,,NaN,not a date,,,,,\n";
        let mut snapshot = parse(content, "active", now()).unwrap();

        assert_eq!(snapshot.warnings.len(), 1);
        let card = &snapshot.cards[0];
        assert!(card.practiced);
        assert!(!card.known);
        assert_eq!(card.times_shown, 0);
        assert_eq!(card.list_id, "active");
        assert!(card.last_asked_at.is_none());

        snapshot.reconcile(now());
        assert!(!snapshot.cards[0].id.is_empty());
        assert_eq!(snapshot.cards[0].success_rate, 0.0);
        assert_eq!(snapshot.lists[0].id, "active");
    }

    #[test]
    fn test_column_count_mismatch_skipped() {
        let content = "card,c1,Haus,house\nlist,l1,,,,,,,,,,,,,,,,,German,2024-01-01T00:00:00Z\nbogus,row\n";
        let snapshot = parse(content, "active", now()).unwrap();

        assert_eq!(snapshot.cards.len(), 0);
        assert_eq!(snapshot.lists.len(), 1);
        assert_eq!(snapshot.warnings.len(), 2);
        assert_eq!(snapshot.warnings[0].line, 1);
        assert_eq!(snapshot.warnings[1].line, 3);
    }

    #[test]
    fn test_repeated_card_id_keeps_both_rows() {
        let content = "card,dup,Haus,house,,,,,false,false,0,0,0,0,,0,,l1,,\n\
                       card,dup,Katze,cat,,,,,false,false,0,0,0,0,,0,,l1,,\n";
        let snapshot = parse(content, "active", now()).unwrap();

        assert_eq!(snapshot.cards.len(), 2);
        assert_ne!(snapshot.cards[0].id, snapshot.cards[1].id);
        assert_eq!(snapshot.warnings.len(), 1);
        assert_eq!(snapshot.warnings[0].line, 2);
    }

    #[test]
    fn test_empty_input() {
        let snapshot = parse("", "active", now()).unwrap();
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_backup_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(backup_file_name(date), "vocabulary-flashcards-backup-2024-03-09.csv");
    }
}
