//! Migration from the browser edition, which stored its cards and lists
//! as two JSON arrays. Older records lack fields added later
//! (known, note, image, audio, gender); those take their defaults.

use super::StoreSnapshot;
use crate::error::Result;
use crate::models::{Card, WordList};
use log::info;

/// Reads the stored arrays. `lists_json` may be absent in very old exports.
///
/// The result is not reconciled; see [`StoreSnapshot::reconcile`].
pub fn parse(cards_json: &str, lists_json: Option<&str>) -> Result<StoreSnapshot> {
    let cards: Vec<Card> = serde_json::from_str(cards_json)?;
    let lists: Vec<WordList> = match lists_json {
        Some(json) if !json.trim().is_empty() => serde_json::from_str(json)?,
        _ => Vec::new(),
    };
    info!(
        "Read {} cards and {} lists from browser storage",
        cards.len(),
        lists.len()
    );

    // Record positions stand in for line numbers
    let mut snapshot = StoreSnapshot::default();
    for (index, list) in lists.into_iter().enumerate() {
        snapshot.push_list(list, index + 1);
    }
    for (index, card) in cards.into_iter().enumerate() {
        snapshot.push_card(card, index + 1);
    }
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gender;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_old_records_backfilled() {
        let cards = r#"[
            {"id":"k1","word":"Haus","meaning":"house","practiced":true,"timesShown":2,
             "correctCount":1,"wrongCount":1,"successRate":0.5,
             "lastAskedAt":"2024-02-01T10:00:00.000Z","scheduleIndex":1,
             "nextDueAt":"2024-02-01T15:00:00.000Z","listId":"l1"},
            {"id":"k2","word":"Frau","meaning":"woman","gender":"feminine","known":true,
             "note":"","image":"","audio":"","listId":"l1"}
        ]"#;
        let lists = r#"[{"id":"l1","name":"German","createdAt":"2024-01-01T00:00:00.000Z"}]"#;

        let snapshot = parse(cards, Some(lists)).unwrap();
        assert_eq!(snapshot.lists.len(), 1);
        assert_eq!(snapshot.cards.len(), 2);

        let haus = &snapshot.cards[0];
        assert!(!haus.known);
        assert_eq!(haus.note, "");
        assert_eq!(haus.gender, Gender::None);
        assert_eq!(haus.success_rate, 0.5);
        assert_eq!(
            haus.next_due_at,
            Some(Utc.with_ymd_and_hms(2024, 2, 1, 15, 0, 0).unwrap())
        );

        let frau = &snapshot.cards[1];
        assert!(frau.known);
        assert_eq!(frau.gender, Gender::Feminine);
        assert_eq!(frau.times_shown, 0);
    }

    #[test]
    fn test_cards_without_lists() {
        let snapshot = parse(r#"[{"id":"k1","word":"a","meaning":"b"}]"#, None).unwrap();
        assert!(snapshot.lists.is_empty());
        assert_eq!(snapshot.cards[0].list_id, "");
    }

    #[test]
    fn test_repeated_ids_reported() {
        let cards = r#"[{"id":"k1","word":"a","meaning":"b"},{"id":"k1","word":"c","meaning":"d"}]"#;
        let lists = r#"[{"id":"l1","name":"One"},{"id":"l1","name":"Two"}]"#;
        let snapshot = parse(cards, Some(lists)).unwrap();

        assert_eq!(snapshot.cards.len(), 2);
        assert_ne!(snapshot.cards[0].id, snapshot.cards[1].id);
        assert_eq!(snapshot.lists.len(), 1);
        assert_eq!(snapshot.warnings.len(), 2);
    }

    #[test]
    fn test_invalid_json_rejected() {
        assert!(parse("{ not json", None).is_err());
    }
}
