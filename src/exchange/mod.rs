//! Import/export formats: plain-text bulk lines, the full CSV backup,
//! the JSON records of the browser edition, and the files they travel in.

pub mod bulk_text;
pub mod csv_backup;
pub mod files;
pub mod legacy_json;

use crate::models::{Card, WordList};
use chrono::{DateTime, Utc};
use log::{info, warn};
use std::collections::HashSet;
use std::fmt;

/// A skipped input line. Not fatal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseWarning {
    pub line: usize,
    pub reason: String,
}

impl ParseWarning {
    pub fn new(line: usize, reason: impl Into<String>) -> Self {
        Self {
            line,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.reason)
    }
}

/// Every list and card of a store, as read from a backup.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StoreSnapshot {
    pub lists: Vec<WordList>,
    pub cards: Vec<Card>,
    pub warnings: Vec<ParseWarning>,
}

impl StoreSnapshot {
    pub fn is_empty(&self) -> bool {
        self.lists.is_empty() && self.cards.is_empty()
    }

    /// Adds a card read at `line`. A repeated id is replaced by a fresh one so both cards survive.
    pub fn push_card(&mut self, mut card: Card, line: usize) {
        if !card.id.is_empty() && self.cards.iter().any(|c| c.id == card.id) {
            let fresh = uuid::Uuid::new_v4().to_string();
            let warning = ParseWarning::new(
                line,
                format!("duplicate card id `{}` replaced by `{}`", card.id, fresh),
            );
            warn!("Import {}", warning);
            self.warnings.push(warning);
            card.id = fresh;
        }
        self.cards.push(card);
    }

    /// Adds a list read at `line`. A repeated id is dropped; the first list with that id wins.
    pub fn push_list(&mut self, list: WordList, line: usize) {
        if self.lists.iter().any(|l| l.id == list.id) {
            let warning = ParseWarning::new(
                line,
                format!("duplicate list id `{}` skipped (`{}`)", list.id, list.name),
            );
            warn!("Import {}", warning);
            self.warnings.push(warning);
            return;
        }
        self.lists.push(list);
    }

    /// Makes the snapshot self-consistent before it replaces a store:
    /// every card has an id and belongs to an existing list, and at least one list exists.
    ///
    /// Lists referenced only by cards are synthesized as `List <id>`. Cards without
    /// a list go to the first list, or to a fresh default list when there is none.
    pub fn reconcile(&mut self, now: DateTime<Utc>) {
        for card in &mut self.cards {
            if card.id.is_empty() {
                card.id = uuid::Uuid::new_v4().to_string();
            }
            card.backfill();
        }

        let mut known_ids: HashSet<String> = self.lists.iter().map(|l| l.id.clone()).collect();
        for card in &self.cards {
            if !card.list_id.is_empty() && known_ids.insert(card.list_id.clone()) {
                info!("Synthesizing list record for {}", card.list_id);
                self.lists.push(WordList {
                    id: card.list_id.clone(),
                    name: format!("List {}", card.list_id),
                    created_at: now,
                });
            }
        }

        if self.lists.is_empty() {
            self.lists.push(WordList::default_list(now));
        }
        let fallback = self.lists[0].id.clone();
        for card in &mut self.cards {
            if card.list_id.is_empty() {
                card.list_id = fallback.clone();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reconcile_synthesizes_lists_from_cards() {
        let mut snapshot = StoreSnapshot {
            cards: vec![
                Card::new("a", "one", "1"),
                Card::new("b", "two", "2"),
                Card::new("a", "three", "3"),
            ],
            ..StoreSnapshot::default()
        };
        snapshot.reconcile(Utc::now());

        let names: Vec<&str> = snapshot.lists.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["List a", "List b"]);
    }

    #[test]
    fn test_reconcile_creates_default_list() {
        let mut card = Card::new("", "one", "1");
        card.id.clear();
        let mut snapshot = StoreSnapshot {
            cards: vec![card],
            ..StoreSnapshot::default()
        };
        snapshot.reconcile(Utc::now());

        assert_eq!(snapshot.lists.len(), 1);
        assert_eq!(snapshot.lists[0].name, "Default List");
        assert_eq!(snapshot.cards[0].list_id, snapshot.lists[0].id);
        assert!(!snapshot.cards[0].id.is_empty());
    }

    #[test]
    fn test_reconcile_keeps_existing_lists() {
        let list = WordList::new("German", Utc::now());
        let mut snapshot = StoreSnapshot {
            lists: vec![list.clone()],
            cards: vec![Card::new(&list.id, "Haus", "house"), Card::new("", "x", "y")],
            ..StoreSnapshot::default()
        };
        snapshot.reconcile(Utc::now());

        assert_eq!(snapshot.lists, vec![list.clone()]);
        assert!(snapshot.cards.iter().all(|c| c.list_id == list.id));
    }

    #[test]
    fn test_duplicate_card_id_gets_fresh_id() {
        let mut snapshot = StoreSnapshot::default();
        let mut first = Card::new("a", "one", "1");
        first.id = "dup".to_string();
        let mut second = Card::new("a", "two", "2");
        second.id = "dup".to_string();

        snapshot.push_card(first, 2);
        snapshot.push_card(second, 3);

        assert_eq!(snapshot.cards.len(), 2);
        assert_eq!(snapshot.cards[0].id, "dup");
        assert_ne!(snapshot.cards[1].id, "dup");
        assert_eq!(snapshot.cards[1].word, "two");
        assert_eq!(snapshot.warnings.len(), 1);
        assert_eq!(snapshot.warnings[0].line, 3);
    }

    #[test]
    fn test_cards_without_id_are_not_duplicates() {
        let mut snapshot = StoreSnapshot::default();
        for word in ["one", "two"] {
            let mut card = Card::new("a", word, "x");
            card.id.clear();
            snapshot.push_card(card, 1);
        }
        assert!(snapshot.warnings.is_empty());
    }

    #[test]
    fn test_duplicate_list_id_keeps_first() {
        let now = Utc::now();
        let mut snapshot = StoreSnapshot::default();
        snapshot.push_list(WordList { id: "l1".into(), name: "German".into(), created_at: now }, 2);
        snapshot.push_list(WordList { id: "l1".into(), name: "Copy".into(), created_at: now }, 5);

        assert_eq!(snapshot.lists.len(), 1);
        assert_eq!(snapshot.lists[0].name, "German");
        assert_eq!(snapshot.warnings.len(), 1);
        assert_eq!(snapshot.warnings[0].line, 5);
    }
}
