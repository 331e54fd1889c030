//! Application state and the operations the front-end calls.
//!
//! `Trainer` owns the record store, the list of word lists, the working copy of
//! the active list's cards, user settings and the running quiz session.
//! Every mutation is committed to the store before the in-memory state changes.

mod practice;

pub use practice::{Feedback, Question, RecordingTicket};

use crate::database::RecordStore;
use crate::error::{Confirmation, Result, TrainerError};
use crate::exchange::bulk_text::{self, BulkEntry, ImportReport, Upsert};
use crate::exchange::{ParseWarning, StoreSnapshot, csv_backup, legacy_json};
use crate::models::stats::{self, Dashboard, SortColumn, SortOrder, StatsFilter, StatsRow};
use crate::models::{Card, Gender, Session, SessionSummary, Settings, WordList};
use chrono::{DateTime, Utc};
use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

const STATE_CURRENT_LIST: &str = "current_list_id";
const STATE_SETTINGS: &str = "settings";

/// Outcome of a whole-store import.
#[derive(Clone, Debug, PartialEq)]
pub struct RestoreReport {
    pub lists: usize,
    pub cards: usize,
    pub warnings: Vec<ParseWarning>,
}

pub struct Trainer<S: RecordStore> {
    store: S,
    lists: Vec<WordList>,
    current_list_id: String,
    cards: Vec<Card>,
    settings: Settings,
    session: Option<Session>,
    last_summary: Option<SessionSummary>,
    recording: Option<String>,
    rng: StdRng,
    clock: fn() -> DateTime<Utc>,
}

impl<S: RecordStore> Trainer<S> {
    /// Loads lists, the active list's cards and settings.
    /// Creates a default list when the store has none.
    pub fn load(store: S) -> Result<Self> {
        let mut trainer = Self {
            store,
            lists: Vec::new(),
            current_list_id: String::new(),
            cards: Vec::new(),
            settings: Settings::default(),
            session: None,
            last_summary: None,
            recording: None,
            rng: StdRng::from_os_rng(),
            clock: Utc::now,
        };
        trainer.reload()?;
        Ok(trainer)
    }

    /// Uses a fixed clock instead of the system time.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    /// Makes shuffling reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    fn reload(&mut self) -> Result<()> {
        let mut lists = self.store.load_lists()?;
        if lists.is_empty() {
            lists.push(WordList::default_list(self.now()));
            self.store.save_lists(&lists)?;
            info!("Created default list");
        }

        let stored = self.store.get_state(STATE_CURRENT_LIST)?;
        let current_list_id = match stored {
            Some(id) if lists.iter().any(|l| l.id == id) => id,
            _ => {
                let id = lists[0].id.clone();
                self.store.set_state(STATE_CURRENT_LIST, &id)?;
                id
            }
        };

        let settings = match self.store.get_state(STATE_SETTINGS)? {
            Some(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                warn!("Ignoring unreadable settings: {}", e);
                Settings::default()
            }),
            None => Settings::default(),
        };

        let cards = self.store.load_cards(&current_list_id)?;
        info!(
            "Loaded {} lists, {} cards in the active list",
            lists.len(),
            cards.len()
        );

        self.lists = lists;
        self.current_list_id = current_list_id;
        self.cards = cards;
        self.settings = settings;
        self.session = None;
        self.recording = None;
        Ok(())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn lists(&self) -> &[WordList] {
        &self.lists
    }

    pub fn current_list_id(&self) -> &str {
        &self.current_list_id
    }

    pub fn current_list(&self) -> Option<&WordList> {
        self.lists.iter().find(|l| l.id == self.current_list_id)
    }

    /// Cards of the active list.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card(&self, card_id: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == card_id)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn update_settings(&mut self, settings: Settings) -> Result<()> {
        let json = serde_json::to_string(&settings)?;
        self.store.set_state(STATE_SETTINGS, &json)?;
        self.settings = settings;
        Ok(())
    }

    pub fn dashboard(&self) -> Dashboard {
        Dashboard::from_cards(&self.cards, self.now())
    }

    pub fn statistics(
        &self,
        filter: StatsFilter,
        sort: Option<(SortColumn, SortOrder)>,
    ) -> Vec<StatsRow> {
        stats::statistics(&self.cards, filter, sort, self.now())
    }

    /// Persists the active list's cards, then adopts them.
    fn commit_cards(&mut self, cards: Vec<Card>) -> Result<()> {
        self.store.save_all(&self.current_list_id, &cards)?;
        self.cards = cards;
        Ok(())
    }

    /// Applies `change` to a copy of one card and commits it.
    fn commit_card(&mut self, card_id: &str, change: impl FnOnce(&mut Card)) -> Result<()> {
        let mut cards = self.cards.clone();
        let card = cards
            .iter_mut()
            .find(|c| c.id == card_id)
            .ok_or_else(|| TrainerError::NotFound(format!("card {card_id}")))?;
        change(card);
        self.commit_cards(cards)
    }

    // ==================== Lists ====================

    /// Creates a list and makes it active.
    pub fn create_list(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TrainerError::Validation("Please enter a list name".to_string()));
        }
        let list = WordList::new(name, self.now());
        let id = list.id.clone();

        let mut lists = self.lists.clone();
        lists.push(list);
        self.store.save_lists(&lists)?;
        self.lists = lists;
        info!("Created list '{}'", name);

        self.select_list(&id)
    }

    /// Switches the active list. Any running session is discarded.
    pub fn select_list(&mut self, list_id: &str) -> Result<()> {
        if !self.lists.iter().any(|l| l.id == list_id) {
            return Err(TrainerError::NotFound(format!("list {list_id}")));
        }
        let cards = self.store.load_cards(list_id)?;
        self.store.set_state(STATE_CURRENT_LIST, list_id)?;
        self.current_list_id = list_id.to_string();
        self.cards = cards;
        self.session = None;
        Ok(())
    }

    /// Deletes a list with all its cards. The last list is replaced by a new default list.
    pub fn delete_list(&mut self, list_id: &str, confirmation: Confirmation) -> Result<()> {
        let list = self
            .lists
            .iter()
            .find(|l| l.id == list_id)
            .ok_or_else(|| TrainerError::NotFound(format!("list {list_id}")))?;
        confirmation.require(|| {
            format!(
                "Delete the list \"{}\" and ALL its cards? This action cannot be undone.",
                list.name
            )
        })?;

        let mut remaining: Vec<WordList> = self
            .lists
            .iter()
            .filter(|l| l.id != list_id)
            .cloned()
            .collect();
        if remaining.is_empty() {
            remaining.push(WordList::default_list(self.now()));
        }

        self.store.delete_list(list_id, &remaining)?;
        self.lists = remaining;

        if self.current_list_id == list_id {
            let first = self.lists[0].id.clone();
            self.select_list(&first)?;
        }
        Ok(())
    }

    // ==================== Cards ====================

    /// Adds a card to the active list, or updates the one with the same word.
    pub fn add_card(
        &mut self,
        word: &str,
        meaning: &str,
        gender: Gender,
        note: &str,
        image: &str,
    ) -> Result<Upsert> {
        let entry = BulkEntry {
            word: word.trim().to_string(),
            meaning: meaning.trim().to_string(),
            gender,
            note: note.trim().to_string(),
            image: image.trim().to_string(),
        };
        if entry.word.is_empty() || entry.meaning.is_empty() {
            return Err(TrainerError::Validation(
                "Please enter both word and meaning".to_string(),
            ));
        }

        let mut cards = self.cards.clone();
        let outcome = bulk_text::upsert(&mut cards, &self.current_list_id, &entry);
        self.commit_cards(cards)?;
        Ok(outcome)
    }

    /// Adds or updates cards from `word // meaning // ...` lines.
    pub fn import_bulk_text(&mut self, content: &str) -> Result<ImportReport> {
        if content.trim().is_empty() {
            return Err(TrainerError::Validation(
                "Please paste word // meaning pairs before importing.".to_string(),
            ));
        }
        let parsed = bulk_text::parse(content);
        let mut cards = self.cards.clone();
        let report = bulk_text::merge(&mut cards, &self.current_list_id, &parsed);
        self.commit_cards(cards)?;
        info!(
            "Bulk import: {} created, {} updated, {} skipped",
            report.created, report.updated, report.skipped
        );
        Ok(report)
    }

    /// Flips the known flag. Returns the new value.
    pub fn toggle_known(&mut self, card_id: &str) -> Result<bool> {
        let mut known = false;
        self.commit_card(card_id, |card| {
            card.known = !card.known;
            known = card.known;
        })?;
        Ok(known)
    }

    pub fn delete_card(&mut self, card_id: &str, confirmation: Confirmation) -> Result<()> {
        let card = self
            .card(card_id)
            .ok_or_else(|| TrainerError::NotFound(format!("card {card_id}")))?;
        confirmation.require(|| {
            format!("Are you sure you want to delete the card \"{}\"?", card.word)
        })?;

        let cards: Vec<Card> = self
            .cards
            .iter()
            .filter(|c| c.id != card_id)
            .cloned()
            .collect();
        self.commit_cards(cards)
    }

    /// Deletes every card of the active list.
    pub fn wipe_list(&mut self, confirmation: Confirmation) -> Result<()> {
        confirmation.require(|| {
            "Are you sure you want to delete all cards? This action cannot be undone.".to_string()
        })?;
        self.commit_cards(Vec::new())?;
        self.session = None;
        info!("Wiped all cards of list {}", self.current_list_id);
        Ok(())
    }

    // ==================== Backup ====================

    /// CSV dump of every list and every card in the store.
    pub fn export_csv(&self) -> Result<String> {
        let cards = self.store.load_all()?;
        csv_backup::export(&self.lists, &cards)
    }

    pub fn backup_file_name(&self) -> String {
        csv_backup::backup_file_name(self.now().date_naive())
    }

    /// Replaces the whole store with a CSV backup.
    pub fn import_csv(&mut self, content: &str, confirmation: Confirmation) -> Result<RestoreReport> {
        let snapshot = csv_backup::parse(content, &self.current_list_id, self.now())?;
        if snapshot.is_empty() {
            return Err(TrainerError::Validation(
                "No lists or cards detected in the CSV.".to_string(),
            ));
        }
        self.restore(snapshot, confirmation)
    }

    /// Replaces the whole store with the browser edition's stored arrays.
    pub fn import_legacy_json(
        &mut self,
        cards_json: &str,
        lists_json: Option<&str>,
        confirmation: Confirmation,
    ) -> Result<RestoreReport> {
        let snapshot = legacy_json::parse(cards_json, lists_json)?;
        if snapshot.is_empty() {
            return Err(TrainerError::Validation(
                "No lists or cards detected.".to_string(),
            ));
        }
        self.restore(snapshot, confirmation)
    }

    fn restore(&mut self, mut snapshot: StoreSnapshot, confirmation: Confirmation) -> Result<RestoreReport> {
        confirmation.require(|| {
            "Importing metadata will replace your current lists and cards. Continue?".to_string()
        })?;
        snapshot.reconcile(self.now());

        self.store.replace_everything(&snapshot.lists, &snapshot.cards)?;
        self.store.set_state(STATE_CURRENT_LIST, &snapshot.lists[0].id)?;
        self.reload()?;

        Ok(RestoreReport {
            lists: snapshot.lists.len(),
            cards: snapshot.cards.len(),
            warnings: snapshot.warnings,
        })
    }
}
