//! SQLite record store
//!
//! Handles schema creation and migration, list and card persistence,
//! and the key/value `app_state` table used for settings and the active list.

use super::RecordStore;
use crate::error::Result;
use crate::models::{Card, Gender, WordList};
use log::{debug, info};
use rusqlite::{Connection, OptionalExtension, Row, Transaction, params};
use std::path::Path;

/// Schema steps, applied in order. `PRAGMA user_version` counts the applied ones.
const MIGRATIONS: &[&str] = &[
    // 1: lists, cards, app state
    "CREATE TABLE IF NOT EXISTS lists (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        created_at TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS cards (
        id TEXT PRIMARY KEY,
        list_id TEXT NOT NULL,
        word TEXT NOT NULL,
        meaning TEXT NOT NULL,
        gender TEXT NOT NULL DEFAULT '',
        note TEXT NOT NULL DEFAULT '',
        image TEXT NOT NULL DEFAULT '',
        audio TEXT NOT NULL DEFAULT '',
        practiced INTEGER NOT NULL DEFAULT 0,
        known INTEGER NOT NULL DEFAULT 0,
        times_shown INTEGER NOT NULL DEFAULT 0,
        correct_count INTEGER NOT NULL DEFAULT 0,
        wrong_count INTEGER NOT NULL DEFAULT 0,
        success_rate REAL NOT NULL DEFAULT 0,
        schedule_index INTEGER NOT NULL DEFAULT 0,
        last_asked_at TEXT,
        next_due_at TEXT
    );
    CREATE INDEX IF NOT EXISTS idx_cards_list_id ON cards(list_id);
    CREATE TABLE IF NOT EXISTS app_state (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );",
];

const CARD_COLUMNS: &str = "id, list_id, word, meaning, gender, note, image, audio, practiced, known,
     times_shown, correct_count, wrong_count, success_rate, schedule_index, last_asked_at, next_due_at";

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) the database file and brings its schema up to date.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        info!("Opening database at {}", path.display());
        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(mut conn: Connection) -> Result<Self> {
        migrate(&mut conn)?;
        Ok(Self { conn })
    }

    pub fn schema_version(&self) -> Result<usize> {
        let version: i64 = self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))?;
        Ok(version.max(0) as usize)
    }
}

fn migrate(conn: &mut Connection) -> Result<()> {
    let tx = conn.transaction()?;
    let current: i64 = tx.pragma_query_value(None, "user_version", |row| row.get(0))?;
    for (step, sql) in MIGRATIONS.iter().enumerate().skip(current.max(0) as usize) {
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", (step + 1) as i64)?;
        info!("Applied schema migration {}", step + 1);
    }
    tx.commit()?;
    Ok(())
}

fn card_from_row(row: &Row) -> rusqlite::Result<Card> {
    let mut card = Card {
        id: row.get(0)?,
        list_id: row.get(1)?,
        word: row.get(2)?,
        meaning: row.get(3)?,
        gender: Gender::from(row.get::<_, String>(4)?),
        note: row.get(5)?,
        image: row.get(6)?,
        audio: row.get(7)?,
        practiced: row.get(8)?,
        known: row.get(9)?,
        times_shown: row.get(10)?,
        correct_count: row.get(11)?,
        wrong_count: row.get(12)?,
        success_rate: row.get(13)?,
        schedule_index: row.get::<_, i64>(14)?.max(0) as usize,
        last_asked_at: row.get(15)?,
        next_due_at: row.get(16)?,
    };
    card.backfill();
    Ok(card)
}

fn insert_cards(tx: &Transaction, cards: &[Card]) -> Result<()> {
    let mut stmt = tx.prepare(&format!(
        "INSERT OR REPLACE INTO cards ({CARD_COLUMNS})
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)"
    ))?;
    for card in cards {
        stmt.execute(params![
            card.id,
            card.list_id,
            card.word,
            card.meaning,
            card.gender.as_str(),
            card.note,
            card.image,
            card.audio,
            card.practiced,
            card.known,
            card.times_shown,
            card.correct_count,
            card.wrong_count,
            card.success_rate,
            card.schedule_index as i64,
            card.last_asked_at,
            card.next_due_at,
        ])?;
    }
    Ok(())
}

fn insert_lists(tx: &Transaction, lists: &[WordList]) -> Result<()> {
    let mut stmt = tx.prepare("INSERT OR REPLACE INTO lists (id, name, created_at) VALUES (?1, ?2, ?3)")?;
    for list in lists {
        stmt.execute(params![list.id, list.name, list.created_at])?;
    }
    Ok(())
}

impl RecordStore for SqliteStore {
    fn load_all(&self) -> Result<Vec<Card>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {CARD_COLUMNS} FROM cards ORDER BY rowid"))?;
        let cards = stmt
            .query_map([], card_from_row)?
            .collect::<rusqlite::Result<Vec<Card>>>()?;
        Ok(cards)
    }

    fn load_lists(&self) -> Result<Vec<WordList>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, created_at FROM lists ORDER BY rowid")?;
        let lists = stmt
            .query_map([], |row| {
                Ok(WordList {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    created_at: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<WordList>>>()?;
        Ok(lists)
    }

    fn load_cards(&self, list_id: &str) -> Result<Vec<Card>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {CARD_COLUMNS} FROM cards WHERE list_id = ?1 ORDER BY rowid"
        ))?;
        let cards = stmt
            .query_map(params![list_id], card_from_row)?
            .collect::<rusqlite::Result<Vec<Card>>>()?;
        Ok(cards)
    }

    fn save_all(&mut self, list_id: &str, cards: &[Card]) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM cards WHERE list_id = ?1", params![list_id])?;
        insert_cards(&tx, cards)?;
        tx.commit()?;
        debug!("Saved {} cards for list {}", cards.len(), list_id);
        Ok(())
    }

    fn save_lists(&mut self, lists: &[WordList]) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM lists", [])?;
        insert_lists(&tx, lists)?;
        tx.commit()?;
        Ok(())
    }

    fn delete_list(&mut self, list_id: &str, remaining: &[WordList]) -> Result<()> {
        let tx = self.conn.transaction()?;
        let removed = tx.execute("DELETE FROM cards WHERE list_id = ?1", params![list_id])?;
        tx.execute("DELETE FROM lists", [])?;
        insert_lists(&tx, remaining)?;
        tx.commit()?;
        info!("Deleted list {} with {} cards", list_id, removed);
        Ok(())
    }

    fn replace_everything(&mut self, lists: &[WordList], cards: &[Card]) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM cards", [])?;
        tx.execute("DELETE FROM lists", [])?;
        insert_lists(&tx, lists)?;
        insert_cards(&tx, cards)?;
        tx.commit()?;
        info!("Replaced store with {} lists and {} cards", lists.len(), cards.len());
        Ok(())
    }

    fn get_state(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM app_state WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_state(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO app_state (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample_card(list_id: &str, word: &str) -> Card {
        let mut card = Card::new(list_id, word, &format!("{word} meaning"));
        card.gender = Gender::Feminine;
        card.note = "a note".to_string();
        card.practiced = true;
        card.times_shown = 3;
        card.correct_count = 2;
        card.wrong_count = 1;
        card.success_rate = 2.0 / 3.0;
        card.schedule_index = 4;
        card.last_asked_at = Some(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap());
        card.next_due_at = Some(Utc.with_ymd_and_hms(2024, 1, 4, 3, 4, 5).unwrap());
        card
    }

    #[test]
    fn test_migration_sets_version() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.schema_version().unwrap(), MIGRATIONS.len());
    }

    #[test]
    fn test_reopen_file_keeps_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("vocab.sqlite3");

        {
            let mut store = SqliteStore::open(&path).unwrap();
            store.save_all("l1", &[sample_card("l1", "Haus")]).unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.schema_version().unwrap(), MIGRATIONS.len());
        assert_eq!(store.load_all().unwrap().len(), 1);
    }

    #[test]
    fn test_card_round_trip() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let card = sample_card("l1", "Katze");
        store.save_all("l1", &[card.clone()]).unwrap();

        let loaded = store.load_cards("l1").unwrap();
        assert_eq!(loaded, vec![card]);
    }

    #[test]
    fn test_save_all_replaces_only_its_list() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store
            .save_all("l1", &[sample_card("l1", "a"), sample_card("l1", "b")])
            .unwrap();
        store.save_all("l2", &[sample_card("l2", "c")]).unwrap();

        store.save_all("l1", &[sample_card("l1", "d")]).unwrap();

        let words: Vec<String> = store.load_cards("l1").unwrap().into_iter().map(|c| c.word).collect();
        assert_eq!(words, vec!["d"]);
        assert_eq!(store.load_cards("l2").unwrap().len(), 1);
        assert_eq!(store.load_all().unwrap().len(), 2);
    }

    #[test]
    fn test_lists_and_cascade_delete() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let now = Utc.with_ymd_and_hms(2024, 5, 5, 0, 0, 0).unwrap();
        let a = WordList::new("German", now);
        let b = WordList::new("Polish", now);
        store.save_lists(&[a.clone(), b.clone()]).unwrap();
        store.save_all(&a.id, &[sample_card(&a.id, "Haus")]).unwrap();
        store.save_all(&b.id, &[sample_card(&b.id, "dom")]).unwrap();

        store.delete_list(&a.id, &[b.clone()]).unwrap();

        assert_eq!(store.load_lists().unwrap(), vec![b.clone()]);
        let remaining = store.load_all().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].list_id, b.id);
    }

    #[test]
    fn test_delete_last_list_stores_replacement() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let now = Utc.with_ymd_and_hms(2024, 5, 5, 0, 0, 0).unwrap();
        let a = WordList::new("German", now);
        store.save_lists(&[a.clone()]).unwrap();
        store.save_all(&a.id, &[sample_card(&a.id, "Haus")]).unwrap();

        let fallback = WordList::default_list(now);
        store.delete_list(&a.id, &[fallback.clone()]).unwrap();

        assert_eq!(store.load_lists().unwrap(), vec![fallback]);
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_replace_everything() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.save_all("old", &[sample_card("old", "x")]).unwrap();

        let list = WordList::new("Imported", Utc::now());
        let card = sample_card(&list.id, "y");
        store.replace_everything(&[list.clone()], &[card.clone()]).unwrap();

        assert_eq!(store.load_lists().unwrap(), vec![list]);
        assert_eq!(store.load_all().unwrap(), vec![card]);
    }

    #[test]
    fn test_state_upsert() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.get_state("current_list_id").unwrap(), None);

        store.set_state("current_list_id", "a").unwrap();
        store.set_state("current_list_id", "b").unwrap();
        assert_eq!(store.get_state("current_list_id").unwrap().as_deref(), Some("b"));
    }
}
