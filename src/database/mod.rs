pub mod db;

use crate::error::Result;
use crate::models::{Card, WordList};

pub use db::SqliteStore;

/// Persistence boundary for lists, cards and small key/value state.
///
/// Every write either commits completely or leaves storage untouched.
pub trait RecordStore {
    /// All cards of every list.
    fn load_all(&self) -> Result<Vec<Card>>;

    fn load_lists(&self) -> Result<Vec<WordList>>;

    fn load_cards(&self, list_id: &str) -> Result<Vec<Card>> {
        Ok(self
            .load_all()?
            .into_iter()
            .filter(|c| c.list_id == list_id)
            .collect())
    }

    /// Replaces the cards of `list_id` with `cards`. Other lists are untouched.
    fn save_all(&mut self, list_id: &str, cards: &[Card]) -> Result<()>;

    fn save_lists(&mut self, lists: &[WordList]) -> Result<()>;

    /// Drops the list and every card in it, and stores `remaining` as the full set of lists.
    /// Both happen in one commit.
    fn delete_list(&mut self, list_id: &str, remaining: &[WordList]) -> Result<()>;

    /// Replaces the whole store.
    fn replace_everything(&mut self, lists: &[WordList], cards: &[Card]) -> Result<()>;

    fn get_state(&self, key: &str) -> Result<Option<String>>;

    fn set_state(&mut self, key: &str, value: &str) -> Result<()>;
}
