//! WordList is a named collection of cards
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_LIST_NAME: &str = "Default List";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordList {
    pub id: String,
    pub name: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl WordList {
    pub fn new(name: &str, created_at: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            created_at,
        }
    }

    pub fn default_list(created_at: DateTime<Utc>) -> Self {
        Self::new(DEFAULT_LIST_NAME, created_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_list() {
        let list = WordList::default_list(Utc::now());
        assert_eq!(list.name, "Default List");
        assert!(!list.id.is_empty());
    }

    #[test]
    fn test_deserialize_without_created_at() {
        let list: WordList = serde_json::from_str(r#"{"id":"x","name":"German"}"#).unwrap();
        assert_eq!(list.id, "x");
        assert_eq!(list.name, "German");
    }
}
