//! Process-level configuration.
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "VOCAB_TRAINER_DB";
const APP_DIR: &str = "vocab-trainer";
const DB_FILE: &str = "vocab.sqlite3";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
}

impl Config {
    /// `VOCAB_TRAINER_DB` if set, else the platform data directory,
    /// else the working directory.
    pub fn from_env() -> Self {
        Self::resolve(std::env::var_os(DB_PATH_ENV).map(PathBuf::from), dirs::data_dir())
    }

    fn resolve(overridden: Option<PathBuf>, data_dir: Option<PathBuf>) -> Self {
        let db_path = match (overridden, data_dir) {
            (Some(path), _) if !path.as_os_str().is_empty() => path,
            (_, Some(dir)) => dir.join(APP_DIR).join(DB_FILE),
            _ => PathBuf::from(DB_FILE),
        };
        Self { db_path }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_wins() {
        let config = Config::resolve(Some("/tmp/x.sqlite3".into()), Some("/data".into()));
        assert_eq!(config.db_path, PathBuf::from("/tmp/x.sqlite3"));
    }

    #[test]
    fn test_data_dir_default() {
        let config = Config::resolve(None, Some("/data".into()));
        assert_eq!(config.db_path, PathBuf::from("/data/vocab-trainer/vocab.sqlite3"));
    }

    #[test]
    fn test_working_directory_fallback() {
        let config = Config::resolve(Some(PathBuf::new()), None);
        assert_eq!(config.db_path, PathBuf::from("vocab.sqlite3"));
    }
}
