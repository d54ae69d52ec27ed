//! Per-model continuation token storage
//!
//! Layout: `<data-dir>/nino/models/<sanitized-model>/context.json`, where
//! `<data-dir>` is `$XDG_DATA_HOME` or `~/.local/share`. Each file holds a
//! JSON array of integers. Writes overwrite; there is no locking.

use crate::errors::{NinoError, Result};
use crate::logging::Logger;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Name of the file holding one model's tokens
pub const CONTEXT_FILE: &str = "context.json";

/// Token store rooted at a data directory
#[derive(Debug, Clone)]
pub struct ContextStore {
    data_dir: PathBuf,
}

impl ContextStore {
    /// Store rooted at an explicit data directory
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Store rooted at `$XDG_DATA_HOME`, falling back to `~/.local/share`
    pub fn from_env<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("XDG_DATA_HOME").filter(|d| !d.is_empty()) {
            return Ok(Self::new(dir));
        }

        let home = dirs::home_dir().ok_or_else(|| {
            NinoError::Persistence("unable to determine home directory".to_string())
        })?;
        Ok(Self::new(home.join(".local").join("share")))
    }

    /// Data directory this store writes under
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Directory holding one model's state
    pub fn model_dir(&self, model: &str) -> PathBuf {
        self.data_dir
            .join("nino")
            .join("models")
            .join(sanitize_model_name(model))
    }

    /// Path of one model's context file
    pub fn context_path(&self, model: &str) -> PathBuf {
        self.model_dir(model).join(CONTEXT_FILE)
    }

    /// Save `tokens` for `model`, replacing whatever was there
    pub fn persist(&self, model: &str, tokens: &[i64], log: &Logger) -> Result<()> {
        log.info(format_args!("Saving context data for model: {}", model));

        let dir = self.model_dir(model);
        fs::create_dir_all(&dir).map_err(|e| {
            log.error(format_args!("Failed to create directories: {}", e));
            NinoError::Persistence(format!("failed to create {}: {}", dir.display(), e))
        })?;

        let mut contents = serde_json::to_vec(tokens)?;
        contents.push(b'\n');

        let path = dir.join(CONTEXT_FILE);
        fs::write(&path, contents).map_err(|e| {
            log.error(format_args!("Failed to write context file: {}", e));
            NinoError::Persistence(format!("failed to write {}: {}", path.display(), e))
        })?;

        log.debug(format_args!("Saved {} context tokens to {}", tokens.len(), path.display()));
        Ok(())
    }

    /// Load the tokens saved for `model`; `None` if nothing was saved yet
    pub fn load(&self, model: &str, log: &Logger) -> Result<Option<Vec<i64>>> {
        let path = self.context_path(model);
        log.info(format_args!("Loading context data from {}", path.display()));

        let contents = match fs::read(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log.info("Context file does not exist");
                return Ok(None);
            }
            Err(e) => {
                return Err(NinoError::Persistence(format!(
                    "failed to open {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        let tokens: Vec<i64> = serde_json::from_slice(&contents).map_err(|e| {
            NinoError::Persistence(format!("failed to decode {}: {}", path.display(), e))
        })?;

        log.debug(format_args!("Loaded {} context tokens", tokens.len()));
        Ok(Some(tokens))
    }
}

/// Make a model name safe to use as a single path component
///
/// Every run of characters outside `[A-Za-z0-9._-]` becomes one `_`. Names that
/// would still be special path components (empty, `.`, `..`) become `_`.
pub fn sanitize_model_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_run = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-') {
            out.push(ch);
            in_run = false;
        } else if !in_run {
            out.push('_');
            in_run = true;
        }
    }

    match out.as_str() {
        "" | "." | ".." => "_".to_string(),
        _ => out,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sanitize_model_names() {
        assert_eq!(sanitize_model_name("llama3.2"), "llama3.2");
        assert_eq!(sanitize_model_name("llama3.1:8b"), "llama3.1_8b");
        assert_eq!(sanitize_model_name("hf.co/user/model:Q4"), "hf.co_user_model_Q4");
        assert_eq!(sanitize_model_name("a :/ b"), "a_b");
        assert_eq!(sanitize_model_name("qwen2.5-coder_7b"), "qwen2.5-coder_7b");
    }

    #[test]
    fn test_sanitize_special_components() {
        assert_eq!(sanitize_model_name(""), "_");
        assert_eq!(sanitize_model_name("."), "_");
        assert_eq!(sanitize_model_name(".."), "_");
        assert_eq!(sanitize_model_name("../etc"), ".._etc");
    }

    #[test]
    fn test_from_env_prefers_xdg() {
        let store = ContextStore::from_env(|key| {
            (key == "XDG_DATA_HOME").then(|| "/data/xdg".to_string())
        })
        .unwrap();
        assert_eq!(store.data_dir(), Path::new("/data/xdg"));
    }

    #[test]
    fn test_context_path_layout() {
        let store = ContextStore::new("/data");
        assert_eq!(
            store.context_path("llama3.1:8b"),
            PathBuf::from("/data/nino/models/llama3.1_8b/context.json")
        );
    }

    #[test]
    fn test_persist_then_load() {
        let temp = TempDir::new().unwrap();
        let store = ContextStore::new(temp.path());
        let log = Logger::disabled();

        store.persist("llama3.2", &[1, 2, 3], &log).unwrap();
        assert_eq!(store.load("llama3.2", &log).unwrap(), Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_load_unknown_model() {
        let temp = TempDir::new().unwrap();
        let store = ContextStore::new(temp.path());

        assert_eq!(store.load("never-used", &Logger::disabled()).unwrap(), None);
    }

    #[test]
    fn test_persist_overwrites() {
        let temp = TempDir::new().unwrap();
        let store = ContextStore::new(temp.path());
        let log = Logger::disabled();

        store.persist("m", &[1, 2, 3, 4], &log).unwrap();
        store.persist("m", &[9], &log).unwrap();
        assert_eq!(store.load("m", &log).unwrap(), Some(vec![9]));
    }

    #[test]
    fn test_load_corrupt_file() {
        let temp = TempDir::new().unwrap();
        let store = ContextStore::new(temp.path());
        let path = store.context_path("m");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not json").unwrap();

        let err = store.load("m", &Logger::disabled()).unwrap_err();
        assert!(matches!(err, NinoError::Persistence(_)));
    }
}
