use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::log_debug;

/// Durable string slots addressed by key, in the manner of browser local
/// storage. `set` overwrites whatever the key held before.
pub trait KeyValueSlot {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    values: HashMap<String, String>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueSlot for MemorySlot {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// A JSON document on disk holding `{ "<key>": "<value>", ... }`.
///
/// The whole document is rewritten on every `set`. A document that does not
/// parse reads as empty and is replaced by the next write.
#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<BTreeMap<String, String>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(BTreeMap::new());
            }
            Err(err) => return Err(err.into()),
        };
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        match serde_json::from_str(&content) {
            Ok(document) => Ok(document),
            Err(err) => {
                log_debug(&format!(
                    "slot document {} unreadable, treating as empty: {}",
                    self.path.display(),
                    err
                ));
                Ok(BTreeMap::new())
            }
        }
    }
}

impl KeyValueSlot for FileSlot {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_document()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut document = self.read_document()?;
        document.insert(key.to_string(), value.to_string());
        let content = serde_json::to_string_pretty(&document)?;
        write_text_atomic(&self.path, &content)
    }
}

pub fn write_text_atomic(path: &Path, content: &str) -> Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent)?;
    let tmp = path.with_extension("tmp");
    {
        let mut file = std::fs::File::create(&tmp)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
    }
    std::fs::rename(&tmp, path)?;
    Ok(())
}
