use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

mod persist;
mod slot;
mod validate;

pub use persist::{DEFAULT_STORAGE_KEY, MessagePersistence, decode_records, encode_records};
pub use slot::{FileSlot, KeyValueSlot, MemorySlot, write_text_atomic};
pub use validate::{Field, FieldError, Validation, error_text, is_valid_email, validate};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub message: String,
    #[serde(default)]
    pub read: bool,
}

/// In-memory board contents plus the identifier counter.
///
/// Records iterate in ascending id order, which is also insertion order
/// because ids are only ever handed out by [`MessageStore::insert`].
/// The store is passive: callers persist and re-render after mutating it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageStore {
    records: BTreeMap<u64, MessageRecord>,
    last_id: u64,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from persisted records. The counter restarts at the
    /// largest present id, so ids freed by deletes before the last save can
    /// come back after a restart.
    pub fn from_records(records: Vec<MessageRecord>) -> Self {
        let last_id = records.iter().map(|r| r.id).max().unwrap_or(0);
        let mut store = Self::new();
        store.hydrate(records, last_id);
        store
    }

    pub fn hydrate(&mut self, records: Vec<MessageRecord>, last_id: u64) {
        self.records = records.into_iter().map(|r| (r.id, r)).collect();
        let max_id = self.records.keys().next_back().copied().unwrap_or(0);
        self.last_id = last_id.max(max_id);
    }

    pub fn insert(&mut self, name: &str, email: &str, message: &str) -> u64 {
        self.last_id += 1;
        let id = self.last_id;
        self.records.insert(
            id,
            MessageRecord {
                id,
                name: name.to_string(),
                email: email.to_string(),
                message: message.to_string(),
                read: false,
            },
        );
        id
    }

    pub fn toggle_read(&mut self, id: u64) -> bool {
        match self.records.get_mut(&id) {
            Some(record) => {
                record.read = !record.read;
                true
            }
            None => false,
        }
    }

    pub fn mark_read(&mut self, id: u64) -> bool {
        match self.records.get_mut(&id) {
            Some(record) => {
                record.read = true;
                true
            }
            None => false,
        }
    }

    pub fn delete(&mut self, id: u64) -> bool {
        self.records.remove(&id).is_some()
    }

    pub fn get(&self, id: u64) -> Option<&MessageRecord> {
        self.records.get(&id)
    }

    pub fn all(&self) -> Vec<&MessageRecord> {
        self.records.values().collect()
    }

    pub fn ids(&self) -> Vec<u64> {
        self.records.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last_id(&self) -> u64 {
        self.last_id
    }

    pub fn unread_count(&self) -> usize {
        self.records.values().filter(|r| !r.read).count()
    }
}

static LOG_FILE: OnceLock<Mutex<Option<std::fs::File>>> = OnceLock::new();

pub fn xdg_state_dir() -> PathBuf {
    std::env::var_os("XDG_STATE_HOME")
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".local").join("state"))
        })
        .unwrap_or_else(|| PathBuf::from("/tmp"))
}

pub fn log_debug(msg: &str) {
    if std::env::var("POSTBOARD_LOG").is_err() {
        return;
    }
    let path = xdg_state_dir().join("postboard").join("postboard.log");
    let lock = LOG_FILE.get_or_init(|| {
        let _ = std::fs::create_dir_all(
            path.parent()
                .unwrap_or_else(|| std::path::Path::new("/tmp")),
        );
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .ok();
        Mutex::new(file)
    });
    if let Ok(mut guard) = lock.lock() {
        if let Some(file) = guard.as_mut() {
            let ts = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0);
            let _ = writeln!(file, "[{}] {}", ts, msg);
        }
    }
}
