use std::collections::BTreeMap;

use anyhow::{Result, anyhow};

use crate::slot::KeyValueSlot;
use crate::{MessageRecord, MessageStore, log_debug};

pub const DEFAULT_STORAGE_KEY: &str = "messages";

/// Serializes records as `{ "<id>": { id, name, email, message, read } }`.
pub fn encode_records<'a>(records: impl IntoIterator<Item = &'a MessageRecord>) -> Result<String> {
    let map: BTreeMap<u64, &MessageRecord> = records.into_iter().map(|r| (r.id, r)).collect();
    Ok(serde_json::to_string(&map)?)
}

/// Inverse of [`encode_records`]. The map key is authoritative for the id.
pub fn decode_records(raw: &str) -> Result<Vec<MessageRecord>> {
    let map: BTreeMap<String, MessageRecord> = serde_json::from_str(raw)?;
    let mut records = Vec::with_capacity(map.len());
    for (key, mut record) in map {
        let id: u64 = key
            .trim()
            .parse()
            .map_err(|_| anyhow!("non-numeric message key {:?}", key))?;
        if id == 0 {
            return Err(anyhow!("message key must be positive"));
        }
        if record.id != id {
            log_debug(&format!(
                "persist record id {} stored under key {}, using key",
                record.id, id
            ));
            record.id = id;
        }
        records.push(record);
    }
    records.sort_by_key(|r| r.id);
    Ok(records)
}

pub struct MessagePersistence<S> {
    slot: S,
    key: String,
}

impl<S: KeyValueSlot> MessagePersistence<S> {
    pub fn new(slot: S) -> Self {
        Self::with_key(slot, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(slot: S, key: impl Into<String>) -> Self {
        Self {
            slot,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }

    /// Overwrites the slot with the full record set of `store`.
    pub fn save(&mut self, store: &MessageStore) -> Result<()> {
        let value = encode_records(store.all())?;
        self.slot.set(&self.key, &value)?;
        log_debug(&format!(
            "persist save key={} records={}",
            self.key,
            store.len()
        ));
        Ok(())
    }

    /// Reads the persisted records. Absent or unreadable content yields an
    /// empty list rather than an error.
    pub fn load(&self) -> Vec<MessageRecord> {
        let raw = match self.slot.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                log_debug(&format!("persist load key={} failed: {}", self.key, err));
                return Vec::new();
            }
        };
        match decode_records(&raw) {
            Ok(records) => records,
            Err(err) => {
                log_debug(&format!(
                    "persist load key={} unparsable, starting empty: {}",
                    self.key, err
                ));
                Vec::new()
            }
        }
    }

    pub fn hydrate(&self) -> MessageStore {
        let store = MessageStore::from_records(self.load());
        log_debug(&format!(
            "persist hydrate records={} last_id={}",
            store.len(),
            store.last_id()
        ));
        store
    }
}
