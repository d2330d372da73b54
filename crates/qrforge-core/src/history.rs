//! Bounded local history of generated codes.
//!
//! A single versioned JSON document lives in one slot of a key-value
//! backend and is always handled read-whole / mutate-whole / write-whole.
//! The store never panics on persistence faults: reads degrade to an
//! empty schema, writes report failure through `bool`/`Option` returns.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

use crate::models::{ColorConfig, Record, RecordKind};
use crate::payload;
use crate::render::{Renderer, THUMBNAIL_SIZE};

/// Current storage schema version. Any other version on disk is
/// discarded wholesale (lossy migration).
pub const SCHEMA_VERSION: u32 = 1;

/// Maximum number of retained history items.
pub const MAX_ITEMS: usize = 50;

/// Maximum serialized size of the whole schema, in bytes (5 MiB).
pub const MAX_STORAGE_SIZE: usize = 5 * 1024 * 1024;

const HISTORY_KEY: &str = "qrforge-history";
const PROBE_KEY: &str = "__qrforge_probe__";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("storage backend unavailable")]
    Unavailable,
}

/// A persisted snapshot of a generated code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub id: String,
    /// Creation instant, milliseconds since the Unix epoch.
    pub timestamp: i64,
    #[serde(rename = "type")]
    pub kind: RecordKind,
    pub data: Record,
    pub colors: ColorConfig,
    /// Embedded preview image.
    pub thumbnail: String,
}

/// The versioned container document holding all history items,
/// newest-first by convention.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSchema {
    pub version: u32,
    pub items: Vec<HistoryItem>,
}

impl StorageSchema {
    fn empty() -> Self {
        Self {
            version: SCHEMA_VERSION,
            items: Vec::new(),
        }
    }
}

/// Sort order for [`HistoryStore::sorted`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortCriterion {
    /// Timestamp descending.
    Newest,
    /// Timestamp ascending.
    Oldest,
    /// Lexicographic record discriminant.
    Kind,
}

impl std::str::FromStr for SortCriterion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "newest" => Ok(SortCriterion::Newest),
            "oldest" => Ok(SortCriterion::Oldest),
            "type" | "kind" => Ok(SortCriterion::Kind),
            _ => Err(format!("unknown sort criterion: {s}")),
        }
    }
}

/// Abstract key-value persistence slot.
///
/// `set` surfaces faults to its direct caller; the store's operations
/// catch them at their own boundary.
pub trait StorageBackend {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-memory backend for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    slots: HashMap<String, String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryBackend {
    fn get(&self, key: &str) -> Option<String> {
        self.slots.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.slots.remove(key);
        Ok(())
    }
}

/// File-per-key backend rooted in a directory, by default
/// `<data dir>/qrforge`.
#[derive(Debug)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Backend in the platform data directory.
    pub fn default_location() -> Result<Self, StorageError> {
        let dir = dirs::data_dir()
            .ok_or(StorageError::Unavailable)?
            .join("qrforge");
        Ok(Self::new(dir))
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StorageBackend for FileBackend {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// Capacity- and size-bounded history of generated records.
pub struct HistoryStore<B> {
    backend: B,
}

impl<B: StorageBackend> HistoryStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Probe backend availability by writing and removing a sentinel
    /// key. All operations degrade quietly when this fails.
    pub fn is_available(&mut self) -> bool {
        if self.backend.set(PROBE_KEY, "1").is_err() {
            return false;
        }
        self.backend.remove(PROBE_KEY).is_ok()
    }

    /// Load the current schema. Corrupt documents and version
    /// mismatches both reset to an empty schema.
    fn load(&mut self) -> StorageSchema {
        let Some(raw) = self.backend.get(HISTORY_KEY) else {
            return StorageSchema::empty();
        };
        match serde_json::from_str::<StorageSchema>(&raw) {
            Ok(schema) if schema.version == SCHEMA_VERSION => schema,
            Ok(schema) => {
                tracing::warn!(
                    found = schema.version,
                    expected = SCHEMA_VERSION,
                    "history schema version mismatch, discarding stored history"
                );
                StorageSchema::empty()
            }
            Err(e) => {
                tracing::warn!("corrupt history document, starting empty: {e}");
                StorageSchema::empty()
            }
        }
    }

    /// Write the schema back. This is the one place a persistence
    /// fault surfaces; operation boundaries catch it.
    fn persist(&mut self, schema: &StorageSchema) -> Result<(), StorageError> {
        let raw = serde_json::to_string(schema)?;
        self.backend.set(HISTORY_KEY, &raw)
    }

    fn serialized_size(schema: &StorageSchema) -> usize {
        serde_json::to_string(schema).map(|s| s.len()).unwrap_or(0)
    }

    /// Evict tail (oldest) items while the serialized document exceeds
    /// the size cap and more than one item remains.
    fn enforce_size(schema: &mut StorageSchema) {
        while Self::serialized_size(schema) > MAX_STORAGE_SIZE && schema.items.len() > 1 {
            schema.items.pop();
        }
    }

    fn records_equal(a: &Record, b: &Record) -> bool {
        match (serde_json::to_value(a), serde_json::to_value(b)) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }

    fn now_ms() -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    /// Persist a new snapshot. Returns `None` on a duplicate of an
    /// existing item (same discriminant and deep-equal payload), on a
    /// thumbnail failure, or on a persistence fault.
    pub fn save(
        &mut self,
        record: &Record,
        colors: &ColorConfig,
        renderer: &dyn Renderer,
    ) -> Option<HistoryItem> {
        if !self.is_available() {
            return None;
        }
        let mut schema = self.load();

        let duplicate = schema
            .items
            .iter()
            .any(|item| item.kind == record.kind() && Self::records_equal(&item.data, record));
        if duplicate {
            return None;
        }

        let thumbnail = match renderer.thumbnail(&payload::format(record), colors, THUMBNAIL_SIZE) {
            Ok(thumbnail) => thumbnail,
            Err(e) => {
                tracing::warn!("thumbnail generation failed, not saving: {e}");
                return None;
            }
        };

        let item = HistoryItem {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Self::now_ms(),
            kind: record.kind(),
            data: record.clone(),
            colors: colors.clone(),
            thumbnail,
        };

        // Most-recent-first by construction.
        schema.items.insert(0, item.clone());
        schema.items.truncate(MAX_ITEMS);
        Self::enforce_size(&mut schema);

        match self.persist(&schema) {
            Ok(()) => Some(item),
            Err(e) => {
                tracing::warn!("failed to persist history: {e}");
                None
            }
        }
    }

    /// Replace an existing item's record, colors and thumbnail in
    /// place. Id and list position are preserved; the timestamp is
    /// refreshed. Returns `None` when the id is unknown or on failure.
    pub fn update(
        &mut self,
        id: &str,
        record: &Record,
        colors: &ColorConfig,
        renderer: &dyn Renderer,
    ) -> Option<HistoryItem> {
        if !self.is_available() {
            return None;
        }
        let mut schema = self.load();
        let index = schema.items.iter().position(|item| item.id == id)?;

        let thumbnail = match renderer.thumbnail(&payload::format(record), colors, THUMBNAIL_SIZE) {
            Ok(thumbnail) => thumbnail,
            Err(e) => {
                tracing::warn!("thumbnail generation failed, not updating: {e}");
                return None;
            }
        };

        let item = HistoryItem {
            id: id.to_string(),
            timestamp: Self::now_ms(),
            kind: record.kind(),
            data: record.clone(),
            colors: colors.clone(),
            thumbnail,
        };
        schema.items[index] = item.clone();

        match self.persist(&schema) {
            Ok(()) => Some(item),
            Err(e) => {
                tracing::warn!("failed to persist history update: {e}");
                None
            }
        }
    }

    /// All items in persisted order.
    pub fn list(&mut self) -> Vec<HistoryItem> {
        self.load().items
    }

    pub fn get_by_id(&mut self, id: &str) -> Option<HistoryItem> {
        self.load().items.into_iter().find(|item| item.id == id)
    }

    /// Remove one item. Returns true iff something was removed.
    pub fn delete_by_id(&mut self, id: &str) -> bool {
        let mut schema = self.load();
        let before = schema.items.len();
        schema.items.retain(|item| item.id != id);
        if schema.items.len() == before {
            return false;
        }
        match self.persist(&schema) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("failed to persist history delete: {e}");
                false
            }
        }
    }

    /// Reset to an empty schema at the current version.
    pub fn clear(&mut self) -> bool {
        match self.persist(&StorageSchema::empty()) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("failed to clear history: {e}");
                false
            }
        }
    }

    pub fn filter_by_kind(&mut self, kind: RecordKind) -> Vec<HistoryItem> {
        self.load()
            .items
            .into_iter()
            .filter(|item| item.kind == kind)
            .collect()
    }

    /// Items under the given order; stable with respect to the
    /// persisted order.
    pub fn sorted(&mut self, criterion: SortCriterion) -> Vec<HistoryItem> {
        let mut items = self.load().items;
        match criterion {
            SortCriterion::Newest => items.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
            SortCriterion::Oldest => items.sort_by(|a, b| a.timestamp.cmp(&b.timestamp)),
            SortCriterion::Kind => items.sort_by_key(|item| item.kind.to_string()),
        }
        items
    }

    /// Byte length of the serialized schema document.
    pub fn size_bytes(&mut self) -> usize {
        Self::serialized_size(&self.load())
    }

    /// Dump the full schema as JSON text.
    pub fn export_json(&mut self) -> String {
        serde_json::to_string(&self.load()).unwrap_or_else(|_| {
            serde_json::to_string(&StorageSchema::empty()).expect("empty schema serializes")
        })
    }

    /// Merge an exported schema into the current one.
    ///
    /// Every imported item is kept; existing items whose id does not
    /// appear in the import are appended. The union is sorted
    /// newest-first, truncated to [`MAX_ITEMS`] and persisted at the
    /// current version. Malformed input (missing version, items not a
    /// list) is rejected wholesale, leaving the store untouched.
    pub fn import_json(&mut self, text: &str) -> bool {
        let parsed: serde_json::Value = match serde_json::from_str(text) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("import rejected, invalid JSON: {e}");
                return false;
            }
        };
        if !parsed.get("version").is_some_and(serde_json::Value::is_u64)
            || !parsed.get("items").is_some_and(serde_json::Value::is_array)
        {
            tracing::warn!("import rejected, not a history schema document");
            return false;
        }
        let imported: StorageSchema = match serde_json::from_value(parsed) {
            Ok(schema) => schema,
            Err(e) => {
                tracing::warn!("import rejected, malformed items: {e}");
                return false;
            }
        };

        let mut merged = imported.items;
        let existing = self.load().items;
        for item in existing {
            if !merged.iter().any(|m| m.id == item.id) {
                merged.push(item);
            }
        }
        merged.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        merged.truncate(MAX_ITEMS);

        let schema = StorageSchema {
            version: SCHEMA_VERSION,
            items: merged,
        };
        match self.persist(&schema) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("failed to persist imported history: {e}");
                false
            }
        }
    }
}
