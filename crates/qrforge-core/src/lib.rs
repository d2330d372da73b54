//! Record encoders and history storage for qrforge.
//!
//! This crate provides the shared types, the wire-format encoders
//! (vCard, MeCard, URI schemes) and the bounded local history used by
//! the frontends.

pub mod autosave;
pub mod escape;
pub mod history;
pub mod mecard;
pub mod models;
pub mod payload;
pub mod render;
pub mod vcard;

pub use autosave::Coordinator;
pub use history::{
    FileBackend, HistoryItem, HistoryStore, MemoryBackend, SortCriterion, StorageBackend,
    StorageSchema, MAX_ITEMS, MAX_STORAGE_SIZE, SCHEMA_VERSION,
};
pub use models::{ColorConfig, MeCardData, Record, RecordKind, VCardData};
pub use payload::ValidationError;
pub use render::{ExportFormat, RenderError, Renderer, THUMBNAIL_SIZE};
