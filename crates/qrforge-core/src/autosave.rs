//! Debounced auto-save of the record being edited.
//!
//! Each record kind owns one slot. Every settled edit restarts that
//! slot's debounce deadline; when the deadline passes, the pending
//! (record, colors) pair is written to history, either as a fresh item
//! or as an in-place update of the item this slot is already tracking.
//! Switching the active kind clears the slot being left, so the next
//! edit on that kind starts a fresh history entry.
//!
//! The machine is deterministic: callers inject `Instant`s and drive
//! [`Coordinator::flush_due`] from whatever timer facility they have,
//! using [`Coordinator::next_deadline`] to schedule wake-ups.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::history::{HistoryItem, HistoryStore, StorageBackend};
use crate::models::{ColorConfig, Record, RecordKind};
use crate::render::Renderer;

/// Delay between the last edit and the history write.
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(500);

/// Per-kind slot state.
#[derive(Debug, Clone)]
enum SlotState {
    /// Nothing pending and nothing tracked.
    Idle,
    /// An edit is waiting for its deadline. `tracked` carries the id of
    /// the history item this slot was already updating, if any.
    Pending {
        deadline: Instant,
        tracked: Option<String>,
        record: Record,
        colors: ColorConfig,
    },
    /// A history item exists for this slot and future edits update it.
    Tracking { id: String },
}

/// Debounce state machine coordinating edits with the history store.
pub struct Coordinator {
    slots: HashMap<RecordKind, SlotState>,
    active: Option<RecordKind>,
    delay: Duration,
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl Coordinator {
    pub fn new() -> Self {
        Self::with_delay(DEBOUNCE_DELAY)
    }

    /// Coordinator with a custom debounce delay.
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            slots: HashMap::new(),
            active: None,
            delay,
        }
    }

    /// Make `kind` the active slot. Leaving a slot clears it entirely:
    /// its pending edit is cancelled and its tracked id dropped.
    pub fn switch_to(&mut self, kind: RecordKind) {
        if let Some(previous) = self.active {
            if previous != kind {
                self.slots.remove(&previous);
                tracing::debug!(%previous, "auto-save slot cleared on tab switch");
            }
        }
        self.active = Some(kind);
    }

    /// Register a settled edit, restarting the slot's debounce timer.
    pub fn edit(&mut self, record: Record, colors: ColorConfig, now: Instant) {
        let kind = record.kind();
        self.active = Some(kind);
        let tracked = match self.slots.remove(&kind) {
            Some(SlotState::Tracking { id }) => Some(id),
            Some(SlotState::Pending { tracked, .. }) => tracked,
            Some(SlotState::Idle) | None => None,
        };
        self.slots.insert(
            kind,
            SlotState::Pending {
                deadline: now + self.delay,
                tracked,
                record,
                colors,
            },
        );
    }

    /// Earliest pending deadline, for driving a wake-up timer.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.slots
            .values()
            .filter_map(|slot| match slot {
                SlotState::Pending { deadline, .. } => Some(*deadline),
                _ => None,
            })
            .min()
    }

    /// Fire every slot whose deadline has passed: tracked slots update
    /// their history item, untracked slots create one and start
    /// tracking the returned id. Returns the items written.
    pub fn flush_due<B: StorageBackend>(
        &mut self,
        now: Instant,
        store: &mut HistoryStore<B>,
        renderer: &dyn Renderer,
    ) -> Vec<HistoryItem> {
        let due: Vec<RecordKind> = self
            .slots
            .iter()
            .filter_map(|(kind, slot)| match slot {
                SlotState::Pending { deadline, .. } if *deadline <= now => Some(*kind),
                _ => None,
            })
            .collect();

        let mut written = Vec::new();
        for kind in due {
            let Some(SlotState::Pending {
                tracked,
                record,
                colors,
                ..
            }) = self.slots.remove(&kind)
            else {
                continue;
            };

            match tracked {
                Some(id) => {
                    if let Some(item) = store.update(&id, &record, &colors, renderer) {
                        written.push(item);
                    }
                    // The slot keeps tracking the same id whether or not
                    // this particular write landed.
                    self.slots.insert(kind, SlotState::Tracking { id });
                }
                None => match store.save(&record, &colors, renderer) {
                    Some(item) => {
                        self.slots
                            .insert(kind, SlotState::Tracking { id: item.id.clone() });
                        written.push(item);
                    }
                    None => {
                        // Duplicate or storage failure: nothing to track.
                        self.slots.insert(kind, SlotState::Idle);
                    }
                },
            }
        }
        written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::MemoryBackend;
    use crate::render::{ExportFormat, RenderError};

    struct StubRenderer;

    impl Renderer for StubRenderer {
        fn thumbnail(
            &self,
            _payload: &str,
            _colors: &ColorConfig,
            _size_px: u32,
        ) -> Result<String, RenderError> {
            Ok("thumb".to_string())
        }

        fn export(
            &self,
            _payload: &str,
            _colors: &ColorConfig,
            format: ExportFormat,
            _resolution: Option<u32>,
        ) -> Result<Vec<u8>, RenderError> {
            Err(RenderError::UnsupportedFormat(format))
        }
    }

    fn store() -> HistoryStore<MemoryBackend> {
        HistoryStore::new(MemoryBackend::new())
    }

    fn text_record(text: &str) -> Record {
        Record::Text {
            text: text.to_string(),
        }
    }

    #[test]
    fn first_fire_saves_then_tracks() {
        let mut store = store();
        let mut coordinator = Coordinator::new();
        let t0 = Instant::now();

        coordinator.edit(text_record("draft"), ColorConfig::default(), t0);
        assert!(coordinator
            .flush_due(t0, &mut store, &StubRenderer)
            .is_empty());

        let written = coordinator.flush_due(t0 + DEBOUNCE_DELAY, &mut store, &StubRenderer);
        assert_eq!(written.len(), 1);
        let first_id = written[0].id.clone();

        // A later edit on the same kind updates the tracked item.
        coordinator.edit(text_record("draft 2"), ColorConfig::default(), t0);
        let written = coordinator.flush_due(t0 + DEBOUNCE_DELAY, &mut store, &StubRenderer);
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].id, first_id);
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn edits_restart_the_deadline() {
        let mut store = store();
        let mut coordinator = Coordinator::new();
        let t0 = Instant::now();

        coordinator.edit(text_record("a"), ColorConfig::default(), t0);
        let half = t0 + DEBOUNCE_DELAY / 2;
        coordinator.edit(text_record("ab"), ColorConfig::default(), half);

        // Original deadline has passed but the restart superseded it.
        assert!(coordinator
            .flush_due(t0 + DEBOUNCE_DELAY, &mut store, &StubRenderer)
            .is_empty());
        let written = coordinator.flush_due(half + DEBOUNCE_DELAY, &mut store, &StubRenderer);
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].data, text_record("ab"));
    }

    #[test]
    fn switching_kinds_clears_the_left_slot() {
        let mut store = store();
        let mut coordinator = Coordinator::new();
        let t0 = Instant::now();

        coordinator.edit(text_record("a"), ColorConfig::default(), t0);
        coordinator.switch_to(RecordKind::Url);

        // The pending text edit was cancelled by the switch.
        assert!(coordinator
            .flush_due(t0 + DEBOUNCE_DELAY, &mut store, &StubRenderer)
            .is_empty());
        assert!(store.list().is_empty());

        // Returning to text starts a fresh entry instead of updating.
        coordinator.switch_to(RecordKind::Text);
        coordinator.edit(text_record("a"), ColorConfig::default(), t0);
        let written = coordinator.flush_due(t0 + DEBOUNCE_DELAY, &mut store, &StubRenderer);
        assert_eq!(written.len(), 1);
    }

    #[test]
    fn duplicate_save_leaves_slot_untracked() {
        let mut store = store();
        let mut coordinator = Coordinator::new();
        let t0 = Instant::now();

        // Seed history with the same record.
        store
            .save(&text_record("same"), &ColorConfig::default(), &StubRenderer)
            .unwrap();

        coordinator.edit(text_record("same"), ColorConfig::default(), t0);
        let written = coordinator.flush_due(t0 + DEBOUNCE_DELAY, &mut store, &StubRenderer);
        assert!(written.is_empty());
        assert_eq!(store.list().len(), 1);
        assert!(coordinator.next_deadline().is_none());
    }
}
