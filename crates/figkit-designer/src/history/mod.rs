//! Change tracking, undo/redo and persistence of edits.
//!
//! Every committed property write becomes a [`ChangeEntry`]. Entries are
//! grouped by gesture: undo and redo always move over a whole group, and
//! repeated writes to the same property inside one open group collapse into
//! a single entry.
//!
//! Undo does not compute inverses. It rebuilds the figure from its
//! construction code and replays the baseline plus every entry before the
//! cursor, so the figure state is always a pure function of the log.
//!
//! - [`codegen`]: rendering and parsing of generated statements
//! - [`script`]: locating and splicing the generated block in a script

pub mod codegen;
pub mod script;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use figkit_core::{AppEvent, ElementId, EventBus, HistoryStatus};

use crate::backend::FigureBackend;
use crate::error::{EditError, EditResult};
use crate::property::{ArgValue, PropertyPath};

pub use codegen::Statement;

/// Identifies the gesture an entry was committed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GestureId(pub u64);

impl GestureId {
    /// Group of the entries seeded from an existing generated block.
    pub const BASELINE: GestureId = GestureId(0);
}

/// One recorded setter call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEntry {
    pub seq: u64,
    pub target: ElementId,
    pub property: PropertyPath,
    pub args: Vec<ArgValue>,
    pub gesture: GestureId,
    pub timestamp: DateTime<Utc>,
}

impl ChangeEntry {
    pub fn statement(&self) -> Statement {
        Statement {
            target: self.target.clone(),
            property: self.property,
            args: self.args.clone(),
        }
    }

    fn key(&self) -> (&ElementId, PropertyPath) {
        (&self.target, self.property)
    }
}

/// Ordered log of edits with a cursor.
///
/// Entries before the cursor are applied, entries after it are redoable.
#[derive(Debug)]
pub struct ChangeTracker {
    entries: Vec<ChangeEntry>,
    cursor: usize,
    baseline: Vec<ChangeEntry>,
    /// Cleared by a save, set by every change, undo or redo
    dirty: bool,
    open_gesture: Option<GestureId>,
    next_seq: u64,
    next_gesture: u64,
    labels: HashMap<GestureId, String>,
    bus: Arc<EventBus>,
}

impl ChangeTracker {
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
            baseline: Vec::new(),
            dirty: false,
            open_gesture: None,
            next_seq: 1,
            next_gesture: 1,
            labels: HashMap::new(),
            bus,
        }
    }

    /// Opens a new gesture group. Changes added until [`end_gesture`]
    /// belong to it.
    ///
    /// [`end_gesture`]: ChangeTracker::end_gesture
    pub fn begin_gesture(&mut self, label: impl Into<String>) -> GestureId {
        let id = GestureId(self.next_gesture);
        self.next_gesture += 1;
        self.labels.insert(id, label.into());
        self.open_gesture = Some(id);
        id
    }

    pub fn end_gesture(&mut self) {
        self.open_gesture = None;
    }

    /// Records a setter call.
    ///
    /// Outside an open gesture the change forms a group of its own. Redoable
    /// entries are discarded.
    pub fn add_change(
        &mut self,
        target: ElementId,
        property: PropertyPath,
        args: Vec<ArgValue>,
    ) -> EditResult<()> {
        if !args.iter().all(ArgValue::is_finite) {
            return Err(EditError::DegenerateGeometry(format!(
                "non-finite arguments for {}.{}",
                target, property
            )));
        }

        let (gesture, single) = match self.open_gesture {
            Some(g) => (g, false),
            None => (self.begin_gesture(property.label()), true),
        };

        if self.cursor < self.entries.len() {
            tracing::debug!("Discarding {} redoable entries", self.entries.len() - self.cursor);
            self.entries.truncate(self.cursor);
        }

        let merged = self
            .entries
            .iter()
            .rposition(|e| e.gesture == gesture && e.target == target && e.property == property);
        let timestamp = Utc::now();
        match merged {
            Some(index) => {
                let entry = &mut self.entries[index];
                entry.args = args;
                entry.timestamp = timestamp;
            }
            None => {
                self.entries.push(ChangeEntry {
                    seq: self.next_seq,
                    target,
                    property,
                    args,
                    gesture,
                    timestamp,
                });
                self.next_seq += 1;
                self.cursor = self.entries.len();
            }
        }

        self.dirty = true;
        if single {
            self.end_gesture();
        }
        self.notify();
        Ok(())
    }

    /// Steps back over the last applied gesture group and replays.
    pub fn undo(&mut self, backend: &mut dyn FigureBackend) -> EditResult<GestureId> {
        self.end_gesture();
        let Some(gesture) = self.cursor.checked_sub(1).map(|i| self.entries[i].gesture) else {
            return Err(EditError::NothingToUndo);
        };
        while self.cursor > 0 && self.entries[self.cursor - 1].gesture == gesture {
            self.cursor -= 1;
        }
        tracing::info!("Undo {} (cursor {})", self.label_of(gesture), self.cursor);
        self.dirty = true;
        self.replay(backend)?;
        self.notify();
        Ok(gesture)
    }

    /// Steps forward over the next undone gesture group and replays.
    pub fn redo(&mut self, backend: &mut dyn FigureBackend) -> EditResult<GestureId> {
        self.end_gesture();
        let Some(gesture) = self.entries.get(self.cursor).map(|e| e.gesture) else {
            return Err(EditError::NothingToRedo);
        };
        while self.cursor < self.entries.len() && self.entries[self.cursor].gesture == gesture {
            self.cursor += 1;
        }
        tracing::info!("Redo {} (cursor {})", self.label_of(gesture), self.cursor);
        self.dirty = true;
        self.replay(backend)?;
        self.notify();
        Ok(gesture)
    }

    /// Rebuilds the figure and applies baseline plus applied entries.
    ///
    /// Writes to elements the construction code no longer creates are
    /// skipped.
    pub fn replay(&self, backend: &mut dyn FigureBackend) -> EditResult<()> {
        backend.rebuild()?;
        for entry in self.baseline.iter().chain(self.applied()) {
            if let Err(err) = backend.write(&entry.target, entry.property, &entry.args) {
                tracing::warn!("Skipping replay of {}.{}: {}", entry.target, entry.property, err);
            }
        }
        backend.request_redraw();
        Ok(())
    }

    /// Replaces the baseline with statements parsed from a script.
    pub fn seed_baseline(&mut self, statements: Vec<Statement>) {
        let timestamp = Utc::now();
        self.baseline = statements
            .into_iter()
            .map(|s| {
                let entry = ChangeEntry {
                    seq: self.next_seq,
                    target: s.target,
                    property: s.property,
                    args: s.args,
                    gesture: GestureId::BASELINE,
                    timestamp,
                };
                self.next_seq += 1;
                entry
            })
            .collect();
        self.dirty = false;
        tracing::debug!("Seeded {} baseline entries", self.baseline.len());
        self.notify();
    }

    /// Baseline plus applied entries with only the last write per
    /// (element, property), ordered by that last write.
    pub fn compacted(&self) -> Vec<ChangeEntry> {
        let all: Vec<&ChangeEntry> = self.baseline.iter().chain(self.applied()).collect();
        let mut last: HashMap<(&ElementId, PropertyPath), usize> = HashMap::new();
        for (i, entry) in all.iter().enumerate() {
            last.insert(entry.key(), i);
        }
        all.iter()
            .enumerate()
            .filter(|(i, entry)| last.get(&entry.key()) == Some(i))
            .map(|(_, entry)| (*entry).clone())
            .collect()
    }

    /// Marks the current state as saved.
    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    /// Whether anything was changed, undone or redone since the last save.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn status(&self) -> HistoryStatus {
        let undo = self.cursor.checked_sub(1).map(|i| self.entries[i].gesture);
        let redo = self.entries.get(self.cursor).map(|e| e.gesture);
        HistoryStatus {
            undo_available: undo.is_some(),
            redo_available: redo.is_some(),
            undo_label: undo.map(|g| self.label_of(g).to_string()),
            redo_label: redo.map(|g| self.label_of(g).to_string()),
        }
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.entries.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Every entry, including redoable ones.
    pub fn entries(&self) -> &[ChangeEntry] {
        &self.entries
    }

    /// Entries before the cursor.
    pub fn applied(&self) -> &[ChangeEntry] {
        &self.entries[..self.cursor]
    }

    pub fn baseline(&self) -> &[ChangeEntry] {
        &self.baseline
    }

    pub fn is_gesture_open(&self) -> bool {
        self.open_gesture.is_some()
    }

    fn label_of(&self, gesture: GestureId) -> &str {
        self.labels.get(&gesture).map(String::as_str).unwrap_or("change")
    }

    fn notify(&self) {
        self.bus.publish(AppEvent::HistoryChanged(self.status()));
    }
}
