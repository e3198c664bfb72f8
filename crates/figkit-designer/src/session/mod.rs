//! Editing session of one figure.
//!
//! A [`Session`] ties together everything the editor keeps per figure:
//! - the backend the figure lives in
//! - the element side-table and the selection
//! - the gesture engine state and the viewport it converts pointers through
//! - the change tracker and the script the edits are saved into
//!
//! Sessions are owned by a [`SessionRegistry`], keyed by figure number.
//! Input handling lives in `gesture`, one-shot edits in `actions`, undo/redo
//! and persistence in `history`.

mod actions;
mod gesture;
mod history;

pub use actions::Direction;
pub use gesture::Modifiers;

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use figkit_core::{AppEvent, Bbox, ElementId, EventBus};
use figkit_settings::{Config, InteractionSettings, OutputSettings};

use crate::backend::FigureBackend;
use crate::drag::DragState;
use crate::element::{ElementMeta, ElementTree, PropertyWrite};
use crate::error::{EditError, EditResult};
use crate::history::{ChangeEntry, ChangeTracker};
use crate::property::{args_approx_eq, ArgValue, PropertyPath};
use crate::selection::{self, Handle, SelectionModel};
use crate::viewport::Viewport;

/// Tolerance below which a property write counts as no change.
pub(crate) const CHANGE_EPSILON: f64 = 1e-12;

type FigureReadyHook = Box<dyn FnMut(&dyn FigureBackend)>;
type PreSaveHook = Box<dyn FnMut(&Path, &[ChangeEntry])>;

/// Editing state of one figure.
pub struct Session<B: FigureBackend> {
    backend: B,
    bus: Arc<EventBus>,
    interaction: InteractionSettings,
    output: OutputSettings,
    viewport: Viewport,
    tree: ElementTree,
    selection: SelectionModel,
    tracker: ChangeTracker,
    drag: DragState,
    script: Option<PathBuf>,
    figure_ready_hooks: Vec<FigureReadyHook>,
    pre_save_hooks: Vec<PreSaveHook>,
}

impl<B: FigureBackend> Session<B> {
    /// Creates a session with default settings and its own event bus.
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, &Config::default(), Arc::new(EventBus::new()))
    }

    pub fn with_config(backend: B, config: &Config, bus: Arc<EventBus>) -> Self {
        let (w_in, h_in) = backend.size_inches();
        let dpi = backend.dpi();
        let viewport = Viewport::new(w_in * dpi, h_in * dpi, w_in, h_in, dpi);
        tracing::debug!("New session for figure {}", backend.figure_number());
        Self {
            tree: ElementTree::new(bus.clone()),
            selection: SelectionModel::new(bus.clone()),
            tracker: ChangeTracker::new(bus.clone()),
            backend,
            bus,
            interaction: config.interaction.clone(),
            output: config.output.clone(),
            viewport,
            drag: DragState::Idle,
            script: None,
            figure_ready_hooks: Vec::new(),
            pre_save_hooks: Vec::new(),
        }
    }

    pub fn figure_number(&self) -> u32 {
        self.backend.figure_number()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable access to the backend, for changes made outside the editor.
    ///
    /// Elements removed this way are dropped lazily on the next access.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    pub fn tracker(&self) -> &ChangeTracker {
        &self.tracker
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    pub fn interaction(&self) -> &InteractionSettings {
        &self.interaction
    }

    pub fn script_path(&self) -> Option<&Path> {
        self.script.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.tracker.is_dirty()
    }

    /// Registers an observer called whenever the figure is ready for display.
    pub fn on_figure_ready<F>(&mut self, hook: F)
    where
        F: FnMut(&dyn FigureBackend) + 'static,
    {
        self.figure_ready_hooks.push(Box::new(hook));
    }

    /// Registers an observer called with the compacted edits right before
    /// they are written to a script.
    pub fn on_pre_save<F>(&mut self, hook: F)
    where
        F: FnMut(&Path, &[ChangeEntry]) + 'static,
    {
        self.pre_save_hooks.push(Box::new(hook));
    }

    /// Notifies figure-ready observers.
    pub fn figure_ready(&mut self) {
        for hook in self.figure_ready_hooks.iter_mut() {
            hook(&self.backend);
        }
        self.bus.publish(AppEvent::CanvasChanged);
    }

    /// Metadata of an element, `None` if it no longer exists.
    pub fn element(&mut self, id: &ElementId) -> Option<ElementMeta> {
        self.tree.resolve(id, &self.backend)
    }

    /// Bounding box in figure fraction.
    pub fn bbox_of(&mut self, id: &ElementId) -> Option<Bbox> {
        let meta = self.tree.resolve(id, &self.backend)?;
        meta.adapter.bbox(id, &self.backend)
    }

    /// Positionable elements with their boxes, in draw order.
    pub fn positionable_elements(&mut self) -> Vec<(ElementId, Bbox)> {
        let ids = self.tree.walk(&self.backend);
        ids.into_iter()
            .filter_map(|id| {
                let meta = self.tree.get(&id)?;
                if !meta.capabilities().is_positionable() {
                    return None;
                }
                let bbox = meta.adapter.bbox(&id, &self.backend)?;
                Some((id, bbox))
            })
            .collect()
    }

    /// Replaces the selection, ignoring elements that do not exist.
    pub fn select<I: IntoIterator<Item = ElementId>>(&mut self, ids: I) {
        let ids: Vec<ElementId> = ids
            .into_iter()
            .filter(|id| self.tree.resolve(id, &self.backend).is_some())
            .collect();
        self.selection.select(ids);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Union box of the selection.
    pub fn selection_bbox(&mut self) -> Option<Bbox> {
        let ids = self.selection.to_vec();
        let boxes: Vec<Bbox> = ids.iter().filter_map(|id| self.bbox_of(id)).collect();
        Bbox::union_all(boxes.iter())
    }

    /// Handles of the selection box, empty without a selection.
    pub fn handles(&mut self) -> Vec<Handle> {
        match self.selection_bbox() {
            Some(bbox) => selection::handles(&bbox, &self.viewport, self.interaction.rotate_handle_offset_px),
            None => Vec::new(),
        }
    }

    /// Calls a setter and records it as a gesture of its own.
    ///
    /// Fails with `UnsupportedCapability` when the element has no such setter.
    pub fn set_property(
        &mut self,
        id: &ElementId,
        property: PropertyPath,
        args: Vec<ArgValue>,
    ) -> EditResult<usize> {
        self.ensure_idle()?;
        let meta = self
            .tree
            .resolve(id, &self.backend)
            .ok_or_else(|| EditError::StaleElementReference(id.clone()))?;
        if !supports(&meta, property) {
            return Err(EditError::UnsupportedCapability {
                element: id.clone(),
                capability: property.as_str(),
            });
        }
        self.apply_and_commit(property.label(), vec![(id.clone(), vec![(property, args)])])
    }

    /// Drops selected elements that vanished from the figure.
    fn prune_stale(&mut self) {
        let gone = self.tree.prune(&self.backend);
        if gone.is_empty() {
            return;
        }
        let backend = &self.backend;
        let dropped = self.selection.retain(|id| backend.kind_of(id).is_some());
        for id in dropped {
            tracing::warn!("Dropped stale element {} from selection", id);
        }
    }

    fn ensure_idle(&self) -> EditResult<()> {
        if self.drag.is_idle() {
            Ok(())
        } else {
            tracing::warn!("Refused action while {}", self.drag.name());
            Err(EditError::GestureInProgress)
        }
    }

    /// Selected elements that move on their own: an element whose ancestor
    /// is selected as well follows that ancestor.
    fn independent_selection(&self) -> Vec<ElementId> {
        let selected = self.selection.to_vec();
        selected
            .iter()
            .filter(|id| !selected.iter().any(|other| id.is_descendant_of(other)))
            .cloned()
            .collect()
    }

    /// Applies setter calls and records those that changed something as one
    /// gesture group. Returns the number of recorded entries.
    fn apply_and_commit(
        &mut self,
        label: &str,
        plan: Vec<(ElementId, Vec<PropertyWrite>)>,
    ) -> EditResult<usize> {
        let mut changes = Vec::new();
        for (id, writes) in plan {
            for (property, args) in writes {
                let before = self.backend.read(&id, property);
                if before.as_deref().is_some_and(|b| args_approx_eq(b, &args, CHANGE_EPSILON)) {
                    continue;
                }
                if let Err(err) = self.backend.write(&id, property, &args) {
                    tracing::debug!("Skipped {}.{}: {}", id, property, err);
                    continue;
                }
                let after = self.backend.read(&id, property).unwrap_or(args);
                changes.push((id.clone(), property, after));
            }
        }
        self.commit(label, changes)
    }

    /// Records already applied changes as one gesture group.
    fn commit(&mut self, label: &str, changes: Vec<(ElementId, PropertyPath, Vec<ArgValue>)>) -> EditResult<usize> {
        if changes.is_empty() {
            return Ok(0);
        }
        let count = changes.len();
        self.tracker.begin_gesture(label);
        let result = changes
            .into_iter()
            .try_for_each(|(id, property, args)| self.tracker.add_change(id, property, args));
        self.tracker.end_gesture();
        result?;
        self.backend.request_redraw();
        self.bus.publish(AppEvent::CanvasChanged);
        tracing::debug!("Committed {} ({} entries)", label, count);
        Ok(count)
    }
}

fn supports(meta: &ElementMeta, property: PropertyPath) -> bool {
    let caps = meta.capabilities();
    match property {
        PropertyPath::Text => caps.text,
        PropertyPath::Color => caps.color,
        PropertyPath::FontSize => caps.font_size,
        PropertyPath::Rotation => caps.rotation,
        PropertyPath::SizeInches => meta.parent.is_none(),
        PropertyPath::Position | PropertyPath::Loc | PropertyPath::Extent => {
            meta.adapter.geometry_properties().contains(&property)
        }
    }
}

impl<B: FigureBackend> fmt::Debug for Session<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("figure", &self.backend.figure_number())
            .field("selected", &self.selection.len())
            .field("cursor", &self.tracker.cursor())
            .field("drag", &self.drag.name())
            .field("script", &self.script)
            .finish()
    }
}

/// Open sessions by figure number.
pub struct SessionRegistry<B: FigureBackend> {
    sessions: BTreeMap<u32, Session<B>>,
    bus: Arc<EventBus>,
    config: Config,
}

impl<B: FigureBackend> SessionRegistry<B> {
    pub fn new(config: Config) -> Self {
        Self {
            sessions: BTreeMap::new(),
            bus: Arc::new(EventBus::new()),
            config,
        }
    }

    /// Bus shared by every session of the registry.
    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    /// Opens a session for `backend`, replacing any session of the same
    /// figure number.
    pub fn open(&mut self, backend: B) -> &mut Session<B> {
        let number = backend.figure_number();
        let session = Session::with_config(backend, &self.config, self.bus.clone());
        match self.sessions.entry(number) {
            Entry::Occupied(mut entry) => {
                tracing::info!("Replaced session of figure {}", number);
                entry.insert(session);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(session),
        }
    }

    pub fn get(&self, figure: u32) -> Option<&Session<B>> {
        self.sessions.get(&figure)
    }

    pub fn get_mut(&mut self, figure: u32) -> Option<&mut Session<B>> {
        self.sessions.get_mut(&figure)
    }

    pub fn close(&mut self, figure: u32) -> Option<Session<B>> {
        self.sessions.remove(&figure)
    }

    pub fn figure_numbers(&self) -> Vec<u32> {
        self.sessions.keys().copied().collect()
    }

    /// Whether any session has unsaved edits.
    pub fn any_dirty(&self) -> bool {
        self.sessions.values().any(Session::is_dirty)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
