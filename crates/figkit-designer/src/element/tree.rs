//! Side-table of known elements.
//!
//! Elements are registered lazily the first time the editor touches them
//! (selection, hit test, tree expansion) and dropped once the backend no
//! longer reports them. The parent link lives here, not on the element.

use std::collections::HashMap;
use std::sync::Arc;

use figkit_core::{AppEvent, ElementId, EventBus};

use super::{Capabilities, ElementAdapter, ElementKind};
use crate::backend::FigureBackend;

/// Cached metadata of one element.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementMeta {
    pub kind: ElementKind,
    pub parent: Option<ElementId>,
    pub adapter: ElementAdapter,
}

impl ElementMeta {
    pub fn capabilities(&self) -> Capabilities {
        self.adapter.capabilities()
    }
}

#[derive(Debug)]
pub struct ElementTree {
    entries: HashMap<ElementId, ElementMeta>,
    bus: Arc<EventBus>,
}

impl ElementTree {
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self {
            entries: HashMap::new(),
            bus,
        }
    }

    /// Metadata of `id`, registering it on first use.
    ///
    /// Returns `None` (and forgets the element) when the backend no longer
    /// has it.
    pub fn resolve(&mut self, id: &ElementId, backend: &dyn FigureBackend) -> Option<ElementMeta> {
        let Some(kind) = backend.kind_of(id) else {
            if self.entries.remove(id).is_some() {
                tracing::debug!("Forgot vanished element {}", id);
            }
            return None;
        };

        if let Some(meta) = self.entries.get(id) {
            if meta.kind == kind {
                return Some(meta.clone());
            }
        }

        let meta = ElementMeta {
            kind,
            parent: id.parent(),
            adapter: ElementAdapter::resolve(kind, id, backend),
        };
        self.entries.insert(id.clone(), meta.clone());
        self.bus.publish(AppEvent::ElementChildCreated {
            element: id.clone(),
            parent: meta.parent.clone(),
        });
        Some(meta)
    }

    /// Cached metadata without touching the backend.
    pub fn get(&self, id: &ElementId) -> Option<&ElementMeta> {
        self.entries.get(id)
    }

    pub fn parent_of(&self, id: &ElementId) -> Option<&ElementId> {
        self.entries.get(id)?.parent.as_ref()
    }

    /// Children of `parent`, registering each.
    pub fn children(&mut self, parent: &ElementId, backend: &dyn FigureBackend) -> Vec<ElementId> {
        backend
            .children(parent)
            .into_iter()
            .filter(|child| self.resolve(child, backend).is_some())
            .collect()
    }

    /// Every element of the figure in draw order: parents before their
    /// children, earlier siblings before later ones.
    pub fn walk(&mut self, backend: &dyn FigureBackend) -> Vec<ElementId> {
        let root = ElementId::figure(backend.figure_number());
        if self.resolve(&root, backend).is_none() {
            return Vec::new();
        }
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let children = self.children(&id, backend);
            out.push(id);
            stack.extend(children.into_iter().rev());
        }
        out
    }

    /// Drops every entry the backend no longer reports, returning them.
    pub fn prune(&mut self, backend: &dyn FigureBackend) -> Vec<ElementId> {
        let gone: Vec<ElementId> = self
            .entries
            .keys()
            .filter(|id| backend.kind_of(id).is_none())
            .cloned()
            .collect();
        for id in &gone {
            self.entries.remove(id);
            tracing::debug!("Pruned {}", id);
        }
        gone
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
