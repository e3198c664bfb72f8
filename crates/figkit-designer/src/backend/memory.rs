//! In-memory figure backend.
//!
//! A [`FigureRecipe`] plays the role of the figure construction code: a
//! description of the figure as the script builds it. [`MemoryFigure`] keeps
//! the recipe and a live copy that setter calls mutate; `rebuild` throws the
//! live copy away and starts over from the recipe.

use std::collections::BTreeMap;

use figkit_core::{Bbox, Collection, ElementId, Point};

use super::{BackendError, DataLimits, FigureBackend};
use crate::element::ElementKind;
use crate::property::{ArgValue, PropertyPath};

#[derive(Debug, Clone)]
struct Node {
    kind: ElementKind,
    properties: BTreeMap<PropertyPath, Vec<ArgValue>>,
    extent_px: Option<(f64, f64)>,
    aspect_locked: bool,
    limits: Option<DataLimits>,
}

impl Node {
    fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            properties: BTreeMap::new(),
            extent_px: None,
            aspect_locked: false,
            limits: None,
        }
    }

    fn with(mut self, property: PropertyPath, args: Vec<ArgValue>) -> Self {
        self.properties.insert(property, args);
        self
    }
}

/// Description of a figure as its construction code creates it.
#[derive(Debug, Clone)]
pub struct FigureRecipe {
    number: u32,
    dpi: f64,
    nodes: BTreeMap<ElementId, Node>,
}

impl FigureRecipe {
    /// Creates an empty figure.
    pub fn new(number: u32, width_in: f64, height_in: f64, dpi: f64) -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(
            ElementId::figure(number),
            Node::new(ElementKind::Figure).with(
                PropertyPath::SizeInches,
                vec![ArgValue::Number(width_in), ArgValue::Number(height_in)],
            ),
        );
        Self { number, dpi, nodes }
    }

    fn insert(&mut self, parent: &ElementId, collection: Collection, node: Node) -> ElementId {
        let index = self
            .nodes
            .keys()
            .filter(|id| id.parent().as_ref() == Some(parent))
            .filter(|id| id.last_segment().map(|s| s.collection) == Some(collection))
            .count();
        let id = parent.child(collection, index);
        self.nodes.insert(id.clone(), node);
        id
    }

    fn root(&self) -> ElementId {
        ElementId::figure(self.number)
    }

    /// Adds an axes at `bbox` (figure fraction) with limits 0..1.
    pub fn add_axes(&mut self, bbox: Bbox) -> ElementId {
        let mut node = Node::new(ElementKind::Axes)
            .with(PropertyPath::Position, vec![ArgValue::List(bbox.to_array().to_vec())]);
        node.limits = Some(DataLimits {
            x: (0.0, 1.0),
            y: (0.0, 1.0),
        });
        let root = self.root();
        self.insert(&root, Collection::Axes, node)
    }

    /// Adds a text anchored at `position` in the parent's fraction.
    pub fn add_text(
        &mut self,
        parent: &ElementId,
        position: Point,
        text: &str,
        extent_px: (f64, f64),
    ) -> ElementId {
        let mut node = Node::new(ElementKind::Text)
            .with(
                PropertyPath::Position,
                vec![ArgValue::Tuple(vec![position.x, position.y])],
            )
            .with(PropertyPath::Text, vec![ArgValue::Str(text.to_string())])
            .with(PropertyPath::Rotation, vec![ArgValue::Number(0.0)])
            .with(PropertyPath::Color, vec![ArgValue::Str("black".to_string())])
            .with(PropertyPath::FontSize, vec![ArgValue::Number(10.0)]);
        node.extent_px = Some(extent_px);
        self.insert(parent, Collection::Texts, node)
    }

    /// Adds the legend of `axes` with its lower-left corner at `loc`.
    pub fn add_legend(&mut self, axes: &ElementId, loc: Point, extent_px: (f64, f64)) -> ElementId {
        let mut node = Node::new(ElementKind::Legend)
            .with(PropertyPath::Loc, vec![ArgValue::Tuple(vec![loc.x, loc.y])]);
        node.extent_px = Some(extent_px);
        self.insert(axes, Collection::Legend, node)
    }

    /// Adds an image spanning `[left, right, bottom, top]` in data units.
    pub fn add_image(&mut self, axes: &ElementId, extent: [f64; 4]) -> ElementId {
        let mut node = Node::new(ElementKind::Image)
            .with(PropertyPath::Extent, vec![ArgValue::List(extent.to_vec())]);
        node.aspect_locked = true;
        self.insert(axes, Collection::Images, node)
    }

    pub fn add_line(&mut self, axes: &ElementId, color: &str) -> ElementId {
        let node = Node::new(ElementKind::Line)
            .with(PropertyPath::Color, vec![ArgValue::Str(color.to_string())]);
        self.insert(axes, Collection::Lines, node)
    }

    pub fn add_patch(&mut self, axes: &ElementId, color: &str) -> ElementId {
        let node = Node::new(ElementKind::Patch)
            .with(PropertyPath::Color, vec![ArgValue::Str(color.to_string())]);
        self.insert(axes, Collection::Patches, node)
    }

    /// Marks an element as aspect locked (e.g. an axes with equal aspect).
    pub fn set_aspect_locked(&mut self, id: &ElementId, locked: bool) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.aspect_locked = locked;
        }
    }

    pub fn set_data_limits(&mut self, axes: &ElementId, x: (f64, f64), y: (f64, f64)) {
        if let Some(node) = self.nodes.get_mut(axes) {
            node.limits = Some(DataLimits { x, y });
        }
    }

    fn remove_subtree(&mut self, id: &ElementId) {
        self.nodes
            .retain(|key, _| key != id && !key.is_descendant_of(id));
    }
}

fn supports(kind: ElementKind, property: PropertyPath) -> bool {
    use PropertyPath::*;
    match kind {
        ElementKind::Figure => property == SizeInches,
        ElementKind::Axes => property == Position,
        ElementKind::Text => matches!(property, Position | Rotation | Text | Color | FontSize),
        ElementKind::Legend => property == Loc,
        ElementKind::Image => property == Extent,
        ElementKind::Line | ElementKind::Patch => property == Color,
    }
}

fn check_args(kind: ElementKind, property: PropertyPath, args: &[ArgValue]) -> Result<(), String> {
    use PropertyPath::*;
    let ok = match (property, args) {
        (Position, [ArgValue::List(v)]) => kind == ElementKind::Axes && v.len() == 4,
        (Position, [ArgValue::Tuple(v)]) => kind == ElementKind::Text && v.len() == 2,
        (Loc, [ArgValue::Tuple(v)]) => v.len() == 2,
        (Extent, [ArgValue::List(v)]) => v.len() == 4,
        (Rotation | FontSize, [ArgValue::Number(_)]) => true,
        (Text | Color, [ArgValue::Str(_)]) => true,
        (SizeInches, [ArgValue::Number(w), ArgValue::Number(h)]) => *w > 0.0 && *h > 0.0,
        _ => false,
    };
    if !ok {
        return Err(format!("unexpected arguments {:?} for {}", args, kind));
    }
    if !args.iter().all(ArgValue::is_finite) {
        return Err("non-finite number".to_string());
    }
    Ok(())
}

/// Figure backend holding the whole figure in memory.
#[derive(Debug, Clone)]
pub struct MemoryFigure {
    recipe: FigureRecipe,
    live: FigureRecipe,
    redraws: usize,
    rebuilds: usize,
}

impl MemoryFigure {
    pub fn new(recipe: FigureRecipe) -> Self {
        Self {
            live: recipe.clone(),
            recipe,
            redraws: 0,
            rebuilds: 0,
        }
    }

    /// Deletes an element and its children, as if the construction code
    /// stopped creating it.
    pub fn remove_element(&mut self, id: &ElementId) {
        self.recipe.remove_subtree(id);
        self.live.remove_subtree(id);
    }

    pub fn redraw_count(&self) -> usize {
        self.redraws
    }

    pub fn rebuild_count(&self) -> usize {
        self.rebuilds
    }

    /// Every element currently in the figure, parents first.
    pub fn elements(&self) -> Vec<ElementId> {
        self.live.nodes.keys().cloned().collect()
    }
}

impl FigureBackend for MemoryFigure {
    fn figure_number(&self) -> u32 {
        self.live.number
    }

    fn size_inches(&self) -> (f64, f64) {
        let root = self.live.root();
        match self
            .live
            .nodes
            .get(&root)
            .and_then(|n| n.properties.get(&PropertyPath::SizeInches))
            .map(Vec::as_slice)
        {
            Some([ArgValue::Number(w), ArgValue::Number(h)]) => (*w, *h),
            _ => (0.0, 0.0),
        }
    }

    fn dpi(&self) -> f64 {
        self.live.dpi
    }

    fn children(&self, parent: &ElementId) -> Vec<ElementId> {
        self.live
            .nodes
            .keys()
            .filter(|id| id.parent().as_ref() == Some(parent))
            .cloned()
            .collect()
    }

    fn kind_of(&self, id: &ElementId) -> Option<ElementKind> {
        self.live.nodes.get(id).map(|n| n.kind)
    }

    fn read(&self, id: &ElementId, property: PropertyPath) -> Option<Vec<ArgValue>> {
        self.live.nodes.get(id)?.properties.get(&property).cloned()
    }

    fn write(
        &mut self,
        id: &ElementId,
        property: PropertyPath,
        args: &[ArgValue],
    ) -> Result<(), BackendError> {
        let node = self
            .live
            .nodes
            .get_mut(id)
            .ok_or_else(|| BackendError::UnknownElement(id.clone()))?;
        if !supports(node.kind, property) {
            return Err(BackendError::UnsupportedProperty {
                element: id.clone(),
                property,
            });
        }
        check_args(node.kind, property, args)
            .map_err(|reason| BackendError::InvalidArguments { property, reason })?;
        node.properties.insert(property, args.to_vec());
        Ok(())
    }

    fn extent_px(&self, id: &ElementId) -> Option<(f64, f64)> {
        self.live.nodes.get(id)?.extent_px
    }

    fn aspect_locked(&self, id: &ElementId) -> bool {
        self.live.nodes.get(id).is_some_and(|n| n.aspect_locked)
    }

    fn data_limits(&self, axes: &ElementId) -> Option<DataLimits> {
        self.live.nodes.get(axes)?.limits
    }

    fn rebuild(&mut self) -> Result<(), BackendError> {
        self.live = self.recipe.clone();
        self.rebuilds += 1;
        tracing::trace!("Rebuilt figure {}", self.live.number);
        Ok(())
    }

    fn request_redraw(&mut self) {
        self.redraws += 1;
    }
}
