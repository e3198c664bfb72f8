//! Stable element references.
//!
//! An [`ElementId`] names an element by its position in the figure tree, in
//! the same syntax the generated code uses to reach it:
//!
//! ```text
//! plt.figure(1)                       the figure itself
//! plt.figure(1).axes[0]               first axes
//! plt.figure(1).axes[0].texts[2]      third text of that axes
//! plt.figure(1).axes[1].get_legend()  legend of the second axes
//! ```
//!
//! Since the identity is a path and not a handle into the plotting library,
//! it survives figure rebuilds and save/reload cycles.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ReferenceError;

/// Child collection an element is reached through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Collection {
    Axes,
    Texts,
    Lines,
    Patches,
    Images,
    /// Single legend slot, reached with `get_legend()`
    Legend,
}

impl Collection {
    /// Attribute name used in references.
    pub fn attribute(self) -> &'static str {
        match self {
            Self::Axes => "axes",
            Self::Texts => "texts",
            Self::Lines => "lines",
            Self::Patches => "patches",
            Self::Images => "images",
            Self::Legend => "get_legend",
        }
    }

    fn from_attribute(name: &str) -> Option<Self> {
        match name {
            "axes" => Some(Self::Axes),
            "texts" => Some(Self::Texts),
            "lines" => Some(Self::Lines),
            "patches" => Some(Self::Patches),
            "images" => Some(Self::Images),
            _ => None,
        }
    }
}

/// One step from a parent element to a child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Segment {
    pub collection: Collection,
    pub index: usize,
}

/// Path-based identity of a figure element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId {
    figure: u32,
    path: Vec<Segment>,
}

impl ElementId {
    /// Reference to the figure with the given number.
    pub fn figure(number: u32) -> Self {
        Self {
            figure: number,
            path: Vec::new(),
        }
    }

    /// Reference to the `index`-th child of `collection`.
    pub fn child(&self, collection: Collection, index: usize) -> Self {
        let mut path = self.path.clone();
        path.push(Segment {
            collection,
            index: if collection == Collection::Legend { 0 } else { index },
        });
        Self {
            figure: self.figure,
            path,
        }
    }

    /// Shorthand for `child(Collection::Axes, index)`.
    pub fn axes(&self, index: usize) -> Self {
        self.child(Collection::Axes, index)
    }

    /// Shorthand for `child(Collection::Texts, index)`.
    pub fn text(&self, index: usize) -> Self {
        self.child(Collection::Texts, index)
    }

    /// Reference to this element's legend.
    pub fn legend(&self) -> Self {
        self.child(Collection::Legend, 0)
    }

    /// Shorthand for `child(Collection::Images, index)`.
    pub fn image(&self, index: usize) -> Self {
        self.child(Collection::Images, index)
    }

    /// Parent reference, `None` for the figure.
    pub fn parent(&self) -> Option<Self> {
        if self.path.is_empty() {
            return None;
        }
        let mut path = self.path.clone();
        path.pop();
        Some(Self {
            figure: self.figure,
            path,
        })
    }

    pub fn figure_number(&self) -> u32 {
        self.figure
    }

    pub fn is_figure(&self) -> bool {
        self.path.is_empty()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.path
    }

    pub fn last_segment(&self) -> Option<Segment> {
        self.path.last().copied()
    }

    /// Number of steps below the figure.
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Reference to the figure this element belongs to.
    pub fn root(&self) -> Self {
        Self::figure(self.figure)
    }

    /// Returns `true` if `ancestor` lies strictly above this element.
    pub fn is_descendant_of(&self, ancestor: &ElementId) -> bool {
        self.figure == ancestor.figure
            && self.path.len() > ancestor.path.len()
            && self.path.starts_with(&ancestor.path)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "plt.figure({})", self.figure)?;
        for seg in &self.path {
            match seg.collection {
                Collection::Legend => write!(f, ".get_legend()")?,
                other => write!(f, ".{}[{}]", other.attribute(), seg.index)?,
            }
        }
        Ok(())
    }
}

impl FromStr for ElementId {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ReferenceError::Invalid {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        let rest = s
            .trim()
            .strip_prefix("plt.figure(")
            .ok_or_else(|| invalid("expected 'plt.figure('"))?;
        let close = rest.find(')').ok_or_else(|| invalid("unclosed figure number"))?;
        let figure: u32 = rest[..close]
            .trim()
            .parse()
            .map_err(|_| invalid("figure number is not an integer"))?;

        let mut id = ElementId::figure(figure);
        let mut rest = &rest[close + 1..];
        while !rest.is_empty() {
            rest = rest
                .strip_prefix('.')
                .ok_or_else(|| invalid("expected '.' between segments"))?;
            if let Some(after) = rest.strip_prefix("get_legend()") {
                id = id.legend();
                rest = after;
                continue;
            }
            let open = rest.find('[').ok_or_else(|| invalid("expected '['"))?;
            let collection = Collection::from_attribute(&rest[..open])
                .ok_or_else(|| invalid("unknown child collection"))?;
            let end = rest.find(']').ok_or_else(|| invalid("expected ']'"))?;
            if end < open {
                return Err(invalid("malformed index"));
            }
            let index: usize = rest[open + 1..end]
                .trim()
                .parse()
                .map_err(|_| invalid("index is not an integer"))?;
            id = id.child(collection, index);
            rest = &rest[end + 1..];
        }
        Ok(id)
    }
}
