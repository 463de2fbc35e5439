//! Anchor graph: the arena of coordinate lines a form layout is built from
//!
//! Anchors reference each other by [`AnchorId`] handles. A handle is only an
//! index into the arena that created it, so two anchors with identical fields
//! are still distinct nodes and no relation ever keeps an anchor alive.

use std::collections::HashSet;
use std::fmt;

use super::error::LayoutError;

/// Which coordinate an anchor describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// An x-coordinate, used for left and right edges
    Horizontal,
    /// A y-coordinate, used for top and bottom edges
    Vertical,
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Horizontal => write!(f, "horizontal"),
            Self::Vertical => write!(f, "vertical"),
        }
    }
}

/// Stable handle of an anchor inside its [`AnchorGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnchorId(usize);

impl AnchorId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index)
    }

    /// Position of the anchor in creation order
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for AnchorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One horizontal or vertical coordinate line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    orientation: Orientation,
    related: Option<AnchorId>,
    relative_position: i32,
    absolute_position: i32,
    auto_size: bool,
    cached_position: Option<i32>,
}

impl Anchor {
    fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            related: None,
            relative_position: 0,
            absolute_position: 0,
            auto_size: false,
            cached_position: None,
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// The anchor this one is positioned relative to
    pub fn related(&self) -> Option<AnchorId> {
        self.related
    }

    /// Offset from the related anchor; ignored without a relation and for
    /// auto-size anchors
    pub fn relative_position(&self) -> i32 {
        self.relative_position
    }

    /// Position used when the anchor has no relation
    pub fn absolute_position(&self) -> i32 {
        self.absolute_position
    }

    pub fn is_auto_size(&self) -> bool {
        self.auto_size
    }

    /// Resolved position from the last successful solve, if still valid
    pub fn cached_position(&self) -> Option<i32> {
        self.cached_position
    }
}

/// Arena owning every anchor of one layout
#[derive(Debug, Clone, Default)]
pub struct AnchorGraph {
    anchors: Vec<Anchor>,
}

impl AnchorGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of anchors in the graph
    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// Create an anchor without relation at a fixed position
    pub fn create_absolute(&mut self, orientation: Orientation, position: i32) -> AnchorId {
        let mut anchor = Anchor::new(orientation);
        anchor.absolute_position = position;
        self.push(anchor)
    }

    /// Create an anchor at a fixed offset from `related`
    pub fn create_relative(&mut self, related: AnchorId, offset: i32) -> Result<AnchorId, LayoutError> {
        let orientation = self.require(related)?.orientation;
        let mut anchor = Anchor::new(orientation);
        anchor.related = Some(related);
        anchor.relative_position = offset;
        Ok(self.push(anchor))
    }

    /// Create an auto-size anchor whose offset from `related` comes from the
    /// preferred size of the children it bounds
    pub fn create_auto_size(&mut self, related: AnchorId) -> Result<AnchorId, LayoutError> {
        let orientation = self.require(related)?.orientation;
        let mut anchor = Anchor::new(orientation);
        anchor.related = Some(related);
        anchor.auto_size = true;
        Ok(self.push(anchor))
    }

    /// Create a linked anchor from a handle this graph handed out itself
    pub(crate) fn push_linked(&mut self, related: AnchorId, offset: i32, auto_size: bool) -> AnchorId {
        let mut anchor = Anchor::new(self.anchors[related.0].orientation);
        anchor.related = Some(related);
        anchor.relative_position = offset;
        anchor.auto_size = auto_size;
        self.push(anchor)
    }

    /// Retune the offsets of anchors this graph handed out itself
    pub(crate) fn set_offsets(&mut self, offsets: impl IntoIterator<Item = (AnchorId, i32)>) {
        for (id, offset) in offsets {
            self.anchors[id.0].relative_position = offset;
        }
        self.invalidate();
    }

    /// Point a spare anchor of this graph at a new related anchor
    pub(crate) fn relink(&mut self, id: AnchorId, related: AnchorId, offset: i32, auto_size: bool) {
        let anchor = &mut self.anchors[id.0];
        anchor.related = Some(related);
        anchor.relative_position = offset;
        anchor.auto_size = auto_size;
        self.invalidate();
    }

    // Nothing relates to a fresh anchor yet, so existing positions stay valid
    fn push(&mut self, anchor: Anchor) -> AnchorId {
        let id = AnchorId(self.anchors.len());
        self.anchors.push(anchor);
        id
    }

    pub fn get(&self, id: AnchorId) -> Option<&Anchor> {
        self.anchors.get(id.0)
    }

    /// Like [`get`](Self::get) but reports foreign handles as an error
    pub fn require(&self, id: AnchorId) -> Result<&Anchor, LayoutError> {
        self.get(id).ok_or(LayoutError::UnknownAnchor { anchor: id })
    }

    fn require_mut(&mut self, id: AnchorId) -> Result<&mut Anchor, LayoutError> {
        self.anchors
            .get_mut(id.0)
            .ok_or(LayoutError::UnknownAnchor { anchor: id })
    }

    /// Make `anchor` relative to `related` with the given offset.
    ///
    /// A direct self relation is rejected here; longer cycles are only
    /// visible to the solver.
    pub fn set_relation(&mut self, anchor: AnchorId, related: AnchorId, offset: i32) -> Result<(), LayoutError> {
        if anchor == related {
            return Err(LayoutError::SelfReference { anchor });
        }
        let related_orientation = self.require(related)?.orientation;
        let target = self.require_mut(anchor)?;
        if target.orientation != related_orientation {
            return Err(LayoutError::OrientationMismatch { anchor, related });
        }
        target.related = Some(related);
        target.relative_position = offset;
        self.invalidate();
        Ok(())
    }

    /// Drop the relation so the anchor falls back to its absolute position
    pub fn clear_relation(&mut self, anchor: AnchorId) -> Result<(), LayoutError> {
        self.require_mut(anchor)?.related = None;
        self.invalidate();
        Ok(())
    }

    pub fn set_relative_position(&mut self, anchor: AnchorId, offset: i32) -> Result<(), LayoutError> {
        self.require_mut(anchor)?.relative_position = offset;
        self.invalidate();
        Ok(())
    }

    pub fn set_absolute_position(&mut self, anchor: AnchorId, position: i32) -> Result<(), LayoutError> {
        self.require_mut(anchor)?.absolute_position = position;
        self.invalidate();
        Ok(())
    }

    pub fn set_auto_size(&mut self, anchor: AnchorId, auto_size: bool) -> Result<(), LayoutError> {
        self.require_mut(anchor)?.auto_size = auto_size;
        self.invalidate();
        Ok(())
    }

    pub fn orientation(&self, id: AnchorId) -> Option<Orientation> {
        self.get(id).map(Anchor::orientation)
    }

    pub fn related(&self, id: AnchorId) -> Option<AnchorId> {
        self.get(id).and_then(Anchor::related)
    }

    pub fn is_auto_size(&self, id: AnchorId) -> bool {
        self.get(id).is_some_and(Anchor::is_auto_size)
    }

    /// Resolved position, or `None` if the graph changed since the last solve
    pub fn position(&self, id: AnchorId) -> Option<i32> {
        self.get(id).and_then(Anchor::cached_position)
    }

    /// Forget every resolved position
    pub fn invalidate(&mut self) {
        for anchor in &mut self.anchors {
            anchor.cached_position = None;
        }
    }

    /// Store the positions of a successful solve, indexed by anchor
    pub(crate) fn commit(&mut self, positions: &[Option<i32>]) {
        for (anchor, position) in self.anchors.iter_mut().zip(positions) {
            anchor.cached_position = *position;
        }
    }

    /// The anchor followed by its relation chain, stopping before any repeat
    pub fn chain(&self, id: AnchorId) -> Vec<AnchorId> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = Some(id);
        while let Some(next) = current {
            if self.get(next).is_none() || !seen.insert(next) {
                break;
            }
            chain.push(next);
            current = self.related(next);
        }
        chain
    }

    pub fn iter(&self) -> impl Iterator<Item = (AnchorId, &Anchor)> {
        self.anchors
            .iter()
            .enumerate()
            .map(|(index, anchor)| (AnchorId(index), anchor))
    }
}
