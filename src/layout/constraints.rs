//! Four-anchor constraints attached to container children

use std::fmt;

use super::anchor::{AnchorGraph, AnchorId, Orientation};
use super::error::LayoutError;

/// One of the two layout axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Left to right, resolved by horizontal anchors
    Horizontal,
    /// Top to bottom, resolved by vertical anchors
    Vertical,
}

impl Axis {
    /// Orientation of the anchors that bound this axis
    pub fn orientation(self) -> Orientation {
        match self {
            Self::Horizontal => Orientation::Horizontal,
            Self::Vertical => Orientation::Vertical,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Horizontal => write!(f, "horizontal"),
            Self::Vertical => write!(f, "vertical"),
        }
    }
}

/// An edge slot of a constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Top,
    Left,
    Bottom,
    Right,
}

impl Slot {
    pub fn axis(self) -> Axis {
        match self {
            Self::Left | Self::Right => Axis::Horizontal,
            Self::Top | Self::Bottom => Axis::Vertical,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Top => write!(f, "top"),
            Self::Left => write!(f, "left"),
            Self::Bottom => write!(f, "bottom"),
            Self::Right => write!(f, "right"),
        }
    }
}

/// The anchors bounding one child: top, left, bottom, right
///
/// A missing side is allowed as long as the other side of that axis is set;
/// the container then sizes the child to its preferred extent from the side
/// that is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Constraints {
    pub top: Option<AnchorId>,
    pub left: Option<AnchorId>,
    pub bottom: Option<AnchorId>,
    pub right: Option<AnchorId>,
}

impl Constraints {
    pub fn new(
        top: Option<AnchorId>,
        left: Option<AnchorId>,
        bottom: Option<AnchorId>,
        right: Option<AnchorId>,
    ) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// Constraints with all four anchors set
    pub fn edges(top: AnchorId, left: AnchorId, bottom: AnchorId, right: AnchorId) -> Self {
        Self::new(Some(top), Some(left), Some(bottom), Some(right))
    }

    pub fn get(&self, slot: Slot) -> Option<AnchorId> {
        match slot {
            Slot::Top => self.top,
            Slot::Left => self.left,
            Slot::Bottom => self.bottom,
            Slot::Right => self.right,
        }
    }

    /// The (leading, trailing) pair of an axis
    pub fn axis(&self, axis: Axis) -> (Option<AnchorId>, Option<AnchorId>) {
        match axis {
            Axis::Horizontal => (self.left, self.right),
            Axis::Vertical => (self.top, self.bottom),
        }
    }

    /// Present anchors in slot order
    pub fn anchors(&self) -> impl Iterator<Item = (Slot, AnchorId)> + '_ {
        [Slot::Top, Slot::Left, Slot::Bottom, Slot::Right]
            .into_iter()
            .filter_map(move |slot| self.get(slot).map(|anchor| (slot, anchor)))
    }

    /// Check the constraint against the graph before it is attached to
    /// child number `child`.
    pub fn validate(&self, graph: &AnchorGraph, child: usize) -> Result<(), LayoutError> {
        for (slot, anchor) in self.anchors() {
            let orientation = graph.require(anchor)?.orientation();
            if orientation != slot.axis().orientation() {
                return Err(LayoutError::WrongOrientation { slot, anchor });
            }
        }

        for axis in [Axis::Horizontal, Axis::Vertical] {
            if let (None, None) = self.axis(axis) {
                let reason = match axis {
                    Axis::Horizontal => "neither left nor right anchor is set",
                    Axis::Vertical => "neither top nor bottom anchor is set",
                };
                return Err(LayoutError::malformed(child, axis, reason));
            }
        }
        Ok(())
    }
}
