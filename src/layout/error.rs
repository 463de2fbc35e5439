//! Error types for the layout engine

use thiserror::Error;

use super::anchor::AnchorId;
use super::constraints::{Axis, Slot};

/// Errors that can occur while building or solving an anchor layout
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// An anchor was made relative to itself
    #[error("anchor {anchor} cannot be relative to itself")]
    SelfReference { anchor: AnchorId },

    /// An anchor was made relative to an anchor of the other orientation
    #[error("anchor {anchor} cannot be relative to {related}: orientations differ")]
    OrientationMismatch { anchor: AnchorId, related: AnchorId },

    /// The relation chain loops back onto itself
    #[error("cyclic anchor relation: {}", format_chain(.chain))]
    Cycle { chain: Vec<AnchorId> },

    /// A constraint leaves an axis without any anchor
    #[error("malformed constraint for child {child} on the {axis} axis: {reason}")]
    MalformedConstraint {
        child: usize,
        axis: Axis,
        reason: String,
    },

    /// A constraint slot holds an anchor of the wrong orientation
    #[error("anchor {anchor} cannot be used as the {slot} edge")]
    WrongOrientation { slot: Slot, anchor: AnchorId },

    /// A handle that does not belong to this layout
    #[error("unknown anchor {anchor}")]
    UnknownAnchor { anchor: AnchorId },

    /// A child index outside the container
    #[error("child index {index} out of range (container has {len} children)")]
    ChildIndexOutOfRange { index: usize, len: usize },

    /// A resolved position does not fit in a pixel coordinate
    #[error("position of anchor {anchor} overflows the coordinate range")]
    Overflow { anchor: AnchorId },

    /// A generated row or column index beyond what a form layout supports
    #[error("lane index {index} out of range ({})", lane_range(.limit))]
    LaneOutOfRange { index: i32, limit: i32 },

    /// Geometry was read after a mutation without a new layout pass
    #[error("layout is stale; call lay_out() after mutating the container")]
    Stale,
}

impl LayoutError {
    /// Create a cycle error from the anchors on the loop
    pub fn cycle(chain: Vec<AnchorId>) -> Self {
        Self::Cycle { chain }
    }

    /// Create a malformed constraint error
    pub fn malformed(child: usize, axis: Axis, reason: impl Into<String>) -> Self {
        Self::MalformedConstraint {
            child,
            axis,
            reason: reason.into(),
        }
    }

    /// The anchors this error is about, if any
    pub fn anchors(&self) -> Vec<AnchorId> {
        match self {
            Self::SelfReference { anchor }
            | Self::WrongOrientation { anchor, .. }
            | Self::UnknownAnchor { anchor }
            | Self::Overflow { anchor } => vec![*anchor],
            Self::OrientationMismatch { anchor, related } => vec![*anchor, *related],
            Self::Cycle { chain } => chain.clone(),
            Self::MalformedConstraint { .. }
            | Self::ChildIndexOutOfRange { .. }
            | Self::LaneOutOfRange { .. }
            | Self::Stale => Vec::new(),
        }
    }
}

fn lane_range(limit: &i32) -> String {
    format!("{} to {}", -limit, limit - 1)
}

fn format_chain(chain: &[AnchorId]) -> String {
    chain
        .iter()
        .map(|a| a.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_display() {
        let a = AnchorId::from_index(0);
        let b = AnchorId::from_index(1);
        let err = LayoutError::cycle(vec![a, b, a]);
        assert_eq!(err.to_string(), "cyclic anchor relation: #0 -> #1 -> #0");
    }

    #[test]
    fn test_malformed_display() {
        let err = LayoutError::malformed(2, Axis::Vertical, "neither top nor bottom is set");
        assert!(err.to_string().contains("child 2"));
        assert!(err.to_string().contains("vertical"));
    }

    #[test]
    fn test_anchors_of_error() {
        let a = AnchorId::from_index(4);
        assert_eq!(LayoutError::SelfReference { anchor: a }.anchors(), vec![a]);
        assert!(LayoutError::Stale.anchors().is_empty());
    }

    #[test]
    fn test_lane_range_display() {
        let err = LayoutError::LaneOutOfRange { index: 5000, limit: 1000 };
        assert_eq!(err.to_string(), "lane index 5000 out of range (-1000 to 999)");
    }
}
