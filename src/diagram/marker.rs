//! Marker construction
//!
//! Every visible anchor becomes a thin strip across the container: a
//! vertical strip at the x-coordinate of a horizontal anchor, a horizontal
//! strip at the y-coordinate of a vertical one. Border and margin strips
//! run along the whole container, all other strips from margin to margin.

use std::fmt;
use std::str::FromStr;

use crate::layout::{AnchorId, Container, FormLayout, LayoutError, Orientation, Rect};

use super::config::DiagramConfig;

/// How an anchor is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnchorCategory {
    Border,
    Margin,
    AutoSize,
    Fixed,
}

impl AnchorCategory {
    pub const ALL: [AnchorCategory; 4] = [Self::Border, Self::Margin, Self::AutoSize, Self::Fixed];

    /// Category of an anchor of `layout`
    pub fn of(layout: &FormLayout, anchor: AnchorId) -> Self {
        if layout.is_border(anchor) {
            Self::Border
        } else if layout.is_margin(anchor) {
            Self::Margin
        } else if layout.graph().is_auto_size(anchor) {
            Self::AutoSize
        } else {
            Self::Fixed
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Border => "border",
            Self::Margin => "margin",
            Self::AutoSize => "autosize",
            Self::Fixed => "fixed",
        }
    }
}

impl fmt::Display for AnchorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnchorCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "border" => Ok(Self::Border),
            "margin" => Ok(Self::Margin),
            "autosize" | "auto-size" | "auto" => Ok(Self::AutoSize),
            "fixed" => Ok(Self::Fixed),
            other => Err(format!(
                "unknown anchor category '{other}' (expected border, margin, autosize or fixed)"
            )),
        }
    }
}

/// Which anchor categories are drawn; all of them by default
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visibility {
    pub border: bool,
    pub margin: bool,
    pub auto_size: bool,
    pub fixed: bool,
}

impl Default for Visibility {
    fn default() -> Self {
        Self {
            border: true,
            margin: true,
            auto_size: true,
            fixed: true,
        }
    }
}

impl Visibility {
    pub fn is_visible(&self, category: AnchorCategory) -> bool {
        match category {
            AnchorCategory::Border => self.border,
            AnchorCategory::Margin => self.margin,
            AnchorCategory::AutoSize => self.auto_size,
            AnchorCategory::Fixed => self.fixed,
        }
    }

    pub fn set(&mut self, category: AnchorCategory, visible: bool) {
        match category {
            AnchorCategory::Border => self.border = visible,
            AnchorCategory::Margin => self.margin = visible,
            AnchorCategory::AutoSize => self.auto_size = visible,
            AnchorCategory::Fixed => self.fixed = visible,
        }
    }
}

/// The drawn strip of one anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    pub anchor: AnchorId,
    pub category: AnchorCategory,
    /// Orientation of the anchor, not of the strip
    pub orientation: Orientation,
    pub strip: Rect,
}

impl Marker {
    /// Start and length of the strip across its thin dimension
    pub fn thin_extent(&self) -> (i32, i32) {
        match self.orientation {
            Orientation::Horizontal => (self.strip.x, self.strip.width),
            Orientation::Vertical => (self.strip.y, self.strip.height),
        }
    }
}

/// Build the markers of every visible anchor of a laid out container.
///
/// Borders come first (bottom, left, right, top), then margins in the same
/// order, then the remaining horizontal and vertical anchors in the order
/// the children reference them. Fails with [`LayoutError::Stale`] if the
/// container changed since its last layout pass.
pub fn build_markers(
    container: &Container,
    visibility: &Visibility,
    config: &DiagramConfig,
) -> Result<Vec<Marker>, LayoutError> {
    container.bounds()?;
    let layout = container.layout();
    let builder = StripBuilder::new(container, config.marker_thickness)?;

    let mut anchors = vec![
        layout.bottom_anchor(),
        layout.left_anchor(),
        layout.right_anchor(),
        layout.top_anchor(),
        layout.bottom_margin_anchor(),
        layout.left_margin_anchor(),
        layout.right_margin_anchor(),
        layout.top_margin_anchor(),
    ];
    let constraints = container.effective_constraints();
    let inner = layout
        .horizontal_anchors(&constraints)
        .into_iter()
        .chain(layout.vertical_anchors(&constraints))
        .filter(|&a| !layout.is_border(a) && !layout.is_margin(a));
    anchors.extend(inner);

    let mut markers = Vec::with_capacity(anchors.len());
    for anchor in anchors {
        let category = AnchorCategory::of(layout, anchor);
        if !visibility.is_visible(category) {
            continue;
        }
        markers.push(builder.marker(anchor, category)?);
    }
    tracing::debug!(markers = markers.len(), "markers built");
    Ok(markers)
}

/// Resolved container lines the strips are spanned between
struct StripBuilder<'a> {
    container: &'a Container,
    thickness: i32,
    left: i32,
    right: i32,
    top: i32,
    bottom: i32,
    left_margin: i32,
    right_margin: i32,
    top_margin: i32,
    bottom_margin: i32,
}

impl<'a> StripBuilder<'a> {
    fn new(container: &'a Container, thickness: i32) -> Result<Self, LayoutError> {
        let layout = container.layout();
        let at = |anchor| position(container, anchor);
        Ok(Self {
            container,
            thickness,
            left: at(layout.left_anchor())?,
            right: at(layout.right_anchor())?,
            top: at(layout.top_anchor())?,
            bottom: at(layout.bottom_anchor())?,
            left_margin: at(layout.left_margin_anchor())?,
            right_margin: at(layout.right_margin_anchor())?,
            top_margin: at(layout.top_margin_anchor())?,
            bottom_margin: at(layout.bottom_margin_anchor())?,
        })
    }

    fn marker(&self, anchor: AnchorId, category: AnchorCategory) -> Result<Marker, LayoutError> {
        let layout = self.container.layout();
        let orientation = layout
            .graph()
            .orientation(anchor)
            .ok_or(LayoutError::UnknownAnchor { anchor })?;
        let mut start = position(self.container, anchor)?;
        if layout.is_far_edge(anchor) {
            start = start.saturating_sub(self.thickness);
        }

        let full = matches!(category, AnchorCategory::Border | AnchorCategory::Margin);
        let strip = match orientation {
            Orientation::Horizontal => {
                let (top, bottom) = if full {
                    (self.top, self.bottom)
                } else {
                    (self.top_margin, self.bottom_margin)
                };
                Rect::from_edges(start, top, start.saturating_add(self.thickness), bottom)
            }
            Orientation::Vertical => {
                let (left, right) = if full {
                    (self.left, self.right)
                } else {
                    (self.left_margin, self.right_margin)
                };
                Rect::from_edges(left, start, right, start.saturating_add(self.thickness))
            }
        };
        Ok(Marker {
            anchor,
            category,
            orientation,
            strip,
        })
    }
}

fn position(container: &Container, anchor: AnchorId) -> Result<i32, LayoutError> {
    container
        .anchor_position(anchor)
        .ok_or(LayoutError::UnknownAnchor { anchor })
}
