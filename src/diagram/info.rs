//! Text shown for the highlighted anchor

use std::fmt;

use crate::layout::{AnchorId, Container, Orientation};

use super::naming::anchor_name;

const NONE: &str = "---";

/// The four lines of the anchor information panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorInfo {
    pub name: String,
    pub orientation: String,
    pub auto_resize: String,
    pub position: String,
}

impl Default for AnchorInfo {
    fn default() -> Self {
        Self {
            name: NONE.to_string(),
            orientation: NONE.to_string(),
            auto_resize: format!("AutoResize: {NONE}"),
            position: format!("Position: {NONE}"),
        }
    }
}

impl AnchorInfo {
    /// Describe `anchor`, or produce the placeholder lines for `None`.
    /// The position is only shown while the container's layout is current.
    pub fn describe(container: &Container, anchor: Option<AnchorId>) -> Self {
        let Some(anchor) = anchor else {
            return Self::default();
        };
        let layout = container.layout();
        let graph = layout.graph();
        let Some(node) = graph.get(anchor) else {
            return Self::default();
        };

        let orientation = match node.orientation() {
            Orientation::Horizontal => "Horizontal",
            Orientation::Vertical => "Vertical",
        };
        let position = container
            .anchor_position(anchor)
            .map(|p| p.to_string())
            .unwrap_or_else(|| NONE.to_string());
        Self {
            name: anchor_name(layout, anchor),
            orientation: orientation.to_string(),
            auto_resize: format!("AutoResize: {}", node.is_auto_size()),
            position: format!("Position: {position}"),
        }
    }

    pub fn lines(&self) -> [&str; 4] {
        [
            self.name.as_str(),
            self.orientation.as_str(),
            self.auto_resize.as_str(),
            self.position.as_str(),
        ]
    }
}

impl fmt::Display for AnchorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "{}", self.orientation)?;
        writeln!(f, "{}", self.auto_resize)?;
        write!(f, "{}", self.position)
    }
}
