//! Configuration for the layout engine

use super::types::{Insets, Size};

/// Configuration options for a new form layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutConfig {
    /// Distance of the margin anchors from the border anchors
    pub margins: Insets,

    /// Spacing between adjacent generated columns
    pub horizontal_gap: i32,

    /// Spacing between adjacent generated rows
    pub vertical_gap: i32,

    /// Preferred size of a stub without an explicit size
    pub default_stub_size: Size,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            margins: Insets::uniform(10),
            horizontal_gap: 5,
            vertical_gap: 5,
            default_stub_size: Size::new(60, 20),
        }
    }
}

impl LayoutConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the margins
    pub fn with_margins(mut self, margins: Insets) -> Self {
        self.margins = margins;
        self
    }

    /// Set both gaps
    pub fn with_gaps(mut self, horizontal: i32, vertical: i32) -> Self {
        self.horizontal_gap = horizontal;
        self.vertical_gap = vertical;
        self
    }

    /// Set the size used for stubs without an explicit size
    pub fn with_default_stub_size(mut self, size: Size) -> Self {
        self.default_stub_size = size;
        self
    }
}
