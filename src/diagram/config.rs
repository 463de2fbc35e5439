//! Configuration for the anchor diagram

/// Geometry options of the anchor markers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagramConfig {
    /// Distance in pixels within which the pointer still hits a marker
    pub snap_range: i32,

    /// Thickness of a marker strip
    pub marker_thickness: i32,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            snap_range: 3,
            marker_thickness: 1,
        }
    }
}

impl DiagramConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snap_range(mut self, snap_range: i32) -> Self {
        self.snap_range = snap_range;
        self
    }

    pub fn with_marker_thickness(mut self, thickness: i32) -> Self {
        self.marker_thickness = thickness.max(1);
        self
    }
}
