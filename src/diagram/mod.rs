//! Interactive anchor diagram
//!
//! The diagram draws every anchor of a laid out container as a thin strip,
//! colored by category, and tracks which anchor the pointer is over.

pub mod config;
pub mod hit;
pub mod info;
pub mod marker;
pub mod naming;

pub use config::DiagramConfig;
pub use hit::{hit_test, hits};
pub use info::AnchorInfo;
pub use marker::{build_markers, AnchorCategory, Marker, Visibility};
pub use naming::anchor_name;

use std::fmt;

use crate::layout::{AnchorId, Container, LayoutError, Point};
use crate::stylesheet::Stylesheet;

type HighlightCallback = Box<dyn FnMut(Option<AnchorId>)>;

/// A marker as it should be painted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerView {
    pub marker: Marker,
    pub color: String,
    pub highlighted: bool,
}

/// Markers, highlight and error state of one diagram
pub struct Diagram {
    config: DiagramConfig,
    visibility: Visibility,
    markers: Vec<Marker>,
    highlighted: Option<AnchorId>,
    error: Option<String>,
    on_highlight_changed: Option<HighlightCallback>,
}

impl fmt::Debug for Diagram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagram")
            .field("config", &self.config)
            .field("visibility", &self.visibility)
            .field("markers", &self.markers.len())
            .field("highlighted", &self.highlighted)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl Default for Diagram {
    fn default() -> Self {
        Self::new(DiagramConfig::default())
    }
}

impl Diagram {
    pub fn new(config: DiagramConfig) -> Self {
        Self {
            config,
            visibility: Visibility::default(),
            markers: Vec::new(),
            highlighted: None,
            error: None,
            on_highlight_changed: None,
        }
    }

    pub fn config(&self) -> &DiagramConfig {
        &self.config
    }

    /// Register the callback for highlight changes, replacing any previous one
    pub fn on_highlight_changed(&mut self, callback: impl FnMut(Option<AnchorId>) + 'static) {
        self.on_highlight_changed = Some(Box::new(callback));
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Show or hide a category; takes effect on the next [`rebuild`](Self::rebuild)
    pub fn set_visible(&mut self, category: AnchorCategory, visible: bool) {
        self.visibility.set(category, visible);
    }

    pub fn is_visible(&self, category: AnchorCategory) -> bool {
        self.visibility.is_visible(category)
    }

    /// Rebuild the markers from a laid out container.
    ///
    /// A highlighted anchor that no longer has a marker is cleared. If the
    /// container cannot provide geometry the diagram is hidden with the
    /// error message.
    pub fn rebuild(&mut self, container: &Container) -> Result<(), LayoutError> {
        match build_markers(container, &self.visibility, &self.config) {
            Ok(markers) => {
                self.markers = markers;
                self.error = None;
                let kept = self
                    .highlighted
                    .filter(|anchor| self.markers.iter().any(|m| m.anchor == *anchor));
                self.set_highlighted(kept);
                Ok(())
            }
            Err(err) => {
                self.hide_with_error(err.to_string());
                Err(err)
            }
        }
    }

    /// Drop all markers and show `message` instead
    pub fn hide_with_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(%message, "diagram hidden");
        self.markers.clear();
        self.error = Some(message);
        self.set_highlighted(None);
    }

    /// The diagram shows markers rather than an error
    pub fn is_shown(&self) -> bool {
        self.error.is_none()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn highlighted(&self) -> Option<AnchorId> {
        self.highlighted
    }

    /// Highlight the first marker under the pointer, or nothing
    pub fn pointer_moved(&mut self, point: Point) -> Option<AnchorId> {
        let hit = hit_test(&self.markers, point, self.config.snap_range).map(|m| m.anchor);
        self.set_highlighted(hit);
        hit
    }

    pub fn pointer_exited(&mut self) {
        self.set_highlighted(None);
    }

    fn set_highlighted(&mut self, anchor: Option<AnchorId>) {
        if self.highlighted == anchor {
            return;
        }
        tracing::trace!(?anchor, "highlight changed");
        self.highlighted = anchor;
        if let Some(callback) = self.on_highlight_changed.as_mut() {
            callback(anchor);
        }
    }

    /// Markers with their paint color, the highlighted one in the
    /// highlight color
    pub fn render_model(&self, stylesheet: &Stylesheet) -> Vec<MarkerView> {
        self.markers
            .iter()
            .map(|marker| {
                let highlighted = self.highlighted == Some(marker.anchor);
                let color = if highlighted {
                    stylesheet.highlight_color()
                } else {
                    stylesheet.category_color(marker.category)
                };
                MarkerView {
                    marker: *marker,
                    color,
                    highlighted,
                }
            })
            .collect()
    }
}
