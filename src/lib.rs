//! formlayout-viz - anchor based form layout with an interactive anchor diagram
//!
//! This library provides an anchor layout engine, a diagram that shows every
//! anchor of a laid out container, a small script language to build layouts
//! and an SVG renderer for the result.
//!
//! # Example
//!
//! ```rust
//! use formlayout_viz::render;
//!
//! let svg = render(r#"stub "OK" at cell(0, 0)"#).unwrap();
//! assert!(svg.contains("<svg"));
//! ```

pub mod diagram;
pub mod error;
pub mod layout;
pub mod renderer;
pub mod script;
pub mod stylesheet;
pub mod visualizer;

pub use diagram::{AnchorCategory, AnchorInfo, Diagram, DiagramConfig};
pub use error::{ParseError, ScriptError};
pub use layout::{Container, FormLayout, LayoutConfig, LayoutError};
pub use renderer::{render_svg, render_svg_with_stylesheet, SvgConfig};
pub use script::{parse, run_script, Script};
pub use visualizer::Visualizer;

use thiserror::Error;

use layout::{Point, Size};

// Re-export Stylesheet for public API
pub use stylesheet::Stylesheet;

/// Errors that can occur during the render pipeline
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    /// Error while parsing or running the script
    #[error(transparent)]
    Script(#[from] ScriptError),

    /// Error during layout
    #[error("{0}")]
    Layout(#[from] LayoutError),
}

impl RenderError {
    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        match self {
            RenderError::Script(err) => err.format(source, filename),
            RenderError::Layout(err) => format!("Error: {}", err),
        }
    }
}

/// Configuration for the complete render pipeline
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Layout configuration
    pub layout: LayoutConfig,
    /// Marker snapping and thickness
    pub diagram: DiagramConfig,
    /// SVG output configuration
    pub svg: SvgConfig,
    /// Stylesheet for color resolution
    pub stylesheet: Stylesheet,
    /// Container size
    pub size: Size,
    /// Marker categories left out of the diagram
    pub hidden: Vec<AnchorCategory>,
    /// Pointer position used to highlight an anchor
    pub pointer: Option<Point>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            diagram: DiagramConfig::default(),
            svg: SvgConfig::default(),
            stylesheet: Stylesheet::default(),
            size: visualizer::DEFAULT_SIZE,
            hidden: Vec::new(),
            pointer: None,
        }
    }
}

impl RenderConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the layout configuration
    pub fn with_layout(mut self, config: LayoutConfig) -> Self {
        self.layout = config;
        self
    }

    /// Set the diagram configuration
    pub fn with_diagram(mut self, config: DiagramConfig) -> Self {
        self.diagram = config;
        self
    }

    /// Set the SVG configuration
    pub fn with_svg(mut self, config: SvgConfig) -> Self {
        self.svg = config;
        self
    }

    /// Set the stylesheet for color resolution
    pub fn with_stylesheet(mut self, stylesheet: Stylesheet) -> Self {
        self.stylesheet = stylesheet;
        self
    }

    /// Set the container size
    pub fn with_size(mut self, width: i32, height: i32) -> Self {
        self.size = Size::new(width, height);
        self
    }

    /// Leave a marker category out of the diagram
    pub fn hide(mut self, category: AnchorCategory) -> Self {
        self.hidden.push(category);
        self
    }

    /// Highlight the anchor under `point`
    pub fn with_pointer(mut self, point: Point) -> Self {
        self.pointer = Some(point);
        self
    }

    /// Build a visualizer session from this configuration
    pub fn visualizer(self) -> Visualizer {
        let mut visualizer = Visualizer::new(self.layout, self.diagram)
            .with_stylesheet(self.stylesheet)
            .with_svg_config(self.svg)
            .with_size(self.size);
        for category in self.hidden {
            visualizer.diagram_mut().set_visible(category, false);
        }
        visualizer
    }
}

/// Render script source to SVG with default configuration
///
/// This is the main entry point for the library. It runs the script, lays
/// out the container and draws the anchor diagram over it.
///
/// # Example
///
/// ```rust
/// use formlayout_viz::render;
///
/// let svg = render(r#"
///     stub "Name" (60, 20) at cell(0, 0)
///     stub "Field" at cells(1, 0, -1, 0)
/// "#).unwrap();
///
/// assert!(svg.contains("<svg"));
/// assert!(svg.contains("Name"));
/// assert!(svg.contains("Field"));
/// ```
pub fn render(source: &str) -> Result<String, RenderError> {
    render_with_config(source, RenderConfig::default())
}

/// Render script source to SVG with custom configuration
///
/// # Example
///
/// ```rust
/// use formlayout_viz::{render_with_config, AnchorCategory, RenderConfig};
///
/// let config = RenderConfig::new()
///     .with_size(300, 120)
///     .hide(AnchorCategory::Border);
///
/// let svg = render_with_config("stub at cell(0, 0)", config).unwrap();
/// assert!(!svg.contains("flv-border"));
/// ```
pub fn render_with_config(source: &str, config: RenderConfig) -> Result<String, RenderError> {
    let pointer = config.pointer;
    let mut visualizer = config.visualizer();
    visualizer.update(source)?;
    if let Some(point) = pointer {
        visualizer.pointer_moved(point);
    }
    Ok(visualizer.render_svg())
}
