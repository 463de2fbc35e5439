//! Options for drawing a container and its anchor diagram

/// Options for the SVG document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgConfig {
    /// Emit the XML declaration
    pub standalone: bool,

    /// Spaces per nesting level, `None` writes everything on one line
    pub indent: Option<usize>,

    /// Prepended to every CSS class, e.g. "flv-" gives "flv-marker"
    pub class_prefix: String,

    /// Draw the children as stubs under the markers
    pub show_children: bool,

    /// Write each stub's label centered inside it
    pub show_labels: bool,

    /// Fill the canvas with the alternate background color
    pub alternate_background: bool,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            standalone: true,
            indent: Some(2),
            class_prefix: "flv-".to_string(),
            show_children: true,
            show_labels: true,
            alternate_background: false,
        }
    }
}

impl SvgConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single line output without the XML declaration, for embedding
    pub fn compact() -> Self {
        Self {
            standalone: false,
            indent: None,
            ..Self::default()
        }
    }

    pub fn with_standalone(mut self, standalone: bool) -> Self {
        self.standalone = standalone;
        self
    }

    pub fn with_indent(mut self, indent: Option<usize>) -> Self {
        self.indent = indent;
        self
    }

    /// Set the CSS class prefix; an empty prefix leaves classes bare
    pub fn with_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = prefix.into();
        self
    }

    pub fn with_show_children(mut self, show: bool) -> Self {
        self.show_children = show;
        self
    }

    pub fn with_show_labels(mut self, show: bool) -> Self {
        self.show_labels = show;
        self
    }

    pub fn with_alternate_background(mut self, alternate: bool) -> Self {
        self.alternate_background = alternate;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_draw_everything() {
        let config = SvgConfig::default();
        assert!(config.standalone);
        assert_eq!(config.indent, Some(2));
        assert_eq!(config.class_prefix, "flv-");
        assert!(config.show_children && config.show_labels);
        assert!(!config.alternate_background);
    }

    #[test]
    fn test_compact_keeps_drawing_options() {
        let config = SvgConfig::compact().with_show_labels(false);
        assert!(!config.standalone);
        assert_eq!(config.indent, None);
        assert!(config.show_children);
        assert!(!config.show_labels);
    }
}
