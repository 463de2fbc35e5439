//! SVG generation from a container and its anchor diagram

use crate::diagram::{anchor_name, Diagram, MarkerView};
use crate::layout::{Container, Rect, Size};
use crate::stylesheet::Stylesheet;

use super::SvgConfig;

/// Horizontal alignment of a text element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl TextAnchor {
    fn as_str(self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }
}

/// Build SVG elements incrementally
pub struct SvgBuilder {
    config: SvgConfig,
    styles: Vec<(usize, String)>,
    elements: Vec<String>,
    indent: usize,
}

impl SvgBuilder {
    /// Create a new SVG builder
    pub fn new(config: SvgConfig) -> Self {
        Self {
            config,
            styles: vec![],
            elements: vec![],
            indent: 1,
        }
    }

    /// Add CSS custom properties from a stylesheet
    pub fn add_stylesheet(&mut self, stylesheet: &Stylesheet) {
        let mut tokens: Vec<_> = stylesheet.colors.iter().collect();
        tokens.sort();
        self.styles.push((2, ":root {".to_string()));
        for (token, value) in tokens {
            self.styles.push((3, format!("--{}: {};", token, value)));
        }
        self.styles.push((2, "}".to_string()));
    }

    pub fn prefix(&self) -> String {
        self.config.class_prefix.clone()
    }

    fn indent_at(&self, level: usize) -> String {
        self.config
            .indent
            .map(|width| " ".repeat(width * level))
            .unwrap_or_default()
    }

    fn indent_str(&self) -> String {
        self.indent_at(self.indent)
    }

    fn newline(&self) -> &str {
        if self.config.indent.is_some() {
            "\n"
        } else {
            ""
        }
    }

    /// Add a rectangle element; `attributes` is appended verbatim
    pub fn add_rect(&mut self, rect: Rect, classes: &[String], attributes: &str) {
        let class_list = classes.join(" ");
        self.elements.push(format!(
            r#"{}<rect class="{}" x="{}" y="{}" width="{}" height="{}"{}/>"#,
            self.indent_str(),
            class_list,
            rect.x,
            rect.y,
            rect.width,
            rect.height,
            attributes
        ));
    }

    /// Add a text element, vertically centered on `y`
    pub fn add_text(&mut self, text: &str, x: i32, y: i32, anchor: TextAnchor, classes: &[String], attributes: &str) {
        let class_list = classes.join(" ");
        self.elements.push(format!(
            r#"{}<text class="{}" x="{}" y="{}" text-anchor="{}" dominant-baseline="middle"{}>{}</text>"#,
            self.indent_str(),
            class_list,
            x,
            y,
            anchor.as_str(),
            attributes,
            escape_xml(text)
        ));
    }

    /// Add a group element with optional ID and classes
    pub fn start_group(&mut self, id: Option<&str>, classes: &[String]) {
        let id_attr = id.map(|i| format!(r#" id="{}""#, i)).unwrap_or_default();
        let class_attr = if classes.is_empty() {
            String::new()
        } else {
            format!(r#" class="{}""#, classes.join(" "))
        };

        self.elements
            .push(format!("{}<g{}{}>", self.indent_str(), id_attr, class_attr));
        self.indent += 1;
    }

    /// Close a group element
    pub fn end_group(&mut self) {
        self.indent = self.indent.saturating_sub(1);
        self.elements.push(format!("{}</g>", self.indent_str()));
    }

    /// Build the final SVG string for a canvas of the given size
    pub fn build(self, width: i32, height: i32) -> String {
        let nl = self.newline();

        let mut svg = String::new();

        if self.config.standalone {
            svg.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
            svg.push_str(nl);
        }

        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = width,
            h = height
        ));
        svg.push_str(nl);

        if !self.styles.is_empty() {
            svg.push_str(&self.indent_at(1));
            svg.push_str("<style>");
            svg.push_str(nl);
            for (level, style) in &self.styles {
                svg.push_str(&self.indent_at(*level));
                svg.push_str(style);
                svg.push_str(nl);
            }
            svg.push_str(&self.indent_at(1));
            svg.push_str("</style>");
            svg.push_str(nl);
        }

        for elem in &self.elements {
            svg.push_str(elem);
            svg.push_str(nl);
        }

        svg.push_str("</svg>");

        svg
    }
}

/// Render a container and its diagram to an SVG string (with default stylesheet)
pub fn render_svg(container: &Container, diagram: &Diagram, config: &SvgConfig) -> String {
    render_svg_with_stylesheet(container, diagram, config, &Stylesheet::default())
}

/// Render a container and its diagram to an SVG string with a custom stylesheet.
///
/// Children are drawn at the geometry of the last successful layout pass.
/// If the diagram carries an error, the error text replaces children and
/// markers.
pub fn render_svg_with_stylesheet(
    container: &Container,
    diagram: &Diagram,
    config: &SvgConfig,
    stylesheet: &Stylesheet,
) -> String {
    render_canvas(container, diagram, config, stylesheet, container.size())
}

/// Render on a canvas of `size`, which may differ from the container's
/// last laid out size when the container could not be laid out
pub(crate) fn render_canvas(
    container: &Container,
    diagram: &Diagram,
    config: &SvgConfig,
    stylesheet: &Stylesheet,
    size: Size,
) -> String {
    let mut builder = SvgBuilder::new(config.clone());
    let prefix = builder.prefix();
    builder.add_stylesheet(stylesheet);

    let background = if config.alternate_background {
        stylesheet.resolve_or_default("background-alt")
    } else {
        stylesheet.resolve_or_default("background")
    };
    builder.add_rect(
        Rect::new(0, 0, size.width, size.height),
        &[format!("{prefix}background")],
        &format!(r#" fill="{}""#, background),
    );

    if let Some(message) = diagram.error() {
        render_error(message, size.width, &mut builder, stylesheet);
        return builder.build(size.width, size.height);
    }

    if config.show_children {
        render_children(container, &mut builder, stylesheet);
    }

    let views = diagram.render_model(stylesheet);
    builder.start_group(None, &[format!("{prefix}markers")]);
    for view in &views {
        render_marker(container, view, &mut builder);
    }
    builder.end_group();

    tracing::debug!(markers = views.len(), "diagram rendered");
    builder.build(size.width, size.height)
}

fn render_children(container: &Container, builder: &mut SvgBuilder, stylesheet: &Stylesheet) {
    let prefix = builder.prefix();
    let bounds = container
        .bounds()
        .unwrap_or_else(|_| container.last_valid_bounds());
    let base = stylesheet.resolve_or_default("stub-base");
    let text = stylesheet.resolve_or_default("stub-text");

    builder.start_group(None, &[format!("{prefix}children")]);
    for (component, rect) in container.components().zip(bounds) {
        let fill = component.fill.as_deref().unwrap_or(&base);
        builder.add_rect(
            *rect,
            &[format!("{prefix}stub")],
            &format!(r#" fill="{}""#, fill),
        );
        if builder.config.show_labels {
            builder.add_text(
                &component.label,
                rect.x.saturating_add(rect.width / 2),
                rect.y.saturating_add(rect.height / 2),
                TextAnchor::Middle,
                &[format!("{prefix}label")],
                &format!(r#" fill="{}""#, text),
            );
        }
    }
    builder.end_group();
}

fn render_marker(container: &Container, view: &MarkerView, builder: &mut SvgBuilder) {
    let prefix = builder.prefix();
    let marker = &view.marker;
    let mut classes = vec![
        format!("{prefix}marker"),
        format!("{prefix}{}", marker.category),
    ];
    if view.highlighted {
        classes.push(format!("{prefix}highlighted"));
    }
    let name = anchor_name(container.layout(), marker.anchor);
    builder.add_rect(
        marker.strip,
        &classes,
        &format!(
            r#" fill="{}" data-anchor="{}" data-name="{}""#,
            view.color,
            marker.anchor.index(),
            escape_xml(&name)
        ),
    );
}

fn render_error(message: &str, width: i32, builder: &mut SvgBuilder, stylesheet: &Stylesheet) {
    let prefix = builder.prefix();
    let color = stylesheet.resolve_or_default("error");
    for (line_no, line) in message.lines().enumerate() {
        builder.add_text(
            line,
            width / 2,
            20 + 16 * line_no as i32,
            TextAnchor::Middle,
            &[format!("{prefix}error")],
            &format!(r#" fill="{}""#, color),
        );
    }
}

/// Escape special XML characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
