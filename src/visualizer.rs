//! Edit-and-rerender session
//!
//! A [`Visualizer`] owns the container built from the current script and the
//! diagram drawn over it. Every [`update`](Visualizer::update) starts from a
//! fresh layout, so a script always describes the whole layout.

use crate::diagram::{AnchorCategory, AnchorInfo, Diagram, DiagramConfig};
use crate::error::ScriptError;
use crate::layout::{AnchorId, Container, FormLayout, LayoutConfig, Point, Size};
use crate::renderer::svg::render_canvas;
use crate::renderer::SvgConfig;
use crate::script::{self, Interpreter};
use crate::stylesheet::{StubShades, Stylesheet};
use crate::RenderError;

/// Default canvas size of a new session
pub const DEFAULT_SIZE: Size = Size {
    width: 400,
    height: 300,
};

#[derive(Debug)]
pub struct Visualizer {
    layout_config: LayoutConfig,
    svg_config: SvgConfig,
    stylesheet: Stylesheet,
    shades: StubShades,
    size: Size,
    container: Container,
    diagram: Diagram,
    /// The script failed; the container holds whatever it built before
    script_failed: bool,
    last_error: Option<RenderError>,
}

impl Default for Visualizer {
    fn default() -> Self {
        Self::new(LayoutConfig::default(), DiagramConfig::default())
    }
}

impl Visualizer {
    pub fn new(layout_config: LayoutConfig, diagram_config: DiagramConfig) -> Self {
        let stylesheet = Stylesheet::default();
        Self {
            container: Container::new(FormLayout::new(&layout_config)),
            layout_config,
            svg_config: SvgConfig::default(),
            shades: stylesheet.stub_shades(),
            stylesheet,
            size: DEFAULT_SIZE,
            diagram: Diagram::new(diagram_config),
            script_failed: false,
            last_error: None,
        }
    }

    /// Use `stylesheet` for category and stub colors from the next update on
    pub fn with_stylesheet(mut self, stylesheet: Stylesheet) -> Self {
        self.shades = stylesheet.stub_shades();
        self.stylesheet = stylesheet;
        self
    }

    pub fn with_svg_config(mut self, config: SvgConfig) -> Self {
        self.svg_config = config;
        self
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    /// Mutable diagram access, e.g. to register a highlight callback
    pub fn diagram_mut(&mut self) -> &mut Diagram {
        &mut self.diagram
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// The error of the last update or resize, if it failed
    pub fn last_error(&self) -> Option<&RenderError> {
        self.last_error.as_ref()
    }

    /// Run `source` against a fresh layout, lay it out and rebuild the
    /// diagram. On failure the diagram is hidden and shows the error.
    pub fn update(&mut self, source: &str) -> Result<(), RenderError> {
        self.container = Container::new(FormLayout::new(&self.layout_config));
        self.shades.reset();
        self.script_failed = false;

        if let Err(err) = self.run(source) {
            self.script_failed = true;
            return Err(self.fail(err));
        }
        self.refresh()
    }

    fn run(&mut self, source: &str) -> Result<(), RenderError> {
        let parsed = script::parse(source).map_err(ScriptError::from)?;
        Interpreter::new(&mut self.container, &self.layout_config)
            .with_shades(&mut self.shades)
            .run(&parsed)?;
        Ok(())
    }

    /// Lay out at a new size and rebuild the diagram
    pub fn resize(&mut self, width: i32, height: i32) -> Result<(), RenderError> {
        self.size = Size::new(width, height);
        if self.script_failed {
            return Ok(());
        }
        self.refresh()
    }

    /// Show or hide a marker category and rebuild the diagram
    pub fn set_visible(&mut self, category: AnchorCategory, visible: bool) -> Result<(), RenderError> {
        self.diagram.set_visible(category, visible);
        if self.last_error.is_some() {
            return Ok(());
        }
        self.diagram
            .rebuild(&self.container)
            .map_err(|err| self.fail(err.into()))
    }

    fn refresh(&mut self) -> Result<(), RenderError> {
        if let Err(err) = self.container.lay_out(self.size.width, self.size.height) {
            return Err(self.fail(err.into()));
        }
        if let Err(err) = self.diagram.rebuild(&self.container) {
            return Err(self.fail(err.into()));
        }
        self.last_error = None;
        Ok(())
    }

    fn fail(&mut self, err: RenderError) -> RenderError {
        tracing::debug!(%err, "visualizer update failed");
        self.diagram.hide_with_error(err.to_string());
        self.last_error = Some(err.clone());
        err
    }

    pub fn pointer_moved(&mut self, point: Point) -> Option<AnchorId> {
        self.diagram.pointer_moved(point)
    }

    pub fn pointer_exited(&mut self) {
        self.diagram.pointer_exited();
    }

    /// Information panel lines for the highlighted anchor
    pub fn info(&self) -> AnchorInfo {
        AnchorInfo::describe(&self.container, self.diagram.highlighted())
    }

    /// Render at the session size, also when the script left nothing to lay out
    pub fn render_svg(&self) -> String {
        render_canvas(
            &self.container,
            &self.diagram,
            &self.svg_config,
            &self.stylesheet,
            self.size,
        )
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::layout::{LayoutError, Rect};

    const FORM: &str = r#"
        stub "Name" (60, 20) at cell(0, 0)
        stub "Field" (100, 20) at cells(1, 0, -1, 0)
    "#;

    #[test]
    fn test_update_lays_out_script() {
        let mut vis = Visualizer::default().with_size(Size::new(300, 100));
        vis.update(FORM).unwrap();

        let bounds = vis.container().bounds().unwrap();
        assert_eq!(bounds[0], Rect::new(10, 10, 60, 20));
        assert_eq!(bounds[1], Rect::new(75, 10, 215, 20));
        assert!(vis.diagram().is_shown());
        assert!(vis.last_error().is_none());
    }

    #[test]
    fn test_update_starts_from_fresh_layout() {
        let mut vis = Visualizer::default();
        vis.update(FORM).unwrap();
        vis.update("stub at cell(0, 0)").unwrap();
        assert_eq!(vis.container().len(), 1);
    }

    #[test]
    fn test_stub_colors_stable_across_updates() {
        let mut vis = Visualizer::default();
        vis.update(FORM).unwrap();
        let first: Vec<_> = vis.container().components().map(|c| c.fill.clone()).collect();
        vis.update(FORM).unwrap();
        let second: Vec<_> = vis.container().components().map(|c| c.fill.clone()).collect();
        assert_eq!(first, second);
        assert!(first.iter().all(Option::is_some));
    }

    #[test]
    fn test_script_error_hides_diagram() {
        let mut vis = Visualizer::default();
        vis.update(FORM).unwrap();
        let err = vis.update("relate nowhere to left").unwrap_err();
        assert!(matches!(err, RenderError::Script(_)));
        assert!(!vis.diagram().is_shown());
        assert_eq!(vis.diagram().error(), Some("unknown anchor 'nowhere'"));
        assert!(vis.render_svg().contains("unknown anchor"));

        // a later resize keeps showing the script error
        vis.resize(500, 500).unwrap();
        assert!(!vis.diagram().is_shown());
    }

    #[test]
    fn test_cycle_hides_diagram_and_recovers() {
        let mut vis = Visualizer::default();
        let err = vis
            .update(
                "let a = anchor(left, 5)\n\
                 let b = anchor(a, 5)\n\
                 relate a to b\n\
                 stub at (top, a, null, b)",
            )
            .unwrap_err();
        assert!(matches!(
            err,
            RenderError::Layout(LayoutError::Cycle { .. })
        ));
        assert!(vis.diagram().markers().is_empty());

        vis.update(FORM).unwrap();
        assert!(vis.diagram().is_shown());
        assert!(!vis.diagram().markers().is_empty());
    }

    #[test]
    fn test_pointer_drives_info_panel() {
        let mut vis = Visualizer::default().with_size(Size::new(300, 100));
        vis.update(FORM).unwrap();

        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        vis.diagram_mut()
            .on_highlight_changed(move |anchor| sink.borrow_mut().push(anchor));

        // right edge of column 0
        let hit = vis.pointer_moved(Point::new(71, 50));
        assert!(hit.is_some());
        assert_eq!(
            vis.info().lines(),
            ["r0", "Horizontal", "AutoResize: true", "Position: 70"]
        );

        vis.pointer_exited();
        assert_eq!(vis.info(), AnchorInfo::default());
        assert_eq!(events.borrow().len(), 2);
    }

    #[test]
    fn test_hiding_category_removes_markers() {
        let mut vis = Visualizer::default();
        vis.update(FORM).unwrap();
        let all = vis.diagram().markers().len();
        vis.set_visible(AnchorCategory::Border, false).unwrap();
        assert_eq!(vis.diagram().markers().len(), all - 4);
    }
}
