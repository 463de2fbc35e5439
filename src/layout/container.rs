//! Layout container: children, their constraints and the layout pass

use super::anchor::AnchorId;
use super::constraints::{Axis, Constraints};
use super::error::LayoutError;
use super::form::FormLayout;
use super::solver::{Demand, Solver};
use super::types::{Rect, Size};

/// A placeholder child with a label and a preferred size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    pub label: String,
    pub preferred_size: Size,
    /// Explicit fill color; renderers pick one when absent
    pub fill: Option<String>,
}

impl Component {
    pub fn new(label: impl Into<String>, preferred_size: Size) -> Self {
        Self {
            label: label.into(),
            preferred_size,
            fill: None,
        }
    }

    /// A component labelled "stub"
    pub fn stub(preferred_size: Size) -> Self {
        Self::new("stub", preferred_size)
    }

    pub fn with_fill(mut self, fill: impl Into<String>) -> Self {
        self.fill = Some(fill.into());
        self
    }
}

#[derive(Debug, Clone)]
struct Child {
    component: Component,
    /// Constraints as given by the caller
    constraints: Constraints,
    /// Constraints with implicit anchors filled in for missing sides
    effective: Constraints,
}

impl Child {
    /// Anchors the container created for the sides the caller left open
    fn implicit_anchors(&self) -> impl Iterator<Item = AnchorId> + '_ {
        let given = self.constraints;
        self.effective
            .anchors()
            .filter(move |(slot, _)| given.get(*slot).is_none())
            .map(|(_, anchor)| anchor)
    }
}

/// Owns the children of one panel and lays them out with its form layout
#[derive(Debug, Clone)]
pub struct Container {
    layout: FormLayout,
    children: Vec<Child>,
    /// Implicit anchors of removed children, reused for later ones
    spare_anchors: Vec<AnchorId>,
    bounds: Vec<Rect>,
    size: Size,
    dirty: bool,
}

impl Default for Container {
    fn default() -> Self {
        Self::new(FormLayout::default())
    }
}

impl Container {
    pub fn new(layout: FormLayout) -> Self {
        Self {
            layout,
            children: Vec::new(),
            spare_anchors: Vec::new(),
            bounds: Vec::new(),
            size: Size::default(),
            dirty: true,
        }
    }

    pub fn layout(&self) -> &FormLayout {
        &self.layout
    }

    /// Mutable access to the layout; the current geometry becomes stale
    pub fn layout_mut(&mut self) -> &mut FormLayout {
        self.dirty = true;
        &mut self.layout
    }

    /// Replace the layout, dropping every child
    pub fn set_layout(&mut self, layout: FormLayout) {
        self.layout = layout;
        self.children.clear();
        self.spare_anchors.clear();
        self.dirty = true;
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Append a child and return its index
    pub fn add(&mut self, component: Component, constraints: Constraints) -> Result<usize, LayoutError> {
        let index = self.children.len();
        self.insert(index, component, constraints)?;
        Ok(index)
    }

    /// Insert a child at `index`; an index past the end appends
    pub fn insert(
        &mut self,
        index: usize,
        component: Component,
        constraints: Constraints,
    ) -> Result<(), LayoutError> {
        let index = index.min(self.children.len());
        constraints.validate(self.layout.graph(), index)?;
        let effective = self.fill_missing_sides(constraints);

        tracing::debug!(index, label = %component.label, "child added");
        self.children.insert(
            index,
            Child {
                component,
                constraints,
                effective,
            },
        );
        self.touch();
        Ok(())
    }

    /// A missing side becomes an auto-size anchor growing away from the
    /// present side, so the child takes its preferred extent there.
    fn fill_missing_sides(&mut self, constraints: Constraints) -> Constraints {
        let mut effective = constraints;
        match (constraints.left, constraints.right) {
            (None, Some(right)) => effective.left = Some(self.implicit_anchor(right)),
            (Some(left), None) => effective.right = Some(self.implicit_anchor(left)),
            _ => {}
        }
        match (constraints.top, constraints.bottom) {
            (None, Some(bottom)) => effective.top = Some(self.implicit_anchor(bottom)),
            (Some(top), None) => effective.bottom = Some(self.implicit_anchor(top)),
            _ => {}
        }
        effective
    }

    /// An auto-size anchor following `present`, from the spares if one of
    /// the same orientation is left
    fn implicit_anchor(&mut self, present: AnchorId) -> AnchorId {
        let graph = self.layout.graph_mut();
        let orientation = graph.orientation(present);
        let spare = self
            .spare_anchors
            .iter()
            .position(|&a| a != present && graph.orientation(a) == orientation);
        match spare {
            Some(slot) => {
                let anchor = self.spare_anchors.swap_remove(slot);
                graph.relink(anchor, present, 0, true);
                anchor
            }
            None => graph.push_linked(present, 0, true),
        }
    }

    /// Mark the geometry stale and forget every resolved position
    fn touch(&mut self) {
        self.layout.graph_mut().invalidate();
        self.dirty = true;
    }

    /// Remove the child at `index`
    pub fn remove(&mut self, index: usize) -> Result<(Component, Constraints), LayoutError> {
        if index >= self.children.len() {
            return Err(LayoutError::ChildIndexOutOfRange {
                index,
                len: self.children.len(),
            });
        }
        let child = self.children.remove(index);
        self.spare_anchors.extend(child.implicit_anchors());
        self.touch();
        tracing::debug!(index, label = %child.component.label, "child removed");
        Ok((child.component, child.constraints))
    }

    pub fn remove_all(&mut self) {
        for child in self.children.drain(..) {
            self.spare_anchors.extend(child.implicit_anchors());
        }
        self.touch();
    }

    pub fn set_preferred_size(&mut self, index: usize, size: Size) -> Result<(), LayoutError> {
        let len = self.children.len();
        let child = self
            .children
            .get_mut(index)
            .ok_or(LayoutError::ChildIndexOutOfRange { index, len })?;
        child.component.preferred_size = size;
        self.touch();
        Ok(())
    }

    pub fn component(&self, index: usize) -> Option<&Component> {
        self.children.get(index).map(|c| &c.component)
    }

    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.children.iter().map(|c| &c.component)
    }

    /// Constraints as the caller attached them
    pub fn constraints(&self, index: usize) -> Option<Constraints> {
        self.children.get(index).map(|c| c.constraints)
    }

    /// Constraints with implicit anchors, in child order
    pub fn effective_constraints(&self) -> Vec<Constraints> {
        self.children.iter().map(|c| c.effective).collect()
    }

    /// Solve every anchor for the given container size and compute the
    /// child rectangles.
    ///
    /// On error the previous geometry stays available through
    /// [`last_valid_bounds`](Self::last_valid_bounds) and the container
    /// stays dirty.
    pub fn lay_out(&mut self, width: i32, height: i32) -> Result<&[Rect], LayoutError> {
        let size = Size::new(width, height);
        self.layout.set_extent(size)?;

        let mut demands = Vec::with_capacity(self.children.len() * 2);
        for (index, child) in self.children.iter().enumerate() {
            let preferred = child.component.preferred_size;
            for (axis, extent) in [
                (Axis::Horizontal, preferred.width),
                (Axis::Vertical, preferred.height),
            ] {
                if let (Some(leading), Some(trailing)) = child.effective.axis(axis) {
                    demands.push(Demand {
                        child: index,
                        axis,
                        leading,
                        trailing,
                        extent,
                    });
                }
            }
        }

        let solution = match Solver::solve(self.layout.graph(), &demands, self.roots()) {
            Ok(solution) => solution,
            Err(err) => {
                tracing::warn!(%err, "layout pass aborted");
                return Err(err);
            }
        };

        let mut bounds = Vec::with_capacity(self.children.len());
        for child in &self.children {
            let edge = |anchor: Option<AnchorId>| -> Result<i32, LayoutError> {
                anchor
                    .and_then(|a| solution.position(a))
                    .ok_or(LayoutError::Stale)
            };
            let c = child.effective;
            bounds.push(Rect::from_edges(
                edge(c.left)?,
                edge(c.top)?,
                edge(c.right)?,
                edge(c.bottom)?,
            ));
        }

        self.layout.graph_mut().commit(solution.positions());
        self.bounds = bounds;
        self.size = size;
        self.dirty = false;
        tracing::debug!(width, height, children = self.children.len(), "layout complete");
        Ok(&self.bounds)
    }

    /// Border and margin anchors plus every anchor a child references
    fn roots(&self) -> Vec<AnchorId> {
        let layout = &self.layout;
        let mut roots = vec![
            layout.top_anchor(),
            layout.left_anchor(),
            layout.bottom_anchor(),
            layout.right_anchor(),
            layout.top_margin_anchor(),
            layout.left_margin_anchor(),
            layout.bottom_margin_anchor(),
            layout.right_margin_anchor(),
        ];
        for child in &self.children {
            roots.extend(child.effective.anchors().map(|(_, anchor)| anchor));
        }
        roots
    }

    /// Child rectangles of the current layout pass
    pub fn bounds(&self) -> Result<&[Rect], LayoutError> {
        if self.dirty {
            return Err(LayoutError::Stale);
        }
        Ok(&self.bounds)
    }

    /// Child rectangles of the last successful pass, even if stale since
    pub fn last_valid_bounds(&self) -> &[Rect] {
        &self.bounds
    }

    /// Container size of the last successful pass
    pub fn size(&self) -> Size {
        self.size
    }

    /// Resolved position of an anchor, only while the layout is current
    pub fn anchor_position(&self, anchor: AnchorId) -> Option<i32> {
        if self.dirty {
            return None;
        }
        self.layout.graph().position(anchor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stub(width: i32, height: i32) -> Component {
        Component::stub(Size::new(width, height))
    }

    #[test]
    fn test_border_anchors_match_container_size() {
        let mut container = Container::default();
        container.lay_out(200, 100).unwrap();
        let layout = container.layout();
        assert_eq!(container.anchor_position(layout.right_anchor()), Some(200));
        assert_eq!(container.anchor_position(layout.bottom_anchor()), Some(100));
        assert_eq!(container.anchor_position(layout.left_anchor()), Some(0));
        assert_eq!(container.anchor_position(layout.right_margin_anchor()), Some(190));
    }

    #[test]
    fn test_cell_takes_preferred_size() {
        let mut container = Container::default();
        let constraints = container.layout_mut().cell(0, 0).unwrap();
        container.add(stub(80, 24), constraints).unwrap();
        let bounds = container.lay_out(300, 200).unwrap();
        assert_eq!(bounds, &[Rect::new(10, 10, 80, 24)]);
    }

    #[test]
    fn test_second_column_after_gap() {
        let mut container = Container::default();
        let first = container.layout_mut().cell(0, 0).unwrap();
        let second = container.layout_mut().cell(1, 0).unwrap();
        container.add(stub(80, 24), first).unwrap();
        container.add(stub(40, 30), second).unwrap();
        let bounds = container.lay_out(300, 200).unwrap().to_vec();
        assert_eq!(bounds[1], Rect::new(95, 10, 40, 30));
        // Row 0 is as tall as its tallest child
        assert_eq!(bounds[0], Rect::new(10, 10, 80, 30));
    }

    #[test]
    fn test_negative_column_hugs_right_margin() {
        let mut container = Container::default();
        let constraints = container.layout_mut().cell(-1, 0).unwrap();
        container.add(stub(50, 20), constraints).unwrap();
        let bounds = container.lay_out(300, 200).unwrap();
        assert_eq!(bounds, &[Rect::new(240, 10, 50, 20)]);
    }

    #[test]
    fn test_missing_side_uses_preferred_extent() {
        let mut container = Container::default();
        let layout = container.layout();
        let constraints = Constraints::new(
            None,
            Some(layout.left_anchor()),
            Some(layout.bottom_anchor()),
            Some(layout.right_anchor()),
        );
        container.add(stub(1, 1), constraints).unwrap();
        let bounds = container.lay_out(120, 80).unwrap();
        assert_eq!(bounds, &[Rect::new(0, 79, 120, 1)]);
    }

    #[test]
    fn test_inverted_edges_clamp_to_zero() {
        let mut container = Container::default();
        let layout = container.layout();
        let constraints = Constraints::edges(
            layout.top_anchor(),
            layout.right_anchor(),
            layout.bottom_anchor(),
            layout.left_anchor(),
        );
        container.add(stub(10, 10), constraints).unwrap();
        let bounds = container.lay_out(100, 50).unwrap();
        assert_eq!(bounds, &[Rect::new(100, 0, 0, 50)]);
    }

    #[test]
    fn test_mutation_marks_stale() {
        let mut container = Container::default();
        let constraints = container.layout_mut().cell(0, 0).unwrap();
        container.add(stub(10, 10), constraints).unwrap();
        container.lay_out(100, 100).unwrap();
        assert!(container.bounds().is_ok());

        container.set_preferred_size(0, Size::new(20, 20)).unwrap();
        assert_eq!(container.bounds(), Err(LayoutError::Stale));
        assert_eq!(container.last_valid_bounds(), &[Rect::new(10, 10, 10, 10)]);
        assert_eq!(container.anchor_position(container.layout().left_anchor()), None);

        container.lay_out(100, 100).unwrap();
        assert_eq!(container.bounds().unwrap(), &[Rect::new(10, 10, 20, 20)]);
    }

    #[test]
    fn test_insert_and_remove() {
        let mut container = Container::default();
        let a = container.layout_mut().cell(0, 0).unwrap();
        container.add(stub(10, 10), a).unwrap();
        container.insert(0, Component::new("first", Size::new(5, 5)), a).unwrap();
        container.insert(99, Component::new("last", Size::new(5, 5)), a).unwrap();
        let labels: Vec<_> = container.components().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["first", "stub", "last"]);

        let (removed, _) = container.remove(1).unwrap();
        assert_eq!(removed.label, "stub");
        assert_eq!(
            container.remove(5),
            Err(LayoutError::ChildIndexOutOfRange { index: 5, len: 2 })
        );
    }

    #[test]
    fn test_removal_clears_resolved_positions() {
        let mut container = Container::default();
        let constraints = container.layout_mut().cell(0, 0).unwrap();
        container.add(stub(40, 20), constraints).unwrap();
        container.lay_out(200, 100).unwrap();
        let (_, r0) = container.layout().existing_column(0).unwrap();
        assert_eq!(container.layout().graph().position(r0), Some(50));

        container.remove(0).unwrap();
        assert_eq!(container.layout().graph().position(r0), None);
        assert_eq!(container.anchor_position(r0), None);

        container.lay_out(200, 100).unwrap();
        assert_eq!(container.anchor_position(r0), Some(10));
    }

    #[test]
    fn test_implicit_anchors_reused_after_removal() {
        let mut container = Container::default();
        let (top, left) = (container.layout().top_anchor(), container.layout().left_anchor());
        let open = Constraints::new(Some(top), Some(left), None, None);
        for _ in 0..10 {
            container.add(stub(5, 5), open).unwrap();
        }
        let anchors = container.layout().graph().len();
        assert_eq!(anchors, 28);

        for _ in 0..3 {
            container.remove_all();
            for _ in 0..10 {
                container.add(stub(5, 5), open).unwrap();
            }
            assert_eq!(container.layout().graph().len(), anchors);
        }
        container.remove(4).unwrap();
        container.add(stub(7, 9), open).unwrap();
        assert_eq!(container.layout().graph().len(), anchors);
        assert_eq!(container.lay_out(100, 100).unwrap()[9], Rect::new(0, 0, 7, 9));
    }

    #[test]
    fn test_malformed_constraint_rejected_on_add() {
        let mut container = Container::default();
        let left = container.layout().left_anchor();
        let err = container
            .add(stub(1, 1), Constraints::new(None, Some(left), None, None))
            .unwrap_err();
        assert!(matches!(err, LayoutError::MalformedConstraint { child: 0, axis: Axis::Vertical, .. }));
        assert!(container.is_empty());
    }

    #[test]
    fn test_cycle_keeps_previous_geometry() {
        let mut container = Container::default();
        let left = container.layout().left_anchor();
        let a = container.layout_mut().create_anchor(left, 10).unwrap();
        let b = container.layout_mut().create_anchor(a, 10).unwrap();
        let top = container.layout().top_anchor();
        container
            .add(stub(5, 5), Constraints::new(Some(top), Some(a), None, Some(b)))
            .unwrap();
        container.lay_out(100, 100).unwrap();
        let before = container.last_valid_bounds().to_vec();

        container.layout_mut().graph_mut().set_relation(a, b, 3).unwrap();
        let err = container.lay_out(100, 100).unwrap_err();
        assert!(matches!(err, LayoutError::Cycle { .. }));
        assert_eq!(container.bounds(), Err(LayoutError::Stale));
        assert_eq!(container.last_valid_bounds(), before.as_slice());
        assert_eq!(container.layout().graph().position(a), None);
        assert_eq!(container.layout().graph().position(b), None);
    }
}
