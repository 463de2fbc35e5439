//! Form layout: border, margin and generated row/column anchors
//!
//! The layout owns the anchor graph. Four border anchors sit on the
//! container edges and four margin anchors are inset from them. Rows and
//! columns are generated on demand: non-negative indices grow from the
//! top/left margin, negative indices grow backwards from the bottom/right
//! margin, each pair separated from its neighbour by the configured gap.

use std::collections::HashSet;

use super::anchor::{AnchorGraph, AnchorId, Orientation};
use super::config::LayoutConfig;
use super::constraints::Constraints;
use super::error::LayoutError;
use super::types::{Insets, Size};

/// Generated anchor pairs along one axis
///
/// `forward[i]` holds the (leading, trailing) pair of index `i`,
/// `backward[k]` the pair of index `-(k + 1)`.
#[derive(Debug, Clone, Default)]
struct Lanes {
    forward: Vec<(AnchorId, AnchorId)>,
    backward: Vec<(AnchorId, AnchorId)>,
}

impl Lanes {
    fn existing(&self, index: i32) -> Option<(AnchorId, AnchorId)> {
        if index >= 0 {
            self.forward.get(index as usize).copied()
        } else {
            self.backward.get((-(index + 1)) as usize).copied()
        }
    }

    /// Leading anchors of forward pairs after the first, which carry the gap
    fn forward_gap_anchors(&self) -> impl Iterator<Item = AnchorId> + '_ {
        self.forward.iter().skip(1).map(|(lead, _)| *lead)
    }

    /// Trailing anchors of backward pairs after the first
    fn backward_gap_anchors(&self) -> impl Iterator<Item = AnchorId> + '_ {
        self.backward.iter().skip(1).map(|(_, trail)| *trail)
    }
}

/// The anchor graph of one container plus its generated rows and columns
#[derive(Debug, Clone)]
pub struct FormLayout {
    graph: AnchorGraph,
    top: AnchorId,
    left: AnchorId,
    bottom: AnchorId,
    right: AnchorId,
    top_margin: AnchorId,
    left_margin: AnchorId,
    bottom_margin: AnchorId,
    right_margin: AnchorId,
    margins: Insets,
    horizontal_gap: i32,
    vertical_gap: i32,
    columns: Lanes,
    rows: Lanes,
}

impl Default for FormLayout {
    fn default() -> Self {
        Self::new(&LayoutConfig::default())
    }
}

impl FormLayout {
    /// Generated rows and columns are indexed from `-LANE_LIMIT` up to
    /// `LANE_LIMIT - 1`
    pub const LANE_LIMIT: i32 = 1000;

    /// Create a layout with border and margin anchors only
    pub fn new(config: &LayoutConfig) -> Self {
        let mut graph = AnchorGraph::new();
        let top = graph.create_absolute(Orientation::Vertical, 0);
        let left = graph.create_absolute(Orientation::Horizontal, 0);
        let bottom = graph.create_absolute(Orientation::Vertical, 0);
        let right = graph.create_absolute(Orientation::Horizontal, 0);

        let margins = config.margins;
        let top_margin = graph.push_linked(top, margins.top, false);
        let left_margin = graph.push_linked(left, margins.left, false);
        let bottom_margin = graph.push_linked(bottom, margins.bottom.saturating_neg(), false);
        let right_margin = graph.push_linked(right, margins.right.saturating_neg(), false);

        Self {
            graph,
            top,
            left,
            bottom,
            right,
            top_margin,
            left_margin,
            bottom_margin,
            right_margin,
            margins,
            horizontal_gap: config.horizontal_gap,
            vertical_gap: config.vertical_gap,
            columns: Lanes::default(),
            rows: Lanes::default(),
        }
    }

    pub fn graph(&self) -> &AnchorGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut AnchorGraph {
        &mut self.graph
    }

    // Border and margin anchors

    pub fn top_anchor(&self) -> AnchorId {
        self.top
    }

    pub fn left_anchor(&self) -> AnchorId {
        self.left
    }

    pub fn bottom_anchor(&self) -> AnchorId {
        self.bottom
    }

    pub fn right_anchor(&self) -> AnchorId {
        self.right
    }

    pub fn top_margin_anchor(&self) -> AnchorId {
        self.top_margin
    }

    pub fn left_margin_anchor(&self) -> AnchorId {
        self.left_margin
    }

    pub fn bottom_margin_anchor(&self) -> AnchorId {
        self.bottom_margin
    }

    pub fn right_margin_anchor(&self) -> AnchorId {
        self.right_margin
    }

    pub fn is_border(&self, anchor: AnchorId) -> bool {
        [self.top, self.left, self.bottom, self.right].contains(&anchor)
    }

    pub fn is_margin(&self, anchor: AnchorId) -> bool {
        [
            self.top_margin,
            self.left_margin,
            self.bottom_margin,
            self.right_margin,
        ]
        .contains(&anchor)
    }

    /// Right and bottom border/margin anchors, whose markers sit inside the line
    pub fn is_far_edge(&self, anchor: AnchorId) -> bool {
        [
            self.bottom,
            self.right,
            self.bottom_margin,
            self.right_margin,
        ]
        .contains(&anchor)
    }

    /// Pin the far border anchors to the container extent
    pub fn set_extent(&mut self, size: Size) -> Result<(), LayoutError> {
        self.graph.set_absolute_position(self.right, size.width)?;
        self.graph.set_absolute_position(self.bottom, size.height)
    }

    // Margins and gaps

    pub fn margins(&self) -> Insets {
        self.margins
    }

    pub fn set_margins(&mut self, margins: Insets) {
        self.margins = margins;
        self.graph.set_offsets([
            (self.top_margin, margins.top),
            (self.left_margin, margins.left),
            (self.bottom_margin, margins.bottom.saturating_neg()),
            (self.right_margin, margins.right.saturating_neg()),
        ]);
    }

    pub fn horizontal_gap(&self) -> i32 {
        self.horizontal_gap
    }

    /// Change the column gap, including on already generated columns
    pub fn set_horizontal_gap(&mut self, gap: i32) {
        self.horizontal_gap = gap;
        let offsets: Vec<_> = gap_offsets(&self.columns, gap).collect();
        self.graph.set_offsets(offsets);
    }

    pub fn vertical_gap(&self) -> i32 {
        self.vertical_gap
    }

    /// Change the row gap, including on already generated rows
    pub fn set_vertical_gap(&mut self, gap: i32) {
        self.vertical_gap = gap;
        let offsets: Vec<_> = gap_offsets(&self.rows, gap).collect();
        self.graph.set_offsets(offsets);
    }

    // Anchor creation

    /// Create an anchor at a fixed offset from `related`
    pub fn create_anchor(&mut self, related: AnchorId, offset: i32) -> Result<AnchorId, LayoutError> {
        self.graph.create_relative(related, offset)
    }

    /// Create an auto-size anchor following `related`
    pub fn create_auto_size_anchor(&mut self, related: AnchorId) -> Result<AnchorId, LayoutError> {
        self.graph.create_auto_size(related)
    }

    /// Create an anchor without relation
    pub fn create_absolute_anchor(&mut self, orientation: Orientation, position: i32) -> AnchorId {
        self.graph.create_absolute(orientation, position)
    }

    // Generated columns and rows

    pub fn column_left(&mut self, index: i32) -> Result<AnchorId, LayoutError> {
        Ok(self.column(index)?.0)
    }

    pub fn column_right(&mut self, index: i32) -> Result<AnchorId, LayoutError> {
        Ok(self.column(index)?.1)
    }

    pub fn row_top(&mut self, index: i32) -> Result<AnchorId, LayoutError> {
        Ok(self.row(index)?.0)
    }

    pub fn row_bottom(&mut self, index: i32) -> Result<AnchorId, LayoutError> {
        Ok(self.row(index)?.1)
    }

    /// Column anchors only if they were generated already
    pub fn existing_column(&self, index: i32) -> Option<(AnchorId, AnchorId)> {
        self.columns.existing(index)
    }

    /// Row anchors only if they were generated already
    pub fn existing_row(&self, index: i32) -> Option<(AnchorId, AnchorId)> {
        self.rows.existing(index)
    }

    fn column(&mut self, index: i32) -> Result<(AnchorId, AnchorId), LayoutError> {
        let (start, end, gap) = (self.left_margin, self.right_margin, self.horizontal_gap);
        extend_lanes(&mut self.graph, &mut self.columns, start, end, gap, index)
    }

    fn row(&mut self, index: i32) -> Result<(AnchorId, AnchorId), LayoutError> {
        let (start, end, gap) = (self.top_margin, self.bottom_margin, self.vertical_gap);
        extend_lanes(&mut self.graph, &mut self.rows, start, end, gap, index)
    }

    // Constraint builders

    /// Constraints from explicit anchors; `None` sides take the child's
    /// preferred extent from the opposite side
    pub fn constraints(
        &self,
        top: Option<AnchorId>,
        left: Option<AnchorId>,
        bottom: Option<AnchorId>,
        right: Option<AnchorId>,
    ) -> Constraints {
        Constraints::new(top, left, bottom, right)
    }

    /// Constraints of a single generated cell
    pub fn cell(&mut self, column: i32, row: i32) -> Result<Constraints, LayoutError> {
        self.cells(column, row, column, row)
    }

    /// Constraints spanning from one generated cell to another
    pub fn cells(
        &mut self,
        begin_column: i32,
        begin_row: i32,
        end_column: i32,
        end_row: i32,
    ) -> Result<Constraints, LayoutError> {
        let top = self.row_top(begin_row)?;
        let left = self.column_left(begin_column)?;
        let bottom = self.row_bottom(end_row)?;
        let right = self.column_right(end_column)?;
        Ok(Constraints::edges(top, left, bottom, right))
    }

    // Anchor listings

    /// Horizontal anchors reachable from the constraints, in first-seen order
    pub fn horizontal_anchors(&self, constraints: &[Constraints]) -> Vec<AnchorId> {
        self.reachable(constraints, Orientation::Horizontal)
    }

    /// Vertical anchors reachable from the constraints, in first-seen order
    pub fn vertical_anchors(&self, constraints: &[Constraints]) -> Vec<AnchorId> {
        self.reachable(constraints, Orientation::Vertical)
    }

    fn reachable(&self, constraints: &[Constraints], orientation: Orientation) -> Vec<AnchorId> {
        let mut seen = HashSet::new();
        let mut anchors = Vec::new();
        for constraint in constraints {
            for (_, anchor) in constraint.anchors() {
                if self.graph.orientation(anchor) != Some(orientation) {
                    continue;
                }
                // The rest of a chain is known once one link was seen
                for link in self.graph.chain(anchor) {
                    if !seen.insert(link) {
                        break;
                    }
                    anchors.push(link);
                }
            }
        }
        anchors
    }
}

/// New offsets of the anchors carrying the gap between neighbouring lanes
fn gap_offsets(lanes: &Lanes, gap: i32) -> impl Iterator<Item = (AnchorId, i32)> + '_ {
    let forward = lanes.forward_gap_anchors().map(move |anchor| (anchor, gap));
    let backward = lanes
        .backward_gap_anchors()
        .map(move |anchor| (anchor, gap.saturating_neg()));
    forward.chain(backward)
}

/// Generate missing pairs up to `index` and return its pair.
///
/// Indices outside `-LANE_LIMIT..LANE_LIMIT` are rejected before anything
/// is generated.
///
/// Forward pairs start at `start`: the leading anchor is fixed (the margin
/// itself, or the previous trailing anchor plus the gap) and the trailing
/// anchor auto-sizes from it. Backward pairs mirror this from `end`.
fn extend_lanes(
    graph: &mut AnchorGraph,
    lanes: &mut Lanes,
    start: AnchorId,
    end: AnchorId,
    gap: i32,
    index: i32,
) -> Result<(AnchorId, AnchorId), LayoutError> {
    let limit = FormLayout::LANE_LIMIT;
    if !(-limit..limit).contains(&index) {
        return Err(LayoutError::LaneOutOfRange { index, limit });
    }
    if index >= 0 {
        while lanes.forward.len() <= index as usize {
            let lead = match lanes.forward.last() {
                Some(&(_, previous)) => graph.push_linked(previous, gap, false),
                None => start,
            };
            let trail = graph.push_linked(lead, 0, true);
            lanes.forward.push((lead, trail));
        }
        Ok(lanes.forward[index as usize])
    } else {
        let slot = (-(index + 1)) as usize;
        while lanes.backward.len() <= slot {
            let trail = match lanes.backward.last() {
                Some(&(previous, _)) => graph.push_linked(previous, gap.saturating_neg(), false),
                None => end,
            };
            let lead = graph.push_linked(trail, 0, true);
            lanes.backward.push((lead, trail));
        }
        Ok(lanes.backward[slot])
    }
}
