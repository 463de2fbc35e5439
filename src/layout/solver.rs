//! Anchor resolution
//!
//! Solving happens in two steps. First every auto-size anchor gets its
//! offset from the preferred extents of the children it bounds. Then each
//! requested anchor is resolved recursively: its position is the resolved
//! position of its related anchor plus its offset, or its absolute position
//! when it has no relation. Results are memoized per pass, an anchor that is
//! reached again while its own chain is being resolved aborts the pass with
//! a cycle error, and a position outside the `i32` range aborts it with an
//! overflow error.

use std::collections::{HashMap, HashSet};

use super::anchor::{AnchorGraph, AnchorId};
use super::constraints::Axis;
use super::error::LayoutError;

/// A child's request for room between two anchors on one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Demand {
    /// Index of the child in its container
    pub child: usize,
    pub axis: Axis,
    /// Left or top edge
    pub leading: AnchorId,
    /// Right or bottom edge
    pub trailing: AnchorId,
    /// Preferred width or height
    pub extent: i32,
}

/// Resolved anchor positions of one solver pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    positions: Vec<Option<i32>>,
}

impl Solution {
    /// Position of an anchor, `None` if the pass did not need it
    pub fn position(&self, anchor: AnchorId) -> Option<i32> {
        self.positions.get(anchor.index()).copied().flatten()
    }

    pub(crate) fn positions(&self) -> &[Option<i32>] {
        &self.positions
    }
}

/// Split `total` into `parts` integer shares.
///
/// Every share gets the floored quotient and the last one also takes the
/// remainder, so the shares always add up to `total`.
pub fn split_evenly(total: i32, parts: usize) -> Vec<i32> {
    if parts == 0 {
        return Vec::new();
    }
    let count = parts as i32;
    let base = total.div_euclid(count);
    let mut shares = vec![base; parts];
    if let Some(last) = shares.last_mut() {
        *last += total.rem_euclid(count);
    }
    shares
}

/// Relation path between the two edges of a demand
#[derive(Debug, Clone)]
struct Span {
    /// Auto-size anchors on the path, leading side first
    members: Vec<AnchorId>,
    /// Length contributed by the fixed anchors on the path
    fixed: i32,
    /// +1 when the trailing edge follows the leading one, -1 when the
    /// leading edge is derived from the trailing one
    direction: i32,
    extent: i32,
}

/// Resolver for one pass over an anchor graph
pub struct Solver<'a> {
    graph: &'a AnchorGraph,
    /// Magnitude and sign of every sized auto-size anchor
    auto_offsets: HashMap<AnchorId, (i32, i32)>,
    memo: Vec<Option<i32>>,
    in_progress: Vec<bool>,
}

impl<'a> Solver<'a> {
    pub fn new(graph: &'a AnchorGraph) -> Self {
        Self {
            graph,
            auto_offsets: HashMap::new(),
            memo: vec![None; graph.len()],
            in_progress: vec![false; graph.len()],
        }
    }

    /// Resolve `roots` (and everything they depend on) for the given demands
    pub fn solve(
        graph: &'a AnchorGraph,
        demands: &[Demand],
        roots: impl IntoIterator<Item = AnchorId>,
    ) -> Result<Solution, LayoutError> {
        let mut solver = Self::new(graph);
        solver.size_auto_anchors(demands);
        for root in roots {
            solver.resolve(root)?;
        }
        tracing::debug!(
            anchors = graph.len(),
            auto_sized = solver.auto_offsets.len(),
            "anchor pass resolved"
        );
        Ok(Solution {
            positions: solver.memo,
        })
    }

    /// Offset of an auto-size anchor after sizing, 0 if nothing bounds it
    pub fn auto_offset(&self, anchor: AnchorId) -> i32 {
        self.auto_offsets
            .get(&anchor)
            .map(|(magnitude, sign)| magnitude * sign)
            .unwrap_or(0)
    }

    /// Distribute the preferred extents of all demands over the auto-size
    /// anchors between their edges.
    ///
    /// Demands are handled in rounds by how many of their auto-size anchors
    /// are still unsized, fewest first, so a child spanning several columns
    /// only claims what the single-column children left over.
    pub fn size_auto_anchors(&mut self, demands: &[Demand]) {
        let spans: Vec<Span> = demands.iter().filter_map(|d| self.span(d)).collect();

        loop {
            let round = spans
                .iter()
                .map(|span| self.pending(span).len())
                .filter(|&pending| pending > 0)
                .min();
            let Some(round) = round else {
                break;
            };

            let mut offers: Vec<(AnchorId, i32, i32)> = Vec::new();
            for span in &spans {
                let pending = self.pending(span);
                if pending.len() != round {
                    continue;
                }
                let covered = span
                    .members
                    .iter()
                    .filter_map(|m| self.auto_offsets.get(m))
                    .fold(span.direction.saturating_mul(span.fixed), |sum, (magnitude, _)| {
                        sum.saturating_add(*magnitude)
                    });
                let needed = span.extent.saturating_sub(covered).max(0);
                for (member, share) in pending.into_iter().zip(split_evenly(needed, round)) {
                    offers.push((member, share, span.direction));
                }
            }

            tracing::trace!(round, offers = offers.len(), "auto-size round");
            let mut sized: Vec<(AnchorId, (i32, i32))> = Vec::new();
            for (member, share, sign) in offers {
                match sized.iter_mut().find(|(id, _)| *id == member) {
                    Some((_, (magnitude, _))) => *magnitude = (*magnitude).max(share),
                    None => sized.push((member, (share, sign))),
                }
            }
            self.auto_offsets.extend(sized);
        }
    }

    fn pending(&self, span: &Span) -> Vec<AnchorId> {
        span.members
            .iter()
            .copied()
            .filter(|m| !self.auto_offsets.contains_key(m))
            .collect()
    }

    /// Find the relation path between the edges of a demand, if one edge is
    /// derived from the other
    fn span(&self, demand: &Demand) -> Option<Span> {
        if demand.leading == demand.trailing {
            return None;
        }
        let (mut path, direction) = if let Some(path) = self.path(demand.trailing, demand.leading) {
            (path, 1)
        } else {
            (self.path(demand.leading, demand.trailing)?, -1)
        };
        if direction == 1 {
            path.reverse();
        }

        let mut members = Vec::new();
        let mut fixed = 0;
        for anchor in path {
            let node = self.graph.get(anchor)?;
            if node.is_auto_size() {
                members.push(anchor);
            } else {
                fixed = node.relative_position().saturating_add(fixed);
            }
        }
        Some(Span {
            members,
            fixed,
            direction,
            extent: demand.extent,
        })
    }

    /// Anchors from `from` up to, not including, `to` along relations
    fn path(&self, from: AnchorId, to: AnchorId) -> Option<Vec<AnchorId>> {
        let mut path = Vec::new();
        let mut seen = HashSet::new();
        let mut current = from;
        while current != to {
            if !seen.insert(current) {
                return None;
            }
            path.push(current);
            current = self.graph.related(current)?;
        }
        Some(path)
    }

    /// Resolve one anchor, memoized for the rest of the pass.
    ///
    /// The unresolved part of the relation chain is collected first and then
    /// resolved from its far end, so long chains do not recurse.
    pub fn resolve(&mut self, id: AnchorId) -> Result<i32, LayoutError> {
        let graph = self.graph;
        let mut pending: Vec<AnchorId> = Vec::new();
        let mut base = None;
        let mut current = Some(id);
        while let Some(next) = current {
            let anchor = graph.require(next)?;
            let index = next.index();
            if let Some(position) = self.memo[index] {
                base = Some(position);
                break;
            }
            if self.in_progress[index] {
                let start = pending.iter().position(|&a| a == next).unwrap_or(0);
                let mut chain = pending[start..].to_vec();
                chain.push(next);
                tracing::warn!(?chain, "cyclic anchor relation");
                return Err(LayoutError::cycle(chain));
            }
            self.in_progress[index] = true;
            pending.push(next);
            current = anchor.related();
        }

        for &next in pending.iter().rev() {
            let anchor = graph.require(next)?;
            let position = match (anchor.related(), base) {
                (Some(_), Some(base)) => {
                    let offset = if anchor.is_auto_size() {
                        self.auto_offset(next)
                    } else {
                        anchor.relative_position()
                    };
                    base.checked_add(offset)
                        .ok_or(LayoutError::Overflow { anchor: next })?
                }
                _ => anchor.absolute_position(),
            };
            self.in_progress[next.index()] = false;
            self.memo[next.index()] = Some(position);
            base = Some(position);
        }

        base.ok_or(LayoutError::UnknownAnchor { anchor: id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::anchor::Orientation;

    #[test]
    fn test_split_evenly_exact() {
        assert_eq!(split_evenly(10, 2), vec![5, 5]);
    }

    #[test]
    fn test_split_evenly_remainder_on_last() {
        assert_eq!(split_evenly(11, 2), vec![5, 6]);
        assert_eq!(split_evenly(7, 3), vec![2, 2, 3]);
        assert_eq!(split_evenly(7, 3).iter().sum::<i32>(), 7);
    }

    #[test]
    fn test_split_evenly_no_parts() {
        assert!(split_evenly(4, 0).is_empty());
    }

    #[test]
    fn test_relative_position_added() {
        let mut graph = AnchorGraph::new();
        let base = graph.create_absolute(Orientation::Horizontal, 40);
        let a = graph.create_relative(base, 15).unwrap();
        let b = graph.create_relative(a, -5).unwrap();
        let solution = Solver::solve(&graph, &[], [b]).unwrap();
        assert_eq!(solution.position(a), Some(55));
        assert_eq!(solution.position(b), Some(50));
    }

    #[test]
    fn test_unrequested_anchor_left_unresolved() {
        let mut graph = AnchorGraph::new();
        let a = graph.create_absolute(Orientation::Horizontal, 1);
        let b = graph.create_absolute(Orientation::Horizontal, 2);
        let solution = Solver::solve(&graph, &[], [a]).unwrap();
        assert_eq!(solution.position(a), Some(1));
        assert_eq!(solution.position(b), None);
    }

    #[test]
    fn test_cycle_names_chain() {
        let mut graph = AnchorGraph::new();
        let base = graph.create_absolute(Orientation::Vertical, 0);
        let a = graph.create_relative(base, 1).unwrap();
        let b = graph.create_relative(base, 1).unwrap();
        let c = graph.create_relative(base, 1).unwrap();
        graph.set_relation(a, b, 1).unwrap();
        graph.set_relation(b, c, 1).unwrap();
        graph.set_relation(c, a, 1).unwrap();

        let err = Solver::solve(&graph, &[], [a]).unwrap_err();
        assert_eq!(err, LayoutError::Cycle { chain: vec![a, b, c, a] });
    }

    #[test]
    fn test_overflowing_position_is_an_error() {
        let mut graph = AnchorGraph::new();
        let base = graph.create_absolute(Orientation::Horizontal, i32::MAX - 5);
        let near = graph.create_relative(base, 5).unwrap();
        let past = graph.create_relative(near, 1).unwrap();
        let solution = Solver::solve(&graph, &[], [near]).unwrap();
        assert_eq!(solution.position(near), Some(i32::MAX));

        let err = Solver::solve(&graph, &[], [past]).unwrap_err();
        assert_eq!(err, LayoutError::Overflow { anchor: past });
    }

    #[test]
    fn test_long_chain_resolves_without_recursion() {
        let mut graph = AnchorGraph::new();
        let mut last = graph.create_absolute(Orientation::Vertical, 0);
        for _ in 0..200_000 {
            last = graph.create_relative(last, 1).unwrap();
        }
        let solution = Solver::solve(&graph, &[], [last]).unwrap();
        assert_eq!(solution.position(last), Some(200_000));
    }

    #[test]
    fn test_auto_size_takes_preferred_extent() {
        let mut graph = AnchorGraph::new();
        let left = graph.create_absolute(Orientation::Horizontal, 10);
        let right = graph.create_auto_size(left).unwrap();
        let demand = Demand {
            child: 0,
            axis: Axis::Horizontal,
            leading: left,
            trailing: right,
            extent: 42,
        };
        let solution = Solver::solve(&graph, &[demand], [right]).unwrap();
        assert_eq!(solution.position(right), Some(52));
    }

    #[test]
    fn test_backward_auto_size_grows_left() {
        let mut graph = AnchorGraph::new();
        let right = graph.create_absolute(Orientation::Horizontal, 100);
        let left = graph.create_auto_size(right).unwrap();
        let demand = Demand {
            child: 0,
            axis: Axis::Horizontal,
            leading: left,
            trailing: right,
            extent: 30,
        };
        let solution = Solver::solve(&graph, &[demand], [left]).unwrap();
        assert_eq!(solution.position(left), Some(70));
    }

    #[test]
    fn test_two_auto_size_anchors_share_extent() {
        let mut graph = AnchorGraph::new();
        let start = graph.create_absolute(Orientation::Horizontal, 0);
        let first = graph.create_auto_size(start).unwrap();
        let second = graph.create_auto_size(first).unwrap();
        let demand = Demand {
            child: 0,
            axis: Axis::Horizontal,
            leading: start,
            trailing: second,
            extent: 11,
        };
        let solution = Solver::solve(&graph, &[demand], [second]).unwrap();
        assert_eq!(solution.position(first), Some(5));
        assert_eq!(solution.position(second), Some(11));
    }

    #[test]
    fn test_spanning_child_uses_leftover() {
        // Column 0 is sized by its own child; the spanning child only pushes
        // the remaining auto-size anchor
        let mut graph = AnchorGraph::new();
        let start = graph.create_absolute(Orientation::Horizontal, 0);
        let right0 = graph.create_auto_size(start).unwrap();
        let left1 = graph.create_relative(right0, 5).unwrap();
        let right1 = graph.create_auto_size(left1).unwrap();
        let single = Demand {
            child: 0,
            axis: Axis::Horizontal,
            leading: start,
            trailing: right0,
            extent: 40,
        };
        let spanning = Demand {
            child: 1,
            axis: Axis::Horizontal,
            leading: start,
            trailing: right1,
            extent: 100,
        };
        let solution = Solver::solve(&graph, &[spanning, single], [right1]).unwrap();
        assert_eq!(solution.position(right0), Some(40));
        assert_eq!(solution.position(right1), Some(100));
    }

    #[test]
    fn test_unbounded_auto_size_is_zero() {
        let mut graph = AnchorGraph::new();
        let start = graph.create_absolute(Orientation::Vertical, 7);
        let auto = graph.create_auto_size(start).unwrap();
        let solution = Solver::solve(&graph, &[], [auto]).unwrap();
        assert_eq!(solution.position(auto), Some(7));
    }
}
