//! Pointer hit-testing against markers

use crate::layout::{Orientation, Point};

use super::marker::Marker;

/// Whether `point` is within `snap_range` of the marker's line.
///
/// Only the thin dimension counts; the strip's length is ignored so a
/// pointer anywhere along the line snaps to it.
pub fn hits(marker: &Marker, point: Point, snap_range: i32) -> bool {
    let (start, thickness) = marker.thin_extent();
    let coordinate = match marker.orientation {
        Orientation::Horizontal => point.x,
        Orientation::Vertical => point.y,
    };
    let first = start.saturating_sub(snap_range);
    let last = start
        .saturating_add(thickness - 1)
        .saturating_add(snap_range);
    (first..=last).contains(&coordinate)
}

/// The first marker hit by `point`, in marker order
pub fn hit_test(markers: &[Marker], point: Point, snap_range: i32) -> Option<&Marker> {
    markers.iter().find(|marker| hits(marker, point, snap_range))
}
