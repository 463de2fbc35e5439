//! Structural anchor names such as "Border top" or "r2"

use crate::layout::{AnchorId, FormLayout};

/// Name of an anchor by its role in the layout.
///
/// Border and margin anchors have fixed names. Generated column and row
/// anchors are found by walking the existing lanes outward from index 0
/// and from index -1; anything else is `???`.
pub fn anchor_name(layout: &FormLayout, anchor: AnchorId) -> String {
    let fixed = [
        (layout.bottom_anchor(), "Border bottom"),
        (layout.left_anchor(), "Border left"),
        (layout.right_anchor(), "Border right"),
        (layout.top_anchor(), "Border top"),
        (layout.bottom_margin_anchor(), "Margin bottom / b-1"),
        (layout.left_margin_anchor(), "Margin left / l0"),
        (layout.right_margin_anchor(), "Margin right / r-1"),
        (layout.top_margin_anchor(), "Margin top / t0"),
    ];
    if let Some((_, name)) = fixed.iter().find(|(a, _)| *a == anchor) {
        return (*name).to_string();
    }

    let columns = |index| layout.existing_column(index);
    let rows = |index| layout.existing_row(index);
    lane_name(columns, anchor, 0, 1, ('l', 'r'))
        .or_else(|| lane_name(columns, anchor, -1, -1, ('l', 'r')))
        .or_else(|| lane_name(rows, anchor, 0, 1, ('t', 'b')))
        .or_else(|| lane_name(rows, anchor, -1, -1, ('t', 'b')))
        .unwrap_or_else(|| "???".to_string())
}

fn lane_name(
    lanes: impl Fn(i32) -> Option<(AnchorId, AnchorId)>,
    anchor: AnchorId,
    start: i32,
    step: i32,
    (lead, trail): (char, char),
) -> Option<String> {
    let mut index = start;
    while let Some((leading, trailing)) = lanes(index) {
        if leading == anchor {
            return Some(format!("{lead}{index}"));
        }
        if trailing == anchor {
            return Some(format!("{trail}{index}"));
        }
        index += step;
    }
    None
}
