//! Marimekko placement: columns packed edge to edge, width proportional to the x value.

use crate::axis::Axis;
use crate::models::{Item, PlacedItem};

/// Paint order of items that are not in focus.
pub const Z_BACKGROUND: i32 = 0;
/// Paint order of focused items.
pub const Z_FOCUSED: i32 = 10;

/// Assign left offsets in `sorted` order with no gaps between columns.
///
/// Each column spans the axis from the running x sum before it to the running sum after it,
/// so the columns always cover `[0, extent(sum of x)]`. On a linear axis this is the same as
/// `width = extent(x)`; on a log axis the edges are log-spaced and still fill the range.
/// Offsets are relative to the start of the x range. An item without an x point counts as
/// x = 1; a zero x value yields a zero-width column.
pub fn place_items(sorted: Vec<Item>, axis: &Axis) -> Vec<PlacedItem> {
    let mut cumulative = 0.0;
    let mut current_x = 0.0;
    sorted
        .into_iter()
        .map(|item| {
            let x_value = item.x_point.as_ref().map(|p| p.value).unwrap_or(1.0);
            cumulative += x_value;
            let right = axis.extent(cumulative).max(current_x);
            let z_index = if item.focus { Z_FOCUSED } else { Z_BACKGROUND };
            let placed = PlacedItem {
                item,
                x_position: current_x,
                bar_width: right - current_x,
                z_index,
            };
            current_x = right;
            placed
        })
        .collect()
}
