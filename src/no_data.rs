//! The single "no data" banner over the trailing run of entities without bars.

use crate::labels::Bounds;
use crate::models::PlacedItem;
use serde::{Deserialize, Serialize};

pub const NO_DATA_LABEL: &str = "no data";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoDataRegion {
    pub bounds: Bounds,
    pub label: String,
    /// Center of the banner; the label is drawn here rotated by `label_rotation_deg`.
    pub label_anchor: (f64, f64),
    pub label_rotation_deg: f64,
    /// Index of the first placed item covered by the banner.
    pub first_index: usize,
    pub entity_count: usize,
}

/// Index of the first placed item without bars.
pub fn first_no_data_index(placed: &[PlacedItem]) -> Option<usize> {
    placed.iter().position(|p| !p.item.has_data())
}

/// Check that every item after the first bar-less one is bar-less too.
///
/// A violation means the sort stage let data through after a placeholder; it is logged and
/// layout carries on.
pub fn check_trailing_no_data(placed: &[PlacedItem]) -> bool {
    let Some(first) = first_no_data_index(placed) else {
        return true;
    };
    match placed[first..].iter().find(|p| p.item.has_data()) {
        Some(offender) => {
            log::error!(
                "entity {} has data but is placed after {}, which has none",
                offender.item.entity_name,
                placed[first].item.entity_name
            );
            false
        }
        None => true,
    }
}

/// Banner from the first bar-less item's left edge to the last item's right edge, sitting
/// on `baseline_y` with height `no_data_height`.
pub fn no_data_region(
    placed: &[PlacedItem],
    plot: &Bounds,
    baseline_y: f64,
    no_data_height: f64,
) -> Option<NoDataRegion> {
    let first = first_no_data_index(placed)?;
    check_trailing_no_data(placed);
    let last = placed.last()?;

    let x = plot.x + placed[first].x_position;
    let width = (plot.x + last.right() - x).max(0.0);
    let bounds = Bounds::new(x, baseline_y - no_data_height, width, no_data_height);
    Some(NoDataRegion {
        label_anchor: (bounds.x + width / 2.0, bounds.y + no_data_height / 2.0),
        bounds,
        label: NO_DATA_LABEL.to_string(),
        label_rotation_deg: -90.0,
        first_index: first,
        entity_count: placed.len() - first,
    })
}
