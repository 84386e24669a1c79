use crate::layout::MarimekkoLayout;
use serde::{Deserialize, Serialize};

/// Per-entity summary of a computed layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntitySummary {
    pub entity: String,
    pub x_value: Option<f64>,
    /// Fraction of the chart's summed x values, in 0..=1.
    pub x_share: Option<f64>,
    pub y_total: f64,
    pub bar_count: usize,
    pub x_position: f64,
    pub bar_width: f64,
    /// True when any shown value comes from a time other than the chart's end time.
    pub interpolated: bool,
}

/// One row per placed entity, in placed order.
pub fn entity_summaries(layout: &MarimekkoLayout) -> Vec<EntitySummary> {
    let x_total = layout.x_total();
    layout
        .placed_items
        .iter()
        .map(|p| {
            let item = &p.item;
            let x_value = item.x_point.as_ref().map(|x| x.value);
            let x_share = match x_value {
                Some(v) if x_total > 0.0 => Some(v / x_total),
                _ => None,
            };
            let interpolated = item
                .x_point
                .as_ref()
                .is_some_and(|x| x.is_interpolated(layout.end_time))
                || item
                    .bars
                    .iter()
                    .any(|b| b.y_point.is_interpolated(layout.end_time));
            EntitySummary {
                entity: item.entity_name.clone(),
                x_value,
                x_share,
                y_total: item.total(),
                bar_count: item.bars.len(),
                x_position: p.x_position,
                bar_width: p.bar_width,
                interpolated,
            }
        })
        .collect()
}
