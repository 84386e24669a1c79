//! Bar-stack builder: one [`Item`] per entity with an x value, y series stacked in order.

use crate::config::MarimekkoConfig;
use crate::extract::Extracted;
use crate::models::{DataBar, Item, StackedPoint};

/// Stack every y series per entity, bottom to top in configured series order.
///
/// Series without a value for an entity are skipped; the running offset only grows by the
/// values actually stacked. An entity left with no bars keeps an empty `bars` and is drawn
/// as a placeholder later.
pub fn build_items(
    extracted: &Extracted,
    config: &MarimekkoConfig,
    short_name: impl Fn(&str) -> Option<String>,
) -> Vec<Item> {
    extracted
        .x_points
        .iter()
        .map(|x_point| {
            let entity = x_point.entity.as_str();
            let mut offset = 0.0;
            let mut bars = Vec::with_capacity(extracted.y_series.len());
            for series in &extracted.y_series {
                let Some(r) = series.points.get(entity) else {
                    continue;
                };
                bars.push(DataBar {
                    color: series.color,
                    series_name: series.series_name.clone(),
                    column_slug: series.column_slug.clone(),
                    y_point: StackedPoint {
                        position: entity.to_string(),
                        value: r.value,
                        value_offset: offset,
                        time: r.time,
                    },
                });
                offset += r.value;
            }
            Item {
                entity_name: entity.to_string(),
                short_entity_name: short_name(entity),
                entity_color: extracted.entity_colors.get(entity).copied(),
                bars,
                x_point: Some(x_point.clone()),
                focus: config.is_focused(entity),
            }
        })
        .collect()
}
