//! End-to-end layout: `extract → sort → stack → place → label`, plus render primitives.
//!
//! Every call recomputes everything from the table snapshot, the config, and the plot bounds.
//! There is no cached state, so unchanged inputs always give identical output.

use crate::axis::{Axis, ScaleType};
use crate::config::MarimekkoConfig;
use crate::error::LayoutError;
use crate::extract::extract;
use crate::labels::{Bounds, LabelOptions, PlacedLabel, layout_labels};
use crate::models::{Bar, PlacedItem, Time};
use crate::no_data::{NoDataRegion, no_data_region};
use crate::placement::place_items;
use crate::sort::sort_items;
use crate::stack::build_items;
use crate::style::{NO_DATA_GRAY, Rgb8};
use crate::table::Table;
use crate::text::{HeuristicTextMeasurer, TextMeasurer};
use serde::{Deserialize, Serialize};

/// Paint order of the no-data banner (above every column).
pub const Z_NO_DATA_BANNER: i32 = 20;
/// Paint order of entity labels.
pub const Z_LABELS: i32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RectKind {
    Bar,
    Placeholder,
    NoDataBanner,
}

/// A filled rectangle ready for any renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderRect {
    pub kind: RectKind,
    pub entity_name: Option<String>,
    pub series_name: Option<String>,
    pub bounds: Bounds,
    pub color: Rgb8,
    pub z_index: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub series_name: String,
    pub column_slug: String,
    pub color: Rgb8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarimekkoLayout {
    pub end_time: Time,
    pub plot: Bounds,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub placed_items: Vec<PlacedItem>,
    pub rects: Vec<RenderRect>,
    pub labels: Vec<PlacedLabel>,
    pub no_data: Option<NoDataRegion>,
    pub legend: Vec<LegendEntry>,
    pub no_data_height: f64,
}

impl MarimekkoLayout {
    /// Rectangles sorted by `z_index`; equal indices keep layout order.
    pub fn rects_in_paint_order(&self) -> Vec<&RenderRect> {
        let mut out: Vec<&RenderRect> = self.rects.iter().collect();
        out.sort_by_key(|r| r.z_index);
        out
    }

    /// Sum of all x values on the chart.
    pub fn x_total(&self) -> f64 {
        self.placed_items
            .iter()
            .filter_map(|p| p.item.x_point.as_ref())
            .map(|x| x.value)
            .sum()
    }

    /// Baseline (value 0) of the y axis in pixels.
    pub fn baseline_y(&self) -> f64 {
        self.y_axis.place(self.y_axis.origin())
    }
}

/// Compute a layout with the heuristic text measurer.
pub fn compute(
    table: &Table,
    config: &MarimekkoConfig,
    plot: Bounds,
) -> Result<MarimekkoLayout, LayoutError> {
    compute_with_measurer(table, config, plot, &HeuristicTextMeasurer)
}

pub fn compute_with_measurer(
    table: &Table,
    config: &MarimekkoConfig,
    plot: Bounds,
    measurer: &dyn TextMeasurer,
) -> Result<MarimekkoLayout, LayoutError> {
    config.validate()?;
    let valid = |v: f64| v.is_finite() && v > 0.0;
    if !valid(plot.width) || !valid(plot.height) || !plot.x.is_finite() || !plot.y.is_finite() {
        return Err(LayoutError::InvalidBounds {
            width: plot.width,
            height: plot.height,
        });
    }

    let extracted = extract(table, config)?;
    if extracted.x_points.is_empty() {
        return Err(LayoutError::NoMatchingData);
    }

    let items = build_items(&extracted, config, |e| table.short_name(e).map(str::to_string));
    if !items.iter().any(|i| i.has_data()) {
        return Err(LayoutError::NoMatchingData);
    }

    let x_total: f64 = extracted.x_points.iter().map(|p| p.value).sum();
    if x_total <= 0.0 {
        return Err(LayoutError::NoMatchingData);
    }
    // Every positive running sum is at least the smallest positive x, so a log domain starting
    // there keeps all column edges inside the range.
    let x_min = match config.x_scale {
        ScaleType::Linear => 0.0,
        ScaleType::Log => {
            let smallest = extracted
                .x_points
                .iter()
                .map(|p| p.value)
                .filter(|v| *v > 0.0)
                .fold(f64::INFINITY, f64::min);
            if smallest < x_total {
                smallest
            } else {
                x_total / 10.0
            }
        }
    };
    let x_axis = Axis::new(config.x_scale, (x_min, x_total), (plot.x, plot.right()));

    let sorted = sort_items(items, &config.sort);
    let placed = place_items(sorted, &x_axis);

    let y_max = placed
        .iter()
        .map(|p| p.item.total())
        .fold(0.0_f64, f64::max);
    let y_max = if y_max > 0.0 { y_max } else { 1.0 };
    let y_axis = Axis::linear((0.0, y_max), (plot.bottom(), plot.y));
    let baseline = plot.bottom();

    let mut rects = Vec::new();
    for p in &placed {
        let x = plot.x + p.x_position;
        for bar in p.item.render_bars(config.no_data_height) {
            let rect = match bar {
                Bar::Bar(b) => {
                    let top = y_axis.place(b.y_point.top());
                    let bottom = y_axis.place(b.y_point.value_offset);
                    RenderRect {
                        kind: RectKind::Bar,
                        entity_name: Some(p.item.entity_name.clone()),
                        series_name: Some(b.series_name),
                        bounds: Bounds::new(x, top, p.bar_width, bottom - top),
                        color: b.color,
                        z_index: p.z_index,
                    }
                }
                Bar::BarPlaceholder(ph) => RenderRect {
                    kind: RectKind::Placeholder,
                    entity_name: Some(p.item.entity_name.clone()),
                    series_name: Some(ph.series_name),
                    bounds: Bounds::new(x, baseline - ph.height, p.bar_width, ph.height),
                    color: NO_DATA_GRAY,
                    z_index: p.z_index,
                },
            };
            rects.push(rect);
        }
    }

    let no_data = if config.show_no_data_area {
        no_data_region(&placed, &plot, baseline, config.no_data_height)
    } else {
        None
    };
    if let Some(region) = &no_data {
        rects.push(RenderRect {
            kind: RectKind::NoDataBanner,
            entity_name: None,
            series_name: None,
            bounds: region.bounds,
            color: NO_DATA_GRAY,
            z_index: Z_NO_DATA_BANNER,
        });
    }

    let label_opts = LabelOptions {
        font_px: config.label_font_px,
        padding: config.label_padding,
        no_data_height: config.no_data_height,
        include_no_data: config.label_no_data_entities,
    };
    let labels = layout_labels(&placed, &y_axis, &plot, &label_opts, measurer);

    let legend = extracted
        .y_series
        .iter()
        .map(|s| LegendEntry {
            series_name: s.series_name.clone(),
            column_slug: s.column_slug.clone(),
            color: s.color,
        })
        .collect();

    log::debug!(
        "layout: {} items, {} rects, {} labels",
        placed.len(),
        rects.len(),
        labels.len()
    );
    Ok(MarimekkoLayout {
        end_time: extracted.end_time,
        plot,
        x_axis,
        y_axis,
        placed_items: placed,
        rects,
        labels,
        no_data,
        legend,
        no_data_height: config.no_data_height,
    })
}
