//! Entity labels above columns, with overflow and overlap suppression.
//!
//! Each candidate sits directly above its column, left-aligned with the column's left edge.
//! Suppression runs in two passes:
//! 1. labels whose right edge passes the plot's right boundary are dropped;
//! 2. the rest are swept left to right, and a label overlapping any label already kept is
//!    dropped. Earlier labels always win.

use crate::axis::Axis;
use crate::models::PlacedItem;
use crate::style::{NO_DATA_GRAY, Rgb8};
use crate::text::TextMeasurer;
use serde::{Deserialize, Serialize};

/// Axis-aligned pixel rectangle; `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// True when the interiors overlap; shared edges do not count.
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedLabel {
    pub entity_name: String,
    pub text: String,
    pub bounds: Bounds,
    pub color: Rgb8,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelOptions {
    pub font_px: f64,
    pub padding: f64,
    pub no_data_height: f64,
    /// Also place labels above placeholder columns.
    pub include_no_data: bool,
}

fn label_color(item: &PlacedItem) -> Rgb8 {
    item.item
        .entity_color
        .or_else(|| item.item.bars.first().map(|b| b.color))
        .unwrap_or(NO_DATA_GRAY)
}

/// One candidate per labelled item, before any suppression.
pub fn label_candidates(
    placed: &[PlacedItem],
    y_axis: &Axis,
    plot: &Bounds,
    opts: &LabelOptions,
    measurer: &dyn TextMeasurer,
) -> Vec<PlacedLabel> {
    let baseline = y_axis.place(y_axis.origin());
    placed
        .iter()
        .filter(|p| p.item.has_data() || opts.include_no_data)
        .map(|p| {
            let bar_top = if p.item.has_data() {
                y_axis.place(p.item.total())
            } else {
                baseline - opts.no_data_height
            };
            let text = p.item.label_text().to_string();
            let (width, height) = measurer.measure(&text, opts.font_px);
            PlacedLabel {
                entity_name: p.item.entity_name.clone(),
                bounds: Bounds::new(
                    plot.x + p.x_position,
                    bar_top - opts.padding - height,
                    width,
                    height,
                ),
                text,
                color: label_color(p),
            }
        })
        .collect()
}

/// Drop overflowing labels, then greedily drop later overlapping ones in x order.
pub fn resolve_collisions(candidates: Vec<PlacedLabel>, plot: &Bounds) -> Vec<PlacedLabel> {
    let mut visible: Vec<PlacedLabel> = candidates
        .into_iter()
        .filter(|l| l.bounds.right() <= plot.right())
        .collect();
    visible.sort_by(|a, b| a.bounds.x.total_cmp(&b.bounds.x));

    let mut kept: Vec<PlacedLabel> = Vec::with_capacity(visible.len());
    for label in visible {
        if kept.iter().any(|k| k.bounds.intersects(&label.bounds)) {
            log::trace!("hiding overlapping label {}", label.entity_name);
            continue;
        }
        kept.push(label);
    }
    kept
}

/// Candidates followed by both suppression passes.
pub fn layout_labels(
    placed: &[PlacedItem],
    y_axis: &Axis,
    plot: &Bounds,
    opts: &LabelOptions,
    measurer: &dyn TextMeasurer,
) -> Vec<PlacedLabel> {
    let candidates = label_candidates(placed, y_axis, plot, opts, measurer);
    resolve_collisions(candidates, plot)
}
