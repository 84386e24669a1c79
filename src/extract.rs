//! Point extraction: x and y observations for the target time, with tolerance.

use crate::config::MarimekkoConfig;
use crate::error::LayoutError;
use crate::models::{SimplePoint, Time};
use crate::style::{Rgb8, category_color, series_color};
use crate::table::{Resolved, Table};
use ahash::AHashMap;

/// One y column resolved for every entity that has a value within tolerance.
#[derive(Debug, Clone)]
pub struct YSeries {
    pub column_slug: String,
    pub series_name: String,
    pub color: Rgb8,
    pub points: AHashMap<String, Resolved<f64>>,
}

#[derive(Debug, Clone)]
pub struct Extracted {
    pub end_time: Time,
    /// Entities with a usable x value, in table iteration order.
    pub x_points: Vec<SimplePoint>,
    pub y_series: Vec<YSeries>,
    /// Colors from the color column, when one is configured.
    pub entity_colors: AHashMap<String, Rgb8>,
}

fn tolerance_for(table: &Table, config: &MarimekkoConfig, slug: &str) -> u32 {
    config
        .tolerance
        .unwrap_or_else(|| table.column(slug).map(|c| c.tolerance).unwrap_or(0))
}

/// Check that the configured columns exist and return the x slug.
fn x_slug<'a>(table: &Table, config: &'a MarimekkoConfig) -> Result<&'a str, LayoutError> {
    let x = config
        .x_column
        .as_deref()
        .ok_or(LayoutError::MissingXColumn)?;
    if config.y_columns.is_empty() {
        return Err(LayoutError::MissingYColumn);
    }
    let slugs = std::iter::once(x)
        .chain(config.y_columns.iter().map(String::as_str))
        .chain(config.color_column.as_deref());
    for slug in slugs {
        if !table.has_column(slug) {
            return Err(LayoutError::UnknownColumn(slug.to_string()));
        }
    }
    Ok(x)
}

/// The time shown: the configured one, or the latest time with an x value.
pub fn resolve_end_time(table: &Table, config: &MarimekkoConfig) -> Result<Time, LayoutError> {
    let x = x_slug(table, config)?;
    config
        .end_time
        .or_else(|| table.max_time(x))
        .ok_or(LayoutError::NoMatchingData)
}

/// Pull x points, y series and entity colors for the target time.
///
/// Entities without an x value within tolerance are dropped entirely; negative x values are
/// dropped as well since they cannot be drawn as a width.
pub fn extract(table: &Table, config: &MarimekkoConfig) -> Result<Extracted, LayoutError> {
    let x = x_slug(table, config)?;
    let end_time = resolve_end_time(table, config)?;
    let strategy = config.tolerance_strategy;
    let x_tol = tolerance_for(table, config, x);

    let mut x_points = Vec::new();
    for entity in table.entity_names() {
        if !config.is_selected(entity) {
            continue;
        }
        let Some(r) = table.number_at(entity, x, end_time, x_tol, strategy) else {
            continue;
        };
        if r.value < 0.0 {
            log::warn!("skipping {entity}: negative x value {}", r.value);
            continue;
        }
        x_points.push(SimplePoint {
            value: r.value,
            entity: entity.clone(),
            time: r.time,
        });
    }

    let y_series = config
        .y_columns
        .iter()
        .enumerate()
        .map(|(idx, slug)| {
            let tol = tolerance_for(table, config, slug);
            let def = table.column(slug);
            let points = x_points
                .iter()
                .filter_map(|p| {
                    table
                        .number_at(&p.entity, slug, end_time, tol, strategy)
                        .map(|r| (p.entity.clone(), r))
                })
                .collect();
            YSeries {
                column_slug: slug.clone(),
                series_name: def
                    .map(|d| d.display_name().to_string())
                    .unwrap_or_else(|| slug.clone()),
                color: def.and_then(|d| d.color).unwrap_or_else(|| series_color(idx)),
                points,
            }
        })
        .collect();

    let mut entity_colors = AHashMap::new();
    if let Some(color_slug) = config.color_column.as_deref() {
        let tol = tolerance_for(table, config, color_slug);
        for p in &x_points {
            if let Some(r) = table.text_at(&p.entity, color_slug, end_time, tol, strategy) {
                entity_colors.insert(p.entity.clone(), category_color(&r.value));
            }
        }
    }

    log::debug!(
        "extracted {} entities with x values at time {end_time}",
        x_points.len()
    );
    Ok(Extracted {
        end_time,
        x_points,
        y_series,
        entity_colors,
    })
}
