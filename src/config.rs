//! Chart configuration: which columns to use, which time to show, and layout constants.
//!
//! Every field has a default, so a JSON config only needs the keys it wants to change:
//! ```json
//! { "x_column": "population", "y_columns": ["gdp"], "sort": { "sort_by": "entity_name" } }
//! ```

use crate::axis::ScaleType;
use crate::error::LayoutError;
use crate::models::Time;
use crate::sort::SortConfig;
use crate::table::ToleranceStrategy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_NO_DATA_HEIGHT: f64 = 20.0;
pub const DEFAULT_LABEL_PADDING: f64 = 4.0;
pub const DEFAULT_LABEL_FONT_PX: f64 = 12.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarimekkoConfig {
    /// Column whose values set column widths.
    pub x_column: Option<String>,
    /// Stacked series, bottom to top.
    pub y_columns: Vec<String>,
    /// Categorical column used to color entities.
    pub color_column: Option<String>,
    /// Time to show; defaults to the latest time present in the x column.
    pub end_time: Option<Time>,
    /// Overrides every column's own tolerance when set.
    pub tolerance: Option<u32>,
    pub tolerance_strategy: ToleranceStrategy,
    pub sort: SortConfig,
    pub x_scale: ScaleType,
    /// Pixel height of placeholder columns and the no-data banner.
    pub no_data_height: f64,
    /// Gap between a bar top and the bottom of its label.
    pub label_padding: f64,
    pub label_font_px: f64,
    /// Also label entities drawn as placeholders.
    pub label_no_data_entities: bool,
    /// Entities drawn in front; empty means every entity is in focus.
    pub focused_entities: Vec<String>,
    /// Restrict the chart to these entities.
    pub selected_entities: Option<Vec<String>>,
    pub show_no_data_area: bool,
}

impl Default for MarimekkoConfig {
    fn default() -> Self {
        Self {
            x_column: None,
            y_columns: Vec::new(),
            color_column: None,
            end_time: None,
            tolerance: None,
            tolerance_strategy: ToleranceStrategy::default(),
            sort: SortConfig::default(),
            x_scale: ScaleType::default(),
            no_data_height: DEFAULT_NO_DATA_HEIGHT,
            label_padding: DEFAULT_LABEL_PADDING,
            label_font_px: DEFAULT_LABEL_FONT_PX,
            label_no_data_entities: false,
            focused_entities: Vec::new(),
            selected_entities: None,
            show_no_data_area: true,
        }
    }
}

impl MarimekkoConfig {
    pub fn new(x_column: &str, y_columns: &[&str]) -> Self {
        Self {
            x_column: Some(x_column.to_string()),
            y_columns: y_columns.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }

    /// Load a config from a JSON file; missing keys take their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let s = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let cfg: Self = serde_json::from_str(&s)
            .with_context(|| format!("parse config {}", path.display()))?;
        Ok(cfg)
    }

    /// Check numeric layout constants.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let checks = [
            ("no_data_height", self.no_data_height),
            ("label_padding", self.label_padding),
            ("label_font_px", self.label_font_px),
        ];
        for (name, v) in checks {
            if !v.is_finite() || v < 0.0 {
                return Err(LayoutError::InvalidConfig(format!(
                    "{name} must be a non-negative number, got {v}"
                )));
            }
        }
        Ok(())
    }

    pub fn is_focused(&self, entity: &str) -> bool {
        self.focused_entities.is_empty() || self.focused_entities.iter().any(|e| e == entity)
    }

    pub fn is_selected(&self, entity: &str) -> bool {
        match &self.selected_entities {
            Some(sel) => sel.iter().any(|e| e == entity),
            None => true,
        }
    }
}
