use crate::style::Rgb8;
use serde::{Deserialize, Serialize};

/// Time steps are whole units (typically years).
pub type Time = i32;

/// A single cell: numeric for x/y columns, text for categorical (color) columns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Numeric value, if this cell holds a finite number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(v) if v.is_finite() => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s.as_str()),
            CellValue::Number(_) => None,
        }
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Number(v)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

/// Tidy structure used by this crate (one row = one observation of one column).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Observation {
    pub entity: String,
    pub time: Time,
    pub column: String,
    pub value: Option<CellValue>,
}

impl Observation {
    pub fn number(entity: &str, time: Time, column: &str, value: f64) -> Self {
        Self {
            entity: entity.to_string(),
            time,
            column: column.to_string(),
            value: Some(CellValue::Number(value)),
        }
    }

    pub fn text(entity: &str, time: Time, column: &str, value: &str) -> Self {
        Self {
            entity: entity.to_string(),
            time,
            column: column.to_string(),
            value: Some(CellValue::Text(value.to_string())),
        }
    }
}

/// One x-axis observation for an entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimplePoint {
    pub value: f64,
    pub entity: String,
    /// Time the value was actually observed at (may differ from the target time).
    pub time: Time,
}

impl SimplePoint {
    pub fn is_interpolated(&self, target: Time) -> bool {
        self.time != target
    }
}

/// One stacked y observation: `value_offset` is the sum of the previous series' values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StackedPoint {
    pub position: String,
    pub value: f64,
    pub value_offset: f64,
    pub time: Time,
}

impl StackedPoint {
    /// Upper end of this segment in value space.
    pub fn top(&self) -> f64 {
        self.value_offset + self.value
    }

    pub fn is_interpolated(&self, target: Time) -> bool {
        self.time != target
    }
}

/// A bar segment backed by data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataBar {
    pub color: Rgb8,
    pub series_name: String,
    pub column_slug: String,
    pub y_point: StackedPoint,
}

/// Fixed-height stand-in for an entity with an x value but no y data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BarPlaceholder {
    pub series_name: String,
    /// Pixel height of the column.
    pub height: f64,
}

/// What gets drawn in a column.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind")]
pub enum Bar {
    Bar(DataBar),
    BarPlaceholder(BarPlaceholder),
}

/// One entity's column before placement.
///
/// `bars` only ever holds data-backed segments; an entity with an x value but no y data has an
/// empty `bars` and is drawn through [`Item::render_bars`] as a placeholder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub entity_name: String,
    pub short_entity_name: Option<String>,
    pub entity_color: Option<Rgb8>,
    pub bars: Vec<DataBar>,
    pub x_point: Option<SimplePoint>,
    pub focus: bool,
}

impl Item {
    pub fn has_data(&self) -> bool {
        !self.bars.is_empty()
    }

    /// Top of the stack in value space, 0 for entities without bars.
    pub fn total(&self) -> f64 {
        self.bars.last().map(|b| b.y_point.top()).unwrap_or(0.0)
    }

    /// Value of one series, if the entity has a bar for it.
    pub fn series_value(&self, column_slug: &str) -> Option<f64> {
        self.bars
            .iter()
            .find(|b| b.column_slug == column_slug)
            .map(|b| b.y_point.value)
    }

    /// Text shown in labels: short name when available.
    pub fn label_text(&self) -> &str {
        self.short_entity_name
            .as_deref()
            .unwrap_or(self.entity_name.as_str())
    }

    /// Bars to draw; a single placeholder of `no_data_height` when there is no y data.
    pub fn render_bars(&self, no_data_height: f64) -> Vec<Bar> {
        if self.bars.is_empty() {
            vec![Bar::BarPlaceholder(BarPlaceholder {
                series_name: self.entity_name.clone(),
                height: no_data_height,
            })]
        } else {
            self.bars.iter().cloned().map(Bar::Bar).collect()
        }
    }
}

/// An [`Item`] with its final horizontal placement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlacedItem {
    #[serde(flatten)]
    pub item: Item,
    /// Left pixel offset from the start of the x range.
    pub x_position: f64,
    /// Pixel width of the column.
    pub bar_width: f64,
    /// Paint order: focused items are drawn above the rest.
    pub z_index: i32,
}

impl PlacedItem {
    pub fn right(&self) -> f64 {
        self.x_position + self.bar_width
    }
}
