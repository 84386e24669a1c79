//! mekko_rs
//!
//! Layout engine for Marimekko charts: variable-width stacked bar charts where each
//! entity gets one column, the column width is proportional to one metric (x) and the
//! column is a stack of segments for one or more other metrics (y).
//!
//! ### Features
//! - Load tidy or wide CSV (or JSON observations) into an in-memory table
//! - Resolve values at a target time with a per-column tolerance
//! - Sort, stack and place contiguous columns; linear or log x axis
//! - Placeholder columns and a single "no data" banner for entities without y values
//! - Greedy label collision removal (earlier columns win)
//! - Render to SVG/PNG, export the layout as JSON or CSV
//!
//! ### Example
//! ```no_run
//! use mekko_rs::{MarimekkoConfig, compute, storage, render};
//!
//! let table = storage::load_table("countries.csv")?;
//! let config = MarimekkoConfig::new("population", &["gdp_per_capita"]);
//! let layout = compute(&table, &config, render::plot_bounds(1000, 600))?;
//! render::render_layout(&layout, "mekko.svg", 1000, 600, "GDP per capita", "en")?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod axis;
pub mod config;
pub mod error;
pub mod extract;
pub mod labels;
pub mod layout;
pub mod models;
pub mod no_data;
pub mod placement;
pub mod render;
pub mod sort;
pub mod stack;
pub mod storage;
pub mod style;
pub mod summary;
pub mod table;
pub mod text;

pub use axis::{Axis, ScaleType};
pub use config::MarimekkoConfig;
pub use error::LayoutError;
pub use labels::Bounds;
pub use layout::{MarimekkoLayout, compute, compute_with_measurer};
pub use models::{Bar, Item, Observation, PlacedItem, Time};
pub use sort::{SortBy, SortConfig, SortOrder};
pub use table::{ColumnDef, Table, ToleranceStrategy};
