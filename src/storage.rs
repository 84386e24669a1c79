//! Loading tables and exporting computed layouts.
//!
//! CSV input comes in two shapes, detected from the header:
//! - wide: `entity,time,<column>,<column>,...` (`year` is accepted for `time`)
//! - long/tidy: `entity,time,column,value`
//!
//! An optional `short_name` column sets short entity names in either shape.

use crate::layout::MarimekkoLayout;
use crate::models::{CellValue, Observation, Time};
use crate::table::{ColumnDef, Table};
use anyhow::{Context, Result, bail};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

fn parse_cell(raw: &str) -> Option<CellValue> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    match s.parse::<f64>() {
        Ok(v) => Some(CellValue::Number(v)),
        Err(_) => Some(CellValue::Text(s.to_string())),
    }
}

fn find_header(headers: &StringRecord, names: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)))
}

/// Load a wide or long CSV file into a [`Table`].
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Table> {
    let path = path.as_ref();
    let mut rdr = ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("open {}", path.display()))?;
    let headers = rdr.headers().context("read csv header")?.clone();

    let Some(entity_idx) = find_header(&headers, &["entity", "entity_name", "country"]) else {
        bail!("csv has no entity column: {}", path.display());
    };
    let Some(time_idx) = find_header(&headers, &["time", "year"]) else {
        bail!("csv has no time/year column: {}", path.display());
    };
    let short_idx = find_header(&headers, &["short_name", "short_entity_name"]);
    let long = match (
        find_header(&headers, &["column"]),
        find_header(&headers, &["value"]),
    ) {
        (Some(c), Some(v)) => Some((c, v)),
        _ => None,
    };

    let mut table = Table::new();
    for (line, record) in rdr.records().enumerate() {
        let record = record.with_context(|| format!("read csv record {}", line + 1))?;
        let entity = record.get(entity_idx).unwrap_or("").to_string();
        if entity.is_empty() {
            log::warn!("skipping csv record {}: empty entity", line + 1);
            continue;
        }
        let time: Time = match record.get(time_idx).map(|s| s.parse::<Time>()) {
            Some(Ok(t)) => t,
            _ => {
                log::warn!("skipping csv record {}: invalid time", line + 1);
                continue;
            }
        };
        if let Some(short) = short_idx.and_then(|i| record.get(i))
            && !short.is_empty()
        {
            table.set_short_name(&entity, short);
        }

        match long {
            Some((column_idx, value_idx)) => {
                let column = record.get(column_idx).unwrap_or("").to_string();
                if column.is_empty() {
                    log::warn!("skipping csv record {}: empty column name", line + 1);
                    continue;
                }
                table.push(Observation {
                    entity,
                    time,
                    column,
                    value: record.get(value_idx).and_then(parse_cell),
                });
            }
            None => {
                for (i, header) in headers.iter().enumerate() {
                    if i == entity_idx || i == time_idx || Some(i) == short_idx {
                        continue;
                    }
                    table.push(Observation {
                        entity: entity.clone(),
                        time,
                        column: header.trim().to_string(),
                        value: record.get(i).and_then(parse_cell),
                    });
                }
            }
        }
    }
    Ok(table)
}

/// Load a JSON array of [`Observation`]s.
pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Table> {
    let path = path.as_ref();
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let rows: Vec<Observation> =
        serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))?;
    Ok(Table::from_observations(rows))
}

/// Load by extension: `.json` as observations, anything else as CSV.
pub fn load_table<P: AsRef<Path>>(path: P) -> Result<Table> {
    let path = path.as_ref();
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => load_json(path),
        _ => load_csv(path),
    }
}

/// Apply column metadata (names, units, tolerances, colors) from a JSON array of [`ColumnDef`].
pub fn apply_column_defs<P: AsRef<Path>>(table: &mut Table, path: P) -> Result<()> {
    let path = path.as_ref();
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let defs: Vec<ColumnDef> =
        serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))?;
    for def in defs {
        table.upsert_column(def);
    }
    Ok(())
}

/// Save the whole layout as pretty JSON.
pub fn save_layout_json<P: AsRef<Path>>(layout: &MarimekkoLayout, path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(layout)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

/// Save placed columns as CSV with header.
pub fn save_placed_csv<P: AsRef<Path>>(layout: &MarimekkoLayout, path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.serialize((
        "entity",
        "x_value",
        "x_position",
        "bar_width",
        "y_total",
        "bar_count",
    ))?;
    for p in &layout.placed_items {
        wtr.serialize((
            &p.item.entity_name,
            p.item.x_point.as_ref().map(|x| x.value),
            p.x_position,
            p.bar_width,
            p.item.total(),
            p.item.bars.len(),
        ))?;
    }
    wtr.flush()?;
    Ok(())
}
