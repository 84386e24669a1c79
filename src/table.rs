//! Column-oriented view over tidy observations, with tolerance-based lookups.
//!
//! Entities keep the order in which they first appear in the input; that order is the
//! "table iteration order" every later stage relies on for stable tie-breaking.

use crate::models::{CellValue, Observation, Time};
use crate::style::Rgb8;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which neighbouring observations may stand in for a missing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToleranceStrategy {
    /// Nearest in either direction; ties go to the later observation.
    #[default]
    Closest,
    /// Only observations at or before the target time.
    Backwards,
    /// Only observations at or after the target time.
    Forwards,
}

/// Column metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ColumnDef {
    pub slug: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    /// Maximum number of time steps to search for a substitute value.
    #[serde(default)]
    pub tolerance: u32,
    /// Fixed series color; overrides the palette when set.
    #[serde(default)]
    pub color: Option<Rgb8>,
}

impl ColumnDef {
    pub fn new(slug: &str) -> Self {
        Self {
            slug: slug.to_string(),
            name: None,
            unit: None,
            tolerance: 0,
            color: None,
        }
    }

    pub fn with_tolerance(mut self, tolerance: u32) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.slug.as_str())
    }
}

/// A value together with the time it was actually observed at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolved<V> {
    pub value: V,
    pub time: Time,
}

#[derive(Debug, Clone, Default)]
pub struct Table {
    entities: Vec<String>,
    entity_index: AHashMap<String, usize>,
    short_names: AHashMap<String, String>,
    columns: Vec<ColumnDef>,
    column_index: AHashMap<String, usize>,
    // (column idx, entity idx) -> time -> value
    cells: AHashMap<(usize, usize), BTreeMap<Time, CellValue>>,
    rows: usize,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from tidy rows; columns are created on first sight with tolerance 0.
    pub fn from_observations<I>(observations: I) -> Self
    where
        I: IntoIterator<Item = Observation>,
    {
        let mut table = Self::new();
        for obs in observations {
            table.push(obs);
        }
        table
    }

    /// Register (or replace) column metadata.
    pub fn with_column(mut self, def: ColumnDef) -> Self {
        self.upsert_column(def);
        self
    }

    pub fn upsert_column(&mut self, def: ColumnDef) {
        match self.column_index.get(&def.slug) {
            Some(&idx) => self.columns[idx] = def,
            None => {
                self.column_index.insert(def.slug.clone(), self.columns.len());
                self.columns.push(def);
            }
        }
    }

    /// Add one observation. Missing and non-finite values are dropped; the entity is still
    /// registered so it keeps its position in iteration order.
    pub fn push(&mut self, obs: Observation) {
        let entity_idx = self.entity_idx_or_insert(&obs.entity);
        let column_idx = match self.column_index.get(&obs.column) {
            Some(&idx) => idx,
            None => {
                self.upsert_column(ColumnDef::new(&obs.column));
                self.columns.len() - 1
            }
        };
        let Some(value) = obs.value else {
            return;
        };
        if let CellValue::Number(v) = value
            && !v.is_finite()
        {
            log::warn!(
                "dropping non-finite value for {} / {} @ {}",
                obs.entity,
                obs.column,
                obs.time
            );
            return;
        }
        let replaced = self
            .cells
            .entry((column_idx, entity_idx))
            .or_default()
            .insert(obs.time, value);
        if replaced.is_none() {
            self.rows += 1;
        }
    }

    pub fn set_short_name(&mut self, entity: &str, short: &str) {
        self.entity_idx_or_insert(entity);
        self.short_names
            .insert(entity.to_string(), short.to_string());
    }

    fn entity_idx_or_insert(&mut self, entity: &str) -> usize {
        if let Some(&idx) = self.entity_index.get(entity) {
            return idx;
        }
        let idx = self.entities.len();
        self.entities.push(entity.to_string());
        self.entity_index.insert(entity.to_string(), idx);
        idx
    }

    /// Entity names in iteration order.
    pub fn entity_names(&self) -> &[String] {
        &self.entities
    }

    pub fn short_name(&self, entity: &str) -> Option<&str> {
        self.short_names.get(entity).map(|s| s.as_str())
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn column(&self, slug: &str) -> Option<&ColumnDef> {
        self.column_index.get(slug).map(|&i| &self.columns[i])
    }

    pub fn has_column(&self, slug: &str) -> bool {
        self.column_index.contains_key(slug)
    }

    /// Number of stored (non-missing) cells.
    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Distinct times with a value in `slug`, ascending.
    pub fn times(&self, slug: &str) -> Vec<Time> {
        let Some(&col) = self.column_index.get(slug) else {
            return Vec::new();
        };
        let mut times: Vec<Time> = self
            .cells
            .iter()
            .filter(|((c, _), _)| *c == col)
            .flat_map(|(_, by_time)| by_time.keys().copied())
            .collect();
        times.sort_unstable();
        times.dedup();
        times
    }

    pub fn max_time(&self, slug: &str) -> Option<Time> {
        self.times(slug).last().copied()
    }

    /// Value of `slug` for `entity` at `target`, or the nearest one within `tolerance` steps.
    pub fn resolve(
        &self,
        entity: &str,
        slug: &str,
        target: Time,
        tolerance: u32,
        strategy: ToleranceStrategy,
    ) -> Option<Resolved<&CellValue>> {
        let col = *self.column_index.get(slug)?;
        let ent = *self.entity_index.get(entity)?;
        let by_time = self.cells.get(&(col, ent))?;
        if let Some(v) = by_time.get(&target) {
            return Some(Resolved {
                value: v,
                time: target,
            });
        }

        let tol = i32::try_from(tolerance).unwrap_or(i32::MAX);
        let lo = target.saturating_sub(tol);
        let hi = target.saturating_add(tol);
        let prev = match strategy {
            ToleranceStrategy::Forwards => None,
            _ => by_time.range(lo..=target).next_back(),
        };
        let next = match strategy {
            ToleranceStrategy::Backwards => None,
            _ => by_time.range(target..=hi).next(),
        };

        let pick = match (prev, next) {
            (Some(p), Some(n)) => {
                let prev_dist = i64::from(target) - i64::from(*p.0);
                let next_dist = i64::from(*n.0) - i64::from(target);
                if next_dist <= prev_dist { n } else { p }
            }
            (Some(p), None) => p,
            (None, Some(n)) => n,
            (None, None) => return None,
        };
        Some(Resolved {
            value: pick.1,
            time: *pick.0,
        })
    }

    /// Numeric lookup; text cells count as missing.
    pub fn number_at(
        &self,
        entity: &str,
        slug: &str,
        target: Time,
        tolerance: u32,
        strategy: ToleranceStrategy,
    ) -> Option<Resolved<f64>> {
        let r = self.resolve(entity, slug, target, tolerance, strategy)?;
        Some(Resolved {
            value: r.value.as_number()?,
            time: r.time,
        })
    }

    /// Categorical lookup; numbers are rendered to text.
    pub fn text_at(
        &self,
        entity: &str,
        slug: &str,
        target: Time,
        tolerance: u32,
        strategy: ToleranceStrategy,
    ) -> Option<Resolved<String>> {
        let r = self.resolve(entity, slug, target, tolerance, strategy)?;
        let value = match r.value {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(v) => v.to_string(),
        };
        Some(Resolved {
            value,
            time: r.time,
        })
    }
}
