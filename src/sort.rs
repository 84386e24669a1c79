//! Column ordering.
//!
//! Sorting is stable in both directions: equal keys keep table iteration order, also for
//! descending sorts. Entities without bars always trail, in their sorted relative order, so
//! the no-data region is one contiguous run at the right end.

use crate::models::Item;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    /// Height of the full stack.
    #[default]
    Total,
    /// Value of one series (`sort_column_slug`); entities without it count as 0.
    Column,
    /// Lexicographic by entity name.
    EntityName,
    /// Table iteration order.
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SortConfig {
    pub sort_by: SortBy,
    pub sort_column_slug: Option<String>,
    pub sort_order: SortOrder,
}

impl SortConfig {
    pub fn new(sort_by: SortBy, sort_order: SortOrder) -> Self {
        Self {
            sort_by,
            sort_column_slug: None,
            sort_order,
        }
    }

    pub fn by_column(slug: &str, sort_order: SortOrder) -> Self {
        Self {
            sort_by: SortBy::Column,
            sort_column_slug: Some(slug.to_string()),
            sort_order,
        }
    }
}

enum SortKey<'a> {
    Number(f64),
    Text(&'a str),
    Unit,
}

impl SortKey<'_> {
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

fn sort_key<'a>(item: &'a Item, config: &SortConfig) -> SortKey<'a> {
    match config.sort_by {
        SortBy::Total => SortKey::Number(item.total()),
        SortBy::Column => match config.sort_column_slug.as_deref() {
            Some(slug) => SortKey::Number(item.series_value(slug).unwrap_or(0.0)),
            None => SortKey::Number(item.total()),
        },
        SortBy::EntityName => SortKey::Text(item.entity_name.as_str()),
        SortBy::Custom => SortKey::Unit,
    }
}

/// Order items for display: by the configured key, then entities without bars last.
pub fn sort_items(items: Vec<Item>, config: &SortConfig) -> Vec<Item> {
    if config.sort_by == SortBy::Column && config.sort_column_slug.is_none() {
        log::debug!("column sort without a sort column; sorting by total");
    }

    let mut keyed: Vec<(SortKey<'_>, &Item)> =
        items.iter().map(|item| (sort_key(item, config), item)).collect();
    keyed.sort_by(|(a, _), (b, _)| match config.sort_order {
        SortOrder::Asc => a.compare(b),
        SortOrder::Desc => b.compare(a),
    });

    let (with_data, without_data): (Vec<&Item>, Vec<&Item>) =
        keyed.into_iter().map(|(_, item)| item).partition(|item| item.has_data());

    with_data
        .into_iter()
        .chain(without_data)
        .cloned()
        .collect()
}
