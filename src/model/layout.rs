// Copyright The Brickwork Authors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The greedy placement algorithm.
//!
//! Everything here is pure: columns and items go in, a [`LayoutPlan`] comes
//! out. Writing the plan to the host is done separately by
//! [`commit`][crate::sys::host::commit].

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

use super::column::{Column, ColumnId, active_count};
use super::item::{Item, ItemId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("no active columns to place {items} item(s) into ({columns} column(s) total)")]
    NoActiveColumns { columns: usize, items: usize },
}

/// The staged result of a layout pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutPlan {
    columns: Vec<Column>,
}

impl LayoutPlan {
    /// All columns, active or not, in column-list order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn active_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.active)
    }

    pub fn column_of(&self, item: ItemId) -> Option<ColumnId> {
        self.columns.iter().find(|c| c.items.contains(&item)).map(|c| c.id)
    }

    /// The column each staged item was assigned to, sorted by item.
    pub fn assignment(&self) -> Vec<(ItemId, ColumnId)> {
        let mut out: Vec<_> = self
            .columns
            .iter()
            .flat_map(|c| c.items.iter().map(move |&item| (item, c.id)))
            .collect();
        out.sort_unstable();
        out
    }

    pub fn item_count(&self) -> usize {
        self.columns.iter().map(|c| c.items.len()).sum()
    }
}

/// Returns the active column with the smallest accumulated height.
///
/// Ties go to the column that comes first. Returns `None` when no column is
/// active.
pub fn shortest_active_column(columns: &[Column]) -> Option<ColumnId> {
    let mut best: Option<(ColumnId, f64)> = None;
    for column in columns.iter().filter(|c| c.active) {
        match best {
            Some((_, best_height)) if column.height >= best_height => {}
            _ => best = Some((column.id, column.height)),
        }
    }
    best.map(|(id, _)| id)
}

/// Assigns every item to a column, greedily filling the shortest active
/// column first.
///
/// Items are placed in input order, starting from whatever height `columns`
/// already carry. Freshly built columns start at zero.
pub fn compute_layout(columns: &[Column], items: &[Item]) -> Result<LayoutPlan, LayoutError> {
    let mut columns = columns.to_vec();
    let no_active = LayoutError::NoActiveColumns {
        columns: columns.len(),
        items: items.len(),
    };
    if !items.is_empty() && active_count(&columns) == 0 {
        return Err(no_active);
    }
    for item in items {
        let target = shortest_active_column(&columns).ok_or_else(|| no_active.clone())?;
        trace!(item = item.id.0, column = target.0, height = %item.height, "staging item");
        columns[target.0].stage(item);
    }
    Ok(LayoutPlan { columns })
}

/// Whether a change in the number of active columns calls for a new layout
/// pass.
pub fn should_relayout(old_active: usize, new_active: usize) -> bool {
    old_active != new_active
}
