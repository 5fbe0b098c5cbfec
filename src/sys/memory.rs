// Copyright The Brickwork Authors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! An in-memory [`Host`].
//!
//! Columns may carry a `hide_below` breakpoint, which hides them while the
//! viewport is narrower than the breakpoint, the way a media query would.
//! Appending moves items between columns like DOM node insertion does.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

use super::host::{Host, Viewport};
use crate::collections::HashSet;
use crate::model::HIDDEN_DISPLAY;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColumnKey(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemKey(pub usize);

#[derive(Debug, Error, PartialEq)]
pub enum MemoryHostError {
    #[error("unknown column {0:?}")]
    UnknownColumn(ColumnKey),
    #[error("unknown item {0:?}")]
    UnknownItem(ItemKey),
    #[error("append to column {0:?} was rejected")]
    AppendRejected(ColumnKey),
}

#[derive(Debug, Clone)]
struct MemoryColumn {
    name: String,
    display: String,
    hide_below: Option<f64>,
    children: Vec<ItemKey>,
}

#[derive(Debug, Clone)]
struct MemoryItem {
    name: String,
    height_attr: Option<String>,
}

/// One successful `append_children` call.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitRecord {
    pub column: ColumnKey,
    pub items: Vec<ItemKey>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    viewport: Viewport,
    columns: Vec<MemoryColumn>,
    items: Vec<MemoryItem>,
    commits: Vec<CommitRecord>,
    rejecting: HashSet<ColumnKey>,
}

impl MemoryHost {
    pub fn new(viewport: Viewport) -> Self {
        MemoryHost { viewport, ..Default::default() }
    }

    pub fn add_column(&mut self, name: &str, display: &str, hide_below: Option<f64>) -> ColumnKey {
        self.columns.push(MemoryColumn {
            name: name.to_owned(),
            display: display.to_owned(),
            hide_below,
            children: Vec::new(),
        });
        ColumnKey(self.columns.len() - 1)
    }

    pub fn add_item(&mut self, name: &str, height_attr: Option<&str>) -> ItemKey {
        self.items.push(MemoryItem {
            name: name.to_owned(),
            height_attr: height_attr.map(str::to_owned),
        });
        ItemKey(self.items.len() - 1)
    }

    pub fn column_keys(&self) -> Vec<ColumnKey> {
        (0..self.columns.len()).map(ColumnKey).collect()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn column_name(&self, column: ColumnKey) -> Option<&str> {
        self.columns.get(column.0).map(|c| c.name.as_str())
    }

    pub fn item_name(&self, item: ItemKey) -> Option<&str> {
        self.items.get(item.0).map(|i| i.name.as_str())
    }

    pub fn children(&self, column: ColumnKey) -> &[ItemKey] {
        self.columns.get(column.0).map(|c| &c.children[..]).unwrap_or_default()
    }

    pub fn children_names(&self, column: ColumnKey) -> Vec<&str> {
        self.children(column).iter().filter_map(|&item| self.item_name(item)).collect()
    }

    /// Every successful append, oldest first.
    pub fn commits(&self) -> &[CommitRecord] {
        &self.commits
    }

    /// Makes every later append to `column` fail.
    pub fn fail_appends(&mut self, column: ColumnKey) {
        self.rejecting.insert(column);
    }

    fn detach(&mut self, item: ItemKey) {
        for column in &mut self.columns {
            column.children.retain(|&child| child != item);
        }
    }
}

impl Host for MemoryHost {
    type Column = ColumnKey;
    type Item = ItemKey;
    type Error = MemoryHostError;

    fn display(&self, column: &ColumnKey) -> String {
        let Some(column) = self.columns.get(column.0) else {
            return HIDDEN_DISPLAY.to_owned();
        };
        match column.hide_below {
            Some(breakpoint) if self.viewport.width < breakpoint => HIDDEN_DISPLAY.to_owned(),
            _ => column.display.clone(),
        }
    }

    fn height_attr(&self, item: &ItemKey) -> Option<String> {
        self.items.get(item.0).and_then(|i| i.height_attr.clone())
    }

    fn append_children(
        &mut self,
        column: &ColumnKey,
        items: &[&ItemKey],
    ) -> Result<(), MemoryHostError> {
        if column.0 >= self.columns.len() {
            return Err(MemoryHostError::UnknownColumn(*column));
        }
        if self.rejecting.contains(column) {
            return Err(MemoryHostError::AppendRejected(*column));
        }
        if let Some(&&missing) = items.iter().find(|item| item.0 >= self.items.len()) {
            return Err(MemoryHostError::UnknownItem(missing));
        }
        for &&item in items {
            self.detach(item);
            self.columns[column.0].children.push(item);
        }
        trace!(column = column.0, count = items.len(), "appended");
        self.commits.push(CommitRecord {
            column: *column,
            items: items.iter().map(|&&item| item).collect(),
        });
        Ok(())
    }

    fn viewport_changed(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }
}
