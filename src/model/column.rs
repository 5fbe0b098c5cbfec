// Copyright The Brickwork Authors
// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::{Deserialize, Serialize};

use super::item::{Item, ItemId};

/// Position of a column in the balancer's column list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ColumnId(pub usize);

/// The display value that marks a column as hidden.
pub const HIDDEN_DISPLAY: &str = "none";

/// Whether a column with the given resolved display style takes part in
/// layout.
pub fn is_visible(display: &str) -> bool {
    display != HIDDEN_DISPLAY
}

/// A layout bucket.
///
/// Records are rebuilt from scratch whenever visibility has to be checked
/// again, so `items` and `height` only ever describe a single layout pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub active: bool,
    pub items: Vec<ItemId>,
    pub height: f64,
}

impl Column {
    pub fn new(id: ColumnId, active: bool) -> Self {
        Column {
            id,
            active,
            items: Vec::new(),
            height: 0.0,
        }
    }

    /// Builds a column from the host's resolved display style.
    pub fn from_display(id: ColumnId, display: &str) -> Self {
        Column::new(id, is_visible(display))
    }

    pub(crate) fn stage(&mut self, item: &Item) {
        self.items.push(item.id);
        self.height = self.height + item.height;
    }
}

/// Number of active columns in `columns`.
pub fn active_count(columns: &[Column]) -> usize {
    columns.iter().filter(|c| c.active).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Height;

    #[test]
    fn only_none_hides_a_column() {
        assert!(!is_visible("none"));
        assert!(is_visible("block"));
        assert!(is_visible("flex"));
        assert!(is_visible(""));
        assert!(is_visible("None"));
    }

    #[test]
    fn staging_accumulates_height() {
        let mut column = Column::new(ColumnId(0), true);
        column.stage(&Item::new(ItemId(0), Height::new(10.0).unwrap()));
        column.stage(&Item::new(ItemId(1), Height::new(2.5).unwrap()));
        assert_eq!(column.items, vec![ItemId(0), ItemId(1)]);
        assert_eq!(column.height, 12.5);
    }

    #[test]
    fn hidden_display_makes_a_column_inactive() {
        let column = Column::from_display(ColumnId(3), "none");
        assert!(!column.active);
        assert_eq!(active_count(&[column, Column::new(ColumnId(4), true)]), 1);
    }
}
