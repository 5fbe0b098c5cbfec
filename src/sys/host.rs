// Copyright The Brickwork Authors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The interface to whatever owns the column and item containers.

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::model::{ColumnId, LayoutPlan};
use crate::trace_call;

/// Size of the viewport a resize event reported.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Viewport { width, height }
    }
}

/// External collaborator holding the containers being laid out.
///
/// Column and item handles are opaque to the balancer; it only stores them
/// and hands them back to the host.
pub trait Host {
    type Column;
    type Item;
    type Error: std::error::Error;

    /// The resolved `display` style of a column container.
    fn display(&self, column: &Self::Column) -> String;

    /// The raw, string-encoded height attribute of an item container.
    fn height_attr(&self, item: &Self::Item) -> Option<String>;

    /// Appends `items` to `column` in order.
    fn append_children(
        &mut self,
        column: &Self::Column,
        items: &[&Self::Item],
    ) -> Result<(), Self::Error>;

    /// Called before visibility is re-read on a resize. Hosts that read
    /// styles from a live document can ignore this.
    fn viewport_changed(&mut self, _viewport: Viewport) {}
}

/// An append that the host rejected.
#[derive(Debug)]
pub struct CommitFailure<E> {
    pub column: ColumnId,
    pub error: E,
}

/// Writes a staged plan to the host.
///
/// Every active column gets one `append_children` call with all of its staged
/// items; inactive columns and columns with nothing staged are left alone. A
/// failing column does not stop the remaining ones, and all failures are
/// returned.
pub fn commit<H: Host>(
    host: &mut H,
    columns: &[H::Column],
    items: &[H::Item],
    plan: &LayoutPlan,
) -> Vec<CommitFailure<H::Error>> {
    let mut failures = Vec::new();
    for column in plan.active_columns().filter(|c| !c.items.is_empty()) {
        let Some(handle) = columns.get(column.id.0) else {
            error!(column = column.id.0, "plan refers to an unknown column");
            continue;
        };
        let staged: Vec<&H::Item> = column
            .items
            .iter()
            .filter_map(|id| {
                let handle = items.get(id.0);
                if handle.is_none() {
                    error!(column = column.id.0, item = id.0, "plan refers to an unknown item");
                }
                handle
            })
            .collect();
        debug!(column = column.id.0, items = staged.len(), "appending");
        if let Err(error) = trace_call!(host.append_children(handle, &staged)) {
            error!(column = column.id.0, %error, "append failed");
            failures.push(CommitFailure { column: column.id, error });
        }
    }
    failures
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_log::test;

    use super::*;
    use crate::model::{Column, Height, compute_layout, items_from_heights};
    use crate::sys::memory::{MemoryHost, MemoryHostError};

    fn one_each(host: &MemoryHost) -> LayoutPlan {
        let columns: Vec<Column> = host
            .column_keys()
            .into_iter()
            .enumerate()
            .map(|(idx, key)| Column::from_display(ColumnId(idx), &host.display(&key)))
            .collect();
        let items = items_from_heights([Height::new(1.0).unwrap(); 3]);
        compute_layout(&columns, &items).unwrap()
    }

    #[test]
    fn appends_staged_items_per_active_column() {
        let mut host = MemoryHost::new(Viewport::new(1000.0, 800.0));
        let a = host.add_column("a", "block", None);
        let b = host.add_column("b", "none", None);
        let c = host.add_column("c", "block", None);
        let items: Vec<_> = ["x", "y", "z"].iter().map(|n| host.add_item(n, Some("1"))).collect();
        let plan = one_each(&host);

        let failures = commit(&mut host, &[a, b, c], &items, &plan);
        assert!(failures.is_empty());
        assert_eq!(host.children_names(a), vec!["x", "z"]);
        assert!(host.children_names(b).is_empty());
        assert_eq!(host.children_names(c), vec!["y"]);
        assert_eq!(host.commits().len(), 2);
    }

    #[test]
    fn unknown_items_are_skipped() {
        let mut host = MemoryHost::new(Viewport::default());
        let a = host.add_column("a", "block", None);
        let b = host.add_column("b", "block", None);
        let items: Vec<_> = ["x", "y"].iter().map(|n| host.add_item(n, Some("1"))).collect();
        // Three items are planned but only two have handles.
        let plan = one_each(&host);

        let failures = commit(&mut host, &[a, b], &items, &plan);
        assert!(failures.is_empty());
        assert_eq!(host.children_names(a), vec!["x"]);
        assert_eq!(host.children_names(b), vec!["y"]);
    }

    #[test]
    fn failed_append_does_not_block_later_columns() {
        let mut host = MemoryHost::new(Viewport::default());
        let a = host.add_column("a", "block", None);
        let b = host.add_column("b", "block", None);
        let c = host.add_column("c", "block", None);
        let items: Vec<_> = ["x", "y", "z"].iter().map(|n| host.add_item(n, Some("1"))).collect();
        host.fail_appends(a);
        let plan = one_each(&host);

        let failures = commit(&mut host, &[a, b, c], &items, &plan);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].column, ColumnId(0));
        assert!(matches!(failures[0].error, MemoryHostError::AppendRejected(_)));
        assert!(host.children_names(a).is_empty());
        assert_eq!(host.children_names(b), vec!["y"]);
        assert_eq!(host.children_names(c), vec!["z"]);
    }
}
