// Copyright The Brickwork Authors
// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::{Deserialize, Serialize};

use super::Height;

/// Position of an item in the balancer's item list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemId(pub usize);

/// A placeable unit. Its height is fixed for the item's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub height: Height,
}

impl Item {
    pub fn new(id: ItemId, height: Height) -> Self {
        Item { id, height }
    }
}

/// Builds items with ids matching their position in `heights`.
pub fn items_from_heights(heights: impl IntoIterator<Item = Height>) -> Vec<Item> {
    heights.into_iter().enumerate().map(|(idx, h)| Item::new(ItemId(idx), h)).collect()
}
