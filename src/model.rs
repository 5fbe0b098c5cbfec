// Copyright The Brickwork Authors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! This module defines the column and item records and the pure
//! [`compute_layout`][layout::compute_layout] planner on which all placement
//! logic is defined.

mod column;
mod height;
mod item;
pub mod layout;

pub use column::{Column, ColumnId, HIDDEN_DISPLAY, active_count, is_visible};
pub use height::{Height, HeightError};
pub use item::{Item, ItemId, items_from_heights};
pub use layout::{LayoutError, LayoutPlan, compute_layout, should_relayout};
