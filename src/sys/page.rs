// Copyright The Brickwork Authors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Page documents.
//!
//! A page describes the column containers and item containers of a layout
//! in TOML, so it can be loaded into a [`MemoryHost`]:
//!
//! ```toml
//! [viewport]
//! width = 1200
//! height = 800
//!
//! [[columns]]
//! name = "left"
//!
//! [[columns]]
//! name = "right"
//! hide_below = 700
//!
//! [[items]]
//! name = "cat"
//! height = "240"
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};

use super::host::Viewport;
use super::memory::{ColumnKey, ItemKey, MemoryHost};
use crate::collections::HashMap;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Page {
    #[serde(default = "default_viewport")]
    pub viewport: Viewport,
    #[serde(default)]
    pub columns: Vec<PageColumn>,
    #[serde(default)]
    pub items: Vec<PageItem>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PageColumn {
    pub name: String,
    #[serde(default = "default_display")]
    pub display: String,
    #[serde(default)]
    pub hide_below: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PageItem {
    pub name: String,
    /// Kept as a string, like a `data-height` attribute, so invalid values
    /// reach the height policy instead of failing to parse here.
    #[serde(default)]
    pub height: Option<String>,
}

fn default_viewport() -> Viewport {
    Viewport::new(1024.0, 768.0)
}

fn default_display() -> String {
    "block".into()
}

/// A page loaded into a [`MemoryHost`], with handles in document order.
pub struct LoadedPage {
    pub host: MemoryHost,
    pub columns: Vec<ColumnKey>,
    pub items: Vec<ItemKey>,
}

impl Page {
    pub fn read(path: &Path) -> anyhow::Result<Page> {
        let buf = fs::read_to_string(path)
            .with_context(|| format!("Could not read page {}", path.display()))?;
        Self::parse(&buf).with_context(|| format!("Could not parse page {}", path.display()))
    }

    pub fn parse(buf: &str) -> anyhow::Result<Page> {
        let page: Page = toml::from_str(buf)?;
        page.check_names()?;
        Ok(page)
    }

    fn check_names(&self) -> anyhow::Result<()> {
        let mut seen = HashMap::default();
        for (kind, name) in self
            .columns
            .iter()
            .map(|c| ("column", &c.name))
            .chain(self.items.iter().map(|i| ("item", &i.name)))
        {
            if let Some(prev) = seen.insert(name.as_str(), kind) {
                bail!("Duplicate name {name:?} (used by a {prev} and a {kind})");
            }
        }
        Ok(())
    }

    pub fn load(&self) -> LoadedPage {
        let mut host = MemoryHost::new(self.viewport);
        let columns = self
            .columns
            .iter()
            .map(|c| host.add_column(&c.name, &c.display, c.hide_below))
            .collect();
        let items =
            self.items.iter().map(|i| host.add_item(&i.name, i.height.as_deref())).collect();
        LoadedPage { host, columns, items }
    }
}
