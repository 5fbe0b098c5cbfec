// Copyright The Brickwork Authors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Defines the [`Balancer`] actor.

use thiserror::Error;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, error, info, instrument, trace, warn};

use super::throttle::Throttle;
use crate::actor;
use crate::config::{self, Config};
use crate::model::{
    Column, ColumnId, HeightError, Item, ItemId, LayoutError, LayoutPlan, active_count,
    compute_layout, should_relayout,
};
use crate::sys::host::{Host, Viewport, commit};

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The viewport was resized. Hosts send one of these for every raw resize
    /// event; the balancer does its own rate limiting.
    Resized(Viewport),
}

pub type Sender = actor::Sender<Event>;
pub type Receiver = actor::Receiver<Event>;

#[derive(Debug, Error)]
pub enum BalancerError {
    #[error("item {index} has an invalid height")]
    InvalidHeight {
        index: usize,
        #[source]
        source: HeightError,
    },
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeResponse {
    /// The number of visible columns did not change; nothing was touched.
    Unchanged,
    /// The layout was recomputed and committed.
    Relaid,
}

/// Actor that keeps one set of columns balanced.
///
/// The balancer reads column visibility and item heights from its [`Host`],
/// plans placements with [`compute_layout`] and writes them back with
/// [`commit`]. Item heights are read once; column visibility is read again
/// on every resize check, and a new layout is committed only when the number
/// of visible columns changed.
pub struct Balancer<H: Host> {
    host: H,
    column_handles: Vec<H::Column>,
    item_handles: Vec<H::Item>,
    columns: Vec<Column>,
    items: Vec<Item>,
    plan: Option<LayoutPlan>,
    passes: usize,
    resize: config::Resize,
}

impl<H: Host> Balancer<H> {
    /// Reads columns and items from the host and commits the initial layout.
    pub fn new(
        host: H,
        column_handles: Vec<H::Column>,
        item_handles: Vec<H::Item>,
        config: &Config,
    ) -> Result<Self, BalancerError> {
        let heights = &config.settings.heights;
        let items = item_handles
            .iter()
            .enumerate()
            .map(|(index, handle)| {
                let attr = host.height_attr(handle);
                heights
                    .resolve(attr.as_deref())
                    .map(|height| Item::new(ItemId(index), height))
                    .map_err(|source| BalancerError::InvalidHeight { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut this = Balancer {
            host,
            column_handles,
            item_handles,
            columns: Vec::new(),
            items,
            plan: None,
            passes: 0,
            resize: config.settings.resize.clone(),
        };
        this.columns = this.read_columns();
        debug!(
            columns = this.columns.len(),
            active = this.active_count(),
            items = this.items.len(),
            "Initial layout"
        );
        this.layout()?;
        Ok(this)
    }

    fn read_columns(&self) -> Vec<Column> {
        self.column_handles
            .iter()
            .enumerate()
            .map(|(idx, handle)| Column::from_display(ColumnId(idx), &self.host.display(handle)))
            .collect()
    }

    pub fn active_count(&self) -> usize {
        active_count(&self.columns)
    }

    /// The current column records.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// The last plan that was committed.
    pub fn plan(&self) -> Option<&LayoutPlan> {
        self.plan.as_ref()
    }

    /// Number of layout passes committed so far, including the initial one.
    pub fn passes(&self) -> usize {
        self.passes
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Rechecks column visibility and lays out again if the number of
    /// visible columns changed.
    #[instrument(skip(self))]
    pub fn handle_resize(&mut self, viewport: Viewport) -> Result<ResizeResponse, LayoutError> {
        self.host.viewport_changed(viewport);
        let old_active = self.active_count();
        self.columns = self.read_columns();
        let new_active = self.active_count();
        if !should_relayout(old_active, new_active) {
            debug!(active = new_active, "Visible column count unchanged");
            return Ok(ResizeResponse::Unchanged);
        }
        info!(old_active, new_active, "Visible column count changed");
        self.layout()?;
        Ok(ResizeResponse::Relaid)
    }

    /// Plans a layout from the current column records and commits it.
    pub fn layout(&mut self) -> Result<(), LayoutError> {
        let plan = compute_layout(&self.columns, &self.items)?;
        let failures = commit(&mut self.host, &self.column_handles, &self.item_handles, &plan);
        if !failures.is_empty() {
            warn!(failed = failures.len(), "Layout committed partially");
        }
        self.columns = plan.columns().to_vec();
        self.plan = Some(plan);
        self.passes += 1;
        Ok(())
    }

    fn on_resize(&mut self, viewport: Viewport) {
        if let Err(e) = self.handle_resize(viewport) {
            error!(error = %e, "Layout pass failed");
        }
    }

    /// Processes events until every sender is dropped, then returns the
    /// balancer.
    ///
    /// Resize events are throttled by the configured delay. A check that is
    /// pending when the channel closes still runs once its delay is up.
    pub async fn run(mut self, mut events: Receiver) -> Self {
        let mut throttle = Throttle::new(self.resize.delay(), self.resize.trailing_args);
        loop {
            let deadline = throttle.deadline();
            tokio::select! {
                biased;
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    if let Some(viewport) = throttle.fire(Instant::now()) {
                        self.on_resize(viewport);
                    }
                }
                event = events.recv() => {
                    let Some((span, event)) = event else { break };
                    let _guard = span.enter();
                    match event {
                        Event::Resized(viewport) => {
                            if let Some(at) = throttle.call(Instant::now(), viewport) {
                                trace!(?at, "Scheduled resize check");
                            }
                        }
                    }
                }
            }
        }

        if let Some(deadline) = throttle.deadline() {
            sleep_until(deadline).await;
            if let Some(viewport) = throttle.fire(deadline) {
                self.on_resize(viewport);
            }
        }
        self
    }
}
