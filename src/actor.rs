// Copyright The Brickwork Authors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Event-driven layer around the pure planner.
//!
//! The [`Balancer`][balancer::Balancer] owns the layout state for one set of
//! columns. Hosts feed it events over a channel; each event carries the
//! tracing span it was sent from so the handler logs under the caller.

use tokio::sync::mpsc::error::SendError;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::Span;

pub mod balancer;
pub mod throttle;

pub struct Sender<Event>(UnboundedSender<(Span, Event)>);
pub type Receiver<Event> = UnboundedReceiver<(Span, Event)>;

pub fn channel<Event>() -> (Sender<Event>, Receiver<Event>) {
    let (tx, rx) = unbounded_channel();
    (Sender(tx), rx)
}

impl<Event> Sender<Event> {
    /// Sends an event, ignoring a closed receiver. The only reason for one is
    /// that the balancer has stopped.
    pub fn send(&self, event: Event) {
        _ = self.try_send(event)
    }

    pub fn try_send(&self, event: Event) -> Result<(), SendError<(Span, Event)>> {
        self.0.send((Span::current(), event))
    }
}

impl<Event> Clone for Sender<Event> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}
