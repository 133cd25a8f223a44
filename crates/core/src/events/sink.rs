//! Ledger event sinks.

use log::debug;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

use super::LedgerEvent;

/// Receives ledger events after successful mutations.
///
/// `emit` must not block and must not fail the operation that produced the
/// event; delivery is best effort.
pub trait LedgerEventSink: Send + Sync {
    fn emit(&self, event: LedgerEvent);

    fn emit_batch(&self, events: Vec<LedgerEvent>) {
        for event in events {
            self.emit(event);
        }
    }
}

/// Discards every event.
#[derive(Clone, Default)]
pub struct NoOpEventSink;

impl LedgerEventSink for NoOpEventSink {
    fn emit(&self, _event: LedgerEvent) {}
}

/// Keeps emitted events in memory, for tests and diagnostics.
#[derive(Clone, Default)]
pub struct RecordingEventSink {
    events: Arc<Mutex<Vec<LedgerEvent>>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<LedgerEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Returns and forgets everything recorded so far.
    pub fn take(&self) -> Vec<LedgerEvent> {
        self.events
            .lock()
            .map(|mut events| std::mem::take(&mut *events))
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.events.lock().map(|events| events.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LedgerEventSink for RecordingEventSink {
    fn emit(&self, event: LedgerEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

/// Forwards events to an async consumer over an unbounded channel.
#[derive(Clone)]
pub struct ChannelEventSink {
    sender: mpsc::UnboundedSender<LedgerEvent>,
}

impl ChannelEventSink {
    pub fn new(sender: mpsc::UnboundedSender<LedgerEvent>) -> Self {
        Self { sender }
    }

    /// Creates a sink together with the receiving end.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<LedgerEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::new(sender), receiver)
    }
}

impl LedgerEventSink for ChannelEventSink {
    fn emit(&self, event: LedgerEvent) {
        if self.sender.send(event).is_err() {
            debug!("Ledger event receiver dropped; event discarded");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::RecordKind;

    #[test]
    fn recording_sink_collects_and_drains() {
        let sink = RecordingEventSink::new();
        assert!(sink.is_empty());

        sink.emit(LedgerEvent::records_changed(RecordKind::Goal, "g1"));
        sink.emit_batch(vec![
            LedgerEvent::BudgetChanged { category_id: None },
            LedgerEvent::PricesRefreshed { asset_count: 3 },
        ]);

        assert_eq!(sink.len(), 3);
        let drained = sink.take();
        assert_eq!(drained.len(), 3);
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn channel_sink_forwards_events() {
        let (sink, mut receiver) = ChannelEventSink::channel();
        sink.emit(LedgerEvent::records_removed(RecordKind::Expense, "e1"));

        let received = receiver.recv().await.unwrap();
        assert_eq!(received, LedgerEvent::records_removed(RecordKind::Expense, "e1"));
    }

    #[test]
    fn channel_sink_ignores_closed_receiver() {
        let (sink, receiver) = ChannelEventSink::channel();
        drop(receiver);
        sink.emit(LedgerEvent::BudgetChanged { category_id: None });
    }
}
