use std::collections::VecDeque;

use tokio::sync::broadcast;

use crate::events::types::{EngineEvent, ExternalAck, LifecycleEvent, OrderedLifecycleEvent};

const MAX_RECENT_EVENTS: usize = 256;

/// Fans lifecycle events out to subscribers. Publishing is fire-and-forget:
/// lifecycle correctness never depends on a subscriber receiving anything,
/// so a lagging or absent receiver is ignored. A bounded ring of recent
/// events lets late subscribers catch up.
#[derive(Debug)]
pub struct EventEmitter {
    seq_no: u64,
    recent: VecDeque<OrderedLifecycleEvent>,
    tx: broadcast::Sender<EngineEvent>,
}

impl EventEmitter {
    pub fn new(channel_capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(channel_capacity.max(1));
        Self {
            seq_no: 0,
            recent: VecDeque::new(),
            tx,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.tx.subscribe()
    }

    pub fn emit(&mut self, event: LifecycleEvent) -> u64 {
        self.seq_no = self.seq_no.saturating_add(1);
        let ordered = OrderedLifecycleEvent {
            seq_no: self.seq_no,
            event,
        };

        self.recent.push_back(ordered.clone());
        while self.recent.len() > MAX_RECENT_EVENTS {
            self.recent.pop_front();
        }

        let _ = self.tx.send(EngineEvent::Lifecycle(ordered));
        self.seq_no
    }

    pub fn publish_ack(&self, ack: ExternalAck) {
        let _ = self.tx.send(EngineEvent::Ack(ack));
    }

    pub fn recent(&self) -> impl Iterator<Item = &OrderedLifecycleEvent> {
        self.recent.iter()
    }

    pub fn last_seq_no(&self) -> u64 {
        self.seq_no
    }
}

impl Default for EventEmitter {
    fn default() -> Self {
        Self::new(MAX_RECENT_EVENTS)
    }
}
