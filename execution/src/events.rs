//! State-change notifications.
//!
//! Observers are called synchronously, in subscription order, on the thread
//! driving the table.

use std::sync::mpsc::{self, Receiver, Sender};

use croupier_types::roulette::{Amount, Bet, HistoryEntry, Settings};
use serde::Serialize;

use crate::payout::RoundResult;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Event {
    BalanceChanged {
        old: Amount,
        new: Amount,
        /// Cents.
        delta: i64,
    },
    BetPlaced(Bet),
    BetRemoved(Bet),
    BetsCleared(Vec<Bet>),
    RoundStarted {
        bets: Vec<Bet>,
        total_staked: Amount,
    },
    RoundEnded(RoundResult),
    HistoryUpdated {
        entries: Vec<HistoryEntry>,
    },
    SettingsChanged {
        old: Settings,
        new: Settings,
    },
    /// Persistence failed; state lives in memory for the rest of the session.
    StorageDegraded {
        reason: String,
    },
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::BalanceChanged { .. } => "balance_changed",
            Event::BetPlaced(_) => "bet_placed",
            Event::BetRemoved(_) => "bet_removed",
            Event::BetsCleared(_) => "bets_cleared",
            Event::RoundStarted { .. } => "round_started",
            Event::RoundEnded(_) => "round_ended",
            Event::HistoryUpdated { .. } => "history_updated",
            Event::SettingsChanged { .. } => "settings_changed",
            Event::StorageDegraded { .. } => "storage_degraded",
        }
    }
}

pub trait Observer {
    fn notify(&mut self, event: &Event);
}

impl<F: FnMut(&Event)> Observer for F {
    fn notify(&mut self, event: &Event) {
        self(event)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
pub struct EventBus {
    observers: Vec<(SubscriptionId, Box<dyn Observer>)>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: impl Observer + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Returns whether the subscription existed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    pub fn emit(&mut self, event: Event) {
        for (_, observer) in self.observers.iter_mut() {
            observer.notify(&event);
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("observers", &self.observers.len())
            .finish()
    }
}

/// Forwards every event over an mpsc channel.
#[derive(Clone, Debug)]
pub struct ChannelObserver {
    sender: Sender<Event>,
}

impl Observer for ChannelObserver {
    fn notify(&mut self, event: &Event) {
        // A dropped receiver just stops listening.
        let _ = self.sender.send(event.clone());
    }
}

/// An observer plus the receiving end of its channel.
pub fn channel() -> (ChannelObserver, Receiver<Event>) {
    let (sender, receiver) = mpsc::channel();
    (ChannelObserver { sender }, receiver)
}
