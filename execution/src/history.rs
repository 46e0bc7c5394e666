//! Bounded, newest-first record of resolved rounds and the statistics derived
//! from it.

use std::collections::VecDeque;

use croupier_types::roulette::{Amount, Color, HistoryEntry, Slot, HOT_COLD_COUNT, WHEEL_SLOTS};
use serde::{Deserialize, Serialize};

/// Aggregate results over the stored history.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub rounds_played: usize,
    pub rounds_won: usize,
    pub rounds_lost: usize,
    /// Percentage of rounds with a positive net profit.
    pub win_rate: f64,
    pub total_staked: Amount,
    pub total_returned: Amount,
    /// Cents.
    pub net_profit: i64,
    /// Largest single-round profit.
    pub biggest_win: Amount,
    /// Largest single-round loss.
    pub biggest_loss: Amount,
}

/// A slot and how many times it won inside the queried window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotFrequency {
    pub slot: Slot,
    pub hits: usize,
}

/// Most and least frequent winning slots inside a window.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotCold {
    pub window: usize,
    pub hot: Vec<SlotFrequency>,
    pub cold: Vec<SlotFrequency>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorDistribution {
    pub red: usize,
    pub black: usize,
    pub green: usize,
}

#[derive(Clone, Debug)]
pub struct RoundHistory {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl RoundHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Rebuilds history from persisted entries (newest first), dropping any
    /// beyond capacity.
    pub fn from_entries(entries: Vec<HistoryEntry>, capacity: usize) -> Self {
        let mut history = Self::new(capacity);
        history
            .entries
            .extend(entries.into_iter().take(history.capacity));
        history
    }

    /// Adds the newest entry, evicting the oldest on overflow.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    /// Newest-first entries, at most `limit` of them.
    pub fn recent(&self, limit: Option<usize>) -> Vec<HistoryEntry> {
        let limit = limit.unwrap_or(self.entries.len());
        self.entries.iter().take(limit).cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn statistics(&self) -> Statistics {
        let mut stats = Statistics::default();
        for entry in &self.entries {
            stats.rounds_played += 1;
            if entry.is_win() {
                stats.rounds_won += 1;
            } else if entry.is_loss() {
                stats.rounds_lost += 1;
            }
            stats.total_staked = stats.total_staked.saturating_add(entry.total_staked);
            stats.total_returned = stats.total_returned.saturating_add(entry.total_returned);
            stats.net_profit = stats.net_profit.saturating_add(entry.net_profit);

            let magnitude = Amount::from_cents(entry.net_profit.unsigned_abs());
            if entry.is_win() {
                stats.biggest_win = stats.biggest_win.max(magnitude);
            } else if entry.is_loss() {
                stats.biggest_loss = stats.biggest_loss.max(magnitude);
            }
        }
        if stats.rounds_played > 0 {
            stats.win_rate = 100.0 * stats.rounds_won as f64 / stats.rounds_played as f64;
        }
        stats
    }

    fn hit_counts(&self, window: usize) -> [usize; WHEEL_SLOTS] {
        let mut counts = [0usize; WHEEL_SLOTS];
        for entry in self.entries.iter().take(window) {
            if let Some(index) = entry.winning_slot.index() {
                counts[index] += 1;
            }
        }
        counts
    }

    /// Hot and cold slots over the newest `window` rounds. Ties keep table
    /// order (0, 00, 1..36).
    pub fn hot_cold(&self, window: usize) -> HotCold {
        let counts = self.hit_counts(window);
        let mut frequencies: Vec<SlotFrequency> = Slot::ALL
            .iter()
            .zip(counts)
            .map(|(slot, hits)| SlotFrequency { slot: *slot, hits })
            .collect();

        // Stable sorts keep table order among equal counts.
        frequencies.sort_by(|a, b| b.hits.cmp(&a.hits));
        let hot = frequencies
            .iter()
            .filter(|f| f.hits > 0)
            .take(HOT_COLD_COUNT)
            .copied()
            .collect();
        frequencies.sort_by(|a, b| a.hits.cmp(&b.hits).then(a.slot.cmp(&b.slot)));
        let cold = frequencies.iter().take(HOT_COLD_COUNT).copied().collect();

        HotCold {
            window: window.min(self.entries.len()),
            hot,
            cold,
        }
    }

    pub fn color_distribution(&self, window: usize) -> ColorDistribution {
        let mut distribution = ColorDistribution::default();
        for entry in self.entries.iter().take(window) {
            match entry.color {
                Color::Red => distribution.red += 1,
                Color::Black => distribution.black += 1,
                Color::Green => distribution.green += 1,
            }
        }
        distribution
    }
}
