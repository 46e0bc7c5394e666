use serde::{Deserialize, Serialize};

use super::{Amount, BetRecord, Color, Slot};

/// Immutable record of one resolved round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    pub winning_slot: Slot,
    pub color: Color,
    pub bets: Vec<BetRecord>,
    pub total_staked: Amount,
    pub total_returned: Amount,
    /// `total_returned - total_staked`, in cents.
    pub net_profit: i64,
}

impl HistoryEntry {
    pub fn is_win(&self) -> bool {
        self.net_profit > 0
    }

    pub fn is_loss(&self) -> bool {
        self.net_profit < 0
    }
}
