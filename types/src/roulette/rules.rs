use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

use super::{
    Amount, DEFAULT_CHIPS_UNITS, DEFAULT_MAX_BET_UNITS, DEFAULT_MIN_BET_UNITS,
    DEFAULT_SELECTED_CHIP_UNITS, DEFAULT_TABLE_MAX_UNITS, HISTORY_CAPACITY, MAX_HISTORY_CAPACITY,
    STARTING_BALANCE_UNITS,
};

#[derive(Debug, ThisError, PartialEq, Eq)]
pub enum RuleConfigError {
    #[error("min_bet must be positive")]
    ZeroMinBet,
    #[error("min_bet ({min}) exceeds max_bet ({max})")]
    MinAboveMax { min: Amount, max: Amount },
    #[error("max_bet ({max}) exceeds table_max ({table_max})")]
    MaxAboveTableMax { max: Amount, table_max: Amount },
    #[error("chip set is empty")]
    NoChips,
    #[error("chip denominations must be positive and strictly increasing")]
    UnorderedChips,
    #[error("selected chip {0} is not in the chip set")]
    UnknownSelectedChip(Amount),
    #[error("history capacity must be positive")]
    ZeroHistoryCapacity,
    #[error("history capacity {capacity} exceeds {max}")]
    HistoryCapacityTooLarge { capacity: usize, max: usize },
}

/// Stake limits. Amounts are serialized in cents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableLimits {
    pub min_bet: Amount,
    pub max_bet: Amount,
    pub table_max: Amount,
}

impl Default for TableLimits {
    fn default() -> Self {
        Self {
            min_bet: Amount::from_units(DEFAULT_MIN_BET_UNITS),
            max_bet: Amount::from_units(DEFAULT_MAX_BET_UNITS),
            table_max: Amount::from_units(DEFAULT_TABLE_MAX_UNITS),
        }
    }
}

/// Chip denominations offered to the player, ascending.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChipSet {
    pub denominations: Vec<Amount>,
    pub selected: Amount,
}

impl Default for ChipSet {
    fn default() -> Self {
        Self {
            denominations: DEFAULT_CHIPS_UNITS
                .iter()
                .map(|units| Amount::from_units(*units))
                .collect(),
            selected: Amount::from_units(DEFAULT_SELECTED_CHIP_UNITS),
        }
    }
}

impl ChipSet {
    pub fn contains(&self, amount: Amount) -> bool {
        self.denominations.contains(&amount)
    }

    /// Largest-first chip breakdown of `amount`; any remainder smaller than
    /// the smallest chip is returned separately.
    pub fn breakdown(&self, amount: Amount) -> (Vec<(Amount, u64)>, Amount) {
        let mut remaining = amount.cents();
        let mut stacks = Vec::new();
        for chip in self.denominations.iter().rev() {
            if chip.is_zero() {
                continue;
            }
            let count = remaining / chip.cents();
            if count > 0 {
                stacks.push((*chip, count));
                remaining %= chip.cents();
            }
        }
        (stacks, Amount::from_cents(remaining))
    }
}

/// House rules a table is opened with.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    pub limits: TableLimits,
    pub chips: ChipSet,
    pub starting_balance: Amount,
    pub history_capacity: usize,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            limits: TableLimits::default(),
            chips: ChipSet::default(),
            starting_balance: Amount::from_units(STARTING_BALANCE_UNITS),
            history_capacity: HISTORY_CAPACITY,
        }
    }
}

impl RuleConfig {
    pub fn validate(&self) -> Result<(), RuleConfigError> {
        let TableLimits {
            min_bet,
            max_bet,
            table_max,
        } = self.limits;
        if min_bet.is_zero() {
            return Err(RuleConfigError::ZeroMinBet);
        }
        if min_bet > max_bet {
            return Err(RuleConfigError::MinAboveMax {
                min: min_bet,
                max: max_bet,
            });
        }
        if max_bet > table_max {
            return Err(RuleConfigError::MaxAboveTableMax {
                max: max_bet,
                table_max,
            });
        }
        let chips = &self.chips.denominations;
        if chips.is_empty() {
            return Err(RuleConfigError::NoChips);
        }
        if chips[0].is_zero() || chips.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(RuleConfigError::UnorderedChips);
        }
        if !self.chips.contains(self.chips.selected) {
            return Err(RuleConfigError::UnknownSelectedChip(self.chips.selected));
        }
        if self.history_capacity == 0 {
            return Err(RuleConfigError::ZeroHistoryCapacity);
        }
        if self.history_capacity > MAX_HISTORY_CAPACITY {
            return Err(RuleConfigError::HistoryCapacityTooLarge {
                capacity: self.history_capacity,
                max: MAX_HISTORY_CAPACITY,
            });
        }
        Ok(())
    }
}
