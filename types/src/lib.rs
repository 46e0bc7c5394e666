//! Shared types for the croupier roulette engine.

pub mod roulette;

pub use roulette::{
    Amount, Bet, BetId, BetRecord, BetType, Color, HistoryEntry, PredefinedSet, RuleConfig,
    Settings, Slot, TableLimits,
};
