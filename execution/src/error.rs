use croupier_types::roulette::{Amount, BetId, BetType, Slot};
use thiserror::Error;

/// Why the validator refused a bet. Checks run in declaration order and the
/// first failure wins.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Rejection {
    #[error("unknown bet type `{0}`")]
    UnknownBetType(String),
    #[error("bet must cover valid wheel slots")]
    InvalidSlots,
    #[error("{bet_type} bets cover {expected} numbers, got {got}")]
    SlotCountMismatch {
        bet_type: BetType,
        expected: usize,
        got: usize,
    },
    #[error("the same number appears more than once")]
    DuplicateSlots,
    #[error("numbers do not form a valid {0}")]
    InvalidGeometry(BetType),
    #[error("stake {amount} is outside the {min}-{max} limit")]
    AmountOutOfRange {
        amount: Amount,
        min: Amount,
        max: Amount,
    },
    #[error("insufficient balance: need {needed}, have {available} available")]
    InsufficientBalance { needed: Amount, available: Amount },
    #[error("table maximum {table_max} exceeded ({staked} already staked)")]
    TableMaxExceeded { staked: Amount, table_max: Amount },
}

/// A caller bypassed the validator, or arithmetic left its valid range.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("slot {0:?} is not on the wheel")]
    InvalidSlot(Slot),
    #[error("payout overflow on bet {0}")]
    Overflow(BetId),
}

/// Error taxonomy surfaced to front-ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad bet shape, amount or limits. Recoverable, nothing mutated.
    Validation,
    /// Not enough balance for the requested operation. Recoverable.
    Resource,
    /// Nothing to remove, repeat or spin. Recoverable.
    NotFound,
    /// Round already resolving. Recoverable once it completes.
    Busy,
    /// Programmer error.
    Invariant,
}

/// Failure of a table command.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error(transparent)]
    Rejected(#[from] Rejection),
    #[error("bet {0} not found")]
    NotFound(BetId),
    #[error("no bets on the table")]
    EmptyLedger,
    #[error("no previous round to repeat")]
    NoHistory,
    #[error("place a bet before spinning")]
    NoBets,
    #[error("a round is already resolving")]
    RoundInProgress,
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
}

impl TableError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TableError::Rejected(Rejection::InsufficientBalance { .. }) => ErrorKind::Resource,
            TableError::Rejected(_) => ErrorKind::Validation,
            TableError::NotFound(_)
            | TableError::EmptyLedger
            | TableError::NoHistory
            | TableError::NoBets => ErrorKind::NotFound,
            TableError::RoundInProgress => ErrorKind::Busy,
            TableError::Invariant(_) => ErrorKind::Invariant,
        }
    }

    /// The validator's reason, when this is a rejection.
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            TableError::Rejected(rejection) => Some(rejection),
            _ => None,
        }
    }
}
