//! Croupier execution layer.
//!
//! Everything that changes state at an American roulette table: bet
//! validation, the per-round ledger, payout resolution, round history and
//! persistence, tied together by [`Table`].
//!
//! ## Money
//! Balances and stakes are [`Amount`](croupier_types::Amount)s in cents and
//! all resolution arithmetic is checked integer math. Floating point only
//! appears in the analytic helpers ([`payout::house_edge`],
//! [`payout::expected_value`]).
//!
//! ## Minimal session
//! ```rust
//! use croupier_execution::{ForcedOutcomes, MemoryStore, Table};
//! use croupier_types::{Amount, BetType, RuleConfig, Slot};
//!
//! let mut table = Table::open(
//!     RuleConfig::default(),
//!     MemoryStore::new(),
//!     ForcedOutcomes::new([Slot::Number(17)]),
//! )
//! .unwrap();
//! table
//!     .place_bet(BetType::Straight, vec![Slot::Number(17)], Amount::from_units(10), None)
//!     .unwrap();
//! let result = table.spin().unwrap();
//! assert_eq!(result.net_profit, 35_000);
//! assert_eq!(table.balance(), Amount::from_units(1_350));
//! ```

pub mod clock;
mod error;
pub mod events;
pub mod history;
pub mod ledger;
pub mod payout;
pub mod persistence;
pub mod storage;
pub mod table;
pub mod validator;
pub mod wheel;


pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ErrorKind, InvariantViolation, Rejection, TableError};
pub use events::{channel, Event, EventBus, Observer, SubscriptionId};
pub use history::{ColorDistribution, HotCold, RoundHistory, SlotFrequency, Statistics};
pub use ledger::{BalanceChange, BetLedger};
pub use payout::{BetResolution, RoundResult};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use table::{Phase, Table};
pub use wheel::{ForcedOutcomes, OutcomeSource, Wheel};
