//! American roulette domain types.
//!
//! Defines the wheel, the bet-type catalog, table limits and the records shared
//! by the execution layer and front-ends. Everything here is plain data with
//! simple lookups.

mod amount;
mod bet;
mod bet_type;
mod constants;
mod history;
mod layout;
mod rules;
mod settings;
mod slot;

pub use amount::*;
pub use bet::*;
pub use bet_type::*;
pub use constants::*;
pub use history::*;
pub use layout::*;
pub use rules::*;
pub use settings::*;
pub use slot::*;
