use std::fmt;

use serde::{Deserialize, Serialize};

use super::{grid_row, Amount, BetType, Slot};

/// Identity of a placed bet, unique within a table session.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BetId(pub u64);

impl fmt::Display for BetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where the chip was dropped on the rendered table. Carried for display
/// correlation only; the engine never reads it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

/// A validated bet in the current round. Never mutated after placement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bet {
    pub id: BetId,
    pub bet_type: BetType,
    pub slots: Vec<Slot>,
    pub amount: Amount,
    pub position: Option<Position>,
    /// Milliseconds since the Unix epoch.
    pub placed_at: u64,
}

impl Bet {
    pub fn covers(&self, slot: Slot) -> bool {
        self.slots.contains(&slot)
    }

    /// The identity-free part of the bet, as stored in history.
    pub fn record(&self) -> BetRecord {
        BetRecord {
            bet_type: self.bet_type,
            slots: self.slots.clone(),
            amount: self.amount,
        }
    }

    pub fn describe(&self) -> String {
        describe(self.bet_type, &self.slots)
    }
}

/// A bet as captured in a history entry: what was wagered, without identity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetRecord {
    pub bet_type: BetType,
    pub slots: Vec<Slot>,
    pub amount: Amount,
}

impl BetRecord {
    pub fn describe(&self) -> String {
        describe(self.bet_type, &self.slots)
    }
}

/// Short human label, e.g. `Split 14/17`, `Dozen 13-24` or `Column 2`.
pub fn describe(bet_type: BetType, slots: &[Slot]) -> String {
    let sorted = sorted(slots);
    let numbers = sorted
        .iter()
        .filter(|slot| slot.is_valid())
        .filter_map(Slot::as_number);
    match bet_type {
        BetType::Dozen => match (numbers.clone().min(), numbers.max()) {
            (Some(low), Some(high)) => format!("Dozen {low}-{high}"),
            _ => "Dozen".to_string(),
        },
        BetType::Column => match numbers.min().and_then(grid_row) {
            Some(row) => format!("Column {}", row + 1),
            None => "Column".to_string(),
        },
        bet_type if bet_type.is_outside() => capitalize(bet_type.name()),
        bet_type => {
            let labels = sorted.iter().map(Slot::label).collect::<Vec<_>>().join("/");
            format!("{} {}", capitalize(bet_type.name()), labels)
        }
    }
}

fn sorted(slots: &[Slot]) -> Vec<Slot> {
    let mut sorted = slots.to_vec();
    sorted.sort();
    sorted
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}
