//! Betting grid layout and the predefined number sets behind outside bets.
//!
//! Numbers 1-36 sit on a 3 x 12 grid: `row = (n - 1) % 3`, `column = (n - 1) / 3`.
//! Row 2 (numbers divisible by 3) is the rightmost edge of each street when the
//! table is drawn with 0/00 at the top.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

use super::{BetType, Color, Slot, GRID_ROWS, MAX_NUMBER};

/// Grid row of a number (0-2), or `None` off the grid.
pub fn grid_row(n: u8) -> Option<u8> {
    on_grid(n).then(|| (n - 1) % GRID_ROWS)
}

/// Grid column of a number (0-11), or `None` off the grid.
pub fn grid_column(n: u8) -> Option<u8> {
    on_grid(n).then(|| (n - 1) / GRID_ROWS)
}

fn on_grid(n: u8) -> bool {
    (1..=MAX_NUMBER).contains(&n)
}

/// The three numbers of the street containing `n`.
pub fn street_of(n: u8) -> Option<[u8; 3]> {
    let first = grid_column(n)? * GRID_ROWS + 1;
    Some([first, first + 1, first + 2])
}

/// The six numbers of the line (two adjacent streets) whose first street
/// contains `n`. The last street has no line starting at it.
pub fn line_starting_at(n: u8) -> Option<[u8; 6]> {
    let [a, b, c] = street_of(n)?;
    if c + GRID_ROWS > MAX_NUMBER {
        return None;
    }
    Some([a, b, c, a + 3, b + 3, c + 3])
}

/// Named number sets for outside bets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PredefinedSet {
    Dozen1,
    Dozen2,
    Dozen3,
    ColumnA,
    ColumnB,
    ColumnC,
    Red,
    Black,
    Even,
    Odd,
    Low,
    High,
}

#[derive(Debug, ThisError, PartialEq, Eq)]
#[error("unknown number set `{0}`")]
pub struct UnknownSet(pub String);

impl PredefinedSet {
    pub const ALL: [PredefinedSet; 12] = [
        PredefinedSet::Dozen1,
        PredefinedSet::Dozen2,
        PredefinedSet::Dozen3,
        PredefinedSet::ColumnA,
        PredefinedSet::ColumnB,
        PredefinedSet::ColumnC,
        PredefinedSet::Red,
        PredefinedSet::Black,
        PredefinedSet::Even,
        PredefinedSet::Odd,
        PredefinedSet::Low,
        PredefinedSet::High,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PredefinedSet::Dozen1 => "dozen1",
            PredefinedSet::Dozen2 => "dozen2",
            PredefinedSet::Dozen3 => "dozen3",
            PredefinedSet::ColumnA => "columnA",
            PredefinedSet::ColumnB => "columnB",
            PredefinedSet::ColumnC => "columnC",
            PredefinedSet::Red => "red",
            PredefinedSet::Black => "black",
            PredefinedSet::Even => "even",
            PredefinedSet::Odd => "odd",
            PredefinedSet::Low => "low",
            PredefinedSet::High => "high",
        }
    }

    /// Bet type that wagers on this set.
    pub fn bet_type(&self) -> BetType {
        match self {
            PredefinedSet::Dozen1 | PredefinedSet::Dozen2 | PredefinedSet::Dozen3 => BetType::Dozen,
            PredefinedSet::ColumnA | PredefinedSet::ColumnB | PredefinedSet::ColumnC => {
                BetType::Column
            }
            PredefinedSet::Red => BetType::Red,
            PredefinedSet::Black => BetType::Black,
            PredefinedSet::Even => BetType::Even,
            PredefinedSet::Odd => BetType::Odd,
            PredefinedSet::Low => BetType::Low,
            PredefinedSet::High => BetType::High,
        }
    }

    /// Default set for an even-money bet type; `None` for dozens, columns and
    /// inside bets, which need an explicit choice.
    pub fn for_bet_type(bet_type: BetType) -> Option<PredefinedSet> {
        match bet_type {
            BetType::Red => Some(PredefinedSet::Red),
            BetType::Black => Some(PredefinedSet::Black),
            BetType::Even => Some(PredefinedSet::Even),
            BetType::Odd => Some(PredefinedSet::Odd),
            BetType::Low => Some(PredefinedSet::Low),
            BetType::High => Some(PredefinedSet::High),
            _ => None,
        }
    }

    /// Dozen by 1-based index.
    pub fn dozen(index: u8) -> Option<PredefinedSet> {
        match index {
            1 => Some(PredefinedSet::Dozen1),
            2 => Some(PredefinedSet::Dozen2),
            3 => Some(PredefinedSet::Dozen3),
            _ => None,
        }
    }

    /// Column by 1-based index (1 = A, the column starting at 1).
    pub fn column(index: u8) -> Option<PredefinedSet> {
        match index {
            1 => Some(PredefinedSet::ColumnA),
            2 => Some(PredefinedSet::ColumnB),
            3 => Some(PredefinedSet::ColumnC),
            _ => None,
        }
    }

    fn contains_number(&self, n: u8) -> bool {
        match self {
            PredefinedSet::Dozen1 => (1..=12).contains(&n),
            PredefinedSet::Dozen2 => (13..=24).contains(&n),
            PredefinedSet::Dozen3 => (25..=36).contains(&n),
            PredefinedSet::ColumnA => grid_row(n) == Some(0),
            PredefinedSet::ColumnB => grid_row(n) == Some(1),
            PredefinedSet::ColumnC => grid_row(n) == Some(2),
            PredefinedSet::Red => Slot::Number(n).color() == Color::Red,
            PredefinedSet::Black => Slot::Number(n).color() == Color::Black,
            PredefinedSet::Even => n % 2 == 0,
            PredefinedSet::Odd => n % 2 == 1,
            PredefinedSet::Low => n <= 18,
            PredefinedSet::High => n >= 19,
        }
    }

    /// Slots covered by this set, ascending.
    pub fn slots(&self) -> Vec<Slot> {
        (1..=MAX_NUMBER)
            .filter(|n| self.contains_number(*n))
            .map(Slot::Number)
            .collect()
    }
}

/// Slots covered by a predefined set.
pub fn predefined_set(set: PredefinedSet) -> Vec<Slot> {
    set.slots()
}

impl fmt::Display for PredefinedSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PredefinedSet {
    type Err = UnknownSet;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase();
        let alias = match normalized.as_str() {
            "column1" => Some(PredefinedSet::ColumnA),
            "column2" => Some(PredefinedSet::ColumnB),
            "column3" => Some(PredefinedSet::ColumnC),
            _ => None,
        };
        alias
            .or_else(|| {
                PredefinedSet::ALL
                    .iter()
                    .copied()
                    .find(|set| set.name().eq_ignore_ascii_case(&normalized))
            })
            .ok_or_else(|| UnknownSet(raw.to_string()))
    }
}
