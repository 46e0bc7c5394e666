use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

/// Roulette bet types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetType {
    Straight, // 1 number (35:1)
    Split,    // 2 adjacent numbers (17:1)
    Street,   // 3 numbers in a row (11:1)
    Corner,   // 4 numbers in a square (8:1)
    Line,     // 6 numbers, two streets (5:1)
    Dozen,    // 1-12, 13-24, 25-36 (2:1)
    Column,   // every third number (2:1)
    Red,      // (1:1)
    Black,    // (1:1)
    Even,     // (1:1)
    Odd,      // (1:1)
    Low,      // 1-18 (1:1)
    High,     // 19-36 (1:1)
}

#[derive(Debug, ThisError, PartialEq, Eq)]
#[error("unknown bet type `{0}`")]
pub struct UnknownBetType(pub String);

impl BetType {
    pub const ALL: [BetType; 13] = [
        BetType::Straight,
        BetType::Split,
        BetType::Street,
        BetType::Corner,
        BetType::Line,
        BetType::Dozen,
        BetType::Column,
        BetType::Red,
        BetType::Black,
        BetType::Even,
        BetType::Odd,
        BetType::Low,
        BetType::High,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BetType::Straight => "straight",
            BetType::Split => "split",
            BetType::Street => "street",
            BetType::Corner => "corner",
            BetType::Line => "line",
            BetType::Dozen => "dozen",
            BetType::Column => "column",
            BetType::Red => "red",
            BetType::Black => "black",
            BetType::Even => "even",
            BetType::Odd => "odd",
            BetType::Low => "low",
            BetType::High => "high",
        }
    }

    /// Winnings per unit staked, excluding the returned stake ("N:1").
    pub fn payout_multiplier(&self) -> u64 {
        match self {
            BetType::Straight => 35,
            BetType::Split => 17,
            BetType::Street => 11,
            BetType::Corner => 8,
            BetType::Line => 5,
            BetType::Dozen | BetType::Column => 2,
            BetType::Red
            | BetType::Black
            | BetType::Even
            | BetType::Odd
            | BetType::Low
            | BetType::High => 1,
        }
    }

    /// Number of slots a bet of this type must cover.
    pub fn required_count(&self) -> usize {
        match self {
            BetType::Straight => 1,
            BetType::Split => 2,
            BetType::Street => 3,
            BetType::Corner => 4,
            BetType::Line => 6,
            BetType::Dozen | BetType::Column => 12,
            BetType::Red
            | BetType::Black
            | BetType::Even
            | BetType::Odd
            | BetType::Low
            | BetType::High => 18,
        }
    }

    /// Outside bets cover a predefined set rather than player-chosen numbers.
    pub fn is_outside(&self) -> bool {
        !matches!(
            self,
            BetType::Straight | BetType::Split | BetType::Street | BetType::Corner | BetType::Line
        )
    }

    pub fn odds_display(&self) -> String {
        format!("{}:1", self.payout_multiplier())
    }
}

/// Payout multiplier lookup by bet type.
pub fn payout_multiplier(bet_type: BetType) -> u64 {
    bet_type.payout_multiplier()
}

/// Required slot count lookup by bet type.
pub fn required_count(bet_type: BetType) -> usize {
    bet_type.required_count()
}

impl fmt::Display for BetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BetType {
    type Err = UnknownBetType;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "straight" | "number" => Ok(BetType::Straight),
            "sixline" | "six_line" => Ok(BetType::Line),
            name => BetType::ALL
                .iter()
                .copied()
                .find(|bet_type| bet_type.name() == name)
                .ok_or_else(|| UnknownBetType(raw.to_string())),
        }
    }
}
