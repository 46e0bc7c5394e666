use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

use super::{MAX_NUMBER, RED_NUMBERS, WHEEL_SLOTS};

/// Pocket color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Green,
    Red,
    Black,
}

impl Color {
    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Green => "green",
            Color::Red => "red",
            Color::Black => "black",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One pocket of the wheel.
///
/// `Number` is only meaningful for 1-36; anything else is representable so that
/// untrusted input can be rejected by the validator rather than at parse time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Slot {
    Zero,
    DoubleZero,
    Number(u8),
}

#[derive(Debug, ThisError, PartialEq, Eq)]
#[error("invalid slot label `{0}`")]
pub struct SlotParseError(pub String);

const fn build_all() -> [Slot; WHEEL_SLOTS] {
    let mut slots = [Slot::Zero; WHEEL_SLOTS];
    slots[1] = Slot::DoubleZero;
    let mut n = 1;
    while n <= MAX_NUMBER {
        slots[n as usize + 1] = Slot::Number(n);
        n += 1;
    }
    slots
}

/// Physical pocket sequence of the American wheel, clockwise from 0.
const WHEEL_ORDER: [Slot; WHEEL_SLOTS] = {
    use Slot::{DoubleZero as DZ, Number as N, Zero as Z};
    [
        Z, N(28), N(9), N(26), N(30), N(11), N(7), N(20), N(32), N(17), N(5), N(22), N(34),
        N(15), N(3), N(24), N(36), N(13), N(1), DZ, N(27), N(10), N(25), N(29), N(12), N(8),
        N(19), N(31), N(18), N(6), N(21), N(33), N(16), N(4), N(23), N(35), N(14), N(2),
    ]
};

impl Slot {
    /// Every slot in table order: 0, 00, 1..36.
    pub const ALL: [Slot; WHEEL_SLOTS] = build_all();

    /// Returns the numbered slot, or `None` outside 1-36.
    pub fn number(n: u8) -> Option<Slot> {
        (1..=MAX_NUMBER).contains(&n).then_some(Slot::Number(n))
    }

    pub fn is_valid(&self) -> bool {
        match self {
            Slot::Zero | Slot::DoubleZero => true,
            Slot::Number(n) => (1..=MAX_NUMBER).contains(n),
        }
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Slot::Zero | Slot::DoubleZero)
    }

    /// The number for 1-36, `None` for either zero.
    pub fn as_number(&self) -> Option<u8> {
        match self {
            Slot::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Position in [`Slot::ALL`].
    pub fn index(&self) -> Option<usize> {
        match self {
            Slot::Zero => Some(0),
            Slot::DoubleZero => Some(1),
            Slot::Number(n) if self.is_valid() => Some(*n as usize + 1),
            Slot::Number(_) => None,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Slot::Zero => "0".to_string(),
            Slot::DoubleZero => "00".to_string(),
            Slot::Number(n) => n.to_string(),
        }
    }

    pub fn color(&self) -> Color {
        color_of(*self)
    }
}

/// Color of a slot. Zeros are green; numbers outside 1-36 have no color and
/// report green.
pub fn color_of(slot: Slot) -> Color {
    match slot {
        Slot::Number(n) if RED_NUMBERS.contains(&n) => Color::Red,
        Slot::Number(n) if (1..=MAX_NUMBER).contains(&n) => Color::Black,
        _ => Color::Green,
    }
}

/// Physical arrangement of the wheel, for rendering collaborators.
pub fn wheel_order() -> &'static [Slot; WHEEL_SLOTS] {
    &WHEEL_ORDER
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl FromStr for Slot {
    type Err = SlotParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            "00" => Ok(Slot::DoubleZero),
            "0" => Ok(Slot::Zero),
            other => other
                .parse::<u8>()
                .ok()
                .and_then(Slot::number)
                .ok_or_else(|| SlotParseError(raw.to_string())),
        }
    }
}

impl TryFrom<String> for Slot {
    type Error = SlotParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Slot> for String {
    fn from(slot: Slot) -> Self {
        slot.label()
    }
}
