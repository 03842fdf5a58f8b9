//! Six-sided dice, the dice count and the rolled collection.
//!
//! Everything here is plain bounded arithmetic: a [`DieValue`] is always in
//! 1..=6, a [`DiceCount`] is always in 1..=8 and a [`DiceSet`] is resized to
//! match its count whenever the count changes.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of one six-sided die.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DieValue(u8);

impl DieValue {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 6;

    /// Value new dice start with before their first roll.
    pub const ONE: DieValue = DieValue(1);

    /// Create a die value, returning `None` outside 1..=6.
    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(DieValue(value))
    }

    /// Draw a uniform value in 1..=6.
    pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> Self {
        DieValue(rng.gen_range(Self::MIN..=Self::MAX))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Lit positions on a 3×3 grid, row-major from the top-left.
    pub fn pips(self) -> [bool; 9] {
        const X: bool = true;
        const O: bool = false;
        match self.0 {
            1 => [O, O, O, O, X, O, O, O, O],
            2 => [O, O, X, O, O, O, X, O, O],
            3 => [O, O, X, O, X, O, X, O, O],
            4 => [X, O, X, O, O, O, X, O, X],
            5 => [X, O, X, O, X, O, X, O, X],
            _ => [X, O, X, X, O, X, X, O, X],
        }
    }
}

impl Default for DieValue {
    fn default() -> Self {
        DieValue::ONE
    }
}

impl TryFrom<u8> for DieValue {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        DieValue::new(value).ok_or_else(|| format!("die value {value} is outside 1..=6"))
    }
}

impl From<DieValue> for u8 {
    fn from(value: DieValue) -> Self {
        value.0
    }
}

impl fmt::Display for DieValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How many dice are on the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct DiceCount(u8);

impl DiceCount {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 8;

    /// Build a count, clamping into 1..=8.
    pub fn clamped(value: i64) -> Self {
        DiceCount(value.clamp(Self::MIN as i64, Self::MAX as i64) as u8)
    }

    /// Apply a signed step, clamping into 1..=8.
    pub fn adjusted(self, delta: i32) -> Self {
        Self::clamped(self.0 as i64 + delta as i64)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// Lowest total that still counts as a win for this many dice.
    pub fn win_threshold(self) -> u32 {
        self.0 as u32 * 3
    }
}

impl Default for DiceCount {
    fn default() -> Self {
        DiceCount(Self::MIN)
    }
}

impl From<u8> for DiceCount {
    fn from(value: u8) -> Self {
        Self::clamped(value as i64)
    }
}

impl From<DiceCount> for u8 {
    fn from(count: DiceCount) -> Self {
        count.0
    }
}

impl fmt::Display for DiceCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The dice currently on the table, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DiceSet {
    values: Vec<DieValue>,
}

impl DiceSet {
    /// A fresh set of `count` dice all showing one.
    pub fn new(count: DiceCount) -> Self {
        Self {
            values: vec![DieValue::ONE; count.as_usize()],
        }
    }

    pub fn from_values(values: Vec<DieValue>) -> Self {
        Self { values }
    }

    /// Grow or shrink to `count` dice. New dice show one; extra dice are
    /// dropped from the end.
    pub fn resize(&mut self, count: DiceCount) {
        self.values.resize(count.as_usize(), DieValue::ONE);
    }

    /// Replace every die with an independent draw.
    pub fn reroll<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for value in &mut self.values {
            *value = DieValue::roll(rng);
        }
    }

    pub fn total(&self) -> u32 {
        self.values.iter().map(|v| v.get() as u32).sum()
    }

    pub fn values(&self) -> &[DieValue] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Format the faces for display, e.g. `[3, 5, 1]`.
    pub fn display(&self) -> String {
        format!(
            "[{}]",
            self.values
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

/// Win/lose classification of a settled roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Win,
    Lose,
}

impl Verdict {
    /// A roll wins when its total reaches three per die, i.e. an average
    /// face of at least three.
    pub fn judge(total: u32, count: DiceCount) -> Self {
        if total >= count.win_threshold() {
            Verdict::Win
        } else {
            Verdict::Lose
        }
    }

    pub fn is_win(self) -> bool {
        self == Verdict::Win
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Win => write!(f, "win"),
            Verdict::Lose => write!(f, "lose"),
        }
    }
}
