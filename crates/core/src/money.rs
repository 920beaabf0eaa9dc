//! Monetary amounts.

use core::iter::Sum;
use core::ops::{Add, AddAssign};
use serde::{Deserialize, Serialize};

/// Amount in the smallest currency unit (satang, 1/100 THB).
///
/// Integer storage keeps revenue checks exact: a bundle conversion either
/// preserves the basket total to the satang or it does not.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_minor(satang: u64) -> Self {
        Self(satang)
    }

    /// Whole-baht amount.
    pub const fn baht(baht: u64) -> Self {
        Self(baht * 100)
    }

    pub const fn minor(self) -> u64 {
        self.0
    }

    /// Amount in baht as a float, for ratios and chart values.
    pub fn as_baht(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// `self × quantity`.
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0 * u64::from(quantity))
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}
