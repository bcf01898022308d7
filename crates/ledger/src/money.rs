//! Monetary amounts in integer minor units.

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Signed monetary amount in minor units (cents).
///
/// Amounts are stored and summed as integers so balances never accumulate
/// floating-point drift; conversion from/to decimal major units happens only
/// at the HTTP edge. Positive = credit, negative = debit.
#[derive(
    Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Largest magnitude accepted from the edge, in minor units.
    ///
    /// Well below `i64::MAX` so that summing any realistic number of entries
    /// cannot overflow, and small enough that the `f64` conversion below is
    /// exact for every accepted value.
    const MAX_MINOR: i64 = 1_000_000_000_000_000;

    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// Parse a decimal major-unit amount (e.g. `40.25`) into minor units.
    ///
    /// Sub-cent precision is rounded to the nearest cent. Non-finite values
    /// and values outside the representable range are `InvalidAmount`.
    pub fn try_from_major(major: f64) -> Result<Self, LedgerError> {
        if !major.is_finite() {
            return Err(LedgerError::InvalidAmount);
        }
        let minor = (major * 100.0).round();
        if minor.abs() > Self::MAX_MINOR as f64 {
            return Err(LedgerError::InvalidAmount);
        }
        Ok(Self(minor as i64))
    }

    pub fn as_minor(&self) -> i64 {
        self.0
    }

    /// Decimal major-unit view for JSON responses.
    pub fn to_major(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Sum of entry amounts; exactly zero for an empty iterator.
    ///
    /// Saturates at the `i64` bounds instead of wrapping, so a pathological
    /// log can never produce a sign-flipped balance.
    pub fn sum(amounts: impl IntoIterator<Item = Money>) -> Money {
        amounts
            .into_iter()
            .fold(Money::ZERO, |acc, m| Money(acc.0.saturating_add(m.0)))
    }
}

impl core::ops::Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(-self.0)
    }
}

impl core::fmt::Display for Money {
    /// Renders major units; whole amounts print without a fraction
    /// (`100`, `-40.50`, `0.05`).
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let (major, cents) = (abs / 100, abs % 100);
        if cents == 0 {
            write!(f, "{sign}{major}")
        } else {
            write!(f, "{sign}{major}.{cents:02}")
        }
    }
}
