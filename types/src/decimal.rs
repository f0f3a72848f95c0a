//! Fixed-point decimal used for weights, tallies, ratios and thresholds.
//!
//! Values are non-negative and stored as `u128` raw units with 18
//! fractional digits, so every node computes bit-identical results.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

/// Number of fractional decimal digits.
pub const DEC_PRECISION: u32 = 18;

const SCALE: u128 = 10u128.pow(DEC_PRECISION);

/// A non-negative fixed-point decimal with 18 fractional digits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Dec(u128);

impl Dec {
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(SCALE);

    /// Construct from raw units (`1.0 == 10^18`).
    pub const fn from_raw(raw: u128) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u128 {
        self.0
    }

    /// Construct from a whole number.
    pub fn from_int(n: u64) -> Self {
        Self(n as u128 * SCALE)
    }

    pub fn checked_from_int(n: u128) -> Option<Self> {
        n.checked_mul(SCALE).map(Self)
    }

    /// `numerator / denominator`, truncated. `None` on a zero denominator.
    pub fn from_ratio(numerator: u64, denominator: u64) -> Option<Self> {
        Self::from_int(numerator).checked_quo(Self::from_int(denominator))
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Product, truncated to 18 fractional digits.
    pub fn checked_mul(self, other: Self) -> Option<Self> {
        // Split both operands at the scale so no intermediate exceeds u128:
        // a*b/S = a_hi*b + a_lo*b_hi + a_lo*b_lo/S
        let (a_hi, a_lo) = (self.0 / SCALE, self.0 % SCALE);
        let (b_hi, b_lo) = (other.0 / SCALE, other.0 % SCALE);
        let head = a_hi.checked_mul(other.0)?;
        let mid = a_lo.checked_mul(b_hi)?;
        let tail = a_lo * b_lo / SCALE;
        head.checked_add(mid)?.checked_add(tail).map(Self)
    }

    /// Quotient, truncated to 18 fractional digits. `None` on division by zero.
    pub fn checked_quo(self, other: Self) -> Option<Self> {
        if other.0 == 0 {
            return None;
        }
        let quotient = self.0 / other.0;
        let mut remainder = self.0 % other.0;
        let mut fraction: u128 = 0;
        for _ in 0..DEC_PRECISION {
            remainder = remainder.checked_mul(10)?;
            fraction = fraction * 10 + remainder / other.0;
            remainder %= other.0;
        }
        quotient.checked_mul(SCALE)?.checked_add(fraction).map(Self)
    }

    /// Multiply a whole amount by this ratio, dropping the fractional part.
    pub fn mul_int_truncate(self, amount: u128) -> Option<u128> {
        Self(amount).checked_mul(self).map(|d| d.0)
    }

    /// The integer part.
    pub fn truncate(&self) -> u128 {
        self.0 / SCALE
    }

    pub fn min(self, other: Self) -> Self {
        if self <= other {
            self
        } else {
            other
        }
    }
}

impl fmt::Display for Dec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:0width$}",
            self.0 / SCALE,
            self.0 % SCALE,
            width = DEC_PRECISION as usize
        )
    }
}

impl FromStr for Dec {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TypesError::InvalidDecimal(s.to_string());
        let (int_part, frac_part) = match s.split_once('.') {
            Some((i, f)) => (i, f),
            None => (s, ""),
        };
        if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        if s.contains('.') && frac_part.is_empty() {
            return Err(invalid());
        }
        if frac_part.len() > DEC_PRECISION as usize || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }
        let int: u128 = int_part.parse().map_err(|_| invalid())?;
        let mut frac: u128 = if frac_part.is_empty() {
            0
        } else {
            frac_part.parse().map_err(|_| invalid())?
        };
        frac *= 10u128.pow(DEC_PRECISION - frac_part.len() as u32);
        int.checked_mul(SCALE)
            .and_then(|v| v.checked_add(frac))
            .map(Self)
            .ok_or(TypesError::Overflow)
    }
}

impl Serialize for Dec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Dec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
