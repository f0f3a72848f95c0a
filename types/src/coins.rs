//! Multi-denomination token amounts.
//!
//! Amounts are whole raw units (`u128`). A `Coins` set is kept sorted by
//! denomination with no zero entries, so equal balances compare equal.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::TypesError;

/// A single-denomination amount.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: u128,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: u128) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }

    pub fn validate(&self) -> Result<(), TypesError> {
        validate_denom(&self.denom)
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// Denominations are 3-128 characters: a leading letter followed by
/// alphanumerics or `/`, `:`, `.`, `_`, `-`.
pub fn validate_denom(denom: &str) -> Result<(), TypesError> {
    let mut chars = denom.chars();
    let valid = (3..=128).contains(&denom.len())
        && chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || "/:._-".contains(c));
    if valid {
        Ok(())
    } else {
        Err(TypesError::InvalidDenom(denom.to_string()))
    }
}

/// A normalised set of coins.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Coin>", into = "Vec<Coin>")]
pub struct Coins(BTreeMap<String, u128>);

impl Coins {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a coin set, rejecting invalid or duplicate denominations and
    /// zero amounts.
    pub fn from_coins(coins: Vec<Coin>) -> Result<Self, TypesError> {
        let mut map = BTreeMap::new();
        for coin in coins {
            coin.validate()?;
            if coin.amount == 0 {
                return Err(TypesError::InvalidCoins(format!(
                    "zero amount for {}",
                    coin.denom
                )));
            }
            if map.insert(coin.denom.clone(), coin.amount).is_some() {
                return Err(TypesError::InvalidCoins(format!(
                    "duplicate denomination {}",
                    coin.denom
                )));
            }
        }
        Ok(Self(map))
    }

    /// Single-denomination shorthand. A zero amount yields an empty set.
    pub fn one(denom: impl Into<String>, amount: u128) -> Self {
        let mut map = BTreeMap::new();
        if amount > 0 {
            map.insert(denom.into(), amount);
        }
        Self(map)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_empty()
    }

    pub fn amount_of(&self, denom: &str) -> u128 {
        self.0.get(denom).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u128)> {
        self.0.iter().map(|(d, a)| (d.as_str(), *a))
    }

    pub fn to_vec(&self) -> Vec<Coin> {
        self.iter().map(|(d, a)| Coin::new(d, a)).collect()
    }

    pub fn checked_add(&self, other: &Coins) -> Result<Self, TypesError> {
        let mut out = self.0.clone();
        for (denom, amount) in other.iter() {
            let entry = out.entry(denom.to_string()).or_insert(0);
            *entry = entry.checked_add(amount).ok_or(TypesError::Overflow)?;
        }
        Ok(Self(out))
    }

    /// `self - other`, or `None` if any denomination would go negative.
    pub fn checked_sub(&self, other: &Coins) -> Option<Self> {
        let mut out = self.0.clone();
        for (denom, amount) in other.iter() {
            let have = out.get(denom).copied().unwrap_or(0);
            let left = have.checked_sub(amount)?;
            if left == 0 {
                out.remove(denom);
            } else {
                out.insert(denom.to_string(), left);
            }
        }
        Some(Self(out))
    }

    /// Whether every denomination of `other` is covered by `self`.
    pub fn is_all_gte(&self, other: &Coins) -> bool {
        other.iter().all(|(d, a)| self.amount_of(d) >= a)
    }
}

impl TryFrom<Vec<Coin>> for Coins {
    type Error = TypesError;

    fn try_from(coins: Vec<Coin>) -> Result<Self, Self::Error> {
        Self::from_coins(coins)
    }
}

impl From<Coins> for Vec<Coin> {
    fn from(coins: Coins) -> Self {
        coins.to_vec()
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(d, a)| format!("{a}{d}")).collect();
        write!(f, "{}", parts.join(","))
    }
}
