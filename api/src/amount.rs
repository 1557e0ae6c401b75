//! Provides a safe, self-contained type for NXT amounts.

use std::fmt;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use thiserror::Error;

/// Number of fractional digits of one NXT.
pub const DECIMALS: usize = 8;

const NQT_PER_NXT: i64 = 100_000_000;

/// An error that can occur when parsing a string into an `NqtAmount`.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseAmountError {
    /// The string is not in a valid numeric format (e.g., "abc", "1.2.3", "-1").
    #[error("invalid amount format")]
    InvalidFormat,
    /// The amount does not fit the ledger's 64-bit representation.
    #[error("amount is too large")]
    Overflow,
}

/// An amount of NXT.
///
/// Internally, the amount is stored as a signed 64-bit integer in NQT, the
/// smallest indivisible unit (10^-8 NXT). The default `Display` implementation
/// prints the amount in NXT with trailing fractional zeros removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct NqtAmount(i64);

impl NqtAmount {
    pub const ZERO: Self = Self(0);

    pub const fn from_nqt(nqt: i64) -> Self {
        Self(nqt)
    }

    /// Whole NXT coins. Returns `None` on overflow.
    pub fn from_coins(coins: i64) -> Option<Self> {
        coins.checked_mul(NQT_PER_NXT).map(Self)
    }

    pub const fn as_nqt(&self) -> i64 {
        self.0
    }

    /// Parses user input given in NXT (e.g. `"12.5"`).
    ///
    /// Accepts digits with at most one `.`; either side of the point may be
    /// empty but not both. Fractional digits past the eighth are dropped, the
    /// way the node's own client converts amounts.
    ///
    /// # Examples
    /// ```
    /// use api::amount::NqtAmount;
    /// let amount = NqtAmount::from_coins_str("12.5").unwrap();
    /// assert_eq!(amount.as_nqt(), 1_250_000_000);
    /// ```
    pub fn from_coins_str(s: &str) -> Result<Self, ParseAmountError> {
        let mut parts = s.split('.');
        let whole = parts.next().unwrap_or("");
        let fraction = parts.next().unwrap_or("");

        if parts.next().is_some() || (whole.is_empty() && fraction.is_empty()) {
            return Err(ParseAmountError::InvalidFormat);
        }
        if !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(ParseAmountError::InvalidFormat);
        }

        let fraction = &fraction[..fraction.len().min(DECIMALS)];

        let whole_nqt = if whole.is_empty() {
            0
        } else {
            whole
                .trim_start_matches('0')
                .parse::<i64>()
                .or_else(|e| match e.kind() {
                    std::num::IntErrorKind::Empty => Ok(0),
                    _ => Err(ParseAmountError::Overflow),
                })?
                .checked_mul(NQT_PER_NXT)
                .ok_or(ParseAmountError::Overflow)?
        };

        let fraction_nqt = if fraction.is_empty() {
            0
        } else {
            let digits: i64 = fraction
                .parse()
                .map_err(|_| ParseAmountError::InvalidFormat)?;
            digits * 10_i64.pow((DECIMALS - fraction.len()) as u32)
        };

        whole_nqt
            .checked_add(fraction_nqt)
            .map(Self)
            .ok_or(ParseAmountError::Overflow)
    }

    /// Formats the amount with `,` thousands separators (e.g., "1,234.5").
    pub fn to_grouped_string(&self) -> String {
        let (whole, fraction) = self.split_parts();
        let digits = whole.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
        if self.0 < 0 {
            grouped.push('-');
        }
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }
        if let Some(fraction) = fraction {
            grouped.push('.');
            grouped.push_str(&fraction);
        }
        grouped
    }

    /// Balance as shown on the send screen: the grouped whole part and the
    /// fractional digits, if any.
    pub fn to_balance_display(&self) -> BalanceDisplay {
        let grouped = self.to_grouped_string();
        match grouped.split_once('.') {
            Some((whole, fraction)) => BalanceDisplay {
                whole: format!("{whole}."),
                fraction: Some(fraction.to_string()),
            },
            None => BalanceDisplay {
                whole: grouped,
                fraction: None,
            },
        }
    }

    fn split_parts(&self) -> (i64, Option<String>) {
        let whole = self.0 / NQT_PER_NXT;
        let fraction = (self.0 % NQT_PER_NXT).unsigned_abs();
        if fraction == 0 {
            return (whole, None);
        }
        let digits = format!("{fraction:0width$}", width = DECIMALS);
        (whole, Some(digits.trim_end_matches('0').to_string()))
    }
}

/// Formats the amount as a plain NXT number (e.g., "1234.5").
impl fmt::Display for NqtAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (whole, fraction) = self.split_parts();
        if self.0 < 0 && whole == 0 {
            f.write_str("-")?;
        }
        write!(f, "{whole}")?;
        if let Some(fraction) = fraction {
            write!(f, ".{fraction}")?;
        }
        Ok(())
    }
}

/// Nodes exchange NQT amounts as decimal strings.
impl Serialize for NqtAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for NqtAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(i64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(Self(n)),
            Raw::Text(s) => s.parse().map(Self).map_err(serde::de::Error::custom),
        }
    }
}

/// A balance split for display. When a fraction exists, `whole` ends with
/// the decimal point.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct BalanceDisplay {
    pub whole: String,
    pub fraction: Option<String>,
}

impl fmt::Display for BalanceDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.whole)?;
        if let Some(fraction) = &self.fraction {
            f.write_str(fraction)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_coin_strings() {
        assert_eq!(NqtAmount::from_coins_str("1").unwrap().as_nqt(), 100_000_000);
        assert_eq!(NqtAmount::from_coins_str("0.00000001").unwrap().as_nqt(), 1);
        assert_eq!(NqtAmount::from_coins_str(".5").unwrap().as_nqt(), 50_000_000);
        assert_eq!(NqtAmount::from_coins_str("5.").unwrap().as_nqt(), 500_000_000);
        assert_eq!(NqtAmount::from_coins_str("007").unwrap().as_nqt(), 700_000_000);
        assert_eq!(NqtAmount::from_coins_str("000").unwrap(), NqtAmount::ZERO);
    }

    #[test]
    fn extra_decimals_are_truncated() {
        let amount = NqtAmount::from_coins_str("12.345678901").unwrap();
        assert_eq!(amount.as_nqt(), 1_234_567_890);
    }

    #[test]
    fn rejects_garbage() {
        for input in ["", ".", "abc", "1.2.3", "-1", "1,000", " 1"] {
            assert_eq!(
                NqtAmount::from_coins_str(input),
                Err(ParseAmountError::InvalidFormat),
                "{input:?}"
            );
        }
        assert_eq!(
            NqtAmount::from_coins_str("100000000000"),
            Err(ParseAmountError::Overflow)
        );
    }

    #[test]
    fn groups_thousands_and_trims_zeros() {
        let amount = NqtAmount::from_nqt(123_456_789_000_000);
        assert_eq!(amount.to_grouped_string(), "1,234,567.89");
        assert_eq!(amount.to_string(), "1234567.89");
        assert_eq!(NqtAmount::from_nqt(100_000).to_grouped_string(), "0.001");
        assert_eq!(NqtAmount::from_nqt(-250_000_000).to_grouped_string(), "-2.5");
        assert_eq!(NqtAmount::ZERO.to_grouped_string(), "0");
    }

    #[test]
    fn balance_display_carries_decimal_point() {
        let display = NqtAmount::from_nqt(123_450_000_000).to_balance_display();
        assert_eq!(display.whole, "1,234.");
        assert_eq!(display.fraction.as_deref(), Some("5"));
        assert_eq!(display.to_string(), "1,234.5");

        let whole_only = NqtAmount::from_coins(1000).unwrap().to_balance_display();
        assert_eq!(whole_only.whole, "1,000");
        assert_eq!(whole_only.fraction, None);
    }

    #[test]
    fn reads_node_strings() {
        let amount: NqtAmount = serde_json::from_str("\"150000000\"").unwrap();
        assert_eq!(amount, NqtAmount::from_nqt(150_000_000));
        assert_eq!(serde_json::to_string(&amount).unwrap(), "\"150000000\"");
    }
}
