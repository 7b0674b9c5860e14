//! Currency-aware price formatting
//!
//! The formatter holds a copy of the currency fields it was built from and
//! nothing else; rebuilding it from new settings is the only way it changes.

use rust_decimal::prelude::*;
use shared::models::TenantSettings;

/// Round a monetary amount to `minor_units` places, half away from zero
#[inline]
pub fn round_money(amount: Decimal, minor_units: u32) -> Decimal {
    amount.round_dp_with_strategy(minor_units, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats prices with a tenant's currency
///
/// ```
/// use crab_guest::PriceFormatter;
/// use rust_decimal::Decimal;
/// use shared::models::TenantSettings;
///
/// let formatter = PriceFormatter::new(&TenantSettings::default());
/// assert_eq!(formatter.format(Decimal::new(123456, 2)), "$1,234.56");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceFormatter {
    currency_code: String,
    currency_symbol: String,
    minor_units: u32,
}

impl PriceFormatter {
    pub fn new(settings: &TenantSettings) -> Self {
        Self {
            currency_code: settings.currency_code.clone(),
            currency_symbol: settings.currency_symbol.clone(),
            minor_units: settings.minor_units(),
        }
    }

    pub fn currency_code(&self) -> &str {
        &self.currency_code
    }

    pub fn currency_symbol(&self) -> &str {
        &self.currency_symbol
    }

    pub fn minor_units(&self) -> u32 {
        self.minor_units
    }

    /// Round to the currency's minor units
    pub fn round(&self, amount: Decimal) -> Decimal {
        round_money(amount, self.minor_units)
    }

    /// `$1,234.56`, `-$5.00`, `Rp 25,000`
    ///
    /// A symbol ending in a letter is separated from the amount by a space.
    pub fn format(&self, amount: Decimal) -> String {
        let (sign, number) = self.number(amount);
        let separator = if self
            .currency_symbol
            .chars()
            .last()
            .is_some_and(char::is_alphabetic)
        {
            " "
        } else {
            ""
        };
        format!("{sign}{}{separator}{number}", self.currency_symbol)
    }

    /// `1,234.56 USD`
    pub fn format_with_code(&self, amount: Decimal) -> String {
        let (sign, number) = self.number(amount);
        format!("{sign}{number} {}", self.currency_code)
    }

    /// Sign and grouped absolute value
    fn number(&self, amount: Decimal) -> (&'static str, String) {
        let rounded = self.round(amount);
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };

        let plain = format!("{:.*}", self.minor_units as usize, rounded.abs());
        let number = match plain.split_once('.') {
            Some((whole, fraction)) => format!("{}.{fraction}", group_thousands(whole)),
            None => group_thousands(&plain),
        };
        (sign, number)
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
