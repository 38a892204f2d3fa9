//! Fixed-point money with a derived display format.

use serde::{Deserialize, Serialize};

/// Settlement currency for the system.
///
/// The whole system runs in a single fixed currency, chosen at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    #[serde(rename = "EUR")]
    Eur,
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "GBP")]
    Gbp,
}

impl Currency {
    /// Returns the ISO 4217 code.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Eur => "EUR",
            Currency::Usd => "USD",
            Currency::Gbp => "GBP",
        }
    }

    /// Returns the display symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Eur => "\u{20ac}",
            Currency::Usd => "$",
            Currency::Gbp => "\u{a3}",
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = UnknownCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "EUR" => Ok(Currency::Eur),
            "USD" => Ok(Currency::Usd),
            "GBP" => Ok(Currency::Gbp),
            other => Err(UnknownCurrency(other.to_string())),
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Error returned when parsing an unsupported currency code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCurrency(pub String);

impl std::fmt::Display for UnknownCurrency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown currency code: {}", self.0)
    }
}

impl std::error::Error for UnknownCurrency {}

/// Money amount in minor currency units (cents) to avoid floating point issues.
///
/// The formatted display string is a pure derived view and is never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Amount in minor units (e.g., 1000 = 10.00).
    amount: i64,
    currency: Currency,
}

impl Money {
    /// Creates a new Money amount from minor units.
    pub fn from_minor(amount: i64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Returns zero money in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: 0,
            currency,
        }
    }

    /// Returns the amount in minor units.
    pub fn amount(&self) -> i64 {
        self.amount
    }

    /// Returns the currency.
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    /// Adds another amount. Both amounts must be in the same currency.
    ///
    /// Saturates at the `i64` bounds rather than wrapping, so a hostile
    /// price can never flip a total negative.
    pub fn add(&self, other: Money) -> Money {
        debug_assert_eq!(self.currency, other.currency);
        Money {
            amount: self.amount.saturating_add(other.amount),
            currency: self.currency,
        }
    }

    /// Multiplies by a quantity, saturating at the `i64` bounds.
    pub fn multiply(&self, quantity: i64) -> Money {
        Money {
            amount: self.amount.saturating_mul(quantity),
            currency: self.currency,
        }
    }

    /// Returns the formatted display string, e.g. `"\u{20ac}5.00"`.
    pub fn formatted(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let units = (self.amount / 100).abs();
        let cents = (self.amount % 100).abs();
        let sign = if self.amount < 0 { "-" } else { "" };
        write!(f, "{}{}{}.{:02}", sign, self.currency.symbol(), units, cents)
    }
}

impl std::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Self) -> Self::Output {
        Money::add(&self, rhs)
    }
}

impl std::ops::AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        debug_assert_eq!(self.currency, rhs.currency);
        self.amount = self.amount.saturating_add(rhs.amount);
    }
}
