use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// ISO 4217 currency representation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_uppercase())
    }

    pub fn usd() -> Self {
        Self::new("USD")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::usd()
    }
}

impl From<String> for CurrencyCode {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for CurrencyCode {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single amount tagged with its currency.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Price {
    pub amount: f64,
    pub currency: CurrencyCode,
}

impl Price {
    pub fn new(amount: f64, currency: impl Into<CurrencyCode>) -> Self {
        Self {
            amount,
            currency: currency.into(),
        }
    }
}

/// Ordered list of prices holding at most one entry per currency.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(from = "Vec<Price>", into = "Vec<Price>")]
pub struct PriceList(Vec<Price>);

impl PriceList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `amount` for `currency`, replacing an existing entry in place.
    pub fn set(&mut self, currency: impl Into<CurrencyCode>, amount: f64) {
        let currency = currency.into();
        match self.0.iter_mut().find(|price| price.currency == currency) {
            Some(existing) => existing.amount = amount,
            None => self.0.push(Price { amount, currency }),
        }
    }

    pub fn get(&self, currency: &CurrencyCode) -> Option<&Price> {
        self.0.iter().find(|price| &price.currency == currency)
    }

    pub fn amount(&self, currency: &CurrencyCode) -> Option<f64> {
        self.get(currency).map(|price| price.amount)
    }

    pub fn remove(&mut self, currency: &CurrencyCode) -> Option<Price> {
        let index = self.0.iter().position(|price| &price.currency == currency)?;
        Some(self.0.remove(index))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Price> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Price] {
        &self.0
    }
}

impl From<Vec<Price>> for PriceList {
    /// Later duplicates of a currency replace earlier ones.
    fn from(prices: Vec<Price>) -> Self {
        let mut list = PriceList::new();
        for price in prices {
            list.set(price.currency, price.amount);
        }
        list
    }
}

impl From<PriceList> for Vec<Price> {
    fn from(list: PriceList) -> Self {
        list.0
    }
}

/// Where a currency symbol is rendered relative to the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolPlacement {
    Prefix,
    Suffix,
}

static SYMBOLS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("USD", "$"),
        ("RUB", "₽"),
        ("EUR", "€"),
        ("TRY", "₺"),
        ("GBP", "£"),
    ])
});

pub fn symbol_for(code: &CurrencyCode) -> String {
    SYMBOLS
        .get(code.as_str())
        .map(|symbol| symbol.to_string())
        .unwrap_or_else(|| code.as_str().to_string())
}

/// Only USD and RUB put the symbol in front; every other currency trails it.
pub fn symbol_placement(code: &CurrencyCode) -> SymbolPlacement {
    match code.as_str() {
        "USD" | "RUB" => SymbolPlacement::Prefix,
        _ => SymbolPlacement::Suffix,
    }
}

/// Picks the entry for `currency`, else the USD entry, else the first entry.
pub fn select_price<'a>(prices: &'a PriceList, currency: &CurrencyCode) -> Option<&'a Price> {
    prices
        .get(currency)
        .or_else(|| prices.get(&CurrencyCode::usd()))
        .or_else(|| prices.as_slice().first())
}

/// Amount of the selected entry; `0.0` for an empty list.
pub fn numeric_price(prices: &PriceList, currency: &CurrencyCode) -> f64 {
    select_price(prices, currency)
        .map(|price| price.amount)
        .unwrap_or(0.0)
}

/// Formatted amount of the selected entry, rendered in that entry's currency.
pub fn display_price(prices: &PriceList, currency: &CurrencyCode) -> String {
    select_price(prices, currency)
        .map(format_price)
        .unwrap_or_default()
}

pub fn format_price(price: &Price) -> String {
    let body = format_amount(price.amount.abs());
    let sign = if price.amount < 0.0 { "-" } else { "" };
    let symbol = symbol_for(&price.currency);
    match symbol_placement(&price.currency) {
        SymbolPlacement::Prefix => format!("{sign}{symbol}{body}"),
        SymbolPlacement::Suffix => format!("{sign}{body} {symbol}"),
    }
}

/// Groups thousands with `,`; whole amounts drop the fractional part.
pub fn format_amount(value: f64) -> String {
    let precision = if value.fract().abs() < f64::EPSILON { 0 } else { 2 };
    let body = format!("{:.*}", precision, value);
    match body.split_once('.') {
        Some((int_part, fraction)) => format!("{}.{}", group_digits(int_part, ','), fraction),
        None => group_digits(&body, ','),
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };
    let mut grouped = String::new();
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    format!("{sign}{grouped}")
}
