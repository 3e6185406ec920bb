use rust_decimal::{Decimal, RoundingStrategy};

/// Display settings for one currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Currency {
    pub id: i32,
    pub code: &'static str,
    pub symbol: &'static str,
    pub precision: u32,
    pub thousand_separator: &'static str,
    pub decimal_separator: &'static str,
}

const fn currency(id: i32, code: &'static str, symbol: &'static str) -> Currency {
    Currency { id, code, symbol, precision: 2, thousand_separator: ",", decimal_separator: "." }
}

/// Built-in currency table keyed by id.
pub static CURRENCIES: &[Currency] = &[
    currency(1, "USD", "$"),
    currency(2, "GBP", "£"),
    currency(3, "EUR", "€"),
    currency(4, "ZAR", "R"),
    currency(5, "DKK", "kr"),
    currency(6, "ILS", "NIS "),
    currency(7, "SEK", "kr"),
    currency(8, "KES", "KSh "),
    currency(9, "CAD", "C$"),
    currency(10, "PHP", "P "),
    currency(11, "INR", "Rs. "),
    currency(12, "AUD", "$"),
];

pub fn find_currency(id: i32) -> Option<&'static Currency> {
    CURRENCIES.iter().find(|c| c.id == id)
}

/// Formats monetary amounts for display.
pub trait MoneyFormatter: Send + Sync {
    /// Amount with the currency's symbol, precision and separators.
    fn format(&self, amount: Decimal, currency_id: i32) -> String;
    /// Amount with two decimals and no symbol.
    fn format_plain(&self, amount: Decimal) -> String;
}

/// `MoneyFormatter` backed by [`CURRENCIES`]. Unknown ids use the fallback currency.
#[derive(Debug, Clone, Copy)]
pub struct CurrencyFormatter {
    fallback: &'static Currency,
}

impl CurrencyFormatter {
    pub fn new(fallback_currency_id: i32) -> Self {
        Self { fallback: find_currency(fallback_currency_id).unwrap_or(&CURRENCIES[0]) }
    }
}

impl Default for CurrencyFormatter {
    fn default() -> Self { Self::new(1) }
}

impl MoneyFormatter for CurrencyFormatter {
    fn format(&self, amount: Decimal, currency_id: i32) -> String {
        let c = find_currency(currency_id).unwrap_or(self.fallback);
        let number = format_number(amount.abs(), c.precision, c.thousand_separator, c.decimal_separator);
        let sign = if is_negative(amount, c.precision) { "-" } else { "" };
        format!("{sign}{}{number}", c.symbol)
    }

    fn format_plain(&self, amount: Decimal) -> String {
        let sign = if is_negative(amount, 2) { "-" } else { "" };
        format!("{sign}{}", format_number(amount.abs(), 2, ",", "."))
    }
}

fn is_negative(amount: Decimal, precision: u32) -> bool {
    let rounded = round_half_up(amount, precision);
    rounded.is_sign_negative() && !rounded.is_zero()
}

/// Round to `dp` places, midpoints away from zero.
pub fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Group the integer part by thousands and pad the fraction to `precision` digits.
pub fn format_number(value: Decimal, precision: u32, thousand_separator: &str, decimal_separator: &str) -> String {
    let rounded = round_half_up(value, precision);
    let text = format!("{:.*}", precision as usize, rounded.abs());
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(text.len() + digits.len() / 3);
    for (i, d) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push_str(thousand_separator);
        }
        grouped.push(*d);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    match frac_part {
        Some(f) if precision > 0 => format!("{sign}{grouped}{decimal_separator}{f}"),
        _ => format!("{sign}{grouped}"),
    }
}
