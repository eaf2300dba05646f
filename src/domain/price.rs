use crate::error::PriceParseError;

/// Turns scraped price text like `"$1,299.00"` into a number.
///
/// Currency symbols and the thousands separator are removed before parsing.
/// There is no currency conversion, so `"€10"` and `"$10"` parse to the same
/// value when both symbols are configured.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceParser {
    currency_symbols: Vec<String>,
    thousands_separator: char,
}

impl Default for PriceParser {
    fn default() -> Self {
        PriceParser {
            currency_symbols: vec!["$".to_string()],
            thousands_separator: ',',
        }
    }
}

impl PriceParser {
    pub fn new(currency_symbols: Vec<String>, thousands_separator: char) -> Self {
        PriceParser {
            currency_symbols: currency_symbols
                .into_iter()
                .filter(|s| !s.is_empty())
                .collect(),
            thousands_separator,
        }
    }

    pub fn parse(&self, url: &str, raw: &str) -> Result<f64, PriceParseError> {
        // Symbols go first: one may contain the separator, as in "Rs.".
        let mut cleaned = raw.to_string();
        for symbol in self.currency_symbols.iter() {
            cleaned = cleaned.replace(symbol.as_str(), "");
        }
        let cleaned = cleaned.replace(self.thousands_separator, "");

        match cleaned.trim().parse::<f64>() {
            Ok(price) if price.is_finite() => Ok(price),
            _ => Err(PriceParseError {
                url: url.to_string(),
                raw: raw.to_string(),
            }),
        }
    }
}
