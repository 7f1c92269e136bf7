use serde::{Deserialize, Serialize};
use std::fmt;

/// Exchange symbol. Always trimmed, non-empty and uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ticker(String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickerError {
    Empty,
}

impl fmt::Display for TickerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TickerError::Empty => write!(f, "Please enter a stock ticker."),
        }
    }
}

impl std::error::Error for TickerError {}

impl Ticker {
    pub fn parse(input: &str) -> Result<Self, TickerError> {
        let t = input.trim();
        if t.is_empty() {
            return Err(TickerError::Empty);
        }
        Ok(Self(t.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Ticker {
    type Error = TickerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Ticker::parse(&value)
    }
}

impl From<Ticker> for String {
    fn from(value: Ticker) -> Self {
        value.0
    }
}

impl AsRef<str> for Ticker {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_and_whitespace() {
        let t = Ticker::parse("  aapl ").unwrap();
        assert_eq!(t.as_str(), "AAPL");
        assert_eq!(t, Ticker::parse("AAPL").unwrap());
    }

    #[test]
    fn rejects_blank_input() {
        assert_eq!(Ticker::parse("   "), Err(TickerError::Empty));
        assert_eq!(Ticker::parse(""), Err(TickerError::Empty));
    }

    #[test]
    fn keeps_non_alphabetic_symbols() {
        // Only emptiness is validated; class shares and suffixes pass through.
        assert_eq!(Ticker::parse("brk.b").unwrap().as_str(), "BRK.B");
    }

    #[test]
    fn deserializes_from_plain_string() {
        let t: Ticker = serde_json::from_str("\"msft\"").unwrap();
        assert_eq!(t.as_str(), "MSFT");
        assert!(serde_json::from_str::<Ticker>("\" \"").is_err());
    }
}
