//! CSV dialect configuration

use crate::error::{CsvError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What to do with characters that follow a closing quote
///
/// Input like `"field"x,next` is ambiguous: the quote closed the field but
/// more content arrived before the delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AfterQuote {
    /// Fail with `MalformedQuotedField`
    #[default]
    Reject,
    /// Keep the characters as literal content; the rest of the field is unquoted
    Append,
}

/// Delimiter, quote character and quoting policy for one parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Dialect {
    pub delimiter: char,
    pub quote: char,
    pub after_quote: AfterQuote,
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            delimiter: ',',
            quote: '"',
            after_quote: AfterQuote::Reject,
        }
    }
}

impl Dialect {
    /// Create a dialect with custom delimiter and quote character
    pub fn new(delimiter: char, quote: char) -> Self {
        Self {
            delimiter,
            quote,
            ..Self::default()
        }
    }

    /// Set the delimiter (builder pattern)
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set the quote character (builder pattern)
    pub fn quote(mut self, quote: char) -> Self {
        self.quote = quote;
        self
    }

    /// Set the policy for content after a closing quote (builder pattern)
    pub fn after_quote(mut self, policy: AfterQuote) -> Self {
        self.after_quote = policy;
        self
    }

    /// Check that the delimiter and quote can be told apart from each other
    /// and from record terminators
    pub fn validate(&self) -> Result<()> {
        if self.delimiter == self.quote {
            return Err(CsvError::InvalidDialect(format!(
                "delimiter and quote are both {:?}",
                self.delimiter
            )));
        }
        for (name, ch) in [("delimiter", self.delimiter), ("quote", self.quote)] {
            if ch == '\n' || ch == '\r' {
                return Err(CsvError::InvalidDialect(format!(
                    "{} cannot be a line terminator ({:?})",
                    name, ch
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_comma_and_double_quote() {
        let dialect = Dialect::default();
        assert_eq!(dialect.delimiter, ',');
        assert_eq!(dialect.quote, '"');
        assert_eq!(dialect.after_quote, AfterQuote::Reject);
        assert!(dialect.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let dialect = Dialect::default()
            .delimiter(';')
            .quote('\'')
            .after_quote(AfterQuote::Append);
        assert_eq!(dialect, Dialect::new(';', '\'').after_quote(AfterQuote::Append));
    }

    #[test]
    fn test_rejects_ambiguous_characters() {
        assert!(matches!(
            Dialect::new('"', '"').validate(),
            Err(CsvError::InvalidDialect(_))
        ));
        assert!(Dialect::new('\n', '"').validate().is_err());
        assert!(Dialect::new(',', '\r').validate().is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_round_trip() {
        let dialect = Dialect::new(';', '\'').after_quote(AfterQuote::Append);
        let json = serde_json::to_string(&dialect).unwrap();
        assert_eq!(json, r#"{"delimiter":";","quote":"'","after_quote":"Append"}"#);
        let back: Dialect = serde_json::from_str(&json).unwrap();
        assert_eq!(back, dialect);
    }
}
