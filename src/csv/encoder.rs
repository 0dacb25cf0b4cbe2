//! CSV encoding with RFC 4180-like behavior

use crate::csv::dialect::Dialect;
use crate::error::Result;

/// CSV encoder producing text the tokenizer reads back unchanged
#[derive(Debug, Clone, Copy)]
pub struct CsvEncoder {
    delimiter: char,
    quote: char,
}

impl Default for CsvEncoder {
    fn default() -> Self {
        let dialect = Dialect::default();
        Self {
            delimiter: dialect.delimiter,
            quote: dialect.quote,
        }
    }
}

impl CsvEncoder {
    /// Create a new CSV encoder with custom delimiter and quote character
    pub fn new(delimiter: char, quote: char) -> Result<Self> {
        Self::with_dialect(&Dialect::new(delimiter, quote))
    }

    /// Create an encoder for `dialect`, rejecting ones the tokenizer could not
    /// read back
    pub fn with_dialect(dialect: &Dialect) -> Result<Self> {
        dialect.validate()?;
        Ok(Self {
            delimiter: dialect.delimiter,
            quote: dialect.quote,
        })
    }

    /// Encode one record (without a line ending) into `buffer`
    pub fn encode_record<S: AsRef<str>>(&self, fields: &[S], buffer: &mut String) {
        // a lone empty field would otherwise look like a blank line
        if let [only] = fields {
            if only.as_ref().is_empty() {
                buffer.push(self.quote);
                buffer.push(self.quote);
                return;
            }
        }

        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                buffer.push(self.delimiter);
            }
            self.encode_field(field.as_ref(), buffer);
        }
    }

    /// Encode one record into a new string
    pub fn encode_to_string<S: AsRef<str>>(&self, fields: &[S]) -> String {
        let mut buffer = String::new();
        self.encode_record(fields, &mut buffer);
        buffer
    }

    fn encode_field(&self, field: &str, buffer: &mut String) {
        if !self.needs_quoting(field) {
            buffer.push_str(field);
            return;
        }

        buffer.push(self.quote);
        for ch in field.chars() {
            if ch == self.quote {
                // " -> ""
                buffer.push(self.quote);
            }
            buffer.push(ch);
        }
        buffer.push(self.quote);
    }

    /// Check if field requires quoting
    fn needs_quoting(&self, field: &str) -> bool {
        field
            .chars()
            .any(|c| c == self.delimiter || c == self.quote || c == '\n' || c == '\r')
    }
}
