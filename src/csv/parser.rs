//! CSV parsing with RFC 4180-like quoting
//!
//! [`CsvParser`] drives a [`Tokenizer`] over a whole input, either collecting
//! every record at once ([`CsvParser::parse`]) or handing them out lazily
//! ([`CsvParser::records`]).

use crate::csv::dialect::Dialect;
use crate::csv::tokenizer::Tokenizer;
use crate::error::Result;
use crate::types::Record;
use std::iter::FusedIterator;

/// CSV parser for reading CSV data
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvParser {
    dialect: Dialect,
}

impl CsvParser {
    /// Create a new CSV parser with custom delimiter and quote character
    pub fn new(delimiter: char, quote_char: char) -> Result<Self> {
        Self::with_dialect(Dialect::new(delimiter, quote_char))
    }

    /// Create a parser from a full dialect
    pub fn with_dialect(dialect: Dialect) -> Result<Self> {
        dialect.validate()?;
        Ok(Self { dialect })
    }

    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// Parse the whole input into records
    ///
    /// # Examples
    ///
    /// ```
    /// use quotecsv::CsvParser;
    ///
    /// let records = CsvParser::default().parse("name,motto\nBob,\"Say \"\"Hi\"\"\"\n")?;
    /// assert_eq!(records.len(), 2);
    /// assert_eq!(records[1], ["Bob", "Say \"Hi\""]);
    /// # Ok::<(), quotecsv::CsvError>(())
    /// ```
    pub fn parse(&self, input: &str) -> Result<Vec<Record>> {
        self.records(input.chars()).collect()
    }

    /// Lazily parse records from a character source
    ///
    /// # Examples
    ///
    /// ```
    /// use quotecsv::CsvParser;
    ///
    /// let parser = CsvParser::default();
    /// let mut records = parser.records("a,b\nc,d".chars());
    /// assert_eq!(records.next().unwrap()?, ["a", "b"]);
    /// assert_eq!(records.next().unwrap()?, ["c", "d"]);
    /// assert!(records.next().is_none());
    /// # Ok::<(), quotecsv::CsvError>(())
    /// ```
    pub fn records<I>(&self, chars: I) -> Records<I::IntoIter>
    where
        I: IntoIterator<Item = char>,
    {
        Records::new(
            chars.into_iter(),
            Tokenizer::with_valid_dialect(self.dialect),
        )
    }

    /// Parse the first record of `line`
    ///
    /// An empty line is one empty field. Anything after the first record
    /// terminator is not looked at.
    pub fn parse_line(&self, line: &str) -> Result<Record> {
        match self.records(line.chars()).next() {
            Some(record) => record,
            None => Ok(Record::new(0, vec![String::new()])),
        }
    }
}

/// Lazy iterator over parsed records
///
/// Stops after the first error. Dropping it early keeps the records already
/// yielded and discards the one in progress.
pub struct Records<I> {
    chars: I,
    tokenizer: Tokenizer,
    finished: bool,
}

impl<I> Records<I>
where
    I: Iterator<Item = char>,
{
    pub(crate) fn new(chars: I, tokenizer: Tokenizer) -> Self {
        Self {
            chars,
            tokenizer,
            finished: false,
        }
    }

    /// The tokenizer driving this iterator
    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }
}

impl<I> Iterator for Records<I>
where
    I: Iterator<Item = char>,
{
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        for ch in self.chars.by_ref() {
            match self.tokenizer.feed(ch) {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => {}
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                }
            }
        }

        self.finished = true;
        self.tokenizer.finish().transpose()
    }
}

impl<I> FusedIterator for Records<I> where I: Iterator<Item = char> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv::dialect::AfterQuote;
    use crate::csv::tokenizer::State;
    use crate::error::CsvError;

    fn parse(input: &str) -> Vec<Vec<String>> {
        CsvParser::default()
            .parse(input)
            .unwrap()
            .into_iter()
            .map(Record::into_fields)
            .collect()
    }

    #[test]
    fn test_simple() {
        assert_eq!(parse("a,b,c"), vec![vec!["a", "b", "c"]]);
    }

    #[test]
    fn test_quoted() {
        assert_eq!(parse(r#""a,b",c"#), vec![vec!["a,b", "c"]]);
    }

    #[test]
    fn test_escaped_quotes() {
        assert_eq!(
            parse(r#""Say ""Hello""",world"#),
            vec![vec![r#"Say "Hello""#, "world"]]
        );
    }

    #[test]
    fn test_empty_fields() {
        assert_eq!(parse("a,,b"), vec![vec!["a", "", "b"]]);
    }

    #[test]
    fn test_all_empty() {
        assert_eq!(parse(",,"), vec![vec!["", "", ""]]);
    }

    #[test]
    fn test_quoted_with_newline() {
        assert_eq!(parse("\"a\nb\",c"), vec![vec!["a\nb", "c"]]);
    }

    #[test]
    fn test_mixed_quoted_unquoted() {
        assert_eq!(parse(r#"a,"b,c",d"#), vec![vec!["a", "b,c", "d"]]);
    }

    #[test]
    fn test_custom_delimiter() {
        let parser = CsvParser::new(';', '"').unwrap();
        assert_eq!(parser.parse_line(r#"a;"b;c";d"#).unwrap(), ["a", "b;c", "d"]);
    }

    #[test]
    fn test_trailing_terminator_is_optional() {
        assert_eq!(parse("a,b\n"), vec![vec!["a", "b"]]);
        assert_eq!(parse("a,b"), vec![vec!["a", "b"]]);
    }

    #[test]
    fn test_multiple_records_in_order() {
        let records = CsvParser::default().parse("a,b\nc,d\n").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], ["a", "b"]);
        assert_eq!(records[0].index, 0);
        assert_eq!(records[1], ["c", "d"]);
        assert_eq!(records[1].index, 1);
    }

    #[test]
    fn test_unterminated_quote() {
        let err = CsvParser::default().parse("\"abc").unwrap_err();
        assert!(matches!(
            err,
            CsvError::UnterminatedQuotedField {
                state: State::QuotedField,
                ..
            }
        ));
    }

    #[test]
    fn test_content_after_closing_quote() {
        let err = CsvParser::default().parse("\"field\"x,y").unwrap_err();
        assert!(matches!(
            err,
            CsvError::MalformedQuotedField { found: 'x', .. }
        ));

        let lenient =
            CsvParser::with_dialect(Dialect::default().after_quote(AfterQuote::Append)).unwrap();
        assert_eq!(lenient.parse("\"field\"x,y").unwrap()[0], ["fieldx", "y"]);
    }

    #[test]
    fn test_records_stop_after_error() {
        let parser = CsvParser::default();
        let mut records = parser.records("ok\n\"bad\"!\nnever".chars());
        assert_eq!(records.next().unwrap().unwrap(), ["ok"]);
        assert!(records.next().unwrap().is_err());
        assert!(records.next().is_none());
        assert!(records.next().is_none());
    }

    #[test]
    fn test_records_are_lazy() {
        let parser = CsvParser::default();
        let mut records = parser.records("a\nb\n\"unterminated".chars());
        assert_eq!(records.next().unwrap().unwrap(), ["a"]);
        assert_eq!(records.tokenizer().state(), State::RecordEnd);
        // stopping here never reaches the bad tail
        drop(records);
    }

    #[test]
    fn test_empty_input() {
        assert!(parse("").is_empty());
    }

    #[test]
    fn test_empty_line() {
        let parser = CsvParser::default();
        assert_eq!(parser.parse_line("").unwrap(), [""]);
        assert_eq!(parser.parse_line("hello\n").unwrap(), ["hello"]);
    }

    #[test]
    fn test_quoted_empty() {
        assert_eq!(parse(r#""","""#), vec![vec!["", ""]]);
    }

    #[test]
    fn test_invalid_dialect() {
        assert!(CsvParser::new(',', ',').is_err());
    }
}
