//! CSV reading from files and byte streams
//!
//! Input is read a line at a time and fed to the [`Tokenizer`]
//! character by character, so a quoted field that spans several lines
//! comes back as one field.

use crate::csv::{Dialect, Tokenizer};
use crate::error::{CsvError, Result};
use crate::types::Record;
use log::debug;
use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// CSV reader with streaming capabilities
///
/// Reads CSV records one at a time using an iterator pattern. Memory usage is
/// bounded by the longest record, not the file size.
///
/// # Examples
///
/// ```no_run
/// use quotecsv::csv_reader::CsvReader;
///
/// let mut reader = CsvReader::open("data.csv").unwrap();
///
/// for record_result in reader.records() {
///     let record = record_result.unwrap();
///     println!("{:?}", record.fields());
/// }
/// ```
///
/// # With Headers
///
/// ```no_run
/// use quotecsv::csv_reader::CsvReader;
///
/// let mut reader = CsvReader::open("data.csv")
///     .unwrap()
///     .has_header(true);
///
/// for record_result in reader.records() {
///     let record = record_result.unwrap();
///     // Process data records (header already consumed)
/// }
///
/// if let Some(headers) = reader.headers() {
///     println!("Headers: {:?}", headers);
/// }
/// ```
pub struct CsvReader {
    source: Box<dyn BufRead>,

    // Parser state
    tokenizer: Option<Tokenizer>,
    line_buffer: String,
    pending: VecDeque<Record>,
    record_count: u64,
    finished: bool,

    // Configuration
    dialect: Dialect,
    has_header: bool,
    headers: Vec<String>,
}

impl CsvReader {
    /// Open a CSV file
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use quotecsv::csv_reader::CsvReader;
    ///
    /// let reader = CsvReader::open("data.csv").unwrap();
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let file = File::open(path_ref)
            .map_err(|e| CsvError::ReadError(format!("Failed to open CSV file: {}", e)))?;
        debug!("Opened CSV file {}", path_ref.display());
        Ok(Self::from_reader(file))
    }

    /// Read CSV from any byte source
    ///
    /// ```
    /// use quotecsv::csv_reader::CsvReader;
    ///
    /// let mut reader = CsvReader::from_reader("a,b\n\"c\nd\",e\n".as_bytes());
    /// let records: Vec<_> = reader.records().collect::<Result<_, _>>()?;
    /// assert_eq!(records[1], ["c\nd", "e"]);
    /// # Ok::<(), quotecsv::CsvError>(())
    /// ```
    pub fn from_reader<R: Read + 'static>(reader: R) -> Self {
        CsvReader {
            source: Box::new(BufReader::new(reader)),
            tokenizer: None,
            line_buffer: String::with_capacity(1024),
            pending: VecDeque::new(),
            record_count: 0,
            finished: false,
            dialect: Dialect::default(),
            has_header: false,
            headers: Vec::new(),
        }
    }

    /// Set the full dialect (builder pattern)
    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Set custom delimiter (builder pattern)
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use quotecsv::csv_reader::CsvReader;
    ///
    /// let reader = CsvReader::open("data.csv")
    ///     .unwrap()
    ///     .delimiter(';');
    /// ```
    pub fn delimiter(mut self, delim: char) -> Self {
        self.dialect.delimiter = delim;
        self
    }

    /// Set custom quote character (builder pattern)
    pub fn quote_char(mut self, quote: char) -> Self {
        self.dialect.quote = quote;
        self
    }

    /// Indicate that the first record contains headers (builder pattern)
    ///
    /// When set to `true`, the first record is stored and accessible via
    /// `headers()` instead of being returned.
    pub fn has_header(mut self, has: bool) -> Self {
        self.has_header = has;
        self
    }

    /// Get header record if one was read
    pub fn headers(&self) -> Option<&[String]> {
        if self.headers.is_empty() {
            None
        } else {
            Some(&self.headers)
        }
    }

    /// Read a single record
    ///
    /// Returns `Ok(None)` when EOF is reached. The dialect is validated on the
    /// first call.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use quotecsv::csv_reader::CsvReader;
    ///
    /// let mut reader = CsvReader::open("data.csv").unwrap();
    ///
    /// while let Some(record) = reader.read_record().unwrap() {
    ///     println!("{}", record);
    /// }
    /// ```
    pub fn read_record(&mut self) -> Result<Option<Record>> {
        loop {
            let Some(record) = self.next_raw_record()? else {
                return Ok(None);
            };

            if self.has_header && self.headers.is_empty() && record.index == 0 {
                self.headers = record.into_fields();
                continue;
            }

            self.record_count += 1;
            return Ok(Some(record));
        }
    }

    fn next_raw_record(&mut self) -> Result<Option<Record>> {
        if self.tokenizer.is_none() {
            self.tokenizer = Some(Tokenizer::new(self.dialect)?);
        }

        while self.pending.is_empty() && !self.finished {
            self.fill_pending()?;
        }
        Ok(self.pending.pop_front())
    }

    fn fill_pending(&mut self) -> Result<()> {
        let Some(tokenizer) = self.tokenizer.as_mut() else {
            return Err(CsvError::ReadError("No tokenizer available".to_string()));
        };

        self.line_buffer.clear();
        let bytes_read = self
            .source
            .read_line(&mut self.line_buffer)
            .map_err(|e| {
                self.finished = true;
                CsvError::ReadError(format!("Failed to read line: {}", e))
            })?;

        if bytes_read == 0 {
            self.finished = true;
            let last = tokenizer.finish()?;
            debug!(
                "Reached end of CSV input after {} records",
                tokenizer.records_emitted()
            );
            self.pending.extend(last);
            return Ok(());
        }

        for ch in self.line_buffer.chars() {
            match tokenizer.feed(ch) {
                Ok(record) => self.pending.extend(record),
                Err(e) => {
                    self.finished = true;
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    /// Get iterator over records
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use quotecsv::csv_reader::CsvReader;
    ///
    /// let mut reader = CsvReader::open("data.csv").unwrap();
    ///
    /// for record_result in reader.records() {
    ///     let record = record_result.unwrap();
    ///     println!("{}", record);
    /// }
    /// ```
    pub fn records(&mut self) -> CsvRecordIterator<'_> {
        CsvRecordIterator { reader: self }
    }

    /// Get the number of data records read so far
    pub fn record_count(&self) -> u64 {
        self.record_count
    }
}

/// Iterator over CSV records
pub struct CsvRecordIterator<'a> {
    reader: &'a mut CsvReader,
}

impl<'a> Iterator for CsvRecordIterator<'a> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.read_record().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv::AfterQuote;
    use std::io::Cursor;

    fn read_all(reader: &mut CsvReader) -> Result<Vec<Record>> {
        reader.records().collect()
    }

    #[test]
    fn test_read_plain_csv() -> Result<()> {
        let input = "Name,Age,City\nAlice,30,NYC\nBob,25,SF\n";
        let mut reader = CsvReader::from_reader(Cursor::new(input));
        let records = read_all(&mut reader)?;

        assert_eq!(records.len(), 3);
        assert_eq!(records[0], ["Name", "Age", "City"]);
        assert_eq!(records[1], ["Alice", "30", "NYC"]);
        assert_eq!(reader.record_count(), 3);
        Ok(())
    }

    #[test]
    fn test_read_with_headers() -> Result<()> {
        let mut reader =
            CsvReader::from_reader(Cursor::new("ID,Name\n1,Alice\n2,Bob")).has_header(true);
        assert_eq!(reader.headers(), None); // Not read yet

        let records = read_all(&mut reader)?;

        assert_eq!(
            reader.headers(),
            Some(&["ID".to_string(), "Name".to_string()][..])
        );
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], ["1", "Alice"]);
        assert_eq!(reader.record_count(), 2);
        Ok(())
    }

    #[test]
    fn test_quoted_field_spans_lines() -> Result<()> {
        let input = "id,note\r\n1,\"first line\r\nsecond, still \"\"quoted\"\"\"\r\n2,x\r\n";
        let mut reader = CsvReader::from_reader(Cursor::new(input));
        let records = read_all(&mut reader)?;

        assert_eq!(records.len(), 3);
        assert_eq!(records[1], ["1", "first line\r\nsecond, still \"quoted\""]);
        assert_eq!(records[2], ["2", "x"]);
        Ok(())
    }

    #[test]
    fn test_custom_delimiter_and_quote() -> Result<()> {
        let mut reader = CsvReader::from_reader(Cursor::new("a;'b;c'\n"))
            .delimiter(';')
            .quote_char('\'');
        assert_eq!(read_all(&mut reader)?[0], ["a", "b;c"]);
        Ok(())
    }

    #[test]
    fn test_unterminated_quote_is_an_error() {
        let mut reader = CsvReader::from_reader(Cursor::new("a\n\"open\nstill open\n"));
        let mut records = reader.records();
        assert_eq!(records.next().unwrap().unwrap(), ["a"]);
        assert!(matches!(
            records.next(),
            Some(Err(CsvError::UnterminatedQuotedField { .. }))
        ));
        assert!(records.next().is_none());
    }

    #[test]
    fn test_lenient_dialect() -> Result<()> {
        let mut reader = CsvReader::from_reader(Cursor::new("\"a\"b,c\n"))
            .dialect(Dialect::default().after_quote(AfterQuote::Append));
        assert_eq!(read_all(&mut reader)?[0], ["ab", "c"]);
        Ok(())
    }

    #[test]
    fn test_invalid_dialect_fails_on_first_read() {
        let mut reader = CsvReader::from_reader(Cursor::new("a,b\n")).quote_char(',');
        assert!(matches!(reader.read_record(), Err(CsvError::InvalidDialect(_))));
    }

    #[test]
    fn test_invalid_utf8_is_a_read_error() {
        let mut reader = CsvReader::from_reader(Cursor::new(vec![b'a', 0xff, b'\n']));
        assert!(matches!(reader.read_record(), Err(CsvError::ReadError(_))));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            CsvReader::open("definitely/not/here.csv"),
            Err(CsvError::ReadError(_))
        ));
    }
}
