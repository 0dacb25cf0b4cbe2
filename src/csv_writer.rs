//! CSV writing with quoting that the tokenizer reads back unchanged

use crate::csv::{CsvEncoder, Dialect};
use crate::error::{CsvError, Result};
use crate::types::Record;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Record terminator written after each record
///
/// Only the terminators the tokenizer splits records on are offered, so
/// written output always reads back as the same records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LineEnding {
    /// `\n`
    #[default]
    Lf,
    /// `\r\n`
    CrLf,
    /// `\r`
    Cr,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
            LineEnding::Cr => "\r",
        }
    }
}

/// CSV writer
///
/// Writes records one at a time, quoting any field that contains the
/// delimiter, the quote character or a line break.
///
/// # Examples
///
/// ```no_run
/// use quotecsv::csv_writer::CsvWriter;
///
/// let mut writer = CsvWriter::new("output.csv").unwrap();
/// writer.write_record(["Name", "Motto"]).unwrap();
/// writer.write_record(["Alice", "Say \"Hi\", then\nleave"]).unwrap();
/// writer.save().unwrap();
/// ```
pub struct CsvWriter<W: Write = BufWriter<File>> {
    writer: W,

    // State
    record_count: u64,
    buffer: String,

    // Configuration
    encoder: CsvEncoder,
    line_ending: LineEnding,
}

impl CsvWriter<BufWriter<File>> {
    /// Create a new CSV file
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path.as_ref())
            .map_err(|e| CsvError::WriteError(format!("Failed to create CSV file: {}", e)))?;
        Ok(Self::from_writer(BufWriter::new(file)))
    }
}

impl<W: Write> CsvWriter<W> {
    /// Write CSV to any byte sink
    ///
    /// ```
    /// use quotecsv::csv_writer::CsvWriter;
    ///
    /// let mut writer = CsvWriter::from_writer(Vec::new());
    /// writer.write_record(["a,b", "c"])?;
    /// assert_eq!(writer.into_inner()?, b"\"a,b\",c\n");
    /// # Ok::<(), quotecsv::CsvError>(())
    /// ```
    pub fn from_writer(writer: W) -> Self {
        CsvWriter {
            writer,
            record_count: 0,
            buffer: String::with_capacity(4096),
            encoder: CsvEncoder::default(),
            line_ending: LineEnding::Lf,
        }
    }

    /// Set the dialect used for quoting (builder pattern)
    pub fn dialect(mut self, dialect: Dialect) -> Result<Self> {
        self.encoder = CsvEncoder::with_dialect(&dialect)?;
        Ok(self)
    }

    /// Set the record terminator, `LineEnding::Lf` by default (builder pattern)
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use quotecsv::csv_writer::{CsvWriter, LineEnding};
    ///
    /// let mut writer = CsvWriter::new("data.csv")
    ///     .unwrap()
    ///     .line_ending(LineEnding::CrLf);
    /// ```
    pub fn line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    /// Write one record
    ///
    /// A record needs at least one field: a record with none has no text
    /// form distinct from a single empty field.
    pub fn write_record<I, S>(&mut self, data: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let fields: Vec<S> = data.into_iter().collect();
        if fields.is_empty() {
            return Err(CsvError::WriteError(format!(
                "Record {} has no fields",
                self.record_count + 1
            )));
        }

        // Reuse buffer
        self.buffer.clear();
        self.encoder.encode_record(&fields, &mut self.buffer);
        self.buffer.push_str(self.line_ending.as_str());

        self.writer
            .write_all(self.buffer.as_bytes())
            .map_err(|e| CsvError::WriteError(format!("Failed to write to file: {}", e)))?;

        self.record_count += 1;
        Ok(())
    }

    /// Write parsed records back out
    pub fn write_parsed(&mut self, records: &[Record]) -> Result<()> {
        for record in records {
            self.write_record(record.fields())?;
        }
        Ok(())
    }

    /// Write multiple records at once
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use quotecsv::csv_writer::CsvWriter;
    ///
    /// let mut writer = CsvWriter::new("data.csv").unwrap();
    /// let records = vec![
    ///     vec!["Alice", "30"],
    ///     vec!["Bob", "25"],
    /// ];
    /// writer.write_records(records).unwrap();
    /// ```
    pub fn write_records<I, R, S>(&mut self, records: I) -> Result<()>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for record in records {
            self.write_record(record)?;
        }
        Ok(())
    }

    /// Get the number of records written
    pub fn record_count(&self) -> u64 {
        self.record_count
    }

    /// Flush and hand back the underlying writer
    pub fn into_inner(mut self) -> Result<W> {
        self.writer
            .flush()
            .map_err(|e| CsvError::WriteError(format!("Failed to flush file: {}", e)))?;
        Ok(self.writer)
    }

    /// Flush and close the output
    ///
    /// This must be called to properly close the file.
    /// Consumes the writer.
    pub fn save(self) -> Result<()> {
        self.into_inner().map(drop)
    }
}
