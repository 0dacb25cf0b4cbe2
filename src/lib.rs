//! # quotecsv
//!
//! A character-level CSV tokenizer for the quoted-field dialect: a field may be
//! wrapped in double quotes, inside which commas and line breaks are literal
//! and `""` stands for one `"`.
//!
//! The core is [`csv::Tokenizer`], a finite-state machine fed one character at
//! a time. [`CsvParser`] drives it over a whole string, eagerly or lazily, and
//! [`CsvReader`] / [`CsvWriter`] connect it to files and streams.
//!
//! ## Example
//!
//! ```
//! use quotecsv::CsvParser;
//!
//! let records = CsvParser::default().parse("a,,b\n\"x\ny\",\"say \"\"hi\"\"\"\n")?;
//!
//! assert_eq!(records.len(), 2);
//! assert_eq!(records[0], ["a", "", "b"]);
//! assert_eq!(records[1], ["x\ny", "say \"hi\""]);
//! # Ok::<(), quotecsv::CsvError>(())
//! ```
//!
//! ## Errors
//!
//! A quote left open at end of input fails with
//! [`CsvError::UnterminatedQuotedField`]. Content between a closing quote and
//! the next delimiter fails with [`CsvError::MalformedQuotedField`] unless the
//! dialect uses [`AfterQuote::Append`]. Both carry the [`Position`] and the
//! tokenizer [`State`](csv::State) at the failure.

pub mod csv;
pub mod csv_reader;
pub mod csv_writer;
pub mod error;
pub mod types;

pub use csv::{AfterQuote, CsvEncoder, CsvParser, Dialect, Records};
pub use csv_reader::CsvReader;
pub use csv_writer::{CsvWriter, LineEnding};
pub use error::{CsvError, Position, Result};
pub use types::Record;
