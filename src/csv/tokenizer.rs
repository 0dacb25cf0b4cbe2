//! Character-level CSV tokenizer
//!
//! The tokenizer is a finite-state machine fed one character at a time. It
//! owns the field being built and the record being assembled, and hands a
//! finished [`Record`] back to the caller whenever a record terminator (or the
//! end of input) closes one.
//!
//! Every `(State, CharClass)` pair is covered by a single `match` in
//! [`Tokenizer::transition`], so the compiler rejects a table with a hole in it.
//!
//! # Examples
//!
//! ```
//! use quotecsv::csv::{Tokenizer, State};
//!
//! let mut tokenizer = Tokenizer::default();
//! let mut records = Vec::new();
//! for ch in "a,\"b\nc\"\nd".chars() {
//!     if let Some(record) = tokenizer.feed(ch)? {
//!         records.push(record);
//!     }
//! }
//! records.extend(tokenizer.finish()?);
//!
//! assert_eq!(records.len(), 2);
//! assert_eq!(records[0], ["a", "b\nc"]);
//! assert_eq!(records[1], ["d"]);
//! assert_eq!(tokenizer.state(), State::Done);
//! # Ok::<(), quotecsv::CsvError>(())
//! ```

use crate::csv::dialect::{AfterQuote, Dialect};
use crate::error::{CsvError, Position, Result};
use crate::types::Record;
use log::trace;
use std::fmt;
use std::mem;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tokenizer states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum State {
    /// At the first character of a field; not yet known whether it is quoted
    FieldStart,
    /// Accumulating an unquoted field
    UnquotedField,
    /// Inside a quoted field; delimiters and terminators are literal
    QuotedField,
    /// Saw a quote inside a quoted field: either the closing quote or the
    /// first half of an escaped one
    QuoteInQuoted,
    /// A record terminator was just consumed
    RecordEnd,
    /// End of input reached and the last record flushed
    Done,
}

impl State {
    /// All states, in declaration order
    pub const ALL: [State; 6] = [
        State::FieldStart,
        State::UnquotedField,
        State::QuotedField,
        State::QuoteInQuoted,
        State::RecordEnd,
        State::Done,
    ];

    fn name(self) -> &'static str {
        match self {
            State::FieldStart => "FieldStart",
            State::UnquotedField => "UnquotedField",
            State::QuotedField => "QuotedField",
            State::QuoteInQuoted => "QuoteInQuoted",
            State::RecordEnd => "RecordEnd",
            State::Done => "Done",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How the tokenizer sees one input character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Delimiter,
    Quote,
    LineFeed,
    CarriageReturn,
    Other(char),
    EndOfInput,
}

impl CharClass {
    /// Classify `ch` under `dialect`
    pub fn classify(ch: char, dialect: &Dialect) -> CharClass {
        if ch == dialect.delimiter {
            CharClass::Delimiter
        } else if ch == dialect.quote {
            CharClass::Quote
        } else if ch == '\n' {
            CharClass::LineFeed
        } else if ch == '\r' {
            CharClass::CarriageReturn
        } else {
            CharClass::Other(ch)
        }
    }
}

/// What a transition does to the field and record buffers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    /// Consume the character, buffers untouched
    Skip,
    /// Append a character to the field buffer
    Push(char),
    /// Move the field buffer into the record
    EndField,
    /// Move the field buffer into the record and emit the record
    EndRecord,
    /// End of input with nothing pending
    Finish,
    /// Input ended inside quotes
    Unterminated,
    /// Content after a closing quote
    Malformed(char),
}

/// Streaming CSV tokenizer
///
/// Each parse needs its own instance. Records that were already returned stay
/// valid if the caller stops feeding early; the partly built record is dropped
/// with the tokenizer.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    dialect: Dialect,
    state: State,
    field: String,
    fields: Vec<String>,
    // last terminator was '\r', so a following '\n' belongs to it
    after_cr: bool,
    char_offset: u64,
    byte_offset: u64,
    records_emitted: u64,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::with_valid_dialect(Dialect::default())
    }
}

impl Tokenizer {
    /// Create a tokenizer for `dialect`
    pub fn new(dialect: Dialect) -> Result<Self> {
        dialect.validate()?;
        Ok(Self::with_valid_dialect(dialect))
    }

    pub(crate) fn with_valid_dialect(dialect: Dialect) -> Self {
        Self {
            dialect,
            state: State::FieldStart,
            field: String::new(),
            fields: Vec::new(),
            after_cr: false,
            char_offset: 0,
            byte_offset: 0,
            records_emitted: 0,
        }
    }

    /// Current state
    pub fn state(&self) -> State {
        self.state
    }

    /// Dialect in use
    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// Number of records handed out so far
    pub fn records_emitted(&self) -> u64 {
        self.records_emitted
    }

    /// Position of the next character to be fed
    pub fn position(&self) -> Position {
        Position {
            char_offset: self.char_offset,
            byte_offset: self.byte_offset,
            record: self.records_emitted + 1,
            field: self.fields.len() as u64 + 1,
        }
    }

    /// Return to `FieldStart` with empty buffers and counters
    pub fn reset(&mut self) {
        self.transition_to(State::FieldStart, None);
        self.field.clear();
        self.fields.clear();
        self.after_cr = false;
        self.char_offset = 0;
        self.byte_offset = 0;
        self.records_emitted = 0;
    }

    /// Feed one character, returning a record if this character completed one
    ///
    /// After an error the parse is over; call [`reset`](Self::reset) to reuse
    /// the tokenizer.
    pub fn feed(&mut self, ch: char) -> Result<Option<Record>> {
        let class = CharClass::classify(ch, &self.dialect);
        let record = self.apply(class)?;
        self.char_offset += 1;
        self.byte_offset += ch.len_utf8() as u64;
        Ok(record)
    }

    /// Signal end of input, flushing the final record if there is one
    ///
    /// Calling it again once `Done` is a no-op. Feeding more characters after
    /// `Done` starts a new sequence of records.
    pub fn finish(&mut self) -> Result<Option<Record>> {
        self.apply(CharClass::EndOfInput)
    }

    fn apply(&mut self, class: CharClass) -> Result<Option<Record>> {
        let (next, action) = self.transition(class);

        let record = match action {
            Action::Skip | Action::Finish => None,
            Action::Push(ch) => {
                self.field.push(ch);
                None
            }
            Action::EndField => {
                self.end_field();
                None
            }
            Action::EndRecord => Some(self.end_record()),
            Action::Unterminated => {
                return Err(CsvError::UnterminatedQuotedField {
                    position: self.position(),
                    state: self.state,
                });
            }
            Action::Malformed(found) => {
                return Err(CsvError::MalformedQuotedField {
                    position: self.position(),
                    state: self.state,
                    found,
                });
            }
        };

        self.after_cr = next == State::RecordEnd && class == CharClass::CarriageReturn;
        self.transition_to(next, Some(class));
        Ok(record)
    }

    /// The transition table: next state and buffer action for `class` in the
    /// current state
    pub(crate) fn transition(&self, class: CharClass) -> (State, Action) {
        use CharClass::*;

        match self.state {
            State::FieldStart => match class {
                // nothing at all was fed: empty input has no records
                EndOfInput if self.fields.is_empty() && self.records_emitted == 0 => {
                    (State::Done, Action::Finish)
                }
                _ => Self::at_field_start(class),
            },
            State::UnquotedField => match class {
                Other(ch) => (State::UnquotedField, Action::Push(ch)),
                // quotes are only special at the start of a field
                Quote => (State::UnquotedField, Action::Push(self.dialect.quote)),
                Delimiter => (State::FieldStart, Action::EndField),
                LineFeed | CarriageReturn => (State::RecordEnd, Action::EndRecord),
                EndOfInput => (State::Done, Action::EndRecord),
            },
            State::QuotedField => match class {
                Quote => (State::QuoteInQuoted, Action::Skip),
                Delimiter => (State::QuotedField, Action::Push(self.dialect.delimiter)),
                LineFeed => (State::QuotedField, Action::Push('\n')),
                CarriageReturn => (State::QuotedField, Action::Push('\r')),
                Other(ch) => (State::QuotedField, Action::Push(ch)),
                EndOfInput => (State::QuotedField, Action::Unterminated),
            },
            State::QuoteInQuoted => match class {
                Quote => (State::QuotedField, Action::Push(self.dialect.quote)),
                Delimiter => (State::FieldStart, Action::EndField),
                LineFeed | CarriageReturn => (State::RecordEnd, Action::EndRecord),
                EndOfInput => (State::Done, Action::EndRecord),
                Other(ch) => match self.dialect.after_quote {
                    AfterQuote::Reject => (State::QuoteInQuoted, Action::Malformed(ch)),
                    AfterQuote::Append => (State::UnquotedField, Action::Push(ch)),
                },
            },
            State::RecordEnd => match class {
                EndOfInput => (State::Done, Action::Finish),
                // second half of "\r\n"
                LineFeed if self.after_cr => (State::RecordEnd, Action::Skip),
                _ => Self::at_field_start(class),
            },
            State::Done => match class {
                EndOfInput => (State::Done, Action::Finish),
                _ => Self::at_field_start(class),
            },
        }
    }

    fn at_field_start(class: CharClass) -> (State, Action) {
        match class {
            CharClass::Other(ch) => (State::UnquotedField, Action::Push(ch)),
            CharClass::Quote => (State::QuotedField, Action::Skip),
            CharClass::Delimiter => (State::FieldStart, Action::EndField),
            CharClass::LineFeed | CharClass::CarriageReturn => {
                (State::RecordEnd, Action::EndRecord)
            }
            CharClass::EndOfInput => (State::Done, Action::EndRecord),
        }
    }

    fn transition_to(&mut self, next: State, class: Option<CharClass>) {
        if next != self.state {
            trace!(
                "Tokenizer is transitioning from {} to {} on {:?}",
                self.state,
                next,
                class
            );
            self.state = next;
        }
    }

    fn end_field(&mut self) {
        self.fields.push(mem::take(&mut self.field));
    }

    fn end_record(&mut self) -> Record {
        self.end_field();
        let record = Record::new(self.records_emitted, mem::take(&mut self.fields));
        self.records_emitted += 1;
        record
    }
}
