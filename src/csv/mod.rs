//! CSV utilities: dialect, tokenizer, parsing and encoding

mod dialect;
mod encoder;
mod parser;
mod tokenizer;

pub use dialect::{AfterQuote, Dialect};
pub use encoder::CsvEncoder;
pub use parser::{CsvParser, Records};
pub use tokenizer::{CharClass, State, Tokenizer};
