//! Type definitions for parsed CSV data

use std::fmt;
use std::ops::Index;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One parsed record: the fields between two record terminators
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Record {
    /// Record index (0-based, in input order)
    pub index: u64,
    /// Fields in this record
    pub fields: Vec<String>,
}

impl Record {
    /// Create a new record
    pub fn new(index: u64, fields: Vec<String>) -> Self {
        Record { index, fields }
    }

    /// Get field at column index
    pub fn get(&self, col: usize) -> Option<&str> {
        self.fields.get(col).map(String::as_str)
    }

    /// Get number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the record has no fields
    ///
    /// Never true for parser output: a blank line is one empty field.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Borrow the fields
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Take ownership of the fields
    pub fn into_fields(self) -> Vec<String> {
        self.fields
    }

    /// Iterate over fields as string slices
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(String::as_str)
    }
}

impl Index<usize> for Record {
    type Output = str;

    fn index(&self, col: usize) -> &str {
        &self.fields[col]
    }
}

impl From<Vec<String>> for Record {
    fn from(fields: Vec<String>) -> Self {
        Record::new(0, fields)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.fields)
    }
}

impl PartialEq<Vec<&str>> for Record {
    fn eq(&self, other: &Vec<&str>) -> bool {
        self.fields.iter().map(String::as_str).eq(other.iter().copied())
    }
}

impl<const N: usize> PartialEq<[&str; N]> for Record {
    fn eq(&self, other: &[&str; N]) -> bool {
        self.fields.iter().map(String::as_str).eq(other.iter().copied())
    }
}
