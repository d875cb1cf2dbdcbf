//! Header mapping
//!
//! Case-insensitive lookup from column name to column index, built once
//! from the first record of a file. Surrounding whitespace is ignored on
//! both sides of the lookup.

use byteforge_core::{ByteForgeError, CsvConfiguration, Result};
use indexmap::IndexMap;
use tracing::warn;

/// Column names of a CSV file and their indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMap {
    /// Header record as read, in column order
    names: Vec<String>,
    /// Trimmed, lower-cased name to column index
    index: IndexMap<String, usize>,
}

impl HeaderMap {
    /// Build a header mapping from a header record
    ///
    /// Blank names and duplicate names are errors unless the configuration
    /// tolerates them. A tolerated blank column is left unmapped and a
    /// tolerated duplicate keeps the index of its first occurrence.
    pub fn from_record(record: &[String], config: &CsvConfiguration) -> Result<Self> {
        let mut index = IndexMap::with_capacity(record.len());

        for (column, name) in record.iter().enumerate() {
            if name.trim().is_empty() {
                if config.throw_on_missing_header {
                    return Err(ByteForgeError::HeaderFieldMissing { index: column });
                }
                warn!(column, "blank header name left unmapped");
                continue;
            }

            let key = lookup_key(name);
            if let Some(&first) = index.get(&key) {
                if config.throw_on_duplicate_header {
                    return Err(ByteForgeError::duplicate_header(name.as_str()));
                }
                warn!(header = %name, first, column, "duplicate header ignored");
                continue;
            }
            index.insert(key, column);
        }

        Ok(Self {
            names: record.to_vec(),
            index,
        })
    }

    /// Column index for `name`, compared case-insensitively after trimming
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(&lookup_key(name)).copied()
    }

    /// Check if a column with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Header names in column order, as they appeared in the file
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Mapped (name, index) pairs in column order, with names as written
    pub fn mapped(&self) -> impl Iterator<Item = (&str, usize)> {
        self.index
            .values()
            .map(|&column| (self.names[column].as_str(), column))
    }

    /// Number of mapped columns
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

fn lookup_key(name: &str) -> String {
    name.trim().to_lowercase()
}
