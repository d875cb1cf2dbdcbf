//! Error types for ByteForge CSV reading

use std::io;
use thiserror::Error;

/// Result type alias for ByteForge operations
pub type Result<T> = std::result::Result<T, ByteForgeError>;

/// Main error type for CSV reading and record mapping
#[derive(Error, Debug)]
pub enum ByteForgeError {
    /// The reader was used after it was closed
    #[error("CSV reader has been disposed")]
    Disposed,

    /// A field accessor was called before `read()` produced a record
    #[error("No current record: call read() before accessing fields")]
    NoCurrentRecord,

    /// Field index outside the current record
    #[error("Field index {index} is out of range for a record with {len} fields")]
    IndexOutOfRange { index: usize, len: usize },

    /// Name-based access without a header mapping
    #[error("Headers have not been read: call read_header() first")]
    HeadersNotRead,

    /// Name not present in the header mapping
    #[error("Header '{name}' not found")]
    HeaderNotFound { name: String },

    /// The stream contained no header record
    #[error("Header record is missing: the input is empty")]
    HeaderMissing,

    /// A header column name was blank
    #[error("Header field at column {index} is blank")]
    HeaderFieldMissing { index: usize },

    /// The same header name appeared more than once
    #[error("Duplicate header '{name}'")]
    DuplicateHeader { name: String },

    /// A field value could not be converted to the bound type
    #[error("Type conversion error: cannot convert '{value}' in column '{column}' to {target}")]
    TypeConversion {
        column: String,
        value: String,
        target: String,
    },

    /// A bound column could not be mapped onto the record
    #[error("Property mapping error for column '{column}': {message}")]
    PropertyMapping { column: String, message: String },

    /// Unexpected failure while pulling data from the stream
    #[error("CSV parse error at line {line}: {source}")]
    CsvParse {
        line: u64,
        #[source]
        source: io::Error,
    },

    /// Invalid reader configuration
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// IO errors outside of record parsing (opening, writing files)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Configuration profile could not be (de)serialized
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ByteForgeError {
    /// Create an index out of range error
    pub fn index_out_of_range(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }

    /// Create a header not found error
    pub fn header_not_found<S: Into<String>>(name: S) -> Self {
        Self::HeaderNotFound { name: name.into() }
    }

    /// Create a duplicate header error
    pub fn duplicate_header<S: Into<String>>(name: S) -> Self {
        Self::DuplicateHeader { name: name.into() }
    }

    /// Create a type conversion error
    pub fn type_conversion<C, V, T>(column: C, value: V, target: T) -> Self
    where
        C: Into<String>,
        V: Into<String>,
        T: Into<String>,
    {
        Self::TypeConversion {
            column: column.into(),
            value: value.into(),
            target: target.into(),
        }
    }

    /// Create a property mapping error
    pub fn property_mapping<C: Into<String>, M: Into<String>>(column: C, message: M) -> Self {
        Self::PropertyMapping {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Wrap a stream failure with the line it happened on
    pub fn csv_parse(line: u64, source: io::Error) -> Self {
        Self::CsvParse { line, source }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Accessor misuse that always raises regardless of configuration
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Self::Disposed
                | Self::NoCurrentRecord
                | Self::IndexOutOfRange { .. }
                | Self::HeadersNotRead
                | Self::HeaderNotFound { .. }
        )
    }

    /// Failures that a configuration flag may turn into a default value
    pub fn is_policy_controlled(&self) -> bool {
        matches!(self, Self::TypeConversion { .. } | Self::PropertyMapping { .. })
    }

    /// Line number attached to the error, if any
    pub fn line(&self) -> Option<u64> {
        match self {
            Self::CsvParse { line, .. } => Some(*line),
            _ => None,
        }
    }
}
