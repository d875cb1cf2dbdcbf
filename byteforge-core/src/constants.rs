//! Constants and shared definitions for CSV reading and writing
//!
//! Default reader settings, line ending styles and the literal content of
//! newly created CSV assets.

use serde::{Deserialize, Serialize};

/// Default field delimiter
pub const DEFAULT_DELIMITER: char = ',';

/// Default quote character
pub const DEFAULT_QUOTE: char = '"';

/// Default read-ahead buffer size, in characters
pub const DEFAULT_BUFFER_SIZE: usize = 8192;

/// File extension used for CSV assets
pub const CSV_EXTENSION: &str = "csv";

/// Header row written into a new CSV asset
pub const TEMPLATE_HEADER: [&str; 3] = ["Column1", "Column2", "Column3"];

/// Data row written into a new CSV asset
pub const TEMPLATE_ROW: [&str; 3] = ["Value1", "Value2", "Value3"];

/// Line ending types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    Unix,    // \n
    Windows, // \r\n
    Mac,     // \r
}

impl Default for LineEnding {
    fn default() -> Self {
        #[cfg(windows)]
        return LineEnding::Windows;
        #[cfg(not(windows))]
        return LineEnding::Unix;
    }
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Unix => "\n",
            LineEnding::Windows => "\r\n",
            LineEnding::Mac => "\r",
        }
    }

    /// Parse a line ending from its name (`unix`, `windows`, `mac`)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "unix" | "lf" => Some(LineEnding::Unix),
            "windows" | "crlf" => Some(LineEnding::Windows),
            "mac" | "cr" => Some(LineEnding::Mac),
            _ => None,
        }
    }
}
