//! ByteForge Core
//!
//! Core types shared by the ByteForge CSV crates: the error taxonomy,
//! reader configuration and format constants.

pub mod config;
pub mod constants;
pub mod error;

// Re-export main types
pub use config::CsvConfiguration;
pub use constants::*;
pub use error::{ByteForgeError, Result};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_functionality() {
        let config = CsvConfiguration::default();
        assert_eq!(config.delimiter, DEFAULT_DELIMITER);
        assert_eq!(config.buffer_size, DEFAULT_BUFFER_SIZE);
    }
}
