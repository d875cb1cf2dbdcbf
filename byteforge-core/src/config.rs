//! Reader configuration
//!
//! A [`CsvConfiguration`] is fixed when a reader is constructed. It can be
//! built in code with the `with_*` methods or loaded from a YAML profile.

use crate::constants::{DEFAULT_BUFFER_SIZE, DEFAULT_DELIMITER, DEFAULT_QUOTE};
use crate::error::{ByteForgeError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings and failure policies for a CSV reader
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvConfiguration {
    /// Field delimiter
    pub delimiter: char,
    /// Quote character
    pub quote: char,
    /// Size in bytes of each read from the underlying stream
    pub buffer_size: usize,
    /// Whether the first record holds column names
    pub has_header_record: bool,
    /// Raise on blank header names instead of leaving the column unmapped
    pub throw_on_missing_header: bool,
    /// Raise on repeated header names instead of keeping the first index
    pub throw_on_duplicate_header: bool,
    /// Raise when a field cannot be converted instead of using the default
    pub throw_on_type_conversion_failure: bool,
    /// Raise when a record is too short for a bound column, or a bound
    /// column is absent from the header and missing columns are not ignored
    pub throw_on_property_mapping_failure: bool,
    /// Leave fields at their default when their column is not in the header
    pub ignore_missing_columns: bool,
    /// Skip header columns that have no binding in the record schema
    pub ignore_unmapped_columns: bool,
}

impl Default for CsvConfiguration {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            quote: DEFAULT_QUOTE,
            buffer_size: DEFAULT_BUFFER_SIZE,
            has_header_record: true,
            throw_on_missing_header: true,
            throw_on_duplicate_header: true,
            throw_on_type_conversion_failure: true,
            throw_on_property_mapping_failure: true,
            ignore_missing_columns: true,
            ignore_unmapped_columns: true,
        }
    }
}

impl CsvConfiguration {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration that substitutes defaults for every tolerable failure
    pub fn lenient() -> Self {
        Self {
            throw_on_missing_header: false,
            throw_on_duplicate_header: false,
            throw_on_type_conversion_failure: false,
            throw_on_property_mapping_failure: false,
            ..Self::default()
        }
    }

    /// Configuration for tab separated files
    pub fn tab_separated() -> Self {
        Self {
            delimiter: '\t',
            ..Self::default()
        }
    }

    /// Set the field delimiter
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set the quote character
    pub fn with_quote(mut self, quote: char) -> Self {
        self.quote = quote;
        self
    }

    /// Set the size in bytes of each read
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    /// Set whether the first record is a header
    pub fn with_header_record(mut self, has_header_record: bool) -> Self {
        self.has_header_record = has_header_record;
        self
    }

    pub fn with_throw_on_missing_header(mut self, throw: bool) -> Self {
        self.throw_on_missing_header = throw;
        self
    }

    pub fn with_throw_on_duplicate_header(mut self, throw: bool) -> Self {
        self.throw_on_duplicate_header = throw;
        self
    }

    pub fn with_throw_on_type_conversion_failure(mut self, throw: bool) -> Self {
        self.throw_on_type_conversion_failure = throw;
        self
    }

    pub fn with_throw_on_property_mapping_failure(mut self, throw: bool) -> Self {
        self.throw_on_property_mapping_failure = throw;
        self
    }

    pub fn with_ignore_missing_columns(mut self, ignore: bool) -> Self {
        self.ignore_missing_columns = ignore;
        self
    }

    pub fn with_ignore_unmapped_columns(mut self, ignore: bool) -> Self {
        self.ignore_unmapped_columns = ignore;
        self
    }

    /// Check that the configuration can drive a reader
    pub fn validate(&self) -> Result<()> {
        if self.buffer_size == 0 {
            return Err(ByteForgeError::configuration(
                "buffer_size must be greater than zero",
            ));
        }
        if self.delimiter == self.quote {
            return Err(ByteForgeError::configuration(format!(
                "delimiter and quote must differ (both are {:?})",
                self.delimiter
            )));
        }
        for (name, c) in [("delimiter", self.delimiter), ("quote", self.quote)] {
            if c == '\r' || c == '\n' {
                return Err(ByteForgeError::configuration(format!(
                    "{} cannot be a line break",
                    name
                )));
            }
        }
        Ok(())
    }

    /// Load a configuration profile from a YAML string
    ///
    /// # Examples
    ///
    /// ```rust
    /// use byteforge_core::CsvConfiguration;
    ///
    /// let config = CsvConfiguration::from_yaml_str("delimiter: ';'\nbuffer_size: 1024\n")?;
    /// assert_eq!(config.delimiter, ';');
    /// assert_eq!(config.quote, '"');
    /// # Ok::<(), byteforge_core::ByteForgeError>(())
    /// ```
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration profile from a YAML file
    pub fn from_yaml_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&content)
    }

    /// Serialize the configuration as YAML
    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CsvConfiguration::default();
        assert_eq!(config.delimiter, ',');
        assert_eq!(config.quote, '"');
        assert_eq!(config.buffer_size, 8192);
        assert!(config.throw_on_missing_header);
        assert!(config.throw_on_duplicate_header);
        assert!(config.throw_on_type_conversion_failure);
        assert!(config.throw_on_property_mapping_failure);
        assert!(config.ignore_missing_columns);
        assert!(config.ignore_unmapped_columns);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets() {
        let lenient = CsvConfiguration::lenient();
        assert!(!lenient.throw_on_duplicate_header);
        assert!(!lenient.throw_on_type_conversion_failure);
        assert_eq!(CsvConfiguration::tab_separated().delimiter, '\t');
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        let same = CsvConfiguration::new().with_quote(',');
        assert!(matches!(
            same.validate(),
            Err(ByteForgeError::Configuration { .. })
        ));

        let zero = CsvConfiguration::new().with_buffer_size(0);
        assert!(zero.validate().is_err());

        let newline = CsvConfiguration::new().with_delimiter('\n');
        assert!(newline.validate().is_err());
    }

    #[test]
    fn test_yaml_profile() {
        let yaml = "delimiter: ';'\nthrow_on_duplicate_header: false\n";
        let config = CsvConfiguration::from_yaml_str(yaml).unwrap();
        assert_eq!(config.delimiter, ';');
        assert!(!config.throw_on_duplicate_header);
        assert!(config.throw_on_missing_header);

        let dumped = config.to_yaml_string().unwrap();
        let reloaded = CsvConfiguration::from_yaml_str(&dumped).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_yaml_profile_missing_columns_flag() {
        let config = CsvConfiguration::from_yaml_str("ignore_missing_columns: false\n").unwrap();
        assert!(!config.ignore_missing_columns);
        assert!(config.throw_on_property_mapping_failure);
    }

    #[test]
    fn test_yaml_profile_is_validated() {
        let result = CsvConfiguration::from_yaml_str("buffer_size: 0\n");
        assert!(matches!(
            result,
            Err(ByteForgeError::Configuration { .. })
        ));
    }

    #[test]
    fn test_yaml_profile_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.yaml");
        std::fs::write(&path, "quote: \"'\"\n").unwrap();

        let config = CsvConfiguration::from_yaml_path(&path).unwrap();
        assert_eq!(config.quote, '\'');
    }
}
