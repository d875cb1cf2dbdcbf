//! ByteForge
//!
//! Data-table support for Unity projects: a streaming CSV reader with
//! header lookup, typed record binding and a template for new CSV assets.
//!
//! # Examples
//!
//! ## Reading records
//!
//! ```rust,no_run
//! use byteforge::{CsvConfiguration, CsvReader};
//!
//! let mut reader = CsvReader::from_path("Assets/Data/Items.csv", CsvConfiguration::default())?;
//! reader.read_header()?;
//!
//! while reader.read()? {
//!     println!("{} costs {}", reader.get_field_by_name("Name")?, reader.get_field_by_name("Price")?);
//! }
//! # Ok::<(), byteforge::ByteForgeError>(())
//! ```
//!
//! ## Loading every table in a project
//!
//! ```rust,no_run
//! use byteforge::environment::Environment;
//!
//! let mut env = Environment::new();
//! env.load("Assets")?;
//!
//! for (path, table) in env.tables() {
//!     println!("{}: {} rows", path.display(), table.rows.len());
//! }
//! # Ok::<(), byteforge::ByteForgeError>(())
//! ```

// Re-export from core crate
pub use byteforge_core::{ByteForgeError, CsvConfiguration, LineEnding, Result, constants::*};

// Re-export from CSV crate
pub use byteforge_csv::{
    CsvReader, CsvRecord, CsvWriter, FromField, HeaderMap, MappedRecords, ReaderState,
    RecordSchema, Records, template,
};

/// Environment for loading the CSV tables of a project
pub mod environment {
    use crate::{ByteForgeError, CsvConfiguration, CsvReader, Result};
    use std::collections::BTreeMap;
    use std::path::{Path, PathBuf};
    use tracing::{debug, warn};

    /// A fully loaded CSV table
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct CsvTable {
        /// Header names, empty when the configuration has no header record
        pub headers: Vec<String>,
        /// Data records
        pub rows: Vec<Vec<String>>,
    }

    impl CsvTable {
        /// Read a whole file into memory
        pub fn load<P: AsRef<Path>>(path: P, config: &CsvConfiguration) -> Result<Self> {
            let mut reader = CsvReader::from_path(path, config.clone())?;

            let headers = if config.has_header_record {
                reader.read_header()?.names().to_vec()
            } else {
                Vec::new()
            };
            let rows = reader.records().collect::<Result<Vec<_>>>()?;

            Ok(Self { headers, rows })
        }

        /// Smallest and largest field count over all rows
        pub fn width_range(&self) -> Option<(usize, usize)> {
            let min = self.rows.iter().map(Vec::len).min()?;
            let max = self.rows.iter().map(Vec::len).max()?;
            Some((min, max))
        }
    }

    /// Unified environment for the CSV tables of a project
    pub struct Environment {
        config: CsvConfiguration,
        tables: BTreeMap<PathBuf, CsvTable>,
        failures: Vec<(PathBuf, ByteForgeError)>,
    }

    impl Environment {
        /// Create a new environment with the default reader configuration
        pub fn new() -> Self {
            Self::with_config(CsvConfiguration::default())
        }

        /// Create a new environment with a custom reader configuration
        pub fn with_config(config: CsvConfiguration) -> Self {
            Self {
                config,
                tables: BTreeMap::new(),
                failures: Vec::new(),
            }
        }

        /// Load tables from a path (file or directory)
        pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
            let path = path.as_ref();

            if path.is_file() {
                self.load_file(path)?;
            } else if path.is_dir() {
                self.load_directory(path)?;
            } else {
                return Err(ByteForgeError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("Path does not exist: {:?}", path),
                )));
            }

            Ok(())
        }

        /// Load a single CSV file
        pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
            let path = path.as_ref();
            let table = CsvTable::load(path, &self.config)?;
            debug!(path = %path.display(), rows = table.rows.len(), "loaded CSV table");
            self.tables.insert(path.to_path_buf(), table);
            Ok(())
        }

        /// Load all CSV files below a directory
        ///
        /// Files that fail to parse are recorded in [`Environment::failures`]
        /// and do not stop the traversal.
        pub fn load_directory<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
            self.traverse_directory(path.as_ref())
        }

        fn traverse_directory(&mut self, dir: &Path) -> Result<()> {
            for entry in std::fs::read_dir(dir)? {
                let path = entry?.path();

                if path.is_dir() {
                    // Skip generated Unity directories
                    match path.file_name().and_then(|n| n.to_str()) {
                        Some("Library" | "Temp" | "Logs" | "obj" | ".git" | ".vs") => continue,
                        _ => self.traverse_directory(&path)?,
                    }
                } else if is_csv(&path) {
                    if let Err(e) = self.load_file(&path) {
                        warn!(path = %path.display(), error = %e, "failed to load CSV table");
                        self.failures.push((path, e));
                    }
                }
            }

            Ok(())
        }

        /// Loaded tables keyed by path, in path order
        pub fn tables(&self) -> impl Iterator<Item = (&Path, &CsvTable)> {
            self.tables.iter().map(|(path, table)| (path.as_path(), table))
        }

        /// Table loaded from `path`
        pub fn table<P: AsRef<Path>>(&self, path: P) -> Option<&CsvTable> {
            self.tables.get(path.as_ref())
        }

        /// Files that could not be loaded during directory traversal
        pub fn failures(&self) -> &[(PathBuf, ByteForgeError)] {
            &self.failures
        }

        pub fn len(&self) -> usize {
            self.tables.len()
        }

        pub fn is_empty(&self) -> bool {
            self.tables.is_empty()
        }
    }

    impl Default for Environment {
        fn default() -> Self {
            Self::new()
        }
    }

    fn is_csv(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(crate::CSV_EXTENSION))
    }
}
