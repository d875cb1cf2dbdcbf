//! ByteForge CSV
//!
//! Streaming CSV reading for Unity data tables: a buffered record parser
//! with RFC 4180 style quoting, case-insensitive header lookup, and typed
//! record binding through explicitly declared schemas.
//!
//! # Examples
//!
//! ```rust
//! use byteforge_csv::{CsvReader, CsvRecord, RecordSchema};
//!
//! #[derive(Debug, Default)]
//! struct Weapon {
//!     name: String,
//!     damage: u32,
//! }
//!
//! impl CsvRecord for Weapon {
//!     fn schema() -> RecordSchema<Self> {
//!         RecordSchema::new()
//!             .field("Name", |w: &mut Weapon, v: String| w.name = v)
//!             .field("Damage", |w: &mut Weapon, v: u32| w.damage = v)
//!     }
//! }
//!
//! let csv = "Name,Damage\nSword,12\n\"Bow, Long\",8\n";
//! let mut reader = CsvReader::from_reader(csv.as_bytes());
//! let weapons: Vec<Weapon> = reader.get_records()?;
//!
//! assert_eq!(weapons.len(), 2);
//! assert_eq!(weapons[1].name, "Bow, Long");
//! # Ok::<(), byteforge_csv::ByteForgeError>(())
//! ```

// Re-export core types
pub use byteforge_core::{
    ByteForgeError, CsvConfiguration, LineEnding, Result, constants::*,
};

mod buffer;
pub mod convert;
pub mod header;
pub mod reader;
pub mod records;
pub mod schema;
pub mod template;
pub mod writer;

// Re-export main types
pub use convert::FromField;
pub use header::HeaderMap;
pub use reader::{CsvReader, ReaderState};
pub use records::{MappedRecords, Records};
pub use schema::{CsvRecord, RecordSchema};
pub use writer::CsvWriter;
