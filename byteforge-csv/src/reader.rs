//! Streaming CSV reader
//!
//! [`CsvReader`] pulls characters from a byte stream through a fixed-size
//! buffer and assembles them into records, one per call to
//! [`CsvReader::read`]. Quoted fields may contain delimiters, doubled quotes
//! and line breaks.

use crate::buffer::CharBuffer;
use crate::header::HeaderMap;
use crate::records::{MappedRecords, Records};
use crate::schema::{CsvRecord, RecordSchema};
use byteforge_core::{ByteForgeError, CsvConfiguration, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, instrument, warn};

/// Lifecycle of a reader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderState {
    /// Nothing has been read yet
    Created,
    /// At least one record (or the header) has been read
    Reading,
    /// The stream reached its end
    Exhausted,
    /// The reader was closed and released its stream
    Disposed,
}

/// Streaming CSV reader over any [`Read`] source
///
/// # Examples
///
/// ```rust
/// use byteforge_csv::CsvReader;
///
/// let mut reader = CsvReader::from_reader("Name,Age\nAnn,30\n".as_bytes());
/// reader.read_header()?;
///
/// while reader.read()? {
///     assert_eq!(reader.get_field_by_name("age")?, "30");
///     assert_eq!(reader.get_field(0)?, "Ann");
/// }
/// # Ok::<(), byteforge_core::ByteForgeError>(())
/// ```
pub struct CsvReader<R> {
    source: Option<CharBuffer<R>>,
    config: CsvConfiguration,
    headers: Option<HeaderMap>,
    record: Option<Vec<String>>,
    state: ReaderState,
    /// 1-based line of the read cursor
    line: u64,
    /// Line on which the current record started
    record_line: u64,
    record_count: u64,
}

impl<R: Read> CsvReader<R> {
    /// Create a reader with a validated configuration
    pub fn new(reader: R, config: CsvConfiguration) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(reader, config))
    }

    /// Create a reader with the default configuration
    pub fn from_reader(reader: R) -> Self {
        Self::build(reader, CsvConfiguration::default())
    }

    fn build(reader: R, config: CsvConfiguration) -> Self {
        Self {
            source: Some(CharBuffer::new(reader, config.buffer_size)),
            config,
            headers: None,
            record: None,
            state: ReaderState::Created,
            line: 1,
            record_line: 1,
            record_count: 0,
        }
    }

    /// Consume one record and use it as the header mapping
    ///
    /// Calling this again after the header has been read returns the
    /// existing mapping without consuming anything.
    pub fn read_header(&mut self) -> Result<&HeaderMap> {
        self.ensure_open()?;

        if self.headers.is_none() {
            let Some(record) = self.next_record()? else {
                self.state = ReaderState::Exhausted;
                return Err(ByteForgeError::HeaderMissing);
            };

            let headers = HeaderMap::from_record(&record, &self.config)?;
            debug!(
                columns = headers.len(),
                line = self.record_line,
                "mapped CSV header"
            );
            self.headers = Some(headers);
            self.state = ReaderState::Reading;
        }

        self.headers.as_ref().ok_or(ByteForgeError::HeadersNotRead)
    }

    /// Advance to the next record
    ///
    /// Returns `false` once the stream is exhausted.
    pub fn read(&mut self) -> Result<bool> {
        self.ensure_open()?;

        if self.state == ReaderState::Exhausted {
            self.record = None;
            return Ok(false);
        }

        match self.next_record()? {
            Some(record) => {
                self.record = Some(record);
                self.record_count += 1;
                self.state = ReaderState::Reading;
                Ok(true)
            }
            None => {
                self.record = None;
                self.state = ReaderState::Exhausted;
                Ok(false)
            }
        }
    }

    /// Iterate over the remaining raw records
    pub fn records(&mut self) -> Records<'_, R> {
        Records::new(self)
    }

    /// Iterate over the remaining records mapped through `schema`
    ///
    /// Reads the header first if it has not been read and the configuration
    /// says the input has one.
    pub fn mapped_records<'s, T: Default>(
        &mut self,
        schema: &'s RecordSchema<T>,
    ) -> Result<MappedRecords<'_, 's, R, T>> {
        self.ensure_open()?;

        if self.headers.is_none() {
            if !self.config.has_header_record {
                return Err(ByteForgeError::HeadersNotRead);
            }
            self.read_header()?;
        }

        let headers = self.headers.as_ref().ok_or(ByteForgeError::HeadersNotRead)?;
        let plan = schema.resolve(headers, &self.config)?;
        Ok(MappedRecords::new(self, schema, plan))
    }

    /// Map all remaining records through `schema`
    pub fn get_records_with<T: Default>(&mut self, schema: &RecordSchema<T>) -> Result<Vec<T>> {
        self.mapped_records(schema)?.collect()
    }

    /// Map all remaining records through the type's own schema
    pub fn get_records<T: CsvRecord>(&mut self) -> Result<Vec<T>> {
        let schema = T::schema();
        self.get_records_with(&schema)
    }

    fn next_record(&mut self) -> Result<Option<Vec<String>>> {
        let delimiter = self.config.delimiter;
        let quote = self.config.quote;
        let source = self.source.as_mut().ok_or(ByteForgeError::Disposed)?;

        self.record_line = self.line;
        parse_record(source, &mut self.line, delimiter, quote)
    }
}

impl<R> CsvReader<R> {
    /// Field at `index` in the current record
    pub fn get_field(&self, index: usize) -> Result<&str> {
        let record = self.current_record()?;
        record
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| ByteForgeError::index_out_of_range(index, record.len()))
    }

    /// Field in the column named `name`, matched case-insensitively
    pub fn get_field_by_name(&self, name: &str) -> Result<&str> {
        self.ensure_open()?;
        let headers = self.headers.as_ref().ok_or(ByteForgeError::HeadersNotRead)?;
        let index = headers
            .index_of(name)
            .ok_or_else(|| ByteForgeError::header_not_found(name))?;
        self.get_field(index)
    }

    /// All fields of the current record
    pub fn current_record(&self) -> Result<&[String]> {
        self.ensure_open()?;
        self.record
            .as_deref()
            .ok_or(ByteForgeError::NoCurrentRecord)
    }

    /// Take ownership of the current record
    pub fn take_record(&mut self) -> Result<Vec<String>> {
        self.ensure_open()?;
        self.record.take().ok_or(ByteForgeError::NoCurrentRecord)
    }

    /// Header mapping, if `read_header` has been called
    pub fn headers(&self) -> Option<&HeaderMap> {
        self.headers.as_ref()
    }

    pub fn config(&self) -> &CsvConfiguration {
        &self.config
    }

    pub fn state(&self) -> ReaderState {
        self.state
    }

    /// Current 1-based line of the read cursor
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Line on which the most recent record started
    pub fn record_line(&self) -> u64 {
        self.record_line
    }

    /// Number of records produced by `read`, excluding the header
    pub fn record_count(&self) -> u64 {
        self.record_count
    }

    /// Release the underlying stream
    ///
    /// Every later accessor fails with [`ByteForgeError::Disposed`].
    pub fn close(&mut self) {
        self.source = None;
        self.record = None;
        self.state = ReaderState::Disposed;
    }

    pub fn is_closed(&self) -> bool {
        self.state == ReaderState::Disposed
    }

    fn ensure_open(&self) -> Result<()> {
        if self.state == ReaderState::Disposed {
            return Err(ByteForgeError::Disposed);
        }
        Ok(())
    }
}

impl CsvReader<File> {
    /// Open a CSV file
    #[instrument(skip(path, config), fields(path = %path.as_ref().display()))]
    pub fn from_path<P: AsRef<Path>>(path: P, config: CsvConfiguration) -> Result<Self> {
        config.validate()?;
        let file = File::open(path.as_ref())?;
        debug!("opened CSV file");
        Ok(Self::build(file, config))
    }
}

#[cfg(feature = "async")]
impl CsvReader<std::io::Cursor<Vec<u8>>> {
    /// Load a CSV file with tokio and read it from memory
    #[instrument(skip(path, config), fields(path = %path.as_ref().display()))]
    pub async fn from_path_async<P: AsRef<Path>>(path: P, config: CsvConfiguration) -> Result<Self> {
        config.validate()?;
        let data = tokio::fs::read(path.as_ref()).await?;
        debug!(bytes = data.len(), "loaded CSV file");
        Ok(Self::build(std::io::Cursor::new(data), config))
    }
}

impl<R> std::fmt::Debug for CsvReader<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsvReader")
            .field("state", &self.state)
            .field("line", &self.line)
            .field("record_count", &self.record_count)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// Parse one record from `source`
///
/// Returns `None` only when the stream ends before any character of a new
/// record was consumed.
fn parse_record<R: Read>(
    source: &mut CharBuffer<R>,
    line: &mut u64,
    delimiter: char,
    quote: char,
) -> Result<Option<Vec<String>>> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut consumed = false;

    loop {
        let next = source
            .next_char()
            .map_err(|e| ByteForgeError::csv_parse(*line, e))?;

        let Some(c) = next else {
            if !consumed {
                return Ok(None);
            }
            if in_quotes {
                warn!(line = *line, "end of stream inside a quoted field");
            }
            fields.push(field);
            return Ok(Some(fields));
        };
        consumed = true;

        if c == quote {
            let escaped = in_quotes
                && source
                    .next_if_eq(quote)
                    .map_err(|e| ByteForgeError::csv_parse(*line, e))?;
            if escaped {
                field.push(quote);
            } else {
                in_quotes = !in_quotes;
            }
        } else if in_quotes {
            field.push(c);
            if c == '\n' {
                *line += 1;
            } else if c == '\r' {
                let crlf = source
                    .peek_char()
                    .map_err(|e| ByteForgeError::csv_parse(*line, e))?
                    == Some('\n');
                if !crlf {
                    *line += 1;
                }
            }
        } else if c == delimiter {
            fields.push(std::mem::take(&mut field));
        } else if c == '\r' || c == '\n' {
            if c == '\r' {
                source
                    .next_if_eq('\n')
                    .map_err(|e| ByteForgeError::csv_parse(*line, e))?;
            }
            *line += 1;
            fields.push(field);
            return Ok(Some(fields));
        } else {
            field.push(c);
        }
    }
}
