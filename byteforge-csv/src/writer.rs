//! CSV record writer
//!
//! Writes records with the same delimiter and quoting rules the reader
//! understands. A field is quoted only when it contains the delimiter, the
//! quote character or a line break.

use byteforge_core::{
    CsvConfiguration, DEFAULT_DELIMITER, DEFAULT_QUOTE, LineEnding, Result,
};
use std::io::Write;

/// CSV writer over any [`Write`] sink
pub struct CsvWriter<W: Write> {
    inner: W,
    delimiter: char,
    quote: char,
    line_ending: LineEnding,
    records_written: u64,
}

impl<W: Write> CsvWriter<W> {
    /// Create a writer with the default delimiter and quote
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            delimiter: DEFAULT_DELIMITER,
            quote: DEFAULT_QUOTE,
            line_ending: LineEnding::default(),
            records_written: 0,
        }
    }

    /// Create a writer using the delimiter and quote of a reader configuration
    pub fn with_config(inner: W, config: &CsvConfiguration) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            delimiter: config.delimiter,
            quote: config.quote,
            ..Self::new(inner)
        })
    }

    /// Set line ending style
    pub fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    /// Write one record followed by a line ending
    pub fn write_record<I, S>(&mut self, fields: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut line = String::new();
        for (index, field) in fields.into_iter().enumerate() {
            if index > 0 {
                line.push(self.delimiter);
            }
            self.push_field(&mut line, field.as_ref());
        }
        line.push_str(self.line_ending.as_str());

        self.inner.write_all(line.as_bytes())?;
        self.records_written += 1;
        Ok(())
    }

    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }

    /// Flush and return the underlying sink
    pub fn into_inner(mut self) -> Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }

    fn push_field(&self, line: &mut String, field: &str) {
        let needs_quotes = field
            .chars()
            .any(|c| c == self.delimiter || c == self.quote || c == '\r' || c == '\n');

        if !needs_quotes {
            line.push_str(field);
            return;
        }

        line.push(self.quote);
        for c in field.chars() {
            if c == self.quote {
                line.push(self.quote);
            }
            line.push(c);
        }
        line.push(self.quote);
    }
}
