//! Record iterators over a [`CsvReader`]

use crate::reader::CsvReader;
use crate::schema::RecordSchema;
use byteforge_core::Result;
use std::io::Read;

/// Iterator of raw records read from a [`CsvReader`]
///
/// Iteration stops after the first error.
pub struct Records<'r, R> {
    reader: &'r mut CsvReader<R>,
    done: bool,
}

impl<'r, R> Records<'r, R> {
    pub(crate) fn new(reader: &'r mut CsvReader<R>) -> Self {
        Self {
            reader,
            done: false,
        }
    }
}

impl<R: Read> Iterator for Records<'_, R> {
    type Item = Result<Vec<String>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let next = match self.reader.read() {
            Ok(true) => self.reader.take_record(),
            Ok(false) => {
                self.done = true;
                return None;
            }
            Err(e) => Err(e),
        };

        if next.is_err() {
            self.done = true;
        }
        Some(next)
    }
}

/// Iterator of records mapped onto `T` through a [`RecordSchema`]
///
/// Iteration stops after the first error.
pub struct MappedRecords<'r, 's, R, T> {
    reader: &'r mut CsvReader<R>,
    schema: &'s RecordSchema<T>,
    plan: Vec<Option<usize>>,
    done: bool,
}

impl<'r, 's, R, T> MappedRecords<'r, 's, R, T> {
    pub(crate) fn new(
        reader: &'r mut CsvReader<R>,
        schema: &'s RecordSchema<T>,
        plan: Vec<Option<usize>>,
    ) -> Self {
        Self {
            reader,
            schema,
            plan,
            done: false,
        }
    }
}

impl<R: Read, T: Default> Iterator for MappedRecords<'_, '_, R, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let next = match self.reader.read() {
            Ok(true) => self.reader.current_record().and_then(|record| {
                self.schema.map_record(
                    &self.plan,
                    record,
                    self.reader.record_line(),
                    self.reader.config(),
                )
            }),
            Ok(false) => {
                self.done = true;
                return None;
            }
            Err(e) => Err(e),
        };

        if next.is_err() {
            self.done = true;
        }
        Some(next)
    }
}
