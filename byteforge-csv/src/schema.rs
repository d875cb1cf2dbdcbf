//! Typed record binding
//!
//! A [`RecordSchema`] maps header columns onto a record type through
//! explicitly declared setters. Columns are matched by name,
//! case-insensitively, and each field string is converted with
//! [`FromField`] before it is handed to the setter.

use crate::convert::FromField;
use crate::header::HeaderMap;
use byteforge_core::{ByteForgeError, CsvConfiguration, Result};
use tracing::{debug, warn};

type ApplyFn<T> = dyn Fn(&mut T, Option<&str>) -> bool + Send + Sync;

/// Record types with a statically declared column binding
///
/// # Examples
///
/// ```rust
/// use byteforge_csv::{CsvRecord, RecordSchema};
///
/// #[derive(Debug, Default)]
/// struct Enemy {
///     name: String,
///     health: i32,
/// }
///
/// impl CsvRecord for Enemy {
///     fn schema() -> RecordSchema<Self> {
///         RecordSchema::new()
///             .field("Name", |e: &mut Enemy, v: String| e.name = v)
///             .field("Health", |e: &mut Enemy, v: i32| e.health = v)
///     }
/// }
/// ```
pub trait CsvRecord: Default + Sized {
    fn schema() -> RecordSchema<Self>;
}

struct FieldBinding<T> {
    column: String,
    target: &'static str,
    apply: Box<ApplyFn<T>>,
}

/// Column name to typed setter bindings for `T`
pub struct RecordSchema<T> {
    bindings: Vec<FieldBinding<T>>,
}

impl<T> RecordSchema<T> {
    /// Create an empty schema
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Bind `column` to a setter taking a converted value
    ///
    /// An empty field sets `V::default()`.
    pub fn field<V, F>(mut self, column: &str, setter: F) -> Self
    where
        T: 'static,
        V: FromField + Default + 'static,
        F: Fn(&mut T, V) + Send + Sync + 'static,
    {
        let apply = move |record: &mut T, raw: Option<&str>| -> bool {
            let value = match raw {
                Some(raw) if !raw.is_empty() => match V::from_field(raw) {
                    Some(value) => value,
                    None => return false,
                },
                _ => V::default(),
            };
            setter(record, value);
            true
        };

        self.bindings.push(FieldBinding {
            column: column.to_string(),
            target: V::TYPE_NAME,
            apply: Box::new(apply),
        });
        self
    }

    /// Bound column names in declaration order
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.bindings.iter().map(|b| b.column.as_str())
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Resolve every binding to a header column
    ///
    /// Bindings without a matching header resolve to `None`; whether that
    /// fails is decided per record in [`RecordSchema::map_record`]. Header
    /// columns without a binding are checked here when the configuration
    /// does not ignore them.
    pub(crate) fn resolve(
        &self,
        headers: &HeaderMap,
        config: &CsvConfiguration,
    ) -> Result<Vec<Option<usize>>> {
        let plan: Vec<Option<usize>> = self
            .bindings
            .iter()
            .map(|binding| headers.index_of(&binding.column))
            .collect();

        for (binding, column) in self.bindings.iter().zip(&plan) {
            if column.is_some() {
                continue;
            }
            if config.ignore_missing_columns {
                debug!(column = %binding.column, "bound column not in header, field keeps its default");
            } else if !config.throw_on_property_mapping_failure {
                warn!(column = %binding.column, "bound column not found in header, field keeps its default");
            }
        }

        if !config.ignore_unmapped_columns {
            for (name, column) in headers.mapped() {
                if plan.contains(&Some(column)) {
                    continue;
                }
                if config.throw_on_property_mapping_failure {
                    return Err(ByteForgeError::property_mapping(
                        name,
                        "column has no binding in the record schema",
                    ));
                }
                warn!(column = %name, "column has no binding and is ignored");
            }
        }

        Ok(plan)
    }
}

impl<T: Default> RecordSchema<T> {
    /// Build one `T` from a record using a resolved plan
    pub(crate) fn map_record(
        &self,
        plan: &[Option<usize>],
        record: &[String],
        line: u64,
        config: &CsvConfiguration,
    ) -> Result<T> {
        let mut value = T::default();

        for (binding, column) in self.bindings.iter().zip(plan) {
            let Some(column) = *column else {
                if !config.ignore_missing_columns && config.throw_on_property_mapping_failure {
                    return Err(ByteForgeError::property_mapping(
                        binding.column.as_str(),
                        "column not found in header",
                    ));
                }
                continue;
            };

            let Some(raw) = record.get(column) else {
                if config.throw_on_property_mapping_failure {
                    return Err(ByteForgeError::property_mapping(
                        binding.column.as_str(),
                        format!(
                            "record at line {} has {} fields, column index is {}",
                            line,
                            record.len(),
                            column
                        ),
                    ));
                }
                warn!(column = %binding.column, line, "record too short, field keeps its default");
                continue;
            };

            if !(binding.apply)(&mut value, Some(raw.as_str())) {
                if config.throw_on_type_conversion_failure {
                    return Err(ByteForgeError::type_conversion(
                        binding.column.as_str(),
                        raw.as_str(),
                        binding.target,
                    ));
                }
                warn!(
                    column = %binding.column,
                    value = %raw,
                    target = binding.target,
                    line,
                    "conversion failed, using default"
                );
                (binding.apply)(&mut value, None);
            }
        }

        Ok(value)
    }
}

impl<T> Default for RecordSchema<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for RecordSchema<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.bindings.iter().map(|b| (&b.column, b.target)))
            .finish()
    }
}
