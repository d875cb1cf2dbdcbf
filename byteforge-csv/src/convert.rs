//! Field value conversion
//!
//! Conversion from a raw field string into the typed value a record schema
//! binds to a column.

/// Types that can be parsed from a single CSV field
pub trait FromField: Sized {
    /// Name used in conversion error messages
    const TYPE_NAME: &'static str;

    /// Parse a non-empty raw field, returning `None` if it is not a valid value
    fn from_field(raw: &str) -> Option<Self>;
}

impl FromField for String {
    const TYPE_NAME: &'static str = "String";

    fn from_field(raw: &str) -> Option<Self> {
        Some(raw.to_string())
    }
}

impl FromField for bool {
    const TYPE_NAME: &'static str = "bool";

    fn from_field(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("true") {
            Some(true)
        } else if raw.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    }
}

impl FromField for char {
    const TYPE_NAME: &'static str = "char";

    fn from_field(raw: &str) -> Option<Self> {
        let mut chars = raw.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }
}

impl<V: FromField> FromField for Option<V> {
    const TYPE_NAME: &'static str = V::TYPE_NAME;

    fn from_field(raw: &str) -> Option<Self> {
        V::from_field(raw).map(Some)
    }
}

macro_rules! impl_from_field_parse {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromField for $ty {
                const TYPE_NAME: &'static str = stringify!($ty);

                fn from_field(raw: &str) -> Option<Self> {
                    raw.trim().parse().ok()
                }
            }
        )*
    };
}

impl_from_field_parse!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);
