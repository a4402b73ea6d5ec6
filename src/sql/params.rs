//! Values bound to statement placeholders, convertible from row fields.

use serde::Serialize;
use sqlx::encode::{Encode, IsNull};
use sqlx::sqlite::{Sqlite, SqliteTypeInfo};
use sqlx::Database;

/// A value that can be bound to a SQLite statement. Built from entity fields by the `columns!` macro.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BindValue {
    Null,
    Bool(bool),
    I64(i64),
    F64(f64),
    Text(String),
}

impl BindValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            BindValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&String> for BindValue {
    fn from(v: &String) -> Self {
        BindValue::Text(v.clone())
    }
}

impl From<&str> for BindValue {
    fn from(v: &str) -> Self {
        BindValue::Text(v.to_string())
    }
}

impl From<String> for BindValue {
    fn from(v: String) -> Self {
        BindValue::Text(v)
    }
}

impl From<&i64> for BindValue {
    fn from(v: &i64) -> Self {
        BindValue::I64(*v)
    }
}

impl From<i64> for BindValue {
    fn from(v: i64) -> Self {
        BindValue::I64(v)
    }
}

impl From<&i32> for BindValue {
    fn from(v: &i32) -> Self {
        BindValue::I64(i64::from(*v))
    }
}

impl From<&f64> for BindValue {
    fn from(v: &f64) -> Self {
        BindValue::F64(*v)
    }
}

impl From<&bool> for BindValue {
    fn from(v: &bool) -> Self {
        BindValue::Bool(*v)
    }
}

// One impl per leaf type: a blanket `impl<T> From<&Option<T>>` bounded on
// `BindValue: From<&T>` sends trait selection into unbounded recursion (E0275).
macro_rules! impl_from_option {
    ($($t:ty),+ $(,)?) => {$(
        impl From<&Option<$t>> for BindValue {
            fn from(v: &Option<$t>) -> Self {
                match v {
                    Some(inner) => BindValue::from(inner),
                    None => BindValue::Null,
                }
            }
        }
    )+};
}

impl_from_option!(String, i64, i32, f64, bool);

impl<'q> Encode<'q, Sqlite> for BindValue {
    fn encode_by_ref(
        &self,
        buf: &mut <Sqlite as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        Ok(match self {
            BindValue::Null => <Option<i64> as Encode<Sqlite>>::encode_by_ref(&None, buf)?,
            BindValue::Bool(b) => <bool as Encode<Sqlite>>::encode_by_ref(b, buf)?,
            BindValue::I64(n) => <i64 as Encode<Sqlite>>::encode_by_ref(n, buf)?,
            BindValue::F64(n) => <f64 as Encode<Sqlite>>::encode_by_ref(n, buf)?,
            BindValue::Text(s) => <String as Encode<Sqlite>>::encode_by_ref(s, buf)?,
        })
    }
}

impl sqlx::Type<Sqlite> for BindValue {
    fn type_info() -> SqliteTypeInfo {
        <str as sqlx::Type<Sqlite>>::type_info()
    }

    fn compatible(_ty: &SqliteTypeInfo) -> bool {
        true
    }
}
