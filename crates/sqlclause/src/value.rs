//! Bind values produced by traversal.
//!
//! Every terminal field that contributes to a clause ends up as one [`Value`].
//! Collections stay a single [`Value::List`] until [`crate::dialect::expand`]
//! flattens them into one argument per placeholder.

use bytes::BytesMut;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::error::Error;
use std::fmt;
use std::sync::Arc;
use tokio_postgres::types::{IsNull, ToSql, Type};
use uuid::Uuid;

/// A clone-friendly opaque parameter.
///
/// Carries values of types the walker has no dedicated variant for; they are
/// bound as-is and any type mismatch surfaces at execution time.
#[derive(Clone)]
pub struct Param(pub(crate) Arc<dyn ToSql + Send + Sync>);

impl Param {
    /// Create a new parameter from any ToSql value.
    pub fn new<T: ToSql + Send + Sync + 'static>(value: T) -> Self {
        Param(Arc::new(value))
    }

    /// Get a reference to the inner value as a ToSql trait object.
    pub fn as_ref(&self) -> &(dyn ToSql + Sync) {
        &*self.0 as &(dyn ToSql + Sync)
    }
}

impl fmt::Debug for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Param").field(&"<dyn ToSql>").finish()
    }
}

/// A single bind argument.
#[derive(Debug, Clone)]
pub enum Value {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Timestamp(DateTime<Utc>),
    DateTime(NaiveDateTime),
    Date(NaiveDate),
    Uuid(Uuid),
    /// A collection bound to a single `IN (?)` placeholder before expansion.
    List(Vec<Value>),
    Other(Param),
}

impl Value {
    /// Wrap an arbitrary `ToSql` value.
    pub fn other<T: ToSql + Send + Sync + 'static>(value: T) -> Self {
        Value::Other(Param::new(value))
    }

    /// Whether this is the zero value of its type.
    ///
    /// Opaque values are never zero.
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Text(v) => v.is_empty(),
            Value::Int(v) => *v == 0,
            Value::Float(v) => *v == 0.0,
            Value::Bool(v) => !*v,
            Value::Timestamp(v) => *v == DateTime::<Utc>::default(),
            Value::DateTime(v) => *v == NaiveDateTime::default(),
            Value::Date(v) => *v == NaiveDate::default(),
            Value::Uuid(v) => v.is_nil(),
            Value::List(v) => v.is_empty(),
            Value::Other(_) => false,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Timestamp(a), Value::Timestamp(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Uuid(a), Value::Uuid(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Other(a), Value::Other(b)) => Arc::ptr_eq(&a.0, &b.0),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(v) => write!(f, "'{}'", v.replace('\'', "''")),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Timestamp(v) => write!(f, "'{}'", v.to_rfc3339()),
            Value::DateTime(v) => write!(f, "'{v}'"),
            Value::Date(v) => write!(f, "'{v}'"),
            Value::Uuid(v) => write!(f, "'{v}'"),
            Value::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            Value::Other(_) => f.write_str("<opaque>"),
        }
    }
}

impl ToSql for Value {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        self.to_sql_checked(ty, out)
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }

    // Integers and floats are narrowed to the column width; timestamps follow
    // the column's time zone awareness.
    fn to_sql_checked(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            Value::Text(v) => v.to_sql_checked(ty, out),
            Value::Int(v) => {
                if *ty == Type::INT2 {
                    i16::try_from(*v)?.to_sql_checked(ty, out)
                } else if *ty == Type::INT4 {
                    i32::try_from(*v)?.to_sql_checked(ty, out)
                } else {
                    v.to_sql_checked(ty, out)
                }
            }
            Value::Float(v) => {
                if *ty == Type::FLOAT4 {
                    (*v as f32).to_sql_checked(ty, out)
                } else {
                    v.to_sql_checked(ty, out)
                }
            }
            Value::Bool(v) => v.to_sql_checked(ty, out),
            Value::Timestamp(v) => {
                if *ty == Type::TIMESTAMP {
                    v.naive_utc().to_sql_checked(ty, out)
                } else {
                    v.to_sql_checked(ty, out)
                }
            }
            Value::DateTime(v) => {
                if *ty == Type::TIMESTAMPTZ {
                    v.and_utc().to_sql_checked(ty, out)
                } else {
                    v.to_sql_checked(ty, out)
                }
            }
            Value::Date(v) => v.to_sql_checked(ty, out),
            Value::Uuid(v) => v.to_sql_checked(ty, out),
            Value::List(_) => Err("list value must be expanded into placeholders before binding".into()),
            Value::Other(p) => p.0.to_sql_checked(ty, out),
        }
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v.into())
                }
            }
        )*
    };
}

impl_from! {
    String => Text,
    &str => Text,
    i64 => Int,
    i32 => Int,
    i16 => Int,
    i8 => Int,
    u32 => Int,
    u16 => Int,
    u8 => Int,
    f64 => Float,
    f32 => Float,
    bool => Bool,
    DateTime<Utc> => Timestamp,
    NaiveDateTime => DateTime,
    NaiveDate => Date,
    Uuid => Uuid,
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_values() {
        assert!(Value::from("").is_zero());
        assert!(Value::from(0_i64).is_zero());
        assert!(Value::from(false).is_zero());
        assert!(Value::from(Uuid::nil()).is_zero());
        assert!(Value::from(Vec::<i64>::new()).is_zero());
        assert!(!Value::from("a").is_zero());
        assert!(!Value::from(-1_i32).is_zero());
        assert!(!Value::other(0_i64).is_zero());
    }

    #[test]
    fn display_quotes_text() {
        assert_eq!(Value::from("o'neil").to_string(), "'o''neil'");
        assert_eq!(Value::from(vec![1_i64, 2, 3]).to_string(), "1, 2, 3");
    }

    #[test]
    fn opaque_values_compare_by_identity() {
        let a = Value::other(1_i64);
        let b = a.clone();
        assert_eq!(a, b);
        assert_ne!(a, Value::other(1_i64));
    }

    #[test]
    fn int_narrows_to_column_width() {
        let mut buf = BytesMut::new();
        Value::Int(7).to_sql_checked(&Type::INT4, &mut buf).unwrap();
        assert_eq!(buf.len(), 4);

        let mut buf = BytesMut::new();
        assert!(Value::Int(i64::MAX).to_sql_checked(&Type::INT2, &mut buf).is_err());
    }

    #[test]
    fn list_is_rejected_at_encode_time() {
        let mut buf = BytesMut::new();
        let list = Value::from(vec![1_i64]);
        assert!(list.to_sql_checked(&Type::INT8, &mut buf).is_err());
    }
}
