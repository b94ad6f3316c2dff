//! Nullable wrapper values.
//!
//! [`Nullable`] separates "not requested" from "explicitly NULL" from "a
//! value", which plain scalars cannot: a bare `0` or `""` is treated as absent
//! by the walker, while `Nullable::Value(0)` always filters on zero.
//!
//! | state   | read query          | update query         |
//! |---------|---------------------|----------------------|
//! | Absent  | field skipped       | field skipped        |
//! | Null    | field skipped       | `column=NULL`        |
//! | Value   | `column<op>?`       | `column=?`           |
//!
//! With serde, a missing field (under `#[serde(default)]`) becomes `Absent`,
//! a JSON `null` becomes `Null` and anything else becomes `Value`.

use crate::value::Value;
use crate::walk::{Leaf, Node, Walkable};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// A value with an explicit validity flag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Nullable<T> {
    /// Invalid and not requested.
    #[default]
    Absent,
    /// Invalid and explicitly set to SQL `NULL`.
    Null,
    Value(T),
}

pub type NullString = Nullable<String>;
pub type NullInt64 = Nullable<i64>;
pub type NullFloat64 = Nullable<f64>;
pub type NullBool = Nullable<bool>;
pub type NullTime = Nullable<DateTime<Utc>>;
pub type NullDate = Nullable<NaiveDate>;

impl<T> Nullable<T> {
    pub fn new(value: T) -> Self {
        Nullable::Value(value)
    }

    pub fn null() -> Self {
        Nullable::Null
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Nullable::Value(_))
    }

    pub fn is_sql_null(&self) -> bool {
        matches!(self, Nullable::Null)
    }

    pub fn as_option(&self) -> Option<&T> {
        match self {
            Nullable::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Nullable::Value(v) => Some(v),
            _ => None,
        }
    }
}

impl<T> From<Option<T>> for Nullable<T> {
    /// `None` maps to `Null`: an `Option` that was set to nothing is an explicit NULL.
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Nullable::Value(v),
            None => Nullable::Null,
        }
    }
}

impl<T: Serialize> Serialize for Nullable<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Nullable::Value(v) => serializer.serialize_some(v),
            _ => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Nullable<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Option::<T>::deserialize(deserializer)?.into())
    }
}

/// Underlying types a [`Nullable`] may carry into a clause.
pub trait NullableValue: Clone {
    fn to_value(&self) -> Value;

    /// Whether a valid entry is kept when it appears inside a collection.
    fn keep_in_collection(&self) -> bool {
        true
    }
}

impl NullableValue for String {
    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }

    // Empty strings in a string collection never narrow an IN list.
    fn keep_in_collection(&self) -> bool {
        !self.is_empty()
    }
}

macro_rules! impl_nullable_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl NullableValue for $ty {
                fn to_value(&self) -> Value {
                    Value::from(*self)
                }
            }
        )*
    };
}

impl_nullable_value!(i64, i32, f64, bool, DateTime<Utc>, NaiveDateTime, NaiveDate, Uuid);

impl<T: NullableValue> Walkable for Nullable<T> {
    fn node(&self) -> Node<'_> {
        Node::Leaf(match self {
            Nullable::Absent => Leaf::absent(),
            Nullable::Null => Leaf::null(),
            Nullable::Value(v) => Leaf::explicit(v.to_value()),
        })
    }
}

impl<T: NullableValue> Walkable for Vec<Nullable<T>> {
    fn node(&self) -> Node<'_> {
        Node::Leaf(collect_valid(self.iter()))
    }
}

impl<T: NullableValue> Walkable for Vec<Option<Nullable<T>>> {
    fn node(&self) -> Node<'_> {
        Node::Leaf(collect_valid(self.iter().flatten()))
    }
}

fn collect_valid<'a, T: NullableValue + 'a>(items: impl Iterator<Item = &'a Nullable<T>>) -> Leaf {
    let values = items
        .filter_map(Nullable::as_option)
        .filter(|v| v.keep_in_collection())
        .map(NullableValue::to_value)
        .collect();
    Leaf::many(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf<W: Walkable>(w: &W) -> Leaf {
        match w.node() {
            Node::Leaf(leaf) => leaf,
            _ => panic!("expected a leaf"),
        }
    }

    #[test]
    fn singular_states() {
        let absent = leaf(&NullInt64::Absent);
        assert!(!absent.is_present());
        assert!(!absent.sql_null);

        let null = leaf(&NullInt64::null());
        assert!(!null.is_present());
        assert!(null.sql_null);

        // A valid zero is still a requested value.
        let zero = leaf(&NullInt64::new(0));
        assert!(zero.is_present());
        assert_eq!(zero.value, Some(Value::Int(0)));
    }

    #[test]
    fn collections_drop_invalid_entries() {
        let ids = vec![NullInt64::new(1), NullInt64::Absent, NullInt64::Null, NullInt64::new(3)];
        let l = leaf(&ids);
        assert!(l.many);
        assert_eq!(l.value, Some(Value::List(vec![Value::Int(1), Value::Int(3)])));

        let names = vec![
            Some(NullString::new("a".into())),
            None,
            Some(NullString::new(String::new())),
        ];
        let l = leaf(&names);
        assert_eq!(l.value, Some(Value::List(vec![Value::Text("a".into())])));
    }

    #[test]
    fn collection_with_nothing_valid_is_absent() {
        let ids: Vec<NullInt64> = vec![NullInt64::Absent, NullInt64::Null];
        assert!(!leaf(&ids).is_present());
        assert!(!leaf(&Vec::<Option<NullBool>>::new()).is_present());
    }

    #[test]
    fn serde_maps_json_null_to_sql_null() {
        #[derive(Deserialize)]
        struct Patch {
            #[serde(default)]
            name: NullString,
            #[serde(default)]
            age: NullInt64,
            #[serde(default)]
            score: NullFloat64,
        }

        let p: Patch = serde_json::from_str(r#"{"name": null, "age": 30}"#).unwrap();
        assert_eq!(p.name, NullString::Null);
        assert_eq!(p.age, NullInt64::new(30));
        assert_eq!(p.score, NullFloat64::Absent);

        assert_eq!(serde_json::to_string(&NullBool::new(true)).unwrap(), "true");
        assert_eq!(serde_json::to_string(&NullBool::Absent).unwrap(), "null");
    }

    #[test]
    fn from_option() {
        assert_eq!(NullDate::from(None), NullDate::Null);
        assert!(NullString::from(Some("x".to_string())).is_valid());
    }
}
