//! Record traversal.
//!
//! A filter or update record is a tree: records contain fields, fields hold
//! pointers (`Option`, `Box`, `Arc`, `&T`), nested records, or terminal values.
//! [`Walkable`] exposes one node of that tree and [`Record`] lists a record's
//! fields together with their static tags. `#[derive(Record)]` implements both
//! for a struct:
//!
//! ```ignore
//! use sqlclause::{NullString, Record};
//!
//! #[derive(Record)]
//! struct UserParam {
//!     #[tag(param = "name", db = "name")]
//!     name: NullString,
//!     #[tag(param = "age__gte", db = "age")]
//!     min_age: i64,
//!     #[tag(param = "sort-by", db = "sort")]
//!     sort_by: Vec<String>,
//! }
//! ```
//!
//! Traversal is depth first. For each field the configured column tag decides
//! whether it is visited at all (`-` skips it, an empty tag skips anything but
//! a nested record) and every terminal becomes one [`BuildOption`].

use crate::tag::is_skip_column;
use crate::value::{Param, Value};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::sync::Arc;
use tokio_postgres::types::ToSql;
use uuid::Uuid;

/// Static `key = "value"` tags attached to a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tags(&'static [(&'static str, &'static str)]);

impl Tags {
    pub const EMPTY: Tags = Tags(&[]);

    pub const fn new(pairs: &'static [(&'static str, &'static str)]) -> Self {
        Tags(pairs)
    }

    /// Value for `key`, or `""` when the field carries no such tag.
    pub fn get(&self, key: &str) -> &'static str {
        self.0
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
            .unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One field of a [`Record`].
pub struct Field<'a> {
    pub name: &'static str,
    pub tags: Tags,
    pub value: &'a dyn Walkable,
}

impl<'a> Field<'a> {
    pub fn new(name: &'static str, tags: Tags, value: &'a dyn Walkable) -> Self {
        Self { name, tags, value }
    }
}

impl std::fmt::Debug for Field<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("tags", &self.tags)
            .finish_non_exhaustive()
    }
}

/// A struct whose fields can be traversed.
///
/// Usually derived with `#[derive(Record)]`.
pub trait Record {
    fn fields(&self) -> Vec<Field<'_>>;
}

/// A traversed value, after pointer dereferencing.
pub enum Node<'a> {
    /// A nil pointer: contributes nothing.
    Nil,
    Record(&'a dyn Record),
    Leaf(Leaf),
}

impl Node<'_> {
    /// Mark a terminal as explicitly requested, so a zero value still counts.
    fn explicit(self) -> Self {
        match self {
            Node::Leaf(leaf) => Node::Leaf(leaf.into_explicit()),
            other => other,
        }
    }
}

/// A classified terminal value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Leaf {
    pub value: Option<Value>,
    /// Explicitly set to SQL `NULL`.
    pub sql_null: bool,
    /// A collection bound to an `IN` list.
    pub many: bool,
    /// A plain scalar holding its type's zero value.
    pub zero: bool,
}

impl Leaf {
    pub fn absent() -> Self {
        Self::default()
    }

    pub fn null() -> Self {
        Self {
            sql_null: true,
            ..Self::default()
        }
    }

    /// A plain scalar; zero values are treated as absent.
    pub fn scalar(value: impl Into<Value>) -> Self {
        let value = value.into();
        Self {
            zero: value.is_zero(),
            value: Some(value),
            ..Self::default()
        }
    }

    /// A value that is present whatever it holds.
    pub fn explicit(value: impl Into<Value>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    /// A collection; empty collections are absent.
    pub fn many(values: Vec<Value>) -> Self {
        if values.is_empty() {
            return Self::absent();
        }
        Self {
            value: Some(Value::List(values)),
            many: true,
            ..Self::default()
        }
    }

    pub fn is_present(&self) -> bool {
        self.value.is_some() && !self.zero
    }

    fn into_explicit(mut self) -> Self {
        self.zero = false;
        self
    }
}

/// Anything that can appear in a record field.
pub trait Walkable {
    fn node(&self) -> Node<'_>;
}

impl<T: Walkable> Walkable for Option<T> {
    fn node(&self) -> Node<'_> {
        match self {
            Some(v) => v.node().explicit(),
            None => Node::Nil,
        }
    }
}

impl<T: Walkable + ?Sized> Walkable for Box<T> {
    fn node(&self) -> Node<'_> {
        (**self).node()
    }
}

impl<T: Walkable + ?Sized> Walkable for Arc<T> {
    fn node(&self) -> Node<'_> {
        (**self).node()
    }
}

impl<T: Walkable + ?Sized> Walkable for &T {
    fn node(&self) -> Node<'_> {
        (**self).node()
    }
}

impl Walkable for dyn Record + '_ {
    fn node(&self) -> Node<'_> {
        Node::Record(self)
    }
}

macro_rules! impl_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Walkable for $ty {
                fn node(&self) -> Node<'_> {
                    Node::Leaf(Leaf::scalar(self.clone()))
                }
            }

            impl Walkable for Vec<$ty> {
                fn node(&self) -> Node<'_> {
                    Node::Leaf(Leaf::many(self.iter().cloned().map(Value::from).collect()))
                }
            }
        )*
    };
}

impl_scalar!(
    String,
    i64,
    i32,
    i16,
    i8,
    u32,
    u16,
    u8,
    f64,
    f32,
    bool,
    DateTime<Utc>,
    NaiveDateTime,
    NaiveDate,
    Uuid,
);

// `&str` fields reach this through the `&T` impl.
impl Walkable for str {
    fn node(&self) -> Node<'_> {
        Node::Leaf(Leaf::scalar(self))
    }
}

impl Walkable for Vec<&str> {
    fn node(&self) -> Node<'_> {
        Node::Leaf(Leaf::many(self.iter().copied().map(Value::from).collect()))
    }
}

/// Pass a value the walker has no variant for straight through as a bind
/// argument. Opaque values are always present.
#[derive(Debug, Clone)]
pub struct Opaque<T>(pub T);

impl<T> Walkable for Opaque<T>
where
    T: ToSql + Clone + Send + Sync + 'static,
{
    fn node(&self) -> Node<'_> {
        Node::Leaf(Leaf::explicit(Value::Other(Param::new(self.0.clone()))))
    }
}

/// Everything the assembler needs to know about one terminal field.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BuildOption {
    pub is_like: bool,
    pub is_many: bool,
    pub is_sql_null: bool,
    pub param_tag: &'static str,
    pub column_tag: &'static str,
    /// `None` when the field is absent.
    pub value: Option<Value>,
}

impl BuildOption {
    fn from_leaf(leaf: Leaf, param_tag: &'static str, column_tag: &'static str) -> Self {
        let present = leaf.is_present();
        let value = leaf.value.filter(|_| present);
        let is_like = !leaf.many && value.as_ref().and_then(Value::as_str).is_some_and(|s| s.contains('%'));
        Self {
            is_like,
            is_many: leaf.many,
            is_sql_null: leaf.sql_null,
            param_tag,
            column_tag,
            value,
        }
    }
}

/// Depth-first traversal reading the configured tag keys.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Walker<'c> {
    param_key: &'c str,
    column_key: &'c str,
}

impl<'c> Walker<'c> {
    pub(crate) fn new(param_key: &'c str, column_key: &'c str) -> Self {
        Self {
            param_key,
            column_key,
        }
    }

    pub(crate) fn walk<F>(&self, record: &dyn Record, sink: &mut F)
    where
        F: FnMut(BuildOption),
    {
        for field in record.fields() {
            let column = field.tags.get(self.column_key);
            if is_skip_column(column) {
                continue;
            }

            let node = field.value.node();
            if column.is_empty() && !matches!(node, Node::Record(_)) {
                continue;
            }

            match node {
                Node::Nil => {}
                Node::Record(nested) => self.walk(nested, sink),
                Node::Leaf(leaf) => {
                    sink(BuildOption::from_leaf(leaf, field.tags.get(self.param_key), column))
                }
            }
        }
    }
}
