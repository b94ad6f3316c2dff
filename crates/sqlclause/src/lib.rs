//! # sqlclause
//!
//! Build parameterized SQL filter and update clauses from tagged records.
//!
//! ## Features
//!
//! - **Tag driven**: a field's parameter tag picks the operator (`age__gte`,
//!   `id__nin`, `email__opt`), its column tag names the column
//! - **Three-state values**: [`Nullable`] tells "not requested" apart from
//!   "explicitly NULL"
//! - **Safe defaults**: updates require at least one assignment and one
//!   predicate
//! - **Dialect aware**: `IN` lists are expanded and placeholders rebound for
//!   MySQL, SQLite or PostgreSQL
//! - **Transaction-friendly**: execution helpers accept any [`GenericClient`]
//!
//! ## Example
//!
//! ```ignore
//! use sqlclause::prelude::*;
//!
//! #[derive(Record)]
//! struct UserFilter {
//!     #[tag(param = "name", db = "name")]
//!     name: NullString,
//!     #[tag(param = "age__gte", db = "age")]
//!     min_age: i64,
//!     #[tag(param = "id__nin", db = "id")]
//!     excluded: Vec<i64>,
//!     #[tag(param = "sort-by", db = "sort")]
//!     sort_by: Vec<String>,
//!     #[tag(param = "page", db = "page")]
//!     page: i64,
//! }
//!
//! let builder = ClauseBuilder::new(BuilderConfig::new())?;
//! let clause = builder.build(&filter)?;
//! // " WHERE 1=1 AND age>=? AND id NOT IN (?, ?) ORDER BY name ASC LIMIT 0, 10;"
//! ```

extern crate self as sqlclause;

pub mod builder;
pub mod client;
pub mod config;
pub mod dialect;
pub mod error;
pub mod exec;
pub mod nullable;
pub mod prelude;
pub mod tag;
pub mod value;
pub mod walk;

pub use builder::{ClauseBuilder, SelectClause, UpdateClause};
pub use client::GenericClient;
pub use config::{BuilderConfig, StatusFilter};
pub use dialect::{Dialect, Rebind, expand};
pub use error::{ClauseError, ClauseResult};
pub use exec::{Page, execute_update, fetch_all, fetch_page, interpolate};
pub use nullable::{
    NullBool, NullDate, NullFloat64, NullInt64, NullString, NullTime, Nullable, NullableValue,
};
pub use value::{Param, Value};
pub use walk::{BuildOption, Field, Leaf, Node, Opaque, Record, Tags, Walkable};

#[cfg(feature = "derive")]
pub use sqlclause_derive::Record;
