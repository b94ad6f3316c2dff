//! Convenient imports for typical `sqlclause` usage.
//!
//! ```ignore
//! use sqlclause::prelude::*;
//! ```

pub use crate::{
    BuilderConfig, ClauseBuilder, ClauseError, ClauseResult, Dialect, GenericClient, NullBool,
    NullDate, NullFloat64, NullInt64, NullString, NullTime, Nullable, Record, SelectClause,
    StatusFilter, UpdateClause, Value, Walkable,
};
