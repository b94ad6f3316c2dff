//! Clause builder.
//!
//! [`ClauseBuilder`] turns a tagged record into a parameterized `WHERE`
//! clause (plus `ORDER BY` and pagination) and, for updates, a `SET ...
//! WHERE ...` clause.
//!
//! # Example
//!
//! ```ignore
//! use sqlclause::{BuilderConfig, ClauseBuilder, Dialect, NullString, Record};
//!
//! #[derive(Record)]
//! struct UserParam {
//!     #[tag(param = "name", db = "name")]
//!     name: NullString,
//!     #[tag(param = "age__gte", db = "age")]
//!     min_age: i64,
//!     #[tag(param = "page", db = "page")]
//!     page: i64,
//! }
//!
//! let builder = ClauseBuilder::new(BuilderConfig::new())?.with_dialect(Dialect::Postgres);
//! let clause = builder.build(&UserParam { name: NullString::new("ann".into()), min_age: 18, page: 2 })?;
//! assert_eq!(clause.query, " WHERE 1=1 AND name=$1 AND age>=$2 LIMIT 10 OFFSET 10;");
//! assert_eq!(clause.count_query, " WHERE 1=1 AND name=$1 AND age>=$2;");
//! ```
//!
//! The builder itself is immutable: every call collects into a fresh
//! accumulator, so one builder can serve any number of calls, from any number
//! of threads.

mod accumulator;

use crate::config::BuilderConfig;
use crate::dialect::{Dialect, Rebind, expand};
use crate::error::{ClauseError, ClauseResult};
use crate::value::Value;
use crate::walk::{Node, Record, Walkable, Walker};
use accumulator::{Accumulator, Target};
use std::sync::Arc;

/// Rendered read query: the filtered select tail and its count counterpart.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectClause {
    /// `WHERE ... [ORDER BY ...] [LIMIT ...];`
    pub query: String,
    pub args: Vec<Value>,
    /// `WHERE ...;` without ordering or pagination.
    pub count_query: String,
    pub count_args: Vec<Value>,
}

/// Rendered update: `SET ... WHERE ...;` with SET arguments first.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateClause {
    pub query: String,
    pub args: Vec<Value>,
}

/// Builds clauses from tagged records.
#[derive(Clone)]
pub struct ClauseBuilder {
    config: BuilderConfig,
    dialect: Arc<dyn Rebind>,
}

impl std::fmt::Debug for ClauseBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClauseBuilder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for ClauseBuilder {
    fn default() -> Self {
        Self {
            config: BuilderConfig::default(),
            dialect: Arc::new(Dialect::MySql),
        }
    }
}

impl ClauseBuilder {
    /// Create a builder rendering `?` placeholders.
    ///
    /// Fails with [`ClauseError::Config`] when `config` does not validate;
    /// the status column is written into SQL text verbatim.
    pub fn new(config: BuilderConfig) -> ClauseResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            dialect: Arc::new(Dialect::MySql),
        })
    }

    /// Use another placeholder/pagination syntax.
    pub fn with_dialect(mut self, dialect: impl Rebind + 'static) -> Self {
        self.dialect = Arc::new(dialect);
        self
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    fn walker(&self) -> Walker<'_> {
        Walker::new(&self.config.param_tag, &self.config.column_tag)
    }

    fn collect(&self, record: &dyn Record, target: Target) -> Accumulator {
        let mut acc = Accumulator::new(&self.config);
        self.walker()
            .walk(record, &mut |option| acc.consume(option, target));
        acc
    }

    fn collect_node(&self, node: Node<'_>, target: Target) -> Accumulator {
        match node {
            Node::Record(record) => self.collect(record, target),
            _ => Accumulator::new(&self.config),
        }
    }

    fn finish(&self, raw: &str, args: &[Value]) -> ClauseResult<(String, Vec<Value>)> {
        let (query, args) = expand(raw, args)?;
        Ok((self.dialect.rebind(&query), args))
    }

    /// Render the filter clause for `record`.
    ///
    /// Fails with [`ClauseError::InvalidArgument`] when `record` is a nil
    /// pointer or not a record at all.
    pub fn build<R>(&self, record: &R) -> ClauseResult<SelectClause>
    where
        R: Walkable + ?Sized,
    {
        let record = require_record(record.node(), "build", "record")?;
        let acc = self.collect(record, Target::Where);

        let count_raw = format!("{};", acc.where_sql);
        let select_raw = format!(
            "{}{}{};",
            acc.where_sql,
            acc.order_by(),
            acc.pagination(&self.config, self.dialect.as_ref())
        );

        let (query, args) = self.finish(&select_raw, &acc.where_args)?;
        let (count_query, count_args) = self.finish(&count_raw, &acc.where_args)?;

        Ok(SelectClause {
            query,
            args,
            count_query,
            count_args,
        })
    }

    /// Render `SET <update> WHERE <filter>`.
    ///
    /// Both records are traversed concurrently into separate accumulators.
    /// Fails with [`ClauseError::InvalidArgument`] when either record is nil,
    /// when `update` sets nothing, or when `filter` adds no `AND`-joined
    /// predicate (an unbounded update: ` WHERE 1=1 OR ...` matches every row).
    pub fn build_update<U, F>(&self, update: &U, filter: &F) -> ClauseResult<UpdateClause>
    where
        U: Walkable + Sync + ?Sized,
        F: Walkable + Sync + ?Sized,
    {
        require_record(update.node(), "build_update", "update record")?;
        require_record(filter.node(), "build_update", "filter record")?;

        let (set, where_acc) = rayon::join(
            || self.collect_node(update.node(), Target::Set),
            || self.collect_node(filter.node(), Target::Where),
        );

        if set.assignments == 0 {
            return Err(ClauseError::invalid_argument(
                "build_update",
                "update record sets no column",
            ));
        }
        if where_acc.conjuncts == 0 {
            return Err(ClauseError::invalid_argument(
                "build_update",
                "filter record adds no AND predicate; refusing to update every row",
            ));
        }

        let raw = format!("{}{};", set.set_sql, where_acc.where_sql);
        let mut args = set.set_args;
        args.extend(where_acc.where_args);

        let (query, args) = self.finish(&raw, &args)?;
        Ok(UpdateClause { query, args })
    }
}

fn require_record<'a>(
    node: Node<'a>,
    operation: &'static str,
    what: &str,
) -> ClauseResult<&'a dyn Record> {
    match node {
        Node::Record(record) => Ok(record),
        Node::Nil => Err(ClauseError::invalid_argument(
            operation,
            format!("{what} cannot be nil"),
        )),
        Node::Leaf(_) => Err(ClauseError::invalid_argument(
            operation,
            format!("{what} must be a record, not a single value"),
        )),
    }
}
