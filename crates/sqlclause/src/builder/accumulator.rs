//! Per-call clause state.

use crate::config::{BuilderConfig, is_plain_column};
use crate::dialect::Rebind;
use crate::tag::{Connective, FieldTag, Role, parse_param_tag};
use crate::value::Value;
use crate::walk::BuildOption;
use std::collections::HashSet;

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_LIMIT: i64 = 10;

/// Which buffer a traversal writes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Target {
    Where,
    Set,
}

/// Fragments and arguments gathered from one traversal.
///
/// A fresh accumulator is created for every build, so nothing leaks between
/// calls. Invariant: each argument list holds exactly one value per `?`
/// written into its buffer.
#[derive(Debug)]
pub(crate) struct Accumulator {
    pub(crate) where_sql: String,
    pub(crate) where_args: Vec<Value>,
    /// `AND`-joined predicates appended after the seed; an `OR` after the
    /// `1=1` tautology bounds nothing.
    pub(crate) conjuncts: usize,
    pub(crate) set_sql: String,
    pub(crate) set_args: Vec<Value>,
    pub(crate) assignments: usize,
    seen: HashSet<&'static str>,
    sort: Vec<String>,
    page: Option<i64>,
    limit: Option<i64>,
    paginate: bool,
}

impl Accumulator {
    pub(crate) fn new(config: &BuilderConfig) -> Self {
        Self {
            where_sql: config.where_seed(),
            where_args: Vec::new(),
            conjuncts: 0,
            set_sql: String::from(" SET"),
            set_args: Vec::new(),
            assignments: 0,
            seen: HashSet::new(),
            sort: Vec::new(),
            page: None,
            limit: None,
            paginate: false,
        }
    }

    pub(crate) fn consume(&mut self, option: BuildOption, target: Target) {
        let role = parse_param_tag(option.param_tag);
        if !role.is_directive() {
            self.seen.insert(option.column_tag);
        }

        match (role, target) {
            (Role::Field(tag), Target::Where) => self.push_predicate(tag, option),
            (Role::Field(_), Target::Set) => self.push_assignment(option),
            (_, Target::Set) => {}
            (Role::Sort, Target::Where) => {
                if let Some(value) = option.value {
                    self.sort = sort_entries(value);
                }
            }
            (Role::Page, Target::Where) => {
                self.paginate = true;
                self.page = option.value.as_ref().and_then(Value::as_i64);
            }
            (Role::Limit, Target::Where) => {
                self.paginate = true;
                self.limit = option.value.as_ref().and_then(Value::as_i64);
            }
        }
    }

    fn push_predicate(&mut self, tag: FieldTag, option: BuildOption) {
        let Some(value) = option.value else {
            return;
        };

        let column = option.column_tag;
        self.where_sql.push_str(tag.connective.as_sql());
        self.where_sql.push(' ');
        self.where_sql.push_str(column);
        if option.is_many {
            self.where_sql
                .push_str(if tag.negate_in { " NOT IN (?)" } else { " IN (?)" });
        } else if option.is_like {
            self.where_sql.push_str(" LIKE ?");
        } else {
            self.where_sql.push_str(tag.op.as_sql());
            self.where_sql.push('?');
        }
        self.where_args.push(value);
        if tag.connective == Connective::And {
            self.conjuncts += 1;
        }
    }

    // Collections have no single-column assignment and are left out of SET.
    fn push_assignment(&mut self, option: BuildOption) {
        if option.is_many || (option.value.is_none() && !option.is_sql_null) {
            return;
        }

        if self.assignments > 0 {
            self.set_sql.push(',');
        }
        self.set_sql.push(' ');
        self.set_sql.push_str(option.column_tag);
        match option.value {
            Some(value) => {
                self.set_sql.push_str("=?");
                self.set_args.push(value);
            }
            None => self.set_sql.push_str("=NULL"),
        }
        self.assignments += 1;
    }

    /// `ORDER BY` over the requested columns that traversal actually saw.
    pub(crate) fn order_by(&self) -> String {
        let terms: Vec<String> = self
            .sort
            .iter()
            .filter_map(|entry| {
                let (column, direction) = match entry.strip_prefix('-') {
                    Some(column) => (column, "DESC"),
                    None => (entry.as_str(), "ASC"),
                };
                (is_plain_column(column) && self.seen.contains(column))
                    .then(|| format!("{column} {direction}"))
            })
            .collect();

        if terms.is_empty() {
            String::new()
        } else {
            format!(" ORDER BY {}", terms.join(", "))
        }
    }

    pub(crate) fn pagination(&self, config: &BuilderConfig, dialect: &dyn Rebind) -> String {
        if !self.paginate || config.disable_pagination {
            return String::new();
        }
        let page = self.page.filter(|p| *p > 0).unwrap_or(DEFAULT_PAGE);
        let limit = self.limit.filter(|l| *l > 0).unwrap_or(DEFAULT_LIMIT);
        let offset = (page - 1).saturating_mul(limit);
        dialect.paginate(offset, limit)
    }
}

/// Sort entries from a string list or a comma-separated string.
fn sort_entries(value: Value) -> Vec<String> {
    let raw = match value {
        Value::Text(s) => vec![s],
        Value::List(items) => items
            .into_iter()
            .filter_map(|v| match v {
                Value::Text(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };

    raw.iter()
        .flat_map(|s| s.split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Dialect;

    fn option(param: &'static str, column: &'static str, value: Option<Value>) -> BuildOption {
        BuildOption {
            param_tag: param,
            column_tag: column,
            value,
            ..BuildOption::default()
        }
    }

    #[test]
    fn absent_field_is_still_seen() {
        let mut acc = Accumulator::new(&BuilderConfig::new());
        acc.consume(option("name", "name", None), Target::Where);
        acc.consume(
            option("sort-by", "sort", Some(Value::Text("-name".into()))),
            Target::Where,
        );
        assert_eq!(acc.where_sql, " WHERE 1=1");
        assert!(acc.where_args.is_empty());
        assert_eq!(acc.order_by(), " ORDER BY name DESC");
    }

    #[test]
    fn or_predicates_are_not_conjuncts() {
        let mut acc = Accumulator::new(&BuilderConfig::new());
        acc.consume(option("id__opt", "id", Some(Value::Int(7))), Target::Where);
        assert_eq!(acc.where_sql, " WHERE 1=1 OR id=?");
        assert_eq!(acc.conjuncts, 0);

        acc.consume(option("tenant", "tenant_id", Some(Value::Int(2))), Target::Where);
        assert_eq!(acc.where_args.len(), 2);
        assert_eq!(acc.conjuncts, 1);
    }

    #[test]
    fn directive_columns_are_not_sortable() {
        let mut acc = Accumulator::new(&BuilderConfig::new());
        acc.consume(option("page", "page", Some(Value::Int(2))), Target::Where);
        acc.consume(
            option("sort_by", "sort", Some(Value::Text("page,sort".into()))),
            Target::Where,
        );
        assert_eq!(acc.order_by(), "");
    }

    #[test]
    fn sort_entries_split_commas() {
        let entries = sort_entries(Value::List(vec![
            Value::Text("a, -b".into()),
            Value::Int(3),
            Value::Text(" c ".into()),
        ]));
        assert_eq!(entries, vec!["a", "-b", "c"]);
    }

    #[test]
    fn pagination_defaults() {
        let config = BuilderConfig::new();
        let mut acc = Accumulator::new(&config);
        assert_eq!(acc.pagination(&config, &Dialect::MySql), "");

        acc.consume(option("page", "page", Some(Value::Int(-4))), Target::Where);
        assert_eq!(acc.pagination(&config, &Dialect::MySql), " LIMIT 0, 10");

        let disabled = BuilderConfig::new().disable_pagination(true);
        assert_eq!(acc.pagination(&disabled, &Dialect::MySql), "");
    }

    #[test]
    fn set_clause_separators() {
        let mut acc = Accumulator::new(&BuilderConfig::new());
        acc.consume(option("name", "name", Some(Value::Text("x".into()))), Target::Set);
        acc.consume(
            BuildOption {
                is_sql_null: true,
                ..option("note", "note", None)
            },
            Target::Set,
        );
        acc.consume(option("age", "age", None), Target::Set);
        acc.consume(option("page", "page", Some(Value::Int(1))), Target::Set);
        assert_eq!(acc.set_sql, " SET name=?, note=NULL");
        assert_eq!(acc.set_args, vec![Value::Text("x".into())]);
        assert_eq!(acc.assignments, 2);
    }
}
