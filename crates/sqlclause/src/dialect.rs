//! Placeholder expansion and rebinding.
//!
//! Clauses are assembled with generic `?` placeholders and one argument per
//! placeholder, where an `IN (?)` placeholder may carry a whole
//! [`Value::List`]. Before execution [`expand`] flattens those lists into
//! `?, ?, ...` and a [`Rebind`] implementation rewrites the placeholders into
//! the target database's syntax.

use crate::error::{ClauseError, ClauseResult};
use crate::value::Value;
use serde::{Deserialize, Serialize};

/// Dialect-specific rendering consumed by the builder.
pub trait Rebind: Send + Sync {
    /// Rewrite `?` placeholders into the native bind-variable syntax.
    fn rebind(&self, query: &str) -> String;

    /// Render the pagination tail, including its leading space.
    fn paginate(&self, offset: i64, limit: i64) -> String {
        format!(" LIMIT {offset}, {limit}")
    }
}

/// Built-in SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    /// `?` placeholders, `LIMIT offset, limit`.
    #[default]
    MySql,
    /// `?` placeholders, `LIMIT offset, limit`.
    Sqlite,
    /// `$1, $2, ...` placeholders, `LIMIT limit OFFSET offset`.
    Postgres,
}

impl Rebind for Dialect {
    fn rebind(&self, query: &str) -> String {
        match self {
            Dialect::MySql | Dialect::Sqlite => query.to_string(),
            Dialect::Postgres => rebind_dollar(query),
        }
    }

    fn paginate(&self, offset: i64, limit: i64) -> String {
        match self {
            Dialect::MySql | Dialect::Sqlite => format!(" LIMIT {offset}, {limit}"),
            Dialect::Postgres => format!(" LIMIT {limit} OFFSET {offset}"),
        }
    }
}

/// Visit every character of `query`, reporting whether it is a placeholder
/// (a `?` outside single-quoted literals).
fn scan(query: &str, mut f: impl FnMut(char, bool) -> ClauseResult<()>) -> ClauseResult<()> {
    let mut in_literal = false;
    for ch in query.chars() {
        if ch == '\'' {
            in_literal = !in_literal;
        }
        f(ch, ch == '?' && !in_literal)?;
    }
    Ok(())
}

fn rebind_dollar(query: &str) -> String {
    let mut out = String::with_capacity(query.len() + 8);
    let mut n = 0usize;
    let mut in_literal = false;
    for ch in query.chars() {
        if ch == '\'' {
            in_literal = !in_literal;
        }
        if ch == '?' && !in_literal {
            n += 1;
            out.push('$');
            out.push_str(&n.to_string());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Expand collection arguments into one placeholder per element.
///
/// Fails when a collection is empty or when placeholders and arguments do not
/// pair up one to one.
pub fn expand(query: &str, args: &[Value]) -> ClauseResult<(String, Vec<Value>)> {
    let mut out = String::with_capacity(query.len());
    let mut flat = Vec::with_capacity(args.len());
    let mut pending = args.iter();

    scan(query, |ch, placeholder| {
        if !placeholder {
            out.push(ch);
            return Ok(());
        }
        match pending.next() {
            Some(Value::List(items)) => {
                if items.is_empty() {
                    return Err(ClauseError::expansion(
                        "empty collection passed to an IN placeholder",
                    ));
                }
                for i in 0..items.len() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push('?');
                }
                flat.extend(items.iter().cloned());
            }
            Some(arg) => {
                out.push('?');
                flat.push(arg.clone());
            }
            None => {
                return Err(ClauseError::expansion(format!(
                    "query has more placeholders than the {} arguments supplied",
                    args.len()
                )));
            }
        }
        Ok(())
    })?;

    if pending.next().is_some() {
        return Err(ClauseError::expansion(format!(
            "query has fewer placeholders than the {} arguments supplied",
            args.len()
        )));
    }

    Ok((out, flat))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_lists_in_order() {
        let args = vec![
            Value::Text("ann".into()),
            Value::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)]),
            Value::Bool(true),
        ];
        let (sql, flat) = expand(" WHERE 1=1 AND name=? AND id IN (?) AND ok=?;", &args).unwrap();
        assert_eq!(sql, " WHERE 1=1 AND name=? AND id IN (?, ?, ?) AND ok=?;");
        assert_eq!(flat.len(), 5);
        assert_eq!(flat[1], Value::Int(1));
        assert_eq!(flat[4], Value::Bool(true));
    }

    #[test]
    fn expand_rejects_empty_list() {
        let err = expand("id IN (?)", &[Value::List(vec![])]).unwrap_err();
        assert!(err.is_dialect_expansion());
    }

    #[test]
    fn expand_rejects_count_mismatch() {
        assert!(expand("a=? AND b=?", &[Value::Int(1)]).unwrap_err().is_dialect_expansion());
        assert!(expand("a=?", &[Value::Int(1), Value::Int(2)]).unwrap_err().is_dialect_expansion());
    }

    #[test]
    fn literals_are_not_placeholders() {
        let (sql, flat) = expand("note='why?' AND a=?", &[Value::Int(1)]).unwrap();
        assert_eq!(sql, "note='why?' AND a=?");
        assert_eq!(flat, vec![Value::Int(1)]);
        assert_eq!(Dialect::Postgres.rebind("note='?' AND a=?"), "note='?' AND a=$1");
    }

    #[test]
    fn rebind_per_dialect() {
        let q = " SET a=?, b=? WHERE 1=1 AND id IN (?, ?);";
        assert_eq!(Dialect::MySql.rebind(q), q);
        assert_eq!(
            Dialect::Postgres.rebind(q),
            " SET a=$1, b=$2 WHERE 1=1 AND id IN ($3, $4);"
        );
    }

    #[test]
    fn rebind_numbers_past_nine() {
        let q = vec!["?"; 11].join(",");
        let rebound = Dialect::Postgres.rebind(&q);
        assert!(rebound.starts_with("$1,$2,"));
        assert!(rebound.ends_with(",$10,$11"));
    }

    #[test]
    fn pagination_per_dialect() {
        assert_eq!(Dialect::MySql.paginate(40, 20), " LIMIT 40, 20");
        assert_eq!(Dialect::Sqlite.paginate(0, 10), " LIMIT 0, 10");
        assert_eq!(Dialect::Postgres.paginate(40, 20), " LIMIT 20 OFFSET 40");
    }
}
