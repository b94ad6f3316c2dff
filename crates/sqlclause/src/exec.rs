//! Running built clauses against PostgreSQL.
//!
//! The builder only renders clause tails (` WHERE ...;`, ` SET ... WHERE
//! ...;`). These helpers glue a caller-supplied statement head onto them and
//! execute the result through any [`GenericClient`]. Clauses must be built
//! with [`Dialect::Postgres`](crate::Dialect::Postgres).
//!
//! With the `tracing` feature, every statement is logged at DEBUG under the
//! `sqlclause.sql` target before it runs.

use crate::builder::{SelectClause, UpdateClause};
use crate::client::GenericClient;
use crate::error::ClauseResult;
use crate::value::Value;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

/// One page of rows plus the unpaginated total.
#[derive(Debug)]
pub struct Page {
    pub rows: Vec<Row>,
    pub total: i64,
}

fn params(args: &[Value]) -> Vec<&(dyn ToSql + Sync)> {
    args.iter().map(|v| v as &(dyn ToSql + Sync)).collect()
}

#[cfg(feature = "tracing")]
fn log_statement(operation: &'static str, sql: &str, args: &[Value]) {
    if tracing::enabled!(target: "sqlclause.sql", tracing::Level::DEBUG) {
        tracing::debug!(
            target: "sqlclause.sql",
            operation,
            param_count = args.len(),
            sql,
            interpolated = %interpolate(sql, args),
            "executing statement"
        );
    }
}

#[cfg(not(feature = "tracing"))]
fn log_statement(_operation: &'static str, _sql: &str, _args: &[Value]) {}

/// Run `<select_sql><clause.query>` and `<count_sql><clause.count_query>`.
///
/// ```ignore
/// let clause = builder.build(&filter)?;
/// let page = fetch_page(&client, "SELECT id, name FROM users", "SELECT count(*) FROM users", &clause).await?;
/// ```
pub async fn fetch_page<C: GenericClient>(
    client: &C,
    select_sql: &str,
    count_sql: &str,
    clause: &SelectClause,
) -> ClauseResult<Page> {
    let rows = fetch_all(client, select_sql, clause).await?;

    let sql = format!("{count_sql}{}", clause.count_query);
    log_statement("count", &sql, &clause.count_args);
    let row = client.query_one(&sql, &params(&clause.count_args)).await?;
    let total: i64 = row.try_get(0)?;

    Ok(Page { rows, total })
}

/// Run `<select_sql><clause.query>` and return every row.
pub async fn fetch_all<C: GenericClient>(
    client: &C,
    select_sql: &str,
    clause: &SelectClause,
) -> ClauseResult<Vec<Row>> {
    let sql = format!("{select_sql}{}", clause.query);
    log_statement("select", &sql, &clause.args);
    client.query(&sql, &params(&clause.args)).await
}

/// Run `<update_sql><clause.query>`, e.g. with `update_sql = "UPDATE users"`.
///
/// Returns the number of affected rows.
pub async fn execute_update<C: GenericClient>(
    client: &C,
    update_sql: &str,
    clause: &UpdateClause,
) -> ClauseResult<u64> {
    let sql = format!("{update_sql}{}", clause.query);
    log_statement("update", &sql, &clause.args);
    client.execute(&sql, &params(&clause.args)).await
}

/// Render `query` with its arguments inlined, for logs only.
///
/// Whitespace runs collapse to one space, then each `?` or `$n` placeholder
/// outside single-quoted literals is replaced with the matching argument.
/// Placeholders without an argument are left as they are.
pub fn interpolate(query: &str, args: &[Value]) -> String {
    let query = query.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut out = String::with_capacity(query.len() + args.len() * 8);
    let mut next = 0usize;
    let mut in_literal = false;
    let mut chars = query.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\'' => {
                in_literal = !in_literal;
                out.push(ch);
            }
            '?' if !in_literal => {
                match args.get(next) {
                    Some(arg) => out.push_str(&arg.to_string()),
                    None => out.push(ch),
                }
                next += 1;
            }
            '$' if !in_literal && chars.peek().is_some_and(char::is_ascii_digit) => {
                let mut digits = String::new();
                while let Some(d) = chars.peek().copied().filter(char::is_ascii_digit) {
                    digits.push(d);
                    chars.next();
                }
                let arg = digits
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| args.get(i));
                match arg {
                    Some(arg) => out.push_str(&arg.to_string()),
                    None => {
                        out.push('$');
                        out.push_str(&digits);
                    }
                }
            }
            _ => out.push(ch),
        }
    }
    out
}
