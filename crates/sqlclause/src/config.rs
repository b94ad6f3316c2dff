//! Builder configuration.

use crate::error::{ClauseError, ClauseResult};
use serde::{Deserialize, Serialize};

/// Default filter on the status column, seeded into every WHERE clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    None,
    /// `status=1`
    Active,
    /// `status=-1`
    Inactive,
}

impl StatusFilter {
    fn code(self) -> Option<i8> {
        match self {
            StatusFilter::None => None,
            StatusFilter::Active => Some(1),
            StatusFilter::Inactive => Some(-1),
        }
    }
}

/// Configuration for [`ClauseBuilder`](crate::ClauseBuilder).
///
/// # Example
/// ```ignore
/// let config = BuilderConfig::new()
///     .param_tag("form")
///     .column_tag("db")
///     .default_status(StatusFilter::Active);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Tag key holding the parameter name and operator suffixes.
    pub param_tag: String,
    /// Tag key holding the column name.
    pub column_tag: String,
    /// Never render `LIMIT`, even when the record carries page/limit fields.
    pub disable_pagination: bool,
    pub default_status: StatusFilter,
    pub status_column: String,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            param_tag: "param".to_string(),
            column_tag: "db".to_string(),
            disable_pagination: false,
            default_status: StatusFilter::None,
            status_column: "status".to_string(),
        }
    }
}

impl BuilderConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tag key read for parameter names.
    pub fn param_tag(mut self, tag: impl Into<String>) -> Self {
        self.param_tag = tag.into();
        self
    }

    /// Set the tag key read for column names.
    pub fn column_tag(mut self, tag: impl Into<String>) -> Self {
        self.column_tag = tag.into();
        self
    }

    pub fn disable_pagination(mut self, disable: bool) -> Self {
        self.disable_pagination = disable;
        self
    }

    pub fn default_status(mut self, filter: StatusFilter) -> Self {
        self.default_status = filter;
        self
    }

    pub fn status_column(mut self, column: impl Into<String>) -> Self {
        self.status_column = column.into();
        self
    }

    /// Parse and validate a TOML table.
    ///
    /// ```toml
    /// param_tag = "form"
    /// column_tag = "db"
    /// default_status = "active"
    /// ```
    pub fn from_toml_str(s: &str) -> ClauseResult<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ClauseResult<()> {
        if self.param_tag.is_empty() {
            return Err(ClauseError::config("param_tag cannot be empty"));
        }
        if self.column_tag.is_empty() {
            return Err(ClauseError::config("column_tag cannot be empty"));
        }
        if !is_plain_column(&self.status_column) {
            return Err(ClauseError::config(format!(
                "status_column must be a plain identifier, got '{}'",
                self.status_column
            )));
        }
        Ok(())
    }

    /// The WHERE clause every build starts from: the tautology plus the
    /// default status filter.
    pub(crate) fn where_seed(&self) -> String {
        let mut seed = String::from(" WHERE 1=1");
        if let Some(code) = self.default_status.code() {
            seed.push_str(" AND ");
            seed.push_str(&self.status_column);
            seed.push('=');
            seed.push_str(&code.to_string());
        }
        seed
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`, optionally dotted.
pub(crate) fn is_plain_column(s: &str) -> bool {
    !s.is_empty()
        && s.split('.').all(|part| {
            let mut chars = part.chars();
            matches!(chars.next(), Some(c) if c == '_' || c.is_ascii_alphabetic())
                && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_carries_status_filter() {
        assert_eq!(BuilderConfig::new().where_seed(), " WHERE 1=1");
        assert_eq!(
            BuilderConfig::new()
                .default_status(StatusFilter::Active)
                .where_seed(),
            " WHERE 1=1 AND status=1"
        );
        assert_eq!(
            BuilderConfig::new()
                .default_status(StatusFilter::Inactive)
                .status_column("u.state")
                .where_seed(),
            " WHERE 1=1 AND u.state=-1"
        );
    }

    #[test]
    fn parses_toml_with_defaults() {
        let config = BuilderConfig::from_toml_str(
            r#"
            param_tag = "form"
            default_status = "inactive"
            "#,
        )
        .unwrap();
        assert_eq!(config.param_tag, "form");
        assert_eq!(config.column_tag, "db");
        assert_eq!(config.default_status, StatusFilter::Inactive);
        assert!(!config.disable_pagination);
    }

    #[test]
    fn rejects_invalid_toml_config() {
        let err = BuilderConfig::from_toml_str(r#"column_tag = """#).unwrap_err();
        assert!(matches!(err, ClauseError::Config(_)));

        let err = BuilderConfig::from_toml_str(r#"status_column = "status; drop""#).unwrap_err();
        assert!(matches!(err, ClauseError::Config(_)));

        assert!(BuilderConfig::from_toml_str("default_status = 3").is_err());
    }

    #[test]
    fn plain_columns() {
        assert!(is_plain_column("created_at"));
        assert!(is_plain_column("u.id"));
        assert!(!is_plain_column("1id"));
        assert!(!is_plain_column("u..id"));
        assert!(!is_plain_column("id desc"));
        assert!(!is_plain_column(""));
    }
}
