//! Parameter-tag and column-tag interpretation.
//!
//! A parameter tag either names a directive (`sort-by`, `page`, `limit`) or a
//! filter field whose `__`-separated suffixes pick the comparison operator and
//! the boolean connective:
//!
//! | suffix  | effect                          |
//! |---------|---------------------------------|
//! | `__opt` | join with `OR` instead of `AND` |
//! | `__gte` | `>=`                            |
//! | `__lte` | `<=`                            |
//! | `__lt`  | `<`                             |
//! | `__gt`  | `>`                             |
//! | `__ne`  | `<>`                            |
//! | `__nin` | `NOT IN` for collections        |

/// Column tag value that removes a field from traversal entirely.
pub const SKIP_COLUMN: &str = "-";

const SORT_ALIASES: [&str; 4] = ["sort-by", "sort_by", "sortBy", "sortby"];

/// Boolean connective placed before a WHERE fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Connective {
    #[default]
    And,
    Or,
}

impl Connective {
    pub fn as_sql(self) -> &'static str {
        match self {
            Connective::And => " AND",
            Connective::Or => " OR",
        }
    }
}

/// Scalar comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CmpOp {
    #[default]
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl CmpOp {
    pub fn as_sql(self) -> &'static str {
        match self {
            CmpOp::Eq => "=",
            CmpOp::Ne => "<>",
            CmpOp::Gt => ">",
            CmpOp::Gte => ">=",
            CmpOp::Lt => "<",
            CmpOp::Lte => "<=",
        }
    }
}

/// Operator directives decoded from a filter field's parameter tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldTag {
    pub connective: Connective,
    pub op: CmpOp,
    /// `NOT IN` instead of `IN` when the value is a collection.
    pub negate_in: bool,
}

/// Syntactic role of a terminal field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Sort,
    Page,
    Limit,
    Field(FieldTag),
}

impl Role {
    /// Sort, page and limit fields drive rendering instead of filtering.
    pub fn is_directive(&self) -> bool {
        !matches!(self, Role::Field(_))
    }
}

/// Decode a parameter tag.
///
/// Directive names must match exactly. Otherwise the tag is split on `__` and
/// every segment after the first is looked up in the suffix vocabulary; when
/// several comparison suffixes are present the first of `gte`, `lte`, `lt`,
/// `gt`, `ne` wins.
pub fn parse_param_tag(tag: &str) -> Role {
    if SORT_ALIASES.contains(&tag) {
        return Role::Sort;
    }
    match tag {
        "page" => return Role::Page,
        "limit" => return Role::Limit,
        _ => {}
    }

    let suffixes: Vec<&str> = tag.split("__").skip(1).collect();
    let has = |s: &str| suffixes.contains(&s);

    let op = if has("gte") {
        CmpOp::Gte
    } else if has("lte") {
        CmpOp::Lte
    } else if has("lt") {
        CmpOp::Lt
    } else if has("gt") {
        CmpOp::Gt
    } else if has("ne") {
        CmpOp::Ne
    } else {
        CmpOp::Eq
    };

    Role::Field(FieldTag {
        connective: if has("opt") {
            Connective::Or
        } else {
            Connective::And
        },
        op,
        negate_in: has("nin"),
    })
}

/// Whether a column tag excludes its field from traversal.
pub fn is_skip_column(column: &str) -> bool {
    column == SKIP_COLUMN
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(tag: &str) -> FieldTag {
        match parse_param_tag(tag) {
            Role::Field(f) => f,
            other => panic!("expected field role for {tag:?}, got {other:?}"),
        }
    }

    #[test]
    fn directives_match_exactly() {
        for alias in ["sort-by", "sort_by", "sortBy", "sortby"] {
            assert_eq!(parse_param_tag(alias), Role::Sort);
        }
        assert_eq!(parse_param_tag("page"), Role::Page);
        assert_eq!(parse_param_tag("limit"), Role::Limit);
        assert!(!parse_param_tag("page_size").is_directive());
        assert!(!parse_param_tag("sort").is_directive());
    }

    #[test]
    fn plain_tag_is_equality_and() {
        assert_eq!(field("name"), FieldTag::default());
        assert_eq!(field(""), FieldTag::default());
    }

    #[test]
    fn comparison_suffixes() {
        assert_eq!(field("age__gte").op, CmpOp::Gte);
        assert_eq!(field("age__lte").op, CmpOp::Lte);
        assert_eq!(field("age__lt").op, CmpOp::Lt);
        assert_eq!(field("age__gt").op, CmpOp::Gt);
        assert_eq!(field("age__ne").op, CmpOp::Ne);
        assert_eq!(CmpOp::Gte.as_sql(), ">=");
        assert_eq!(CmpOp::Ne.as_sql(), "<>");
    }

    #[test]
    fn opt_and_nin_combine_with_operators() {
        let f = field("age__gt__opt");
        assert_eq!(f.op, CmpOp::Gt);
        assert_eq!(f.connective, Connective::Or);

        let f = field("id__nin");
        assert!(f.negate_in);
        assert_eq!(f.op, CmpOp::Eq);
        assert_eq!(f.connective.as_sql(), " AND");
    }

    #[test]
    fn first_comparison_suffix_wins() {
        assert_eq!(field("age__lt__gte").op, CmpOp::Gte);
        assert_eq!(field("age__ne__gt").op, CmpOp::Gt);
    }

    #[test]
    fn suffix_must_be_a_whole_segment() {
        assert_eq!(field("user__next").op, CmpOp::Eq);
        assert_eq!(field("age_gte").op, CmpOp::Eq);
    }

    #[test]
    fn skip_marker() {
        assert!(is_skip_column("-"));
        assert!(!is_skip_column(""));
        assert!(!is_skip_column("name"));
    }
}
