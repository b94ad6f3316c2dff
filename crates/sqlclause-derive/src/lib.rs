//! Derive macros for sqlclause
//!
//! Provides `#[derive(Record)]`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod record;

/// Derive `Record` and `Walkable` for a struct with named fields.
///
/// # Example
///
/// ```ignore
/// use sqlclause::{NullString, Record};
///
/// #[derive(Record)]
/// struct UserParam {
///     #[tag(param = "name", db = "name")]
///     name: NullString,
///     #[tag(param = "age__gte", db = "age")]
///     min_age: i64,
///     #[tag(skip)]
///     cache_key: String,
/// }
/// ```
///
/// # Attributes
///
/// - `#[tag(key = "value", ...)]` - Attach static tags; the builder reads the
///   keys it is configured with (`param` and `db` by default)
/// - `#[tag(skip)]` - Leave the field out of the record entirely
///
/// Every other field must implement `Walkable`.
#[proc_macro_derive(Record, attributes(tag))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
