//! Translate Lucene query expressions into PostgreSQL WHERE fragments.
//!
//! The pipeline lexes the Lucene surface syntax, parses it into a
//! typed expression tree with operator precedence, canonicalises the
//! tree, and renders SQL in one of two flavours: a literal fragment
//! with values inlined and quoted, or a parameterised fragment with a
//! `?` placeholder per value plus the ordered bound values. Calls are
//! synchronous, keep no shared state, and are safe to issue from many
//! threads at once.
//!
//! # Example
//!
//! ```rust
//! use squill::{to_parameterized_postgres, to_postgres, SqlConfig, Value};
//!
//! let sql = to_postgres(
//!     r#"title:"The Right Way" AND body:foo*"#,
//!     SqlConfig::default(),
//! )
//! .unwrap();
//! assert_eq!(sql, r#"("title" = 'The Right Way') AND ("body" SIMILAR TO 'foo%')"#);
//!
//! let (sql, params) = to_parameterized_postgres("a:b", SqlConfig::default()).unwrap();
//! assert_eq!(sql, r#""a" = ?"#);
//! assert_eq!(params, vec![Value::Str("b".to_string())]);
//! ```

pub mod config;
pub mod error;
pub mod query;
pub mod sql;

pub use config::SqlConfig;
pub use error::{Result, SquillError};
pub use query::{CompareOp, Expr, PatternChar, Value};

use tracing::debug;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Parse a query into its raw expression tree, before canonicalisation
pub fn parse(query: &str) -> Result<Expr> {
    query::Parser::new(query)?.parse()
}

/// Translate a Lucene query into a literal SQL fragment with values
/// inlined and quoted
pub fn to_postgres(query: &str, config: SqlConfig) -> Result<String> {
    debug!(query, "rendering query to inline sql");
    let expr = query::reduce(parse(query)?, &config);
    sql::render_inline(&expr)
}

/// Translate a Lucene query into a parameterised SQL fragment plus the
/// ordered bound values
pub fn to_parameterized_postgres(query: &str, config: SqlConfig) -> Result<(String, Vec<Value>)> {
    debug!(query, "rendering query to parameterized sql");
    let expr = query::reduce(parse(query)?, &config);
    sql::render_parameterized(&expr)
}
