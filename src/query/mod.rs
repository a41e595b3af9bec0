//! Lucene query parsing pipeline
//!
//! This module turns a query string into a canonical expression tree:
//! - [`lexer`] tokenizes the Lucene surface syntax
//! - [`parser`] builds the raw tree with operator precedence
//! - [`reducer`] canonicalises the tree for SQL rendering
//!
//! # Example
//!
//! ```rust
//! use squill::query::Parser;
//!
//! let expr = Parser::new("title:rust AND year:[2020 TO 2024]")
//!     .unwrap()
//!     .parse()
//!     .unwrap();
//! assert!(expr.is_compound());
//! ```

pub mod expr;
pub mod lexer;
pub mod parser;
pub mod reducer;

pub use expr::{CompareOp, Expr, PatternChar, Value};
pub use lexer::{Lexer, Token};
pub use parser::Parser;
pub use reducer::reduce;
