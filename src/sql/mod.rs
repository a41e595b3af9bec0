//! PostgreSQL fragment generation
//!
//! Renders canonical expression trees into WHERE-clause fragments,
//! either with values inlined or with `?` placeholders plus an
//! ordered parameter list.

pub mod renderer;

pub use renderer::{quote_ident, quote_string, render_inline, render_parameterized};
