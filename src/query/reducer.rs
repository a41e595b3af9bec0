//! Canonicalisation of raw parse trees
//!
//! The reducer rewrites the parser's output into the form the SQL
//! renderer expects: `+`/`-` modifiers resolve to identity or `Not`,
//! half-bounded ranges collapse to comparisons, bare terms bind to the
//! configured default field, and Lucene wildcard patterns become
//! `SIMILAR TO` patterns. The pass is total; anything it cannot
//! rewrite (fuzzy and boost wrappers) passes through for the renderer
//! to reject.

use crate::config::SqlConfig;
use crate::query::expr::{CompareOp, Expr, PatternChar, Value};

/// Rewrite a raw parse tree into canonical form, bottom-up
pub fn reduce(expr: Expr, config: &SqlConfig) -> Expr {
    match expr {
        Expr::And(l, r) => Expr::And(
            Box::new(reduce(*l, config)),
            Box::new(reduce(*r, config)),
        ),
        Expr::Or(l, r) => Expr::Or(
            Box::new(reduce(*l, config)),
            Box::new(reduce(*r, config)),
        ),
        Expr::Not(x) => Expr::Not(Box::new(reduce(*x, config))),
        Expr::Must(x) => reduce(*x, config),
        Expr::MustNot(x) => Expr::Not(Box::new(reduce(*x, config))),
        Expr::Fuzzy(x, distance) => Expr::Fuzzy(Box::new(reduce(*x, config)), distance),
        Expr::Boost(x, power) => Expr::Boost(Box::new(reduce(*x, config)), power),
        Expr::Literal(value) => match &config.default_field {
            Some(field) => Expr::Equals {
                field: field.clone(),
                value,
            },
            None => Expr::Literal(value),
        },
        Expr::Range {
            field,
            lower,
            upper,
            lower_inclusive,
            upper_inclusive,
        } => reduce_range(field, lower, upper, lower_inclusive, upper_inclusive),
        Expr::Wildcard { field, pattern } => Expr::Wildcard {
            field,
            pattern: similar_to_pattern(&pattern),
        },
        other => other,
    }
}

/// Collapse half-bounded ranges into single comparisons
fn reduce_range(
    field: String,
    lower: Option<Value>,
    upper: Option<Value>,
    lower_inclusive: bool,
    upper_inclusive: bool,
) -> Expr {
    match (lower, upper) {
        (Some(lower), None) => Expr::Compare {
            field,
            op: if lower_inclusive {
                CompareOp::Gte
            } else {
                CompareOp::Gt
            },
            value: lower,
        },
        (None, Some(upper)) => Expr::Compare {
            field,
            op: if upper_inclusive {
                CompareOp::Lte
            } else {
                CompareOp::Lt
            },
            value: upper,
        },
        (lower, upper) => Expr::Range {
            field,
            lower,
            upper,
            lower_inclusive,
            upper_inclusive,
        },
    }
}

/// Translate a Lucene wildcard pattern into `SIMILAR TO` form: an
/// unescaped `*` matches any run and `?` exactly one character, while
/// escaped wildcard characters stay literal
fn similar_to_pattern(pattern: &[PatternChar]) -> Vec<PatternChar> {
    pattern
        .iter()
        .map(|&(ch, escaped)| match ch {
            '*' if !escaped => ('%', false),
            '?' if !escaped => ('_', false),
            _ => (ch, false),
        })
        .collect()
}
