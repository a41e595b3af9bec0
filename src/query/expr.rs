//! Expression tree for parsed queries
//!
//! Queries parse into a tree of [`Expr`] nodes. The parser produces the
//! raw tree, the reducer rewrites it into canonical form, and the SQL
//! renderer walks the canonical tree read-only. Nothing is shared or
//! cached across calls.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A typed value appearing on the right-hand side of a predicate
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// 64-bit integer
    Int(i64),
    /// 64-bit floating point
    Float(f64),
    /// String (terms, phrases, patterns)
    Str(String),
}

impl Value {
    /// Whether this value renders as a bare SQL number
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    /// Convert a numeric value to its lexical string form
    pub(crate) fn into_str(self) -> Value {
        match self {
            Value::Int(v) => Value::Str(v.to_string()),
            Value::Float(v) => Value::Str(v.to_string()),
            other => other,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Str(s) if s.chars().any(|c| c.is_whitespace() || c == ':') => {
                write!(f, "\"{}\"", s)
            }
            Value::Str(s) => write!(f, "{}", s),
        }
    }
}

/// One character of a wildcard pattern and whether it was written
/// behind a `\` escape in the source; escaped `*` / `?` stay literal
pub type PatternChar = (char, bool);

/// Comparison operator for range shorthands (`field:>n` and friends)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompareOp {
    Gt,
    Gte,
    Lt,
    Lte,
}

impl CompareOp {
    /// The SQL spelling of this operator
    pub fn as_sql(&self) -> &'static str {
        match self {
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// A node in the query expression tree
///
/// Field references are carried inline as the `field` of each
/// field-anchored node, so every comparison, range, wildcard, regexp,
/// and equality has its column on the left by construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// A bare term with no column attached
    Literal(Value),
    /// `field:value` equality
    Equals { field: String, value: Value },
    /// `field:>n` comparison shorthand
    Compare {
        field: String,
        op: CompareOp,
        value: Value,
    },
    /// `field:[a TO b]` / `field:{a TO b}`; `None` endpoints are unbounded
    Range {
        field: String,
        lower: Option<Value>,
        upper: Option<Value>,
        lower_inclusive: bool,
        upper_inclusive: bool,
    },
    /// `field:pa*t?rn`; holds the Lucene pattern, with each
    /// character's escape provenance, until reduction rewrites it
    /// into `SIMILAR TO` form
    Wildcard {
        field: String,
        pattern: Vec<PatternChar>,
    },
    /// `field:/…/`; the pattern keeps its delimiters and escapes
    Regexp { field: String, pattern: String },
    /// `field:(a OR b OR c)`, rendered as an `IN` set
    List { field: String, values: Vec<Value> },
    /// Binary conjunction
    And(Box<Expr>, Box<Expr>),
    /// Binary disjunction
    Or(Box<Expr>, Box<Expr>),
    /// Negation
    Not(Box<Expr>),
    /// `+expr`; reduces to its child
    Must(Box<Expr>),
    /// `-expr`; reduces to `Not`
    MustNot(Box<Expr>),
    /// `expr~` / `expr~n`; recognised but has no SQL rendering
    Fuzzy(Box<Expr>, Option<u32>),
    /// `expr^` / `expr^n`; recognised but has no SQL rendering
    Boost(Box<Expr>, Option<f32>),
}

impl Expr {
    /// Whether the node reads as a compound expression
    ///
    /// Compound operands of a binary boolean are parenthesised; bare
    /// literals are not.
    pub fn is_compound(&self) -> bool {
        !matches!(self, Expr::Literal(_))
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(value) => write!(f, "{}", value),
            Expr::Equals { field, value } => write!(f, "{}:{}", field, value),
            Expr::Compare { field, op, value } => write!(f, "{}:{}{}", field, op, value),
            Expr::Range {
                field,
                lower,
                upper,
                lower_inclusive,
                upper_inclusive,
            } => {
                let open = if *lower_inclusive { '[' } else { '{' };
                let close = if *upper_inclusive { ']' } else { '}' };
                let lower = lower.as_ref().map_or_else(|| "*".to_string(), Value::to_string);
                let upper = upper.as_ref().map_or_else(|| "*".to_string(), Value::to_string);
                write!(f, "{}:{}{} TO {}{}", field, open, lower, upper, close)
            }
            Expr::Wildcard { field, pattern } => {
                write!(f, "{}:", field)?;
                for (ch, escaped) in pattern {
                    if *escaped {
                        write!(f, "\\")?;
                    }
                    write!(f, "{}", ch)?;
                }
                Ok(())
            }
            Expr::Regexp { field, pattern } => write!(f, "{}:{}", field, pattern),
            Expr::List { field, values } => {
                let values: Vec<String> = values.iter().map(Value::to_string).collect();
                write!(f, "{}:({})", field, values.join(" OR "))
            }
            Expr::And(l, r) => write!(f, "({} AND {})", l, r),
            Expr::Or(l, r) => write!(f, "({} OR {})", l, r),
            Expr::Not(x) => write!(f, "NOT({})", x),
            Expr::Must(x) => write!(f, "+{}", x),
            Expr::MustNot(x) => write!(f, "-{}", x),
            Expr::Fuzzy(x, None) => write!(f, "{}~", x),
            Expr::Fuzzy(x, Some(distance)) => write!(f, "{}~{}", x, distance),
            Expr::Boost(x, None) => write!(f, "{}^", x),
            Expr::Boost(x, Some(power)) => write!(f, "{}^{}", x, power),
        }
    }
}
