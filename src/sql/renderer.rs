//! PostgreSQL rendering of canonical expression trees
//!
//! One walker serves both output flavours: the traversal is
//! parameterised over a value sink, so parenthesisation and operator
//! layout cannot drift between the inlined and the parameterised
//! forms. The inline sink quotes values into the SQL text; the
//! parameter sink writes a `?` placeholder and accumulates the value,
//! which keeps the bound values in left-to-right placeholder order.

use tracing::trace;

use crate::error::SquillError;
use crate::query::expr::{Expr, Value};
use crate::Result;

/// Destination for value sites during a render walk
trait ValueSink {
    fn write_value(&mut self, sql: &mut String, value: &Value);
}

/// Quotes values directly into the SQL text
struct InlineSink;

impl ValueSink for InlineSink {
    fn write_value(&mut self, sql: &mut String, value: &Value) {
        match value {
            Value::Int(v) => sql.push_str(&v.to_string()),
            Value::Float(v) => sql.push_str(&format_float(*v)),
            Value::Str(s) => sql.push_str(&quote_string(s)),
        }
    }
}

/// Writes `?` placeholders and collects the bound values
struct ParamSink {
    params: Vec<Value>,
}

impl ValueSink for ParamSink {
    fn write_value(&mut self, sql: &mut String, value: &Value) {
        sql.push('?');
        self.params.push(value.clone());
    }
}

/// Render the tree as a literal SQL fragment with values inlined
pub fn render_inline(expr: &Expr) -> Result<String> {
    trace!(%expr, "rendering inline sql");
    let mut sql = String::new();
    render(expr, &mut sql, &mut InlineSink)?;
    Ok(sql)
}

/// Render the tree with `?` placeholders, returning the SQL fragment
/// and the ordered bound values
pub fn render_parameterized(expr: &Expr) -> Result<(String, Vec<Value>)> {
    trace!(%expr, "rendering parameterized sql");
    let mut sql = String::new();
    let mut sink = ParamSink { params: Vec::new() };
    render(expr, &mut sql, &mut sink)?;
    Ok((sql, sink.params))
}

fn render<S: ValueSink>(expr: &Expr, sql: &mut String, sink: &mut S) -> Result<()> {
    match expr {
        Expr::Literal(value) => sink.write_value(sql, value),
        Expr::Equals { field, value } => {
            sql.push_str(&quote_ident(field));
            sql.push_str(" = ");
            sink.write_value(sql, value);
        }
        Expr::Compare { field, op, value } => {
            sql.push_str(&quote_ident(field));
            sql.push(' ');
            sql.push_str(op.as_sql());
            sql.push(' ');
            sink.write_value(sql, value);
        }
        Expr::Wildcard { field, pattern } => {
            sql.push_str(&quote_ident(field));
            sql.push_str(" SIMILAR TO ");
            let pattern: String = pattern.iter().map(|&(ch, _)| ch).collect();
            sink.write_value(sql, &Value::Str(pattern));
        }
        Expr::Regexp { field, pattern } => {
            sql.push_str(&quote_ident(field));
            sql.push_str(" ~ ");
            sink.write_value(sql, &Value::Str(pattern.clone()));
        }
        Expr::Range {
            field,
            lower: Some(lower),
            upper: Some(upper),
            lower_inclusive,
            upper_inclusive,
        } => {
            if lower.is_numeric() && upper.is_numeric() {
                // Numeric bounds spell out the comparison pair
                sql.push_str(&quote_ident(field));
                sql.push_str(if *lower_inclusive { " >= " } else { " > " });
                sink.write_value(sql, lower);
                sql.push_str(" AND ");
                sql.push_str(&quote_ident(field));
                sql.push_str(if *upper_inclusive { " <= " } else { " < " });
                sink.write_value(sql, upper);
            } else {
                sql.push_str(&quote_ident(field));
                sql.push_str(" BETWEEN ");
                sink.write_value(sql, lower);
                sql.push_str(" AND ");
                sink.write_value(sql, upper);
            }
        }
        Expr::Range { .. } => {
            return Err(SquillError::RenderError(
                "unable to render range without bounds".to_string(),
            ))
        }
        Expr::List { field, values } => {
            sql.push_str(&quote_ident(field));
            sql.push_str(" IN (");
            for (i, value) in values.iter().enumerate() {
                if i > 0 {
                    sql.push_str(", ");
                }
                sink.write_value(sql, value);
            }
            sql.push(')');
        }
        Expr::Not(x) => {
            sql.push_str("NOT(");
            render(x, sql, sink)?;
            sql.push(')');
        }
        Expr::And(l, r) => {
            render_operand(l, sql, sink)?;
            sql.push_str(" AND ");
            render_operand(r, sql, sink)?;
        }
        Expr::Or(l, r) => {
            render_operand(l, sql, sink)?;
            sql.push_str(" OR ");
            render_operand(r, sql, sink)?;
        }
        // Unreduced modifiers keep their reduced meaning
        Expr::Must(x) => render(x, sql, sink)?,
        Expr::MustNot(x) => {
            sql.push_str("NOT(");
            render(x, sql, sink)?;
            sql.push(')');
        }
        Expr::Fuzzy(..) => return Err(SquillError::unrenderable("FUZZY")),
        Expr::Boost(..) => return Err(SquillError::unrenderable("BOOST")),
    }
    Ok(())
}

/// Render a boolean operand, parenthesised when it is compound
fn render_operand<S: ValueSink>(expr: &Expr, sql: &mut String, sink: &mut S) -> Result<()> {
    if expr.is_compound() {
        sql.push('(');
        render(expr, sql, sink)?;
        sql.push(')');
    } else {
        render(expr, sql, sink)?;
    }
    Ok(())
}

/// Quote a column identifier, doubling any embedded double quote
pub fn quote_ident(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len() + 2);
    out.push('"');
    for ch in ident.chars() {
        if ch == '"' {
            out.push('"');
        }
        out.push(ch);
    }
    out.push('"');
    out
}

/// Quote a string literal, doubling any embedded single quote
pub fn quote_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for ch in s.chars() {
        if ch == '\'' {
            out.push('\'');
        }
        out.push(ch);
    }
    out.push('\'');
    out
}

/// Keep whole floats recognisable as floats in SQL text
fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 {
        format!("{:.1}", f)
    } else {
        f.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::expr::CompareOp;

    fn lit(text: &str) -> Expr {
        Expr::Literal(Value::Str(text.to_string()))
    }

    fn equals(field: &str, value: &str) -> Expr {
        Expr::Equals {
            field: field.to_string(),
            value: Value::Str(value.to_string()),
        }
    }

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("a"), r#""a""#);
        assert_eq!(quote_ident("foo bar"), r#""foo bar""#);
        assert_eq!(quote_ident("we\"ird"), r#""we""ird""#);
    }

    #[test]
    fn test_quote_string_doubles_quotes() {
        assert_eq!(quote_string("b"), "'b'");
        assert_eq!(quote_string("'b'"), "'''b'''");
        assert_eq!(quote_string("it's"), "'it''s'");
    }

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(2.0), "2.0");
        assert_eq!(format_float(2.5), "2.5");
    }

    #[test]
    fn test_bare_literals_render_unparenthesised() {
        let expr = Expr::And(Box::new(lit("a")), Box::new(lit("b")));
        assert_eq!(render_inline(&expr).unwrap(), "'a' AND 'b'");
    }

    #[test]
    fn test_compound_operands_get_parens() {
        let expr = Expr::And(Box::new(equals("a", "b")), Box::new(equals("c", "d")));
        assert_eq!(
            render_inline(&expr).unwrap(),
            r#"("a" = 'b') AND ("c" = 'd')"#
        );
    }

    #[test]
    fn test_not_always_parenthesises_its_child() {
        let expr = Expr::Not(Box::new(lit("b")));
        assert_eq!(render_inline(&expr).unwrap(), "NOT('b')");
    }

    #[test]
    fn test_numeric_range_spells_out_bounds() {
        let expr = Expr::Range {
            field: "a".to_string(),
            lower: Some(Value::Int(1)),
            upper: Some(Value::Int(5)),
            lower_inclusive: true,
            upper_inclusive: true,
        };
        assert_eq!(
            render_inline(&expr).unwrap(),
            r#""a" >= 1 AND "a" <= 5"#
        );
    }

    #[test]
    fn test_exclusive_numeric_range_uses_strict_bounds() {
        let expr = Expr::Range {
            field: "a".to_string(),
            lower: Some(Value::Int(2)),
            upper: Some(Value::Int(5)),
            lower_inclusive: false,
            upper_inclusive: false,
        };
        assert_eq!(render_inline(&expr).unwrap(), r#""a" > 2 AND "a" < 5"#);
    }

    #[test]
    fn test_string_range_renders_between() {
        let expr = Expr::Range {
            field: "a".to_string(),
            lower: Some(Value::Str("foo".to_string())),
            upper: Some(Value::Str("bar".to_string())),
            lower_inclusive: false,
            upper_inclusive: false,
        };
        assert_eq!(
            render_inline(&expr).unwrap(),
            r#""a" BETWEEN 'foo' AND 'bar'"#
        );
    }

    #[test]
    fn test_parameters_collect_in_placeholder_order() {
        let expr = Expr::And(
            Box::new(equals("a", "foo")),
            Box::new(Expr::Compare {
                field: "b".to_string(),
                op: CompareOp::Gt,
                value: Value::Int(33),
            }),
        );
        let (sql, params) = render_parameterized(&expr).unwrap();
        assert_eq!(sql, r#"("a" = ?) AND ("b" > ?)"#);
        assert_eq!(
            params,
            vec![Value::Str("foo".to_string()), Value::Int(33)]
        );
    }

    #[test]
    fn test_fuzzy_is_rejected() {
        let expr = Expr::Fuzzy(Box::new(lit("a")), None);
        let err = render_inline(&expr).unwrap_err();
        assert!(err.to_string().contains("unable to render operator [FUZZY]"));
    }

    #[test]
    fn test_boost_is_rejected_anywhere_in_the_tree() {
        let expr = Expr::And(
            Box::new(lit("b")),
            Box::new(Expr::Boost(Box::new(lit("a")), Some(10.0))),
        );
        let err = render_parameterized(&expr).unwrap_err();
        assert!(err.to_string().contains("unable to render operator [BOOST]"));
    }

    #[test]
    fn test_no_params_leak_on_error() {
        let expr = Expr::And(
            Box::new(lit("b")),
            Box::new(Expr::Fuzzy(Box::new(lit("a")), None)),
        );
        assert!(render_parameterized(&expr).is_err());
    }
}
