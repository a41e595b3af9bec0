//! Recursive descent parser for Lucene queries
//!
//! # Grammar
//!
//! ```text
//! query       := expr EOF
//! expr        := or_expr (or_expr)*            juxtaposition, joined as AND
//! or_expr     := and_expr (OR and_expr)*
//! and_expr    := unary (AND unary)*
//! unary       := (NOT | '+' | '-') unary | postfix
//! postfix     := primary (TILDE | CARET)*
//! primary     := field_query | grouped | value
//! field_query := name ':' field_value
//! field_value := compare | range | regex | list | wildcard | value
//! compare     := ('>' | '>=' | '<' | '<=') NUMBER
//! range       := ('[' | '{') endpoint TO endpoint (']' | '}')
//! list        := '(' value (OR value)* ')'
//! grouped     := '(' expr ')'
//! ```
//!
//! Precedence from tightest to loosest: primary, postfix modifiers,
//! unary prefixes, `AND`, `OR`, juxtaposition. Juxtaposed expressions
//! fold left-associatively into `And` nodes at their own level, so
//! `a b OR c` reads as `a AND (b OR c)`.

use super::expr::{Expr, Value};
use super::lexer::{Lexer, Token};
use crate::error::SquillError;
use crate::Result;

/// Parser for Lucene-style query strings
pub struct Parser {
    lexer: Lexer,
    current_token: Token,
}

impl Parser {
    /// Create a new parser for the given query string
    pub fn new(input: &str) -> Result<Self> {
        let mut lexer = Lexer::new(input);
        let current_token = lexer.next_token()?;
        Ok(Self {
            lexer,
            current_token,
        })
    }

    /// Parse the query into its raw expression tree
    pub fn parse(mut self) -> Result<Expr> {
        let expr = self.parse_expr()?;

        if self.current_token != Token::Eof {
            return Err(SquillError::ParseError(format!(
                "unexpected token after query: {:?}",
                self.current_token
            )));
        }

        Ok(expr)
    }

    /// Parse: expr := or_expr (or_expr)*
    fn parse_expr(&mut self) -> Result<Expr> {
        let mut expr = self.parse_or_expr()?;

        while self.is_start_of_expr() {
            let rhs = self.parse_or_expr()?;
            expr = Expr::And(Box::new(expr), Box::new(rhs));
        }

        Ok(expr)
    }

    /// Parse: or_expr := and_expr (OR and_expr)*
    fn parse_or_expr(&mut self) -> Result<Expr> {
        let mut expr = self.parse_and_expr()?;

        while self.current_token == Token::Or {
            self.advance()?;
            let rhs = self.parse_and_expr()?;
            expr = Expr::Or(Box::new(expr), Box::new(rhs));
        }

        Ok(expr)
    }

    /// Parse: and_expr := unary (AND unary)*
    fn parse_and_expr(&mut self) -> Result<Expr> {
        let mut expr = self.parse_unary()?;

        while self.current_token == Token::And {
            self.advance()?;
            let rhs = self.parse_unary()?;
            expr = Expr::And(Box::new(expr), Box::new(rhs));
        }

        Ok(expr)
    }

    /// Parse: unary := (NOT | '+' | '-') unary | postfix
    fn parse_unary(&mut self) -> Result<Expr> {
        match self.current_token {
            Token::Not => {
                self.advance()?;
                Ok(Expr::Not(Box::new(self.parse_unary()?)))
            }
            Token::Plus => {
                self.advance()?;
                Ok(Expr::Must(Box::new(self.parse_unary()?)))
            }
            Token::Minus => {
                self.advance()?;
                Ok(Expr::MustNot(Box::new(self.parse_unary()?)))
            }
            _ => self.parse_postfix(),
        }
    }

    /// Parse a primary with any `~` / `^` modifiers attached
    fn parse_postfix(&mut self) -> Result<Expr> {
        let mut expr = self.parse_primary()?;

        loop {
            match self.current_token {
                Token::Tilde(distance) => {
                    self.advance()?;
                    expr = Expr::Fuzzy(Box::new(expr), distance);
                }
                Token::Caret(power) => {
                    self.advance()?;
                    expr = Expr::Boost(Box::new(expr), power);
                }
                _ => break,
            }
        }

        Ok(expr)
    }

    /// Parse: primary := field_query | grouped | value
    fn parse_primary(&mut self) -> Result<Expr> {
        match self.current_token.clone() {
            Token::LParen => {
                self.advance()?;
                let expr = self.parse_expr()?;
                self.expect(Token::RParen)?;
                Ok(expr)
            }
            Token::Ident { text, .. } => {
                self.advance()?;
                if self.current_token == Token::Colon {
                    self.advance()?;
                    self.parse_field_value(&text)
                } else {
                    Ok(Expr::Literal(Value::Str(text)))
                }
            }
            Token::Number(text) => {
                self.advance()?;
                if self.current_token == Token::Colon {
                    self.advance()?;
                    self.parse_field_value(&text)
                } else {
                    Ok(Expr::Literal(number_value(&text)?))
                }
            }
            Token::Quoted(text) => {
                self.advance()?;
                Ok(Expr::Literal(Value::Str(text)))
            }
            Token::SingleQuoted(text) => {
                self.advance()?;
                Ok(Expr::Literal(Value::Str(text)))
            }
            Token::Star => {
                self.advance()?;
                Ok(Expr::Literal(Value::Str("*".to_string())))
            }
            other => Err(SquillError::ParseError(format!(
                "unexpected token: {:?}",
                other
            ))),
        }
    }

    /// Parse the value side of `field:`
    fn parse_field_value(&mut self, field: &str) -> Result<Expr> {
        match self.current_token.clone() {
            Token::Compare(op) => {
                self.advance()?;
                let value = self.parse_compare_value(field)?;
                Ok(Expr::Compare {
                    field: field.to_string(),
                    op,
                    value,
                })
            }
            Token::LBracket => {
                self.advance()?;
                self.parse_range(field, true)
            }
            Token::LBrace => {
                self.advance()?;
                self.parse_range(field, false)
            }
            Token::Regex(pattern) => {
                self.advance()?;
                Ok(Expr::Regexp {
                    field: field.to_string(),
                    pattern,
                })
            }
            Token::Quoted(text) => {
                self.advance()?;
                Ok(Expr::Equals {
                    field: field.to_string(),
                    value: Value::Str(text),
                })
            }
            Token::SingleQuoted(text) => {
                self.advance()?;
                Ok(Expr::Equals {
                    field: field.to_string(),
                    value: Value::Str(text),
                })
            }
            Token::Ident {
                text,
                wildcard,
                escapes,
            } => {
                self.advance()?;
                if wildcard {
                    Ok(Expr::Wildcard {
                        field: field.to_string(),
                        pattern: text.chars().zip(escapes).collect(),
                    })
                } else {
                    Ok(Expr::Equals {
                        field: field.to_string(),
                        value: Value::Str(text),
                    })
                }
            }
            Token::Number(text) => {
                self.advance()?;
                Ok(Expr::Equals {
                    field: field.to_string(),
                    value: number_value(&text)?,
                })
            }
            Token::Star => {
                self.advance()?;
                Ok(Expr::Wildcard {
                    field: field.to_string(),
                    pattern: vec![('*', false)],
                })
            }
            Token::Question => {
                self.advance()?;
                Ok(Expr::Wildcard {
                    field: field.to_string(),
                    pattern: vec![('?', false)],
                })
            }
            Token::LParen => {
                self.advance()?;
                self.parse_value_list(field)
            }
            other => Err(SquillError::ParseError(format!(
                "expected value after field '{}:', got {:?}",
                field, other
            ))),
        }
    }

    /// A comparison takes a numeric right-hand side
    fn parse_compare_value(&mut self, field: &str) -> Result<Value> {
        match self.current_token.clone() {
            Token::Number(text) => {
                self.advance()?;
                number_value(&text)
            }
            other => Err(SquillError::ParseError(format!(
                "expected number after comparison operator on field '{}', got {:?}",
                field, other
            ))),
        }
    }

    /// Parse: list := value (OR value)* ')'  — an `IN` set over one field
    fn parse_value_list(&mut self, field: &str) -> Result<Expr> {
        let mut values = vec![self.parse_list_value()?];

        while self.current_token == Token::Or {
            self.advance()?;
            values.push(self.parse_list_value()?);
        }

        self.expect(Token::RParen)?;
        Ok(Expr::List {
            field: field.to_string(),
            values,
        })
    }

    fn parse_list_value(&mut self) -> Result<Value> {
        match self.current_token.clone() {
            Token::Ident {
                text,
                wildcard: false,
                ..
            } => {
                self.advance()?;
                Ok(Value::Str(text))
            }
            Token::Quoted(text) | Token::SingleQuoted(text) => {
                self.advance()?;
                Ok(Value::Str(text))
            }
            Token::Number(text) => {
                self.advance()?;
                number_value(&text)
            }
            other => Err(SquillError::ParseError(format!(
                "expected a plain value in list, got {:?}",
                other
            ))),
        }
    }

    /// Parse: range := endpoint TO endpoint (']' | '}')
    ///
    /// Endpoint typing is decided here: the range is numeric only when
    /// every present endpoint is an unquoted number, otherwise both
    /// endpoints become strings.
    fn parse_range(&mut self, field: &str, lower_inclusive: bool) -> Result<Expr> {
        let mut lower = self.parse_range_endpoint()?;
        self.expect(Token::To)?;
        let mut upper = self.parse_range_endpoint()?;

        let upper_inclusive = match self.current_token {
            Token::RBracket => true,
            Token::RBrace => false,
            _ => {
                return Err(SquillError::ParseError(
                    "expected ']' or '}' at end of range".to_string(),
                ))
            }
        };
        self.advance()?;

        if lower.is_none() && upper.is_none() {
            return Err(SquillError::ParseError(
                "range requires at least one bound".to_string(),
            ));
        }

        // A mixed numeric/string range renders as strings
        if let (Some(lo), Some(hi)) = (&lower, &upper) {
            if lo.is_numeric() != hi.is_numeric() {
                lower = lower.map(Value::into_str);
                upper = upper.map(Value::into_str);
            }
        }

        Ok(Expr::Range {
            field: field.to_string(),
            lower,
            upper,
            lower_inclusive,
            upper_inclusive,
        })
    }

    /// Parse a single range endpoint; `*` denotes unbounded
    fn parse_range_endpoint(&mut self) -> Result<Option<Value>> {
        match self.current_token.clone() {
            Token::Star => {
                self.advance()?;
                Ok(None)
            }
            Token::Number(text) => {
                self.advance()?;
                Ok(Some(number_value(&text)?))
            }
            Token::Ident {
                text,
                wildcard: false,
                ..
            } => {
                self.advance()?;
                Ok(Some(Value::Str(text)))
            }
            Token::Quoted(text) | Token::SingleQuoted(text) => {
                self.advance()?;
                Ok(Some(Value::Str(text)))
            }
            other => Err(SquillError::ParseError(format!(
                "expected range endpoint, got {:?}",
                other
            ))),
        }
    }

    /// Check if the current token can start a juxtaposed expression
    fn is_start_of_expr(&self) -> bool {
        matches!(
            self.current_token,
            Token::Ident { .. }
                | Token::Quoted(_)
                | Token::SingleQuoted(_)
                | Token::Number(_)
                | Token::LParen
                | Token::Not
                | Token::Plus
                | Token::Minus
                | Token::Star
        )
    }

    /// Advance to the next token
    fn advance(&mut self) -> Result<()> {
        self.current_token = self.lexer.next_token()?;
        Ok(())
    }

    /// Expect a specific token and advance
    fn expect(&mut self, expected: Token) -> Result<()> {
        if self.current_token == expected {
            self.advance()
        } else {
            Err(SquillError::ParseError(format!(
                "expected {:?}, got {:?}",
                expected, self.current_token
            )))
        }
    }
}

/// Convert a number token's lexical form into a typed value
fn number_value(text: &str) -> Result<Value> {
    if text.contains('.') {
        text.parse::<f64>()
            .map(Value::Float)
            .map_err(|_| SquillError::ParseError(format!("invalid number: {}", text)))
    } else {
        text.parse::<i64>()
            .map(Value::Int)
            .map_err(|_| SquillError::ParseError(format!("invalid number: {}", text)))
    }
}
