//! Filter expressions over scalar fields
//!
//! ## Grammar (recursive descent)
//!
//! ```text
//! or_expr   → and_expr ('||' and_expr)*
//! and_expr  → unary ('&&' unary)*
//! unary     → '!' unary | primary
//! primary   → '(' or_expr ')' | predicate
//! predicate → IDENT cmp_op literal
//!           | IDENT 'IS' 'NOT'? 'NULL'
//!           | IDENT ('HAS_PREFIX' | 'HAS_SUFFIX') STRING
//!           | IDENT 'CONTAIN_ANY' (STRING | '(' STRING (',' STRING)* ')')
//! cmp_op    → '==' | '!=' | '<' | '<=' | '>' | '>='
//! literal   → STRING | NUMBER | 'true' | 'false' | 'null'
//! ```
//!
//! Strings are single-quoted with `\'` as the escape for a quote. Keywords
//! are case-insensitive. A comparison against an absent or null field is
//! false, except `== null` and `!= null`, which behave like `IS NULL` and
//! `IS NOT NULL`.

use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::Chars;
use zvec_core::{Doc, Error, FieldValue, Result};

/// Parsed filter expression
#[derive(Debug, Clone, PartialEq)]
pub enum FilterExpr {
    /// Both sides must hold
    And(Box<FilterExpr>, Box<FilterExpr>),
    /// Either side must hold
    Or(Box<FilterExpr>, Box<FilterExpr>),
    /// Negation
    Not(Box<FilterExpr>),
    /// `field op literal`
    Compare {
        /// Field name
        field: String,
        /// Comparison operator
        op: CompareOp,
        /// Right-hand side
        value: Literal,
    },
    /// `field IS [NOT] NULL`
    IsNull {
        /// Field name
        field: String,
        /// `IS NOT NULL` when true
        negated: bool,
    },
    /// String predicate
    Text {
        /// Field name
        field: String,
        /// Predicate kind
        op: TextOp,
        /// Candidate needles; `HAS_PREFIX` / `HAS_SUFFIX` carry exactly one
        needles: Vec<String>,
    },
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

/// String predicates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextOp {
    /// Value starts with the needle
    HasPrefix,
    /// Value ends with the needle
    HasSuffix,
    /// Value contains any needle
    ContainAny,
}

/// Literal on the right-hand side of a comparison
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Quoted string
    String(String),
    /// Any numeric literal
    Number(f64),
    /// `true` / `false`
    Bool(bool),
    /// `null`
    Null,
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Str(String),
    Number(f64),
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    Bang,
    LParen,
    RParen,
    Comma,
    Eof,
}

struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
        }
    }

    fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace();

        let Some(&c) = self.chars.peek() else {
            return Ok(Token::Eof);
        };
        match c {
            '(' => self.single(Token::LParen),
            ')' => self.single(Token::RParen),
            ',' => self.single(Token::Comma),
            '=' => self.pair('=', Token::Eq, None),
            '!' => self.pair('=', Token::Ne, Some(Token::Bang)),
            '<' => self.pair('=', Token::Le, Some(Token::Lt)),
            '>' => self.pair('=', Token::Ge, Some(Token::Gt)),
            '&' => self.pair('&', Token::And, None),
            '|' => self.pair('|', Token::Or, None),
            '\'' => self.string(),
            '0'..='9' | '.' | '-' | '+' => self.number(),
            c if c.is_alphabetic() || c == '_' => Ok(self.ident()),
            other => Err(syntax_error(format!("unexpected character '{}'", other))),
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.chars.peek(), Some(c) if c.is_whitespace()) {
            self.chars.next();
        }
    }

    fn single(&mut self, token: Token) -> Result<Token> {
        self.chars.next();
        Ok(token)
    }

    /// Two-character operator, or `lone` when the second character is absent
    fn pair(&mut self, second: char, both: Token, lone: Option<Token>) -> Result<Token> {
        let first = self.chars.next();
        if self.chars.peek() == Some(&second) {
            self.chars.next();
            return Ok(both);
        }
        lone.ok_or_else(|| {
            syntax_error(format!(
                "expected '{}' after '{}'",
                second,
                first.unwrap_or_default()
            ))
        })
    }

    fn string(&mut self) -> Result<Token> {
        self.chars.next();
        let mut s = String::new();
        loop {
            match self.chars.next() {
                None => return Err(syntax_error("unterminated string literal")),
                Some('\\') => match self.chars.next() {
                    Some(escaped) => s.push(escaped),
                    None => return Err(syntax_error("unterminated string literal")),
                },
                Some('\'') => return Ok(Token::Str(s)),
                Some(c) => s.push(c),
            }
        }
    }

    fn number(&mut self) -> Result<Token> {
        let mut s = String::new();
        if let Some(&sign) = self.chars.peek() {
            if sign == '-' || sign == '+' {
                s.push(sign);
                self.chars.next();
            }
        }
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_digit() || c == '.' {
                s.push(c);
                self.chars.next();
            } else if c == 'e' || c == 'E' {
                s.push(c);
                self.chars.next();
                if let Some(&sign) = self.chars.peek() {
                    if sign == '+' || sign == '-' {
                        s.push(sign);
                        self.chars.next();
                    }
                }
            } else {
                break;
            }
        }
        s.parse::<f64>()
            .map(Token::Number)
            .map_err(|_| syntax_error(format!("invalid number '{}'", s)))
    }

    fn ident(&mut self) -> Token {
        let mut s = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_alphanumeric() || c == '_' || c == '.' {
                s.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        Token::Ident(s)
    }
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Result<Self> {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token()?;
        Ok(Self { lexer, current })
    }

    fn parse(&mut self) -> Result<FilterExpr> {
        let expr = self.or_expr()?;
        if self.current != Token::Eof {
            return Err(syntax_error(format!(
                "unexpected trailing token {:?}",
                self.current
            )));
        }
        Ok(expr)
    }

    fn advance(&mut self) -> Result<()> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    fn expect(&mut self, token: Token) -> Result<()> {
        if self.current != token {
            return Err(syntax_error(format!(
                "expected {:?}, found {:?}",
                token, self.current
            )));
        }
        self.advance()
    }

    fn is_keyword(&self, keyword: &str) -> bool {
        matches!(&self.current, Token::Ident(s) if s.eq_ignore_ascii_case(keyword))
    }

    fn or_expr(&mut self) -> Result<FilterExpr> {
        let mut left = self.and_expr()?;
        while self.current == Token::Or || self.is_keyword("or") {
            self.advance()?;
            let right = self.and_expr()?;
            left = FilterExpr::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn and_expr(&mut self) -> Result<FilterExpr> {
        let mut left = self.unary()?;
        while self.current == Token::And || self.is_keyword("and") {
            self.advance()?;
            let right = self.unary()?;
            left = FilterExpr::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn unary(&mut self) -> Result<FilterExpr> {
        if self.current == Token::Bang || self.is_keyword("not") {
            self.advance()?;
            let inner = self.unary()?;
            return Ok(FilterExpr::Not(Box::new(inner)));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<FilterExpr> {
        match self.current.clone() {
            Token::LParen => {
                self.advance()?;
                let expr = self.or_expr()?;
                self.expect(Token::RParen)?;
                Ok(expr)
            }
            Token::Ident(field) => {
                self.advance()?;
                self.predicate(field)
            }
            other => Err(syntax_error(format!(
                "expected field name or '(', found {:?}",
                other
            ))),
        }
    }

    fn predicate(&mut self, field: String) -> Result<FilterExpr> {
        let op = match &self.current {
            Token::Eq => Some(CompareOp::Eq),
            Token::Ne => Some(CompareOp::Ne),
            Token::Lt => Some(CompareOp::Lt),
            Token::Le => Some(CompareOp::Le),
            Token::Gt => Some(CompareOp::Gt),
            Token::Ge => Some(CompareOp::Ge),
            _ => None,
        };
        if let Some(op) = op {
            self.advance()?;
            let value = self.literal()?;
            return Ok(FilterExpr::Compare { field, op, value });
        }

        if self.is_keyword("is") {
            self.advance()?;
            let negated = self.is_keyword("not");
            if negated {
                self.advance()?;
            }
            if !self.is_keyword("null") {
                return Err(syntax_error("expected NULL after IS"));
            }
            self.advance()?;
            return Ok(FilterExpr::IsNull { field, negated });
        }

        let text_op = if self.is_keyword("has_prefix") {
            TextOp::HasPrefix
        } else if self.is_keyword("has_suffix") {
            TextOp::HasSuffix
        } else if self.is_keyword("contain_any") {
            TextOp::ContainAny
        } else {
            return Err(syntax_error(format!(
                "expected operator after field '{}', found {:?}",
                field, self.current
            )));
        };
        self.advance()?;

        let needles = if text_op == TextOp::ContainAny && self.current == Token::LParen {
            self.advance()?;
            let mut needles = vec![self.string_literal()?];
            while self.current == Token::Comma {
                self.advance()?;
                needles.push(self.string_literal()?);
            }
            self.expect(Token::RParen)?;
            needles
        } else {
            vec![self.string_literal()?]
        };
        Ok(FilterExpr::Text {
            field,
            op: text_op,
            needles,
        })
    }

    fn string_literal(&mut self) -> Result<String> {
        match self.current.clone() {
            Token::Str(s) => {
                self.advance()?;
                Ok(s)
            }
            other => Err(syntax_error(format!(
                "expected string literal, found {:?}",
                other
            ))),
        }
    }

    fn literal(&mut self) -> Result<Literal> {
        let lit = match &self.current {
            Token::Str(s) => Literal::String(s.clone()),
            Token::Number(n) => Literal::Number(*n),
            Token::Ident(s) if s.eq_ignore_ascii_case("true") => Literal::Bool(true),
            Token::Ident(s) if s.eq_ignore_ascii_case("false") => Literal::Bool(false),
            Token::Ident(s) if s.eq_ignore_ascii_case("null") => Literal::Null,
            other => {
                return Err(syntax_error(format!(
                    "expected literal, found {:?}",
                    other
                )))
            }
        };
        self.advance()?;
        Ok(lit)
    }
}

fn syntax_error(msg: impl std::fmt::Display) -> Error {
    Error::invalid_argument(format!("invalid filter expression: {}", msg))
}

impl FilterExpr {
    /// Parse a filter expression
    ///
    /// # Errors
    /// `InvalidArgument` on any syntax error.
    pub fn parse(input: &str) -> Result<Self> {
        Parser::new(input)?.parse()
    }

    /// Evaluate against a document
    pub fn matches(&self, doc: &Doc) -> bool {
        match self {
            FilterExpr::And(l, r) => l.matches(doc) && r.matches(doc),
            FilterExpr::Or(l, r) => l.matches(doc) || r.matches(doc),
            FilterExpr::Not(inner) => !inner.matches(doc),
            FilterExpr::IsNull { field, negated } => is_null(doc, field) != *negated,
            FilterExpr::Compare { field, op, value } => compare(doc.value(field), *op, value),
            FilterExpr::Text { field, op, needles } => {
                let Some(text) = doc.value(field).and_then(FieldValue::as_str) else {
                    return false;
                };
                match op {
                    TextOp::HasPrefix => needles.iter().any(|n| text.starts_with(n.as_str())),
                    TextOp::HasSuffix => needles.iter().any(|n| text.ends_with(n.as_str())),
                    TextOp::ContainAny => needles.iter().any(|n| text.contains(n.as_str())),
                }
            }
        }
    }
}

fn is_null(doc: &Doc, field: &str) -> bool {
    doc.value(field).map_or(true, FieldValue::is_null)
}

fn compare(actual: Option<&FieldValue>, op: CompareOp, expected: &Literal) -> bool {
    let actual = match actual {
        Some(v) if !v.is_null() => v,
        _ => return op == CompareOp::Eq && *expected == Literal::Null,
    };

    let ordering = match (actual, expected) {
        (_, Literal::Null) => return op == CompareOp::Ne,
        (FieldValue::String(a), Literal::String(b)) => a.as_str().cmp(b.as_str()),
        (FieldValue::Bool(a), Literal::Bool(b)) => {
            return match op {
                CompareOp::Eq => a == b,
                CompareOp::Ne => a != b,
                _ => false,
            }
        }
        (value, Literal::Number(b)) => match value.as_f64().and_then(|a| a.partial_cmp(b)) {
            Some(ord) => ord,
            None => return false,
        },
        _ => return false,
    };

    match op {
        CompareOp::Eq => ordering == Ordering::Equal,
        CompareOp::Ne => ordering != Ordering::Equal,
        CompareOp::Lt => ordering == Ordering::Less,
        CompareOp::Le => ordering != Ordering::Greater,
        CompareOp::Gt => ordering == Ordering::Greater,
        CompareOp::Ge => ordering != Ordering::Less,
    }
}
