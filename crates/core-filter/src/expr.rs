//! Boolean expressions over request facts.
//!
//! Policies whose applicability cannot be expressed with a single leaf rule
//! can use a small expression language evaluated against the request's fact
//! snapshot ([`AttributeFilterContext::expression_facts`]):
//!
//! ```text
//! requester == "https://sp.example.org"
//! principal == "jsmith" and not (authn_method == "urn:x:weak")
//! requester =~ "^https://.*\\.example\\.org$" or has issuer
//! ```
//!
//! ## Syntax
//!
//! ```text
//! expr    ::= or_expr
//! or_expr ::= and_expr (or and_expr)*
//! and_expr::= not_expr (and not_expr)*
//! not_expr::= not primary | primary
//! primary ::= has key | key op value | (expr) | true | false
//! op      ::= == | != | =~
//! ```
//!
//! `=~` matches the fact against a regular expression, compiled once at
//! parse time. Comparing a fact the request never supplied yields `false`;
//! use `has` to test presence explicitly.
//!
//! ## Limits
//!
//! - Maximum expression length: [`MAX_EXPR_LENGTH`] characters
//! - Maximum nesting depth at evaluation: [`MAX_EXPR_DEPTH`]

use crate::context::AttributeFilterContext;
use crate::error::{FilterError, Result};
use crate::rule::{PolicyRequirementRule, Tristate};
use regex::Regex;
use std::collections::BTreeMap;
use tracing::warn;

/// Maximum nesting depth of an expression at evaluation time
pub const MAX_EXPR_DEPTH: usize = 32;

/// Maximum length of an expression string
pub const MAX_EXPR_LENGTH: usize = 1024;

/// A parsed boolean expression over request facts.
#[derive(Debug, Clone)]
pub enum FactExpr {
    /// Both operands must hold
    And(Box<FactExpr>, Box<FactExpr>),

    /// At least one operand must hold
    Or(Box<FactExpr>, Box<FactExpr>),

    /// Negates the operand
    Not(Box<FactExpr>),

    /// The fact is present in the snapshot
    Has(String),

    /// The fact equals (or differs from) a constant
    Compare {
        /// Fact key to compare
        key: String,
        /// Whether equality or inequality is required
        negated: bool,
        /// Constant to compare against
        value: String,
    },

    /// The fact matches a regular expression
    Match {
        /// Fact key to match
        key: String,
        /// Compiled pattern
        regex: Regex,
    },

    /// Always true
    True,

    /// Always false
    False,
}

impl FactExpr {
    /// Parse an expression from its source text.
    ///
    /// # Errors
    ///
    /// * [`FilterError::ExpressionTooLong`] - source exceeds [`MAX_EXPR_LENGTH`]
    /// * [`FilterError::InvalidExpression`] - syntax error
    /// * [`FilterError::InvalidPattern`] - a `=~` pattern does not compile
    pub fn parse(input: &str) -> Result<Self> {
        if input.len() > MAX_EXPR_LENGTH {
            return Err(FilterError::ExpressionTooLong {
                max: MAX_EXPR_LENGTH,
                length: input.len(),
            });
        }

        let tokens = tokenize(input)?;
        let mut parser = Parser::new(&tokens);
        let expr = parser.parse_expr()?;
        parser.expect_end()?;
        Ok(expr)
    }

    /// Evaluate this expression against a fact snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::ExpressionTooDeep`] when nesting exceeds
    /// [`MAX_EXPR_DEPTH`].
    pub fn evaluate(&self, facts: &BTreeMap<String, String>, depth: usize) -> Result<bool> {
        if depth > MAX_EXPR_DEPTH {
            return Err(FilterError::ExpressionTooDeep {
                max: MAX_EXPR_DEPTH,
            });
        }

        match self {
            Self::True => Ok(true),
            Self::False => Ok(false),

            Self::And(left, right) => {
                if !left.evaluate(facts, depth + 1)? {
                    return Ok(false);
                }
                right.evaluate(facts, depth + 1)
            }

            Self::Or(left, right) => {
                if left.evaluate(facts, depth + 1)? {
                    return Ok(true);
                }
                right.evaluate(facts, depth + 1)
            }

            Self::Not(inner) => Ok(!inner.evaluate(facts, depth + 1)?),

            Self::Has(key) => Ok(facts.contains_key(key)),

            Self::Compare {
                key,
                negated,
                value,
            } => match facts.get(key) {
                None => Ok(false),
                Some(actual) => Ok((actual == value) != *negated),
            },

            Self::Match { key, regex } => match facts.get(key) {
                None => Ok(false),
                Some(actual) => Ok(regex.is_match(actual)),
            },
        }
    }
}

// ===== Tokenizer =====

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    And,
    Or,
    Not,
    Has,
    True,
    False,
    LeftParen,
    RightParen,
    Eq,
    Ne,
    Matches,
    Ident(String),
    Literal(String),
}

fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&ch) = chars.peek() {
        match ch {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                tokens.push(Token::LeftParen);
                chars.next();
            }
            ')' => {
                tokens.push(Token::RightParen);
                chars.next();
            }
            '=' => {
                chars.next();
                match chars.next() {
                    Some('=') => tokens.push(Token::Eq),
                    Some('~') => tokens.push(Token::Matches),
                    _ => {
                        return Err(FilterError::InvalidExpression(
                            "bare '=' is not an operator, use '==' or '=~'".into(),
                        ))
                    }
                }
            }
            '!' => {
                chars.next();
                if chars.next() == Some('=') {
                    tokens.push(Token::Ne);
                } else {
                    return Err(FilterError::InvalidExpression(
                        "bare '!' is not an operator, use '!=' or 'not'".into(),
                    ));
                }
            }
            '"' => {
                chars.next();
                let mut value = String::new();
                let mut escaped = false;
                loop {
                    match chars.next() {
                        Some('\\') if !escaped => escaped = true,
                        Some('"') if !escaped => break,
                        Some(c) => {
                            value.push(c);
                            escaped = false;
                        }
                        None => {
                            return Err(FilterError::InvalidExpression(
                                "unterminated string literal".into(),
                            ))
                        }
                    }
                }
                tokens.push(Token::Literal(value));
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut ident = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_alphanumeric() || c == '_' {
                        ident.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(match ident.as_str() {
                    "and" => Token::And,
                    "or" => Token::Or,
                    "not" => Token::Not,
                    "has" => Token::Has,
                    "true" => Token::True,
                    "false" => Token::False,
                    _ => Token::Ident(ident),
                });
            }
            other => {
                return Err(FilterError::InvalidExpression(format!(
                    "unexpected character '{other}'"
                )))
            }
        }
    }

    Ok(tokens)
}

// ===== Parser =====

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.pos);
        self.pos += 1;
        token
    }

    fn expect_end(&self) -> Result<()> {
        match self.current() {
            None => Ok(()),
            Some(token) => Err(FilterError::InvalidExpression(format!(
                "trailing input at {token:?}"
            ))),
        }
    }

    // expr ::= or_expr
    fn parse_expr(&mut self) -> Result<FactExpr> {
        self.parse_or()
    }

    // or_expr ::= and_expr (or and_expr)*
    fn parse_or(&mut self) -> Result<FactExpr> {
        let mut left = self.parse_and()?;
        while matches!(self.current(), Some(Token::Or)) {
            self.advance();
            let right = self.parse_and()?;
            left = FactExpr::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    // and_expr ::= not_expr (and not_expr)*
    fn parse_and(&mut self) -> Result<FactExpr> {
        let mut left = self.parse_not()?;
        while matches!(self.current(), Some(Token::And)) {
            self.advance();
            let right = self.parse_not()?;
            left = FactExpr::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    // not_expr ::= not primary | primary
    fn parse_not(&mut self) -> Result<FactExpr> {
        if matches!(self.current(), Some(Token::Not)) {
            self.advance();
            Ok(FactExpr::Not(Box::new(self.parse_primary()?)))
        } else {
            self.parse_primary()
        }
    }

    // primary ::= has key | key op value | (expr) | true | false
    fn parse_primary(&mut self) -> Result<FactExpr> {
        match self.current() {
            Some(Token::True) => {
                self.advance();
                Ok(FactExpr::True)
            }
            Some(Token::False) => {
                self.advance();
                Ok(FactExpr::False)
            }
            Some(Token::Has) => {
                self.advance();
                match self.advance() {
                    Some(Token::Ident(key)) => Ok(FactExpr::Has(key.clone())),
                    _ => Err(FilterError::InvalidExpression(
                        "expected fact name after 'has'".into(),
                    )),
                }
            }
            Some(Token::LeftParen) => {
                self.advance();
                let expr = self.parse_expr()?;
                match self.advance() {
                    Some(Token::RightParen) => Ok(expr),
                    _ => Err(FilterError::InvalidExpression("expected ')'".into())),
                }
            }
            Some(Token::Ident(key)) => {
                let key = key.clone();
                self.advance();

                let op = match self.advance() {
                    Some(Token::Eq) => Op::Eq,
                    Some(Token::Ne) => Op::Ne,
                    Some(Token::Matches) => Op::Matches,
                    _ => {
                        return Err(FilterError::InvalidExpression(
                            "expected '==', '!=' or '=~' after fact name".into(),
                        ))
                    }
                };

                let value = match self.advance() {
                    Some(Token::Literal(v)) => v.clone(),
                    Some(Token::Ident(v)) => v.clone(),
                    _ => {
                        return Err(FilterError::InvalidExpression(
                            "expected value after operator".into(),
                        ))
                    }
                };

                match op {
                    Op::Eq => Ok(FactExpr::Compare {
                        key,
                        negated: false,
                        value,
                    }),
                    Op::Ne => Ok(FactExpr::Compare {
                        key,
                        negated: true,
                        value,
                    }),
                    Op::Matches => {
                        let regex =
                            Regex::new(&value).map_err(|source| FilterError::InvalidPattern {
                                pattern: value,
                                source,
                            })?;
                        Ok(FactExpr::Match { key, regex })
                    }
                }
            }
            _ => Err(FilterError::InvalidExpression("expected expression".into())),
        }
    }
}

enum Op {
    Eq,
    Ne,
    Matches,
}

// ===== Requirement rule adapter =====

/// A requirement rule driven by a parsed [`FactExpr`].
///
/// The expression is parsed and compiled once at configuration time. An
/// evaluation error (nesting past [`MAX_EXPR_DEPTH`]) is reported as
/// [`Tristate::Fail`], never as a hard error.
#[derive(Debug, Clone)]
pub struct ExpressionRule {
    source: String,
    expr: FactExpr,
}

impl ExpressionRule {
    /// Parse `source` into a requirement rule.
    ///
    /// # Errors
    ///
    /// Propagates [`FactExpr::parse`] errors.
    pub fn new(source: impl Into<String>) -> Result<Self> {
        let source = source.into();
        let expr = FactExpr::parse(&source)?;
        Ok(Self { source, expr })
    }

    /// The original expression text
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl PolicyRequirementRule for ExpressionRule {
    fn matches(&self, ctx: &AttributeFilterContext) -> Tristate {
        let facts = ctx.expression_facts();
        match self.expr.evaluate(&facts, 0) {
            Ok(decision) => Tristate::from_bool(decision),
            Err(error) => {
                warn!(expression = %self.source, %error, "expression did not yield a decision");
                Tristate::Fail
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facts(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn comparison_and_boolean_operators() {
        let expr = FactExpr::parse(
            "principal == \"jsmith\" and not (authn_method == \"urn:x:weak\")",
        )
        .unwrap();

        let ok = facts(&[("principal", "jsmith"), ("authn_method", "urn:x:strong")]);
        assert!(expr.evaluate(&ok, 0).unwrap());

        let weak = facts(&[("principal", "jsmith"), ("authn_method", "urn:x:weak")]);
        assert!(!expr.evaluate(&weak, 0).unwrap());
    }

    #[test]
    fn missing_fact_compares_false_but_has_detects_it() {
        let cmp = FactExpr::parse("requester == \"x\"").unwrap();
        assert!(!cmp.evaluate(&facts(&[]), 0).unwrap());

        let neg = FactExpr::parse("requester != \"x\"").unwrap();
        assert!(!neg.evaluate(&facts(&[]), 0).unwrap());

        let has = FactExpr::parse("has requester").unwrap();
        assert!(!has.evaluate(&facts(&[]), 0).unwrap());
        assert!(has.evaluate(&facts(&[("requester", "x")]), 0).unwrap());
    }

    #[test]
    fn regex_operator_compiles_at_parse_time() {
        let expr = FactExpr::parse("requester =~ \"^https://sp\\\\d\\\\.example\\\\.org$\"")
            .unwrap();
        assert!(expr
            .evaluate(&facts(&[("requester", "https://sp1.example.org")]), 0)
            .unwrap());

        assert!(matches!(
            FactExpr::parse("requester =~ \"(\""),
            Err(FilterError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn syntax_errors_are_configuration_errors() {
        assert!(FactExpr::parse("principal =").is_err());
        assert!(FactExpr::parse("principal == ").is_err());
        assert!(FactExpr::parse("(principal == \"x\"").is_err());
        assert!(FactExpr::parse("principal == \"x\" extra").is_err());
    }

    #[test]
    fn depth_limit_is_enforced_at_evaluation() {
        let mut expr = FactExpr::True;
        for _ in 0..=MAX_EXPR_DEPTH {
            expr = FactExpr::Not(Box::new(expr));
        }
        assert!(matches!(
            expr.evaluate(&facts(&[]), 0),
            Err(FilterError::ExpressionTooDeep { .. })
        ));
    }

    #[test]
    fn expression_rule_adapts_into_a_requirement_rule() {
        let ctx = AttributeFilterContext::new().with_principal("jsmith");
        let rule = ExpressionRule::new("principal == \"jsmith\"").unwrap();
        assert_eq!(rule.matches(&ctx), Tristate::True);
    }
}
