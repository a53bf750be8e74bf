//! Recursive-descent parser for the legacy query syntax.
//!
//! Grammar, lowest to highest precedence:
//!
//! ```text
//! Or         := And (OR And)*
//! And        := Unary ((AND)? Unary)*        juxtaposition is an implicit AND
//! Unary      := (NOT | MINUS) Primary | PLUS Primary | Primary
//! Primary    := LPAREN Or RPAREN | FIELD FieldValue | PHRASE | TERM
//! FieldValue := RANGE | PHRASE | TERM | LPAREN Or RPAREN | <empty>
//! ```
//!
//! A parenthesised group after a field is parsed with the ordinary `Or`
//! rule while that field is the scope for bare terms and phrases.
//!
//! The parser is fail-open: tokens that cannot start a clause are consumed
//! and replaced with `match_all`, dangling connectives are dropped, and
//! missing closing parentheses are tolerated. It always yields a node.
//!
//! Nesting is capped at [`MAX_DEPTH`] groups. A `(` past the cap is consumed
//! as `match_all` and parsing continues at the current level, so recursion
//! depth stays bounded whatever the input.
//!
//! `+` is accepted and discarded. Once a clause is folded into a `must`
//! list there is nothing left for "required" to add, so `+foo -bar` and
//! `foo -bar` produce the same tree.

use crate::build::{build_phrase, build_range, build_term, ParserOptions, ALL_FIELDS};
use crate::node::QueryNode;
use crate::token::{tokenize, Token};
use tracing::debug;

/// Deepest group nesting the parser will descend into
pub const MAX_DEPTH: usize = 64;

/// Parser state for a single query. Construct one per input.
pub struct QueryParser<'o> {
    tokens: Vec<Token>,
    pos: usize,
    options: &'o ParserOptions,
    /// Field applied to bare values inside `field:( ... )`
    scope: Option<String>,
    /// Groups currently open
    depth: usize,
}

impl<'o> QueryParser<'o> {
    pub fn new(input: &str, options: &'o ParserOptions) -> Self {
        Self {
            tokens: tokenize(input),
            pos: 0,
            options,
            scope: None,
            depth: 0,
        }
    }

    /// Parse the whole input. Stray closing parentheses at the top level
    /// are skipped, and whatever surrounds them is ANDed together.
    pub fn parse(mut self) -> QueryNode {
        let mut clauses = Vec::new();

        loop {
            match self.peek() {
                Token::Eof => break,
                Token::RParen => {
                    debug!("skipping unbalanced ')'");
                    self.bump();
                }
                _ => clauses.push(self.parse_or()),
            }
        }

        QueryNode::must(clauses)
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    /// Take the current token and advance. The trailing EOF is never consumed.
    fn bump(&mut self) -> Token {
        if self.pos + 1 >= self.tokens.len() {
            return Token::Eof;
        }
        let token = std::mem::replace(&mut self.tokens[self.pos], Token::Eof);
        self.pos += 1;
        token
    }

    /// Whether nothing can follow a connective at this point.
    fn at_group_end(&self) -> bool {
        matches!(self.peek(), Token::Eof | Token::RParen)
    }

    fn parse_or(&mut self) -> QueryNode {
        let mut clauses: Vec<QueryNode> = self.parse_and().into_iter().collect();

        while *self.peek() == Token::Or {
            self.bump();
            if self.at_group_end() {
                debug!("dropping dangling OR");
                break;
            }
            clauses.extend(self.parse_and());
        }

        QueryNode::should(clauses)
    }

    /// `None` when every operand was dropped.
    fn parse_and(&mut self) -> Option<QueryNode> {
        let mut clauses: Vec<QueryNode> = self.parse_unary().into_iter().collect();

        loop {
            match self.peek() {
                Token::And => {
                    self.bump();
                    if self.at_group_end() || *self.peek() == Token::Or {
                        debug!("dropping dangling AND");
                        break;
                    }
                    clauses.extend(self.parse_unary());
                }
                token if token.starts_clause() => clauses.extend(self.parse_unary()),
                _ => break,
            }
        }

        (!clauses.is_empty()).then(|| QueryNode::must(clauses))
    }

    fn parse_unary(&mut self) -> Option<QueryNode> {
        match self.peek() {
            Token::Not | Token::Minus | Token::Plus => {
                let negate = *self.peek() != Token::Plus;
                self.bump();
                if self.at_group_end() || matches!(self.peek(), Token::Or | Token::And) {
                    debug!("dropping dangling prefix operator");
                    return None;
                }
                let operand = self.parse_primary();
                Some(if negate {
                    QueryNode::must_not(operand)
                } else {
                    operand
                })
            }
            _ => Some(self.parse_primary()),
        }
    }

    fn parse_primary(&mut self) -> QueryNode {
        if self.at_group_end() {
            return QueryNode::MatchAll;
        }

        match self.bump() {
            Token::LParen => self.parse_group(),
            Token::Field(field) => self.parse_field_value(field),
            Token::Phrase(text) => build_phrase(self.scope.as_deref(), &text, self.options),
            Token::Term(text) => build_term(self.scope.as_deref(), &text, self.options),
            Token::Range {
                lo,
                hi,
                lo_inclusive,
                hi_inclusive,
            } => match &self.scope {
                Some(field) => build_range(field, &lo, &hi, lo_inclusive, hi_inclusive),
                None => {
                    debug!(%lo, %hi, "range without a field; substituting match_all");
                    QueryNode::MatchAll
                }
            },
            other => {
                debug!(token = ?other, "unexpected token; substituting match_all");
                QueryNode::MatchAll
            }
        }
    }

    fn parse_field_value(&mut self, field: String) -> QueryNode {
        match self.peek() {
            Token::Range { .. } | Token::Phrase(_) | Token::Term(_) | Token::LParen => {}
            _ if field == ALL_FIELDS => return QueryNode::MatchAll,
            _ => return QueryNode::Exists { field },
        }

        match self.bump() {
            Token::Range {
                lo,
                hi,
                lo_inclusive,
                hi_inclusive,
            } => build_range(&field, &lo, &hi, lo_inclusive, hi_inclusive),
            Token::Phrase(text) => build_phrase(Some(&field), &text, self.options),
            Token::Term(text) => build_term(Some(&field), &text, self.options),
            _ => {
                let outer = self.scope.replace(field);
                let group = self.parse_group();
                self.scope = outer;
                group
            }
        }
    }

    /// Body of a group whose `(` was just consumed.
    fn parse_group(&mut self) -> QueryNode {
        if self.depth >= MAX_DEPTH {
            debug!(depth = self.depth, "group nesting too deep; substituting match_all");
            return QueryNode::MatchAll;
        }

        self.depth += 1;
        let inner = self.parse_or();
        self.depth -= 1;
        self.expect_rparen();
        inner
    }

    fn expect_rparen(&mut self) {
        if *self.peek() == Token::RParen {
            self.bump();
        } else {
            debug!("missing ')' at end of group");
        }
    }
}

/// Parse a query with default options.
pub fn parse(input: &str) -> QueryNode {
    parse_with(input, &ParserOptions::default())
}

/// Parse a query with explicit options.
pub fn parse_with(input: &str, options: &ParserOptions) -> QueryNode {
    QueryParser::new(input, options).parse()
}
