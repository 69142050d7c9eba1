//! Boolean conditions used by `[if ...]` directives.
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! Expr    := Or
//! Or      := And ("OR" And)*
//! And     := Not ("AND" Not)*
//! Not     := "NOT" Not | Primary
//! Primary := "(" Expr ")" | Identifier+ | (nothing)
//! ```
//!
//! Keywords are case-insensitive whole tokens, so a flag called `ANDROID` or
//! `MODERATE` is an identifier. Identifiers are matched against the flag set
//! exactly.
//!
//! Evaluation is best effort. An operand missing next to an operator is
//! false, words written next to each other form one flag name (`NOT B C`
//! looks up `B C`), and a condition that still cannot be parsed is looked up
//! as a single flag name.

use std::fmt;
use std::ops::Range;

use log::debug;
use thiserror::Error;

use crate::flags::FlagSet;

/// Nesting limit for parentheses and `NOT` chains.
const MAX_DEPTH: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    And,
    Or,
    Not,
    LParen,
    RParen,
    Ident(&'a str),
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::And => f.write_str("AND"),
            Token::Or => f.write_str("OR"),
            Token::Not => f.write_str("NOT"),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
            Token::Ident(name) => f.write_str(name),
        }
    }
}

/// Splits a condition into tokens. Parentheses are always tokens of their
/// own; everything else is a run of characters up to whitespace or a paren.
#[derive(Clone)]
pub struct Tokenizer<'a> {
    input: &'a str,
    cursor: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, cursor: 0 }
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.cursor..]
    }

    /// Next token together with its byte range in the input.
    pub fn next_spanned(&mut self) -> Option<(Range<usize>, Token<'a>)> {
        let rest = self.remaining();
        let trimmed = rest.trim_start();
        self.cursor += rest.len() - trimmed.len();
        let start = self.cursor;

        let token = match trimmed.chars().next()? {
            '(' => {
                self.cursor += 1;
                Token::LParen
            }
            ')' => {
                self.cursor += 1;
                Token::RParen
            }
            _ => {
                let end = trimmed
                    .find(|c: char| c.is_whitespace() || c == '(' || c == ')')
                    .unwrap_or(trimmed.len());
                let word = &trimmed[..end];
                self.cursor += end;

                if word.eq_ignore_ascii_case("and") {
                    Token::And
                } else if word.eq_ignore_ascii_case("or") {
                    Token::Or
                } else if word.eq_ignore_ascii_case("not") {
                    Token::Not
                } else {
                    Token::Ident(word)
                }
            }
        };
        Some((start..self.cursor, token))
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        self.next_spanned().map(|(_, token)| token)
    }
}

/// Parsed condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Or(Box<Expr>, Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
    Ident(String),
    /// Operand left out next to an operator or inside `()`. Always false.
    Missing,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty condition")]
    Empty,

    #[error("unexpected '{0}' after a complete condition")]
    TrailingInput(String),

    #[error("condition is nested too deeply")]
    TooDeep,
}

impl Expr {
    /// Parses a condition.
    ///
    /// A missing operand becomes [`Expr::Missing`], adjacent words become one
    /// identifier and a missing closing parenthesis at the end of input is
    /// tolerated. Stray tokens after a complete condition are an error.
    pub fn parse(input: &str) -> Result<Expr, ParseError> {
        let mut tokenizer = Tokenizer::new(input);
        let tokens: Vec<_> = std::iter::from_fn(|| tokenizer.next_spanned()).collect();
        if tokens.is_empty() {
            return Err(ParseError::Empty);
        }

        let mut parser = Parser { input, tokens, pos: 0, depth: 0 };
        let expr = parser.parse_or()?;
        match parser.bump() {
            Some(token) => Err(ParseError::TrailingInput(token.to_string())),
            None => Ok(expr),
        }
    }

    pub fn eval<F: FlagSet + ?Sized>(&self, flags: &F) -> bool {
        match self {
            Expr::Or(lhs, rhs) => lhs.eval(flags) || rhs.eval(flags),
            Expr::And(lhs, rhs) => lhs.eval(flags) && rhs.eval(flags),
            Expr::Not(inner) => !inner.eval(flags),
            Expr::Ident(name) => flags.lookup(name),
            Expr::Missing => false,
        }
    }

    /// Flag names referenced by the condition, in order of first appearance.
    pub fn identifiers(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_identifiers(&mut names);
        names
    }

    fn collect_identifiers<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Expr::Or(lhs, rhs) | Expr::And(lhs, rhs) => {
                lhs.collect_identifiers(names);
                rhs.collect_identifiers(names);
            }
            Expr::Not(inner) => inner.collect_identifiers(names),
            Expr::Ident(name) => {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
            Expr::Missing => {}
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Or(lhs, rhs) => write!(f, "({lhs} OR {rhs})"),
            Expr::And(lhs, rhs) => write!(f, "({lhs} AND {rhs})"),
            Expr::Not(inner) => write!(f, "NOT {inner}"),
            Expr::Ident(name) => f.write_str(name),
            Expr::Missing => f.write_str("<missing>"),
        }
    }
}

struct Parser<'a> {
    input: &'a str,
    tokens: Vec<(Range<usize>, Token<'a>)>,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<Token<'a>> {
        self.tokens.get(self.pos).map(|(_, token)| *token)
    }

    fn bump(&mut self) -> Option<Token<'a>> {
        let token = self.peek()?;
        self.pos += 1;
        Some(token)
    }

    fn eat(&mut self, expected: Token<'a>) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn descend(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ParseError::TooDeep);
        }
        Ok(())
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_and()?;
        while self.eat(Token::Or) {
            let rhs = self.parse_and()?;
            lhs = Expr::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_not()?;
        while self.eat(Token::And) {
            let rhs = self.parse_not()?;
            lhs = Expr::And(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_not(&mut self) -> Result<Expr, ParseError> {
        if self.eat(Token::Not) {
            self.descend()?;
            let inner = self.parse_not()?;
            self.depth -= 1;
            return Ok(Expr::Not(Box::new(inner)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        match self.peek() {
            Some(Token::Ident(_)) => Ok(self.parse_words()),
            Some(Token::LParen) => {
                self.pos += 1;
                self.descend()?;
                let inner = self.parse_or()?;
                self.depth -= 1;
                match self.peek() {
                    Some(Token::RParen) => self.pos += 1,
                    None => debug!("Closing unbalanced '(' at end of condition"),
                    // parse_or stops at anything that cannot continue it,
                    // which is reported as trailing input by the caller.
                    Some(_) => {}
                }
                Ok(inner)
            }
            // The operator or ')' is left for the caller to consume.
            _ => Ok(Expr::Missing),
        }
    }

    /// A run of identifier tokens, named by the source text it covers.
    fn parse_words(&mut self) -> Expr {
        let start = self.tokens[self.pos].0.start;
        let mut end = start;
        while let Some((span, Token::Ident(_))) = self.tokens.get(self.pos) {
            end = span.end;
            self.pos += 1;
        }
        Expr::Ident(self.input[start..end].to_string())
    }
}

/// Evaluates `expr` against `flags`.
///
/// Never fails. An empty condition is `false`, as is any flag the set does
/// not know. A condition that cannot be parsed is looked up as one flag name.
pub fn evaluate<F: FlagSet + ?Sized>(expr: &str, flags: &F) -> bool {
    match Expr::parse(expr) {
        Ok(parsed) => parsed.eval(flags),
        Err(ParseError::Empty) => false,
        Err(e) => {
            debug!("Condition '{}' is looked up as a flag name: {}", expr.trim(), e);
            flags.lookup(expr.trim())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token<'_>> {
        Tokenizer::new(input).collect()
    }

    #[test]
    fn test_tokenizer() {
        assert_eq!(
            tokens("NOT(A and B)OR c"),
            vec![
                Token::Not,
                Token::LParen,
                Token::Ident("A"),
                Token::And,
                Token::Ident("B"),
                Token::RParen,
                Token::Or,
                Token::Ident("c"),
            ]
        );
        assert_eq!(
            tokens("ANDROID OR_ELSE NOTES"),
            vec![Token::Ident("ANDROID"), Token::Ident("OR_ELSE"), Token::Ident("NOTES")]
        );
        assert!(tokens("  \t ").is_empty());
    }

    #[test]
    fn test_precedence_is_explicit_in_tree() {
        let expr = Expr::parse("A OR B AND NOT C").unwrap();
        assert_eq!(expr.to_string(), "(A OR (B AND NOT C))");

        let expr = Expr::parse("((A OR B)) AND C").unwrap();
        assert_eq!(expr.to_string(), "((A OR B) AND C)");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Expr::parse(""), Err(ParseError::Empty));
        assert_eq!(Expr::parse("A) OR B"), Err(ParseError::TrailingInput(")".into())));
        assert_eq!(Expr::parse("A (B)"), Err(ParseError::TrailingInput("(".into())));
        assert_eq!(Expr::parse("A NOT B"), Err(ParseError::TrailingInput("NOT".into())));
    }

    #[test]
    fn test_missing_operands() {
        assert_eq!(Expr::parse("A OR").unwrap().to_string(), "(A OR <missing>)");
        assert_eq!(Expr::parse("OR A").unwrap().to_string(), "(<missing> OR A)");
        assert_eq!(Expr::parse("NOT").unwrap().to_string(), "NOT <missing>");
        assert_eq!(Expr::parse("()"), Ok(Expr::Missing));
        assert_eq!(Expr::parse("A AND ) B"), Err(ParseError::TrailingInput(")".into())));
    }

    #[test]
    fn test_adjacent_words_form_one_identifier() {
        assert_eq!(Expr::parse("B  C"), Ok(Expr::Ident("B  C".into())));
        assert_eq!(Expr::parse("NOT B C").unwrap().to_string(), "NOT B C");
        assert_eq!(
            Expr::parse("A text\nthat continues"),
            Ok(Expr::Ident("A text\nthat continues".into()))
        );
        let expr = Expr::parse("X Y OR Z").unwrap();
        assert_eq!(expr.identifiers(), vec!["X Y", "Z"]);
    }

    #[test]
    fn test_spanned_tokens() {
        let mut tokenizer = Tokenizer::new(" (ab OR c)");
        assert_eq!(tokenizer.next_spanned(), Some((1..2, Token::LParen)));
        assert_eq!(tokenizer.next_spanned(), Some((2..4, Token::Ident("ab"))));
        assert_eq!(tokenizer.next_spanned(), Some((5..7, Token::Or)));
        assert_eq!(tokenizer.next_spanned(), Some((8..9, Token::Ident("c"))));
        assert_eq!(tokenizer.next_spanned(), Some((9..10, Token::RParen)));
        assert_eq!(tokenizer.next_spanned(), None);
    }

    #[test]
    fn test_unclosed_paren_is_closed_at_end() {
        let expr = Expr::parse("(A OR (B AND C").unwrap();
        assert_eq!(expr.to_string(), "(A OR (B AND C))");
    }

    #[test]
    fn test_depth_limit() {
        let deep = format!("{}A", "(".repeat(MAX_DEPTH + 1));
        assert_eq!(Expr::parse(&deep), Err(ParseError::TooDeep));

        let nots = format!("{}A", "NOT ".repeat(MAX_DEPTH + 1));
        assert_eq!(Expr::parse(&nots), Err(ParseError::TooDeep));

        let ok = format!("{}A{}", "(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
        assert_eq!(Expr::parse(&ok), Ok(Expr::Ident("A".into())));
    }

    #[test]
    fn test_identifiers() {
        let expr = Expr::parse("UseREST AND (UseGRPC OR NOT UseREST)").unwrap();
        assert_eq!(expr.identifiers(), vec!["UseREST", "UseGRPC"]);
    }
}
