use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    errors::errors::{ParseError, ParseErrorImpl},
    Position, MK_TOKEN,
};

use super::{
    operators::OperatorSet,
    tokens::{Token, TokenKind},
};

pub type RegexHandler = fn(&mut Lexer, &Regex) -> Result<(), ParseError>;

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

lazy_static! {
    // Dispatch order matters: the first pattern matching at the cursor wins.
    static ref PATTERNS: Vec<RegexPattern> = vec![
        RegexPattern { regex: Regex::new(r"^[\x00-\x20]+").unwrap(), handler: skip_handler },
        RegexPattern { regex: Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*").unwrap(), handler: name_handler },
        RegexPattern { regex: Regex::new(r"^\.[A-Za-z_]").unwrap(), handler: member_handler },
        RegexPattern { regex: Regex::new(r"^[0-9.]").unwrap(), handler: number_handler },
        RegexPattern { regex: Regex::new(r#"^['"]"#).unwrap(), handler: string_handler },
        RegexPattern { regex: Regex::new(r"(?s)^.").unwrap(), handler: operator_handler },
    ];
    static ref NUMBER_BODY: Regex = Regex::new(r"^[0-9.][0-9]*(?:\.[0-9]*)?").unwrap();
    static ref EXPONENT_MARKER: Regex = Regex::new(r"^[eE][+-]?").unwrap();
    static ref DIGITS: Regex = Regex::new(r"^[0-9]+").unwrap();
}

/// Scanning state for one call to `Tokenizer::tokenize`.
pub struct Lexer<'a> {
    operators: &'a OperatorSet,
    tokens: Vec<Token>,
    source: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, operators: &'a OperatorSet) -> Lexer<'a> {
        Lexer {
            operators,
            tokens: vec![],
            source,
            pos: 0,
        }
    }

    pub fn advance_n(&mut self, n: usize) {
        self.pos += n;
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn at(&self) -> Option<char> {
        self.remainder().chars().next()
    }

    pub fn remainder(&self) -> &'a str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    pub fn position(&self) -> Position {
        Position(self.pos as u32)
    }

    fn error(&self, error_impl: ParseErrorImpl, start: usize) -> ParseError {
        ParseError::new(error_impl, Position(start as u32))
    }
}

fn skip_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), ParseError> {
    if let Some(matched) = regex.find(lexer.remainder()) {
        lexer.advance_n(matched.end());
    }
    Ok(())
}

fn name_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), ParseError> {
    if let Some(matched) = regex.find(lexer.remainder()) {
        let name = matched.as_str();
        lexer.push(MK_TOKEN!(TokenKind::Name, name));
        lexer.advance_n(name.len());
    }
    Ok(())
}

fn member_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), ParseError> {
    if !lexer.operators.is_allowed(".") {
        return number_handler(lexer, regex);
    }

    lexer.push(MK_TOKEN!(TokenKind::Operator, "."));
    lexer.advance_n(1);
    Ok(())
}

fn number_handler(lexer: &mut Lexer, _regex: &Regex) -> Result<(), ParseError> {
    let start = lexer.pos;
    let remaining = lexer.remainder();
    let mut end = NUMBER_BODY.find(remaining).map(|m| m.end()).unwrap_or(1);

    if let Some(marker) = EXPONENT_MARKER.find(&remaining[end..]) {
        end += marker.end();
        match DIGITS.find(&remaining[end..]) {
            Some(digits) => end += digits.end(),
            None => {
                let mut token = remaining[..end].to_string();
                token.extend(remaining[end..].chars().next());
                return Err(lexer.error(ParseErrorImpl::InvalidExponent { token }, start));
            }
        }
    }

    let text = &remaining[..end];
    if let Some(c) = remaining[end..].chars().next() {
        if c.is_ascii_lowercase() {
            return Err(lexer.error(
                ParseErrorImpl::InvalidNumber {
                    token: format!("{}{}", text, c),
                },
                start,
            ));
        }
    }

    match text.parse::<f64>() {
        Ok(number) if number.is_finite() => {
            lexer.push(MK_TOKEN!(TokenKind::Number, number));
            lexer.advance_n(end);
            Ok(())
        }
        _ => Err(lexer.error(
            ParseErrorImpl::InvalidNumber {
                token: text.to_string(),
            },
            start,
        )),
    }
}

fn string_handler(lexer: &mut Lexer, _regex: &Regex) -> Result<(), ParseError> {
    let start = lexer.pos;
    let mut chars = lexer.remainder().char_indices();
    let quote = match chars.next() {
        Some((_, quote)) => quote,
        None => return Ok(()),
    };

    let mut string_literal = String::new();
    loop {
        match chars.next() {
            Some((offset, c)) if c == quote => {
                lexer.push(MK_TOKEN!(TokenKind::String, string_literal));
                lexer.advance_n(offset + c.len_utf8());
                return Ok(());
            }
            Some((_, c)) if c >= ' ' => string_literal.push(c),
            _ => {
                return Err(lexer.error(
                    ParseErrorImpl::UnterminatedString {
                        token: string_literal,
                    },
                    start,
                ))
            }
        }
    }
}

fn operator_handler(lexer: &mut Lexer, _regex: &Regex) -> Result<(), ParseError> {
    let start = lexer.pos;
    let c = match lexer.at() {
        Some(c) => c,
        None => return Ok(()),
    };
    lexer.advance_n(c.len_utf8());

    if lexer.operators.is_prefix(c) {
        let mut operator = c.to_string();
        while let Some(next) = lexer.at() {
            if !lexer.operators.is_suffix(next) {
                break;
            }
            operator.push(next);
            lexer.advance_n(next.len_utf8());
        }

        if !lexer.operators.is_allowed(&operator) {
            return Err(lexer.error(ParseErrorImpl::InvalidOperator { token: operator }, start));
        }
        lexer.push(MK_TOKEN!(TokenKind::Operator, operator.clone()));

        // An operator can never be the last character of the input.
        if lexer.at_eof() {
            return Err(lexer.error(ParseErrorImpl::TrailingOperator { token: operator }, start));
        }
        return Ok(());
    }

    let operator = c.to_string();
    if !lexer.operators.is_allowed(&operator) {
        return Err(lexer.error(ParseErrorImpl::InvalidOperator { token: operator }, start));
    }
    lexer.push(MK_TOKEN!(TokenKind::Operator, operator.clone()));

    if lexer.at_eof() && c != ')' && c != ']' {
        return Err(lexer.error(ParseErrorImpl::TrailingOperator { token: operator }, start));
    }
    Ok(())
}

/// Converts source text into tokens under a configurable operator set.
#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    operators: OperatorSet,
}

impl Tokenizer {
    /// A tokenizer with the default operator set.
    pub fn new() -> Self {
        Tokenizer::default()
    }

    /// A tokenizer with `overrides` merged into the default operator set.
    pub fn with_operators<I, K>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, bool)>,
        K: Into<String>,
    {
        let mut tokenizer = Tokenizer::new();
        tokenizer.update_operators(overrides);
        tokenizer
    }

    pub fn update_operators<I, K>(&mut self, overrides: I)
    where
        I: IntoIterator<Item = (K, bool)>,
        K: Into<String>,
    {
        self.operators.update(overrides);
    }

    pub fn operators(&self) -> &OperatorSet {
        &self.operators
    }

    /// Scans `source` left to right into tokens; fails on the first malformed token.
    pub fn tokenize(&self, source: &str) -> Result<Vec<Token>, ParseError> {
        let mut lex = Lexer::new(source, &self.operators);

        while !lex.at_eof() {
            let remaining = lex.remainder();
            let pattern = PATTERNS
                .iter()
                .find(|pattern| pattern.regex.is_match(remaining));

            match pattern {
                Some(pattern) => (pattern.handler)(&mut lex, &pattern.regex)?,
                None => break,
            }
        }

        log::debug!("tokenized {:?} into {} tokens", source, lex.tokens.len());
        Ok(lex.tokens)
    }
}

/// Tokenizes `source` with the default operator set.
pub fn tokenize(source: &str) -> Result<Vec<Token>, ParseError> {
    Tokenizer::new().tokenize(source)
}
