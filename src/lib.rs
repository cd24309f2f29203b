#![allow(clippy::module_inception)]

use std::fmt::Write;

use crate::errors::errors::{Error, ErrorTip};

pub mod ast;
pub mod errors;
pub mod evaluator;
pub mod lexer;
pub mod macros;
pub mod parser;

extern crate regex;

pub use crate::{
    ast::value::Value,
    evaluator::evaluator::{Evaluator, Source},
    lexer::{
        lexer::{tokenize, Tokenizer},
        tokens::{Token, TokenKind, TokenValue},
    },
};

/// Byte offset into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position(pub u32);

/// Finds the line containing `position`.
///
/// Returns the 1-based line number, the line text and the offset of
/// `position` within that line, or `None` when `position` lies past the end.
/// An offset equal to the source length points just past the last line.
pub fn get_line_at_position(source: &str, position: u32) -> Option<(usize, String, usize)> {
    let pos = position as usize;

    if pos > source.len() {
        return None;
    }

    let mut start = 0;
    let mut line_number = 1;

    for line in source.split_inclusive('\n') {
        let end = start + line.len();

        if (start..end).contains(&pos) || (end == source.len() && pos == end) {
            return Some((line_number, line.to_string(), pos - start));
        }

        start = end;
        line_number += 1;
    }

    Some((line_number, String::new(), 0))
}

/// Renders an error against the source it came from.
///
/// ```text
/// Error: TrailingOperator (An expression cannot end with an operator)
/// trailing operator "+"
///   |
/// 1 | 1 +
///   | --^
/// ```
///
/// Evaluation errors carry no position, so only the header and message are
/// rendered for them.
pub fn format_error(source: &str, error: &Error) -> String {
    let mut out = String::new();

    if let ErrorTip::None = error.get_tip() {
        let _ = writeln!(out, "Error: {}", error.get_error_name());
    } else {
        let _ = writeln!(out, "Error: {} ({})", error.get_error_name(), error.get_tip());
    }
    let message = match error {
        Error::Parse(error) => error.message(),
        Error::Evaluate(error) => error.message(),
    };
    let _ = writeln!(out, "{}", message);

    let located = error
        .get_position()
        .and_then(|position| get_line_at_position(source, position.0));

    if let Some((line, line_text, line_pos)) = located {
        let line_string = line.to_string();
        let padding = line_string.len() + 2;

        let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
        let column = line_text
            .get(..line_pos)
            .map_or(line_pos, |before| before.chars().count());
        let arrows = column.saturating_sub(removed_whitespace) + 1;

        let _ = writeln!(out, "{:>padding$}", "|");
        let _ = writeln!(out, "{} | {}", line_string, line_text_removed.trim_end());
        let _ = writeln!(out, "{:>padding$} {:->arrows$}", "|", "^");
    }

    out
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let mut start = 0;
    for c in string.chars() {
        if c == ' ' {
            start += 1;
        } else {
            break;
        }
    }

    (String::from(&string[start..]), start)
}
