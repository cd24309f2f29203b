use std::rc::Rc;

use crate::{ast::ast::Node, errors::errors::EvaluateError};

use super::{
    lookups::{ArgumentMode, BindingPower, NUDHandler, SymbolKind, UNARY_BP},
    parser::Parser,
};

/// Parses one expression, continuing while the active symbol binds tighter
/// than `rbp`.
pub fn parse_expr(parser: &mut Parser, rbp: BindingPower) -> Result<Node, EvaluateError> {
    parser.descend()?;
    let mut levels = 1;

    // First parse NUD
    let node = parser.advance()?;
    let mut left = null_denotation(parser, node)?;

    // While the active symbol binds tighter than the caller, keep extending the left side.
    // Each extension deepens the tree by one.
    while rbp < parser.active().lbp() {
        parser.descend()?;
        levels += 1;
        let node = parser.advance()?;
        left = left_denotation(parser, node, left)?;
    }

    parser.ascend(levels);
    Ok(left)
}

/// Runs the prefix behavior of `node`, which has just been consumed.
pub fn null_denotation(parser: &mut Parser, node: Node) -> Result<Node, EvaluateError> {
    let symbol = Rc::clone(node.symbol());

    match &symbol.kind {
        SymbolKind::Prefix { nud: Some(nud), .. } | SymbolKind::Infix { nud: Some(nud), .. } => {
            nud(parser, node)
        }
        SymbolKind::Prefix { nud: None, .. } => parse_prefix_expr(parser, node),
        SymbolKind::Function { arguments, .. } => parse_call_expr(parser, node, *arguments),
        _ => Ok(node),
    }
}

/// Runs the infix behavior of `node` with the already parsed `left` operand.
pub fn left_denotation(parser: &mut Parser, node: Node, left: Node) -> Result<Node, EvaluateError> {
    let symbol = Rc::clone(node.symbol());

    match &symbol.kind {
        SymbolKind::Infix { led: Some(led), .. } => led(parser, node, left),
        SymbolKind::Infix { led: None, .. } => parse_binary_expr(parser, node, left),
        SymbolKind::InfixRight { .. } => parse_right_assoc_expr(parser, node, left),
        _ => Ok(node),
    }
}

pub fn parse_prefix_expr(parser: &mut Parser, mut node: Node) -> Result<Node, EvaluateError> {
    node.set_first(parse_expr(parser, UNARY_BP)?);
    Ok(node)
}

pub fn parse_binary_expr(parser: &mut Parser, mut node: Node, left: Node) -> Result<Node, EvaluateError> {
    let bp = node.lbp();
    node.set_first(left);
    node.set_second(parse_expr(parser, bp)?);
    Ok(node)
}

/// Like `parse_binary_expr`, but the right side parses one step looser so a
/// chain of the same operator groups from the right.
pub fn parse_right_assoc_expr(parser: &mut Parser, mut node: Node, left: Node) -> Result<Node, EvaluateError> {
    let bp = node.lbp().saturating_sub(1);
    node.set_first(left);
    node.set_second(parse_expr(parser, bp)?);
    Ok(node)
}

/// Parses a parenthesized argument list into `node.args`.
pub fn parse_call_expr(parser: &mut Parser, mut node: Node, mode: ArgumentMode) -> Result<Node, EvaluateError> {
    parser.expect("(")?;

    if mode == ArgumentMode::None {
        parser.expect(")")?;
        return Ok(node);
    }

    node.args = parse_list(parser, ")")?;
    Ok(node)
}

/// Parses comma separated expressions up to and including `closing`.
fn parse_list(parser: &mut Parser, closing: &str) -> Result<Vec<Node>, EvaluateError> {
    let mut items = vec![];

    if parser.active_id() != closing {
        loop {
            items.push(parse_expr(parser, 0)?);

            if parser.active_id() != "," {
                break;
            }
            parser.advance()?;
        }
    }

    parser.expect(closing)?;
    Ok(items)
}

/// Builds a null denotation that parses one inner expression and expects `closing`.
pub fn parse_grouping_expr(closing: &'static str) -> NUDHandler {
    Rc::new(move |parser: &mut Parser<'_>, mut node: Node| -> Result<Node, EvaluateError> {
        node.set_first(parse_expr(parser, 0)?);
        parser.expect(closing)?;
        Ok(node)
    })
}

pub fn parse_array_expr(parser: &mut Parser, mut node: Node) -> Result<Node, EvaluateError> {
    node.args = parse_list(parser, "]")?;
    Ok(node)
}

/// Unary minus: marks the node as prefix and parses a single operand.
pub fn parse_negation_expr(parser: &mut Parser, mut node: Node) -> Result<Node, EvaluateError> {
    node.prefix = true;
    node.set_first(parse_expr(parser, UNARY_BP)?);
    Ok(node)
}

pub fn parse_ternary_expr(parser: &mut Parser, mut node: Node, left: Node) -> Result<Node, EvaluateError> {
    node.set_first(left);
    node.set_second(parse_expr(parser, 0)?);
    parser.expect(":")?;
    node.set_third(parse_expr(parser, 0)?);
    Ok(node)
}
