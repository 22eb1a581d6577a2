// -------------------------------------------------------------------------
// SPDX-FileCopyrightText: Copyright © 2026 The Lithium Project
// SPDX-FileName: crates/lithium-compiler/src/frontend/parser.rs
// SPDX-FileType: SOURCE
// SPDX-License-Identifier: Apache-2.0
// -------------------------------------------------------------------------
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
// -------------------------------------------------------------------------
//! The pattern-directed parser: lifts S-expressions into the typed AST.
//!
//! Ported from `original_source/lithium/parser.py`'s `parse_from`
//! algorithm: try each registered variant's loose pattern in order; on the
//! first loose match, commit — a strict-pattern failure after a loose match
//! is a fatal [`ParseError`], never a reason to try the next variant.

use lithium_ast::{
    Defun,
    Expr,
    ExprKind,
    NodeIdGen,
    Param,
    Program,
    SExpr,
    Stmt,
};
use lithium_source::Position;
use thiserror::Error;

use crate::frontend::pattern::{
    MatchValue,
    Pattern,
    SExprClass,
};

/// A well-formed S-expression that matches no registered form, or matched
/// loosely but failed strict validation.
#[derive(Debug, Error)]
#[error("{message} at line {} col {}", position.line, position.column)]
pub struct ParseError {
    message: String,
    position: Position,
}

impl ParseError {
    fn new(message: impl Into<String>, position: Position) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

struct Rule<T> {
    loose: Pattern,
    strict: Pattern,
    build: fn(MatchValue, &SExpr, &mut NodeIdGen) -> Result<T, ParseError>,
}

fn parse_from<T>(expr: &SExpr, registry: &[Rule<T>], ids: &mut NodeIdGen) -> Result<T, ParseError> {
    for rule in registry {
        if rule.loose.matchq(expr).is_err() {
            continue;
        }
        return match rule.strict.match_expr(expr) {
            Ok(info) => (rule.build)(info, expr, ids),
            Err(e) => Err(ParseError::new(e.message, e.expr.span.start)),
        };
    }
    Err(ParseError::new("unknown form", expr.span.start))
}

/// Parses every top-level S-expression as a statement, producing a
/// [`Program`].
///
/// # Errors
///
/// Returns [`ParseError`] on the first S-expression that matches no
/// registered statement variant.
pub fn parse_program(sexprs: &[SExpr], ids: &mut NodeIdGen) -> Result<Program, ParseError> {
    let registry = statement_rules();
    let mut statements = Vec::with_capacity(sexprs.len());
    for sexpr in sexprs {
        statements.push(parse_from(sexpr, &registry, ids)?);
    }
    Ok(Program { statements })
}

/// Parses a single S-expression as an expression.
///
/// # Errors
///
/// Returns [`ParseError`] on the first S-expression that matches no
/// registered expression variant.
pub fn parse_expression(expr: &SExpr, ids: &mut NodeIdGen) -> Result<Expr, ParseError> {
    parse_from(expr, &expression_rules(), ids)
}

fn statement_rules() -> Vec<Rule<Stmt>> {
    vec![Rule {
        loose: Pattern::form(vec![Pattern::keyword("defun")], Some(Pattern::any())),
        strict: Pattern::form(
            vec![
                Pattern::keyword("defun"),
                Pattern::sym().named("name"),
                Pattern::list_of(Pattern::sym()).named("arguments"),
            ],
            Some(Pattern::any()),
        ),
        build: build_defun,
    }]
}

fn expression_rules() -> Vec<Rule<Expr>> {
    vec![
        Rule {
            loose: Pattern::form(vec![Pattern::any().named("function")], Some(Pattern::any())),
            strict: Pattern::form(vec![Pattern::any().named("function")], Some(Pattern::any())),
            build: build_call,
        },
        Rule {
            loose: Pattern::of_class(SExprClass::Integer),
            strict: Pattern::of_class(SExprClass::Integer),
            build: build_int_constant,
        },
        Rule {
            loose: Pattern::of_class(SExprClass::String),
            strict: Pattern::of_class(SExprClass::String),
            build: build_str_constant,
        },
        Rule {
            loose: Pattern::sym(),
            strict: Pattern::sym(),
            build: build_variable,
        },
    ]
}

fn build_defun(value: MatchValue, expr: &SExpr, ids: &mut NodeIdGen) -> Result<Stmt, ParseError> {
    let mut info = value.into_form();
    let name = info
        .remove("name")
        .expect("strict pattern guarantees a name")
        .into_symbol();
    let arguments: Vec<String> = info
        .remove("arguments")
        .expect("strict pattern guarantees arguments")
        .into_list()
        .into_iter()
        .map(MatchValue::into_symbol)
        .collect();
    let params: Vec<Param> = arguments
        .into_iter()
        .map(|name| Param { id: ids.next(), name })
        .collect();

    let raw_body = info
        .remove("tail")
        .expect("form with a tail pattern always yields a tail entry")
        .into_list();
    let mut body = Vec::with_capacity(raw_body.len());
    for raw in raw_body {
        body.push(parse_expression(&raw.into_expr(), ids)?);
    }
    if body.is_empty() {
        return Err(ParseError::new(
            "defun body must contain at least one expression",
            expr.span.start,
        ));
    }

    Ok(Stmt::Defun(Defun {
        id: ids.next(),
        span: expr.span,
        name,
        params,
        body,
    }))
}

fn build_call(value: MatchValue, expr: &SExpr, ids: &mut NodeIdGen) -> Result<Expr, ParseError> {
    let mut info = value.into_form();
    let function_raw = info
        .remove("function")
        .expect("strict pattern guarantees a function")
        .into_expr();
    let callee = parse_expression(&function_raw, ids)?;

    let raw_args = info
        .remove("tail")
        .expect("form with a tail pattern always yields a tail entry")
        .into_list();
    let mut args = Vec::with_capacity(raw_args.len());
    for raw in raw_args {
        args.push(parse_expression(&raw.into_expr(), ids)?);
    }

    Ok(Expr::new(
        ids.next(),
        expr.span,
        ExprKind::Call {
            callee: Box::new(callee),
            args,
        },
    ))
}

fn build_int_constant(
    value: MatchValue,
    expr: &SExpr,
    ids: &mut NodeIdGen,
) -> Result<Expr, ParseError> {
    Ok(Expr::new(
        ids.next(),
        expr.span,
        ExprKind::IntConstant(value.into_integer()),
    ))
}

fn build_str_constant(
    value: MatchValue,
    expr: &SExpr,
    ids: &mut NodeIdGen,
) -> Result<Expr, ParseError> {
    Ok(Expr::new(
        ids.next(),
        expr.span,
        ExprKind::StrConstant(value.into_string_lit()),
    ))
}

fn build_variable(value: MatchValue, expr: &SExpr, ids: &mut NodeIdGen) -> Result<Expr, ParseError> {
    Ok(Expr::new(
        ids.next(),
        expr.span,
        ExprKind::Variable(value.into_symbol()),
    ))
}

#[cfg(test)]
mod tests {
    use super::{
        parse_program,
        NodeIdGen,
    };
    use crate::frontend::reader::read_all;
    use lithium_ast::{
        ExprKind,
        Stmt,
    };
    use lithium_source::SourceFile;

    fn parse(src: &str) -> lithium_ast::Program {
        let file = SourceFile::new(src);
        let sexprs = read_all(&file).unwrap();
        let mut ids = NodeIdGen::new();
        parse_program(&sexprs, &mut ids).unwrap()
    }

    #[test]
    fn parses_add1() {
        let program = parse("(defun add1 (x) (+ x 1))");
        assert_eq!(program.statements.len(), 1);
        let Stmt::Defun(defun) = &program.statements[0];
        assert_eq!(defun.name, "add1");
        assert_eq!(defun.params.len(), 1);
        assert_eq!(defun.params[0].name, "x");
        assert_eq!(defun.body.len(), 1);
        match &defun.body[0].kind {
            ExprKind::Call { callee, args } => {
                assert!(matches!(&callee.kind, ExprKind::Variable(name) if name == "+"));
                assert_eq!(args.len(), 2);
            }
            other => panic!("expected call, got {other:?}"),
        }
    }

    #[test]
    fn parses_string_literal_argument() {
        let program = parse("(defun main () (puts \"hi\"))");
        let Stmt::Defun(defun) = &program.statements[0];
        match &defun.body[0].kind {
            ExprKind::Call { args, .. } => {
                assert!(matches!(&args[0].kind, ExprKind::StrConstant(s) if s == "hi"));
            }
            other => panic!("expected call, got {other:?}"),
        }
    }

    #[test]
    fn empty_defun_body_is_a_parse_error() {
        let file = SourceFile::new("(defun f ())");
        let sexprs = read_all(&file).unwrap();
        let mut ids = NodeIdGen::new();
        assert!(parse_program(&sexprs, &mut ids).is_err());
    }

    #[test]
    fn unknown_top_level_form_is_a_parse_error() {
        let file = SourceFile::new("(frobnicate)");
        let sexprs = read_all(&file).unwrap();
        let mut ids = NodeIdGen::new();
        let err = parse_program(&sexprs, &mut ids).unwrap_err();
        assert!(err.to_string().contains("unknown form"));
    }
}
