// -------------------------------------------------------------------------
// SPDX-FileCopyrightText: Copyright © 2026 The Lithium Project
// SPDX-FileName: crates/lithium-compiler/src/frontend/pattern.rs
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
//! A small declarative matching layer over S-expressions.
//!
//! Ported from `original_source/lithium/patterns.py`. The Python source
//! dispatches open classes (`PAny`, `PKeyword`, `PClass`, `PListOf`,
//! `PForm`) through inheritance; here they are one closed enum matched
//! exhaustively, per the open-dispatch guidance in `spec.md` §9.

use std::collections::HashMap;

use lithium_ast::{
    SExpr,
    SExprValue,
};
use thiserror::Error;

/// Raised when an expression does not match a pattern.
#[derive(Debug, Error, Clone)]
#[error("{message}")]
pub struct PatternMatchError {
    /// The expression the failed match is anchored to, for diagnostics.
    pub expr: SExpr,
    /// The human-readable reason for the mismatch.
    pub message: String,
}

impl PatternMatchError {
    fn new(expr: &SExpr, message: impl Into<String>) -> Self {
        Self {
            expr: expr.clone(),
            message: message.into(),
        }
    }
}

/// The value a successful match converts an expression (or sub-pattern)
/// into. Stands in for Python's dynamically-typed `convert` return value.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchValue {
    /// The raw, unconverted expression (what `Any`/`Form` heads produce).
    Expr(SExpr),
    /// A fixed keyword string (what `Keyword` produces).
    Keyword(String),
    /// An integer atom's value.
    Integer(i64),
    /// A symbol atom's text.
    Symbol(String),
    /// A string atom's text.
    StringLit(String),
    /// A homogeneous sequence of converted sub-values (`ListOf`).
    List(Vec<MatchValue>),
    /// A `Form`'s named sub-matches, plus `"tail"` when the form has a
    /// tail pattern.
    Form(HashMap<String, MatchValue>),
}

impl MatchValue {
    /// Unwraps an `Expr` value, panicking otherwise. Used by callers that
    /// know, from the pattern shape, which variant they will get back.
    #[must_use]
    pub fn into_expr(self) -> SExpr {
        match self {
            Self::Expr(e) => e,
            other => panic!("expected MatchValue::Expr, got {other:?}"),
        }
    }

    /// Unwraps a `Symbol` value, panicking otherwise.
    #[must_use]
    pub fn into_symbol(self) -> String {
        match self {
            Self::Symbol(s) => s,
            other => panic!("expected MatchValue::Symbol, got {other:?}"),
        }
    }

    /// Unwraps an `Integer` value, panicking otherwise.
    #[must_use]
    pub fn into_integer(self) -> i64 {
        match self {
            Self::Integer(v) => v,
            other => panic!("expected MatchValue::Integer, got {other:?}"),
        }
    }

    /// Unwraps a `StringLit` value, panicking otherwise.
    #[must_use]
    pub fn into_string_lit(self) -> String {
        match self {
            Self::StringLit(s) => s,
            other => panic!("expected MatchValue::StringLit, got {other:?}"),
        }
    }

    /// Unwraps a `List` value, panicking otherwise.
    #[must_use]
    pub fn into_list(self) -> Vec<Self> {
        match self {
            Self::List(v) => v,
            other => panic!("expected MatchValue::List, got {other:?}"),
        }
    }

    /// Unwraps a `Form` value, panicking otherwise.
    #[must_use]
    pub fn into_form(self) -> HashMap<String, Self> {
        match self {
            Self::Form(m) => m,
            other => panic!("expected MatchValue::Form, got {other:?}"),
        }
    }
}

/// The S-expression shape an [`Pattern::OfClass`] pattern requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SExprClass {
    /// Matches `SExprValue::Integer`.
    Integer,
    /// Matches `SExprValue::Symbol`.
    Symbol,
    /// Matches `SExprValue::String`.
    String,
    /// Matches `SExprValue::List`.
    List,
}

impl SExprClass {
    fn name(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Symbol => "symbol",
            Self::String => "string",
            Self::List => "list",
        }
    }

    fn matches(self, expr: &SExpr) -> bool {
        matches!(
            (self, &expr.value),
            (Self::Integer, SExprValue::Integer(_))
                | (Self::Symbol, SExprValue::Symbol(_))
                | (Self::String, SExprValue::String(_))
                | (Self::List, SExprValue::List(_))
        )
    }
}

/// A declarative pattern matched against an [`SExpr`].
///
/// Every pattern may carry a `name`: when present inside a [`Pattern::Form`],
/// the converted value is stored under that name in the form's info map.
#[derive(Debug, Clone)]
pub struct Pattern {
    kind: PatternKind,
    name: Option<String>,
}

#[derive(Debug, Clone)]
enum PatternKind {
    /// Matches anything.
    Any,
    /// Matches a `Symbol` whose text equals a fixed keyword.
    Keyword(String),
    /// Matches an S-expression of a given shape.
    OfClass(SExprClass),
    /// Matches a `List` all of whose elements match the sub-pattern.
    ListOf(Box<Pattern>),
    /// Matches a `List` whose first `heads.len()` elements match `heads`
    /// positionally; if `tail` is present, the remaining elements must
    /// each match it, otherwise the list length must equal `heads.len()`.
    Form {
        heads: Vec<Pattern>,
        tail: Option<Box<Pattern>>,
    },
}

impl Pattern {
    /// Matches anything; optionally named.
    #[must_use]
    pub fn any() -> Self {
        Self {
            kind: PatternKind::Any,
            name: None,
        }
    }

    /// Matches a `Symbol` equal to `keyword`.
    #[must_use]
    pub fn keyword(keyword: impl Into<String>) -> Self {
        Self {
            kind: PatternKind::Keyword(keyword.into()),
            name: None,
        }
    }

    /// Matches an S-expression of shape `class`.
    #[must_use]
    pub fn of_class(class: SExprClass) -> Self {
        Self {
            kind: PatternKind::OfClass(class),
            name: None,
        }
    }

    /// Shorthand for `of_class(SExprClass::Symbol)`.
    #[must_use]
    pub fn sym() -> Self {
        Self::of_class(SExprClass::Symbol)
    }

    /// Matches a `List` all of whose elements match `sub`.
    #[must_use]
    pub fn list_of(sub: Self) -> Self {
        Self {
            kind: PatternKind::ListOf(Box::new(sub)),
            name: None,
        }
    }

    /// Matches a `List` whose elements match `heads` positionally, with an
    /// optional `tail` pattern for any remaining elements.
    #[must_use]
    pub fn form(heads: Vec<Self>, tail: Option<Self>) -> Self {
        Self {
            kind: PatternKind::Form {
                heads,
                tail: tail.map(Box::new),
            },
            name: None,
        }
    }

    /// Attaches a name, under which `Form` stores this pattern's converted
    /// value.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Tests whether `expr` matches, without converting it.
    ///
    /// # Errors
    ///
    /// Returns [`PatternMatchError`] describing the first mismatch.
    pub fn matchq(&self, expr: &SExpr) -> Result<(), PatternMatchError> {
        match &self.kind {
            PatternKind::Any => Ok(()),
            PatternKind::Keyword(keyword) => match &expr.value {
                SExprValue::Symbol(s) if s == keyword => Ok(()),
                _ => Err(PatternMatchError::new(
                    expr,
                    format!("expected keyword {keyword}"),
                )),
            },
            PatternKind::OfClass(class) => {
                if class.matches(expr) {
                    Ok(())
                } else {
                    Err(PatternMatchError::new(
                        expr,
                        format!("expected {}", class.name()),
                    ))
                }
            }
            PatternKind::ListOf(sub) => {
                let SExprValue::List(items) = &expr.value else {
                    return Err(PatternMatchError::new(expr, "expected list"));
                };
                for item in items {
                    sub.matchq(item)?;
                }
                Ok(())
            }
            PatternKind::Form { heads, tail } => self.form_matchq(expr, heads, tail.as_deref()),
        }
    }

    fn form_matchq(
        &self,
        expr: &SExpr,
        heads: &[Self],
        tail: Option<&Self>,
    ) -> Result<(), PatternMatchError> {
        let SExprValue::List(items) = &expr.value else {
            return Err(PatternMatchError::new(expr, "expected list"));
        };

        if items.len() >= heads.len() {
            if tail.is_none() && items.len() != heads.len() {
                return Err(PatternMatchError::new(expr, "unexpected items at end of list"));
            }
            for (i, item) in items.iter().enumerate() {
                let subpat = if i < heads.len() {
                    &heads[i]
                } else {
                    tail.expect("tail presence already checked above")
                };
                subpat.matchq(item)?;
            }
            return Ok(());
        }

        // fewer elements than heads: match what's there, then complain
        // about the first missing head, re-anchored to the whole list.
        for (subpat, item) in heads.iter().zip(items.iter()) {
            subpat.matchq(item)?;
        }
        let missing = &heads[items.len()];
        // There is no expression to match the missing head against; the
        // original probes with `None` purely to generate its message.
        let base_message = missing.missing_message();
        Err(PatternMatchError::new(
            expr,
            format!("{base_message} at end of list"),
        ))
    }

    /// The message used when this pattern is the first one missing from a
    /// too-short list.
    fn missing_message(&self) -> String {
        match &self.kind {
            PatternKind::Any => "expected an element".to_string(),
            PatternKind::Keyword(keyword) => format!("expected keyword {keyword}"),
            PatternKind::OfClass(class) => format!("expected {}", class.name()),
            PatternKind::ListOf(_) => "expected list".to_string(),
            PatternKind::Form { .. } => "expected list".to_string(),
        }
    }

    /// Matches and converts `expr` in one step.
    ///
    /// # Errors
    ///
    /// Returns [`PatternMatchError`] describing the first mismatch.
    pub fn match_expr(&self, expr: &SExpr) -> Result<MatchValue, PatternMatchError> {
        self.matchq(expr)?;
        Ok(self.convert(expr))
    }

    fn convert(&self, expr: &SExpr) -> MatchValue {
        match &self.kind {
            PatternKind::Any => MatchValue::Expr(expr.clone()),
            PatternKind::Keyword(keyword) => MatchValue::Keyword(keyword.clone()),
            PatternKind::OfClass(_) => match &expr.value {
                SExprValue::Integer(v) => MatchValue::Integer(*v),
                SExprValue::Symbol(s) => MatchValue::Symbol(s.clone()),
                SExprValue::String(s) => MatchValue::StringLit(s.clone()),
                SExprValue::List(_) => MatchValue::Expr(expr.clone()),
            },
            PatternKind::ListOf(sub) => {
                let items = expr.as_list().expect("matchq already verified this is a list");
                MatchValue::List(items.iter().map(|item| sub.convert(item)).collect())
            }
            PatternKind::Form { heads, tail } => self.form_convert(expr, heads, tail.as_deref()),
        }
    }

    fn form_convert(&self, expr: &SExpr, heads: &[Self], tail: Option<&Self>) -> MatchValue {
        let items = expr.as_list().expect("matchq already verified this is a list");
        let mut info = HashMap::new();
        let mut tail_values = Vec::new();
        for (i, item) in items.iter().enumerate() {
            let subpat = if i < heads.len() {
                &heads[i]
            } else {
                tail.expect("matchq already verified a tail pattern exists for extra items")
            };
            let value = subpat.convert(item);
            if let Some(name) = &subpat.name {
                let _ = info.insert(name.clone(), value.clone());
            }
            if i >= heads.len() {
                tail_values.push(value);
            }
        }
        if tail.is_some() {
            let _ = info.insert("tail".to_string(), MatchValue::List(tail_values));
        }
        MatchValue::Form(info)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        MatchValue,
        Pattern,
        SExprClass,
    };
    use lithium_ast::{
        SExpr,
        SExprValue,
    };
    use lithium_source::{
        Position,
        Span,
    };

    fn atom(value: SExprValue) -> SExpr {
        SExpr::new(value, Span::point(Position::start_of_file()))
    }

    fn list(items: Vec<SExpr>) -> SExpr {
        SExpr::new(SExprValue::List(items), Span::point(Position::start_of_file()))
    }

    #[test]
    fn keyword_matches_only_equal_symbol() {
        let pattern = Pattern::keyword("defun");
        assert!(pattern
            .matchq(&atom(SExprValue::Symbol("defun".to_string())))
            .is_ok());
        assert!(pattern
            .matchq(&atom(SExprValue::Symbol("other".to_string())))
            .is_err());
    }

    #[test]
    fn form_with_exact_length_and_no_tail() {
        let pattern = Pattern::form(
            vec![Pattern::keyword("defun"), Pattern::sym().named("name")],
            None,
        );
        let expr = list(vec![
            atom(SExprValue::Symbol("defun".to_string())),
            atom(SExprValue::Symbol("f".to_string())),
        ]);
        let value = pattern.match_expr(&expr).unwrap();
        let info = value.into_form();
        assert_eq!(info.get("name"), Some(&MatchValue::Symbol("f".to_string())));
    }

    #[test]
    fn form_with_too_many_items_reports_unexpected_items() {
        let pattern = Pattern::form(vec![Pattern::keyword("defun")], None);
        let expr = list(vec![
            atom(SExprValue::Symbol("defun".to_string())),
            atom(SExprValue::Integer(1)),
        ]);
        let err = pattern.matchq(&expr).unwrap_err();
        assert!(err.message.contains("unexpected items"));
    }

    #[test]
    fn form_with_too_few_items_reports_missing_position() {
        let pattern = Pattern::form(
            vec![Pattern::keyword("defun"), Pattern::of_class(SExprClass::Symbol)],
            None,
        );
        let expr = list(vec![atom(SExprValue::Symbol("defun".to_string()))]);
        let err = pattern.matchq(&expr).unwrap_err();
        assert!(err.message.contains("at end of list"));
    }

    #[test]
    fn form_with_tail_collects_remaining_elements() {
        let pattern = Pattern::form(vec![Pattern::any().named("function")], Some(Pattern::any()));
        let expr = list(vec![
            atom(SExprValue::Symbol("f".to_string())),
            atom(SExprValue::Integer(1)),
            atom(SExprValue::Integer(2)),
        ]);
        let info = pattern.match_expr(&expr).unwrap().into_form();
        let tail = info.get("tail").cloned().unwrap().into_list();
        assert_eq!(tail.len(), 2);
    }
}
