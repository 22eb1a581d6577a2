//! The untyped S-expression tree produced by the reader.

use lithium_source::Span;

/// One parenthesized expression, or an atom, together with its source span.
#[derive(Debug, Clone, PartialEq)]
pub struct SExpr {
    /// The expression's shape and payload.
    pub value: SExprValue,
    /// Where this expression appears in the source.
    pub span: Span,
}

impl SExpr {
    /// Creates a new located S-expression.
    #[must_use]
    pub const fn new(value: SExprValue, span: Span) -> Self {
        Self { value, span }
    }

    /// Returns the list elements if this is a [`SExprValue::List`].
    #[must_use]
    pub fn as_list(&self) -> Option<&[SExpr]> {
        match &self.value {
            SExprValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the symbol name if this is a [`SExprValue::Symbol`].
    #[must_use]
    pub fn as_symbol(&self) -> Option<&str> {
        match &self.value {
            SExprValue::Symbol(name) => Some(name),
            _ => None,
        }
    }

    /// A short tag naming this expression's shape, for error messages.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self.value {
            SExprValue::Integer(_) => "integer",
            SExprValue::Symbol(_) => "symbol",
            SExprValue::String(_) => "string",
            SExprValue::List(_) => "list",
        }
    }
}

/// The four shapes an S-expression can take.
#[derive(Debug, Clone, PartialEq)]
pub enum SExprValue {
    /// A signed 64-bit integer literal, already parsed from its lexeme.
    Integer(i64),
    /// A bare symbol, e.g. `defun` or `+`.
    Symbol(String),
    /// A double-quoted string literal, with escapes already resolved.
    String(String),
    /// A parenthesized sequence of expressions.
    List(Vec<SExpr>),
}
