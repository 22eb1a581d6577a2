//! The typed AST produced by the parser.
//!
//! Lithium's surface language has exactly five node shapes: integer and
//! string constants, variable references, calls, and top-level function
//! definitions. There is no mutation, no control flow, and no nested
//! `defun`, so a plain recursive enum with owned `Box` children is enough —
//! unlike a general-purpose language AST, this tree is built once by the
//! parser and never edited in place afterwards, so it has no use for an
//! arena with generation-checked removal and reuse of slots.
//!
//! Every node carries a [`NodeId`] that is stable for the node's lifetime.
//! The type engine uses these ids, not node identity or in-place mutation,
//! to key its side-tables (resolved types, assumption snapshots) — see
//! `lithium_compiler::typesystem`.

use lithium_source::Span;

/// A stable identifier for an AST node, used to key side-tables instead of
/// mutating nodes in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

/// Hands out increasing [`NodeId`]s while the parser builds a tree.
#[derive(Debug, Default)]
pub struct NodeIdGen {
    next: u32,
}

impl NodeIdGen {
    /// Creates a generator starting at id zero.
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    /// Allocates the next id.
    pub fn next(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }
}

/// A single formal parameter of a `defun`.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// The parameter's node id, used as the key for its resolved type.
    pub id: NodeId,
    /// The parameter name.
    pub name: String,
}

/// A top-level function definition: `(defun name (params...) body...)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Defun {
    /// The definition's node id.
    pub id: NodeId,
    /// The whole `(defun ...)` form's span.
    pub span: Span,
    /// The function name.
    pub name: String,
    /// The formal parameters, in order.
    pub params: Vec<Param>,
    /// The body expressions, in order. Every expression is type-checked and
    /// compiled for its side effect, but only the last one's value becomes
    /// the function's return value (see `DESIGN.md`).
    pub body: Vec<Expr>,
}

/// A top-level statement. `defun` is the only statement kind this language
/// has.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// A function definition.
    Defun(Defun),
}

impl Stmt {
    /// The statement's node id.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        match self {
            Self::Defun(defun) => defun.id,
        }
    }

    /// The statement's source span.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Defun(defun) => defun.span,
        }
    }
}

/// An expression node.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    /// The expression's node id, used to key the type engine's side-tables.
    pub id: NodeId,
    /// The expression's source span.
    pub span: Span,
    /// The expression's shape and payload.
    pub kind: ExprKind,
}

/// The shape of an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// A signed integer literal.
    IntConstant(i64),
    /// A string literal.
    StrConstant(String),
    /// A reference to a variable or built-in name.
    Variable(String),
    /// A function call: `(callee args...)`.
    Call {
        /// The expression being called. Usually a [`ExprKind::Variable`],
        /// but the grammar does not require it.
        callee: Box<Expr>,
        /// The argument expressions, in order.
        args: Vec<Expr>,
    },
}

impl Expr {
    /// Creates a new expression node.
    #[must_use]
    pub const fn new(id: NodeId, span: Span, kind: ExprKind) -> Self {
        Self { id, span, kind }
    }
}

/// A whole parsed program: an ordered sequence of top-level `defun`s.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    /// The program's top-level statements, in source order.
    pub statements: Vec<Stmt>,
}

#[cfg(test)]
mod tests {
    use super::NodeIdGen;

    #[test]
    fn node_ids_increase_monotonically() {
        let mut gen = NodeIdGen::new();
        let a = gen.next();
        let b = gen.next();
        assert_ne!(a, b);
    }
}
