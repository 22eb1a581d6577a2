// -------------------------------------------------------------------------
// SPDX-FileCopyrightText: Copyright © 2026 The Lithium Project
// SPDX-FileName: crates/lithium-compiler/src/typesystem/engine.rs
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
//! Constraint generation, unification, and generalization.
//!
//! Ported from `original_source/lithium/types.py`'s `generate_typerules`
//! dispatch and `unify` function. The Python source keys each
//! `IndefiniteType`'s `assumptions` dict on the instance itself (mutated in
//! place); `TypeEngine` instead keeps a `node_types`/`assumptions` pair of
//! side-tables keyed by the stable [`VarId`] and [`NodeId`], per the
//! ownership-disciplined guidance in `spec.md` §9.

use std::collections::VecDeque;

use lithium_ast::{
    Defun,
    Expr,
    ExprKind,
    NodeId,
};
use lithium_source::Position;
use rustc_hash::FxHashMap;

use crate::typesystem::error::TypingError;
use crate::typesystem::types::{
    free_typevars,
    substitute,
    Type,
    VarId,
};

/// A lexical scope: variable name to type, threaded through constraint
/// generation. Mirrors the `scope` dict the source passes positionally
/// through `generate_typerules`.
pub type Scope = FxHashMap<String, Type>;

/// The result of unification: a binding from every resolved variable to its
/// type.
pub type Substitution = FxHashMap<VarId, Type>;

type Constraint = (Type, Type);

/// Strips one layer of quantification wherever it appears in `ty`,
/// replacing each bound variable with a freshly allocated one. Mirrors
/// `Type.instantiate()` in the source: `Constructed` recurses into its
/// arguments (so a quantifier nested inside a `fn`'s argument list is
/// stripped too), but a `Quantified` body is substituted into directly,
/// without instantiating any further quantifier the substitution exposes.
/// Called fresh at every substitution use site (see
/// [`TypeEngine::add_subst`]), which is what gives a polymorphic builtin a
/// new set of variables at each call.
fn instantiate(ty: &Type, engine: &mut TypeEngine) -> Type {
    match ty {
        Type::Indefinite(_) | Type::Atomic(_) => ty.clone(),
        Type::Constructed(ctor, args) => {
            Type::Constructed(ctor.clone(), args.iter().map(|a| instantiate(a, engine)).collect())
        }
        Type::Quantified(var, body) => {
            let fresh = engine.fresh_unbound_var();
            substitute(body, *var, &Type::Indefinite(fresh))
        }
    }
}

/// Owns the fresh-variable counter and the assumption side-table that back
/// one compilation's worth of type inference.
#[derive(Debug, Default)]
pub struct TypeEngine {
    next_var: u32,
    /// Per-variable snapshot of the scope active when it was introduced.
    /// Used by [`Self::generalize`] to decide which variables are free in
    /// the environment and therefore must NOT be generalized.
    assumptions: FxHashMap<VarId, Scope>,
    /// The resolved type variable for every AST node that was given one.
    node_types: FxHashMap<NodeId, VarId>,
}

impl TypeEngine {
    /// Creates an empty engine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a fresh variable, recording `scope` as its assumption
    /// snapshot. Used for variables that stand for an AST node's own type
    /// (the node later goes through [`Self::generate_expr`], which
    /// overwrites the snapshot with the scope live at that call) and for
    /// `defun` parameter types, whose assumption snapshot is deliberately
    /// the *outer* scope (see [`Self::generate_defun`]).
    fn fresh_var(&mut self, scope: &Scope) -> VarId {
        let id = VarId(self.next_var);
        self.next_var += 1;
        self.assumptions.insert(id, scope.clone());
        id
    }

    /// Allocates a fresh variable with no assumption snapshot at all. Used
    /// only when instantiating a quantified type during unification — such
    /// a variable never corresponds to an AST node and is never itself
    /// generalized.
    fn fresh_unbound_var(&mut self) -> VarId {
        let id = VarId(self.next_var);
        self.next_var += 1;
        id
    }

    /// The resolved type variable recorded for `node`, if any.
    #[must_use]
    pub fn node_type_var(&self, node: NodeId) -> Option<VarId> {
        self.node_types.get(&node).copied()
    }

    /// Generates the constraint set for a single expression, recording
    /// `exprtype` as `expr`'s own type variable. Mirrors the `gt_*`
    /// functions dispatched from `generate_typerules` in the source.
    fn generate_expr(
        &mut self,
        expr: &Expr,
        exprtype: VarId,
        scope: &Scope,
    ) -> Result<Vec<Constraint>, TypingError> {
        self.assumptions.insert(exprtype, scope.clone());
        self.node_types.insert(expr.id, exprtype);

        match &expr.kind {
            ExprKind::IntConstant(_) => Ok(vec![(Type::Indefinite(exprtype), Type::int())]),
            ExprKind::StrConstant(_) => Ok(vec![(Type::Indefinite(exprtype), Type::str())]),
            ExprKind::Variable(name) => {
                let ty = scope.get(name).cloned().ok_or_else(|| {
                    TypingError::new(format!("variable not in scope: {name}"), expr.span.start)
                })?;
                Ok(vec![(Type::Indefinite(exprtype), ty)])
            }
            ExprKind::Call { callee, args } => {
                let mut rules = Vec::new();

                let nametype = self.fresh_var(scope);
                rules.extend(self.generate_expr(callee, nametype, scope)?);

                let mut argtypes = Vec::with_capacity(args.len());
                for arg in args {
                    let argtype = self.fresh_var(scope);
                    rules.extend(self.generate_expr(arg, argtype, scope)?);
                    argtypes.push(Type::Indefinite(argtype));
                }

                rules.push((
                    Type::Indefinite(nametype),
                    Type::function(Type::Indefinite(exprtype), argtypes),
                ));
                Ok(rules)
            }
        }
    }

    /// Generates the constraint set for a `defun`, recording `exprtype` as
    /// the definition's own type variable. Every body expression is
    /// type-checked (so an earlier one can still raise [`TypingError`]),
    /// but only the last one's type constrains the function's return type
    /// — see `DESIGN.md`.
    fn generate_defun(
        &mut self,
        defun: &Defun,
        exprtype: VarId,
        scope: &Scope,
    ) -> Result<Vec<Constraint>, TypingError> {
        self.assumptions.insert(exprtype, scope.clone());
        self.node_types.insert(defun.id, exprtype);

        let mut argtypes = Vec::with_capacity(defun.params.len());
        let mut subscope = scope.clone();
        for param in &defun.params {
            // Assumptions snapshot the *outer* scope, not `subscope`: the
            // parameter is not yet in scope for itself, which is what lets
            // `generalize` treat it as free-to-quantify rather than free
            // in the environment.
            let nametype = self.fresh_var(scope);
            self.node_types.insert(param.id, nametype);
            argtypes.push(Type::Indefinite(nametype));
            subscope.insert(param.name.clone(), Type::Indefinite(nametype));
        }

        let bodytype = self.fresh_var(&subscope);
        let mut rules = vec![(
            Type::Indefinite(exprtype),
            Type::function(Type::Indefinite(bodytype), argtypes),
        )];

        let (last, earlier) = defun
            .body
            .split_last()
            .expect("parser rejects empty defun bodies");
        for expr in earlier {
            let discard = self.fresh_var(&subscope);
            rules.extend(self.generate_expr(expr, discard, &subscope)?);
        }
        rules.extend(self.generate_expr(last, bodytype, &subscope)?);

        Ok(rules)
    }

    /// Runs unification to a fixed point. `defun_span` anchors any
    /// unification failure (see [`TypingError`]'s doc comment for why a
    /// defun-level span is the most precise location this port can attach).
    fn unify(
        &mut self,
        rules: Vec<Constraint>,
        blame: Position,
    ) -> Result<Substitution, TypingError> {
        let mut subst: Substitution = Substitution::default();
        let mut stack: VecDeque<Constraint> = rules.into_iter().collect();

        while let Some((mut x, mut y)) = stack.pop_front() {
            if x == y {
                continue;
            }
            if let Type::Indefinite(v) = x {
                self.add_subst(v, y, &mut stack, &mut subst);
                continue;
            }
            if let Type::Indefinite(v) = y {
                self.add_subst(v, x, &mut stack, &mut subst);
                continue;
            }

            // Neither side is a bare variable. Strip one layer of
            // quantification from each side and retry once, matching the
            // source's single `X = X.instantiate(); Y = Y.instantiate()`
            // (not a loop — see `types::instantiate`'s doc comment).
            x = instantiate(&x, self);
            y = instantiate(&y, self);
            if x == y {
                continue;
            }
            if let Type::Indefinite(v) = x {
                self.add_subst(v, y, &mut stack, &mut subst);
                continue;
            }
            if let Type::Indefinite(v) = y {
                self.add_subst(v, x, &mut stack, &mut subst);
                continue;
            }

            match (&x, &y) {
                (Type::Constructed(cx, ax), Type::Constructed(cy, ay)) if cx == cy => {
                    if ax.len() != ay.len() {
                        return Err(TypingError::new(
                            format!("arity mismatch: {x} and {y}"),
                            blame,
                        ));
                    }
                    for (xa, ya) in ax.iter().zip(ay.iter()) {
                        stack.push_back((xa.clone(), ya.clone()));
                    }
                }
                _ => {
                    return Err(TypingError::new(format!("cannot unify {x} and {y}"), blame));
                }
            }
        }

        Ok(subst)
    }

    /// Binds `x` to `y`, then propagates the substitution across the
    /// remaining worklist and every existing binding's value and
    /// assumption snapshot. `y` is freshly re-instantiated at every single
    /// use site, so a quantified builtin gets its own fresh variables at
    /// each call — this is `add_subst`'s `fy = lambda: y.instantiate()` in
    /// the source, called anew per substitution site rather than once.
    fn add_subst(
        &mut self,
        x: VarId,
        y: Type,
        stack: &mut VecDeque<Constraint>,
        subst: &mut Substitution,
    ) {
        let mut new_stack = VecDeque::with_capacity(stack.len());
        for (a, b) in stack.iter() {
            let fy_a = instantiate(&y, self);
            let new_a = substitute(a, x, &fy_a);
            let fy_b = instantiate(&y, self);
            let new_b = substitute(b, x, &fy_b);
            new_stack.push_back((new_a, new_b));
        }
        *stack = new_stack;

        let keys: Vec<VarId> = subst.keys().copied().collect();
        let mut new_subst = Substitution::default();
        for k in keys {
            let v = subst[&k].clone();
            if let Some(scope) = self.assumptions.get(&k).cloned() {
                let mut new_scope = Scope::default();
                for (name, assumed) in scope {
                    let fy = instantiate(&y, self);
                    new_scope.insert(name, substitute(&assumed, x, &fy));
                }
                self.assumptions.insert(k, new_scope);
            }
            let fy = instantiate(&y, self);
            new_subst.insert(k, substitute(&v, x, &fy));
        }
        *subst = new_subst;
        subst.insert(x, y);
    }

    /// Wraps every variable in `subst` that is free-to-quantify (not free
    /// in its own assumption snapshot) in a [`Type::Quantified`]. Mirrors
    /// the generalization loop the source runs once `unify` settles.
    fn generalize(&self, subst: &mut Substitution) {
        let keys: Vec<VarId> = subst.keys().copied().collect();
        for k in keys {
            let assumed = self.assumptions.get(&k).cloned().unwrap_or_default();
            let mut free_in_env = Vec::new();
            for ty in assumed.values() {
                free_typevars(ty, &mut free_in_env);
            }
            let v = subst.get(&k).expect("key came from subst.keys()").clone();
            let mut free_in_v = Vec::new();
            free_typevars(&v, &mut free_in_v);
            for var in free_in_v {
                if var != k && !free_in_env.contains(&var) {
                    let wrapped = subst.get(&k).expect("still present").clone();
                    subst.insert(k, Type::Quantified(var, Box::new(wrapped)));
                }
            }
        }
    }

    /// Infers and unifies the type of one `defun`, returning the resulting
    /// substitution. `scope` is the outer (module-level) scope the
    /// definition is checked against — the builtins plus any previously
    /// typed `defun`s, enabling forward references.
    ///
    /// # Errors
    ///
    /// Returns [`TypingError`] on a free variable, a unification failure,
    /// or an arity mismatch.
    pub fn typify(&mut self, defun: &Defun, scope: &Scope) -> Result<Substitution, TypingError> {
        let exprtype = self.fresh_var(scope);
        let rules = self.generate_defun(defun, exprtype, scope)?;
        let mut subst = self.unify(rules, defun.span.start)?;
        self.generalize(&mut subst);
        Ok(subst)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        Scope,
        TypeEngine,
        Type,
    };
    use lithium_ast::{
        NodeIdGen,
        Stmt,
    };
    use lithium_source::SourceFile;

    use crate::frontend::{
        parser::parse_program,
        reader::read_all,
    };

    fn parse_defun(src: &str) -> lithium_ast::Defun {
        let file = SourceFile::new(src);
        let sexprs = read_all(&file).unwrap();
        let mut ids = NodeIdGen::new();
        let program = parse_program(&sexprs, &mut ids).unwrap();
        let Stmt::Defun(defun) = program.statements.into_iter().next().unwrap();
        defun
    }

    fn builtin_scope() -> Scope {
        let mut scope = Scope::default();
        scope.insert(
            "+".to_string(),
            Type::function(Type::int(), vec![Type::int(), Type::int()]),
        );
        scope
    }

    #[test]
    fn infers_a_monomorphic_function() {
        let defun = parse_defun("(defun add1 (x) (+ x 1))");
        let mut engine = TypeEngine::new();
        let subst = engine.typify(&defun, &builtin_scope()).unwrap();
        let var = engine.node_type_var(defun.id).unwrap();
        let ty = &subst[&var];
        assert_eq!(ty.to_string(), "(int) -> int");
    }

    #[test]
    fn generalizes_an_unused_parameter() {
        let defun = parse_defun("(defun k (x y) x)");
        let mut engine = TypeEngine::new();
        let subst = engine.typify(&defun, &builtin_scope()).unwrap();
        let var = engine.node_type_var(defun.id).unwrap();
        assert!(matches!(subst[&var], Type::Quantified(..)));
    }

    #[test]
    fn undefined_variable_is_a_typing_error() {
        let defun = parse_defun("(defun bad () y)");
        let mut engine = TypeEngine::new();
        let err = engine.typify(&defun, &builtin_scope()).unwrap_err();
        assert!(err.to_string().contains("variable not in scope"));
    }

    #[test]
    fn mismatched_argument_type_is_a_typing_error() {
        let defun = parse_defun("(defun bad () (+ 1 \"x\"))");
        let mut engine = TypeEngine::new();
        let err = engine.typify(&defun, &builtin_scope()).unwrap_err();
        assert!(err.to_string().contains("cannot unify"));
    }
}
