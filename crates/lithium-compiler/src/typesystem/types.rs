// -------------------------------------------------------------------------
// SPDX-FileCopyrightText: Copyright © 2026 The Lithium Project
// SPDX-FileName: crates/lithium-compiler/src/typesystem/types.rs
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
//! The `Type` representation used by Lithium's Hindley-Milner engine.
//!
//! Ported from `original_source/lithium/types.py`'s `Type` hierarchy
//! (`IndefiniteType`, `AtomicType`, `ConstructedType`, `QuantifiedType`).
//! The Python source mutates an `assumptions` dict living on each
//! `IndefiniteType` instance; here that side-table lives in
//! [`crate::typesystem::engine::TypeEngine`], keyed by the stable
//! [`VarId`] instead, per the ownership-disciplined guidance in
//! `spec.md` §9.

use std::fmt;

/// A stable identifier for a unification variable (an `Indefinite` type).
/// Two `Indefinite` types compare equal iff their ids are equal, exactly
/// as `IndefiniteType.__eq__` compares `typename`s in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarId(pub u32);

/// Renders a `VarId` the way the source names fresh type variables: `A`,
/// `B`, … `Z`, `A1`, `B1`, ….
#[must_use]
pub fn var_name(id: VarId) -> String {
    const LETTERS: usize = 26;
    let append = id.0 as usize / LETTERS;
    let index = id.0 as usize % LETTERS;
    let base = (b'A' + index as u8) as char;
    if append > 0 {
        format!("{base}{append}")
    } else {
        base.to_string()
    }
}

/// A Lithium type: a fresh unification variable, a ground atom, a
/// parametric construction (only `fn` is used), or a universal
/// quantifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    /// A fresh unification variable, standing for an as-yet-unknown type.
    Indefinite(VarId),
    /// A built-in ground type (`int`, `str`).
    Atomic(String),
    /// A parametric type; `fn`'s `args` are `[return, param1, .., paramN]`.
    Constructed(String, Vec<Type>),
    /// `forall var. body`.
    Quantified(VarId, Box<Type>),
}

impl Type {
    /// Shorthand for an atomic `int`.
    #[must_use]
    pub fn int() -> Self {
        Self::Atomic("int".to_string())
    }

    /// Shorthand for an atomic `str`.
    #[must_use]
    pub fn str() -> Self {
        Self::Atomic("str".to_string())
    }

    /// Builds a `fn(return, params...)` constructed type.
    #[must_use]
    pub fn function(ret: Self, params: Vec<Self>) -> Self {
        let mut args = vec![ret];
        args.extend(params);
        Self::Constructed("fn".to_string(), args)
    }
}

/// Replaces every free occurrence of `x` in `ty` with `y`. `x` is always an
/// `Indefinite` variable, matching `Type.substitute`'s contract in the
/// source.
#[must_use]
pub fn substitute(ty: &Type, x: VarId, y: &Type) -> Type {
    match ty {
        Type::Indefinite(v) if *v == x => y.clone(),
        Type::Indefinite(_) | Type::Atomic(_) => ty.clone(),
        Type::Constructed(ctor, args) => {
            Type::Constructed(ctor.clone(), args.iter().map(|a| substitute(a, x, y)).collect())
        }
        Type::Quantified(var, body) => {
            debug_assert_ne!(*var, x, "substitution variable must not be a bound quantifier");
            Type::Quantified(*var, Box::new(substitute(body, x, y)))
        }
    }
}

/// Collects every free (non-quantified-over) `Indefinite` variable
/// appearing in `ty`.
pub fn free_typevars(ty: &Type, out: &mut Vec<VarId>) {
    match ty {
        Type::Indefinite(v) => out.push(*v),
        Type::Atomic(_) => {}
        Type::Constructed(_, args) => {
            for arg in args {
                free_typevars(arg, out);
            }
        }
        Type::Quantified(var, body) => {
            let mut inner = Vec::new();
            free_typevars(body, &mut inner);
            out.extend(inner.into_iter().filter(|t| t != var));
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Indefinite(v) => write!(f, "{}", var_name(*v)),
            Self::Atomic(name) => write!(f, "{name}"),
            Self::Constructed(ctor, args) if ctor == "fn" => {
                let ret = &args[0];
                let params = &args[1..];
                write!(f, "(")?;
                for (i, p) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{p}")?;
                }
                write!(f, ") -> {ret}")
            }
            Self::Constructed(ctor, args) => {
                write!(f, "{ctor}(")?;
                for (i, a) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{a}")?;
                }
                write!(f, ")")
            }
            Self::Quantified(var, body) => write!(f, "forall {}. {}", var_name(*var), body),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        substitute,
        var_name,
        Type,
        VarId,
    };

    #[test]
    fn var_names_wrap_after_z() {
        assert_eq!(var_name(VarId(0)), "A");
        assert_eq!(var_name(VarId(25)), "Z");
        assert_eq!(var_name(VarId(26)), "A1");
        assert_eq!(var_name(VarId(27)), "B1");
    }

    #[test]
    fn substitute_replaces_only_the_matching_var() {
        let ty = Type::function(Type::Indefinite(VarId(0)), vec![Type::Indefinite(VarId(1))]);
        let replaced = substitute(&ty, VarId(0), &Type::int());
        assert_eq!(
            replaced,
            Type::function(Type::int(), vec![Type::Indefinite(VarId(1))])
        );
    }
}
