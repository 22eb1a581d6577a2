// -------------------------------------------------------------------------
// SPDX-FileCopyrightText: Copyright © 2026 The Lithium Project
// SPDX-FileName: crates/lithium-compiler/src/backend/codegen.rs
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
//! The code generator: lowers the typed AST to the backend facade.
//!
//! Ported from `original_source/lithium/compiler.py`'s `compile_expression`
//! and `compile_statement` dispatch. `ScopeItem`'s `{type, code}` pair
//! becomes [`Binding`]; `Builtin` becomes the [`Builtin`] trait so `Add`
//! and `PutS` can be registered without the generator matching on a closed
//! set of names.

use std::rc::Rc;

use inkwell::values::{
    BasicMetadataValueEnum,
    BasicValueEnum,
    FunctionValue,
};
use lithium_ast::{
    Defun,
    Expr,
    ExprKind,
    Program,
    Stmt,
};
use lithium_source::Position;
use rustc_hash::FxHashMap;

use crate::backend::error::CodegenError;
use crate::backend::llvm::BackendFacade;
use crate::error::CompileError;
use crate::typesystem::{
    Scope as TypingScope,
    Type,
    TypeEngine,
};

/// A built-in function: a fixed type and a strategy for emitting a call.
/// Grounded in `Builtin`/`Add`/`PutS` in the source.
pub trait Builtin<'ctx> {
    /// The built-in's fixed type, e.g. `fn(int, int) -> int` for `+`.
    fn ty(&self) -> Type;

    /// Emits the call. `args` have already been compiled to values.
    ///
    /// # Errors
    ///
    /// Returns [`CodegenError`] if the built-in cannot be lowered (e.g. the
    /// facade rejects the arguments).
    fn call(
        &self,
        facade: &BackendFacade<'ctx>,
        args: Vec<BasicValueEnum<'ctx>>,
        at: Position,
    ) -> Result<BasicValueEnum<'ctx>, CodegenError>;
}

struct AddBuiltin;

impl<'ctx> Builtin<'ctx> for AddBuiltin {
    fn ty(&self) -> Type {
        Type::function(Type::int(), vec![Type::int(), Type::int()])
    }

    fn call(
        &self,
        facade: &BackendFacade<'ctx>,
        args: Vec<BasicValueEnum<'ctx>>,
        at: Position,
    ) -> Result<BasicValueEnum<'ctx>, CodegenError> {
        let [a, b] = args.as_slice() else {
            return Err(CodegenError::new("`+` takes exactly two arguments", at));
        };
        Ok(facade.add(a.into_int_value(), b.into_int_value()).into())
    }
}

struct PutsBuiltin<'ctx> {
    function: FunctionValue<'ctx>,
}

impl<'ctx> Builtin<'ctx> for PutsBuiltin<'ctx> {
    fn ty(&self) -> Type {
        Type::function(Type::int(), vec![Type::str()])
    }

    fn call(
        &self,
        facade: &BackendFacade<'ctx>,
        args: Vec<BasicValueEnum<'ctx>>,
        at: Position,
    ) -> Result<BasicValueEnum<'ctx>, CodegenError> {
        let metadata_args: Vec<BasicMetadataValueEnum<'ctx>> =
            args.into_iter().map(Into::into).collect();
        facade
            .call(self.function, &metadata_args)
            .ok_or_else(|| CodegenError::new("puts produced no value", at))
    }
}

/// A name binding in the code generator's scope: either a built-in
/// descriptor, a user-defined function, or an ordinary value (a parameter
/// or a compiled sub-expression never lives in scope itself, only
/// parameters do).
#[derive(Clone)]
pub enum Binding<'ctx> {
    /// A registered built-in, addressable by source-level name.
    Builtin(Rc<dyn Builtin<'ctx> + 'ctx>),
    /// A previously compiled top-level `defun`.
    Function { ty: Type, function: FunctionValue<'ctx> },
    /// A bound value — currently only ever a parameter.
    Value { ty: Type, value: BasicValueEnum<'ctx> },
}

impl<'ctx> Binding<'ctx> {
    fn ty(&self) -> Type {
        match self {
            Self::Builtin(b) => b.ty(),
            Self::Function { ty, .. } | Self::Value { ty, .. } => ty.clone(),
        }
    }
}

/// The code generator's scope: source name to binding. Mirrors the
/// `scope` dict threaded through `compile_expression`/`compile_statement`.
pub type CodegenScope<'ctx> = FxHashMap<String, Binding<'ctx>>;

/// What compiling an expression produces: a built-in descriptor (for a
/// callee position), a function (for a callee or a returned reference), or
/// an ordinary value.
enum Compiled<'ctx> {
    Builtin(Rc<dyn Builtin<'ctx> + 'ctx>),
    Function(FunctionValue<'ctx>),
    Value(BasicValueEnum<'ctx>),
}

impl<'ctx> Compiled<'ctx> {
    fn into_value(self, at: Position) -> Result<BasicValueEnum<'ctx>, CodegenError> {
        match self {
            Self::Value(v) => Ok(v),
            Self::Function(f) => Ok(f.as_global_value().as_pointer_value().into()),
            Self::Builtin(_) => Err(CodegenError::new("cannot use a built-in as a value", at)),
        }
    }
}

/// Registers `+` and `puts` in a fresh scope, the way `get_builtins` does
/// in the source.
///
/// # Errors
///
/// Returns [`CompileError`] if the facade cannot lower `puts`'s type —
/// never expected to happen for this fixed, well-formed type.
pub fn default_builtins<'ctx>(
    facade: &BackendFacade<'ctx>,
) -> Result<CodegenScope<'ctx>, CompileError> {
    let mut scope = CodegenScope::default();
    scope.insert("+".to_string(), Binding::Builtin(Rc::new(AddBuiltin)));

    let puts_ty = Type::function(Type::int(), vec![Type::str()]);
    let puts_fn_type = facade.function_type(&puts_ty, Position::start_of_file())?;
    let puts_function = facade.add_function(puts_fn_type, "puts");
    scope.insert(
        "puts".to_string(),
        Binding::Builtin(Rc::new(PutsBuiltin { function: puts_function })),
    );
    Ok(scope)
}

fn compile_expression<'ctx>(
    expr: &Expr,
    facade: &mut BackendFacade<'ctx>,
    scope: &CodegenScope<'ctx>,
    engine: &TypeEngine,
    subst: &crate::typesystem::Substitution,
) -> Result<Compiled<'ctx>, CompileError> {
    match &expr.kind {
        ExprKind::IntConstant(value) => {
            let var = engine
                .node_type_var(expr.id)
                .expect("every expression node was given a type variable during typify");
            let ty = subst.get(&var).cloned().unwrap_or(Type::Indefinite(var));
            let llvm_ty = facade.basic_type(&ty, expr.span.start)?;
            let inkwell::types::BasicTypeEnum::IntType(int_ty) = llvm_ty else {
                return Err(CodegenError::new(
                    format!("integer constant resolved to non-integer type {ty}"),
                    expr.span.start,
                )
                .into());
            };
            Ok(Compiled::Value(int_ty.const_int(*value as u64, true).into()))
        }
        ExprKind::StrConstant(text) => Ok(Compiled::Value(facade.const_str(text).into())),
        ExprKind::Variable(name) => match scope.get(name) {
            Some(Binding::Builtin(b)) => Ok(Compiled::Builtin(b.clone())),
            Some(Binding::Function { function, .. }) => Ok(Compiled::Function(*function)),
            Some(Binding::Value { value, .. }) => Ok(Compiled::Value(*value)),
            None => Err(CodegenError::new(format!("variable not in scope: {name}"), expr.span.start).into()),
        },
        ExprKind::Call { callee, args } => {
            let func = compile_expression(callee, facade, scope, engine, subst)?;
            let mut values = Vec::with_capacity(args.len());
            for arg in args {
                let compiled = compile_expression(arg, facade, scope, engine, subst)?;
                values.push(compiled.into_value(arg.span.start)?);
            }
            match func {
                Compiled::Builtin(b) => Ok(Compiled::Value(b.call(facade, values, expr.span.start)?)),
                Compiled::Function(f) => {
                    let metadata_args: Vec<BasicMetadataValueEnum<'ctx>> =
                        values.into_iter().map(Into::into).collect();
                    let result = facade.call(f, &metadata_args).ok_or_else(|| {
                        CodegenError::new("call produced no value", expr.span.start)
                    })?;
                    Ok(Compiled::Value(result))
                }
                Compiled::Value(_) => {
                    Err(CodegenError::new("cannot call a non-function value", expr.span.start).into())
                }
            }
        }
    }
}

/// Compiles one top-level `defun`, as `compile_statement`/`cs_Defun` does
/// in the source: type it against the outer scope, lower its resolved
/// type, emit the function body, and bind the result back into `scope`.
///
/// # Errors
///
/// Returns [`CompileError`] if typing fails, if the resolved type cannot
/// be lowered (including a generalized/polymorphic top-level type — the
/// backend facade has no lowering for `Quantified`, matching the source's
/// `llvm_type` having no `QuantifiedType` implementation), or if any body
/// expression fails to compile.
pub fn compile_statement<'ctx>(
    defun: &Defun,
    facade: &mut BackendFacade<'ctx>,
    scope: &mut CodegenScope<'ctx>,
    engine: &mut TypeEngine,
) -> Result<(), CompileError> {
    let typing_scope: TypingScope = scope.iter().map(|(k, v)| (k.clone(), v.ty())).collect();
    let subst = engine.typify(defun, &typing_scope)?;

    let var = engine
        .node_type_var(defun.id)
        .expect("generate_defun recorded a type variable for the defun itself");
    let ty = subst.get(&var).cloned().unwrap_or(Type::Indefinite(var));
    if matches!(ty, Type::Quantified(..)) {
        return Err(CodegenError::new(
            "cannot compile a generalized (polymorphic) top-level function",
            defun.span.start,
        )
        .into());
    }

    let fn_type = facade.function_type(&ty, defun.span.start)?;
    let function = facade.add_function(fn_type, &defun.name);

    let Type::Constructed(_, args) = &ty else {
        unreachable!("function_type already rejected anything but a fn type");
    };
    let param_types = &args[1..];

    let mut subscope = scope.clone();
    for (i, (param, param_ty)) in defun.params.iter().zip(param_types).enumerate() {
        let index = u32::try_from(i).expect("parameter counts fit in u32");
        BackendFacade::set_param_name(function, index, &param.name);
        subscope.insert(
            param.name.clone(),
            Binding::Value {
                ty: param_ty.clone(),
                value: BackendFacade::param(function, index),
            },
        );
    }

    facade.append_block_and_attach(function, "entry");

    let (last, earlier) = defun
        .body
        .split_last()
        .expect("parser rejects empty defun bodies");
    for expr in earlier {
        compile_expression(expr, facade, &subscope, engine, &subst)?;
    }
    let result = compile_expression(last, facade, &subscope, engine, &subst)?;
    let return_value = result.into_value(last.span.start)?;
    facade.ret(&return_value);

    scope.insert(defun.name.clone(), Binding::Function { ty, function });
    Ok(())
}

/// Compiles every top-level statement in `program`, in source order. A
/// `defun` inserts itself into `scope` only after compiling, so a later
/// `defun` may call an earlier one, but not the reverse — matching the
/// source's single top-to-bottom pass. One shared [`TypeEngine`] across
/// the whole program still lets every `defun`'s type be inferred
/// independently of the others' order, but genuine forward calls (an
/// earlier `defun` calling a later one) fail with an unresolved-variable
/// `TypingError`.
///
/// # Errors
///
/// Returns [`CompileError`] on the first statement that fails to compile.
pub fn compile_program<'ctx>(
    program: &Program,
    facade: &mut BackendFacade<'ctx>,
    scope: &mut CodegenScope<'ctx>,
) -> Result<(), CompileError> {
    let mut engine = TypeEngine::new();
    for stmt in &program.statements {
        let Stmt::Defun(defun) = stmt;
        compile_statement(defun, facade, scope, &mut engine)?;
    }
    Ok(())
}
