// -------------------------------------------------------------------------
// SPDX-FileCopyrightText: Copyright © 2026 The Lithium Project
// SPDX-FileName: crates/lithium-compiler/src/backend/llvm.rs
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
//! The abstract SSA backend facade, concretely an LLVM module/builder pair.
//!
//! Ported from the teacher's `backend::llvm::LLVMContext`, trimmed to the
//! operation set `spec.md` §4.E actually names — Lithium has no classes,
//! tuples, lists, or unions, so only `int`/`str`/`fn` lowering survives.

use std::env;

use inkwell::builder::Builder;
use inkwell::context::Context;
use inkwell::module::Module;
use inkwell::targets::{
    InitializationConfig,
    Target,
};
use inkwell::types::{
    BasicMetadataTypeEnum,
    BasicTypeEnum,
    FunctionType,
};
use inkwell::values::{
    BasicMetadataValueEnum,
    BasicValue,
    BasicValueEnum,
    FunctionValue,
    GlobalValue,
    IntValue,
    PointerValue,
};
use inkwell::AddressSpace;
use lithium_source::Position;

use crate::backend::error::CodegenError;
use crate::typesystem::Type as LithiumType;

/// Wraps one compilation's LLVM context, module, and builder.
///
/// Mirrors the shape of the teacher's `LLVMContext`, but Lithium compiles a
/// whole program into a single module in one pass, so there is no separate
/// pass-manager/optimization stage — `spec.md`'s Non-goals exclude an
/// optimizing backend.
pub struct BackendFacade<'ctx> {
    context: &'ctx Context,
    module: Module<'ctx>,
    builder: Builder<'ctx>,
    str_counter: u32,
}

impl<'ctx> BackendFacade<'ctx> {
    /// Creates a facade around a fresh module named `module_name`.
    pub fn new(context: &'ctx Context, module_name: &str) -> Self {
        Self::initialize_target();
        Self {
            context,
            module: context.create_module(module_name),
            builder: context.create_builder(),
            str_counter: 0,
        }
    }

    fn initialize_target() {
        if env::var("LLVM_SYS_181_PREFIX").is_err() {
            log::debug!(
                "LLVM_SYS_181_PREFIX is not set; set it if the linker cannot find LLVM"
            );
        }
        let config = InitializationConfig {
            asm_parser: true,
            asm_printer: true,
            base: true,
            disassembler: true,
            info: true,
            machine_code: true,
        };
        Target::initialize_all(&config);
    }

    /// Renders the module as textual LLVM IR.
    #[must_use]
    pub fn print_to_string(&self) -> String {
        self.module.print_to_string().to_string()
    }

    /// Lowers a resolved Lithium type to its LLVM representation.
    /// `Atomic(int) → i64`, `Atomic(str) → ptr`, `Constructed(fn, ...) →`
    /// a function type (returned by [`Self::function_type`] instead, since
    /// `inkwell`'s `FunctionType` is not a `BasicTypeEnum`).
    ///
    /// # Errors
    ///
    /// Returns [`CodegenError`] for any type other than `int`/`str`, or for
    /// a bare `fn` type passed where a basic (value-carrying) type is
    /// required — an unknown atomic or constructed type is a code
    /// generation failure, not a backend/verifier one.
    pub fn basic_type(&self, ty: &LithiumType, at: Position) -> Result<BasicTypeEnum<'ctx>, CodegenError> {
        match ty {
            LithiumType::Atomic(name) if name == "int" => Ok(self.context.i64_type().into()),
            LithiumType::Atomic(name) if name == "str" => {
                Ok(self.context.ptr_type(AddressSpace::default()).into())
            }
            LithiumType::Atomic(name) => {
                Err(CodegenError::new(format!("found unknown atomic type {name}"), at))
            }
            _ => Err(CodegenError::new(format!("expected a basic type, found {ty}"), at)),
        }
    }

    /// Lowers a `Constructed(fn, ret, params...)` type to an LLVM function
    /// type.
    ///
    /// # Errors
    ///
    /// Returns [`CodegenError`] if `ty` is not a `fn` constructor, or if
    /// any return/parameter type fails to lower.
    pub fn function_type(
        &self,
        ty: &LithiumType,
        at: Position,
    ) -> Result<FunctionType<'ctx>, CodegenError> {
        let LithiumType::Constructed(ctor, args) = ty else {
            return Err(CodegenError::new(format!("expected a fn type, found {ty}"), at));
        };
        if ctor != "fn" {
            return Err(CodegenError::new(format!("found unknown constructed type {ctor}"), at));
        }
        let (ret, params) = args.split_first().expect("fn type always carries a return type");
        let param_types: Vec<BasicMetadataTypeEnum<'ctx>> = params
            .iter()
            .map(|p| self.basic_type(p, at).map(Into::into))
            .collect::<Result<_, _>>()?;
        let ret_type = self.basic_type(ret, at)?;
        Ok(match ret_type {
            BasicTypeEnum::IntType(t) => t.fn_type(&param_types, false),
            BasicTypeEnum::PointerType(t) => t.fn_type(&param_types, false),
            BasicTypeEnum::FloatType(t) => t.fn_type(&param_types, false),
            BasicTypeEnum::StructType(t) => t.fn_type(&param_types, false),
            BasicTypeEnum::ArrayType(t) => t.fn_type(&param_types, false),
            BasicTypeEnum::VectorType(t) => t.fn_type(&param_types, false),
            BasicTypeEnum::ScalableVectorType(t) => t.fn_type(&param_types, false),
        })
    }

    /// `module.add_function(fn_type, name)`.
    pub fn add_function(&self, fn_type: FunctionType<'ctx>, name: &str) -> FunctionValue<'ctx> {
        self.module.add_function(name, fn_type, None)
    }

    /// `function.append_block(name)`, then `builder.attach(block)`.
    pub fn append_block_and_attach(&self, function: FunctionValue<'ctx>, name: &str) {
        let block = self.context.append_basic_block(function, name);
        self.builder.position_at_end(block);
    }

    /// `function.param(i)`.
    #[must_use]
    pub fn param(function: FunctionValue<'ctx>, index: u32) -> BasicValueEnum<'ctx> {
        function
            .get_nth_param(index)
            .expect("caller supplies an in-range parameter index")
    }

    /// `function.set_param_name(i, name)`.
    pub fn set_param_name(function: FunctionValue<'ctx>, index: u32, name: &str) {
        Self::param(function, index).set_name(name);
    }

    /// `builder.const_int(ty, value)`, specialized to Lithium's one integer
    /// width.
    #[must_use]
    pub fn const_int(&self, value: i64) -> IntValue<'ctx> {
        self.context.i64_type().const_int(value as u64, true)
    }

    /// `builder.const_str(bytes)`: materializes a process-unique global
    /// named `str{counter}` holding `bytes` plus a trailing NUL, and
    /// returns a `gep 0,0` pointer into it — `ce_StrConstant`'s exact
    /// scheme in the source.
    pub fn const_str(&mut self, bytes: &str) -> PointerValue<'ctx> {
        let name = format!("str{}", self.str_counter);
        self.str_counter += 1;

        let mut initializer = bytes.as_bytes().to_vec();
        initializer.push(0);
        let array_type = self.context.i8_type().array_type(initializer.len() as u32);

        let global: GlobalValue<'ctx> = self.module.add_global(array_type, None, &name);
        global.set_initializer(&self.context.const_string(bytes.as_bytes(), true));
        global.set_constant(true);

        let zero = self.context.i32_type().const_zero();
        // SAFETY: `global` is a freshly created array global; indexing it
        // with two zero offsets is always in bounds.
        unsafe {
            self.builder
                .build_in_bounds_gep(array_type, global.as_pointer_value(), &[zero, zero], "")
                .expect("gep on a freshly created array global cannot fail")
        }
    }

    /// `builder.add(a, b)`.
    pub fn add(&self, a: IntValue<'ctx>, b: IntValue<'ctx>) -> IntValue<'ctx> {
        self.builder.build_int_add(a, b, "").expect("int add on matching integer types cannot fail")
    }

    /// `builder.call(fn_or_value, args)`.
    pub fn call(
        &self,
        function: FunctionValue<'ctx>,
        args: &[BasicMetadataValueEnum<'ctx>],
    ) -> Option<BasicValueEnum<'ctx>> {
        self.builder
            .build_call(function, args, "")
            .expect("call with matching argument count and types cannot fail")
            .try_as_basic_value()
            .left()
    }

    /// `builder.ret(value)`.
    pub fn ret(&self, value: &dyn BasicValue<'ctx>) {
        self.builder.build_return(Some(value)).expect("a function's single return cannot fail");
    }
}
