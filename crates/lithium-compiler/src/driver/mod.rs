// -------------------------------------------------------------------------
// SPDX-FileCopyrightText: Copyright © 2026 The Lithium Project
// SPDX-FileName: crates/lithium-compiler/src/driver/mod.rs
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
//! Wires the reader, parser, type engine, backend facade, and code
//! generator into one `&str -> Result<String, CompileError>` pipeline.
//!
//! `original_source/lithium/compiler.py`'s `if __name__ == '__main__':`
//! block does this inline (tokenize, parse, compile, print); this module
//! is that block, given a name and made reusable from [`crate::CompileError`]
//! instead of letting a Python exception propagate to the interpreter.

use inkwell::context::Context;
use lithium_ast::NodeIdGen;
use lithium_source::SourceFile;

use crate::backend::{
    compile_program,
    default_builtins,
    BackendFacade,
};
use crate::error::CompileError;
use crate::frontend::{
    parse_program,
    read_all,
};

/// Compiles Lithium source text to textual LLVM IR.
///
/// `module_name` becomes the emitted module's name (the CLI uses the
/// input file's name, or `"stdin"`).
///
/// # Errors
///
/// Returns [`CompileError`] on the first failure in any pipeline stage:
/// reading, parsing, type checking, or code generation.
pub fn compile(source: &str, module_name: &str) -> Result<String, CompileError> {
    let file = SourceFile::new(source);
    let sexprs = read_all(&file)?;

    let mut ids = NodeIdGen::new();
    let program = parse_program(&sexprs, &mut ids)?;

    let context = Context::create();
    let mut facade = BackendFacade::new(&context, module_name);
    let mut scope = default_builtins(&facade)?;

    compile_program(&program, &mut facade, &mut scope)?;

    Ok(facade.print_to_string())
}

#[cfg(test)]
mod tests {
    use super::compile;

    #[test]
    fn compiles_add1_to_ir_containing_the_function() {
        let ir = compile("(defun add1 (x) (+ x 1))", "test").unwrap();
        assert!(ir.contains("define"));
        assert!(ir.contains("add1"));
    }

    #[test]
    fn compiles_a_puts_call() {
        let ir = compile("(defun main () (puts \"hi\"))", "test").unwrap();
        assert!(ir.contains("@puts"));
        assert!(ir.contains("str0"));
    }

    /// A later `defun` can call an earlier one: `compile_statement` only
    /// inserts a `defun`'s binding into scope once it finishes compiling,
    /// so `main` (compiled second) sees `helper` (compiled first) already
    /// bound. This is a *backward* reference, not a forward one — see
    /// [`forward_reference_is_not_supported`] below for the other
    /// direction.
    #[test]
    fn backward_reference_between_defuns_works() {
        let ir = compile(
            "(defun helper (x) (+ x 1)) (defun main () (helper 41))",
            "test",
        )
        .unwrap();
        assert!(ir.contains("helper"));
        assert!(ir.contains("main"));
    }

    /// A `defun` calling a later, not-yet-compiled `defun` is not
    /// supported: `scope` only gains `helper`'s binding after `helper`
    /// itself has been compiled, so `main`, compiled first here, sees no
    /// `helper` in scope yet and fails typing with an unresolved variable.
    #[test]
    fn forward_reference_is_not_supported() {
        let err = compile(
            "(defun main () (helper 41)) (defun helper (x) (+ x 1))",
            "test",
        )
        .unwrap_err();
        assert!(err.to_string().contains("variable not in scope"));
    }

    #[test]
    fn type_mismatch_is_reported_with_a_location() {
        let err = compile("(defun bad () (+ 1 \"x\"))", "test").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("cannot unify"));
        assert!(message.contains("line"));
    }

    #[test]
    fn unknown_variable_is_reported() {
        let err = compile("(defun bad () y)", "test").unwrap_err();
        assert!(err.to_string().contains("variable not in scope"));
    }

    #[test]
    fn malformed_source_is_a_read_error() {
        let err = compile("(defun bad (", "test").unwrap_err();
        assert!(err.to_string().contains("at line"));
    }

    /// E2 verbatim: a generalized (polymorphic) top-level function has no
    /// backend lowering and is rejected with a located `CodegenError`
    /// rather than compiled — see `DESIGN.md`.
    #[test]
    fn generalized_top_level_function_is_a_codegen_error() {
        let err = compile("(defun id (x) x)", "test").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("cannot compile a generalized"));
        assert!(message.contains("at line"));
    }
}
