// -------------------------------------------------------------------------
// SPDX-FileCopyrightText: Copyright © 2026 The Lithium Project
// SPDX-FileName: crates/lithium-cli/tests/end_to_end.rs
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
//! Drives the `lithium` binary itself (not the library), covering the
//! scenarios E1-E6 and exercising stdin/file input and stdout/`-o` output.

use std::io::Write as _;
use std::process::{
    Command,
    Stdio,
};

fn lithium() -> Command {
    Command::new(env!("CARGO_BIN_EXE_lithium"))
}

fn run_on_stdin(source: &str) -> std::process::Output {
    let mut child = lithium()
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn lithium");
    child
        .stdin
        .take()
        .expect("piped stdin")
        .write_all(source.as_bytes())
        .expect("failed to write to stdin");
    child.wait_with_output().expect("failed to wait on lithium")
}

/// E1: `(defun add1 (x) (+ x 1))` infers `fn(int, int) -> int` and emits
/// an `add1` function whose body adds its argument to the literal `1`.
#[test]
fn e1_add1_emits_an_add_instruction() {
    let output = run_on_stdin("(defun add1 (x) (+ x 1))");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let ir = String::from_utf8(output.stdout).unwrap();
    assert!(ir.contains("define"));
    assert!(ir.contains("@add1"));
    assert!(ir.contains("add"));
}

/// A monomorphic use of the identity shape from E2 — `x` is pinned to
/// `int` by the `+` call, so the inferred type is `fn(int, int) -> int`,
/// not the generalized `forall a. fn(a, a)` that the literal E2 program
/// produces. This is the non-polymorphic sibling of
/// [`e2_generalized_identity_is_rejected_at_codegen`] below.
#[test]
fn monomorphic_identity_shaped_function_compiles() {
    let output = run_on_stdin("(defun id (x) (+ x 0))");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(String::from_utf8(output.stdout).unwrap().contains("@id"));
}

/// E2 verbatim: `(defun id (x) x)` infers the generalized (polymorphic)
/// type `forall a. fn(a, a)`. The backend facade has no lowering for a
/// `Quantified` type (see `DESIGN.md`, matching
/// `original_source/lithium/compiler.py`'s `llvm_type`, which has no case
/// for `QuantifiedType` either), so `compile_statement` rejects it with a
/// located `CodegenError` rather than compiling it. This is a known,
/// intentional limitation, not a regression — this test locks it in.
#[test]
fn e2_generalized_identity_is_rejected_at_codegen() {
    let output = run_on_stdin("(defun id (x) x)");
    assert!(!output.status.success());

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("cannot compile a generalized"));
    assert!(stderr.contains("polymorphic"));
    assert!(stderr.contains("at line"));
}

/// E3: `(defun main () (puts "hi"))` emits a `str0` global for the
/// literal and a call through to the external `puts` symbol.
#[test]
fn e3_puts_emits_a_string_global_and_a_call() {
    let output = run_on_stdin("(defun main () (puts \"hi\"))");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let ir = String::from_utf8(output.stdout).unwrap();
    assert!(ir.contains("str0"));
    assert!(ir.contains("@puts"));
    assert!(ir.contains("hi"));
}

/// E4: mismatched argument types are reported as a typing error whose
/// message names both types and includes a source location.
#[test]
fn e4_type_mismatch_is_reported_on_stderr() {
    let output = run_on_stdin("(defun bad () (+ 1 \"x\"))");
    assert!(!output.status.success());

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("cannot unify"));
    assert!(stderr.contains("int"));
    assert!(stderr.contains("str"));
    assert!(stderr.contains("line"));
}

/// E5: calling an undefined name is reported as a typing error naming
/// the offending variable.
#[test]
fn e5_unknown_variable_is_reported_on_stderr() {
    let output = run_on_stdin("(defun oops () (foo))");
    assert!(!output.status.success());

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("foo"));
    assert!(stderr.contains("not in scope"));
}

/// E6: calling a builtin with the wrong number of arguments is an arity
/// mismatch, reported the same way as any other unification failure.
#[test]
fn e6_wrong_arity_is_reported_on_stderr() {
    let output = run_on_stdin("(defun f () (+ 1))");
    assert!(!output.status.success());
    assert!(!String::from_utf8(output.stderr).unwrap().is_empty());
}

/// Malformed input (an unterminated form) is a read error, not a panic,
/// and is reported with a source location like every other stage.
#[test]
fn malformed_source_is_a_read_error_not_a_panic() {
    let output = run_on_stdin("(defun bad (");
    assert!(!output.status.success());

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("at line"));
}

/// A file argument is read instead of stdin, and `--output` redirects
/// the emitted IR to a file instead of stdout.
#[test]
fn compiles_a_file_and_writes_output_with_flag() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input_path = dir.path().join("prog.li");
    std::fs::write(&input_path, "(defun add1 (x) (+ x 1))").expect("write input");
    let output_path = dir.path().join("prog.ll");

    let status = lithium()
        .arg(&input_path)
        .arg("--output")
        .arg(&output_path)
        .status()
        .expect("failed to run lithium");
    assert!(status.success());

    let ir = std::fs::read_to_string(&output_path).expect("read output");
    assert!(ir.contains("@add1"));
}
