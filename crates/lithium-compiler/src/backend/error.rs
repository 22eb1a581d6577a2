// -------------------------------------------------------------------------
// SPDX-FileCopyrightText: Copyright © 2026 The Lithium Project
// SPDX-FileName: crates/lithium-compiler/src/backend/error.rs
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
//! Error types for the backend facade and the code generator.

use lithium_source::Position;
use thiserror::Error;

/// A failure of the SSA backend facade itself: a verifier rejection
/// surfaced from the SSA library, or LLVM target/module setup.
///
/// An unknown atomic or constructed type encountered while lowering is a
/// [`CodegenError`] instead — the type engine produced a type the code
/// generator cannot handle, which is a code generation bug, not a
/// complaint from the backend/verifier itself.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The LLVM target machine or module could not be initialized.
    #[error("LLVM setup error: {0}")]
    Setup(String),
}

/// A failure of the code generator: a builtin the generated call does not
/// resolve to, or a type the unifier left only partially resolved.
#[derive(Debug, Error)]
#[error("{message} at line {} col {}", position.line, position.column)]
pub struct CodegenError {
    message: String,
    position: Position,
}

impl CodegenError {
    pub(crate) fn new(message: impl Into<String>, position: Position) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}
