// -------------------------------------------------------------------------
// SPDX-FileCopyrightText: Copyright © 2026 The Lithium Project
// SPDX-FileName: crates/lithium-compiler/src/error.rs
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
//! The unified error type returned at every pipeline boundary.

use thiserror::Error;

use crate::backend::{
    BackendError,
    CodegenError,
};
use crate::frontend::{
    ParseError,
    ReadError,
};
use crate::typesystem::TypingError;

/// A failure anywhere in the reader → pattern matcher → parser → type
/// engine → backend → code generator pipeline.
///
/// Each stage's own error type already formats `"{message} at line {L} col
/// {C}"` (`spec.md` §7); this enum only dispatches `Display` to whichever
/// stage actually failed, so a caller sees one uniform message regardless
/// of which component raised it.
#[derive(Debug, Error)]
pub enum CompileError {
    /// The reader could not tokenize the source into S-expressions.
    #[error(transparent)]
    Read(#[from] ReadError),
    /// The parser could not lift an S-expression into the typed AST.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The type engine rejected the program.
    #[error(transparent)]
    Typing(#[from] TypingError),
    /// The code generator could not compile a well-typed program.
    #[error(transparent)]
    Codegen(#[from] CodegenError),
    /// The backend facade could not lower a type or set up the module.
    #[error(transparent)]
    Backend(#[from] BackendError),
}
