// -------------------------------------------------------------------------
// SPDX-FileCopyrightText: Copyright © 2026 The Lithium Project
// SPDX-FileName: crates/lithium-compiler/src/typesystem/error.rs
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

use lithium_source::Position;
use thiserror::Error;

/// A failure of the type engine: an unbound variable, a unification
/// failure, an arity mismatch, or a constructor mismatch.
///
/// `original_source/lithium/types.py`'s `unify` raises an unlocated
/// `RuntimeError` on unification failure; `generate_typerules` is the only
/// function there that raises a located error (for a free variable). This
/// port upgrades unification failures to a located [`TypingError`] too, but
/// since `unify` worklists bare `(Type, Type)` constraints with no
/// surviving per-argument provenance once substitution has run, a
/// unification failure is anchored to the enclosing `defun`'s span rather
/// than the specific sub-expression that produced the offending
/// constraint. See `DESIGN.md`.
#[derive(Debug, Error)]
#[error("{message} at line {} col {}", position.line, position.column)]
pub struct TypingError {
    message: String,
    position: Position,
}

impl TypingError {
    pub(crate) fn new(message: impl Into<String>, position: Position) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}
