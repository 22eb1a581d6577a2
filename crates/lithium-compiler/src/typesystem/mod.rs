// -------------------------------------------------------------------------
// SPDX-FileCopyrightText: Copyright © 2026 The Lithium Project
// SPDX-FileName: crates/lithium-compiler/src/typesystem/mod.rs
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
//! The Hindley-Milner type engine: constraint generation, unification, and
//! generalization.

mod engine;
mod error;
mod types;

pub use engine::{
    Scope,
    Substitution,
    TypeEngine,
};
pub use error::TypingError;
pub use types::{
    var_name,
    Type,
    VarId,
};
