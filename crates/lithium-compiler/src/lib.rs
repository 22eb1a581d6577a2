// -------------------------------------------------------------------------
// SPDX-FileCopyrightText: Copyright © 2026 The Lithium Project
// SPDX-FileName: crates/lithium-compiler/src/lib.rs
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
//! The Lithium compiler: reader, pattern matcher, parser, type engine,
//! backend facade, and code generator.
//!
//! [`driver`] wires the pieces together into a single
//! `&str -> Result<String, CompileError>` pipeline; everything else is
//! exposed so the stages can also be driven individually, for example by
//! tests.

pub mod backend;
pub mod driver;
mod error;
pub mod frontend;
pub mod typesystem;

pub use error::CompileError;
