// -------------------------------------------------------------------------
// SPDX-FileCopyrightText: Copyright © 2026 The Lithium Project
// SPDX-FileName: crates/lithium-cli/src/main.rs
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
//! Lithium CLI
//!
//! Reads a Lithium program — from a file, or from stdin if none is given —
//! and prints the compiled LLVM IR to stdout (or to `--output`). Any
//! pipeline failure is printed to stderr with its `line:col` location and
//! the process exits non-zero.

use std::fs;
use std::io::{
    self,
    Read,
    Write,
};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{
    Context,
    Result,
};
use clap::Parser;
use lithium_compiler::driver::compile;

/// Ahead-of-time compiler for the Lithium language.
#[derive(Parser, Debug)]
#[clap(version, about, long_about = None)]
struct Args {
    /// Source file to compile. Reads from stdin when omitted.
    #[clap(value_parser)]
    input: Option<PathBuf>,

    /// Where to write the emitted LLVM IR. Defaults to stdout.
    #[clap(short, long, value_parser)]
    output: Option<PathBuf>,

    /// Print diagnostic logging to stderr (controlled further by `RUST_LOG`).
    #[clap(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if args.verbose && std::env::var_os("RUST_LOG").is_none() {
        // SAFETY: this runs before any other thread has started.
        unsafe {
            std::env::set_var("RUST_LOG", "debug");
        }
    }
    env_logger::init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let (source, module_name) = read_source(args.input.as_deref())?;
    log::debug!("compiling {module_name} ({} bytes)", source.len());

    let ir = compile(&source, &module_name)?;

    write_output(args.output.as_deref(), &ir)
}

fn read_source(input: Option<&std::path::Path>) -> Result<(String, String)> {
    match input {
        Some(path) => {
            let source = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let module_name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("module")
                .to_string();
            Ok((source, module_name))
        }
        None => {
            let mut source = String::new();
            io::stdin()
                .read_to_string(&mut source)
                .context("failed to read stdin")?;
            Ok((source, "stdin".to_string()))
        }
    }
}

fn write_output(output: Option<&std::path::Path>, ir: &str) -> Result<()> {
    match output {
        Some(path) => fs::write(path, ir)
            .with_context(|| format!("failed to write {}", path.display())),
        None => io::stdout().write_all(ir.as_bytes()).context("failed to write stdout"),
    }
}
