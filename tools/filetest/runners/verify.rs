//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

//! Each non-comment line of a `verify` test describes one operation:
//!
//! ```none
//! atomic-rmw space=local memory=workgroup semantics=0x108
//! ```
//!
//! The keys are `space`, `execution`, `memory`, `semantics`, `unequal`,
//! `group` and `cluster`. Every line produces either `line N: ok` or one
//! `line N: <error>` per broken rule.

use crate::subtest::{Subtest, TestResult};
use spirv_bif::memory::{verify_operation, OperationCategory, SyncOperation};
use std::fmt::Write;
use std::str::FromStr;

fn number(value: &str) -> Result<u32, String> {
    let parsed = match value.strip_prefix("0x") {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => value.parse::<u32>(),
    };

    parsed.map_err(|_| format!("`{value}` is not a number"))
}

fn named<T: FromStr<Err = &'static str>>(value: &str) -> Result<T, String> {
    value.parse::<T>().map_err(|e| format!("bad value `{value}`: {e}"))
}

fn parse_operation(line: &str) -> Result<SyncOperation, String> {
    let mut words = line.split_whitespace();
    let category = match words.next() {
        Some(word) => named::<OperationCategory>(word)?,
        None => return Err("expected an operation category".to_string()),
    };

    let mut op = SyncOperation {
        category,
        execution: None,
        memory: None,
        semantics: 0,
        unequal: None,
        pointer: None,
        group: None,
        cluster_size: None,
    };

    for word in words {
        let (key, value) = match word.split_once('=') {
            Some(pair) => pair,
            None => return Err(format!("expected `key=value`, got `{word}`")),
        };

        match key {
            "space" => op.pointer = Some(named(value)?),
            "execution" => op.execution = Some(named(value)?),
            "memory" => op.memory = Some(named(value)?),
            "semantics" => op.semantics = number(value)?,
            "unequal" => op.unequal = Some(number(value)?),
            "group" => op.group = Some(named(value)?),
            "cluster" => op.cluster_size = Some(number(value)?),
            _ => return Err(format!("unknown key `{key}`")),
        }
    }

    Ok(op)
}

fn verify_runner(_: &str, source: &str) -> TestResult {
    let mut out = String::default();

    for (i, line) in source.lines().enumerate() {
        let n = i + 1;
        let line = match line.find(';') {
            Some(idx) => &line[..idx],
            None => line,
        };

        if line.trim().is_empty() {
            continue;
        }

        let op = match parse_operation(line) {
            Ok(op) => op,
            Err(e) => return TestResult::CompileError(format!("line {n}: {e}")),
        };

        match verify_operation(&op) {
            Ok(()) => {
                let _ = writeln!(out, "line {n}: ok");
            }
            Err(errors) => {
                for e in errors {
                    let _ = writeln!(out, "line {n}: {e}");
                }
            }
        }
    }

    TestResult::Output(out)
}

/// Runs every operation in the file through the verifier.
pub const fn verify_subtest() -> Subtest {
    Subtest::new("verify", verify_runner)
}
