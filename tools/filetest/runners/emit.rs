//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::runners::read_table;
use crate::subtest::{Subtest, TestResult};
use spirv_bif::table::Emitter;

fn emit_runner(name: &str, source: &str) -> TestResult {
    let table = match read_table(name, source) {
        Ok(table) => table,
        Err(result) => return result,
    };

    match Emitter::new().emit(&table) {
        Ok(out) => TestResult::Output(out),
        Err(errors) => TestResult::CompileError(
            errors
                .iter()
                .map(|e| format!("error: {e}"))
                .collect::<Vec<_>>()
                .join("\n"),
        ),
    }
}

/// The full declarations that `bifgen` would write for the table.
pub const fn emit_subtest() -> Subtest {
    Subtest::new("emit", emit_runner)
}
