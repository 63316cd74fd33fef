//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

mod emit;
mod mangle;
mod verify;

pub use emit::*;
pub use mangle::*;
pub use verify::*;

use crate::subtest::TestResult;
use spirv_bif::table::{format_table_error, parse_table, BuiltinTable};

// both table subtests start by reading the whole file as a table
fn read_table(name: &str, source: &str) -> Result<BuiltinTable, TestResult> {
    parse_table(source).map_err(|e| {
        TestResult::CompileError(format!(
            "error: {}\n{}",
            e.message(),
            format_table_error(name, source, &e)
        ))
    })
}
