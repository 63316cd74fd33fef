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

fn mangle_runner(name: &str, source: &str) -> TestResult {
    let table = match read_table(name, source) {
        Ok(table) => table,
        Err(result) => return result,
    };

    let mut out = String::default();

    for row in table.rows() {
        out += &row.symbol();
        out.push('\n');
    }

    TestResult::Output(out)
}

/// Every row of the table, one bare mangled symbol per line.
pub const fn mangle_subtest() -> Subtest {
    Subtest::new("mangle", mangle_runner)
}
