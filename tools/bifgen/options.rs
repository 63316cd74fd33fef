//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use bpaf::Parser;
use spirv_bif::table::Family;
use spirv_bif::{cli, cli::BaseOptions};

/// The options given by the user.
pub struct Options {
    /// The base tool options
    pub base: BaseOptions,
    /// Builtin families to expand in addition to the input tables
    pub families: Vec<Family>,
    /// The prefix for core builtins, if not the standard one
    pub core_prefix: Option<String>,
    /// The prefix for `OpenCL.std` builtins, if not the standard one
    pub ocl_prefix: Option<String>,
    /// Only print the mangled symbols, not full declarations
    pub symbols: bool,
    /// Only check the tables, don't output anything
    pub check: bool,
}

/// Parses the command line.
pub fn parse_options() -> Options {
    let ((families, all, core_prefix, ocl_prefix, symbols, check), base) = cli::tool_with(
        "builtin table reader and declaration generator",
        "Usage: bifgen [options] <tables>",
        bpaf::construct!(
            families(),
            all_families(),
            core_prefix(),
            ocl_prefix(),
            symbols(),
            check()
        ),
    )
    .run();

    let families = if all { Family::ALL.to_vec() } else { families };

    Options {
        base,
        families,
        core_prefix,
        ocl_prefix,
        symbols,
        check,
    }
}

fn families() -> impl Parser<Vec<Family>> {
    bpaf::long("family")
        .short('f')
        .help("a builtin family to expand, can be given multiple times")
        .argument::<Family>("FAMILY")
        .many()
}

fn all_families() -> impl Parser<bool> {
    bpaf::long("all-families")
        .help("expand every builtin family")
        .flag(true, false)
}

fn core_prefix() -> impl Parser<Option<String>> {
    bpaf::long("core-prefix")
        .help("the prefix for core builtins (default `__builtin_spirv_`)")
        .argument::<String>("PREFIX")
        .optional()
}

fn ocl_prefix() -> impl Parser<Option<String>> {
    bpaf::long("ocl-prefix")
        .help("the prefix for OpenCL.std builtins (default `__builtin_spirv_OpenCL_`)")
        .argument::<String>("PREFIX")
        .optional()
}

fn symbols() -> impl Parser<bool> {
    bpaf::long("symbols")
        .help("print one mangled symbol per line instead of declarations")
        .flag(true, false)
}

fn check() -> impl Parser<bool> {
    bpaf::long("check")
        .help("only check the tables for errors")
        .flag(true, false)
}
