//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::options::Options;
use spirv_bif::table::{format_table_error, parse_table, BuiltinTable, Emitter};
use spirv_bif::utility::SaHashSet;
use std::fs;
use std::io;
use std::io::ErrorKind;

/// Reads every input table, expands the requested families and emits
/// the result.
pub fn driver(options: &Options) -> io::Result<()> {
    let mut table = BuiltinTable::new();

    for input in options.base.inputs.iter() {
        let source = fs::read_to_string(input)?;
        let path = input.display().to_string();

        match parse_table(&source) {
            Ok(parsed) => {
                log::info!("read {} rows from `{path}`", parsed.len());

                table.append(parsed);
            }
            Err(e) => {
                eprintln!("error: {}\n{}\n", e.message(), format_table_error(&path, &source, &e));

                return Err(invalid("failed to read builtin table"));
            }
        }
    }

    for family in options.families.iter().copied() {
        table.push_family(family);
    }

    if table.is_empty() {
        log::warn!("no tables or families were given, nothing to emit");
    }

    let emitter = build_emitter(options);
    let output = match emitter.emit(&table) {
        Ok(output) => output,
        Err(errors) => {
            for e in errors.iter() {
                eprintln!("error: {e}");
            }

            return Err(invalid("builtin table has errors"));
        }
    };

    if options.check {
        return Ok(());
    }

    let output = if options.symbols {
        symbols_only(&emitter, &table)
    } else {
        output
    };

    match &options.base.output {
        Some(path) => fs::write(path, output),
        None => {
            print!("{output}");

            Ok(())
        }
    }
}

fn build_emitter(options: &Options) -> Emitter {
    let mut emitter = Emitter::new();

    if let Some(prefix) = &options.core_prefix {
        emitter = emitter.core_prefix(prefix);
    }

    if let Some(prefix) = &options.ocl_prefix {
        emitter = emitter.ocl_prefix(prefix);
    }

    emitter
}

// the table already passed `emit`, so duplicates here are exact copies
fn symbols_only(emitter: &Emitter, table: &BuiltinTable) -> String {
    let mut out = String::default();
    let mut seen = SaHashSet::default();

    for symbol in table.rows().iter().map(|row| emitter.symbol(row)) {
        if seen.insert(symbol.clone()) {
            out += &symbol;
            out.push('\n');
        }
    }

    out
}

fn invalid(message: &str) -> io::Error {
    io::Error::new(ErrorKind::InvalidInput, message.to_string())
}
