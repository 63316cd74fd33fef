//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::ir::{Namespace, Type};
use crate::mangle::Mangled;
use crate::memory::legal_address_spaces;
use crate::table::{Builtin, BuiltinTable, EmitError};
use crate::utility::SaHashMap;
use std::fmt::Write;

/// The prefix of every core SPIR-V builtin.
pub const CORE_PREFIX: &str = "__builtin_spirv_";

/// The prefix of every `OpenCL.std` builtin.
pub const OPENCL_PREFIX: &str = "__builtin_spirv_OpenCL_";

/// Turns table rows into a C-like declaration listing.
///
/// Types are written in the same spelling the table reader accepts, so
/// scalars, vectors and single pointers read as OpenCL C, while nested
/// pointers (`generic local int**`), arrays (`float[4]`) and function
/// pointers (`private fn void(int, ...)`) keep the table's own notation.
/// The parameter list of every declaration reads back through
/// [`parse_table`](crate::table::parse_table) to the same types.
///
/// ```
/// # use spirv_bif::table::*;
/// let table = parse_table("ConvertFToU tagged : uchar (half)").unwrap();
/// let out = Emitter::new().emit(&table).unwrap();
///
/// assert_eq!(out, "uchar __builtin_spirv_ConvertFToU_i8_f16_Ruchar(half);\n");
/// ```
#[derive(Debug, Clone)]
pub struct Emitter {
    core_prefix: String,
    ocl_prefix: String,
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new()
    }
}

impl Emitter {
    /// Creates an emitter with the standard prefixes.
    pub fn new() -> Self {
        Self {
            core_prefix: CORE_PREFIX.to_string(),
            ocl_prefix: OPENCL_PREFIX.to_string(),
        }
    }

    /// Overrides the prefix for core builtins.
    pub fn core_prefix(mut self, prefix: &str) -> Self {
        self.core_prefix = prefix.to_string();

        self
    }

    /// Overrides the prefix for `OpenCL.std` builtins.
    pub fn ocl_prefix(mut self, prefix: &str) -> Self {
        self.ocl_prefix = prefix.to_string();

        self
    }

    /// The prefix that builtins in `namespace` get.
    pub fn prefix_for(&self, namespace: Namespace) -> &str {
        match namespace {
            Namespace::Core => &self.core_prefix,
            Namespace::OpenCL => &self.ocl_prefix,
        }
    }

    /// The full symbol of a row, prefix included.
    pub fn symbol(&self, row: &Builtin) -> String {
        let sig = row.signature();

        format!("{}{}", self.prefix_for(sig.namespace()), Mangled(sig))
    }

    /// Formats the declaration of a single row, without a newline. The
    /// types use the table spelling, see [`Emitter`].
    pub fn declaration(&self, row: &Builtin) -> String {
        let sig = row.signature();
        let mut out = format!("{} {}(", sig.return_ty(), self.symbol(row));

        if sig.params().is_empty() {
            out += "void";
        }

        for (i, param) in sig.params().iter().enumerate() {
            if i != 0 {
                out += ", ";
            }

            let _ = write!(out, "{param}");
        }

        out += ");";

        out
    }

    /// Checks every row and emits one declaration per line.
    ///
    /// Rows that are exact duplicates of an earlier row are skipped. If
    /// any row fails a check, every failure is returned instead.
    pub fn emit(&self, table: &BuiltinTable) -> Result<String, Vec<EmitError>> {
        let mut out = String::default();
        let mut errors = Vec::default();
        let mut seen: SaHashMap<String, usize> = SaHashMap::default();

        for (i, row) in table.rows().iter().enumerate() {
            let symbol = self.symbol(row);

            errors.extend(check_pointers(row, &symbol));

            if let Some(&first) = seen.get(&symbol) {
                if table.rows()[first] == *row {
                    log::warn!("row {i} is a duplicate of row {first} (`{symbol}`), skipping it");
                } else {
                    errors.push(EmitError::DuplicateSymbol {
                        symbol,
                        first,
                        second: i,
                    });
                }

                continue;
            }

            out += &self.declaration(row);
            out.push('\n');

            seen.insert(symbol, i);
        }

        log::debug!("emitted {} declarations from {} rows", seen.len(), table.len());

        if errors.is_empty() {
            Ok(out)
        } else {
            Err(errors)
        }
    }
}

// synchronizing rows may only point into the spaces their category allows
fn check_pointers(row: &Builtin, symbol: &str) -> Vec<EmitError> {
    let category = match row.category() {
        Some(category) => category,
        None => return Vec::default(),
    };

    let legal = legal_address_spaces(category);
    let pointers: Vec<_> = row.signature().params().iter().filter_map(Type::as_ptr).collect();

    if pointers.is_empty() && !legal.is_empty() {
        return vec![EmitError::MissingPointer {
            symbol: symbol.to_string(),
            category,
        }];
    }

    pointers
        .into_iter()
        .map(|ptr| ptr.address_space())
        .filter(|space| !legal.contains(space))
        .map(|space| EmitError::IllegalAddressSpace {
            symbol: symbol.to_string(),
            category,
            space,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{AddressSpace, OperationCategory};
    use crate::table::{parse_table, Family};

    #[test]
    fn prefixes_follow_the_namespace() {
        let table = parse_table("ocl degrees : float4 (float4)\nControlBarrier : void (int, int, int)").unwrap();
        let out = Emitter::new().emit(&table).unwrap();

        assert_eq!(
            out,
            "float4 __builtin_spirv_OpenCL_degrees_v4f32(float4);\n\
             void __builtin_spirv_ControlBarrier_i32_i32_i32(int, int, int);\n"
        );

        let out = Emitter::new().core_prefix("").ocl_prefix("ocl_").emit(&table).unwrap();

        assert_eq!(
            out,
            "float4 ocl_degrees_v4f32(float4);\nvoid ControlBarrier_i32_i32_i32(int, int, int);\n"
        );
    }

    #[test]
    fn empty_parameter_lists_are_void() {
        let table = parse_table("BuiltInSubgroupSize : uint ()").unwrap();

        assert_eq!(
            Emitter::new().emit(&table).unwrap(),
            "uint __builtin_spirv_BuiltInSubgroupSize(void);\n"
        );
    }

    #[test]
    fn declarations_keep_the_table_spelling() {
        let table = parse_table("Foo : int (generic local uint4**, float[8], private fn void(int, ...))").unwrap();
        let decl = Emitter::new().declaration(&table.rows()[0]);

        let open = decl.find('(').unwrap();
        let params = decl[open + 1..].strip_suffix(");").unwrap();

        assert_eq!(params, "generic local uint4**, float[8], private fn void(int, ...)");

        let reread = parse_table(&format!("Foo : int ({params})")).unwrap();

        assert_eq!(reread.rows()[0].signature().params(), table.rows()[0].signature().params());
    }

    #[test]
    fn exact_duplicates_are_skipped() {
        let table = parse_table("Foo : int (int)\nFoo : int (int)").unwrap();

        assert_eq!(
            Emitter::new().emit(&table).unwrap(),
            "int __builtin_spirv_Foo_i32(int);\n"
        );
    }

    #[test]
    fn colliding_signatures_are_rejected() {
        let table = parse_table("Foo : int (int)\nFoo : int (uint)").unwrap();

        assert_eq!(
            Emitter::new().emit(&table),
            Err(vec![EmitError::DuplicateSymbol {
                symbol: "__builtin_spirv_Foo_i32".to_string(),
                first: 0,
                second: 1,
            }])
        );
    }

    #[test]
    fn pointer_spaces_are_checked() {
        let table = parse_table(
            "AtomicIAdd atomic-rmw : int (constant int*, int, int, int)\n\
             MemoryNamedBarrier named-barrier : void (int, int)\n\
             GroupAll group : bool (int, bool)",
        )
        .unwrap();

        assert_eq!(
            Emitter::new().emit(&table),
            Err(vec![
                EmitError::IllegalAddressSpace {
                    symbol: "__builtin_spirv_AtomicIAdd_p2i32_i32_i32_i32".to_string(),
                    category: OperationCategory::AtomicRmw,
                    space: AddressSpace::Constant,
                },
                EmitError::MissingPointer {
                    symbol: "__builtin_spirv_MemoryNamedBarrier_i32_i32".to_string(),
                    category: OperationCategory::NamedBarrier,
                },
            ])
        );
    }

    #[test]
    fn every_family_emits_cleanly() {
        let mut table = BuiltinTable::new();

        for family in Family::ALL {
            table.push_family(family);
        }

        let out = Emitter::new().emit(&table).unwrap();

        assert_eq!(out.lines().count(), table.len());
        assert!(out.contains(
            "uchar __builtin_spirv_ConvertFToU_Sat_RTE_i8_f16_sat_rte_Ruchar(half);"
        ));
        assert!(out.contains(
            "int __builtin_spirv_AtomicIAdd_p1i32_i32_i32_i32(global int*, int, int, int);"
        ));
    }
}
