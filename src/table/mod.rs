//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

//! The declaration generator for the builtin library.
//!
//! Rows come from two places: the built-in [`Family`] tables, and `.bif`
//! text files read by [`parse_table`]. Every row is then checked and turned
//! into one C declaration by an [`Emitter`].

mod emit;
mod errors;
mod families;
mod reader;

pub use emit::*;
pub use errors::*;
pub use families::*;
pub use reader::*;

use crate::ir::Signature;
use crate::mangle;
use crate::memory::OperationCategory;

#[cfg(feature = "enable-serde")]
use serde::{Deserialize, Serialize};

/// One row of the builtin table, a single overload.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub struct Builtin {
    sig: Signature,
    category: Option<OperationCategory>,
}

impl Builtin {
    /// A builtin with no synchronization rules attached.
    pub fn new(sig: Signature) -> Self {
        Self { sig, category: None }
    }

    /// A synchronizing builtin, whose pointer operands are checked against
    /// the rules of `category`.
    pub fn synchronizing(sig: Signature, category: OperationCategory) -> Self {
        Self {
            sig,
            category: Some(category),
        }
    }

    /// The signature of the overload.
    #[inline]
    pub fn signature(&self) -> &Signature {
        &self.sig
    }

    /// The synchronization category, if this is a synchronizing builtin.
    #[inline]
    pub fn category(&self) -> Option<OperationCategory> {
        self.category
    }

    /// The mangled symbol, without any namespace prefix.
    pub fn symbol(&self) -> String {
        mangle::mangle(&self.sig)
    }
}

/// An ordered list of rows.
#[derive(Debug, Clone, Default)]
pub struct BuiltinTable {
    rows: Vec<Builtin>,
}

impl BuiltinTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a row.
    pub fn push(&mut self, row: Builtin) {
        self.rows.push(row);
    }

    /// Appends every row of a family.
    pub fn push_family(&mut self, family: Family) {
        let rows = family.expand();

        log::debug!("family `{family}` expanded into {} rows", rows.len());

        self.rows.extend(rows);
    }

    /// Appends every row of another table.
    pub fn append(&mut self, other: BuiltinTable) {
        self.rows.extend(other.rows);
    }

    /// The rows, in insertion order.
    pub fn rows(&self) -> &[Builtin] {
        &self.rows
    }

    /// The number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl FromIterator<Builtin> for BuiltinTable {
    fn from_iter<T: IntoIterator<Item = Builtin>>(iter: T) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a BuiltinTable {
    type Item = &'a Builtin;
    type IntoIter = std::slice::Iter<'a, Builtin>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
