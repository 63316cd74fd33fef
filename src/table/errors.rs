//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::memory::{AddressSpace, OperationCategory};
use std::error::Error;
use std::fmt;

/// An error found while reading a `.bif` table.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct TableError {
    message: String,
    line: u32,
    col: u32,
    len: u32,
}

impl TableError {
    /// Creates an error pointing at `len` characters starting at `line:col`.
    /// Both `line` and `col` are 1-based.
    pub fn new(message: impl Into<String>, line: u32, col: u32, len: u32) -> Self {
        Self {
            message: message.into(),
            line,
            col,
            len: len.max(1),
        }
    }

    /// What went wrong.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The line the error is on.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// The column the error starts at.
    pub fn col(&self) -> u32 {
        self.col
    }

    /// The number of characters the error covers.
    pub fn len(&self) -> u32 {
        self.len
    }
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.col, self.message)
    }
}

impl Error for TableError {}

/// Formats a [`TableError`] into a human-readable diagnostic, with the
/// offending line and the offending characters underlined.
///
/// ```
/// # use spirv_bif::table::*;
/// let source = "ConvertFToU tagged : uchar (hlaf)\n";
/// let err = parse_table(source).unwrap_err();
/// let text = format_table_error("conv.bif", source, &err);
///
/// assert!(text.starts_with("  --> conv.bif:1:29"));
/// assert!(text.contains("^^^^"));
/// ```
pub fn format_table_error(name: &str, source: &str, err: &TableError) -> String {
    let line = source.lines().nth((err.line.max(1) - 1) as usize).unwrap_or("");

    let (line_n, col_n) = (err.line.to_string(), err.col.to_string());
    let mut error = String::default();

    let num_padding = " ".repeat(line_n.len());
    let col_padding = " ".repeat((err.col.max(1) - 1) as usize);
    let underline = "^".repeat(err.len as usize);

    error += &format!("  --> {name}:{line_n}:{col_n}\n");
    error += &format!(" {num_padding} |\n");
    error += &format!(" {line_n} | {line}\n");
    error += &format!(" {num_padding} | {col_padding}{underline}\n");
    error += &format!(" {num_padding} |\n");
    error += &format!(" {num_padding} = {}", err.message);

    error
}

/// An error found while emitting declarations for a table.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub enum EmitError {
    /// Two different signatures mangle to the same symbol.
    DuplicateSymbol {
        /// The full symbol, including the prefix.
        symbol: String,
        /// The index of the first row with the symbol.
        first: usize,
        /// The index of the row that collided with it.
        second: usize,
    },
    /// A pointer operand is in an address space the row's category rejects.
    IllegalAddressSpace {
        /// The symbol of the row.
        symbol: String,
        /// The category of the row.
        category: OperationCategory,
        /// The address space of the pointer.
        space: AddressSpace,
    },
    /// A row of a category that takes a pointer has none.
    MissingPointer {
        /// The symbol of the row.
        symbol: String,
        /// The category of the row.
        category: OperationCategory,
    },
}

impl fmt::Display for EmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmitError::DuplicateSymbol { symbol, first, second } => write!(
                f,
                "rows {first} and {second} have different signatures but both mangle to `{symbol}`"
            ),
            EmitError::IllegalAddressSpace {
                symbol,
                category,
                space,
            } => write!(
                f,
                "`{symbol}` is a `{category}` operation and cannot take a pointer to `{space}` memory"
            ),
            EmitError::MissingPointer { symbol, category } => write!(
                f,
                "`{symbol}` is a `{category}` operation but has no pointer operand"
            ),
        }
    }
}

impl Error for EmitError {}
