//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

#![warn(unreachable_pub, missing_docs)]
#![deny(
    missing_abi,
    rust_2018_idioms,
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links
)]

//! # spirv-bif
//!
//! Naming and validation for the builtin functions a SPIR-V consumer
//! lowers OpenCL-flavored instructions into.
//!
//! - [`ir`] models the C-like types and signatures of builtins
//! - [`mangle`] turns a [`ir::Signature`] into a deterministic symbol
//! - [`memory`] holds the scope, memory semantics and storage class
//!   vocabulary, and the rules that synchronizing operations follow
//! - [`table`] reads `.bif` builtin tables, expands the standard
//!   builtin families and emits C declarations for them
//!
//! ```
//! # use spirv_bif::ir::*;
//! # use spirv_bif::mangle::mangle;
//! let sig = SigBuilder::conversion("ConvertFToU")
//!     .ret(Type::uchar())
//!     .param(Type::half())
//!     .build();
//!
//! assert_eq!(mangle(&sig), "ConvertFToU_i8_f16_Ruchar");
//! ```

pub mod ir;
pub mod mangle;
pub mod memory;
pub mod table;
pub mod utility;

#[cfg(feature = "dev-tools")]
pub mod cli;
