//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

//! The vocabulary that parameterizes every atomic, barrier and group builtin.
//!
//! A synchronizing builtin takes some combination of:
//!
//! - A [`Scope`], saying which invocations the operation synchronizes with
//! - A [`MemorySemantics`] value, one ordering plus the kinds of memory
//!   the ordering applies to
//! - A pointer in some [`AddressSpace`] (derived from a [`StorageClass`])
//! - A [`GroupOperation`] for arithmetic group collectives
//!
//! Every one of these has a fixed numeric encoding that matches SPIR-V, and
//! [`verify_operation`] checks the rules that tie them together for each
//! [`OperationCategory`].

mod scope;
mod semantics;
mod storage;
mod verify;

pub use scope::*;
pub use semantics::*;
pub use storage::*;
pub use verify::*;
