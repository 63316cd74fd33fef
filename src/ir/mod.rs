//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

//! Provides the types that describe a single builtin overload.
//!
//! A [`Type`] is the structural description of one operand or result, and
//! a [`Signature`] ties a base name, operand types, a result type and the
//! conversion modifiers together. Signatures are what the mangler consumes.

mod builders;
mod signature;
mod types;

pub use builders::*;
pub use signature::*;
pub use types::*;
