//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::ir::{Namespace, ReturnMangling, RoundingMode, Signature, Type};
use smallvec::SmallVec;

/// Helper for building a [`Signature`].
///
/// ```
/// # use spirv_bif::ir::*;
/// let sig = SigBuilder::conversion("ConvertFToU")
///     .ret(Type::uchar())
///     .param(Type::half())
///     .build();
///
/// assert_eq!(sig.return_mangling(), ReturnMangling::Tagged);
/// assert_eq!(sig.params(), &[Type::half()]);
/// ```
#[derive(Debug, Clone)]
pub struct SigBuilder {
    name: String,
    ret: Type,
    params: SmallVec<[Type; 4]>,
    rounding: Option<RoundingMode>,
    saturate: bool,
    ret_mangling: ReturnMangling,
    namespace: Namespace,
}

impl SigBuilder {
    /// Creates a [`SigBuilder`] for the signature `void name()`, with the
    /// result not being part of the mangled name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ret: Type::void(),
            params: SmallVec::default(),
            rounding: None,
            saturate: false,
            ret_mangling: ReturnMangling::Inferred,
            namespace: Namespace::Core,
        }
    }

    /// Creates a [`SigBuilder`] for one of the conversion families. These
    /// can't infer their result from their operand, so the result is tagged.
    pub fn conversion(name: &str) -> Self {
        Self::new(name).ret_mangling(ReturnMangling::Tagged)
    }

    /// Creates a [`SigBuilder`] for a function in the `OpenCL.std`
    /// extended instruction set.
    pub fn ocl(name: &str) -> Self {
        Self::new(name).namespace(Namespace::OpenCL)
    }

    /// Marks the signature as having a given return type.
    pub fn ret(mut self, ret: Type) -> Self {
        self.ret = ret;

        self
    }

    /// Appends a parameter to the signature
    pub fn param(mut self, param: Type) -> Self {
        self.params.push(param);

        self
    }

    /// Appends a list of parameters to the signature
    pub fn params(mut self, params: &[Type]) -> Self {
        self.params.extend(params.iter().cloned());

        self
    }

    /// Sets the explicit rounding mode. `None` is the IEEE default.
    pub fn rounding(mut self, rounding: Option<RoundingMode>) -> Self {
        self.rounding = rounding;

        self
    }

    /// Marks the operation as saturating (or not).
    pub fn saturate(mut self, value: bool) -> Self {
        self.saturate = value;

        self
    }

    /// Overrides how the result type is mangled.
    pub fn ret_mangling(mut self, mangling: ReturnMangling) -> Self {
        self.ret_mangling = mangling;

        self
    }

    /// Sets the instruction set the builtin is declared in.
    pub fn namespace(mut self, namespace: Namespace) -> Self {
        self.namespace = namespace;

        self
    }

    /// Builds the signature
    pub fn build(self) -> Signature {
        Signature::new(
            self.name,
            self.params,
            self.ret,
            self.rounding,
            self.saturate,
            self.ret_mangling,
            self.namespace,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::AddressSpace;

    #[test]
    fn params_keeps_nested_types() {
        let ptr = Type::ptr(AddressSpace::Global, Type::float());
        let arr = Type::array(Type::int(), 4);
        let callback = Type::function_ptr(AddressSpace::Private, Type::void(), &[Type::int()], true);

        let sig = SigBuilder::ocl("fract")
            .ret(Type::float())
            .param(Type::float())
            .params(&[ptr.clone(), arr.clone(), callback.clone()])
            .build();

        assert_eq!(sig.params(), &[Type::float(), ptr, arr, callback]);
        assert_eq!(sig.namespace(), Namespace::OpenCL);
        assert_eq!(sig.return_mangling(), ReturnMangling::Inferred);
    }

    #[test]
    fn params_appends_in_order() {
        let sig = SigBuilder::new("OpIAddCarry")
            .params(&[Type::int()])
            .params(&[Type::uint(), Type::long()])
            .build();

        assert_eq!(sig.params(), &[Type::int(), Type::uint(), Type::long()]);
        assert_eq!(sig.namespace(), Namespace::Core);
    }
}
