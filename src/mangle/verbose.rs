//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::ir::{Scalar, Type};
use std::fmt;

/// Formats the verbose result tag of a conversion (without the leading
/// `R`), e.g. `uchar` or `int4`.
///
/// Unlike [`CompactCode`](crate::mangle::CompactCode) this keeps the
/// signedness. Only numeric scalars and vectors of them have a tag,
/// anything else is a precondition violation and panics.
///
/// ```
/// # use spirv_bif::ir::*;
/// # use spirv_bif::mangle::ResultTag;
/// assert_eq!(ResultTag(&Type::uchar()).to_string(), "uchar");
/// assert_eq!(ResultTag(&Type::int_vec(4)).to_string(), "int4");
/// ```
#[derive(Copy, Clone, Debug)]
pub struct ResultTag<'a>(pub &'a Type);

fn scalar_tag(scalar: Scalar) -> &'static str {
    match scalar {
        Scalar::Int(i) => i.c_name(),
        Scalar::Float(fp) => fp.c_name(),
        Scalar::Void | Scalar::Bool => {
            panic!("`{}` has no verbose result tag", scalar.c_name())
        }
    }
}

impl fmt::Display for ResultTag<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Type::Scalar(s) => write!(f, "{}", scalar_tag(*s)),
            Type::Vector(v) => write!(f, "{}{}", scalar_tag(v.element()), v.lanes()),
            other => panic!("`{other}` has no verbose result tag"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::AddressSpace;

    fn tag(ty: &Type) -> String {
        ResultTag(ty).to_string()
    }

    #[test]
    fn keeps_signedness() {
        assert_eq!(tag(&Type::char()), "char");
        assert_eq!(tag(&Type::uchar()), "uchar");
        assert_eq!(tag(&Type::short()), "short");
        assert_eq!(tag(&Type::ushort()), "ushort");
        assert_eq!(tag(&Type::uint()), "uint");
        assert_eq!(tag(&Type::long()), "long");
        assert_eq!(tag(&Type::ulong()), "ulong");
        assert_eq!(tag(&Type::half()), "half");
        assert_eq!(tag(&Type::float()), "float");
        assert_eq!(tag(&Type::double()), "double");
    }

    #[test]
    fn vectors_get_lane_suffix() {
        assert_eq!(tag(&Type::int_vec(4)), "int4");
        assert_eq!(tag(&Type::ushort_vec(16)), "ushort16");
        assert_eq!(tag(&Type::double_vec(3)), "double3");
    }

    #[test]
    #[should_panic]
    fn void_has_no_tag() {
        let _ = tag(&Type::void());
    }

    #[test]
    #[should_panic]
    fn pointers_have_no_tag() {
        let _ = tag(&Type::ptr(AddressSpace::Global, Type::int()));
    }
}
