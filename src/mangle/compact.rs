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

/// Formats the compact operand code of a type, e.g. `v4i32` or `p1i8`.
///
/// Integer signedness is never part of the code, and every opaque handle
/// is spelled as `i64`.
///
/// ```
/// # use spirv_bif::ir::*;
/// # use spirv_bif::mangle::CompactCode;
/// # use spirv_bif::memory::AddressSpace;
/// assert_eq!(CompactCode(&Type::uchar_vec(4)).to_string(), "v4i8");
/// assert_eq!(CompactCode(&Type::ptr(AddressSpace::Global, Type::float())).to_string(), "p1f32");
/// ```
#[derive(Copy, Clone, Debug)]
pub struct CompactCode<'a>(pub &'a Type);

fn write_scalar(f: &mut fmt::Formatter<'_>, scalar: Scalar) -> fmt::Result {
    match scalar {
        Scalar::Void => write!(f, "v"),
        Scalar::Bool => write!(f, "i1"),
        Scalar::Int(i) => write!(f, "i{}", i.width()),
        Scalar::Float(fp) => write!(f, "f{}", fp.width()),
    }
}

impl fmt::Display for CompactCode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Type::Scalar(s) => write_scalar(f, *s),
            Type::Vector(v) => {
                write!(f, "v{}", v.lanes())?;
                write_scalar(f, v.element())
            }
            Type::Pointer(p) => write!(f, "p{}{}", p.address_space().digit(), CompactCode(p.pointee())),
            Type::Opaque(_) => write!(f, "i64"),
            Type::Array(a) => write!(f, "a{}{}", a.len(), CompactCode(a.element())),
            Type::FunctionPointer(fp) => {
                write!(f, "fp{}{}", fp.address_space().digit(), CompactCode(fp.return_ty()))?;

                for param in fp.params() {
                    write!(f, "{}", CompactCode(param))?;
                }

                if fp.is_variadic() {
                    write!(f, "x")?;
                }

                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Opaque;
    use crate::memory::AddressSpace;

    fn code(ty: &Type) -> String {
        CompactCode(ty).to_string()
    }

    #[test]
    fn scalars_ignore_sign() {
        assert_eq!(code(&Type::char()), "i8");
        assert_eq!(code(&Type::uchar()), "i8");
        assert_eq!(code(&Type::int()), code(&Type::uint()));
        assert_eq!(code(&Type::int()), "i32");
        assert_eq!(code(&Type::ulong()), "i64");
        assert_eq!(code(&Type::half()), "f16");
        assert_eq!(code(&Type::double()), "f64");
        assert_eq!(code(&Type::void()), "v");
        assert_eq!(code(&Type::bool()), "i1");
    }

    #[test]
    fn vectors() {
        assert_eq!(code(&Type::short_vec(2)), "v2i16");
        assert_eq!(code(&Type::float_vec(16)), "v16f32");
        assert_eq!(code(&Type::char_vec(3)), code(&Type::uchar_vec(3)));
    }

    #[test]
    fn opaque_handles_are_i64() {
        for handle in [Opaque::Image, Opaque::Sampler, Opaque::Queue, Opaque::Struct(7)] {
            assert_eq!(code(&Type::opaque(handle)), "i64");
        }
    }

    #[test]
    fn nested_shapes() {
        let ptr = Type::ptr(AddressSpace::Generic, Type::ptr(AddressSpace::Local, Type::uint_vec(4)));
        assert_eq!(code(&ptr), "p4p3v4i32");

        let arr = Type::array(Type::float(), 8);
        assert_eq!(code(&arr), "a8f32");

        let fp = Type::function_ptr(
            AddressSpace::Private,
            Type::void(),
            &[Type::int(), Type::ptr(AddressSpace::Global, Type::char())],
            true,
        );
        assert_eq!(code(&fp), "fp0vi32p1i8x");

        let fp = Type::function_ptr(AddressSpace::Global, Type::float(), &[], false);
        assert_eq!(code(&fp), "fp1f32");
    }
}
