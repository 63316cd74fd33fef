//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

//! Turns a [`Signature`] into the flat symbol that identifies one overload.
//!
//! A symbol is made of, in order:
//!
//! 1. The base name
//! 2. `_Sat` if the operation saturates, then `_RTE`/`_RTZ`/`_RTP`/`_RTN`
//!    if it has an explicit rounding mode
//! 3. One `_<code>` per type: the result first if the result mangling is
//!    [`ReturnMangling::Leading`] or [`ReturnMangling::Tagged`], then every
//!    operand (see [`CompactCode`])
//! 4. The lower-case mirror of step 2, `_sat` then `_rte` (etc.)
//! 5. `_R<tag>` if the result mangling is [`ReturnMangling::Tagged`]
//!    (see [`ResultTag`])
//!
//! ```
//! # use spirv_bif::ir::*;
//! # use spirv_bif::mangle::mangle;
//! let sig = SigBuilder::conversion("ConvertFToU")
//!     .ret(Type::uchar())
//!     .param(Type::half())
//!     .saturate(true)
//!     .rounding(Some(RoundingMode::RTE))
//!     .build();
//!
//! assert_eq!(mangle(&sig), "ConvertFToU_Sat_RTE_i8_f16_sat_rte_Ruchar");
//! ```

mod compact;
mod verbose;

pub use compact::*;
pub use verbose::*;

use crate::ir::{ReturnMangling, Signature};
use std::fmt;

/// Lazily formats the mangled symbol of a signature.
///
/// This is what [`mangle`] uses, it exists so that a symbol can be written
/// straight into some other buffer without an intermediate `String`.
#[derive(Copy, Clone, Debug)]
pub struct Mangled<'a>(pub &'a Signature);

impl fmt::Display for Mangled<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sig = self.0;

        write!(f, "{}", sig.name())?;

        if sig.is_saturating() {
            write!(f, "_Sat")?;
        }

        if let Some(rounding) = sig.rounding() {
            write!(f, "_{}", rounding.tag())?;
        }

        if sig.return_mangling() != ReturnMangling::Inferred {
            write!(f, "_{}", CompactCode(sig.return_ty()))?;
        }

        for param in sig.params() {
            write!(f, "_{}", CompactCode(param))?;
        }

        if sig.is_saturating() {
            write!(f, "_sat")?;
        }

        if let Some(rounding) = sig.rounding() {
            write!(f, "_{}", rounding.suffix())?;
        }

        if sig.return_mangling() == ReturnMangling::Tagged {
            write!(f, "_R{}", ResultTag(sig.return_ty()))?;
        }

        Ok(())
    }
}

/// Mangles a signature into its symbol.
///
/// This is a pure function of the signature's structure, two equal
/// signatures always produce the same symbol.
pub fn mangle(sig: &Signature) -> String {
    Mangled(sig).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Opaque, RoundingMode, SigBuilder, Type};
    use crate::memory::AddressSpace;

    #[test]
    fn conversion_without_modifiers() {
        let sig = SigBuilder::conversion("ConvertFToU")
            .ret(Type::uchar())
            .param(Type::half())
            .build();

        assert_eq!(mangle(&sig), "ConvertFToU_i8_f16_Ruchar");
    }

    #[test]
    fn conversion_with_saturation_and_rounding() {
        let sig = SigBuilder::conversion("ConvertFToU")
            .ret(Type::uchar())
            .param(Type::half())
            .saturate(true)
            .rounding(Some(RoundingMode::RTE))
            .build();

        assert_eq!(mangle(&sig), "ConvertFToU_Sat_RTE_i8_f16_sat_rte_Ruchar");
    }

    #[test]
    fn vector_conversion() {
        let sig = SigBuilder::conversion("SConvert")
            .ret(Type::int_vec(4))
            .param(Type::char_vec(4))
            .saturate(true)
            .build();

        assert_eq!(mangle(&sig), "SConvert_Sat_v4i32_v4i8_sat_Rint4");
    }

    #[test]
    fn rounding_only() {
        let sig = SigBuilder::conversion("ConvertSToF")
            .ret(Type::float())
            .param(Type::long())
            .rounding(Some(RoundingMode::RTZ))
            .build();

        assert_eq!(mangle(&sig), "ConvertSToF_RTZ_f32_i64_rtz_Rfloat");
    }

    #[test]
    fn inferred_results_are_left_out() {
        let sig = SigBuilder::ocl("fclamp")
            .ret(Type::float_vec(4))
            .params(&[Type::float_vec(4), Type::float_vec(4), Type::float_vec(4)])
            .build();

        assert_eq!(mangle(&sig), "fclamp_v4f32_v4f32_v4f32");
    }

    #[test]
    fn leading_results_have_no_tag() {
        let sig = SigBuilder::new("AtomicIAdd")
            .ret(Type::int())
            .ret_mangling(ReturnMangling::Leading)
            .params(&[
                Type::ptr(AddressSpace::Global, Type::int()),
                Type::int(),
                Type::int(),
                Type::int(),
            ])
            .build();

        assert_eq!(mangle(&sig), "AtomicIAdd_i32_p1i32_i32_i32_i32");
    }

    #[test]
    fn sign_does_not_change_operand_codes() {
        let signed = SigBuilder::new("OpUMulExtended")
            .params(&[Type::int(), Type::int()])
            .build();
        let unsigned = SigBuilder::new("OpUMulExtended")
            .params(&[Type::uint(), Type::uint()])
            .build();

        assert_eq!(mangle(&signed), mangle(&unsigned));
        assert_eq!(mangle(&signed), "OpUMulExtended_i32_i32");
    }

    #[test]
    fn opaque_handles_mangle_as_i64() {
        let with_sampler = SigBuilder::new("ImageSample")
            .params(&[Type::opaque(Opaque::Image), Type::opaque(Opaque::Sampler)])
            .build();
        let with_longs = SigBuilder::new("ImageSample")
            .params(&[Type::long(), Type::ulong()])
            .build();

        assert_eq!(mangle(&with_sampler), mangle(&with_longs));
    }

    #[test]
    fn deterministic() {
        let build = || {
            SigBuilder::conversion("UConvert")
                .ret(Type::ushort_vec(8))
                .param(Type::uint_vec(8))
                .build()
        };

        let (a, b) = (build(), build());

        assert_eq!(a, b);
        assert_eq!(mangle(&a), mangle(&b));
        assert_eq!(mangle(&a), mangle(&a));
    }

    #[test]
    #[should_panic]
    fn illegal_lanes_panic() {
        let _ = SigBuilder::new("Dot").param(Type::float_vec(5)).build();
    }

    #[test]
    #[should_panic]
    fn tagged_pointer_result_panics() {
        let sig = SigBuilder::conversion("GenericCastToPtr")
            .ret(Type::ptr(AddressSpace::Global, Type::int()))
            .param(Type::ptr(AddressSpace::Generic, Type::int()))
            .build();

        let _ = mangle(&sig);
    }

    #[test]
    fn no_parameters() {
        let sig = SigBuilder::new("BuiltInSubgroupSize").ret(Type::uint()).build();

        assert_eq!(mangle(&sig), "BuiltInSubgroupSize");
    }
}
