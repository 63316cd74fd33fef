//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::ir::{Float, FloatFormat, Int, Opaque, RoundingMode, Scalar, SigBuilder, Type, LEGAL_LANES};
use crate::memory::{legal_address_spaces, AddressSpace, OperationCategory};
use crate::table::Builtin;
use std::fmt;
use std::iter;
use std::str::FromStr;

#[cfg(feature = "enable-serde")]
use serde::{Deserialize, Serialize};

/// The built-in, data-driven groups of overloads.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub enum Family {
    /// Every numeric conversion, with every saturation and rounding variant.
    Conversions,
    /// Atomic loads, stores, read-modify-writes and compare-exchanges.
    Atomics,
    /// Control, memory and named barriers.
    Barriers,
    /// Group votes, broadcasts and arithmetic collectives.
    Groups,
    /// The `OpenCL.std` math, integer, geometric and select functions.
    Math,
}

impl Family {
    /// Every family.
    pub const ALL: [Family; 5] = [
        Family::Conversions,
        Family::Atomics,
        Family::Barriers,
        Family::Groups,
        Family::Math,
    ];

    /// Generates every row of the family, in a stable order.
    pub fn expand(self) -> Vec<Builtin> {
        let mut rows = Vec::default();

        match self {
            Family::Conversions => conversions(&mut rows),
            Family::Atomics => atomics(&mut rows),
            Family::Barriers => barriers(&mut rows),
            Family::Groups => groups(&mut rows),
            Family::Math => math(&mut rows),
        }

        rows
    }
}

impl FromStr for Family {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "conversions" => Ok(Family::Conversions),
            "atomics" => Ok(Family::Atomics),
            "barriers" => Ok(Family::Barriers),
            "groups" => Ok(Family::Groups),
            "math" => Ok(Family::Math),
            _ => Err("the families are `conversions`, `atomics`, `barriers`, `groups` and `math`"),
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Family::Conversions => write!(f, "conversions"),
            Family::Atomics => write!(f, "atomics"),
            Family::Barriers => write!(f, "barriers"),
            Family::Groups => write!(f, "groups"),
            Family::Math => write!(f, "math"),
        }
    }
}

const SIGNED: [Int; 4] = [Int::char(), Int::short(), Int::int(), Int::long()];

const UNSIGNED: [Int; 4] = [Int::uchar(), Int::ushort(), Int::uint(), Int::ulong()];

const FLOATS: [Float; 3] = [Float::half(), Float::float(), Float::double()];

// `1` stands in for the scalar itself
fn shapes() -> impl Iterator<Item = u32> {
    iter::once(1).chain(LEGAL_LANES)
}

fn shaped(scalar: impl Into<Scalar>, lanes: u32) -> Type {
    let scalar = scalar.into();

    if lanes == 1 {
        Type::Scalar(scalar)
    } else {
        Type::vector(scalar, lanes)
    }
}

fn roundings() -> impl Iterator<Item = Option<RoundingMode>> {
    iter::once(None).chain(RoundingMode::ALL.map(Some))
}

fn conversion(rows: &mut Vec<Builtin>, name: &str, from: Type, to: Type, sat: bool, rounding: Option<RoundingMode>) {
    let sig = SigBuilder::conversion(name)
        .ret(to)
        .param(from)
        .saturate(sat)
        .rounding(rounding)
        .build();

    rows.push(Builtin::new(sig));
}

fn conversions(rows: &mut Vec<Builtin>) {
    for lanes in shapes() {
        // float -> int, saturating or not, every rounding
        for (name, ints) in [("ConvertFToU", UNSIGNED), ("ConvertFToS", SIGNED)] {
            for from in FLOATS {
                for to in ints {
                    for sat in [false, true] {
                        for rounding in roundings() {
                            conversion(rows, name, shaped(from, lanes), shaped(to, lanes), sat, rounding);
                        }
                    }
                }
            }
        }

        // int -> float, every rounding
        for (name, ints) in [("ConvertSToF", SIGNED), ("ConvertUToF", UNSIGNED)] {
            for from in ints {
                for to in FLOATS {
                    for rounding in roundings() {
                        conversion(rows, name, shaped(from, lanes), shaped(to, lanes), false, rounding);
                    }
                }
            }
        }

        for from in FLOATS {
            for to in FLOATS.into_iter().filter(|to| *to != from) {
                for rounding in roundings() {
                    conversion(rows, "FConvert", shaped(from, lanes), shaped(to, lanes), false, rounding);
                }
            }
        }

        // int -> int with the same signedness only changes width
        for (name, ints) in [("SConvert", SIGNED), ("UConvert", UNSIGNED)] {
            for from in ints {
                for to in ints.into_iter().filter(|to| to.width() != from.width()) {
                    for sat in [false, true] {
                        conversion(rows, name, shaped(from, lanes), shaped(to, lanes), sat, None);
                    }
                }
            }
        }

        for (name, from_ints, to_ints) in [("SatConvertSToU", SIGNED, UNSIGNED), ("SatConvertUToS", UNSIGNED, SIGNED)] {
            for from in from_ints {
                for to in to_ints {
                    conversion(rows, name, shaped(from, lanes), shaped(to, lanes), false, None);
                }
            }
        }
    }
}

const RMW_OPS: [(&str, bool); 10] = [
    ("AtomicExchange", true),
    ("AtomicIAdd", true),
    ("AtomicISub", true),
    ("AtomicSMin", true),
    ("AtomicUMin", false),
    ("AtomicSMax", true),
    ("AtomicUMax", false),
    ("AtomicAnd", true),
    ("AtomicOr", true),
    ("AtomicXor", true),
];

fn atomics(rows: &mut Vec<Builtin>) {
    let int = Type::int();

    for (signed, unsigned) in [(Int::int(), Int::uint()), (Int::long(), Int::ulong())] {
        let value = Type::from(signed);

        for &space in legal_address_spaces(OperationCategory::AtomicLoad) {
            let ptr = Type::ptr(space, value.clone());

            let load = SigBuilder::new("AtomicLoad")
                .ret(value.clone())
                .params(&[ptr.clone(), int.clone(), int.clone()])
                .build();

            rows.push(Builtin::synchronizing(load, OperationCategory::AtomicLoad));

            let store = SigBuilder::new("AtomicStore")
                .params(&[ptr.clone(), int.clone(), int.clone(), value.clone()])
                .build();

            rows.push(Builtin::synchronizing(store, OperationCategory::AtomicStore));

            for (name, is_signed) in RMW_OPS {
                let ty = Type::from(if is_signed { signed } else { unsigned });
                let rmw = SigBuilder::new(name)
                    .ret(ty.clone())
                    .params(&[Type::ptr(space, ty.clone()), int.clone(), int.clone(), ty])
                    .build();

                rows.push(Builtin::synchronizing(rmw, OperationCategory::AtomicRmw));
            }

            for name in ["AtomicIIncrement", "AtomicIDecrement"] {
                let rmw = SigBuilder::new(name)
                    .ret(value.clone())
                    .params(&[ptr.clone(), int.clone(), int.clone()])
                    .build();

                rows.push(Builtin::synchronizing(rmw, OperationCategory::AtomicRmw));
            }

            let cas = SigBuilder::new("AtomicCompareExchange")
                .ret(value.clone())
                .params(&[
                    ptr,
                    int.clone(),
                    int.clone(),
                    int.clone(),
                    value.clone(),
                    value.clone(),
                ])
                .build();

            rows.push(Builtin::synchronizing(cas, OperationCategory::AtomicCompareExchange));
        }
    }

    for float in [Float::float(), Float::double()] {
        let value = Type::from(float);

        for &space in legal_address_spaces(OperationCategory::AtomicRmw) {
            let ptr = Type::ptr(space, value.clone());

            for name in ["AtomicExchange", "AtomicFAddEXT", "AtomicFMinEXT", "AtomicFMaxEXT"] {
                let rmw = SigBuilder::new(name)
                    .ret(value.clone())
                    .params(&[ptr.clone(), int.clone(), int.clone(), value.clone()])
                    .build();

                rows.push(Builtin::synchronizing(rmw, OperationCategory::AtomicRmw));
            }

            let load = SigBuilder::new("AtomicLoad")
                .ret(value.clone())
                .params(&[ptr.clone(), int.clone(), int.clone()])
                .build();

            rows.push(Builtin::synchronizing(load, OperationCategory::AtomicLoad));

            let store = SigBuilder::new("AtomicStore")
                .params(&[ptr, int.clone(), int.clone(), value.clone()])
                .build();

            rows.push(Builtin::synchronizing(store, OperationCategory::AtomicStore));
        }
    }
}

fn barriers(rows: &mut Vec<Builtin>) {
    let int = Type::int();

    let control = SigBuilder::new("ControlBarrier")
        .params(&[int.clone(), int.clone(), int.clone()])
        .build();

    rows.push(Builtin::synchronizing(control, OperationCategory::ControlBarrier));

    let memory = SigBuilder::new("MemoryBarrier")
        .params(&[int.clone(), int.clone()])
        .build();

    rows.push(Builtin::synchronizing(memory, OperationCategory::MemoryBarrier));

    for &space in legal_address_spaces(OperationCategory::NamedBarrier) {
        let barrier = Type::ptr(space, Type::opaque(Opaque::NamedBarrier));

        let init = SigBuilder::new("NamedBarrierInitialize")
            .ret(barrier.clone())
            .param(int.clone())
            .build();

        rows.push(Builtin::new(init));

        let named = SigBuilder::new("MemoryNamedBarrier")
            .params(&[barrier, int.clone(), int.clone()])
            .build();

        rows.push(Builtin::synchronizing(named, OperationCategory::NamedBarrier));
    }
}

const GROUP_INT_OPS: [(&str, bool); 5] = [
    ("IAdd", true),
    ("SMin", true),
    ("UMin", false),
    ("SMax", true),
    ("UMax", false),
];

const GROUP_FLOAT_OPS: [&str; 3] = ["FAdd", "FMin", "FMax"];

fn group(rows: &mut Vec<Builtin>, name: &str, ret: Type, params: &[Type]) {
    let sig = SigBuilder::new(name).ret(ret).params(params).build();

    rows.push(Builtin::synchronizing(sig, OperationCategory::Group));
}

fn groups(rows: &mut Vec<Builtin>) {
    let (int, uint, bool) = (Type::int(), Type::uint(), Type::bool());

    for name in ["GroupAll", "GroupAny"] {
        group(rows, name, bool.clone(), &[int.clone(), bool.clone()]);
    }

    let broadcastable = SIGNED
        .into_iter()
        .map(Scalar::Int)
        .chain(FLOATS.into_iter().map(Scalar::Float));

    for scalar in broadcastable {
        let value = Type::Scalar(scalar);

        for id in [uint.clone(), Type::uint_vec(2), Type::uint_vec(3)] {
            group(rows, "GroupBroadcast", value.clone(), &[int.clone(), value.clone(), id]);
        }
    }

    let arithmetic = GROUP_INT_OPS
        .into_iter()
        .flat_map(|(op, is_signed)| {
            let ints = if is_signed { [Int::int(), Int::long()] } else { [Int::uint(), Int::ulong()] };

            ints.into_iter().map(move |i| (op, Type::from(i)))
        })
        .chain(
            GROUP_FLOAT_OPS
                .into_iter()
                .flat_map(|op| FLOATS.into_iter().map(move |f| (op, Type::from(f)))),
        );

    for (op, value) in arithmetic {
        let params = [int.clone(), int.clone(), value.clone()];

        group(rows, &format!("Group{op}"), value.clone(), &params);
        group(rows, &format!("GroupNonUniform{op}"), value.clone(), &params);

        // the clustered-reduce overload carries the cluster size
        group(
            rows,
            &format!("GroupNonUniform{op}"),
            value.clone(),
            &[int.clone(), int.clone(), value, uint.clone()],
        );
    }
}

const UNARY_MATH: [&str; 44] = [
    "acos", "acosh", "acospi", "asin", "asinh", "asinpi", "atan", "atanh", "atanpi", "cbrt", "ceil", "cos", "cosh",
    "cospi", "degrees", "erf", "erfc", "exp", "exp2", "exp10", "expm1", "fabs", "floor", "lgamma", "log", "log2",
    "log10", "log1p", "logb", "radians", "rint", "round", "rsqrt", "sign", "sin", "sinh", "sinpi", "sqrt", "sqrt_cr",
    "tan", "tanh", "tanpi", "tgamma", "trunc",
];

const BINARY_MATH: [&str; 17] = [
    "atan2", "atan2pi", "copysign", "fdim", "fmax", "fmax_common", "fmin", "fmin_common", "fmod", "hypot", "maxmag",
    "minmag", "nextafter", "pow", "powr", "remainder", "step",
];

const TERNARY_MATH: [&str; 5] = ["fclamp", "fma", "mad", "mix", "smoothstep"];

// `native_` exists for every float, `half_` only for `float`
const UNARY_FAST: [&str; 12] = [
    "cos", "exp", "exp2", "exp10", "log", "log2", "log10", "recip", "rsqrt", "sin", "sqrt", "tan",
];

const BINARY_FAST: [&str; 2] = ["divide", "powr"];

// functions that write a second result through a pointer of the same type
const OUT_SAME: [&str; 3] = ["fract", "modf", "sincos"];

// functions that write an `int` (per lane) through a pointer
const OUT_INT: [&str; 2] = ["frexp", "lgamma_r"];

const OUT_SPACES: [AddressSpace; 4] = [
    AddressSpace::Private,
    AddressSpace::Global,
    AddressSpace::Local,
    AddressSpace::Generic,
];

// takes an `int` (per lane) exponent
const INT_EXPONENT: [&str; 3] = ["ldexp", "pown", "rootn"];

fn ocl(rows: &mut Vec<Builtin>, name: &str, ret: Type, params: &[Type]) {
    let sig = SigBuilder::ocl(name).ret(ret).params(params).build();

    rows.push(Builtin::new(sig));
}

// the integer with the same width as `float`
fn same_width(float: Float, signed: bool) -> Int {
    let int = match float.format() {
        FloatFormat::Half => Int::short(),
        FloatFormat::Single => Int::int(),
        FloatFormat::Double => Int::long(),
    };

    int.with_signedness(signed)
}

fn math(rows: &mut Vec<Builtin>) {
    for float in FLOATS {
        for lanes in shapes() {
            float_math(rows, float, lanes);
        }

        geometric(rows, float);
    }

    for (signed, unsigned) in SIGNED.into_iter().zip(UNSIGNED) {
        for lanes in shapes() {
            integer_math(rows, signed, unsigned, lanes);
        }
    }
}

fn float_math(rows: &mut Vec<Builtin>, float: Float, lanes: u32) {
    let ty = shaped(float, lanes);
    let int = shaped(Int::int(), lanes);

    let arities = [(&UNARY_MATH[..], 1), (&BINARY_MATH[..], 2), (&TERNARY_MATH[..], 3)];

    for (names, arity) in arities {
        let params = vec![ty.clone(); arity];

        for name in names {
            ocl(rows, name, ty.clone(), &params);
        }
    }

    let fast_prefixes: &[&str] = if float == Float::float() { &["native_", "half_"] } else { &["native_"] };

    for prefix in fast_prefixes {
        for (names, arity) in [(&UNARY_FAST[..], 1), (&BINARY_FAST[..], 2)] {
            let params = vec![ty.clone(); arity];

            for name in names {
                ocl(rows, &format!("{prefix}{name}"), ty.clone(), &params);
            }
        }
    }

    for space in OUT_SPACES {
        for name in OUT_SAME {
            ocl(rows, name, ty.clone(), &[ty.clone(), Type::ptr(space, ty.clone())]);
        }

        for name in OUT_INT {
            ocl(rows, name, ty.clone(), &[ty.clone(), Type::ptr(space, int.clone())]);
        }

        let quo = Type::ptr(space, int.clone());

        ocl(rows, "remquo", ty.clone(), &[ty.clone(), ty.clone(), quo]);
    }

    for name in INT_EXPONENT {
        ocl(rows, name, ty.clone(), &[ty.clone(), int.clone()]);
    }

    ocl(rows, "ilogb", int, &[ty.clone()]);
    ocl(rows, "nan", ty.clone(), &[shaped(same_width(float, false), lanes)]);

    let mask = shaped(same_width(float, true), lanes);

    ocl(rows, "select", ty.clone(), &[ty.clone(), ty.clone(), mask]);
    ocl(rows, "bitselect", ty.clone(), &[ty.clone(), ty.clone(), ty]);
}

// geometric functions only take up to 4 lanes
fn geometric(rows: &mut Vec<Builtin>, float: Float) {
    let scalar = Type::from(float);
    let prefixes: &[&str] = if float == Float::float() { &["", "fast_"] } else { &[""] };

    for lanes in [1, 2, 3, 4] {
        let ty = shaped(float, lanes);

        for prefix in prefixes {
            ocl(rows, &format!("{prefix}length"), scalar.clone(), &[ty.clone()]);
            ocl(rows, &format!("{prefix}distance"), scalar.clone(), &[ty.clone(), ty.clone()]);
            ocl(rows, &format!("{prefix}normalize"), ty.clone(), &[ty.clone()]);
        }

        if lanes >= 3 {
            ocl(rows, "cross", ty.clone(), &[ty.clone(), ty]);
        }
    }
}

const INT_BINARY: [&str; 6] = ["add_sat", "hadd", "max", "mul_hi", "rhadd", "sub_sat"];

const INT_TERNARY: [&str; 3] = ["clamp", "mad_hi", "mad_sat"];

// `s_` and `u_` pairs share an operand code, so the prefix keeps them apart
fn integer_math(rows: &mut Vec<Builtin>, signed: Int, unsigned: Int, lanes: u32) {
    let (sty, uty) = (shaped(signed, lanes), shaped(unsigned, lanes));

    for (prefix, ty) in [("s_", &sty), ("u_", &uty)] {
        // `abs` and `abs_diff` always produce the unsigned type
        ocl(rows, &format!("{prefix}abs"), uty.clone(), &[ty.clone()]);
        ocl(rows, &format!("{prefix}abs_diff"), uty.clone(), &[ty.clone(), ty.clone()]);

        for name in INT_BINARY {
            ocl(rows, &format!("{prefix}{name}"), ty.clone(), &[ty.clone(), ty.clone()]);
        }

        for name in INT_TERNARY {
            ocl(rows, &format!("{prefix}{name}"), ty.clone(), &[ty.clone(), ty.clone(), ty.clone()]);
        }

        if signed.width() == 32 {
            ocl(rows, &format!("{prefix}mul24"), ty.clone(), &[ty.clone(), ty.clone()]);
            ocl(rows, &format!("{prefix}mad24"), ty.clone(), &[ty.clone(), ty.clone(), ty.clone()]);
        }
    }

    // `hi` keeps the signedness, `lo` is always unsigned
    if let Some(wide) = SIGNED.into_iter().find(|wide| wide.width() == signed.width() * 2) {
        let (swide, uwide) = (shaped(wide, lanes), shaped(wide.with_signedness(false), lanes));

        ocl(rows, "s_upsample", swide, &[sty.clone(), uty.clone()]);
        ocl(rows, "u_upsample", uwide, &[uty.clone(), uty.clone()]);
    }

    for name in ["clz", "ctz", "popcount"] {
        ocl(rows, name, sty.clone(), &[sty.clone()]);
    }

    ocl(rows, "rotate", sty.clone(), &[sty.clone(), sty.clone()]);
    ocl(rows, "bitselect", sty.clone(), &[sty.clone(), sty.clone(), sty.clone()]);

    if lanes == 1 {
        ocl(rows, "select", sty.clone(), &[sty.clone(), sty.clone(), sty]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Namespace;
    use crate::utility::SaHashMap;

    #[test]
    fn every_symbol_is_unique() {
        let mut seen = SaHashMap::default();

        for family in Family::ALL {
            for row in family.expand() {
                let key = (row.signature().namespace(), row.symbol());

                if let Some(previous) = seen.insert(key, row.clone()) {
                    panic!("{:?} and {:?} mangle to the same symbol", previous, row);
                }
            }
        }
    }

    #[test]
    fn atomic_pointers_are_legal() {
        for row in Family::Atomics.expand() {
            let category = row.category().unwrap();
            let ptr = row.signature().params()[0].unwrap_ptr();

            assert!(category.is_atomic());
            assert!(legal_address_spaces(category).contains(&ptr.address_space()));
            assert_ne!(ptr.address_space(), AddressSpace::Constant);
        }
    }

    #[test]
    fn conversions_contain_the_documented_examples() {
        let symbols: Vec<String> = Family::Conversions.expand().iter().map(Builtin::symbol).collect();

        for expected in [
            "ConvertFToU_i8_f16_Ruchar",
            "ConvertFToU_Sat_RTE_i8_f16_sat_rte_Ruchar",
            "SConvert_Sat_v4i32_v4i8_sat_Rint4",
        ] {
            assert!(symbols.iter().any(|s| s == expected), "missing `{expected}`");
        }
    }

    #[test]
    fn math_is_in_the_opencl_namespace() {
        let rows = Family::Math.expand();

        assert!(rows.iter().all(|row| row.signature().namespace() == Namespace::OpenCL));
        assert!(rows.iter().any(|row| row.symbol() == "fclamp_v16f64_v16f64_v16f64"));
        assert!(rows.iter().any(|row| row.symbol() == "degrees_f32"));
    }

    #[test]
    fn math_covers_mixed_operands() {
        let rows = Family::Math.expand();
        let symbols: Vec<String> = rows.iter().map(Builtin::symbol).collect();

        for expected in [
            "fract_f32_p1f32",
            "sincos_v2f16_p0v2f16",
            "frexp_v4f32_p1v4i32",
            "lgamma_r_f64_p4i32",
            "remquo_f32_f32_p3i32",
            "ldexp_v3f32_v3i32",
            "ilogb_v8f64",
            "nan_i16",
            "nan_v2i64",
            "select_v4f32_v4f32_v4i32",
            "select_i8_i8_i8",
            "bitselect_v16f16_v16f16_v16f16",
            "cross_v3f64_v3f64",
            "distance_v4f32_v4f32",
            "fast_normalize_v2f32",
            "native_divide_f64_f64",
            "half_recip_v16f32",
            "s_abs_v4i32",
            "u_abs_diff_v2i8_v2i8",
            "s_mad24_v3i32_v3i32_v3i32",
            "s_upsample_v4i16_v4i16",
            "u_upsample_i32_i32",
            "popcount_v8i64",
        ] {
            assert!(symbols.iter().any(|s| s == expected), "missing `{expected}`");
        }

        for absent in ["half_cos_f64", "fast_length_f16", "cross_v2f32_v2f32", "s_mad24_i64_i64_i64", "s_upsample_i64_i64"] {
            assert!(!symbols.iter().any(|s| s == absent), "unexpected `{absent}`");
        }
    }

    #[test]
    fn pointer_results_use_every_writable_space() {
        let spaces: Vec<AddressSpace> = Family::Math
            .expand()
            .iter()
            .filter(|row| row.signature().name() == "fract")
            .filter_map(|row| row.signature().params()[1].as_ptr().map(|ptr| ptr.address_space()))
            .collect();

        assert_eq!(spaces.len(), 18 * 4);

        for space in AddressSpace::ALL {
            let expected = if space == AddressSpace::Constant { 0 } else { 18 };

            assert_eq!(spaces.iter().filter(|s| **s == space).count(), expected);
        }
    }

    #[test]
    fn signed_abs_returns_unsigned() {
        let row = Family::Math
            .expand()
            .into_iter()
            .find(|row| row.symbol() == "s_abs_v4i32")
            .unwrap();

        assert_eq!(row.signature().return_ty(), &Type::uint_vec(4));
        assert_eq!(row.signature().params(), &[Type::int_vec(4)]);
    }

    #[test]
    fn family_names() {
        for family in Family::ALL {
            assert_eq!(family.to_string().parse::<Family>(), Ok(family));
        }
    }
}
