//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022 Evan Cox <evanacox00@gmail.com>. All rights reserved.      //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::memory::AddressSpace;
use paste::paste;
use std::fmt;

#[cfg(feature = "enable-serde")]
use serde::{Deserialize, Serialize};

/// The only lane counts that a [`Vector`] may have.
pub const LEGAL_LANES: [u32; 5] = [2, 3, 4, 8, 16];

/// Checks whether `lanes` is one of [`LEGAL_LANES`].
///
/// ```
/// # use spirv_bif::ir::*;
/// assert!(is_legal_lane_count(8));
/// assert!(!is_legal_lane_count(5));
/// ```
#[inline]
pub fn is_legal_lane_count(lanes: u32) -> bool {
    LEGAL_LANES.contains(&lanes)
}

/// Models the `char`..`ulong` family of integer types.
///
/// Integers have a width $N \in \\{8, 16, 32, 64\\}$ and a signedness. The
/// signedness never reaches an operand code, but it does reach the verbose
/// result tag of a conversion.
///
/// ```
/// # use spirv_bif::ir::*;
/// let t1 = Int::uchar();
/// assert_eq!(t1.width(), 8);
/// assert!(!t1.is_signed());
///
/// let t2 = Int::new(8, false).unwrap();
/// assert_eq!(t1, t2);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub struct Int {
    width: u32,
    signed: bool,
}

macro_rules! int_const_shorthand {
    ($n:tt, $signed:tt, $lower:ident) => {
        #[doc = concat!("Shorthand for the OpenCL `", stringify!($lower), "` type.")]
        #[doc = concat!("Exactly equivalent to `Int::new(", stringify!($n), ", ", stringify!($signed), ")`.")]
        pub const fn $lower() -> Self {
            Self::of_width_unchecked($n, $signed)
        }
    };
}

impl Int {
    #[inline]
    const fn of_width_unchecked(width: u32, signed: bool) -> Self {
        Self { width, signed }
    }

    /// Creates an `Int` with a given width and signedness, if `bit_width`
    /// is one of the supported widths.
    ///
    /// ```
    /// # use spirv_bif::ir::*;
    /// assert_eq!(Int::new(32, true), Some(Int::int()));
    /// assert_eq!(Int::new(24, true), None);
    /// ```
    #[inline]
    pub fn new(bit_width: u32, signed: bool) -> Option<Self> {
        match bit_width {
            8 | 16 | 32 | 64 => Some(Self::of_width_unchecked(bit_width, signed)),
            _ => None,
        }
    }

    int_const_shorthand!(8, true, char);
    int_const_shorthand!(8, false, uchar);
    int_const_shorthand!(16, true, short);
    int_const_shorthand!(16, false, ushort);
    int_const_shorthand!(32, true, int);
    int_const_shorthand!(32, false, uint);
    int_const_shorthand!(64, true, long);
    int_const_shorthand!(64, false, ulong);

    /// Gets the width of the integer in bits.
    #[inline]
    pub const fn width(self) -> u32 {
        self.width
    }

    /// Whether the integer is the signed variant.
    #[inline]
    pub const fn is_signed(self) -> bool {
        self.signed
    }

    /// Returns the same-width integer with the given signedness.
    ///
    /// ```
    /// # use spirv_bif::ir::*;
    /// assert_eq!(Int::int().with_signedness(false), Int::uint());
    /// ```
    #[inline]
    pub const fn with_signedness(self, signed: bool) -> Self {
        Self::of_width_unchecked(self.width, signed)
    }

    /// The OpenCL C spelling of the type, e.g. `ushort`.
    pub const fn c_name(self) -> &'static str {
        match (self.width, self.signed) {
            (8, true) => "char",
            (8, false) => "uchar",
            (16, true) => "short",
            (16, false) => "ushort",
            (32, true) => "int",
            (32, false) => "uint",
            (64, true) => "long",
            _ => "ulong",
        }
    }
}

/// Maps the IEEE-754 binary formats to enum variants.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub enum FloatFormat {
    /// `half`, an IEEE half-precision float (`binary16`).
    Half,
    /// `float`, an IEEE single-precision float (`binary32`).
    Single,
    /// `double`, an IEEE double-precision float (`binary64`).
    Double,
}

impl FloatFormat {
    /// The width of the format in bits.
    #[inline]
    pub const fn bits(self) -> u32 {
        match self {
            FloatFormat::Half => 16,
            FloatFormat::Single => 32,
            FloatFormat::Double => 64,
        }
    }
}

/// Models the `half`, `float` and `double` types.
///
/// ```
/// # use spirv_bif::ir::*;
/// let t1 = Float::new(FloatFormat::Half);
/// assert_eq!(t1, Float::half());
/// assert_eq!(t1.width(), 16);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub struct Float {
    format: FloatFormat,
}

impl Float {
    /// Creates a float type of a given IEEE format.
    #[inline]
    pub const fn new(format: FloatFormat) -> Self {
        Self { format }
    }

    /// Creates a `half` type.
    #[inline]
    pub const fn half() -> Self {
        Self::new(FloatFormat::Half)
    }

    /// Creates a `float` type.
    #[inline]
    pub const fn float() -> Self {
        Self::new(FloatFormat::Single)
    }

    /// Creates a `double` type.
    #[inline]
    pub const fn double() -> Self {
        Self::new(FloatFormat::Double)
    }

    /// Gets the underlying IEEE format.
    #[inline]
    pub const fn format(self) -> FloatFormat {
        self.format
    }

    /// Gets the width of the float in bits.
    #[inline]
    pub const fn width(self) -> u32 {
        self.format.bits()
    }

    /// The OpenCL C spelling of the type.
    pub const fn c_name(self) -> &'static str {
        match self.format {
            FloatFormat::Half => "half",
            FloatFormat::Single => "float",
            FloatFormat::Double => "double",
        }
    }
}

/// The scalar types. These are the only types that may be vector elements
/// (except for `void`, which can't be).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub enum Scalar {
    /// `void`, only meaningful as a result type.
    Void,
    /// `bool`
    Bool,
    /// One of the integer types.
    Int(Int),
    /// One of the floating-point types.
    Float(Float),
}

impl Scalar {
    /// Checks if the scalar is `void`.
    pub fn is_void(self) -> bool {
        matches!(self, Scalar::Void)
    }

    /// The OpenCL C spelling of the scalar.
    pub const fn c_name(self) -> &'static str {
        match self {
            Scalar::Void => "void",
            Scalar::Bool => "bool",
            Scalar::Int(i) => i.c_name(),
            Scalar::Float(f) => f.c_name(),
        }
    }
}

/// Models an OpenCL vector type, e.g. `float4`.
///
/// Vectors only come in the lane counts listed in [`LEGAL_LANES`], and
/// their element is never `void`.
///
/// ```
/// # use spirv_bif::ir::*;
/// let v = Vector::new(Scalar::Int(Int::char()), 4).unwrap();
/// assert_eq!(v.lanes(), 4);
///
/// assert_eq!(Vector::new(Scalar::Int(Int::char()), 5), None);
/// assert_eq!(Vector::new(Scalar::Void, 4), None);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub struct Vector {
    element: Scalar,
    lanes: u32,
}

impl Vector {
    /// Creates a vector type, returning `None` when the lane count or
    /// the element type is not legal.
    pub fn new(element: Scalar, lanes: u32) -> Option<Self> {
        if element.is_void() || !is_legal_lane_count(lanes) {
            return None;
        }

        Some(Self { element, lanes })
    }

    /// The element type of every lane.
    #[inline]
    pub fn element(self) -> Scalar {
        self.element
    }

    /// The number of lanes.
    #[inline]
    pub fn lanes(self) -> u32 {
        self.lanes
    }
}

/// Models a pointer to a given type in a given address space.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub struct Pointer {
    space: AddressSpace,
    pointee: Box<Type>,
}

impl Pointer {
    /// The address space the pointer points into.
    #[inline]
    pub fn address_space(&self) -> AddressSpace {
        self.space
    }

    /// The type being pointed to.
    #[inline]
    pub fn pointee(&self) -> &Type {
        &self.pointee
    }
}

/// The opaque handle types. None of these have any introspectable structure,
/// and all of them mangle exactly like a 64-bit integer.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub enum Opaque {
    /// Any `imageNd_t` type.
    Image,
    /// `sampler_t`
    Sampler,
    /// `event_t`
    Event,
    /// `clk_event_t`
    ClkEvent,
    /// `queue_t`
    Queue,
    /// `reserve_id_t`
    ReserveId,
    /// Any `pipe` type.
    Pipe,
    /// The named barrier object used by `MemoryNamedBarrier`.
    NamedBarrier,
    /// Any other opaque structure, identified only by an id.
    Struct(u32),
}

impl Opaque {
    /// The spelling used for the handle in declarations.
    pub fn c_name(self) -> String {
        match self {
            Opaque::Image => "image_t".into(),
            Opaque::Sampler => "sampler_t".into(),
            Opaque::Event => "event_t".into(),
            Opaque::ClkEvent => "clk_event_t".into(),
            Opaque::Queue => "queue_t".into(),
            Opaque::ReserveId => "reserve_id_t".into(),
            Opaque::Pipe => "pipe_t".into(),
            Opaque::NamedBarrier => "named_barrier_t".into(),
            Opaque::Struct(id) => format!("opaque_{id}"),
        }
    }
}

/// Models a `T[N]` type.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub struct Array {
    length: u32,
    element: Box<Type>,
}

impl Array {
    /// The number of elements in the array.
    #[inline]
    pub fn len(&self) -> u32 {
        self.length
    }

    /// Whether the array has zero elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// The element type.
    #[inline]
    pub fn element(&self) -> &Type {
        &self.element
    }
}

/// Models a pointer to a function, only used for the block/invoke parameters
/// of the device-side enqueue builtins.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub struct FunctionPointer {
    space: AddressSpace,
    ret: Box<Type>,
    params: Vec<Type>,
    variadic: bool,
}

impl FunctionPointer {
    /// The address space the function lives in.
    #[inline]
    pub fn address_space(&self) -> AddressSpace {
        self.space
    }

    /// The return type of the function.
    #[inline]
    pub fn return_ty(&self) -> &Type {
        &self.ret
    }

    /// The parameter types of the function, in order.
    #[inline]
    pub fn params(&self) -> &[Type] {
        &self.params
    }

    /// Whether the function takes a variable number of arguments.
    #[inline]
    pub fn is_variadic(&self) -> bool {
        self.variadic
    }
}

/// Any type that can appear in a builtin signature.
///
/// Equality is purely structural: two types that are built the same way
/// are equal, hash equally and mangle equally.
///
/// ```
/// # use spirv_bif::ir::*;
/// # use spirv_bif::memory::AddressSpace;
/// let t1 = Type::ptr(AddressSpace::Global, Type::int());
/// let t2 = Type::ptr(AddressSpace::Global, Type::int());
/// assert_eq!(t1, t2);
/// assert_ne!(t1, Type::ptr(AddressSpace::Local, Type::int()));
/// ```
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub enum Type {
    /// `void`, `bool`, or a numeric scalar.
    Scalar(Scalar),
    /// A `TN` vector.
    Vector(Vector),
    /// A `T*` in some address space.
    Pointer(Pointer),
    /// An opaque handle.
    Opaque(Opaque),
    /// A `T[N]`.
    Array(Array),
    /// A function pointer.
    FunctionPointer(FunctionPointer),
}

macro_rules! scalar_type_shorthand {
    ($($name:ident => $scalar:expr),* $(,)?) => {
        paste! {
            $(
                #[doc = concat!("Creates the `", stringify!($name), "` type.")]
                #[inline]
                pub fn $name() -> Self {
                    Self::Scalar($scalar)
                }

                #[doc = concat!("Creates the `", stringify!($name), "N` vector type.")]
                #[doc = ""]
                #[doc = "Panics if `lanes` is not a legal lane count."]
                #[inline]
                pub fn [<$name _vec>](lanes: u32) -> Self {
                    Self::vector($scalar, lanes)
                }
            )*
        }
    };
}

impl Type {
    /// Creates the `void` type.
    #[inline]
    pub fn void() -> Self {
        Self::Scalar(Scalar::Void)
    }

    /// Creates the `bool` type.
    #[inline]
    pub fn bool() -> Self {
        Self::Scalar(Scalar::Bool)
    }

    scalar_type_shorthand! {
        char => Scalar::Int(Int::char()),
        uchar => Scalar::Int(Int::uchar()),
        short => Scalar::Int(Int::short()),
        ushort => Scalar::Int(Int::ushort()),
        int => Scalar::Int(Int::int()),
        uint => Scalar::Int(Int::uint()),
        long => Scalar::Int(Int::long()),
        ulong => Scalar::Int(Int::ulong()),
        half => Scalar::Float(Float::half()),
        float => Scalar::Float(Float::float()),
        double => Scalar::Float(Float::double()),
    }

    /// Creates an integer type with a given width and signedness. Given
    /// `width` is $N$, $N \in \\{8,16,32,64\\}$ must be true.
    ///
    /// ```
    /// # use spirv_bif::ir::*;
    /// assert_eq!(Type::integer(16, false), Type::ushort());
    /// ```
    pub fn integer(width: u32, signed: bool) -> Self {
        match Int::new(width, signed) {
            Some(int) => Self::Scalar(Scalar::Int(int)),
            None => panic!("integer width must be one of 8, 16, 32, 64 (got {width})"),
        }
    }

    /// Creates a floating-point type of a given format.
    pub fn floating(format: FloatFormat) -> Self {
        Self::Scalar(Scalar::Float(Float::new(format)))
    }

    /// Creates a vector type.
    ///
    /// Lane counts outside of [`LEGAL_LANES`] and `void` elements are
    /// precondition violations, use [`Vector::new`] to check instead.
    ///
    /// ```should_panic
    /// # use spirv_bif::ir::*;
    /// let _ = Type::vector(Scalar::Int(Int::int()), 5);
    /// ```
    pub fn vector(element: Scalar, lanes: u32) -> Self {
        assert!(
            is_legal_lane_count(lanes),
            "vector lane count must be one of 2, 3, 4, 8, 16 (got {lanes})"
        );
        assert!(!element.is_void(), "vectors of `void` are not a thing");

        Self::Vector(Vector { element, lanes })
    }

    /// Creates a pointer to `pointee` in a given address space.
    pub fn ptr(space: AddressSpace, pointee: Type) -> Self {
        Self::Pointer(Pointer {
            space,
            pointee: Box::new(pointee),
        })
    }

    /// Creates an opaque handle type.
    pub fn opaque(handle: Opaque) -> Self {
        Self::Opaque(handle)
    }

    /// Creates a `T[N]` array type.
    pub fn array(element: Type, length: u32) -> Self {
        Self::Array(Array {
            length,
            element: Box::new(element),
        })
    }

    /// Creates a function pointer type.
    pub fn function_ptr(space: AddressSpace, ret: Type, params: &[Type], variadic: bool) -> Self {
        Self::FunctionPointer(FunctionPointer {
            space,
            ret: Box::new(ret),
            params: params.into(),
            variadic,
        })
    }

    /// Checks if the type is `void`.
    pub fn is_void(&self) -> bool {
        matches!(self, Self::Scalar(Scalar::Void))
    }

    /// Checks if the type is a [`Vector`].
    pub fn is_vector(&self) -> bool {
        matches!(self, Self::Vector(_))
    }

    /// Checks if the type is a [`Pointer`].
    pub fn is_ptr(&self) -> bool {
        matches!(self, Self::Pointer(_))
    }

    /// Checks if the type is an integer scalar or an integer vector.
    pub fn is_int_like(&self) -> bool {
        matches!(self.element(), Some(Scalar::Int(_)))
    }

    /// Checks if the type is a float scalar or a float vector.
    pub fn is_float_like(&self) -> bool {
        matches!(self.element(), Some(Scalar::Float(_)))
    }

    /// For scalars returns the scalar itself, for vectors returns the
    /// element. Every other type returns `None`.
    pub fn element(&self) -> Option<Scalar> {
        match self {
            Self::Scalar(s) => Some(*s),
            Self::Vector(v) => Some(v.element()),
            _ => None,
        }
    }

    /// The number of lanes in a vector, `1` for scalars and `None`
    /// for every other type.
    pub fn lanes(&self) -> Option<u32> {
        match self {
            Self::Scalar(_) => Some(1),
            Self::Vector(v) => Some(v.lanes()),
            _ => None,
        }
    }

    /// Rebuilds a scalar or vector type with the same shape but a different
    /// element. Returns `None` for every other type.
    ///
    /// ```
    /// # use spirv_bif::ir::*;
    /// let t = Type::float_vec(4).with_element(Scalar::Int(Int::uint()));
    /// assert_eq!(t, Some(Type::uint_vec(4)));
    /// ```
    pub fn with_element(&self, element: Scalar) -> Option<Type> {
        match self {
            Self::Scalar(_) => Some(Self::Scalar(element)),
            Self::Vector(v) => Vector::new(element, v.lanes()).map(Self::Vector),
            _ => None,
        }
    }

    /// Gets the pointer data, if this is a pointer.
    pub fn as_ptr(&self) -> Option<&Pointer> {
        match self {
            Self::Pointer(p) => Some(p),
            _ => None,
        }
    }

    /// Gets the pointer data, panics if this isn't a pointer.
    pub fn unwrap_ptr(&self) -> &Pointer {
        match self {
            Self::Pointer(p) => p,
            _ => panic!("attempted to read `Type::unwrap_ptr` with type '{:?}'", self),
        }
    }
}

impl From<Int> for Scalar {
    fn from(int: Int) -> Self {
        Scalar::Int(int)
    }
}

impl From<Float> for Scalar {
    fn from(float: Float) -> Self {
        Scalar::Float(float)
    }
}

impl From<Scalar> for Type {
    fn from(scalar: Scalar) -> Self {
        Type::Scalar(scalar)
    }
}

impl From<Int> for Type {
    fn from(int: Int) -> Self {
        Type::Scalar(Scalar::Int(int))
    }
}

impl From<Float> for Type {
    fn from(float: Float) -> Self {
        Type::Scalar(Scalar::Float(float))
    }
}

// the spelling here is the same one the table reader accepts. pointer
// suffixes consume address space keywords from the innermost one outwards,
// so `generic global int**` is a generic pointer to a global pointer.
impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Scalar(s) => write!(f, "{}", s.c_name()),
            Type::Vector(v) => write!(f, "{}{}", v.element().c_name(), v.lanes()),
            Type::Pointer(p) => write!(f, "{} {}*", p.address_space(), p.pointee()),
            Type::Opaque(o) => write!(f, "{}", o.c_name()),
            Type::Array(a) => write!(f, "{}[{}]", a.element(), a.len()),
            Type::FunctionPointer(fp) => {
                write!(f, "{} fn {}(", fp.address_space(), fp.return_ty())?;

                for (i, param) in fp.params().iter().enumerate() {
                    if i != 0 {
                        write!(f, ", ")?;
                    }

                    write!(f, "{param}")?;
                }

                if fp.is_variadic() {
                    if fp.params().is_empty() {
                        write!(f, "...")?;
                    } else {
                        write!(f, ", ...")?;
                    }
                }

                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_equality() {
        let f1 = Type::function_ptr(
            AddressSpace::Private,
            Type::void(),
            &[Type::ptr(AddressSpace::Generic, Type::void())],
            false,
        );
        let f2 = Type::function_ptr(
            AddressSpace::Private,
            Type::void(),
            &[Type::ptr(AddressSpace::Generic, Type::void())],
            false,
        );

        assert_eq!(f1, f2);
        assert_ne!(Type::char(), Type::uchar());
        assert_eq!(Type::integer(64, true), Type::long());
    }

    #[test]
    fn vector_shapes() {
        let v = Type::short_vec(16);

        assert!(v.is_vector());
        assert!(v.is_int_like());
        assert_eq!(v.lanes(), Some(16));
        assert_eq!(v.element(), Some(Scalar::Int(Int::short())));
        assert_eq!(Type::half().lanes(), Some(1));
        assert_eq!(Type::opaque(Opaque::Sampler).lanes(), None);
    }

    #[test]
    #[should_panic]
    fn illegal_lanes_panic() {
        let _ = Type::int_vec(6);
    }

    #[test]
    #[should_panic]
    fn void_vector_panics() {
        let _ = Type::vector(Scalar::Void, 4);
    }

    #[test]
    fn display_spelling() {
        let nested = Type::ptr(
            AddressSpace::Generic,
            Type::ptr(AddressSpace::Global, Type::int()),
        );
        let block = Type::function_ptr(
            AddressSpace::Private,
            Type::void(),
            &[Type::int()],
            true,
        );

        assert_eq!(Type::uchar_vec(4).to_string(), "uchar4");
        assert_eq!(nested.to_string(), "generic global int**");
        assert_eq!(Type::array(Type::float(), 4).to_string(), "float[4]");
        assert_eq!(block.to_string(), "private fn void(int, ...)");
        assert_eq!(Type::opaque(Opaque::Struct(7)).to_string(), "opaque_7");
    }
}
