//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use static_assertions::const_assert_eq;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "enable-serde")]
use serde::{Deserialize, Serialize};

/// The SPIR-V storage classes that builtin pointer operands can be in.
///
/// The discriminants are the SPIR-V encoding and must not change.
#[repr(u32)]
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub enum StorageClass {
    /// Read-only memory visible to every invocation, OpenCL `__constant`.
    UniformConstant = 0,
    /// Memory shared by a workgroup, OpenCL `__local`.
    Workgroup = 4,
    /// Memory visible to every invocation of the device, OpenCL `__global`.
    CrossWorkgroup = 5,
    /// Memory private to one invocation, OpenCL `__private`.
    Function = 7,
    /// Any of the writable storage classes, OpenCL `__generic`.
    Generic = 8,
}

const_assert_eq!(StorageClass::UniformConstant as u32, 0);
const_assert_eq!(StorageClass::Workgroup as u32, 4);
const_assert_eq!(StorageClass::CrossWorkgroup as u32, 5);
const_assert_eq!(StorageClass::Function as u32, 7);
const_assert_eq!(StorageClass::Generic as u32, 8);

impl StorageClass {
    /// Decodes a raw SPIR-V storage class operand.
    ///
    /// ```
    /// # use spirv_bif::memory::*;
    /// assert_eq!(StorageClass::from_u32(5), Some(StorageClass::CrossWorkgroup));
    /// assert_eq!(StorageClass::from_u32(6), None);
    /// ```
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(StorageClass::UniformConstant),
            4 => Some(StorageClass::Workgroup),
            5 => Some(StorageClass::CrossWorkgroup),
            7 => Some(StorageClass::Function),
            8 => Some(StorageClass::Generic),
            _ => None,
        }
    }

    /// The address space pointers in this storage class live in.
    #[inline]
    pub const fn address_space(self) -> AddressSpace {
        match self {
            StorageClass::Function => AddressSpace::Private,
            StorageClass::CrossWorkgroup => AddressSpace::Global,
            StorageClass::UniformConstant => AddressSpace::Constant,
            StorageClass::Workgroup => AddressSpace::Local,
            StorageClass::Generic => AddressSpace::Generic,
        }
    }
}

/// The numbered address spaces that appear as the digit in a pointer's
/// mangled code (`p1i32` is a pointer into [`AddressSpace::Global`]).
#[repr(u32)]
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub enum AddressSpace {
    /// `__private`
    Private = 0,
    /// `__global`
    Global = 1,
    /// `__constant`
    Constant = 2,
    /// `__local`
    Local = 3,
    /// `__generic`
    Generic = 4,
}

impl AddressSpace {
    /// Every address space, in digit order.
    pub const ALL: [AddressSpace; 5] = [
        AddressSpace::Private,
        AddressSpace::Global,
        AddressSpace::Constant,
        AddressSpace::Local,
        AddressSpace::Generic,
    ];

    /// Decodes the digit of a mangled pointer code. Anything outside of
    /// `0..=4` is not an address space.
    ///
    /// ```
    /// # use spirv_bif::memory::*;
    /// assert_eq!(AddressSpace::from_digit(3), Some(AddressSpace::Local));
    /// assert_eq!(AddressSpace::from_digit(9), None);
    /// ```
    pub fn from_digit(digit: u32) -> Option<Self> {
        AddressSpace::ALL.get(digit as usize).copied()
    }

    /// The digit used in mangled pointer codes.
    #[inline]
    pub const fn digit(self) -> u32 {
        self as u32
    }

    /// The storage class that maps onto this address space.
    #[inline]
    pub const fn storage_class(self) -> StorageClass {
        match self {
            AddressSpace::Private => StorageClass::Function,
            AddressSpace::Global => StorageClass::CrossWorkgroup,
            AddressSpace::Constant => StorageClass::UniformConstant,
            AddressSpace::Local => StorageClass::Workgroup,
            AddressSpace::Generic => StorageClass::Generic,
        }
    }
}

/// Maps a storage class onto the address space digit its pointers mangle with.
///
/// ```
/// # use spirv_bif::memory::*;
/// assert_eq!(address_space_for_storage_class(StorageClass::Function), 0);
/// assert_eq!(address_space_for_storage_class(StorageClass::CrossWorkgroup), 1);
/// assert_eq!(address_space_for_storage_class(StorageClass::Generic), 4);
/// ```
#[inline]
pub fn address_space_for_storage_class(class: StorageClass) -> u32 {
    class.address_space().digit()
}

impl FromStr for AddressSpace {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "private" | "__private" => Ok(AddressSpace::Private),
            "global" | "__global" => Ok(AddressSpace::Global),
            "constant" | "__constant" => Ok(AddressSpace::Constant),
            "local" | "__local" => Ok(AddressSpace::Local),
            "generic" | "__generic" => Ok(AddressSpace::Generic),
            _ => Err("the address spaces are `private`, `global`, `constant`, `local` and `generic`"),
        }
    }
}

impl fmt::Display for AddressSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressSpace::Private => write!(f, "private"),
            AddressSpace::Global => write!(f, "global"),
            AddressSpace::Constant => write!(f, "constant"),
            AddressSpace::Local => write!(f, "local"),
            AddressSpace::Generic => write!(f, "generic"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_class_round_trips_through_address_space() {
        for space in AddressSpace::ALL {
            assert_eq!(space.storage_class().address_space(), space);
            assert_eq!(AddressSpace::from_digit(space.digit()), Some(space));
        }
    }

    #[test]
    fn unknown_values_are_rejected() {
        for raw in [1, 2, 3, 6, 9, 12, u32::MAX] {
            assert_eq!(StorageClass::from_u32(raw), None);
        }

        assert_eq!(AddressSpace::from_digit(5), None);
    }

    #[test]
    fn parse_spellings() {
        assert_eq!("__local".parse::<AddressSpace>(), Ok(AddressSpace::Local));
        assert_eq!("global".parse::<AddressSpace>(), Ok(AddressSpace::Global));
        assert!("shared".parse::<AddressSpace>().is_err());
    }

    #[cfg(feature = "enable-serde")]
    use serde_test::{assert_tokens, Token};

    #[test]
    #[cfg(feature = "enable-serde")]
    fn serde_storage_class() {
        assert_tokens(
            &StorageClass::CrossWorkgroup,
            &[Token::UnitVariant {
                name: "StorageClass",
                variant: "CrossWorkgroup",
            }],
        );
    }
}
