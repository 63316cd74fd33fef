//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use static_assertions::{assert_eq_size, const_assert_eq};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "enable-serde")]
use serde::{Deserialize, Serialize};

/// The set of invocations that a synchronization guarantee spans.
///
/// The discriminants are the SPIR-V encoding, which numbers the scopes from
/// the broadest to the narrowest. The ordering implemented for `Scope` is by
/// *breadth* instead, so `Invocation < Subgroup < Workgroup < Device < CrossDevice`.
///
/// ```
/// # use spirv_bif::memory::*;
/// assert!(Scope::Invocation < Scope::Subgroup);
/// assert!(Scope::Device > Scope::Workgroup);
/// assert_eq!(Scope::Workgroup as u32, 2);
/// ```
#[repr(u32)]
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub enum Scope {
    /// Every invocation of every device.
    CrossDevice = 0,
    /// Every invocation of the current device.
    Device = 1,
    /// Every invocation of the current workgroup.
    Workgroup = 2,
    /// Every invocation of the current subgroup.
    Subgroup = 3,
    /// Only the current invocation.
    Invocation = 4,
}

assert_eq_size!(Scope, u32);
const_assert_eq!(Scope::CrossDevice as u32, 0);
const_assert_eq!(Scope::Device as u32, 1);
const_assert_eq!(Scope::Workgroup as u32, 2);
const_assert_eq!(Scope::Subgroup as u32, 3);
const_assert_eq!(Scope::Invocation as u32, 4);

impl Scope {
    /// Every scope, narrowest first.
    pub const ALL: [Scope; 5] = [
        Scope::Invocation,
        Scope::Subgroup,
        Scope::Workgroup,
        Scope::Device,
        Scope::CrossDevice,
    ];

    /// Decodes a raw SPIR-V scope operand.
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Scope::CrossDevice),
            1 => Some(Scope::Device),
            2 => Some(Scope::Workgroup),
            3 => Some(Scope::Subgroup),
            4 => Some(Scope::Invocation),
            _ => None,
        }
    }

    /// The position of the scope in the breadth order, `0` being the
    /// narrowest ([`Scope::Invocation`]).
    #[inline]
    pub const fn breadth(self) -> u32 {
        Scope::Invocation as u32 - self as u32
    }

    /// Checks whether `self` covers every invocation that `required` covers.
    ///
    /// ```
    /// # use spirv_bif::memory::*;
    /// assert!(Scope::Workgroup.implies(Scope::Subgroup));
    /// assert!(!Scope::Subgroup.implies(Scope::Workgroup));
    /// assert!(Scope::Device.implies(Scope::Device));
    /// ```
    #[inline]
    pub fn implies(self, required: Scope) -> bool {
        self >= required
    }
}

/// Returns true iff `scope` is at least as broad as `required`.
#[inline]
pub fn implies_scope(scope: Scope, required: Scope) -> bool {
    scope.implies(required)
}

impl PartialOrd for Scope {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scope {
    fn cmp(&self, other: &Self) -> Ordering {
        self.breadth().cmp(&other.breadth())
    }
}

impl FromStr for Scope {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cross-device" => Ok(Scope::CrossDevice),
            "device" => Ok(Scope::Device),
            "workgroup" => Ok(Scope::Workgroup),
            "subgroup" => Ok(Scope::Subgroup),
            "invocation" => Ok(Scope::Invocation),
            _ => Err("the scopes are `cross-device`, `device`, `workgroup`, `subgroup` and `invocation`"),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::CrossDevice => write!(f, "cross-device"),
            Scope::Device => write!(f, "device"),
            Scope::Workgroup => write!(f, "workgroup"),
            Scope::Subgroup => write!(f, "subgroup"),
            Scope::Invocation => write!(f, "invocation"),
        }
    }
}

/// Selects how a group arithmetic builtin combines the values of the
/// invocations in its scope.
///
/// This carries no ordering guarantee of its own, it is independent of
/// both [`Scope`] and [`MemorySemantics`](crate::memory::MemorySemantics).
#[repr(u32)]
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub enum GroupOperation {
    /// Combine every value into one result.
    Reduce = 0,
    /// Each invocation gets the combination of itself and every lower invocation.
    InclusiveScan = 1,
    /// Each invocation gets the combination of every lower invocation.
    ExclusiveScan = 2,
    /// Reduce inside of fixed-size clusters of invocations.
    ClusteredReduce = 3,
}

impl GroupOperation {
    /// Decodes a raw SPIR-V group operation operand.
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(GroupOperation::Reduce),
            1 => Some(GroupOperation::InclusiveScan),
            2 => Some(GroupOperation::ExclusiveScan),
            3 => Some(GroupOperation::ClusteredReduce),
            _ => None,
        }
    }
}

impl FromStr for GroupOperation {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reduce" => Ok(GroupOperation::Reduce),
            "inclusive-scan" => Ok(GroupOperation::InclusiveScan),
            "exclusive-scan" => Ok(GroupOperation::ExclusiveScan),
            "clustered-reduce" => Ok(GroupOperation::ClusteredReduce),
            _ => Err("the group operations are `reduce`, `inclusive-scan`, `exclusive-scan` and `clustered-reduce`"),
        }
    }
}

impl fmt::Display for GroupOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupOperation::Reduce => write!(f, "reduce"),
            GroupOperation::InclusiveScan => write!(f, "inclusive-scan"),
            GroupOperation::ExclusiveScan => write!(f, "exclusive-scan"),
            GroupOperation::ClusteredReduce => write!(f, "clustered-reduce"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breadth_order_is_total() {
        for window in Scope::ALL.windows(2) {
            assert!(window[0] < window[1]);
            assert!(implies_scope(window[1], window[0]));
            assert!(!implies_scope(window[0], window[1]));
        }

        for scope in Scope::ALL {
            assert!(implies_scope(scope, scope));
            assert!(implies_scope(Scope::CrossDevice, scope));
            assert!(implies_scope(scope, Scope::Invocation));
        }
    }

    #[test]
    fn workgroup_implies_subgroup() {
        assert!(implies_scope(Scope::Workgroup, Scope::Subgroup));
        assert!(!implies_scope(Scope::Subgroup, Scope::Workgroup));
    }

    #[test]
    fn decode_wire_values() {
        for scope in Scope::ALL {
            assert_eq!(Scope::from_u32(scope as u32), Some(scope));
        }

        assert_eq!(Scope::from_u32(5), None);
        assert_eq!(GroupOperation::from_u32(3), Some(GroupOperation::ClusteredReduce));
        assert_eq!(GroupOperation::from_u32(4), None);
    }

    #[cfg(feature = "enable-serde")]
    use serde_test::{assert_tokens, Token};

    #[test]
    #[cfg(feature = "enable-serde")]
    fn serde_scope() {
        assert_tokens(
            &Scope::Workgroup,
            &[Token::UnitVariant {
                name: "Scope",
                variant: "Workgroup",
            }],
        );
    }
}
