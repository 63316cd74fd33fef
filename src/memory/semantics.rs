//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::memory::Scope;
use bitflags::bitflags;
use static_assertions::{assert_eq_size, const_assert_eq};
use std::fmt;

#[cfg(feature = "enable-serde")]
use serde::{Deserialize, Serialize};

bitflags! {
    /// The memory semantics operand of an atomic or a barrier.
    ///
    /// A value is one ordering (at most one of the four ordering bits, with
    /// none of them meaning *relaxed*) combined with any number of visibility
    /// bits. The bit values are the SPIR-V encoding.
    ///
    /// ```
    /// # use spirv_bif::memory::*;
    /// let sem = MemorySemantics::ACQUIRE | MemorySemantics::WORKGROUP_MEMORY;
    /// assert_eq!(sem.bits(), 0x102);
    /// assert_eq!(sem.ordering(), Some(MemoryOrder::Acquire));
    /// assert_eq!(sem.implied_scope(), Scope::Workgroup);
    /// ```
    #[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
    pub struct MemorySemantics: u32 {
        /// Later accesses can't be reordered before this one.
        const ACQUIRE = 0x2;
        /// Earlier accesses can't be reordered after this one.
        const RELEASE = 0x4;
        /// Both [`Self::ACQUIRE`] and [`Self::RELEASE`].
        const ACQUIRE_RELEASE = 0x8;
        /// Acquire-release with a single total order over all such operations.
        const SEQUENTIALLY_CONSISTENT = 0x10;
        /// Applies to uniform memory.
        const UNIFORM_MEMORY = 0x40;
        /// Applies to memory shared by a subgroup.
        const SUBGROUP_MEMORY = 0x80;
        /// Applies to `__local` memory.
        const WORKGROUP_MEMORY = 0x100;
        /// Applies to `__global` memory.
        const CROSS_WORKGROUP_MEMORY = 0x200;
        /// Applies to atomic counters.
        const ATOMIC_COUNTER_MEMORY = 0x400;
        /// Applies to image memory.
        const IMAGE_MEMORY = 0x800;

        /// Every ordering bit.
        const ORDERING_MASK = Self::ACQUIRE.bits
            | Self::RELEASE.bits
            | Self::ACQUIRE_RELEASE.bits
            | Self::SEQUENTIALLY_CONSISTENT.bits;

        /// Every visibility bit.
        const VISIBILITY_MASK = Self::UNIFORM_MEMORY.bits
            | Self::SUBGROUP_MEMORY.bits
            | Self::WORKGROUP_MEMORY.bits
            | Self::CROSS_WORKGROUP_MEMORY.bits
            | Self::ATOMIC_COUNTER_MEMORY.bits
            | Self::IMAGE_MEMORY.bits;
    }
}

assert_eq_size!(MemorySemantics, u32);
const_assert_eq!(MemorySemantics::ORDERING_MASK.bits(), 0x1E);
const_assert_eq!(MemorySemantics::VISIBILITY_MASK.bits(), 0xFC0);

/// The ordering part of a [`MemorySemantics`] value.
///
/// `Relaxed` has the encoding `0`, it is the absence of every ordering bit.
#[repr(u32)]
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub enum MemoryOrder {
    /// No ordering constraints, only atomicity.
    Relaxed = 0x0,
    /// See [`MemorySemantics::ACQUIRE`].
    Acquire = 0x2,
    /// See [`MemorySemantics::RELEASE`].
    Release = 0x4,
    /// See [`MemorySemantics::ACQUIRE_RELEASE`].
    AcquireRelease = 0x8,
    /// See [`MemorySemantics::SEQUENTIALLY_CONSISTENT`].
    SequentiallyConsistent = 0x10,
}

impl MemoryOrder {
    /// Every ordering, weakest first.
    pub const ALL: [MemoryOrder; 5] = [
        MemoryOrder::Relaxed,
        MemoryOrder::Acquire,
        MemoryOrder::Release,
        MemoryOrder::AcquireRelease,
        MemoryOrder::SequentiallyConsistent,
    ];

    /// The semantics value containing only this ordering.
    #[inline]
    pub fn semantics(self) -> MemorySemantics {
        MemorySemantics::from_bits_truncate(self as u32)
    }

    /// Whether `self` gives every guarantee that `other` gives.
    ///
    /// `Acquire` and `Release` are incomparable, everything is at least
    /// `Relaxed` and `SequentiallyConsistent` is at least everything.
    ///
    /// ```
    /// # use spirv_bif::memory::*;
    /// assert!(MemoryOrder::AcquireRelease.is_at_least(MemoryOrder::Acquire));
    /// assert!(!MemoryOrder::Release.is_at_least(MemoryOrder::Acquire));
    /// ```
    pub fn is_at_least(self, other: MemoryOrder) -> bool {
        match (self, other) {
            (_, MemoryOrder::Relaxed) => true,
            (MemoryOrder::SequentiallyConsistent, _) => true,
            (MemoryOrder::AcquireRelease, MemoryOrder::Acquire | MemoryOrder::Release) => true,
            (a, b) => a == b,
        }
    }

    /// Whether the ordering has acquire semantics.
    pub fn acquires(self) -> bool {
        self.is_at_least(MemoryOrder::Acquire)
    }

    /// Whether the ordering has release semantics.
    pub fn releases(self) -> bool {
        self.is_at_least(MemoryOrder::Release)
    }
}

impl fmt::Display for MemoryOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryOrder::Relaxed => write!(f, "relaxed"),
            MemoryOrder::Acquire => write!(f, "acquire"),
            MemoryOrder::Release => write!(f, "release"),
            MemoryOrder::AcquireRelease => write!(f, "acq_rel"),
            MemoryOrder::SequentiallyConsistent => write!(f, "seq_cst"),
        }
    }
}

impl MemorySemantics {
    /// Combines an ordering with a set of visibility bits. Any ordering
    /// bits in `visibility` are dropped.
    ///
    /// ```
    /// # use spirv_bif::memory::*;
    /// let sem = MemorySemantics::new(MemoryOrder::Release, MemorySemantics::CROSS_WORKGROUP_MEMORY);
    /// assert_eq!(sem.bits(), 0x204);
    /// ```
    pub fn new(order: MemoryOrder, visibility: MemorySemantics) -> Self {
        order.semantics() | (visibility & Self::VISIBILITY_MASK)
    }

    /// Gets the ordering of the value. Returns `None` if more than one
    /// ordering bit is set.
    pub fn ordering(self) -> Option<MemoryOrder> {
        let ordering = self & Self::ORDERING_MASK;

        match ordering.bits() {
            0x0 => Some(MemoryOrder::Relaxed),
            0x2 => Some(MemoryOrder::Acquire),
            0x4 => Some(MemoryOrder::Release),
            0x8 => Some(MemoryOrder::AcquireRelease),
            0x10 => Some(MemoryOrder::SequentiallyConsistent),
            _ => None,
        }
    }

    /// Gets only the visibility bits of the value.
    #[inline]
    pub fn visibility(self) -> MemorySemantics {
        self & Self::VISIBILITY_MASK
    }

    /// The narrowest scope that covers every storage the visibility bits
    /// name. Values without visibility bits imply [`Scope::Invocation`].
    ///
    /// ```
    /// # use spirv_bif::memory::*;
    /// assert_eq!(MemorySemantics::SUBGROUP_MEMORY.implied_scope(), Scope::Subgroup);
    /// assert_eq!(MemorySemantics::IMAGE_MEMORY.implied_scope(), Scope::Device);
    /// assert_eq!(MemorySemantics::ACQUIRE.implied_scope(), Scope::Invocation);
    /// ```
    pub fn implied_scope(self) -> Scope {
        let visibility = self.visibility();
        let mut scope = Scope::Invocation;

        if visibility.contains(Self::SUBGROUP_MEMORY) {
            scope = scope.max(Scope::Subgroup);
        }

        if visibility.contains(Self::WORKGROUP_MEMORY) {
            scope = scope.max(Scope::Workgroup);
        }

        let device_wide = Self::UNIFORM_MEMORY
            | Self::CROSS_WORKGROUP_MEMORY
            | Self::ATOMIC_COUNTER_MEMORY
            | Self::IMAGE_MEMORY;

        if visibility.intersects(device_wide) {
            scope = scope.max(Scope::Device);
        }

        scope
    }
}

/// Checks that `semantics` has exactly one ordering and no bits outside
/// of the named ones.
///
/// ```
/// # use spirv_bif::memory::*;
/// assert!(is_valid_ordering(0x0));
/// assert!(is_valid_ordering(0x102));
/// assert!(!is_valid_ordering(0x6));
/// assert!(!is_valid_ordering(0x1000));
/// ```
pub fn is_valid_ordering(semantics: u32) -> bool {
    match MemorySemantics::from_bits(semantics) {
        Some(sem) => sem.ordering().is_some(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_and_release_together_is_invalid() {
        assert!(!is_valid_ordering(0x6));
        assert_eq!(
            (MemorySemantics::ACQUIRE | MemorySemantics::RELEASE).ordering(),
            None
        );
    }

    #[test]
    fn every_single_ordering_is_valid() {
        for order in MemoryOrder::ALL {
            let sem = MemorySemantics::new(order, MemorySemantics::VISIBILITY_MASK);

            assert!(is_valid_ordering(sem.bits()));
            assert_eq!(sem.ordering(), Some(order));
            assert_eq!(sem.visibility(), MemorySemantics::VISIBILITY_MASK);
        }
    }

    #[test]
    fn unknown_bits_are_rejected() {
        for bit in [0x1, 0x20, 0x1000, 0x8000_0000] {
            assert!(!is_valid_ordering(bit));
            assert_eq!(MemorySemantics::from_bits(bit), None);
        }
    }

    #[test]
    fn implied_scope_takes_the_broadest_bit() {
        let sem = MemorySemantics::SUBGROUP_MEMORY | MemorySemantics::WORKGROUP_MEMORY;
        assert_eq!(sem.implied_scope(), Scope::Workgroup);

        let sem = MemorySemantics::WORKGROUP_MEMORY | MemorySemantics::ATOMIC_COUNTER_MEMORY;
        assert_eq!(sem.implied_scope(), Scope::Device);

        assert_eq!(MemorySemantics::UNIFORM_MEMORY.implied_scope(), Scope::Device);
        assert_eq!(MemorySemantics::empty().implied_scope(), Scope::Invocation);
    }

    #[test]
    fn ordering_strength() {
        use MemoryOrder::*;

        for order in MemoryOrder::ALL {
            assert!(order.is_at_least(order));
            assert!(order.is_at_least(Relaxed));
            assert!(SequentiallyConsistent.is_at_least(order));
        }

        assert!(!Acquire.is_at_least(Release));
        assert!(!Release.is_at_least(Acquire));
        assert!(!AcquireRelease.is_at_least(SequentiallyConsistent));
        assert!(AcquireRelease.acquires() && AcquireRelease.releases());
        assert!(!Relaxed.acquires());
    }
}
