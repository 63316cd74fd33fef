//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::memory::{AddressSpace, GroupOperation, MemoryOrder, MemorySemantics, Scope};
use std::error::Error;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "enable-serde")]
use serde::{Deserialize, Serialize};

/// The kinds of synchronizing builtins, each with its own operand rules.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub enum OperationCategory {
    /// `AtomicLoad`
    AtomicLoad,
    /// `AtomicStore`
    AtomicStore,
    /// Read-modify-write atomics, `AtomicIAdd`, `AtomicExchange` and friends.
    AtomicRmw,
    /// `AtomicCompareExchange`, which has a second semantics operand.
    AtomicCompareExchange,
    /// `ControlBarrier`
    ControlBarrier,
    /// `MemoryBarrier`
    MemoryBarrier,
    /// `MemoryNamedBarrier`
    NamedBarrier,
    /// Group collectives, `GroupIAdd`, `GroupBroadcast` and friends.
    Group,
}

static ATOMIC_SPACES: [AddressSpace; 4] = [
    AddressSpace::Private,
    AddressSpace::Global,
    AddressSpace::Local,
    AddressSpace::Generic,
];

static NAMED_BARRIER_SPACES: [AddressSpace; 1] = [AddressSpace::Local];

impl OperationCategory {
    /// Every category.
    pub const ALL: [OperationCategory; 8] = [
        OperationCategory::AtomicLoad,
        OperationCategory::AtomicStore,
        OperationCategory::AtomicRmw,
        OperationCategory::AtomicCompareExchange,
        OperationCategory::ControlBarrier,
        OperationCategory::MemoryBarrier,
        OperationCategory::NamedBarrier,
        OperationCategory::Group,
    ];

    /// Whether the category is one of the atomics.
    pub fn is_atomic(self) -> bool {
        matches!(
            self,
            OperationCategory::AtomicLoad
                | OperationCategory::AtomicStore
                | OperationCategory::AtomicRmw
                | OperationCategory::AtomicCompareExchange
        )
    }

    /// Whether operations of the category take a pointer operand.
    pub fn takes_pointer(self) -> bool {
        !legal_address_spaces(self).is_empty()
    }
}

impl FromStr for OperationCategory {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "atomic-load" => Ok(OperationCategory::AtomicLoad),
            "atomic-store" => Ok(OperationCategory::AtomicStore),
            "atomic-rmw" => Ok(OperationCategory::AtomicRmw),
            "atomic-cmpxchg" => Ok(OperationCategory::AtomicCompareExchange),
            "control-barrier" => Ok(OperationCategory::ControlBarrier),
            "memory-barrier" => Ok(OperationCategory::MemoryBarrier),
            "named-barrier" => Ok(OperationCategory::NamedBarrier),
            "group" => Ok(OperationCategory::Group),
            _ => Err("unknown operation category"),
        }
    }
}

impl fmt::Display for OperationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationCategory::AtomicLoad => "atomic-load",
            OperationCategory::AtomicStore => "atomic-store",
            OperationCategory::AtomicRmw => "atomic-rmw",
            OperationCategory::AtomicCompareExchange => "atomic-cmpxchg",
            OperationCategory::ControlBarrier => "control-barrier",
            OperationCategory::MemoryBarrier => "memory-barrier",
            OperationCategory::NamedBarrier => "named-barrier",
            OperationCategory::Group => "group",
        };

        write!(f, "{name}")
    }
}

/// The closed set of address spaces a pointer operand of `category` may
/// be in. Categories without a pointer operand return an empty slice.
///
/// ```
/// # use spirv_bif::memory::*;
/// let atomics = legal_address_spaces(OperationCategory::AtomicRmw);
/// assert!(atomics.contains(&AddressSpace::Global));
/// assert!(!atomics.contains(&AddressSpace::Constant));
///
/// assert_eq!(legal_address_spaces(OperationCategory::NamedBarrier), &[AddressSpace::Local]);
/// assert!(legal_address_spaces(OperationCategory::ControlBarrier).is_empty());
/// ```
pub fn legal_address_spaces(category: OperationCategory) -> &'static [AddressSpace] {
    match category {
        OperationCategory::AtomicLoad
        | OperationCategory::AtomicStore
        | OperationCategory::AtomicRmw
        | OperationCategory::AtomicCompareExchange => &ATOMIC_SPACES,
        OperationCategory::NamedBarrier => &NAMED_BARRIER_SPACES,
        OperationCategory::ControlBarrier | OperationCategory::MemoryBarrier | OperationCategory::Group => &[],
    }
}

/// The scope, semantics and pointer operands of one synchronizing call.
///
/// The constructors fill in exactly the operands each category has, the
/// fields are public so that tools can describe malformed calls as well.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub struct SyncOperation {
    /// What kind of operation this is.
    pub category: OperationCategory,
    /// The execution scope of barriers and group collectives.
    pub execution: Option<Scope>,
    /// The memory scope of atomics and barriers.
    pub memory: Option<Scope>,
    /// The raw semantics operand. For compare-exchange this is the
    /// "equal" semantics.
    pub semantics: u32,
    /// The "unequal" semantics of a compare-exchange.
    pub unequal: Option<u32>,
    /// The address space of the pointer operand.
    pub pointer: Option<AddressSpace>,
    /// The group operation of an arithmetic group collective.
    pub group: Option<GroupOperation>,
    /// The cluster size of a [`GroupOperation::ClusteredReduce`].
    pub cluster_size: Option<u32>,
}

impl SyncOperation {
    fn empty(category: OperationCategory) -> Self {
        Self {
            category,
            execution: None,
            memory: None,
            semantics: 0,
            unequal: None,
            pointer: None,
            group: None,
            cluster_size: None,
        }
    }

    /// Describes an atomic load, store or read-modify-write.
    pub fn atomic(category: OperationCategory, space: AddressSpace, scope: Scope, semantics: u32) -> Self {
        Self {
            memory: Some(scope),
            semantics,
            pointer: Some(space),
            ..Self::empty(category)
        }
    }

    /// Describes an `AtomicCompareExchange`.
    pub fn compare_exchange(space: AddressSpace, scope: Scope, equal: u32, unequal: u32) -> Self {
        Self {
            unequal: Some(unequal),
            ..Self::atomic(OperationCategory::AtomicCompareExchange, space, scope, equal)
        }
    }

    /// Describes a `ControlBarrier`.
    pub fn control_barrier(execution: Scope, memory: Scope, semantics: u32) -> Self {
        Self {
            execution: Some(execution),
            memory: Some(memory),
            semantics,
            ..Self::empty(OperationCategory::ControlBarrier)
        }
    }

    /// Describes a `MemoryBarrier`.
    pub fn memory_barrier(memory: Scope, semantics: u32) -> Self {
        Self {
            memory: Some(memory),
            semantics,
            ..Self::empty(OperationCategory::MemoryBarrier)
        }
    }

    /// Describes a `MemoryNamedBarrier`, whose barrier object lives at `space`.
    pub fn named_barrier(space: AddressSpace, memory: Scope, semantics: u32) -> Self {
        Self {
            memory: Some(memory),
            semantics,
            pointer: Some(space),
            ..Self::empty(OperationCategory::NamedBarrier)
        }
    }

    /// Describes a group collective. Non-arithmetic collectives (broadcasts,
    /// votes) have no group operation.
    pub fn group(execution: Scope, operation: Option<GroupOperation>, cluster_size: Option<u32>) -> Self {
        Self {
            execution: Some(execution),
            group: operation,
            cluster_size,
            ..Self::empty(OperationCategory::Group)
        }
    }
}

/// A single rule that a [`SyncOperation`] breaks.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub enum SyncError {
    /// A scope operand that the category requires is missing.
    MissingOperand(OperationCategory, &'static str),
    /// The semantics have unknown bits, or more than one ordering.
    InvalidSemantics(u32),
    /// The ordering is not allowed for the category.
    IllegalOrdering(OperationCategory, MemoryOrder),
    /// The memory scope of an atomic doesn't cover its visibility bits.
    ScopeTooNarrow {
        /// The memory scope operand.
        scope: Scope,
        /// The scope implied by the semantics.
        required: Scope,
    },
    /// The "unequal" ordering of a compare-exchange is stronger than the "equal" one.
    UnequalStronger {
        /// The "equal" ordering.
        equal: MemoryOrder,
        /// The "unequal" ordering.
        unequal: MemoryOrder,
    },
    /// A pointer operand is missing.
    MissingPointer(OperationCategory),
    /// A pointer operand is present on a category without one.
    UnexpectedPointer(OperationCategory),
    /// The pointer is in an address space the category doesn't accept.
    IllegalAddressSpace(OperationCategory, AddressSpace),
    /// Group collectives only run at workgroup or subgroup scope.
    IllegalGroupScope(Scope),
    /// A clustered reduction was requested outside of subgroup scope.
    ClusterOutsideSubgroup(Scope),
    /// The cluster size is missing or not a power of two.
    BadClusterSize(Option<u32>),
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::MissingOperand(cat, operand) => write!(f, "`{cat}` operation is missing its {operand}"),
            SyncError::InvalidSemantics(bits) => {
                write!(f, "memory semantics {bits:#x} do not contain exactly one ordering")
            }
            SyncError::IllegalOrdering(cat, order) => write!(f, "`{cat}` operation cannot have `{order}` ordering"),
            SyncError::ScopeTooNarrow { scope, required } => write!(
                f,
                "memory scope `{scope}` does not cover the `{required}` scope implied by the semantics"
            ),
            SyncError::UnequalStronger { equal, unequal } => write!(
                f,
                "unequal ordering `{unequal}` is stronger than equal ordering `{equal}`"
            ),
            SyncError::MissingPointer(cat) => write!(f, "`{cat}` operation requires a pointer operand"),
            SyncError::UnexpectedPointer(cat) => write!(f, "`{cat}` operation does not take a pointer operand"),
            SyncError::IllegalAddressSpace(cat, space) => {
                write!(f, "`{cat}` operation cannot take a pointer to `{space}` memory")
            }
            SyncError::IllegalGroupScope(scope) => {
                write!(f, "group operations must have `workgroup` or `subgroup` scope, got `{scope}`")
            }
            SyncError::ClusterOutsideSubgroup(scope) => {
                write!(f, "clustered reductions must have `subgroup` scope, got `{scope}`")
            }
            SyncError::BadClusterSize(Some(size)) => write!(f, "cluster size {size} is not a power of two"),
            SyncError::BadClusterSize(None) => write!(f, "clustered reduction is missing its cluster size"),
        }
    }
}

impl Error for SyncError {}

/// Checks every scope, semantics and pointer rule for `op`.
///
/// If any fail, every broken rule is returned (not just the first one).
///
/// ```
/// # use spirv_bif::memory::*;
/// let ok = SyncOperation::atomic(
///     OperationCategory::AtomicRmw,
///     AddressSpace::Local,
///     Scope::Workgroup,
///     (MemorySemantics::ACQUIRE_RELEASE | MemorySemantics::WORKGROUP_MEMORY).bits(),
/// );
/// assert!(verify_operation(&ok).is_ok());
///
/// let bad = SyncOperation::atomic(OperationCategory::AtomicRmw, AddressSpace::Local, Scope::Workgroup, 0x6);
/// assert_eq!(verify_operation(&bad), Err(vec![SyncError::InvalidSemantics(0x6)]));
/// ```
pub fn verify_operation(op: &SyncOperation) -> Result<(), Vec<SyncError>> {
    let mut verifier = Verifier {
        op,
        errors: Vec::default(),
    };

    verifier.verify();

    if verifier.errors.is_empty() {
        Ok(())
    } else {
        Err(verifier.errors)
    }
}

/// This is [`verify_operation`], except that it writes out any errors
/// and then panics on failure.
pub fn verify_operation_panic(op: &SyncOperation) {
    if let Err(errors) = verify_operation(op) {
        eprintln!("invalid `{}` operation: {op:?}", op.category);

        for error in errors {
            eprintln!("  {error}");
        }

        panic!();
    }
}

macro_rules! verify_assert {
    ($self:expr, $cond:expr, $error:expr) => {
        if !($cond) {
            $self.errors.push($error);
        }
    };
}

struct Verifier<'a> {
    op: &'a SyncOperation,
    errors: Vec<SyncError>,
}

impl<'a> Verifier<'a> {
    fn verify(&mut self) {
        let category = self.op.category;

        self.verify_pointer();

        match category {
            OperationCategory::AtomicLoad
            | OperationCategory::AtomicStore
            | OperationCategory::AtomicRmw
            | OperationCategory::AtomicCompareExchange => self.verify_atomic(),
            OperationCategory::ControlBarrier => {
                verify_assert!(
                    self,
                    self.op.execution.is_some(),
                    SyncError::MissingOperand(category, "execution scope")
                );

                self.verify_barrier();
            }
            OperationCategory::MemoryBarrier | OperationCategory::NamedBarrier => self.verify_barrier(),
            OperationCategory::Group => self.verify_group(),
        }
    }

    fn verify_pointer(&mut self) {
        let category = self.op.category;
        let legal = legal_address_spaces(category);

        match self.op.pointer {
            Some(_) if legal.is_empty() => self.errors.push(SyncError::UnexpectedPointer(category)),
            Some(space) => verify_assert!(
                self,
                legal.contains(&space),
                SyncError::IllegalAddressSpace(category, space)
            ),
            None => verify_assert!(self, legal.is_empty(), SyncError::MissingPointer(category)),
        }
    }

    // decodes a semantics operand, recording an error if it is malformed
    fn semantics(&mut self, bits: u32) -> Option<(MemorySemantics, MemoryOrder)> {
        let decoded = MemorySemantics::from_bits(bits).and_then(|sem| sem.ordering().map(|order| (sem, order)));

        verify_assert!(self, decoded.is_some(), SyncError::InvalidSemantics(bits));

        decoded
    }

    fn verify_atomic(&mut self) {
        let category = self.op.category;
        let decoded = self.semantics(self.op.semantics);

        if let Some((_, order)) = decoded {
            match category {
                OperationCategory::AtomicLoad => {
                    verify_assert!(
                        self,
                        !order.releases() || order == MemoryOrder::SequentiallyConsistent,
                        SyncError::IllegalOrdering(category, order)
                    );
                }
                OperationCategory::AtomicStore => {
                    verify_assert!(
                        self,
                        !order.acquires() || order == MemoryOrder::SequentiallyConsistent,
                        SyncError::IllegalOrdering(category, order)
                    );
                }
                _ => {}
            }
        }

        match (self.op.memory, decoded) {
            (Some(scope), Some((sem, _))) => {
                let required = sem.implied_scope();

                verify_assert!(self, scope.implies(required), SyncError::ScopeTooNarrow { scope, required });
            }
            (Some(_), None) => {}
            (None, _) => self.errors.push(SyncError::MissingOperand(category, "memory scope")),
        }

        if category == OperationCategory::AtomicCompareExchange {
            self.verify_unequal(decoded.map(|(_, order)| order));
        }
    }

    // `equal` is `None` when the equal semantics were malformed
    fn verify_unequal(&mut self, equal: Option<MemoryOrder>) {
        let category = self.op.category;

        let Some(bits) = self.op.unequal else {
            self.errors.push(SyncError::MissingOperand(category, "unequal semantics"));

            return;
        };

        let Some((_, unequal)) = self.semantics(bits) else {
            return;
        };

        // the failure path is a plain load
        verify_assert!(
            self,
            !unequal.releases() || unequal == MemoryOrder::SequentiallyConsistent,
            SyncError::IllegalOrdering(OperationCategory::AtomicLoad, unequal)
        );

        if let Some(equal) = equal {
            verify_assert!(
                self,
                equal.is_at_least(unequal),
                SyncError::UnequalStronger { equal, unequal }
            );
        }
    }

    // barriers may request visibility broader than their scopes
    fn verify_barrier(&mut self) {
        let category = self.op.category;

        verify_assert!(
            self,
            self.op.memory.is_some(),
            SyncError::MissingOperand(category, "memory scope")
        );

        let _ = self.semantics(self.op.semantics);
    }

    fn verify_group(&mut self) {
        let execution = self.op.execution;
        let clustered = self.op.group == Some(GroupOperation::ClusteredReduce);

        match execution {
            Some(scope) => {
                verify_assert!(
                    self,
                    matches!(scope, Scope::Workgroup | Scope::Subgroup),
                    SyncError::IllegalGroupScope(scope)
                );

                if clustered {
                    verify_assert!(self, scope == Scope::Subgroup, SyncError::ClusterOutsideSubgroup(scope));
                }
            }
            None => self
                .errors
                .push(SyncError::MissingOperand(OperationCategory::Group, "execution scope")),
        }

        if clustered {
            let size = self.op.cluster_size;

            verify_assert!(
                self,
                size.map_or(false, |n| n.is_power_of_two()),
                SyncError::BadClusterSize(size)
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(sem: MemorySemantics) -> u32 {
        sem.bits()
    }

    #[test]
    fn atomic_scope_must_cover_visibility() {
        let sem = bits(MemorySemantics::ACQUIRE | MemorySemantics::WORKGROUP_MEMORY);
        let op = SyncOperation::atomic(OperationCategory::AtomicLoad, AddressSpace::Local, Scope::Subgroup, sem);

        assert_eq!(
            verify_operation(&op),
            Err(vec![SyncError::ScopeTooNarrow {
                scope: Scope::Subgroup,
                required: Scope::Workgroup
            }])
        );

        let op = SyncOperation::atomic(OperationCategory::AtomicLoad, AddressSpace::Local, Scope::Device, sem);
        assert_eq!(verify_operation(&op), Ok(()));
    }

    #[test]
    fn barriers_may_see_further_than_they_wait() {
        let sem = bits(MemorySemantics::SEQUENTIALLY_CONSISTENT | MemorySemantics::CROSS_WORKGROUP_MEMORY);
        let op = SyncOperation::control_barrier(Scope::Workgroup, Scope::Workgroup, sem);

        assert_eq!(verify_operation(&op), Ok(()));
        assert_eq!(
            verify_operation(&SyncOperation::memory_barrier(Scope::Subgroup, sem)),
            Ok(())
        );
    }

    #[test]
    fn barrier_semantics_still_need_one_ordering() {
        let op = SyncOperation::memory_barrier(Scope::Device, 0x6);

        assert_eq!(verify_operation(&op), Err(vec![SyncError::InvalidSemantics(0x6)]));
    }

    #[test]
    fn pointer_spaces_per_category() {
        for space in AddressSpace::ALL {
            let op = SyncOperation::atomic(OperationCategory::AtomicRmw, space, Scope::Device, 0);
            let expected = if space == AddressSpace::Constant {
                Err(vec![SyncError::IllegalAddressSpace(OperationCategory::AtomicRmw, space)])
            } else {
                Ok(())
            };

            assert_eq!(verify_operation(&op), expected);

            let op = SyncOperation::named_barrier(space, Scope::Workgroup, 0);
            assert_eq!(verify_operation(&op).is_ok(), space == AddressSpace::Local);
        }

        let mut op = SyncOperation::control_barrier(Scope::Workgroup, Scope::Workgroup, 0);
        op.pointer = Some(AddressSpace::Local);

        assert_eq!(
            verify_operation(&op),
            Err(vec![SyncError::UnexpectedPointer(OperationCategory::ControlBarrier)])
        );

        let mut op = SyncOperation::atomic(OperationCategory::AtomicStore, AddressSpace::Global, Scope::Device, 0);
        op.pointer = None;

        assert_eq!(
            verify_operation(&op),
            Err(vec![SyncError::MissingPointer(OperationCategory::AtomicStore)])
        );
    }

    #[test]
    fn load_and_store_orderings() {
        let load = |order: MemoryOrder| {
            SyncOperation::atomic(OperationCategory::AtomicLoad, AddressSpace::Global, Scope::Device, order as u32)
        };
        let store = |order: MemoryOrder| {
            SyncOperation::atomic(OperationCategory::AtomicStore, AddressSpace::Global, Scope::Device, order as u32)
        };

        assert!(verify_operation(&load(MemoryOrder::Acquire)).is_ok());
        assert!(verify_operation(&load(MemoryOrder::SequentiallyConsistent)).is_ok());
        assert!(verify_operation(&load(MemoryOrder::Release)).is_err());
        assert!(verify_operation(&load(MemoryOrder::AcquireRelease)).is_err());

        assert!(verify_operation(&store(MemoryOrder::Release)).is_ok());
        assert!(verify_operation(&store(MemoryOrder::Relaxed)).is_ok());
        assert!(verify_operation(&store(MemoryOrder::Acquire)).is_err());
        assert!(verify_operation(&store(MemoryOrder::AcquireRelease)).is_err());

        for order in MemoryOrder::ALL {
            let rmw =
                SyncOperation::atomic(OperationCategory::AtomicRmw, AddressSpace::Global, Scope::Device, order as u32);

            assert!(verify_operation(&rmw).is_ok());
        }
    }

    #[test]
    fn compare_exchange_orderings() {
        let cas = |equal: MemoryOrder, unequal: MemoryOrder| {
            SyncOperation::compare_exchange(AddressSpace::Generic, Scope::Device, equal as u32, unequal as u32)
        };

        assert!(verify_operation(&cas(MemoryOrder::AcquireRelease, MemoryOrder::Acquire)).is_ok());
        assert!(verify_operation(&cas(MemoryOrder::SequentiallyConsistent, MemoryOrder::SequentiallyConsistent)).is_ok());
        assert!(verify_operation(&cas(MemoryOrder::Release, MemoryOrder::Relaxed)).is_ok());

        assert_eq!(
            verify_operation(&cas(MemoryOrder::Acquire, MemoryOrder::SequentiallyConsistent)),
            Err(vec![SyncError::UnequalStronger {
                equal: MemoryOrder::Acquire,
                unequal: MemoryOrder::SequentiallyConsistent
            }])
        );

        assert_eq!(
            verify_operation(&cas(MemoryOrder::AcquireRelease, MemoryOrder::Release)),
            Err(vec![SyncError::IllegalOrdering(
                OperationCategory::AtomicLoad,
                MemoryOrder::Release
            )])
        );
    }

    #[test]
    fn malformed_equal_semantics_still_check_the_rest() {
        let mut op = SyncOperation::compare_exchange(AddressSpace::Global, Scope::Device, 0x6, 0x4);
        op.memory = None;

        assert_eq!(
            verify_operation(&op),
            Err(vec![
                SyncError::InvalidSemantics(0x6),
                SyncError::MissingOperand(OperationCategory::AtomicCompareExchange, "memory scope"),
                SyncError::IllegalOrdering(OperationCategory::AtomicLoad, MemoryOrder::Release),
            ])
        );

        let mut op = SyncOperation::atomic(OperationCategory::AtomicRmw, AddressSpace::Local, Scope::Workgroup, 0x6);
        op.memory = None;

        assert_eq!(
            verify_operation(&op),
            Err(vec![
                SyncError::InvalidSemantics(0x6),
                SyncError::MissingOperand(OperationCategory::AtomicRmw, "memory scope"),
            ])
        );
    }

    #[test]
    fn missing_group_scope_still_checks_cluster() {
        let mut op = SyncOperation::group(Scope::Subgroup, Some(GroupOperation::ClusteredReduce), Some(3));
        op.execution = None;

        assert_eq!(
            verify_operation(&op),
            Err(vec![
                SyncError::MissingOperand(OperationCategory::Group, "execution scope"),
                SyncError::BadClusterSize(Some(3)),
            ])
        );
    }

    #[test]
    fn group_scopes() {
        let reduce = |scope: Scope| SyncOperation::group(scope, Some(GroupOperation::Reduce), None);

        assert!(verify_operation(&reduce(Scope::Workgroup)).is_ok());
        assert!(verify_operation(&reduce(Scope::Subgroup)).is_ok());
        assert_eq!(
            verify_operation(&reduce(Scope::Device)),
            Err(vec![SyncError::IllegalGroupScope(Scope::Device)])
        );

        let clustered = |scope: Scope, size: Option<u32>| {
            SyncOperation::group(scope, Some(GroupOperation::ClusteredReduce), size)
        };

        assert!(verify_operation(&clustered(Scope::Subgroup, Some(4))).is_ok());
        assert_eq!(
            verify_operation(&clustered(Scope::Subgroup, Some(6))),
            Err(vec![SyncError::BadClusterSize(Some(6))])
        );
        assert_eq!(
            verify_operation(&clustered(Scope::Workgroup, None)),
            Err(vec![
                SyncError::ClusterOutsideSubgroup(Scope::Workgroup),
                SyncError::BadClusterSize(None)
            ])
        );
    }

    #[test]
    #[should_panic]
    fn panicking_form_panics() {
        verify_operation_panic(&SyncOperation::memory_barrier(Scope::Device, 0x1000));
    }

    #[test]
    fn category_keywords() {
        for category in OperationCategory::ALL {
            assert_eq!(category.to_string().parse::<OperationCategory>(), Ok(category));
        }

        assert!(OperationCategory::AtomicLoad.takes_pointer());
        assert!(!OperationCategory::Group.takes_pointer());
    }
}
