//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::ir::Type;
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "enable-serde")]
use serde::{Deserialize, Serialize};

/// The non-default IEEE rounding modes a conversion can request.
///
/// Round-to-nearest-even is *also* the default, but an explicit `RTE` is
/// still mangled. The default is expressed by having no rounding mode at all.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub enum RoundingMode {
    /// Round to nearest, ties to even.
    RTE,
    /// Round toward zero.
    RTZ,
    /// Round toward positive infinity.
    RTP,
    /// Round toward negative infinity.
    RTN,
}

impl RoundingMode {
    /// Every rounding mode, in mangling order.
    pub const ALL: [RoundingMode; 4] = [
        RoundingMode::RTE,
        RoundingMode::RTZ,
        RoundingMode::RTP,
        RoundingMode::RTN,
    ];

    /// The upper-case tag that follows the base name, e.g. `RTZ`.
    pub const fn tag(self) -> &'static str {
        match self {
            RoundingMode::RTE => "RTE",
            RoundingMode::RTZ => "RTZ",
            RoundingMode::RTP => "RTP",
            RoundingMode::RTN => "RTN",
        }
    }

    /// The lower-case tag that follows the operand codes, e.g. `rtz`.
    pub const fn suffix(self) -> &'static str {
        match self {
            RoundingMode::RTE => "rte",
            RoundingMode::RTZ => "rtz",
            RoundingMode::RTP => "rtp",
            RoundingMode::RTN => "rtn",
        }
    }
}

impl FromStr for RoundingMode {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rte" | "RTE" => Ok(RoundingMode::RTE),
            "rtz" | "RTZ" => Ok(RoundingMode::RTZ),
            "rtp" | "RTP" => Ok(RoundingMode::RTP),
            "rtn" | "RTN" => Ok(RoundingMode::RTN),
            _ => Err("the rounding modes are `rte`, `rtz`, `rtp` and `rtn`"),
        }
    }
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.suffix())
    }
}

/// How (and whether) the result type of an operation ends up in its symbol.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub enum ReturnMangling {
    /// The result can be inferred from the operands and is not mangled.
    Inferred,
    /// The compact code of the result leads the operand codes.
    Leading,
    /// Like [`Self::Leading`], and additionally a verbose `_R<type>` tag
    /// ends the symbol. Every conversion is mangled this way.
    Tagged,
}

impl FromStr for ReturnMangling {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inferred" => Ok(ReturnMangling::Inferred),
            "leading" => Ok(ReturnMangling::Leading),
            "tagged" => Ok(ReturnMangling::Tagged),
            _ => Err("the result manglings are `inferred`, `leading` and `tagged`"),
        }
    }
}

/// Which instruction set a builtin belongs to. This only affects the
/// prefix a declaration is emitted with, never the mangled symbol.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub enum Namespace {
    /// Core SPIR-V instructions (`ConvertFToU`, `AtomicIAdd`, ...).
    Core,
    /// The `OpenCL.std` extended instruction set (`degrees`, `fclamp`, ...).
    OpenCL,
}

/// Everything the mangler needs to know about one overload of a builtin.
///
/// These are built through [`SigBuilder`](crate::ir::SigBuilder).
#[derive(Debug, Clone, Hash, Eq, PartialEq, Ord, PartialOrd)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub struct Signature {
    name: String,
    params: SmallVec<[Type; 4]>,
    ret: Type,
    rounding: Option<RoundingMode>,
    saturate: bool,
    ret_mangling: ReturnMangling,
    namespace: Namespace,
}

impl Signature {
    pub(in crate::ir) fn new(
        name: String,
        params: SmallVec<[Type; 4]>,
        ret: Type,
        rounding: Option<RoundingMode>,
        saturate: bool,
        ret_mangling: ReturnMangling,
        namespace: Namespace,
    ) -> Self {
        Self {
            name,
            params,
            ret,
            rounding,
            saturate,
            ret_mangling,
            namespace,
        }
    }

    /// The base name of the operation, e.g. `ConvertFToU`.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The operand types, in order.
    #[inline]
    pub fn params(&self) -> &[Type] {
        &self.params
    }

    /// The result type. `void` for operations without a result.
    #[inline]
    pub fn return_ty(&self) -> &Type {
        &self.ret
    }

    /// The explicit rounding mode, `None` means the IEEE default.
    #[inline]
    pub fn rounding(&self) -> Option<RoundingMode> {
        self.rounding
    }

    /// Whether the operation saturates its result.
    #[inline]
    pub fn is_saturating(&self) -> bool {
        self.saturate
    }

    /// How the result type is mangled.
    #[inline]
    pub fn return_mangling(&self) -> ReturnMangling {
        self.ret_mangling
    }

    /// The instruction set the builtin belongs to.
    #[inline]
    pub fn namespace(&self) -> Namespace {
        self.namespace
    }
}
