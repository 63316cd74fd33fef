//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use std::collections::{HashMap, HashSet};

/// A `HashMap` keyed with `ahash`. Most keys in this crate are short
/// symbols or small enums, which `ahash` is much faster on than SipHash.
pub type SaHashMap<K, V> = HashMap<K, V, ahash::RandomState>;

/// The `HashSet` equivalent of [`SaHashMap`].
pub type SaHashSet<V> = HashSet<V, ahash::RandomState>;
