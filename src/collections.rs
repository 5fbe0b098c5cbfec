// Copyright The Brickwork Authors
// SPDX-License-Identifier: MIT OR Apache-2.0

pub type HashMap<K, V> = rustc_hash::FxHashMap<K, V>;
pub type HashSet<K> = rustc_hash::FxHashSet<K>;
