// Copyright The Brickwork Authors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Interfaces to the environment that owns the containers being laid out.

pub mod host;
pub mod memory;
pub mod page;
