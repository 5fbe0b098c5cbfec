// Copyright The Brickwork Authors
// SPDX-License-Identifier: MIT OR Apache-2.0

pub mod actor;
pub mod config;
pub mod log;
pub mod model;
pub mod sys;

mod collections;
