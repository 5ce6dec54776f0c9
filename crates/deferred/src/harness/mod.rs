// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Minimal host framework for running deferred modules end to end.
//!
//! [`ExampleGroup`] accepts every replayed operation and builds a group tree;
//! [`Runner`] executes that tree and collects a [`RunReport`].

mod example;
mod group;
mod report;
mod runner;

pub use example::RunningExample;
pub use group::{ExampleDefinition, ExampleGroup, GroupHook, GroupHooks};
pub use report::{ExampleResult, ExampleStatus, RunReport};
pub use runner::Runner;

/// Metadata key marking a focused example or group.
pub const FOCUS: &str = "focus";

/// Metadata key marking a skipped example or group.
pub const SKIP: &str = "skip";

/// Metadata key marking a pending example.
pub const PENDING: &str = "pending";
