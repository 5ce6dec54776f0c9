// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Deferred, composable example groups for test suites.
//!
//! A [`Module`] records declarative test operations (`describe`, `it`,
//! `before`, `let`, `include_examples`, ...) as immutable calls instead of
//! running them. When the module is attached to a concrete example group
//! (anything implementing [`Receiver`]), the recorded calls from the module
//! and every module it includes are replayed in a deterministic order.
//!
//! The [`harness`] module ships a small conforming host so deferred modules
//! can be run end to end.

pub mod arguments;
pub mod block;
pub mod call;
pub mod config;
pub mod consumer;
pub mod contract;
pub mod definitions;
pub mod dependencies;
pub mod dsl;
pub mod error;
pub mod harness;
pub mod hook;
pub mod memoized;
pub mod module;
pub mod provider;
pub mod receiver;
pub mod shared;

#[cfg(test)]
pub(crate) mod test_utils;

pub use arguments::{Arguments, Metadata, Value};
pub use block::Block;
pub use call::{Call, CallKind, Deferred};
pub use config::{CheckLevel, Config};
pub use consumer::include_deferred_in;
pub use contract::Contract;
pub use dependencies::{Dependency, MissingDependency, check_dependencies_for};
pub use error::{DeclarationError, Error, MissingDependenciesError, ResolutionError, Result};
pub use hook::{Hook, HookPosition, HookScope};
pub use module::{Capabilities, Module};
pub use provider::{Directory, Resolved};
pub use receiver::{ExampleInstance, Receiver};
pub use shared::{IncludedExamples, SharedExamples, SharedName};
