// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The interface a host test framework exposes to replayed calls.

use crate::arguments::{Arguments, Metadata, Value};
use crate::block::Block;
use crate::error::{Error, Result};
use crate::module::Module;

/// A concrete example group that deferred calls are replayed against.
///
/// Every DSL operation a deferred module uses must be accepted by
/// [`Receiver::invoke`]: `describe`, `context`, `it`, `before`, `after`,
/// `around`, `let`, `shared_examples`, `include_examples` and so on.
/// Operations the receiver does not know must fail with
/// [`Error::NoSuchOperation`] (see [`no_such_operation`]).
pub trait Receiver {
    /// Human readable name of the group.
    fn description(&self) -> String;

    /// Perform a named operation.
    fn invoke(&mut self, operation: &str, arguments: &Arguments, block: Option<&Block>)
    -> Result<Value>;

    /// Whether examples in this group can call the named helper.
    fn responds_to(&self, name: &str) -> bool;

    fn metadata(&self) -> &Metadata;

    fn metadata_mut(&mut self) -> &mut Metadata;

    /// Record `module` as included in this group.
    fn include_module(&mut self, module: &Module);
}

/// A running example, as seen by example, hook and helper bodies.
pub trait ExampleInstance {
    /// Full description, including enclosing groups.
    fn description(&self) -> String;

    /// Example metadata merged with the metadata of its groups.
    fn metadata(&self) -> &Metadata;

    fn responds_to(&self, name: &str) -> bool;

    /// Value of a memoized helper, computed on first use.
    fn helper(&mut self, name: &str) -> anyhow::Result<Value>;

    /// Modules included in the example's group and its parents.
    fn included_modules(&self) -> Vec<Module>;
}

/// Error for an operation the receiver does not support.
pub fn no_such_operation(receiver: &dyn Receiver, operation: &str) -> Error {
    Error::NoSuchOperation { receiver: receiver.description(), operation: operation.to_string() }
}
