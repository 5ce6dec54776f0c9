// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Deferred calls.
//!
//! A [`Call`] captures one DSL invocation (operation name, arguments and an
//! optional block) and can replay it against any [`Receiver`].

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::arguments::{Arguments, Value};
use crate::block::Block;
use crate::error::{DeclarationError, Result};
use crate::receiver::Receiver;

/// Identifier-shaped operation names, optionally ending in `!` or `?`.
#[allow(clippy::expect_used)]
static OPERATION_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*[!?]?$").expect("valid regex pattern")
});

/// Category of a deferred call, used to order replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    Example,
    ExampleGroup,
    Hook,
    IncludedExamples,
    SharedExamples,
    Generic,
}

/// Number of replay buckets.
pub(crate) const BUCKETS: usize = 4;

impl CallKind {
    /// Replay bucket: examples, then example groups, then hooks, then the rest.
    pub(crate) fn bucket(self) -> usize {
        match self {
            CallKind::Example => 0,
            CallKind::ExampleGroup => 1,
            CallKind::Hook => 2,
            CallKind::IncludedExamples | CallKind::SharedExamples | CallKind::Generic => 3,
        }
    }
}

/// Anything that can be recorded on a module and replayed later.
pub trait Deferred: fmt::Debug {
    fn operation(&self) -> &str;

    fn arguments(&self) -> &Arguments;

    fn block(&self) -> Option<&Block>;

    fn kind(&self) -> CallKind;

    /// Invoke the recorded operation on `receiver`.
    ///
    /// Errors raised by the receiver propagate unchanged.
    fn replay(&self, receiver: &mut dyn Receiver) -> Result<Value>;
}

/// A recorded DSL invocation.
#[derive(Debug, Clone)]
pub struct Call {
    operation: String,
    arguments: Arguments,
    block: Option<Block>,
    kind: CallKind,
}

impl Call {
    /// Create a generic call.
    pub fn new(
        operation: &str,
        arguments: impl Into<Arguments>,
        block: Option<Block>,
    ) -> Result<Self, DeclarationError> {
        Self::with_kind(CallKind::Generic, operation, arguments, block)
    }

    pub fn with_kind(
        kind: CallKind,
        operation: &str,
        arguments: impl Into<Arguments>,
        block: Option<Block>,
    ) -> Result<Self, DeclarationError> {
        validate_operation_name(operation)?;
        Ok(Self { operation: operation.to_string(), arguments: arguments.into(), block, kind })
    }
}

impl Deferred for Call {
    fn operation(&self) -> &str {
        &self.operation
    }

    fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    fn block(&self) -> Option<&Block> {
        self.block.as_ref()
    }

    fn kind(&self) -> CallKind {
        self.kind
    }

    fn replay(&self, receiver: &mut dyn Receiver) -> Result<Value> {
        receiver.invoke(&self.operation, &self.arguments, self.block.as_ref())
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.operation, self.arguments)
    }
}

/// Reject blank or non-identifier operation names.
pub(crate) fn validate_operation_name(name: &str) -> Result<(), DeclarationError> {
    if name.trim().is_empty() {
        return Err(DeclarationError::BlankOperationName);
    }
    if !OPERATION_NAME.is_match(name) {
        return Err(DeclarationError::InvalidOperationName(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
#[path = "call_tests.rs"]
mod tests;
