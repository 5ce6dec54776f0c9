// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Deferred calls that define or include shared example groups.

use std::fmt;

use crate::arguments::{Arguments, Value};
use crate::block::Block;
use crate::call::{CallKind, Deferred};
use crate::consumer;
use crate::error::{DeclarationError, Result};
use crate::module::Module;
use crate::receiver::Receiver;

/// Operations defining a shared group.
pub const SHARED_EXAMPLES_OPERATIONS: [&str; 3] =
    ["shared_examples", "shared_examples_for", "shared_context"];

/// Operations including a shared group.
pub const INCLUDED_EXAMPLES_OPERATIONS: [&str; 4] =
    ["include_examples", "include_context", "it_behaves_like", "it_should_behave_like"];

/// Operations that wrap the included group in a nested example group.
const NESTING_OPERATIONS: [&str; 2] = ["it_behaves_like", "it_should_behave_like"];

/// Name of a shared group: a description or a module.
#[derive(Debug, Clone, PartialEq)]
pub enum SharedName {
    Description(String),
    Module(Module),
}

impl SharedName {
    fn validate(&self) -> Result<(), DeclarationError> {
        match self {
            SharedName::Description(name) if name.trim().is_empty() => {
                Err(DeclarationError::BlankSharedName)
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for SharedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SharedName::Description(name) => f.write_str(name),
            SharedName::Module(module) => f.write_str(&module.label()),
        }
    }
}

impl From<&str> for SharedName {
    fn from(name: &str) -> Self {
        SharedName::Description(name.to_string())
    }
}

impl From<String> for SharedName {
    fn from(name: String) -> Self {
        SharedName::Description(name)
    }
}

impl From<&Module> for SharedName {
    fn from(module: &Module) -> Self {
        SharedName::Module(module.clone())
    }
}

impl From<Module> for SharedName {
    fn from(module: Module) -> Self {
        SharedName::Module(module)
    }
}

/// Deferred `shared_examples`, `shared_examples_for` or `shared_context`.
#[derive(Debug, Clone)]
pub struct SharedExamples {
    operation: &'static str,
    name: String,
    arguments: Arguments,
    block: Block,
}

impl SharedExamples {
    pub fn new(
        operation: &str,
        name: &str,
        metadata: Arguments,
        block: Option<Block>,
    ) -> Result<Self, DeclarationError> {
        let operation = SHARED_EXAMPLES_OPERATIONS
            .into_iter()
            .find(|op| *op == operation)
            .ok_or_else(|| DeclarationError::InvalidOperationName(operation.to_string()))?;
        SharedName::from(name).validate()?;
        let block = block.ok_or_else(|| DeclarationError::MissingBlock(operation.to_string()))?;
        block.expect_kind(operation, "shared")?;
        let arguments = metadata.prepend(name);
        Ok(Self { operation, name: name.to_string(), arguments, block })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Deferred for SharedExamples {
    fn operation(&self) -> &str {
        self.operation
    }

    fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    fn block(&self) -> Option<&Block> {
        Some(&self.block)
    }

    fn kind(&self) -> CallKind {
        CallKind::SharedExamples
    }

    fn replay(&self, receiver: &mut dyn Receiver) -> Result<Value> {
        receiver.invoke(self.operation, &self.arguments, Some(&self.block))
    }
}

/// Deferred `include_examples`, `include_context` or `it_behaves_like`.
///
/// A description name is passed to the receiver as is. A module name is
/// instantiated with the call-site arguments and attached directly, nested
/// in a `behaves like` group for the nesting operations.
#[derive(Debug, Clone)]
pub struct IncludedExamples {
    operation: &'static str,
    name: SharedName,
    arguments: Arguments,
    block: Option<Block>,
}

impl IncludedExamples {
    pub fn new(
        operation: &str,
        name: impl Into<SharedName>,
        arguments: Arguments,
        block: Option<Block>,
    ) -> Result<Self, DeclarationError> {
        let operation = INCLUDED_EXAMPLES_OPERATIONS
            .into_iter()
            .find(|op| *op == operation)
            .ok_or_else(|| DeclarationError::InvalidOperationName(operation.to_string()))?;
        let name = name.into();
        name.validate()?;
        let arguments = match &name {
            SharedName::Description(description) => arguments.prepend(description.as_str()),
            SharedName::Module(_) => arguments,
        };
        Ok(Self { operation, name, arguments, block })
    }

    pub fn name(&self) -> &SharedName {
        &self.name
    }

    fn nests(&self) -> bool {
        NESTING_OPERATIONS.contains(&self.operation)
    }
}

impl Deferred for IncludedExamples {
    fn operation(&self) -> &str {
        self.operation
    }

    fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    fn block(&self) -> Option<&Block> {
        self.block.as_ref()
    }

    fn kind(&self) -> CallKind {
        CallKind::IncludedExamples
    }

    fn replay(&self, receiver: &mut dyn Receiver) -> Result<Value> {
        let module = match &self.name {
            SharedName::Description(_) => {
                return receiver.invoke(self.operation, &self.arguments, self.block.as_ref());
            }
            SharedName::Module(module) => module,
        };

        let instance = consumer::instantiate(module, &self.arguments, self.block.as_ref())?;
        if self.nests() {
            let description = format!("behaves like {}", module.label());
            let body = Block::group(move |group| Ok(group.include(&instance)?));
            receiver.invoke("describe", &Arguments::from(description), Some(&body))
        } else {
            instance.attach(receiver)?;
            Ok(Value::Null)
        }
    }
}

#[cfg(test)]
#[path = "shared_tests.rs"]
mod tests;
