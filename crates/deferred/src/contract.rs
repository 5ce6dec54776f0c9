// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Contracts: reusable, parameterized example groups applied by value.

use std::fmt;
use std::rc::Rc;

use crate::arguments::Arguments;
use crate::block::{Block, SharedFn};
use crate::config::Config;
use crate::error::{DeclarationError, Result};
use crate::module::Module;
use crate::receiver::Receiver;

/// A named deferred implementation that can be applied to any group.
#[derive(Clone)]
pub struct Contract {
    description: String,
    implementation: Rc<SharedFn>,
}

impl Contract {
    pub fn new(
        description: impl Into<String>,
        implementation: impl Fn(&Module, &Arguments, Option<&Block>) -> Result<()> + 'static,
    ) -> Result<Self, DeclarationError> {
        let description = description.into();
        if description.trim().is_empty() {
            return Err(DeclarationError::BlankDescription);
        }
        Ok(Self { description, implementation: Rc::new(implementation) })
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Declare the contract into a fresh deferred module.
    pub fn build(&self, arguments: impl Into<Arguments>, block: Option<&Block>) -> Result<Module> {
        let module = Module::anonymous(self.description.as_str());
        (self.implementation)(&module, &arguments.into(), block)?;
        Ok(module)
    }

    /// Build the contract with `arguments` and attach it to `receiver`.
    pub fn apply(
        &self,
        receiver: &mut dyn Receiver,
        arguments: impl Into<Arguments>,
    ) -> Result<()> {
        self.apply_with(receiver, arguments, &Config::default())
    }

    /// [`Contract::apply`] with an explicit config.
    pub fn apply_with(
        &self,
        receiver: &mut dyn Receiver,
        arguments: impl Into<Arguments>,
        config: &Config,
    ) -> Result<()> {
        tracing::debug!("applying contract {:?} to {}", self.description, receiver.description());
        self.build(arguments, None)?.attach_with(receiver, config)
    }

    /// Make the contract resolvable by description from `provider`.
    pub fn register(&self, provider: &Module) -> Result<(), DeclarationError> {
        let implementation = Rc::clone(&self.implementation);
        provider.deferred_examples(&self.description, move |module, arguments, block| {
            implementation(module, arguments, block)
        })
    }
}

impl fmt::Debug for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Contract").field("description", &self.description).finish()
    }
}

#[cfg(test)]
#[path = "contract_tests.rs"]
mod tests;
