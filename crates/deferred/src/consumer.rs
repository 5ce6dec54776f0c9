// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Including deferred examples by description.

use crate::arguments::Arguments;
use crate::block::Block;
use crate::config::Config;
use crate::error::Result;
use crate::module::Module;
use crate::receiver::Receiver;

/// Build the module to include for a module found by name.
///
/// A module with a parameterized implementation gets a fresh per-call-site
/// module that includes it and runs the implementation with `arguments`.
pub(crate) fn instantiate(
    module: &Module,
    arguments: &Arguments,
    block: Option<&Block>,
) -> Result<Module> {
    let Some(implementation) = module.implementation() else {
        return Ok(module.clone());
    };
    let instance = Module::anonymous(module.label());
    instance.include(module)?;
    implementation(&instance, arguments, block)?;
    Ok(instance)
}

impl Module {
    /// Include the deferred examples known by `description`.
    ///
    /// The examples are replayed when this module is attached.
    pub fn include_deferred(
        &self,
        description: &str,
        arguments: impl Into<Arguments>,
        block: Option<Block>,
    ) -> Result<()> {
        let resolved = self.find_deferred_examples(description)?;
        tracing::debug!("{}: including deferred {:?}", self.label(), description);
        let instance = resolved.instantiate(&arguments.into(), block.as_ref())?;
        self.include(&instance)?;
        Ok(())
    }
}

/// Resolve `description` through `provider` and attach it to a concrete group.
pub fn include_deferred_in(
    receiver: &mut dyn Receiver,
    provider: &Module,
    description: &str,
    arguments: impl Into<Arguments>,
    block: Option<Block>,
) -> Result<()> {
    include_deferred_in_with(receiver, provider, description, arguments, block, &Config::default())
}

/// [`include_deferred_in`] with an explicit config.
pub fn include_deferred_in_with(
    receiver: &mut dyn Receiver,
    provider: &Module,
    description: &str,
    arguments: impl Into<Arguments>,
    block: Option<Block>,
    config: &Config,
) -> Result<()> {
    let resolved = provider.find_deferred_examples(description)?;
    let instance = resolved.instantiate(&arguments.into(), block.as_ref())?;
    instance.attach_with(receiver, config)
}

#[cfg(test)]
#[path = "consumer_tests.rs"]
mod tests;
