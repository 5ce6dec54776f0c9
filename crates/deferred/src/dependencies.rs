// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Declared helper dependencies.
//!
//! A deferred module can declare the helpers its examples expect the
//! including group to define. When the module is attached, the group gets a
//! single `prepend_before(:context)` hook that checks every declaration from
//! every included module and reports all missing helpers at once, before any
//! example runs.

use crate::arguments::{Metadata, Value, is_truthy};
use crate::block::Block;
use crate::call::Deferred;
use crate::config::CheckLevel;
use crate::error::{DeclarationError, MissingDependenciesError, Result};
use crate::hook::Hook;
use crate::module::{Module, WeakModule};
use crate::receiver::{ExampleInstance, Receiver};

/// Operation name of a dependency declaration.
pub const DEPENDS_ON: &str = "depends_on";

/// Group metadata flag set once the dependency check is registered.
pub const INSTRUMENTED_FLAG: &str = "deferred_dependencies";

const HEADER: &str =
    "Unable to run specs because the following methods are not defined in the examples:";

const FOOTER: &str = "Please define the missing methods or :let helpers.";

/// A helper the declaring module expects to be defined.
#[derive(Debug, Clone)]
pub struct Dependency {
    owner: WeakModule,
    method_name: String,
    description: Option<String>,
}

impl Dependency {
    /// The declaring module, if it is still alive.
    pub fn owner(&self) -> Option<Module> {
        self.owner.upgrade()
    }

    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// A dependency the running example does not respond to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingDependency {
    /// Description of the module that declared it.
    pub group: String,
    pub method_name: String,
    pub description: Option<String>,
}

/// `#rocket` becomes `rocket`.
fn normalize_method_name(name: &str) -> &str {
    name.trim().trim_start_matches('#').trim()
}

impl Module {
    /// Declare that examples of this module call `method_name`.
    pub fn depends_on(
        &self,
        method_name: &str,
        description: Option<&str>,
    ) -> Result<(), DeclarationError> {
        let method_name = normalize_method_name(method_name);
        if method_name.is_empty() {
            return Err(DeclarationError::BlankMethodName);
        }
        self.require_deferred(DEPENDS_ON)?;
        tracing::trace!("{}: depends on #{}", self.label(), method_name);
        self.0.dependencies.borrow_mut().push(Dependency {
            owner: self.downgrade(),
            method_name: method_name.to_string(),
            description: description.map(str::to_string),
        });
        Ok(())
    }

    /// Dependencies declared directly on this module.
    pub fn dependencies(&self) -> Vec<Dependency> {
        self.0.dependencies.borrow().clone()
    }

    fn chain_has_dependencies(&self) -> bool {
        self.ancestors().iter().any(|m| !m.0.dependencies.borrow().is_empty())
    }
}

/// Register the dependency check on `receiver`, once per group.
pub(crate) fn instrument(
    module: &Module,
    receiver: &mut dyn Receiver,
    level: CheckLevel,
) -> Result<()> {
    if level == CheckLevel::Off || !module.chain_has_dependencies() {
        return Ok(());
    }
    if receiver.metadata().get(INSTRUMENTED_FLAG).is_some_and(is_truthy) {
        tracing::trace!("{} already checks dependencies", receiver.description());
        return Ok(());
    }
    receiver.metadata_mut().insert(INSTRUMENTED_FLAG.to_string(), Value::Bool(true));
    tracing::debug!("registering dependency check on {}", receiver.description());

    let block = Block::example(move |example| match check_dependencies_for(example) {
        Ok(()) => Ok(()),
        Err(err) if level == CheckLevel::Warn => {
            tracing::warn!("{}", err);
            Ok(())
        }
        Err(err) => Err(err.into()),
    });
    let hook = Hook::new("prepend_before", "context", &[], Metadata::new(), Some(block))?;
    hook.replay(receiver)?;
    Ok(())
}

/// Check every dependency declared by modules included in the example's groups.
pub fn check_dependencies_for(
    example: &dyn ExampleInstance,
) -> Result<(), MissingDependenciesError> {
    let mut seen: Vec<Module> = Vec::new();
    for included in example.included_modules() {
        for module in included.ancestors() {
            if !seen.contains(&module) {
                seen.push(module);
            }
        }
    }

    let mut missing: Vec<MissingDependency> = Vec::new();
    for module in &seen {
        for dependency in module.0.dependencies.borrow().iter() {
            if example.responds_to(&dependency.method_name) {
                continue;
            }
            let group = dependency
                .owner()
                .map(|owner| owner.label())
                .unwrap_or_else(|| module.label());
            let entry = MissingDependency {
                group,
                method_name: dependency.method_name.clone(),
                description: dependency.description.clone(),
            };
            if !missing.contains(&entry) {
                missing.push(entry);
            }
        }
    }

    if missing.is_empty() {
        return Ok(());
    }
    Err(MissingDependenciesError::new(format_message(&missing), missing))
}

fn format_message(missing: &[MissingDependency]) -> String {
    let mut groups: Vec<(&str, Vec<&MissingDependency>)> = Vec::new();
    for dependency in missing {
        match groups.iter_mut().find(|(group, _)| *group == dependency.group) {
            Some((_, entries)) => entries.push(dependency),
            None => groups.push((dependency.group.as_str(), vec![dependency])),
        }
    }

    let mut message = String::from(HEADER);
    for (group, entries) in &groups {
        message.push_str(&format!("\n\n  {}:", group));
        for entry in entries {
            message.push_str(&match &entry.description {
                Some(description) => format!("\n    #{}: {}", entry.method_name, description),
                None => format!("\n    #{}", entry.method_name),
            });
        }
    }
    message.push_str("\n\n");
    message.push_str(FOOTER);
    message
}

#[cfg(test)]
#[path = "dependencies_tests.rs"]
mod tests;
