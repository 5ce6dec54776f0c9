// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Lookup of deferred example groups by description.
//!
//! A description resolves to either an implementation registered with
//! [`Module::deferred_examples`] on the module or one of its ancestors, or a
//! module registered in the module's [`Directory`].

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::arguments::Arguments;
use crate::block::{Block, SharedFn};
use crate::error::{DeclarationError, ResolutionError, Result};
use crate::module::Module;

/// Name suffixes dropped when deriving a description from a module name.
const NAME_SUFFIXES: [&str; 3] = ["Context", "Examples", "Example"];

/// Explicit registry of named deferred modules.
#[derive(Clone, Default)]
pub struct Directory(Rc<RefCell<Vec<Module>>>);

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a deferred module registered in this directory.
    pub fn define(&self, name: impl Into<String>) -> Module {
        let module = Module::deferred(name);
        self.register(&module);
        module
    }

    /// Register an existing module. Registering twice is a no-op.
    pub fn register(&self, module: &Module) {
        module.set_directory(self);
        let mut modules = self.0.borrow_mut();
        if !modules.contains(module) {
            modules.push(module.clone());
        }
    }

    pub fn modules(&self) -> Vec<Module> {
        self.0.borrow().clone()
    }

    /// First registered module answering to `description`.
    pub fn find(&self, description: &str) -> Option<Module> {
        self.0.borrow().iter().find(|m| answers_to(m, description)).cloned()
    }
}

impl fmt::Debug for Directory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<String> = self.0.borrow().iter().map(Module::label).collect();
        f.debug_tuple("Directory").field(&labels).finish()
    }
}

/// Whether `module` is known by `description`.
///
/// Matches the module's own description, the description derived from its
/// name, its full name or the last `::` segment of its name.
fn answers_to(module: &Module, description: &str) -> bool {
    if module.description().as_deref() == Some(description) {
        return true;
    }
    let Some(name) = module.name() else {
        return false;
    };
    let short = name.rsplit("::").next().unwrap_or(name);
    name == description || short == description || description_from_name(short) == description
}

/// Derive a description from a CamelCase name.
///
/// `ShouldBeARocketExamples` becomes `should be a rocket`.
pub fn description_from_name(name: &str) -> String {
    let short = name.rsplit("::").next().unwrap_or(name);
    let stem = NAME_SUFFIXES
        .iter()
        .find_map(|suffix| short.strip_suffix(suffix).filter(|s| !s.is_empty()))
        .unwrap_or(short);

    let chars: Vec<char> = stem.chars().collect();
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    for (i, &c) in chars.iter().enumerate() {
        if c == '_' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        let boundary = c.is_uppercase()
            && i > 0
            && (chars[i - 1].is_lowercase()
                || chars[i - 1].is_ascii_digit()
                || (chars[i - 1].is_uppercase()
                    && chars.get(i + 1).is_some_and(|next| next.is_lowercase())));
        if boundary && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.extend(c.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words.join(" ")
}

/// Result of looking up deferred examples.
#[derive(Clone)]
pub enum Resolved {
    /// A bare implementation registered with `deferred_examples`.
    Implementation { description: String, implementation: Rc<SharedFn> },
    /// A module from the directory.
    Module(Module),
}

impl Resolved {
    /// Build the module to include for one call site.
    ///
    /// A bare implementation is wrapped in a fresh deferred module carrying
    /// the description, then invoked with `arguments` and `block`.
    pub fn instantiate(&self, arguments: &Arguments, block: Option<&Block>) -> Result<Module> {
        match self {
            Resolved::Implementation { description, implementation } => {
                let module = Module::anonymous(description.as_str());
                module.set_implementation(Rc::clone(implementation));
                implementation(&module, arguments, block)?;
                Ok(module)
            }
            Resolved::Module(module) => crate::consumer::instantiate(module, arguments, block),
        }
    }
}

impl fmt::Debug for Resolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolved::Implementation { description, .. } => {
                f.debug_struct("Implementation").field("description", description).finish()
            }
            Resolved::Module(module) => f.debug_tuple("Module").field(module).finish(),
        }
    }
}

impl Module {
    /// Register a named, parameterized deferred examples implementation.
    pub fn deferred_examples(
        &self,
        description: &str,
        body: impl Fn(&Module, &Arguments, Option<&Block>) -> Result<()> + 'static,
    ) -> Result<(), DeclarationError> {
        if description.trim().is_empty() {
            return Err(DeclarationError::BlankDescription);
        }
        self.require_deferred("deferred_examples")?;
        self.0.deferred_examples.borrow_mut().insert(description.to_string(), Rc::new(body));
        Ok(())
    }

    /// Resolve `description` through this module's chain, then its directory.
    pub fn find_deferred_examples(&self, description: &str) -> Result<Resolved, ResolutionError> {
        let chain = self.ancestors();

        for module in &chain {
            if let Some(implementation) = module.0.deferred_examples.borrow().get(description) {
                return Ok(Resolved::Implementation {
                    description: description.to_string(),
                    implementation: Rc::clone(implementation),
                });
            }
        }

        for module in &chain {
            if let Some(found) = module.directory().and_then(|d| d.find(description)) {
                return Ok(Resolved::Module(found));
            }
        }

        Err(ResolutionError::DeferredExamplesNotFound(description.to_string()))
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
