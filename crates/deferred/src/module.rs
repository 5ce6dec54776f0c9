// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Deferred examples modules.
//!
//! A [`Module`] is a shared handle to one node of an inclusion graph. Each
//! module owns its recorded calls, hooks, helpers, dependencies and named
//! deferred-example implementations; including another module makes that
//! module an ancestor whose contributions are merged on replay.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::block::SharedFn;
use crate::call::Deferred;
use crate::dependencies::Dependency;
use crate::error::DeclarationError;
use crate::hook::Hook;
use crate::memoized::HelperImplementations;
use crate::provider::Directory;

/// What a module is able to record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    /// Records deferred calls, hooks and dependencies.
    pub deferred: bool,
    /// Captures unrecognized operations as generic calls.
    pub missing: bool,
}

/// Shared handle to a deferred examples module.
#[derive(Clone)]
pub struct Module(pub(crate) Rc<ModuleInner>);

pub(crate) struct ModuleInner {
    pub(crate) name: Option<String>,
    pub(crate) description: RefCell<Option<String>>,
    pub(crate) capabilities: Cell<Capabilities>,
    pub(crate) calls: RefCell<Vec<Rc<dyn Deferred>>>,
    pub(crate) hooks: RefCell<Vec<Rc<Hook>>>,
    pub(crate) includes: RefCell<Vec<Module>>,
    pub(crate) helpers: RefCell<HelperImplementations>,
    pub(crate) dependencies: RefCell<Vec<Dependency>>,
    pub(crate) deferred_examples: RefCell<BTreeMap<String, Rc<SharedFn>>>,
    pub(crate) implementation: RefCell<Option<Rc<SharedFn>>>,
    pub(crate) directory: RefCell<Option<Directory>>,
}

/// Non-owning reference to a module.
#[derive(Clone)]
pub struct WeakModule(Weak<ModuleInner>);

impl WeakModule {
    pub fn upgrade(&self) -> Option<Module> {
        self.0.upgrade().map(Module)
    }
}

impl fmt::Debug for WeakModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.upgrade() {
            Some(module) => write!(f, "WeakModule({})", module.label()),
            None => f.write_str("WeakModule(dropped)"),
        }
    }
}

impl Module {
    fn build(
        name: Option<String>,
        description: Option<String>,
        capabilities: Capabilities,
    ) -> Self {
        Module(Rc::new(ModuleInner {
            name,
            description: RefCell::new(description),
            capabilities: Cell::new(capabilities),
            calls: RefCell::new(Vec::new()),
            hooks: RefCell::new(Vec::new()),
            includes: RefCell::new(Vec::new()),
            helpers: RefCell::new(HelperImplementations::default()),
            dependencies: RefCell::new(Vec::new()),
            deferred_examples: RefCell::new(BTreeMap::new()),
            implementation: RefCell::new(None),
            directory: RefCell::new(None),
        }))
    }

    /// A named deferred examples module.
    pub fn deferred(name: impl Into<String>) -> Self {
        Self::build(
            Some(name.into()),
            None,
            Capabilities { deferred: true, missing: false },
        )
    }

    /// A named module that only provides helpers.
    pub fn plain(name: impl Into<String>) -> Self {
        Self::build(Some(name.into()), None, Capabilities::default())
    }

    /// An unnamed deferred module with the given description.
    pub fn anonymous(description: impl Into<String>) -> Self {
        Self::build(None, Some(description.into()), Capabilities { deferred: true, missing: false })
    }

    /// Enable capture of unrecognized operations.
    pub fn with_missing(self) -> Self {
        let capabilities = Capabilities { missing: true, ..self.capabilities() };
        self.0.capabilities.set(capabilities);
        self
    }

    /// Set the human readable description.
    pub fn with_description(self, description: impl Into<String>) -> Self {
        self.set_description(description);
        self
    }

    pub fn set_description(&self, description: impl Into<String>) {
        self.0.description.replace(Some(description.into()));
    }

    pub fn name(&self) -> Option<&str> {
        self.0.name.as_deref()
    }

    pub fn description(&self) -> Option<String> {
        self.0.description.borrow().clone()
    }

    /// Description, else name, else a placeholder.
    pub fn label(&self) -> String {
        self.description()
            .or_else(|| self.0.name.clone())
            .unwrap_or_else(|| "(anonymous module)".to_string())
    }

    pub fn capabilities(&self) -> Capabilities {
        self.0.capabilities.get()
    }

    pub fn is_deferred(&self) -> bool {
        self.capabilities().deferred
    }

    pub fn downgrade(&self) -> WeakModule {
        WeakModule(Rc::downgrade(&self.0))
    }

    pub fn directory(&self) -> Option<Directory> {
        self.0.directory.borrow().clone()
    }

    pub(crate) fn set_directory(&self, directory: &Directory) {
        self.0.directory.replace(Some(directory.clone()));
    }

    /// Include `other`, making it an ancestor of this module.
    ///
    /// Including a module that is already an ancestor is a no-op. Including
    /// a module that already has this module as an ancestor is rejected.
    pub fn include(&self, other: &Module) -> Result<(), DeclarationError> {
        if other.ancestors().contains(self) {
            return Err(DeclarationError::CyclicInclusion {
                module: self.label(),
                included: other.label(),
            });
        }
        if self.ancestors().contains(other) {
            return Ok(());
        }
        self.0.includes.borrow_mut().push(other.clone());
        Ok(())
    }

    /// Linearized inclusion chain, most derived first.
    ///
    /// Each include places its own chain, minus modules already present,
    /// right after this module, so later includes come first and every
    /// module precedes the modules it includes.
    pub fn ancestors(&self) -> Vec<Module> {
        let mut chain = vec![self.clone()];
        for included in self.0.includes.borrow().iter() {
            let fresh: Vec<Module> =
                included.ancestors().into_iter().filter(|m| !chain.contains(m)).collect();
            chain.splice(1..1, fresh);
        }
        chain
    }

    pub(crate) fn require_deferred(&self, operation: &str) -> Result<(), DeclarationError> {
        if self.is_deferred() {
            Ok(())
        } else {
            Err(DeclarationError::Unsupported {
                module: self.label(),
                operation: operation.to_string(),
            })
        }
    }

    /// Parameterized implementation run when this module is included by description.
    pub fn implementation(&self) -> Option<Rc<SharedFn>> {
        self.0.implementation.borrow().clone()
    }

    pub(crate) fn set_implementation(&self, implementation: Rc<SharedFn>) {
        self.0.implementation.replace(Some(implementation));
    }
}

impl PartialEq for Module {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Module {}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Module")
            .field("name", &self.0.name)
            .field("description", &self.0.description.borrow())
            .field("capabilities", &self.capabilities())
            .field("calls", &self.0.calls.borrow().len())
            .field("hooks", &self.0.hooks.borrow().len())
            .finish()
    }
}

#[cfg(test)]
#[path = "module_tests.rs"]
mod tests;
