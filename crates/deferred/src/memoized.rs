// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Memoized helpers: `let`, `let!`, `let?`, `subject` and `subject!`.
//!
//! Helpers are not deferred calls. They are defined on the module right
//! away and handed to the receiver (as `let` operations) when the module is
//! attached, most inherited module first.

use std::rc::Rc;

use serde_json::json;

use crate::arguments::{Arguments, Metadata, Value};
use crate::block::{Block, HelperFn};
use crate::error::{DeclarationError, Result};
use crate::hook::Hook;
use crate::module::Module;
use crate::receiver::{ExampleInstance, Receiver};

/// Operations that define helpers instead of recording calls.
pub const HELPER_OPERATIONS: [&str; 5] = ["let", "let!", "let?", "subject", "subject!"];

/// Name of the implicit subject helper.
pub const SUBJECT: &str = "subject";

/// One helper definition.
#[derive(Clone)]
pub struct Helper {
    name: String,
    block: Rc<HelperFn>,
    conditional: bool,
}

impl Helper {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn block(&self) -> Block {
        Block::Helper(Rc::clone(&self.block))
    }

    /// Defined with `let?`: skipped when the parent scope already has it.
    pub fn is_conditional(&self) -> bool {
        self.conditional
    }
}

impl std::fmt::Debug for Helper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Helper")
            .field("name", &self.name)
            .field("conditional", &self.conditional)
            .finish()
    }
}

/// Helpers defined on one module, in definition order.
///
/// Redefining a name replaces the earlier definition in place.
#[derive(Debug, Clone, Default)]
pub struct HelperImplementations {
    helpers: Vec<Helper>,
}

impl HelperImplementations {
    pub fn get(&self, name: &str) -> Option<&Helper> {
        self.helpers.iter().find(|h| h.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Helper> {
        self.helpers.iter()
    }

    pub fn len(&self) -> usize {
        self.helpers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.helpers.is_empty()
    }

    fn define(&mut self, helper: Helper) {
        match self.helpers.iter_mut().find(|h| h.name == helper.name) {
            Some(existing) => *existing = helper,
            None => self.helpers.push(helper),
        }
    }
}

fn validate_helper_name(name: &str) -> Result<(), DeclarationError> {
    if name.trim().is_empty() {
        return Err(DeclarationError::BlankHelperName);
    }
    crate::call::validate_operation_name(name)
}

impl Module {
    fn define_helper(
        &self,
        name: &str,
        block: Rc<HelperFn>,
        conditional: bool,
    ) -> Result<(), DeclarationError> {
        validate_helper_name(name)?;
        tracing::trace!("{}: defined helper {}", self.label(), name);
        self.0.helpers.borrow_mut().define(Helper { name: name.to_string(), block, conditional });
        Ok(())
    }

    /// Force evaluation of `name` before every example.
    fn eager_evaluate(&self, name: &str) -> Result<(), DeclarationError> {
        let name = name.to_string();
        let block = Block::example(move |example| example.helper(&name).map(|_| ()));
        self.push_hook(Hook::new("before", "example", &[], Metadata::new(), Some(block))?)
    }

    /// Declare a helper through one of the helper operations.
    pub(crate) fn declare_helper(
        &self,
        operation: &str,
        name: Option<&str>,
        block: Rc<HelperFn>,
    ) -> Result<(), DeclarationError> {
        let required = || name.ok_or(DeclarationError::BlankHelperName);
        match operation {
            "let" => self.define_helper(required()?, block, false),
            "let?" => self.define_helper(required()?, block, true),
            "let!" => {
                self.require_deferred(operation)?;
                let name = required()?;
                self.define_helper(name, block, false)?;
                self.eager_evaluate(name)
            }
            "subject" => self.define_subject(name, block),
            "subject!" => {
                self.require_deferred(operation)?;
                self.define_subject(name, block)?;
                self.eager_evaluate(SUBJECT)
            }
            other => Err(DeclarationError::UnknownOperation {
                module: self.label(),
                operation: other.to_string(),
            }),
        }
    }

    /// A named subject defines both `name` and `subject`, sharing one value.
    fn define_subject(
        &self,
        name: Option<&str>,
        block: Rc<HelperFn>,
    ) -> Result<(), DeclarationError> {
        match name {
            Some(name) if name != SUBJECT => {
                self.define_helper(name, block, false)?;
                let alias = name.to_string();
                let subject = move |example: &mut dyn ExampleInstance| example.helper(&alias);
                self.define_helper(SUBJECT, Rc::new(subject), false)
            }
            _ => self.define_helper(SUBJECT, block, false),
        }
    }

    /// `let(name) { ... }`: a helper computed once per example.
    pub fn let_(
        &self,
        name: &str,
        body: impl Fn(&mut dyn ExampleInstance) -> anyhow::Result<Value> + 'static,
    ) -> Result<(), DeclarationError> {
        self.declare_helper("let", Some(name), Rc::new(body))
    }

    /// `let!(name) { ... }`: like `let`, evaluated before each example.
    pub fn let_bang(
        &self,
        name: &str,
        body: impl Fn(&mut dyn ExampleInstance) -> anyhow::Result<Value> + 'static,
    ) -> Result<(), DeclarationError> {
        self.declare_helper("let!", Some(name), Rc::new(body))
    }

    /// `let?(name) { ... }`: only defined if the parent scope lacks `name`.
    pub fn let_maybe(
        &self,
        name: &str,
        body: impl Fn(&mut dyn ExampleInstance) -> anyhow::Result<Value> + 'static,
    ) -> Result<(), DeclarationError> {
        self.declare_helper("let?", Some(name), Rc::new(body))
    }

    /// `subject { ... }` or `subject(name) { ... }`.
    pub fn subject(
        &self,
        name: Option<&str>,
        body: impl Fn(&mut dyn ExampleInstance) -> anyhow::Result<Value> + 'static,
    ) -> Result<(), DeclarationError> {
        self.declare_helper("subject", name, Rc::new(body))
    }

    /// `subject!`: a subject evaluated before each example.
    pub fn subject_bang(
        &self,
        name: Option<&str>,
        body: impl Fn(&mut dyn ExampleInstance) -> anyhow::Result<Value> + 'static,
    ) -> Result<(), DeclarationError> {
        self.declare_helper("subject!", name, Rc::new(body))
    }

    /// Helpers defined directly on this module.
    pub fn helper_implementations(&self) -> HelperImplementations {
        self.0.helpers.borrow().clone()
    }

    /// Whether this module or any ancestor defines `name`.
    pub fn provides_helper(&self, name: &str) -> bool {
        self.ancestors().iter().any(|m| m.0.helpers.borrow().contains(name))
    }

    /// Define every helper of the chain on `receiver`, most inherited first.
    ///
    /// A `let?` helper is skipped when the receiver already responds to its
    /// name, whether from a parent group or an earlier module in the chain.
    pub(crate) fn install_helpers(&self, receiver: &mut dyn Receiver) -> Result<()> {
        let mut chain = self.ancestors();
        chain.reverse();
        for module in &chain {
            let helpers = module.helper_implementations();
            for helper in helpers.iter() {
                if helper.is_conditional() && receiver.responds_to(helper.name()) {
                    tracing::trace!("{}: keeping inherited {}", module.label(), helper.name());
                    continue;
                }
                let arguments = Arguments::new().arg(json!(helper.name()));
                receiver.invoke("let", &arguments, Some(&helper.block()))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "memoized_tests.rs"]
mod tests;
