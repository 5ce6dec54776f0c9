// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Concrete example groups.
//!
//! Operations replayed into an [`ExampleGroup`] are applied right away,
//! except nested groups: those are queued and built by [`ExampleGroup::load`]
//! once the enclosing group is complete, so a nested group sees every helper
//! and shared group of its parents regardless of replay order.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::rc::Rc;

use serde_json::json;

use crate::arguments::{Arguments, Metadata, Value, is_truthy};
use crate::block::{Block, HelperFn, SharedFn};
use crate::call::Deferred;
use crate::dsl::{EXAMPLE_GROUP_OPERATIONS, EXAMPLE_OPERATIONS};
use crate::error::{DeclarationError, Error, ResolutionError, Result};
use crate::hook::{Hook, HookPosition, HookScope, conditions_match};
use crate::module::Module;
use crate::receiver::{Receiver, no_such_operation};
use crate::shared::SHARED_EXAMPLES_OPERATIONS;

use super::{FOCUS, PENDING, SKIP};

/// A hook registered on a concrete group.
#[derive(Debug, Clone)]
pub struct GroupHook {
    pub scope: HookScope,
    pub conditions: Metadata,
    pub block: Block,
}

impl GroupHook {
    /// Whether the hook fires for an example with `metadata`.
    pub fn applies_to(&self, metadata: &Metadata) -> bool {
        conditions_match(&self.conditions, metadata)
    }
}

/// Hooks of one group, in run order.
#[derive(Debug, Clone, Default)]
pub struct GroupHooks {
    pub before_context: Vec<GroupHook>,
    pub after_context: Vec<GroupHook>,
    pub before_each: Vec<GroupHook>,
    pub after_each: Vec<GroupHook>,
    pub around: Vec<GroupHook>,
}

impl GroupHooks {
    /// `before` and `append_after` append; `prepend_before` and `after` prepend.
    fn add(&mut self, position: HookPosition, hook: GroupHook) {
        let per_example = hook.scope.per_example();
        match position {
            HookPosition::Before if per_example => self.before_each.push(hook),
            HookPosition::Before => self.before_context.push(hook),
            HookPosition::PrependBefore if per_example => self.before_each.insert(0, hook),
            HookPosition::PrependBefore => self.before_context.insert(0, hook),
            HookPosition::After if per_example => self.after_each.insert(0, hook),
            HookPosition::After => self.after_context.insert(0, hook),
            HookPosition::AppendAfter if per_example => self.after_each.push(hook),
            HookPosition::AppendAfter => self.after_context.push(hook),
            HookPosition::Around => self.around.push(hook),
        }
    }
}

/// One declared example.
#[derive(Debug, Clone)]
pub struct ExampleDefinition {
    description: String,
    metadata: Metadata,
    block: Option<Block>,
}

impl ExampleDefinition {
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// The example body; `None` for examples declared without one.
    pub fn block(&self) -> Option<&Block> {
        self.block.as_ref()
    }
}

#[derive(Debug)]
enum ChildBody {
    Group(Block),
    Shared { name: String, block: Option<Block> },
}

#[derive(Debug)]
struct PendingChild {
    description: String,
    metadata: Metadata,
    arguments: Arguments,
    body: ChildBody,
}

/// A concrete example group built from replayed operations.
#[derive(Default)]
pub struct ExampleGroup {
    description: String,
    metadata: Metadata,
    examples: Vec<ExampleDefinition>,
    children: Vec<ExampleGroup>,
    pending_children: Vec<PendingChild>,
    hooks: GroupHooks,
    helpers: BTreeMap<String, Rc<HelperFn>>,
    inherited_helpers: BTreeSet<String>,
    shared: BTreeMap<String, Rc<SharedFn>>,
    inherited_shared: BTreeMap<String, Rc<SharedFn>>,
    included: Vec<Module>,
}

impl ExampleGroup {
    pub fn new(description: impl Into<String>) -> Self {
        Self { description: description.into(), ..Self::default() }
    }

    /// Build a top-level group from a body, then load its nested groups.
    pub fn describe(
        description: impl Into<String>,
        body: impl Fn(&Module) -> Result<()> + 'static,
    ) -> Result<Self> {
        let mut group = Self::new(description);
        Block::group(body).evaluate(&mut group, &Arguments::new())?;
        group.load()?;
        Ok(group)
    }

    fn nested(description: String, metadata: Metadata, parent: &ExampleGroup) -> Self {
        let mut inherited_helpers = parent.inherited_helpers.clone();
        inherited_helpers.extend(parent.helpers.keys().cloned());
        let mut inherited_shared = parent.inherited_shared.clone();
        inherited_shared.extend(parent.shared.iter().map(|(k, v)| (k.clone(), Rc::clone(v))));
        Self {
            description,
            metadata,
            inherited_helpers,
            inherited_shared,
            ..Self::default()
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn examples(&self) -> &[ExampleDefinition] {
        &self.examples
    }

    pub fn children(&self) -> &[ExampleGroup] {
        &self.children
    }

    pub fn hooks(&self) -> &GroupHooks {
        &self.hooks
    }

    /// Helpers defined on this group.
    pub fn helpers(&self) -> &BTreeMap<String, Rc<HelperFn>> {
        &self.helpers
    }

    /// Modules attached to this group.
    pub fn included_modules(&self) -> &[Module] {
        &self.included
    }

    /// Build queued nested groups, depth first. Calling it again is a no-op.
    pub fn load(&mut self) -> Result<()> {
        let pending = std::mem::take(&mut self.pending_children);
        for child in pending {
            let mut group = ExampleGroup::nested(child.description, child.metadata, self);
            match child.body {
                ChildBody::Group(block) => block.evaluate(&mut group, &child.arguments)?,
                ChildBody::Shared { name, block } => {
                    let shared = self.find_shared(&name)?;
                    let module = Module::anonymous(group.description.as_str());
                    shared(&module, &child.arguments, block.as_ref())?;
                    module.attach(&mut group)?;
                }
            }
            group.load()?;
            tracing::trace!("loaded {} in {}", group.description, self.description);
            self.children.push(group);
        }
        Ok(())
    }

    fn find_shared(&self, name: &str) -> Result<Rc<SharedFn>, ResolutionError> {
        self.shared
            .get(name)
            .or_else(|| self.inherited_shared.get(name))
            .cloned()
            .ok_or_else(|| ResolutionError::SharedExamplesNotFound(name.to_string()))
    }

    fn add_child(
        &mut self,
        operation: &str,
        arguments: &Arguments,
        block: Option<&Block>,
    ) -> Result<Value> {
        let block = block.ok_or_else(|| DeclarationError::MissingBlock(operation.to_string()))?;
        block.expect_kind(operation, "group")?;
        let description = describe_first(arguments, "anonymous group");
        let metadata = metadata_for(operation, arguments);
        self.pending_children.push(PendingChild {
            description,
            metadata,
            arguments: arguments.rest(),
            body: ChildBody::Group(block.clone()),
        });
        Ok(Value::Null)
    }

    fn add_example(
        &mut self,
        operation: &str,
        arguments: &Arguments,
        block: Option<&Block>,
    ) -> Value {
        let description = describe_first(arguments, "example");
        let metadata = metadata_for(operation, arguments);
        self.examples.push(ExampleDefinition {
            description: description.clone(),
            metadata,
            block: block.cloned(),
        });
        Value::String(description)
    }

    fn add_hook(
        &mut self,
        operation: &str,
        arguments: &Arguments,
        block: Option<&Block>,
    ) -> Result<Value> {
        let hook = Hook::from_arguments(operation, arguments, block.cloned())?;
        let Some(block) = hook.block().cloned() else {
            return Err(DeclarationError::MissingBlock(operation.to_string()).into());
        };
        let group_hook =
            GroupHook { scope: hook.scope(), conditions: hook.conditions().clone(), block };
        self.hooks.add(hook.position(), group_hook);
        Ok(Value::Null)
    }

    fn define_helper(
        &mut self,
        operation: &str,
        arguments: &Arguments,
        block: Option<&Block>,
    ) -> Result<Value> {
        let name = match (operation, arguments.first_str()) {
            (_, Some(name)) => name.to_string(),
            ("subject", None) => "subject".to_string(),
            _ => return Err(Error::invalid_arguments(operation, "expected a helper name")),
        };
        let Some(Block::Helper(body)) = block else {
            return Err(Error::invalid_arguments(operation, "expected a helper block"));
        };
        self.helpers.insert(name, Rc::clone(body));
        Ok(Value::Null)
    }

    fn define_shared(
        &mut self,
        operation: &str,
        arguments: &Arguments,
        block: Option<&Block>,
    ) -> Result<Value> {
        let Some(name) = arguments.first_str() else {
            return Err(Error::invalid_arguments(operation, "expected a shared group name"));
        };
        let Some(Block::Shared(body)) = block else {
            return Err(Error::invalid_arguments(operation, "expected a shared block"));
        };
        self.shared.insert(name.to_string(), Rc::clone(body));
        Ok(Value::Null)
    }

    fn include_shared(
        &mut self,
        operation: &str,
        arguments: &Arguments,
        block: Option<&Block>,
    ) -> Result<Value> {
        let Some(name) = arguments.first_str() else {
            return Err(Error::invalid_arguments(operation, "expected a shared group name"));
        };
        let shared = self.find_shared(name)?;
        let module = Module::anonymous(name);
        shared(&module, &arguments.rest(), block)?;
        module.attach(self)?;
        Ok(Value::Null)
    }

    fn nest_shared(
        &mut self,
        operation: &str,
        arguments: &Arguments,
        block: Option<&Block>,
    ) -> Result<Value> {
        let Some(name) = arguments.first_str() else {
            return Err(Error::invalid_arguments(operation, "expected a shared group name"));
        };
        self.pending_children.push(PendingChild {
            description: format!("behaves like {}", name),
            metadata: Metadata::new(),
            arguments: arguments.rest(),
            body: ChildBody::Shared { name: name.to_string(), block: block.cloned() },
        });
        Ok(Value::Null)
    }
}

/// First positional as a description, or `fallback`.
fn describe_first(arguments: &Arguments, fallback: &str) -> String {
    match arguments.positional().first() {
        Some(Value::String(description)) => description.clone(),
        Some(other) => other.to_string(),
        None => fallback.to_string(),
    }
}

/// Named arguments, trailing positional flags and the operation's implied flag.
fn metadata_for(operation: &str, arguments: &Arguments) -> Metadata {
    let mut metadata = Metadata::new();
    for flag in arguments.positional().iter().skip(1).filter_map(Value::as_str) {
        metadata.insert(flag.to_string(), json!(true));
    }
    metadata.extend(arguments.named_args().clone());

    let implied = match operation {
        "xdescribe" | "xcontext" | "xit" | "xexample" | "xspecify" | "skip" => Some(SKIP),
        "fdescribe" | "fcontext" | "focus" | "fit" | "fexample" | "fspecify" => Some(FOCUS),
        "pending" => Some(PENDING),
        _ => None,
    };
    if let Some(key) = implied
        && !metadata.get(key).is_some_and(is_truthy)
    {
        metadata.insert(key.to_string(), json!(true));
    }
    metadata
}

impl Receiver for ExampleGroup {
    fn description(&self) -> String {
        self.description.clone()
    }

    fn invoke(
        &mut self,
        operation: &str,
        arguments: &Arguments,
        block: Option<&Block>,
    ) -> Result<Value> {
        match operation {
            op if EXAMPLE_GROUP_OPERATIONS.contains(&op) => self.add_child(op, arguments, block),
            op if EXAMPLE_OPERATIONS.contains(&op) => Ok(self.add_example(op, arguments, block)),
            op if HookPosition::parse(op).is_some() => self.add_hook(op, arguments, block),
            "let" | "subject" => self.define_helper(operation, arguments, block),
            op if SHARED_EXAMPLES_OPERATIONS.contains(&op) => {
                self.define_shared(op, arguments, block)
            }
            "include_examples" | "include_context" => {
                self.include_shared(operation, arguments, block)
            }
            "it_behaves_like" | "it_should_behave_like" => {
                self.nest_shared(operation, arguments, block)
            }
            _ => Err(no_such_operation(self, operation)),
        }
    }

    fn responds_to(&self, name: &str) -> bool {
        self.helpers.contains_key(name) || self.inherited_helpers.contains(name)
    }

    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    fn include_module(&mut self, module: &Module) {
        if !self.included.contains(module) {
            self.included.push(module.clone());
        }
    }
}

impl fmt::Debug for ExampleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExampleGroup")
            .field("description", &self.description)
            .field("metadata", &self.metadata)
            .field("examples", &self.examples.len())
            .field("children", &self.children)
            .field("helpers", &self.helpers.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
#[path = "group_tests.rs"]
mod tests;
