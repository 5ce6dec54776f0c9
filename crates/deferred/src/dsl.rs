// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Declarative front-end.
//!
//! Every method records a deferred call on the module and returns; nothing
//! runs until the module is attached to a concrete group. [`Module::send`]
//! is the dynamic entry point: it routes recognized operation names to the
//! matching call type and, for modules with the missing capability, records
//! anything else as a generic call.

use std::rc::Rc;

use crate::arguments::{Arguments, Metadata};
use crate::block::{Block, Continuation};
use crate::call::{Call, CallKind, validate_operation_name};
use crate::dependencies::DEPENDS_ON;
use crate::error::{DeclarationError, Result};
use crate::hook::{Hook, HookPosition};
use crate::memoized::HELPER_OPERATIONS;
use crate::module::Module;
use crate::receiver::ExampleInstance;
use crate::shared::{
    INCLUDED_EXAMPLES_OPERATIONS, IncludedExamples, SHARED_EXAMPLES_OPERATIONS, SharedExamples,
    SharedName,
};

/// Operations declaring a nested example group.
pub const EXAMPLE_GROUP_OPERATIONS: [&str; 7] =
    ["describe", "context", "example_group", "xdescribe", "xcontext", "fdescribe", "fcontext"];

/// Operations declaring an example.
pub const EXAMPLE_OPERATIONS: [&str; 12] = [
    "it", "example", "specify", "focus", "fit", "fexample", "fspecify", "xit", "xexample",
    "xspecify", "skip", "pending",
];

macro_rules! example_group_methods {
    ($($name:ident),* $(,)?) => {
        impl Module {
            $(
                #[doc = concat!("Deferred `", stringify!($name), "`: a nested example group.")]
                pub fn $name(
                    &self,
                    arguments: impl Into<Arguments>,
                    body: impl Fn(&Module) -> Result<()> + 'static,
                ) -> Result<(), DeclarationError> {
                    let block = Some(Block::group(body));
                    self.record(CallKind::ExampleGroup, stringify!($name), arguments.into(), block)
                }
            )*
        }
    };
}

macro_rules! example_methods {
    ($($name:ident),* $(,)?) => {
        impl Module {
            $(
                #[doc = concat!("Deferred `", stringify!($name), "`: a single example.")]
                pub fn $name(
                    &self,
                    arguments: impl Into<Arguments>,
                    body: impl Fn(&mut dyn ExampleInstance) -> anyhow::Result<()> + 'static,
                ) -> Result<(), DeclarationError> {
                    let block = Some(Block::example(body));
                    self.record(CallKind::Example, stringify!($name), arguments.into(), block)
                }
            )*
        }
    };
}

example_group_methods!(describe, context, example_group, xdescribe, xcontext, fdescribe, fcontext);

example_methods!(
    it, example, specify, focus, fit, fexample, fspecify, xit, xexample, xspecify, skip, pending,
);

impl Module {
    fn record(
        &self,
        kind: CallKind,
        operation: &str,
        arguments: Arguments,
        block: Option<Block>,
    ) -> Result<(), DeclarationError> {
        if let Some(block) = &block {
            let expected = if kind == CallKind::ExampleGroup { "group" } else { "example" };
            block.expect_kind(operation, expected)?;
        }
        self.push_call(Rc::new(Call::with_kind(kind, operation, arguments, block)?))
    }

    /// Deferred hook with flags and conditions.
    pub fn hook(
        &self,
        method: &str,
        scope: &str,
        flags: &[&str],
        conditions: Metadata,
        block: Block,
    ) -> Result<(), DeclarationError> {
        self.push_hook(Hook::new(method, scope, flags, conditions, Some(block))?)
    }

    /// Deferred `before(scope)`.
    pub fn before(
        &self,
        scope: &str,
        body: impl Fn(&mut dyn ExampleInstance) -> anyhow::Result<()> + 'static,
    ) -> Result<(), DeclarationError> {
        self.hook("before", scope, &[], Metadata::new(), Block::example(body))
    }

    /// Deferred `prepend_before(scope)`.
    pub fn prepend_before(
        &self,
        scope: &str,
        body: impl Fn(&mut dyn ExampleInstance) -> anyhow::Result<()> + 'static,
    ) -> Result<(), DeclarationError> {
        self.hook("prepend_before", scope, &[], Metadata::new(), Block::example(body))
    }

    /// Deferred `after(scope)`.
    pub fn after(
        &self,
        scope: &str,
        body: impl Fn(&mut dyn ExampleInstance) -> anyhow::Result<()> + 'static,
    ) -> Result<(), DeclarationError> {
        self.hook("after", scope, &[], Metadata::new(), Block::example(body))
    }

    /// Deferred `append_after(scope)`.
    pub fn append_after(
        &self,
        scope: &str,
        body: impl Fn(&mut dyn ExampleInstance) -> anyhow::Result<()> + 'static,
    ) -> Result<(), DeclarationError> {
        self.hook("append_after", scope, &[], Metadata::new(), Block::example(body))
    }

    /// Deferred `around(scope)`. Only the `example` scope is accepted.
    pub fn around(
        &self,
        scope: &str,
        body: impl Fn(&mut dyn ExampleInstance, &mut Continuation<'_>) -> anyhow::Result<()>
        + 'static,
    ) -> Result<(), DeclarationError> {
        self.hook("around", scope, &[], Metadata::new(), Block::around(body))
    }

    fn record_shared(
        &self,
        operation: &str,
        name: &str,
        body: impl Fn(&Module, &Arguments, Option<&Block>) -> Result<()> + 'static,
    ) -> Result<(), DeclarationError> {
        let block = Some(Block::shared(body));
        let call = SharedExamples::new(operation, name, Arguments::new(), block)?;
        self.push_call(Rc::new(call))
    }

    /// Deferred `shared_examples(name)`.
    pub fn shared_examples(
        &self,
        name: &str,
        body: impl Fn(&Module, &Arguments, Option<&Block>) -> Result<()> + 'static,
    ) -> Result<(), DeclarationError> {
        self.record_shared("shared_examples", name, body)
    }

    /// Deferred `shared_examples_for(name)`.
    pub fn shared_examples_for(
        &self,
        name: &str,
        body: impl Fn(&Module, &Arguments, Option<&Block>) -> Result<()> + 'static,
    ) -> Result<(), DeclarationError> {
        self.record_shared("shared_examples_for", name, body)
    }

    /// Deferred `shared_context(name)`.
    pub fn shared_context(
        &self,
        name: &str,
        body: impl Fn(&Module, &Arguments, Option<&Block>) -> Result<()> + 'static,
    ) -> Result<(), DeclarationError> {
        self.record_shared("shared_context", name, body)
    }

    fn record_included(
        &self,
        operation: &str,
        name: SharedName,
        arguments: Arguments,
    ) -> Result<(), DeclarationError> {
        self.push_call(Rc::new(IncludedExamples::new(operation, name, arguments, None)?))
    }

    /// Deferred `include_examples(name, arguments...)`.
    pub fn include_examples(
        &self,
        name: impl Into<SharedName>,
        arguments: impl Into<Arguments>,
    ) -> Result<(), DeclarationError> {
        self.record_included("include_examples", name.into(), arguments.into())
    }

    /// Deferred `include_context(name, arguments...)`.
    pub fn include_context(
        &self,
        name: impl Into<SharedName>,
        arguments: impl Into<Arguments>,
    ) -> Result<(), DeclarationError> {
        self.record_included("include_context", name.into(), arguments.into())
    }

    /// Deferred `it_behaves_like(name, arguments...)`: the shared group nested.
    pub fn it_behaves_like(
        &self,
        name: impl Into<SharedName>,
        arguments: impl Into<Arguments>,
    ) -> Result<(), DeclarationError> {
        self.record_included("it_behaves_like", name.into(), arguments.into())
    }

    /// Deferred `it_should_behave_like(name, arguments...)`.
    pub fn it_should_behave_like(
        &self,
        name: impl Into<SharedName>,
        arguments: impl Into<Arguments>,
    ) -> Result<(), DeclarationError> {
        self.record_included("it_should_behave_like", name.into(), arguments.into())
    }

    /// Record any operation by name.
    ///
    /// Recognized names are recorded as their typed call. Anything else is a
    /// generic call when the module has the missing capability, and an
    /// [`DeclarationError::UnknownOperation`] otherwise.
    pub fn send(
        &self,
        operation: &str,
        arguments: impl Into<Arguments>,
        block: Option<Block>,
    ) -> Result<(), DeclarationError> {
        validate_operation_name(operation)?;
        let arguments = arguments.into();

        if EXAMPLE_GROUP_OPERATIONS.contains(&operation) {
            return self.record(CallKind::ExampleGroup, operation, arguments, block);
        }
        if EXAMPLE_OPERATIONS.contains(&operation) {
            return self.record(CallKind::Example, operation, arguments, block);
        }
        if HookPosition::parse(operation).is_some() {
            return self.push_hook(Hook::from_arguments(operation, &arguments, block)?);
        }
        if SHARED_EXAMPLES_OPERATIONS.contains(&operation) {
            let name = arguments.first_str().unwrap_or("").to_string();
            let call = SharedExamples::new(operation, &name, arguments.rest(), block)?;
            return self.push_call(Rc::new(call));
        }
        if INCLUDED_EXAMPLES_OPERATIONS.contains(&operation) {
            let name = arguments.first_str().unwrap_or("").to_string();
            let call = IncludedExamples::new(operation, name, arguments.rest(), block)?;
            return self.push_call(Rc::new(call));
        }
        if HELPER_OPERATIONS.contains(&operation) {
            return match block {
                Some(Block::Helper(body)) => {
                    self.declare_helper(operation, arguments.first_str(), body)
                }
                Some(other) => Err(DeclarationError::WrongBlock {
                    operation: operation.to_string(),
                    expected: "helper",
                    actual: other.kind(),
                }),
                None => Err(DeclarationError::MissingBlock(operation.to_string())),
            };
        }
        if operation == DEPENDS_ON {
            let method_name = arguments.first_str().unwrap_or("");
            let description = arguments.positional().get(1).and_then(|v| v.as_str());
            return self.depends_on(method_name, description);
        }

        if self.capabilities().missing {
            tracing::trace!("{}: capturing {} as a generic call", self.label(), operation);
            return self.push_call(Rc::new(Call::new(operation, arguments, block)?));
        }
        Err(DeclarationError::UnknownOperation {
            module: self.label(),
            operation: operation.to_string(),
        })
    }
}

#[cfg(test)]
#[path = "dsl_tests.rs"]
mod tests;
