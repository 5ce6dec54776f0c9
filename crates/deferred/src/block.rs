// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Callbacks carried by deferred calls.
//!
//! Group bodies declare into a fresh deferred [`Module`] that is attached to
//! the nested concrete group once the host creates it. Example, hook and
//! helper bodies run against a live [`ExampleInstance`].

use std::fmt;
use std::rc::Rc;

use crate::arguments::{Arguments, Value};
use crate::error::{DeclarationError, Result};
use crate::module::Module;
use crate::receiver::{ExampleInstance, Receiver};

/// Body of `describe`, `context` and friends.
pub type GroupFn = dyn Fn(&Module) -> Result<()>;

/// Parameterized body of shared or deferred example groups.
pub type SharedFn = dyn Fn(&Module, &Arguments, Option<&Block>) -> Result<()>;

/// Body of an example or a before/after hook.
pub type ExampleFn = dyn Fn(&mut dyn ExampleInstance) -> anyhow::Result<()>;

/// The rest of the example chain, handed to an around hook.
pub type Continuation<'a> = dyn FnMut(&mut dyn ExampleInstance) -> anyhow::Result<()> + 'a;

/// Body of an around hook.
pub type AroundFn = dyn Fn(&mut dyn ExampleInstance, &mut Continuation<'_>) -> anyhow::Result<()>;

/// Body of a memoized helper.
pub type HelperFn = dyn Fn(&mut dyn ExampleInstance) -> anyhow::Result<Value>;

/// A callback passed along with a deferred call.
#[derive(Clone)]
pub enum Block {
    Group(Rc<GroupFn>),
    Shared(Rc<SharedFn>),
    Example(Rc<ExampleFn>),
    Around(Rc<AroundFn>),
    Helper(Rc<HelperFn>),
}

impl Block {
    pub fn group(body: impl Fn(&Module) -> Result<()> + 'static) -> Self {
        Block::Group(Rc::new(body))
    }

    pub fn shared(
        body: impl Fn(&Module, &Arguments, Option<&Block>) -> Result<()> + 'static,
    ) -> Self {
        Block::Shared(Rc::new(body))
    }

    pub fn example(
        body: impl Fn(&mut dyn ExampleInstance) -> anyhow::Result<()> + 'static,
    ) -> Self {
        Block::Example(Rc::new(body))
    }

    pub fn around(
        body: impl Fn(&mut dyn ExampleInstance, &mut Continuation<'_>) -> anyhow::Result<()>
        + 'static,
    ) -> Self {
        Block::Around(Rc::new(body))
    }

    pub fn helper(
        body: impl Fn(&mut dyn ExampleInstance) -> anyhow::Result<Value> + 'static,
    ) -> Self {
        Block::Helper(Rc::new(body))
    }

    /// Short name of the block variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Block::Group(_) => "group",
            Block::Shared(_) => "shared",
            Block::Example(_) => "example",
            Block::Around(_) => "around",
            Block::Helper(_) => "helper",
        }
    }

    /// True when both blocks wrap the same callback.
    pub fn ptr_eq(&self, other: &Block) -> bool {
        match (self, other) {
            (Block::Group(a), Block::Group(b)) => Rc::ptr_eq(a, b),
            (Block::Shared(a), Block::Shared(b)) => Rc::ptr_eq(a, b),
            (Block::Example(a), Block::Example(b)) => Rc::ptr_eq(a, b),
            (Block::Around(a), Block::Around(b)) => Rc::ptr_eq(a, b),
            (Block::Helper(a), Block::Helper(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Evaluate a group or shared body against a concrete group.
    ///
    /// The body declares into an anonymous deferred module, which is then
    /// attached to `receiver`. Hosts call this from their `describe` and
    /// `include_examples` implementations.
    pub fn evaluate(&self, receiver: &mut dyn Receiver, arguments: &Arguments) -> Result<()> {
        let module = Module::anonymous(receiver.description());
        match self {
            Block::Group(body) => body(&module)?,
            Block::Shared(body) => body(&module, arguments, None)?,
            other => {
                return Err(DeclarationError::WrongBlock {
                    operation: "evaluate".to_string(),
                    expected: "group",
                    actual: other.kind(),
                }
                .into());
            }
        }
        module.attach(receiver)
    }

    /// Run an example or hook body.
    pub fn run(&self, example: &mut dyn ExampleInstance) -> anyhow::Result<()> {
        match self {
            Block::Example(body) => body(example),
            Block::Helper(body) => body(example).map(|_| ()),
            other => anyhow::bail!("{} block can't be run as an example", other.kind()),
        }
    }

    pub(crate) fn expect_kind(
        &self,
        operation: &str,
        expected: &'static str,
    ) -> std::result::Result<(), DeclarationError> {
        if self.kind() == expected {
            Ok(())
        } else {
            Err(DeclarationError::WrongBlock {
                operation: operation.to_string(),
                expected,
                actual: self.kind(),
            })
        }
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Block::{}", self.kind())
    }
}
