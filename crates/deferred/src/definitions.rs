// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Replay ordering and activation.
//!
//! Calls recorded on a module and on every deferred module it includes are
//! merged into one sequence:
//!
//! 1. examples, then example groups, then hooks, then everything else;
//! 2. within a bucket, the most inherited module contributes first and the
//!    module itself last, each module's calls contiguous and in declaration
//!    order;
//! 3. hooks are gathered into one combined list the same way; hooks flagged
//!    for reverse order are replayed from that combined list reversed once.

use std::rc::Rc;

use crate::call::{BUCKETS, CallKind, Deferred};
use crate::config::Config;
use crate::dependencies;
use crate::error::{DeclarationError, Result};
use crate::hook::Hook;
use crate::module::Module;
use crate::receiver::Receiver;

impl Module {
    pub(crate) fn push_call(&self, call: Rc<dyn Deferred>) -> Result<(), DeclarationError> {
        self.require_deferred(call.operation())?;
        tracing::trace!("{}: recorded {} ({:?})", self.label(), call.operation(), call.kind());
        self.0.calls.borrow_mut().push(call);
        Ok(())
    }

    pub(crate) fn push_hook(&self, hook: Hook) -> Result<(), DeclarationError> {
        self.require_deferred(hook.operation())?;
        tracing::trace!("{}: recorded {} hook", self.label(), hook.position());
        self.0.hooks.borrow_mut().push(Rc::new(hook));
        Ok(())
    }

    /// Calls recorded directly on this module, in declaration order.
    pub fn deferred_calls(&self) -> Vec<Rc<dyn Deferred>> {
        self.0.calls.borrow().clone()
    }

    /// Hooks recorded directly on this module, in declaration order.
    pub fn deferred_hooks(&self) -> Vec<Rc<Hook>> {
        self.0.hooks.borrow().clone()
    }

    /// Deferred modules in the chain, most inherited first.
    fn contributing_modules(&self) -> Vec<Module> {
        let mut chain: Vec<Module> =
            self.ancestors().into_iter().filter(Module::is_deferred).collect();
        chain.reverse();
        chain
    }

    /// The full replay sequence for this module and its deferred ancestors.
    ///
    /// Recomputed on every call; nothing is cached.
    pub fn ordered_deferred_calls(&self) -> Vec<Rc<dyn Deferred>> {
        let chain = self.contributing_modules();

        let mut buckets: [Vec<Rc<dyn Deferred>>; BUCKETS] = Default::default();
        let mut hooks: Vec<Rc<Hook>> = Vec::new();

        for module in &chain {
            for call in module.0.calls.borrow().iter() {
                buckets[call.kind().bucket()].push(Rc::clone(call));
            }
            hooks.extend(module.0.hooks.borrow().iter().cloned());
        }

        let (reversed, in_order): (Vec<Rc<Hook>>, Vec<Rc<Hook>>) =
            hooks.into_iter().partition(|hook| hook.reverse_order());
        let hook_bucket = &mut buckets[CallKind::Hook.bucket()];
        hook_bucket.extend(in_order.into_iter().map(|hook| hook as Rc<dyn Deferred>));
        hook_bucket.extend(reversed.into_iter().rev().map(|hook| hook as Rc<dyn Deferred>));

        buckets.into_iter().flatten().collect()
    }

    /// Replay the ordered sequence against `receiver`.
    ///
    /// Stops at the first failing call.
    pub fn call(&self, receiver: &mut dyn Receiver) -> Result<()> {
        let calls = self.ordered_deferred_calls();
        tracing::debug!(
            "replaying {} deferred calls from {} into {}",
            calls.len(),
            self.label(),
            receiver.description()
        );
        for call in &calls {
            tracing::trace!("replay {} {}", call.operation(), call.arguments());
            call.replay(receiver)?;
        }
        Ok(())
    }

    /// Attach this module to a concrete group with the default config.
    pub fn attach(&self, receiver: &mut dyn Receiver) -> Result<()> {
        self.attach_with(receiver, &Config::default())
    }

    /// Attach this module to a concrete group.
    ///
    /// Records the inclusion, defines memoized helpers, registers the
    /// dependency check once per group, then replays every deferred call.
    pub fn attach_with(&self, receiver: &mut dyn Receiver, config: &Config) -> Result<()> {
        tracing::debug!("attaching {} to {}", self.label(), receiver.description());
        receiver.include_module(self);
        self.install_helpers(receiver)?;
        dependencies::instrument(self, receiver, config.dependencies.check)?;
        self.call(receiver)
    }
}

#[cfg(test)]
#[path = "definitions_tests.rs"]
mod tests;
