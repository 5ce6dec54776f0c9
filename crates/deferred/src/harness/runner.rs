// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sequential example runner with error isolation.
//!
//! Every hook and example body runs behind `catch_unwind`, so a panicking
//! example fails on its own without aborting the run.

use std::panic::AssertUnwindSafe;
use std::rc::Rc;

use crate::arguments::{Metadata, is_truthy};
use crate::block::{AroundFn, Block, Continuation};
use crate::config::Config;
use crate::error::Result;
use crate::receiver::ExampleInstance;

use super::example::RunningExample;
use super::group::{ExampleDefinition, ExampleGroup, GroupHook};
use super::report::{ExampleResult, RunReport};
use super::{FOCUS, PENDING, SKIP};

/// Runs example group trees.
#[derive(Debug, Clone, Default)]
pub struct Runner {
    config: Config,
}

struct RunState {
    report: RunReport,
    focused: bool,
    stopped: bool,
}

impl Runner {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load `group` and run every selected example.
    ///
    /// When any example is focused, only focused examples run. Declaration
    /// and lookup errors raised while loading nested groups are returned;
    /// failures while running are recorded in the report.
    pub fn run(&self, group: &mut ExampleGroup) -> Result<RunReport> {
        group.load()?;
        let focused = has_focus(group, &Metadata::new());
        let mut state = RunState { report: RunReport::default(), focused, stopped: false };
        self.run_group(group, &mut Vec::new(), &mut state);
        tracing::debug!("{}", state.report.summary());
        Ok(state.report)
    }

    fn run_group<'a>(
        &self,
        group: &'a ExampleGroup,
        chain: &mut Vec<&'a ExampleGroup>,
        state: &mut RunState,
    ) {
        chain.push(group);
        let metadata = merged_metadata(chain, None);
        let description = full_description(chain, None);

        if has_selected(group, &metadata, state.focused) {
            let mut context = RunningExample::new(description.as_str(), metadata.clone(), chain);
            let before = run_hooks(&group.hooks().before_context, &metadata, &mut context);

            match before {
                Ok(()) => {
                    for example in group.examples() {
                        if state.stopped {
                            break;
                        }
                        self.run_example(example, chain, state);
                    }
                    for child in group.children() {
                        if state.stopped {
                            break;
                        }
                        self.run_group(child, chain, state);
                    }
                }
                Err(err) => {
                    let message = format!("{:#}", err);
                    tracing::debug!("before(:context) failed in {}: {}", description, message);
                    self.fail_all(group, chain, &message, state);
                }
            }

            if let Err(err) = run_hooks(&group.hooks().after_context, &metadata, &mut context) {
                state.report.errors.push(format!("after(:context) in {}: {:#}", description, err));
            }
        }

        chain.pop();
    }

    fn run_example(
        &self,
        example: &ExampleDefinition,
        chain: &[&ExampleGroup],
        state: &mut RunState,
    ) {
        let metadata = merged_metadata(chain, Some(example));
        let description = full_description(chain, Some(example));
        if !selected(&metadata, state.focused) {
            return;
        }

        let reason = match example.block() {
            _ if flagged(&metadata, SKIP) => Some("skipped"),
            _ if flagged(&metadata, PENDING) => Some("pending"),
            None => Some("not yet implemented"),
            Some(_) => None,
        };
        if let Some(reason) = reason {
            state.report.results.push(ExampleResult::pending(description, reason));
            return;
        }

        let befores: Vec<&GroupHook> = chain
            .iter()
            .flat_map(|g| g.hooks().before_each.iter())
            .filter(|h| h.applies_to(&metadata))
            .collect();
        let afters: Vec<&GroupHook> = chain
            .iter()
            .rev()
            .flat_map(|g| g.hooks().after_each.iter())
            .filter(|h| h.applies_to(&metadata))
            .collect();
        let arounds: Vec<Rc<AroundFn>> = chain
            .iter()
            .flat_map(|g| g.hooks().around.iter())
            .filter(|h| h.applies_to(&metadata))
            .filter_map(|h| match &h.block {
                Block::Around(body) => Some(Rc::clone(body)),
                _ => None,
            })
            .collect();

        let body = example.block();
        let mut core = |instance: &mut dyn ExampleInstance| -> anyhow::Result<()> {
            let mut result = Ok(());
            for hook in &befores {
                result = hook.block.run(instance);
                if result.is_err() {
                    break;
                }
            }
            if result.is_ok()
                && let Some(body) = body
            {
                result = body.run(instance);
            }
            for hook in &afters {
                let after = hook.block.run(instance);
                if result.is_ok() {
                    result = after;
                }
            }
            result
        };

        let mut instance = RunningExample::new(description.as_str(), metadata, chain);
        let outcome = isolate(|| run_around(&arounds, &mut instance, &mut core));
        let result = match outcome {
            Ok(()) => ExampleResult::passed(description),
            Err(err) => ExampleResult::failed(description, format!("{:#}", err)),
        };
        tracing::trace!("{:?} {}", result.status, result.description);
        self.record(result, state);
    }

    /// Fail every selected example under `group` with `message`.
    fn fail_all<'a>(
        &self,
        group: &'a ExampleGroup,
        chain: &mut Vec<&'a ExampleGroup>,
        message: &str,
        state: &mut RunState,
    ) {
        for example in group.examples() {
            let metadata = merged_metadata(chain, Some(example));
            if selected(&metadata, state.focused) {
                let description = full_description(chain, Some(example));
                self.record(ExampleResult::failed(description, message), state);
            }
        }
        for child in group.children() {
            chain.push(child);
            self.fail_all(child, chain, message, state);
            chain.pop();
        }
    }

    fn record(&self, result: ExampleResult, state: &mut RunState) {
        if result.is_failure() && self.config.run.fail_fast {
            state.stopped = true;
        }
        state.report.results.push(result);
    }
}

fn flagged(metadata: &Metadata, key: &str) -> bool {
    metadata.get(key).is_some_and(is_truthy)
}

fn selected(metadata: &Metadata, focused: bool) -> bool {
    !focused || flagged(metadata, FOCUS)
}

/// Metadata of the groups in `chain`, outermost first, then the example's.
fn merged_metadata(chain: &[&ExampleGroup], example: Option<&ExampleDefinition>) -> Metadata {
    let mut metadata = Metadata::new();
    for group in chain {
        metadata.extend(group.metadata().clone());
    }
    if let Some(example) = example {
        metadata.extend(example.metadata().clone());
    }
    metadata
}

fn full_description(chain: &[&ExampleGroup], example: Option<&ExampleDefinition>) -> String {
    let mut parts: Vec<String> = chain.iter().map(|g| g.description().to_string()).collect();
    if let Some(example) = example {
        parts.push(example.description().to_string());
    }
    parts.retain(|p| !p.is_empty());
    parts.join(" ")
}

fn has_focus(group: &ExampleGroup, inherited: &Metadata) -> bool {
    let mut metadata = inherited.clone();
    metadata.extend(group.metadata().clone());
    if flagged(&metadata, FOCUS) {
        return true;
    }
    group.examples().iter().any(|e| flagged(e.metadata(), FOCUS))
        || group.children().iter().any(|child| has_focus(child, &metadata))
}

fn has_selected(group: &ExampleGroup, metadata: &Metadata, focused: bool) -> bool {
    let own = group.examples().iter().any(|example| {
        let mut merged = metadata.clone();
        merged.extend(example.metadata().clone());
        selected(&merged, focused)
    });
    own || group.children().iter().any(|child| {
        let mut merged = metadata.clone();
        merged.extend(child.metadata().clone());
        has_selected(child, &merged, focused)
    })
}

fn run_hooks(
    hooks: &[GroupHook],
    metadata: &Metadata,
    instance: &mut RunningExample,
) -> anyhow::Result<()> {
    for hook in hooks.iter().filter(|h| h.applies_to(metadata)) {
        isolate(|| hook.block.run(instance))?;
    }
    Ok(())
}

/// Nest `around` hooks, first declared outermost, with `core` innermost.
fn run_around(
    hooks: &[Rc<AroundFn>],
    instance: &mut dyn ExampleInstance,
    core: &mut Continuation<'_>,
) -> anyhow::Result<()> {
    match hooks.split_first() {
        None => core(instance),
        Some((outer, rest)) => {
            let mut next = |inner: &mut dyn ExampleInstance| run_around(rest, inner, core);
            outer(instance, &mut next)
        }
    }
}

/// Run `f`, turning a panic into an error.
fn isolate(f: impl FnOnce() -> anyhow::Result<()>) -> anyhow::Result<()> {
    match std::panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(anyhow::anyhow!("panicked: {}", message))
        }
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
