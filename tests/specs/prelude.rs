// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Test helpers for behavioral specifications.
//!
//! Provides a shared event log for example bodies and shortcuts for running
//! deferred modules through the bundled harness.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

pub use deferred_examples::harness::{ExampleGroup, ExampleStatus, RunReport, Runner};
pub use deferred_examples::{
    Arguments, Block, CheckLevel, Config, Contract, Directory, Error, ExampleInstance, Metadata,
    Module, Receiver, Value,
};
pub use serde_json::json;

/// Event log shared between a test and the bodies it declares.
#[derive(Clone, Default)]
pub struct Log(Rc<RefCell<Vec<String>>>);

impl Log {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.borrow_mut().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    /// A body that appends `entry` and succeeds.
    pub fn step(
        &self,
        entry: &'static str,
    ) -> impl Fn(&mut dyn ExampleInstance) -> anyhow::Result<()> + 'static {
        let log = self.clone();
        move |_: &mut dyn ExampleInstance| {
            log.push(entry);
            Ok(())
        }
    }
}

/// Receiver that only records `operation(first argument)` labels.
#[derive(Default)]
pub struct Recorder {
    pub operations: Vec<String>,
    pub included: Vec<Module>,
    metadata: Metadata,
}

impl Receiver for Recorder {
    fn description(&self) -> String {
        "Recorder".to_string()
    }

    fn invoke(
        &mut self,
        operation: &str,
        arguments: &Arguments,
        _block: Option<&Block>,
    ) -> deferred_examples::Result<Value> {
        let label = match arguments.first_str() {
            Some(first) => format!("{}({})", operation, first),
            None => operation.to_string(),
        };
        self.operations.push(label);
        Ok(Value::Null)
    }

    fn responds_to(&self, _name: &str) -> bool {
        false
    }

    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    fn include_module(&mut self, module: &Module) {
        self.included.push(module.clone());
    }
}

/// Attach `module` to a fresh group named `description` and run it.
pub fn run_module(description: &str, module: &Module) -> RunReport {
    run_module_with(description, module, &Config::default())
}

pub fn run_module_with(description: &str, module: &Module, config: &Config) -> RunReport {
    let mut group = ExampleGroup::new(description);
    module.attach_with(&mut group, config).unwrap();
    Runner::new(config.clone()).run(&mut group).unwrap()
}

/// Descriptions of every recorded result, in run order.
pub fn ran(report: &RunReport) -> Vec<&str> {
    report.results.iter().map(|r| r.description.as_str()).collect()
}

/// Get path to a test fixture directory
pub fn fixture(name: &str) -> PathBuf {
    let manifest_dir =
        std::env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR should be set");
    PathBuf::from(manifest_dir)
        .parent()
        .expect("parent should exist")
        .parent()
        .expect("grandparent should exist")
        .join("tests")
        .join("fixtures")
        .join(name)
}
