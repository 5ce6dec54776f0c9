// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared unit test utilities.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::collections::BTreeSet;

use serde_json::json;

use crate::arguments::{Arguments, Metadata, Value};
use crate::block::Block;
use crate::error::Result;
use crate::module::Module;
use crate::receiver::{ExampleInstance, Receiver, no_such_operation};

/// Install a test subscriber honoring `RUST_LOG`. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// One invocation seen by a [`RecordingReceiver`].
#[derive(Debug, Clone)]
pub struct Invocation {
    pub operation: String,
    pub arguments: Arguments,
    pub block: Option<Block>,
}

impl Invocation {
    /// `operation(first positional)` or just `operation`.
    pub fn label(&self) -> String {
        match self.arguments.positional().first() {
            Some(Value::String(s)) => format!("{}({})", self.operation, s),
            Some(other) => format!("{}({})", self.operation, other),
            None => self.operation.clone(),
        }
    }
}

/// Receiver that records every invocation and answers with `"ok"`.
#[derive(Default)]
pub struct RecordingReceiver {
    pub invocations: Vec<Invocation>,
    pub metadata: Metadata,
    pub helpers: BTreeSet<String>,
    pub included: Vec<Module>,
    /// Operations answered with `NoSuchOperation`.
    pub unsupported: BTreeSet<String>,
}

impl RecordingReceiver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting(operations: &[&str]) -> Self {
        Self { unsupported: operations.iter().map(|s| s.to_string()).collect(), ..Self::default() }
    }

    pub fn labels(&self) -> Vec<String> {
        self.invocations.iter().map(Invocation::label).collect()
    }

    pub fn operations(&self) -> Vec<&str> {
        self.invocations.iter().map(|i| i.operation.as_str()).collect()
    }
}

impl Receiver for RecordingReceiver {
    fn description(&self) -> String {
        "RecordingReceiver".to_string()
    }

    fn invoke(
        &mut self,
        operation: &str,
        arguments: &Arguments,
        block: Option<&Block>,
    ) -> Result<Value> {
        if self.unsupported.contains(operation) {
            return Err(no_such_operation(self, operation));
        }
        if operation == "let"
            && let Some(name) = arguments.first_str()
        {
            self.helpers.insert(name.to_string());
        }
        self.invocations.push(Invocation {
            operation: operation.to_string(),
            arguments: arguments.clone(),
            block: block.cloned(),
        });
        Ok(json!("ok"))
    }

    fn responds_to(&self, name: &str) -> bool {
        self.helpers.contains(name)
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

/// A do-nothing example block.
pub fn noop() -> Block {
    Block::example(|_| Ok(()))
}

/// Example instance answering to a fixed set of helper names.
#[derive(Default)]
pub struct StubExample {
    pub helpers: BTreeSet<String>,
    pub included: Vec<Module>,
    pub metadata: Metadata,
}

impl StubExample {
    pub fn new(included: &[&Module], helpers: &[&str]) -> Self {
        Self {
            helpers: helpers.iter().map(|s| s.to_string()).collect(),
            included: included.iter().map(|m| (*m).clone()).collect(),
            metadata: Metadata::new(),
        }
    }
}

impl ExampleInstance for StubExample {
    fn description(&self) -> String {
        "stub example".to_string()
    }

    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn responds_to(&self, name: &str) -> bool {
        self.helpers.contains(name)
    }

    fn helper(&mut self, name: &str) -> anyhow::Result<Value> {
        if self.helpers.contains(name) {
            Ok(json!(name))
        } else {
            anyhow::bail!("undefined helper `{}`", name)
        }
    }

    fn included_modules(&self) -> Vec<Module> {
        self.included.clone()
    }
}
