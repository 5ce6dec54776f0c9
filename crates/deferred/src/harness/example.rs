// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The example instance handed to example, hook and helper bodies.

use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use crate::arguments::{Metadata, Value};
use crate::block::HelperFn;
use crate::module::Module;
use crate::receiver::ExampleInstance;

use super::group::ExampleGroup;

/// One example being run, with per-example memoized helpers.
pub struct RunningExample {
    description: String,
    metadata: Metadata,
    helpers: BTreeMap<String, Rc<HelperFn>>,
    memo: BTreeMap<String, Value>,
    evaluating: BTreeSet<String>,
    included: Vec<Module>,
}

impl RunningExample {
    /// Instance for an example nested in `chain`, outermost group first.
    ///
    /// Helpers of inner groups override those of outer groups.
    pub fn new(
        description: impl Into<String>,
        metadata: Metadata,
        chain: &[&ExampleGroup],
    ) -> Self {
        let mut helpers = BTreeMap::new();
        let mut included = Vec::new();
        for group in chain {
            helpers.extend(group.helpers().iter().map(|(k, v)| (k.clone(), Rc::clone(v))));
            for module in group.included_modules() {
                if !included.contains(module) {
                    included.push(module.clone());
                }
            }
        }
        Self {
            description: description.into(),
            metadata,
            helpers,
            memo: BTreeMap::new(),
            evaluating: BTreeSet::new(),
            included,
        }
    }
}

impl ExampleInstance for RunningExample {
    fn description(&self) -> String {
        self.description.clone()
    }

    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn responds_to(&self, name: &str) -> bool {
        self.helpers.contains_key(name)
    }

    fn helper(&mut self, name: &str) -> anyhow::Result<Value> {
        if let Some(value) = self.memo.get(name) {
            return Ok(value.clone());
        }
        let Some(body) = self.helpers.get(name).cloned() else {
            anyhow::bail!("undefined helper `{}` for {:?}", name, self.description);
        };
        if !self.evaluating.insert(name.to_string()) {
            anyhow::bail!("helper `{}` depends on itself", name);
        }
        let result = body(self);
        self.evaluating.remove(name);
        let value = result?;
        self.memo.insert(name.to_string(), value.clone());
        Ok(value)
    }

    fn included_modules(&self) -> Vec<Module> {
        self.included.clone()
    }
}
