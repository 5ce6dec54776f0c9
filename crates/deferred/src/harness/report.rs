// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Run results.

use serde::Serialize;

/// Outcome of one example.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExampleStatus {
    Passed,
    Failed,
    Pending,
}

/// Result of running a single example.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExampleResult {
    /// Full description, including enclosing groups.
    pub description: String,

    pub status: ExampleStatus,

    /// Failure message or pending reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ExampleResult {
    pub fn passed(description: impl Into<String>) -> Self {
        Self { description: description.into(), status: ExampleStatus::Passed, message: None }
    }

    pub fn failed(description: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            status: ExampleStatus::Failed,
            message: Some(message.into()),
        }
    }

    pub fn pending(description: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            status: ExampleStatus::Pending,
            message: Some(reason.into()),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.status == ExampleStatus::Failed
    }
}

/// Every example result of a run, in run order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub results: Vec<ExampleResult>,

    /// Failures outside any example, such as `after(:context)` hooks.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl RunReport {
    fn count(&self, status: ExampleStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }

    pub fn passed(&self) -> usize {
        self.count(ExampleStatus::Passed)
    }

    pub fn failed(&self) -> usize {
        self.count(ExampleStatus::Failed)
    }

    pub fn pending(&self) -> usize {
        self.count(ExampleStatus::Pending)
    }

    pub fn failures(&self) -> impl Iterator<Item = &ExampleResult> {
        self.results.iter().filter(|r| r.is_failure())
    }

    /// No failed example and no error outside examples.
    pub fn is_success(&self) -> bool {
        self.failed() == 0 && self.errors.is_empty()
    }

    /// `3 examples, 1 failure, 1 pending`.
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "{}, {}",
            pluralize(self.results.len(), "example"),
            pluralize(self.failed(), "failure")
        );
        if self.pending() > 0 {
            summary.push_str(&format!(", {} pending", self.pending()));
        }
        if !self.errors.is_empty() {
            summary.push_str(&format!(
                ", {} occurred outside of examples",
                pluralize(self.errors.len(), "error")
            ));
        }
        summary
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn pluralize(count: usize, noun: &str) -> String {
    if count == 1 { format!("{} {}", count, noun) } else { format!("{} {}s", count, noun) }
}
