// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Positional and named arguments captured by a deferred call.

use std::fmt;

/// Argument and metadata values.
pub type Value = serde_json::Value;

/// Named arguments, example metadata and hook conditions.
pub type Metadata = serde_json::Map<String, Value>;

/// Arguments passed through to the receiver when a call is replayed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    positional: Vec<Value>,
    named: Metadata,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Set a named argument.
    pub fn named(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.named.insert(key.into(), value.into());
        self
    }

    /// Merge named arguments, later keys win.
    pub fn with_named(mut self, named: Metadata) -> Self {
        self.named.extend(named);
        self
    }

    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    pub fn named_args(&self) -> &Metadata {
        &self.named
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }

    /// The first positional argument, when it is a string.
    pub fn first_str(&self) -> Option<&str> {
        self.positional.first().and_then(Value::as_str)
    }

    /// Copy of these arguments with `value` inserted as the first positional.
    pub fn prepend(&self, value: impl Into<Value>) -> Self {
        let mut positional = Vec::with_capacity(self.positional.len() + 1);
        positional.push(value.into());
        positional.extend(self.positional.iter().cloned());
        Self { positional, named: self.named.clone() }
    }

    /// Copy of these arguments without the first positional.
    pub fn rest(&self) -> Self {
        Self {
            positional: self.positional.iter().skip(1).cloned().collect(),
            named: self.named.clone(),
        }
    }
}

impl From<()> for Arguments {
    fn from(_: ()) -> Self {
        Self::default()
    }
}

impl From<&str> for Arguments {
    fn from(value: &str) -> Self {
        Self::new().arg(value)
    }
}

impl From<String> for Arguments {
    fn from(value: String) -> Self {
        Self::new().arg(value)
    }
}

impl From<&String> for Arguments {
    fn from(value: &String) -> Self {
        Self::new().arg(value.as_str())
    }
}

impl From<Vec<Value>> for Arguments {
    fn from(positional: Vec<Value>) -> Self {
        Self { positional, named: Metadata::new() }
    }
}

impl fmt::Display for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for value in &self.positional {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{}", value)?;
            first = false;
        }
        for (key, value) in &self.named {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", key, value)?;
            first = false;
        }
        Ok(())
    }
}

/// Truthiness used for metadata flags: anything but `null` and `false`.
pub fn is_truthy(value: &Value) -> bool {
    !matches!(value, Value::Null | Value::Bool(false))
}

#[cfg(test)]
#[path = "arguments_tests.rs"]
mod tests;
