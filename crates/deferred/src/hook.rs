// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Deferred lifecycle hooks.
//!
//! A [`Hook`] is a deferred call with a validated scope and a position.
//! Positions map onto the host's hook lists:
//!
//! | position         | host list          | runs                         |
//! |------------------|--------------------|------------------------------|
//! | `prepend_before` | front of `before`  | before every plain `before`  |
//! | `before`         | back of `before`   | declaration order            |
//! | `around`         | back of `around`   | first declared is outermost  |
//! | `after`          | front of `after`   | reverse declaration order    |
//! | `append_after`   | back of `after`    | after every plain `after`    |
//!
//! Hooks that land at the front of their list via `prepend_before`, or at
//! the back via `append_after`, carry the reverse-order flag so that replay
//! preserves outermost-ancestor nesting.

use std::fmt;

use crate::arguments::{Arguments, Metadata, Value, is_truthy};
use crate::block::Block;
use crate::call::{CallKind, Deferred};
use crate::error::{DeclarationError, Result};
use crate::receiver::Receiver;

/// Which hook method declared the hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookPosition {
    Before,
    PrependBefore,
    After,
    AppendAfter,
    Around,
}

impl HookPosition {
    pub const ALL: [HookPosition; 5] = [
        HookPosition::Before,
        HookPosition::PrependBefore,
        HookPosition::After,
        HookPosition::AppendAfter,
        HookPosition::Around,
    ];

    pub fn parse(method: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == method)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HookPosition::Before => "before",
            HookPosition::PrependBefore => "prepend_before",
            HookPosition::After => "after",
            HookPosition::AppendAfter => "append_after",
            HookPosition::Around => "around",
        }
    }

    /// Replayed in reverse so that earlier declarations stay outermost.
    pub fn reverse_order(self) -> bool {
        matches!(self, HookPosition::PrependBefore | HookPosition::AppendAfter)
    }
}

impl fmt::Display for HookPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// When a hook runs: once per group, or around every example.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookScope {
    Context,
    Each,
    Example,
}

impl HookScope {
    pub fn parse(scope: &str) -> Option<Self> {
        match scope {
            "context" => Some(HookScope::Context),
            "each" => Some(HookScope::Each),
            "example" => Some(HookScope::Example),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HookScope::Context => "context",
            HookScope::Each => "each",
            HookScope::Example => "example",
        }
    }

    /// `each` and `example` both run once per example.
    pub fn per_example(self) -> bool {
        !matches!(self, HookScope::Context)
    }
}

/// A deferred `before`, `prepend_before`, `after`, `append_after` or `around`.
#[derive(Debug, Clone)]
pub struct Hook {
    position: HookPosition,
    scope: HookScope,
    conditions: Metadata,
    arguments: Arguments,
    block: Block,
}

impl Hook {
    /// Validate and build a hook.
    ///
    /// `flags` are folded into `conditions` as `{flag: true}`.
    pub fn new(
        method: &str,
        scope: &str,
        flags: &[&str],
        conditions: Metadata,
        block: Option<Block>,
    ) -> Result<Self, DeclarationError> {
        let position = HookPosition::parse(method)
            .ok_or_else(|| DeclarationError::InvalidHookMethod(method.to_string()))?;

        if scope.trim().is_empty() {
            return Err(DeclarationError::BlankScope);
        }
        let invalid_scope = || DeclarationError::InvalidScope {
            method: method.to_string(),
            scope: scope.to_string(),
        };
        let scope = HookScope::parse(scope).ok_or_else(invalid_scope)?;
        if position == HookPosition::Around && scope != HookScope::Example {
            return Err(invalid_scope());
        }

        let block = block.ok_or_else(|| DeclarationError::MissingBlock(method.to_string()))?;
        let expected = if position == HookPosition::Around { "around" } else { "example" };
        block.expect_kind(method, expected)?;

        let mut conditions = conditions;
        for flag in flags {
            if flag.trim().is_empty() {
                return Err(DeclarationError::InvalidFlag(flag.to_string()));
            }
            conditions.insert(flag.to_string(), Value::Bool(true));
        }

        let arguments = Arguments::new().arg(scope.as_str()).with_named(conditions.clone());
        Ok(Self { position, scope, conditions, arguments, block })
    }

    /// Build a hook from replay-style arguments: `(scope, flags..., conditions...)`.
    pub fn from_arguments(
        method: &str,
        arguments: &Arguments,
        block: Option<Block>,
    ) -> Result<Self, DeclarationError> {
        let scope = arguments.first_str().unwrap_or("");
        let rest = arguments.rest();
        let mut flags = Vec::new();
        for value in rest.positional() {
            match value.as_str() {
                Some(flag) => flags.push(flag),
                None => return Err(DeclarationError::InvalidFlag(value.to_string())),
            }
        }
        Self::new(method, scope, &flags, arguments.named_args().clone(), block)
    }

    pub fn position(&self) -> HookPosition {
        self.position
    }

    pub fn scope(&self) -> HookScope {
        self.scope
    }

    pub fn conditions(&self) -> &Metadata {
        &self.conditions
    }

    pub fn reverse_order(&self) -> bool {
        self.position.reverse_order()
    }
}

impl Deferred for Hook {
    fn operation(&self) -> &str {
        self.position.as_str()
    }

    fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    fn block(&self) -> Option<&Block> {
        Some(&self.block)
    }

    fn kind(&self) -> CallKind {
        CallKind::Hook
    }

    fn replay(&self, receiver: &mut dyn Receiver) -> Result<Value> {
        receiver.invoke(self.position.as_str(), &self.arguments, Some(&self.block))
    }
}

/// Whether a conditional hook applies to an example with `metadata`.
///
/// Every condition must match: `true` matches any truthy value, anything
/// else requires equality.
pub fn conditions_match(conditions: &Metadata, metadata: &Metadata) -> bool {
    conditions.iter().all(|(key, expected)| {
        let actual = metadata.get(key);
        match expected {
            Value::Bool(true) => actual.is_some_and(is_truthy),
            _ => actual == Some(expected),
        }
    })
}

#[cfg(test)]
#[path = "hook_tests.rs"]
mod tests;
