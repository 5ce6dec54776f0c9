// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types.
//!
//! Declaration errors are raised at the DSL call site. Resolution errors are
//! raised when a deferred group is looked up by description. Dependency
//! errors are aggregated into a single report. Anything a receiver raises
//! while a call is replayed passes through untouched.

use thiserror::Error;

use crate::dependencies::MissingDependency;

/// Result alias defaulting to the crate [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Invalid declaration, raised eagerly when the DSL method is called.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeclarationError {
    #[error("operation name can't be blank")]
    BlankOperationName,

    #[error("invalid operation name {0:?}")]
    InvalidOperationName(String),

    #[error("invalid hook method {0:?}")]
    InvalidHookMethod(String),

    #[error("hook scope can't be blank")]
    BlankScope,

    #[error("invalid scope {scope:?} for {method} hook")]
    InvalidScope { method: String, scope: String },

    #[error("invalid hook flag {0:?}")]
    InvalidFlag(String),

    #[error("no block given for {0}")]
    MissingBlock(String),

    #[error("wrong block for {operation}: expected {expected} block, got {actual}")]
    WrongBlock { operation: String, expected: &'static str, actual: &'static str },

    #[error("shared example group name can't be blank")]
    BlankSharedName,

    #[error("description can't be blank")]
    BlankDescription,

    #[error("helper name can't be blank")]
    BlankHelperName,

    #[error("method name can't be blank")]
    BlankMethodName,

    #[error("{module} can't declare deferred {operation}: not a deferred examples module")]
    Unsupported { module: String, operation: String },

    #[error("undefined deferred operation {operation:?} for {module}")]
    UnknownOperation { module: String, operation: String },

    #[error("can't include {included} in {module}: cyclic include")]
    CyclicInclusion { module: String, included: String },
}

/// Lookup failure for shared or deferred example groups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("deferred examples not found with description {0:?}")]
    DeferredExamplesNotFound(String),

    #[error("could not find shared examples {0:?}")]
    SharedExamplesNotFound(String),
}

/// Every dependency the running examples fail to provide, in one report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct MissingDependenciesError {
    message: String,
    missing: Vec<MissingDependency>,
}

impl MissingDependenciesError {
    pub(crate) fn new(message: String, missing: Vec<MissingDependency>) -> Self {
        Self { message, missing }
    }

    /// The missing dependencies, grouped in declaration order.
    pub fn missing(&self) -> &[MissingDependency] {
        &self.missing
    }
}

/// Umbrella error for composing and replaying deferred modules.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Declaration(#[from] DeclarationError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    MissingDependencies(#[from] MissingDependenciesError),

    #[error("undefined operation `{operation}` for {receiver}")]
    NoSuchOperation { receiver: String, operation: String },

    #[error("invalid arguments for `{operation}`: {reason}")]
    InvalidArguments { operation: String, reason: String },

    /// Failure raised by user code or the host framework.
    #[error(transparent)]
    Host(#[from] anyhow::Error),
}

impl Error {
    pub(crate) fn invalid_arguments(operation: &str, reason: impl Into<String>) -> Self {
        Error::InvalidArguments { operation: operation.to_string(), reason: reason.into() }
    }
}
