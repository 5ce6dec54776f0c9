// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use serde_json::json;

use super::*;
use crate::error::{Error, ResolutionError};
use crate::provider::Directory;
use crate::test_utils::RecordingReceiver;

fn provider() -> Module {
    let module = Module::deferred("Provider");
    module
        .deferred_examples("a rocket", |group, args, _| {
            let fuel = args.first_str().unwrap_or("kerosene").to_string();
            group.it(format!("burns {}", fuel), |_| Ok(()))?;
            Ok(())
        })
        .unwrap();
    module
}

#[test]
fn include_deferred_includes_an_instance() {
    let module = provider();
    module.include_deferred("a rocket", "hydrazine", None).unwrap();
    let mut receiver = RecordingReceiver::new();

    module.attach(&mut receiver).unwrap();

    assert_eq!(receiver.labels(), vec!["it(burns hydrazine)"]);
    assert_eq!(module.ancestors().len(), 2);
}

#[test]
fn include_deferred_twice_gives_two_instances() {
    let module = provider();
    module.include_deferred("a rocket", "hydrazine", None).unwrap();
    module.include_deferred("a rocket", (), None).unwrap();
    let mut receiver = RecordingReceiver::new();

    module.attach(&mut receiver).unwrap();

    assert_eq!(receiver.labels(), vec!["it(burns hydrazine)", "it(burns kerosene)"]);
}

#[test]
fn include_deferred_unknown_description() {
    let module = provider();
    let err = module.include_deferred("a missile", (), None).unwrap_err();
    assert!(matches!(
        err,
        Error::Resolution(ResolutionError::DeferredExamplesNotFound(ref d)) if d == "a missile"
    ));
}

#[test]
fn include_deferred_in_attaches_to_receiver() {
    let module = provider();
    let mut receiver = RecordingReceiver::new();

    include_deferred_in(&mut receiver, &module, "a rocket", "methane", None).unwrap();

    assert_eq!(receiver.labels(), vec!["it(burns methane)"]);
    assert_eq!(receiver.included.len(), 1);
    assert_eq!(receiver.included[0].label(), "a rocket");
}

#[test]
fn include_deferred_in_resolves_directory_modules() {
    let directory = Directory::new();
    let provider = directory.define("Provider");
    let rocket = directory.define("RocketExamples");
    rocket.let_("payload", |_| Ok(json!("satellite"))).unwrap();
    rocket.it("carries a payload", |_| Ok(())).unwrap();
    let mut receiver = RecordingReceiver::new();

    include_deferred_in(&mut receiver, &provider, "rocket", (), None).unwrap();

    assert_eq!(receiver.labels(), vec!["let(payload)", "it(carries a payload)"]);
    assert_eq!(receiver.included, vec![rocket]);
}
