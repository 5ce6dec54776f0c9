// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Deferred examples provided by description and applied as contracts.

use deferred_examples::{ResolutionError, include_deferred_in};

use crate::prelude::*;

fn provider() -> Module {
    let module = Module::deferred("LaunchProvider");
    module
        .deferred_examples("a launchable rocket", |group, args, _| {
            let stages = args.positional().first().and_then(Value::as_u64).unwrap_or(1);
            group.it(format!("fires {} stages", stages), |_| Ok(()))?;
            Ok(())
        })
        .unwrap();
    module
}

/// > Including deferred examples by description runs the implementation with
/// > the call-site arguments.
#[test]
fn include_deferred_passes_arguments() {
    let module = provider();
    module.include_deferred("a launchable rocket", Arguments::new().arg(2), None).unwrap();
    module.include_deferred("a launchable rocket", (), None).unwrap();

    let report = run_module("Falcon", &module);

    assert_eq!(ran(&report), vec!["Falcon fires 2 stages", "Falcon fires 1 stages"]);
}

/// > Modules registered in a directory are found by the description derived
/// > from their name.
#[test]
fn directory_modules_resolve_by_naming_convention() {
    let directory = Directory::new();
    let provider = directory.define("Fleet::Provider");
    let orbit = directory.define("Fleet::Support::ReachesOrbitExamples");
    orbit.it("reaches orbit", |_| Ok(())).unwrap();
    let mut group = ExampleGroup::new("Falcon");

    include_deferred_in(&mut group, &provider, "reaches orbit", (), None).unwrap();
    let report = Runner::default().run(&mut group).unwrap();

    assert_eq!(ran(&report), vec!["Falcon reaches orbit"]);
    assert_eq!(group.included_modules(), &[orbit]);
}

/// > An unknown description fails at the include, naming the description.
#[test]
fn unknown_description_fails_at_include() {
    let module = provider();

    let err = module.include_deferred("a submarine", (), None).unwrap_err();

    assert!(matches!(
        err,
        Error::Resolution(ResolutionError::DeferredExamplesNotFound(ref d)) if d == "a submarine"
    ));
    assert_eq!(err.to_string(), "deferred examples not found with description \"a submarine\"");
}

/// > A contract applies a parameterized group to any host.
#[test]
fn contract_applies_to_a_group() {
    let contract = Contract::new("a countdown", |group, args, _| {
        let from = args.positional().first().and_then(Value::as_u64).unwrap_or(3);
        for n in (1..=from).rev() {
            group.it(format!("counts {}", n), |_| Ok(()))?;
        }
        Ok(())
    })
    .unwrap();
    let mut group = ExampleGroup::new("Launch");

    contract.apply(&mut group, Arguments::new().arg(2)).unwrap();
    let report = Runner::default().run(&mut group).unwrap();

    assert_eq!(ran(&report), vec!["Launch counts 2", "Launch counts 1"]);
}

/// > A registered contract is resolvable by its description.
#[test]
fn registered_contract_resolves_by_description() {
    let contract = Contract::new("a stage separation", |group, _, _| {
        group.it("separates", |_| Ok(()))?;
        Ok(())
    })
    .unwrap();
    let module = Module::deferred("Provider");
    contract.register(&module).unwrap();
    module.include_deferred("a stage separation", (), None).unwrap();

    let report = run_module("Falcon", &module);

    assert_eq!(ran(&report), vec!["Falcon separates"]);
}
