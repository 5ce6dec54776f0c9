// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Declared helper dependencies.

use crate::prelude::*;

fn rocket_examples(log: &Log) -> Module {
    let module = Module::deferred("RocketExamples").with_description("a rocket");
    module.depends_on("#rocket", Some("desc")).unwrap();
    module.before("context", log.step("module setup")).unwrap();
    module.it("flies", log.step("flies")).unwrap();
    module.it("lands", log.step("lands")).unwrap();
    module
}

/// > A missing `#rocket` fails the run before any example executes, with a
/// > message naming `#rocket: desc`.
#[test]
fn missing_dependency_fails_before_any_example_runs() {
    let log = Log::default();
    let module = rocket_examples(&log);

    let report = run_module("Launch", &module);

    assert_eq!(report.failed(), 2);
    for failure in report.failures() {
        let message = failure.message.as_deref().unwrap();
        assert!(message.contains("  a rocket:\n    #rocket: desc"), "{}", message);
    }
    assert!(log.entries().is_empty());
}

/// > Defining the helper in the host group satisfies the dependency.
#[test]
fn host_helper_satisfies_dependency() {
    let log = Log::default();
    let module = rocket_examples(&log);
    let mut group = ExampleGroup::describe("Launch", |g| {
        g.let_("rocket", |_| Ok(json!("falcon")))?;
        Ok(())
    })
    .unwrap();
    module.attach(&mut group).unwrap();

    let report = Runner::default().run(&mut group).unwrap();

    assert!(report.is_success(), "{:?}", report);
    assert_eq!(log.entries(), vec!["module setup", "flies", "lands"]);
}

/// > Several dependent modules in one group register one check and report
/// > every missing helper together.
#[test]
fn dependencies_of_every_module_are_reported_at_once() {
    let log = Log::default();
    let fuel = Module::deferred("FuelExamples");
    fuel.depends_on("propellant", None).unwrap();
    fuel.it("burns", log.step("burns")).unwrap();
    let rocket = rocket_examples(&log);
    let mut group = ExampleGroup::new("Launch");
    rocket.attach(&mut group).unwrap();
    fuel.attach(&mut group).unwrap();

    assert_eq!(group.hooks().before_context.len(), 2);

    let report = Runner::default().run(&mut group).unwrap();

    let message = report.results[0].message.as_deref().unwrap();
    similar_asserts::assert_eq!(
        message,
        "Unable to run specs because the following methods are not defined in the examples:\n\
         \n  a rocket:\n    #rocket: desc\n\
         \n  FuelExamples:\n    #propellant\n\
         \nPlease define the missing methods or :let helpers."
    );
    assert_eq!(report.failed(), 3);
}

/// > `check = "warn"` logs missing helpers and runs the examples anyway.
#[test]
fn warn_level_from_config_file_runs_examples() {
    let log = Log::default();
    let module = rocket_examples(&log);
    let config = Config::discover(&fixture("warn-dependencies")).unwrap();
    assert_eq!(config.dependencies.check, CheckLevel::Warn);

    let report = run_module_with("Launch", &module, &config);

    assert!(report.is_success());
    assert_eq!(log.entries(), vec!["module setup", "flies", "lands"]);
}

/// > `check = "off"` never registers the check.
#[test]
fn off_level_skips_the_check() {
    let log = Log::default();
    let module = rocket_examples(&log);
    let mut config = Config::default();
    config.dependencies.check = CheckLevel::Off;
    let mut group = ExampleGroup::new("Launch");

    module.attach_with(&mut group, &config).unwrap();

    assert_eq!(group.hooks().before_context.len(), 1);
    assert!(group.metadata().is_empty());
}
