// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Composing deferred modules into concrete groups.

use crate::prelude::*;

/// > Nested groups declared in a module become nested groups of the host.
#[test]
fn nested_groups_are_replayed() {
    let module = Module::deferred("RocketExamples");
    module
        .describe("when fueled", |g| {
            g.it("launches", |_| Ok(()))?;
            g.context("in orbit", |g| {
                g.it("circles", |_| Ok(()))?;
                Ok(())
            })?;
            Ok(())
        })
        .unwrap();

    let report = run_module("Rocket", &module);

    assert_eq!(
        ran(&report),
        vec!["Rocket when fueled launches", "Rocket when fueled in orbit circles"]
    );
}

/// > Shared examples declared in a module can be included by the host and by
/// > the module's own nested groups.
#[test]
fn shared_examples_travel_with_the_module() {
    let module = Module::deferred("VehicleExamples");
    module
        .shared_examples("a vehicle", |g, args, _| {
            let wheels = args.positional().first().cloned().unwrap_or(json!(0));
            g.it(format!("has {} wheels", wheels), |_| Ok(()))?;
            Ok(())
        })
        .unwrap();
    module.include_examples("a vehicle", Arguments::new().arg(4)).unwrap();
    module.it_behaves_like("a vehicle", Arguments::new().arg(2)).unwrap();

    let report = run_module("Car", &module);

    assert_eq!(ran(&report), vec!["Car has 4 wheels", "Car behaves like a vehicle has 2 wheels"]);
}

/// > Including a module by value attaches it to the group, or to a nested
/// > `behaves like` group.
#[test]
fn modules_can_be_included_by_value() {
    let flying = Module::deferred("FlyingExamples").with_description("a flying thing");
    flying.it("flies", |_| Ok(())).unwrap();
    let module = Module::deferred("BirdExamples");
    module.include_examples(&flying, ()).unwrap();
    module.it_behaves_like(&flying, ()).unwrap();

    let report = run_module("Bird", &module);

    assert_eq!(ran(&report), vec!["Bird flies", "Bird behaves like a flying thing flies"]);
}

/// > `around` hooks from a module wrap every example of the host.
#[test]
fn around_hooks_wrap_examples() {
    let log = Log::default();
    let module = Module::deferred("TimedExamples");
    let l = log.clone();
    module
        .around("example", move |example, run| {
            l.push("start");
            let result = run(example);
            l.push("stop");
            result
        })
        .unwrap();
    module.it("first", log.step("first")).unwrap();
    module.it("second", log.step("second")).unwrap();

    run_module("Timer", &module);

    assert_eq!(log.entries(), vec!["start", "first", "stop", "start", "second", "stop"]);
}

/// > Conditional hooks only run for examples whose metadata matches.
#[test]
fn conditional_hooks_follow_metadata() {
    let log = Log::default();
    let module = Module::deferred("SlowExamples");
    let warm_up = Block::example(log.step("warm up"));
    module.hook("before", "each", &["slow"], Metadata::new(), warm_up).unwrap();
    module.it("quick", log.step("quick")).unwrap();
    module.it(Arguments::new().arg("slow").arg("slow"), log.step("slow")).unwrap();

    run_module("Engine", &module);

    assert_eq!(log.entries(), vec!["quick", "warm up", "slow"]);
}

/// > A group that lacks an operation the module replays fails the attach
/// > with the receiver's error.
#[test]
fn unsupported_operations_fail_the_attach() {
    let module = Module::deferred("CustomExamples").with_missing();
    module.send("custom_matcher", (), None).unwrap();
    let mut group = ExampleGroup::new("Rocket");

    let err = module.attach(&mut group).unwrap_err();

    assert!(matches!(
        err,
        Error::NoSuchOperation { ref operation, .. } if operation == "custom_matcher"
    ));
}

/// > `fdescribe` and `fit` inside a module focus the run.
#[test]
fn focus_inside_a_module_limits_the_run() {
    let module = Module::deferred("FocusedExamples");
    module.it("ignored", |_| Ok(())).unwrap();
    module.fit("focused", |_| Ok(())).unwrap();

    let report = run_module("Rocket", &module);

    assert_eq!(ran(&report), vec!["Rocket focused"]);
}
