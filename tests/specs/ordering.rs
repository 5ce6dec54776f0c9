// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Replay ordering of deferred calls and hooks.

use crate::prelude::*;

fn replay(module: &Module) -> Vec<String> {
    let mut recorder = Recorder::default();
    module.call(&mut recorder).unwrap();
    recorder.operations
}

/// > Examples replay first, then example groups, then hooks, then anything
/// > else, whatever order they were declared in.
#[test]
fn calls_replay_grouped_by_kind() {
    let module = Module::deferred("Mixed").with_missing();
    module.send("custom_matcher", "fast", None).unwrap();
    module.before("each", |_| Ok(())).unwrap();
    module.describe("a group", |_| Ok(())).unwrap();
    module.it("an example", |_| Ok(())).unwrap();

    assert_eq!(
        replay(&module),
        vec!["it(an example)", "describe(a group)", "before(each)", "custom_matcher(fast)"]
    );
}

/// > Within a kind, calls keep their declaration order.
#[test]
fn calls_keep_declaration_order_within_a_kind() {
    let module = Module::deferred("Ordered");
    for name in ["first", "second", "third"] {
        module.it(name, |_| Ok(())).unwrap();
    }

    assert_eq!(replay(&module), vec!["it(first)", "it(second)", "it(third)"]);
}

/// > An included module's calls precede the includer's own calls.
#[test]
fn ancestor_examples_run_first() {
    let base = Module::deferred("BaseExamples");
    base.it("from base", |_| Ok(())).unwrap();
    let module = Module::deferred("ModuleExamples");
    module.it("from module", |_| Ok(())).unwrap();
    module.include(&base).unwrap();

    let report = run_module("Rocket", &module);

    assert_eq!(ran(&report), vec!["Rocket from base", "Rocket from module"]);
}

/// > Inherited hooks wrap the hooks of the modules including them, across a
/// > three module chain.
#[test]
fn hooks_nest_through_a_three_module_chain() {
    let log = Log::default();
    let chain: Vec<Module> = ["base", "mid", "top"]
        .into_iter()
        .map(|name| {
            let module = Module::deferred(name);
            let l = log.clone();
            let entries: [&'static str; 4] = match name {
                "base" => ["base prepend", "base before", "base after", "base append"],
                "mid" => ["mid prepend", "mid before", "mid after", "mid append"],
                _ => ["top prepend", "top before", "top after", "top append"],
            };
            module.prepend_before("each", l.step(entries[0])).unwrap();
            module.before("each", l.step(entries[1])).unwrap();
            module.after("each", l.step(entries[2])).unwrap();
            module.append_after("each", l.step(entries[3])).unwrap();
            module
        })
        .collect();
    chain[1].include(&chain[0]).unwrap();
    chain[2].include(&chain[1]).unwrap();
    chain[2].it("launches", log.step("body")).unwrap();

    run_module("Rocket", &chain[2]);

    similar_asserts::assert_eq!(
        log.entries(),
        [
            "base prepend",
            "mid prepend",
            "top prepend",
            "base before",
            "mid before",
            "top before",
            "body",
            "top after",
            "mid after",
            "base after",
            "top append",
            "mid append",
            "base append",
        ]
        .map(String::from)
        .to_vec()
    );
}

/// > Helpers from the most inherited module are defined first, so the
/// > includer's definition wins.
#[test]
fn includer_helpers_override_inherited_helpers() {
    let log = Log::default();
    let base = Module::deferred("BaseExamples");
    base.let_("fuel", |_| Ok(json!("kerosene"))).unwrap();
    let module = Module::deferred("ModuleExamples");
    module.include(&base).unwrap();
    module.let_("fuel", |_| Ok(json!("methane"))).unwrap();
    let l = log.clone();
    module
        .it("burns", move |example| {
            l.push(example.helper("fuel")?.to_string());
            Ok(())
        })
        .unwrap();

    run_module("Rocket", &module);

    assert_eq!(log.entries(), vec!["\"methane\""]);
}
