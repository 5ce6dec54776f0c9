// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration files.

use crate::prelude::*;

/// > `fail_fast = true` stops the run at the first failing example.
#[test]
fn fail_fast_fixture_stops_the_run() {
    let config = Config::discover(&fixture("fail-fast")).unwrap();
    let module = Module::deferred("FlakyExamples");
    module.it("breaks", |_| anyhow::bail!("broken")).unwrap();
    module.it("never runs", |_| Ok(())).unwrap();

    let report = run_module_with("Rocket", &module, &config);

    assert_eq!(ran(&report), vec!["Rocket breaks"]);
    assert_eq!(report.summary(), "1 example, 1 failure");
}

/// > A directory without `deferred.toml` uses the defaults.
#[test]
fn missing_config_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::discover(dir.path()).unwrap();
    assert_eq!(config, Config::default());
}

/// > An invalid value names the file it came from.
#[test]
fn invalid_config_reports_the_file() {
    let err = Config::discover(&fixture("invalid-config")).unwrap_err();
    let message = format!("{:#}", err);
    assert!(message.contains("failed to parse"), "{}", message);
    assert!(message.contains("deferred.toml"), "{}", message);
}
