//! Integration tests for `reentry scan`.

use predicates::prelude::*;

use crate::common::{TestEnv, stdout_json};

#[test]
fn scan_caches_plugin_groups() {
  let env = TestEnv::with_site_packages();

  env
    .reentry_cmd()
    .arg("scan")
    .assert()
    .success()
    .stdout(predicate::str::contains("cached 2"));

  let cache = env.read_data_file();
  assert_eq!(cache["pkg-a"]["plugins"]["alpha"], "alpha = pkg_a.plugins:Alpha");
  assert_eq!(cache["pkg-a"]["plugins"]["shared"], "shared = pkg_a.plugins:Shared [fast]");
  assert_eq!(cache["pkg-b"]["plugins"]["beta"], "beta = pkg_b.plugins:Beta");
}

#[test]
fn scan_never_caches_console_scripts() {
  let env = TestEnv::with_site_packages();
  env.scan();

  let cache = env.read_data_file();
  assert!(cache["pkg-a"].get("console_scripts").is_none());
}

#[test]
fn scan_named_group_only() {
  let env = TestEnv::with_site_packages();

  env.reentry_cmd().args(["scan", "other"]).assert().success();

  let cache = env.read_data_file();
  assert_eq!(cache["pkg-a"]["other"]["foo"], "foo = pkg_a.other:Foo");
  assert!(cache["pkg-a"].get("plugins").is_none());
  assert!(cache.get("pkg-b").is_none());
}

#[test]
fn scan_regex_groups() {
  let env = TestEnv::with_site_packages();

  env.reentry_cmd().args(["scan", "-r", "plug"]).assert().success();

  let cache = env.read_data_file();
  assert!(cache["pkg-a"].get("plugins").is_some());
  assert!(cache["pkg-a"].get("other").is_none());
  assert!(cache["pkg-b"].get("plugins").is_some());
}

#[test]
fn scan_explicit_site_dir() {
  let env = TestEnv::with_site_packages();
  let other_site = env.temp.path().join("other-site");
  let dist = other_site.join("pkg_c-0.1.dist-info");
  std::fs::create_dir_all(&dist).unwrap();
  std::fs::write(dist.join("entry_points.txt"), "[plugins]\ngamma = pkg_c:Gamma\n").unwrap();

  env
    .reentry_cmd()
    .arg("scan")
    .arg("--site-dir")
    .arg(&other_site)
    .assert()
    .success();

  let cache = env.read_data_file();
  // No METADATA: name comes from the directory
  assert_eq!(cache["pkg_c"]["plugins"]["gamma"], "gamma = pkg_c:Gamma");
  assert!(cache.get("pkg-a").is_none());
}

#[test]
fn scan_reports_malformed_distribution() {
  let env = TestEnv::with_site_packages();
  env.install("broken-1.0.dist-info", "Name: broken\n", "[plugins]\nnot a declaration\n");

  env
    .reentry_cmd()
    .arg("scan")
    .assert()
    .success()
    .stderr(predicate::str::contains("Skipped broken"));

  assert!(env.read_data_file().get("broken").is_none());
}

#[test]
fn scan_json_report() {
  let env = TestEnv::with_site_packages();

  let output = env.reentry_cmd().args(["scan", "-o", "json"]).output().unwrap();
  assert!(output.status.success());

  let report = stdout_json(&output.stdout);
  assert_eq!(report["scanned"], 2);
  assert_eq!(report["updated"], serde_json::json!(["pkg-a", "pkg-b"]));
}
