//! Integration tests for reading and editing the cache.

use predicates::prelude::*;

use crate::common::{TestEnv, stdout_json};

#[test]
fn map_per_distribution() {
  let env = TestEnv::with_site_packages();
  env.scan();

  let output = env.reentry_cmd().args(["map", "-o", "json"]).output().unwrap();
  assert!(output.status.success());

  let map = stdout_json(&output.stdout);
  assert_eq!(map["pkg-a"]["plugins"]["alpha"], "alpha = pkg_a.plugins:Alpha");
  assert_eq!(map["pkg-b"]["plugins"]["shared"], "shared = pkg_b.plugins:Shared");
}

#[test]
fn map_text_output() {
  let env = TestEnv::with_site_packages();
  env.scan();

  env
    .reentry_cmd()
    .arg("map")
    .assert()
    .success()
    .stdout(predicate::str::contains("pkg-a"))
    .stdout(predicate::str::contains("pkg_a.plugins:Alpha"));
}

#[test]
fn map_filters_by_group_and_name() {
  let env = TestEnv::with_site_packages();
  env.scan();

  let output = env
    .reentry_cmd()
    .args(["map", "--group", "plugins", "--name", "^b", "-o", "json"])
    .output()
    .unwrap();
  assert!(output.status.success());

  let map = stdout_json(&output.stdout);
  assert!(map.get("pkg-a").is_none(), "pkg-a has no plugin starting with b");
  assert_eq!(map["pkg-b"]["plugins"].as_object().unwrap().len(), 1);
}

#[test]
fn map_with_dist_merges_result() {
  let env = TestEnv::with_site_packages();
  env.scan();

  let output = env
    .reentry_cmd()
    .args(["map", "--dist", "pkg-a", "-o", "json"])
    .output()
    .unwrap();
  assert!(output.status.success());

  let map = stdout_json(&output.stdout);
  assert_eq!(map["other"]["foo"], "foo = pkg_a.other:Foo");
  assert!(map["plugins"].get("beta").is_none());
}

#[test]
fn map_unknown_dist_fails() {
  let env = TestEnv::with_site_packages();
  env.scan();

  env
    .reentry_cmd()
    .args(["map", "--dist", "nope"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("nope distribution was not found"));
}

#[test]
fn get_single_entry_point() {
  let env = TestEnv::with_site_packages();
  env.scan();

  let output = env
    .reentry_cmd()
    .args(["get", "plugins", "alpha", "-o", "json"])
    .output()
    .unwrap();
  assert!(output.status.success());

  let ep = stdout_json(&output.stdout);
  assert_eq!(ep["module"], "pkg_a.plugins");
  assert_eq!(ep["attr"], "Alpha");
}

#[test]
fn get_shared_entry_point_lists_all() {
  let env = TestEnv::with_site_packages();
  env.scan();

  let output = env
    .reentry_cmd()
    .args(["get", "plugins", "shared", "-o", "json"])
    .output()
    .unwrap();
  assert!(output.status.success());

  let eps = stdout_json(&output.stdout);
  assert_eq!(eps.as_array().unwrap().len(), 2);

  env
    .reentry_cmd()
    .args(["get", "plugins", "shared", "--dist", "pkg-b"])
    .assert()
    .success()
    .stdout(predicate::str::contains("shared = pkg_b.plugins:Shared"));
}

#[test]
fn get_missing_entry_point_fails() {
  let env = TestEnv::with_site_packages();
  env.scan();

  env
    .reentry_cmd()
    .args(["get", "plugins", "missing"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("No entry point 'missing'"));
}

#[test]
fn remove_dist_and_group() {
  let env = TestEnv::with_site_packages();
  env.scan();

  env
    .reentry_cmd()
    .args(["remove", "dist", "pkg-b"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Removed distribution pkg-b"));
  assert!(env.read_data_file().get("pkg-b").is_none());

  env.reentry_cmd().args(["remove", "group", "plugins"]).assert().success();
  let cache = env.read_data_file();
  assert!(cache["pkg-a"].get("plugins").is_none());
  assert!(cache["pkg-a"].get("other").is_some());
}

#[test]
fn remove_unknown_dist_succeeds() {
  let env = TestEnv::with_site_packages();
  env.scan();

  env
    .reentry_cmd()
    .args(["remove", "dist", "nope"])
    .assert()
    .success()
    .stdout(predicate::str::contains("was not cached"));
}

#[test]
fn clear_with_force() {
  let env = TestEnv::with_site_packages();
  env.scan();

  env.reentry_cmd().args(["clear", "--force"]).assert().success();

  assert_eq!(env.read_data_file(), serde_json::json!({}));
}

#[test]
fn info_counts_entries() {
  let env = TestEnv::with_site_packages();
  env.scan();

  let output = env.reentry_cmd().args(["info", "-o", "json"]).output().unwrap();
  assert!(output.status.success());

  let info = stdout_json(&output.stdout);
  assert_eq!(info["distributions"], 2);
  assert_eq!(info["groups"], 2);
  assert_eq!(info["entry_points"], 5);
}
