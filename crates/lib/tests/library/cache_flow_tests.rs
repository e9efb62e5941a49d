//! Scan a site directory, then read the cache back through a fresh store.

use std::collections::BTreeSet;

use reentry_lib::scan::{GroupFilter, SitePackages, scan};
use reentry_lib::{EntryPoint, EntryPointMatch, EntryPointStore, Selector};

use super::common::Fixture;

fn scanned_fixture() -> Fixture {
  let fixture = Fixture::new();
  fixture.install(
    "aiida-core",
    "2.5.0",
    "[console_scripts]\nverdi = aiida.cmdline:verdi\n\n[aiida.calculations]\ncore.arithmetic.add = aiida.calculations.arithmetic.add:ArithmeticAddCalculation\n\n[aiida.parsers]\ncore.arithmetic.add = aiida.parsers.arithmetic.add:ArithmeticAddParser\n",
  );
  fixture.install(
    "aiida-plugin",
    "0.3.1",
    "[aiida.calculations]\nplugin.calc = aiida_plugin.calc:Calc [extra]\ncore.arithmetic.add = aiida_plugin.override:Add\n",
  );

  let mut store = EntryPointStore::open(fixture.data_file()).unwrap();
  let source = SitePackages::new(vec![fixture.site_dir()]);
  let report = scan(&mut store, &source, &GroupFilter::All).unwrap();
  assert_eq!(report.updated, vec!["aiida-core", "aiida-plugin"]);

  fixture
}

#[test]
fn reopened_store_sees_scanned_entries() {
  let fixture = scanned_fixture();
  let store = EntryPointStore::open(fixture.data_file()).unwrap();

  assert_eq!(
    store.distribution_names(),
    BTreeSet::from(["aiida-core".to_string(), "aiida-plugin".to_string()])
  );
  assert_eq!(
    store.group_names(),
    BTreeSet::from(["aiida.calculations".to_string(), "aiida.parsers".to_string()])
  );
}

#[test]
fn shared_name_resolves_to_both_distributions() {
  let fixture = scanned_fixture();
  let store = EntryPointStore::open(fixture.data_file()).unwrap();

  let found = store
    .get_entry_point("aiida.calculations", "core.arithmetic.add", None)
    .unwrap();
  match found {
    Some(EntryPointMatch::Multiple(eps)) => {
      let modules: Vec<_> = eps.iter().map(|ep| ep.module.as_str()).collect();
      assert_eq!(modules, vec!["aiida.calculations.arithmetic.add", "aiida_plugin.override"]);
    }
    other => panic!("expected two matches, got {:?}", other),
  }

  let first = store
    .first_entry_point("aiida.calculations", "core.arithmetic.add")
    .unwrap()
    .unwrap();
  assert_eq!(first.attr.as_deref(), Some("ArithmeticAddCalculation"));
}

#[test]
fn query_by_name_prefix_across_distributions() {
  let fixture = scanned_fixture();
  let store = EntryPointStore::open(fixture.data_file()).unwrap();

  let map = store
    .query(Selector::All, "aiida.calculations", vec!["plugin\\."])
    .unwrap();

  let calc: &EntryPoint = &map["aiida.calculations"]["plugin.calc"];
  assert_eq!(calc.extras, vec!["extra"]);
  assert_eq!(map["aiida.calculations"].len(), 1);
}

#[test]
fn iter_group_yields_every_registration() {
  let fixture = scanned_fixture();
  let store = EntryPointStore::open(fixture.data_file()).unwrap();

  let names: Vec<_> = store
    .iter_group("aiida.calculations")
    .map(|ep| ep.unwrap().name)
    .collect();

  assert_eq!(names, vec!["core.arithmetic.add", "core.arithmetic.add", "plugin.calc"]);
}

#[test]
fn removing_distribution_persists() {
  let fixture = scanned_fixture();
  let mut store = EntryPointStore::open(fixture.data_file()).unwrap();
  store.remove_distribution("aiida-plugin").unwrap();

  let reopened = EntryPointStore::open(fixture.data_file()).unwrap();
  assert_eq!(reopened.distribution_names(), BTreeSet::from(["aiida-core".to_string()]));
  assert!(matches!(
    reopened
      .get_entry_point("aiida.calculations", "core.arithmetic.add", None)
      .unwrap(),
    Some(EntryPointMatch::Single(_))
  ));
}
