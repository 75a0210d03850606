//! Property-based tests for experiment definitions
//!
//! - Test validation invariants over generated inputs
//! - Run with ProptestConfig::with_cases(100)

use proptest::prelude::*;
use serde_json::{json, Map, Value};
use tabular_experiment_client::definition::{partition_catalog_tasks, ExperimentDefinitionBuilder};
use tabular_experiment_client::Error;

// ============================================================================
// Property Test Generators (Strategies)
// ============================================================================

fn arb_id() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,7}"
}

/// A well-formed model group
fn arb_model_group() -> impl Strategy<Value = Value> {
    (arb_id(), 0i64..10, 10i64..100).prop_map(|(model, min, max)| {
        json!({"model": model, "hype": {"p": {"distribution": "int_uniform", "min": min, "max": max}}})
    })
}

/// A model group violating the exact `{model, hype}` key set
fn arb_malformed_model_group() -> impl Strategy<Value = Value> {
    prop_oneof![
        arb_id().prop_map(|model| json!({"model": model})),
        Just(json!({"hype": {}})),
        (arb_id(), arb_id()).prop_map(|(model, extra)| {
            let extra = if extra == "model" || extra == "hype" { "extra".to_string() } else { extra };
            let mut group = Map::new();
            group.insert("model".to_string(), json!(model));
            group.insert("hype".to_string(), json!({}));
            group.insert(extra, json!(1));
            Value::Object(group)
        }),
        Just(json!({})),
    ]
}

fn arb_task_id() -> impl Strategy<Value = String> {
    (prop_oneof![Just(334u32), Just(335), Just(336), Just(337), 100u32..1000], 1u64..100_000)
        .prop_map(|(suite, task)| format!("{suite}-{task}"))
}

fn ready_builder() -> ExperimentDefinitionBuilder {
    let mut builder = ExperimentDefinitionBuilder::new();
    builder
        .set_model_groups(&json!({"m": {"model": "m", "hype": {}}}))
        .unwrap();
    builder.set_data_groups_from_catalog(&["336-1", "337-2"]);
    builder
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: one malformed group anywhere fails the whole call
    #[test]
    fn prop_malformed_model_group_rejected(
        good in proptest::collection::btree_map(arb_id(), arb_model_group(), 0..4),
        bad_id in arb_id(),
        bad in arb_malformed_model_group()
    ) {
        let mut groups: Map<String, Value> = good.into_iter().collect();
        groups.insert(bad_id, bad);

        let mut builder = ExperimentDefinitionBuilder::new();
        let result = builder.set_model_groups(&Value::Object(groups));
        prop_assert!(matches!(result, Err(Error::Validation(_))));
        prop_assert!(builder.model_groups().is_none());
    }

    /// Property: well-formed groups are all stored
    #[test]
    fn prop_valid_model_groups_accepted(
        groups in proptest::collection::btree_map(arb_id(), arb_model_group(), 0..6)
    ) {
        let count = groups.len();
        let mut builder = ExperimentDefinitionBuilder::new();
        builder.set_model_groups(&Value::Object(groups.into_iter().collect())).unwrap();
        prop_assert_eq!(builder.model_groups().unwrap().len(), count);
    }

    /// Property: an application keyed by an undefined data group is rejected
    #[test]
    fn prop_unknown_data_group_rejected(key in arb_id()) {
        let mut applications = Map::new();
        applications.insert(key, json!(["m"]));

        let mut builder = ready_builder();
        let result = builder.set_applications(&Value::Object(applications));
        prop_assert!(matches!(result, Err(Error::Validation(_))));
    }

    /// Property: a bare string never stands in for a sequence
    #[test]
    fn prop_bare_string_rejected(model in arb_id()) {
        let mut builder = ready_builder();
        let result = builder.set_applications(&json!({"opml_reg_purnum_group": model}));
        prop_assert!(matches!(result, Err(Error::Validation(_))));
    }

    /// Property: finalize is a pure function of builder state
    #[test]
    fn prop_finalize_idempotent(name in ".{0,16}", runs in 1u32..1000) {
        let mut builder = ready_builder();
        builder.set_applications(&json!({"opml_class_purnum_group": ["m"]})).unwrap();

        let first = builder.finalize(&name, runs).unwrap();
        let second = builder.finalize(&name, runs).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Property: partitioning keeps exactly the known-suite identifiers, each once
    #[test]
    fn prop_partition_known_suites_only(ids in proptest::collection::vec(arb_task_id(), 0..50)) {
        let groups = partition_catalog_tasks(&ids);
        prop_assert_eq!(groups.len(), 4);

        let known = ids.iter().filter(|id| matches!(&id[..3], "334" | "335" | "336" | "337")).count();
        let placed: usize = groups.values().map(Vec::len).sum();
        prop_assert_eq!(placed, known);

        for (group, members) in &groups {
            for member in members {
                let prefix = &member[..3];
                let expected = match prefix {
                    "336" => "opml_reg_purnum_group",
                    "337" => "opml_class_purnum_group",
                    "335" => "opml_reg_numcat_group",
                    _ => "opml_class_numcat_group",
                };
                prop_assert_eq!(group.as_str(), expected);
            }
        }
    }
}
