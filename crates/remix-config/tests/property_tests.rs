use std::collections::BTreeMap;
use std::sync::Arc;

use proptest::prelude::*;
use remix_config::{
    AccumulatedConfig, ConfigKey, ConfigPatch, ConfigValue, StaticPreset, merge_patches,
    resolve_precedence,
};
use serde_json::{Value, json};

const DATA_KEYS: &[ConfigKey] = &[
    ConfigKey::AppDirectory,
    ConfigKey::BuildDirectory,
    ConfigKey::IgnoredRouteFiles,
    ConfigKey::PublicPath,
    ConfigKey::ServerBuildFile,
];

fn data_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        "[a-z]{1,8}".prop_map(Value::String),
        prop::collection::vec("[a-z*./]{1,6}", 0..4).prop_map(|v| json!(v)),
    ]
}

/// A patch over a few data keys, optionally smuggling a `presets` entry
fn patch() -> impl Strategy<Value = ConfigPatch> {
    (
        prop::collection::btree_map(prop::sample::select(DATA_KEYS), data_value(), 0..4),
        any::<bool>(),
    )
        .prop_map(|(entries, with_presets)| {
            let mut patch: ConfigPatch = entries
                .into_iter()
                .map(|(k, v)| (k, ConfigValue::Data(v)))
                .collect();
            if with_presets {
                patch = patch.presets(vec![Arc::new(StaticPreset::new(
                    "smuggled",
                    ConfigPatch::new().build_directory("smuggled"),
                ))]);
            }
            patch
        })
}

/// Expected merge result: the last value written for each key
fn last_writer(patches: &[ConfigPatch]) -> BTreeMap<ConfigKey, ConfigValue> {
    let mut expected = BTreeMap::new();
    for patch in patches {
        for key in patch.keys() {
            if key == ConfigKey::Presets {
                continue;
            }
            if let Some(value) = patch.get(key) {
                expected.insert(key, value.clone());
            }
        }
    }
    expected
}

fn entries(acc: &AccumulatedConfig) -> BTreeMap<ConfigKey, ConfigValue> {
    acc.keys()
        .filter_map(|k| acc.get(k).map(|v| (k, v.clone())))
        .collect()
}

proptest! {
    #[test]
    fn test_merge_is_last_writer_wins(patches in prop::collection::vec(patch(), 0..6)) {
        let acc = merge_patches(patches.clone());
        prop_assert_eq!(entries(&acc), last_writer(&patches));
    }

    #[test]
    fn test_presets_never_accumulate(patches in prop::collection::vec(patch(), 0..6)) {
        let acc = merge_patches(patches);
        prop_assert!(!acc.contains(ConfigKey::Presets));
    }

    #[test]
    fn test_user_wins_every_key_it_sets(
        patches in prop::collection::vec(patch(), 0..6),
        user in patch(),
    ) {
        let acc = resolve_precedence(merge_patches(patches), user.clone());
        for key in user.keys().filter(|k| *k != ConfigKey::Presets) {
            prop_assert_eq!(acc.get(key), user.get(key));
        }
    }

    #[test]
    fn test_merge_is_associative_over_folds(
        left in prop::collection::vec(patch(), 0..4),
        right in prop::collection::vec(patch(), 0..4),
    ) {
        let all: Vec<ConfigPatch> = left.iter().chain(right.iter()).cloned().collect();
        let stepwise = right
            .into_iter()
            .fold(merge_patches(left), AccumulatedConfig::merge);
        prop_assert_eq!(stepwise, merge_patches(all));
    }
}
