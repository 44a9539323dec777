use std::collections::HashMap;

use proptest::prelude::*;
use proptest_derive::Arbitrary;

use crate::{BuildError, StaticRadixMap};

/// Key strategy biased toward collisions: the empty key, short and medium
/// byte strings, delimited words, and shared prefixes.
#[derive(Debug, Clone)]
struct Key(Vec<u8>);

impl Arbitrary for Key {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        prop_oneof![
            // Empty key
            Just(Key(vec![])),
            // Short keys (1-4 bytes)
            prop::collection::vec(any::<u8>(), 1..4).prop_map(Key),
            // Medium keys (4-64 bytes)
            prop::collection::vec(any::<u8>(), 4..64).prop_map(Key),
            // Keys with natural delimiters
            "[a-z]{4,8}/[a-z]{1,8}".prop_map(|s| Key(s.into_bytes())),
            "[a-z]{4,8}:[a-z]{1,8}".prop_map(|s| Key(s.into_bytes())),
            // Keys sharing a suffix so only early bytes discriminate
            "[a-z]{1,6}".prop_map(|prefix| {
                let mut key = prefix.into_bytes();
                key.extend_from_slice(b"/suffix");
                Key(key)
            }),
        ]
        .boxed()
    }
}

/// Probe operations against a built map and a `HashMap` model.
#[derive(Arbitrary, Debug, Clone)]
enum Action {
    Get(Key),
    Count(Key),
    Update(Key, u64),
}

fn build_from_model(model: &HashMap<Vec<u8>, u64>) -> StaticRadixMap<Vec<u8>, u64> {
    StaticRadixMap::from_entries(model.iter().map(|(k, v)| (k.clone(), *v)))
        .expect("unique keys must build")
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        failure_persistence: None,
        ..ProptestConfig::default()
    })]

    #[test]
    fn proptest_roundtrip_and_absence(
        model in prop::collection::hash_map(any::<Key>().prop_map(|k| k.0), any::<u64>(), 1..200),
        probes in prop::collection::vec(any::<Key>(), 0..50),
    ) {
        let map = build_from_model(&model);

        prop_assert_eq!(map.len(), model.len());
        prop_assert_eq!(map.iter().count(), model.len());

        for (k, v) in &model {
            prop_assert_eq!(map.get(k), Some(v));
            prop_assert_eq!(map.count(k), 1);
        }

        for probe in &probes {
            if !model.contains_key(&probe.0) {
                prop_assert_eq!(map.get(&probe.0), None);
                prop_assert_eq!(map.count(&probe.0), 0);
                prop_assert_eq!(map.value(&probe.0), 0);
            }
        }
    }

    #[test]
    fn proptest_insertion_order_preserved(
        entries in prop::collection::hash_map(any::<Key>().prop_map(|k| k.0), any::<u64>(), 1..100),
    ) {
        let entries: Vec<(Vec<u8>, u64)> = entries.into_iter().collect();
        let map = StaticRadixMap::from_entries(entries.clone()).unwrap();

        prop_assert_eq!(map.len(), entries.len());
        for (got, want) in map.iter().zip(&entries) {
            prop_assert_eq!(got.0, &want.0);
            prop_assert_eq!(got.1, &want.1);
        }
    }

    #[test]
    fn proptest_mutations_visible(
        model in prop::collection::hash_map(any::<Key>().prop_map(|k| k.0), any::<u64>(), 1..100),
        actions in prop::collection::vec(any::<Action>(), 1..64),
    ) {
        let mut model = model;
        let mut map = build_from_model(&model);

        for action in actions {
            match action {
                Action::Get(k) => {
                    prop_assert_eq!(map.get(&k.0), model.get(&k.0));
                }
                Action::Count(k) => {
                    prop_assert_eq!(map.count(&k.0), usize::from(model.contains_key(&k.0)));
                }
                Action::Update(k, v) => {
                    // Values are mutable in place; the key set is not.
                    if let Some(slot) = map.get_mut(&k.0) {
                        *slot = v;
                        model.insert(k.0, v);
                    } else {
                        prop_assert!(!model.contains_key(&k.0));
                    }
                }
            }
        }

        for (k, v) in &model {
            prop_assert_eq!(map.get(k), Some(v));
        }
    }

    #[test]
    fn proptest_duplicate_keys_rejected(
        entries in prop::collection::hash_map(any::<Key>().prop_map(|k| k.0), any::<u64>(), 1..50),
        dup_value in any::<u64>(),
    ) {
        let mut with_dup: Vec<(Vec<u8>, u64)> = entries.into_iter().collect();
        let dup_key = with_dup[0].0.clone();
        with_dup.push((dup_key, dup_value));

        prop_assert_eq!(
            StaticRadixMap::from_entries(with_dup).unwrap_err(),
            BuildError::DuplicateKey
        );
    }

    #[test]
    fn proptest_equal_maps_compare_equal(
        entries in prop::collection::hash_map(any::<Key>().prop_map(|k| k.0), any::<u64>(), 0..100),
    ) {
        let entries: Vec<(Vec<u8>, u64)> = entries.into_iter().collect();
        let a = StaticRadixMap::from_entries(entries.clone()).unwrap();
        let b = StaticRadixMap::from_entries(entries).unwrap();
        prop_assert_eq!(a, b);
    }
}
