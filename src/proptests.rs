use super::*;

use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

use crate::table::Slot;

fn validate_table(t: &SlotTable) {
    let mut seen: HashSet<Key> = HashSet::new();
    let mut keys = 0usize;
    let mut live = 0usize;

    for (idx, slot) in t.slots.iter().enumerate() {
        let Slot::Live(slot) = slot else {
            continue;
        };
        live += 1;
        assert!(!slot.keys.is_empty(), "live slot {idx} has no keys");
        assert!(
            slot.keys.len() <= t.config.max_keys_per_slot,
            "slot {idx} exceeds the per-slot key limit"
        );
        for key in &slot.keys {
            assert!(is_valid_key(key.as_str()));
            assert!(seen.insert(*key), "key {key} stored in more than one slot");
            assert_eq!(t.find(key), Some(idx), "key {key} unreachable from its probe path");
        }
        keys += slot.keys.len();
    }

    assert_eq!(keys, t.len(), "stored key count must match SlotTable::len");
    assert_eq!(live, t.live_slot_count(), "live slot count out of sync");

    let occupancy: Vec<(usize, usize)> = t.occupancy().collect();
    assert!(occupancy.windows(2).all(|w| w[0].0 < w[1].0), "occupancy must ascend");
    let expected: Vec<(usize, usize)> = t
        .slots
        .iter()
        .enumerate()
        .filter_map(|(i, s)| match s {
            Slot::Live(l) => Some((i, l.keys.len())),
            _ => None,
        })
        .collect();
    assert_eq!(occupancy, expected);
}

#[derive(Clone, Debug)]
enum Op {
    Insert(Key, u16),
    Remove(Key),
    Search(Key),
    Malformed(String),
    Clear,
}

fn key_strategy() -> impl Strategy<Value = Key> + Clone {
    // A small pool so that duplicates, removals of stored keys and
    // collisions are all frequent.
    (10u8..13, b'A'..b'D', b'A'..b'D', 10u8..13)
        .prop_map(|(head, a, b, tail)| Key::from_parts(head, [a, b], tail))
}

fn config_strategy() -> impl Strategy<Value = Config> {
    let max_keys = prop_oneof![Just(usize::MAX), 1usize..=3];
    (2usize..=40, max_keys).prop_map(|(capacity, max_keys_per_slot)| Config {
        capacity,
        max_keys_per_slot,
    })
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    let key = key_strategy();
    let op = prop_oneof![
        45 => (key.clone(), any::<u16>()).prop_map(|(k, v)| Op::Insert(k, v)),
        25 => key.clone().prop_map(Op::Remove),
        24 => key.clone().prop_map(Op::Search),
        5 => "[a-z0-9]{0,8}".prop_map(Op::Malformed),
        1 => Just(Op::Clear),
    ];
    prop::collection::vec(op, 0..=400)
}

fn slot_values(t: &SlotTable) -> HashMap<usize, String> {
    t.live_slots()
        .map(|view| (view.index, view.value.to_owned()))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 10_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_model_equivalence(config in config_strategy(), ops in ops_strategy()) {
        let mut t = SlotTable::with_config(config).unwrap();
        // Value each stored key resolved to when it was inserted.
        let mut m: HashMap<Key, String> = HashMap::new();

        for op in ops {
            match op {
                Op::Insert(key, value) => {
                    let before = slot_values(&t);
                    let value = value.to_string();
                    match t.insert_key(key, value.clone()) {
                        Ok(Insertion::Duplicate(idx)) => {
                            prop_assert!(m.contains_key(&key));
                            prop_assert_eq!(t.find(&key), Some(idx));
                        }
                        Ok(Insertion::Placed(idx)) => {
                            prop_assert!(!m.contains_key(&key));
                            prop_assert!(!before.contains_key(&idx));
                            prop_assert_eq!(t.get(&key), Some(value.as_str()));
                            m.insert(key, value);
                        }
                        Ok(Insertion::Shared(idx)) => {
                            prop_assert!(!m.contains_key(&key));
                            let shared = before.get(&idx).cloned();
                            prop_assert!(shared.is_some());
                            prop_assert_eq!(t.get(&key).map(str::to_owned), shared.clone());
                            m.insert(key, shared.unwrap_or_default());
                        }
                        Err(Error::TableFull(k)) => {
                            prop_assert_eq!(k, key);
                            prop_assert!(!m.contains_key(&key));
                            prop_assert_eq!(slot_values(&t), before);
                        }
                        Err(e) => prop_assert!(false, "unexpected insert error: {}", e),
                    }
                }
                Op::Remove(key) => match t.remove_key(key) {
                    Ok(_) => {
                        prop_assert!(m.remove(&key).is_some());
                        prop_assert_eq!(t.get(&key), None);
                    }
                    Err(Error::NotFound(_)) => prop_assert!(!m.contains_key(&key)),
                    Err(e) => prop_assert!(false, "unexpected remove error: {}", e),
                },
                Op::Search(key) => {
                    let expected = m.get(&key).map(String::as_str);
                    prop_assert_eq!(t.get(&key), expected);
                    prop_assert_eq!(t.search(key.as_str()).unwrap(), expected);
                }
                Op::Malformed(input) => {
                    let before = slot_values(&t);
                    let len = t.len();
                    prop_assert!(matches!(t.search(&input), Err(Error::InvalidKey(_))));
                    prop_assert!(matches!(t.insert(&input, "v"), Err(Error::InvalidKey(_))));
                    prop_assert!(matches!(t.remove(&input), Err(Error::InvalidKey(_))));
                    prop_assert_eq!(t.len(), len);
                    prop_assert_eq!(slot_values(&t), before);
                }
                Op::Clear => {
                    t.clear();
                    m.clear();
                    prop_assert_eq!(t.tombstone_count(), 0);
                }
            }

            prop_assert_eq!(t.len(), m.len());
        }

        validate_table(&t);
        for (key, value) in &m {
            prop_assert_eq!(t.get(key), Some(value.as_str()));
        }
    }

    #[test]
    fn prop_probe_sequence_bounded(key in key_strategy(), capacity in 2usize..=3000) {
        let t = SlotTable::with_config(Config { capacity, ..Config::default() }).unwrap();
        let probe: Vec<usize> = t.probe_sequence(&key).collect();
        prop_assert_eq!(probe.len(), capacity);
        prop_assert_eq!(probe[0], key.primary_hash(capacity));
        prop_assert!(probe.iter().all(|&i| i < capacity));
        let step = key.step_hash(capacity);
        prop_assert!((1..capacity).contains(&step));
        prop_assert!(probe.windows(2).all(|w| w[1] == (w[0] + step) % capacity));
    }
}

#[test]
fn removal_order_keeps_survivors_reachable() {
    // Six keys sharing a home slot, in a table that allows two keys per slot.
    let keys = crate::table::tests::colliding_keys(6, 2500);
    let config = Config {
        max_keys_per_slot: 2,
        ..Config::default()
    };

    for skip in 0..keys.len() {
        let mut t = SlotTable::with_config(config.clone()).unwrap();
        let mut values = HashMap::new();
        for (i, key) in keys.iter().enumerate() {
            t.insert_key(*key, i.to_string()).unwrap();
            values.insert(*key, t.get(key).unwrap().to_owned());
        }
        validate_table(&t);

        for (i, key) in keys.iter().enumerate() {
            if i == skip {
                continue;
            }
            t.remove_key(*key).unwrap();
            validate_table(&t);
        }

        let survivor = keys[skip];
        assert_eq!(t.get(&survivor), Some(values[&survivor].as_str()));
        assert_eq!(t.len(), 1);
    }
}
