//! Regression tests for the tree's point and ordered operations.

use counted_art::{Modifier, Tree};

fn padded(n: usize) -> String {
    format!("{n:09}")
}

#[test]
fn binary_keys_with_null_bytes() {
    let tree: Tree<Vec<u8>, &str> = Tree::new();

    let key1 = vec![0, 1, 2, 0, 3];
    let key2 = vec![0, 1, 2, 0, 4];
    let key3 = vec![0, 1, 2, 0]; // prefix of key1 and key2
    let key4 = vec![0, 1]; // prefix of all of them

    tree.insert(key1.clone(), "value1");
    tree.insert(key2.clone(), "value2");
    tree.insert(key3.clone(), "value3");
    tree.insert(key4.clone(), "value4");

    assert_eq!(tree.len(), 4);
    assert_eq!(tree.get(&key1), Some("value1"));
    assert_eq!(tree.get(&key2), Some("value2"));
    assert_eq!(tree.get(&key3), Some("value3"));
    assert_eq!(tree.get(&key4), Some("value4"));

    let keys: Vec<_> = tree.iter(None, None).map(|entry| entry.into_parts().0).collect();
    assert_eq!(keys, [key4.clone(), key3.clone(), key1.clone(), key2.clone()]);

    assert_eq!(tree.remove(&key1), Some("value1"));
    assert_eq!(tree.get(&key1), None);
    assert_eq!(tree.len(), 3);
}

#[test]
fn empty_key_is_a_valid_key() {
    let tree: Tree<Vec<u8>, &str> = Tree::new();

    tree.insert(Vec::new(), "empty");
    assert_eq!(tree.get(&Vec::new()), Some("empty"));

    // The empty key sorts before everything else.
    tree.insert(vec![1], "one");
    assert_eq!(tree.first().unwrap().key(), b"");
    assert_eq!(tree.at(0).unwrap().key(), b"");

    assert_eq!(tree.remove(&Vec::new()), Some("empty"));
    assert_eq!(tree.get(&Vec::new()), None);
    assert_eq!(tree.len(), 1);
}

#[test]
fn long_binary_keys() {
    let tree: Tree<Vec<u8>, &str> = Tree::new();

    let key1: Vec<u8> = [1, 0, 255].repeat(100);
    let key2: Vec<u8> = [1, 0, 254].repeat(100);
    tree.insert(key1.clone(), "long1");
    tree.insert(key2.clone(), "long2");

    assert_eq!(tree.get(&key1), Some("long1"));
    assert_eq!(tree.get(&key2), Some("long2"));
}

#[test]
fn find_with_every_modifier() {
    let tree: Tree<String, usize> = Tree::new();
    for (i, key) in ["b", "d", "f"].iter().enumerate() {
        tree.insert((*key).to_string(), i);
    }

    let probe = |modifier, key: &str| {
        tree.find(modifier, Some(&key.to_string()))
            .map(|entry| String::from_utf8(entry.into_parts().0).unwrap())
    };

    assert_eq!(probe(Modifier::Exact, "d"), Some("d".into()));
    assert_eq!(probe(Modifier::Exact, "c"), None);

    assert_eq!(probe(Modifier::Gte, "d"), Some("d".into()));
    assert_eq!(probe(Modifier::Gt, "d"), Some("f".into()));
    assert_eq!(probe(Modifier::Lte, "d"), Some("d".into()));
    assert_eq!(probe(Modifier::Lt, "d"), Some("b".into()));

    assert_eq!(probe(Modifier::Gte, "c"), Some("d".into()));
    assert_eq!(probe(Modifier::Gt, "c"), Some("d".into()));
    assert_eq!(probe(Modifier::Lte, "c"), Some("b".into()));
    assert_eq!(probe(Modifier::Lt, "c"), Some("b".into()));

    // Probes outside the key range.
    assert_eq!(probe(Modifier::Gte, "g"), None);
    assert_eq!(probe(Modifier::Gt, "f"), None);
    assert_eq!(probe(Modifier::Lte, "a"), None);
    assert_eq!(probe(Modifier::Lt, "b"), None);
    assert_eq!(probe(Modifier::Lte, "z"), Some("f".into()));
    assert_eq!(probe(Modifier::Gte, "a"), Some("b".into()));

    // Open-ended probes land on the extremes.
    assert_eq!(tree.find(Modifier::Gte, None).unwrap().key(), b"b");
    assert_eq!(tree.find(Modifier::Gt, None).unwrap().key(), b"b");
    assert_eq!(tree.find(Modifier::Lte, None).unwrap().key(), b"f");
    assert_eq!(tree.find(Modifier::Lt, None).unwrap().key(), b"f");
}

#[test]
fn strict_modifiers_on_a_single_leaf() {
    let tree: Tree<String, usize> = Tree::new();
    tree.insert("only".to_string(), 1);

    assert_eq!(tree.find(Modifier::Gte, Some(&"only".to_string())).unwrap().key(), b"only");
    assert_eq!(tree.find(Modifier::Lte, Some(&"only".to_string())).unwrap().key(), b"only");
    assert!(tree.find(Modifier::Gt, Some(&"only".to_string())).is_none());
    assert!(tree.find(Modifier::Lt, Some(&"only".to_string())).is_none());
    assert_eq!(tree.find(Modifier::Gt, Some(&"onl".to_string())).unwrap().key(), b"only");
    assert_eq!(tree.find(Modifier::Lt, Some(&"onlz".to_string())).unwrap().key(), b"only");
}

#[test]
fn gte_and_lt_over_even_numbers() {
    let tree: Tree<String, usize> = Tree::new();
    for n in (0..1000).step_by(2) {
        tree.insert(padded(n), n);
    }
    assert_eq!(tree.len(), 500);

    for n in (1..998).step_by(2) {
        let gte = tree.find(Modifier::Gte, Some(&padded(n))).unwrap();
        assert_eq!(gte.key(), padded(n + 1).as_bytes(), "GTE({n})");
        assert_eq!(*gte.value(), n + 1);

        let lt = tree.find(Modifier::Lt, Some(&padded(n))).unwrap();
        assert_eq!(lt.key(), padded(n - 1).as_bytes(), "LT({n})");
        assert_eq!(*lt.value(), n - 1);
    }

    // On present keys, GTE is the identity and GT steps over.
    for n in (2..998).step_by(2) {
        let gte = tree.find(Modifier::Gte, Some(&padded(n))).unwrap();
        assert_eq!(gte.key(), padded(n).as_bytes());
        let gt = tree.find(Modifier::Gt, Some(&padded(n))).unwrap();
        assert_eq!(gt.key(), padded(n + 2).as_bytes());
        let lt = tree.find(Modifier::Lt, Some(&padded(n))).unwrap();
        assert_eq!(lt.key(), padded(n - 2).as_bytes());
    }
}

#[test]
fn rank_and_position_agree() {
    let tree: Tree<String, usize> = Tree::new();
    let mut keys: Vec<_> = (0..500).map(|n| padded(n * 7 % 500)).collect();
    for key in &keys {
        tree.insert(key.clone(), 0);
    }
    keys.sort();

    for (rank, key) in keys.iter().enumerate() {
        assert_eq!(tree.rank(key), Some(rank));
        let entry = tree.at(rank).unwrap();
        assert_eq!(entry.key(), key.as_bytes());
        assert_eq!(entry.rank(), rank);
        let found = tree.find(Modifier::Exact, Some(key)).unwrap();
        assert_eq!(found.rank(), rank);
    }
    assert!(tree.at(keys.len()).is_none());
    assert_eq!(tree.rank(&"missing".to_string()), None);
}

#[test]
fn insert_reports_updates_and_keeps_the_latest_value() {
    let tree: Tree<String, u64> = Tree::new();
    assert!(!tree.insert("key".to_string(), 1));
    assert!(tree.insert("key".to_string(), 2));
    assert_eq!(tree.get(&"key".to_string()), Some(2));
    assert_eq!(tree.len(), 1);

    assert_eq!(tree.remove(&"key".to_string()), Some(2));
    assert_eq!(tree.remove(&"key".to_string()), None);
    assert!(tree.is_empty());
}

#[test]
fn version_advances_on_mutation_only() {
    let tree: Tree<String, u64> = Tree::new();
    let v0 = tree.version();
    tree.insert("a".to_string(), 1);
    let v1 = tree.version();
    assert_ne!(v0, v1);

    tree.get(&"a".to_string());
    tree.find(Modifier::Gte, None);
    assert_eq!(tree.version(), v1);

    tree.remove(&"missing".to_string());
    assert_eq!(tree.version(), v1);
    tree.remove(&"a".to_string());
    assert_ne!(tree.version(), v1);
}

#[test]
fn integer_keys_sort_numerically() {
    let tree: Tree<u32, u32> = Tree::new();
    for n in [256u32, 1, 65536, 0, 255, 2] {
        tree.insert(n, n);
    }
    let values: Vec<_> = tree.iter(None, None).map(|entry| entry.into_parts().1).collect();
    assert_eq!(values, [0, 1, 2, 255, 256, 65536]);

    let tree: Tree<i32, i32> = Tree::new();
    for n in [-1i32, 1, i32::MIN, 0, i32::MAX] {
        tree.insert(n, n);
    }
    let values: Vec<_> = tree.iter(None, None).map(|entry| entry.into_parts().1).collect();
    assert_eq!(values, [i32::MIN, -1, 0, 1, i32::MAX]);
}
