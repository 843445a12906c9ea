use shardedmap::{ShardedMap, ShardedMapBuilder};

#[test]
fn test_shard_isolation() {
    let map = ShardedMapBuilder::new()
        .shard_count(4)
        .unwrap()
        .build::<i32>()
        .unwrap();

    // Insert many keys to ensure distribution across shards
    for i in 0..100 {
        map.set(&format!("key_{}", i), i);
    }

    let stats = map.stats();
    assert_eq!(stats.shard_sizes.len(), 4);

    let total: usize = stats.shard_sizes.iter().sum();
    assert_eq!(total, 100);

    // Every key lives in the shard it routes to
    let mut expected = vec![0usize; 4];
    for i in 0..100 {
        expected[map.shard_index(&format!("key_{}", i))] += 1;
    }
    assert_eq!(expected, stats.shard_sizes);
}

#[test]
fn test_routing_is_stable_within_a_map() {
    let map: ShardedMap<i32> = ShardedMap::new(32).unwrap();
    for i in 0..200 {
        let key = format!("key_{}", i);
        let first = map.shard_index(&key);
        map.set(&key, i);
        for _ in 0..5 {
            assert_eq!(map.shard_index(&key), first);
        }
    }
}

#[test]
fn test_deterministic_shard_assignment() {
    let map1: ShardedMap<i32> = ShardedMap::new(8).unwrap();
    let map2: ShardedMap<i32> = ShardedMap::new(8).unwrap();

    for i in 0..50 {
        let key = format!("key_{}", i);
        map1.set(&key, i);
        map2.set(&key, i);
    }

    // Shard sizes should be identical (deterministic hashing)
    assert_eq!(map1.shard_loads(), map2.shard_loads());
}

#[test]
fn test_shard_distribution() {
    let map = ShardedMapBuilder::new()
        .shard_count(16)
        .unwrap()
        .build::<i32>()
        .unwrap();

    for i in 0..1000 {
        map.set(&format!("key_{}", i), i);
    }

    let loads = map.shard_loads();
    let max_shard_size = *loads.iter().max().unwrap();
    let min_shard_size = *loads.iter().min().unwrap();

    // With 1000 keys and 16 shards, we expect ~62-63 keys per shard
    assert!(
        max_shard_size < 100,
        "Shard distribution too uneven (max: {})",
        max_shard_size
    );
    assert!(
        min_shard_size > 30,
        "Shard distribution too uneven (min: {})",
        min_shard_size
    );
    assert!(map.diagnostics().max_load_ratio < 1.6);
}
