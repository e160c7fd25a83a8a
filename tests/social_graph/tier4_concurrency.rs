//! Tier 4: many tasks driving one store.

use std::sync::Arc;

use socialgraph::{GraphStore, MemoryBackend, UserId};

use crate::test_utils::{assert_consistent, create, friends};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_get_distinct_ids() {
    let store = GraphStore::in_memory();
    let handles: Vec<_> = (0..8)
        .map(|t| {
            let store = store.clone();
            tokio::spawn(async move {
                let mut ids = Vec::new();
                for i in 0..50 {
                    ids.push(create(&store, &format!("T{}-{}", t, i)).await);
                }
                ids
            })
        })
        .collect();

    let mut all: Vec<UserId> = Vec::new();
    for h in handles {
        all.extend(h.await.unwrap());
    }
    let total = all.len();
    all.sort();
    all.dedup();
    assert_eq!(all.len(), total);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_befriending_stays_symmetric() {
    let store = GraphStore::in_memory();
    let hub = create(&store, "Hub").await;
    let mut others = Vec::new();
    for i in 0..20 {
        others.push(create(&store, &format!("U{}", i)).await);
    }

    let handles: Vec<_> = others
        .iter()
        .map(|other| {
            let store = store.clone();
            let (hub, other) = (hub.to_string(), other.to_string());
            tokio::spawn(async move { store.make_friends(&other, &hub).await })
        })
        .collect();
    for h in handles {
        h.await.unwrap().unwrap();
    }

    assert_eq!(friends(&store, &hub).await.len(), others.len());
    let mut everyone = others.clone();
    everyone.push(hub);
    assert_consistent(&store, &everyone).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_deletes_sweep_everything() {
    let backend = Arc::new(MemoryBackend::new());
    let store = GraphStore::new(Arc::clone(&backend), Default::default());

    let mut users = Vec::new();
    for i in 0..12 {
        users.push(create(&store, &format!("U{}", i)).await);
    }
    for (i, a) in users.iter().enumerate() {
        for b in &users[i + 1..] {
            store.make_friends(&a.to_string(), &b.to_string()).await.unwrap();
        }
    }

    // Delete every other user concurrently
    let handles: Vec<_> = users
        .iter()
        .step_by(2)
        .map(|id| {
            let store = store.clone();
            let id = id.to_string();
            tokio::spawn(async move { store.delete_user(&id).await })
        })
        .collect();
    for h in handles {
        h.await.unwrap().unwrap();
    }

    let survivors: Vec<UserId> = users.iter().skip(1).step_by(2).copied().collect();
    assert_eq!(backend.len("users"), survivors.len());
    for s in &survivors {
        assert_eq!(friends(&store, s).await.len(), survivors.len() - 1);
    }
    assert_consistent(&store, &users).await;
}
