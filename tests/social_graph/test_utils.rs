//! Shared helpers for the integration suite.

use std::sync::Arc;
use std::time::Duration;

use socialgraph::{GraphConfig, GraphStore, MemoryBackend, NewUser, UserId};
use socialgraph_storage::testing::FaultyBackend;

pub type Faulty = Arc<FaultyBackend<MemoryBackend>>;

/// Store over a fault-injecting backend with the given deadline.
pub fn faulty_store_with_timeout(timeout: Duration) -> (GraphStore, Faulty) {
    let backend = Arc::new(FaultyBackend::new(MemoryBackend::new()));
    let store = GraphStore::new(
        Arc::clone(&backend),
        GraphConfig::new().operation_timeout(timeout),
    );
    (store, backend)
}

/// Store over a fault-injecting backend with the default deadline.
pub fn faulty_store() -> (GraphStore, Faulty) {
    faulty_store_with_timeout(Duration::from_secs(5))
}

pub async fn create(store: &GraphStore, name: &str) -> UserId {
    store.create_user(NewUser::named(name)).await.unwrap()
}

pub async fn friends(store: &GraphStore, id: &UserId) -> Vec<UserId> {
    store
        .get_friends(&id.to_string())
        .await
        .unwrap()
        .into_iter()
        .collect()
}

/// Check symmetry and irreflexivity over every listed user.
pub async fn assert_consistent(store: &GraphStore, users: &[UserId]) {
    for user in users {
        let theirs = store.get_user(&user.to_string()).await;
        let Ok(record) = theirs else {
            continue;
        };
        assert!(!record.is_friend_of(user), "{} lists itself", user);
        for friend in &record.friends {
            let other = store
                .get_user(&friend.to_string())
                .await
                .unwrap_or_else(|e| panic!("{} lists missing {}: {}", user, friend, e));
            assert!(
                other.is_friend_of(user),
                "{} lists {} but not the other way round",
                user,
                friend
            );
        }
    }
}
