//! Tier 2: graph invariants hold across sequences of operations.

use proptest::prelude::*;
use socialgraph::{ErrorKind, GraphStore, NewUser, UserId, UserPatch};

use crate::test_utils::{assert_consistent, create, friends};

#[tokio::test]
async fn self_edge_always_rejected() {
    let store = GraphStore::in_memory();
    for name in ["A", "B", "C"] {
        let id = create(&store, name).await;
        let err = store
            .make_friends(&id.to_string(), &id.to_string())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SelfReferenceConflict);
    }
}

#[tokio::test]
async fn make_friends_is_symmetric_in_both_orders() {
    let store = GraphStore::in_memory();
    let a = create(&store, "A").await;
    let b = create(&store, "B").await;
    let c = create(&store, "C").await;

    store.make_friends(&a.to_string(), &b.to_string()).await.unwrap();
    store.make_friends(&c.to_string(), &a.to_string()).await.unwrap();

    let mut expected = vec![b, c];
    expected.sort();
    assert_eq!(friends(&store, &a).await, expected);
    assert_eq!(friends(&store, &b).await, vec![a]);
    assert_eq!(friends(&store, &c).await, vec![a]);
    assert_consistent(&store, &[a, b, c]).await;
}

#[tokio::test]
async fn removing_non_friends_changes_nothing() {
    let store = GraphStore::in_memory();
    let a = create(&store, "A").await;
    let b = create(&store, "B").await;

    store.delete_friend(&a.to_string(), &b.to_string()).await.unwrap();
    store.delete_friend(&a.to_string(), &b.to_string()).await.unwrap();

    assert!(friends(&store, &a).await.is_empty());
    assert!(friends(&store, &b).await.is_empty());
}

#[tokio::test]
async fn delete_leaves_no_dangling_ids() {
    let store = GraphStore::in_memory();
    let hub = create(&store, "Hub").await;
    let mut spokes = Vec::new();
    for i in 0..10 {
        let spoke = create(&store, &format!("Spoke{}", i)).await;
        store
            .make_friends(&hub.to_string(), &spoke.to_string())
            .await
            .unwrap();
        spokes.push(spoke);
    }

    store.delete_user(&hub.to_string()).await.unwrap();

    for spoke in &spokes {
        assert!(friends(&store, spoke).await.is_empty());
    }
    assert!(store.repair().await.unwrap().is_clean());
}

#[tokio::test]
async fn patch_touches_only_given_fields() {
    let store = GraphStore::in_memory();
    let alice = store
        .create_user(NewUser::named("Alice").with_age(30))
        .await
        .unwrap();
    let bob = create(&store, "Bob").await;
    store
        .make_friends(&alice.to_string(), &bob.to_string())
        .await
        .unwrap();

    store
        .update_user(&alice.to_string(), UserPatch::new().age(31))
        .await
        .unwrap();

    let after = store.get_user(&alice.to_string()).await.unwrap();
    assert_eq!(after.name.as_deref(), Some("Alice"));
    assert_eq!(after.age, Some(31));
    assert_eq!(after.friends.into_iter().collect::<Vec<_>>(), vec![bob]);
}

#[derive(Debug, Clone)]
enum Step {
    Befriend(usize, usize),
    Unfriend(usize, usize),
    Delete(usize),
}

fn step(users: usize) -> impl Strategy<Value = Step> {
    prop_oneof![
        4 => (0..users, 0..users).prop_map(|(a, b)| Step::Befriend(a, b)),
        2 => (0..users, 0..users).prop_map(|(a, b)| Step::Unfriend(a, b)),
        1 => (0..users).prop_map(Step::Delete),
    ]
}

async fn run_steps(steps: Vec<Step>) -> Result<(), TestCaseError> {
    let store = GraphStore::in_memory();
    let mut users: Vec<UserId> = Vec::new();
    for i in 0..6 {
        users.push(create(&store, &format!("U{}", i)).await);
    }

    for step in steps {
        let result = match step {
            Step::Befriend(a, b) => {
                store
                    .make_friends(&users[a].to_string(), &users[b].to_string())
                    .await
            }
            Step::Unfriend(a, b) => {
                store
                    .delete_friend(&users[a].to_string(), &users[b].to_string())
                    .await
            }
            Step::Delete(a) => store.delete_user(&users[a].to_string()).await,
        };
        if let Err(e) = result {
            prop_assert!(
                matches!(
                    e.kind(),
                    ErrorKind::NotFound | ErrorKind::SelfReferenceConflict
                ),
                "unexpected error {}",
                e
            );
        }
    }

    assert_consistent(&store, &users).await;
    let report = store.repair().await.map_err(|e| TestCaseError::fail(e.to_string()))?;
    prop_assert!(report.is_clean(), "repair found {:?}", report.actions);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn sequential_operations_keep_graph_consistent(
        steps in proptest::collection::vec(step(6), 0..40)
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(run_steps(steps))?;
    }
}
