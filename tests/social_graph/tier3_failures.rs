//! Tier 3: partial failures are reported with their own kind, and the
//! repair pass puts the graph back together.

use std::error::Error as _;
use std::time::Duration;

use socialgraph::{ErrorKind, GraphError, NewUser, RepairAction, RepairPolicy};
use socialgraph_storage::testing::Op;

use crate::test_utils::{
    assert_consistent, create, faulty_store, faulty_store_with_timeout, friends,
};

#[tokio::test]
async fn second_edge_write_failure_then_repair() {
    let (store, backend) = faulty_store();
    let a = create(&store, "Alice").await;
    let b = create(&store, "Bob").await;

    backend.fail_next_for(Op::UpdateOne, *b.key());
    let err = store
        .make_friends(&a.to_string(), &b.to_string())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PartialEdgeFailure);
    assert!(!err.is_retryable());
    assert!(err.source().is_some());

    // One-sided until repaired
    assert_eq!(friends(&store, &a).await, vec![b]);
    assert!(friends(&store, &b).await.is_empty());

    let report = store.repair().await.unwrap();
    assert_eq!(
        report.actions,
        vec![RepairAction::Reciprocated { user: b, friend: a }]
    );
    assert_consistent(&store, &[a, b]).await;
}

#[tokio::test]
async fn retrying_make_friends_heals_partial_edge() {
    let (store, backend) = faulty_store();
    let a = create(&store, "Alice").await;
    let b = create(&store, "Bob").await;

    backend.fail_next_for(Op::UpdateOne, *b.key());
    assert!(store
        .make_friends(&a.to_string(), &b.to_string())
        .await
        .is_err());

    // The first side is already there; the retry succeeds idempotently
    store
        .make_friends(&a.to_string(), &b.to_string())
        .await
        .unwrap();
    assert_consistent(&store, &[a, b]).await;
}

#[tokio::test]
async fn slow_backend_times_out() {
    let (store, backend) = faulty_store_with_timeout(Duration::from_millis(50));
    let a = create(&store, "Alice").await;

    backend.delay(Op::FindOne, Duration::from_millis(500));
    let err = store.get_user(&a.to_string()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BackendTimeout);
    assert!(err.is_retryable());

    match err {
        GraphError::BackendTimeout {
            operation,
            timeout_ms,
        } => {
            assert_eq!(operation, "find_one");
            assert_eq!(timeout_ms, 50);
        }
        other => panic!("Expected BackendTimeout, got {:?}", other),
    }
}

#[tokio::test]
async fn timeout_on_first_edge_write_is_not_partial() {
    let (store, backend) = faulty_store_with_timeout(Duration::from_millis(50));
    let a = create(&store, "Alice").await;
    let b = create(&store, "Bob").await;

    // Probes are fast; edge writes stall past the deadline
    backend.delay(Op::UpdateOne, Duration::from_millis(500));
    let err = store
        .make_friends(&a.to_string(), &b.to_string())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BackendTimeout);

    backend.clear();
    assert!(friends(&store, &a).await.is_empty());
    assert!(friends(&store, &b).await.is_empty());
}

#[tokio::test]
async fn failed_sweep_keeps_delete() {
    let (store, backend) = faulty_store();
    let a = create(&store, "Alice").await;
    let b = create(&store, "Bob").await;
    store
        .make_friends(&a.to_string(), &b.to_string())
        .await
        .unwrap();

    backend.fail_next(Op::UpdateMany);
    let err = store.delete_user(&b.to_string()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CleanupFailed);
    assert_eq!(
        store.get_user(&b.to_string()).await.unwrap_err().kind(),
        ErrorKind::NotFound
    );

    let report = store.repair_with(RepairPolicy::Sever).await.unwrap();
    assert_eq!(
        report.actions,
        vec![RepairAction::PulledDangling { user: a, friend: b }]
    );
    assert!(friends(&store, &a).await.is_empty());
}

#[tokio::test]
async fn unusable_inserted_key() {
    let (store, backend) = faulty_store();
    backend.mangle_insert_ids(serde_json::json!({"$oid": 1}));

    let err = store
        .create_user(NewUser::named("Alice"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IdentityAssignmentFailure);
}

#[tokio::test]
async fn repair_severs_one_sided_edges() {
    let (store, backend) = faulty_store();
    let a = create(&store, "Alice").await;
    let b = create(&store, "Bob").await;
    let c = create(&store, "Carol").await;

    backend.fail_next_for(Op::UpdateOne, *b.key());
    assert!(store
        .make_friends(&a.to_string(), &b.to_string())
        .await
        .is_err());
    store
        .make_friends(&a.to_string(), &c.to_string())
        .await
        .unwrap();

    let report = store.repair_with(RepairPolicy::Sever).await.unwrap();
    assert_eq!(
        report.actions,
        vec![RepairAction::Severed { user: a, friend: b }]
    );
    assert_eq!(friends(&store, &a).await, vec![c]);
    assert_consistent(&store, &[a, b, c]).await;
}
