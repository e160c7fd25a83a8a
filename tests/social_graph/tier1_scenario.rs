//! Tier 1: the Alice/Bob walkthrough, through the store and through the
//! command boundary.

use socialgraph::{ErrorKind, GraphStore, NewUser, SocialGraph};

use crate::test_utils::friends;

#[tokio::test]
async fn alice_and_bob() {
    let store = GraphStore::in_memory();

    let alice = store
        .create_user(NewUser::named("Alice").with_age(30))
        .await
        .unwrap();
    assert!(friends(&store, &alice).await.is_empty());

    let bob = store
        .create_user(NewUser::named("Bob").with_age(28))
        .await
        .unwrap();

    store
        .make_friends(&alice.to_string(), &bob.to_string())
        .await
        .unwrap();
    assert_eq!(friends(&store, &alice).await, vec![bob]);
    assert_eq!(friends(&store, &bob).await, vec![alice]);

    store.delete_user(&bob.to_string()).await.unwrap();
    assert!(friends(&store, &alice).await.is_empty());

    let err = store
        .make_friends(&alice.to_string(), &alice.to_string())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SelfReferenceConflict);

    let err = store.get_user("unknown-id").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidIdentifier);

    let err = store.get_user(&bob.to_string()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn alice_and_bob_over_commands() {
    let graph = SocialGraph::in_memory();

    let alice = graph.create_user(Some("Alice"), Some(30)).await.unwrap();
    let bob = graph.create_user(Some("Bob"), Some(28)).await.unwrap();
    graph
        .make_friends(&alice.to_string(), &bob.to_string())
        .await
        .unwrap();
    assert_eq!(graph.friends(&bob.to_string()).await.unwrap(), vec![alice]);

    graph.delete_user(&bob.to_string()).await.unwrap();
    assert!(graph.friends(&alice.to_string()).await.unwrap().is_empty());

    let err = graph
        .make_friends(&alice.to_string(), &alice.to_string())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "SelfReferenceConflict");
    assert_eq!(err.status(), 409);

    let err = graph.get_user(&bob.to_string()).await.unwrap_err();
    assert_eq!(err.status(), 404);
}

#[tokio::test]
async fn json_boundary_walkthrough() {
    let graph = SocialGraph::in_memory();
    let executor = graph.executor();

    let created = executor
        .execute_json(r#"{"UserCreate": {"name": "Alice", "age": 30}}"#)
        .await;
    let json: serde_json::Value = serde_json::from_str(&created.to_json()).unwrap();
    let alice = json["ok"]["Id"].as_str().unwrap().to_string();

    let fetched = executor
        .execute_json(&format!(r#"{{"UserGet": {{"id": "{}"}}}}"#, alice))
        .await;
    let json: serde_json::Value = serde_json::from_str(&fetched.to_json()).unwrap();
    assert_eq!(json["ok"]["User"]["name"], "Alice");
    assert_eq!(json["ok"]["User"]["age"], 30);
    assert_eq!(json["ok"]["User"]["friends"], serde_json::json!([]));

    let bad = executor
        .execute_json(r#"{"FriendList": {"id": "unknown-id"}}"#)
        .await;
    assert_eq!(bad.status(), 400);
}
