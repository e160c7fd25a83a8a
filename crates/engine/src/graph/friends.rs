//! Friendship edges.
//!
//! A friendship between A and B is B's identifier in A's `friends` array and
//! A's in B's. Each side is its own backend write, so a failure between the
//! two leaves the edge one-sided. That case is reported as
//! `PartialEdgeFailure` and is what the repair pass fixes.

use std::collections::BTreeSet;

use socialgraph_core::{fields, GraphError, GraphResult, UserId};
use socialgraph_storage::Update;

use super::GraphStore;

impl GraphStore {
    /// Record a symmetric friendship between `source` and `target`.
    ///
    /// Befriending an existing friend succeeds without change.
    ///
    /// # Errors
    ///
    /// - `InvalidIdentifier` if either identifier is malformed
    /// - `SelfReferenceConflict` if both name the same user
    /// - `NotFound` if either user does not exist
    /// - `EdgeWriteFailed` if `source` vanished before its side was written
    /// - `PartialEdgeFailure` if `source`'s side was written and `target`'s
    ///   was not
    pub async fn make_friends(&self, source: &str, target: &str) -> GraphResult<()> {
        let source = UserId::parse(source)?;
        let target = UserId::parse(target)?;
        if source == target {
            return Err(GraphError::self_reference(source));
        }

        self.ensure_exists(&source).await?;
        self.ensure_exists(&target).await?;

        self.add_edge(&source, &target).await?;
        if let Err(cause) = self.add_edge(&target, &source).await {
            tracing::warn!(
                source_id = %source,
                target_id = %target,
                error = %cause,
                "Friendship left one-sided"
            );
            return Err(GraphError::partial_edge(source, target, cause));
        }

        tracing::debug!(source_id = %source, target_id = %target, "Friendship added");
        Ok(())
    }

    /// Remove the friendship between `source` and `target`, if any.
    ///
    /// Removing a friendship that does not exist succeeds without change.
    ///
    /// # Errors
    ///
    /// - `InvalidIdentifier` if either identifier is malformed
    /// - `NotFound` if either user does not exist
    /// - `PartialEdgeFailure` if `source`'s side was removed and the backend
    ///   failed on `target`'s
    pub async fn delete_friend(&self, source: &str, target: &str) -> GraphResult<()> {
        let source = UserId::parse(source)?;
        let target = UserId::parse(target)?;

        self.remove_edge(&source, &target).await?;
        match self.remove_edge(&target, &source).await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => return Err(e),
            Err(cause) => {
                tracing::warn!(
                    source_id = %source,
                    target_id = %target,
                    error = %cause,
                    "Friendship removal left one-sided"
                );
                return Err(GraphError::partial_edge(source, target, cause));
            }
        }

        tracing::debug!(source_id = %source, target_id = %target, "Friendship removed");
        Ok(())
    }

    /// Identifiers in a user's friend set.
    pub async fn get_friends(&self, id: &str) -> GraphResult<BTreeSet<UserId>> {
        Ok(self.get_user(id).await?.friends)
    }

    /// `$addToSet` `friend` into `user`'s set, judged by the matched count
    async fn add_edge(&self, user: &UserId, friend: &UserId) -> GraphResult<()> {
        let outcome = self
            .backend
            .update_one(
                self.collection(),
                user.key(),
                Update::add_to_set(fields::FRIENDS, friend.to_string()),
            )
            .await?;
        if outcome.matched == 0 {
            return Err(GraphError::edge_write_failed(
                user,
                friend,
                "user no longer exists",
            ));
        }
        Ok(())
    }

    /// `$pull` `friend` from `user`'s set
    async fn remove_edge(&self, user: &UserId, friend: &UserId) -> GraphResult<()> {
        let outcome = self
            .backend
            .update_one(
                self.collection(),
                user.key(),
                Update::pull(fields::FRIENDS, friend.to_string()),
            )
            .await?;
        if outcome.matched == 0 {
            return Err(GraphError::not_found(user));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_util::{faulty_store, user};
    use super::*;
    use socialgraph_core::ErrorKind;
    use socialgraph_storage::testing::Op;
    use std::error::Error as _;

    async fn friends_of(store: &GraphStore, id: &UserId) -> Vec<UserId> {
        store
            .get_friends(&id.to_string())
            .await
            .unwrap()
            .into_iter()
            .collect()
    }

    #[tokio::test]
    async fn make_friends_is_symmetric() {
        let store = GraphStore::in_memory();
        let a = user(&store, "Alice").await;
        let b = user(&store, "Bob").await;

        store.make_friends(&a.to_string(), &b.to_string()).await.unwrap();

        assert_eq!(friends_of(&store, &a).await, vec![b]);
        assert_eq!(friends_of(&store, &b).await, vec![a]);
    }

    #[tokio::test]
    async fn make_friends_is_idempotent() {
        let store = GraphStore::in_memory();
        let a = user(&store, "Alice").await;
        let b = user(&store, "Bob").await;

        store.make_friends(&a.to_string(), &b.to_string()).await.unwrap();
        store.make_friends(&a.to_string(), &b.to_string()).await.unwrap();
        store.make_friends(&b.to_string(), &a.to_string()).await.unwrap();

        assert_eq!(friends_of(&store, &a).await, vec![b]);
        assert_eq!(friends_of(&store, &b).await, vec![a]);
    }

    #[tokio::test]
    async fn self_friendship_rejected() {
        let store = GraphStore::in_memory();
        let a = user(&store, "Alice").await;

        let err = store
            .make_friends(&a.to_string(), &a.to_string())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SelfReferenceConflict);
        assert!(friends_of(&store, &a).await.is_empty());
    }

    #[tokio::test]
    async fn self_check_precedes_existence() {
        let store = GraphStore::in_memory();
        let ghost = "65a1f0c2e4b0a1b2c3d4e5f6";
        let err = store.make_friends(ghost, ghost).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SelfReferenceConflict);
    }

    #[tokio::test]
    async fn make_friends_with_missing_user() {
        let store = GraphStore::in_memory();
        let a = user(&store, "Alice").await;
        let ghost = "65a1f0c2e4b0a1b2c3d4e5f6";

        let err = store.make_friends(&a.to_string(), ghost).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        // Nothing was written for the existing side
        assert!(friends_of(&store, &a).await.is_empty());

        let err = store.make_friends(ghost, &a.to_string()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn make_friends_malformed_id() {
        let store = GraphStore::in_memory();
        let a = user(&store, "Alice").await;
        let err = store
            .make_friends(&a.to_string(), "bogus")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidIdentifier);
    }

    #[tokio::test]
    async fn source_vanishing_after_probe_is_edge_write_failure() {
        let (store, backend) = faulty_store();
        let a = user(&store, "Alice").await;
        let b = user(&store, "Bob").await;

        backend.report_unmatched_for(Op::UpdateOne, *a.key());
        let err = store
            .make_friends(&a.to_string(), &b.to_string())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EdgeWriteFailed);
        assert!(friends_of(&store, &b).await.is_empty());
    }

    #[tokio::test]
    async fn second_write_failure_is_partial() {
        let (store, backend) = faulty_store();
        let a = user(&store, "Alice").await;
        let b = user(&store, "Bob").await;

        backend.fail_next_for(Op::UpdateOne, *b.key());
        let err = store
            .make_friends(&a.to_string(), &b.to_string())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PartialEdgeFailure);
        let cause = err.source().unwrap().to_string();
        assert!(cause.contains("injected failure"));

        match err {
            GraphError::PartialEdgeFailure {
                source_id,
                target_id,
                ..
            } => {
                assert_eq!(source_id, a.to_string());
                assert_eq!(target_id, b.to_string());
            }
            other => panic!("Expected PartialEdgeFailure, got {:?}", other),
        }

        // The asymmetry is observable
        assert_eq!(friends_of(&store, &a).await, vec![b]);
        assert!(friends_of(&store, &b).await.is_empty());
    }

    #[tokio::test]
    async fn second_side_vanishing_is_partial() {
        let (store, backend) = faulty_store();
        let a = user(&store, "Alice").await;
        let b = user(&store, "Bob").await;

        backend.report_unmatched_for(Op::UpdateOne, *b.key());
        let err = store
            .make_friends(&a.to_string(), &b.to_string())
            .await
            .unwrap_err();
        match err {
            GraphError::PartialEdgeFailure { cause, .. } => {
                assert_eq!(cause.kind(), ErrorKind::EdgeWriteFailed);
            }
            other => panic!("Expected PartialEdgeFailure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn delete_friend_removes_both_sides() {
        let store = GraphStore::in_memory();
        let a = user(&store, "Alice").await;
        let b = user(&store, "Bob").await;
        store.make_friends(&a.to_string(), &b.to_string()).await.unwrap();

        store.delete_friend(&b.to_string(), &a.to_string()).await.unwrap();

        assert!(friends_of(&store, &a).await.is_empty());
        assert!(friends_of(&store, &b).await.is_empty());
    }

    #[tokio::test]
    async fn delete_non_friend_is_noop() {
        let store = GraphStore::in_memory();
        let a = user(&store, "Alice").await;
        let b = user(&store, "Bob").await;
        let c = user(&store, "Carol").await;
        store.make_friends(&a.to_string(), &c.to_string()).await.unwrap();

        store.delete_friend(&a.to_string(), &b.to_string()).await.unwrap();

        assert_eq!(friends_of(&store, &a).await, vec![c]);
        assert!(friends_of(&store, &b).await.is_empty());
    }

    #[tokio::test]
    async fn delete_friend_missing_user() {
        let store = GraphStore::in_memory();
        let a = user(&store, "Alice").await;
        let ghost = UserId::parse("65a1f0c2e4b0a1b2c3d4e5f6").unwrap();

        let err = store
            .delete_friend(&ghost.to_string(), &a.to_string())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = store
            .delete_friend(&a.to_string(), &ghost.to_string())
            .await
            .unwrap_err();
        match err {
            GraphError::NotFound { id } => assert_eq!(id, ghost.to_string()),
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn delete_friend_second_write_failure_is_partial() {
        let (store, backend) = faulty_store();
        let a = user(&store, "Alice").await;
        let b = user(&store, "Bob").await;
        store.make_friends(&a.to_string(), &b.to_string()).await.unwrap();

        backend.fail_next_for(Op::UpdateOne, *b.key());
        let err = store
            .delete_friend(&a.to_string(), &b.to_string())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PartialEdgeFailure);

        assert!(friends_of(&store, &a).await.is_empty());
        assert_eq!(friends_of(&store, &b).await, vec![a]);
    }

    #[tokio::test]
    async fn get_friends_errors() {
        let store = GraphStore::in_memory();
        let err = store.get_friends("nope").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidIdentifier);
        let err = store
            .get_friends("65a1f0c2e4b0a1b2c3d4e5f6")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
