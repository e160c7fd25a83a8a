//! User record CRUD.

use serde_json::Value;

use socialgraph_core::{GraphError, GraphResult, NewUser, User, UserId, UserPatch};
use socialgraph_storage::Update;

use super::GraphStore;

impl GraphStore {
    /// Insert a new user and return the identifier the backend assigned.
    ///
    /// Only non-default fields are written; the friend set starts empty.
    ///
    /// # Errors
    ///
    /// - `BackendFailure` / `BackendTimeout` if the insert fails
    /// - `IdentityAssignmentFailure` if the backend's key is unusable
    pub async fn create_user(&self, user: NewUser) -> GraphResult<UserId> {
        let outcome = self
            .backend
            .insert_one(self.collection(), user.to_document())
            .await?;

        let id = match &outcome.inserted_id {
            Value::String(raw) => UserId::parse(raw)
                .map_err(|e| GraphError::identity_assignment(e.to_string()))?,
            other => {
                return Err(GraphError::identity_assignment(format!(
                    "expected an encoded key string, got {}",
                    other
                )))
            }
        };

        tracing::debug!(user_id = %id, "Created user");
        Ok(id)
    }

    /// Fetch a user by its encoded identifier.
    pub async fn get_user(&self, id: &str) -> GraphResult<User> {
        let id = UserId::parse(id)?;
        self.load_user(&id).await
    }

    pub(crate) async fn load_user(&self, id: &UserId) -> GraphResult<User> {
        match self.backend.find_one(self.collection(), id.key()).await? {
            Some(doc) => User::from_document(*id.key(), doc),
            None => Err(GraphError::not_found(id)),
        }
    }

    /// Apply a field-level patch to a user.
    ///
    /// Absent or zero-valued fields leave the stored value alone, and any
    /// identity field in the patch is ignored. A patch with nothing to set
    /// only checks that the user exists. A `friends` field replaces the whole
    /// set without touching the other side of each friendship.
    ///
    /// # Errors
    ///
    /// - `InvalidIdentifier` if `id` is malformed
    /// - `SelfReferenceConflict` if the patch lists the user as its own friend
    /// - `NotFound` if the user does not exist
    pub async fn update_user(&self, id: &str, patch: UserPatch) -> GraphResult<()> {
        let id = UserId::parse(id)?;
        if patch.references(&id) {
            return Err(GraphError::self_reference(id));
        }

        let fields = patch.set_fields();
        if fields.is_empty() {
            return self.ensure_exists(&id).await;
        }

        let changed: Vec<String> = fields.keys().cloned().collect();
        let outcome = self
            .backend
            .update_one(self.collection(), id.key(), Update::set(fields))
            .await?;
        if outcome.matched == 0 {
            return Err(GraphError::not_found(id));
        }

        tracing::debug!(user_id = %id, fields = ?changed, "Updated user");
        Ok(())
    }

    /// Delete a user and sweep its identifier out of every friend set.
    ///
    /// The delete is not undone if the sweep fails.
    ///
    /// # Errors
    ///
    /// - `InvalidIdentifier` if `id` is malformed
    /// - `NotFound` if nothing was deleted
    /// - `CleanupFailed` if the user is gone but the sweep failed
    pub async fn delete_user(&self, id: &str) -> GraphResult<()> {
        let id = UserId::parse(id)?;
        let outcome = self
            .backend
            .delete_one(self.collection(), id.key())
            .await?;
        if outcome.deleted == 0 {
            return Err(GraphError::not_found(id));
        }
        tracing::debug!(user_id = %id, "Deleted user");

        if let Err(cause) = self.sweep_references(&id).await {
            tracing::warn!(
                user_id = %id,
                error = %cause,
                "Friend-list cleanup failed after delete"
            );
            return Err(GraphError::cleanup_failed(id, cause));
        }
        Ok(())
    }
}
