//! Friendship and integrity command handlers.

use socialgraph_engine::{GraphStore, RepairPolicy};

use crate::convert::convert_result;
use crate::{Output, Result};

/// Handle FriendAdd command.
pub async fn friend_add(store: &GraphStore, source: String, target: String) -> Result<Output> {
    convert_result(store.make_friends(&source, &target).await)?;
    Ok(Output::Unit)
}

/// Handle FriendList command.
pub async fn friend_list(store: &GraphStore, id: String) -> Result<Output> {
    let friends = convert_result(store.get_friends(&id).await)?;
    Ok(Output::Ids(friends.into_iter().collect()))
}

/// Handle FriendRemove command.
pub async fn friend_remove(store: &GraphStore, source: String, target: String) -> Result<Output> {
    convert_result(store.delete_friend(&source, &target).await)?;
    Ok(Output::Unit)
}

/// Handle Repair command.
pub async fn repair(store: &GraphStore, policy: Option<RepairPolicy>) -> Result<Output> {
    let policy = policy.unwrap_or(store.config().repair_policy);
    let report = convert_result(store.repair_with(policy).await)?;
    Ok(Output::Repair(report))
}
