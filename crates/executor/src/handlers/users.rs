//! User command handlers.

use std::collections::BTreeSet;

use socialgraph_core::{GraphResult, NewUser, UserId, UserPatch};
use socialgraph_engine::GraphStore;

use crate::convert::convert_result;
use crate::{Output, Result};

/// Handle UserCreate command.
pub async fn user_create(
    store: &GraphStore,
    name: Option<String>,
    age: Option<u32>,
) -> Result<Output> {
    let id = convert_result(store.create_user(NewUser { name, age }).await)?;
    Ok(Output::Id(id))
}

/// Handle UserGet command.
pub async fn user_get(store: &GraphStore, id: String) -> Result<Output> {
    let user = convert_result(store.get_user(&id).await)?;
    Ok(Output::User(user))
}

/// Handle UserUpdate command.
///
/// Friend identifiers are decoded before anything is written.
pub async fn user_update(
    store: &GraphStore,
    id: String,
    name: Option<String>,
    age: Option<u32>,
    friends: Option<Vec<String>>,
) -> Result<Output> {
    let friends = match friends {
        Some(raw) => Some(convert_result(
            raw.iter()
                .map(|f| UserId::parse(f))
                .collect::<GraphResult<BTreeSet<UserId>>>(),
        )?),
        None => None,
    };
    let patch = UserPatch {
        id: None,
        name,
        age,
        friends,
    };
    convert_result(store.update_user(&id, patch).await)?;
    Ok(Output::Unit)
}

/// Handle UserDelete command.
pub async fn user_delete(store: &GraphStore, id: String) -> Result<Output> {
    convert_result(store.delete_user(&id).await)?;
    Ok(Output::Unit)
}
