//! Referential integrity for friend sets.
//!
//! Deleting a user sweeps its identifier out of every other user's friend
//! set. The sweep is one collection-wide `$pull`; the deleted user's own
//! friend list is not used to narrow it because that list may be one-sided.
//!
//! The repair pass is the out-of-band counterpart: it scans the collection
//! once and fixes dangling, self and one-sided entries left behind by
//! partial failures.

use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

use socialgraph_core::{fields, is_canonical, Document, GraphResult, UserId};
use socialgraph_storage::Update;

use super::types::{RepairAction, RepairPolicy, RepairReport};
use super::GraphStore;

/// A friend entry as found in a stored document
enum Entry {
    Id(UserId),
    /// Decodes, but not in canonical spelling; carries the stored value
    NonCanonical(UserId, Value),
    Malformed(Value),
}

/// Friend entries of one document, or `None` if `friends` is not an array
fn entries(user: &UserId, doc: &Document) -> Option<Vec<Entry>> {
    match doc.get(fields::FRIENDS) {
        None => Some(Vec::new()),
        Some(Value::Array(items)) => Some(
            items
                .iter()
                .map(|item| match item.as_str() {
                    Some(raw) => match UserId::parse(raw) {
                        Ok(id) if is_canonical(raw) => Entry::Id(id),
                        Ok(id) => Entry::NonCanonical(id, item.clone()),
                        Err(_) => Entry::Malformed(item.clone()),
                    },
                    None => Entry::Malformed(item.clone()),
                })
                .collect(),
        ),
        Some(other) => {
            tracing::warn!(
                user_id = %user,
                value = %other,
                "Friends field is not an array, skipping"
            );
            None
        }
    }
}

impl GraphStore {
    /// Pull `id` from every friend set in the collection.
    ///
    /// Only the canonical spelling is matched; the repair pass handles the
    /// rest. Returns the number of documents changed.
    pub(crate) async fn sweep_references(&self, id: &UserId) -> GraphResult<u64> {
        let outcome = self
            .backend
            .update_many(
                self.collection(),
                Update::pull(fields::FRIENDS, id.to_string()),
            )
            .await?;
        tracing::debug!(
            user_id = %id,
            scanned = outcome.matched,
            cleaned = outcome.modified,
            "Swept references to deleted user"
        );
        Ok(outcome.modified)
    }

    /// Run the repair pass with the configured policy.
    pub async fn repair(&self) -> GraphResult<RepairReport> {
        self.repair_with(self.config.repair_policy).await
    }

    /// Scan every user once and fix friend entries that break the graph's
    /// invariants:
    /// - an entry for a user that no longer exists is pulled
    /// - a user's entry for itself is pulled
    /// - an entry that is not an identifier is pulled
    /// - an identifier in non-canonical spelling is rewritten
    /// - a one-sided entry is reciprocated or severed, per `policy`
    ///
    /// Users whose `friends` field is not an array are listed in the report
    /// and never written to; one-sided entries pointing at them are severed
    /// whatever the policy.
    ///
    /// Changes are applied as they are found. The pass stops at the first
    /// backend error, keeping whatever it already fixed. Writes that match
    /// nothing (the user was deleted concurrently) are not reported.
    pub async fn repair_with(&self, policy: RepairPolicy) -> GraphResult<RepairReport> {
        let docs = self.backend.scan(self.collection()).await?;
        let mut report = RepairReport {
            scanned: docs.len(),
            ..RepairReport::default()
        };

        let existing: BTreeSet<UserId> = docs.iter().map(|(key, _)| UserId::from(*key)).collect();
        let mut graph: BTreeMap<UserId, BTreeSet<UserId>> = BTreeMap::new();
        let mut malformed: Vec<(UserId, Value)> = Vec::new();
        let mut misspelled: Vec<(UserId, UserId, Value)> = Vec::new();
        for (key, doc) in &docs {
            let user = UserId::from(*key);
            let Some(found) = entries(&user, doc) else {
                report.unreadable.push(user);
                continue;
            };
            let mut friends = BTreeSet::new();
            for entry in found {
                match entry {
                    Entry::Id(friend) => {
                        friends.insert(friend);
                    }
                    Entry::NonCanonical(friend, raw) => misspelled.push((user, friend, raw)),
                    Entry::Malformed(value) => malformed.push((user, value)),
                }
            }
            graph.insert(user, friends);
        }

        for (user, entry) in malformed {
            if self.pull_entry(&user, entry.clone()).await? {
                report.actions.push(RepairAction::PulledMalformed { user, entry });
            }
        }

        for (user, friend, entry) in misspelled {
            if friend == user {
                if self.pull_entry(&user, entry).await? {
                    report.actions.push(RepairAction::PulledSelf { user });
                }
            } else if !existing.contains(&friend) {
                if self.pull_entry(&user, entry).await? {
                    report
                        .actions
                        .push(RepairAction::PulledDangling { user, friend });
                }
            } else {
                let added = self.add_entry(&user, &friend).await?;
                let pulled = self.pull_entry(&user, entry.clone()).await?;
                if added || pulled {
                    report.actions.push(RepairAction::Canonicalized {
                        user,
                        friend,
                        entry,
                    });
                }
                if let Some(mine) = graph.get_mut(&user) {
                    mine.insert(friend);
                }
            }
        }

        let users: Vec<UserId> = graph.keys().copied().collect();
        for user in users {
            let friends: Vec<UserId> = graph
                .get(&user)
                .map(|f| f.iter().copied().collect())
                .unwrap_or_default();

            for friend in friends {
                if friend == user {
                    if self.pull_entry(&user, friend.to_string().into()).await? {
                        report.actions.push(RepairAction::PulledSelf { user });
                    }
                    continue;
                }

                let writable = match graph.get(&friend) {
                    Some(theirs) if theirs.contains(&user) => continue,
                    Some(_) => true,
                    None if existing.contains(&friend) => false,
                    None => {
                        if self.pull_entry(&user, friend.to_string().into()).await? {
                            report
                                .actions
                                .push(RepairAction::PulledDangling { user, friend });
                        }
                        continue;
                    }
                };

                if writable && policy == RepairPolicy::Restore {
                    if self.add_entry(&friend, &user).await? {
                        report.actions.push(RepairAction::Reciprocated {
                            user: friend,
                            friend: user,
                        });
                    }
                    if let Some(theirs) = graph.get_mut(&friend) {
                        theirs.insert(user);
                    }
                } else {
                    if self.pull_entry(&user, friend.to_string().into()).await? {
                        report.actions.push(RepairAction::Severed { user, friend });
                    }
                    if let Some(mine) = graph.get_mut(&user) {
                        mine.remove(&friend);
                    }
                }
            }
        }

        if !report.unreadable.is_empty() {
            tracing::warn!(
                count = report.unreadable.len(),
                "Repair skipped users with unreadable friend lists"
            );
        }
        tracing::info!(
            scanned = report.scanned,
            changes = report.actions.len(),
            policy = ?policy,
            "Repair pass complete"
        );
        Ok(report)
    }

    /// `$pull` one raw entry from `user`'s set; true if something changed
    async fn pull_entry(&self, user: &UserId, entry: Value) -> GraphResult<bool> {
        let outcome = self
            .backend
            .update_one(
                self.collection(),
                user.key(),
                Update::pull(fields::FRIENDS, entry),
            )
            .await?;
        Ok(outcome.modified > 0)
    }

    /// `$addToSet` `friend` into `user`'s set; true if something changed
    async fn add_entry(&self, user: &UserId, friend: &UserId) -> GraphResult<bool> {
        let outcome = self
            .backend
            .update_one(
                self.collection(),
                user.key(),
                Update::add_to_set(fields::FRIENDS, friend.to_string()),
            )
            .await?;
        Ok(outcome.modified > 0)
    }
}
