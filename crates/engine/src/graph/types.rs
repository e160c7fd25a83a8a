//! Types for the integrity passes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use socialgraph_core::UserId;

/// What the repair pass does with a friendship recorded on one side only.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RepairPolicy {
    /// Add the missing reciprocal entry (default).
    #[default]
    Restore,
    /// Remove the one-sided entry.
    Sever,
}

impl std::str::FromStr for RepairPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "restore" => Ok(RepairPolicy::Restore),
            "sever" => Ok(RepairPolicy::Sever),
            other => Err(format!(
                "unknown repair policy '{}', expected 'restore' or 'sever'",
                other
            )),
        }
    }
}

/// One change made by the repair pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RepairAction {
    /// `friend` no longer exists and was pulled from `user`'s set.
    PulledDangling {
        /// User whose set was cleaned.
        user: UserId,
        /// Missing user.
        friend: UserId,
    },
    /// `user` listed itself and the entry was pulled.
    PulledSelf {
        /// Offending user.
        user: UserId,
    },
    /// An entry that is not an identifier was pulled from `user`'s set.
    PulledMalformed {
        /// User whose set was cleaned.
        user: UserId,
        /// The entry as stored.
        entry: Value,
    },
    /// `friend` listed `user` but not the other way round; `friend` was
    /// added to `user`'s set.
    Reciprocated {
        /// User whose set gained an entry.
        user: UserId,
        /// User that already listed `user`.
        friend: UserId,
    },
    /// An entry spelled differently from its canonical form was rewritten.
    Canonicalized {
        /// User whose set was rewritten.
        user: UserId,
        /// User the entry refers to.
        friend: UserId,
        /// The entry as stored.
        entry: Value,
    },
    /// `user` listed `friend` without reciprocation; the entry was pulled.
    Severed {
        /// User whose set lost an entry.
        user: UserId,
        /// User that did not list `user`.
        friend: UserId,
    },
}

/// Outcome of a repair pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RepairReport {
    /// Documents examined.
    pub scanned: usize,
    /// Every change made, in the order it was made.
    pub actions: Vec<RepairAction>,
    /// Users whose `friends` field is not an array. Their documents are
    /// left alone; entries pointing at them are severed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unreadable: Vec<UserId>,
}

impl RepairReport {
    /// True if the pass found nothing to fix.
    pub fn is_clean(&self) -> bool {
        self.actions.is_empty() && self.unreadable.is_empty()
    }
}
