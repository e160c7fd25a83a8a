//! Human-readable rendering of outputs and errors.

use socialgraph_engine::RepairAction;
use socialgraph_executor::{Error, Output};

/// Render a successful output, redis-cli style
pub fn output(output: &Output) -> String {
    match output {
        Output::Unit => "OK".to_string(),
        Output::Id(id) => format!("\"{}\"", id),
        Output::User(user) => {
            let mut lines = vec![format!("id: {}", user.id)];
            if let Some(name) = &user.name {
                lines.push(format!("name: {}", name));
            }
            if let Some(age) = user.age {
                lines.push(format!("age: {}", age));
            }
            lines.push(format!("friends: {}", user.friends.len()));
            for (i, friend) in user.friends.iter().enumerate() {
                lines.push(format!("  {}) {}", i + 1, friend));
            }
            lines.join("\n")
        }
        Output::Ids(ids) if ids.is_empty() => "(empty list)".to_string(),
        Output::Ids(ids) => ids
            .iter()
            .enumerate()
            .map(|(i, id)| format!("{}) {}", i + 1, id))
            .collect::<Vec<_>>()
            .join("\n"),
        Output::Repair(report) => {
            let mut lines = vec![format!(
                "scanned {} user(s), {} change(s)",
                report.scanned,
                report.actions.len()
            )];
            lines.extend(report.actions.iter().map(repair_action));
            lines.extend(
                report
                    .unreadable
                    .iter()
                    .map(|user| format!("  skipped {}: friends is not a list", user)),
            );
            lines.join("\n")
        }
    }
}

fn repair_action(action: &RepairAction) -> String {
    match action {
        RepairAction::PulledDangling { user, friend } => {
            format!("  pulled missing {} from {}", friend, user)
        }
        RepairAction::PulledSelf { user } => format!("  pulled self entry from {}", user),
        RepairAction::PulledMalformed { user, entry } => {
            format!("  pulled malformed entry {} from {}", entry, user)
        }
        RepairAction::Reciprocated { user, friend } => {
            format!("  added {} to {}", friend, user)
        }
        RepairAction::Canonicalized {
            user,
            friend,
            entry,
        } => format!("  rewrote {} as {} in {}", entry, friend, user),
        RepairAction::Severed { user, friend } => {
            format!("  removed one-sided {} from {}", friend, user)
        }
    }
}

/// Render an error with its kind and status class
pub fn error(err: &Error) -> String {
    format!("(error) {} [{}] {}", err.kind(), err.status(), err)
}
