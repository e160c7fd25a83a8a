//! Line parsing: one shell-style line to one action.
//!
//! Verbs are case-insensitive. Optional fields are passed as `key=value`:
//!
//! ```text
//! USER.CREATE name=Alice age=30
//! USER.UPDATE 65a1f0c2e4b0a1b2c3d4e5f6 age=31 friends=65a1...,65a2...
//! FRIEND.ADD <source> <target>
//! ```

use socialgraph_engine::RepairPolicy;
use socialgraph_executor::Command;

/// What a line asks the REPL to do
#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    /// Run a command against the graph
    Execute(Command),
    /// Print the command reference
    Help,
    /// Leave the REPL
    Quit,
}

/// Command reference printed by `HELP`
pub const HELP: &str = "\
USER.CREATE [name=<name>] [age=<n>]          create a user, prints its id
USER.GET <id>                                show a user
USER.UPDATE <id> [name=..] [age=..] [friends=<id>,<id>..]
                                             patch a user (zero values are ignored)
USER.DEL <id>                                delete a user and sweep its friendships
FRIEND.ADD <id> <id>                         make two users friends
FRIEND.LIST <id>                             list a user's friends
FRIEND.DEL <id> <id>                         end a friendship
REPAIR [restore|sever]                       fix dangling and one-sided friendships
HELP                                         show this help
QUIT                                         exit";

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<Action>, String> {
    let words = shlex::split(line).ok_or_else(|| "unbalanced quotes".to_string())?;
    parse_words(&words)
}

/// Parse an already-split command line
pub fn parse_words(words: &[String]) -> Result<Option<Action>, String> {
    let Some((verb, args)) = words.split_first() else {
        return Ok(None);
    };

    let action = match verb.to_ascii_uppercase().as_str() {
        "HELP" => {
            arity(verb, args, 0)?;
            Action::Help
        }
        "QUIT" | "EXIT" => {
            arity(verb, args, 0)?;
            Action::Quit
        }
        "USER.CREATE" => {
            let mut fields = Fields::parse(args)?;
            let command = Command::UserCreate {
                name: fields.take("name"),
                age: fields.take_u32("age")?,
            };
            fields.finish(verb)?;
            Action::Execute(command)
        }
        "USER.GET" => {
            arity(verb, args, 1)?;
            Action::Execute(Command::UserGet {
                id: args[0].clone(),
            })
        }
        "USER.UPDATE" => {
            let (id, rest) = args
                .split_first()
                .ok_or_else(|| format!("{} requires an id", verb))?;
            let mut fields = Fields::parse(rest)?;
            let command = Command::UserUpdate {
                id: id.clone(),
                name: fields.take("name"),
                age: fields.take_u32("age")?,
                friends: fields.take("friends").map(|list| {
                    list.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(String::from)
                        .collect()
                }),
            };
            fields.finish(verb)?;
            Action::Execute(command)
        }
        "USER.DEL" => {
            arity(verb, args, 1)?;
            Action::Execute(Command::UserDelete {
                id: args[0].clone(),
            })
        }
        "FRIEND.ADD" => {
            arity(verb, args, 2)?;
            Action::Execute(Command::FriendAdd {
                source: args[0].clone(),
                target: args[1].clone(),
            })
        }
        "FRIEND.LIST" => {
            arity(verb, args, 1)?;
            Action::Execute(Command::FriendList {
                id: args[0].clone(),
            })
        }
        "FRIEND.DEL" => {
            arity(verb, args, 2)?;
            Action::Execute(Command::FriendRemove {
                source: args[0].clone(),
                target: args[1].clone(),
            })
        }
        "REPAIR" => {
            let policy = match args {
                [] => None,
                [policy] => Some(policy.parse::<RepairPolicy>()?),
                _ => return Err(format!("{} takes at most 1 argument", verb)),
            };
            Action::Execute(Command::Repair { policy })
        }
        _ => return Err(format!("unknown command '{}', try HELP", verb)),
    };
    Ok(Some(action))
}

fn arity(verb: &str, args: &[String], expected: usize) -> Result<(), String> {
    if args.len() != expected {
        return Err(format!(
            "{} takes {} argument(s), got {}",
            verb.to_ascii_uppercase(),
            expected,
            args.len()
        ));
    }
    Ok(())
}

/// `key=value` arguments, consumed one key at a time
struct Fields(Vec<(String, String)>);

impl Fields {
    fn parse(args: &[String]) -> Result<Self, String> {
        args.iter()
            .map(|arg| {
                arg.split_once('=')
                    .map(|(k, v)| (k.to_ascii_lowercase(), v.to_string()))
                    .ok_or_else(|| format!("expected key=value, got '{}'", arg))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Fields)
    }

    fn take(&mut self, key: &str) -> Option<String> {
        let pos = self.0.iter().position(|(k, _)| k == key)?;
        Some(self.0.remove(pos).1)
    }

    fn take_u32(&mut self, key: &str) -> Result<Option<u32>, String> {
        self.take(key)
            .map(|v| {
                v.parse::<u32>()
                    .map_err(|e| format!("invalid {} '{}': {}", key, v, e))
            })
            .transpose()
    }

    fn finish(self, verb: &str) -> Result<(), String> {
        match self.0.first() {
            None => Ok(()),
            Some((key, _)) => Err(format!(
                "unknown field '{}' for {}",
                key,
                verb.to_ascii_uppercase()
            )),
        }
    }
}
