//! Command handlers, one module per command family.

pub mod friends;
pub mod users;
