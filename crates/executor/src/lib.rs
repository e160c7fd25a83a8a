//! Command execution layer for SocialGraph
//!
//! The executor is the boundary between callers and the graph engine:
//! - [`Command`]: one variant per boundary request, serde-serializable
//! - [`Output`]: one variant per result shape
//! - [`Error`]: stable kind strings and HTTP-style status classes
//! - [`Executor`]: async dispatch, plus a JSON request/response entry point
//! - [`SocialGraph`]: typed client over the executor
//!
//! Identifiers are passed through as raw strings and decoded by the engine,
//! so malformed input always surfaces as `InvalidIdentifier`.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod api;
mod command;
mod convert;
mod error;
mod executor;
mod handlers;
mod output;

pub use api::SocialGraph;
pub use command::Command;
pub use error::Error;
pub use executor::{Executor, Response};
pub use output::Output;

/// Result type for executor operations.
pub type Result<T> = std::result::Result<T, Error>;
