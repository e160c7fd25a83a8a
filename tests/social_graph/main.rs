//! SocialGraph Integration Test Suite
//!
//! Exercises the graph end to end through the public facade, over the
//! in-memory backend and over a fault-injecting wrapper of it.
//!
//! ## Test Tiers
//!
//! - **Tier 1**: The Alice/Bob walkthrough
//! - **Tier 2**: Graph invariants (no self-edges, symmetry, no dangling ids, patch semantics)
//! - **Tier 3**: Partial failures, timeouts and the repair pass
//! - **Tier 4**: Concurrent callers
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test social_graph
//! ```

// Test modules
mod test_utils;

// Tier 1: Walkthrough
mod tier1_scenario;

// Tier 2: Invariants
mod tier2_invariants;

// Tier 3: Failures
mod tier3_failures;

// Tier 4: Concurrency
mod tier4_concurrency;
