//! Shared test utilities for hub-spec-sync integration tests.
//!
//! This module provides:
//! - `FakeHub` and `MemoryStore`, in-memory stand-ins for the hub API and
//!   the spec database with call counting and failure injection
//! - Builders for hub instances in the states the reconciler distinguishes

pub mod builders;
pub mod harness;

pub use builders::*;
pub use harness::{FakeHub, MemoryStore, StoreOp};
