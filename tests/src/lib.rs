//! Shared helpers for the planner and cleanup scenario tests.
//!
//! The catalog, queue and ledger are replaced by in-memory mocks so the
//! scenarios run without any AWS endpoint.
