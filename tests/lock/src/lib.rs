//! Shared helpers for the cross-crate acceptance tests.

pub mod graphs;
