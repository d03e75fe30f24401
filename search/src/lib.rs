//! UCS Search: uniform-cost search that records a replayable trace.
//!
//! This crate provides the search layer. It depends only on `ucs_kernel`;
//! it does NOT depend on `ucs_harness`.
//!
//! # Crate dependency graph
//!
//! ```text
//! ucs_kernel  ←  ucs_search  ←  ucs_harness
//! (graph, canon)  (frontier, trace)  (runner, bundles, CLI)
//! ```
//!
//! # Key types
//!
//! - [`node::FrontierEntryV1`] -- a path-carrying frontier entry
//! - [`node::FrontierKey`] -- the explicit frontier comparator
//! - [`frontier::UniformCostFrontier`] -- min-heap frontier with snapshots
//! - [`trace::SearchTraceV1`] -- the ordered step log (normative artifact)
//! - [`search::SearchResult`] -- outcome plus trace
//! - [`replay::ReplayVerdict`] -- result of re-running a recorded trace

#![forbid(unsafe_code)]

pub mod error;
pub mod frontier;
pub mod node;
pub mod render;
pub mod replay;
pub mod search;
pub mod trace;
pub mod trace_reader;
