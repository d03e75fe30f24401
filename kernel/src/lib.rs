//! UCS Kernel: the deterministic data layer under the search engine.
//!
//! # API Surface
//!
//! - [`carrier::graph::WeightedGraphV1`] -- weighted directed graph carrier
//! - [`carrier::compile::compile_graph`] -- compile line-oriented graph text into a graph
//! - [`proof::canon::canonical_json_bytes`] -- the single canonical JSON encoder
//! - [`proof::hash::canonical_hash`] -- domain-separated SHA-256 content hashing
//!
//! # Module Dependency Direction
//!
//! `carrier` → `proof`
//!
//! `carrier` uses `proof` for graph digests. `proof` depends on nothing internal.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod carrier;
pub mod proof;
