//! UCS harness: run orchestration on top of the search engine.
//!
//! The harness takes graph text, resolves the endpoints, runs the search,
//! replays the trace as a self-check, and packages the graph, trace, result
//! and rendered report as a content-addressed artifact bundle.
//!
//! The harness does NOT implement search logic; it delegates to
//! `ucs_search`. Libraries here log through `tracing` but never install a
//! subscriber; the `ucs_trace` binary does that.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod bundle;
pub mod bundle_dir;
pub mod config;
pub mod demo;
pub mod runner;
