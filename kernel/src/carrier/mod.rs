//! Carrier module: the weighted graph and the text compilation boundary.

pub mod compile;
pub mod graph;
