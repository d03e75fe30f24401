//! Proof module: canonical JSON, typed hash domains, content hashing.
//!
//! Depends on nothing else in the kernel.

pub mod canon;
pub mod hash;
pub mod hash_domain;
