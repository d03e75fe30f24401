//! In-memory artifact bundle: the output of a harness run.
//!
//! No file I/O in this module.
//!
//! # Normative vs observational artifacts
//!
//! Each artifact is tagged `normative` (participates in the bundle digest)
//! or observational (listed in the manifest, excluded from the digest).
//!
//! `graph.json`, `trace.json` and `result.json` are normative canonical
//! JSON. `report.txt` is the rendered text and is observational: its layout
//! may change without changing what was searched.
//!
//! The bundle digest is computed over the **digest basis**: a canonical
//! JSON projection of normative artifact hashes only.

use std::collections::BTreeMap;

use thiserror::Error;
use ucs_kernel::carrier::graph::WeightedGraphV1;
use ucs_kernel::proof::canon::canonical_json_bytes;
use ucs_kernel::proof::hash::{canonical_hash, ContentHash, HashDomain};
use ucs_search::replay::{replay_verify, ReplayVerdict};
use ucs_search::search::search;
use ucs_search::trace_reader::read_trace;

/// Domain prefix for bundle artifact content hashing.
pub const DOMAIN_BUNDLE_ARTIFACT: HashDomain = HashDomain::BundleArtifact;

/// Domain prefix for bundle digest computation.
pub const DOMAIN_BUNDLE_DIGEST: HashDomain = HashDomain::BundleDigest;

pub const GRAPH_ARTIFACT: &str = "graph.json";
pub const TRACE_ARTIFACT: &str = "trace.json";
pub const RESULT_ARTIFACT: &str = "result.json";
pub const REPORT_ARTIFACT: &str = "report.txt";

const MANIFEST_SCHEMA: &str = "ucs_bundle.v1";
const DIGEST_BASIS_SCHEMA: &str = "ucs_bundle_digest_basis.v1";

/// A single artifact in the bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleArtifact {
    /// Logical filename (e.g., `"graph.json"`).
    pub name: String,
    pub content: Vec<u8>,
    /// `canonical_hash(DOMAIN_BUNDLE_ARTIFACT, content)`.
    pub content_hash: ContentHash,
    /// Whether this artifact participates in the bundle digest.
    pub normative: bool,
}

/// The complete artifact bundle from a run.
#[derive(Debug, Clone)]
pub struct ArtifactBundleV1 {
    /// Artifacts indexed by logical name, in sorted order.
    pub artifacts: BTreeMap<String, BundleArtifact>,
    /// Canonical JSON listing all artifacts with normative flags.
    pub manifest: Vec<u8>,
    /// Canonical JSON listing normative artifact hashes only.
    pub digest_basis: Vec<u8>,
    /// `canonical_hash(DOMAIN_BUNDLE_DIGEST, digest_basis)`.
    pub digest: ContentHash,
}

impl ArtifactBundleV1 {
    /// Look up an artifact by logical name.
    #[must_use]
    pub fn artifact(&self, name: &str) -> Option<&BundleArtifact> {
        self.artifacts.get(name)
    }
}

/// Error building a bundle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BundleBuildError {
    #[error("canonical JSON error: {detail}")]
    CanonError { detail: String },
    #[error("artifact {name} appears more than once")]
    DuplicateArtifact { name: String },
}

/// Input for bundle assembly.
pub struct ArtifactInput {
    pub name: String,
    pub content: Vec<u8>,
    pub normative: bool,
}

impl From<(String, Vec<u8>, bool)> for ArtifactInput {
    fn from((name, content, normative): (String, Vec<u8>, bool)) -> Self {
        Self {
            name,
            content,
            normative,
        }
    }
}

/// Build an `ArtifactBundleV1` from a list of artifact inputs.
///
/// Computes content hashes, builds the sorted manifest and digest basis,
/// and derives the bundle digest.
///
/// # Errors
///
/// Returns [`BundleBuildError`] if a name repeats or canonical JSON
/// serialization fails.
pub fn build_bundle(
    artifacts: Vec<impl Into<ArtifactInput>>,
) -> Result<ArtifactBundleV1, BundleBuildError> {
    let mut artifact_map = BTreeMap::new();

    for input in artifacts {
        let input = input.into();
        if artifact_map.contains_key(&input.name) {
            return Err(BundleBuildError::DuplicateArtifact { name: input.name });
        }
        let content_hash = canonical_hash(DOMAIN_BUNDLE_ARTIFACT, &input.content);
        artifact_map.insert(
            input.name.clone(),
            BundleArtifact {
                name: input.name,
                content: input.content,
                content_hash,
                normative: input.normative,
            },
        );
    }

    let manifest = compute_manifest_bytes(&artifact_map)
        .map_err(|detail| BundleBuildError::CanonError { detail })?;
    let digest_basis = compute_digest_basis_bytes(&artifact_map)
        .map_err(|detail| BundleBuildError::CanonError { detail })?;
    let digest = canonical_hash(DOMAIN_BUNDLE_DIGEST, &digest_basis);

    Ok(ArtifactBundleV1 {
        artifacts: artifact_map,
        manifest,
        digest_basis,
        digest,
    })
}

/// Error from bundle verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BundleVerifyError {
    #[error("artifact {artifact}: content hash {actual} does not match declared {expected}")]
    ContentHashMismatch {
        artifact: String,
        expected: String,
        actual: String,
    },
    #[error("manifest does not match the artifacts")]
    ManifestMismatch,
    #[error("manifest is not canonical JSON")]
    ManifestNotCanonical,
    #[error("digest basis does not match the normative artifacts")]
    DigestBasisMismatch,
    #[error("digest basis is not canonical JSON")]
    DigestBasisNotCanonical,
    #[error("bundle digest {actual} does not match declared {expected}")]
    DigestMismatch { expected: String, actual: String },
    #[error("normative artifact {artifact} is not canonical JSON")]
    ArtifactNotCanonical { artifact: String },
    #[error("required artifact {name} is missing")]
    ArtifactMissing { name: String },
    #[error("graph.json does not decode: {detail}")]
    GraphDecodeFailed { detail: String },
    #[error("trace.json does not parse: {detail}")]
    TraceParseFailed { detail: String },
    #[error("trace replay failed: {detail}")]
    ReplayFailed { detail: String },
    #[error("trace diverges from graph at step {step_index}: {detail}")]
    ReplayDivergence { step_index: usize, detail: String },
    #[error("result.json does not match the replayed search")]
    ResultMismatch,
    #[error("canonical JSON error: {detail}")]
    CanonError { detail: String },
}

/// Verify a bundle.
///
/// Integrity, for any bundle:
///
/// 1. Each artifact's `content_hash` matches its content.
/// 2. `manifest` and `digest_basis` match the projections recomputed from
///    the artifacts, and both are canonical JSON.
/// 3. `digest` matches `canonical_hash(DOMAIN_BUNDLE_DIGEST, digest_basis)`.
/// 4. Normative `.json` artifacts are canonical JSON.
///
/// Run binding, when `graph.json` or `trace.json` is present (both are then
/// required):
///
/// 5. `graph.json` decodes and `trace.json` passes the fail-closed reader.
/// 6. Replaying the trace against the graph yields `Match`.
/// 7. If present, `result.json` equals the result of re-running the search.
///
/// # Errors
///
/// Returns the first [`BundleVerifyError`] encountered.
pub fn verify_bundle(bundle: &ArtifactBundleV1) -> Result<(), BundleVerifyError> {
    for artifact in bundle.artifacts.values() {
        let recomputed = canonical_hash(DOMAIN_BUNDLE_ARTIFACT, &artifact.content);
        if recomputed != artifact.content_hash {
            return Err(BundleVerifyError::ContentHashMismatch {
                artifact: artifact.name.clone(),
                expected: artifact.content_hash.as_str().to_string(),
                actual: recomputed.as_str().to_string(),
            });
        }
    }

    let expected_manifest = compute_manifest_bytes(&bundle.artifacts)
        .map_err(|detail| BundleVerifyError::CanonError { detail })?;
    if expected_manifest != bundle.manifest {
        return Err(BundleVerifyError::ManifestMismatch);
    }
    if !is_canonical_json(&bundle.manifest) {
        return Err(BundleVerifyError::ManifestNotCanonical);
    }

    let expected_basis = compute_digest_basis_bytes(&bundle.artifacts)
        .map_err(|detail| BundleVerifyError::CanonError { detail })?;
    if expected_basis != bundle.digest_basis {
        return Err(BundleVerifyError::DigestBasisMismatch);
    }
    if !is_canonical_json(&bundle.digest_basis) {
        return Err(BundleVerifyError::DigestBasisNotCanonical);
    }

    let recomputed_digest = canonical_hash(DOMAIN_BUNDLE_DIGEST, &bundle.digest_basis);
    if recomputed_digest != bundle.digest {
        return Err(BundleVerifyError::DigestMismatch {
            expected: bundle.digest.as_str().to_string(),
            actual: recomputed_digest.as_str().to_string(),
        });
    }

    for artifact in bundle.artifacts.values() {
        if artifact.normative
            && artifact.name.ends_with(".json")
            && !is_canonical_json(&artifact.content)
        {
            return Err(BundleVerifyError::ArtifactNotCanonical {
                artifact: artifact.name.clone(),
            });
        }
    }

    verify_run_binding(bundle)
}

/// Steps 5-7 of [`verify_bundle`].
fn verify_run_binding(bundle: &ArtifactBundleV1) -> Result<(), BundleVerifyError> {
    let graph_artifact = bundle.artifact(GRAPH_ARTIFACT);
    let trace_artifact = bundle.artifact(TRACE_ARTIFACT);
    let (graph_artifact, trace_artifact) = match (graph_artifact, trace_artifact) {
        (None, None) => return Ok(()),
        (Some(g), Some(t)) => (g, t),
        (None, Some(_)) => {
            return Err(BundleVerifyError::ArtifactMissing {
                name: GRAPH_ARTIFACT.into(),
            })
        }
        (Some(_), None) => {
            return Err(BundleVerifyError::ArtifactMissing {
                name: TRACE_ARTIFACT.into(),
            })
        }
    };

    let graph = WeightedGraphV1::from_json_bytes(&graph_artifact.content).map_err(|e| {
        BundleVerifyError::GraphDecodeFailed {
            detail: e.to_string(),
        }
    })?;
    let trace = read_trace(&trace_artifact.content).map_err(|e| {
        BundleVerifyError::TraceParseFailed {
            detail: e.to_string(),
        }
    })?;

    match replay_verify(&graph, &trace).map_err(|e| BundleVerifyError::ReplayFailed {
        detail: e.to_string(),
    })? {
        ReplayVerdict::Match => {}
        ReplayVerdict::Divergence { step_index, detail } => {
            return Err(BundleVerifyError::ReplayDivergence { step_index, detail });
        }
    }

    if let Some(result_artifact) = bundle.artifact(RESULT_ARTIFACT) {
        let replayed = search(&graph, &trace.start, &trace.goal)
            .to_canonical_json_bytes()
            .map_err(|e| BundleVerifyError::CanonError {
                detail: e.to_string(),
            })?;
        if replayed != result_artifact.content {
            return Err(BundleVerifyError::ResultMismatch);
        }
    }

    Ok(())
}

fn compute_manifest_bytes(artifacts: &BTreeMap<String, BundleArtifact>) -> Result<Vec<u8>, String> {
    let entries: Vec<serde_json::Value> = artifacts
        .values()
        .map(|a| {
            serde_json::json!({
                "content_hash": a.content_hash.as_str(),
                "name": a.name,
                "normative": a.normative,
            })
        })
        .collect();

    let manifest_value = serde_json::json!({
        "artifacts": entries,
        "schema_version": MANIFEST_SCHEMA,
    });

    canonical_json_bytes(&manifest_value).map_err(|e| e.to_string())
}

fn compute_digest_basis_bytes(
    artifacts: &BTreeMap<String, BundleArtifact>,
) -> Result<Vec<u8>, String> {
    let entries: Vec<serde_json::Value> = artifacts
        .values()
        .filter(|a| a.normative)
        .map(|a| {
            serde_json::json!({
                "content_hash": a.content_hash.as_str(),
                "name": a.name,
            })
        })
        .collect();

    let basis_value = serde_json::json!({
        "artifacts": entries,
        "schema_version": DIGEST_BASIS_SCHEMA,
    });

    canonical_json_bytes(&basis_value).map_err(|e| e.to_string())
}

/// Parse, re-canonicalize, compare.
fn is_canonical_json(bytes: &[u8]) -> bool {
    serde_json::from_slice::<serde_json::Value>(bytes)
        .ok()
        .and_then(|value| canonical_json_bytes(&value).ok())
        .is_some_and(|recanonized| recanonized == bytes)
}

/// Manifest schema tag, for readers that check it.
pub(crate) fn manifest_schema() -> &'static str {
    MANIFEST_SCHEMA
}
