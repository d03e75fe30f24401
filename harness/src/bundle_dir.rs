//! Bundle directory persistence: write/read/verify `ArtifactBundleV1` on disk.
//!
//! # Directory layout
//!
//! ```text
//! <dir>/
//!   bundle_manifest.json         canonical JSON, full artifact listing
//!   bundle_digest_basis.json     canonical JSON, normative projection only
//!   bundle_digest.txt            ASCII digest string ("sha256:...")
//!   graph.json                   normative
//!   trace.json                   normative
//!   result.json                  normative
//!   report.txt                   observational
//! ```
//!
//! The directory path is never part of any hash surface. The manifest's
//! declared list is the source of truth.
//!
//! # Fail-closed semantics
//!
//! - Missing declared artifact files → error
//! - Extra undeclared files → error
//! - Stored digest disagreeing with the digest basis → error
//! - Hash, manifest and replay checks run through [`verify_bundle`]

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use thiserror::Error;
use tracing::debug;
use ucs_kernel::proof::hash::{canonical_hash, ContentHash};

use crate::bundle::{
    manifest_schema, verify_bundle, ArtifactBundleV1, BundleArtifact, BundleVerifyError,
    DOMAIN_BUNDLE_DIGEST,
};

const MANIFEST_FILENAME: &str = "bundle_manifest.json";
const DIGEST_BASIS_FILENAME: &str = "bundle_digest_basis.json";
const DIGEST_FILENAME: &str = "bundle_digest.txt";

/// Reserved metadata filenames (not artifact files).
const METADATA_FILENAMES: &[&str] = &[MANIFEST_FILENAME, DIGEST_BASIS_FILENAME, DIGEST_FILENAME];

const TEMP_PREFIX: &str = ".tmp_";

/// Error writing a bundle directory.
#[derive(Debug, Error)]
pub enum BundleDirWriteError {
    #[error("I/O error: {detail}")]
    Io { detail: String },
    #[error("artifact name {name:?} is not a plain file name")]
    InvalidArtifactName { name: String },
}

/// Error reading a bundle directory.
#[derive(Debug, Error)]
pub enum BundleDirReadError {
    #[error("I/O error: {detail}")]
    Io { detail: String },
    #[error("missing metadata file: {filename}")]
    MissingMetadata { filename: String },
    #[error("missing artifact: {name}")]
    MissingArtifact { name: String },
    #[error("undeclared extra file: {name}")]
    ExtraFile { name: String },
    #[error("manifest parse error: {detail}")]
    ManifestParseError { detail: String },
    #[error("manifest schema mismatch: {found}")]
    ManifestVersionMismatch { found: String },
    #[error("manifest entry invalid: {detail}")]
    ManifestEntryInvalid { detail: String },
    #[error("digest mismatch: stored={stored}, recomputed={recomputed}")]
    DigestMismatch { stored: String, recomputed: String },
}

/// Error verifying a bundle directory.
#[derive(Debug, Error)]
pub enum BundleDirVerifyError {
    #[error("cannot read bundle directory")]
    ReadError(#[from] BundleDirReadError),
    #[error("bundle directory does not verify")]
    VerifyError(#[from] BundleVerifyError),
}

/// Write a bundle to `dir`, creating it if needed.
///
/// Each artifact file and the three metadata files are written via a temp
/// file and rename.
///
/// # Errors
///
/// Returns [`BundleDirWriteError`] on I/O failure, or if an artifact name
/// would escape the directory.
pub fn write_bundle_dir(bundle: &ArtifactBundleV1, dir: &Path) -> Result<(), BundleDirWriteError> {
    std::fs::create_dir_all(dir).map_err(|e| BundleDirWriteError::Io {
        detail: format!("create_dir_all {}: {e}", dir.display()),
    })?;

    for artifact in bundle.artifacts.values() {
        if !is_plain_file_name(&artifact.name) {
            return Err(BundleDirWriteError::InvalidArtifactName {
                name: artifact.name.clone(),
            });
        }
        write_atomic(&dir.join(&artifact.name), &artifact.content)?;
    }

    write_atomic(&dir.join(MANIFEST_FILENAME), &bundle.manifest)?;
    write_atomic(&dir.join(DIGEST_BASIS_FILENAME), &bundle.digest_basis)?;
    write_atomic(&dir.join(DIGEST_FILENAME), bundle.digest.as_str().as_bytes())?;

    debug!(dir = %dir.display(), digest = %bundle.digest, "bundle directory written");
    Ok(())
}

/// Read a bundle directory back into an `ArtifactBundleV1`.
///
/// Fail-closed on missing or extra files, an unknown manifest schema, or a
/// stored digest that disagrees with the digest basis. Content hashes are
/// taken from the manifest as declared; [`verify_bundle_dir`] checks them.
///
/// # Errors
///
/// Returns [`BundleDirReadError`] on any validation failure.
pub fn read_bundle_dir(dir: &Path) -> Result<ArtifactBundleV1, BundleDirReadError> {
    let manifest_bytes = read_required(dir, MANIFEST_FILENAME)?;
    let digest_basis_bytes = read_required(dir, DIGEST_BASIS_FILENAME)?;
    let digest_bytes = read_required(dir, DIGEST_FILENAME)?;

    let manifest_value: serde_json::Value =
        serde_json::from_slice(&manifest_bytes).map_err(|e| {
            BundleDirReadError::ManifestParseError {
                detail: e.to_string(),
            }
        })?;

    let schema_version = manifest_value["schema_version"].as_str().unwrap_or("");
    if schema_version != manifest_schema() {
        return Err(BundleDirReadError::ManifestVersionMismatch {
            found: schema_version.to_string(),
        });
    }

    let entries = manifest_value["artifacts"].as_array().ok_or_else(|| {
        BundleDirReadError::ManifestParseError {
            detail: "\"artifacts\" is not an array".into(),
        }
    })?;

    let mut artifacts = BTreeMap::new();
    for entry in entries {
        let artifact = read_declared_artifact(dir, entry)?;
        artifacts.insert(artifact.name.clone(), artifact);
    }

    for filename in list_files(dir)? {
        if !artifacts.contains_key(&filename) && !METADATA_FILENAMES.contains(&filename.as_str())
        {
            return Err(BundleDirReadError::ExtraFile { name: filename });
        }
    }

    let recomputed = canonical_hash(DOMAIN_BUNDLE_DIGEST, &digest_basis_bytes);
    let stored = String::from_utf8_lossy(&digest_bytes).trim().to_string();
    if recomputed.as_str() != stored {
        return Err(BundleDirReadError::DigestMismatch {
            stored,
            recomputed: recomputed.as_str().to_string(),
        });
    }

    Ok(ArtifactBundleV1 {
        artifacts,
        manifest: manifest_bytes,
        digest_basis: digest_basis_bytes,
        digest: recomputed,
    })
}

/// Read from disk, then run [`verify_bundle`]. The offline entry point.
///
/// # Errors
///
/// Returns [`BundleDirVerifyError`] on read failure or any verification
/// failure, including replay divergence.
pub fn verify_bundle_dir(dir: &Path) -> Result<ArtifactBundleV1, BundleDirVerifyError> {
    let bundle = read_bundle_dir(dir)?;
    verify_bundle(&bundle)?;
    Ok(bundle)
}

fn read_declared_artifact(
    dir: &Path,
    entry: &serde_json::Value,
) -> Result<BundleArtifact, BundleDirReadError> {
    let name = entry["name"]
        .as_str()
        .filter(|n| is_plain_file_name(n))
        .ok_or_else(|| BundleDirReadError::ManifestEntryInvalid {
            detail: "missing or invalid \"name\"".into(),
        })?
        .to_string();

    let hash_str = entry["content_hash"].as_str().ok_or_else(|| {
        BundleDirReadError::ManifestEntryInvalid {
            detail: format!("missing \"content_hash\" for {name}"),
        }
    })?;
    let content_hash =
        ContentHash::parse(hash_str).ok_or_else(|| BundleDirReadError::ManifestEntryInvalid {
            detail: format!("invalid content_hash for {name}: {hash_str}"),
        })?;

    let normative = entry["normative"].as_bool().ok_or_else(|| {
        BundleDirReadError::ManifestEntryInvalid {
            detail: format!("missing \"normative\" for {name}"),
        }
    })?;

    let content = std::fs::read(dir.join(&name))
        .map_err(|_| BundleDirReadError::MissingArtifact { name: name.clone() })?;

    Ok(BundleArtifact {
        name,
        content,
        content_hash,
        normative,
    })
}

/// A name that stays inside the bundle directory and cannot collide with
/// temp files.
fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.starts_with(TEMP_PREFIX)
        && !name.contains(['/', '\\'])
}

/// Temp file + rename in the same directory.
fn write_atomic(path: &Path, content: &[u8]) -> Result<(), BundleDirWriteError> {
    let dir = path.parent().ok_or_else(|| BundleDirWriteError::Io {
        detail: format!("{} has no parent directory", path.display()),
    })?;
    let file_name = path.file_name().unwrap_or_default().to_string_lossy();
    let temp_path = dir.join(format!("{TEMP_PREFIX}{file_name}"));

    std::fs::write(&temp_path, content).map_err(|e| BundleDirWriteError::Io {
        detail: format!("write {}: {e}", temp_path.display()),
    })?;
    std::fs::rename(&temp_path, path).map_err(|e| BundleDirWriteError::Io {
        detail: format!("rename {} → {}: {e}", temp_path.display(), path.display()),
    })
}

fn read_required(dir: &Path, filename: &str) -> Result<Vec<u8>, BundleDirReadError> {
    std::fs::read(dir.join(filename)).map_err(|_| BundleDirReadError::MissingMetadata {
        filename: filename.to_string(),
    })
}

/// Regular files in `dir`, names only, skipping leftover temp files.
fn list_files(dir: &Path) -> Result<BTreeSet<String>, BundleDirReadError> {
    let io = |e: std::io::Error| BundleDirReadError::Io {
        detail: format!("read_dir {}: {e}", dir.display()),
    };
    let mut files = BTreeSet::new();
    for entry in std::fs::read_dir(dir).map_err(io)? {
        let entry = entry.map_err(io)?;
        if !entry.file_type().map_err(io)?.is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if !name.starts_with(TEMP_PREFIX) {
                files.insert(name.to_string());
            }
        }
    }
    Ok(files)
}
