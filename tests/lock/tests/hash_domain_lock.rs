//! Hash domain governance lock tests.
//!
//! Proves:
//! 1. The domain set has the expected count
//! 2. All domain byte strings are unique
//! 3. All domains are null-terminated and follow `UCSLAB::*::V1\0`
//! 4. No raw `UCSLAB::` literals in production source outside `hash_domain.rs`
//!    (test modules excluded)

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use ucs_kernel::proof::hash::HashDomain;

#[test]
fn hash_domain_canonical_set_count() {
    assert_eq!(
        HashDomain::ALL.len(),
        6,
        "expected 6 domain variants; if you added a new domain, update this count"
    );
}

#[test]
fn hash_domain_all_unique_bytes() {
    let mut seen = BTreeSet::new();
    for domain in HashDomain::ALL {
        assert!(
            seen.insert(domain.as_bytes()),
            "duplicate domain bytes: {domain}"
        );
    }
}

#[test]
fn hash_domain_naming_convention() {
    for domain in HashDomain::ALL {
        let bytes = domain.as_bytes();
        assert!(bytes.starts_with(b"UCSLAB::"), "{domain} lacks UCSLAB:: prefix");
        assert!(bytes.ends_with(b"::V1\0"), "{domain} does not end with ::V1\\0");
    }
}

#[test]
fn no_raw_domain_literals_outside_authority() {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let Some(root) = manifest_dir.parent().and_then(Path::parent) else {
        panic!("workspace root not found from {}", manifest_dir.display());
    };

    let mut violations = Vec::new();
    for crate_dir in ["kernel", "search", "harness"] {
        let src = root.join(crate_dir).join("src");
        assert!(src.is_dir(), "missing {}", src.display());
        for path in rust_files(&src) {
            if path.file_name().and_then(|n| n.to_str()) == Some("hash_domain.rs") {
                continue;
            }
            let Ok(content) = std::fs::read_to_string(&path) else {
                continue;
            };
            // Test modules sit at the end of each file.
            let production = content.split("#[cfg(test)]").next().unwrap_or_default();
            for (i, line) in production.lines().enumerate() {
                if line.contains("b\"UCSLAB::") && !line.trim().starts_with("//") {
                    violations.push(format!("  {}:{}: {}", path.display(), i + 1, line.trim()));
                }
            }
        }
    }

    assert!(
        violations.is_empty(),
        "raw UCSLAB:: domain literals found outside hash_domain.rs:\n{}",
        violations.join("\n")
    );
}

fn rust_files(dir: &Path) -> Vec<PathBuf> {
    let mut results = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                results.extend(rust_files(&path));
            } else if path.extension().and_then(|e| e.to_str()) == Some("rs") {
                results.push(path);
            }
        }
    }
    results
}
