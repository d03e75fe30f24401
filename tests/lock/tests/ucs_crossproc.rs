//! Cross-process determinism.
//!
//! Spawns the `trace_fixture` binary under several environment variants and
//! asserts identical output. Proves that traces, bundles and digests are not
//! influenced by cwd, locale, log filters or unrelated environment.

use std::path::Path;
use std::process::Command;

/// `cargo test` puts test binaries in `target/<profile>/deps/`; the fixture
/// binary lives one level up.
fn binary_path() -> String {
    let mut path = std::env::current_exe()
        .expect("can resolve test binary path")
        .parent()
        .expect("binary dir exists")
        .parent()
        .expect("deps parent exists")
        .to_path_buf();
    path.push("trace_fixture");
    path.to_string_lossy().to_string()
}

fn workspace_root() -> String {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(Path::parent)
        .expect("workspace root exists")
        .to_string_lossy()
        .to_string()
}

fn run_variant(work_dir: &str, env_overrides: &[(&str, &str)]) -> String {
    let bin = binary_path();
    let mut command = Command::new(&bin);
    command
        .current_dir(work_dir)
        .env_remove("LC_ALL")
        .env_remove("LC_COLLATE")
        .env_remove("LANG")
        .env_remove("LANGUAGE")
        .env_remove("UCS_START")
        .env_remove("UCS_GOAL");
    for &(key, val) in env_overrides {
        command.env(key, val);
    }

    let output = command.output().unwrap_or_else(|e| {
        panic!("failed to spawn {bin} (work_dir={work_dir}, overrides={env_overrides:?}): {e}")
    });
    assert!(
        output.status.success(),
        "trace_fixture exited with {}: stderr={}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("stdout is valid UTF-8")
}

#[test]
fn crossproc_determinism_env_variants() {
    let root = workspace_root();
    let baseline = run_variant(&root, &[]);

    assert!(baseline.contains("default.trace_digest=sha256:"));
    assert!(baseline.contains("default.cost=5"));
    assert!(baseline.contains("unreachable.cost=0"));
    assert_eq!(baseline.matches("replay_verdict=Match").count(), 3);

    let alt_cwd = if cfg!(target_os = "windows") {
        "C:\\"
    } else {
        "/tmp"
    };
    assert_eq!(baseline, run_variant(alt_cwd, &[]), "cwd changed output");

    assert_eq!(
        baseline,
        run_variant(&root, &[("LC_ALL", "C"), ("LANG", "C")]),
        "locale changed output"
    );

    assert_eq!(
        baseline,
        run_variant(
            &root,
            &[
                ("RUST_LOG", "trace"),
                ("UCS_NOISE", "should_not_matter"),
                ("TZ", "America/New_York"),
            ],
        ),
        "unrelated env changed output"
    );
}

#[test]
fn crossproc_matches_in_process() {
    let output = run_variant(&workspace_root(), &[]);
    let in_process = ucs_harness::runner::run_text(
        ucs_harness::demo::DEMO_GRAPH,
        &ucs_harness::config::RunConfigV1::default(),
    )
    .unwrap();
    let expected = format!("default.bundle_digest={}", in_process.bundle.digest);
    assert!(output.lines().any(|l| l == expected), "{output}");
}
