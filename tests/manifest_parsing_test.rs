//! Manifest parsing tests using datatest-stable for test data discovery
//!
//! Every file under `tests/testdata/valid` must parse into at least one
//! entry and survive a serialize/parse round trip; every file under
//! `tests/testdata/invalid` must be rejected with a manifest format error.

use std::path::Path;

use wstool::manifest;

fn test_valid_manifest(path: &Path) -> datatest_stable::Result<()> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read test file {}: {}", path.display(), e))?;

    let specs = manifest::parse(&content)
        .map_err(|e| format!("Failed to parse manifest {}: {}", path.display(), e))?;
    assert!(
        !specs.is_empty(),
        "Manifest {} should contain at least one entry",
        path.display()
    );

    for (idx, spec) in specs.iter().enumerate() {
        assert!(
            !spec.local_name().is_empty(),
            "Entry {} in {} has an empty local-name",
            idx,
            path.display()
        );
        assert_eq!(
            spec.is_vcs(),
            spec.uri().is_some(),
            "Entry {} in {} breaks the uri/scm pairing",
            idx,
            path.display()
        );
    }

    let versioned = manifest::to_string(&specs, true)?;
    let reparsed = manifest::parse(&versioned)?;
    assert_eq!(reparsed, specs, "{} changed across a round trip", path.display());

    Ok(())
}

fn test_invalid_manifest(path: &Path) -> datatest_stable::Result<()> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read test file {}: {}", path.display(), e))?;

    match manifest::parse(&content) {
        Ok(specs) => Err(format!(
            "{} should be rejected, parsed {} entries",
            path.display(),
            specs.len()
        )
        .into()),
        Err(e) => {
            assert!(
                e.format_issue().is_some(),
                "{} failed with a non-format error: {}",
                path.display(),
                e
            );
            Ok(())
        }
    }
}

datatest_stable::harness!(
    test_valid_manifest,
    "tests/testdata/valid",
    r".*\.rosinstall$",
    test_invalid_manifest,
    "tests/testdata/invalid",
    r".*\.rosinstall$"
);
