//! Property-based tests for local-name normalization and manifest round-trips.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::manifest;
    use crate::path::{clean, normalize, normalize_textual, same_entry};
    use crate::path_spec::{PathSpec, ScmType};
    use proptest::prelude::*;
    use std::path::Path;

    /// A relative local name built from plain segments, `.` and `..`.
    fn local_name_strategy() -> impl Strategy<Value = String> {
        prop::collection::vec(
            prop_oneof![
                4 => "[a-z][a-z0-9_]{0,6}",
                1 => Just(".".to_string()),
                1 => Just("..".to_string()),
            ],
            1..6,
        )
        .prop_map(|parts| parts.join("/"))
    }

    // ============================================================================
    // normalize property tests
    // ============================================================================

    proptest! {
        /// Property: normalizing twice gives the same path as normalizing once
        #[test]
        fn normalize_is_idempotent(name in local_name_strategy()) {
            let base = Path::new("/ws/base");
            let once = normalize(base, &name);
            let twice = normalize(base, &once.to_string_lossy());
            prop_assert_eq!(once, twice);
        }

        /// Property: a textually normalized name denotes the same entry
        #[test]
        fn textual_normalization_preserves_entry(name in local_name_strategy()) {
            let base = Path::new("/ws/base");
            let textual = normalize_textual(&name);
            prop_assert!(same_entry(base, &name, &textual));
        }

        /// Property: `./` prefixes and `x/..` detours never change the entry
        #[test]
        fn detours_are_equivalent(name in "[a-z]{1,8}", detour in "[a-z]{1,8}") {
            let base = Path::new("/ws");
            let spelled = format!("./{}/../{}", detour, name);
            prop_assert!(same_entry(base, &name, &spelled));
        }

        /// Property: cleaned paths never contain `.` components
        #[test]
        fn clean_drops_cur_dir(name in local_name_strategy()) {
            let cleaned = clean(Path::new(&name));
            let has_cur_dir = cleaned
                .components()
                .any(|c| matches!(c, std::path::Component::CurDir));
            prop_assert!(!has_cur_dir || cleaned == Path::new("."));
        }

        /// Property: absolute local names ignore the base path
        #[test]
        fn absolute_names_ignore_base(name in "/[a-z]{1,8}(/[a-z]{1,8}){0,3}") {
            let a = normalize(Path::new("/one"), &name);
            let b = normalize(Path::new("/two/three"), &name);
            prop_assert_eq!(a, b);
        }
    }

    // ============================================================================
    // manifest round-trip property tests
    // ============================================================================

    fn spec_strategy() -> impl Strategy<Value = PathSpec> {
        let scm = prop_oneof![
            Just(ScmType::Git),
            Just(ScmType::Svn),
            Just(ScmType::Hg),
            Just(ScmType::Bzr),
        ];
        prop_oneof![
            (
                "[a-z]{1,8}(/[a-z]{1,8}){0,2}",
                scm,
                "https://example\\.com/[a-z]{1,8}",
                prop::option::of("v[0-9]\\.[0-9]")
            )
                .prop_map(|(name, scm, uri, version)| PathSpec::vcs(name, scm, uri, version)),
            "[a-z]{1,8}".prop_map(PathSpec::other),
            "[a-z]{1,8}\\.sh".prop_map(PathSpec::setup_file),
        ]
    }

    proptest! {
        /// Property: serializing and re-parsing a plain spec is lossless
        #[test]
        fn plain_round_trip(spec in spec_strategy()) {
            let text = manifest::to_string(std::slice::from_ref(&spec), false).unwrap();
            let parsed = manifest::parse(&text).unwrap();
            prop_assert_eq!(parsed, vec![spec]);
        }
    }
}
