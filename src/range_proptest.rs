//! Property-based tests for range selection and name resolution.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::error::Error;
    use crate::naming::{derived_suffix, resolve, Resolution};
    use crate::phases::range::select_range;
    use proptest::prelude::*;

    /// Distinct version names, in arbitrary (unsorted) order.
    fn version_list() -> impl Strategy<Value = Vec<String>> {
        prop::collection::hash_set("V[0-9]{1,2}\\.[0-9]{1,2}", 1..20)
            .prop_map(|set| set.into_iter().collect::<Vec<_>>())
            .prop_shuffle()
    }

    // ============================================================================
    // select_range property tests
    // ============================================================================

    proptest! {
        /// Property: a valid range is the contiguous slice from `from` to `to`
        #[test]
        fn range_is_contiguous_slice(
            versions in version_list(),
            a in any::<prop::sample::Index>(),
            b in any::<prop::sample::Index>(),
        ) {
            let (i, j) = {
                let x = a.index(versions.len());
                let y = b.index(versions.len());
                (x.min(y), x.max(y))
            };

            let slice = select_range(&versions, Some(versions[i].as_str()), Some(versions[j].as_str())).unwrap();

            prop_assert_eq!(slice.len(), j - i + 1);
            prop_assert_eq!(&slice[0], &versions[i]);
            prop_assert_eq!(&slice[slice.len() - 1], &versions[j]);
            prop_assert_eq!(slice, &versions[i..=j]);
        }

        /// Property: no boundaries returns the input unchanged
        #[test]
        fn no_boundaries_is_identity(versions in version_list()) {
            let slice = select_range(&versions, None, None).unwrap();
            prop_assert_eq!(slice, versions.as_slice());
        }

        /// Property: reversed boundaries are always rejected
        #[test]
        fn reversed_range_is_invalid(
            versions in version_list(),
            a in any::<prop::sample::Index>(),
            b in any::<prop::sample::Index>(),
        ) {
            let x = a.index(versions.len());
            let y = b.index(versions.len());
            prop_assume!(x != y);
            let (i, j) = (x.min(y), x.max(y));

            let result = select_range(&versions, Some(versions[j].as_str()), Some(versions[i].as_str()));
            let is_invalid_range = matches!(result, Err(Error::InvalidRange { .. }));
            prop_assert!(is_invalid_range);
        }

        /// Property: a boundary outside the list is never silently accepted
        #[test]
        fn absent_boundary_is_not_found(versions in version_list(), missing in "W[0-9]{1,3}") {
            let from_missing = select_range(&versions, Some(missing.as_str()), Some(versions[0].as_str()));
            let to_missing = select_range(&versions, Some(versions[0].as_str()), Some(missing.as_str()));
            let from_not_found = matches!(from_missing, Err(Error::RangeNotFound { .. }));
            let to_not_found = matches!(to_missing, Err(Error::RangeNotFound { .. }));
            prop_assert!(from_not_found);
            prop_assert!(to_not_found);
        }
    }

    // ============================================================================
    // resolve property tests
    // ============================================================================

    proptest! {
        /// Property: a raw name that embeds a candidate resolves to it
        #[test]
        fn embedded_candidate_resolves(prefix in "[A-Za-z]{0,8}", unit in "[A-Z][a-z]{3,10}") {
            let raw = format!("{}-{}", prefix, unit);
            prop_assert_eq!(resolve(&raw, &[unit.clone()]), Resolution::Canonical(unit));
        }

        /// Property: unmatched names bucket under their suffix
        #[test]
        fn unmatched_bucket_uses_suffix(raw in "[a-z\\-]{1,20}") {
            let resolution = resolve(&raw, &["ZZZ"]);
            prop_assert_eq!(
                resolution.dir_name().to_string(),
                format!("{}(Unknown)", derived_suffix(&raw))
            );
        }

        /// Property: the derived suffix never contains the separator
        #[test]
        fn derived_suffix_has_no_separator(raw in ".*") {
            prop_assert!(!derived_suffix(&raw).contains('-'));
        }
    }
}
