use lethe_core::QueryType;
use lethe_retrieval::intent::classifier::classify;
use proptest::prelude::*;

proptest! {
    #[test]
    fn classification_is_total_and_pure(query in "\\PC{0,64}") {
        let first = classify(&query);
        prop_assert!(QueryType::ALL.contains(&first));
        prop_assert_eq!(first, classify(&query));
    }

    #[test]
    fn any_delimited_guid_is_an_identifier(
        guid in "[0-9A-Za-z_$]{22}",
        prefix in "[a-z ]{0,12}",
    ) {
        let query = format!("{prefix} {guid}");
        prop_assert_eq!(classify(&query), QueryType::Identifier);
    }
}
