/// Property-based tests for credential hashing using proptest
///
/// Hashing is deliberately slow, so these run few cases with a reduced work factor.
use proptest::prelude::*;
use storefront::auth::{CredentialHasher, HashParams};

fn hasher() -> CredentialHasher {
    CredentialHasher::with_params(
        "proptest_pepper".to_string(),
        HashParams::new(1024, 1, 1, None).unwrap(),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn test_hash_verifies_own_password(password in "\\PC{6,40}") {
        let hasher = hasher();
        let hash = hasher.hash(&password).unwrap();

        prop_assert_ne!(&hash, &password);
        prop_assert!(hasher.verify(&hash, &password).is_ok());
    }

    #[test]
    fn test_hash_rejects_other_passwords(
        password in "[a-zA-Z0-9]{6,24}",
        other in "[a-zA-Z0-9]{6,24}",
    ) {
        prop_assume!(password != other);
        let hasher = hasher();
        let hash = hasher.hash(&password).unwrap();

        prop_assert!(hasher.verify(&hash, &other).is_err());
    }
}
