//! Property-based tests for user codes and approval matching.

use proptest::prelude::*;
use sysaibox_mock::server::pairing::{PairingSettings, PairingStatus, PairingStore};

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime")
        .block_on(future)
}

proptest! {
    /// Generated user codes are `PREFIX-XXXX` with an uppercase prefix and hex digits.
    #[test]
    fn user_code_format(prefix in "[A-Za-z]{1,8}") {
        let store = PairingStore::new(PairingSettings {
            user_code_prefix: prefix.clone(),
            ..PairingSettings::default()
        });
        let grant = block_on(store.start_pairing()).expect("free code");

        let (head, tail) = grant.user_code.split_once('-').expect("dash");
        prop_assert_eq!(head, prefix.to_ascii_uppercase());
        prop_assert_eq!(tail.len(), 4);
        prop_assert!(tail.chars().all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
    }

    /// Any casing of the issued code approves the pairing.
    #[test]
    fn approve_ignores_case(mask in proptest::collection::vec(any::<bool>(), 10)) {
        let store = PairingStore::default();
        let status = block_on(async {
            let grant = store.start_pairing().await.expect("free code");
            let typed: String = grant
                .user_code
                .chars()
                .zip(mask.iter().cycle())
                .map(|(c, lower)| if *lower { c.to_ascii_lowercase() } else { c })
                .collect();
            store.approve(&typed).await.expect("matched");
            store.status(&grant.device_code).await
        });
        prop_assert_eq!(status, PairingStatus::Authorized);
    }

    /// A code that was never issued matches nothing and mutates nothing.
    #[test]
    fn approve_unknown_leaves_store_untouched(suffix in "[A-Z0-9]{4}") {
        let store = PairingStore::default();
        let (result, status) = block_on(async {
            let grant = store.start_pairing().await.expect("free code");
            let result = store.approve(&format!("OTHER-{suffix}")).await;
            (result, store.status(&grant.device_code).await)
        });
        prop_assert!(result.is_err());
        prop_assert_eq!(status, PairingStatus::Pending);
    }
}
