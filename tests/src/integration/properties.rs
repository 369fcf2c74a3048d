//! # Pipeline Properties
//!
//! Whatever the payloads and wherever a submission fails, retrying until the
//! queue is empty commits every payload exactly once, in order, on one
//! unbroken chain.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use dl_01_ledger_rpc::InMemoryLedger;
    use dl_02_chain_commit::{invariant_chain_links, ChainCommitConfig, ChainCommitService};
    use proptest::prelude::*;

    use crate::integration::support::committed_chain;

    fn run_pipeline(payloads: &[String], fail_at: Option<usize>) -> (Vec<String>, bool, usize) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        runtime.block_on(async {
            let ledger = Arc::new(InMemoryLedger::default());
            if let Some(nth) = fail_at {
                ledger.fail_submission_attempt(nth);
            }
            let service =
                ChainCommitService::new(ledger.clone(), ChainCommitConfig::for_testing()).unwrap();
            for payload in payloads {
                service.queue().push(payload.clone());
            }

            let mut passes = 0;
            while service.is_busy() && passes <= payloads.len() + 1 {
                let _ = service.drain().await;
                passes += 1;
            }

            let chain = committed_chain(&ledger, "op.room1").await;
            let linked = invariant_chain_links(None, &chain).is_ok();
            let data = chain.into_iter().map(|e| e.data).collect();
            (data, linked, service.pending())
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_every_payload_committed_once_in_order(
            payloads in prop::collection::vec("[a-z0-9]{1,12}", 1..6),
            fail_at in prop::option::of(0usize..6),
        ) {
            let (committed, linked, pending) = run_pipeline(&payloads, fail_at);
            prop_assert_eq!(pending, 0);
            prop_assert!(linked);
            prop_assert_eq!(committed, payloads);
        }
    }
}
