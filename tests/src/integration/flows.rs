//! # Pipeline Flows
//!
//! Producers → batcher (dl-03) → commit pipeline (dl-02) → ledger (dl-01).

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use dl_01_ledger_rpc::InMemoryLedger;
    use dl_02_chain_commit::{invariant_chain_links, ChainCommitConfig, ChainCommitService};
    use dl_03_record_batcher::{BenchmarkConfig, BenchmarkDriver, LogRecord};
    use node_runtime::{NodeConfig, SubsystemContainer};
    use shared_crypto::{open, test_keys, RecipientKeyPair};

    use crate::integration::support::{committed_chain, wait_idle, CONTRACT};

    // =========================================================================
    // TEST FIXTURES
    // =========================================================================

    fn add_reader(ledger: &InMemoryLedger, row: &str, pair: &RecipientKeyPair) {
        ledger.set_row(
            CONTRACT,
            "ac.hospital1",
            "permissions",
            row,
            serde_json::json!({ "rPubKey": pair.public_key().to_armored().unwrap() }),
        );
    }

    fn plaintext_service(ledger: &Arc<InMemoryLedger>, user: &str) -> ChainCommitService {
        let config = ChainCommitConfig {
            user: user.to_string(),
            ..ChainCommitConfig::for_testing()
        };
        ChainCommitService::new(ledger.clone(), config).unwrap()
    }

    // =========================================================================
    // FLOWS
    // =========================================================================

    /// A, B, C enqueued on an empty chain commit in order, each linked to the
    /// one before.
    #[tokio::test]
    async fn test_three_payloads_link_in_order() {
        let ledger = Arc::new(InMemoryLedger::default());
        let service = plaintext_service(&ledger, "op.room1");

        service.enqueue("A");
        assert!(service.is_busy());
        service.enqueue("B");
        service.enqueue("C");
        assert!(wait_idle(&service).await);
        assert!(!service.is_busy());

        let chain = committed_chain(&ledger, "op.room1").await;
        let data: Vec<_> = chain.iter().map(|e| e.data.as_str()).collect();
        assert_eq!(data, ["A", "B", "C"]);
        assert_eq!((chain[0].ref_block, chain[0].ref_trx.as_str()), (0, ""));
        assert!(invariant_chain_links(None, &chain).is_ok());
    }

    #[tokio::test]
    async fn test_batched_records_committed_encrypted() {
        let ledger = Arc::new(InMemoryLedger::default());
        let reader = test_keys::alice();
        add_reader(&ledger, "reader", &reader);

        let mut config = NodeConfig::default();
        config.log_options.max_records_per_trx = 2;
        let container = SubsystemContainer::with_ledger(config, ledger.clone()).unwrap();
        container.chain_commit.warm_up().await.unwrap();

        for i in 0..5 {
            container
                .batcher
                .push(LogRecord::workstation("192.168.0.80", 26501, format!("msg-{}", i)))
                .unwrap();
        }
        container.batcher.flush().unwrap();
        assert!(wait_idle(&container.chain_commit).await);

        let chain = committed_chain(&ledger, "op.room1").await;
        assert_eq!(chain.len(), 3);
        assert!(invariant_chain_links(None, &chain).is_ok());

        let mut seen = Vec::new();
        for entry in &chain {
            let plaintext = open(&entry.data, &reader).unwrap();
            let records: Vec<LogRecord> = serde_json::from_slice(&plaintext).unwrap();
            // Newest first inside every batch
            seen.extend(records.into_iter().rev().map(|r| r.payload));
        }
        assert_eq!(seen, ["msg-0", "msg-1", "msg-2", "msg-3", "msg-4"]);
    }

    #[tokio::test]
    async fn test_reader_change_applies_after_key_refresh() {
        let ledger = Arc::new(InMemoryLedger::default());
        let alice = test_keys::alice();
        let bob = test_keys::bob();
        let carol = test_keys::carol();
        add_reader(&ledger, "alice", &alice);
        add_reader(&ledger, "bob", &bob);

        let config = ChainCommitConfig {
            encrypt: true,
            ..ChainCommitConfig::for_testing()
        };
        let service = ChainCommitService::new(ledger.clone(), config).unwrap();
        service.warm_up().await.unwrap();
        service.queue().push("before");
        service.drain().await.unwrap();

        // Bob's row now holds Carol's key
        add_reader(&ledger, "bob", &carol);
        assert_eq!(service.refresh_keys().await.unwrap(), 2);
        service.queue().push("after");
        service.drain().await.unwrap();

        let chain = committed_chain(&ledger, "op.room1").await;
        assert_eq!(open(&chain[0].data, &bob).unwrap(), b"before");
        assert!(open(&chain[1].data, &bob).is_err());
        assert_eq!(open(&chain[1].data, &carol).unwrap(), b"after");
        assert_eq!(open(&chain[1].data, &alice).unwrap(), b"after");
    }

    #[tokio::test]
    async fn test_two_writers_keep_separate_chains() {
        let ledger = Arc::new(InMemoryLedger::default());
        let room1 = plaintext_service(&ledger, "op.room1");
        let room2 = plaintext_service(&ledger, "op.room2");

        for i in 0..4 {
            room1.enqueue(format!("r1-{}", i));
            room2.enqueue(format!("r2-{}", i));
        }
        assert!(wait_idle(&room1).await);
        assert!(wait_idle(&room2).await);

        for user in ["op.room1", "op.room2"] {
            let chain = committed_chain(&ledger, user).await;
            assert_eq!(chain.len(), 4);
            assert!(invariant_chain_links(None, &chain).is_ok());
        }
    }

    #[tokio::test]
    async fn test_benchmark_rounds_commit_in_order() {
        let ledger = Arc::new(InMemoryLedger::default());
        let service = plaintext_service(&ledger, "op.room1");
        let mut driver = BenchmarkDriver::new(
            BenchmarkConfig {
                start_bytes: 16,
                step_bytes: 8,
                trx_per_round: 3,
                tick_ms: 1,
            },
            Arc::new(service.clone()),
        );

        let reports = driver.run_rounds(2).await;
        assert_eq!(reports[0].trx_length, 16);
        assert_eq!(reports[1].trx_length, 24);
        assert!(wait_idle(&service).await);

        let chain = committed_chain(&ledger, "op.room1").await;
        let lengths: Vec<_> = chain.iter().map(|e| e.data.len()).collect();
        assert_eq!(lengths, [16, 16, 16, 24, 24, 24, 32, 32, 32]);
        assert!(invariant_chain_links(None, &chain).is_ok());
    }
}
