//! # Recovery
//!
//! Stalls, retries and cold starts.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use dl_01_ledger_rpc::InMemoryLedger;
    use dl_02_chain_commit::{
        invariant_chain_links, ChainCommitConfig, ChainCommitError, ChainCommitService,
    };
    use shared_types::{
        Action, BlockTransaction, ChainEntry, ChainRef, PackedTrx, PermissionLevel,
        TransactionBody, TrxRef, UpdateAction,
    };

    use crate::integration::support::{committed_chain, wait_idle, wait_stalled, CONTRACT};

    fn service(ledger: &Arc<InMemoryLedger>, config: ChainCommitConfig) -> ChainCommitService {
        ChainCommitService::new(ledger.clone(), config).unwrap()
    }

    fn commit_trx(id: &str, entry: &ChainEntry) -> BlockTransaction {
        BlockTransaction {
            status: "executed".to_string(),
            trx: TrxRef::Full(PackedTrx {
                id: id.to_string(),
                transaction: TransactionBody {
                    actions: vec![Action {
                        account: CONTRACT.to_string(),
                        name: "update".to_string(),
                        authorization: vec![PermissionLevel::active(&entry.user)],
                        data: serde_json::to_value(UpdateAction::for_entry(entry, None)).unwrap(),
                    }],
                },
            }),
        }
    }

    fn chain_row(entry: &ChainEntry) -> serde_json::Value {
        serde_json::json!({
            "scope": entry.scope,
            "user": entry.user,
            "data": entry.data,
            "refBlock": entry.ref_block,
            "refTrx": entry.ref_trx,
        })
    }

    #[tokio::test]
    async fn test_failure_mid_drain_then_retrigger() {
        let ledger = Arc::new(InMemoryLedger::default());
        ledger.fail_submission_attempt(1);
        let service = service(&ledger, ChainCommitConfig::for_testing());

        service.queue().push("A");
        service.queue().push("B");
        service.queue().push("C");
        service.retrigger();
        assert!(wait_stalled(&service).await);
        assert_eq!(service.queue().snapshot(), ["B", "C"]);

        service.retrigger();
        assert!(wait_idle(&service).await);

        let data: Vec<_> = ledger.submitted_updates().into_iter().map(|u| u.data).collect();
        assert_eq!(data, ["A", "B", "C"]);
        assert_eq!(ledger.submission_attempts(), 4);
        let chain = committed_chain(&ledger, "op.room1").await;
        assert!(invariant_chain_links(None, &chain).is_ok());
    }

    #[tokio::test]
    async fn test_restart_resolves_across_foreign_traffic() {
        let ledger = Arc::new(InMemoryLedger::default());
        let room1 = service(&ledger, ChainCommitConfig::for_testing());
        let room2 = service(
            &ledger,
            ChainCommitConfig {
                user: "op.room2".to_string(),
                ..ChainCommitConfig::for_testing()
            },
        );

        for i in 0..3 {
            room1.queue().push(format!("r1-{}", i));
            room1.drain().await.unwrap();
            room2.queue().push(format!("r2-{}", i));
            room2.drain().await.unwrap();
            ledger.push_empty_blocks(5);
        }

        let restarted = service(&ledger, ChainCommitConfig::for_testing());
        restarted.queue().push("r1-3");
        assert_eq!(restarted.drain().await.unwrap(), 1);

        let chain = committed_chain(&ledger, "op.room1").await;
        assert_eq!(chain.len(), 4);
        assert!(invariant_chain_links(None, &chain).is_ok());
        assert_eq!(restarted.last_committed(), chain.last().cloned());
    }

    #[tokio::test]
    async fn test_same_block_twin_is_not_taken() {
        let ledger = Arc::new(InMemoryLedger::default());
        let predecessor = ChainEntry::new("ac.hospital1", "op.room1", "p", None)
            .committed_at(ChainRef::new(1, "p-trx"));
        ledger.push_block(vec![commit_trx("p-trx", &predecessor)]);

        let twin = ChainEntry::new("ac.hospital1", "op.room1", "twin", Some(&predecessor));
        let real = ChainEntry::new("ac.hospital1", "op.room1", "real", Some(&predecessor));
        ledger.push_block(vec![commit_trx("twin-trx", &twin), commit_trx("real-trx", &real)]);
        ledger.set_row(CONTRACT, "ac.hospital1", "datalogs", "op.room1", chain_row(&real));

        let service = service(&ledger, ChainCommitConfig::for_testing());
        service.queue().push("next");
        service.drain().await.unwrap();

        let next = ledger.submitted_updates().pop().unwrap();
        assert_eq!((next.ref_block, next.ref_trx.as_str()), (2, "real-trx"));
        assert_eq!((next.old_ref_block, next.old_ref_trx.as_str()), (2, "real-trx"));
    }

    #[tokio::test]
    async fn test_scan_bound_exhaustion_stalls_without_submitting() {
        let ledger = Arc::new(InMemoryLedger::default());
        let row = ChainEntry::new("ac.hospital1", "op.room1", "far", None);
        ledger.push_empty_blocks(50);
        ledger.push_block(vec![commit_trx("far-trx", &row)]);
        ledger.set_row(CONTRACT, "ac.hospital1", "datalogs", "op.room1", chain_row(&row));

        let bounded = service(
            &ledger,
            ChainCommitConfig {
                max_scan_blocks: 10,
                ..ChainCommitConfig::for_testing()
            },
        );
        bounded.queue().push("next");
        assert!(matches!(
            bounded.drain().await,
            Err(ChainCommitError::PredecessorNotFound {
                from_block: 1,
                to_block: 10
            })
        ));
        assert_eq!(bounded.pending(), 1);
        assert_eq!(ledger.submission_attempts(), 0);

        let wide = service(&ledger, ChainCommitConfig::for_testing());
        wide.queue().push("next");
        wide.drain().await.unwrap();
        let next = ledger.submitted_updates().pop().unwrap();
        assert_eq!((next.ref_block, next.ref_trx.as_str()), (51, "far-trx"));
    }

    #[tokio::test]
    async fn test_read_outage_during_cold_start() {
        let ledger = Arc::new(InMemoryLedger::default());
        let service = service(&ledger, ChainCommitConfig::for_testing());
        ledger.set_fail_reads(true);

        service.enqueue("A");
        assert!(wait_stalled(&service).await);
        assert_eq!(service.pending(), 1);
        assert_eq!(ledger.submission_attempts(), 0);

        ledger.set_fail_reads(false);
        service.enqueue("B");
        assert!(wait_idle(&service).await);
        let chain = committed_chain(&ledger, "op.room1").await;
        assert_eq!(chain.len(), 2);
        assert!(invariant_chain_links(None, &chain).is_ok());
    }

    #[tokio::test]
    async fn test_unexecuted_receipt_is_retried() {
        let ledger = Arc::new(InMemoryLedger::default());
        ledger.set_receipt_status(Some("soft_fail"));
        let service = service(&ledger, ChainCommitConfig::for_testing());
        service.queue().push("A");
        assert!(service.drain().await.is_err());
        assert_eq!(service.pending(), 1);

        ledger.set_receipt_status(None);
        service.drain().await.unwrap();
        let updates = ledger.submitted_updates();
        // The soft-failed commit is on the ledger but the retry links to the chain start
        assert_eq!(updates.len(), 2);
        assert_eq!((updates[1].ref_block, updates[1].ref_trx.as_str()), (0, ""));
    }
}
