//! # DataLog-Chain Pipeline Benchmarks
//!
//! | Component | Operation | Scales with |
//! |-----------|-----------|-------------|
//! | shared-crypto | `seal` | number of readers, payload size |
//! | dl-02 Block Scan | `find_matching_transaction` | transactions per block |
//! | dl-03 Batcher | `push` + flush | records per transaction |

use std::sync::Arc;
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dl_02_chain_commit::algorithms::find_matching_transaction;
use dl_03_record_batcher::{BatcherConfig, LogRecord, MemorySink, RecordBatcher};
use shared_crypto::{seal, test_keys, RecipientPublicKey};
use shared_types::{
    Action, Block, BlockTransaction, ChainEntry, PackedTrx, PermissionLevel, TransactionBody,
    TrxRef, UpdateAction,
};

// ============================================================================
// ENVELOPE ENCRYPTION
// ============================================================================

fn bench_seal(c: &mut Criterion) {
    let mut group = c.benchmark_group("shared-crypto-seal");
    group.measurement_time(Duration::from_secs(5));

    let payload = vec![b'#'; 20_000];
    let all: Vec<RecipientPublicKey> = test_keys::all().iter().map(|pair| pair.public_key()).collect();
    for readers in [1, 2, 4] {
        let keys = all[..readers].to_vec();

        group.throughput(Throughput::Bytes(payload.len() as u64));
        group.bench_with_input(BenchmarkId::new("readers", readers), &keys, |b, keys| {
            b.iter(|| black_box(seal(&payload, keys).is_ok()))
        });
    }

    group.finish();
}

// ============================================================================
// BLOCK SCAN
// ============================================================================

fn commit(id: String, entry: &ChainEntry) -> BlockTransaction {
    BlockTransaction {
        status: "executed".to_string(),
        trx: TrxRef::Full(PackedTrx {
            id,
            transaction: TransactionBody {
                actions: vec![Action {
                    account: "datasafe".to_string(),
                    name: "update".to_string(),
                    authorization: vec![PermissionLevel::active(&entry.user)],
                    data: serde_json::to_value(UpdateAction::for_entry(entry, None))
                        .unwrap_or_default(),
                }],
            },
        }),
    }
}

fn bench_block_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("dl-02-block-scan");

    let candidate = ChainEntry::new("ac.hospital1", "op.room1", "needle", None);
    for size in [10, 100, 1_000] {
        // Same writer, different payloads: every transaction is decoded
        let mut transactions: Vec<_> = (0..size - 1)
            .map(|i| {
                let other = ChainEntry::new("ac.hospital1", "op.room1", format!("hay-{}", i), None);
                commit(format!("trx-{}", i), &other)
            })
            .collect();
        transactions.push(commit("needle-trx".to_string(), &candidate));
        let block = Block {
            block_num: 1,
            id: "0000000000000001".to_string(),
            transactions,
        };

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("transactions", size), &block, |b, block| {
            b.iter(|| {
                black_box(find_matching_transaction(
                    block,
                    &candidate,
                    "datasafe",
                    "update",
                ))
            })
        });
    }

    group.finish();
}

// ============================================================================
// RECORD BATCHING
// ============================================================================

fn bench_batcher(c: &mut Criterion) {
    let mut group = c.benchmark_group("dl-03-batcher");

    for per_trx in [1, 10, 50] {
        let config = BatcherConfig {
            max_records_per_trx: per_trx,
            max_trx_content_size: usize::MAX,
        };
        let Ok(batcher) = RecordBatcher::new(config, Arc::new(MemorySink::default())) else {
            continue;
        };

        group.throughput(Throughput::Elements(per_trx as u64));
        group.bench_with_input(BenchmarkId::new("records", per_trx), &per_trx, |b, &n| {
            b.iter(|| {
                for i in 0..n {
                    let record = LogRecord::workstation("192.168.0.80", 26501, format!("line {}", i));
                    black_box(batcher.push(record).ok());
                }
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_seal, bench_block_scan, bench_batcher);

criterion_main!(benches);
