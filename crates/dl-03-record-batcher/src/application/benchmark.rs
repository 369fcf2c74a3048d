//! # Benchmark Driver
//!
//! Measures commit throughput with synthetic payloads of growing size.
//!
//! Every tick, if the sink is idle: report the round that just finished,
//! enqueue `trx_per_round` payloads of `'#' * trx_length`, then grow
//! `trx_length` by `step_bytes`.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::info;

use crate::config::BenchmarkConfig;
use crate::ports::LogSink;

/// Throughput of one finished round.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundReport {
    /// Payload size of the round, in bytes.
    pub trx_length: usize,
    /// Average time per transaction.
    pub ms_per_trx: f64,
    /// Payload bytes per millisecond, i.e. KB/s.
    pub kb_per_sec: f64,
}

struct Round {
    trx_length: usize,
    started: Instant,
}

/// Benchmark driver.
pub struct BenchmarkDriver<S: LogSink> {
    config: BenchmarkConfig,
    sink: Arc<S>,
    trx_length: usize,
    current: Option<Round>,
}

impl<S: LogSink> BenchmarkDriver<S> {
    /// Create a driver starting at `config.start_bytes`.
    pub fn new(config: BenchmarkConfig, sink: Arc<S>) -> Self {
        Self {
            trx_length: config.start_bytes,
            config,
            sink,
            current: None,
        }
    }

    /// Payload size of the next round.
    pub fn next_trx_length(&self) -> usize {
        self.trx_length
    }

    /// One tick at `now`. Returns the report of the round that finished, if
    /// a new round was started.
    pub fn tick(&mut self, now: Instant) -> Option<RoundReport> {
        if self.sink.is_busy() {
            return None;
        }

        let report = self.current.take().map(|round| {
            let elapsed_ms = now.duration_since(round.started).as_secs_f64() * 1_000.0;
            let ms_per_trx = elapsed_ms / self.config.trx_per_round.max(1) as f64;
            let kb_per_sec = if ms_per_trx > 0.0 {
                round.trx_length as f64 / ms_per_trx
            } else {
                0.0
            };
            RoundReport {
                trx_length: round.trx_length,
                ms_per_trx,
                kb_per_sec,
            }
        });

        info!(
            "[dl-03] Starting round of {} transactions with {} bytes",
            self.config.trx_per_round, self.trx_length
        );
        let payload = "#".repeat(self.trx_length);
        for _ in 0..self.config.trx_per_round {
            self.sink.enqueue(payload.clone());
        }
        self.current = Some(Round {
            trx_length: self.trx_length,
            started: now,
        });
        self.trx_length += self.config.step_bytes;

        report
    }

    /// Tick until `rounds` rounds have finished and return their reports.
    pub async fn run_rounds(&mut self, rounds: usize) -> Vec<RoundReport> {
        let mut reports = Vec::with_capacity(rounds);
        let mut interval = tokio::time::interval(Duration::from_millis(self.config.tick_ms.max(1)));
        while reports.len() < rounds {
            interval.tick().await;
            if let Some(report) = self.tick(Instant::now()) {
                log_report(&report);
                reports.push(report);
            }
        }
        reports
    }

    /// Tick forever.
    pub async fn run(mut self) {
        let mut interval = tokio::time::interval(Duration::from_millis(self.config.tick_ms.max(1)));
        loop {
            interval.tick().await;
            if let Some(report) = self.tick(Instant::now()) {
                log_report(&report);
            }
        }
    }
}

fn log_report(report: &RoundReport) {
    info!(
        "[dl-03] {} bytes: {:.2} ms per transaction, {:.2} KB/s",
        report.trx_length, report.ms_per_trx, report.kb_per_sec
    );
}
